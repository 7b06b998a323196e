pub mod auth;
pub mod availabilities;
pub mod events;
pub mod health;
pub mod offerings;
pub mod reservations;
pub mod users;
