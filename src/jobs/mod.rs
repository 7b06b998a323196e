//! Background jobs.
//!
//! The only scheduled job is the role-grant sweep; the scheduler wrapper
//! stays generic so further periodic maintenance can hook in the same way.

mod role_sweep;
mod scheduler;

pub use role_sweep::RoleSweep;
pub use scheduler::JobScheduler;
