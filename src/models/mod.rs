mod availability;
mod offering;
mod reservation;
mod role;
mod user;

pub use availability::{
    Availability, AvailabilityOption, AvailabilitySchedule, NewAvailability,
    NewAvailabilityOption, NewAvailabilitySchedule, SlotStatus,
};
pub use offering::{
    NewOffering, NewOfferingOption, Offering, OfferingKind, OfferingOption, UpdateOffering,
    UpdateOfferingOption,
};
pub use reservation::{
    NewReservation, NewReservationSchedule, Reservation, ReservationSchedule, ReservationStatus,
    SelectedOption,
};
pub use role::{NewUserRole, Role, UserRole};
pub use user::{NewUser, UpdateUser, User};
