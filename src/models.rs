pub mod bookings;
pub mod catalog;
pub mod orders;
pub mod resources;
