//! Data models for the barbershop server

pub mod availability;
pub mod barber_service;
pub mod discount;
pub mod event;
pub mod haircut_service;
pub mod user;

// Re-export commonly used types
pub use availability::{NewWorkingHours, WorkingHoursWindow};
pub use barber_service::BarberService;
pub use discount::{Discount, DiscountType};
pub use event::{BookingEvent, NewBookingEvent};
pub use haircut_service::HaircutService;
pub use user::{UserClaims, UserRole};
