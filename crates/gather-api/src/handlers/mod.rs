pub mod attendees;
pub mod auth;
pub mod bookings;
pub mod categories;
pub mod events;
pub mod health;
pub mod notifications;
pub mod organizations;
