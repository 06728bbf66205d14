//! Gather Database Library
//!
//! sqlx/Postgres repositories for all Gather entities. Every piece of SQL in
//! the workspace lives here, including the dynamic event-search query
//! assembly and the transactional capacity/duplicate guards.

pub mod db;

pub use db::{
    AttendeeRepository, BookingRepository, CategoryRepository, EventRepository,
    NotificationRepository, OrganizationRepository, PaymentRepository, UserRepository,
};
