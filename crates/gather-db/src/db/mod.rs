//! Database repositories for the data access layer
//!
//! Each repository owns a `PgPool` clone and is responsible for one domain
//! entity. Multi-step write paths (registration, booking) run inside a single
//! transaction that locks the event row first, so capacity and duplicate
//! checks cannot race.

pub mod attendees;
pub mod bookings;
pub mod categories;
pub mod events;
pub mod notifications;
pub mod organizations;
pub mod payments;
pub mod users;

pub use attendees::AttendeeRepository;
pub use bookings::BookingRepository;
pub use categories::CategoryRepository;
pub use events::EventRepository;
pub use notifications::NotificationRepository;
pub use organizations::OrganizationRepository;
pub use payments::PaymentRepository;
pub use users::UserRepository;
