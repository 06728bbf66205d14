//! Data models for the application
//!
//! All domain structures, organized by feature area. Database row derives are
//! gated behind the `sqlx` feature so the models stay usable from clients
//! that do not link the database stack.

mod attendee;
mod booking;
mod category;
mod event;
mod notification;
mod organization;
mod reward;
mod search;
mod user;

pub use attendee::*;
pub use booking::*;
pub use category::*;
pub use event::*;
pub use notification::*;
pub use organization::*;
pub use reward::*;
pub use search::*;
pub use user::*;
