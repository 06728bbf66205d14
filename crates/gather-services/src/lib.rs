//! Gather Services Layer
//!
//! Business orchestration between the HTTP handlers and the repositories:
//! event lifecycle and search post-processing, attendee registration, the
//! booking state machine, and the payment-provider client. Keep coordination
//! here; keep thin HTTP handling in gather-api.

pub mod bookings;
pub mod events;
pub mod payments;
pub mod registrations;

pub use bookings::BookingsService;
pub use events::EventsService;
pub use payments::{MockPaymentProvider, PaymentIntent, PaymentProvider, StripeProvider};
pub use registrations::RegistrationsService;
