//! Repository and service wiring.

use std::sync::Arc;

use sqlx::PgPool;

use gather_core::AppConfig;
use gather_db::{
    AttendeeRepository, BookingRepository, CategoryRepository, EventRepository,
    NotificationRepository, OrganizationRepository, PaymentRepository, UserRepository,
};
use gather_services::{
    BookingsService, EventsService, MockPaymentProvider, PaymentProvider, RegistrationsService,
    StripeProvider,
};

use crate::state::AppState;

/// Build all repositories and services on top of the shared pool.
pub fn initialize_services(config: AppConfig, pool: PgPool) -> Arc<AppState> {
    let events = EventRepository::new(pool.clone());
    let attendees = AttendeeRepository::new(pool.clone());
    let bookings = BookingRepository::new(pool.clone());
    let payments = PaymentRepository::new(pool.clone());
    let users = UserRepository::new(pool.clone());
    let organizations = OrganizationRepository::new(pool.clone());
    let notifications = NotificationRepository::new(pool.clone());
    let categories = CategoryRepository::new(pool.clone());

    let provider = payment_provider(&config);

    let events_service = EventsService::new(events.clone());
    let registrations_service =
        RegistrationsService::new(attendees, events.clone(), notifications.clone());
    let bookings_service = BookingsService::new(
        bookings,
        events.clone(),
        payments,
        users.clone(),
        notifications.clone(),
        provider,
    );

    Arc::new(AppState {
        config,
        pool,
        users,
        organizations,
        notifications,
        categories,
        events,
        events_service,
        registrations_service,
        bookings_service,
    })
}

/// Stripe when a secret key is configured; otherwise the in-process mock,
/// which confirms intents immediately. The mock is only suitable for
/// development and tests.
fn payment_provider(config: &AppConfig) -> Arc<dyn PaymentProvider> {
    match &config.payment_secret_key {
        Some(secret) => Arc::new(StripeProvider::new(
            secret.clone(),
            config.payment_api_base.clone(),
        )),
        None => {
            tracing::warn!("No payment secret key configured, using the mock payment provider");
            Arc::new(MockPaymentProvider::new())
        }
    }
}
