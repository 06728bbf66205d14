//! Shared application state, cloned cheaply behind an `Arc` into every
//! handler via axum's `State` extractor.

use sqlx::PgPool;

use gather_core::AppConfig;
use gather_db::{
    CategoryRepository, EventRepository, NotificationRepository, OrganizationRepository,
    UserRepository,
};
use gather_services::{BookingsService, EventsService, RegistrationsService};

pub struct AppState {
    pub config: AppConfig,
    pub pool: PgPool,

    // Repositories used directly by thin handlers (auth, orgs, notifications).
    pub users: UserRepository,
    pub organizations: OrganizationRepository,
    pub notifications: NotificationRepository,
    pub categories: CategoryRepository,
    pub events: EventRepository,

    // Services own the multi-step workflows.
    pub events_service: EventsService,
    pub registrations_service: RegistrationsService,
    pub bookings_service: BookingsService,
}
