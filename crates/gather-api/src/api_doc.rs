//! OpenAPI documentation, served at `/api/openapi.json`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error;
use crate::handlers;
use gather_core::models;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Gather API",
        version = "0.1.0",
        description = "Event discovery, registration and booking API. All endpoints are versioned under /api/v1/."
    ),
    modifiers(&BearerAuth),
    paths(
        // Auth & users
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,
        handlers::auth::update_me,
        handlers::auth::list_my_rewards,
        // Events
        handlers::events::create_event,
        handlers::events::list_events,
        handlers::events::search_events,
        handlers::events::featured_events,
        handlers::events::trending_events,
        handlers::events::get_event,
        handlers::events::get_event_by_slug,
        handlers::events::update_event,
        handlers::events::delete_event,
        handlers::categories::list_categories,
        // Registrations
        handlers::attendees::register_attendee,
        handlers::attendees::list_attendees,
        // Bookings
        handlers::bookings::create_booking,
        handlers::bookings::list_bookings,
        handlers::bookings::get_booking,
        handlers::bookings::confirm_booking,
        handlers::bookings::cancel_booking,
        // Organizations
        handlers::organizations::create_organization,
        handlers::organizations::get_my_organization,
        handlers::organizations::get_organization,
        handlers::organizations::get_organization_by_slug,
        handlers::organizations::update_organization,
        handlers::organizations::update_subscription,
        // Notifications
        handlers::notifications::list_notifications,
        // Health
        handlers::health::health_check,
    ),
    components(
        schemas(
            // Users
            models::UserRole,
            models::UserProfile,
            models::RegisterUserRequest,
            models::LoginRequest,
            models::UpdateUserRequest,
            models::AuthResponse,
            models::Reward,
            // Events
            models::Event,
            models::EventStatus,
            models::EventType,
            models::EventWithDistance,
            models::LocalizedEvent,
            models::CreateEventRequest,
            models::UpdateEventRequest,
            models::EventSort,
            models::Category,
            // Registrations
            models::Attendee,
            models::RegisterAttendeeRequest,
            // Bookings
            models::Booking,
            models::BookingStatus,
            models::BookingResponse,
            models::CreateBookingRequest,
            models::PaymentStatus,
            // Organizations
            models::Organization,
            models::OrganizationFeatures,
            models::OrganizationResponse,
            models::CreateOrganizationRequest,
            models::UpdateOrganizationRequest,
            models::UpdateSubscriptionRequest,
            models::SubscriptionTier,
            // Notifications
            models::Notification,
            models::NotificationKind,
            // Health
            handlers::health::HealthResponse,
            // Error
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "users", description = "Current user profile"),
        (name = "events", description = "Event discovery, search and lifecycle"),
        (name = "registrations", description = "Free attendee registration"),
        (name = "bookings", description = "Ticket bookings and payments"),
        (name = "organizations", description = "Organizer organizations and subscriptions"),
        (name = "notifications", description = "In-app notification feed"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
