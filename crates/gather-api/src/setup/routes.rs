//! Route configuration and setup.

use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::api_doc::ApiDoc;
use crate::handlers;
use crate::middleware::{request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// Setup all application routes
pub fn setup_routes(state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(&state)?;

    let app = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            "/api/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .merge(api_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .with_state(state);

    Ok(app)
}

/// Everything under /api/v1. Authentication is enforced per-handler through
/// the `AuthUser` extractor, so public and protected routes share one router.
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Auth & users
        .route("/api/v1/auth/register", post(handlers::auth::register))
        .route("/api/v1/auth/login", post(handlers::auth::login))
        .route(
            "/api/v1/users/me",
            get(handlers::auth::get_me).patch(handlers::auth::update_me),
        )
        .route(
            "/api/v1/users/me/rewards",
            get(handlers::auth::list_my_rewards),
        )
        // Events; literal segments are registered before `{id}` so
        // /events/search and friends never match as an id.
        .route(
            "/api/v1/events",
            get(handlers::events::list_events).post(handlers::events::create_event),
        )
        .route("/api/v1/events/search", get(handlers::events::search_events))
        .route(
            "/api/v1/events/featured",
            get(handlers::events::featured_events),
        )
        .route(
            "/api/v1/events/trending",
            get(handlers::events::trending_events),
        )
        .route(
            "/api/v1/events/slug/{slug}",
            get(handlers::events::get_event_by_slug),
        )
        .route(
            "/api/v1/events/{id}",
            get(handlers::events::get_event)
                .patch(handlers::events::update_event)
                .delete(handlers::events::delete_event),
        )
        .route(
            "/api/v1/events/{id}/register",
            post(handlers::attendees::register_attendee),
        )
        .route(
            "/api/v1/events/{id}/attendees",
            get(handlers::attendees::list_attendees),
        )
        // Bookings
        .route(
            "/api/v1/bookings",
            get(handlers::bookings::list_bookings).post(handlers::bookings::create_booking),
        )
        .route("/api/v1/bookings/{id}", get(handlers::bookings::get_booking))
        .route(
            "/api/v1/bookings/{id}/confirm",
            post(handlers::bookings::confirm_booking),
        )
        .route(
            "/api/v1/bookings/{id}/cancel",
            post(handlers::bookings::cancel_booking),
        )
        // Organizations
        .route(
            "/api/v1/organizations",
            post(handlers::organizations::create_organization),
        )
        .route(
            "/api/v1/organizations/mine",
            get(handlers::organizations::get_my_organization),
        )
        .route(
            "/api/v1/organizations/slug/{slug}",
            get(handlers::organizations::get_organization_by_slug),
        )
        .route(
            "/api/v1/organizations/{id}",
            get(handlers::organizations::get_organization)
                .patch(handlers::organizations::update_organization),
        )
        .route(
            "/api/v1/organizations/{id}/subscription",
            put(handlers::organizations::update_subscription),
        )
        // Categories
        .route(
            "/api/v1/categories",
            get(handlers::categories::list_categories),
        )
        // Notifications
        .route(
            "/api/v1/notifications",
            get(handlers::notifications::list_notifications),
        )
}

fn setup_cors(state: &Arc<AppState>) -> Result<CorsLayer, anyhow::Error> {
    let origins = &state.config.cors_origins;
    let cors = if origins.contains(&"*".to_string()) {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers(Any)
    } else {
        let parsed = origins
            .iter()
            .map(|o| o.parse())
            .collect::<Result<Vec<HeaderValue>, _>>()?;
        CorsLayer::new()
            .allow_origin(parsed)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers(Any)
    };
    Ok(cors)
}
