//! Event lifecycle and search orchestration.
//!
//! The repository returns raw pages; this layer owns everything that is not
//! SQL: scheduling/pricing validation, id and slug generation with a bounded
//! re-roll, timezone rendering for listings, and the distance annotation and
//! sort applied after a geo search.

use chrono::Utc;
use rust_decimal::Decimal;

use gather_core::constants::ID_GENERATION_ATTEMPTS;
use gather_core::models::{
    CreateEventRequest, Event, EventSearchFilters, EventSort, EventStatus, EventWithDistance,
    GeoFilter, LocalizedEvent, UpdateEventRequest, UserRole,
};
use gather_core::{
    geo, ident, validation, AppError, PageParams, Pagination,
};
use gather_db::EventRepository;

/// Free events must not carry a price; paid events must.
pub fn validate_pricing(is_free: bool, base_price: Option<Decimal>) -> Result<(), AppError> {
    match (is_free, base_price) {
        (true, Some(price)) if !price.is_zero() => Err(AppError::Validation(
            "A free event cannot have a base price".to_string(),
        )),
        (false, None) => Err(AppError::Validation(
            "A paid event requires a base price".to_string(),
        )),
        (false, Some(price)) if price <= Decimal::ZERO => Err(AppError::Validation(
            "Base price must be positive".to_string(),
        )),
        _ => Ok(()),
    }
}

/// Annotate events with the distance from the caller's position. Events
/// without coordinates keep `distance: None`.
pub fn annotate_distances(events: Vec<Event>, near: Option<&GeoFilter>) -> Vec<EventWithDistance> {
    events
        .into_iter()
        .map(|event| {
            let distance = match (near, event.latitude, event.longitude) {
                (Some(n), Some(lat), Some(lon)) => {
                    Some(geo::haversine_distance_km(n.latitude, n.longitude, lat, lon))
                }
                _ => None,
            };
            EventWithDistance { event, distance }
        })
        .collect()
}

/// Nearest first; events without a computed distance sort last. Stable, so
/// the database order is preserved within ties.
pub fn sort_by_distance(items: &mut [EventWithDistance]) {
    items.sort_by(|a, b| match (a.distance, b.distance) {
        (Some(da), Some(db)) => da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

fn localize(event: Event, tz: Option<chrono_tz::Tz>) -> LocalizedEvent {
    let (local_start_time, local_end_time) = match tz {
        Some(tz) => (
            Some(event.start_time.with_timezone(&tz).to_rfc3339()),
            Some(event.end_time.with_timezone(&tz).to_rfc3339()),
        ),
        None => (None, None),
    };
    LocalizedEvent {
        event,
        local_start_time,
        local_end_time,
    }
}

#[derive(Clone)]
pub struct EventsService {
    events: EventRepository,
}

impl EventsService {
    pub fn new(events: EventRepository) -> Self {
        Self { events }
    }

    #[tracing::instrument(skip(self, request), fields(created_by = %created_by))]
    pub async fn create(
        &self,
        created_by: &str,
        organization_id: Option<String>,
        request: CreateEventRequest,
    ) -> Result<Event, AppError> {
        validation::validate_event_times(request.start_time, request.end_time, Utc::now())?;
        let timezone = request.timezone.unwrap_or_else(|| "UTC".to_string());
        validation::parse_timezone(&timezone)?;
        validate_pricing(request.is_free, request.base_price)?;

        // Re-roll the candidate id/slug a bounded number of times; the
        // primary key and unique slug index are the real guarantee.
        let mut id = ident::generate_id("event");
        let mut slug = ident::generate_slug(&request.title);
        for _ in 1..ID_GENERATION_ATTEMPTS {
            if !self.events.id_or_slug_exists(&id, &slug).await? {
                break;
            }
            id = ident::generate_id("event");
            slug = ident::generate_slug(&request.title);
        }

        let now = Utc::now();
        let event = Event {
            id,
            slug,
            title: request.title,
            description: request.description,
            short_description: request.short_description,
            event_type: request.event_type,
            venue: request.venue,
            address: request.address,
            city: request.city,
            country: request.country,
            latitude: request.latitude,
            longitude: request.longitude,
            start_time: request.start_time,
            end_time: request.end_time,
            timezone,
            max_capacity: request.max_capacity,
            is_free: request.is_free,
            base_price: if request.is_free { None } else { request.base_price },
            currency: request.currency.unwrap_or_else(|| "USD".to_string()),
            tags: request.tags,
            featured: false,
            status: request.status.unwrap_or(EventStatus::Draft),
            view_count: 0,
            click_count: 0,
            organization_id,
            created_by: Some(created_by.to_string()),
            created_at: now,
            updated_at: now,
        };

        self.events.insert(&event, &request.category_ids).await
    }

    /// Update an event owned by the actor (admins may update any).
    #[tracing::instrument(skip(self, changes), fields(event_id = %id, actor = %actor_id))]
    pub async fn update(
        &self,
        id: &str,
        actor_id: &str,
        actor_role: UserRole,
        changes: UpdateEventRequest,
    ) -> Result<Event, AppError> {
        let existing = self
            .events
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::EventNotFound(format!("Event not found: {}", id)))?;
        check_event_ownership(&existing, actor_id, actor_role)?;

        let start = changes.start_time.unwrap_or(existing.start_time);
        let end = changes.end_time.unwrap_or(existing.end_time);
        if changes.start_time.is_some() || changes.end_time.is_some() {
            validation::validate_event_times(start, end, Utc::now())?;
        }
        if let Some(tz) = &changes.timezone {
            validation::parse_timezone(tz)?;
        }
        if changes.is_free.is_some() || changes.base_price.is_some() {
            let is_free = changes.is_free.unwrap_or(existing.is_free);
            let base_price = changes.base_price.or(existing.base_price);
            validate_pricing(is_free, base_price)?;
        }

        self.events
            .update(id, &changes)
            .await?
            .ok_or_else(|| AppError::EventNotFound(format!("Event not found: {}", id)))
    }

    #[tracing::instrument(skip(self), fields(event_id = %id, actor = %actor_id))]
    pub async fn delete(
        &self,
        id: &str,
        actor_id: &str,
        actor_role: UserRole,
    ) -> Result<(), AppError> {
        let existing = self
            .events
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::EventNotFound(format!("Event not found: {}", id)))?;
        check_event_ownership(&existing, actor_id, actor_role)?;
        self.events.delete(id).await?;
        Ok(())
    }

    /// Fetch by id, counting the view.
    pub async fn get(&self, id: &str) -> Result<Event, AppError> {
        self.events
            .get_and_increment_views(id)
            .await?
            .ok_or_else(|| AppError::EventNotFound(format!("Event not found: {}", id)))
    }

    /// Fetch by slug, counting the view.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Event, AppError> {
        self.events
            .get_by_slug_and_increment_views(slug)
            .await?
            .ok_or_else(|| AppError::EventNotFound(format!("Event not found: {}", slug)))
    }

    /// Upcoming published events, with start/end optionally rendered in the
    /// caller's timezone.
    #[tracing::instrument(skip(self))]
    pub async fn upcoming(
        &self,
        page: PageParams,
        timezone: Option<&str>,
    ) -> Result<(Vec<LocalizedEvent>, Pagination), AppError> {
        let tz = timezone.map(validation::parse_timezone).transpose()?;
        let (events, total) = self.events.list_upcoming(page.limit, page.offset()).await?;
        let items = events.into_iter().map(|e| localize(e, tz)).collect();
        Ok((items, Pagination::new(total, page)))
    }

    pub async fn featured(&self, limit: i64) -> Result<Vec<Event>, AppError> {
        self.events.list_featured(limit).await
    }

    pub async fn trending(&self, limit: i64) -> Result<Vec<Event>, AppError> {
        self.events.list_trending(limit).await
    }

    /// Filtered search with distance annotation and post-fetch distance
    /// sorting. A page past the end is an empty list, not an error.
    #[tracing::instrument(skip(self, filters))]
    pub async fn search(
        &self,
        filters: EventSearchFilters,
    ) -> Result<(Vec<EventWithDistance>, Pagination), AppError> {
        let (events, total) = self.events.search(&filters).await?;
        let mut items = annotate_distances(events, filters.near.as_ref());
        if filters.sort == EventSort::Distance {
            sort_by_distance(&mut items);
        }
        Ok((items, Pagination::new(total, filters.page)))
    }
}

fn check_event_ownership(event: &Event, actor_id: &str, actor_role: UserRole) -> Result<(), AppError> {
    if actor_role == UserRole::Admin {
        return Ok(());
    }
    if event.created_by.as_deref() == Some(actor_id) {
        return Ok(());
    }
    Err(AppError::Forbidden(
        "You do not have access to this event".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use gather_core::models::EventType;

    fn event_at(id: &str, lat: Option<f64>, lon: Option<f64>) -> Event {
        let now = Utc::now();
        Event {
            id: id.to_string(),
            slug: format!("{}-slug", id),
            title: id.to_string(),
            description: "d".to_string(),
            short_description: None,
            event_type: EventType::Meetup,
            venue: None,
            address: None,
            city: None,
            country: None,
            latitude: lat,
            longitude: lon,
            start_time: now + Duration::days(1),
            end_time: now + Duration::days(2),
            timezone: "UTC".to_string(),
            max_capacity: None,
            is_free: true,
            base_price: None,
            currency: "USD".to_string(),
            tags: vec![],
            featured: false,
            status: EventStatus::Published,
            view_count: 0,
            click_count: 0,
            organization_id: None,
            created_by: Some("user_owner1".to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_pricing_rules() {
        assert!(validate_pricing(true, None).is_ok());
        assert!(validate_pricing(true, Some(Decimal::ZERO)).is_ok());
        assert!(validate_pricing(true, Some(Decimal::new(500, 2))).is_err());
        assert!(validate_pricing(false, None).is_err());
        assert!(validate_pricing(false, Some(Decimal::ZERO)).is_err());
        assert!(validate_pricing(false, Some(Decimal::new(2500, 2))).is_ok());
    }

    #[test]
    fn test_annotate_distances_requires_coordinates() {
        let near = GeoFilter {
            latitude: 30.2672,
            longitude: -97.7431,
            radius_km: 50.0,
        };
        let events = vec![
            event_at("event_a11111", Some(30.5), Some(-97.8)),
            event_at("event_b22222", None, None),
        ];
        let items = annotate_distances(events, Some(&near));
        assert!(items[0].distance.is_some());
        assert!(items[1].distance.is_none());

        let events = vec![event_at("event_c33333", Some(30.5), Some(-97.8))];
        let items = annotate_distances(events, None);
        assert!(items[0].distance.is_none());
    }

    #[test]
    fn test_sort_by_distance_nulls_last() {
        let near = GeoFilter {
            latitude: 0.0,
            longitude: 0.0,
            radius_km: 500.0,
        };
        let events = vec![
            event_at("event_far111", Some(3.0), Some(0.0)),
            event_at("event_none11", None, None),
            event_at("event_near11", Some(0.5), Some(0.0)),
        ];
        let mut items = annotate_distances(events, Some(&near));
        sort_by_distance(&mut items);

        assert_eq!(items[0].event.id, "event_near11");
        assert_eq!(items[1].event.id, "event_far111");
        assert_eq!(items[2].event.id, "event_none11");
        // Distances are non-decreasing over the prefix that has them.
        assert!(items[0].distance.unwrap() <= items[1].distance.unwrap());
    }

    #[test]
    fn test_ownership_check() {
        let event = event_at("event_x", None, None);
        assert!(check_event_ownership(&event, "user_owner1", UserRole::Organizer).is_ok());
        assert!(check_event_ownership(&event, "user_other1", UserRole::Organizer).is_err());
        assert!(check_event_ownership(&event, "user_other1", UserRole::Admin).is_ok());
    }
}
