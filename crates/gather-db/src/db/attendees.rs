//! Attendee repository: the registration path for free, no-account events.
//!
//! Registration runs in one transaction that locks the event row before any
//! check, so two concurrent requests for the last seat serialize and the
//! loser sees the winner's insert. A unique index on
//! `(event_id, lower(email))` backstops the duplicate check at the storage
//! layer.

use sqlx::{PgPool, Postgres};

use gather_core::constants::ID_GENERATION_ATTEMPTS;
use gather_core::ident;
use gather_core::models::{Attendee, Event, EventStatus};
use gather_core::AppError;

const ATTENDEE_COLUMNS: &str = "id, event_id, name, email, created_at";

/// Pure capacity/duplicate guard, shared with the unit tests.
pub fn check_registration(
    event: &Event,
    attendee_count: i64,
    email_already_registered: bool,
) -> Result<(), AppError> {
    if event.status != EventStatus::Published {
        return Err(AppError::EventNotFound(format!(
            "Event {} is not open for registration",
            event.id
        )));
    }
    if email_already_registered {
        return Err(AppError::DuplicateRegistration(
            "This email is already registered for the event".to_string(),
        ));
    }
    if let Some(max_capacity) = event.max_capacity {
        if attendee_count >= max_capacity as i64 {
            return Err(AppError::CapacityExceeded("Event is fully booked".to_string()));
        }
    }
    Ok(())
}

#[derive(Clone)]
pub struct AttendeeRepository {
    pool: PgPool,
}

impl AttendeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register an attendee: lock the event row, validate capacity and
    /// duplicate email, insert. The candidate id is re-rolled a bounded
    /// number of times if it collides inside the same transaction.
    #[tracing::instrument(skip(self, name, email), fields(db.table = "attendees", db.operation = "insert", event_id = %event_id))]
    pub async fn register(
        &self,
        event_id: &str,
        name: &str,
        email: &str,
    ) -> Result<Attendee, AppError> {
        let email = email.trim().to_lowercase();
        let mut tx = self.pool.begin().await?;

        let event = sqlx::query_as::<Postgres, Event>(
            "SELECT id, slug, title, description, short_description, event_type, venue, address, \
             city, country, latitude, longitude, start_time, end_time, timezone, max_capacity, \
             is_free, base_price, currency, tags, featured, status, view_count, click_count, \
             organization_id, created_by, created_at, updated_at \
             FROM events WHERE id = $1 FOR UPDATE",
        )
        .bind(event_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::EventNotFound(format!("Event not found: {}", event_id)))?;

        let attendee_count = sqlx::query_scalar::<Postgres, i64>(
            "SELECT COUNT(*) FROM attendees WHERE event_id = $1",
        )
        .bind(event_id)
        .fetch_one(&mut *tx)
        .await?;

        let duplicate = sqlx::query_scalar::<Postgres, bool>(
            "SELECT EXISTS(SELECT 1 FROM attendees WHERE event_id = $1 AND lower(email) = $2)",
        )
        .bind(event_id)
        .bind(&email)
        .fetch_one(&mut *tx)
        .await?;

        check_registration(&event, attendee_count, duplicate)?;

        let mut attendee_id = ident::generate_child_id(event_id, "attendee");
        for _ in 1..ID_GENERATION_ATTEMPTS {
            let taken = sqlx::query_scalar::<Postgres, bool>(
                "SELECT EXISTS(SELECT 1 FROM attendees WHERE id = $1)",
            )
            .bind(&attendee_id)
            .fetch_one(&mut *tx)
            .await?;
            if !taken {
                break;
            }
            attendee_id = ident::generate_child_id(event_id, "attendee");
        }

        let attendee = sqlx::query_as::<Postgres, Attendee>(&format!(
            "INSERT INTO attendees (id, event_id, name, email) VALUES ($1, $2, $3, $4) \
             RETURNING {ATTENDEE_COLUMNS}"
        ))
        .bind(&attendee_id)
        .bind(event_id)
        .bind(name)
        .bind(&email)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_duplicate_email)?;

        tx.commit().await?;
        Ok(attendee)
    }

    #[tracing::instrument(skip(self), fields(db.table = "attendees", db.operation = "select", event_id = %event_id))]
    pub async fn list_for_event(
        &self,
        event_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Attendee>, i64), AppError> {
        let attendees = sqlx::query_as::<Postgres, Attendee>(&format!(
            "SELECT {ATTENDEE_COLUMNS} FROM attendees WHERE event_id = $1 \
             ORDER BY created_at ASC LIMIT $2 OFFSET $3"
        ))
        .bind(event_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total =
            sqlx::query_scalar::<Postgres, i64>("SELECT COUNT(*) FROM attendees WHERE event_id = $1")
                .bind(event_id)
                .fetch_one(&self.pool)
                .await?;

        Ok((attendees, total))
    }
}

/// The unique index on `(event_id, lower(email))` is the last line of
/// defence; map its violation to the same duplicate error the in-transaction
/// check produces.
fn map_duplicate_email(err: sqlx::Error) -> AppError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.constraint() == Some("attendees_event_email_unique") {
            return AppError::DuplicateRegistration(
                "This email is already registered for the event".to_string(),
            );
        }
    }
    AppError::Database(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use gather_core::models::EventType;

    fn event(max_capacity: Option<i32>, status: EventStatus) -> Event {
        let now = Utc::now();
        Event {
            id: "event_OLWL1E".to_string(),
            slug: "test-event-abc123".to_string(),
            title: "Test Event".to_string(),
            description: "d".to_string(),
            short_description: None,
            event_type: EventType::Meetup,
            venue: None,
            address: None,
            city: None,
            country: None,
            latitude: None,
            longitude: None,
            start_time: now + Duration::days(1),
            end_time: now + Duration::days(1) + Duration::hours(2),
            timezone: "UTC".to_string(),
            max_capacity,
            is_free: true,
            base_price: None,
            currency: "USD".to_string(),
            tags: vec![],
            featured: false,
            status,
            view_count: 0,
            click_count: 0,
            organization_id: None,
            created_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_registration_allowed_under_capacity() {
        let e = event(Some(10), EventStatus::Published);
        assert!(check_registration(&e, 9, false).is_ok());
    }

    #[test]
    fn test_registration_last_seat_then_full() {
        let e = event(Some(1), EventStatus::Published);
        assert!(check_registration(&e, 0, false).is_ok());
        let err = check_registration(&e, 1, false).unwrap_err();
        assert!(matches!(err, AppError::CapacityExceeded(_)));
    }

    #[test]
    fn test_registration_duplicate_email_rejected() {
        let e = event(Some(10), EventStatus::Published);
        let err = check_registration(&e, 3, true).unwrap_err();
        assert!(matches!(err, AppError::DuplicateRegistration(_)));
    }

    #[test]
    fn test_registration_unlimited_capacity() {
        let e = event(None, EventStatus::Published);
        assert!(check_registration(&e, 1_000_000, false).is_ok());
    }

    #[test]
    fn test_registration_requires_published_event() {
        let e = event(Some(10), EventStatus::Draft);
        assert!(check_registration(&e, 0, false).is_err());
    }
}
