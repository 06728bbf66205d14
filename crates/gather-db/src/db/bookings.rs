//! Booking repository.
//!
//! Creation shares the lock-then-validate shape of attendee registration:
//! the event row is locked, active ticket quantities are summed, and the
//! capacity guard runs before the insert. Pending bookings count against
//! capacity so a paid booking cannot be overtaken while its payment settles.

use chrono::Utc;
use sqlx::{PgPool, Postgres};

use gather_core::constants::{
    ID_GENERATION_ATTEMPTS, MAX_TICKETS_PER_BOOKING, MIN_TICKETS_PER_BOOKING,
};
use gather_core::ident;
use gather_core::models::{Booking, BookingStatus, Event, EventStatus};
use gather_core::AppError;

const BOOKING_COLUMNS: &str = "id, booking_code, user_id, event_id, ticket_quantity, \
     ticket_price, total_amount, currency, status, payment_id, cancelled_at, created_at, \
     updated_at";

/// Pure booking guard, shared with the unit tests. `booked_quantity` is the
/// sum of ticket quantities over pending and confirmed bookings.
pub fn check_booking(
    event: &Event,
    booked_quantity: i64,
    requested_quantity: i32,
) -> Result<(), AppError> {
    if event.status != EventStatus::Published {
        return Err(AppError::EventNotFound(format!(
            "Event {} is not open for booking",
            event.id
        )));
    }
    if !(MIN_TICKETS_PER_BOOKING..=MAX_TICKETS_PER_BOOKING).contains(&requested_quantity) {
        return Err(AppError::Validation(format!(
            "Ticket quantity must be between {} and {}",
            MIN_TICKETS_PER_BOOKING, MAX_TICKETS_PER_BOOKING
        )));
    }
    if let Some(max_capacity) = event.max_capacity {
        if booked_quantity + requested_quantity as i64 > max_capacity as i64 {
            return Err(AppError::CapacityExceeded("Event is fully booked".to_string()));
        }
    }
    Ok(())
}

#[derive(Clone)]
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a booking inside the capacity transaction. The caller decides
    /// the initial status (`confirmed` for free events, `pending` for paid)
    /// and has already priced the booking. Returns the locked event too so
    /// the service can price notifications without a second fetch.
    #[tracing::instrument(skip(self, booking), fields(db.table = "bookings", db.operation = "insert", event_id = %booking.event_id))]
    pub async fn create(&self, booking: &Booking) -> Result<(Booking, Event), AppError> {
        let mut tx = self.pool.begin().await?;

        let event = sqlx::query_as::<Postgres, Event>(
            "SELECT id, slug, title, description, short_description, event_type, venue, address, \
             city, country, latitude, longitude, start_time, end_time, timezone, max_capacity, \
             is_free, base_price, currency, tags, featured, status, view_count, click_count, \
             organization_id, created_by, created_at, updated_at \
             FROM events WHERE id = $1 FOR UPDATE",
        )
        .bind(&booking.event_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            AppError::EventNotFound(format!("Event not found: {}", booking.event_id))
        })?;

        let booked_quantity = sqlx::query_scalar::<Postgres, Option<i64>>(
            "SELECT SUM(ticket_quantity)::bigint FROM bookings \
             WHERE event_id = $1 AND status IN ('pending', 'confirmed')",
        )
        .bind(&booking.event_id)
        .fetch_one(&mut *tx)
        .await?
        .unwrap_or(0);

        check_booking(&event, booked_quantity, booking.ticket_quantity)?;

        let mut booking_id = booking.id.clone();
        for _ in 1..ID_GENERATION_ATTEMPTS {
            let taken = sqlx::query_scalar::<Postgres, bool>(
                "SELECT EXISTS(SELECT 1 FROM bookings WHERE id = $1)",
            )
            .bind(&booking_id)
            .fetch_one(&mut *tx)
            .await?;
            if !taken {
                break;
            }
            booking_id = ident::generate_id("booking");
        }

        let inserted = sqlx::query_as::<Postgres, Booking>(&format!(
            r#"
            INSERT INTO bookings (
                id, booking_code, user_id, event_id, ticket_quantity, ticket_price,
                total_amount, currency, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(&booking_id)
        .bind(&booking.booking_code)
        .bind(&booking.user_id)
        .bind(&booking.event_id)
        .bind(booking.ticket_quantity)
        .bind(booking.ticket_price)
        .bind(booking.total_amount)
        .bind(&booking.currency)
        .bind(booking.status)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok((inserted, event))
    }

    #[tracing::instrument(skip(self), fields(db.table = "bookings", db.operation = "select", db.record_id = %id))]
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        let booking = sqlx::query_as::<Postgres, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(booking)
    }

    #[tracing::instrument(skip(self), fields(db.table = "bookings", db.operation = "select", user_id = %user_id))]
    pub async fn list_for_user(
        &self,
        user_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Booking>, i64), AppError> {
        let bookings = sqlx::query_as::<Postgres, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE user_id = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total =
            sqlx::query_scalar::<Postgres, i64>("SELECT COUNT(*) FROM bookings WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        Ok((bookings, total))
    }

    /// Move a booking to a new status. `cancelled_at` is stamped when the
    /// status becomes `cancelled`. The transition itself has already been
    /// validated by the service state machine.
    #[tracing::instrument(skip(self), fields(db.table = "bookings", db.operation = "update", db.record_id = %id))]
    pub async fn set_status(
        &self,
        id: &str,
        status: BookingStatus,
    ) -> Result<Booking, AppError> {
        let cancelled_at = match status {
            BookingStatus::Cancelled => Some(Utc::now()),
            _ => None,
        };
        let booking = sqlx::query_as::<Postgres, Booking>(&format!(
            "UPDATE bookings SET status = $2, cancelled_at = COALESCE($3, cancelled_at), \
             updated_at = NOW() WHERE id = $1 RETURNING {BOOKING_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .bind(cancelled_at)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::BookingNotFound(format!("Booking not found: {}", id)))?;
        Ok(booking)
    }

    #[tracing::instrument(skip(self), fields(db.table = "bookings", db.operation = "update", db.record_id = %id))]
    pub async fn link_payment(&self, id: &str, payment_id: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE bookings SET payment_id = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(payment_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use gather_core::models::EventType;
    use rust_decimal::Decimal;

    fn event(max_capacity: Option<i32>) -> Event {
        let now = Utc::now();
        Event {
            id: "event_OLWL1E".to_string(),
            slug: "show-abc123".to_string(),
            title: "Show".to_string(),
            description: "d".to_string(),
            short_description: None,
            event_type: EventType::Concert,
            venue: None,
            address: None,
            city: None,
            country: None,
            latitude: None,
            longitude: None,
            start_time: now + Duration::days(7),
            end_time: now + Duration::days(7) + Duration::hours(3),
            timezone: "UTC".to_string(),
            max_capacity,
            is_free: false,
            base_price: Some(Decimal::new(2500, 2)),
            currency: "USD".to_string(),
            tags: vec![],
            featured: false,
            status: EventStatus::Published,
            view_count: 0,
            click_count: 0,
            organization_id: None,
            created_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_booking_quantity_sums_against_capacity() {
        let e = event(Some(100));
        assert!(check_booking(&e, 95, 5).is_ok());
        assert!(matches!(
            check_booking(&e, 95, 6).unwrap_err(),
            AppError::CapacityExceeded(_)
        ));
    }

    #[test]
    fn test_booking_pending_holds_seats() {
        // 98 held by pending+confirmed; a request for 3 must lose even
        // though only confirmed bookings might total less.
        let e = event(Some(100));
        assert!(check_booking(&e, 98, 3).is_err());
        assert!(check_booking(&e, 98, 2).is_ok());
    }

    #[test]
    fn test_booking_quantity_bounds() {
        let e = event(None);
        assert!(check_booking(&e, 0, 0).is_err());
        assert!(check_booking(&e, 0, 11).is_err());
        assert!(check_booking(&e, 0, 1).is_ok());
        assert!(check_booking(&e, 0, 10).is_ok());
    }

    #[test]
    fn test_booking_requires_published_event() {
        let mut e = event(Some(10));
        e.status = EventStatus::Cancelled;
        assert!(check_booking(&e, 0, 1).is_err());
    }
}
