use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;
use validator::Validate;

/// Booking lifecycle: `pending -> confirmed -> {cancelled, refunded}`.
/// Free-event bookings skip `pending` and are created `confirmed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "booking_status", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Refunded,
}

impl Display for BookingStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            BookingStatus::Pending => write!(f, "pending"),
            BookingStatus::Confirmed => write!(f, "confirmed"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
            BookingStatus::Refunded => write!(f, "refunded"),
        }
    }
}

impl BookingStatus {
    /// Valid transitions of the state machine. Everything not listed here is
    /// rejected with an invalid-transition error.
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (BookingStatus::Pending, BookingStatus::Confirmed)
                | (BookingStatus::Pending, BookingStatus::Cancelled)
                | (BookingStatus::Confirmed, BookingStatus::Cancelled)
                | (BookingStatus::Cancelled, BookingStatus::Refunded)
        )
    }

    /// Terminal states hold no seats against event capacity.
    pub fn holds_capacity(self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }
}

/// Payment state as reported by the provider. `RefundFailed` marks a booking
/// whose refund needs manual intervention; the booking itself stays
/// `cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "payment_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Succeeded,
    Refunded,
    RefundFailed,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Booking {
    pub id: String,
    /// Human-facing reference, e.g. `GTR-8F2K1QZP`.
    pub booking_code: String,
    pub user_id: String,
    pub event_id: String,
    pub ticket_quantity: i32,
    pub ticket_price: Decimal,
    pub total_amount: Decimal,
    pub currency: String,
    pub status: BookingStatus,
    pub payment_id: Option<String>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Payment {
    pub id: String,
    pub booking_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub status: PaymentStatus,
    pub provider_payment_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBookingRequest {
    pub event_id: String,
    // Range mirrors constants::{MIN,MAX}_TICKETS_PER_BOOKING.
    #[validate(range(min = 1, max = 10))]
    pub ticket_quantity: i32,
}

/// Booking creation result. `client_secret` is present for paid events only
/// and is handed to the client to complete the provider payment.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookingResponse {
    #[serde(flatten)]
    pub booking: Booking,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions_allowed() {
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Confirmed));
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Cancelled));
        assert!(BookingStatus::Confirmed.can_transition_to(BookingStatus::Cancelled));
        assert!(BookingStatus::Cancelled.can_transition_to(BookingStatus::Refunded));
    }

    #[test]
    fn test_transitions_rejected() {
        assert!(!BookingStatus::Confirmed.can_transition_to(BookingStatus::Confirmed));
        assert!(!BookingStatus::Cancelled.can_transition_to(BookingStatus::Confirmed));
        assert!(!BookingStatus::Refunded.can_transition_to(BookingStatus::Cancelled));
        assert!(!BookingStatus::Refunded.can_transition_to(BookingStatus::Pending));
    }

    #[test]
    fn test_capacity_held_by_active_states_only() {
        assert!(BookingStatus::Pending.holds_capacity());
        assert!(BookingStatus::Confirmed.holds_capacity());
        assert!(!BookingStatus::Cancelled.holds_capacity());
        assert!(!BookingStatus::Refunded.holds_capacity());
    }

    #[test]
    fn test_payment_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&PaymentStatus::RefundFailed).unwrap(),
            "\"refund_failed\""
        );
    }
}
