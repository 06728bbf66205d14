//! Booking state machine: `pending -> confirmed -> {cancelled, refunded}`.
//!
//! Transition guards are pure functions so the scenarios (double cancel,
//! confirm after cancel, cancel after the event started) are testable
//! without a database. Refund failure is deliberately non-fatal: the booking
//! stays `cancelled` and the payment is marked `refund_failed` for manual
//! intervention; there is no retry or backoff around the provider call.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use gather_core::constants::{FREE_BOOKING_REWARD_POINTS, REWARD_CENTS_PER_POINT};
use gather_core::ident;
use gather_core::models::{
    Booking, BookingResponse, BookingStatus, CreateBookingRequest, NotificationKind,
    PaymentStatus, UserRole,
};
use gather_core::{AppError, PageParams, Pagination};
use gather_db::{
    BookingRepository, EventRepository, NotificationRepository, PaymentRepository, UserRepository,
};

use crate::payments::PaymentProvider;

/// Points for a paid booking: one per whole currency unit paid.
pub fn reward_points_for_paid(total_amount: Decimal) -> i32 {
    let cents = (total_amount * Decimal::from(100))
        .trunc()
        .to_i64()
        .unwrap_or(0);
    if cents <= 0 {
        return 0;
    }
    (cents / REWARD_CENTS_PER_POINT as i64) as i32
}

pub fn check_confirm(status: BookingStatus) -> Result<(), AppError> {
    if !status.can_transition_to(BookingStatus::Confirmed) {
        return Err(AppError::InvalidTransition(format!(
            "Cannot confirm a {} booking",
            status
        )));
    }
    Ok(())
}

/// A booking can be cancelled while it is pending or confirmed, and only
/// before the event starts.
pub fn check_cancel(
    status: BookingStatus,
    event_start: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    if !status.can_transition_to(BookingStatus::Cancelled) {
        return Err(AppError::InvalidTransition(format!(
            "Cannot cancel a {} booking",
            status
        )));
    }
    if event_start <= now {
        return Err(AppError::InvalidTransition(
            "Cannot cancel a booking after the event has started".to_string(),
        ));
    }
    Ok(())
}

#[derive(Clone)]
pub struct BookingsService {
    bookings: BookingRepository,
    events: EventRepository,
    payments: PaymentRepository,
    users: UserRepository,
    notifications: NotificationRepository,
    provider: Arc<dyn PaymentProvider>,
}

impl BookingsService {
    pub fn new(
        bookings: BookingRepository,
        events: EventRepository,
        payments: PaymentRepository,
        users: UserRepository,
        notifications: NotificationRepository,
        provider: Arc<dyn PaymentProvider>,
    ) -> Self {
        Self {
            bookings,
            events,
            payments,
            users,
            notifications,
            provider,
        }
    }

    /// Create a booking. Free events confirm immediately and earn a fixed
    /// reward; paid events stay pending with a provider payment intent.
    #[tracing::instrument(skip(self, request), fields(user_id = %user_id, event_id = %request.event_id))]
    pub async fn create(
        &self,
        user_id: &str,
        request: CreateBookingRequest,
    ) -> Result<BookingResponse, AppError> {
        let event = self
            .events
            .get_by_id(&request.event_id)
            .await?
            .ok_or_else(|| {
                AppError::EventNotFound(format!("Event not found: {}", request.event_id))
            })?;

        let ticket_price = if event.is_free {
            Decimal::ZERO
        } else {
            event.base_price.ok_or_else(|| {
                AppError::Validation("Event has no price configured".to_string())
            })?
        };
        let total_amount = ticket_price * Decimal::from(request.ticket_quantity);
        let status = if event.is_free {
            BookingStatus::Confirmed
        } else {
            BookingStatus::Pending
        };

        let now = Utc::now();
        let candidate = Booking {
            id: ident::generate_id("booking"),
            booking_code: ident::generate_booking_code(),
            user_id: user_id.to_string(),
            event_id: event.id.clone(),
            ticket_quantity: request.ticket_quantity,
            ticket_price,
            total_amount,
            currency: event.currency.clone(),
            status,
            payment_id: None,
            cancelled_at: None,
            created_at: now,
            updated_at: now,
        };

        // The repository re-validates capacity under a row lock.
        let (booking, event) = self.bookings.create(&candidate).await?;

        if event.is_free {
            self.notify(
                user_id,
                NotificationKind::BookingConfirmed,
                "Booking confirmed",
                &format!("Your booking {} for {} is confirmed", booking.booking_code, event.title),
                &booking.id,
            )
            .await;
            self.grant_points(user_id, FREE_BOOKING_REWARD_POINTS, &booking.booking_code)
                .await;
            return Ok(BookingResponse {
                booking,
                client_secret: None,
            });
        }

        let cents = (total_amount * Decimal::from(100))
            .trunc()
            .to_i64()
            .ok_or_else(|| AppError::Internal("Booking amount overflow".to_string()))?;
        let intent = match self
            .provider
            .create_payment_intent(cents, &booking.currency, &booking.id)
            .await
        {
            Ok(intent) => intent,
            Err(err) => {
                // Release the held seats before surfacing the failure.
                if let Err(cancel_err) = self
                    .bookings
                    .set_status(&booking.id, BookingStatus::Cancelled)
                    .await
                {
                    tracing::error!(error = %cancel_err, booking_id = %booking.id,
                        "failed to cancel booking after payment intent failure");
                }
                return Err(err);
            }
        };

        let payment = self
            .payments
            .create(
                &booking.id,
                total_amount,
                &booking.currency,
                &intent.provider_payment_id,
            )
            .await?;
        self.bookings.link_payment(&booking.id, &payment.id).await?;

        let mut booking = booking;
        booking.payment_id = Some(payment.id);
        Ok(BookingResponse {
            booking,
            client_secret: Some(intent.client_secret),
        })
    }

    /// Confirm a pending booking after its payment settled.
    #[tracing::instrument(skip(self), fields(booking_id = %booking_id, actor = %actor_id))]
    pub async fn confirm(
        &self,
        booking_id: &str,
        actor_id: &str,
        actor_role: UserRole,
    ) -> Result<Booking, AppError> {
        let booking = self.get_owned(booking_id, actor_id, actor_role).await?;
        check_confirm(booking.status)?;

        let booking = self
            .bookings
            .set_status(booking_id, BookingStatus::Confirmed)
            .await?;

        if let Some(payment) = self.payments.get_for_booking(booking_id).await? {
            self.payments
                .set_status(&payment.id, PaymentStatus::Succeeded)
                .await?;
        }

        self.notify(
            &booking.user_id,
            NotificationKind::BookingConfirmed,
            "Booking confirmed",
            &format!("Your booking {} is confirmed", booking.booking_code),
            &booking.id,
        )
        .await;
        self.grant_points(
            &booking.user_id,
            reward_points_for_paid(booking.total_amount),
            &booking.booking_code,
        )
        .await;

        Ok(booking)
    }

    /// Cancel a booking, refunding its payment when one succeeded.
    #[tracing::instrument(skip(self), fields(booking_id = %booking_id, actor = %actor_id))]
    pub async fn cancel(
        &self,
        booking_id: &str,
        actor_id: &str,
        actor_role: UserRole,
    ) -> Result<Booking, AppError> {
        let booking = self.get_owned(booking_id, actor_id, actor_role).await?;

        let event_start = self
            .events
            .get_by_id(&booking.event_id)
            .await?
            .map(|e| e.start_time)
            .unwrap_or(booking.created_at);
        check_cancel(booking.status, event_start, Utc::now())?;

        let mut booking = self
            .bookings
            .set_status(booking_id, BookingStatus::Cancelled)
            .await?;

        if let Some(payment) = self.payments.get_for_booking(booking_id).await? {
            if payment.status == PaymentStatus::Succeeded {
                match self.provider.refund_payment(&payment.provider_payment_id).await {
                    Ok(()) => {
                        self.payments
                            .set_status(&payment.id, PaymentStatus::Refunded)
                            .await?;
                        booking = self
                            .bookings
                            .set_status(booking_id, BookingStatus::Refunded)
                            .await?;
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, booking_id = %booking_id,
                            payment_id = %payment.id, "refund failed, payment needs manual intervention");
                        self.payments
                            .set_status(&payment.id, PaymentStatus::RefundFailed)
                            .await?;
                    }
                }
            }
        }

        self.notify(
            &booking.user_id,
            NotificationKind::BookingCancelled,
            "Booking cancelled",
            &format!("Your booking {} has been cancelled", booking.booking_code),
            &booking.id,
        )
        .await;

        Ok(booking)
    }

    pub async fn get(
        &self,
        booking_id: &str,
        actor_id: &str,
        actor_role: UserRole,
    ) -> Result<Booking, AppError> {
        self.get_owned(booking_id, actor_id, actor_role).await
    }

    pub async fn list_for_user(
        &self,
        user_id: &str,
        page: PageParams,
    ) -> Result<(Vec<Booking>, Pagination), AppError> {
        let (bookings, total) = self
            .bookings
            .list_for_user(user_id, page.limit, page.offset())
            .await?;
        Ok((bookings, Pagination::new(total, page)))
    }

    async fn get_owned(
        &self,
        booking_id: &str,
        actor_id: &str,
        actor_role: UserRole,
    ) -> Result<Booking, AppError> {
        let booking = self
            .bookings
            .get_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::BookingNotFound(format!("Booking not found: {}", booking_id)))?;
        if booking.user_id != actor_id && actor_role != UserRole::Admin {
            return Err(AppError::Forbidden(
                "You do not have access to this booking".to_string(),
            ));
        }
        Ok(booking)
    }

    /// Notifications and rewards never fail a booking operation.
    async fn notify(
        &self,
        user_id: &str,
        kind: NotificationKind,
        title: &str,
        message: &str,
        booking_id: &str,
    ) {
        let link = format!("/bookings/{}", booking_id);
        if let Err(err) = self
            .notifications
            .create(user_id, kind, title, message, Some(&link))
            .await
        {
            tracing::warn!(error = %err, booking_id = %booking_id, "failed to create notification");
        }
    }

    async fn grant_points(&self, user_id: &str, points: i32, booking_code: &str) {
        if points <= 0 {
            return;
        }
        let description = format!("Booking {}", booking_code);
        if let Err(err) = self.users.grant_reward(user_id, points, &description).await {
            tracing::warn!(error = %err, user_id = %user_id, "failed to grant reward points");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_paid_reward_is_one_point_per_currency_unit() {
        assert_eq!(reward_points_for_paid(Decimal::new(2550, 2)), 25); // 25.50
        assert_eq!(reward_points_for_paid(Decimal::new(99, 2)), 0); // 0.99
        assert_eq!(reward_points_for_paid(Decimal::new(10000, 2)), 100); // 100.00
        assert_eq!(reward_points_for_paid(Decimal::ZERO), 0);
    }

    #[test]
    fn test_free_booking_reward_is_fixed() {
        assert_eq!(FREE_BOOKING_REWARD_POINTS, 10);
    }

    #[test]
    fn test_confirm_only_from_pending() {
        assert!(check_confirm(BookingStatus::Pending).is_ok());
        for status in [
            BookingStatus::Confirmed,
            BookingStatus::Cancelled,
            BookingStatus::Refunded,
        ] {
            let err = check_confirm(status).unwrap_err();
            assert!(matches!(err, AppError::InvalidTransition(_)));
        }
    }

    #[test]
    fn test_cancel_rejected_after_event_started() {
        let now = Utc::now();
        let err = check_cancel(BookingStatus::Confirmed, now - Duration::hours(1), now).unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition(_)));
    }

    #[test]
    fn test_cancel_allowed_before_event() {
        let now = Utc::now();
        assert!(check_cancel(BookingStatus::Pending, now + Duration::hours(1), now).is_ok());
        assert!(check_cancel(BookingStatus::Confirmed, now + Duration::hours(1), now).is_ok());
    }

    #[test]
    fn test_cancel_rejected_for_terminal_states() {
        let now = Utc::now();
        let future = now + Duration::days(1);
        assert!(check_cancel(BookingStatus::Cancelled, future, now).is_err());
        assert!(check_cancel(BookingStatus::Refunded, future, now).is_err());
    }
}
