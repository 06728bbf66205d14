//! Payment records mirroring the provider's state.

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres};

use gather_core::ident;
use gather_core::models::{Payment, PaymentStatus};
use gather_core::AppError;

const PAYMENT_COLUMNS: &str =
    "id, booking_id, amount, currency, status, provider_payment_id, created_at, updated_at";

#[derive(Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self), fields(db.table = "payments", db.operation = "insert", booking_id = %booking_id))]
    pub async fn create(
        &self,
        booking_id: &str,
        amount: Decimal,
        currency: &str,
        provider_payment_id: &str,
    ) -> Result<Payment, AppError> {
        let payment = sqlx::query_as::<Postgres, Payment>(&format!(
            "INSERT INTO payments (id, booking_id, amount, currency, status, provider_payment_id) \
             VALUES ($1, $2, $3, $4, 'pending', $5) RETURNING {PAYMENT_COLUMNS}"
        ))
        .bind(ident::generate_id("payment"))
        .bind(booking_id)
        .bind(amount)
        .bind(currency)
        .bind(provider_payment_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(payment)
    }

    #[tracing::instrument(skip(self), fields(db.table = "payments", db.operation = "select", booking_id = %booking_id))]
    pub async fn get_for_booking(&self, booking_id: &str) -> Result<Option<Payment>, AppError> {
        let payment = sqlx::query_as::<Postgres, Payment>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE booking_id = $1 \
             ORDER BY created_at DESC LIMIT 1"
        ))
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(payment)
    }

    #[tracing::instrument(skip(self), fields(db.table = "payments", db.operation = "update", db.record_id = %id))]
    pub async fn set_status(&self, id: &str, status: PaymentStatus) -> Result<Payment, AppError> {
        let payment = sqlx::query_as::<Postgres, Payment>(&format!(
            "UPDATE payments SET status = $2, updated_at = NOW() WHERE id = $1 \
             RETURNING {PAYMENT_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::Internal(format!("Payment not found: {}", id)))?;
        Ok(payment)
    }
}
