//! In-app notifications.

use sqlx::{PgPool, Postgres};

use gather_core::ident;
use gather_core::models::{Notification, NotificationKind};
use gather_core::AppError;

const NOTIFICATION_COLUMNS: &str = "id, user_id, kind, title, message, link, read, created_at";

#[derive(Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self, title, message, link), fields(db.table = "notifications", db.operation = "insert", user_id = %user_id))]
    pub async fn create(
        &self,
        user_id: &str,
        kind: NotificationKind,
        title: &str,
        message: &str,
        link: Option<&str>,
    ) -> Result<Notification, AppError> {
        let notification = sqlx::query_as::<Postgres, Notification>(&format!(
            "INSERT INTO notifications (id, user_id, kind, title, message, link) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {NOTIFICATION_COLUMNS}"
        ))
        .bind(ident::generate_id("notif"))
        .bind(user_id)
        .bind(kind)
        .bind(title)
        .bind(message)
        .bind(link)
        .fetch_one(&self.pool)
        .await?;
        Ok(notification)
    }

    #[tracing::instrument(skip(self), fields(db.table = "notifications", db.operation = "select", user_id = %user_id))]
    pub async fn list_for_user(
        &self,
        user_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Notification>, i64), AppError> {
        let notifications = sqlx::query_as::<Postgres, Notification>(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE user_id = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<Postgres, i64>(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok((notifications, total))
    }
}
