use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Append-only reward ledger entry. The `users.reward_points` counter is the
/// materialised sum; both are written in the same transaction.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Reward {
    pub id: String,
    pub user_id: String,
    pub points: i32,
    pub description: String,
    pub created_at: DateTime<Utc>,
}
