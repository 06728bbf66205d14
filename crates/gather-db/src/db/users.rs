//! User accounts and the reward ledger.

use sqlx::{PgPool, Postgres};

use gather_core::constants::ID_GENERATION_ATTEMPTS;
use gather_core::ident;
use gather_core::models::{Reward, User, UserRole};
use gather_core::AppError;

const USER_COLUMNS: &str =
    "id, email, password_hash, name, role, reward_points, created_at, updated_at";

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self, password_hash), fields(db.table = "users", db.operation = "insert"))]
    pub async fn create(
        &self,
        email: &str,
        password_hash: &str,
        name: &str,
        role: UserRole,
    ) -> Result<User, AppError> {
        let email = email.trim().to_lowercase();
        let mut tx = self.pool.begin().await?;

        let mut user_id = ident::generate_id("user");
        for _ in 1..ID_GENERATION_ATTEMPTS {
            let taken =
                sqlx::query_scalar::<Postgres, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
                    .bind(&user_id)
                    .fetch_one(&mut *tx)
                    .await?;
            if !taken {
                break;
            }
            user_id = ident::generate_id("user");
        }

        let user = sqlx::query_as::<Postgres, User>(&format!(
            "INSERT INTO users (id, email, password_hash, name, role) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {USER_COLUMNS}"
        ))
        .bind(&user_id)
        .bind(&email)
        .bind(password_hash)
        .bind(name)
        .bind(role)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_duplicate_email)?;

        tx.commit().await?;
        Ok(user)
    }

    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "select"))]
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<Postgres, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email.trim().to_lowercase())
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "select", db.record_id = %id))]
    pub async fn get_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<Postgres, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    #[tracing::instrument(skip(self, password_hash), fields(db.table = "users", db.operation = "update", db.record_id = %id))]
    pub async fn update_profile(
        &self,
        id: &str,
        name: Option<&str>,
        password_hash: Option<&str>,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<Postgres, User>(&format!(
            "UPDATE users SET name = COALESCE($2, name), \
             password_hash = COALESCE($3, password_hash), updated_at = NOW() \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(name)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::UserNotFound(format!("User not found: {}", id)))?;
        Ok(user)
    }

    /// Grant reward points: bump the materialised counter and append a
    /// ledger entry in the same transaction.
    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "update", db.record_id = %user_id, points = points))]
    pub async fn grant_reward(
        &self,
        user_id: &str,
        points: i32,
        description: &str,
    ) -> Result<(), AppError> {
        if points <= 0 {
            return Ok(());
        }
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE users SET reward_points = reward_points + $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(user_id)
        .bind(points)
        .execute(&mut *tx)
        .await?;
        if updated.rows_affected() == 0 {
            return Err(AppError::UserNotFound(format!("User not found: {}", user_id)));
        }

        sqlx::query(
            "INSERT INTO rewards (id, user_id, points, description) VALUES ($1, $2, $3, $4)",
        )
        .bind(ident::generate_id("reward"))
        .bind(user_id)
        .bind(points)
        .bind(description)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(db.table = "rewards", db.operation = "select", user_id = %user_id))]
    pub async fn list_rewards(
        &self,
        user_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Reward>, i64), AppError> {
        let rewards = sqlx::query_as::<Postgres, Reward>(
            "SELECT id, user_id, points, description, created_at FROM rewards \
             WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total =
            sqlx::query_scalar::<Postgres, i64>("SELECT COUNT(*) FROM rewards WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        Ok((rewards, total))
    }
}

fn map_duplicate_email(err: sqlx::Error) -> AppError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.constraint() == Some("users_email_key") {
            return AppError::Validation("An account with this email already exists".to_string());
        }
    }
    AppError::Database(err)
}
