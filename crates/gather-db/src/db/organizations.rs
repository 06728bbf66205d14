//! Organizations. One per owner, enforced both here and by a unique index
//! on `owner_id`.

use sqlx::{PgPool, Postgres};

use gather_core::ident;
use gather_core::models::{Organization, SubscriptionTier};
use gather_core::AppError;

const ORGANIZATION_COLUMNS: &str =
    "id, name, slug, description, owner_id, subscription_tier, created_at, updated_at";

#[derive(Clone)]
pub struct OrganizationRepository {
    pool: PgPool,
}

impl OrganizationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self, description), fields(db.table = "organizations", db.operation = "insert", owner_id = %owner_id))]
    pub async fn create(
        &self,
        owner_id: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<Organization, AppError> {
        let mut tx = self.pool.begin().await?;

        let already_owner = sqlx::query_scalar::<Postgres, bool>(
            "SELECT EXISTS(SELECT 1 FROM organizations WHERE owner_id = $1)",
        )
        .bind(owner_id)
        .fetch_one(&mut *tx)
        .await?;
        if already_owner {
            return Err(AppError::Validation(
                "You already own an organization".to_string(),
            ));
        }

        let organization = sqlx::query_as::<Postgres, Organization>(&format!(
            "INSERT INTO organizations (id, name, slug, description, owner_id, subscription_tier) \
             VALUES ($1, $2, $3, $4, $5, 'free') RETURNING {ORGANIZATION_COLUMNS}"
        ))
        .bind(ident::generate_id("org"))
        .bind(name)
        .bind(ident::generate_slug(name))
        .bind(description)
        .bind(owner_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_owner_conflict)?;

        tx.commit().await?;
        Ok(organization)
    }

    #[tracing::instrument(skip(self), fields(db.table = "organizations", db.operation = "select", db.record_id = %id))]
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Organization>, AppError> {
        let organization = sqlx::query_as::<Postgres, Organization>(&format!(
            "SELECT {ORGANIZATION_COLUMNS} FROM organizations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(organization)
    }

    #[tracing::instrument(skip(self), fields(db.table = "organizations", db.operation = "select"))]
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Organization>, AppError> {
        let organization = sqlx::query_as::<Postgres, Organization>(&format!(
            "SELECT {ORGANIZATION_COLUMNS} FROM organizations WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;
        Ok(organization)
    }

    #[tracing::instrument(skip(self), fields(db.table = "organizations", db.operation = "select", owner_id = %owner_id))]
    pub async fn get_by_owner(&self, owner_id: &str) -> Result<Option<Organization>, AppError> {
        let organization = sqlx::query_as::<Postgres, Organization>(&format!(
            "SELECT {ORGANIZATION_COLUMNS} FROM organizations WHERE owner_id = $1"
        ))
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(organization)
    }

    #[tracing::instrument(skip(self, name, description), fields(db.table = "organizations", db.operation = "update", db.record_id = %id))]
    pub async fn update(
        &self,
        id: &str,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<Organization, AppError> {
        let organization = sqlx::query_as::<Postgres, Organization>(&format!(
            "UPDATE organizations SET name = COALESCE($2, name), \
             description = COALESCE($3, description), updated_at = NOW() \
             WHERE id = $1 RETURNING {ORGANIZATION_COLUMNS}"
        ))
        .bind(id)
        .bind(name)
        .bind(description)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::OrganizationNotFound(format!("Organization not found: {}", id)))?;
        Ok(organization)
    }

    #[tracing::instrument(skip(self), fields(db.table = "organizations", db.operation = "update", db.record_id = %id))]
    pub async fn set_subscription_tier(
        &self,
        id: &str,
        tier: SubscriptionTier,
    ) -> Result<Organization, AppError> {
        let organization = sqlx::query_as::<Postgres, Organization>(&format!(
            "UPDATE organizations SET subscription_tier = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING {ORGANIZATION_COLUMNS}"
        ))
        .bind(id)
        .bind(tier)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::OrganizationNotFound(format!("Organization not found: {}", id)))?;
        Ok(organization)
    }
}

fn map_owner_conflict(err: sqlx::Error) -> AppError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.constraint() == Some("organizations_owner_id_key") {
            return AppError::Validation("You already own an organization".to_string());
        }
    }
    AppError::Database(err)
}
