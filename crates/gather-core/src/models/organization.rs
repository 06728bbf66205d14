use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Subscription tier. Gates feature flags; does not affect core booking
/// behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "subscription_tier", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    Free,
    Starter,
    Pro,
}

impl SubscriptionTier {
    pub fn ai_features(self) -> bool {
        matches!(self, SubscriptionTier::Pro)
    }

    pub fn custom_branding(self) -> bool {
        matches!(self, SubscriptionTier::Starter | SubscriptionTier::Pro)
    }

    pub fn analytics(self) -> bool {
        matches!(self, SubscriptionTier::Starter | SubscriptionTier::Pro)
    }
}

/// Organizer's organization. At most one per owner.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub owner_id: String,
    pub subscription_tier: SubscriptionTier,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Tier-derived feature flags, embedded in organization responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrganizationFeatures {
    pub ai_features: bool,
    pub custom_branding: bool,
    pub analytics: bool,
}

impl From<SubscriptionTier> for OrganizationFeatures {
    fn from(tier: SubscriptionTier) -> Self {
        Self {
            ai_features: tier.ai_features(),
            custom_branding: tier.custom_branding(),
            analytics: tier.analytics(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrganizationResponse {
    #[serde(flatten)]
    pub organization: Organization,
    pub features: OrganizationFeatures,
}

impl From<Organization> for OrganizationResponse {
    fn from(organization: Organization) -> Self {
        let features = organization.subscription_tier.into();
        Self {
            organization,
            features,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateOrganizationRequest {
    #[validate(length(min = 2, max = 200))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateOrganizationRequest {
    #[validate(length(min = 2, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateSubscriptionRequest {
    pub tier: SubscriptionTier,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_feature_flags() {
        assert!(!SubscriptionTier::Free.ai_features());
        assert!(!SubscriptionTier::Free.analytics());
        assert!(SubscriptionTier::Starter.analytics());
        assert!(!SubscriptionTier::Starter.ai_features());
        assert!(SubscriptionTier::Pro.ai_features());
        assert!(SubscriptionTier::Pro.custom_branding());
    }

    #[test]
    fn test_features_from_tier() {
        let features = OrganizationFeatures::from(SubscriptionTier::Starter);
        assert!(features.custom_branding);
        assert!(!features.ai_features);
    }
}
