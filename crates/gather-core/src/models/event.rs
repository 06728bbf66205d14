use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;
use validator::Validate;

/// Event lifecycle state. Only `published` events are searchable and
/// bookable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "event_status", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Draft,
    Published,
    Cancelled,
    Completed,
}

impl Display for EventStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            EventStatus::Draft => write!(f, "draft"),
            EventStatus::Published => write!(f, "published"),
            EventStatus::Cancelled => write!(f, "cancelled"),
            EventStatus::Completed => write!(f, "completed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "event_type", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Conference,
    Workshop,
    Meetup,
    Concert,
    Festival,
    Sports,
    Virtual,
    Other,
}

impl FromStr for EventType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "conference" => Ok(EventType::Conference),
            "workshop" => Ok(EventType::Workshop),
            "meetup" => Ok(EventType::Meetup),
            "concert" => Ok(EventType::Concert),
            "festival" => Ok(EventType::Festival),
            "sports" => Ok(EventType::Sports),
            "virtual" => Ok(EventType::Virtual),
            "other" => Ok(EventType::Other),
            _ => Err(anyhow::anyhow!("Invalid event type: {}", s)),
        }
    }
}

/// Event entity.
///
/// `start_time`/`end_time` are stored in UTC; `timezone` is the IANA name of
/// the venue zone used for display conversion. Coordinates are optional
/// (virtual events have none) which is why distance sorting places
/// coordinate-less events last.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Event {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub short_description: Option<String>,
    pub event_type: EventType,
    pub venue: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub timezone: String,
    pub max_capacity: Option<i32>,
    pub is_free: bool,
    pub base_price: Option<Decimal>,
    pub currency: String,
    pub tags: Vec<String>,
    pub featured: bool,
    pub status: EventStatus,
    pub view_count: i32,
    pub click_count: i32,
    pub organization_id: Option<String>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Search/listing response item: an event annotated with the great-circle
/// distance from the caller's coordinates, when they supplied any.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EventWithDistance {
    #[serde(flatten)]
    pub event: Event,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

/// Listing item with start/end rendered in a caller-requested timezone.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LocalizedEvent {
    #[serde(flatten)]
    pub event: Event,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_end_time: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateEventRequest {
    #[validate(length(min = 3, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 10_000))]
    pub description: String,
    #[validate(length(max = 500))]
    pub short_description: Option<String>,
    pub event_type: EventType,
    pub venue: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// IANA timezone name, e.g. `America/Chicago`. Defaults to UTC.
    pub timezone: Option<String>,
    #[validate(range(min = 1))]
    pub max_capacity: Option<i32>,
    #[serde(default)]
    pub is_free: bool,
    pub base_price: Option<Decimal>,
    pub currency: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub category_ids: Vec<String>,
    pub status: Option<EventStatus>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateEventRequest {
    #[validate(length(min = 3, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 10_000))]
    pub description: Option<String>,
    #[validate(length(max = 500))]
    pub short_description: Option<String>,
    pub event_type: Option<EventType>,
    pub venue: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub timezone: Option<String>,
    #[validate(range(min = 1))]
    pub max_capacity: Option<i32>,
    pub is_free: Option<bool>,
    pub base_price: Option<Decimal>,
    pub currency: Option<String>,
    pub tags: Option<Vec<String>>,
    pub featured: Option<bool>,
    pub status: Option<EventStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_from_str() {
        assert_eq!("Workshop".parse::<EventType>().unwrap(), EventType::Workshop);
        assert_eq!("virtual".parse::<EventType>().unwrap(), EventType::Virtual);
        assert!("keynote".parse::<EventType>().is_err());
    }

    #[test]
    fn test_event_status_display() {
        assert_eq!(EventStatus::Published.to_string(), "published");
        assert_eq!(EventStatus::Draft.to_string(), "draft");
    }

    #[test]
    fn test_event_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&EventStatus::Cancelled).unwrap(),
            "\"cancelled\""
        );
    }
}
