use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};

use crate::constants::DEFAULT_SEARCH_RADIUS_KM;
use crate::error::AppError;
use crate::pagination::PageParams;

/// Sort order for event search. All database sorts break ties; `Distance`
/// is applied in the service layer after distances are computed, with
/// coordinate-less events last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ToSchema)]
pub enum EventSort {
    /// Soonest first (default).
    #[default]
    StartTime,
    /// Newest first.
    Created,
    /// Highest view count first.
    Popular,
    PriceLowToHigh,
    PriceHighToLow,
    /// Nearest first; requires caller coordinates.
    Distance,
}

impl FromStr for EventSort {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "startTime" | "start_time" => Ok(EventSort::StartTime),
            "created" => Ok(EventSort::Created),
            "popular" => Ok(EventSort::Popular),
            "price-low" => Ok(EventSort::PriceLowToHigh),
            "price-high" => Ok(EventSort::PriceHighToLow),
            "distance" => Ok(EventSort::Distance),
            _ => Err(anyhow::anyhow!("Invalid sort: {}", s)),
        }
    }
}

/// Raw search query string parameters, named as the public API spells them.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase", default)]
pub struct EventSearchQuery {
    /// Free-text search over title, description and tags.
    pub q: Option<String>,
    pub event_type: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_free: Option<bool>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub category_id: Option<String>,
    /// Comma-separated; an event matches if it carries any of them.
    pub tags: Option<String>,
    pub featured: Option<bool>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Radius in km around (latitude, longitude); default 50.
    pub radius: Option<f64>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort_by: Option<String>,
}

/// Validated, normalized search filters handed to the repository.
#[derive(Debug, Clone, Default)]
pub struct EventSearchFilters {
    pub q: Option<String>,
    pub event_type: Option<super::EventType>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_free: Option<bool>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub category_id: Option<String>,
    pub tags: Vec<String>,
    pub featured: Option<bool>,
    /// Caller position and radius for the bounding-box pre-filter.
    pub near: Option<GeoFilter>,
    pub page: PageParams,
    pub sort: EventSort,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoFilter {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
}

impl EventSearchQuery {
    /// Parse the raw query into normalized filters, rejecting unknown sort
    /// and event-type values and half-specified coordinates.
    pub fn into_filters(self) -> Result<EventSearchFilters, AppError> {
        let event_type = self
            .event_type
            .as_deref()
            .map(|s| {
                s.parse()
                    .map_err(|_| AppError::Validation(format!("Invalid eventType: {}", s)))
            })
            .transpose()?;

        let sort = self
            .sort_by
            .as_deref()
            .map(|s| {
                s.parse()
                    .map_err(|_| AppError::Validation(format!("Invalid sortBy: {}", s)))
            })
            .transpose()?
            .unwrap_or_default();

        let near = match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => {
                if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
                    return Err(AppError::Validation(
                        "latitude/longitude out of range".to_string(),
                    ));
                }
                let radius_km = self.radius.unwrap_or(DEFAULT_SEARCH_RADIUS_KM);
                if radius_km <= 0.0 {
                    return Err(AppError::Validation("radius must be positive".to_string()));
                }
                Some(GeoFilter {
                    latitude,
                    longitude,
                    radius_km,
                })
            }
            (None, None) => None,
            _ => {
                return Err(AppError::Validation(
                    "latitude and longitude must be supplied together".to_string(),
                ))
            }
        };

        if sort == EventSort::Distance && near.is_none() {
            return Err(AppError::Validation(
                "sortBy=distance requires latitude and longitude".to_string(),
            ));
        }

        let tags = self
            .tags
            .map(|raw| {
                raw.split(',')
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(EventSearchFilters {
            q: self.q.filter(|s| !s.trim().is_empty()),
            event_type,
            city: self.city.filter(|s| !s.is_empty()),
            country: self.country.filter(|s| !s.is_empty()),
            start_date: self.start_date,
            end_date: self.end_date,
            is_free: self.is_free,
            min_price: self.min_price,
            max_price: self.max_price,
            category_id: self.category_id.filter(|s| !s.is_empty()),
            tags,
            featured: self.featured,
            near,
            page: PageParams::normalize(self.page, self.limit),
            sort,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_parsing() {
        assert_eq!("startTime".parse::<EventSort>().unwrap(), EventSort::StartTime);
        assert_eq!("price-low".parse::<EventSort>().unwrap(), EventSort::PriceLowToHigh);
        assert_eq!("distance".parse::<EventSort>().unwrap(), EventSort::Distance);
        assert!("alphabetical".parse::<EventSort>().is_err());
    }

    #[test]
    fn test_into_filters_defaults() {
        let filters = EventSearchQuery::default().into_filters().unwrap();
        assert_eq!(filters.page.page, 1);
        assert_eq!(filters.page.limit, 20);
        assert_eq!(filters.sort, EventSort::StartTime);
        assert!(filters.near.is_none());
        assert!(filters.tags.is_empty());
    }

    #[test]
    fn test_into_filters_splits_tags() {
        let query = EventSearchQuery {
            tags: Some("music, outdoor ,,tech".to_string()),
            ..Default::default()
        };
        let filters = query.into_filters().unwrap();
        assert_eq!(filters.tags, vec!["music", "outdoor", "tech"]);
    }

    #[test]
    fn test_into_filters_geo_defaults_radius() {
        let query = EventSearchQuery {
            latitude: Some(30.2672),
            longitude: Some(-97.7431),
            ..Default::default()
        };
        let near = query.into_filters().unwrap().near.unwrap();
        assert_eq!(near.radius_km, DEFAULT_SEARCH_RADIUS_KM);
    }

    #[test]
    fn test_into_filters_rejects_half_coordinates() {
        let query = EventSearchQuery {
            latitude: Some(30.0),
            ..Default::default()
        };
        assert!(matches!(
            query.into_filters().unwrap_err(),
            AppError::Validation(_)
        ));
    }

    #[test]
    fn test_into_filters_rejects_distance_sort_without_geo() {
        let query = EventSearchQuery {
            sort_by: Some("distance".to_string()),
            ..Default::default()
        };
        assert!(query.into_filters().is_err());
    }

    #[test]
    fn test_into_filters_rejects_bad_event_type() {
        let query = EventSearchQuery {
            event_type: Some("gala".to_string()),
            ..Default::default()
        };
        assert!(query.into_filters().is_err());
    }
}
