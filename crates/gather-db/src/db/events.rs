//! Event repository, including the dynamic search query assembly.
//!
//! Search SQL is built in two passes: condition strings with numbered
//! placeholders are collected first, then the binds are applied in the same
//! order. The count query shares the WHERE clause with the page query so the
//! two can never drift apart. Assembly is a pure function
//! ([`build_search_where`]) so the generated SQL is unit-testable.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres};

use gather_core::models::{
    Event, EventSearchFilters, EventSort, EventType, UpdateEventRequest,
};
use gather_core::{geo, AppError};

const EVENT_COLUMNS: &str = "id, slug, title, description, short_description, event_type, \
     venue, address, city, country, latitude, longitude, start_time, end_time, timezone, \
     max_capacity, is_free, base_price, currency, tags, featured, status, view_count, \
     click_count, organization_id, created_by, created_at, updated_at";

/// A deferred bind value for dynamically assembled SQL.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlBind {
    Text(String),
    Bool(bool),
    Float(f64),
    Int(i32),
    Timestamp(DateTime<Utc>),
    Price(Decimal),
    EventType(EventType),
    TextArray(Vec<String>),
}

type PgQueryAs<'q, O> = sqlx::query::QueryAs<'q, Postgres, O, sqlx::postgres::PgArguments>;
type PgQueryScalar<'q, O> = sqlx::query::QueryScalar<'q, Postgres, O, sqlx::postgres::PgArguments>;

fn apply_binds_as<'q, O>(mut query: PgQueryAs<'q, O>, binds: &[SqlBind]) -> PgQueryAs<'q, O> {
    for bind in binds {
        query = match bind {
            SqlBind::Text(v) => query.bind(v.clone()),
            SqlBind::Bool(v) => query.bind(*v),
            SqlBind::Float(v) => query.bind(*v),
            SqlBind::Int(v) => query.bind(*v),
            SqlBind::Timestamp(v) => query.bind(*v),
            SqlBind::Price(v) => query.bind(*v),
            SqlBind::EventType(v) => query.bind(*v),
            SqlBind::TextArray(v) => query.bind(v.clone()),
        };
    }
    query
}

fn apply_binds_scalar<'q, O>(
    mut query: PgQueryScalar<'q, O>,
    binds: &[SqlBind],
) -> PgQueryScalar<'q, O> {
    for bind in binds {
        query = match bind {
            SqlBind::Text(v) => query.bind(v.clone()),
            SqlBind::Bool(v) => query.bind(*v),
            SqlBind::Float(v) => query.bind(*v),
            SqlBind::Int(v) => query.bind(*v),
            SqlBind::Timestamp(v) => query.bind(*v),
            SqlBind::Price(v) => query.bind(*v),
            SqlBind::EventType(v) => query.bind(*v),
            SqlBind::TextArray(v) => query.bind(v.clone()),
        };
    }
    query
}

/// Build the WHERE clause and its binds for an event search. Placeholders are
/// numbered sequentially from `$1`; exactly one bind is pushed per
/// placeholder, so `binds.len() + 1` is the next free placeholder index.
pub fn build_search_where(filters: &EventSearchFilters) -> (String, Vec<SqlBind>) {
    let mut where_parts: Vec<String> = vec!["e.status = 'published'".to_string()];
    let mut binds: Vec<SqlBind> = Vec::new();

    if let Some(q) = &filters.q {
        let pattern = format!("%{}%", q);
        where_parts.push(format!(
            "(e.title ILIKE ${0} OR e.description ILIKE ${1} OR \
             EXISTS (SELECT 1 FROM unnest(e.tags) tag WHERE tag ILIKE ${2}))",
            binds.len() + 1,
            binds.len() + 2,
            binds.len() + 3,
        ));
        binds.push(SqlBind::Text(pattern.clone()));
        binds.push(SqlBind::Text(pattern.clone()));
        binds.push(SqlBind::Text(pattern));
    }

    if let Some(event_type) = filters.event_type {
        where_parts.push(format!("e.event_type = ${}", binds.len() + 1));
        binds.push(SqlBind::EventType(event_type));
    }

    if let Some(city) = &filters.city {
        where_parts.push(format!("e.city ILIKE ${}", binds.len() + 1));
        binds.push(SqlBind::Text(format!("%{}%", city)));
    }

    if let Some(country) = &filters.country {
        where_parts.push(format!("e.country ILIKE ${}", binds.len() + 1));
        binds.push(SqlBind::Text(format!("%{}%", country)));
    }

    if let Some(start_date) = filters.start_date {
        where_parts.push(format!("e.start_time >= ${}", binds.len() + 1));
        binds.push(SqlBind::Timestamp(start_date));
    }

    if let Some(end_date) = filters.end_date {
        where_parts.push(format!("e.end_time <= ${}", binds.len() + 1));
        binds.push(SqlBind::Timestamp(end_date));
    }

    if let Some(is_free) = filters.is_free {
        where_parts.push(format!("e.is_free = ${}", binds.len() + 1));
        binds.push(SqlBind::Bool(is_free));
    }

    if let Some(min_price) = filters.min_price {
        where_parts.push(format!("e.base_price >= ${}", binds.len() + 1));
        binds.push(SqlBind::Price(min_price));
    }

    if let Some(max_price) = filters.max_price {
        where_parts.push(format!("e.base_price <= ${}", binds.len() + 1));
        binds.push(SqlBind::Price(max_price));
    }

    if let Some(category_id) = &filters.category_id {
        where_parts.push(format!(
            "EXISTS (SELECT 1 FROM event_categories ec \
             WHERE ec.event_id = e.id AND ec.category_id = ${})",
            binds.len() + 1
        ));
        binds.push(SqlBind::Text(category_id.clone()));
    }

    if !filters.tags.is_empty() {
        // Array overlap: the event matches if it carries any requested tag.
        where_parts.push(format!("e.tags && ${}", binds.len() + 1));
        binds.push(SqlBind::TextArray(filters.tags.clone()));
    }

    if let Some(featured) = filters.featured {
        where_parts.push(format!("e.featured = ${}", binds.len() + 1));
        binds.push(SqlBind::Bool(featured));
    }

    if let Some(near) = &filters.near {
        // Bounding-box pre-filter; exact distances are computed by the
        // service layer after the fetch. NULL coordinates fail BETWEEN and
        // are excluded, which is correct for a geo-constrained search.
        let bb = geo::bounding_box(near.latitude, near.longitude, near.radius_km);
        where_parts.push(format!(
            "e.latitude BETWEEN ${} AND ${} AND e.longitude BETWEEN ${} AND ${}",
            binds.len() + 1,
            binds.len() + 2,
            binds.len() + 3,
            binds.len() + 4,
        ));
        binds.push(SqlBind::Float(bb.min_lat));
        binds.push(SqlBind::Float(bb.max_lat));
        binds.push(SqlBind::Float(bb.min_lon));
        binds.push(SqlBind::Float(bb.max_lon));
    }

    (where_parts.join(" AND "), binds)
}

/// Database ORDER BY for a sort mode. `Distance` falls back to the default
/// order; the actual distance sort happens in the service layer once
/// distances have been computed.
pub fn order_by_clause(sort: EventSort) -> &'static str {
    match sort {
        EventSort::StartTime | EventSort::Distance => "e.start_time ASC",
        EventSort::Created => "e.created_at DESC",
        EventSort::Popular => "e.view_count DESC, e.click_count DESC",
        EventSort::PriceLowToHigh => "e.base_price ASC NULLS LAST",
        EventSort::PriceHighToLow => "e.base_price DESC NULLS LAST",
    }
}

/// Repository for events
#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a fully built event and link its categories in one transaction.
    #[tracing::instrument(skip(self, event), fields(db.table = "events", db.operation = "insert", db.record_id = %event.id))]
    pub async fn insert(&self, event: &Event, category_ids: &[String]) -> Result<Event, AppError> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query_as::<Postgres, Event>(&format!(
            r#"
            INSERT INTO events (
                id, slug, title, description, short_description, event_type, venue, address,
                city, country, latitude, longitude, start_time, end_time, timezone,
                max_capacity, is_free, base_price, currency, tags, featured, status,
                view_count, click_count, organization_id, created_by, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                    $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(&event.id)
        .bind(&event.slug)
        .bind(&event.title)
        .bind(&event.description)
        .bind(&event.short_description)
        .bind(event.event_type)
        .bind(&event.venue)
        .bind(&event.address)
        .bind(&event.city)
        .bind(&event.country)
        .bind(event.latitude)
        .bind(event.longitude)
        .bind(event.start_time)
        .bind(event.end_time)
        .bind(&event.timezone)
        .bind(event.max_capacity)
        .bind(event.is_free)
        .bind(event.base_price)
        .bind(&event.currency)
        .bind(&event.tags)
        .bind(event.featured)
        .bind(event.status)
        .bind(event.view_count)
        .bind(event.click_count)
        .bind(&event.organization_id)
        .bind(&event.created_by)
        .bind(event.created_at)
        .bind(event.updated_at)
        .fetch_one(&mut *tx)
        .await?;

        for category_id in category_ids {
            sqlx::query(
                "INSERT INTO event_categories (event_id, category_id) VALUES ($1, $2) \
                 ON CONFLICT DO NOTHING",
            )
            .bind(&inserted.id)
            .bind(category_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(inserted)
    }

    /// Check whether an id or slug is already taken (used by the id re-roll).
    #[tracing::instrument(skip(self), fields(db.table = "events", db.operation = "select"))]
    pub async fn id_or_slug_exists(&self, id: &str, slug: &str) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<Postgres, bool>(
            "SELECT EXISTS(SELECT 1 FROM events WHERE id = $1 OR slug = $2)",
        )
        .bind(id)
        .bind(slug)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    #[tracing::instrument(skip(self), fields(db.table = "events", db.operation = "select", db.record_id = %id))]
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Event>, AppError> {
        let event = sqlx::query_as::<Postgres, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(event)
    }

    #[tracing::instrument(skip(self), fields(db.table = "events", db.operation = "select"))]
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Event>, AppError> {
        let event = sqlx::query_as::<Postgres, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;
        Ok(event)
    }

    /// Fetch by id and bump the view counter in one statement.
    #[tracing::instrument(skip(self), fields(db.table = "events", db.operation = "update", db.record_id = %id))]
    pub async fn get_and_increment_views(&self, id: &str) -> Result<Option<Event>, AppError> {
        let event = sqlx::query_as::<Postgres, Event>(&format!(
            "UPDATE events SET view_count = view_count + 1 WHERE id = $1 RETURNING {EVENT_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(event)
    }

    /// Fetch by slug and bump the view counter in one statement.
    #[tracing::instrument(skip(self), fields(db.table = "events", db.operation = "update"))]
    pub async fn get_by_slug_and_increment_views(
        &self,
        slug: &str,
    ) -> Result<Option<Event>, AppError> {
        let event = sqlx::query_as::<Postgres, Event>(&format!(
            "UPDATE events SET view_count = view_count + 1 WHERE slug = $1 RETURNING {EVENT_COLUMNS}"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;
        Ok(event)
    }

    /// Partial update in the two-pass style: SET fragments first, binds in
    /// the same order after. Returns None when the event does not exist.
    #[tracing::instrument(skip(self, changes), fields(db.table = "events", db.operation = "update", db.record_id = %id))]
    pub async fn update(
        &self,
        id: &str,
        changes: &UpdateEventRequest,
    ) -> Result<Option<Event>, AppError> {
        let mut set_parts: Vec<String> = Vec::new();
        let mut binds: Vec<SqlBind> = Vec::new();

        let mut push = |set_parts: &mut Vec<String>, binds: &mut Vec<SqlBind>, column: &str, bind: SqlBind| {
            set_parts.push(format!("{} = ${}", column, binds.len() + 1));
            binds.push(bind);
        };

        if let Some(title) = &changes.title {
            push(&mut set_parts, &mut binds, "title", SqlBind::Text(title.clone()));
        }
        if let Some(description) = &changes.description {
            push(&mut set_parts, &mut binds, "description", SqlBind::Text(description.clone()));
        }
        if let Some(short_description) = &changes.short_description {
            push(
                &mut set_parts,
                &mut binds,
                "short_description",
                SqlBind::Text(short_description.clone()),
            );
        }
        if let Some(event_type) = changes.event_type {
            push(&mut set_parts, &mut binds, "event_type", SqlBind::EventType(event_type));
        }
        if let Some(venue) = &changes.venue {
            push(&mut set_parts, &mut binds, "venue", SqlBind::Text(venue.clone()));
        }
        if let Some(address) = &changes.address {
            push(&mut set_parts, &mut binds, "address", SqlBind::Text(address.clone()));
        }
        if let Some(city) = &changes.city {
            push(&mut set_parts, &mut binds, "city", SqlBind::Text(city.clone()));
        }
        if let Some(country) = &changes.country {
            push(&mut set_parts, &mut binds, "country", SqlBind::Text(country.clone()));
        }
        if let Some(latitude) = changes.latitude {
            push(&mut set_parts, &mut binds, "latitude", SqlBind::Float(latitude));
        }
        if let Some(longitude) = changes.longitude {
            push(&mut set_parts, &mut binds, "longitude", SqlBind::Float(longitude));
        }
        if let Some(start_time) = changes.start_time {
            push(&mut set_parts, &mut binds, "start_time", SqlBind::Timestamp(start_time));
        }
        if let Some(end_time) = changes.end_time {
            push(&mut set_parts, &mut binds, "end_time", SqlBind::Timestamp(end_time));
        }
        if let Some(timezone) = &changes.timezone {
            push(&mut set_parts, &mut binds, "timezone", SqlBind::Text(timezone.clone()));
        }
        if let Some(max_capacity) = changes.max_capacity {
            push(&mut set_parts, &mut binds, "max_capacity", SqlBind::Int(max_capacity));
        }
        if let Some(is_free) = changes.is_free {
            push(&mut set_parts, &mut binds, "is_free", SqlBind::Bool(is_free));
        }
        if let Some(base_price) = changes.base_price {
            push(&mut set_parts, &mut binds, "base_price", SqlBind::Price(base_price));
        }
        if let Some(currency) = &changes.currency {
            push(&mut set_parts, &mut binds, "currency", SqlBind::Text(currency.clone()));
        }
        if let Some(tags) = &changes.tags {
            push(&mut set_parts, &mut binds, "tags", SqlBind::TextArray(tags.clone()));
        }
        if let Some(featured) = changes.featured {
            push(&mut set_parts, &mut binds, "featured", SqlBind::Bool(featured));
        }
        if let Some(status) = changes.status {
            set_parts.push(format!("status = ${}::event_status", binds.len() + 1));
            binds.push(SqlBind::Text(status.to_string()));
        }

        if set_parts.is_empty() {
            return self.get_by_id(id).await;
        }
        set_parts.push("updated_at = NOW()".to_string());

        let sql = format!(
            "UPDATE events SET {} WHERE id = ${} RETURNING {EVENT_COLUMNS}",
            set_parts.join(", "),
            binds.len() + 1,
        );

        let query = apply_binds_as(sqlx::query_as::<Postgres, Event>(&sql), &binds).bind(id);
        let event = query.fetch_optional(&self.pool).await?;
        Ok(event)
    }

    #[tracing::instrument(skip(self), fields(db.table = "events", db.operation = "delete", db.record_id = %id))]
    pub async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Published events that have not started yet, soonest first.
    #[tracing::instrument(skip(self), fields(db.table = "events", db.operation = "select"))]
    pub async fn list_upcoming(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Event>, i64), AppError> {
        let events = sqlx::query_as::<Postgres, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events \
             WHERE status = 'published' AND start_time > NOW() \
             ORDER BY start_time ASC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<Postgres, i64>(
            "SELECT COUNT(*) FROM events WHERE status = 'published' AND start_time > NOW()",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok((events, total))
    }

    #[tracing::instrument(skip(self), fields(db.table = "events", db.operation = "select"))]
    pub async fn list_featured(&self, limit: i64) -> Result<Vec<Event>, AppError> {
        let events = sqlx::query_as::<Postgres, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events \
             WHERE status = 'published' AND featured = TRUE AND start_time > NOW() \
             ORDER BY start_time ASC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(events)
    }

    /// Most-viewed upcoming events.
    #[tracing::instrument(skip(self), fields(db.table = "events", db.operation = "select"))]
    pub async fn list_trending(&self, limit: i64) -> Result<Vec<Event>, AppError> {
        let events = sqlx::query_as::<Postgres, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events \
             WHERE status = 'published' AND start_time > NOW() \
             ORDER BY view_count DESC, click_count DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(events)
    }

    /// Filtered search: one page of matches plus the total count over the
    /// same WHERE clause.
    #[tracing::instrument(skip(self, filters), fields(db.table = "events", db.operation = "search"))]
    pub async fn search(&self, filters: &EventSearchFilters) -> Result<(Vec<Event>, i64), AppError> {
        let (where_clause, binds) = build_search_where(filters);
        let order_by = order_by_clause(filters.sort);

        let select_sql = format!(
            "SELECT {EVENT_COLUMNS} FROM events e WHERE {} ORDER BY {} LIMIT ${} OFFSET ${}",
            where_clause,
            order_by,
            binds.len() + 1,
            binds.len() + 2,
        );
        let events = apply_binds_as(sqlx::query_as::<Postgres, Event>(&select_sql), &binds)
            .bind(filters.page.limit)
            .bind(filters.page.offset())
            .fetch_all(&self.pool)
            .await?;

        let count_sql = format!("SELECT COUNT(*) FROM events e WHERE {}", where_clause);
        let total = apply_binds_scalar(sqlx::query_scalar::<Postgres, i64>(&count_sql), &binds)
            .fetch_one(&self.pool)
            .await?;

        Ok((events, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gather_core::models::GeoFilter;
    use gather_core::PageParams;

    fn filters() -> EventSearchFilters {
        EventSearchFilters {
            page: PageParams::normalize(Some(1), Some(20)),
            ..Default::default()
        }
    }

    #[test]
    fn test_where_defaults_to_published_only() {
        let (clause, binds) = build_search_where(&filters());
        assert_eq!(clause, "e.status = 'published'");
        assert!(binds.is_empty());
    }

    #[test]
    fn test_where_text_search_binds_pattern_three_times() {
        let mut f = filters();
        f.q = Some("jazz".to_string());
        let (clause, binds) = build_search_where(&f);
        assert!(clause.contains("e.title ILIKE $1"));
        assert!(clause.contains("e.description ILIKE $2"));
        assert!(clause.contains("tag ILIKE $3"));
        assert_eq!(binds.len(), 3);
        assert!(binds.iter().all(|b| *b == SqlBind::Text("%jazz%".to_string())));
    }

    #[test]
    fn test_where_placeholder_indexes_follow_bind_order() {
        let mut f = filters();
        f.city = Some("Austin".to_string());
        f.is_free = Some(true);
        f.featured = Some(false);
        let (clause, binds) = build_search_where(&f);
        assert!(clause.contains("e.city ILIKE $1"));
        assert!(clause.contains("e.is_free = $2"));
        assert!(clause.contains("e.featured = $3"));
        assert_eq!(
            binds,
            vec![
                SqlBind::Text("%Austin%".to_string()),
                SqlBind::Bool(true),
                SqlBind::Bool(false),
            ]
        );
    }

    #[test]
    fn test_where_one_bind_per_placeholder() {
        let mut f = filters();
        f.q = Some("rock".to_string());
        f.event_type = Some(EventType::Concert);
        f.country = Some("US".to_string());
        f.start_date = Some(Utc::now());
        f.min_price = Some(Decimal::new(1000, 2));
        f.category_id = Some("cat_music1".to_string());
        f.tags = vec!["live".to_string(), "outdoor".to_string()];
        f.near = Some(GeoFilter {
            latitude: 30.2672,
            longitude: -97.7431,
            radius_km: 50.0,
        });
        let (clause, binds) = build_search_where(&f);
        // Highest placeholder must equal the bind count.
        let max_placeholder = format!("${}", binds.len());
        assert!(clause.contains(&max_placeholder), "clause: {}", clause);
        assert!(!clause.contains(&format!("${}", binds.len() + 1)));
    }

    #[test]
    fn test_where_geo_box_binds_four_floats() {
        let mut f = filters();
        f.near = Some(GeoFilter {
            latitude: 0.0,
            longitude: 0.0,
            radius_km: 111.0,
        });
        let (clause, binds) = build_search_where(&f);
        assert!(clause.contains("e.latitude BETWEEN $1 AND $2"));
        assert!(clause.contains("e.longitude BETWEEN $3 AND $4"));
        assert_eq!(binds.len(), 4);
        assert_eq!(binds[0], SqlBind::Float(-1.0));
        assert_eq!(binds[1], SqlBind::Float(1.0));
    }

    #[test]
    fn test_where_date_range_bounds_start_and_end_columns() {
        let from = Utc::now();
        let until = from + chrono::Duration::days(7);
        let mut f = filters();
        f.start_date = Some(from);
        f.end_date = Some(until);
        let (clause, binds) = build_search_where(&f);
        // startDate constrains when the event begins, endDate when it ends.
        assert!(clause.contains("e.start_time >= $1"), "clause: {}", clause);
        assert!(clause.contains("e.end_time <= $2"), "clause: {}", clause);
        assert_eq!(
            binds,
            vec![SqlBind::Timestamp(from), SqlBind::Timestamp(until)]
        );
    }

    #[test]
    fn test_where_tags_use_array_overlap() {
        let mut f = filters();
        f.tags = vec!["music".to_string()];
        let (clause, binds) = build_search_where(&f);
        assert!(clause.contains("e.tags && $1"));
        assert_eq!(binds, vec![SqlBind::TextArray(vec!["music".to_string()])]);
    }

    #[test]
    fn test_order_by_per_sort() {
        assert_eq!(order_by_clause(EventSort::StartTime), "e.start_time ASC");
        assert_eq!(order_by_clause(EventSort::Created), "e.created_at DESC");
        assert!(order_by_clause(EventSort::Popular).contains("view_count DESC"));
        assert!(order_by_clause(EventSort::PriceLowToHigh).contains("ASC NULLS LAST"));
        assert!(order_by_clause(EventSort::PriceHighToLow).contains("DESC NULLS LAST"));
        // Distance sorting happens after the fetch; the database order is the default.
        assert_eq!(order_by_clause(EventSort::Distance), "e.start_time ASC");
    }
}
