//! Shared constants for pagination, booking limits, and rewards.

/// Default page size for list endpoints.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Hard cap on page size; larger `limit` values are clamped down to this.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Maximum tickets a single booking may claim.
pub const MAX_TICKETS_PER_BOOKING: i32 = 10;

/// Minimum tickets a single booking may claim.
pub const MIN_TICKETS_PER_BOOKING: i32 = 1;

/// Flat reward granted for a free-event booking.
pub const FREE_BOOKING_REWARD_POINTS: i32 = 10;

/// Paid bookings earn one point per this many minor currency units (cents).
pub const REWARD_CENTS_PER_POINT: i64 = 100;

/// Default geo search radius in kilometres when latitude/longitude are
/// supplied without an explicit radius.
pub const DEFAULT_SEARCH_RADIUS_KM: f64 = 50.0;

/// Attempts to find an unused identifier before giving up.
pub const ID_GENERATION_ATTEMPTS: u32 = 3;
