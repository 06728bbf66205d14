//! Request-level validation helpers shared by the service layer.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::error::AppError;

/// Parse and validate an IANA timezone name (e.g. `America/Chicago`).
pub fn parse_timezone(name: &str) -> Result<Tz, AppError> {
    name.parse::<Tz>()
        .map_err(|_| AppError::Validation(format!("Unknown timezone: {}", name)))
}

/// Event scheduling rules: start strictly in the future, end strictly after
/// start. `now` is taken as a parameter so the rules are testable.
pub fn validate_event_times(
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    if start_time <= now {
        return Err(AppError::Validation(
            "Event start time must be in the future".to_string(),
        ));
    }
    if end_time <= start_time {
        return Err(AppError::Validation(
            "Event end time must be after the start time".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_parse_timezone_known() {
        assert!(parse_timezone("America/Chicago").is_ok());
        assert!(parse_timezone("UTC").is_ok());
    }

    #[test]
    fn test_parse_timezone_unknown() {
        let err = parse_timezone("Mars/Olympus_Mons").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_event_times_start_in_past_rejected() {
        let now = Utc::now();
        let err =
            validate_event_times(now - Duration::hours(1), now + Duration::hours(2), now)
                .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_event_times_start_equal_now_rejected() {
        let now = Utc::now();
        assert!(validate_event_times(now, now + Duration::hours(2), now).is_err());
    }

    #[test]
    fn test_event_times_end_before_start_rejected() {
        let now = Utc::now();
        let start = now + Duration::hours(2);
        assert!(validate_event_times(start, start, now).is_err());
        assert!(validate_event_times(start, start - Duration::minutes(1), now).is_err());
    }

    #[test]
    fn test_event_times_valid() {
        let now = Utc::now();
        let start = now + Duration::hours(1);
        assert!(validate_event_times(start, start + Duration::hours(3), now).is_ok());
    }
}
