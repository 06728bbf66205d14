//! Human-readable identifier and slug generation.
//!
//! Identifiers are `{prefix}_{6 alphanumeric}` (62^6 space). Collisions are
//! probabilistically rare but not impossible; the store enforces uniqueness
//! through primary keys and insert sites re-roll a fresh candidate a bounded
//! number of times (see `constants::ID_GENERATION_ATTEMPTS`).

use rand::distr::{Alphanumeric, SampleString};

const SUFFIX_LEN: usize = 6;
const BOOKING_CODE_LEN: usize = 8;

fn random_suffix(len: usize) -> String {
    Alphanumeric.sample_string(&mut rand::rng(), len)
}

/// `"{prefix}_{6 random alphanumeric}"`, e.g. `event_OLWL1E`.
pub fn generate_id(prefix: &str) -> String {
    format!("{}_{}", prefix, random_suffix(SUFFIX_LEN))
}

/// `"{parent_id}_{child_prefix}_{6 random alphanumeric}"`,
/// e.g. `event_OLWL1E_attendee_5wBPrb`.
pub fn generate_child_id(parent_id: &str, child_prefix: &str) -> String {
    format!("{}_{}_{}", parent_id, child_prefix, random_suffix(SUFFIX_LEN))
}

/// URL slug from a title: lowercased, non-alphanumeric runs collapsed to a
/// single `-`, plus a random suffix so slugs stay unique across same-named
/// events.
pub fn generate_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_dash = true; // suppress a leading dash
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    let trimmed = slug.trim_end_matches('-');
    format!("{}-{}", trimmed, random_suffix(SUFFIX_LEN))
}

/// Booking reference shown to users, e.g. `GTR-8F2K1QZP`.
pub fn generate_booking_code() -> String {
    format!(
        "GTR-{}",
        random_suffix(BOOKING_CODE_LEN).to_ascii_uppercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_id_shape() {
        let id = generate_id("event");
        let suffix = id.strip_prefix("event_").expect("prefix");
        assert_eq!(suffix.len(), 6);
        assert!(suffix.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generate_child_id_composes_parent() {
        let child = generate_child_id("event_OLWL1E", "attendee");
        assert!(child.starts_with("event_OLWL1E_attendee_"));
        let suffix = child.rsplit('_').next().unwrap();
        assert_eq!(suffix.len(), 6);
    }

    #[test]
    fn test_generate_ids_differ() {
        // Not a uniqueness proof, just a sanity check the RNG is wired up.
        let a = generate_id("user");
        let b = generate_id("user");
        assert_ne!(a, b);
    }

    #[test]
    fn test_generate_slug_kebab_cases_title() {
        let slug = generate_slug("Ultimate Text!  2025");
        assert!(slug.starts_with("ultimate-text-2025-"), "got {}", slug);
        let suffix = slug.rsplit('-').next().unwrap();
        assert_eq!(suffix.len(), 6);
    }

    #[test]
    fn test_generate_slug_trims_edge_punctuation() {
        let slug = generate_slug("--Hello World--");
        assert!(slug.starts_with("hello-world-"), "got {}", slug);
        assert!(!slug.contains("--"));
    }

    #[test]
    fn test_generate_booking_code_shape() {
        let code = generate_booking_code();
        let suffix = code.strip_prefix("GTR-").expect("prefix");
        assert_eq!(suffix.len(), 8);
        assert!(suffix
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }
}
