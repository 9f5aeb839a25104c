//! Record/replay decision policy
//!
//! Decides, from store state and configuration flags, whether a request is
//! replayed from its snapshot, fetched without storing, or fetched and
//! stored.

use crate::config::UpdatePolicy;

/// Chosen path for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Serve the stored snapshot, no network call
    Replay,
    /// Perform the real call; persist the exchange when `store` is set
    Fetch {
        /// Whether the fetched exchange is written to the store
        store: bool,
    },
}

/// Decide the path for a request
///
/// Rules, evaluated in order: `ignore_snapshots` forces the fetch branch
/// regardless of store state; otherwise an existing record is replayed;
/// otherwise the fetch branch decides persistence from the update policy.
#[must_use]
pub fn decide(ignore_snapshots: bool, record_exists: bool, update: UpdatePolicy) -> Decision {
    if !ignore_snapshots && record_exists {
        return Decision::Replay;
    }

    let store = match update {
        UpdatePolicy::All => true,
        UpdatePolicy::Missing => !record_exists,
        UpdatePolicy::None => false,
    };

    Decision::Fetch { store }
}

/// Headers that carry transfer/content encoding framing
///
/// Stored bodies are fully decoded, so replaying these headers would
/// describe an encoding the body no longer has.
const FRAMING_HEADERS: [&str; 2] = ["content-encoding", "transfer-encoding"];

/// Drop encoding framing headers from a response header list
#[must_use]
pub fn filter_framing_headers(headers: &[(String, String)]) -> Vec<(String, String)> {
    headers
        .iter()
        .filter(|(name, _)| {
            !FRAMING_HEADERS
                .iter()
                .any(|framing| name.eq_ignore_ascii_case(framing))
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_existing_record_replays() {
        assert_eq!(decide(false, true, UpdatePolicy::None), Decision::Replay);
        assert_eq!(decide(false, true, UpdatePolicy::Missing), Decision::Replay);
    }

    #[test]
    fn test_update_all_still_replays_existing() {
        // `all` only governs persistence on the fetch branch; an existing
        // record wins unless ignore_snapshots is set
        assert_eq!(decide(false, true, UpdatePolicy::All), Decision::Replay);
    }

    #[test]
    fn test_missing_record_fetches() {
        assert_eq!(
            decide(false, false, UpdatePolicy::None),
            Decision::Fetch { store: false }
        );
        assert_eq!(
            decide(false, false, UpdatePolicy::Missing),
            Decision::Fetch { store: true }
        );
        assert_eq!(
            decide(false, false, UpdatePolicy::All),
            Decision::Fetch { store: true }
        );
    }

    #[test]
    fn test_ignore_snapshots_forces_fetch() {
        assert_eq!(
            decide(true, true, UpdatePolicy::None),
            Decision::Fetch { store: false }
        );
        assert_eq!(
            decide(true, true, UpdatePolicy::All),
            Decision::Fetch { store: true }
        );
        // `missing` does not overwrite a record that already exists
        assert_eq!(
            decide(true, true, UpdatePolicy::Missing),
            Decision::Fetch { store: false }
        );
        assert_eq!(
            decide(true, false, UpdatePolicy::Missing),
            Decision::Fetch { store: true }
        );
    }

    #[test]
    fn test_filter_framing_headers() {
        let headers = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Content-Encoding".to_string(), "gzip".to_string()),
            ("transfer-encoding".to_string(), "chunked".to_string()),
            ("etag".to_string(), "abc".to_string()),
        ];

        let filtered = filter_framing_headers(&headers);

        assert_eq!(
            filtered,
            vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                ("etag".to_string(), "abc".to_string()),
            ]
        );
    }
}
