use serde::{Deserialize, Serialize};
use std::fmt;

/// Relay route serving the upstream events payload.
pub const EVENTS_PATH: &str = "/api/events";

/// Message returned when every upstream endpoint failed.
pub const RELAY_FAILURE_MESSAGE: &str = "Failed to fetch events from all API endpoints";

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

// ============================================================================
// Client-side fetch failures
// ============================================================================

/// Why the widget could not get events from the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// The request never produced an HTTP response. Browsers report blocked
    /// cross-origin requests this way.
    Network(String),
    /// The relay answered with a non-success status.
    Status(u16),
    /// The body was not valid JSON.
    Malformed(String),
}

impl FetchFailure {
    pub fn is_likely_cross_origin(&self) -> bool {
        matches!(self, FetchFailure::Network(_))
    }

    pub fn headline(&self) -> &'static str {
        if self.is_likely_cross_origin() {
            "Cross-Origin Restriction"
        } else {
            "Failed to load events. Please try again later."
        }
    }

    /// Remedies shown under the headline for cross-origin failures.
    pub fn guidance(&self) -> &'static [&'static str] {
        if self.is_likely_cross_origin() {
            &[
                "Serve this widget from the same origin as the events relay.",
                "Run the relay locally and open the widget through it.",
                "Deploy the relay alongside the page that embeds the widget.",
            ]
        } else {
            &[]
        }
    }
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "Network error: {}", msg),
            Self::Status(status) => write!(f, "HTTP error: {}", status),
            Self::Malformed(msg) => write!(f, "Failed to parse response: {}", msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_serializes_without_details() {
        let json = serde_json::to_string(&ErrorResponse::new(RELAY_FAILURE_MESSAGE)).unwrap();
        assert_eq!(
            json,
            r#"{"error":"Failed to fetch events from all API endpoints"}"#
        );
    }

    #[test]
    fn test_network_failure_is_cross_origin() {
        let failure = FetchFailure::Network("TypeError: Failed to fetch".to_string());
        assert!(failure.is_likely_cross_origin());
        assert_eq!(failure.headline(), "Cross-Origin Restriction");
        assert!(!failure.guidance().is_empty());
    }

    #[test]
    fn test_status_and_parse_failures_are_generic() {
        for failure in [
            FetchFailure::Status(500),
            FetchFailure::Malformed("expected value".to_string()),
        ] {
            assert!(!failure.is_likely_cross_origin());
            assert!(failure.guidance().is_empty());
        }
        assert_eq!(FetchFailure::Status(502).to_string(), "HTTP error: 502");
    }
}
