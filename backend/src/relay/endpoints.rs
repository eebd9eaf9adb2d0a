use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use super::AttemptFailure;

/// One upstream events endpoint and the headers it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointCandidate {
    pub name: String,
    pub url: String,
    /// Sent in this order; names are case-insensitive on the wire.
    pub headers: Vec<(String, String)>,
}

impl EndpointCandidate {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            headers: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn header_map(&self) -> Result<HeaderMap, AttemptFailure> {
        let mut map = HeaderMap::with_capacity(self.headers.len());
        for (name, value) in &self.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| AttemptFailure::InvalidHeader(name.clone()))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| AttemptFailure::InvalidHeader(name.clone()))?;
            map.insert(header_name, header_value);
        }
        Ok(map)
    }
}

/// Circle.so endpoints in fallback order.
///
/// The first two are reached through shared API hosts and need the community
/// host sent as `Host` so the request lands on the right tenant.
pub fn reference_endpoints(api_key: &str, community_host: &str) -> Vec<EndpointCandidate> {
    let authorized = |candidate: EndpointCandidate| {
        candidate
            .with_header("Authorization", format!("Token token={}", api_key))
            .with_header("Content-Type", "application/json")
            .with_header("Accept", "application/json")
    };

    vec![
        authorized(EndpointCandidate::new(
            "Admin API v2",
            "https://app.circle.so/api/admin/v2/events",
        ))
        .with_header("Host", community_host),
        authorized(EndpointCandidate::new(
            "Headless API v1",
            "https://api-headless.circle.so/api/v1/events",
        ))
        .with_header("Host", community_host),
        authorized(EndpointCandidate::new(
            "Custom Domain API",
            format!("https://{}/api/v1/events", community_host),
        )),
    ]
}
