//! Upstream relay for the community events feed.
//!
//! Candidates are tried one after another. The first one answering with a
//! success status and a JSON body wins and its body is forwarded untouched;
//! when every candidate fails the caller gets a single [`RelayError`].

mod endpoints;
mod upstream;

use axum::body::Bytes;
use serde::de::IgnoredAny;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

pub use endpoints::{reference_endpoints, EndpointCandidate};
pub use upstream::{HttpUpstream, Upstream};

/// Why one candidate was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttemptFailure {
    #[error("HTTP {code} - {}", .message.as_deref().unwrap_or("no message"))]
    Status { code: u16, message: Option<String> },

    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("response is not valid JSON: {0}")]
    InvalidPayload(String),

    #[error("invalid header {0}")]
    InvalidHeader(String),
}

impl AttemptFailure {
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AttemptFailure::Timeout
        } else {
            AttemptFailure::Transport(err.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedAttempt {
    pub endpoint: String,
    pub failure: AttemptFailure,
}

impl fmt::Display for FailedAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.endpoint, self.failure)
    }
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("all {} upstream endpoints failed", .attempts.len())]
    Exhausted { attempts: Vec<FailedAttempt> },
}

pub struct RelayResolver {
    endpoints: Vec<EndpointCandidate>,
    upstream: Arc<dyn Upstream>,
}

impl RelayResolver {
    pub fn new(endpoints: Vec<EndpointCandidate>, upstream: Arc<dyn Upstream>) -> Self {
        Self {
            endpoints,
            upstream,
        }
    }

    pub fn endpoints(&self) -> &[EndpointCandidate] {
        &self.endpoints
    }

    /// Fetch the current events payload from the first healthy candidate.
    pub async fn current_events(&self) -> Result<Bytes, RelayError> {
        let mut attempts = Vec::new();

        for endpoint in &self.endpoints {
            tracing::info!(endpoint = %endpoint.name, url = %endpoint.url, "Trying upstream endpoint");

            match self.attempt(endpoint).await {
                Ok(body) => {
                    tracing::info!(endpoint = %endpoint.name, bytes = body.len(), "Upstream endpoint succeeded");
                    return Ok(body);
                }
                Err(failure) => {
                    tracing::warn!(endpoint = %endpoint.name, error = %failure, "Upstream endpoint failed");
                    attempts.push(FailedAttempt {
                        endpoint: endpoint.name.clone(),
                        failure,
                    });
                }
            }
        }

        tracing::error!(attempts = attempts.len(), "All upstream endpoints failed");
        for attempt in &attempts {
            tracing::error!("  {}", attempt);
        }

        Err(RelayError::Exhausted { attempts })
    }

    async fn attempt(&self, endpoint: &EndpointCandidate) -> Result<Bytes, AttemptFailure> {
        let body = self.upstream.fetch(endpoint).await?;
        serde_json::from_slice::<IgnoredAny>(&body)
            .map_err(|e| AttemptFailure::InvalidPayload(e.to_string()))?;
        Ok(body)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Upstream double answering from a script and recording every call.
    #[derive(Default)]
    pub(crate) struct ScriptedUpstream {
        responses: HashMap<String, Result<Bytes, AttemptFailure>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedUpstream {
        pub(crate) fn respond(mut self, name: &str, response: Result<&str, AttemptFailure>) -> Self {
            self.responses.insert(
                name.to_string(),
                response.map(|body| Bytes::copy_from_slice(body.as_bytes())),
            );
            self
        }

        pub(crate) fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Upstream for ScriptedUpstream {
        async fn fetch(&self, endpoint: &EndpointCandidate) -> Result<Bytes, AttemptFailure> {
            self.calls.lock().unwrap().push(endpoint.name.clone());
            self.responses
                .get(&endpoint.name)
                .cloned()
                .unwrap_or(Err(AttemptFailure::Transport("connection refused".to_string())))
        }
    }

    pub(crate) fn candidates(names: &[&str]) -> Vec<EndpointCandidate> {
        names
            .iter()
            .map(|name| EndpointCandidate::new(*name, format!("https://{}.example/events", name)))
            .collect()
    }

    fn not_found() -> AttemptFailure {
        AttemptFailure::Status {
            code: 404,
            message: Some("Not Found".to_string()),
        }
    }

    #[tokio::test]
    async fn test_first_success_short_circuits() {
        let upstream = Arc::new(
            ScriptedUpstream::default()
                .respond("a", Err(not_found()))
                .respond("b", Err(AttemptFailure::Timeout))
                .respond("c", Ok(r#"{"records":[{"name":"from c"}]}"#))
                .respond("d", Ok(r#"{"records":[]}"#)),
        );
        let resolver = RelayResolver::new(candidates(&["a", "b", "c", "d"]), upstream.clone());

        let body = resolver.current_events().await.unwrap();
        assert_eq!(&body[..], br#"{"records":[{"name":"from c"}]}"#);
        assert_eq!(upstream.calls(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_first_candidate_success_tries_nothing_else() {
        let upstream = Arc::new(
            ScriptedUpstream::default()
                .respond("a", Ok("[]"))
                .respond("b", Ok("[1]")),
        );
        let resolver = RelayResolver::new(candidates(&["a", "b"]), upstream.clone());

        assert_eq!(&resolver.current_events().await.unwrap()[..], b"[]");
        assert_eq!(upstream.calls(), vec!["a"]);
    }

    #[tokio::test]
    async fn test_exhaustion_records_every_attempt() {
        let upstream = Arc::new(
            ScriptedUpstream::default()
                .respond("a", Err(not_found()))
                .respond("b", Err(AttemptFailure::Timeout)),
        );
        let resolver = RelayResolver::new(candidates(&["a", "b", "c"]), upstream.clone());

        let RelayError::Exhausted { attempts } = resolver.current_events().await.unwrap_err();
        let failed: Vec<_> = attempts.iter().map(|a| a.endpoint.as_str()).collect();
        assert_eq!(failed, vec!["a", "b", "c"]);
        assert_eq!(attempts[0].failure, not_found());
        assert_eq!(attempts[1].failure, AttemptFailure::Timeout);
        assert_eq!(upstream.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_non_json_success_falls_through() {
        let upstream = Arc::new(
            ScriptedUpstream::default()
                .respond("a", Ok("<html>Sign in</html>"))
                .respond("b", Ok(r#"{"records":[]}"#)),
        );
        let resolver = RelayResolver::new(candidates(&["a", "b"]), upstream.clone());

        assert_eq!(
            &resolver.current_events().await.unwrap()[..],
            br#"{"records":[]}"#
        );
        assert_eq!(upstream.calls(), vec!["a", "b"]);
    }

    /// In-memory log sink for asserting on emitted events.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn lines(&self) -> Vec<String> {
            String::from_utf8_lossy(&self.0.lock().unwrap())
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    #[tokio::test]
    async fn test_exhaustion_logs_each_failure() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer({
                let logs = logs.clone();
                move || logs.clone()
            })
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let upstream = Arc::new(
            ScriptedUpstream::default()
                .respond("a", Err(not_found()))
                .respond("b", Err(AttemptFailure::Timeout)),
        );
        let resolver = RelayResolver::new(candidates(&["a", "b"]), upstream);
        assert!(resolver.current_events().await.is_err());

        let errors: Vec<String> = logs
            .lines()
            .into_iter()
            .filter(|line| line.contains("ERROR"))
            .collect();
        assert!(errors.iter().any(|l| l.contains("All upstream endpoints failed")));
        assert!(errors.iter().any(|l| l.contains("a: HTTP 404 - Not Found")));
        assert!(errors.iter().any(|l| l.contains("b: request timed out")));
    }

    #[tokio::test]
    async fn test_no_candidates_is_exhausted() {
        let resolver = RelayResolver::new(Vec::new(), Arc::new(ScriptedUpstream::default()));
        let err = resolver.current_events().await.unwrap_err();
        assert_eq!(err.to_string(), "all 0 upstream endpoints failed");
    }

    #[test]
    fn test_attempt_failure_display() {
        assert_eq!(not_found().to_string(), "HTTP 404 - Not Found");
        let bare = AttemptFailure::Status {
            code: 503,
            message: None,
        };
        assert_eq!(bare.to_string(), "HTTP 503 - no message");
    }
}
