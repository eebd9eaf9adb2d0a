use gloo_net::http::Request;
use serde_json::Value;
use shared::FetchFailure;

pub struct EventsService;

impl EventsService {
    /// GET the relay's events payload.
    ///
    /// A request that never produces a response (blocked cross-origin call,
    /// offline, DNS) is reported as [`FetchFailure::Network`].
    pub async fn fetch_events(path: &str) -> Result<Value, FetchFailure> {
        let response = Request::get(path)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| FetchFailure::Network(e.to_string()))?;

        if !response.ok() {
            return Err(FetchFailure::Status(response.status()));
        }

        response
            .json()
            .await
            .map_err(|e| FetchFailure::Malformed(e.to_string()))
    }
}
