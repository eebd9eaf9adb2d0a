use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};

use crate::error::ApiResult;
use crate::AppState;

/// Forward the upstream events payload as-is.
///
/// Takes no parameters; query strings are neither read nor forwarded.
pub async fn get_events(State(state): State<AppState>) -> ApiResult<Response> {
    let body = state.relay.current_events().await?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}
