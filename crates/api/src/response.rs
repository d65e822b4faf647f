//! Shared response envelope types for API handlers.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// # Example
///
/// ```ignore
/// Ok((StatusCode::CREATED, Json(DataResponse { data: payload })))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "message": ... }` body for endpoints with nothing else to say.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
