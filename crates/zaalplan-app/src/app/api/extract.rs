//! Request extraction shared by the API handlers.

use salvo::Request;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// ## Summary
/// Reads a UUID path parameter.
///
/// ## Errors
/// Returns `BadRequest` if the parameter is missing or not a UUID.
pub fn path_uuid(req: &Request, key: &str) -> AppResult<Uuid> {
    let raw = req
        .param::<String>(key)
        .ok_or_else(|| AppError::BadRequest(format!("missing path parameter `{key}`")))?;
    raw.parse()
        .map_err(|err| AppError::BadRequest(format!("`{raw}` is not a valid id: {err}")))
}

/// ## Summary
/// Parses the JSON request body.
///
/// ## Errors
/// Returns `BadRequest` if the body is not valid JSON for `T`.
pub async fn json_body<T: DeserializeOwned>(req: &mut Request) -> AppResult<T> {
    req.parse_json::<T>().await.map_err(|err| {
        tracing::debug!(error = %err, "Failed to parse request body");
        AppError::BadRequest(format!("invalid request body: {err}"))
    })
}

/// ## Summary
/// Parses the query string.
///
/// ## Errors
/// Returns `BadRequest` if the query does not deserialize into `T`.
pub fn query<T: DeserializeOwned>(req: &mut Request) -> AppResult<T> {
    req.parse_queries::<T>()
        .map_err(|err| AppError::BadRequest(format!("invalid query: {err}")))
}
