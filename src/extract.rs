use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::shared::AppError;

/// JSON request body that tolerates a missing or mis-shaped payload.
///
/// An empty body, bytes that are not JSON, a JSON `null`, or a document that
/// does not fit `T` all yield `JsonBody(None)`. Handlers own every
/// validation message, so path checks keep their place ahead of body checks.
#[derive(Debug)]
pub struct JsonBody<T>(pub Option<T>);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            debug!(error = %e, "Failed to read request body");
            AppError::BadRequest("Failed to read request body".to_string())
        })?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonBody(None));
        }

        let value: Value = match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(e) => {
                debug!(error = %e, "Request body is not valid JSON");
                return Ok(JsonBody(None));
            }
        };

        match serde_json::from_value(value) {
            Ok(parsed) => Ok(JsonBody(Some(parsed))),
            Err(e) => {
                debug!(error = %e, "Request body has unexpected shape");
                Ok(JsonBody(None))
            }
        }
    }
}

/// Parses a path identifier; only base-10 integers are accepted
pub fn parse_id(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok()
}

/// Parses an identifier supplied in a JSON body: an integer, a float with no
/// fractional part such as `1.0`, or a string holding a base-10 integer
pub fn parse_json_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(raw) => parse_id(raw),
        _ => None,
    }
}
