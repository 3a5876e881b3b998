//! Unwrapping of the `{status, result, error}` envelope.
//!
//! # Design
//! Every postcodes.io response wraps its payload the same way. The envelope
//! is first parsed with `result` left as a raw `serde_json::Value`, then
//! `result` is decoded into whatever type the call site asks for. One
//! generic function therefore serves every endpoint.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::http::HttpResponse;
use crate::types::ResponseError;

#[derive(Debug, Deserialize)]
struct Envelope {
    status: u16,
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<String>,
}

/// Turn a non-200 HTTP response into the upstream error it carries.
///
/// A body that is not a valid error record becomes a decode error.
pub fn check_status(response: &HttpResponse) -> ApiResult<()> {
    if response.status == 200 {
        return Ok(());
    }
    let record: ResponseError = serde_json::from_str(&response.body).map_err(ApiError::Decode)?;
    Err(record.into())
}

/// Decode an envelope body and return its `result` as `T`.
///
/// An envelope whose own `status` is 400 or above is reported as an
/// upstream error even though the HTTP status was 200.
pub fn decode_body<T: DeserializeOwned>(body: &str) -> ApiResult<T> {
    let envelope: Envelope = serde_json::from_str(body).map_err(ApiError::Decode)?;
    if envelope.status >= 400 {
        return Err(ApiError::upstream(
            envelope.status,
            envelope.error.unwrap_or_default(),
        ));
    }
    serde_json::from_value(envelope.result).map_err(ApiError::Decode)
}

/// Check the HTTP status, then decode the envelope.
pub fn decode<T: DeserializeOwned>(response: &HttpResponse) -> ApiResult<T> {
    check_status(response)?;
    decode_body(&response.body)
}

/// Like `decode`, but a `null` result becomes an empty list.
pub fn decode_list<T: DeserializeOwned>(response: &HttpResponse) -> ApiResult<Vec<T>> {
    decode::<Option<Vec<T>>>(response).map(Option::unwrap_or_default)
}
