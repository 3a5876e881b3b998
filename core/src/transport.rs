//! Executes `HttpRequest` values against the network.
//!
//! # Design
//! `Transport` is the only seam where I/O happens. `UreqTransport` performs a
//! blocking round-trip with `ureq`; any `Fn(&HttpRequest) -> ApiResult<HttpResponse>`
//! closure also qualifies, which is how tests substitute canned responses.
//! HTTP failure statuses are returned as data so the envelope decoder can
//! interpret them.

use std::time::Duration;

use tracing::{debug, warn};

use crate::error::ApiResult;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Performs exactly one HTTP round-trip per call. Implementations must not
/// retry.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> ApiResult<HttpResponse>;
}

impl<F> Transport for F
where
    F: Fn(&HttpRequest) -> ApiResult<HttpResponse>,
{
    fn execute(&self, request: &HttpRequest) -> ApiResult<HttpResponse> {
        self(request)
    }
}

/// Blocking transport backed by a `ureq` agent.
///
/// The agent pools connections but holds no per-request state, so one
/// transport can serve concurrent callers.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(None)
    }
}

impl UreqTransport {
    /// `timeout` bounds the whole request, from connect to the end of the
    /// body.
    pub fn new(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> ApiResult<HttpResponse> {
        debug!(method = %request.method, url = %request.url, "sending request");

        let result = match request.method {
            HttpMethod::Get => {
                let mut builder = self.agent.get(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            HttpMethod::Post => {
                let mut builder = self.agent.post(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.send(request.body.as_deref().unwrap_or_default().as_bytes())
            }
        };

        let mut response = result.inspect_err(|e| {
            warn!(method = %request.method, url = %request.url, error = %e, "transport failure");
        })?;

        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string()?;
        debug!(status, bytes = body.len(), "received response");

        Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body,
        })
    }
}
