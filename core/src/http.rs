//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. `PostcodeClient` produces
//! `HttpRequest` values and consumes `HttpResponse` values; whoever holds a
//! `Transport` performs the actual round-trip. A fresh request, including its
//! query string, is assembled per call from an owned `QueryParams` list, so
//! nothing accumulates across calls.

use std::fmt;

use url::Url;

use crate::error::{ApiError, ApiResult};

/// Headers sent with every request.
pub const DEFAULT_HEADERS: [(&str, &str); 2] = [
    ("Content-Type", "application/json"),
    ("Accept", "application/json"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered query-string pairs for a single request.
///
/// Built by value: each `with*` call consumes and returns the list. Optional
/// values are only appended when present and non-zero so the upstream
/// service applies its own defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.0.push((key.to_string(), value.to_string()));
        self
    }

    /// Append `key` only when `value` is `Some` and greater than zero.
    #[must_use]
    pub fn with_positive(self, key: &str, value: Option<u32>) -> Self {
        match value {
            Some(v) if v > 0 => self.with(key, v),
            _ => self,
        }
    }

    #[must_use]
    pub fn with_flag(self, key: &str, enabled: bool) -> Self {
        if enabled {
            self.with(key, true)
        } else {
            self
        }
    }

    /// Append a comma-joined list, skipping it entirely when empty.
    #[must_use]
    pub fn with_list(self, key: &str, values: &[&str]) -> Self {
        if values.is_empty() {
            self
        } else {
            self.with(key, values.join(","))
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, String)> {
        self.0.iter()
    }
}

/// An HTTP request described as plain data.
///
/// `url` is absolute and already carries the encoded query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Append `segments` to `base_url`, encode `query`, and attach the
    /// default header set.
    ///
    /// Each segment is escaped on its own, so `/`, `?` and `#` inside a
    /// caller-supplied value stay part of that segment. Empty and dot
    /// segments are rejected before anything is built.
    pub fn build(
        method: HttpMethod,
        base_url: &str,
        segments: &[&str],
        query: &QueryParams,
        body: Option<String>,
    ) -> ApiResult<Self> {
        if let Some(bad) = segments
            .iter()
            .find(|s| matches!(**s, "" | "." | ".."))
        {
            return Err(ApiError::validation(format!("invalid path segment {bad:?}")));
        }
        let mut url = Url::parse(base_url)?;
        url.path_segments_mut()
            .map_err(|()| ApiError::config(format!("base URL cannot take a path: {base_url}")))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query.iter() {
                pairs.append_pair(key, value);
            }
        }
        Ok(Self {
            method,
            url: url.into(),
            headers: DEFAULT_HEADERS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body,
        })
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_joins_base_and_path() {
        let req = HttpRequest::build(
            HttpMethod::Get,
            "https://api.postcodes.io",
            &["postcodes", "OX495NU"],
            &QueryParams::new(),
            None,
        )
        .unwrap();
        assert_eq!(req.url, "https://api.postcodes.io/postcodes/OX495NU");
        assert_eq!(req.method, HttpMethod::Get);
        assert!(req.body.is_none());
    }

    #[test]
    fn build_attaches_json_headers() {
        let req = HttpRequest::build(
            HttpMethod::Post,
            "http://localhost:3000",
            &["postcodes"],
            &QueryParams::new(),
            Some("{}".to_string()),
        )
        .unwrap();
        assert_eq!(
            req.headers,
            vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                ("Accept".to_string(), "application/json".to_string()),
            ]
        );
        assert_eq!(req.body.as_deref(), Some("{}"));
    }

    #[test]
    fn build_encodes_query_and_path() {
        let query = QueryParams::new().with("q", "OX49 5").with("limit", 5);
        let req = HttpRequest::build(
            HttpMethod::Get,
            "http://localhost:3000",
            &["postcodes"],
            &query,
            None,
        )
        .unwrap();
        assert_eq!(req.url, "http://localhost:3000/postcodes?q=OX49+5&limit=5");

        let req = HttpRequest::build(
            HttpMethod::Get,
            "http://localhost:3000",
            &["postcodes", "OX49 5NU"],
            &QueryParams::new(),
            None,
        )
        .unwrap();
        assert_eq!(req.url, "http://localhost:3000/postcodes/OX49%205NU");
    }

    #[test]
    fn optional_params_skip_absent_and_zero() {
        let query = QueryParams::new()
            .with_positive("limit", None)
            .with_positive("radius", Some(0))
            .with_positive("limit", Some(7))
            .with_flag("widesearch", false)
            .with_list("filter", &[]);
        assert_eq!(query.len(), 1);
        assert_eq!(query.get("limit"), Some("7"));
        assert!(query.get("radius").is_none());
    }

    #[test]
    fn list_params_are_comma_joined() {
        let query = QueryParams::new()
            .with_list("filter", &["postcode", "longitude"])
            .with_flag("widesearch", true);
        assert_eq!(query.get("filter"), Some("postcode,longitude"));
        assert_eq!(query.get("widesearch"), Some("true"));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = HttpRequest::build(
            HttpMethod::Get,
            "not a url",
            &["postcodes"],
            &QueryParams::new(),
            None,
        )
        .unwrap_err();
        assert_eq!(err.status(), 500);
    }

    fn url_for(segments: &[&str]) -> String {
        HttpRequest::build(
            HttpMethod::Get,
            "https://api.postcodes.io",
            segments,
            &QueryParams::new(),
            None,
        )
        .unwrap()
        .url
    }

    #[test]
    fn reserved_characters_stay_inside_their_segment() {
        assert_eq!(
            url_for(&["postcodes", "OX49?q=1"]),
            "https://api.postcodes.io/postcodes/OX49%3Fq=1"
        );
        assert_eq!(
            url_for(&["postcodes", "OX49#5NU"]),
            "https://api.postcodes.io/postcodes/OX49%235NU"
        );
        assert_eq!(
            url_for(&["postcodes", "../random/places"]),
            "https://api.postcodes.io/postcodes/..%2Frandom%2Fplaces"
        );
        assert_eq!(
            url_for(&["postcodes", "AB1?x", "validate"]),
            "https://api.postcodes.io/postcodes/AB1%3Fx/validate"
        );
    }

    #[test]
    fn base_path_is_kept() {
        let req = HttpRequest::build(
            HttpMethod::Get,
            "http://localhost:3000/v1",
            &["outcodes", "OX49"],
            &QueryParams::new(),
            None,
        )
        .unwrap();
        assert_eq!(req.url, "http://localhost:3000/v1/outcodes/OX49");
    }

    #[test]
    fn empty_and_dot_segments_are_rejected() {
        for bad in ["", ".", ".."] {
            let err = HttpRequest::build(
                HttpMethod::Get,
                "https://api.postcodes.io",
                &["postcodes", bad],
                &QueryParams::new(),
                None,
            )
            .unwrap_err();
            assert!(err.is_validation(), "{bad:?}");
        }
    }
}
