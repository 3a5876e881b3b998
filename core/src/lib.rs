//! Synchronous client for the postcodes.io UK postcode lookup service.
//!
//! # Overview
//! `PostcodeClient` builds `HttpRequest` values and parses `HttpResponse`
//! values without touching the network (host-does-IO pattern). A
//! `Transport` performs the round-trip; `PostcodeApi` wires the two together
//! so each endpoint is a single call:
//!
//! ```rust,no_run
//! use postcode_core::{Geocode, PostcodeApi};
//!
//! let api = PostcodeApi::new();
//! let postcode = api.lookup("OX49 5NU")?;
//! let nearby = api.reverse_geocode(&Geocode::new(-1.069752, 51.656144).with_limit(5))?;
//! # Ok::<(), postcode_core::ApiError>(())
//! ```
//!
//! # Design
//! - `PostcodeClient` is stateless; it holds only `base_url`.
//! - Input bounds are checked in `build_*`, so a rejected call never
//!   produces a request.
//! - Every response goes through one generic envelope decoder.
//! - No retries, caching or pagination. Errors are returned to the caller
//!   as `ApiError` values.

pub mod api;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;
pub mod validation;

pub use api::PostcodeApi;
pub use client::{PostcodeClient, DEFAULT_BASE_URL};
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult};
pub use http::{HttpMethod, HttpRequest, HttpResponse, QueryParams};
pub use transport::{Transport, UreqTransport};
pub use types::{
    Codes, Geocode, GeocodeBatch, GeocodeMatch, Outcode, Place, Postcode, PostcodeBatch,
    PostcodeMatch, ResponseError, ScottishCodes, ScottishPostcode, TerminatedPostcode,
};
