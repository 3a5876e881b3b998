//! Stateless HTTP request builder and response parser for postcodes.io.
//!
//! # Design
//! `PostcodeClient` holds only a `base_url` and carries no mutable state
//! between calls. Each endpoint is split into a `build_*` method that
//! validates its inputs and produces an `HttpRequest`, and a `parse_*`
//! method that consumes an `HttpResponse`. A `build_*` that fails validation
//! never yields a request, so nothing reaches the network.

use serde::Serialize;

use crate::envelope;
use crate::error::{ApiError, ApiResult};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, QueryParams};
use crate::types::{
    Geocode, GeocodeBatch, GeocodeMatch, Outcode, Place, Postcode, PostcodeBatch, PostcodeMatch,
    ScottishPostcode, TerminatedPostcode,
};
use crate::validation::{
    check_batch_size, check_coordinates, check_limit, check_radius, MAX_OUTCODE_RADIUS,
    MAX_RADIUS,
};

/// Production endpoint of the postcodes.io service.
pub const DEFAULT_BASE_URL: &str = "https://api.postcodes.io";

/// Synchronous, stateless client for the postcodes.io API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. `PostcodeApi` pairs it with a `Transport` for
/// callers that want one call per operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostcodeClient {
    base_url: String,
}

impl Default for PostcodeClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl PostcodeClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get(&self, path: &[&str], query: QueryParams) -> ApiResult<HttpRequest> {
        HttpRequest::build(HttpMethod::Get, &self.base_url, path, &query, None)
    }

    fn post_json<B: Serialize>(
        &self,
        path: &[&str],
        query: QueryParams,
        payload: &B,
    ) -> ApiResult<HttpRequest> {
        let body = serde_json::to_string(payload).map_err(ApiError::Encode)?;
        HttpRequest::build(HttpMethod::Post, &self.base_url, path, &query, Some(body))
    }

    fn geocode_query(geocode: &Geocode) -> QueryParams {
        QueryParams::new()
            .with("lon", geocode.longitude)
            .with("lat", geocode.latitude)
            .with_positive("limit", geocode.limit)
            .with_positive("radius", geocode.radius)
    }

    // -----------------------------------------------------------------------
    // Postcodes
    // -----------------------------------------------------------------------

    /// `GET /postcodes/{postcode}`
    pub fn build_lookup(&self, postcode: &str) -> ApiResult<HttpRequest> {
        self.get(&["postcodes", postcode], QueryParams::new())
    }

    pub fn parse_lookup(&self, response: HttpResponse) -> ApiResult<Postcode> {
        envelope::decode(&response)
    }

    /// `POST /postcodes` with `{"postcodes": [...]}`; 1 to 100 entries.
    ///
    /// `filter` restricts the returned attributes, e.g. `["postcode", "longitude"]`.
    pub fn build_bulk_lookup(
        &self,
        batch: &PostcodeBatch,
        filter: &[&str],
    ) -> ApiResult<HttpRequest> {
        check_batch_size(batch.postcodes.len(), "postcode")?;
        self.post_json(
            &["postcodes"],
            QueryParams::new().with_list("filter", filter),
            batch,
        )
    }

    pub fn parse_bulk_lookup(&self, response: HttpResponse) -> ApiResult<Vec<PostcodeMatch>> {
        envelope::decode_list(&response)
    }

    /// `GET /postcodes?lon=&lat=&limit=&radius=&widesearch=`
    pub fn build_reverse_geocode(&self, geocode: &Geocode) -> ApiResult<HttpRequest> {
        check_coordinates(geocode)?;
        let query = Self::geocode_query(geocode).with_flag("widesearch", geocode.wide_search);
        self.get(&["postcodes"], query)
    }

    pub fn parse_reverse_geocode(&self, response: HttpResponse) -> ApiResult<Vec<Postcode>> {
        envelope::decode_list(&response)
    }

    /// `POST /postcodes` with `{"geolocations": [...]}`; 1 to 100 entries,
    /// each with non-zero coordinates.
    pub fn build_bulk_reverse_geocode(
        &self,
        batch: &GeocodeBatch,
        filter: &[&str],
    ) -> ApiResult<HttpRequest> {
        check_batch_size(batch.geolocations.len(), "geolocation")?;
        batch.geolocations.iter().try_for_each(check_coordinates)?;
        self.post_json(
            &["postcodes"],
            QueryParams::new().with_list("filter", filter),
            batch,
        )
    }

    pub fn parse_bulk_reverse_geocode(
        &self,
        response: HttpResponse,
    ) -> ApiResult<Vec<GeocodeMatch>> {
        envelope::decode_list(&response)
    }

    /// `GET /postcodes?q=&limit=`, a prefix search over postcodes.
    pub fn build_query(&self, query: &str, limit: Option<u32>) -> ApiResult<HttpRequest> {
        check_limit(limit)?;
        self.get(
            &["postcodes"],
            QueryParams::new().with("q", query).with_positive("limit", limit),
        )
    }

    pub fn parse_query(&self, response: HttpResponse) -> ApiResult<Vec<Postcode>> {
        envelope::decode_list(&response)
    }

    /// `GET /postcodes/{postcode}/validate`
    pub fn build_validate(&self, postcode: &str) -> ApiResult<HttpRequest> {
        self.get(&["postcodes", postcode, "validate"], QueryParams::new())
    }

    pub fn parse_validate(&self, response: HttpResponse) -> ApiResult<bool> {
        envelope::decode(&response)
    }

    /// `GET /postcodes/{postcode}/nearest?limit=&radius=`
    pub fn build_nearest(
        &self,
        postcode: &str,
        limit: Option<u32>,
        radius: Option<u32>,
    ) -> ApiResult<HttpRequest> {
        check_limit(limit)?;
        check_radius(radius, MAX_RADIUS)?;
        self.get(
            &["postcodes", postcode, "nearest"],
            QueryParams::new()
                .with_positive("limit", limit)
                .with_positive("radius", radius),
        )
    }

    pub fn parse_nearest(&self, response: HttpResponse) -> ApiResult<Vec<Postcode>> {
        envelope::decode_list(&response)
    }

    /// `GET /postcodes/{postcode}/autocomplete?limit=`
    pub fn build_autocomplete(
        &self,
        postcode: &str,
        limit: Option<u32>,
    ) -> ApiResult<HttpRequest> {
        check_limit(limit)?;
        self.get(
            &["postcodes", postcode, "autocomplete"],
            QueryParams::new().with_positive("limit", limit),
        )
    }

    pub fn parse_autocomplete(&self, response: HttpResponse) -> ApiResult<Vec<String>> {
        envelope::decode_list(&response)
    }

    /// `GET /random/postcodes?outcode=`
    pub fn build_random_postcode(&self, outcode: Option<&str>) -> ApiResult<HttpRequest> {
        let query = match outcode {
            Some(outcode) if !outcode.is_empty() => QueryParams::new().with("outcode", outcode),
            _ => QueryParams::new(),
        };
        self.get(&["random", "postcodes"], query)
    }

    /// `None` when the outcode filter matched nothing.
    pub fn parse_random_postcode(&self, response: HttpResponse) -> ApiResult<Option<Postcode>> {
        envelope::decode(&response)
    }

    // -----------------------------------------------------------------------
    // Outcodes
    // -----------------------------------------------------------------------

    /// `GET /outcodes/{outcode}`
    pub fn build_outcode_lookup(&self, outcode: &str) -> ApiResult<HttpRequest> {
        self.get(&["outcodes", outcode], QueryParams::new())
    }

    pub fn parse_outcode_lookup(&self, response: HttpResponse) -> ApiResult<Outcode> {
        envelope::decode(&response)
    }

    /// `GET /outcodes?lon=&lat=&limit=&radius=`; radius may reach 25,000m.
    pub fn build_outcode_reverse_geocode(&self, geocode: &Geocode) -> ApiResult<HttpRequest> {
        check_coordinates(geocode)?;
        check_limit(geocode.limit)?;
        check_radius(geocode.radius, MAX_OUTCODE_RADIUS)?;
        self.get(&["outcodes"], Self::geocode_query(geocode))
    }

    pub fn parse_outcode_reverse_geocode(&self, response: HttpResponse) -> ApiResult<Vec<Outcode>> {
        envelope::decode_list(&response)
    }

    /// `GET /outcodes/{outcode}/nearest?limit=&radius=`
    pub fn build_nearest_outcode(
        &self,
        outcode: &str,
        limit: Option<u32>,
        radius: Option<u32>,
    ) -> ApiResult<HttpRequest> {
        check_limit(limit)?;
        check_radius(radius, MAX_OUTCODE_RADIUS)?;
        self.get(
            &["outcodes", outcode, "nearest"],
            QueryParams::new()
                .with_positive("limit", limit)
                .with_positive("radius", radius),
        )
    }

    pub fn parse_nearest_outcode(&self, response: HttpResponse) -> ApiResult<Vec<Outcode>> {
        envelope::decode_list(&response)
    }

    // -----------------------------------------------------------------------
    // Scottish and terminated postcodes
    // -----------------------------------------------------------------------

    /// `GET /scotland/postcodes/{postcode}`
    pub fn build_scottish_lookup(&self, postcode: &str) -> ApiResult<HttpRequest> {
        self.get(&["scotland", "postcodes", postcode], QueryParams::new())
    }

    pub fn parse_scottish_lookup(&self, response: HttpResponse) -> ApiResult<ScottishPostcode> {
        envelope::decode(&response)
    }

    /// `GET /terminated_postcodes/{postcode}`
    pub fn build_terminated_lookup(&self, postcode: &str) -> ApiResult<HttpRequest> {
        self.get(&["terminated_postcodes", postcode], QueryParams::new())
    }

    pub fn parse_terminated_lookup(
        &self,
        response: HttpResponse,
    ) -> ApiResult<TerminatedPostcode> {
        envelope::decode(&response)
    }

    // -----------------------------------------------------------------------
    // Places
    // -----------------------------------------------------------------------

    /// `GET /places/{code}`, e.g. `osgb4000000074564391`.
    pub fn build_place_lookup(&self, code: &str) -> ApiResult<HttpRequest> {
        self.get(&["places", code], QueryParams::new())
    }

    pub fn parse_place_lookup(&self, response: HttpResponse) -> ApiResult<Place> {
        envelope::decode(&response)
    }

    /// `GET /places?q=&limit=`
    pub fn build_place_query(&self, query: &str, limit: Option<u32>) -> ApiResult<HttpRequest> {
        check_limit(limit)?;
        self.get(
            &["places"],
            QueryParams::new().with("q", query).with_positive("limit", limit),
        )
    }

    pub fn parse_place_query(&self, response: HttpResponse) -> ApiResult<Vec<Place>> {
        envelope::decode_list(&response)
    }

    /// `GET /random/places`
    pub fn build_random_place(&self) -> ApiResult<HttpRequest> {
        self.get(&["random", "places"], QueryParams::new())
    }

    /// A `null` result is a decode error, as for every single-record parser
    /// other than `parse_random_postcode`. Upstream always has a place to
    /// return.
    pub fn parse_random_place(&self, response: HttpResponse) -> ApiResult<Place> {
        envelope::decode(&response)
    }
}
