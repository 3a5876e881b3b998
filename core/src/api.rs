//! One method per postcodes.io endpoint.
//!
//! `PostcodeApi` pairs a `PostcodeClient` with a `Transport` and runs
//! build, execute and parse in sequence. Each call builds its own request,
//! so a shared `PostcodeApi` can be used from several threads when the
//! transport allows it.

use tracing::instrument;

use crate::client::PostcodeClient;
use crate::config::ClientConfig;
use crate::error::ApiResult;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};
use crate::types::{
    Geocode, GeocodeBatch, GeocodeMatch, Outcode, Place, Postcode, PostcodeBatch, PostcodeMatch,
    ScottishPostcode, TerminatedPostcode,
};

#[derive(Clone)]
pub struct PostcodeApi<T = UreqTransport> {
    client: PostcodeClient,
    transport: T,
}

impl Default for PostcodeApi<UreqTransport> {
    fn default() -> Self {
        Self::with_transport(PostcodeClient::default(), UreqTransport::default())
    }
}

impl PostcodeApi<UreqTransport> {
    /// Client for the production service with transport defaults.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        config.validate()?;
        Ok(Self::with_transport(
            PostcodeClient::new(&config.base_url),
            UreqTransport::new(config.timeout),
        ))
    }
}

impl<T: Transport> PostcodeApi<T> {
    pub fn with_transport(client: PostcodeClient, transport: T) -> Self {
        Self { client, transport }
    }

    #[instrument(level = "debug", skip_all, fields(method = %request.method, url = %request.url))]
    fn send(&self, request: &HttpRequest) -> ApiResult<HttpResponse> {
        self.transport.execute(request)
    }

    /// Look up a single postcode (case and space insensitive upstream).
    pub fn lookup(&self, postcode: &str) -> ApiResult<Postcode> {
        let response = self.send(&self.client.build_lookup(postcode)?)?;
        self.client.parse_lookup(response)
    }

    /// Look up 1 to 100 postcodes in one request. Results keep the order of
    /// the batch; unknown postcodes have a `None` result.
    pub fn bulk_lookup(
        &self,
        batch: &PostcodeBatch,
        filter: &[&str],
    ) -> ApiResult<Vec<PostcodeMatch>> {
        let response = self.send(&self.client.build_bulk_lookup(batch, filter)?)?;
        self.client.parse_bulk_lookup(response)
    }

    /// Postcodes nearest to a coordinate pair.
    pub fn reverse_geocode(&self, geocode: &Geocode) -> ApiResult<Vec<Postcode>> {
        let response = self.send(&self.client.build_reverse_geocode(geocode)?)?;
        self.client.parse_reverse_geocode(response)
    }

    pub fn bulk_reverse_geocode(
        &self,
        batch: &GeocodeBatch,
        filter: &[&str],
    ) -> ApiResult<Vec<GeocodeMatch>> {
        let response = self.send(&self.client.build_bulk_reverse_geocode(batch, filter)?)?;
        self.client.parse_bulk_reverse_geocode(response)
    }

    /// Prefix search over postcodes, sorted upstream.
    pub fn query(&self, query: &str, limit: Option<u32>) -> ApiResult<Vec<Postcode>> {
        let response = self.send(&self.client.build_query(query, limit)?)?;
        self.client.parse_query(response)
    }

    pub fn validate(&self, postcode: &str) -> ApiResult<bool> {
        let response = self.send(&self.client.build_validate(postcode)?)?;
        self.client.parse_validate(response)
    }

    pub fn nearest(
        &self,
        postcode: &str,
        limit: Option<u32>,
        radius: Option<u32>,
    ) -> ApiResult<Vec<Postcode>> {
        let response = self.send(&self.client.build_nearest(postcode, limit, radius)?)?;
        self.client.parse_nearest(response)
    }

    pub fn autocomplete(&self, postcode: &str, limit: Option<u32>) -> ApiResult<Vec<String>> {
        let response = self.send(&self.client.build_autocomplete(postcode, limit)?)?;
        self.client.parse_autocomplete(response)
    }

    pub fn random_postcode(&self, outcode: Option<&str>) -> ApiResult<Option<Postcode>> {
        let response = self.send(&self.client.build_random_postcode(outcode)?)?;
        self.client.parse_random_postcode(response)
    }

    pub fn outcode_lookup(&self, outcode: &str) -> ApiResult<Outcode> {
        let response = self.send(&self.client.build_outcode_lookup(outcode)?)?;
        self.client.parse_outcode_lookup(response)
    }

    pub fn outcode_reverse_geocode(&self, geocode: &Geocode) -> ApiResult<Vec<Outcode>> {
        let response = self.send(&self.client.build_outcode_reverse_geocode(geocode)?)?;
        self.client.parse_outcode_reverse_geocode(response)
    }

    pub fn nearest_outcode(
        &self,
        outcode: &str,
        limit: Option<u32>,
        radius: Option<u32>,
    ) -> ApiResult<Vec<Outcode>> {
        let response = self.send(&self.client.build_nearest_outcode(outcode, limit, radius)?)?;
        self.client.parse_nearest_outcode(response)
    }

    pub fn scottish_lookup(&self, postcode: &str) -> ApiResult<ScottishPostcode> {
        let response = self.send(&self.client.build_scottish_lookup(postcode)?)?;
        self.client.parse_scottish_lookup(response)
    }

    pub fn terminated_lookup(&self, postcode: &str) -> ApiResult<TerminatedPostcode> {
        let response = self.send(&self.client.build_terminated_lookup(postcode)?)?;
        self.client.parse_terminated_lookup(response)
    }

    pub fn place_lookup(&self, code: &str) -> ApiResult<Place> {
        let response = self.send(&self.client.build_place_lookup(code)?)?;
        self.client.parse_place_lookup(response)
    }

    pub fn place_query(&self, query: &str, limit: Option<u32>) -> ApiResult<Vec<Place>> {
        let response = self.send(&self.client.build_place_query(query, limit)?)?;
        self.client.parse_place_query(response)
    }

    pub fn random_place(&self) -> ApiResult<Place> {
        let response = self.send(&self.client.build_random_place()?)?;
        self.client.parse_random_place(response)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;
    use crate::error::ApiError;

    /// Canned transport that records every request it is asked to execute.
    struct Recorder {
        calls: Cell<usize>,
        last_url: RefCell<Option<String>>,
        response: HttpResponse,
    }

    impl Recorder {
        fn replying(status: u16, body: &str) -> Self {
            Self {
                calls: Cell::new(0),
                last_url: RefCell::new(None),
                response: HttpResponse::new(status, body),
            }
        }
    }

    impl Transport for Recorder {
        fn execute(&self, request: &HttpRequest) -> ApiResult<HttpResponse> {
            self.calls.set(self.calls.get() + 1);
            *self.last_url.borrow_mut() = Some(request.url.clone());
            Ok(self.response.clone())
        }
    }

    fn api(recorder: Recorder) -> PostcodeApi<Recorder> {
        PostcodeApi::with_transport(PostcodeClient::new("http://mock"), recorder)
    }

    const LIST_OK: &str = r#"{"status":200,"result":[]}"#;

    #[test]
    fn lookup_decodes_result() {
        let api = api(Recorder::replying(
            200,
            r#"{"status":200,"result":{"postcode":"OX49GE","longitude":-1.1,"latitude":51.8}}"#,
        ));
        let postcode = api.lookup("OX49GE").unwrap();
        assert_eq!(postcode.postcode.as_deref(), Some("OX49GE"));
        assert_eq!(postcode.longitude, Some(-1.1));
        assert_eq!(postcode.latitude, Some(51.8));
        assert_eq!(
            api.transport.last_url.borrow().as_deref(),
            Some("http://mock/postcodes/OX49GE")
        );
    }

    #[test]
    fn lookup_not_found() {
        let api = api(Recorder::replying(404, r#"{"status":404,"error":"Postcode not found"}"#));
        let err = api.lookup("XX1 1XX").unwrap_err();
        assert!(matches!(err, ApiError::Upstream { status: 404, .. }));
        assert_eq!(err.message(), "Postcode not found");
    }

    #[test]
    fn oversized_limits_never_reach_the_transport() {
        let api = api(Recorder::replying(200, LIST_OK));
        for limit in [101, 500, u32::MAX] {
            assert!(api.query("OX49", Some(limit)).unwrap_err().is_validation());
            assert!(api.nearest("OX495NU", Some(limit), None).unwrap_err().is_validation());
            assert!(api.autocomplete("OX49", Some(limit)).unwrap_err().is_validation());
            assert!(api.place_query("Brightwell", Some(limit)).unwrap_err().is_validation());
        }
        assert!(api.nearest("OX495NU", None, Some(2_001)).unwrap_err().is_validation());
        assert_eq!(api.transport.calls.get(), 0);
    }

    #[test]
    fn bulk_lookup_bounds() {
        let api = api(Recorder::replying(200, LIST_OK));

        let err = api.bulk_lookup(&PostcodeBatch::default(), &[]).unwrap_err();
        assert_eq!(err.message(), "minimum of 1 postcode required");

        let over = PostcodeBatch::new((0..101).map(|i| format!("AB{i} 1CD")));
        let err = api.bulk_lookup(&over, &[]).unwrap_err();
        assert!(err.message().contains("maximum of 100"));
        assert_eq!(api.transport.calls.get(), 0);

        let ok = PostcodeBatch::new(["OX49 5NU"]);
        assert!(api.bulk_lookup(&ok, &[]).unwrap().is_empty());
        assert_eq!(api.transport.calls.get(), 1);
    }

    #[test]
    fn reverse_geocode_needs_both_coordinates() {
        let api = api(Recorder::replying(200, LIST_OK));
        assert!(api.reverse_geocode(&Geocode::new(0.0, 51.6)).is_err());
        assert!(api.reverse_geocode(&Geocode::new(-1.0, 0.0)).is_err());
        assert_eq!(api.transport.calls.get(), 0);
        assert!(api.reverse_geocode(&Geocode::new(-1.0, 51.6)).is_ok());
        assert_eq!(api.transport.calls.get(), 1);
    }

    #[test]
    fn repeated_lookups_are_identical() {
        let api = api(Recorder::replying(200, r#"{"status":200,"result":{"postcode":"OX49 5NU"}}"#));
        let first = api.lookup("OX49 5NU").unwrap();
        let second = api.lookup("OX49 5NU").unwrap();
        assert_eq!(first, second);
        assert_eq!(api.transport.calls.get(), 2);
    }

    #[test]
    fn closures_are_transports() {
        let api = PostcodeApi::with_transport(
            PostcodeClient::default(),
            |_: &HttpRequest| -> ApiResult<HttpResponse> {
                Ok(HttpResponse::new(200, r#"{"status":200,"result":["OX49 5NU","OX49 5NW"]}"#))
            },
        );
        assert_eq!(
            api.autocomplete("OX49 5N", None).unwrap(),
            vec!["OX49 5NU", "OX49 5NW"]
        );
    }

    #[test]
    fn with_config_rejects_bad_base_url() {
        let err = PostcodeApi::with_config(ClientConfig::default().with_base_url("nope"))
            .err()
            .unwrap();
        assert!(matches!(err, ApiError::Config(_)));
    }
}
