//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives every `PostcodeApi`
//! operation over real HTTP through `UreqTransport`. Validates that request
//! building, transport and envelope decoding agree with a server that speaks
//! the postcodes.io wire format.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use postcode_core::{
    ApiError, ClientConfig, Geocode, GeocodeBatch, PostcodeApi, PostcodeBatch,
};

/// Spawn the mock server on a background thread and return its address.
fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

fn api() -> PostcodeApi {
    let addr = start_server();
    let config = ClientConfig::default()
        .with_base_url(format!("http://{addr}"))
        .with_timeout(Duration::from_secs(10));
    PostcodeApi::with_config(config).unwrap()
}

#[test]
fn postcode_operations() {
    let api = api();

    // lookup, with and without the space
    let postcode = api.lookup("OX49 5NU").unwrap();
    assert_eq!(postcode.postcode.as_deref(), Some("OX49 5NU"));
    assert_eq!(postcode.outcode.as_deref(), Some("OX49"));
    assert_eq!(
        postcode.codes.as_ref().and_then(|c| c.admin_district.as_deref()),
        Some("E07000179")
    );
    assert_eq!(api.lookup("ox495nu").unwrap(), postcode);

    // unknown postcode
    let err = api.lookup("XX1 1XX").unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.message(), "Postcode not found");

    // validate
    assert!(api.validate("OX495NU").unwrap());
    assert!(!api.validate("XX11XX").unwrap());

    // query
    let hits = api.query("OX49", Some(1)).unwrap();
    assert_eq!(hits.len(), 1);
    assert!(api.query("ZZ", None).unwrap().is_empty());

    // autocomplete
    assert_eq!(
        api.autocomplete("OX49", None).unwrap(),
        vec!["OX49 5NU", "OX49 5NW"]
    );

    // nearest
    let nearest = api.nearest("OX49 5NU", Some(5), Some(200)).unwrap();
    assert_eq!(nearest.len(), 2);
    assert!(nearest.iter().all(|p| p.distance.is_some()));

    // random
    let random = api.random_postcode(Some("SW1A")).unwrap().unwrap();
    assert_eq!(random.postcode.as_deref(), Some("SW1A 2AA"));
    assert!(api.random_postcode(Some("ZZ9")).unwrap().is_none());
}

#[test]
fn bulk_operations() {
    let api = api();

    let batch = PostcodeBatch::new(["SW1A 2AA", "XX1 1XX", "OX49 5NU"]);
    let matches = api.bulk_lookup(&batch, &[]).unwrap();
    let queries: Vec<_> = matches.iter().map(|m| m.query.as_str()).collect();
    assert_eq!(queries, vec!["SW1A 2AA", "XX1 1XX", "OX49 5NU"]);
    assert!(matches[1].result.is_none());

    let filtered = api
        .bulk_lookup(&PostcodeBatch::new(["OX49 5NU"]), &["postcode"])
        .unwrap();
    let record = filtered[0].result.as_ref().unwrap();
    assert_eq!(record.postcode.as_deref(), Some("OX49 5NU"));
    assert!(record.longitude.is_none());

    let batch = GeocodeBatch::new([
        Geocode::new(-1.069752, 51.656144).with_limit(1),
        Geocode::new(-4.0, 50.0),
    ]);
    let matches = api.bulk_reverse_geocode(&batch, &[]).unwrap();
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].query.limit, Some(1));
    assert_eq!(matches[0].result.as_ref().unwrap().len(), 1);
    assert!(matches[1].result.is_none());
}

#[test]
fn reverse_geocoding() {
    let api = api();

    let postcodes = api
        .reverse_geocode(&Geocode::new(-1.069752, 51.656144))
        .unwrap();
    assert_eq!(postcodes[0].postcode.as_deref(), Some("OX49 5NU"));

    let far = api.reverse_geocode(&Geocode::new(-4.0, 50.0)).unwrap();
    assert!(far.is_empty());

    let wide = api
        .reverse_geocode(&Geocode::new(-1.0, 51.6).with_wide_search(true))
        .unwrap();
    assert!(wide.len() <= 10);
    assert!(!wide.is_empty());
}

#[test]
fn outcode_operations() {
    let api = api();

    let outcode = api.outcode_lookup("OX49").unwrap();
    assert_eq!(outcode.admin_county, vec!["Oxfordshire"]);

    let nearby = api
        .outcode_reverse_geocode(&Geocode::new(-1.04163, 51.64808))
        .unwrap();
    assert_eq!(nearby[0].outcode.as_deref(), Some("OX49"));

    let nearest = api.nearest_outcode("OX49", None, Some(25_000)).unwrap();
    assert!(nearest.iter().any(|o| o.outcode.as_deref() == Some("OX10")));

    let err = api.outcode_lookup("ZZ99").unwrap_err();
    assert_eq!(err.status(), 404);
}

#[test]
fn scottish_terminated_and_places() {
    let api = api();

    let scottish = api.scottish_lookup("EH99 1SP").unwrap();
    assert_eq!(
        scottish.scottish_parliamentary_constituency.as_deref(),
        Some("Edinburgh Central")
    );

    let terminated = api.terminated_lookup("E1W 1UU").unwrap();
    assert_eq!(terminated.year_terminated, Some(2015));
    assert_eq!(terminated.month_terminated, Some(2));

    let place = api.place_lookup("osgb4000000074564391").unwrap();
    assert_eq!(place.name_1.as_deref(), Some("Brightwell Baldwin"));
    assert!(place.name_2.is_none());

    let places = api.place_query("Brightwell", Some(1)).unwrap();
    assert_eq!(places.len(), 1);

    let random = api.random_place().unwrap();
    assert!(random.code.is_some());
}

#[test]
fn validation_failures_stay_local() {
    // Nothing listens here; a request would surface as a transport error.
    let config = ClientConfig::default().with_base_url("http://127.0.0.1:9");
    let api = PostcodeApi::with_config(config).unwrap();

    assert!(api.query("OX49", Some(101)).unwrap_err().is_validation());
    assert!(api.nearest("OX49 5NU", None, Some(2_001)).unwrap_err().is_validation());
    assert!(api
        .bulk_lookup(&PostcodeBatch::default(), &[])
        .unwrap_err()
        .is_validation());
    assert!(api
        .reverse_geocode(&Geocode::new(0.0, 51.5))
        .unwrap_err()
        .is_validation());
}

#[test]
fn connection_refused_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = ClientConfig::default()
        .with_base_url(format!("http://{addr}"))
        .with_timeout(Duration::from_secs(5));
    let api = PostcodeApi::with_config(config).unwrap();

    let err = api.lookup("OX49 5NU").unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    assert_eq!(err.status(), 500);
    let record = err.to_response_error();
    assert!(!record.error.starts_with("transport failure"), "{}", record.error);
}

#[test]
fn silent_server_hits_the_timeout() {
    // Connections complete in the backlog but nothing ever answers.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let config = ClientConfig::default()
        .with_base_url(format!("http://{addr}"))
        .with_timeout(Duration::from_millis(300));
    let api = PostcodeApi::with_config(config).unwrap();

    let started = Instant::now();
    let err = api.lookup("OX49 5NU").unwrap_err();
    assert!(started.elapsed() < Duration::from_secs(5), "{:?}", started.elapsed());
    assert!(matches!(err, ApiError::Transport(_)));
    assert_eq!(err.status(), 500);
    drop(listener);
}

#[test]
fn reserved_characters_do_not_reroute_requests() {
    let api = api();

    // Without escaping this would hit the validate endpoint and return a bool.
    let err = api.lookup("OX49 5NU/validate").unwrap_err();
    assert!(err.is_not_found());

    assert!(!api.validate("OX49?x").unwrap());
}

#[test]
fn repeated_calls_are_idempotent() {
    let api = api();
    let first = api.lookup("SW1A 2AA").unwrap();
    let second = api.lookup("SW1A 2AA").unwrap();
    assert_eq!(first, second);
}
