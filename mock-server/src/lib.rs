//! A local stand-in for api.postcodes.io.
//!
//! Serves every endpoint the client uses from a fixed `Dataset`, wrapping
//! results in the same `{status, result}` envelope and failures in the same
//! `{status, error}` record as the real service.

pub mod fixtures;

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::debug;

pub use fixtures::Dataset;

pub type Db = Arc<Dataset>;
type Params = HashMap<String, String>;
type Reply = (StatusCode, Json<Value>);

const DEFAULT_LIMIT: usize = 10;
const DEFAULT_RADIUS: f64 = 100.0;
const WIDE_SEARCH_RADIUS: f64 = 20_000.0;
const WIDE_SEARCH_LIMIT: usize = 10;
const DEFAULT_OUTCODE_RADIUS: f64 = 5_000.0;

pub fn app() -> Router {
    let db: Db = Arc::new(Dataset::sample());
    Router::new()
        .route("/postcodes", get(search_postcodes).post(bulk_postcodes))
        .route("/postcodes/{postcode}", get(lookup_postcode))
        .route("/postcodes/{postcode}/validate", get(validate_postcode))
        .route("/postcodes/{postcode}/nearest", get(nearest_postcodes))
        .route("/postcodes/{postcode}/autocomplete", get(autocomplete))
        .route("/random/postcodes", get(random_postcode))
        .route("/outcodes", get(reverse_geocode_outcodes))
        .route("/outcodes/{outcode}", get(lookup_outcode))
        .route("/outcodes/{outcode}/nearest", get(nearest_outcodes))
        .route("/scotland/postcodes/{postcode}", get(lookup_scottish))
        .route("/terminated_postcodes/{postcode}", get(lookup_terminated))
        .route("/places", get(query_places))
        .route("/places/{code}", get(lookup_place))
        .route("/random/places", get(random_place))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn ok(result: impl Serialize) -> Reply {
    (StatusCode::OK, Json(json!({"status": 200, "result": result})))
}

fn fail(status: StatusCode, message: &str) -> Reply {
    (
        status,
        Json(json!({"status": status.as_u16(), "error": message})),
    )
}

fn ok_or_null(results: Vec<Value>) -> Reply {
    if results.is_empty() {
        ok(Value::Null)
    } else {
        ok(results)
    }
}

fn parse_param<T: std::str::FromStr>(params: &Params, key: &str) -> Result<Option<T>, Reply> {
    match params.get(key) {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| fail(StatusCode::BAD_REQUEST, &format!("Invalid {key} parameter"))),
    }
}

/// Apply the filter whitelist, if any, to a record.
fn filtered(record: &Value, filter: Option<&String>) -> Value {
    let Some(filter) = filter else {
        return record.clone();
    };
    let keep: Vec<&str> = filter.split(',').collect();
    match record.as_object() {
        Some(fields) => Value::Object(
            fields
                .iter()
                .filter(|(k, _)| keep.contains(&k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        ),
        None => record.clone(),
    }
}

struct Search {
    lon: f64,
    lat: f64,
    radius: f64,
    limit: usize,
}

impl Search {
    fn from_value(query: &Value) -> Option<Self> {
        let wide = query["widesearch"].as_bool().unwrap_or(false);
        Some(Self::new(
            query["longitude"].as_f64()?,
            query["latitude"].as_f64()?,
            query["limit"].as_u64().map(|l| l as usize),
            query["radius"].as_f64(),
            wide,
        ))
    }

    fn new(lon: f64, lat: f64, limit: Option<usize>, radius: Option<f64>, wide: bool) -> Self {
        if wide {
            return Self {
                lon,
                lat,
                radius: WIDE_SEARCH_RADIUS,
                limit: limit.unwrap_or(WIDE_SEARCH_LIMIT).min(WIDE_SEARCH_LIMIT),
            };
        }
        Self {
            lon,
            lat,
            radius: radius.unwrap_or(DEFAULT_RADIUS),
            limit: limit.unwrap_or(DEFAULT_LIMIT),
        }
    }
}

async fn search_postcodes(State(db): State<Db>, Query(params): Query<Params>) -> Reply {
    debug!(?params, "GET /postcodes");
    if let Some(q) = params.get("q") {
        let limit = match parse_param::<usize>(&params, "limit") {
            Ok(limit) => limit.unwrap_or(DEFAULT_LIMIT),
            Err(reply) => return reply,
        };
        let hits = db
            .postcodes_with_prefix(q)
            .into_iter()
            .take(limit)
            .cloned()
            .collect();
        return ok_or_null(hits);
    }

    let parsed = (|| {
        let lon = parse_param::<f64>(&params, "lon")?;
        let lat = parse_param::<f64>(&params, "lat")?;
        let limit = parse_param::<usize>(&params, "limit")?;
        let radius = parse_param::<f64>(&params, "radius")?;
        let wide = parse_param::<bool>(&params, "widesearch")?.unwrap_or(false);
        Ok::<_, Reply>((lon, lat, limit, radius, wide))
    })();
    match parsed {
        Ok((Some(lon), Some(lat), limit, radius, wide)) => {
            let search = Search::new(lon, lat, limit, radius, wide);
            ok_or_null(fixtures::nearest(
                &db.postcodes,
                search.lon,
                search.lat,
                search.radius,
                search.limit,
            ))
        }
        Ok(_) => fail(
            StatusCode::BAD_REQUEST,
            "No postcode query submitted. Remember to include query parameter",
        ),
        Err(reply) => reply,
    }
}

async fn bulk_postcodes(
    State(db): State<Db>,
    Query(params): Query<Params>,
    Json(body): Json<Value>,
) -> Reply {
    let filter = params.get("filter");
    if let Some(postcodes) = body["postcodes"].as_array() {
        let results: Vec<Value> = postcodes
            .iter()
            .map(|query| {
                let result = query
                    .as_str()
                    .and_then(|code| db.postcode(code))
                    .map(|record| filtered(record, filter));
                json!({"query": query, "result": result})
            })
            .collect();
        return ok(results);
    }

    if let Some(geolocations) = body["geolocations"].as_array() {
        let results: Vec<Value> = geolocations
            .iter()
            .map(|query| {
                let hits = Search::from_value(query)
                    .map(|s| fixtures::nearest(&db.postcodes, s.lon, s.lat, s.radius, s.limit))
                    .unwrap_or_default();
                let result = if hits.is_empty() {
                    Value::Null
                } else {
                    Value::Array(hits.iter().map(|r| filtered(r, filter)).collect())
                };
                json!({"query": query, "result": result})
            })
            .collect();
        return ok(results);
    }

    fail(
        StatusCode::BAD_REQUEST,
        "Invalid JSON submitted. You need to submit a JSON object with an array of postcodes or geolocation objects",
    )
}

async fn lookup_postcode(State(db): State<Db>, Path(postcode): Path<String>) -> Reply {
    match db.postcode(&postcode) {
        Some(record) => ok(record),
        None => fail(StatusCode::NOT_FOUND, "Postcode not found"),
    }
}

async fn validate_postcode(State(db): State<Db>, Path(postcode): Path<String>) -> Reply {
    ok(db.postcode(&postcode).is_some())
}

async fn nearest_postcodes(
    State(db): State<Db>,
    Path(postcode): Path<String>,
    Query(params): Query<Params>,
) -> Reply {
    let Some(origin) = db.postcode(&postcode) else {
        return fail(StatusCode::NOT_FOUND, "Postcode not found");
    };
    let (limit, radius) = match (
        parse_param::<usize>(&params, "limit"),
        parse_param::<f64>(&params, "radius"),
    ) {
        (Ok(limit), Ok(radius)) => (limit, radius),
        (Err(reply), _) | (_, Err(reply)) => return reply,
    };
    let (Some(lon), Some(lat)) = (origin["longitude"].as_f64(), origin["latitude"].as_f64()) else {
        return ok(Value::Null);
    };
    let search = Search::new(lon, lat, limit, radius, false);
    ok_or_null(fixtures::nearest(
        &db.postcodes,
        search.lon,
        search.lat,
        search.radius,
        search.limit,
    ))
}

async fn autocomplete(
    State(db): State<Db>,
    Path(postcode): Path<String>,
    Query(params): Query<Params>,
) -> Reply {
    let limit = match parse_param::<usize>(&params, "limit") {
        Ok(limit) => limit.unwrap_or(DEFAULT_LIMIT),
        Err(reply) => return reply,
    };
    let codes: Vec<Value> = db
        .postcodes_with_prefix(&postcode)
        .into_iter()
        .take(limit)
        .map(|p| p["postcode"].clone())
        .collect();
    ok_or_null(codes)
}

/// Deterministic: always the first match, so tests can assert on it.
async fn random_postcode(State(db): State<Db>, Query(params): Query<Params>) -> Reply {
    let pick = match params.get("outcode") {
        Some(outcode) => db
            .postcodes
            .iter()
            .find(|p| p["outcode"].as_str().is_some_and(|o| o.eq_ignore_ascii_case(outcode))),
        None => db.postcodes.first(),
    };
    ok(pick)
}

async fn lookup_outcode(State(db): State<Db>, Path(outcode): Path<String>) -> Reply {
    match db.outcode(&outcode) {
        Some(record) => ok(record),
        None => fail(StatusCode::NOT_FOUND, "Outcode not found"),
    }
}

async fn reverse_geocode_outcodes(State(db): State<Db>, Query(params): Query<Params>) -> Reply {
    let parsed = (|| {
        let lon = parse_param::<f64>(&params, "lon")?;
        let lat = parse_param::<f64>(&params, "lat")?;
        let limit = parse_param::<usize>(&params, "limit")?;
        let radius = parse_param::<f64>(&params, "radius")?;
        Ok::<_, Reply>((lon, lat, limit, radius))
    })();
    match parsed {
        Ok((Some(lon), Some(lat), limit, radius)) => ok_or_null(fixtures::nearest(
            &db.outcodes,
            lon,
            lat,
            radius.unwrap_or(DEFAULT_OUTCODE_RADIUS),
            limit.unwrap_or(DEFAULT_LIMIT),
        )),
        Ok(_) => fail(
            StatusCode::BAD_REQUEST,
            "Invalid longitude/latitude submitted",
        ),
        Err(reply) => reply,
    }
}

async fn nearest_outcodes(
    State(db): State<Db>,
    Path(outcode): Path<String>,
    Query(params): Query<Params>,
) -> Reply {
    let Some(origin) = db.outcode(&outcode) else {
        return fail(StatusCode::NOT_FOUND, "Outcode not found");
    };
    let (limit, radius) = match (
        parse_param::<usize>(&params, "limit"),
        parse_param::<f64>(&params, "radius"),
    ) {
        (Ok(limit), Ok(radius)) => (limit, radius),
        (Err(reply), _) | (_, Err(reply)) => return reply,
    };
    let (Some(lon), Some(lat)) = (origin["longitude"].as_f64(), origin["latitude"].as_f64()) else {
        return ok(Value::Null);
    };
    ok_or_null(fixtures::nearest(
        &db.outcodes,
        lon,
        lat,
        radius.unwrap_or(DEFAULT_OUTCODE_RADIUS),
        limit.unwrap_or(DEFAULT_LIMIT),
    ))
}

async fn lookup_scottish(State(db): State<Db>, Path(postcode): Path<String>) -> Reply {
    if let Some(record) = db.scottish(&postcode) {
        return ok(record);
    }
    match db.postcode(&postcode) {
        Some(_) => fail(StatusCode::NOT_FOUND, "Postcode exists in ONSPD but not in SPD"),
        None => fail(StatusCode::NOT_FOUND, "Postcode not found"),
    }
}

async fn lookup_terminated(State(db): State<Db>, Path(postcode): Path<String>) -> Reply {
    match db.terminated(&postcode) {
        Some(record) => ok(record),
        None => fail(StatusCode::NOT_FOUND, "Terminated postcode not found"),
    }
}

async fn lookup_place(State(db): State<Db>, Path(code): Path<String>) -> Reply {
    match db.place(&code) {
        Some(record) => ok(record),
        None => fail(StatusCode::NOT_FOUND, "Place not found"),
    }
}

async fn query_places(State(db): State<Db>, Query(params): Query<Params>) -> Reply {
    let Some(q) = params.get("q") else {
        return fail(
            StatusCode::BAD_REQUEST,
            "No query submitted. Remember to include query parameter",
        );
    };
    let limit = match parse_param::<usize>(&params, "limit") {
        Ok(limit) => limit.unwrap_or(DEFAULT_LIMIT),
        Err(reply) => return reply,
    };
    let hits = db
        .places_matching(q)
        .into_iter()
        .take(limit)
        .cloned()
        .collect();
    ok_or_null(hits)
}

async fn random_place(State(db): State<Db>) -> Reply {
    ok(db.places.first())
}
