//! Fixed dataset served by the mock server.
//!
//! Records use the same JSON field names as postcodes.io. Coordinates are
//! close to the real ones but the set is tiny, so proximity results are
//! predictable in tests.

use serde_json::{json, Value};

pub struct Dataset {
    pub postcodes: Vec<Value>,
    pub outcodes: Vec<Value>,
    pub places: Vec<Value>,
    pub scottish: Vec<Value>,
    pub terminated: Vec<Value>,
}

/// Uppercase and strip whitespace, the way upstream compares postcodes.
pub fn normalize(code: &str) -> String {
    code.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

fn field_matches(record: &Value, field: &str, code: &str) -> bool {
    record[field]
        .as_str()
        .is_some_and(|value| normalize(value) == normalize(code))
}

impl Dataset {
    pub fn sample() -> Self {
        Self {
            postcodes: vec![
                json!({
                    "postcode": "OX49 5NU",
                    "outcode": "OX49",
                    "incode": "5NU",
                    "quality": 1,
                    "eastings": 464447,
                    "northings": 195647,
                    "country": "England",
                    "nhs_ha": "South Central",
                    "longitude": -1.069752,
                    "latitude": 51.656144,
                    "european_electoral_region": "South East",
                    "primary_care_trust": "Oxfordshire",
                    "region": "South East",
                    "lsoa": "South Oxfordshire 011B",
                    "msoa": "South Oxfordshire 011",
                    "parliamentary_constituency": "Henley",
                    "admin_district": "South Oxfordshire",
                    "parish": "Brightwell Baldwin",
                    "admin_county": "Oxfordshire",
                    "admin_ward": "Chalgrove",
                    "ced": "Chalgrove and Watlington",
                    "ccg": "NHS Oxfordshire",
                    "nuts": "Oxfordshire",
                    "codes": {
                        "admin_district": "E07000179",
                        "admin_county": "E10000025",
                        "admin_ward": "E05009735",
                        "parish": "E04008109",
                        "parliamentary_constituency": "E14000742",
                        "ccg": "E38000136",
                        "ccg_id": "10Q",
                        "ccg_code": "10Q",
                        "ced": "E58001238",
                        "nuts": "TLJ14",
                        "lsoa": "E01028601",
                        "msoa": "E02005968"
                    }
                }),
                json!({
                    "postcode": "OX49 5NW",
                    "outcode": "OX49",
                    "incode": "5NW",
                    "quality": 1,
                    "eastings": 464470,
                    "northings": 195685,
                    "country": "England",
                    "longitude": -1.069420,
                    "latitude": 51.656480,
                    "region": "South East",
                    "admin_district": "South Oxfordshire",
                    "parish": "Brightwell Baldwin",
                    "admin_county": "Oxfordshire"
                }),
                json!({
                    "postcode": "SW1A 2AA",
                    "outcode": "SW1A",
                    "incode": "2AA",
                    "quality": 1,
                    "eastings": 530047,
                    "northings": 179951,
                    "country": "England",
                    "longitude": -0.127695,
                    "latitude": 51.50354,
                    "region": "London",
                    "admin_district": "Westminster",
                    "admin_ward": "St James's",
                    "parliamentary_constituency": "Cities of London and Westminster"
                }),
                json!({
                    "postcode": "EH99 1SP",
                    "outcode": "EH99",
                    "incode": "1SP",
                    "quality": 1,
                    "eastings": 326896,
                    "northings": 673997,
                    "country": "Scotland",
                    "longitude": -3.174097,
                    "latitude": 55.952055,
                    "admin_district": "City of Edinburgh"
                }),
            ],
            outcodes: vec![
                json!({
                    "outcode": "OX49",
                    "longitude": -1.04163,
                    "latitude": 51.64808,
                    "northings": 194760,
                    "eastings": 466379,
                    "admin_district": ["South Oxfordshire"],
                    "parish": ["Brightwell Baldwin", "Chalgrove", "Watlington"],
                    "admin_county": ["Oxfordshire"],
                    "admin_ward": ["Chalgrove", "Watlington"],
                    "country": ["England"]
                }),
                json!({
                    "outcode": "OX10",
                    "longitude": -1.12506,
                    "latitude": 51.60119,
                    "northings": 189444,
                    "eastings": 460704,
                    "admin_district": ["South Oxfordshire"],
                    "admin_county": ["Oxfordshire"],
                    "country": ["England"]
                }),
                json!({
                    "outcode": "SW1A",
                    "longitude": -0.13251,
                    "latitude": 51.50456,
                    "northings": 180058,
                    "eastings": 529711,
                    "admin_district": ["Westminster"],
                    "country": ["England"]
                }),
            ],
            places: vec![
                json!({
                    "code": "osgb4000000074564391",
                    "name_1": "Brightwell Baldwin",
                    "name_1_lang": null,
                    "name_2": null,
                    "name_2_lang": null,
                    "local_type": "Village",
                    "outcode": "OX49",
                    "county_unitary": "Oxfordshire",
                    "county_unitary_type": "County",
                    "district_borough": "South Oxfordshire",
                    "district_borough_type": "District",
                    "region": "South East",
                    "country": "England",
                    "longitude": -1.05839,
                    "latitude": 51.63985,
                    "eastings": 465250,
                    "northings": 193840,
                    "min_eastings": 464900,
                    "min_northings": 193500,
                    "max_eastings": 465600,
                    "max_northings": 194200
                }),
                json!({
                    "code": "osgb4000000074559125",
                    "name_1": "Brightwell-cum-Sotwell",
                    "local_type": "Village",
                    "outcode": "OX10",
                    "county_unitary": "Oxfordshire",
                    "district_borough": "South Oxfordshire",
                    "region": "South East",
                    "country": "England",
                    "longitude": -1.16213,
                    "latitude": 51.61505,
                    "eastings": 458120,
                    "northings": 190970
                }),
            ],
            scottish: vec![json!({
                "postcode": "EH99 1SP",
                "scottish_parliamentary_constituency": "Edinburgh Central",
                "codes": {
                    "scottish_parliamentary_constituency": "S16000104"
                }
            })],
            terminated: vec![json!({
                "postcode": "E1W 1UU",
                "year_terminated": 2015,
                "month_terminated": 2,
                "longitude": -0.058801,
                "latitude": 51.507247
            })],
        }
    }

    pub fn postcode(&self, code: &str) -> Option<&Value> {
        self.postcodes
            .iter()
            .find(|p| field_matches(p, "postcode", code))
    }

    pub fn outcode(&self, code: &str) -> Option<&Value> {
        self.outcodes
            .iter()
            .find(|o| field_matches(o, "outcode", code))
    }

    pub fn place(&self, code: &str) -> Option<&Value> {
        self.places.iter().find(|p| p["code"] == code)
    }

    pub fn scottish(&self, code: &str) -> Option<&Value> {
        self.scottish
            .iter()
            .find(|p| field_matches(p, "postcode", code))
    }

    pub fn terminated(&self, code: &str) -> Option<&Value> {
        self.terminated
            .iter()
            .find(|p| field_matches(p, "postcode", code))
    }

    /// Postcodes whose normalized form starts with `prefix`, in sorted order.
    pub fn postcodes_with_prefix(&self, prefix: &str) -> Vec<&Value> {
        let prefix = normalize(prefix);
        let mut hits: Vec<&Value> = self
            .postcodes
            .iter()
            .filter(|p| p["postcode"].as_str().is_some_and(|c| normalize(c).starts_with(&prefix)))
            .collect();
        hits.sort_by_key(|p| p["postcode"].as_str().map(normalize));
        hits
    }

    pub fn places_matching(&self, query: &str) -> Vec<&Value> {
        let query = query.to_lowercase();
        self.places
            .iter()
            .filter(|p| {
                p["name_1"]
                    .as_str()
                    .is_some_and(|name| name.to_lowercase().starts_with(&query))
            })
            .collect()
    }
}

/// Approximate ground distance in meters (equirectangular projection).
pub fn distance_m(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    const EARTH_RADIUS_M: f64 = 6_371_000.0;
    let mean_lat = ((lat1 + lat2) / 2.0).to_radians();
    let x = (lon2 - lon1).to_radians() * mean_lat.cos();
    let y = (lat2 - lat1).to_radians();
    (x * x + y * y).sqrt() * EARTH_RADIUS_M
}

/// Records within `radius` meters of the point, nearest first, at most
/// `limit` of them, each with a `distance` field added.
pub fn nearest(records: &[Value], lon: f64, lat: f64, radius: f64, limit: usize) -> Vec<Value> {
    let mut hits: Vec<(f64, &Value)> = records
        .iter()
        .filter_map(|r| {
            let d = distance_m(lon, lat, r["longitude"].as_f64()?, r["latitude"].as_f64()?);
            (d <= radius).then_some((d, r))
        })
        .collect();
    hits.sort_by(|a, b| a.0.total_cmp(&b.0));
    hits.into_iter()
        .take(limit)
        .map(|(d, r)| {
            let mut record = r.clone();
            record["distance"] = json!(d);
            record
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_space_and_case() {
        assert_eq!(normalize(" ox49 5nu "), "OX495NU");
    }

    #[test]
    fn lookup_is_space_insensitive() {
        let data = Dataset::sample();
        assert!(data.postcode("ox495nu").is_some());
        assert!(data.postcode("OX49 5NU").is_some());
        assert!(data.postcode("XX1 1XX").is_none());
    }

    #[test]
    fn neighbours_are_sorted_by_distance() {
        let data = Dataset::sample();
        let hits = nearest(&data.postcodes, -1.069752, 51.656144, 100.0, 10);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0]["postcode"], "OX49 5NU");
        assert_eq!(hits[1]["postcode"], "OX49 5NW");
        assert!(hits[0]["distance"].as_f64().unwrap() < hits[1]["distance"].as_f64().unwrap());
    }

    #[test]
    fn prefix_search_sorts_results() {
        let data = Dataset::sample();
        let hits = data.postcodes_with_prefix("ox49");
        let codes: Vec<_> = hits.iter().map(|p| p["postcode"].as_str().unwrap()).collect();
        assert_eq!(codes, vec!["OX49 5NU", "OX49 5NW"]);
    }
}
