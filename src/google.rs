//! Google Maps HTTP adapter for geocoding and directions.
//!
//! Talks to the Geocoding and Directions JSON APIs with a blocking client.
//! Both APIs report failures through a `status` string alongside HTTP 200,
//! so the body is always parsed and the status checked.

use serde::Deserialize;
use tracing::debug;

use crate::config::GoogleMapsConfig;
use crate::error::ProviderError;
use crate::model::{GeocodeResult, Point};
use crate::traits::{DirectionsProvider, DirectionsRequest, DirectionsRoute, Geocoder, ProviderLeg};

const STATUS_OK: &str = "OK";

#[derive(Debug, Clone)]
pub struct GoogleMapsClient {
    config: GoogleMapsConfig,
    client: reqwest::blocking::Client,
}

impl GoogleMapsClient {
    pub fn new(config: GoogleMapsConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self { config, client })
    }

    fn endpoint(&self, api: &str) -> String {
        format!("{}/{}/json", self.config.base_url.trim_end_matches('/'), api)
    }

    fn get<T>(&self, url: &str, query: &[(&str, String)]) -> Result<T, ProviderError>
    where
        T: for<'de> Deserialize<'de>,
    {
        self.client
            .get(url)
            .query(query)
            .query(&[("key", self.config.api_key.as_str())])
            .send()
            .and_then(|resp| resp.error_for_status())
            .map_err(|err| transport_error(&err, url))?
            .json::<T>()
            .map_err(|err| ProviderError::Parse {
                message: err.to_string(),
            })
    }
}

impl Geocoder for GoogleMapsClient {
    fn geocode(&self, address: &str) -> Result<Vec<GeocodeResult>, ProviderError> {
        let url = self.endpoint("geocode");
        debug!(address, "calling geocoding API");
        let body: GeocodeResponse = self.get(&url, &[("address", address.to_string())])?;
        convert_geocode(body)
    }
}

impl DirectionsProvider for GoogleMapsClient {
    fn directions(&self, request: &DirectionsRequest) -> Result<DirectionsRoute, ProviderError> {
        let url = self.endpoint("directions");
        debug!(
            waypoints = request.waypoints.len(),
            optimize = request.optimize,
            "calling directions API"
        );
        let body: DirectionsResponse = self.get(&url, &directions_query(request))?;
        convert_directions(body)
    }
}

fn transport_error(err: &reqwest::Error, url: &str) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout {
            url: url.to_string(),
        }
    } else {
        ProviderError::Transport {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}

/// Query parameters for a directions call; the API key is added separately.
pub fn directions_query(request: &DirectionsRequest) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("origin", request.origin.to_query()),
        ("destination", request.destination.to_query()),
        ("mode", "driving".to_string()),
    ];

    if !request.waypoints.is_empty() {
        let points = request.waypoints.iter().map(Point::to_query);
        let waypoints: Vec<String> = if request.optimize {
            std::iter::once("optimize:true".to_string())
                .chain(points)
                .collect()
        } else {
            points.collect()
        };
        query.push(("waypoints", waypoints.join("|")));
    }

    query
}

fn status_error(status: String, message: Option<String>) -> ProviderError {
    ProviderError::Status {
        status,
        message: message.unwrap_or_default(),
    }
}

pub fn convert_geocode(response: GeocodeResponse) -> Result<Vec<GeocodeResult>, ProviderError> {
    if response.status != STATUS_OK {
        return Err(status_error(response.status, response.error_message));
    }

    Ok(response
        .results
        .into_iter()
        .map(|candidate| GeocodeResult {
            lat: candidate.geometry.location.lat,
            lng: candidate.geometry.location.lng,
            formatted_address: candidate.formatted_address,
        })
        .collect())
}

/// Takes the first route; Google only returns alternatives when asked.
pub fn convert_directions(response: DirectionsResponse) -> Result<DirectionsRoute, ProviderError> {
    if response.status != STATUS_OK {
        return Err(status_error(response.status, response.error_message));
    }

    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::Parse {
            message: "directions response has no routes".to_string(),
        })?;

    Ok(DirectionsRoute {
        legs: route
            .legs
            .into_iter()
            .map(|leg| ProviderLeg {
                distance_meters: leg.distance.value,
                distance_text: leg.distance.text,
                duration_seconds: leg.duration.value,
                duration_text: leg.duration.text,
            })
            .collect(),
        waypoint_order: route.waypoint_order,
    })
}

#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub results: Vec<GeocodeCandidate>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeCandidate {
    pub formatted_address: String,
    pub geometry: Geometry,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Deserialize)]
pub struct DirectionsResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
pub struct Route {
    #[serde(default)]
    pub legs: Vec<Leg>,
    #[serde(default)]
    pub waypoint_order: Vec<usize>,
}

#[derive(Debug, Deserialize)]
pub struct Leg {
    pub distance: TextValue,
    pub duration: TextValue,
}

#[derive(Debug, Deserialize)]
pub struct TextValue {
    pub text: String,
    pub value: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_geocode_success() {
        let json = r#"{
            "status": "OK",
            "results": [
                {
                    "formatted_address": "10 Downing St, London SW1A 2AA, UK",
                    "geometry": { "location": { "lat": 51.5033635, "lng": -0.1276248 } }
                }
            ]
        }"#;

        let response: GeocodeResponse = serde_json::from_str(json).expect("should deserialise");
        let results = convert_geocode(response).expect("should convert");

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].formatted_address, "10 Downing St, London SW1A 2AA, UK");
        assert_eq!(results[0].lat, 51.5033635);
        assert_eq!(results[0].lng, -0.1276248);
    }

    #[test]
    fn geocode_status_is_an_error() {
        let json = r#"{ "status": "ZERO_RESULTS", "results": [] }"#;
        let response: GeocodeResponse = serde_json::from_str(json).expect("should deserialise");

        assert_eq!(
            convert_geocode(response),
            Err(ProviderError::status("ZERO_RESULTS"))
        );
    }

    #[test]
    fn denied_request_keeps_message() {
        let json = r#"{
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid."
        }"#;
        let response: DirectionsResponse = serde_json::from_str(json).expect("should deserialise");

        match convert_directions(response) {
            Err(ProviderError::Status { status, message }) => {
                assert_eq!(status, "REQUEST_DENIED");
                assert_eq!(message, "The provided API key is invalid.");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[test]
    fn parses_directions_with_waypoint_order() {
        let json = r#"{
            "status": "OK",
            "routes": [
                {
                    "waypoint_order": [1, 0],
                    "legs": [
                        { "distance": { "text": "1.2 km", "value": 1234 }, "duration": { "text": "4 mins", "value": 240 } },
                        { "distance": { "text": "0.8 km", "value": 800 }, "duration": { "text": "2 mins", "value": 130 } },
                        { "distance": { "text": "3.1 km", "value": 3100 }, "duration": { "text": "7 mins", "value": 420 } }
                    ]
                }
            ]
        }"#;
        let response: DirectionsResponse = serde_json::from_str(json).expect("should deserialise");
        let route = convert_directions(response).expect("should convert");

        assert_eq!(route.waypoint_order, vec![1, 0]);
        assert_eq!(route.legs.len(), 3);
        assert_eq!(route.legs[0].distance_meters, 1234);
        assert_eq!(route.legs[2].duration_seconds, 420);
        assert_eq!(route.legs[1].duration_text, "2 mins");
    }

    #[test]
    fn ok_without_routes_is_a_parse_error() {
        let response: DirectionsResponse =
            serde_json::from_str(r#"{ "status": "OK", "routes": [] }"#).expect("should deserialise");

        assert!(matches!(
            convert_directions(response),
            Err(ProviderError::Parse { .. })
        ));
    }

    #[test]
    fn optimized_waypoints_query() {
        let request = DirectionsRequest {
            origin: Point::new(51.5, -0.1),
            destination: Point::new(51.6, -0.2),
            waypoints: vec![Point::new(51.55, -0.15), Point::new(51.52, -0.11)],
            optimize: true,
        };

        let query = directions_query(&request);

        assert!(query.contains(&("origin", "51.500000,-0.100000".to_string())));
        assert!(query.contains(&("destination", "51.600000,-0.200000".to_string())));
        assert!(query.contains(&(
            "waypoints",
            "optimize:true|51.550000,-0.150000|51.520000,-0.110000".to_string()
        )));
    }

    #[test]
    fn direct_route_has_no_waypoints_param() {
        let request = DirectionsRequest {
            origin: Point::new(1.0, 2.0),
            destination: Point::new(3.0, 4.0),
            waypoints: Vec::new(),
            optimize: false,
        };

        assert!(directions_query(&request).iter().all(|(key, _)| *key != "waypoints"));
    }

    #[test]
    fn endpoint_strips_trailing_slash() {
        let mut config = GoogleMapsConfig::new("key");
        config.base_url = "http://maps.example.com/api/".to_string();
        let client = GoogleMapsClient::new(config).expect("client should build");

        assert_eq!(client.endpoint("geocode"), "http://maps.example.com/api/geocode/json");
    }
}
