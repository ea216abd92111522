use crate::models::{Coordinates, RoutingMode};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const GOOGLE_DIRECTIONS_BASE_URL: &str = "https://maps.googleapis.com/maps/api/directions/json";

/// Primary route between two stops.
#[derive(Debug, Clone, Serialize)]
pub struct RouteEstimate {
    pub distance_km: f64,
    pub duration_minutes: i32,
    /// Display strings as reported by the directions service, e.g. "15.2 km"
    pub distance_text: String,
    pub duration_text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteAlternative {
    pub distance_km: f64,
    pub duration_minutes: i32,
    pub distance_text: String,
    pub duration_text: String,
    /// Route label, e.g. "Via Federal Highway"
    pub summary: String,
}

/// Result of one directions query: the recommended route plus any
/// alternatives the service offered.
#[derive(Debug, Clone, Serialize)]
pub struct RouteQuote {
    pub primary: RouteEstimate,
    pub alternatives: Vec<RouteAlternative>,
}

/// Point-to-point routing.
///
/// Resolves to `None` on any failure (no route, network error, bad
/// credentials); errors never propagate past this boundary. Alternatives are
/// only populated for driving and only when requested.
#[async_trait]
pub trait RoutePlanner: Send + Sync {
    async fn route(
        &self,
        origin: Coordinates,
        destination: Coordinates,
        mode: RoutingMode,
        include_alternatives: bool,
    ) -> Option<RouteQuote>;
}

#[derive(Clone)]
pub struct GoogleDirectionsClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GoogleDirectionsClient {
    pub fn new(api_key: String) -> Self {
        GoogleDirectionsClient {
            client: Client::new(),
            api_key,
            base_url: GOOGLE_DIRECTIONS_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        GoogleDirectionsClient {
            client: Client::new(),
            api_key,
            base_url,
        }
    }
}

#[async_trait]
impl RoutePlanner for GoogleDirectionsClient {
    async fn route(
        &self,
        origin: Coordinates,
        destination: Coordinates,
        mode: RoutingMode,
        include_alternatives: bool,
    ) -> Option<RouteQuote> {
        // The directions service only produces alternatives for driving
        let alternatives = include_alternatives && mode == RoutingMode::Driving;

        tracing::debug!(
            origin = %origin,
            destination = %destination,
            mode = %mode,
            alternatives,
            "Directions request"
        );

        let origin_param = origin.to_string();
        let destination_param = destination.to_string();
        let response = match self
            .client
            .get(&self.base_url)
            .query(&[
                ("origin", origin_param.as_str()),
                ("destination", destination_param.as_str()),
                ("mode", mode.google_mode()),
                ("alternatives", if alternatives { "true" } else { "false" }),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Directions request failed: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "Directions HTTP error");
            return None;
        }

        let body: DirectionsApiResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Failed to parse directions response: {}", e);
                return None;
            }
        };

        if body.status != "OK" || body.routes.is_empty() {
            tracing::warn!(
                status = %body.status,
                mode = %mode,
                "No routes found for ({}) -> ({})",
                origin,
                destination
            );
            return None;
        }

        let primary = body.routes[0].legs.first().map(|leg| RouteEstimate {
            distance_km: leg.distance.value as f64 / 1000.0,
            duration_minutes: minutes_ceiling(leg.duration.value),
            distance_text: leg.distance.text.clone(),
            duration_text: leg.duration.text.clone(),
        })?;

        let alternatives = body.routes[1..]
            .iter()
            .filter_map(|route| {
                let leg = route.legs.first()?;
                Some(RouteAlternative {
                    distance_km: leg.distance.value as f64 / 1000.0,
                    duration_minutes: minutes_ceiling(leg.duration.value),
                    distance_text: leg.distance.text.clone(),
                    duration_text: leg.duration.text.clone(),
                    summary: if route.summary.is_empty() {
                        "Alternative route".to_string()
                    } else {
                        route.summary.clone()
                    },
                })
            })
            .collect();

        Some(RouteQuote {
            primary,
            alternatives,
        })
    }
}

/// Seconds to whole minutes, rounded up.
fn minutes_ceiling(seconds: u32) -> i32 {
    seconds.div_ceil(60) as i32
}

// Google Directions API response types

#[derive(Debug, Deserialize)]
struct DirectionsApiResponse {
    status: String,
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Deserialize)]
struct DirectionsRoute {
    #[serde(default)]
    summary: String,
    legs: Vec<DirectionsLeg>,
}

#[derive(Debug, Deserialize)]
struct DirectionsLeg {
    distance: DirectionsValue,
    duration: DirectionsValue,
}

#[derive(Debug, Deserialize)]
struct DirectionsValue {
    /// Meters for distances, seconds for durations
    value: u32,
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minutes_ceiling_rounds_up() {
        assert_eq!(minutes_ceiling(0), 0);
        assert_eq!(minutes_ceiling(59), 1);
        assert_eq!(minutes_ceiling(60), 1);
        assert_eq!(minutes_ceiling(61), 2);
        assert_eq!(minutes_ceiling(1500), 25);
    }

    #[test]
    fn test_new_uses_google_endpoint() {
        let client = GoogleDirectionsClient::new("test-key".to_string());
        assert_eq!(client.base_url, GOOGLE_DIRECTIONS_BASE_URL);
    }

    #[test]
    fn test_response_parsing_with_alternatives() {
        let json = r#"{
            "status": "OK",
            "routes": [
                {
                    "summary": "Jalan Tun Razak",
                    "legs": [{
                        "distance": {"value": 15240, "text": "15.2 km"},
                        "duration": {"value": 1510, "text": "25 mins"}
                    }]
                },
                {
                    "summary": "",
                    "legs": [{
                        "distance": {"value": 17100, "text": "17.1 km"},
                        "duration": {"value": 1740, "text": "29 mins"}
                    }]
                }
            ]
        }"#;
        let parsed: DirectionsApiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.status, "OK");
        assert_eq!(parsed.routes.len(), 2);
        assert_eq!(parsed.routes[0].legs[0].distance.value, 15240);
        assert_eq!(parsed.routes[1].summary, "");
    }

    #[test]
    fn test_distance_and_duration_conversions() {
        // 15240 m -> 15.24 km, no rounding; 1510 s -> 26 min (ceiling)
        assert_eq!(15240 as f64 / 1000.0, 15.24);
        assert_eq!(minutes_ceiling(1510), 26);
    }
}
