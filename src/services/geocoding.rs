use crate::models::Coordinates;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const GOOGLE_GEOCODE_BASE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Address-to-coordinates lookup.
///
/// Failure is silent by contract: a lookup that finds nothing, times out, or
/// is misconfigured resolves to `None` and never propagates an error. The
/// caller decides whether an absent result matters.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Option<Coordinates>;
}

#[derive(Clone)]
pub struct GoogleGeocoder {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GoogleGeocoder {
    pub fn new(api_key: String) -> Self {
        GoogleGeocoder {
            client: Client::new(),
            api_key,
            base_url: GOOGLE_GEOCODE_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        GoogleGeocoder {
            client: Client::new(),
            api_key,
            base_url,
        }
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn geocode(&self, address: &str) -> Option<Coordinates> {
        if address.trim().is_empty() {
            return None;
        }

        let response = match self
            .client
            .get(&self.base_url)
            .query(&[("address", address), ("key", self.api_key.as_str())])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Geocoding request failed for \"{}\": {}", address, e);
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(
                status = %response.status(),
                "Geocoding HTTP error for \"{}\"",
                address
            );
            return None;
        }

        let body: GeocodeApiResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Failed to parse geocoding response for \"{}\": {}", address, e);
                return None;
            }
        };

        if body.status != "OK" {
            tracing::warn!(
                "Geocoding returned status {} for \"{}\"",
                body.status,
                address
            );
            return None;
        }

        let location = body.results.first().map(|r| &r.geometry.location)?;
        match Coordinates::new(location.lat, location.lng) {
            Ok(coords) => Some(coords),
            Err(e) => {
                tracing::warn!("Geocoding returned invalid coordinates for \"{}\": {}", address, e);
                None
            }
        }
    }
}

// Google Geocoding API response types

#[derive(Debug, Deserialize)]
struct GeocodeApiResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: GeocodeGeometry,
}

#[derive(Debug, Deserialize)]
struct GeocodeGeometry {
    location: GeocodeLocation,
}

#[derive(Debug, Deserialize)]
struct GeocodeLocation {
    lat: f64,
    lng: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_google_endpoint() {
        let geocoder = GoogleGeocoder::new("test-key".to_string());
        assert_eq!(geocoder.base_url, GOOGLE_GEOCODE_BASE_URL);
    }

    #[test]
    fn test_with_base_url_override() {
        let geocoder = GoogleGeocoder::with_base_url(
            "test-key".to_string(),
            "http://localhost:4000/geocode".to_string(),
        );
        assert_eq!(geocoder.base_url, "http://localhost:4000/geocode");
    }

    #[tokio::test]
    async fn test_blank_address_short_circuits() {
        let geocoder = GoogleGeocoder::new("test-key".to_string());
        assert!(geocoder.geocode("").await.is_none());
        assert!(geocoder.geocode("   ").await.is_none());
    }

    #[test]
    fn test_response_parsing() {
        let json = r#"{
            "status": "OK",
            "results": [
                {"geometry": {"location": {"lat": 4.4721, "lng": 101.3788}}}
            ]
        }"#;
        let parsed: GeocodeApiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.status, "OK");
        assert_eq!(parsed.results[0].geometry.location.lat, 4.4721);
    }

    #[test]
    fn test_zero_results_parsing() {
        let json = r#"{"status": "ZERO_RESULTS", "results": []}"#;
        let parsed: GeocodeApiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.status, "ZERO_RESULTS");
        assert!(parsed.results.is_empty());
    }
}
