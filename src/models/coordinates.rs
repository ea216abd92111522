use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Result<Self, String> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(format!(
                "Invalid latitude: {} (must be between -90 and 90)",
                lat
            ));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(format!(
                "Invalid longitude: {} (must be between -180 and 180)",
                lng
            ));
        }
        Ok(Coordinates { lat, lng })
    }

    /// Build from the optional lat/lng column pair used throughout the
    /// schema. Returns `None` unless both halves are present and valid.
    pub fn from_parts(lat: Option<f64>, lng: Option<f64>) -> Option<Self> {
        match (lat, lng) {
            (Some(lat), Some(lng)) => Coordinates::new(lat, lng).ok(),
            _ => None,
        }
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_validation() {
        assert!(Coordinates::new(3.139, 101.6869).is_ok());
        assert!(Coordinates::new(91.0, 0.0).is_err()); // Invalid lat
        assert!(Coordinates::new(0.0, 181.0).is_err()); // Invalid lng
    }

    #[test]
    fn test_from_parts() {
        let coords = Coordinates::from_parts(Some(3.139), Some(101.6869));
        assert_eq!(
            coords,
            Some(Coordinates {
                lat: 3.139,
                lng: 101.6869
            })
        );

        assert!(Coordinates::from_parts(Some(3.139), None).is_none());
        assert!(Coordinates::from_parts(None, None).is_none());
        // Both present but out of range
        assert!(Coordinates::from_parts(Some(95.0), Some(0.0)).is_none());
    }

    #[test]
    fn test_display_is_lat_lng() {
        let coords = Coordinates::new(4.4721, 101.3788).unwrap();
        assert_eq!(coords.to_string(), "4.4721,101.3788");
    }
}
