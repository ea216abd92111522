use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Travel mode accepted by the directions service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RoutingMode {
    #[default]
    Driving,
    Walking,
    Bicycling,
    Transit,
}

impl RoutingMode {
    /// Returns the Google Directions mode parameter for this routing mode
    pub fn google_mode(&self) -> &str {
        match self {
            RoutingMode::Driving => "driving",
            RoutingMode::Walking => "walking",
            RoutingMode::Bicycling => "bicycling",
            RoutingMode::Transit => "transit",
        }
    }

    /// Map a planner-level transport category to a routing mode.
    ///
    /// Total over any input: unknown or absent categories route as driving.
    /// Flight has no native equivalent in the directions service; transit is
    /// the closest approximation it offers.
    pub fn from_category(category: Option<&str>) -> Self {
        let Some(category) = category else {
            return RoutingMode::Driving;
        };
        match category.to_lowercase().as_str() {
            "walking" => RoutingMode::Walking,
            "grab" | "ride-hail" | "taxi" | "driving" => RoutingMode::Driving,
            "bus" | "train" | "flight" => RoutingMode::Transit,
            "bicycling" => RoutingMode::Bicycling,
            _ => RoutingMode::Driving,
        }
    }
}

impl fmt::Display for RoutingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.google_mode())
    }
}

impl FromStr for RoutingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "driving" => Ok(RoutingMode::Driving),
            "walking" => Ok(RoutingMode::Walking),
            "bicycling" | "cycling" => Ok(RoutingMode::Bicycling),
            "transit" => Ok(RoutingMode::Transit),
            _ => Err(format!("Invalid routing mode: '{}'", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_category_known_values() {
        assert_eq!(
            RoutingMode::from_category(Some("walking")),
            RoutingMode::Walking
        );
        assert_eq!(
            RoutingMode::from_category(Some("grab")),
            RoutingMode::Driving
        );
        assert_eq!(
            RoutingMode::from_category(Some("taxi")),
            RoutingMode::Driving
        );
        assert_eq!(
            RoutingMode::from_category(Some("driving")),
            RoutingMode::Driving
        );
        assert_eq!(RoutingMode::from_category(Some("bus")), RoutingMode::Transit);
        assert_eq!(
            RoutingMode::from_category(Some("train")),
            RoutingMode::Transit
        );
        assert_eq!(
            RoutingMode::from_category(Some("flight")),
            RoutingMode::Transit
        );
        assert_eq!(
            RoutingMode::from_category(Some("bicycling")),
            RoutingMode::Bicycling
        );
    }

    #[test]
    fn test_from_category_is_total() {
        assert_eq!(RoutingMode::from_category(None), RoutingMode::Driving);
        assert_eq!(RoutingMode::from_category(Some("")), RoutingMode::Driving);
        assert_eq!(
            RoutingMode::from_category(Some("hovercraft")),
            RoutingMode::Driving
        );
    }

    #[test]
    fn test_from_category_case_insensitive() {
        assert_eq!(
            RoutingMode::from_category(Some("Walking")),
            RoutingMode::Walking
        );
        assert_eq!(
            RoutingMode::from_category(Some("TRAIN")),
            RoutingMode::Transit
        );
    }

    #[test]
    fn test_google_mode() {
        assert_eq!(RoutingMode::Driving.google_mode(), "driving");
        assert_eq!(RoutingMode::Transit.google_mode(), "transit");
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "driving".parse::<RoutingMode>().unwrap(),
            RoutingMode::Driving
        );
        assert_eq!(
            "CYCLING".parse::<RoutingMode>().unwrap(),
            RoutingMode::Bicycling
        );
        assert!("teleport".parse::<RoutingMode>().is_err());
    }
}
