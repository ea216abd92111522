use crate::models::Coordinates;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Provenance of an edge's stored travel-time value.
///
/// `Auto` values may be overwritten by any later recomputation; `Pinned`
/// values were chosen explicitly by the user (route picker or manual entry)
/// and only another explicit choice may replace them. There is no path back
/// to `Unset` short of deleting the record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TravelTimeSource {
    #[default]
    Unset,
    Auto,
    Pinned,
}

impl TravelTimeSource {
    pub fn is_pinned(&self) -> bool {
        matches!(self, TravelTimeSource::Pinned)
    }
}

impl fmt::Display for TravelTimeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TravelTimeSource::Unset => write!(f, "unset"),
            TravelTimeSource::Auto => write!(f, "auto"),
            TravelTimeSource::Pinned => write!(f, "pinned"),
        }
    }
}

impl FromStr for TravelTimeSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unset" => Ok(TravelTimeSource::Unset),
            "auto" => Ok(TravelTimeSource::Auto),
            "pinned" => Ok(TravelTimeSource::Pinned),
            _ => Err(format!("Invalid travel time source: '{}'", s)),
        }
    }
}

/// A single stop within a day.
///
/// `position` is append-only and monotonic per day; it defines the sequence.
/// The travel fields describe the outbound edge to the next activity in
/// sequence, so the last activity of a day carries none.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub id: Uuid,
    pub day_id: Uuid,
    pub position: i32,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    /// Time of day as "HH:MM"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<String>,
    pub duration_minutes: i32,
    pub cost: f64,
    /// Presentation tags, opaque to the planner
    pub icon: String,
    pub color: String,
    /// Transport category for the edge to the next activity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travel_distance_km: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travel_time_minutes: Option<i32>,
    pub travel_time_source: TravelTimeSource,
}

impl Activity {
    pub fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::from_parts(self.latitude, self.longitude)
    }
}

/// A day's activities as an explicit ordered sequence.
///
/// Adjacency queries (`successor`, `predecessor`) replace re-deriving
/// neighbours by index arithmetic at every call site.
#[derive(Debug, Clone)]
pub struct DaySequence {
    activities: Vec<Activity>,
}

impl DaySequence {
    pub fn new(mut activities: Vec<Activity>) -> Self {
        activities.sort_by_key(|a| a.position);
        DaySequence { activities }
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn first(&self) -> Option<&Activity> {
        self.activities.first()
    }

    pub fn last(&self) -> Option<&Activity> {
        self.activities.last()
    }

    /// The activity immediately following `id` in sequence, if any.
    pub fn successor(&self, id: Uuid) -> Option<&Activity> {
        let idx = self.activities.iter().position(|a| a.id == id)?;
        self.activities.get(idx + 1)
    }

    /// The activity immediately preceding `id` in sequence, if any.
    pub fn predecessor(&self, id: Uuid) -> Option<&Activity> {
        let idx = self.activities.iter().position(|a| a.id == id)?;
        idx.checked_sub(1).and_then(|i| self.activities.get(i))
    }

    /// Position value for the next appended activity: max + 1, or 0 for an
    /// empty day.
    pub fn next_position(&self) -> i32 {
        self.activities.last().map_or(0, |a| a.position + 1)
    }

    /// Consecutive (origin, destination) pairs in sequence order.
    pub fn pairs(&self) -> impl Iterator<Item = (&Activity, &Activity)> {
        self.activities.windows(2).map(|w| (&w[0], &w[1]))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Activity> {
        self.activities.iter()
    }
}

// Request types for activity endpoints

#[derive(Debug, Deserialize)]
pub struct NewActivityRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// Explicit coordinates skip geocoding entirely
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub scheduled_time: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<i32>,
    #[serde(default)]
    pub cost: Option<f64>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub transport: Option<String>,
}

impl NewActivityRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title must not be empty".to_string());
        }
        if let Some(minutes) = self.duration_minutes {
            if minutes <= 0 {
                return Err("duration_minutes must be positive".to_string());
            }
        }
        Ok(())
    }
}

/// Partial update; absent fields are left untouched. An empty `location`
/// or `transport` string clears the stored value.
#[derive(Debug, Default, Deserialize)]
pub struct ActivityUpdateRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    /// Explicit coordinates win over re-geocoding the location text
    pub coordinates: Option<Coordinates>,
    pub scheduled_time: Option<String>,
    pub duration_minutes: Option<i32>,
    pub cost: Option<f64>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub transport: Option<String>,
    /// Directly entered travel distance for the outbound edge
    pub travel_distance_km: Option<f64>,
    /// Directly entered travel time; supplying it pins the value against
    /// automatic recomputation
    pub travel_time_minutes: Option<i32>,
}

/// Starting-location update for a day. An empty `location` clears the
/// starting location altogether.
#[derive(Debug, Default, Deserialize)]
pub struct StartingLocationRequest {
    pub location: String,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub transport: Option<String>,
}

/// Caller-chosen route applied to an activity's outbound edge.
#[derive(Debug, Deserialize)]
pub struct RouteSelectionRequest {
    pub distance_km: f64,
    pub duration_minutes: i32,
}

impl RouteSelectionRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.distance_km < 0.0 {
            return Err("distance_km must not be negative".to_string());
        }
        if self.duration_minutes < 0 {
            return Err("duration_minutes must not be negative".to_string());
        }
        Ok(())
    }
}
