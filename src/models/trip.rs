use crate::models::{Activity, Coordinates, TravelTimeSource};
use serde::{Deserialize, Serialize};
use time::{Date, Duration, OffsetDateTime};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trip {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    pub start_date: Date,
    pub end_date: Date,
    pub budget: f64,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// One calendar day of a trip.
///
/// The optional starting location anchors the edge to the day's first
/// activity; its travel fields follow the same rules as an activity's
/// outbound edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Day {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub day_number: i32,
    pub date: Date,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_transport: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_travel_distance_km: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_travel_time_minutes: Option<i32>,
    pub start_travel_time_source: TravelTimeSource,
}

impl Day {
    pub fn start_coordinates(&self) -> Option<Coordinates> {
        Coordinates::from_parts(self.start_latitude, self.start_longitude)
    }
}

/// Inclusive date span for a trip's pre-populated days.
pub fn day_dates(start: Date, end: Date) -> Vec<Date> {
    let mut dates = Vec::new();
    let mut date = start;
    while date <= end {
        dates.push(date);
        date = date.saturating_add(Duration::days(1));
    }
    dates
}

/// Plan the day-number updates needed after removing day `removed_number`:
/// every later day shifts down by one, keeping numbers contiguous from 1.
pub fn renumbering_updates(days: &[Day], removed_number: i32) -> Vec<(Uuid, i32)> {
    days.iter()
        .filter(|d| d.day_number > removed_number)
        .map(|d| (d.id, d.day_number - 1))
        .collect()
}

// Request/response types for trip endpoints

#[derive(Debug, Deserialize)]
pub struct NewTripRequest {
    pub title: String,
    #[serde(default)]
    pub location: Option<String>,
    pub start_date: Date,
    pub end_date: Date,
    #[serde(default)]
    pub budget: Option<f64>,
}

impl NewTripRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title must not be empty".to_string());
        }
        if self.end_date < self.start_date {
            return Err("end_date must not precede start_date".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TripUpdateRequest {
    pub title: Option<String>,
    /// An empty string clears the location (and its coordinates)
    pub location: Option<String>,
    pub budget: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct DayWithActivities {
    #[serde(flatten)]
    pub day: Day,
    pub activities: Vec<Activity>,
}

#[derive(Debug, Serialize)]
pub struct TripDetails {
    #[serde(flatten)]
    pub trip: Trip,
    pub days: Vec<DayWithActivities>,
    pub checklists: Vec<crate::models::ChecklistWithItems>,
}
