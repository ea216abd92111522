//! Shared fixtures: an in-memory itinerary store plus stub geocoding and
//! directions collaborators, so the recalculation and ordering logic can be
//! exercised without a database or network.

// Not every test binary uses every fixture
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;
use wayplan::db::{ItineraryRepository, TravelWrite};
use wayplan::error::Result;
use wayplan::models::{Activity, Coordinates, Day, DaySequence, RoutingMode, TravelTimeSource};
use wayplan::services::directions::{RouteEstimate, RoutePlanner, RouteQuote};
use wayplan::services::geocoding::Geocoder;

// ---------------------------------------------------------------------------
// In-memory itinerary store
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct InMemoryItinerary {
    pub days: Mutex<HashMap<Uuid, Day>>,
    pub activities: Mutex<HashMap<Uuid, Activity>>,
    /// trip id -> owner id
    pub owners: Mutex<HashMap<Uuid, Uuid>>,
}

impl InMemoryItinerary {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_trip(&self, owner_id: Uuid) -> Uuid {
        let trip_id = Uuid::new_v4();
        self.owners.lock().unwrap().insert(trip_id, owner_id);
        trip_id
    }

    pub fn add_day(&self, day: Day) {
        self.days.lock().unwrap().insert(day.id, day);
    }

    pub fn add_activity(&self, activity: Activity) {
        self.activities.lock().unwrap().insert(activity.id, activity);
    }

    pub fn day_snapshot(&self, id: Uuid) -> Day {
        self.days.lock().unwrap().get(&id).cloned().expect("day exists")
    }

    pub fn activity_snapshot(&self, id: Uuid) -> Activity {
        self.activities
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .expect("activity exists")
    }
}

#[async_trait]
impl ItineraryRepository for InMemoryItinerary {
    async fn day(&self, id: Uuid) -> Result<Option<Day>> {
        Ok(self.days.lock().unwrap().get(&id).cloned())
    }

    async fn day_owner(&self, day_id: Uuid) -> Result<Option<Uuid>> {
        let trip_id = match self.days.lock().unwrap().get(&day_id) {
            Some(day) => day.trip_id,
            None => return Ok(None),
        };
        Ok(self.owners.lock().unwrap().get(&trip_id).copied())
    }

    async fn activities_for_day(&self, day_id: Uuid) -> Result<DaySequence> {
        let activities: Vec<Activity> = self
            .activities
            .lock()
            .unwrap()
            .values()
            .filter(|a| a.day_id == day_id)
            .cloned()
            .collect();
        Ok(DaySequence::new(activities))
    }

    async fn activity(&self, id: Uuid) -> Result<Option<Activity>> {
        Ok(self.activities.lock().unwrap().get(&id).cloned())
    }

    async fn activity_owner(&self, activity_id: Uuid) -> Result<Option<Uuid>> {
        let day_id = match self.activities.lock().unwrap().get(&activity_id) {
            Some(activity) => activity.day_id,
            None => return Ok(None),
        };
        self.day_owner(day_id).await
    }

    async fn insert_activity(&self, activity: &Activity) -> Result<()> {
        self.activities
            .lock()
            .unwrap()
            .insert(activity.id, activity.clone());
        Ok(())
    }

    async fn update_activity(&self, activity: &Activity) -> Result<()> {
        self.activities
            .lock()
            .unwrap()
            .insert(activity.id, activity.clone());
        Ok(())
    }

    async fn delete_activity(&self, id: Uuid) -> Result<()> {
        self.activities.lock().unwrap().remove(&id);
        Ok(())
    }

    async fn update_day_start(&self, day: &Day) -> Result<()> {
        let mut days = self.days.lock().unwrap();
        if let Some(stored) = days.get_mut(&day.id) {
            stored.start_location = day.start_location.clone();
            stored.start_latitude = day.start_latitude;
            stored.start_longitude = day.start_longitude;
            stored.start_transport = day.start_transport.clone();
        }
        Ok(())
    }

    async fn set_activity_travel(&self, id: Uuid, travel: TravelWrite) -> Result<()> {
        let mut activities = self.activities.lock().unwrap();
        if let Some(activity) = activities.get_mut(&id) {
            activity.travel_distance_km = Some(travel.distance_km);
            if let Some((minutes, source)) = travel.time {
                activity.travel_time_minutes = Some(minutes);
                activity.travel_time_source = source;
            }
        }
        Ok(())
    }

    async fn set_day_start_travel(&self, day_id: Uuid, travel: TravelWrite) -> Result<()> {
        let mut days = self.days.lock().unwrap();
        if let Some(day) = days.get_mut(&day_id) {
            day.start_travel_distance_km = Some(travel.distance_km);
            if let Some((minutes, source)) = travel.time {
                day.start_travel_time_minutes = Some(minutes);
                day.start_travel_time_source = source;
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Stub directions service
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRoute {
    pub origin: Coordinates,
    pub destination: Coordinates,
    pub mode: RoutingMode,
    pub include_alternatives: bool,
}

/// Deterministic planner: quotes registered per (origin, destination) pair,
/// an optional fallback, and a switch that makes every lookup fail.
#[derive(Default)]
pub struct StubRoutePlanner {
    responses: Mutex<HashMap<String, RouteQuote>>,
    fallback: Mutex<Option<RouteQuote>>,
    fail_all: AtomicBool,
    pub calls: Mutex<Vec<RecordedRoute>>,
}

impl StubRoutePlanner {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn key(origin: Coordinates, destination: Coordinates) -> String {
        format!("{}->{}", origin, destination)
    }

    pub fn respond(&self, origin: Coordinates, destination: Coordinates, quote: RouteQuote) {
        self.responses
            .lock()
            .unwrap()
            .insert(Self::key(origin, destination), quote);
    }

    pub fn respond_all(&self, quote: RouteQuote) {
        *self.fallback.lock().unwrap() = Some(quote);
    }

    pub fn fail_all(&self) {
        self.fail_all.store(true, Ordering::SeqCst);
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl RoutePlanner for StubRoutePlanner {
    async fn route(
        &self,
        origin: Coordinates,
        destination: Coordinates,
        mode: RoutingMode,
        include_alternatives: bool,
    ) -> Option<RouteQuote> {
        self.calls.lock().unwrap().push(RecordedRoute {
            origin,
            destination,
            mode,
            include_alternatives,
        });

        if self.fail_all.load(Ordering::SeqCst) {
            return None;
        }
        let by_pair = self
            .responses
            .lock()
            .unwrap()
            .get(&Self::key(origin, destination))
            .cloned();
        by_pair.or_else(|| self.fallback.lock().unwrap().clone())
    }
}

/// Quote whose distance mirrors a directions leg of `meters` meters and
/// `seconds` seconds: km = meters / 1000, minutes = ceil(seconds / 60).
pub fn quote_from_leg(meters: u32, seconds: u32) -> RouteQuote {
    RouteQuote {
        primary: RouteEstimate {
            distance_km: meters as f64 / 1000.0,
            duration_minutes: seconds.div_ceil(60) as i32,
            distance_text: format!("{:.1} km", meters as f64 / 1000.0),
            duration_text: format!("{} mins", seconds.div_ceil(60)),
        },
        alternatives: Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Stub geocoder
// ---------------------------------------------------------------------------

/// Geocoder backed by a fixed address table; anything unknown fails.
#[derive(Default)]
pub struct StubGeocoder {
    known: Mutex<HashMap<String, Coordinates>>,
    pub calls: Mutex<Vec<String>>,
}

impl StubGeocoder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn know(&self, address: &str, lat: f64, lng: f64) {
        self.known
            .lock()
            .unwrap()
            .insert(address.to_string(), Coordinates::new(lat, lng).unwrap());
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn geocode(&self, address: &str) -> Option<Coordinates> {
        self.calls.lock().unwrap().push(address.to_string());
        self.known.lock().unwrap().get(address).copied()
    }
}

// ---------------------------------------------------------------------------
// Fixture builders
// ---------------------------------------------------------------------------

#[allow(dead_code)]
pub fn test_day(trip_id: Uuid) -> Day {
    Day {
        id: Uuid::new_v4(),
        trip_id,
        day_number: 1,
        date: time::macros::date!(2025 - 03 - 10),
        start_location: None,
        start_latitude: None,
        start_longitude: None,
        start_transport: None,
        start_travel_distance_km: None,
        start_travel_time_minutes: None,
        start_travel_time_source: TravelTimeSource::Unset,
    }
}

#[allow(dead_code)]
pub fn test_activity(
    day_id: Uuid,
    position: i32,
    coords: Option<(f64, f64)>,
    transport: Option<&str>,
) -> Activity {
    Activity {
        id: Uuid::new_v4(),
        day_id,
        position,
        title: format!("Stop {}", position),
        description: None,
        location: None,
        latitude: coords.map(|c| c.0),
        longitude: coords.map(|c| c.1),
        scheduled_time: None,
        duration_minutes: 60,
        cost: 0.0,
        icon: "MapPin".to_string(),
        color: "orange".to_string(),
        transport: transport.map(|t| t.to_string()),
        travel_distance_km: None,
        travel_time_minutes: None,
        travel_time_source: TravelTimeSource::Unset,
    }
}

#[allow(dead_code)]
pub fn coords(lat: f64, lng: f64) -> Coordinates {
    Coordinates::new(lat, lng).unwrap()
}
