mod common;

use common::{coords, quote_from_leg, test_activity, test_day, InMemoryItinerary, StubRoutePlanner};
use std::sync::Arc;
use uuid::Uuid;
use wayplan::db::ItineraryRepository;
use wayplan::error::AppError;
use wayplan::models::{RoutingMode, TravelTimeSource};
use wayplan::services::directions::{RouteAlternative, RoutePlanner};
use wayplan::services::recalculation::RecalculationEngine;

fn engine(
    repo: &Arc<InMemoryItinerary>,
    planner: &Arc<StubRoutePlanner>,
) -> RecalculationEngine {
    let repo: Arc<dyn ItineraryRepository> = repo.clone();
    let planner: Arc<dyn RoutePlanner> = planner.clone();
    RecalculationEngine::new(repo, planner)
}

#[tokio::test]
async fn recompute_day_populates_every_edge_from_directions_legs() {
    let repo = InMemoryItinerary::new();
    let planner = StubRoutePlanner::new();
    let owner = Uuid::new_v4();
    let trip_id = repo.add_trip(owner);

    let mut day = test_day(trip_id);
    day.start_location = Some("Hotel Majestic".to_string());
    day.start_latitude = Some(3.1390);
    day.start_longitude = Some(101.6869);
    day.start_transport = Some("driving".to_string());
    let day_id = day.id;
    repo.add_day(day);

    let a = test_activity(day_id, 0, Some((3.1478, 101.6953)), Some("walking"));
    let b = test_activity(day_id, 1, Some((3.1570, 101.7120)), Some("grab"));
    let c = test_activity(day_id, 2, Some((3.1619, 101.7180)), None);
    let (a_id, b_id, c_id) = (a.id, b.id, c.id);
    repo.add_activity(a);
    repo.add_activity(b);
    repo.add_activity(c);

    planner.respond(
        coords(3.1390, 101.6869),
        coords(3.1478, 101.6953),
        quote_from_leg(2500, 420),
    );
    planner.respond(
        coords(3.1478, 101.6953),
        coords(3.1570, 101.7120),
        quote_from_leg(3100, 2700),
    );
    planner.respond(
        coords(3.1570, 101.7120),
        coords(3.1619, 101.7180),
        quote_from_leg(900, 301),
    );

    let summary = engine(&repo, &planner)
        .recompute_day(owner, day_id)
        .await
        .unwrap();
    assert_eq!(summary.updated, 3);
    assert_eq!(summary.failed, 0);

    // Each stored distance is the leg's meters / 1000, each duration the
    // seconds rounded up to whole minutes
    let day = repo.day_snapshot(day_id);
    assert_eq!(day.start_travel_distance_km, Some(2.5));
    assert_eq!(day.start_travel_time_minutes, Some(7));
    assert_eq!(day.start_travel_time_source, TravelTimeSource::Auto);

    let a = repo.activity_snapshot(a_id);
    assert_eq!(a.travel_distance_km, Some(3.1));
    assert_eq!(a.travel_time_minutes, Some(45));

    let b = repo.activity_snapshot(b_id);
    assert_eq!(b.travel_distance_km, Some(0.9));
    assert_eq!(b.travel_time_minutes, Some(6)); // 301 s -> 6 min

    // The last stop has no outbound edge
    let c = repo.activity_snapshot(c_id);
    assert_eq!(c.travel_distance_km, None);
    assert_eq!(c.travel_time_minutes, None);

    // Modes follow each origin's transport category
    let calls = planner.calls.lock().unwrap();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0].mode, RoutingMode::Driving);
    assert_eq!(calls[1].mode, RoutingMode::Walking);
    assert_eq!(calls[2].mode, RoutingMode::Driving); // "grab"
    assert!(calls.iter().all(|c| !c.include_alternatives));
}

#[tokio::test]
async fn recompute_day_is_idempotent() {
    let repo = InMemoryItinerary::new();
    let planner = StubRoutePlanner::new();
    let owner = Uuid::new_v4();
    let trip_id = repo.add_trip(owner);

    let day = test_day(trip_id);
    let day_id = day.id;
    repo.add_day(day);

    let a = test_activity(day_id, 0, Some((3.1478, 101.6953)), Some("taxi"));
    let b = test_activity(day_id, 1, Some((3.1570, 101.7120)), None);
    let a_id = a.id;
    repo.add_activity(a);
    repo.add_activity(b);

    planner.respond_all(quote_from_leg(4200, 600));

    let engine = engine(&repo, &planner);
    let first = engine.recompute_day(owner, day_id).await.unwrap();
    let snapshot_after_first = repo.activity_snapshot(a_id);

    let second = engine.recompute_day(owner, day_id).await.unwrap();
    let snapshot_after_second = repo.activity_snapshot(a_id);

    assert_eq!(first, second);
    assert_eq!(
        snapshot_after_first.travel_distance_km,
        snapshot_after_second.travel_distance_km
    );
    assert_eq!(
        snapshot_after_first.travel_time_minutes,
        snapshot_after_second.travel_time_minutes
    );
}

#[tokio::test]
async fn pinned_time_survives_recompute_but_distance_updates() {
    let repo = InMemoryItinerary::new();
    let planner = StubRoutePlanner::new();
    let owner = Uuid::new_v4();
    let trip_id = repo.add_trip(owner);

    let day = test_day(trip_id);
    let day_id = day.id;
    repo.add_day(day);

    let a = test_activity(day_id, 0, Some((3.1478, 101.6953)), Some("driving"));
    let b = test_activity(day_id, 1, Some((3.1570, 101.7120)), None);
    let a_id = a.id;
    repo.add_activity(a);
    repo.add_activity(b);

    let engine = engine(&repo, &planner);

    // The user picks an alternative: 17.1 km / 29 min, pinned
    engine
        .select_alternative(owner, a_id, 17.1, 29)
        .await
        .unwrap();
    let a = repo.activity_snapshot(a_id);
    assert_eq!(a.travel_distance_km, Some(17.1));
    assert_eq!(a.travel_time_minutes, Some(29));
    assert_eq!(a.travel_time_source, TravelTimeSource::Pinned);

    // A later sweep refreshes the distance but must not touch the time
    planner.respond_all(quote_from_leg(15240, 1510));
    engine.recompute_day(owner, day_id).await.unwrap();

    let a = repo.activity_snapshot(a_id);
    assert_eq!(a.travel_distance_km, Some(15.24));
    assert_eq!(a.travel_time_minutes, Some(29));
    assert_eq!(a.travel_time_source, TravelTimeSource::Pinned);
}

#[tokio::test]
async fn start_edge_only_day_leaves_activity_without_outbound_edge() {
    let repo = InMemoryItinerary::new();
    let planner = StubRoutePlanner::new();
    let owner = Uuid::new_v4();
    let trip_id = repo.add_trip(owner);

    let mut day = test_day(trip_id);
    day.start_location = Some("Airport".to_string());
    day.start_latitude = Some(2.7456);
    day.start_longitude = Some(101.7099);
    day.start_transport = Some("driving".to_string());
    let day_id = day.id;
    repo.add_day(day);

    let a = test_activity(day_id, 0, Some((3.1390, 101.6869)), Some("driving"));
    let a_id = a.id;
    repo.add_activity(a);

    planner.respond_all(quote_from_leg(55300, 3000));

    let summary = engine(&repo, &planner)
        .recompute_day(owner, day_id)
        .await
        .unwrap();
    assert_eq!(summary.updated, 1);
    assert_eq!(summary.failed, 0);

    let day = repo.day_snapshot(day_id);
    assert_eq!(day.start_travel_distance_km, Some(55.3));
    assert_eq!(day.start_travel_time_minutes, Some(50));

    let a = repo.activity_snapshot(a_id);
    assert_eq!(a.travel_distance_km, None);
    assert_eq!(a.travel_time_minutes, None);
}

#[tokio::test]
async fn missing_destination_coordinates_skip_silently() {
    let repo = InMemoryItinerary::new();
    let planner = StubRoutePlanner::new();
    let owner = Uuid::new_v4();
    let trip_id = repo.add_trip(owner);

    let day = test_day(trip_id);
    let day_id = day.id;
    repo.add_day(day);

    // A (coords, walking) -> B (coords) -> C (no coords)
    let a = test_activity(day_id, 0, Some((3.1478, 101.6953)), Some("walking"));
    let b = test_activity(day_id, 1, Some((3.1570, 101.7120)), Some("walking"));
    let c = test_activity(day_id, 2, None, None);
    let (a_id, b_id, c_id) = (a.id, b.id, c.id);
    repo.add_activity(a);
    repo.add_activity(b);
    repo.add_activity(c);

    planner.respond_all(quote_from_leg(1800, 1320));

    let summary = engine(&repo, &planner)
        .recompute_day(owner, day_id)
        .await
        .unwrap();

    // A -> B computed; B -> C is a silent no-op, not a failure
    assert_eq!(summary.updated, 1);
    assert_eq!(summary.failed, 0);
    assert_eq!(planner.call_count(), 1);

    assert_eq!(repo.activity_snapshot(a_id).travel_distance_km, Some(1.8));
    assert_eq!(repo.activity_snapshot(b_id).travel_distance_km, None);
    assert_eq!(repo.activity_snapshot(c_id).travel_distance_km, None);
}

#[tokio::test]
async fn failed_lookup_keeps_stale_values_and_is_tallied() {
    let repo = InMemoryItinerary::new();
    let planner = StubRoutePlanner::new();
    let owner = Uuid::new_v4();
    let trip_id = repo.add_trip(owner);

    let day = test_day(trip_id);
    let day_id = day.id;
    repo.add_day(day);

    let mut a = test_activity(day_id, 0, Some((3.1478, 101.6953)), Some("driving"));
    a.travel_distance_km = Some(12.4);
    a.travel_time_minutes = Some(22);
    a.travel_time_source = TravelTimeSource::Auto;
    let b = test_activity(day_id, 1, Some((3.1570, 101.7120)), None);
    let a_id = a.id;
    repo.add_activity(a);
    repo.add_activity(b);

    planner.fail_all();

    let summary = engine(&repo, &planner)
        .recompute_day(owner, day_id)
        .await
        .unwrap();
    assert_eq!(summary.updated, 0);
    assert_eq!(summary.failed, 1);
    assert!(summary.describe().contains("1 lookup(s) failed"));

    // Stale values are kept, never cleared
    let a = repo.activity_snapshot(a_id);
    assert_eq!(a.travel_distance_km, Some(12.4));
    assert_eq!(a.travel_time_minutes, Some(22));
}

#[tokio::test]
async fn start_edge_requires_transport_category() {
    let repo = InMemoryItinerary::new();
    let planner = StubRoutePlanner::new();
    let owner = Uuid::new_v4();
    let trip_id = repo.add_trip(owner);

    // Starting location with coordinates but no transport category
    let mut day = test_day(trip_id);
    day.start_location = Some("Hotel".to_string());
    day.start_latitude = Some(3.1390);
    day.start_longitude = Some(101.6869);
    let day_id = day.id;
    repo.add_day(day);

    let a = test_activity(day_id, 0, Some((3.1478, 101.6953)), None);
    repo.add_activity(a);

    planner.respond_all(quote_from_leg(1000, 60));

    let summary = engine(&repo, &planner)
        .recompute_day(owner, day_id)
        .await
        .unwrap();
    assert_eq!(summary.updated, 0);
    assert_eq!(summary.failed, 0);
    assert_eq!(planner.call_count(), 0);
    assert_eq!(repo.day_snapshot(day_id).start_travel_distance_km, None);
}

#[tokio::test]
async fn list_alternatives_requires_successor_and_coordinates() {
    let repo = InMemoryItinerary::new();
    let planner = StubRoutePlanner::new();
    let owner = Uuid::new_v4();
    let trip_id = repo.add_trip(owner);

    let day = test_day(trip_id);
    let day_id = day.id;
    repo.add_day(day);

    let last = test_activity(day_id, 1, Some((3.1570, 101.7120)), Some("driving"));
    let blind = test_activity(day_id, 0, None, Some("driving"));
    let (last_id, blind_id) = (last.id, blind.id);
    repo.add_activity(last);
    repo.add_activity(blind);

    let engine = engine(&repo, &planner);

    // The last stop has nowhere to route to
    let err = engine.list_alternatives(owner, last_id).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidRequest(_)));

    // An explicit request for routes surfaces missing coordinates
    let err = engine.list_alternatives(owner, blind_id).await.unwrap_err();
    assert!(matches!(err, AppError::MissingCoordinates(_)));
}

#[tokio::test]
async fn list_alternatives_returns_current_and_alternatives() {
    let repo = InMemoryItinerary::new();
    let planner = StubRoutePlanner::new();
    let owner = Uuid::new_v4();
    let trip_id = repo.add_trip(owner);

    let day = test_day(trip_id);
    let day_id = day.id;
    repo.add_day(day);

    let a = test_activity(day_id, 0, Some((3.1478, 101.6953)), Some("driving"));
    let b = test_activity(day_id, 1, Some((3.1570, 101.7120)), None);
    let a_id = a.id;
    repo.add_activity(a);
    repo.add_activity(b);

    let mut quote = quote_from_leg(15240, 1510);
    quote.alternatives = vec![RouteAlternative {
        distance_km: 17.1,
        duration_minutes: 29,
        distance_text: "17.1 km".to_string(),
        duration_text: "29 mins".to_string(),
        summary: "Via Federal Highway".to_string(),
    }];
    planner.respond_all(quote);

    let engine = engine(&repo, &planner);

    // Nothing stored yet: current falls back to the fresh primary
    let choices = engine.list_alternatives(owner, a_id).await.unwrap();
    assert_eq!(choices.current.distance_km, 15.24);
    assert_eq!(choices.current.duration_minutes, Some(26));
    assert!(!choices.current.pinned);
    assert_eq!(choices.alternatives.len(), 1);
    assert_eq!(choices.alternatives[0].summary, "Via Federal Highway");

    // Alternatives were explicitly requested from the planner
    assert!(planner.calls.lock().unwrap()[0].include_alternatives);

    // After picking one, current reflects the stored (pinned) values
    engine
        .select_alternative(owner, a_id, 17.1, 29)
        .await
        .unwrap();
    let choices = engine.list_alternatives(owner, a_id).await.unwrap();
    assert_eq!(choices.current.distance_km, 17.1);
    assert_eq!(choices.current.duration_minutes, Some(29));
    assert!(choices.current.pinned);
}

#[tokio::test]
async fn select_alternative_unknown_activity_is_not_found() {
    let repo = InMemoryItinerary::new();
    let planner = StubRoutePlanner::new();

    let err = engine(&repo, &planner)
        .select_alternative(Uuid::new_v4(), Uuid::new_v4(), 1.0, 1)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn foreign_caller_is_rejected_before_any_side_effect() {
    let repo = InMemoryItinerary::new();
    let planner = StubRoutePlanner::new();
    let owner = Uuid::new_v4();
    let stranger = Uuid::new_v4();
    let trip_id = repo.add_trip(owner);

    let day = test_day(trip_id);
    let day_id = day.id;
    repo.add_day(day);

    let a = test_activity(day_id, 0, Some((3.1478, 101.6953)), Some("driving"));
    let b = test_activity(day_id, 1, Some((3.1570, 101.7120)), None);
    let a_id = a.id;
    repo.add_activity(a);
    repo.add_activity(b);

    planner.respond_all(quote_from_leg(1000, 60));
    let engine = engine(&repo, &planner);

    let err = engine.recompute_day(stranger, day_id).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let err = engine
        .select_alternative(stranger, a_id, 9.9, 9)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    // No lookup ran and nothing was written
    assert_eq!(planner.call_count(), 0);
    assert_eq!(repo.activity_snapshot(a_id).travel_distance_km, None);
}
