use crate::db::{ItineraryRepository, TravelWrite};
use crate::error::{AppError, Result};
use crate::models::{Activity, Day, RoutingMode, TravelTimeSource};
use crate::services::directions::{RouteAlternative, RoutePlanner};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// What happened to a single edge during recomputation.
///
/// `Skipped` is the steady state for edges whose endpoints are not (yet)
/// geocoded or whose origin has no transport category; it is neither a
/// success nor a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeOutcome {
    Updated,
    Skipped,
    Failed,
}

/// Tally of a full-day recomputation sweep.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecalcSummary {
    pub updated: usize,
    pub failed: usize,
}

impl RecalcSummary {
    fn record(&mut self, outcome: EdgeOutcome) {
        match outcome {
            EdgeOutcome::Updated => self.updated += 1,
            EdgeOutcome::Failed => self.failed += 1,
            EdgeOutcome::Skipped => {}
        }
    }

    pub fn describe(&self) -> String {
        if self.failed == 0 {
            format!("Updated travel info for {} route segment(s)", self.updated)
        } else {
            format!(
                "Updated travel info for {} route segment(s), {} lookup(s) failed",
                self.updated, self.failed
            )
        }
    }
}

/// The route currently applied to an edge, as shown by the route picker.
#[derive(Debug, Clone, Serialize)]
pub struct SelectedRoute {
    pub distance_km: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<i32>,
    pub pinned: bool,
}

#[derive(Debug, Serialize)]
pub struct RouteChoices {
    pub current: SelectedRoute,
    pub alternatives: Vec<RouteAlternative>,
}

/// An edge's origin: either a day's starting location or an activity. The
/// destination is always the next activity in sequence.
enum EdgeOrigin<'a> {
    DayStart(&'a Day),
    Activity(&'a Activity),
}

impl EdgeOrigin<'_> {
    fn coordinates(&self) -> Option<crate::models::Coordinates> {
        match self {
            EdgeOrigin::DayStart(day) => day.start_coordinates(),
            EdgeOrigin::Activity(activity) => activity.coordinates(),
        }
    }

    fn transport(&self) -> Option<&str> {
        match self {
            EdgeOrigin::DayStart(day) => day.start_transport.as_deref(),
            EdgeOrigin::Activity(activity) => activity.transport.as_deref(),
        }
    }

    fn time_source(&self) -> TravelTimeSource {
        match self {
            EdgeOrigin::DayStart(day) => day.start_travel_time_source,
            EdgeOrigin::Activity(activity) => activity.travel_time_source,
        }
    }
}

/// Keeps the persisted travel distance/time of every edge consistent with
/// the current coordinates and transport categories of its endpoints.
#[derive(Clone)]
pub struct RecalculationEngine {
    repo: Arc<dyn ItineraryRepository>,
    planner: Arc<dyn RoutePlanner>,
}

impl RecalculationEngine {
    pub fn new(repo: Arc<dyn ItineraryRepository>, planner: Arc<dyn RoutePlanner>) -> Self {
        RecalculationEngine { repo, planner }
    }

    /// Recompute the edge from `origin` to the next activity `destination`.
    ///
    /// Distance is overwritten unconditionally on success; the travel time
    /// is only overwritten while the stored value is not user-pinned. On
    /// lookup failure the stored values are left as they were.
    pub(crate) async fn recompute_activity_edge(
        &self,
        origin: &Activity,
        destination: &Activity,
    ) -> Result<EdgeOutcome> {
        self.recompute_edge(EdgeOrigin::Activity(origin), destination)
            .await
    }

    /// Recompute the edge from a day's starting location to its first
    /// activity.
    pub(crate) async fn recompute_start_edge(
        &self,
        day: &Day,
        first: &Activity,
    ) -> Result<EdgeOutcome> {
        self.recompute_edge(EdgeOrigin::DayStart(day), first).await
    }

    async fn recompute_edge(
        &self,
        origin: EdgeOrigin<'_>,
        destination: &Activity,
    ) -> Result<EdgeOutcome> {
        // Absent coordinates or transport are a valid steady state, not an
        // error: the edge simply has nothing to compute yet.
        let (Some(origin_coords), Some(destination_coords), Some(category)) = (
            origin.coordinates(),
            destination.coordinates(),
            origin.transport(),
        ) else {
            return Ok(EdgeOutcome::Skipped);
        };

        let mode = RoutingMode::from_category(Some(category));

        let Some(quote) = self
            .planner
            .route(origin_coords, destination_coords, mode, false)
            .await
        else {
            // Keep whatever was stored; stale data beats a hole.
            tracing::warn!(
                destination = %destination.id,
                mode = %mode,
                "Route lookup failed, keeping stored travel info"
            );
            return Ok(EdgeOutcome::Failed);
        };

        let time = if origin.time_source().is_pinned() {
            None
        } else {
            Some((quote.primary.duration_minutes, TravelTimeSource::Auto))
        };
        let write = TravelWrite {
            distance_km: quote.primary.distance_km,
            time,
        };

        match origin {
            EdgeOrigin::DayStart(day) => {
                self.repo.set_day_start_travel(day.id, write).await?;
                tracing::debug!(
                    day = %day.id,
                    distance_km = quote.primary.distance_km,
                    "Updated start-of-day travel info"
                );
            }
            EdgeOrigin::Activity(activity) => {
                self.repo.set_activity_travel(activity.id, write).await?;
                tracing::debug!(
                    activity = %activity.id,
                    distance_km = quote.primary.distance_km,
                    "Updated outbound travel info"
                );
            }
        }

        Ok(EdgeOutcome::Updated)
    }

    /// Recompute every edge of a day: the starting-location edge first (when
    /// a starting location with a transport category exists), then each
    /// consecutive activity pair in order. Edges are processed sequentially;
    /// failures are tallied, never fatal.
    pub async fn recompute_day(&self, user_id: Uuid, day_id: Uuid) -> Result<RecalcSummary> {
        super::require_day_owner(self.repo.as_ref(), user_id, day_id).await?;
        self.recompute_day_unchecked(day_id).await
    }

    pub(crate) async fn recompute_day_unchecked(&self, day_id: Uuid) -> Result<RecalcSummary> {
        let day = self
            .repo
            .day(day_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Day not found".to_string()))?;
        let sequence = self.repo.activities_for_day(day_id).await?;

        let mut summary = RecalcSummary::default();

        if day.start_transport.is_some() {
            if let Some(first) = sequence.first() {
                summary.record(self.recompute_start_edge(&day, first).await?);
            }
        }

        for (origin, destination) in sequence.pairs() {
            summary.record(self.recompute_activity_edge(origin, destination).await?);
        }

        tracing::info!(day = %day_id, "{}", summary.describe());
        Ok(summary)
    }

    /// Fetch route alternatives for an activity's outbound edge. Unlike the
    /// automatic paths, missing data is an error here: the caller explicitly
    /// asked for routes.
    pub async fn list_alternatives(&self, user_id: Uuid, activity_id: Uuid) -> Result<RouteChoices> {
        super::require_activity_owner(self.repo.as_ref(), user_id, activity_id).await?;

        let activity = self
            .repo
            .activity(activity_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Activity not found".to_string()))?;
        let sequence = self.repo.activities_for_day(activity.day_id).await?;
        let next = sequence.successor(activity_id).ok_or_else(|| {
            AppError::InvalidRequest("Activity has no next stop to route to".to_string())
        })?;

        let origin = activity.coordinates().ok_or_else(|| {
            AppError::MissingCoordinates("Activity has no coordinates".to_string())
        })?;
        let destination = next.coordinates().ok_or_else(|| {
            AppError::MissingCoordinates("Next activity has no coordinates".to_string())
        })?;

        let mode = RoutingMode::from_category(activity.transport.as_deref());
        let quote = self
            .planner
            .route(origin, destination, mode, true)
            .await
            .ok_or_else(|| AppError::DirectionsApi("No route found".to_string()))?;

        // Prefer the stored values as "current"; fall back to the fresh
        // primary when the edge was never computed.
        let current = match activity.travel_distance_km {
            Some(distance_km) => SelectedRoute {
                distance_km,
                duration_minutes: activity.travel_time_minutes,
                pinned: activity.travel_time_source.is_pinned(),
            },
            None => SelectedRoute {
                distance_km: quote.primary.distance_km,
                duration_minutes: Some(quote.primary.duration_minutes),
                pinned: false,
            },
        };

        Ok(RouteChoices {
            current,
            alternatives: quote.alternatives,
        })
    }

    /// Apply a route the user picked from the alternatives: overwrite the
    /// edge's stored values and pin the travel time against automatic
    /// recomputation. No directions query happens here.
    pub async fn select_alternative(
        &self,
        user_id: Uuid,
        activity_id: Uuid,
        distance_km: f64,
        duration_minutes: i32,
    ) -> Result<()> {
        super::require_activity_owner(self.repo.as_ref(), user_id, activity_id).await?;

        if self.repo.activity(activity_id).await?.is_none() {
            return Err(AppError::NotFound("Activity not found".to_string()));
        }

        self.repo
            .set_activity_travel(
                activity_id,
                TravelWrite {
                    distance_km,
                    time: Some((duration_minutes, TravelTimeSource::Pinned)),
                },
            )
            .await?;

        tracing::info!(
            activity = %activity_id,
            distance_km,
            duration_minutes,
            "Applied user-selected route"
        );
        Ok(())
    }
}
