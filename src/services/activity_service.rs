use crate::constants::{
    DEFAULT_ACTIVITY_COLOR, DEFAULT_ACTIVITY_DURATION_MINUTES, DEFAULT_ACTIVITY_ICON,
};
use crate::db::ItineraryRepository;
use crate::error::{AppError, Result};
use crate::models::{
    Activity, ActivityUpdateRequest, Coordinates, Day, NewActivityRequest, StartingLocationRequest,
    TravelTimeSource,
};
use crate::services::geocoding::Geocoder;
use crate::services::recalculation::RecalculationEngine;
use std::sync::Arc;
use uuid::Uuid;

/// Structural mutations of a day's itinerary: append-ordered inserts,
/// edits with re-geocoding, deletes, and starting-location changes. Every
/// mutation that moves a stop or changes how it is reached hands the
/// affected edges to the recalculation engine.
#[derive(Clone)]
pub struct ActivityService {
    repo: Arc<dyn ItineraryRepository>,
    geocoder: Arc<dyn Geocoder>,
    engine: RecalculationEngine,
    recompute_on_delete: bool,
}

impl ActivityService {
    pub fn new(
        repo: Arc<dyn ItineraryRepository>,
        geocoder: Arc<dyn Geocoder>,
        engine: RecalculationEngine,
        recompute_on_delete: bool,
    ) -> Self {
        ActivityService {
            repo,
            geocoder,
            engine,
            recompute_on_delete,
        }
    }

    /// Append an activity at the end of a day.
    ///
    /// The new stop takes the next monotonic position; there is no insert-
    /// in-the-middle. Afterwards the edge reaching the new stop is
    /// recomputed: from the day's starting location when the day was empty,
    /// from the previous last activity otherwise.
    pub async fn append(
        &self,
        user_id: Uuid,
        day_id: Uuid,
        request: NewActivityRequest,
    ) -> Result<Activity> {
        super::require_day_owner(self.repo.as_ref(), user_id, day_id).await?;

        let sequence = self.repo.activities_for_day(day_id).await?;
        let was_empty = sequence.is_empty();
        let predecessor = sequence.last().cloned();

        let coordinates = self
            .resolve_coordinates(request.coordinates, request.location.as_deref())
            .await;

        let activity = Activity {
            id: Uuid::new_v4(),
            day_id,
            position: sequence.next_position(),
            title: request.title,
            description: request.description,
            location: request.location.filter(|l| !l.trim().is_empty()),
            latitude: coordinates.map(|c| c.lat),
            longitude: coordinates.map(|c| c.lng),
            scheduled_time: request.scheduled_time,
            duration_minutes: request
                .duration_minutes
                .unwrap_or(DEFAULT_ACTIVITY_DURATION_MINUTES),
            cost: request.cost.unwrap_or(0.0),
            icon: request
                .icon
                .unwrap_or_else(|| DEFAULT_ACTIVITY_ICON.to_string()),
            color: request
                .color
                .unwrap_or_else(|| DEFAULT_ACTIVITY_COLOR.to_string()),
            transport: request.transport.filter(|t| !t.trim().is_empty()),
            travel_distance_km: None,
            travel_time_minutes: None,
            travel_time_source: TravelTimeSource::Unset,
        };

        self.repo.insert_activity(&activity).await?;
        tracing::info!(activity = %activity.id, day = %day_id, position = activity.position, "Appended activity");

        if was_empty {
            if let Some(day) = self.repo.day(day_id).await? {
                self.engine.recompute_start_edge(&day, &activity).await?;
            }
        } else if let Some(predecessor) = predecessor {
            self.engine
                .recompute_activity_edge(&predecessor, &activity)
                .await?;
        }

        Ok(activity)
    }

    /// Apply a partial edit to an activity.
    ///
    /// Explicitly supplied coordinates are taken as-is; otherwise a changed
    /// location text is re-geocoded, and a failed geocode (or an emptied
    /// location) clears the stored coordinates. When the stop moved or its
    /// transport category changed, the edge reaching it and the edge leaving
    /// it are recomputed, in that order.
    pub async fn update(
        &self,
        user_id: Uuid,
        activity_id: Uuid,
        request: ActivityUpdateRequest,
    ) -> Result<Activity> {
        super::require_activity_owner(self.repo.as_ref(), user_id, activity_id).await?;

        let mut activity = self
            .repo
            .activity(activity_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Activity not found".to_string()))?;

        let mut coordinates_touched = false;
        let mut transport_changed = false;

        if let Some(title) = request.title {
            activity.title = title;
        }
        if let Some(description) = request.description {
            activity.description = Some(description).filter(|d| !d.is_empty());
        }
        if let Some(scheduled_time) = request.scheduled_time {
            activity.scheduled_time = Some(scheduled_time).filter(|t| !t.is_empty());
        }
        if let Some(duration_minutes) = request.duration_minutes {
            activity.duration_minutes = duration_minutes;
        }
        if let Some(cost) = request.cost {
            activity.cost = cost;
        }
        if let Some(icon) = request.icon {
            activity.icon = icon;
        }
        if let Some(color) = request.color {
            activity.color = color;
        }

        if let Some(coordinates) = request.coordinates {
            // Explicit coordinates win; no re-geocoding
            activity.latitude = Some(coordinates.lat);
            activity.longitude = Some(coordinates.lng);
            if let Some(location) = request.location {
                activity.location = Some(location).filter(|l| !l.trim().is_empty());
            }
            coordinates_touched = true;
        } else if let Some(location) = request.location {
            let trimmed = location.trim();
            if trimmed.is_empty() {
                if activity.location.is_some() {
                    activity.location = None;
                    activity.latitude = None;
                    activity.longitude = None;
                    coordinates_touched = true;
                }
            } else if activity.location.as_deref() != Some(trimmed) {
                match self.geocoder.geocode(trimmed).await {
                    Some(coords) => {
                        activity.latitude = Some(coords.lat);
                        activity.longitude = Some(coords.lng);
                    }
                    None => {
                        tracing::warn!(
                            activity = %activity.id,
                            "Geocoding failed for \"{}\", clearing coordinates",
                            trimmed
                        );
                        activity.latitude = None;
                        activity.longitude = None;
                    }
                }
                activity.location = Some(trimmed.to_string());
                coordinates_touched = true;
            }
        }

        if let Some(transport) = request.transport {
            let new_transport = Some(transport).filter(|t| !t.trim().is_empty());
            if new_transport != activity.transport {
                activity.transport = new_transport;
                transport_changed = true;
            }
        }

        if let Some(distance_km) = request.travel_distance_km {
            activity.travel_distance_km = Some(distance_km);
        }
        if let Some(minutes) = request.travel_time_minutes {
            // A directly entered travel time is pinned: later automatic
            // recomputation must not overwrite it
            activity.travel_time_minutes = Some(minutes);
            activity.travel_time_source = TravelTimeSource::Pinned;
        }

        self.repo.update_activity(&activity).await?;

        if coordinates_touched || transport_changed {
            self.recompute_adjacent_edges(&activity).await?;
        }

        Ok(activity)
    }

    /// Recompute the edge reaching this activity, then the edge leaving it.
    /// For the day's first activity the inbound edge comes from the day's
    /// starting location.
    async fn recompute_adjacent_edges(&self, activity: &Activity) -> Result<()> {
        let sequence = self.repo.activities_for_day(activity.day_id).await?;

        match sequence.predecessor(activity.id) {
            Some(predecessor) => {
                self.engine
                    .recompute_activity_edge(predecessor, activity)
                    .await?;
            }
            None => {
                if let Some(day) = self.repo.day(activity.day_id).await? {
                    self.engine.recompute_start_edge(&day, activity).await?;
                }
            }
        }

        if let Some(successor) = sequence.successor(activity.id) {
            self.engine
                .recompute_activity_edge(activity, successor)
                .await?;
        }

        Ok(())
    }

    /// Delete an activity. The former predecessor's outbound edge is only
    /// recomputed when the service was configured for it; otherwise the
    /// stale annotation stays until the next explicit recalculation.
    pub async fn remove(&self, user_id: Uuid, activity_id: Uuid) -> Result<()> {
        super::require_activity_owner(self.repo.as_ref(), user_id, activity_id).await?;

        let activity = self
            .repo
            .activity(activity_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Activity not found".to_string()))?;

        self.repo.delete_activity(activity_id).await?;
        tracing::info!(activity = %activity_id, day = %activity.day_id, "Deleted activity");

        if self.recompute_on_delete {
            self.recompute_after_removal(&activity).await?;
        }

        Ok(())
    }

    /// Close the gap left by a removed stop: recompute the edge from its
    /// former predecessor (or the day's starting location) to its former
    /// successor, both resolved from the pruned sequence.
    async fn recompute_after_removal(&self, removed: &Activity) -> Result<()> {
        let sequence = self.repo.activities_for_day(removed.day_id).await?;

        let predecessor = sequence
            .iter()
            .filter(|a| a.position < removed.position)
            .last();
        let successor = sequence.iter().find(|a| a.position > removed.position);

        match (predecessor, successor) {
            (Some(predecessor), Some(successor)) => {
                self.engine
                    .recompute_activity_edge(predecessor, successor)
                    .await?;
            }
            (None, Some(successor)) => {
                // The removed stop was first; the start edge now reaches the
                // new first activity
                if let Some(day) = self.repo.day(removed.day_id).await? {
                    self.engine.recompute_start_edge(&day, successor).await?;
                }
            }
            _ => {}
        }

        Ok(())
    }

    /// Set or replace a day's starting location and recompute its edge to
    /// the day's first activity. An emptied location clears the starting
    /// location and its coordinates.
    pub async fn set_starting_location(
        &self,
        user_id: Uuid,
        day_id: Uuid,
        request: StartingLocationRequest,
    ) -> Result<Day> {
        super::require_day_owner(self.repo.as_ref(), user_id, day_id).await?;

        let mut day = self
            .repo
            .day(day_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Day not found".to_string()))?;

        let trimmed = request.location.trim();
        if trimmed.is_empty() {
            day.start_location = None;
            day.start_latitude = None;
            day.start_longitude = None;
        } else {
            let coordinates = self
                .resolve_coordinates(request.coordinates, Some(trimmed))
                .await;
            day.start_location = Some(trimmed.to_string());
            day.start_latitude = coordinates.map(|c| c.lat);
            day.start_longitude = coordinates.map(|c| c.lng);
        }

        if let Some(transport) = request.transport {
            day.start_transport = Some(transport).filter(|t| !t.trim().is_empty());
        }

        self.repo.update_day_start(&day).await?;
        tracing::info!(day = %day_id, "Updated starting location");

        let sequence = self.repo.activities_for_day(day_id).await?;
        if let Some(first) = sequence.first() {
            self.engine.recompute_start_edge(&day, first).await?;
        }

        Ok(day)
    }

    /// Explicit coordinates win; otherwise geocode the location text.
    /// Geocoding fails silently into `None`.
    async fn resolve_coordinates(
        &self,
        explicit: Option<Coordinates>,
        location: Option<&str>,
    ) -> Option<Coordinates> {
        if explicit.is_some() {
            return explicit;
        }
        match location {
            Some(location) if !location.trim().is_empty() => {
                self.geocoder.geocode(location.trim()).await
            }
            _ => None,
        }
    }
}
