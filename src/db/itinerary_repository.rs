use crate::error::Result;
use crate::models::{Activity, Day, DaySequence, TravelTimeSource};
use async_trait::async_trait;
use uuid::Uuid;

/// A travel-annotation write for one edge. Distance is always written;
/// `time` is `None` when the stored duration (and its source) must be left
/// untouched, e.g. because the user pinned it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TravelWrite {
    pub distance_km: f64,
    pub time: Option<(i32, TravelTimeSource)>,
}

/// Persisted itinerary state: days, their ordered activities, and the
/// derived travel annotations. The recalculation engine and the activity
/// service only talk to this seam, never to the pool directly.
#[async_trait]
pub trait ItineraryRepository: Send + Sync {
    async fn day(&self, id: Uuid) -> Result<Option<Day>>;

    async fn day_owner(&self, day_id: Uuid) -> Result<Option<Uuid>>;

    /// All of a day's activities as an ordered sequence.
    async fn activities_for_day(&self, day_id: Uuid) -> Result<DaySequence>;

    async fn activity(&self, id: Uuid) -> Result<Option<Activity>>;

    async fn activity_owner(&self, activity_id: Uuid) -> Result<Option<Uuid>>;

    async fn insert_activity(&self, activity: &Activity) -> Result<()>;

    async fn update_activity(&self, activity: &Activity) -> Result<()>;

    async fn delete_activity(&self, id: Uuid) -> Result<()>;

    /// Persist a day's starting-location fields (location, coordinates,
    /// transport); travel annotations go through `set_day_start_travel`.
    async fn update_day_start(&self, day: &Day) -> Result<()>;

    async fn set_activity_travel(&self, id: Uuid, travel: TravelWrite) -> Result<()>;

    async fn set_day_start_travel(&self, day_id: Uuid, travel: TravelWrite) -> Result<()>;
}

pub struct PgItineraryRepository {
    pool: sqlx::PgPool,
}

impl PgItineraryRepository {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItineraryRepository for PgItineraryRepository {
    async fn day(&self, id: Uuid) -> Result<Option<Day>> {
        Ok(super::trip_queries::get_day(&self.pool, id).await?)
    }

    async fn day_owner(&self, day_id: Uuid) -> Result<Option<Uuid>> {
        Ok(super::trip_queries::day_owner(&self.pool, day_id).await?)
    }

    async fn activities_for_day(&self, day_id: Uuid) -> Result<DaySequence> {
        let activities = super::activity_queries::activities_for_day(&self.pool, day_id).await?;
        Ok(DaySequence::new(activities))
    }

    async fn activity(&self, id: Uuid) -> Result<Option<Activity>> {
        Ok(super::activity_queries::get_activity(&self.pool, id).await?)
    }

    async fn activity_owner(&self, activity_id: Uuid) -> Result<Option<Uuid>> {
        Ok(super::activity_queries::activity_owner(&self.pool, activity_id).await?)
    }

    async fn insert_activity(&self, activity: &Activity) -> Result<()> {
        Ok(super::activity_queries::insert_activity(&self.pool, activity).await?)
    }

    async fn update_activity(&self, activity: &Activity) -> Result<()> {
        Ok(super::activity_queries::update_activity(&self.pool, activity).await?)
    }

    async fn delete_activity(&self, id: Uuid) -> Result<()> {
        super::activity_queries::delete_activity(&self.pool, id).await?;
        Ok(())
    }

    async fn update_day_start(&self, day: &Day) -> Result<()> {
        Ok(super::trip_queries::update_day_start(&self.pool, day).await?)
    }

    async fn set_activity_travel(&self, id: Uuid, travel: TravelWrite) -> Result<()> {
        Ok(super::activity_queries::set_activity_travel(
            &self.pool,
            id,
            travel.distance_km,
            travel.time,
        )
        .await?)
    }

    async fn set_day_start_travel(&self, day_id: Uuid, travel: TravelWrite) -> Result<()> {
        Ok(super::trip_queries::set_day_start_travel(
            &self.pool,
            day_id,
            travel.distance_km,
            travel.time,
        )
        .await?)
    }
}
