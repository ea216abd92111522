pub mod activity;
pub mod checklist;
pub mod coordinates;
pub mod transport;
pub mod trip;

pub use activity::{
    Activity, ActivityUpdateRequest, DaySequence, NewActivityRequest, RouteSelectionRequest,
    StartingLocationRequest, TravelTimeSource,
};
pub use checklist::{
    Checklist, ChecklistItem, ChecklistItemUpdateRequest, ChecklistWithItems, NewChecklistItemRequest,
    NewChecklistRequest,
};
pub use coordinates::Coordinates;
pub use transport::RoutingMode;
pub use trip::{
    day_dates, renumbering_updates, Day, DayWithActivities, NewTripRequest, Trip, TripDetails,
    TripUpdateRequest,
};
