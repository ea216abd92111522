//! Stable application-wide constants.
//!
//! Values here are structural invariants and default fallbacks for
//! env-var-based configuration. They should rarely change.

// --- Server defaults (used when HOST / PORT env vars are absent) ---

/// Default bind address for the HTTP server.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default port for the HTTP server.
pub const DEFAULT_PORT: &str = "3000";

// --- Itinerary defaults ---

/// Activity duration assumed when a stop is created without one.
pub const DEFAULT_ACTIVITY_DURATION_MINUTES: i32 = 60;
/// Presentation defaults for stops created without explicit tags.
pub const DEFAULT_ACTIVITY_ICON: &str = "MapPin";
pub const DEFAULT_ACTIVITY_COLOR: &str = "orange";

// --- Geocoding backfill ---

/// Inter-request delay for the batch geocoding backfill, respecting the
/// geocoding service's rate limit. Interactive single lookups are never
/// delayed. Overridden by `GEOCODE_BACKFILL_DELAY_MS`.
pub const DEFAULT_GEOCODE_BACKFILL_DELAY_MS: u64 = 100;
