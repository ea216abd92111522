use crate::constants::*;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub google_maps_api_key: String,
    /// Whether deleting an activity recomputes the former predecessor's
    /// outbound edge. Off by default: the stale value is kept until the next
    /// explicit recalculation.
    pub recompute_on_delete: bool,
    /// Delay between requests in the batch geocoding backfill (ms).
    pub geocode_backfill_delay_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenv::dotenv().ok();

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| "Invalid PORT")?,
            database_url: env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            google_maps_api_key: env::var("GOOGLE_MAPS_API_KEY")
                .map_err(|_| "GOOGLE_MAPS_API_KEY must be set")?,
            recompute_on_delete: env::var("RECOMPUTE_ON_DELETE")
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            geocode_backfill_delay_ms: env::var("GEOCODE_BACKFILL_DELAY_MS")
                .unwrap_or_else(|_| DEFAULT_GEOCODE_BACKFILL_DELAY_MS.to_string())
                .parse()
                .map_err(|_| "Invalid GEOCODE_BACKFILL_DELAY_MS")?,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
