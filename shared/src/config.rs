//! Configuration for the assistant's backing resources.

use std::env;

/// DynamoDB table holding reservations.
pub const DEFAULT_RESERVATIONS_TABLE: &str = "CaesarsReservations";
/// S3 bucket holding the event calendar.
pub const DEFAULT_EVENTS_BUCKET: &str = "caesars-hotel-events";
/// Object key of the event calendar inside the bucket.
pub const DEFAULT_EVENTS_KEY: &str = "events.json";

/// Resource names the handler reads from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Reservations table name
    pub reservations_table: String,
    /// Event calendar bucket
    pub events_bucket: String,
    /// Event calendar object key
    pub events_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reservations_table: DEFAULT_RESERVATIONS_TABLE.to_string(),
            events_bucket: DEFAULT_EVENTS_BUCKET.to_string(),
            events_key: DEFAULT_EVENTS_KEY.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to the
    /// fixed resource names for anything unset or empty.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str, default: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            reservations_table: var("RESERVATIONS_TABLE", DEFAULT_RESERVATIONS_TABLE),
            events_bucket: var("EVENTS_BUCKET", DEFAULT_EVENTS_BUCKET),
            events_key: var("EVENTS_KEY", DEFAULT_EVENTS_KEY),
        }
    }
}
