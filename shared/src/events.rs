//! Event calendar stored as a JSON object in S3.
//!
//! The object maps weekday names to a description, e.g.
//! `{"Friday": "Live music at 8pm", "Saturday": "Magic show"}`.
//! It is read fresh on every lookup.

use std::collections::BTreeMap;

use async_trait::async_trait;
use aws_sdk_s3::Client as S3Client;
use serde_json::{Map, Value};
use tracing::{error, info};

use crate::{Error, Result};

/// Weekday name to event description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventCalendar {
    events: BTreeMap<String, String>,
}

impl EventCalendar {
    /// Parse calendar JSON. The top level must be an object; string values are kept
    /// verbatim and anything else is rendered as compact JSON.
    pub fn from_json(text: &str) -> Result<Self> {
        let object: Map<String, Value> = serde_json::from_str(text)?;

        let events = object
            .into_iter()
            .map(|(day, value)| {
                let description = match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (day, description)
            })
            .collect();

        Ok(Self { events })
    }

    /// Description for a day. Keys match case-sensitively.
    pub fn describe(&self, day: &str) -> Option<&str> {
        self.events.get(day).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn to_json(&self) -> String {
        serde_json::to_string(&self.events).unwrap_or_default()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EventCalendar {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            events: iter
                .into_iter()
                .map(|(day, description)| (day.into(), description.into()))
                .collect(),
        }
    }
}

/// Source of the current event calendar.
#[async_trait]
pub trait EventCalendarSource: Send + Sync {
    async fn fetch_calendar(&self) -> Result<EventCalendar>;
}

/// [`EventCalendarSource`] reading one object from an S3 bucket.
pub struct S3EventCalendar {
    client: S3Client,
    bucket: String,
    key: String,
}

impl S3EventCalendar {
    pub fn new(client: S3Client, bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

#[async_trait]
impl EventCalendarSource for S3EventCalendar {
    async fn fetch_calendar(&self) -> Result<EventCalendar> {
        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&self.key)
            .send()
            .await
            .map_err(|e| Error::Aws(format!("Failed to get event calendar: {}", e)))?;

        let bytes = response
            .body
            .collect()
            .await
            .map_err(|e| Error::Aws(format!("Failed to read event calendar: {}", e)))?
            .into_bytes();

        let text = String::from_utf8(bytes.to_vec())
            .map_err(|e| Error::Encoding(format!("Event calendar is not UTF-8: {}", e)))?;

        EventCalendar::from_json(&text)
    }
}

/// Fetch the calendar, degrading every failure to an empty calendar.
pub async fn fetch_event_calendar(source: &dyn EventCalendarSource) -> EventCalendar {
    match source.fetch_calendar().await {
        Ok(calendar) => {
            info!(
                action = "get_s3_data",
                status = "success",
                data = %calendar.to_json(),
                "Event calendar loaded"
            );
            calendar
        }
        Err(e) => {
            error!(
                action = "get_s3_data",
                status = "error",
                error = %e,
                "Event calendar fetch failed"
            );
            EventCalendar::default()
        }
    }
}
