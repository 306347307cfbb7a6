//! Shared library for the Caesars reservation assistant Lambda.
//!
//! This crate holds the request handler, the wire models for Amazon Connect and
//! Lex V2 callers, and the DynamoDB/S3 backends it reads from.

pub mod config;
pub mod error;
pub mod events;
pub mod handler;
pub mod models;
pub mod reservations;
pub mod response;

pub use config::Config;
pub use error::{Error, Result};
pub use events::{fetch_event_calendar, EventCalendar, EventCalendarSource, S3EventCalendar};
pub use handler::Assistant;
pub use models::{AssistantRequest, AssistantResponse, CallerShape, RejectedEvent};
pub use reservations::{
    lookup_reservation, DynamoDbReservationStore, Reservation, ReservationItem, ReservationStore,
};
pub use response::format_response;
