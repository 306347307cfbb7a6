//! Request handling: decode the event, dispatch on intent, format the reply.

use std::sync::Arc;

use serde_json::Value;
use tracing::{error, info};

use crate::events::{fetch_event_calendar, EventCalendarSource};
use crate::models::{AssistantRequest, AssistantResponse};
use crate::reservations::{lookup_reservation, ReservationStore};
use crate::response::format_response;

/// Intent names understood by the assistant.
pub mod intents {
    pub const CHECK_RESERVATION: &str = "CheckReservation";
    pub const GET_EVENT_DETAILS: &str = "GetEventDetails";
}

/// Canned replies.
pub mod messages {
    pub const RESERVATION_NOT_FOUND: &str = "No reservation found with that ID.";
    pub const NO_EVENTS: &str = "No events scheduled for that day.";
    pub const NOT_UNDERSTOOD: &str = "I'm sorry, I didn't understand your request.";
    pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred. Please try again later.";
}

/// Answers reservation and event questions for both callers.
///
/// Backends are constructed once per process and shared across invocations.
#[derive(Clone)]
pub struct Assistant {
    reservations: Arc<dyn ReservationStore>,
    calendar: Arc<dyn EventCalendarSource>,
}

impl Assistant {
    pub fn new(
        reservations: Arc<dyn ReservationStore>,
        calendar: Arc<dyn EventCalendarSource>,
    ) -> Self {
        Self {
            reservations,
            calendar,
        }
    }

    /// Handle one inbound event. Always returns a well-formed reply.
    pub async fn handle(&self, event: &Value) -> AssistantResponse {
        info!(
            action = "lambda_handler",
            status = "start",
            event = %event,
            "Handling assistant event"
        );

        let request = match AssistantRequest::from_event(event) {
            Ok(request) => request,
            Err(rejected) => {
                error!(
                    action = "lambda_handler",
                    status = "error",
                    kind = rejected.error.kind(),
                    error = %rejected.error,
                    "Failed to decode event"
                );
                // Reply with whatever intent and slots were read before the failure.
                return format_response(
                    rejected.shape,
                    messages::UNEXPECTED_ERROR,
                    rejected.intent_name.as_deref(),
                    rejected.slots,
                );
            }
        };

        let message = self.answer(&request).await;

        format_response(
            request.shape,
            message,
            request.intent_name.as_deref(),
            request.slots,
        )
    }

    async fn answer(&self, request: &AssistantRequest) -> String {
        match request.intent_name.as_deref() {
            Some(intents::CHECK_RESERVATION) => {
                self.check_reservation(request.reservation_id.as_deref())
                    .await
            }
            Some(intents::GET_EVENT_DETAILS) => {
                self.event_details(request.day.as_deref().unwrap_or_default())
                    .await
            }
            _ => messages::NOT_UNDERSTOOD.to_string(),
        }
    }

    async fn check_reservation(&self, reservation_id: Option<&str>) -> String {
        info!(
            action = intents::CHECK_RESERVATION,
            reservation_id = reservation_id.unwrap_or_default(),
            "Checking reservation"
        );

        match lookup_reservation(self.reservations.as_ref(), reservation_id).await {
            Some(reservation) => format!(
                "You have a reservation at {} on {} at {}.",
                reservation.restaurant, reservation.date, reservation.time
            ),
            None => messages::RESERVATION_NOT_FOUND.to_string(),
        }
    }

    async fn event_details(&self, day: &str) -> String {
        info!(action = intents::GET_EVENT_DETAILS, day = day, "Fetching event details");

        let calendar = fetch_event_calendar(self.calendar.as_ref()).await;
        let details = calendar.describe(day).unwrap_or(messages::NO_EVENTS);

        format!("Here are the event details for {}: {}", day, details)
    }
}
