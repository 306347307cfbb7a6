use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use shared::handler::messages;
use shared::{
    Assistant, AssistantResponse, Error, EventCalendar, EventCalendarSource, Reservation,
    ReservationItem, ReservationStore, Result,
};

// ── Mock Backends ──

struct MockReservations {
    items: HashMap<String, Reservation>,
    fail: bool,
    calls: AtomicUsize,
}

impl MockReservations {
    fn with(reservations: Vec<Reservation>) -> Self {
        Self {
            items: reservations
                .into_iter()
                .map(|r| (r.reservation_id.clone(), r))
                .collect(),
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::with(vec![])
        }
    }
}

#[async_trait]
impl ReservationStore for MockReservations {
    async fn get_item(&self, reservation_id: &str) -> Result<Option<ReservationItem>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::Aws("ProvisionedThroughputExceededException".to_string()));
        }
        Ok(self.items.get(reservation_id).map(Reservation::to_item))
    }
}

struct MockCalendar {
    calendar: Option<EventCalendar>,
    calls: AtomicUsize,
}

impl MockCalendar {
    fn with(calendar: EventCalendar) -> Self {
        Self {
            calendar: Some(calendar),
            calls: AtomicUsize::new(0),
        }
    }

    fn missing() -> Self {
        Self {
            calendar: None,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl EventCalendarSource for MockCalendar {
    async fn fetch_calendar(&self) -> Result<EventCalendar> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.calendar
            .clone()
            .ok_or_else(|| Error::Aws("NoSuchKey".to_string()))
    }
}

// ── Helpers ──

fn nobu() -> Reservation {
    Reservation {
        reservation_id: "R100".to_string(),
        customer_name: "Ada Lovelace".to_string(),
        restaurant: "Nobu".to_string(),
        date: "2024-05-01".to_string(),
        time: "7:30 PM".to_string(),
    }
}

fn calendar() -> EventCalendar {
    [("Friday", "Live music at 8pm"), ("Saturday", "Magic show at 9pm")]
        .into_iter()
        .collect()
}

struct Harness {
    reservations: Arc<MockReservations>,
    calendar: Arc<MockCalendar>,
    assistant: Assistant,
}

fn harness(reservations: MockReservations, calendar: MockCalendar) -> Harness {
    let reservations = Arc::new(reservations);
    let calendar = Arc::new(calendar);
    let assistant = Assistant::new(reservations.clone(), calendar.clone());
    Harness {
        reservations,
        calendar,
        assistant,
    }
}

fn default_harness() -> Harness {
    harness(MockReservations::with(vec![nobu()]), MockCalendar::with(calendar()))
}

fn connect_event(parameters: Value) -> Value {
    json!({
        "Name": "ContactFlowEvent",
        "Details": {
            "ContactData": {"Channel": "VOICE", "ContactId": "c-1"},
            "Parameters": parameters
        }
    })
}

fn lex_event(intent: &str, slots: Value) -> Value {
    json!({
        "sessionId": "s-1",
        "inputTranscript": "what is on",
        "sessionState": {
            "intent": {"name": intent, "slots": slots, "state": "ReadyForFulfillment"}
        }
    })
}

fn slot(interpreted: &str) -> Value {
    json!({"value": {"originalValue": interpreted, "interpretedValue": interpreted, "resolvedValues": []}})
}

// ── Contact Center ──

#[tokio::test]
async fn test_connect_check_reservation_found() {
    let h = default_harness();
    let event = connect_event(json!({"intent": "CheckReservation", "reservation_id": "R100"}));

    let response = h.assistant.handle(&event).await;

    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({
            "status": "success",
            "message": "You have a reservation at Nobu on 2024-05-01 at 7:30 PM."
        })
    );
}

#[tokio::test]
async fn test_connect_check_reservation_missing() {
    let h = default_harness();
    let event = connect_event(json!({"intent": "CheckReservation", "reservation_id": "R999"}));

    let response = h.assistant.handle(&event).await;

    assert!(matches!(response, AssistantResponse::ContactCenter(_)));
    assert_eq!(response.message(), messages::RESERVATION_NOT_FOUND);
}

#[tokio::test]
async fn test_connect_event_details_uses_day_as_given() {
    let h = default_harness();

    let friday = connect_event(json!({"intent": "GetEventDetails", "day": "Friday"}));
    let response = h.assistant.handle(&friday).await;
    assert_eq!(
        response.message(),
        "Here are the event details for Friday: Live music at 8pm"
    );

    let lowercase = connect_event(json!({"intent": "GetEventDetails", "day": "friday"}));
    let response = h.assistant.handle(&lowercase).await;
    assert_eq!(
        response.message(),
        "Here are the event details for friday: No events scheduled for that day."
    );
}

#[tokio::test]
async fn test_connect_unknown_intent() {
    let h = default_harness();

    for parameters in [json!({"intent": "BookTable"}), json!({})] {
        let response = h.assistant.handle(&connect_event(parameters)).await;
        assert!(matches!(response, AssistantResponse::ContactCenter(_)));
        assert_eq!(response.message(), messages::NOT_UNDERSTOOD);
    }

    assert_eq!(h.reservations.calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.calendar.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_connect_malformed_parameters() {
    let h = default_harness();
    let event = connect_event(json!(["not", "a", "map"]));

    let response = h.assistant.handle(&event).await;

    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({"status": "success", "message": messages::UNEXPECTED_ERROR})
    );
}

// ── Conversational Bot ──

#[tokio::test]
async fn test_lex_check_reservation_found() {
    let h = default_harness();
    let event = lex_event("CheckReservation", json!({"reservation_id": slot("R100")}));

    let response = h.assistant.handle(&event).await;

    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({
            "sessionState": {
                "intent": {
                    "name": "CheckReservation",
                    "state": "Fulfilled",
                    "slots": {"reservation_id": slot("R100")}
                },
                "dialogAction": {"type": "Close"}
            },
            "messages": [{
                "contentType": "PlainText",
                "content": "You have a reservation at Nobu on 2024-05-01 at 7:30 PM."
            }]
        })
    );
}

#[tokio::test]
async fn test_lex_store_error_reads_as_not_found() {
    let h = harness(MockReservations::failing(), MockCalendar::with(calendar()));
    let event = lex_event("CheckReservation", json!({"reservation_id": slot("R100")}));

    let response = h.assistant.handle(&event).await;

    assert!(matches!(response, AssistantResponse::ConversationalBot(_)));
    assert_eq!(response.message(), messages::RESERVATION_NOT_FOUND);
    assert_eq!(h.reservations.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_lex_unfilled_reservation_slot() {
    let h = default_harness();
    let event = lex_event("CheckReservation", json!({"reservation_id": null}));

    let response = h.assistant.handle(&event).await;

    assert_eq!(response.message(), messages::RESERVATION_NOT_FOUND);
    assert_eq!(h.reservations.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_lex_event_details_title_cases_day() {
    let h = default_harness();
    let event = lex_event("GetEventDetails", json!({"day": slot("saturday")}));

    let response = h.assistant.handle(&event).await;

    assert_eq!(
        response.message(),
        "Here are the event details for Saturday: Magic show at 9pm"
    );
}

#[tokio::test]
async fn test_lex_event_details_defaults_to_friday() {
    let h = default_harness();

    for slots in [json!({}), json!({"day": null}), json!({"day": {"value": null}})] {
        let response = h.assistant.handle(&lex_event("GetEventDetails", slots)).await;
        assert_eq!(
            response.message(),
            "Here are the event details for Friday: Live music at 8pm"
        );
    }
}

#[tokio::test]
async fn test_lex_event_details_missing_calendar() {
    let h = harness(MockReservations::with(vec![]), MockCalendar::missing());
    let event = lex_event("GetEventDetails", json!({"day": slot("Friday")}));

    let response = h.assistant.handle(&event).await;

    assert_eq!(
        response.message(),
        "Here are the event details for Friday: No events scheduled for that day."
    );
    assert_eq!(h.calendar.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_lex_unknown_intent_keeps_name_and_slots() {
    let h = default_harness();
    let event = lex_event("OrderRoomService", json!({"item": slot("fries")}));

    let response = h.assistant.handle(&event).await;

    match &response {
        AssistantResponse::ConversationalBot(bot) => {
            assert_eq!(bot.session_state.intent.name, "OrderRoomService");
            assert_eq!(bot.session_state.intent.slots.get("item"), Some(&slot("fries")));
        }
        other => panic!("unexpected response: {:?}", other),
    }
    assert_eq!(response.message(), messages::NOT_UNDERSTOOD);
}

#[tokio::test]
async fn test_event_without_session_state_is_fallback() {
    let h = default_harness();

    let response = h.assistant.handle(&json!({"Details": {"Parameters": {}}})).await;

    match &response {
        AssistantResponse::ConversationalBot(bot) => {
            assert_eq!(bot.session_state.intent.name, "FallbackIntent");
        }
        other => panic!("unexpected response: {:?}", other),
    }
    assert_eq!(response.message(), messages::NOT_UNDERSTOOD);
}

#[tokio::test]
async fn test_lex_malformed_slot_keeps_intent_and_slots() {
    let h = default_harness();
    let event = lex_event("CheckReservation", json!({"reservation_id": 42, "day": slot("friday")}));

    let response = h.assistant.handle(&event).await;

    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({
            "sessionState": {
                "intent": {
                    "name": "CheckReservation",
                    "state": "Fulfilled",
                    "slots": {"reservation_id": 42, "day": slot("friday")}
                },
                "dialogAction": {"type": "Close"}
            },
            "messages": [{"contentType": "PlainText", "content": messages::UNEXPECTED_ERROR}]
        })
    );
    assert_eq!(h.reservations.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_lex_non_string_intent_name_is_not_understood() {
    let h = default_harness();

    let response = h.assistant.handle(&json!({"sessionState": {"intent": {"name": 7}}})).await;

    match &response {
        AssistantResponse::ConversationalBot(bot) => {
            assert_eq!(bot.session_state.intent.name, "FallbackIntent");
        }
        other => panic!("unexpected response: {:?}", other),
    }
    assert_eq!(response.message(), messages::NOT_UNDERSTOOD);
}

#[tokio::test]
async fn test_connect_whitespace_reservation_id_reaches_store() {
    let h = default_harness();
    let event = connect_event(json!({"intent": "CheckReservation", "reservation_id": " "}));

    let response = h.assistant.handle(&event).await;

    assert_eq!(response.message(), messages::RESERVATION_NOT_FOUND);
    assert_eq!(h.reservations.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_connect_empty_reservation_id_skips_store() {
    let h = default_harness();
    let event = connect_event(json!({"intent": "CheckReservation", "reservation_id": ""}));

    let response = h.assistant.handle(&event).await;

    assert_eq!(response.message(), messages::RESERVATION_NOT_FOUND);
    assert_eq!(h.reservations.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_non_object_event_returns_error_reply() {
    let h = default_harness();

    let response = h.assistant.handle(&json!("hello")).await;

    assert!(matches!(response, AssistantResponse::ConversationalBot(_)));
    assert_eq!(response.message(), messages::UNEXPECTED_ERROR);
}
