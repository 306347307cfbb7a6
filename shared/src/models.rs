//! Wire models for the two callers: Amazon Connect contact flows and Lex V2 bots.
//!
//! Inbound events arrive as raw JSON. [`CallerShape::detect`] picks the shape from
//! the presence of `Details.ContactData`, and [`AssistantRequest::from_event`] decodes
//! either shape into one canonical request before any dispatch happens.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// Day used when a bot request carries no `day` slot.
pub const DEFAULT_DAY: &str = "Friday";

/// Intent name reported back to the bot when the request had none.
pub const FALLBACK_INTENT: &str = "FallbackIntent";

/// Which caller sent the event, and therefore which reply shape it expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallerShape {
    /// Amazon Connect contact flow (flat parameters, flat reply).
    ContactCenter,
    /// Lex V2 bot (nested intent/slots, dialogue-closure reply).
    ConversationalBot,
}

impl CallerShape {
    /// Contact-center iff the event has `Details.ContactData`; everything else is a bot event.
    pub fn detect(event: &Value) -> Self {
        match event.get("Details") {
            Some(details) if details.get("ContactData").is_some() => CallerShape::ContactCenter,
            _ => CallerShape::ConversationalBot,
        }
    }

    pub fn is_contact_center(self) -> bool {
        self == CallerShape::ContactCenter
    }
}

// ── Inbound: Amazon Connect ──

/// Contact flow invocation event.
#[derive(Debug, Deserialize)]
pub struct ContactFlowEvent {
    #[serde(rename = "Details")]
    pub details: ContactFlowDetails,
}

#[derive(Debug, Deserialize)]
pub struct ContactFlowDetails {
    #[serde(rename = "ContactData")]
    pub contact_data: Value,
    /// Flat key/value parameters set in the contact flow
    #[serde(rename = "Parameters", default)]
    pub parameters: Option<Map<String, Value>>,
}

impl ContactFlowDetails {
    /// String parameter by name; non-string values count as absent.
    pub fn parameter(&self, name: &str) -> Option<String> {
        self.parameters
            .as_ref()
            .and_then(|params| params.get(name))
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

// ── Inbound: Lex V2 ──

/// Lex V2 code hook event (only the fields this handler reads).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotEvent {
    #[serde(default)]
    pub session_state: Option<SessionState>,
}

#[derive(Debug, Deserialize)]
pub struct SessionState {
    #[serde(default)]
    pub intent: Option<BotIntent>,
}

/// Both fields stay raw so a bad value in one does not lose the other.
#[derive(Debug, Deserialize)]
pub struct BotIntent {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub slots: Option<Value>,
}

impl BotIntent {
    /// Intent name; non-string names count as unrecognized.
    pub fn intent_name(&self) -> Option<String> {
        self.name.as_ref().and_then(Value::as_str).map(str::to_string)
    }
}

/// A single Lex slot. Unfilled slots are sent as `null`.
#[derive(Debug, Deserialize)]
pub struct Slot {
    #[serde(default)]
    pub value: Option<SlotValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotValue {
    #[serde(default)]
    pub interpreted_value: Option<String>,
    #[serde(default)]
    pub original_value: Option<String>,
}

/// Interpreted value of a named slot, if the slot is present and filled.
pub fn slot_interpreted_value(slots: &Map<String, Value>, name: &str) -> Result<Option<String>> {
    let raw = match slots.get(name) {
        None | Some(Value::Null) => return Ok(None),
        Some(raw) => raw,
    };

    let slot = Slot::deserialize(raw)
        .map_err(|e| Error::MalformedEvent(format!("slot '{}': {}", name, e)))?;

    Ok(slot.value.and_then(|value| value.interpreted_value))
}

// ── Canonical request ──

/// One request, normalized from whichever caller shape sent it.
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantRequest {
    pub shape: CallerShape,
    pub intent_name: Option<String>,
    pub reservation_id: Option<String>,
    pub day: Option<String>,
    /// Bot slots to echo back; always empty for contact-center requests
    pub slots: Map<String, Value>,
}

/// An event that failed to decode, with whatever was read before the failure.
#[derive(Debug)]
pub struct RejectedEvent {
    pub shape: CallerShape,
    pub intent_name: Option<String>,
    pub slots: Map<String, Value>,
    pub error: Error,
}

impl RejectedEvent {
    fn new(shape: CallerShape, error: Error) -> Self {
        Self {
            shape,
            intent_name: None,
            slots: Map::new(),
            error,
        }
    }
}

impl AssistantRequest {
    /// Decode a raw inbound event into the canonical request.
    pub fn from_event(event: &Value) -> std::result::Result<Self, RejectedEvent> {
        match CallerShape::detect(event) {
            CallerShape::ContactCenter => Self::from_contact_flow(event),
            CallerShape::ConversationalBot => Self::from_bot(event),
        }
    }

    fn from_contact_flow(event: &Value) -> std::result::Result<Self, RejectedEvent> {
        let event = ContactFlowEvent::deserialize(event).map_err(|e| {
            RejectedEvent::new(
                CallerShape::ContactCenter,
                Error::MalformedEvent(format!("contact flow event: {}", e)),
            )
        })?;
        let details = event.details;

        Ok(Self {
            shape: CallerShape::ContactCenter,
            intent_name: details.parameter("intent"),
            reservation_id: details.parameter("reservation_id"),
            day: details.parameter("day"),
            slots: Map::new(),
        })
    }

    fn from_bot(event: &Value) -> std::result::Result<Self, RejectedEvent> {
        let shape = CallerShape::ConversationalBot;
        let event = BotEvent::deserialize(event).map_err(|e| {
            RejectedEvent::new(shape, Error::MalformedEvent(format!("bot event: {}", e)))
        })?;

        let intent = event.session_state.and_then(|state| state.intent);
        let intent_name = intent.as_ref().and_then(BotIntent::intent_name);
        let raw_slots = intent.and_then(|intent| intent.slots);

        let slots = match raw_slots {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(slots)) => slots,
            Some(other) => {
                return Err(RejectedEvent {
                    shape,
                    intent_name,
                    slots: Map::new(),
                    error: Error::MalformedEvent(format!("slots is not an object: {}", other)),
                })
            }
        };

        let resolved = slot_interpreted_value(&slots, "reservation_id").and_then(|id| {
            let day = slot_interpreted_value(&slots, "day")?;
            Ok((id, day))
        });

        let (reservation_id, day) = match resolved {
            Ok(values) => values,
            Err(error) => {
                return Err(RejectedEvent {
                    shape,
                    intent_name,
                    slots,
                    error,
                })
            }
        };
        let day = day.unwrap_or_else(|| DEFAULT_DAY.to_string());

        Ok(Self {
            shape,
            intent_name,
            reservation_id,
            day: Some(title_case(&day)),
            slots,
        })
    }
}

/// Upper-case the first letter of every alphabetic run and lower-case the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }

    out
}

// ── Outbound ──

/// Reply in whichever shape the caller expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AssistantResponse {
    ContactCenter(ContactFlowResponse),
    ConversationalBot(BotResponse),
}

impl AssistantResponse {
    /// The human-readable text carried by either shape.
    pub fn message(&self) -> &str {
        match self {
            AssistantResponse::ContactCenter(response) => &response.message,
            AssistantResponse::ConversationalBot(response) => response
                .messages
                .first()
                .map(|m| m.content.as_str())
                .unwrap_or_default(),
        }
    }
}

/// Flat reply read by the contact flow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactFlowResponse {
    pub status: String,
    pub message: String,
}

/// Lex V2 dialogue-closure reply.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BotResponse {
    pub session_state: BotSessionState,
    pub messages: Vec<BotMessage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BotSessionState {
    pub intent: ClosedIntent,
    pub dialog_action: DialogAction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClosedIntent {
    pub name: String,
    pub state: String,
    pub slots: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DialogAction {
    #[serde(rename = "type")]
    pub action_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BotMessage {
    pub content_type: String,
    pub content: String,
}
