//! Builds the reply in the shape the caller expects.

use serde_json::{Map, Value};

use crate::models::{
    AssistantResponse, BotMessage, BotResponse, BotSessionState, CallerShape, ClosedIntent,
    ContactFlowResponse, DialogAction, FALLBACK_INTENT,
};

/// Format `message` for the caller. Slots are echoed back to the bot verbatim.
pub fn format_response(
    shape: CallerShape,
    message: impl Into<String>,
    intent_name: Option<&str>,
    slots: Map<String, Value>,
) -> AssistantResponse {
    let message = message.into();

    if shape.is_contact_center() {
        return AssistantResponse::ContactCenter(ContactFlowResponse {
            status: "success".to_string(),
            message,
        });
    }

    let name = intent_name
        .filter(|name| !name.is_empty())
        .unwrap_or(FALLBACK_INTENT);

    AssistantResponse::ConversationalBot(BotResponse {
        session_state: BotSessionState {
            intent: ClosedIntent {
                name: name.to_string(),
                state: "Fulfilled".to_string(),
                slots,
            },
            dialog_action: DialogAction {
                action_type: "Close".to_string(),
            },
        },
        messages: vec![BotMessage {
            content_type: "PlainText".to_string(),
            content: message,
        }],
    })
}
