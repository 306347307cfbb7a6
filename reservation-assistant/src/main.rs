//! Reservation Assistant Lambda - Answers reservation and event questions.
//!
//! Invoked directly by an Amazon Connect contact flow or as a Lex V2 fulfillment
//! code hook. The reply always comes back in the caller's own shape.

use std::sync::Arc;

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;
use shared::{Assistant, AssistantResponse, Config, DynamoDbReservationStore, S3EventCalendar};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Application state shared across invocations.
struct AppState {
    assistant: Assistant,
}

impl AppState {
    async fn new() -> Result<Self, Error> {
        let config = Config::from_env();
        let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;

        let reservations = DynamoDbReservationStore::new(
            aws_sdk_dynamodb::Client::new(&sdk_config),
            config.reservations_table.clone(),
        );
        let calendar = S3EventCalendar::new(
            aws_sdk_s3::Client::new(&sdk_config),
            config.events_bucket.clone(),
            config.events_key.clone(),
        );

        info!(
            reservations_table = %config.reservations_table,
            events_bucket = %config.events_bucket,
            events_key = %config.events_key,
            "Reservation assistant initialized"
        );

        Ok(Self {
            assistant: Assistant::new(Arc::new(reservations), Arc::new(calendar)),
        })
    }
}

async fn handler(state: Arc<AppState>, event: LambdaEvent<Value>) -> Result<AssistantResponse, Error> {
    Ok(state.assistant.handle(&event.payload).await)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let state = Arc::new(AppState::new().await?);

    run(service_fn(move |event| {
        let state = Arc::clone(&state);
        async move { handler(state, event).await }
    }))
    .await
}
