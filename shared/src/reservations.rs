//! Reservation lookups against DynamoDB.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use tracing::{error, info};

use crate::{Error, Result};

/// A raw item from the reservations table.
pub type ReservationItem = HashMap<String, AttributeValue>;

/// A reservation as stored in the reservations table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reservation {
    pub reservation_id: String,
    pub customer_name: String,
    pub restaurant: String,
    pub date: String,
    pub time: String,
}

impl Reservation {
    /// Build from a DynamoDB item. Missing or non-string attributes become empty strings.
    pub fn from_item(item: &ReservationItem) -> Self {
        let field = |name: &str| {
            item.get(name)
                .and_then(|value| value.as_s().ok())
                .cloned()
                .unwrap_or_default()
        };

        Self {
            reservation_id: field("reservation_id"),
            customer_name: field("customer_name"),
            restaurant: field("restaurant"),
            date: field("date"),
            time: field("time"),
        }
    }

    /// The item as it would be written to the table.
    pub fn to_item(&self) -> ReservationItem {
        [
            ("reservation_id", &self.reservation_id),
            ("customer_name", &self.customer_name),
            ("restaurant", &self.restaurant),
            ("date", &self.date),
            ("time", &self.time),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), AttributeValue::S(value.clone())))
        .collect()
    }
}

/// Read-only access to reservations.
#[async_trait]
pub trait ReservationStore: Send + Sync {
    /// Point lookup by id. `Ok(None)` means the id is not in the store.
    async fn get_item(&self, reservation_id: &str) -> Result<Option<ReservationItem>>;
}

/// [`ReservationStore`] backed by a DynamoDB table keyed on `reservation_id`.
pub struct DynamoDbReservationStore {
    client: DynamoDbClient,
    table_name: String,
}

impl DynamoDbReservationStore {
    pub fn new(client: DynamoDbClient, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }
}

#[async_trait]
impl ReservationStore for DynamoDbReservationStore {
    async fn get_item(&self, reservation_id: &str) -> Result<Option<ReservationItem>> {
        let response = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("reservation_id", AttributeValue::S(reservation_id.to_string()))
            .send()
            .await
            .map_err(|e| Error::Aws(format!("Failed to get reservation: {}", e)))?;

        Ok(response.item)
    }
}

/// Look up a reservation, degrading every failure to `None`.
///
/// A missing or empty id never reaches the store.
pub async fn lookup_reservation(
    store: &dyn ReservationStore,
    reservation_id: Option<&str>,
) -> Option<Reservation> {
    let reservation_id = match reservation_id {
        Some(id) if !id.is_empty() => id,
        _ => {
            error!(
                action = "get_reservation_details",
                status = "error",
                error = "missing reservation id",
                "Reservation lookup skipped"
            );
            return None;
        }
    };

    match store.get_item(reservation_id).await {
        Ok(item) => {
            info!(
                action = "get_reservation_details",
                status = "success",
                response = ?item,
                "Reservation lookup complete"
            );
            item.filter(|item| !item.is_empty())
                .map(|item| Reservation::from_item(&item))
        }
        Err(e) => {
            error!(
                action = "get_reservation_details",
                status = "error",
                error = %e,
                "Reservation lookup failed"
            );
            None
        }
    }
}
