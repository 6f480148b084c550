//! Order events published to NATS, best-effort.

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

pub const ORDER_PLACED_SUBJECT: &str = "storefront.orders.placed";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPlaced {
    pub order_id: Uuid,
    pub customer_email: String,
    pub total: Decimal,
}

/// Publish fire-and-forget; a missing client or a publish failure never fails
/// the request that raised the event.
pub async fn publish_order_placed(nats: &Option<async_nats::Client>, event: &OrderPlaced) {
    let Some(client) = nats else { return };
    match serde_json::to_vec(event) {
        Ok(payload) => {
            if let Err(e) = client
                .publish(ORDER_PLACED_SUBJECT.to_string(), payload.into())
                .await
            {
                tracing::warn!("failed to publish order event: {e}");
            }
        }
        Err(e) => tracing::warn!("failed to encode order event: {e}"),
    }
}
