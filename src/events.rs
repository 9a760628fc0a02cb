use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

/// Domain events emitted by the services after a successful state change.
///
/// Delivery is best effort: a send failure is logged by the caller and never
/// fails the operation that produced the event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    OrderCreated(Uuid),
    OrderStatusChanged {
        order_id: Uuid,
        old_status: String,
        new_status: String,
    },
    OrderDeleted(Uuid),
    OrderPaymentUpdated {
        order_id: Uuid,
        paid: bool,
    },
    DriverAssigned {
        order_id: Uuid,
        driver_id: Uuid,
    },
    InventoryReserved {
        warehouse_id: Uuid,
        product_id: Uuid,
        volume: Decimal,
    },
    InventoryReleased {
        warehouse_id: Uuid,
        product_id: Uuid,
        volume: Decimal,
    },
    InventoryRestocked {
        warehouse_id: Uuid,
        product_id: Uuid,
        volume: Decimal,
    },
}

/// Cloneable handle for emitting events into the processing channel.
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously.
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Drains the event channel, logging each event. Runs until all senders are
/// dropped.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        info!(event = ?event, "Processing event");
    }
    info!("Event channel closed; event processor shutting down");
}
