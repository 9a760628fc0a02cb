use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::DbPool;
use crate::events::EventSender;
use crate::services::capacity::CapacityValidator;
use crate::services::inventory::InventoryService;
use crate::services::orders::OrderService;
use crate::services::pricing::PricingService;
use crate::services::warehouses::WarehouseSelector;

pub mod inventory;
pub mod orders;

/// The service layer, wired once at startup and shared through `AppState`.
#[derive(Clone)]
pub struct AppServices {
    pub orders: OrderService,
    pub inventory: InventoryService,
    pub selector: WarehouseSelector,
    pub pricing: PricingService,
    pub capacity: CapacityValidator,
}

impl AppServices {
    pub fn build(db: Arc<DbPool>, config: &AppConfig, event_sender: EventSender) -> Self {
        let inventory = InventoryService::new(db.clone(), event_sender.clone());
        let pricing = PricingService::new(db.clone(), config.tax_rate);
        let selector = WarehouseSelector::new(db.clone());
        let capacity = CapacityValidator::new(config.liters_per_gallon, config.liters_per_barrel);
        let orders = OrderService::new(
            db,
            inventory.clone(),
            pricing.clone(),
            selector.clone(),
            capacity.clone(),
            event_sender,
        );

        Self {
            orders,
            inventory,
            selector,
            pricing,
            capacity,
        }
    }
}
