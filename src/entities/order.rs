use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A fuel delivery order.
///
/// Rows are created only through `OrderService::create_order` so that
/// inventory reservation and order persistence stay coupled. `unit_price`
/// and `total` are snapshots taken at creation time.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_id: Uuid,
    pub product_id: Uuid,
    pub driver_id: Option<Uuid>,
    pub warehouse_id: Uuid,
    pub requested_volume: Decimal,
    pub delivered_volume: Option<Decimal>,
    pub window_start: Option<DateTime<Utc>>,
    pub window_end: Option<DateTime<Utc>>,
    pub delivery_location: String,
    pub status: String,
    pub unit_price: Decimal,
    pub total: Decimal,
    pub paid: bool,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub delivered_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
    #[sea_orm(
        belongs_to = "super::warehouse::Entity",
        from = "Column::WarehouseId",
        to = "super::warehouse::Column::Id"
    )]
    Warehouse,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CustomerId",
        to = "super::user::Column::Id"
    )]
    Customer,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::warehouse::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Warehouse.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Order lifecycle states. `Delivered` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    InTransit,
    Delivered,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::InTransit => "in_transit",
            OrderStatus::Delivered => "delivered",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(OrderStatus::Pending),
            "in_transit" => Some(OrderStatus::InTransit),
            "delivered" => Some(OrderStatus::Delivered),
            _ => None,
        }
    }

    /// The state machine: pending -> in_transit -> delivered, no skips, no
    /// transitions out of the terminal state.
    pub fn can_transition_to(&self, target: OrderStatus) -> bool {
        matches!(
            (self, target),
            (OrderStatus::Pending, OrderStatus::InTransit)
                | (OrderStatus::InTransit, OrderStatus::Delivered)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_string_conversion() {
        assert_eq!(OrderStatus::InTransit.as_str(), "in_transit");
        assert_eq!(OrderStatus::from_str("delivered"), Some(OrderStatus::Delivered));
        assert_eq!(OrderStatus::from_str("cancelled"), None);
    }

    #[test]
    fn no_transition_skips_a_state() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::InTransit));
        assert!(OrderStatus::InTransit.can_transition_to(OrderStatus::Delivered));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Delivered));
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::InTransit));
        assert!(!OrderStatus::InTransit.can_transition_to(OrderStatus::Pending));
    }
}
