use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A storage site. Invariant: the sum of its inventory line quantities never
/// exceeds `total_capacity`; the ledger's restock path enforces this.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "warehouses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub total_capacity: Decimal,
    pub unit: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::inventory_line::Entity")]
    InventoryLine,
    #[sea_orm(has_many = "super::order::Entity")]
    Order,
}

impl Related<super::inventory_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InventoryLine.def()
    }
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
