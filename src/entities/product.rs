use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A fuel product in the catalog. The unit price recorded here is the
/// catalog price; orders capture their own price snapshot at creation time,
/// so later catalog changes never affect priced totals.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub fuel_type: String,
    pub unit_price: Decimal,
    pub unit: String,
    pub description: Option<String>,
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

/// Unit of measure a product is sold in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitOfMeasure {
    Liter,
    Gallon,
    Barrel,
}

impl UnitOfMeasure {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitOfMeasure::Liter => "liter",
            UnitOfMeasure::Gallon => "gallon",
            UnitOfMeasure::Barrel => "barrel",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "liter" => Some(UnitOfMeasure::Liter),
            "gallon" => Some(UnitOfMeasure::Gallon),
            "barrel" => Some(UnitOfMeasure::Barrel),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_of_measure_conversion() {
        assert_eq!(UnitOfMeasure::Gallon.as_str(), "gallon");
        assert_eq!(UnitOfMeasure::from_str("barrel"), Some(UnitOfMeasure::Barrel));
        assert_eq!(UnitOfMeasure::from_str("pint"), None);
    }
}
