pub mod capacity;
pub mod inventory;
pub mod orders;
pub mod pricing;
pub mod warehouses;
