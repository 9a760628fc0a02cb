pub mod inventory_line;
pub mod order;
pub mod product;
pub mod user;
pub mod vehicle;
pub mod warehouse;
