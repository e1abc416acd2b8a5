pub mod health;
pub mod label;
pub mod shipment;
