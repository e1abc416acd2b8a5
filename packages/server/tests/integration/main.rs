mod common;
mod shipment;
