// Core addresses module - blocklist contracts and resolution logic for
// network addresses: exact entries, inclusive ranges, and country codes.

pub mod address_models;
pub mod address_service;
pub mod encoding;

pub use address_models::*;
pub use address_service::*;
