// Core words module - banned-phrase storage contract and matching logic.
// Following the same pattern as the addresses module.

pub mod word_models;
pub mod word_service;

pub use word_models::*;
pub use word_service::*;
