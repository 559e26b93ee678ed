// The infra module contains implementations of core traits.
// Each backend goes in its own submodule.

#[path = "words/mod.rs"]
pub mod words;

#[path = "addresses/mod.rs"]
pub mod addresses;

#[path = "geo/mod.rs"]
pub mod geo;

#[path = "table_names.rs"]
mod table_names;
