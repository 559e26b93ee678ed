// The core module contains all matching and resolution logic.
// Each rule kind gets its own submodule.

#[path = "words/mod.rs"]
pub mod words;

#[path = "addresses/mod.rs"]
pub mod addresses;
