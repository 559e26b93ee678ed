// Blocklist resolution engine.
//
// **Architecture Overview:**
// - `core/` = Matching and resolution logic (storage-agnostic)
// - `infra/` = Implementations of core traits (SQLite, in-memory, GeoIP reader)
//
// Callers construct a service from `core` with a store from `infra` and ask
// it allow/deny questions per request. There is no transport layer here; this
// crate is the decision engine only.

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with a pair of mod.rs files that look the same.
#[path = "core/core_layer.rs"]
pub mod core;
#[path = "infra/infra_layer.rs"]
pub mod infra;

mod config;

pub use config::EngineConfig;
