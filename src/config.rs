// Environment-driven configuration for wiring the engine up.
//
// The library itself never reads the environment; embedders call
// `EngineConfig::from_env()` once at startup and hand the pieces to the
// store/resolver constructors. Table names are per-instance configuration on
// the stores, never shared mutable state.

/// Configuration for the blocklist engine, sourced from the environment.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// SQLite connection string, e.g. `sqlite://blocklists.db?mode=rwc`.
    pub database_url: String,
    /// Path to a MaxMind GeoIP2 Country database file, if country blocking
    /// is in use.
    pub geoip_database: Option<String>,
    /// Override for the banned-words table name.
    pub words_table: Option<String>,
    /// Override for the exact-address table name.
    pub addresses_table: Option<String>,
    /// Override for the address-range table name.
    pub ranges_table: Option<String>,
    /// Override for the blocked-country table name.
    pub countries_table: Option<String>,
}

impl EngineConfig {
    /// Load configuration from the environment (honouring a `.env` file).
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        Self {
            database_url: std::env::var("BLOCKLIST_DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://blocklists.db?mode=rwc".to_string()),
            geoip_database: std::env::var("GEOIP_DATABASE").ok(),
            words_table: std::env::var("BLOCKLIST_WORDS_TABLE").ok(),
            addresses_table: std::env::var("BLOCKLIST_ADDRESSES_TABLE").ok(),
            ranges_table: std::env::var("BLOCKLIST_RANGES_TABLE").ok(),
            countries_table: std::env::var("BLOCKLIST_COUNTRIES_TABLE").ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_are_picked_up() {
        std::env::set_var("BLOCKLIST_DATABASE_URL", "sqlite://custom.db?mode=rwc");
        std::env::set_var("BLOCKLIST_WORDS_TABLE", "spam_words");
        std::env::remove_var("GEOIP_DATABASE");

        let config = EngineConfig::from_env();
        assert_eq!(config.database_url, "sqlite://custom.db?mode=rwc");
        assert_eq!(config.words_table.as_deref(), Some("spam_words"));
        assert_eq!(config.geoip_database, None);

        std::env::remove_var("BLOCKLIST_DATABASE_URL");
        std::env::remove_var("BLOCKLIST_WORDS_TABLE");
    }
}
