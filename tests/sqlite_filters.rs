// End-to-end tests: filter services wired to the SQLite stores, so the SQL
// side of duplicate checks, substring search and hex-encoded range
// containment is exercised against a real database file.

use anyhow::Result;
use blockguard::core::addresses::{AddressFilterService, RangeSelector};
use blockguard::core::words::WordFilterService;
use blockguard::infra::addresses::SqliteAddressStore;
use blockguard::infra::geo::StaticGeoResolver;
use blockguard::infra::words::{InMemoryWordStore, SqliteWordStore};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use tempfile::TempDir;

async fn sqlite_pool(dir: &TempDir) -> Result<Pool<Sqlite>> {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let db_path = dir.path().join("blocklists.db");
    let pool = SqlitePoolOptions::new()
        .connect(&format!("sqlite://{}?mode=rwc", db_path.display()))
        .await?;
    Ok(pool)
}

#[tokio::test]
async fn word_filter_round_trip_against_sqlite() -> Result<()> {
    let dir = TempDir::new()?;
    let store = SqliteWordStore::new(sqlite_pool(&dir).await?);
    store.migrate().await?;
    let service = WordFilterService::new(store);

    assert!(service.add_word("seo").await?);
    assert!(service.add_word("Cheap Pills").await?);
    assert!(!service.add_word("SEO").await?);

    assert!(service.contains_blocked_word("Great SEO services").await?);
    assert!(service.contains_blocked_word("get CHEAP PILLS here").await?);
    assert!(!service.contains_blocked_word("design only").await?);

    // Storage-level substring search.
    let hits = service.list_words(Some("pill")).await?;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].word, "cheap pills");

    assert!(!service.remove_word(9999).await?);
    assert!(service.remove_word(hits[0].id).await?);
    service.reload().await?;
    assert!(!service.contains_blocked_word("cheap pills").await?);
    assert!(service.contains_blocked_word("seo").await?);

    Ok(())
}

#[tokio::test]
async fn word_search_is_case_sensitive_in_both_stores() -> Result<()> {
    let dir = TempDir::new()?;
    let sqlite = SqliteWordStore::new(sqlite_pool(&dir).await?);
    sqlite.migrate().await?;
    let sqlite_service = WordFilterService::new(sqlite);
    let memory_service = WordFilterService::new(InMemoryWordStore::new());

    assert!(sqlite_service.add_word("cheap pills").await?);
    assert!(memory_service.add_word("cheap pills").await?);

    // Words are stored lowercase, so an uppercase needle matches nothing;
    // the SQLite store must agree with the in-memory one on that.
    let sqlite_upper = sqlite_service.list_words(Some("PILL")).await?;
    let memory_upper = memory_service.list_words(Some("PILL")).await?;
    assert_eq!(sqlite_upper.len(), memory_upper.len());
    assert!(sqlite_upper.is_empty());

    let sqlite_lower = sqlite_service.list_words(Some("pill")).await?;
    let memory_lower = memory_service.list_words(Some("pill")).await?;
    assert_eq!(sqlite_lower.len(), 1);
    assert_eq!(memory_lower.len(), 1);

    Ok(())
}

#[tokio::test]
async fn corrupt_range_rows_surface_as_storage_errors() -> Result<()> {
    let dir = TempDir::new()?;
    let pool = sqlite_pool(&dir).await?;
    let store = SqliteAddressStore::new(pool.clone());
    store.migrate().await?;

    sqlx::query("INSERT INTO blocked_ranges (ip_start, ip_end, created) VALUES (?, ?, ?)")
        .bind("not-hex")
        .bind("also-not-hex")
        .bind("2026-01-01T00:00:00+00:00")
        .execute(&pool)
        .await?;

    let service = AddressFilterService::new(store, StaticGeoResolver::empty());
    assert!(service.list_ranges().await.is_err());

    Ok(())
}

#[tokio::test]
async fn address_filter_round_trip_against_sqlite() -> Result<()> {
    let dir = TempDir::new()?;
    let store = SqliteAddressStore::new(sqlite_pool(&dir).await?);
    store.migrate().await?;
    let geo = StaticGeoResolver::new([
        ("212.42.18.1".parse()?, "GB".to_string()),
        ("1.0.1.1".parse()?, "CN".to_string()),
    ]);
    let service = AddressFilterService::new(store, geo);

    // Exact blocks.
    assert!(service.block("9.9.9.9").await?);
    assert!(!service.block("9.9.9.9").await?);
    assert!(!service.block("hello").await?);
    assert!(service.is_blocked_exact("9.9.9.9").await?);
    assert!(!service.is_blocked_exact("8.8.8.8").await?);

    // Ranges: containment runs in SQL over the hex encoding.
    assert!(service.block_range("9.9.9.0", "9.9.9.255").await?);
    assert!(!service.block_range("9.9.9.0", "9.9.9.255").await?);
    assert!(service.is_blocked_range("9.9.9.9").await?);
    assert!(service.is_blocked_range("9.9.9.0").await?);
    assert!(service.is_blocked_range("9.9.9.255").await?);
    assert!(!service.is_blocked_range("9.9.10.1").await?);

    assert!(service.block_range("2001:db8::", "2001:db8::ffff").await?);
    assert!(service.is_blocked_range("2001:db8::7").await?);
    assert!(!service.is_blocked_range("2001:db9::1").await?);

    // Countries.
    assert_eq!(
        service.resolve_country("212.42.18.1").await?,
        Some("GB".to_string())
    );
    assert!(service.block_country("GB").await?);
    assert!(!service.block_country("gb").await?);
    assert!(!service.block_country("Test").await?);
    assert!(service.is_blocked_country("212.42.18.1").await?);
    assert!(!service.is_blocked_country("1.0.1.1").await?);

    // Three-way OR.
    assert!(service.is_blocked("9.9.9.9").await?);
    assert!(service.is_blocked("9.9.9.42").await?);
    assert!(service.is_blocked("212.42.18.1").await?);
    assert!(!service.is_blocked("1.0.1.1").await?);
    assert!(!service.is_blocked("not-an-ip").await?);

    // Unblocking.
    let ranges = service.list_ranges().await?;
    assert_eq!(ranges.len(), 2);
    assert!(service.unblock_range(RangeSelector::ById(ranges[0].id)).await?);
    assert!(!service.is_blocked_range("9.9.9.9").await?);
    assert!(
        service
            .unblock_range(RangeSelector::ByBounds {
                start: "2001:db8::".to_string(),
                end: "2001:db8::ffff".to_string(),
            })
            .await?
    );
    assert!(service.list_ranges().await?.is_empty());

    assert!(service.unblock_country("GB").await?);
    assert!(!service.is_blocked("212.42.18.1").await?);
    assert!(service.unblock("9.9.9.9").await?);
    assert!(!service.is_blocked("9.9.9.9").await?);

    Ok(())
}

#[tokio::test]
async fn table_name_overrides_are_instance_configuration() -> Result<()> {
    let dir = TempDir::new()?;
    let pool = sqlite_pool(&dir).await?;

    let store = SqliteAddressStore::new(pool.clone())
        .with_addresses_table("denied_ips")
        .with_ranges_table("denied_ranges")
        .with_countries_table("bad table name");
    assert_eq!(store.addresses_table(), "denied_ips");
    assert_eq!(store.ranges_table(), "denied_ranges");
    // Invalid override keeps the default.
    assert_eq!(store.countries_table(), "blocked_countries");
    store.migrate().await?;

    // A second store with default names is unaffected by the first one's
    // configuration.
    let default_store = SqliteAddressStore::new(pool);
    default_store.migrate().await?;

    let service = AddressFilterService::new(store, StaticGeoResolver::empty());
    let default_service = AddressFilterService::new(default_store, StaticGeoResolver::empty());

    assert!(service.block("9.9.9.9").await?);
    assert!(service.is_blocked("9.9.9.9").await?);
    assert!(!default_service.is_blocked("9.9.9.9").await?);

    let words = SqliteWordStore::new(sqlite_pool(&dir).await?).with_table("spam_words");
    assert_eq!(words.table(), "spam_words");
    words.migrate().await?;
    let word_service = WordFilterService::new(words);
    assert!(word_service.add_word("seo").await?);
    assert!(word_service.contains_blocked_word("SEO time").await?);

    Ok(())
}
