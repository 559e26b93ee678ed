// Address filter - core resolution logic for blocked addresses.
//
// This service handles:
// - Exact-address membership
// - Inclusive range containment over canonically encoded addresses
// - Country blocking via a geolocation resolver
// - The three-way OR combination behind `is_blocked`
//
// NO storage or GeoIP reader dependencies here - just the decision logic and
// the two ports. Malformed input never raises: every operation fails closed
// with Ok(false) / Ok(None) and reserves Err for collaborator faults.

use super::address_models::{
    BlockedAddress, BlockedCountry, BlockedRange, ClientAddrSources, RangeSelector,
};
use super::encoding::{encode_address, normalize_iso, parse_address};
use async_trait::async_trait;
use std::net::IpAddr;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum AddressFilterError {
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error(transparent)]
    Geo(#[from] GeoError),
}

/// Faults from the geolocation reader. "Address not found" is NOT an error;
/// resolvers signal it with `Ok(None)`.
#[derive(Debug, Error)]
pub enum GeoError {
    #[error("GeoIP reader error: {0}")]
    Reader(String),
}

// ============================================================================
// STORAGE TRAITS (PORTS)
// ============================================================================

/// Trait for persisting the three address rule sets.
///
/// Addresses arrive canonicalized (the `Display` form of a parsed `IpAddr`),
/// range bounds arrive pre-encoded, and country codes arrive as uppercase
/// 2-letter ISO codes. Stores compare verbatim.
#[async_trait]
pub trait AddressStore: Send + Sync {
    // --- exact entries ---
    async fn contains_address(&self, address: &str) -> Result<bool, AddressFilterError>;
    async fn insert_address(&self, address: &str) -> Result<i64, AddressFilterError>;
    /// Returns false when no row matched.
    async fn delete_address(&self, address: &str) -> Result<bool, AddressFilterError>;
    async fn all_addresses(&self) -> Result<Vec<BlockedAddress>, AddressFilterError>;

    // --- ranges ---
    /// True iff any stored range satisfies `start <= encoded <= end`.
    async fn range_containing(&self, encoded: u128) -> Result<bool, AddressFilterError>;
    /// True iff a range with exactly these bounds exists.
    async fn range_exists(&self, start: u128, end: u128) -> Result<bool, AddressFilterError>;
    async fn insert_range(&self, start: u128, end: u128) -> Result<i64, AddressFilterError>;
    async fn delete_range_by_id(&self, id: i64) -> Result<bool, AddressFilterError>;
    async fn delete_range_by_bounds(
        &self,
        start: u128,
        end: u128,
    ) -> Result<bool, AddressFilterError>;
    async fn all_ranges(&self) -> Result<Vec<BlockedRange>, AddressFilterError>;

    // --- countries ---
    async fn contains_country(&self, iso: &str) -> Result<bool, AddressFilterError>;
    async fn insert_country(&self, iso: &str) -> Result<i64, AddressFilterError>;
    async fn delete_country(&self, iso: &str) -> Result<bool, AddressFilterError>;
    async fn all_countries(&self) -> Result<Vec<BlockedCountry>, AddressFilterError>;
}

/// Trait for resolving an address to its country.
///
/// Backed by a read-only local database in production; `Ok(None)` is the
/// normal outcome for addresses the database does not know.
#[async_trait]
pub trait GeoResolver: Send + Sync {
    async fn lookup_country(&self, addr: IpAddr) -> Result<Option<String>, GeoError>;
}

// ============================================================================
// CORE SERVICE
// ============================================================================

/// Address filter combining exact, range and country rule sets.
///
/// Holds no mutable state, so one instance can serve concurrent callers.
pub struct AddressFilterService<S: AddressStore, G: GeoResolver> {
    store: S,
    geo: G,
}

impl<S: AddressStore, G: GeoResolver> AddressFilterService<S, G> {
    /// Create a new address filter with the given store and geo resolver.
    pub fn new(store: S, geo: G) -> Self {
        Self { store, geo }
    }

    /// Check whether an address is blocked by any rule set.
    ///
    /// Short-circuits left to right; the geolocation lookup is the most
    /// expensive path and runs last.
    pub async fn is_blocked(&self, address: &str) -> Result<bool, AddressFilterError> {
        if self.is_blocked_exact(address).await? {
            return Ok(true);
        }
        if self.is_blocked_range(address).await? {
            return Ok(true);
        }
        self.is_blocked_country(address).await
    }

    /// Check the exact-address rule set. Malformed input cannot be blocked
    /// (only validated addresses are ever stored), so it resolves to false.
    pub async fn is_blocked_exact(&self, address: &str) -> Result<bool, AddressFilterError> {
        match parse_address(address) {
            Some(addr) => self.store.contains_address(&addr.to_string()).await,
            None => Ok(false),
        }
    }

    /// Check the range rule set: true iff the encoded address falls inside a
    /// stored inclusive range. Uses the same encoding applied at insertion
    /// time; malformed input fails closed.
    pub async fn is_blocked_range(&self, address: &str) -> Result<bool, AddressFilterError> {
        match parse_address(address) {
            Some(addr) => self.store.range_containing(encode_address(addr)).await,
            None => Ok(false),
        }
    }

    /// Check the country rule set. An address the geolocation database does
    /// not know, or malformed input, resolves to false.
    pub async fn is_blocked_country(&self, address: &str) -> Result<bool, AddressFilterError> {
        match self.resolve_country(address).await? {
            Some(iso) => match normalize_iso(&iso) {
                Some(iso) => self.store.contains_country(&iso).await,
                None => Ok(false),
            },
            None => Ok(false),
        }
    }

    /// Add a single address to the exact-block set. Returns false without
    /// inserting when the input is not a well-formed IP literal or is
    /// already blocked.
    pub async fn block(&self, address: &str) -> Result<bool, AddressFilterError> {
        let Some(addr) = parse_address(address) else {
            tracing::debug!(input = %address, "rejected malformed address");
            return Ok(false);
        };

        let canonical = addr.to_string();
        if self.store.contains_address(&canonical).await? {
            return Ok(false);
        }

        self.store.insert_address(&canonical).await?;
        Ok(true)
    }

    /// Remove a single address from the exact-block set. Returns false for
    /// malformed input or when the address was not blocked.
    pub async fn unblock(&self, address: &str) -> Result<bool, AddressFilterError> {
        match parse_address(address) {
            Some(addr) => self.store.delete_address(&addr.to_string()).await,
            None => Ok(false),
        }
    }

    /// List the exact-block set.
    pub async fn list_blocked(&self) -> Result<Vec<BlockedAddress>, AddressFilterError> {
        self.store.all_addresses().await
    }

    /// Add an inclusive address range to the denylist.
    ///
    /// Both endpoints must parse as addresses of the same family and encode
    /// in order (`start <= end`); an identical pair is rejected. Returns
    /// false, never an error, on any of those.
    pub async fn block_range(&self, start: &str, end: &str) -> Result<bool, AddressFilterError> {
        let (Some(start_addr), Some(end_addr)) = (parse_address(start), parse_address(end)) else {
            tracing::debug!(start = %start, end = %end, "rejected malformed range bounds");
            return Ok(false);
        };

        // A v4 bound paired with a v6 bound is almost certainly a caller
        // bug; reject it rather than compare across families.
        if start_addr.is_ipv4() != end_addr.is_ipv4() {
            tracing::debug!(start = %start_addr, end = %end_addr, "rejected mixed-family range");
            return Ok(false);
        }

        let (start_enc, end_enc) = (encode_address(start_addr), encode_address(end_addr));
        if start_enc > end_enc {
            return Ok(false);
        }
        if self.store.range_exists(start_enc, end_enc).await? {
            return Ok(false);
        }

        self.store.insert_range(start_enc, end_enc).await?;
        Ok(true)
    }

    /// Remove a range by row id or by the exact bounds it was created with.
    /// Returns false when nothing matched (or the bounds are malformed).
    pub async fn unblock_range(&self, selector: RangeSelector) -> Result<bool, AddressFilterError> {
        match selector {
            RangeSelector::ById(id) => self.store.delete_range_by_id(id).await,
            RangeSelector::ByBounds { start, end } => {
                let (Some(start_addr), Some(end_addr)) =
                    (parse_address(&start), parse_address(&end))
                else {
                    return Ok(false);
                };
                self.store
                    .delete_range_by_bounds(encode_address(start_addr), encode_address(end_addr))
                    .await
            }
        }
    }

    /// List the blocked ranges.
    pub async fn list_ranges(&self) -> Result<Vec<BlockedRange>, AddressFilterError> {
        self.store.all_ranges().await
    }

    /// Block a country by ISO code. Returns false for anything that is not a
    /// 2-letter code (after trimming) or for a duplicate.
    pub async fn block_country(&self, iso: &str) -> Result<bool, AddressFilterError> {
        let Some(iso) = normalize_iso(iso) else {
            tracing::debug!(input = %iso, "rejected malformed country code");
            return Ok(false);
        };

        if self.store.contains_country(&iso).await? {
            return Ok(false);
        }

        self.store.insert_country(&iso).await?;
        Ok(true)
    }

    /// Unblock a country by ISO code. Returns false for malformed codes and
    /// when no row matched.
    pub async fn unblock_country(&self, iso: &str) -> Result<bool, AddressFilterError> {
        match normalize_iso(iso) {
            Some(iso) => self.store.delete_country(&iso).await,
            None => Ok(false),
        }
    }

    /// List the blocked countries.
    pub async fn list_countries(&self) -> Result<Vec<BlockedCountry>, AddressFilterError> {
        self.store.all_countries().await
    }

    /// Resolve an address to its country code via the geolocation resolver.
    /// Malformed or unknown addresses resolve to `None`.
    pub async fn resolve_country(&self, address: &str) -> Result<Option<String>, AddressFilterError> {
        match parse_address(address) {
            Some(addr) => Ok(self.geo.lookup_country(addr).await?),
            None => Ok(None),
        }
    }

}

/// Derive the most likely client address from request metadata.
///
/// Precedence: the edge-network-supplied client IP, then a non-empty
/// forwarded-for value, then the direct connection address. Pure; no I/O.
pub fn resolve_client_address(sources: &ClientAddrSources) -> String {
    if let Some(edge) = sources.edge_client_ip.as_deref() {
        let edge = edge.trim();
        if !edge.is_empty() {
            return edge.to_string();
        }
    }
    if let Some(forwarded) = sources.forwarded_for.as_deref() {
        let forwarded = forwarded.trim();
        if !forwarded.is_empty() {
            return forwarded.to_string();
        }
    }
    sources.remote_addr.clone()
}

// ============================================================================
// TESTS
// ============================================================================
