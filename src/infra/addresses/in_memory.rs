// In-memory implementation of AddressStore.
//
// Same contract as the SQLite store; handy for tests and for embedders that
// keep their denylists in configuration rather than a database.

use crate::core::addresses::{
    AddressFilterError, AddressStore, BlockedAddress, BlockedCountry, BlockedRange,
};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};

pub struct InMemoryAddressStore {
    addresses: DashMap<i64, BlockedAddress>,
    ranges: DashMap<i64, BlockedRange>,
    countries: DashMap<i64, BlockedCountry>,
    next_id: AtomicI64,
}

impl InMemoryAddressStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            addresses: DashMap::new(),
            ranges: DashMap::new(),
            countries: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }
}

impl Default for InMemoryAddressStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AddressStore for InMemoryAddressStore {
    async fn contains_address(&self, address: &str) -> Result<bool, AddressFilterError> {
        Ok(self.addresses.iter().any(|r| r.address == address))
    }

    async fn insert_address(&self, address: &str) -> Result<i64, AddressFilterError> {
        let id = self.next_id();
        self.addresses.insert(
            id,
            BlockedAddress {
                id,
                address: address.to_string(),
                created: Utc::now(),
            },
        );
        Ok(id)
    }

    async fn delete_address(&self, address: &str) -> Result<bool, AddressFilterError> {
        let id = self
            .addresses
            .iter()
            .find(|r| r.address == address)
            .map(|r| r.id);
        Ok(match id {
            Some(id) => self.addresses.remove(&id).is_some(),
            None => false,
        })
    }

    async fn all_addresses(&self) -> Result<Vec<BlockedAddress>, AddressFilterError> {
        let mut rows: Vec<_> = self.addresses.iter().map(|r| r.value().clone()).collect();
        rows.sort_by_key(|r| r.id);
        Ok(rows)
    }

    async fn range_containing(&self, encoded: u128) -> Result<bool, AddressFilterError> {
        Ok(self
            .ranges
            .iter()
            .any(|r| r.start <= encoded && encoded <= r.end))
    }

    async fn range_exists(&self, start: u128, end: u128) -> Result<bool, AddressFilterError> {
        Ok(self.ranges.iter().any(|r| r.start == start && r.end == end))
    }

    async fn insert_range(&self, start: u128, end: u128) -> Result<i64, AddressFilterError> {
        let id = self.next_id();
        self.ranges.insert(
            id,
            BlockedRange {
                id,
                start,
                end,
                created: Utc::now(),
            },
        );
        Ok(id)
    }

    async fn delete_range_by_id(&self, id: i64) -> Result<bool, AddressFilterError> {
        Ok(self.ranges.remove(&id).is_some())
    }

    async fn delete_range_by_bounds(
        &self,
        start: u128,
        end: u128,
    ) -> Result<bool, AddressFilterError> {
        let id = self
            .ranges
            .iter()
            .find(|r| r.start == start && r.end == end)
            .map(|r| r.id);
        Ok(match id {
            Some(id) => self.ranges.remove(&id).is_some(),
            None => false,
        })
    }

    async fn all_ranges(&self) -> Result<Vec<BlockedRange>, AddressFilterError> {
        let mut rows: Vec<_> = self.ranges.iter().map(|r| r.value().clone()).collect();
        rows.sort_by_key(|r| r.id);
        Ok(rows)
    }

    async fn contains_country(&self, iso: &str) -> Result<bool, AddressFilterError> {
        Ok(self.countries.iter().any(|r| r.iso == iso))
    }

    async fn insert_country(&self, iso: &str) -> Result<i64, AddressFilterError> {
        let id = self.next_id();
        self.countries.insert(
            id,
            BlockedCountry {
                id,
                iso: iso.to_string(),
                created: Utc::now(),
            },
        );
        Ok(id)
    }

    async fn delete_country(&self, iso: &str) -> Result<bool, AddressFilterError> {
        let id = self.countries.iter().find(|r| r.iso == iso).map(|r| r.id);
        Ok(match id {
            Some(id) => self.countries.remove(&id).is_some(),
            None => false,
        })
    }

    async fn all_countries(&self) -> Result<Vec<BlockedCountry>, AddressFilterError> {
        let mut rows: Vec<_> = self.countries.iter().map(|r| r.value().clone()).collect();
        rows.sort_by_key(|r| r.id);
        Ok(rows)
    }
}
