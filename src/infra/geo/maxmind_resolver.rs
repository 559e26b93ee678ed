// GeoResolver implementations.
//
// `MaxMindGeoResolver` reads a local GeoIP2 Country database file. The file
// is treated as read-only and pre-provisioned; keeping it current is outside
// this crate. `StaticGeoResolver` is a fixture for tests and offline use.

use crate::core::addresses::{GeoError, GeoResolver};
use async_trait::async_trait;
use maxminddb::{geoip2, MaxMindDBError, Reader};
use std::collections::HashMap;
use std::net::IpAddr;
use std::path::Path;

/// Country resolver backed by a MaxMind GeoIP2 Country database.
pub struct MaxMindGeoResolver {
    reader: Reader<Vec<u8>>,
}

impl MaxMindGeoResolver {
    /// Open a GeoIP2 database file (e.g. `GeoLite2-Country.mmdb`).
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, GeoError> {
        let reader = Reader::open_readfile(path.as_ref())
            .map_err(|e| GeoError::Reader(e.to_string()))?;
        Ok(Self { reader })
    }

    /// Build a resolver from raw database bytes (useful for embedded data).
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, GeoError> {
        let reader = Reader::from_source(data).map_err(|e| GeoError::Reader(e.to_string()))?;
        Ok(Self { reader })
    }
}

#[async_trait]
impl GeoResolver for MaxMindGeoResolver {
    async fn lookup_country(&self, addr: IpAddr) -> Result<Option<String>, GeoError> {
        match self.reader.lookup::<geoip2::Country>(addr) {
            Ok(record) => Ok(record
                .country
                .and_then(|c| c.iso_code)
                .map(String::from)),
            // An address the database does not cover is a normal negative
            // result, not a fault.
            Err(MaxMindDBError::AddressNotFoundError(_)) => Ok(None),
            Err(e) => Err(GeoError::Reader(e.to_string())),
        }
    }
}

/// Fixture resolver over a fixed address-to-country map.
pub struct StaticGeoResolver {
    countries: HashMap<IpAddr, String>,
}

impl StaticGeoResolver {
    pub fn new(entries: impl IntoIterator<Item = (IpAddr, String)>) -> Self {
        Self {
            countries: entries.into_iter().collect(),
        }
    }

    /// An empty resolver: every lookup answers "not found".
    pub fn empty() -> Self {
        Self {
            countries: HashMap::new(),
        }
    }
}

#[async_trait]
impl GeoResolver for StaticGeoResolver {
    async fn lookup_country(&self, addr: IpAddr) -> Result<Option<String>, GeoError> {
        Ok(self.countries.get(&addr).cloned())
    }
}
