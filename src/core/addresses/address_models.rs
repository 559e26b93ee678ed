// Address domain models - entities persisted by an AddressStore plus the
// request-metadata type used for client-address derivation.
//
// Pure data with no storage or GeoIP dependencies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single literal address on the denylist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockedAddress {
    /// Row identifier assigned by the store.
    pub id: i64,
    /// The blocked address, stored verbatim after validation.
    pub address: String,
    /// When the entry was added.
    pub created: DateTime<Utc>,
}

/// An inclusive address range on the denylist.
///
/// `start` and `end` are canonical encodings (see
/// [`encoding::encode_address`]) of validated addresses, with
/// `start <= end` guaranteed at insertion time.
///
/// [`encoding::encode_address`]: super::encoding::encode_address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockedRange {
    pub id: i64,
    /// Encoded lower bound, inclusive.
    pub start: u128,
    /// Encoded upper bound, inclusive.
    pub end: u128,
    pub created: DateTime<Utc>,
}

/// A blocked country, keyed by 2-letter uppercase ISO code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockedCountry {
    pub id: i64,
    /// ISO 3166-1 alpha-2 code, uppercase.
    pub iso: String,
    pub created: DateTime<Utc>,
}

/// How to identify a range when unblocking it: by row id, or by the exact
/// textual bounds it was created with.
#[derive(Debug, Clone, PartialEq)]
pub enum RangeSelector {
    ById(i64),
    ByBounds { start: String, end: String },
}

/// Request metadata used to derive the most likely client address.
///
/// Populated by the embedding request handler from whatever headers its
/// stack exposes; this crate only applies the precedence order.
#[derive(Debug, Clone, Default)]
pub struct ClientAddrSources {
    /// Client IP supplied by a trusted edge network (e.g. CF-Connecting-IP).
    pub edge_client_ip: Option<String>,
    /// General X-Forwarded-For value, if any.
    pub forwarded_for: Option<String>,
    /// The direct connection (socket) address.
    pub remote_addr: String,
}
