// Word domain models.
//
// Pure data, no storage dependencies. The word value is lowercased before it
// ever reaches a store; every comparison downstream relies on that.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A banned word or phrase as persisted by a [`WordStore`].
///
/// [`WordStore`]: super::WordStore
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BannedWord {
    /// Row identifier assigned by the store.
    pub id: i64,
    /// The banned phrase, always lowercase.
    pub word: String,
    /// When the entry was added.
    pub created: DateTime<Utc>,
}
