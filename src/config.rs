//! Construction-time settings for an [`AvlIndex`](crate::AvlIndex).

use serde::{Deserialize, Serialize};

/// What an insert does when the key is already present.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnDuplicate {
    /// The stored entry stays; the new one is handed back to the caller.
    #[default]
    KeepFirst,
    /// The stored entry is swapped for the new one.
    Replace,
}

/// Settings for an index or store.
///
/// Every field has a default, so a partial document deserializes cleanly:
///
/// ```
/// use avl_store::{IndexConfig, OnDuplicate};
///
/// let config = IndexConfig::default();
/// assert_eq!(config.capacity, 0);
/// assert_eq!(config.on_duplicate, OnDuplicate::KeepFirst);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Number of node slots to reserve up front.
    pub capacity: usize,
    /// Duplicate-key policy for inserts.
    pub on_duplicate: OnDuplicate,
}

impl IndexConfig {
    /// Returns the default config with `capacity` reserved slots.
    #[must_use]
    pub const fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            on_duplicate: OnDuplicate::KeepFirst,
        }
    }

    /// Returns this config with the given duplicate policy.
    #[must_use]
    pub const fn on_duplicate(mut self, on_duplicate: OnDuplicate) -> Self {
        self.on_duplicate = on_duplicate;
        self
    }
}
