use alloc::string::String;
use core::fmt;

use serde::{Deserialize, Serialize};

/// A labelled record stored in the index.
///
/// The `key` decides where the entry lives in the tree; the `label` is the
/// payload, and is also required to match when deleting. Labels need not be
/// unique, keys must be.
///
/// # Examples
///
/// ```
/// use avl_store::Entry;
///
/// let entry = Entry::new("War and Peace", 70);
/// assert_eq!(entry.label(), "War and Peace");
/// assert_eq!(entry.key(), 70);
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Entry {
    label: String,
    key: i64,
}

impl Entry {
    /// Creates an entry from a label and an ordering key.
    pub fn new(label: impl Into<String>, key: i64) -> Self {
        Self {
            label: label.into(),
            key,
        }
    }

    /// Returns the label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the ordering key.
    #[must_use]
    pub const fn key(&self) -> i64 {
        self.key
    }

    /// Returns true if both the label and key equal the given pair.
    #[must_use]
    pub fn matches(&self, label: &str, key: i64) -> bool {
        self.key == key && self.label == label
    }

    /// Splits the entry into its label and key.
    #[must_use]
    pub fn into_parts(self) -> (String, i64) {
        (self.label, self.key)
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label, self.key)
    }
}

impl<S: Into<String>> From<(S, i64)> for Entry {
    fn from((label, key): (S, i64)) -> Self {
        Self::new(label, key)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn matches_label_and_key() {
        let entry = Entry::new("1984", 40);
        assert!(entry.matches("1984", 40));
        assert!(!entry.matches("1984", 41));
        assert!(!entry.matches("Animal Farm", 40));
    }

    #[test]
    fn display_shows_label_then_key() {
        assert_eq!(Entry::new("Emma", 9).to_string(), "Emma (9)");
    }

    #[test]
    fn from_tuple() {
        let entry: Entry = ("Persuasion", -3).into();
        assert_eq!(entry.into_parts(), ("Persuasion".into(), -3));
    }
}
