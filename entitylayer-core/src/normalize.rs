//! Error normalization table.
//!
//! Backends surface failures with driver-specific wording. The [`ErrorMap`]
//! lets an application substitute its own vocabulary: each entry maps a
//! fragment of a driver message to a replacement message, and the store
//! consults the table on every backend-raised failure.
//!
//! Match order is deterministic: entries are scanned longest fragment first,
//! ties broken lexicographically, and the first fragment contained in the
//! failure message wins. The longest-first rule keeps the most specific
//! mapping in charge when fragments overlap.

/// An ordered table mapping driver-message fragments to replacement messages.
///
/// # Example
///
/// ```ignore
/// use entitylayer_core::normalize::ErrorMap;
///
/// let mut map = ErrorMap::new();
/// map.insert("duplicate key", "already exists");
/// assert_eq!(map.resolve("E11000 duplicate key error"), Some("already exists"));
/// ```
#[derive(Debug, Clone)]
pub struct ErrorMap {
    // Invariant: sorted by (fragment length descending, fragment ascending).
    entries: Vec<(String, String)>,
}

impl ErrorMap {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Adds or replaces a mapping from a driver-message fragment to a
    /// replacement message.
    pub fn insert(&mut self, fragment: &str, replacement: &str) {
        self.entries.retain(|(f, _)| f != fragment);
        self.entries
            .push((fragment.to_string(), replacement.to_string()));
        self.entries
            .sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    }

    /// Resolves a failure message against the table.
    ///
    /// Returns the replacement for the first matching fragment in scan order,
    /// or `None` when no fragment is contained in the message.
    pub fn resolve(&self, message: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(fragment, _)| message.contains(fragment.as_str()))
            .map(|(_, replacement)| replacement.as_str())
    }
}

impl Default for ErrorMap {
    /// The default table carries the one driver mapping applications almost
    /// always want: the driver's empty-result wording becomes `"not found"`.
    fn default() -> Self {
        let mut map = Self::new();
        map.insert("no documents in result", "not found");
        map
    }
}
