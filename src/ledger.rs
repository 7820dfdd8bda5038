//! The touched-keys ledger behind dirty-state reporting.

/// Records which keys have been written (or loaded) since the last full
/// enumeration of the map.
///
/// This is a multiset, not a set: writing the same key twice records it twice,
/// and a read consumes exactly one occurrence. [`clear`](Self::clear) is the
/// "everything has been observed" signal and empties the whole ledger.
#[derive(Debug, Clone, Default)]
pub struct ChangeLedger {
    touched: Vec<String>,
}

impl ChangeLedger {
    /// Empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a write of `key`. Duplicates accumulate.
    pub fn record(&mut self, key: &str) {
        self.touched.push(key.to_string());
    }

    /// Remove the first recorded occurrence of `key`, if there is one.
    /// A key with no recorded occurrence is left alone; reads of
    /// already-observed keys are not an error.
    pub fn consume(&mut self, key: &str) {
        if let Some(pos) = self.touched.iter().position(|k| k == key) {
            self.touched.remove(pos);
        }
    }

    /// Forget every recorded key.
    pub fn clear(&mut self) {
        self.touched.clear();
    }

    /// `true` while at least one recorded write has not been observed.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.touched.is_empty()
    }

    /// The recorded keys, oldest first.
    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.touched
    }
}
