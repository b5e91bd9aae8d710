//! Single-entry memoization keyed on declared dependencies.
//!
//! Each derived view (tier slice, option lists, suggestions, results) names
//! its inputs as a key. The value is recomputed whenever the key differs from
//! the one it was computed for, so a dependency change can never be observed
//! stale.

/// A derived value and the key it was computed from.
#[derive(Clone, Debug)]
pub struct Memo<K, V> {
    key: K,
    value: V,
    stale: bool,
    computations: u64,
}

impl<K: PartialEq, V> Memo<K, V> {
    /// Creates a memo by computing the value for `key`.
    pub fn new<F>(key: K, compute: F) -> Self
    where
        F: FnOnce(&K) -> V,
    {
        let value = compute(&key);
        Self {
            key,
            value,
            stale: false,
            computations: 1,
        }
    }

    /// Recomputes the value if `key` changed or the memo was invalidated.
    ///
    /// Returns true if the value was recomputed.
    pub fn update<F>(&mut self, key: K, compute: F) -> bool
    where
        F: FnOnce(&K) -> V,
    {
        if !self.stale && self.key == key {
            return false;
        }
        self.value = compute(&key);
        self.key = key;
        self.stale = false;
        self.computations += 1;
        true
    }

    /// Returns the value for `key`, recomputing it if needed.
    pub fn get_or_compute<F>(&mut self, key: K, compute: F) -> &V
    where
        F: FnOnce(&K) -> V,
    {
        self.update(key, compute);
        &self.value
    }

    /// Returns the current value.
    #[must_use]
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Returns the key the current value was computed from.
    #[must_use]
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Returns true if the value is valid for `key`.
    #[must_use]
    pub fn is_current(&self, key: &K) -> bool {
        !self.stale && self.key == *key
    }

    /// Forces the next update to recompute.
    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    /// Returns how many times the value has been computed.
    #[must_use]
    pub fn computations(&self) -> u64 {
        self.computations
    }
}
