//! Fast hash map and hash set type aliases.
//!
//! This module provides type aliases for [`FxHashMap`] and [`FxHashSet`] from the
//! `rustc-hash` crate. These use the Fx hash algorithm which is considerably
//! faster than the standard library's `HashMap` and `HashSet` for the short
//! string keys (object ids, field names, category ids) used throughout the
//! workspace. Maps whose iteration order reaches serialized output use
//! `BTreeMap` instead.
//!
//! # Examples
//!
//! ```
//! use elect_core::{FxHashMap, FxHashSet, fx_hash_set};
//!
//! let mut map: FxHashMap<String, i32> = FxHashMap::default();
//! map.insert("key".to_owned(), 42);
//!
//! let set: FxHashSet<&str> = fx_hash_set();
//! assert!(set.is_empty());
//! ```

/// A [`HashMap`](std::collections::HashMap) using the Fx hash algorithm.
///
/// This is faster than the standard library's `HashMap` for string keys
/// but does not provide denial-of-service resistance.
pub type FxHashMap<K, V> = rustc_hash::FxHashMap<K, V>;

/// A [`HashSet`](std::collections::HashSet) using the Fx hash algorithm.
///
/// This is faster than the standard library's `HashSet` for string keys
/// but does not provide denial-of-service resistance.
pub type FxHashSet<V> = rustc_hash::FxHashSet<V>;

/// Creates a new empty [`FxHashSet`].
///
/// This is equivalent to `FxHashSet::default()` but can be more ergonomic
/// in some contexts due to type inference.
///
/// # Examples
///
/// ```
/// use elect_core::fx_hash_set;
///
/// let set: elect_core::FxHashSet<String> = fx_hash_set();
/// assert!(set.is_empty());
/// ```
#[inline]
#[must_use]
pub fn fx_hash_set<V>() -> FxHashSet<V> {
    FxHashSet::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fx_hash_map_operations() {
        let mut map: FxHashMap<&str, i32> = FxHashMap::default();
        map.insert("one", 1);
        map.insert("two", 2);
        assert_eq!(map.get("one"), Some(&1));
        assert_eq!(map.get("three"), None);
    }

    #[test]
    fn test_fx_hash_set_operations() {
        let mut set: FxHashSet<&str> = fx_hash_set();
        set.insert("category_state");
        assert!(set.contains("category_state"));
        assert!(!set.contains("category_party"));
    }
}
