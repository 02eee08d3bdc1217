//! A map from keys to lists of values.
//!
//! Submitted form data can repeat a key (`color=red&color=blue`), so
//! [`QueryDict`](crate::querydict::QueryDict) stores its entries in a
//! [`MultiValueDict`] rather than a plain map.

use std::collections::hash_map;
use std::collections::HashMap;
use std::hash::Hash;

/// A map where each key holds an ordered list of values.
///
/// Single-value access via [`get`](MultiValueDict::get) yields the value
/// submitted last; [`get_list`](MultiValueDict::get_list) yields the whole
/// list in submission order.
///
/// # Examples
///
/// ```
/// use subforms_core::utils::MultiValueDict;
///
/// let mut d = MultiValueDict::new();
/// d.append("color".to_string(), "red");
/// d.append("color".to_string(), "blue");
///
/// assert_eq!(d.get(&"color".to_string()), Some(&"blue"));
/// assert_eq!(d.get_list(&"color".to_string()), Some(&vec!["red", "blue"]));
/// ```
#[derive(Debug, Clone)]
pub struct MultiValueDict<K: Eq + Hash, V> {
    inner: HashMap<K, Vec<V>>,
}

impl<K: Eq + Hash, V> Default for MultiValueDict<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash, V> MultiValueDict<K, V> {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self {
            inner: HashMap::new(),
        }
    }

    /// The last value appended under `key`, if any.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_list(key)?.last()
    }

    /// Every value appended under `key`, in order, if any.
    pub fn get_list(&self, key: &K) -> Option<&Vec<V>> {
        self.inner.get(key)
    }

    /// Replaces whatever `key` held with the single given value.
    pub fn set(&mut self, key: K, value: V) {
        self.inner.insert(key, vec![value]);
    }

    /// Adds a value to the end of `key`'s list.
    pub fn append(&mut self, key: K, value: V) {
        self.inner.entry(key).or_default().push(value);
    }

    /// The number of distinct keys.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` when no keys are present.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl<'a, K: Eq + Hash, V> IntoIterator for &'a MultiValueDict<K, V> {
    type Item = (&'a K, &'a Vec<V>);
    type IntoIter = hash_map::Iter<'a, K, Vec<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_returns_last() {
        let mut d = MultiValueDict::new();
        d.append("k".to_string(), 1);
        d.append("k".to_string(), 2);
        assert_eq!(d.get(&"k".to_string()), Some(&2));
        assert_eq!(d.get_list(&"k".to_string()), Some(&vec![1, 2]));
    }

    #[test]
    fn test_set_replaces_list() {
        let mut d = MultiValueDict::new();
        d.append("k".to_string(), 1);
        d.append("k".to_string(), 2);
        d.set("k".to_string(), 3);
        assert_eq!(d.get_list(&"k".to_string()), Some(&vec![3]));
    }

    #[test]
    fn test_missing_key() {
        let d: MultiValueDict<String, i32> = MultiValueDict::new();
        assert!(d.is_empty());
        assert_eq!(d.get(&"absent".to_string()), None);
        assert_eq!(d.get_list(&"absent".to_string()), None);
    }

    #[test]
    fn test_len_counts_keys_not_values() {
        let mut d = MultiValueDict::new();
        d.append("a".to_string(), 1);
        d.append("a".to_string(), 2);
        d.set("b".to_string(), 3);
        assert_eq!(d.len(), 2);
    }

    #[test]
    fn test_iteration_yields_value_lists() {
        let mut d = MultiValueDict::new();
        d.append("a".to_string(), 1);
        d.append("a".to_string(), 2);
        let collected: Vec<_> = (&d).into_iter().collect();
        assert_eq!(collected, vec![(&"a".to_string(), &vec![1, 2])]);
    }
}
