//! Untyped request parameters
//!
//! Raw query-string and form values as they arrive over HTTP. Keys are looked
//! up case-insensitively and the first occurrence of a repeated key wins.

use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterBag {
    pairs: Vec<(String, String)>,
}

impl ParameterBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    /// First value stored under `key`, compared case-insensitively
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Like [`ParameterBag::get`], treating blank values as absent
    pub fn get_non_blank(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.trim().is_empty())
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// Append every pair of `other`, keeping existing values first
    pub fn extend(&mut self, other: ParameterBag) {
        self.pairs.extend(other.pairs);
    }

    /// First value of every distinct key, keys compared exactly, in arrival
    /// order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        let mut seen = HashSet::with_capacity(self.pairs.len());

        self.pairs
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .filter(move |(k, _)| seen.insert(*k))
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }
}

impl<K, V> FromIterator<(K, V)> for ParameterBag
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}
