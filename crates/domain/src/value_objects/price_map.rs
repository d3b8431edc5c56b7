use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Symbol-keyed values that keep insertion order.
///
/// Order is significant: the IL engine pairs the n-th entry with the n-th
/// weight, so token0 must stay first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceMap {
    entries: Vec<(String, f64)>,
}

impl PriceMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the value for `symbol`, keeping its position.
    pub fn insert(&mut self, symbol: impl Into<String>, value: f64) {
        let symbol = symbol.into();
        match self.entries.iter_mut().find(|(k, _)| *k == symbol) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((symbol, value)),
        }
    }

    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(k, _)| k == symbol)
            .map(|(_, v)| *v)
    }

    #[must_use]
    pub fn contains(&self, symbol: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == symbol)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|(_, v)| *v)
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for PriceMap {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl Serialize for PriceMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(k, v)| (k, v)))
    }
}

impl<'de> Deserialize<'de> for PriceMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PriceMapVisitor;

        impl<'de> Visitor<'de> for PriceMapVisitor {
            type Value = PriceMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of symbol to number")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<PriceMap, A::Error> {
                let mut map = PriceMap::new();
                while let Some((k, v)) = access.next_entry::<String, f64>()? {
                    map.insert(k, v);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(PriceMapVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_insertion_order() {
        let map: PriceMap = [("WETH", 1.2), ("USDC", 1.0)].into_iter().collect();
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["WETH", "USDC"]);

        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"WETH":1.2,"USDC":1.0}"#);

        let back: PriceMap = serde_json::from_str(r#"{"ZRX":2.0,"AAVE":0.5}"#).unwrap();
        assert_eq!(back.keys().collect::<Vec<_>>(), vec!["ZRX", "AAVE"]);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut map = PriceMap::new();
        map.insert("A", 1.0);
        map.insert("B", 2.0);
        map.insert("A", 3.0);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("A"), Some(3.0));
        assert_eq!(map.values().collect::<Vec<_>>(), vec![3.0, 2.0]);
    }
}
