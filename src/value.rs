//! Scalar values, parameter sets and records.
//!
//! Everything the builders and transformers consume is made of these three
//! types. Truthiness rules mirror what the gateway's callers expect from
//! decoded query/body parameters: `null`, `false`, `0`, `NaN` and the empty
//! string are falsy.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// A single field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl Scalar {
    /// Whether the value counts as "set" in a boolean context.
    pub fn is_truthy(&self) -> bool {
        match self {
            Scalar::Null => false,
            Scalar::Bool(b) => *b,
            Scalar::Int(n) => *n != 0,
            Scalar::Float(f) => *f != 0.0 && !f.is_nan(),
            Scalar::String(s) => !s.is_empty(),
        }
    }

    /// Numerically zero (`0`, `0.0`, `-0.0`).
    pub fn is_zero(&self) -> bool {
        match self {
            Scalar::Int(n) => *n == 0,
            Scalar::Float(f) => *f == 0.0,
            _ => false,
        }
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Scalar::Bool(_))
    }

    /// Loose equality through the textual form, so `"1"` matches `1`.
    pub fn loose_eq(&self, other: &Scalar) -> bool {
        match (self, other) {
            (Scalar::Null, Scalar::Null) => true,
            (Scalar::Null, _) | (_, Scalar::Null) => false,
            (a, b) => a.to_string() == b.to_string(),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => write!(f, "null"),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(n) => write!(f, "{}", n),
            Scalar::Float(x) if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e21 => {
                write!(f, "{:.0}", x)
            }
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::String(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::String(s)
    }
}

impl From<&String> for Scalar {
    fn from(s: &String) -> Self {
        Scalar::String(s.clone())
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Int(n)
    }
}

impl From<i32> for Scalar {
    fn from(n: i32) -> Self {
        Scalar::Int(n.into())
    }
}

impl From<u32> for Scalar {
    fn from(n: u32) -> Self {
        Scalar::Int(n.into())
    }
}

impl From<f64> for Scalar {
    fn from(f: f64) -> Self {
        Scalar::Float(f)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(v: Option<T>) -> Self {
        v.map_or(Scalar::Null, Into::into)
    }
}

/// One row of a table-like data source.
pub type Record = BTreeMap<String, Scalar>;

/// Insertion-ordered parameters, as decoded from a request.
///
/// Alias numbering in the builders follows this order, so it has to be
/// preserved from the JSON object all the way through.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamSet {
    entries: Vec<(String, Scalar)>,
}

impl ParamSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value. An existing key keeps its position and gets the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Scalar>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder-style [`ParamSet::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Scalar> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K, V> FromIterator<(K, V)> for ParamSet
where
    K: Into<String>,
    V: Into<Scalar>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = ParamSet::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

impl Serialize for ParamSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ParamSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ParamSetVisitor;

        impl<'de> Visitor<'de> for ParamSetVisitor {
            type Value = ParamSet;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object of scalar values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<ParamSet, A::Error> {
                let mut params = ParamSet::new();
                while let Some((key, value)) = access.next_entry::<String, Scalar>()? {
                    params.insert(key, value);
                }
                Ok(params)
            }
        }

        deserializer.deserialize_map(ParamSetVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(!Scalar::Null.is_truthy());
        assert!(!Scalar::from("").is_truthy());
        assert!(!Scalar::from(0).is_truthy());
        assert!(!Scalar::from(f64::NAN).is_truthy());
        assert!(!Scalar::from(false).is_truthy());
        assert!(Scalar::from("0").is_truthy());
        assert!(Scalar::from(-1).is_truthy());
        assert!(Scalar::from(true).is_truthy());
    }

    #[test]
    fn test_display_matches_json_text() {
        assert_eq!(Scalar::from(2.0).to_string(), "2");
        assert_eq!(Scalar::from(2.5).to_string(), "2.5");
        assert_eq!(Scalar::from(30).to_string(), "30");
        assert_eq!(Scalar::Null.to_string(), "null");
    }

    #[test]
    fn test_loose_eq() {
        assert!(Scalar::from("1").loose_eq(&Scalar::from(1)));
        assert!(Scalar::from("admin").loose_eq(&Scalar::from("admin")));
        assert!(!Scalar::Null.loose_eq(&Scalar::from("null")));
    }

    #[test]
    fn test_insert_keeps_position() {
        let mut params = ParamSet::new().with("a", 1).with("b", 2);
        params.insert("a", 3);
        let keys: Vec<_> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["a", "b"]);
        assert_eq!(params.get("a"), Some(&Scalar::Int(3)));
    }

    #[test]
    fn test_deserialize_preserves_order() {
        let params: ParamSet =
            serde_json::from_str(r#"{"zeta": "z", "alpha": 1, "mid": null, "flag": false}"#)
                .unwrap();
        let keys: Vec<_> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["zeta", "alpha", "mid", "flag"]);
        assert_eq!(params.get("mid"), Some(&Scalar::Null));
        assert_eq!(params.get("alpha"), Some(&Scalar::Int(1)));
    }

    #[test]
    fn test_scalar_untagged_json() {
        let v: Scalar = serde_json::from_str("1.5").unwrap();
        assert_eq!(v, Scalar::Float(1.5));
        assert_eq!(serde_json::to_string(&Scalar::from("x")).unwrap(), "\"x\"");
    }
}
