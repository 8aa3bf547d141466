//! Request parameter sets with canonical rendering
//!
//! Parameters are kept sorted by name. The canonical form of a value is what
//! gets concatenated into the signature input:
//!
//! - empty strings and nulls are absent, they contribute nothing
//! - decimals are normalized (`1.50` and `1.5` both render as `1.5`)
//! - floats use the shortest round-trip form, never scientific notation
//!
//! JSON bodies carry decimals as numbers, so a decimal that an `f64` cannot
//! hold exactly is refused rather than sent with a value the signature does
//! not cover.

use rust_decimal::Decimal;
use serde::ser::{Error as _, SerializeMap, Serializer};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::{AuthError, AuthResult};

/// A single scalar parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Explicit null, skipped when signing
    Null,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// Exact decimal number
    Decimal(Decimal),
    /// String
    Str(String),
}

impl ParamValue {
    /// Returns true when the value must not contribute to the signature
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Str(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Canonical textual form, `None` for empty values
    pub fn canonical(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Str(s) if s.is_empty() => None,
            Self::Str(s) => Some(s.clone()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Int(i) => Some(i.to_string()),
            // f64 Display never uses exponent notation
            Self::Float(f) => Some(f.to_string()),
            Self::Decimal(d) => Some(d.normalize().to_string()),
        }
    }
}

impl Serialize for ParamValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::Decimal(d) => {
                let canonical = d.normalize().to_string();
                match canonical.parse::<f64>() {
                    Ok(f) if f.to_string() == canonical => serializer.serialize_f64(f),
                    _ => Err(S::Error::custom(format!(
                        "decimal {canonical} cannot be sent as an exact JSON number"
                    ))),
                }
            }
            Self::Str(s) => serializer.serialize_str(s),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&String> for ParamValue {
    fn from(v: &String) -> Self {
        Self::Str(v.clone())
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<u32> for ParamValue {
    fn from(v: u32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<u64> for ParamValue {
    fn from(v: u64) -> Self {
        match i64::try_from(v) {
            Ok(i) => Self::Int(i),
            Err(_) => Self::Str(v.to_string()),
        }
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<Decimal> for ParamValue {
    fn from(v: Decimal) -> Self {
        Self::Decimal(v)
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Self::Null)
    }
}

/// A parameter set, sorted by name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(BTreeMap<String, ParamValue>);

impl Params {
    /// Create an empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a parameter
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Get a parameter
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    /// Number of parameters, including empty ones
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no parameters
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over all parameters in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate over non-empty parameters as canonical (name, value) pairs
    pub fn canonical_pairs(&self) -> impl Iterator<Item = (&str, String)> {
        self.0
            .iter()
            .filter_map(|(k, v)| v.canonical().map(|c| (k.as_str(), c)))
    }

    /// Concatenation of `name + value` for every non-empty parameter
    pub fn canonical_concat(&self) -> String {
        self.canonical_pairs().fold(String::new(), |mut acc, (k, v)| {
            acc.push_str(k);
            acc.push_str(&v);
            acc
        })
    }

    /// URL-encoded `name=value` pairs for non-empty parameters
    pub fn to_urlencoded(&self) -> AuthResult<String> {
        let pairs: Vec<(&str, String)> = self.canonical_pairs().collect();
        serde_urlencoded::to_string(&pairs).map_err(|e| AuthError::Encode(e.to_string()))
    }
}

impl Serialize for Params {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}
