//! Open property values.
//!
//! Component properties are structurally typed: a [`PropValue`] is a
//! discriminated union of scalars, lists, and maps, so component
//! implementations can assert the shapes they need without reaching for
//! runtime reflection.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single property value: scalar, list, or map.
///
/// Deserializes untagged, so plain YAML/JSON values map directly:
/// `42` → `Int`, `[1, 2]` → `List`, `{a: 1}` → `Map`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    /// Explicit null or absent value.
    Null,
    /// Boolean scalar.
    Bool(bool),
    /// Integer scalar.
    Int(i64),
    /// Floating-point scalar.
    Float(f64),
    /// String scalar.
    String(String),
    /// Ordered list of values.
    List(Vec<PropValue>),
    /// String-keyed map of values.
    Map(BTreeMap<String, PropValue>),
}

impl PropValue {
    /// Short name of the value's shape, used in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }

    /// Numeric view accepting both `Int` and `Float`.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            #[allow(clippy::cast_precision_loss)]
            Self::Int(n) => Some(*n as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// String view.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for PropValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for PropValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for PropValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for PropValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for PropValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Vec<PropValue>> for PropValue {
    fn from(list: Vec<PropValue>) -> Self {
        Self::List(list)
    }
}

impl From<Props> for PropValue {
    fn from(props: Props) -> Self {
        Self::Map(props.0)
    }
}

/// Error produced by a typed property access.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("property `{prop}`: expected {expected}, got {actual}")]
pub struct PropError {
    /// Name of the offending property.
    pub prop: String,
    /// Shape the accessor expected.
    pub expected: &'static str,
    /// Shape actually found (`missing` when absent).
    pub actual: &'static str,
}

impl PropError {
    fn new(prop: &str, expected: &'static str, actual: &'static str) -> Self {
        Self {
            prop: prop.to_owned(),
            expected,
            actual,
        }
    }
}

/// A component's property map with typed accessors.
///
/// Required accessors (`str_prop`, `f64_prop`, ...) fail with [`PropError`]
/// when the property is absent or has the wrong shape. `opt_*` variants
/// treat absent and explicit-null values as `None` but still reject wrong
/// shapes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Props(BTreeMap<String, PropValue>);

impl Props {
    /// Create an empty property map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Layer `overlay` over `base`; overlay entries win.
    #[must_use]
    pub fn merged(base: &Self, overlay: &Self) -> Self {
        let mut map = base.0.clone();
        for (key, value) in &overlay.0 {
            map.insert(key.clone(), value.clone());
        }
        Self(map)
    }

    /// Insert a property, returning `self` for chained construction.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<PropValue>) -> Self {
        self.0.insert(key.to_owned(), value.into());
        self
    }

    /// Insert a property.
    pub fn insert(&mut self, key: &str, value: impl Into<PropValue>) {
        self.0.insert(key.to_owned(), value.into());
    }

    /// Raw access to a property value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.0.get(key)
    }

    /// Whether a non-null value is present for `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        !matches!(self.0.get(key), None | Some(PropValue::Null))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &PropValue)> {
        self.0.iter()
    }

    fn present(&self, key: &str) -> Option<&PropValue> {
        match self.0.get(key) {
            None | Some(PropValue::Null) => None,
            Some(value) => Some(value),
        }
    }

    /// Required string property.
    pub fn str_prop(&self, key: &str) -> Result<&str, PropError> {
        match self.present(key) {
            Some(PropValue::String(s)) => Ok(s),
            Some(other) => Err(PropError::new(key, "string", other.kind())),
            None => Err(PropError::new(key, "string", "missing")),
        }
    }

    /// Optional string property.
    pub fn opt_str(&self, key: &str) -> Result<Option<&str>, PropError> {
        self.present(key)
            .map(|value| match value {
                PropValue::String(s) => Ok(s.as_str()),
                other => Err(PropError::new(key, "string", other.kind())),
            })
            .transpose()
    }

    /// Required numeric property; integers widen to `f64`.
    pub fn f64_prop(&self, key: &str) -> Result<f64, PropError> {
        match self.present(key) {
            Some(value) => value
                .as_f64()
                .ok_or_else(|| PropError::new(key, "number", value.kind())),
            None => Err(PropError::new(key, "number", "missing")),
        }
    }

    /// Optional numeric property.
    pub fn opt_f64(&self, key: &str) -> Result<Option<f64>, PropError> {
        self.present(key)
            .map(|value| {
                value
                    .as_f64()
                    .ok_or_else(|| PropError::new(key, "number", value.kind()))
            })
            .transpose()
    }

    /// Required integer property.
    pub fn i64_prop(&self, key: &str) -> Result<i64, PropError> {
        match self.present(key) {
            Some(PropValue::Int(n)) => Ok(*n),
            Some(other) => Err(PropError::new(key, "integer", other.kind())),
            None => Err(PropError::new(key, "integer", "missing")),
        }
    }

    /// Optional integer property.
    pub fn opt_i64(&self, key: &str) -> Result<Option<i64>, PropError> {
        self.present(key)
            .map(|value| match value {
                PropValue::Int(n) => Ok(*n),
                other => Err(PropError::new(key, "integer", other.kind())),
            })
            .transpose()
    }

    /// Required boolean property.
    pub fn bool_prop(&self, key: &str) -> Result<bool, PropError> {
        match self.present(key) {
            Some(PropValue::Bool(b)) => Ok(*b),
            Some(other) => Err(PropError::new(key, "bool", other.kind())),
            None => Err(PropError::new(key, "bool", "missing")),
        }
    }

    /// Optional boolean property.
    pub fn opt_bool(&self, key: &str) -> Result<Option<bool>, PropError> {
        self.present(key)
            .map(|value| match value {
                PropValue::Bool(b) => Ok(*b),
                other => Err(PropError::new(key, "bool", other.kind())),
            })
            .transpose()
    }

    /// Required list property.
    pub fn list_prop(&self, key: &str) -> Result<&[PropValue], PropError> {
        match self.present(key) {
            Some(PropValue::List(items)) => Ok(items),
            Some(other) => Err(PropError::new(key, "list", other.kind())),
            None => Err(PropError::new(key, "list", "missing")),
        }
    }

    /// Optional list property.
    pub fn opt_list(&self, key: &str) -> Result<Option<&[PropValue]>, PropError> {
        self.present(key)
            .map(|value| match value {
                PropValue::List(items) => Ok(items.as_slice()),
                other => Err(PropError::new(key, "list", other.kind())),
            })
            .transpose()
    }

    /// Required map property.
    pub fn map_prop(&self, key: &str) -> Result<&BTreeMap<String, PropValue>, PropError> {
        match self.present(key) {
            Some(PropValue::Map(map)) => Ok(map),
            Some(other) => Err(PropError::new(key, "map", other.kind())),
            None => Err(PropError::new(key, "map", "missing")),
        }
    }

    /// Required list of numbers; integers widen to `f64`.
    pub fn f64_list(&self, key: &str) -> Result<Vec<f64>, PropError> {
        self.list_prop(key)?
            .iter()
            .map(|item| {
                item.as_f64()
                    .ok_or_else(|| PropError::new(key, "list of numbers", item.kind()))
            })
            .collect()
    }

    /// Required list of strings.
    pub fn string_list(&self, key: &str) -> Result<Vec<String>, PropError> {
        self.list_prop(key)?
            .iter()
            .map(|item| match item {
                PropValue::String(s) => Ok(s.clone()),
                other => Err(PropError::new(key, "list of strings", other.kind())),
            })
            .collect()
    }
}

impl FromIterator<(String, PropValue)> for Props {
    fn from_iter<I: IntoIterator<Item = (String, PropValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(s) => f.write_str(s),
            Self::List(_) | Self::Map(_) => f.write_str(self.kind()),
        }
    }
}
