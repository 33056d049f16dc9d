use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::style::{Color, Font};
use crate::core::units::parse_length;
use crate::error::{GvizError, GvizResult};

/// One value stored in a frame environment.
///
/// `Nothing` is an explicit unset: it is found by lookup and therefore hides
/// any value further up the frame chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Nothing,
    Bool(bool),
    Number(f64),
    Numbers(Vec<f64>),
    Text(String),
    Color(Color),
}

impl ParamValue {
    #[must_use]
    pub fn is_nothing(&self) -> bool {
        matches!(self, Self::Nothing)
    }

    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Nothing => "nothing",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::Numbers(_) => "numbers",
            Self::Text(_) => "text",
            Self::Color(_) => "color",
        }
    }

    pub fn as_f64(&self, key: &str) -> GvizResult<f64> {
        match self {
            Self::Number(value) if value.is_finite() => Ok(*value),
            Self::Number(_) => Err(GvizError::invalid_parameter(key, "number must be finite")),
            Self::Text(raw) => raw.trim().parse::<f64>().map_err(|_| {
                GvizError::invalid_parameter(key, format!("`{raw}` is not a number"))
            }),
            _ => Err(self.mismatch(key, "number")),
        }
    }

    /// Length in points. Numbers are points; text may carry a unit (`"8mm"`).
    pub fn as_length_pt(&self, key: &str) -> GvizResult<f64> {
        match self {
            Self::Number(_) => self.as_f64(key),
            Self::Text(raw) => {
                parse_length(raw).map_err(|err| GvizError::invalid_parameter(key, err.to_string()))
            }
            _ => Err(self.mismatch(key, "length")),
        }
    }

    pub fn as_color(&self, key: &str) -> GvizResult<Color> {
        match self {
            Self::Color(color) => {
                color
                    .validate()
                    .map_err(|err| GvizError::invalid_parameter(key, err.to_string()))?;
                Ok(*color)
            }
            Self::Text(raw) => {
                Color::parse(raw).map_err(|err| GvizError::invalid_parameter(key, err.to_string()))
            }
            _ => Err(self.mismatch(key, "color")),
        }
    }

    pub fn as_font(&self, key: &str) -> GvizResult<Font> {
        match self {
            Self::Text(raw) => {
                Font::parse(raw).map_err(|err| GvizError::invalid_parameter(key, err.to_string()))
            }
            _ => Err(self.mismatch(key, "font")),
        }
    }

    pub fn as_str(&self, key: &str) -> GvizResult<&str> {
        match self {
            Self::Text(raw) => Ok(raw),
            _ => Err(self.mismatch(key, "text")),
        }
    }

    pub fn as_numbers(&self, key: &str) -> GvizResult<&[f64]> {
        match self {
            Self::Numbers(values) => Ok(values),
            _ => Err(self.mismatch(key, "numbers")),
        }
    }

    pub fn as_bool(&self, key: &str) -> GvizResult<bool> {
        match self {
            Self::Bool(value) => Ok(*value),
            _ => Err(self.mismatch(key, "bool")),
        }
    }

    fn mismatch(&self, key: &str, expected: &str) -> GvizError {
        GvizError::invalid_parameter(
            key,
            format!("expected {expected}, found {}", self.kind_name()),
        )
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<f64>> for ParamValue {
    fn from(value: Vec<f64>) -> Self {
        Self::Numbers(value)
    }
}

impl From<&[f64]> for ParamValue {
    fn from(value: &[f64]) -> Self {
        Self::Numbers(value.to_vec())
    }
}

impl From<Color> for ParamValue {
    fn from(value: Color) -> Self {
        Self::Color(value)
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Nothing, Into::into)
    }
}

/// Insertion-ordered parameter environment of one frame, track or layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params {
    entries: IndexMap<String, ParamValue>,
}

impl Params {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        self.entries.shift_remove(key)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Merges `other` into `self`; keys present in both take `other`'s value.
    pub fn extend(&mut self, other: Params) {
        self.entries.extend(other.entries);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}
