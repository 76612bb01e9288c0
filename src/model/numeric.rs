//! Decimal values kept as strings in custom resources.
//!
//! Custom resources cannot carry floats portably, so these wrappers hold the
//! textual form. Plain serde serialization writes that text as a JSON string;
//! [`crate::model::wire`] writes it as a JSON number for the gateway and the
//! dashboard.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::wire::WIRE_NUMBER_TOKEN;

/// Admission pattern for [`Percent`] values, positive and at most `1.0`.
pub const PERCENT_PATTERN: &str = r"^0\.\d+|1\.0$";

static PERCENT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(PERCENT_PATTERN).expect("percent pattern is a valid regex"));

/// A floating point number represented as a string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Float64(String);

impl Float64 {
    /// Wrap `value` if it parses as a decimal number.
    pub fn parse<S: Into<String>>(value: S) -> Option<Self> {
        let value = value.into();
        parse_decimal(&value).map(|_| Self(value))
    }

    #[cfg(test)]
    pub(crate) fn unchecked(value: &str) -> Self {
        Self(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_f64(&self) -> Option<f64> {
        parse_decimal(&self.0)
    }
}

impl fmt::Display for Float64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<f64> for Float64 {
    fn from(value: f64) -> Self {
        Self(value.to_string())
    }
}

impl Serialize for Float64 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_newtype_struct(WIRE_NUMBER_TOKEN, self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for Float64 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DecimalVisitor { type_name: "Float64" }).map(Float64)
    }
}

/// A percentage expressed as a fraction, e.g. `"0.5"`.
///
/// Any decimal is accepted here; [`PERCENT_PATTERN`] is enforced at admission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Percent(String);

impl Percent {
    pub fn parse<S: Into<String>>(value: S) -> Option<Self> {
        Float64::parse(value).map(|f| Self(f.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_f64(&self) -> Option<f64> {
        parse_decimal(&self.0)
    }

    /// Whether the value satisfies [`PERCENT_PATTERN`].
    pub fn matches_pattern(&self) -> bool {
        matches_percent_pattern(&self.0)
    }
}

pub fn matches_percent_pattern(value: &str) -> bool {
    PERCENT_REGEX.is_match(value)
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Percent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_newtype_struct(WIRE_NUMBER_TOKEN, self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for Percent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DecimalVisitor { type_name: "Percent" }).map(Percent)
    }
}

/// Finite decimals only, with no surrounding whitespace.
fn parse_decimal(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|f| f.is_finite())
}

struct DecimalVisitor {
    type_name: &'static str,
}

impl<'de> Visitor<'de> for DecimalVisitor {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a number or a decimal string to decode as {}", self.type_name)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
        if !v.is_finite() {
            return Err(E::custom(format!("failed to decode {} to a {}: not a finite number", v, self.type_name)));
        }
        Ok(v.to_string())
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
        if parse_decimal(v).is_none() {
            return Err(E::custom(format!(
                "failed to decode {:?} to a {}: not a decimal number",
                v, self.type_name
            )));
        }
        Ok(v.to_string())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
        self.visit_str(&v)
    }
}
