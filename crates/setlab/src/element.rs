use std::fmt::Display;

use itertools::{Either, Itertools};
use lazy_regex::regex_is_match;
use malachite::num::float::NiceFloat;
use serde::{Deserialize, Serialize};

use crate::error::ParseDegradation;

/// An atomic member of a set.
///
/// Numbers compare bit for bit. There is no tolerance, so `0.1 + 0.2` and `0.3` are different
/// elements. Negative zero is folded into zero on construction and non-finite values are never
/// stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Element {
    Number(#[serde(with = "finite_float")] NiceFloat<f64>),
    Text(String),
}

impl Element {
    pub fn number(val: f64) -> Option<Self> {
        if val.is_finite() {
            // -0.0 + 0.0 == +0.0
            Some(Self::Number(NiceFloat(val + 0.0)))
        } else {
            None
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(NiceFloat(val)) => Some(*val),
            Self::Text(_) => None,
        }
    }

    /// Reads a trimmed fragment as a number when it looks like a decimal literal, and as an opaque
    /// token otherwise.
    pub(crate) fn classify(fragment: &str) -> Result<Self, ParseDegradation> {
        if !looks_numeric(fragment) {
            return Ok(Self::text(fragment));
        }
        fragment
            .parse::<f64>()
            .ok()
            .and_then(Self::number)
            .ok_or_else(|| ParseDegradation::NonFinite {
                fragment: fragment.to_owned(),
            })
    }

    /// Like [`Element::classify`], but a numeric literal that overflows stays a token.
    pub fn coerce(input: &str) -> Self {
        let input = input.trim();
        Self::classify(input).unwrap_or_else(|_| Self::text(input))
    }
}

impl From<f64> for Element {
    /// Non-finite values become their textual form.
    fn from(val: f64) -> Self {
        Self::number(val).unwrap_or_else(|| Self::text(val.to_string()))
    }
}

impl From<i32> for Element {
    fn from(val: i32) -> Self {
        Self::Number(NiceFloat(f64::from(val)))
    }
}

impl From<&str> for Element {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // f64 prints integral values without a fraction and everything else in its shortest
            // round-tripping form
            Self::Number(NiceFloat(val)) => write!(f, "{val}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

fn looks_numeric(fragment: &str) -> bool {
    regex_is_match!(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?$", fragment)
}

/// Deduplicates (first occurrence wins) and orders elements: numbers ascending, then tokens in
/// the order they were first seen.
pub fn canonicalize<I>(elements: I) -> Vec<Element>
where
    I: IntoIterator<Item = Element>,
{
    let (mut numbers, texts): (Vec<NiceFloat<f64>>, Vec<String>) = elements
        .into_iter()
        .unique()
        .partition_map(|element| match element {
            Element::Number(num) => Either::Left(num),
            Element::Text(text) => Either::Right(text),
        });
    numbers.sort_unstable();
    numbers
        .into_iter()
        .map(Element::Number)
        .chain(texts.into_iter().map(Element::Text))
        .collect()
}

mod finite_float {
    use malachite::num::float::NiceFloat;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(
        val: &NiceFloat<f64>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(val.0)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NiceFloat<f64>, D::Error> {
        let val = f64::deserialize(deserializer)?;
        if val.is_finite() {
            Ok(NiceFloat(val + 0.0))
        } else {
            Err(D::Error::custom("set elements must be finite numbers"))
        }
    }
}
