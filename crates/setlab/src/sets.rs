use std::f64::consts;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::element::{Element, canonicalize};

/// How a set came to be. The serialized names are the ones saved snapshots use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum SetKind {
    #[serde(rename = "normal")]
    #[strum(to_string = "enumerated")]
    Literal,
    #[serde(rename = "symbolic")]
    #[strum(to_string = "set-builder")]
    Predicate,
    #[serde(rename = "verbal")]
    #[strum(to_string = "described")]
    Description,
    #[serde(rename = "universal")]
    #[strum(to_string = "universal")]
    Universal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetRecord {
    #[serde(rename = "type")]
    pub kind: SetKind,
    /// Expression or description the elements were derived from. Empty for enumerated sets.
    #[serde(default, alias = "expression", alias = "description")]
    pub source_text: String,
    /// Saved state from older versions may hold unsorted or repeated elements.
    #[serde(deserialize_with = "canonical_elements")]
    pub elements: Vec<Element>,
    pub created_at: DateTime<Utc>,
}

fn canonical_elements<'de, D>(deserializer: D) -> Result<Vec<Element>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<Element>::deserialize(deserializer).map(canonicalize)
}

impl SetRecord {
    pub fn new(kind: SetKind, source_text: String, elements: Vec<Element>) -> Self {
        Self {
            kind,
            source_text,
            elements: canonicalize(elements),
            created_at: Utc::now(),
        }
    }

    pub fn cardinality(&self) -> usize {
        self.elements.len()
    }
}

/// Standard number domains, each represented by a small finite sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, Display)]
pub enum Universe {
    #[strum(to_string = "ℕ", serialize = "N")]
    Naturals,
    #[strum(to_string = "𝕎", serialize = "W")]
    Wholes,
    #[strum(to_string = "ℤ", serialize = "Z")]
    Integers,
    #[strum(to_string = "ℚ", serialize = "Q")]
    Rationals,
    #[strum(to_string = "ℝ", serialize = "R")]
    Reals,
    #[strum(to_string = "ℚ′", serialize = "ℚ'", serialize = "Q'")]
    Irrationals,
}

impl Universe {
    pub fn description(self) -> &'static str {
        use Universe::*;
        match self {
            Naturals => "natural numbers",
            Wholes => "whole numbers",
            Integers => "integers",
            Rationals => "rational numbers",
            Reals => "real numbers",
            Irrationals => "irrational numbers",
        }
    }

    /// A fresh copy of the sample, canonically ordered.
    pub fn elements(self) -> Vec<Element> {
        use Universe::*;
        let vals: Vec<f64> = match self {
            Naturals => (1..=10).map(f64::from).collect(),
            Wholes => (0..=10).map(f64::from).collect(),
            Integers => (-5..=5).map(f64::from).collect(),
            Rationals => vec![0.5, 1.5, 2.5, 3.5, 0.333, 0.666, 0.25, 1.0, 2.0, 3.0],
            Reals => vec![1.0, 1.5, 2.0, 2.5, 3.0, consts::PI, consts::E, 0.5, 2.7],
            Irrationals => vec![
                consts::PI,
                consts::E,
                consts::SQRT_2,
                3f64.sqrt(),
                5f64.sqrt(),
            ],
        };
        canonicalize(vals.into_iter().map(Element::from))
    }
}
