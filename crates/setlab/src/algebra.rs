use std::collections::HashSet;

use strum::{Display, EnumIter, EnumString};
use tracing::warn;

use crate::element::{Element, canonicalize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, Display)]
pub enum SetOp {
    #[strum(to_string = "union", serialize = "∪")]
    Union,
    #[strum(to_string = "inter", serialize = "intersection", serialize = "∩")]
    Intersection,
    #[strum(
        to_string = "diff",
        serialize = "difference",
        serialize = "−",
        serialize = "-",
        serialize = "\\"
    )]
    Difference,
}

impl SetOp {
    pub fn symbol(self) -> char {
        use SetOp::*;
        match self {
            Union => '∪',
            Intersection => '∩',
            Difference => '−',
        }
    }

    pub fn is_commutative(self) -> bool {
        matches!(self, Self::Union | Self::Intersection)
    }

    pub fn apply(self, left: &[Element], right: &[Element]) -> Vec<Element> {
        use SetOp::*;
        match self {
            Union => union(left, right),
            Intersection => intersection(left, right),
            Difference => difference(left, right),
        }
    }
}

pub fn union(left: &[Element], right: &[Element]) -> Vec<Element> {
    canonicalize(left.iter().chain(right).cloned())
}

pub fn intersection(left: &[Element], right: &[Element]) -> Vec<Element> {
    let right: HashSet<&Element> = right.iter().collect();
    canonicalize(left.iter().filter(|el| right.contains(el)).cloned())
}

pub fn difference(left: &[Element], right: &[Element]) -> Vec<Element> {
    let right: HashSet<&Element> = right.iter().collect();
    canonicalize(left.iter().filter(|el| !right.contains(el)).cloned())
}

/// `candidate` is read the way a set literal reads its fragments. A numeric literal that
/// overflows is a member of nothing, just as it empties a literal containing it.
pub fn is_member(candidate: &str, set: &[Element]) -> bool {
    match Element::classify(candidate.trim()) {
        Ok(element) => set.contains(&element),
        Err(degradation) => {
            warn!(candidate, %degradation, "membership candidate is not a usable number");
            false
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Inclusion {
    Equal,
    ProperSubset,
    /// Every element is contained but the left side has more entries, which only happens when
    /// the left sequence carries duplicates.
    Subset,
    NotSubset,
}

impl Inclusion {
    pub fn symbol(self) -> char {
        use Inclusion::*;
        match self {
            Equal => '=',
            ProperSubset => '⊂',
            Subset => '⊆',
            NotSubset => '⊄',
        }
    }

    pub fn is_subset(self) -> bool {
        self != Self::NotSubset
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubsetRelation {
    pub inclusion: Inclusion,
    pub left_count: usize,
    pub right_count: usize,
}

pub fn subset_relation(left: &[Element], right: &[Element]) -> SubsetRelation {
    let right_set: HashSet<&Element> = right.iter().collect();
    let is_subset = left.iter().all(|el| right_set.contains(el));

    let inclusion = if !is_subset {
        Inclusion::NotSubset
    } else if left.len() == right.len() {
        Inclusion::Equal
    } else if left.len() < right.len() {
        Inclusion::ProperSubset
    } else {
        Inclusion::Subset
    };

    SubsetRelation {
        inclusion,
        left_count: left.len(),
        right_count: right.len(),
    }
}
