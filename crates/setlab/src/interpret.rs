//! Interpreters that derive elements from a set-builder expression or from a plain-language
//! description. Both degrade to the empty set when the input is not understood.

mod predicate;
mod verbal;

use tracing::warn;

use crate::element::Element;

/// Evaluates `{ x | x ∈ D , cond , ... }` over the finite domain `D`.
pub fn interpret_predicate(expression: &str) -> Vec<Element> {
    predicate::evaluate(expression).unwrap_or_else(|degradation| {
        warn!(expression, %degradation, "set-builder expression degraded to the empty set");
        Vec::new()
    })
}

/// Recognizes descriptions such as "odd numbers from 1 to 10" or "اعداد اول کمتر از ۲۰".
pub fn interpret_description(description: &str) -> Vec<Element> {
    verbal::evaluate(description).unwrap_or_else(|degradation| {
        warn!(description, %degradation, "description degraded to the empty set");
        Vec::new()
    })
}
