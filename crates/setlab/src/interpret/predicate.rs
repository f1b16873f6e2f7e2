use std::str::FromStr;

use lazy_regex::{regex_captures, regex_is_match};
use setlab_utils::latin_digits;

use crate::element::{Element, canonicalize};
use crate::error::ParseDegradation;
use crate::parse::parse_elements;
use crate::sets::Universe;

type PredicateResult<T> = Result<T, ParseDegradation>;

fn fail<T>(reason: impl Into<String>) -> PredicateResult<T> {
    Err(ParseDegradation::Predicate {
        reason: reason.into(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Comparison {
    Lt,
    Gt,
    Leq,
    Geq,
    Eq,
    Neq,
}

impl Comparison {
    fn from_char(c: char) -> Option<Self> {
        use Comparison::*;
        match c {
            '<' => Some(Lt),
            '>' => Some(Gt),
            '≤' => Some(Leq),
            '≥' => Some(Geq),
            '=' => Some(Eq),
            '≠' => Some(Neq),
            _ => None,
        }
    }

    fn holds(self, left: f64, right: f64) -> bool {
        use Comparison::*;
        match self {
            Lt => left < right,
            Gt => left > right,
            Leq => left <= right,
            Geq => left >= right,
            Eq => left == right,
            Neq => left != right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Term {
    Var,
    Const(f64),
    /// `x % m`, always in `[0, |m|)`
    Remainder(f64),
}

impl Term {
    fn value(self, x: f64) -> f64 {
        match self {
            Term::Var => x,
            Term::Const(c) => c,
            Term::Remainder(m) => x.rem_euclid(m),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Chain {
    terms: Vec<Term>,
    rels: Vec<Comparison>,
}

impl Chain {
    fn holds(&self, x: f64) -> bool {
        self.terms
            .windows(2)
            .zip(&self.rels)
            .all(|(pair, rel)| rel.holds(pair[0].value(x), pair[1].value(x)))
    }
}

fn preparse(expression: &str) -> String {
    let mut subject = latin_digits(expression);
    let symbols = [
        ("<=", "≤"),
        (">=", "≥"),
        ("!=", "≠"),
        ("−", "-"),
        (" in ", " ∈ "),
    ];
    for (symbol, replacement) in symbols {
        subject = subject.replace(symbol, replacement);
    }
    subject
}

pub(super) fn evaluate(expression: &str) -> PredicateResult<Vec<Element>> {
    let subject = preparse(expression);
    let mut body = subject.trim();
    if let Some(inner) = body.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
        body = inner;
    }

    let Some((head, tail)) = body.split_once('|') else {
        return fail("expected `variable | conditions`");
    };
    let var = head.trim();
    if !regex_is_match!(r"^\p{L}[\p{L}\p{N}_]*$", var) {
        return fail(format!("`{var}` is not a variable name"));
    }

    let mut domain = None;
    let mut chains = Vec::new();
    for clause in split_top_level(tail).into_iter().map(str::trim) {
        if clause.is_empty() {
            continue;
        }
        if let Some((member, set)) = clause.split_once('∈') {
            if member.trim() != var {
                return fail(format!("`{}` is not the bound variable", member.trim()));
            }
            if domain.is_some() {
                return fail("more than one domain");
            }
            domain = Some(parse_domain(set.trim())?);
        } else {
            chains.push(parse_chain(clause, var)?);
        }
    }

    let Some(domain) = domain else {
        return fail(format!("no domain given for `{var}`"));
    };

    Ok(canonicalize(domain.into_iter().filter(|element| {
        match element.as_f64() {
            Some(x) => chains.iter().all(|chain| chain.holds(x)),
            None => chains.is_empty(),
        }
    })))
}

/// Splits on commas that are not nested inside braces.
fn split_top_level(subject: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (index, c) in subject.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&subject[start..index]);
                start = index + 1;
            }
            _ => (),
        }
    }
    parts.push(&subject[start..]);
    parts
}

fn parse_domain(text: &str) -> PredicateResult<Vec<Element>> {
    if text.starts_with('{') {
        return Ok(parse_elements(text));
    }
    match Universe::from_str(text) {
        Ok(universe) => Ok(universe.elements()),
        Err(_) => fail(format!("unknown domain `{text}`")),
    }
}

fn parse_chain(clause: &str, var: &str) -> PredicateResult<Chain> {
    let mut terms = Vec::new();
    let mut rels = Vec::new();
    let mut start = 0;
    for (index, c) in clause.char_indices() {
        if let Some(rel) = Comparison::from_char(c) {
            terms.push(parse_term(&clause[start..index], var)?);
            rels.push(rel);
            start = index + c.len_utf8();
        }
    }
    terms.push(parse_term(&clause[start..], var)?);

    if rels.is_empty() {
        return fail(format!("`{clause}` is not a comparison"));
    }
    Ok(Chain { terms, rels })
}

fn parse_term(text: &str, var: &str) -> PredicateResult<Term> {
    let text = text.trim();
    if text == var {
        return Ok(Term::Var);
    }

    if let Some((_, operand, modulus)) = regex_captures!(r"^(\S+?)\s*(?:%|\bmod\b)\s*(\S+)$", text)
        && operand == var
    {
        return match Element::coerce(modulus).as_f64() {
            Some(m) if m != 0.0 => Ok(Term::Remainder(m.abs())),
            _ => fail(format!("`{modulus}` is not a usable modulus")),
        };
    }

    match Element::coerce(text).as_f64() {
        Some(c) => Ok(Term::Const(c)),
        None => fail(format!("`{text}` is neither `{var}` nor a number")),
    }
}

#[cfg(test)]
mod tests {
    use setlab_utils::braced;

    use super::*;

    fn eval(expression: &str) -> String {
        braced(evaluate(expression).unwrap())
    }

    #[test]
    fn bounded_domains() {
        assert_eq!(eval("{ x | x ∈ ℕ , 3 ≤ x ≤ 8 }"), "{ 3, 4, 5, 6, 7, 8 }");
        assert_eq!(eval("{ x | x ∈ ℤ , -2 ≤ x ≤ 2 }"), "{ -2, -1, 0, 1, 2 }");
        assert_eq!(eval("{ x | x ∈ ℤ }").len(), eval("{ x | x in Z }").len());
    }

    #[test]
    fn ascii_and_persian_input() {
        assert_eq!(eval("{ n | n in W, n >= 8 }"), "{ 8, 9, 10 }");
        assert_eq!(eval("{ x | x ∈ ℕ , x < ۴ }"), "{ 1, 2, 3 }");
        assert_eq!(eval("{ x | x ∈ ℤ , x != 0, −1 <= x <= 1 }"), "{ -1, 1 }");
    }

    #[test]
    fn several_conditions() {
        assert_eq!(eval("{ x | x ∈ ℕ, x % 2 = 0, x > 4 }"), "{ 6, 8, 10 }");
        assert_eq!(eval("{ x | x ∈ 𝕎, x mod 3 = 1 }"), "{ 1, 4, 7, 10 }");
        assert_eq!(eval("{ x | x ∈ ℚ, 1 < x < 3 }"), "{ 1.5, 2, 2.5 }");
    }

    #[test]
    fn literal_domains() {
        assert_eq!(eval("{ x | x ∈ {1, 2, 3, 4}, x ≥ 3 }"), "{ 3, 4 }");
        assert_eq!(eval("{ x | x ∈ {a, 1, b} }"), "{ 1, a, b }");
        assert_eq!(eval("{ x | x ∈ {a, 1, b}, x = 1 }"), "{ 1 }");
    }

    #[test]
    fn empty_results_are_not_failures() {
        assert_eq!(eval("{ x | x ∈ ℕ , x > 100 }"), "∅");
    }

    #[test]
    fn malformed_expressions() {
        for expression in [
            "",
            "{ 1, 2, 3 }",
            "{ x | 3 ≤ x ≤ 8 }",
            "{ x | y ∈ ℕ }",
            "{ x | x ∈ ℂ }",
            "{ x | x ∈ ℕ, x ∈ ℤ }",
            "{ x | x ∈ ℕ, y < 3 }",
            "{ x | x ∈ ℕ, x }",
            "{ x | x ∈ ℕ, x % 0 = 1 }",
            "{ 2x | x ∈ ℕ }",
        ] {
            assert!(evaluate(expression).is_err(), "{expression:?}");
        }
    }

    #[test]
    fn nested_commas() {
        assert_eq!(
            split_top_level("x ∈ {1, 2}, x > 1"),
            ["x ∈ {1, 2}", " x > 1"],
        );
    }
}
