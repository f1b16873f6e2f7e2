use lazy_regex::regex;
use setlab_utils::latin_digits;
use strum::{EnumIter, IntoEnumIterator};

use crate::element::Element;
use crate::error::ParseDegradation;

/// Widest range a description may span.
const MAX_SPAN: i64 = 10_000;
const DEFAULT_MULTIPLES: i64 = 10;
/// Largest number a description may mention.
const MAX_MAGNITUDE: u64 = 1_000_000_000_000;

type VerbalResult<T> = Result<T, ParseDegradation>;

/// Detection order matters: the first family with a matching keyword wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
enum Family {
    Multiples,
    Primes,
    Odds,
    Evens,
}

impl Family {
    fn keywords(self) -> &'static [&'static str] {
        use Family::*;
        match self {
            Multiples => &["مضرب", "multiple"],
            Primes => &["اول", "prime"],
            Odds => &["فرد", "odd"],
            Evens => &["زوج", "even"],
        }
    }

    fn detect(text: &str) -> Option<Self> {
        Self::iter().find(|family| family.keywords().iter().any(|kw| text.contains(kw)))
    }

    fn admits(self, n: i64) -> bool {
        use Family::*;
        match self {
            Primes => is_prime(n),
            Odds => n.rem_euclid(2) == 1,
            Evens => n.rem_euclid(2) == 0,
            Multiples => false,
        }
    }
}

pub(super) fn evaluate(description: &str) -> VerbalResult<Vec<Element>> {
    let text = latin_digits(description).to_lowercase();
    let family = Family::detect(&text).ok_or(ParseDegradation::Description {
        reason: "no known kind of number is mentioned",
    })?;

    // a minus only counts as a sign at the start of a word, so "1-10" reads as 1 and 10
    let numbers: Vec<i64> = regex!(r"(?:^|\s)-\d+|\d+")
        .find_iter(&text)
        .filter_map(|m| m.as_str().trim().parse().ok())
        .collect();
    if numbers.iter().any(|n| n.unsigned_abs() > MAX_MAGNITUDE) {
        return Err(ParseDegradation::Description {
            reason: "numbers are too large",
        });
    }

    let vals = if family == Family::Multiples {
        multiples(&numbers)?
    } else {
        let (low, high) = bounds(&numbers)?;
        (low..=high).filter(|n| family.admits(*n)).collect()
    };

    Ok(vals.into_iter().map(|n| Element::from(n as f64)).collect())
}

/// Two numbers give an inclusive range, a single one an upper bound counting from 1.
fn bounds(numbers: &[i64]) -> VerbalResult<(i64, i64)> {
    let (low, high) = match numbers {
        [] => {
            return Err(ParseDegradation::Description {
                reason: "no range is given",
            });
        }
        [high] => (1, *high),
        [a, b, ..] => (*a.min(b), *a.max(b)),
    };
    if high.saturating_sub(low) > MAX_SPAN {
        return Err(ParseDegradation::Description {
            reason: "range is too wide",
        });
    }
    Ok((low, high))
}

fn multiples(numbers: &[i64]) -> VerbalResult<Vec<i64>> {
    let Some(step) = numbers.first().map(|k| k.abs()).filter(|k| *k != 0) else {
        return Err(ParseDegradation::Description {
            reason: "multiples need a non-zero number",
        });
    };
    let count = match numbers.get(1) {
        Some(limit) => limit.saturating_abs() / step,
        None => DEFAULT_MULTIPLES,
    };
    if count > MAX_SPAN {
        return Err(ParseDegradation::Description {
            reason: "range is too wide",
        });
    }
    Ok((1..=count).map(|i| i * step).collect())
}

fn is_prime(n: i64) -> bool {
    if n < 2 {
        return false;
    }
    (2..).take_while(|d| *d <= n / d).all(|d| n % d != 0)
}

#[cfg(test)]
mod tests {
    use setlab_utils::braced;

    use super::*;

    fn eval(description: &str) -> String {
        braced(evaluate(description).unwrap())
    }

    #[test]
    fn persian_descriptions() {
        assert_eq!(eval("اعداد فرد بین ۱ تا ۱۰"), "{ 1, 3, 5, 7, 9 }");
        assert_eq!(
            eval("اعداد اول کمتر از ۲۰"),
            "{ 2, 3, 5, 7, 11, 13, 17, 19 }"
        );
        assert_eq!(
            eval("مضرب‌های ۳"),
            "{ 3, 6, 9, 12, 15, 18, 21, 24, 27, 30 }"
        );
        assert_eq!(eval("اعداد زوج بین ۱ تا ۸"), "{ 2, 4, 6, 8 }");
    }

    #[test]
    fn english_descriptions() {
        assert_eq!(eval("Odd numbers from 1 to 10"), "{ 1, 3, 5, 7, 9 }");
        assert_eq!(eval("primes under 20"), "{ 2, 3, 5, 7, 11, 13, 17, 19 }");
        assert_eq!(eval("multiples of 4 up to 20"), "{ 4, 8, 12, 16, 20 }");
        assert_eq!(eval("even numbers between -4 and 2"), "{ -4, -2, 0, 2 }");
        assert_eq!(eval("odd numbers 1-6"), "{ 1, 3, 5 }");
    }

    #[test]
    fn reversed_range() {
        assert_eq!(eval("even numbers from 10 down to 6"), "{ 6, 8, 10 }");
    }

    #[test]
    fn unusable_descriptions() {
        for description in [
            "",
            "the colors of the rainbow",
            "odd numbers",
            "multiples of 0",
            "primes up to 1000000000",
            "primes from 9223372036854775783 to 9223372036854775783",
            "multiples of 9223372036854775807",
            "odd numbers from -9223372036854775808 to -9223372036854775800",
        ] {
            assert!(evaluate(description).is_err(), "{description:?}");
        }
    }

    #[test]
    fn primality() {
        let primes: Vec<i64> = (-3..30).filter(|n| is_prime(*n)).collect();
        assert_eq!(primes, [2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
        assert!(is_prime(999_999_999_989));
        assert!(!is_prime(999_999_999_999));
    }
}
