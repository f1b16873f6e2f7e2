use std::fmt::Display;

use itertools::Itertools;

mod strings;
pub use strings::{latin_digits, persian_digits};

pub const EMPTY_SET: &str = "∅";

/// Formats a sequence as `{ a, b, c }`, or `∅` when empty.
pub fn braced<I>(items: I) -> String
where
    I: IntoIterator,
    I::Item: Display,
{
    let mut items = items.into_iter().peekable();
    if items.peek().is_none() {
        EMPTY_SET.to_owned()
    } else {
        format!("{{ {} }}", items.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn braced_formats() {
        assert_eq!(braced([1, 2, 3]), "{ 1, 2, 3 }");
        assert_eq!(braced(Vec::<u8>::new()), "∅");
        assert_eq!(braced(["x"]), "{ x }");
    }
}
