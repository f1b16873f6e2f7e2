use itertools::Itertools;

const PERSIAN: &str = "۰۱۲۳۴۵۶۷۸۹";
const ARABIC_INDIC: &str = "٠١٢٣٤٥٦٧٨٩";
const LATIN: &str = "0123456789";

/// Rewrites Persian and Arabic-Indic digits, the Arabic decimal separator and the Arabic comma
/// into their ASCII counterparts. Everything else is left alone.
pub fn latin_digits(s: &str) -> String {
    let mut new = s.to_owned();
    for script in [PERSIAN, ARABIC_INDIC] {
        for (sd, d) in script.chars().zip_eq(LATIN.chars()) {
            new = new.replace(sd, &d.to_string());
        }
    }
    new.replace('٫', ".").replace('،', ",")
}

pub fn persian_digits(s: &str) -> String {
    let mut new = s.to_owned();
    for (sd, d) in PERSIAN.chars().zip_eq(LATIN.chars()) {
        new = new.replace(d, &sd.to_string());
    }
    new
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_every_script() {
        assert_eq!(latin_digits("۱۲، ٣٤"), "12, 34");
        assert_eq!(latin_digits("۲٫۵"), "2.5");
        assert_eq!(latin_digits("x, 7"), "x, 7");
    }

    #[test]
    fn persian_round_trip() {
        let s = "{ 1, 20, x }";
        assert_eq!(persian_digits(s), "{ ۱, ۲۰, x }");
        assert_eq!(latin_digits(&persian_digits(s)), s);
    }
}
