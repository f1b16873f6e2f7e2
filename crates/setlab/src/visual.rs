use crate::algebra::{difference, intersection};
use crate::element::Element;
use crate::registry::Registry;

pub const PALETTE: [&str; 6] = [
    "#4c8bff", "#28a745", "#ffc107", "#dc3545", "#17a2b8", "#6c757d",
];

/// Height of an empty set's bar, and the extra height of the largest set's bar.
pub const BAR_BASE: f64 = 20.0;
pub const BAR_SCALE: f64 = 150.0;

/// The three regions of a two-set Venn diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VennRegions {
    pub only_left: Vec<Element>,
    pub both: Vec<Element>,
    pub only_right: Vec<Element>,
}

pub fn venn(left: &[Element], right: &[Element]) -> VennRegions {
    VennRegions {
        only_left: difference(left, right),
        both: intersection(left, right),
        only_right: difference(right, left),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub name: String,
    pub cardinality: usize,
    pub height: f64,
    pub color: &'static str,
}

/// One bar per set, in registry order, scaled against the largest set.
pub fn cardinality_chart(registry: &Registry) -> Vec<Bar> {
    let max = registry
        .list()
        .map(|(_, record)| record.cardinality())
        .max()
        .unwrap_or(0);

    registry
        .list()
        .map(|(name, record)| {
            let cardinality = record.cardinality();
            let height = if max == 0 {
                BAR_BASE
            } else {
                cardinality as f64 / max as f64 * BAR_SCALE + BAR_BASE
            };
            Bar {
                name: name.to_owned(),
                cardinality,
                height,
                color: color_for(name),
            }
        })
        .collect()
}

/// Stable palette pick for a set name, hashing UTF-16 code units.
pub fn color_for(name: &str) -> &'static str {
    let mut hash: i64 = 0;
    for unit in name.encode_utf16() {
        // the shift wraps at 32 bits, the subtraction and addition do not
        let shifted = i64::from((hash as i32).wrapping_shl(5));
        hash = i64::from(unit) + shifted - hash;
    }
    PALETTE[(hash.unsigned_abs() % PALETTE.len() as u64) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_elements;
    use crate::sets::SetKind;

    #[test]
    fn venn_regions() {
        let a = parse_elements("1, 2, 3, x");
        let b = parse_elements("3, 4, x, y");
        let regions = venn(&a, &b);
        assert_eq!(regions.only_left, parse_elements("1, 2"));
        assert_eq!(regions.both, parse_elements("3, x"));
        assert_eq!(regions.only_right, parse_elements("4, y"));
    }

    #[test]
    fn venn_of_disjoint_sets() {
        let a = parse_elements("1");
        let b = parse_elements("2");
        let regions = venn(&a, &b);
        assert!(regions.both.is_empty());
        assert_eq!(regions.only_left, a);
        assert_eq!(regions.only_right, b);
    }

    #[test]
    fn bars_scale_against_largest() {
        let mut reg = Registry::new();
        reg.create("big", SetKind::Literal, "", parse_elements("1, 2, 3, 4"))
            .unwrap();
        reg.create("half", SetKind::Literal, "", parse_elements("1, 2"))
            .unwrap();
        reg.create("none", SetKind::Literal, "", Vec::new())
            .unwrap();

        let bars = cardinality_chart(&reg);
        let heights: Vec<f64> = bars.iter().map(|bar| bar.height).collect();
        assert_eq!(heights, [170.0, 95.0, 20.0]);
        assert_eq!(bars[0].name, "big");
        assert_eq!(bars[1].cardinality, 2);
    }

    #[test]
    fn all_empty_sets_get_base_height() {
        let mut reg = Registry::new();
        reg.create("A", SetKind::Literal, "", Vec::new()).unwrap();
        assert_eq!(cardinality_chart(&reg)[0].height, BAR_BASE);
        assert!(cardinality_chart(&Registry::new()).is_empty());
    }

    #[test]
    fn colors_are_stable() {
        assert_eq!(color_for("A"), PALETTE[5]);
        assert_eq!(color_for("B"), PALETTE[0]);
        assert_eq!(color_for(""), PALETTE[0]);
        assert_eq!(color_for("ℕ"), color_for("ℕ"));
        // long names overflow 32 bits in the shift
        assert!(PALETTE.contains(&color_for("a fairly long set name with many letters")));
    }
}
