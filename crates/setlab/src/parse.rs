use setlab_utils::EMPTY_SET;
use tracing::warn;

use crate::element::{Element, canonicalize};
use crate::error::ParseDegradation;

/// Turns user text such as `{1, 2, x}` into a canonical element sequence.
///
/// Never fails: input that cannot be read as a whole yields the empty set, and the reason is
/// logged.
pub fn parse_elements(text: &str) -> Vec<Element> {
    match try_parse_elements(text) {
        Ok(elements) => elements,
        Err(degradation) => {
            warn!(input = text, %degradation, "set literal degraded to the empty set");
            Vec::new()
        }
    }
}

fn try_parse_elements(text: &str) -> Result<Vec<Element>, ParseDegradation> {
    let mut body = text.trim();
    if body.is_empty() || body == EMPTY_SET || body == "{}" {
        return Ok(Vec::new());
    }

    if let Some(inner) = body.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
        body = inner;
    }

    let elements = body
        .split(',')
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(Element::classify)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(canonicalize(elements))
}
