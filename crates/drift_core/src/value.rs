//! Style value model and ratio projection math
//!
//! Declarative property maps pair a CSS property (or transform-function) name
//! with a target value. Projecting a ratio onto a value means:
//!
//! - numbers scale directly (`value * ratio`),
//! - strings have every embedded numeric token scaled in place, with the
//!   surrounding text (units, separators) preserved verbatim: `"-40px"` at
//!   ratio `0.5` becomes `"-20px"`,
//! - `opacity` gets a signed fade formula so it dims as the ratio's magnitude
//!   grows, regardless of direction, and is clamped to `[0, 1]`.
//!
//! Declaration order is preserved ([`PropertyMap`] is an `IndexMap`) because
//! transform functions are assembled into a single transform string in the
//! order they were declared.

use std::ops::Range;
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use smallvec::SmallVec;

/// Matches signed integer or decimal tokens embedded in a style string.
static NUMBER_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-+]?\d+(\.\d+)?").expect("valid number-token pattern"));

/// Transform-function names that accumulate into the transform style instead
/// of being written as individual properties.
const TRANSFORM_FUNCTIONS: [&str; 10] = [
    "translateX",
    "translateY",
    "rotate",
    "rotateX",
    "rotateY",
    "rotateZ",
    "skewX",
    "skewY",
    "scaleX",
    "scaleY",
];

/// A declared target value for one property.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// Plain number, scaled by the ratio directly.
    Number(f32),
    /// Unit-suffixed string; embedded numeric tokens scale in place.
    Text(String),
}

/// Declaration-ordered map of property name to target value.
pub type PropertyMap = IndexMap<String, PropertyValue>;

/// Whether `name` is one of the fixed transform-function names.
pub fn is_transform_function(name: &str) -> bool {
    TRANSFORM_FUNCTIONS.contains(&name)
}

/// Clamp `value` into `[min, max]`.
pub fn within(value: f32, min: f32, max: f32) -> f32 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Format a scaled number the way it is substituted back into style text.
///
/// Rust's shortest-float display already round-trips cleanly (`100.0` →
/// `"100"`, `-20.0` → `"-20"`, `16.5` → `"16.5"`); negative zero is
/// normalized so a zero ratio never produces `"-0"`.
pub fn format_number(value: f32) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{value}")
}

/// Scale a string value by replacing each embedded numeric token with
/// `token * ratio`, preserving all other text verbatim.
pub fn scale_text(value: &str, ratio: f32) -> String {
    let tokens: SmallVec<[Range<usize>; 4]> = NUMBER_TOKEN
        .find_iter(value)
        .map(|m| m.range())
        .collect();

    if tokens.is_empty() {
        return value.to_owned();
    }

    let mut out = String::with_capacity(value.len());
    let mut cursor = 0;
    for range in tokens {
        out.push_str(&value[cursor..range.start]);
        // The token matched the numeric pattern, so it always parses.
        let number: f32 = value[range.clone()].parse().unwrap_or(0.0);
        out.push_str(&format_number(number * ratio));
        cursor = range.end;
    }
    out.push_str(&value[cursor..]);
    out
}

/// Displayed opacity for an already-scaled declared value.
///
/// The fade is symmetric around ratio zero: magnitude growing in either
/// direction dims the element. The clamp stays even though the ratio engine
/// bounds its output: this call site never assumes the ratio was honestly
/// bounded.
pub fn display_opacity(scaled: f32, ratio: f32) -> f32 {
    let raw = if ratio < 0.0 { 1.0 + scaled } else { 1.0 - scaled };
    within(raw, 0.0, 1.0)
}
