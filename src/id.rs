//! Element ids for rendered charts.
//!
//! Format: "plot-" + 26-char nanoid = 31 chars total
//! Alphabet: lowercase alphanumeric (0-9, a-z) so ids are valid in CSS selectors

const ID_ALPHABET: [char; 36] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i',
    'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

const ELEMENT_PREFIX: &str = "plot-";

/// Generate a fresh DOM element id for a chart container.
pub fn element_id() -> String {
    let suffix = nanoid::nanoid!(26, &ID_ALPHABET);
    format!("{}{}", ELEMENT_PREFIX, suffix)
}
