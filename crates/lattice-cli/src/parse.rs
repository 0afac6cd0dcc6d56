//! Literal parsing for command-line and prompted values.
//!
//! Values arrive as text; anything that parses as JSON becomes the
//! corresponding [`ConfigValue`] (numbers, booleans, `null`, quoted
//! strings, arrays), everything else is taken as a bare string. This
//! means `batch_size=64` gives an integer and `name=adam` a string,
//! without shell-hostile quoting.

use lattice_types::ConfigValue;

/// Parse a textual literal.
///
/// Never fails: input that is not valid JSON (or is JSON the
/// configuration model cannot hold, like a nested object) is returned
/// as a string.
#[must_use]
pub fn parse_literal(text: &str) -> ConfigValue {
    let trimmed = text.trim();
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if let Ok(value) = ConfigValue::from_json(json) {
            return value;
        }
    }
    // Single-quoted strings unwrap like double-quoted ones.
    if trimmed.len() >= 2 && trimmed.starts_with('\'') && trimmed.ends_with('\'') {
        return ConfigValue::Str(trimmed[1..trimmed.len() - 1].to_owned());
    }
    ConfigValue::Str(trimmed.to_owned())
}
