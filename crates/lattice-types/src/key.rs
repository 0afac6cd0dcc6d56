//! Dotted-path and name-normalization helpers.
//!
//! Configuration keys use dots to scope values to nested components:
//! `child.grandchild.field`. Class names given as configuration strings
//! are matched case-insensitively after snake-case normalization, so
//! `"my_dataset"` selects a class named `MyDataset`.

/// Splits a dotted key into its head segment and the rest.
///
/// Returns `None` for keys without a dot.
///
/// # Example
///
/// ```
/// use lattice_types::key::split_head;
///
/// assert_eq!(split_head("a.b.c"), Some(("a", "b.c")));
/// assert_eq!(split_head("a"), None);
/// ```
#[must_use]
pub fn split_head(key: &str) -> Option<(&str, &str)> {
    key.split_once('.')
}

/// Converts a CamelCase or mixed name to lower snake_case.
///
/// Runs of capitals are kept together until the last one (`HTTPServer`
/// becomes `http_server`), and repeated underscores collapse.
#[must_use]
pub fn snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() {
            let prev_lower = i > 0 && chars[i - 1].is_ascii_lowercase();
            let prev_digit = i > 0 && chars[i - 1].is_ascii_digit();
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            let prev_upper = i > 0 && chars[i - 1].is_ascii_uppercase();
            if prev_lower || prev_digit || (prev_upper && next_lower) {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    // Collapse any repeated underscores, including ones already present.
    let mut collapsed = String::with_capacity(out.len());
    let mut last_underscore = false;
    for c in out.chars() {
        if c == '_' {
            if !last_underscore {
                collapsed.push(c);
            }
            last_underscore = true;
        } else {
            collapsed.push(c);
            last_underscore = false;
        }
    }
    collapsed
}

/// Returns `true` when two class-name spellings normalize to the same
/// snake_case form.
#[must_use]
pub fn names_match(a: &str, b: &str) -> bool {
    a == b || snake_case(a) == snake_case(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_head_basic() {
        assert_eq!(split_head("b.a.x"), Some(("b", "a.x")));
        assert_eq!(split_head("x"), None);
        assert_eq!(split_head("a."), Some(("a", "")));
    }

    #[test]
    fn snake_case_basic() {
        assert_eq!(snake_case("MyDataset"), "my_dataset");
        assert_eq!(snake_case("already_snake"), "already_snake");
        assert_eq!(snake_case("HTTPServer"), "http_server");
        assert_eq!(snake_case("Resnet50"), "resnet50");
    }

    #[test]
    fn snake_case_collapses_underscores() {
        assert_eq!(snake_case("A__B"), "a_b");
        assert_eq!(snake_case("My_Thing"), "my_thing");
    }

    #[test]
    fn names_match_is_case_insensitive_via_snake() {
        assert!(names_match("MyDataset", "my_dataset"));
        assert!(names_match("MyDataset", "MyDataset"));
        assert!(!names_match("MyDataset", "other_dataset"));
    }
}
