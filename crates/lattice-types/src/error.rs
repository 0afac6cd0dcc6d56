//! Unified error-code interface.
//!
//! Every error enum in the workspace implements [`ErrorCode`], giving
//! callers a stable, machine-readable code per variant alongside the
//! human-readable `Display` text from `thiserror`.
//!
//! # Code format
//!
//! - UPPER_SNAKE_CASE
//! - Prefixed with the layer that raised it (`DEFINE_`, `COMPONENT_`,
//!   `CLI_`, `VALUE_`)
//! - Stable once published
//!
//! # Example
//!
//! ```
//! use lattice_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum DemoError {
//!     Missing(String),
//! }
//!
//! impl ErrorCode for DemoError {
//!     fn code(&self) -> &'static str {
//!         "DEMO_MISSING"
//!     }
//!     fn is_recoverable(&self) -> bool {
//!         true
//!     }
//! }
//!
//! assert_eq!(DemoError::Missing("x".into()).code(), "DEMO_MISSING");
//! ```

/// Machine-readable error classification.
pub trait ErrorCode {
    /// Returns a stable UPPER_SNAKE_CASE code for this error.
    fn code(&self) -> &'static str;

    /// Returns whether corrective action by the caller can succeed.
    ///
    /// Configuration errors are generally recoverable (fix the conf dict
    /// and retry with a fresh instance); structural definition errors are
    /// not (the class definitions themselves are wrong).
    fn is_recoverable(&self) -> bool;
}

/// Asserts that an error's code follows workspace conventions.
///
/// # Panics
///
/// Panics if the code is empty, lacks the expected prefix, or is not
/// UPPER_SNAKE_CASE. Intended for use in tests.
pub fn assert_error_code<E: ErrorCode>(err: &E, expected_prefix: &str) {
    let code = err.code();
    assert!(!code.is_empty(), "error code must not be empty");
    assert!(
        code.starts_with(expected_prefix),
        "error code '{code}' must start with prefix '{expected_prefix}'"
    );
    assert!(
        is_upper_snake_case(code),
        "error code '{code}' must be UPPER_SNAKE_CASE"
    );
}

/// [`assert_error_code`] over every variant of an enum.
pub fn assert_error_codes<E: ErrorCode>(errors: &[E], expected_prefix: &str) {
    for err in errors {
        assert_error_code(err, expected_prefix);
    }
}

fn is_upper_snake_case(s: &str) -> bool {
    !s.is_empty()
        && !s.starts_with('_')
        && !s.ends_with('_')
        && !s.contains("__")
        && s.chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    enum TestError {
        Soft,
        Hard,
    }

    impl ErrorCode for TestError {
        fn code(&self) -> &'static str {
            match self {
                Self::Soft => "TEST_SOFT",
                Self::Hard => "TEST_HARD",
            }
        }

        fn is_recoverable(&self) -> bool {
            matches!(self, Self::Soft)
        }
    }

    #[test]
    fn codes_and_recoverability() {
        assert_eq!(TestError::Soft.code(), "TEST_SOFT");
        assert!(TestError::Soft.is_recoverable());
        assert!(!TestError::Hard.is_recoverable());
    }

    #[test]
    fn valid_codes_pass() {
        assert_error_codes(&[TestError::Soft, TestError::Hard], "TEST_");
    }

    #[test]
    #[should_panic(expected = "must start with prefix")]
    fn wrong_prefix_panics() {
        assert_error_code(&TestError::Soft, "OTHER_");
    }

    #[test]
    fn snake_case_rules() {
        assert!(is_upper_snake_case("A_B_1"));
        assert!(!is_upper_snake_case(""));
        assert!(!is_upper_snake_case("a_b"));
        assert!(!is_upper_snake_case("_A"));
        assert!(!is_upper_snake_case("A__B"));
    }
}
