//! Search box input filtering.

use regex::Regex;
use std::sync::LazyLock;

/// Everything outside letters, digits, whitespace and `- . , ( ) &`.
static DISALLOWED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^a-zA-Z0-9\s\-.,()&]").expect("Invalid regex: disallowed query characters")
});

/// Returns `raw` with every disallowed character removed.
///
/// Idempotent: a sanitized string contains only allowed characters, so a
/// second pass removes nothing.
pub fn sanitize(raw: &str) -> String {
    DISALLOWED.replace_all(raw, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_characters_survive() {
        let input = "Delhi, Agra & Jaipur (6 days) - 2024.";
        assert_eq!(sanitize(input), input);
    }

    #[test]
    fn test_disallowed_characters_are_stripped() {
        assert_eq!(sanitize("Goa!!! <script>"), "Goa script");
        assert_eq!(sanitize("50% off @ Kerala #beach"), "50 off  Kerala beach");
        assert_eq!(sanitize("Udaipur's lakes?"), "Udaipurs lakes");
    }

    #[test]
    fn test_non_ascii_letters_are_stripped() {
        assert_eq!(sanitize("Café Mumbaï"), "Caf Mumba");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "",
            "Taj Mahal",
            "7 days heritage tour!!",
            "émoji 🚀 trip; rm -rf /",
            "tabs\tand\nnewlines",
            "{[(mixed)]} & <brackets>",
        ];
        for s in samples {
            let once = sanitize(s);
            assert_eq!(sanitize(&once), once, "not idempotent for {:?}", s);
            assert!(
                once.chars().all(|c| c.is_ascii_alphanumeric()
                    || c.is_whitespace()
                    || "-.,()&".contains(c)),
                "disallowed character left in {:?}",
                once
            );
        }
    }
}
