//! URL slug generation

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref NON_WORD: Regex = Regex::new(r"[^A-Za-z0-9_\-]+").unwrap();
    static ref MULTI_HYPHEN: Regex = Regex::new(r"-{2,}").unwrap();
}

/// Turn a display string into a URL slug.
///
/// Lowercases, trims, turns whitespace runs into `-`, drops everything
/// that is not an ASCII word character or hyphen and collapses repeated
/// hyphens. Non-ASCII letters are removed rather than transliterated, so
/// `café` becomes `caf`.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let dashed = WHITESPACE.replace_all(lowered.trim(), "-");
    let cleaned = NON_WORD.replace_all(&dashed, "");
    MULTI_HYPHEN.replace_all(&cleaned, "-").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_examples() {
        assert_eq!(slugify("hello   world"), "hello-world");
        assert_eq!(slugify("café résumé"), "caf-rsum");
        assert_eq!(slugify("###"), "");
        assert_eq!(slugify("  JavaScript  "), "javascript");
        assert_eq!(slugify("Rust & Go -- compared"), "rust-go-compared");
        assert_eq!(slugify("snake_case stays"), "snake_case-stays");
    }

    #[test]
    fn test_slugify_idempotent() {
        let inputs = [
            "Hello World",
            "  --Leading and trailing--  ",
            "a - b - c",
            "Ünïcödé ÇHARS",
            "İstanbul",
            "tabs\tand\nnewlines",
            "100% pure",
            "",
            "---",
        ];
        for input in inputs {
            let once = slugify(input);
            assert_eq!(slugify(&once), once, "not idempotent for {:?}", input);
        }
    }
}
