//! Slug generation and normalization.

use regex::Regex;
use std::sync::OnceLock;
use unicode_segmentation::UnicodeSegmentation;

static HYPHEN_RUN: OnceLock<Regex> = OnceLock::new();

fn hyphen_run() -> &'static Regex {
    HYPHEN_RUN.get_or_init(|| Regex::new(r"-+").unwrap())
}

/// Convert a string to a URL-safe slug.
///
/// Rules:
/// - Lowercase
/// - Whitespace and underscores become hyphens
/// - Non-alphanumeric characters are dropped (unicode alphabetics kept)
/// - Hyphen runs collapse to one, leading/trailing hyphens trimmed
///
/// # Examples
///
/// ```
/// use codewiki_core::slugify;
///
/// assert_eq!(slugify("Hello World"), "hello-world");
/// assert_eq!(slugify("Rust & Safety"), "rust-safety");
/// assert_eq!(slugify("C++ Programming"), "c-programming");
/// ```
pub fn slugify(input: &str) -> String {
    let mut out = String::with_capacity(input.len());

    for grapheme in input.to_lowercase().graphemes(true) {
        match grapheme {
            " " | "_" | "\t" | "\n" | "\r" => out.push('-'),
            g => {
                let Some(c) = g.chars().next() else { continue };
                if c.is_ascii_alphanumeric() || c == '-' || c.is_alphabetic() {
                    out.push_str(g);
                }
            }
        }
    }

    let collapsed = hyphen_run().replace_all(&out, "-");
    collapsed.trim_matches('-').to_string()
}

/// Normalize a slug (ensure it's properly formatted).
pub fn normalize_slug(slug: &str) -> String {
    slugify(slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("Rust Programming"), "rust-programming");
    }

    #[test]
    fn test_special_characters() {
        assert_eq!(slugify("Rust & Safety"), "rust-safety");
        assert_eq!(slugify("C++ Programming"), "c-programming");
        assert_eq!(slugify("Node.js Tips"), "nodejs-tips");
        assert_eq!(slugify("What's new?"), "whats-new");
    }

    #[test]
    fn test_unicode() {
        assert_eq!(slugify("Café"), "café");
        assert_eq!(slugify("naïve"), "naïve");
    }

    #[test]
    fn test_hyphen_collapsing() {
        assert_eq!(slugify("Hello    World"), "hello-world");
        assert_eq!(slugify("a - b -- c"), "a-b-c");
        assert_eq!(slugify("  Leading and trailing  "), "leading-and-trailing");
    }

    #[test]
    fn test_underscores() {
        assert_eq!(slugify("hello_world"), "hello-world");
        assert_eq!(slugify("rust_lang_basics"), "rust-lang-basics");
    }

    #[test]
    fn test_empty_and_special_only() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify("   "), "");
    }

    #[test]
    fn test_idempotent() {
        assert_eq!(normalize_slug("already-good"), "already-good");
        assert_eq!(normalize_slug(&slugify("Needs Fixing")), "needs-fixing");
    }
}
