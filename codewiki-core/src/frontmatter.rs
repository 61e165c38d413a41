//! YAML front-matter parsing for article sources.

use crate::models::Frontmatter;
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontmatterError {
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("missing required field: {0}")]
    MissingField(String),
}

static FRONTMATTER_REGEX: OnceLock<Regex> = OnceLock::new();

fn frontmatter_regex() -> &'static Regex {
    FRONTMATTER_REGEX
        .get_or_init(|| Regex::new(r"(?s)\A---[ \t]*\n(.*?)\n---[ \t]*(?:\n(.*))?\z").unwrap())
}

/// Parse optional front-matter from an article source.
///
/// Returns `(Some(frontmatter), body)` when a `---` delimited block is
/// present, or `(None, full_text)` when it is not. A present block with a
/// missing or empty `title` is an error; a source without any block is
/// left to the loader's title fallback.
///
/// # Example
///
/// ```
/// use codewiki_core::frontmatter::parse_frontmatter;
///
/// let text = "---\ntitle: Ownership\ntags: [rust]\n---\n# Ownership\n";
/// let (fm, body) = parse_frontmatter(text).unwrap();
/// let fm = fm.unwrap();
/// assert_eq!(fm.title, "Ownership");
/// assert_eq!(fm.tags, vec!["rust"]);
/// assert!(body.starts_with("# Ownership"));
/// ```
pub fn parse_frontmatter(text: &str) -> Result<(Option<Frontmatter>, String), FrontmatterError> {
    let Some(captures) = frontmatter_regex().captures(text) else {
        return Ok((None, text.to_string()));
    };

    let yaml = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
    let body = captures.get(2).map(|m| m.as_str()).unwrap_or_default();

    let frontmatter: Frontmatter = match serde_yaml::from_str(yaml) {
        Ok(fm) => fm,
        Err(e) => {
            if e.to_string().contains("missing field `title`") {
                return Err(FrontmatterError::MissingField("title".to_string()));
            }
            return Err(FrontmatterError::Yaml(e));
        }
    };

    if frontmatter.title.trim().is_empty() {
        return Err(FrontmatterError::MissingField("title".to_string()));
    }

    Ok((Some(frontmatter), body.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_frontmatter() {
        let text = r#"---
title: Ownership
summary: Moves and borrows
tags:
  - rust
  - memory
---

# Ownership

Body text."#;

        let (fm, body) = parse_frontmatter(text).unwrap();
        let fm = fm.unwrap();
        assert_eq!(fm.title, "Ownership");
        assert_eq!(fm.summary, Some("Moves and borrows".to_string()));
        assert_eq!(fm.tags, vec!["rust", "memory"]);
        assert!(body.contains("# Ownership"));
        assert!(body.contains("Body text."));
    }

    #[test]
    fn test_parse_hierarchy_fields() {
        let text = r#"---
title: Borrowing
parent: ownership
see_also: [lifetimes, references]
order: 2
---

Content."#;

        let (fm, _) = parse_frontmatter(text).unwrap();
        let fm = fm.unwrap();
        assert_eq!(fm.parent, Some("ownership".to_string()));
        assert_eq!(fm.see_also, vec!["lifetimes", "references"]);
        assert_eq!(fm.order, Some(2));
        assert!(!fm.root);
    }

    #[test]
    fn test_parse_declared_root() {
        let text = "---\ntitle: The Rust Book\nroot: true\n---\nIntro.";
        let (fm, _) = parse_frontmatter(text).unwrap();
        assert!(fm.unwrap().root);
    }

    #[test]
    fn test_no_frontmatter() {
        let text = "# Just Content\n\nNo front-matter here.";
        let (fm, body) = parse_frontmatter(text).unwrap();
        assert!(fm.is_none());
        assert_eq!(body, text);
    }

    #[test]
    fn test_block_at_end_of_text() {
        let text = "---\ntitle: Terse\n---";
        let (fm, body) = parse_frontmatter(text).unwrap();
        assert_eq!(fm.unwrap().title, "Terse");
        assert_eq!(body, "");
    }

    #[test]
    fn test_invalid_yaml() {
        let text = "---\ntitle: Test\nbroken: [unclosed\n---\nContent.";
        assert!(matches!(
            parse_frontmatter(text),
            Err(FrontmatterError::Yaml(_))
        ));
    }

    #[test]
    fn test_missing_title() {
        let text = "---\nsummary: No title\n---\nContent.";
        match parse_frontmatter(text) {
            Err(FrontmatterError::MissingField(field)) => assert_eq!(field, "title"),
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_title() {
        let text = "---\ntitle: \"\"\n---\nContent.";
        assert!(matches!(
            parse_frontmatter(text),
            Err(FrontmatterError::MissingField(_))
        ));
    }
}
