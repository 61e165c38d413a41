//! Content model structs for articles, references, and navigation nodes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Front-matter metadata parsed from an article source.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Frontmatter {
    pub title: String,

    #[serde(default)]
    pub slug: Option<String>,

    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Slug of the hierarchical parent article, if any.
    #[serde(default)]
    pub parent: Option<String>,

    /// Associative cross-links rendered as a "see also" list.
    #[serde(default)]
    pub see_also: Vec<String>,

    /// Explicit ordering hint among siblings under the same parent.
    #[serde(default)]
    pub order: Option<u32>,

    /// Marks a declared top-level section. Articles without a parent and
    /// without this flag are reported as orphans.
    #[serde(default)]
    pub root: bool,

    #[serde(default)]
    pub updated: Option<String>,
}

/// A single documentation article.
///
/// Immutable once loaded into a snapshot: a rebuild produces fresh
/// `Article` values rather than patching existing ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// URL-safe unique identifier (e.g., "rust-safety").
    pub slug: String,

    /// Display title.
    pub title: String,

    /// Markdown body without front-matter.
    pub body: String,

    /// Tags for categorization, deduplicated in declaration order.
    pub tags: Vec<String>,

    /// Preview text for link previews.
    pub summary: Option<String>,

    /// Last-modified date.
    pub updated: Option<NaiveDate>,

    /// Sibling ordering hint.
    pub order: Option<u32>,

    /// Declared parent slug (normalized), before resolution.
    pub parent: Option<String>,

    /// Declared see-also slugs (normalized).
    pub see_also: Vec<String>,

    /// Whether the article declared itself a top-level section.
    pub declared_root: bool,

    /// Identifier of the source this article was loaded from.
    pub source_id: String,
}

impl Article {
    /// Check whether the article carries the given tag.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Kind of a directed reference between two articles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RefKind {
    /// A `[[wikilink]]` marker inside the body.
    InternalLink,
    /// A front-matter `see_also` entry.
    SeeAlso,
    /// The front-matter `parent` edge.
    Parent,
}

impl RefKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefKind::InternalLink => "internal-link",
            RefKind::SeeAlso => "see-also",
            RefKind::Parent => "parent",
        }
    }
}

/// A directed edge from one article to another.
///
/// The source always exists in the corpus; the target may not, in which
/// case the reference is dangling (`resolved == false`), a detectable,
/// non-fatal state reported through the navigation graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub source: String,
    pub target: String,
    pub kind: RefKind,

    /// Whether the target slug exists in the article set.
    pub resolved: bool,

    /// Whether source and target are the same article.
    pub self_reference: bool,
}

impl Reference {
    pub fn is_dangling(&self) -> bool {
        !self.resolved
    }
}

/// An article wrapped with its computed position in the navigation tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationNode {
    pub article: Article,

    /// Resolved parent slug, `None` for roots.
    pub parent: Option<String>,

    /// Ordered child slugs.
    pub children: Vec<String>,

    /// Slugs from the nearest root down to this article, inclusive.
    pub path: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(slug: &str) -> Article {
        Article {
            slug: slug.into(),
            title: slug.to_uppercase(),
            body: String::new(),
            tags: vec!["rust".into()],
            summary: None,
            updated: None,
            order: None,
            parent: None,
            see_also: vec![],
            declared_root: false,
            source_id: slug.into(),
        }
    }

    #[test]
    fn test_ref_kind_names() {
        assert_eq!(RefKind::InternalLink.as_str(), "internal-link");
        assert_eq!(RefKind::SeeAlso.as_str(), "see-also");
        assert_eq!(RefKind::Parent.as_str(), "parent");
    }

    #[test]
    fn test_has_tag() {
        let a = article("ownership");
        assert!(a.has_tag("rust"));
        assert!(!a.has_tag("python"));
    }

    #[test]
    fn test_dangling_reference() {
        let r = Reference {
            source: "a".into(),
            target: "missing".into(),
            kind: RefKind::InternalLink,
            resolved: false,
            self_reference: false,
        };
        assert!(r.is_dangling());
    }
}
