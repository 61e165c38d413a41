//! Link resolution - extracts references from articles and resolves them
//! against the corpus.
//!
//! Body markers use wikilink syntax: `[[target]]` or `[[target|display]]`,
//! optionally with a `#fragment` that is ignored for resolution. Markers
//! inside code blocks and inline code are not references, so bodies are
//! scanned as a markdown event stream rather than with a plain substring
//! search.

use crate::models::{Article, RefKind, Reference};
use crate::slug::slugify;
use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolveError {
    /// A body marker whose target normalizes to nothing, e.g. `[[!!!]]`.
    /// Unlike a dangling target this cannot be reported meaningfully, so
    /// it is the one fatal resolver fault.
    #[error("empty link target in article '{article}'")]
    EmptyTarget { article: String },
}

/// Extract every reference declared by the given articles.
///
/// Emits, per article: the `parent` edge, `see_also` edges in declared
/// order, then one `internal-link` per body marker in body order. Unknown
/// targets are retained as dangling references and self-references are
/// retained but flagged. Output is deterministic for a fixed article set:
/// articles are processed in slug order.
pub fn resolve_references(articles: &[Article]) -> Result<Vec<Reference>, ResolveError> {
    let known: BTreeSet<&str> = articles.iter().map(|a| a.slug.as_str()).collect();

    let mut by_slug: Vec<&Article> = articles.iter().collect();
    by_slug.sort_by(|a, b| a.slug.cmp(&b.slug));

    let mut references = Vec::new();
    for article in by_slug {
        if let Some(parent) = &article.parent {
            references.push(make_reference(article, parent, RefKind::Parent, &known));
        }

        for target in &article.see_also {
            references.push(make_reference(article, target, RefKind::SeeAlso, &known));
        }

        for target in body_link_targets(article)? {
            references.push(make_reference(
                article,
                &target,
                RefKind::InternalLink,
                &known,
            ));
        }
    }

    let dangling = references.iter().filter(|r| r.is_dangling()).count();
    if dangling > 0 {
        tracing::warn!(total = references.len(), dangling, "resolved references");
    } else {
        tracing::info!(total = references.len(), "resolved references");
    }

    Ok(references)
}

fn make_reference(
    article: &Article,
    target: &str,
    kind: RefKind,
    known: &BTreeSet<&str>,
) -> Reference {
    Reference {
        source: article.slug.clone(),
        target: target.to_string(),
        kind,
        resolved: known.contains(target),
        self_reference: article.slug == target,
    }
}

/// Wikilink targets in body order, with code blocks and inline code
/// skipped.
fn body_link_targets(article: &Article) -> Result<Vec<String>, ResolveError> {
    let mut targets = Vec::new();
    let mut in_code_block = false;
    // Markdown parsers split text at bracket boundaries, so consecutive
    // text events are merged before marker scanning (`[[b]]` arrives as
    // several events).
    let mut pending_text = String::new();

    let flush = |buffer: &mut String, targets: &mut Vec<String>| -> Result<(), ResolveError> {
        if buffer.contains("[[") {
            scan_markers(buffer, &article.slug, targets)?;
        }
        buffer.clear();
        Ok(())
    };

    for event in Parser::new(&article.body) {
        match event {
            Event::Start(Tag::CodeBlock(_)) => {
                flush(&mut pending_text, &mut targets)?;
                in_code_block = true;
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
            }
            Event::Text(text) if !in_code_block => {
                pending_text.push_str(text.as_ref());
            }
            Event::SoftBreak | Event::HardBreak => {
                // A marker never spans lines.
                flush(&mut pending_text, &mut targets)?;
            }
            _ => {
                flush(&mut pending_text, &mut targets)?;
            }
        }
    }
    flush(&mut pending_text, &mut targets)?;

    Ok(targets)
}

fn scan_markers(
    text: &str,
    source: &str,
    targets: &mut Vec<String>,
) -> Result<(), ResolveError> {
    let mut remaining = text;

    while let Some(start) = remaining.find("[[") {
        let after = &remaining[start + 2..];
        let Some(end) = after.find("]]") else {
            // Unclosed marker, literal text.
            break;
        };

        let marker = &after[..end];
        let target = marker
            .split('|')
            .next()
            .unwrap_or(marker)
            .split('#')
            .next()
            .unwrap_or(marker)
            .trim();

        let slug = slugify(target);
        if slug.is_empty() {
            return Err(ResolveError::EmptyTarget {
                article: source.to_string(),
            });
        }
        targets.push(slug);

        remaining = &after[end + 2..];
    }

    Ok(())
}
