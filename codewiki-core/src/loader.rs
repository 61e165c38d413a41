//! Content loading - turns raw sources into articles.
//!
//! Pure with respect to the outside world: the loader never touches the
//! filesystem or the clock. Per-source parse failures are collected so a
//! caller can publish the valid part of a corpus while surfacing the bad
//! sources; only ambiguous identity (duplicate slugs) fails the batch.

use crate::frontmatter::{parse_frontmatter, FrontmatterError};
use crate::models::{Article, Frontmatter};
use crate::slug::slugify;
use chrono::NaiveDate;
use codewiki_types::RawSource;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("duplicate slug '{slug}' from sources '{first}' and '{second}'")]
    DuplicateSlug {
        slug: String,
        first: String,
        second: String,
    },
}

/// A non-fatal, per-source load failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceError {
    pub source_id: String,
    pub message: String,
}

impl SourceError {
    fn new(source_id: &str, message: impl Into<String>) -> Self {
        Self {
            source_id: source_id.to_string(),
            message: message.into(),
        }
    }
}

/// Result of loading a batch of sources.
///
/// `articles` holds everything that parsed; `source_errors` the sources
/// that did not. An outcome with errors is still publishable.
#[derive(Debug, Clone, Default)]
pub struct LoadOutcome {
    pub articles: Vec<Article>,
    pub source_errors: Vec<SourceError>,
}

/// Load a batch of raw sources into articles.
///
/// Duplicate slugs across sources are a hard batch failure; everything
/// else degrades to a `SourceError` entry.
pub fn load_sources(sources: &[RawSource]) -> Result<LoadOutcome, LoadError> {
    let mut outcome = LoadOutcome::default();
    // slug -> source id that claimed it first
    let mut claimed: HashMap<String, String> = HashMap::new();

    for source in sources {
        let article = match parse_source(source) {
            Ok(article) => article,
            Err(error) => {
                tracing::warn!(source = %source.id, %error, "skipping unparseable source");
                outcome.source_errors.push(SourceError::new(
                    source.id.as_str(),
                    error.to_string(),
                ));
                continue;
            }
        };

        if let Some(first) = claimed.get(&article.slug) {
            return Err(LoadError::DuplicateSlug {
                slug: article.slug,
                first: first.clone(),
                second: source.id.as_str().to_string(),
            });
        }

        claimed.insert(article.slug.clone(), source.id.as_str().to_string());
        outcome.articles.push(article);
    }

    tracing::info!(
        articles = outcome.articles.len(),
        errors = outcome.source_errors.len(),
        "loaded source batch"
    );

    Ok(outcome)
}

#[derive(Error, Debug)]
enum SourceParseError {
    #[error("{0}")]
    Frontmatter(#[from] FrontmatterError),

    #[error("source id and front-matter yield an empty slug")]
    EmptySlug,
}

fn parse_source(source: &RawSource) -> Result<Article, SourceParseError> {
    let (frontmatter, body) = parse_frontmatter(&source.text)?;
    let frontmatter = frontmatter.unwrap_or_else(|| Frontmatter {
        // Plain markdown without a front-matter block: fall back to the
        // first heading, then to the source id.
        title: first_heading(&body)
            .unwrap_or_else(|| source.id.as_str().to_string()),
        ..Frontmatter::default()
    });

    let slug = match &frontmatter.slug {
        Some(declared) => slugify(declared),
        None => slugify(source.id.as_str()),
    };
    if slug.is_empty() {
        return Err(SourceParseError::EmptySlug);
    }

    let updated = frontmatter.updated.as_deref().and_then(|d| {
        let parsed = NaiveDate::parse_from_str(d, "%Y-%m-%d").ok();
        if parsed.is_none() {
            tracing::warn!(source = %source.id, date = d, "ignoring unparseable updated date");
        }
        parsed
    });

    Ok(Article {
        slug,
        title: frontmatter.title.clone(),
        tags: dedup_preserving_order(&frontmatter.tags),
        summary: frontmatter.summary.clone(),
        updated,
        order: frontmatter.order,
        parent: frontmatter.parent.as_deref().map(slugify),
        see_also: frontmatter.see_also.iter().map(|s| slugify(s)).collect(),
        declared_root: frontmatter.root,
        source_id: source.id.as_str().to_string(),
        body,
    })
}

/// First ATX heading of a markdown body, used as the title fallback.
fn first_heading(body: &str) -> Option<String> {
    body.lines().find_map(|line| {
        let trimmed = line.trim_start();
        let text = trimmed.strip_prefix('#')?.trim_start_matches('#').trim();
        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    })
}

fn dedup_preserving_order(tags: &[String]) -> Vec<String> {
    let mut seen = Vec::new();
    for tag in tags {
        if !seen.contains(tag) {
            seen.push(tag.clone());
        }
    }
    seen
}
