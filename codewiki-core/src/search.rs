//! Inverted search index over article titles, tags, and bodies.
//!
//! Rebuilt wholesale with every snapshot; never patched in place. The
//! index only stores normalized tokens and per-article weights, so it is
//! cheap to serialize and safe to build off the read path.

use crate::models::Article;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("search limit must be greater than zero")]
    ZeroLimit,
}

/// Per-occurrence weights by field.
const TITLE_WEIGHT: f32 = 5.0;
const TAG_WEIGHT: f32 = 3.0;
const BODY_WEIGHT: f32 = 1.0;

/// Prefix matches score half of an exact token match.
const PREFIX_FACTOR: f32 = 0.5;

const SNIPPET_CHARS: usize = 160;

const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it",
    "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there", "these",
    "they", "this", "to", "was", "will", "with",
];

/// A single ranked search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub slug: String,
    pub score: f32,
    pub snippet: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DocMeta {
    updated: Option<NaiveDate>,
    snippet: String,
}

/// Inverted index: normalized token -> (slug -> accumulated weight).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchIndex {
    postings: BTreeMap<String, BTreeMap<String, f32>>,
    docs: BTreeMap<String, DocMeta>,
}

impl SearchIndex {
    /// Build the index over one consistent article set.
    pub fn build(articles: &[Article]) -> Self {
        let mut index = SearchIndex::default();

        for article in articles {
            for token in tokenize(&article.title) {
                index.bump(token, &article.slug, TITLE_WEIGHT);
            }
            for tag in &article.tags {
                for token in tokenize(tag) {
                    index.bump(token, &article.slug, TAG_WEIGHT);
                }
            }
            for token in tokenize(&article.body) {
                index.bump(token, &article.slug, BODY_WEIGHT);
            }

            index.docs.insert(
                article.slug.clone(),
                DocMeta {
                    updated: article.updated,
                    snippet: snippet(article.summary.as_deref().unwrap_or(&article.body)),
                },
            );
        }

        tracing::info!(
            tokens = index.postings.len(),
            documents = index.docs.len(),
            "built search index"
        );

        index
    }

    fn bump(&mut self, token: String, slug: &str, weight: f32) {
        *self
            .postings
            .entry(token)
            .or_default()
            .entry(slug.to_string())
            .or_insert(0.0) += weight;
    }

    /// Ranked query over the index.
    ///
    /// Ordering: score descending, then most recent `updated` date, then
    /// slug ascending. An empty token set (empty text, or stop-words
    /// only) yields an empty result, not an error; a zero limit is a
    /// caller bug.
    pub fn query(&self, text: &str, limit: usize) -> Result<Vec<SearchHit>, ConfigError> {
        if limit == 0 {
            return Err(ConfigError::ZeroLimit);
        }

        let tokens = tokenize(text);
        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        let mut scores: BTreeMap<&str, f32> = BTreeMap::new();
        for token in &tokens {
            if let Some(postings) = self.postings.get(token) {
                for (slug, weight) in postings {
                    *scores.entry(slug).or_insert(0.0) += weight;
                }
            }

            // Prefix matches: indexed tokens this query token prefixes,
            // at reduced weight.
            for (indexed, postings) in self
                .postings
                .range::<str, _>((
                    std::ops::Bound::Excluded(token.as_str()),
                    std::ops::Bound::Unbounded,
                ))
                .take_while(|(indexed, _)| indexed.starts_with(token.as_str()))
            {
                debug_assert_ne!(indexed.as_str(), token.as_str());
                for (slug, weight) in postings {
                    *scores.entry(slug).or_insert(0.0) += weight * PREFIX_FACTOR;
                }
            }
        }

        let mut hits: Vec<SearchHit> = scores
            .into_iter()
            .map(|(slug, score)| SearchHit {
                slug: slug.to_string(),
                score,
                snippet: self
                    .docs
                    .get(slug)
                    .map(|d| d.snippet.clone())
                    .unwrap_or_default(),
            })
            .collect();

        hits.sort_by(|a, b| self.rank(a, b));
        hits.truncate(limit);
        Ok(hits)
    }

    fn rank(&self, a: &SearchHit, b: &SearchHit) -> Ordering {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                let ua = self.docs.get(&a.slug).and_then(|d| d.updated);
                let ub = self.docs.get(&b.slug).and_then(|d| d.updated);
                // More recent first, undated last.
                match (ua, ub) {
                    (Some(da), Some(db)) => db.cmp(&da),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                }
            })
            .then_with(|| a.slug.cmp(&b.slug))
    }
}

/// Lower-cased tokens split on non-alphanumeric boundaries, stop-words
/// removed.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty() && !STOP_WORDS.contains(t))
        .map(str::to_string)
        .collect()
}

/// Word-boundary truncated preview of a text.
fn snippet(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= SNIPPET_CHARS {
        return flat;
    }

    let truncated: String = flat.chars().take(SNIPPET_CHARS).collect();
    match truncated.rfind(' ') {
        Some(cut) => format!("{}...", &truncated[..cut]),
        None => format!("{}...", truncated),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(slug: &str, title: &str, body: &str) -> Article {
        Article {
            slug: slug.into(),
            title: title.into(),
            body: body.into(),
            tags: vec![],
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
    fn test_tokenize() {
        assert_eq!(tokenize("Hello, World!"), vec!["hello", "world"]);
        assert_eq!(tokenize("the and of"), Vec::<String>::new());
        assert_eq!(tokenize("borrow-checker v2"), vec!["borrow", "checker", "v2"]);
    }

    #[test]
    fn test_title_outranks_body() {
        let articles = vec![
            article("in-title", "Ownership Rules", "Nothing else."),
            article("in-body", "Other", "ownership ownership ownership"),
        ];
        let index = SearchIndex::build(&articles);

        let hits = index.query("ownership", 10).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].slug, "in-title");
        assert!(hits[0].score > hits[1].score);
    }

    #[test]
    fn test_tag_match() {
        let mut a = article("tagged", "Misc", "body");
        a.tags = vec!["concurrency".into()];
        let index = SearchIndex::build(&[a]);

        let hits = index.query("concurrency", 5).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].score, TAG_WEIGHT);
    }

    #[test]
    fn test_prefix_match_scores_less() {
        let articles = vec![
            article("exact", "Own", ""),
            article("longer", "Ownership", ""),
        ];
        let index = SearchIndex::build(&articles);

        let hits = index.query("own", 10).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].slug, "exact");
        assert_eq!(hits[1].slug, "longer");
        assert!(hits[0].score > hits[1].score);
    }

    #[test]
    fn test_tie_breaks_by_updated_then_slug() {
        let mut older = article("b-older", "Same Title", "");
        older.updated = NaiveDate::from_ymd_opt(2026, 1, 1);
        let mut newer = article("c-newer", "Same Title", "");
        newer.updated = NaiveDate::from_ymd_opt(2026, 6, 1);
        let undated = article("a-undated", "Same Title", "");

        let index = SearchIndex::build(&[older, newer, undated]);
        let hits = index.query("same title", 10).unwrap();
        let slugs: Vec<_> = hits.iter().map(|h| h.slug.as_str()).collect();
        assert_eq!(slugs, vec!["c-newer", "b-older", "a-undated"]);
    }

    #[test]
    fn test_empty_query_is_empty_result() {
        let index = SearchIndex::build(&[article("a", "Title", "body")]);
        assert!(index.query("", 5).unwrap().is_empty());
        assert!(index.query("the of and", 5).unwrap().is_empty());
    }

    #[test]
    fn test_zero_limit_rejected() {
        let index = SearchIndex::build(&[]);
        assert!(matches!(index.query("x", 0), Err(ConfigError::ZeroLimit)));
    }

    #[test]
    fn test_limit_truncates() {
        let articles: Vec<_> = (0..5)
            .map(|i| article(&format!("doc-{i}"), "Shared Term", ""))
            .collect();
        let index = SearchIndex::build(&articles);
        assert_eq!(index.query("shared", 3).unwrap().len(), 3);
    }

    #[test]
    fn test_repeated_queries_identical() {
        let articles = vec![
            article("a", "Alpha Beta", "gamma"),
            article("b", "Beta Gamma", "alpha"),
        ];
        let index = SearchIndex::build(&articles);
        let first = index.query("beta gamma", 10).unwrap();
        let second = index.query("beta gamma", 10).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_snippet_truncation() {
        let long = "word ".repeat(100);
        let s = snippet(&long);
        assert!(s.ends_with("..."));
        assert!(s.chars().count() <= SNIPPET_CHARS + 3);
    }
}
