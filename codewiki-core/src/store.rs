//! Article store façade - owns the published snapshot and the rebuild
//! pipeline.
//!
//! Single-writer, multi-reader: readers clone the current snapshot `Arc`
//! under a momentary read lock and then proceed against that snapshot
//! without further coordination, so an in-flight read never observes a
//! half-published rebuild. The store starts empty and is only ever
//! replaced wholesale.

use crate::links::{resolve_references, ResolveError};
use crate::loader::{load_sources, LoadError, SourceError};
use crate::models::{Article, NavigationNode, Reference};
use crate::navgraph::{GraphError, NavigationGraph};
use crate::search::{ConfigError, SearchHit, SearchIndex};
use codewiki_types::RawSource;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
#[error("article '{slug}' is not in the current snapshot")]
pub struct NotFoundError {
    pub slug: String,
}

#[derive(Error, Debug)]
pub enum RebuildError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("a rebuild is already in progress")]
    Busy,
}

/// Outcome summary of a successful rebuild, including its non-fatal
/// warnings (per-source load errors and dangling references).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RebuildReport {
    pub articles: usize,
    pub references: usize,
    pub dangling: Vec<Reference>,
    pub source_errors: Vec<SourceError>,
}

impl RebuildReport {
    pub fn is_clean(&self) -> bool {
        self.dangling.is_empty() && self.source_errors.is_empty()
    }
}

/// One immutable, mutually-consistent bundle of articles and everything
/// derived from them.
#[derive(Debug, Default)]
struct Snapshot {
    articles: BTreeMap<String, Article>,
    graph: NavigationGraph,
    index: SearchIndex,
}

/// The article store façade.
///
/// All reads serve the currently published snapshot; `rebuild` assembles
/// a replacement off to the side and publishes it with a single pointer
/// swap, so a failed rebuild never disturbs the live snapshot.
pub struct ArticleStore {
    snapshot: RwLock<Arc<Snapshot>>,
    // Serializes rebuilds; taken with try_lock so a concurrent caller is
    // rejected rather than queued.
    rebuild_guard: Mutex<()>,
}

impl ArticleStore {
    /// Create a store with an empty snapshot.
    pub fn new() -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(Snapshot::default())),
            rebuild_guard: Mutex::new(()),
        }
    }

    fn current(&self) -> Arc<Snapshot> {
        self.snapshot.read().clone()
    }

    /// Fetch one article by slug. A missing slug is an empty result, not
    /// an error.
    pub fn get(&self, slug: &str) -> Option<Article> {
        self.current().articles.get(slug).cloned()
    }

    /// All articles, optionally filtered by tag, in stable slug order.
    pub fn list(&self, tag: Option<&str>) -> Vec<Article> {
        self.current()
            .articles
            .values()
            .filter(|a| tag.map_or(true, |t| a.has_tag(t)))
            .cloned()
            .collect()
    }

    /// The article's position in the navigation tree.
    pub fn navigate(&self, slug: &str) -> Result<NavigationNode, NotFoundError> {
        let snapshot = self.current();
        let article = snapshot.articles.get(slug).ok_or_else(|| NotFoundError {
            slug: slug.to_string(),
        })?;

        // The graph is built from the same article set, so the path is
        // always present for a known slug.
        let path = snapshot
            .graph
            .path_to(slug)
            .unwrap_or_else(|| vec![slug.to_string()]);

        Ok(NavigationNode {
            article: article.clone(),
            parent: snapshot.graph.parent(slug).map(str::to_string),
            children: snapshot.graph.children(slug),
            path,
        })
    }

    /// Ranked full-text search over the snapshot.
    pub fn search(&self, text: &str, limit: usize) -> Result<Vec<SearchHit>, ConfigError> {
        self.current().index.query(text, limit)
    }

    /// Resolved backlinks of an article, in slug order.
    pub fn backlinks(&self, slug: &str) -> Vec<String> {
        self.current().graph.backlinks(slug)
    }

    /// Dangling references of the current snapshot.
    pub fn dangling_references(&self) -> Vec<Reference> {
        self.current().graph.dangling_references().to_vec()
    }

    /// Orphaned slugs of the current snapshot.
    pub fn orphans(&self) -> Vec<String> {
        self.current().graph.orphans().to_vec()
    }

    pub fn article_count(&self) -> usize {
        self.current().articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.article_count() == 0
    }

    /// Run the full pipeline (load -> resolve -> graph -> index) against
    /// a fresh snapshot and publish it atomically.
    ///
    /// On any stage failure the previous snapshot stays live. A second
    /// rebuild racing this one is rejected with [`RebuildError::Busy`].
    pub fn rebuild(&self, sources: &[RawSource]) -> Result<RebuildReport, RebuildError> {
        let Some(_guard) = self.rebuild_guard.try_lock() else {
            tracing::warn!("rejected concurrent rebuild");
            return Err(RebuildError::Busy);
        };

        tracing::info!(sources = sources.len(), "rebuilding snapshot");

        let outcome = load_sources(sources)?;
        let references = resolve_references(&outcome.articles)?;
        let graph = NavigationGraph::build(&outcome.articles, &references)?;
        let index = SearchIndex::build(&outcome.articles);

        let report = RebuildReport {
            articles: outcome.articles.len(),
            references: references.len(),
            dangling: graph.dangling_references().to_vec(),
            source_errors: outcome.source_errors,
        };

        let articles: BTreeMap<String, Article> = outcome
            .articles
            .into_iter()
            .map(|a| (a.slug.clone(), a))
            .collect();

        let next = Arc::new(Snapshot {
            articles,
            graph,
            index,
        });
        *self.snapshot.write() = next;

        tracing::info!(
            articles = report.articles,
            references = report.references,
            dangling = report.dangling.len(),
            source_errors = report.source_errors.len(),
            "published snapshot"
        );

        Ok(report)
    }
}

impl Default for ArticleStore {
    fn default() -> Self {
        Self::new()
    }
}
