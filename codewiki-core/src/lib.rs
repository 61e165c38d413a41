//! # codewiki-core
//!
//! Article store and navigation graph for the codewiki documentation
//! browser.
//!
//! This crate holds the corpus of documentation articles, resolves
//! cross-article links, derives the navigation tree and the search index,
//! and serves everything through the [`ArticleStore`] façade as one
//! consistent snapshot. The presentation and routing layers consume this
//! crate; they never see a half-built snapshot.

pub mod frontmatter;
pub mod links;
pub mod loader;
pub mod models;
pub mod navgraph;
pub mod search;
pub mod slug;
pub mod store;

pub use codewiki_types::{RawSource, SourceId};
pub use links::{resolve_references, ResolveError};
pub use loader::{load_sources, LoadError, LoadOutcome, SourceError};
pub use models::{Article, Frontmatter, NavigationNode, RefKind, Reference};
pub use navgraph::{GraphError, NavigationGraph};
pub use search::{ConfigError, SearchHit, SearchIndex};
pub use slug::slugify;
pub use store::{ArticleStore, NotFoundError, RebuildError, RebuildReport};
