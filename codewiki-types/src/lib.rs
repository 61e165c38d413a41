//! Shared types for codewiki
//!
//! This crate holds the loader contract shared between the article store
//! and external content providers (filesystem walkers, API clients,
//! embedded datasets).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a raw content source, assigned by the content provider.
///
/// For a filesystem provider this is typically the relative path; for an
/// API provider the record id. The store derives a default slug from it
/// when the source declares none.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceId(pub String);

impl SourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceId {
    fn from(id: &str) -> Self {
        SourceId(id.to_string())
    }
}

impl From<String> for SourceId {
    fn from(id: String) -> Self {
        SourceId(id)
    }
}

/// One raw article source handed to the store for loading.
///
/// The text is the collaborator-defined article format: optional YAML
/// front-matter followed by a markdown body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSource {
    pub id: SourceId,
    pub text: String,
}

impl RawSource {
    pub fn new(id: impl Into<SourceId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}
