//! Navigation graph - hierarchical and associative views over the corpus.
//!
//! Parent edges form a forest; everything is keyed by slug and stored in
//! adjacency lists so the structure is serializable and carries no
//! ownership cycles. Built once per snapshot, off the read path.

use crate::models::{Article, RefKind, Reference};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphError {
    /// The parent relation ran into itself. Breaking the cycle silently
    /// would hide an arbitrary child from every menu, so this blocks
    /// publishing.
    #[error("parent cycle: {}", .0.join(" -> "))]
    ParentCycle(Vec<String>),
}

/// Tree and graph overlay over one article set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NavigationGraph {
    /// child slug -> resolved parent slug
    parent: BTreeMap<String, String>,

    /// parent slug -> ordered child slugs
    children: BTreeMap<String, Vec<String>>,

    /// Slugs with no resolved parent, in slug order.
    roots: Vec<String>,

    /// Roots that never declared themselves one and never named a parent.
    orphans: Vec<String>,

    /// target slug -> source slugs of resolved incoming references
    incoming: BTreeMap<String, Vec<String>>,

    /// References whose target does not exist in the article set.
    dangling: Vec<Reference>,
}

impl NavigationGraph {
    /// Build the graph from one consistent article set and its references.
    ///
    /// Fails on a parent cycle; a dangling parent edge leaves the child a
    /// root (its declared intent is still reported via
    /// [`dangling_references`](Self::dangling_references)).
    pub fn build(articles: &[Article], references: &[Reference]) -> Result<Self, GraphError> {
        let by_slug: BTreeMap<&str, &Article> =
            articles.iter().map(|a| (a.slug.as_str(), a)).collect();

        let mut parent: BTreeMap<String, String> = BTreeMap::new();
        let mut incoming: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut dangling: Vec<Reference> = Vec::new();

        for reference in references {
            if reference.is_dangling() {
                dangling.push(reference.clone());
                continue;
            }
            if reference.kind == RefKind::Parent {
                if reference.self_reference {
                    // The smallest possible cycle.
                    return Err(GraphError::ParentCycle(vec![
                        reference.source.clone(),
                        reference.source.clone(),
                    ]));
                }
                parent.insert(reference.source.clone(), reference.target.clone());
            }
            if !reference.self_reference {
                let backlinks = incoming.entry(reference.target.clone()).or_default();
                if !backlinks.contains(&reference.source) {
                    backlinks.push(reference.source.clone());
                }
            }
        }

        detect_cycles(&parent)?;

        let mut children: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (child, parent_slug) in &parent {
            children.entry(parent_slug.clone()).or_default().push(child.clone());
        }
        for siblings in children.values_mut() {
            sort_siblings(siblings, &by_slug);
        }

        let mut roots = Vec::new();
        let mut orphans = Vec::new();
        for article in by_slug.values() {
            if parent.contains_key(&article.slug) {
                continue;
            }
            roots.push(article.slug.clone());
            if !article.declared_root && article.parent.is_none() {
                orphans.push(article.slug.clone());
            }
        }

        if !dangling.is_empty() {
            tracing::warn!(
                dangling = dangling.len(),
                "navigation graph carries dangling references"
            );
        }
        tracing::info!(
            roots = roots.len(),
            orphans = orphans.len(),
            "built navigation graph"
        );

        Ok(NavigationGraph {
            parent,
            children,
            roots,
            orphans,
            incoming,
            dangling,
        })
    }

    /// Ordered slugs from the nearest root down to `slug`, inclusive.
    /// `None` when the slug is not in the graph's article set.
    pub fn path_to(&self, slug: &str) -> Option<Vec<String>> {
        if !self.contains(slug) {
            return None;
        }

        let mut path = vec![slug.to_string()];
        let mut current = slug;
        while let Some(parent) = self.parent.get(current) {
            path.push(parent.clone());
            current = parent;
        }
        path.reverse();
        Some(path)
    }

    /// Ordered child slugs of `slug` (empty for leaves and unknown slugs).
    pub fn children(&self, slug: &str) -> Vec<String> {
        self.children.get(slug).cloned().unwrap_or_default()
    }

    /// Resolved parent slug, `None` for roots and unknown slugs.
    pub fn parent(&self, slug: &str) -> Option<&str> {
        self.parent.get(slug).map(String::as_str)
    }

    /// Top-level slugs in slug order.
    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    /// Articles that neither declared a root flag nor named a parent:
    /// accidentally unlinked content.
    pub fn orphans(&self) -> &[String] {
        &self.orphans
    }

    /// Every reference whose target is absent from the article set.
    pub fn dangling_references(&self) -> &[Reference] {
        &self.dangling
    }

    /// Source slugs of resolved references pointing at `slug`, in slug
    /// order.
    pub fn backlinks(&self, slug: &str) -> Vec<String> {
        self.incoming.get(slug).cloned().unwrap_or_default()
    }

    fn contains(&self, slug: &str) -> bool {
        self.roots.iter().any(|s| s == slug)
            || self.parent.contains_key(slug)
    }
}

/// Depth-first walk over parent pointers with a visiting/visited marker
/// per node.
fn detect_cycles(parent: &BTreeMap<String, String>) -> Result<(), GraphError> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Visiting,
        Visited,
    }

    let mut marks: HashMap<&str, Mark> = HashMap::new();

    for start in parent.keys() {
        if marks.contains_key(start.as_str()) {
            continue;
        }

        let mut trail: Vec<&str> = Vec::new();
        let mut current = start.as_str();

        loop {
            match marks.get(current) {
                Some(Mark::Visited) => break,
                Some(Mark::Visiting) => {
                    // Report the cycle from its first recurrence.
                    let at = trail.iter().position(|s| *s == current).unwrap_or(0);
                    let mut cycle: Vec<String> =
                        trail[at..].iter().map(|s| s.to_string()).collect();
                    cycle.push(current.to_string());
                    return Err(GraphError::ParentCycle(cycle));
                }
                None => {
                    marks.insert(current, Mark::Visiting);
                    trail.push(current);
                    match parent.get(current) {
                        Some(next) => current = next.as_str(),
                        None => break,
                    }
                }
            }
        }

        for visited in trail {
            marks.insert(visited, Mark::Visited);
        }
    }

    Ok(())
}

/// Stable sibling order: explicit hints first (ascending), then title,
/// then slug as the final tie-break.
fn sort_siblings(siblings: &mut [String], by_slug: &BTreeMap<&str, &Article>) {
    siblings.sort_by(|a, b| {
        let ka = sibling_key(a, by_slug);
        let kb = sibling_key(b, by_slug);
        ka.cmp(&kb)
    });
}

fn sibling_key<'a>(
    slug: &'a str,
    by_slug: &BTreeMap<&str, &'a Article>,
) -> (bool, u32, &'a str, &'a str) {
    match by_slug.get(slug) {
        Some(article) => (
            article.order.is_none(),
            article.order.unwrap_or(0),
            article.title.as_str(),
            article.slug.as_str(),
        ),
        None => (true, 0, "", slug),
    }
}
