//! Map payload IDs back to human-readable event names.
//!
//! Payload IDs are not hashes of anything a user would recognize. Event IDs are
//! FNV-1 hashes of event names, so a list of candidate names can be matched
//! against the events of a hierarchy and followed down to the media they play.

use std::collections::{HashMap, HashSet, VecDeque};

use serde::Serialize;

use crate::fnv::fnv1_lower;
use crate::hirc::{ObjectGraph, ObjectKind};

/// Maximum number of edges followed from an event before giving up on a path.
pub const MAX_TRAVERSAL_DEPTH: usize = 12;

/// A payload ID and the event name that plays it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EventMapping {
    pub id: u32,
    pub name: String,
}

/// How a [`Resolution`] was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionStrategy {
    /// Events were traversed down to their media.
    Hierarchy,
    /// Names were hashed and compared with payload IDs directly.
    Direct,
}

/// The outcome of name resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// At most one mapping per payload ID, in discovery order.
    pub mappings: Vec<EventMapping>,
    pub strategy: ResolutionStrategy,
    /// Later matches for IDs that already had a name.
    pub shadowed: usize,
}

impl Resolution {
    fn new(strategy: ResolutionStrategy) -> Self {
        Self {
            mappings: Vec::new(),
            strategy,
            shadowed: 0,
        }
    }

    pub fn name_of(&self, id: u32) -> Option<&str> {
        self.mappings
            .iter()
            .find(|mapping| mapping.id == id)
            .map(|mapping| mapping.name.as_str())
    }

    pub fn into_map(self) -> HashMap<u32, String> {
        self.mappings
            .into_iter()
            .map(|mapping| (mapping.id, mapping.name))
            .collect()
    }
}

/// Resolve names by walking the hierarchy from each matching event.
///
/// Names are tried in order; the first name to reach a payload ID keeps it.
/// Names that hash to no event are ignored.
pub fn resolve<S: AsRef<str>>(graph: &ObjectGraph, names: impl IntoIterator<Item = S>) -> Resolution {
    let mut resolution = Resolution::new(ResolutionStrategy::Hierarchy);
    let mut named = HashSet::new();

    for name in names {
        let name = name.as_ref();
        let event_id = fnv1_lower(name);
        match graph.get(event_id) {
            Some(event) if event.kind == ObjectKind::Event => {}
            _ => continue,
        }

        for id in reachable_media(graph, event_id) {
            if named.insert(id) {
                resolution.mappings.push(EventMapping {
                    id,
                    name: name.to_string(),
                });
            } else {
                resolution.shadowed += 1;
            }
        }
    }

    tracing::debug!(
        "Hierarchy resolution named {} payloads ({} shadowed)",
        resolution.mappings.len(),
        resolution.shadowed
    );
    resolution
}

/// Resolve names by comparing their hashes with payload IDs.
pub fn resolve_direct<S: AsRef<str>>(
    payload_ids: &[u32],
    names: impl IntoIterator<Item = S>,
) -> Resolution {
    let ids: HashSet<u32> = payload_ids.iter().copied().collect();
    let mut resolution = Resolution::new(ResolutionStrategy::Direct);
    let mut named = HashSet::new();

    for name in names {
        let name = name.as_ref();
        let id = fnv1_lower(name);
        if !ids.contains(&id) {
            continue;
        }

        if named.insert(id) {
            resolution.mappings.push(EventMapping {
                id,
                name: name.to_string(),
            });
        } else {
            resolution.shadowed += 1;
        }
    }

    resolution
}

/// Use the hierarchy when it has events, otherwise fall back to direct matching.
pub fn resolve_auto<S: AsRef<str>>(
    graph: Option<&ObjectGraph>,
    payload_ids: &[u32],
    names: impl IntoIterator<Item = S>,
) -> Resolution {
    match graph {
        Some(graph) if graph.has_events() => resolve(graph, names),
        _ => {
            tracing::warn!(
                "No event hierarchy available, matching names against payload ids directly"
            );
            resolve_direct(payload_ids, names)
        }
    }
}

/// Breadth-first walk from an event to every media ID it can play.
fn reachable_media(graph: &ObjectGraph, event_id: u32) -> Vec<u32> {
    let mut media = Vec::new();
    let mut emitted = HashSet::new();
    let mut visited = HashSet::from([event_id]);
    let mut queue: VecDeque<(u32, usize)> = graph.edges(event_id).map(|id| (id, 1)).collect();

    while let Some((id, depth)) = queue.pop_front() {
        if !visited.insert(id) {
            continue;
        }
        let Some(record) = graph.get(id) else {
            continue;
        };

        if record.kind == ObjectKind::Sound {
            let ids = if record.media.is_empty() {
                std::slice::from_ref(&record.id)
            } else {
                record.media.as_slice()
            };
            media.extend(ids.iter().copied().filter(|id| emitted.insert(*id)));
            continue;
        }

        if depth >= MAX_TRAVERSAL_DEPTH {
            tracing::debug!(
                "Stopped walking event {} at object {} (depth {})",
                event_id,
                id,
                depth
            );
            continue;
        }
        queue.extend(graph.edges(id).map(|next| (next, depth + 1)));
    }

    media
}
