//! Registry of half-edges still waiting for their opposite half-edge.

use std::collections::BTreeMap;

use super::types::{HalfEdgeId, VertexId};

/// Unpaired half-edges keyed by their directed endpoints
///
/// A new half-edge `a -> b` is matched by looking up the entry `b -> a`, so
/// pairing costs a map lookup rather than a scan of the whole pool.
#[derive(Debug, Default)]
pub(crate) struct UnpairedPool {
    by_endpoints: BTreeMap<(VertexId, VertexId), HalfEdgeId>,
}

impl UnpairedPool {
    pub(crate) fn insert(&mut self, begin: VertexId, end: VertexId, id: HalfEdgeId) {
        self.by_endpoints.insert((begin, end), id);
    }

    /// Remove and return the pooled half-edge running `end -> begin`.
    pub(crate) fn take_reverse(&mut self, begin: VertexId, end: VertexId) -> Option<HalfEdgeId> {
        self.by_endpoints.remove(&(end, begin))
    }

    /// Remove `id` if it is pooled under `begin -> end`.
    pub(crate) fn remove(&mut self, begin: VertexId, end: VertexId, id: HalfEdgeId) -> bool {
        if self.by_endpoints.get(&(begin, end)) == Some(&id) {
            self.by_endpoints.remove(&(begin, end));
            true
        } else {
            false
        }
    }

    pub(crate) fn contains(&self, begin: VertexId, end: VertexId, id: HalfEdgeId) -> bool {
        self.by_endpoints.get(&(begin, end)) == Some(&id)
    }

    pub(crate) fn len(&self) -> usize {
        self.by_endpoints.len()
    }

    pub(crate) fn clear(&mut self) {
        self.by_endpoints.clear();
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = ((VertexId, VertexId), HalfEdgeId)> + '_ {
        self.by_endpoints.iter().map(|(&key, &id)| (key, id))
    }
}
