//! Removal of deleted slots and id remapping.

use std::collections::HashMap;

use tracing::debug;

use super::types::{FaceId, HalfEdgeId, VertexId};
use super::Mesh;

/// Result of mesh compaction - maps old IDs to new IDs.
///
/// Deleted vertices, half-edges and faces leave empty slots behind so that
/// ids stay stable across edits. Compaction drops the empty slots and
/// renumbers the survivors contiguously, preserving their order.
#[derive(Debug, Default)]
pub struct CompactionMap {
    pub vertex_map: HashMap<VertexId, VertexId>,
    pub half_edge_map: HashMap<HalfEdgeId, HalfEdgeId>,
    pub face_map: HashMap<FaceId, FaceId>,
}

impl Mesh {
    /// Drop empty slots and renumber every element.
    ///
    /// All ids handed out before this call are invalidated; translate them
    /// through the returned map.
    pub fn compact(&mut self) -> CompactionMap {
        let before = (self.vertices.len(), self.half_edges.len(), self.faces.len());
        let mut map = CompactionMap::default();

        for (i, v) in self.vertices.iter().enumerate() {
            if v.is_some() {
                let new_id = VertexId(map.vertex_map.len() as u32);
                map.vertex_map.insert(VertexId(i as u32), new_id);
            }
        }
        for (i, he) in self.half_edges.iter().enumerate() {
            if he.is_some() {
                let new_id = HalfEdgeId(map.half_edge_map.len() as u32);
                map.half_edge_map.insert(HalfEdgeId(i as u32), new_id);
            }
        }
        for (i, f) in self.faces.iter().enumerate() {
            if f.is_some() {
                let new_id = FaceId(map.face_map.len() as u32);
                map.face_map.insert(FaceId(i as u32), new_id);
            }
        }

        let vertices = std::mem::take(&mut self.vertices);
        self.vertices = vertices
            .into_iter()
            .flatten()
            .map(|mut v| {
                v.id = map.vertex_map[&v.id];
                v.outgoing_half_edge = v.outgoing_half_edge.map(|he| map.half_edge_map[&he]);
                Some(v)
            })
            .collect();

        let half_edges = std::mem::take(&mut self.half_edges);
        self.half_edges = half_edges
            .into_iter()
            .flatten()
            .map(|mut he| {
                he.id = map.half_edge_map[&he.id];
                he.end = map.vertex_map[&he.end];
                he.next = map.half_edge_map[&he.next];
                he.pair = he.pair.map(|p| map.half_edge_map[&p]);
                he.face = map.face_map[&he.face];
                Some(he)
            })
            .collect();

        let faces = std::mem::take(&mut self.faces);
        self.faces = faces
            .into_iter()
            .flatten()
            .map(|mut f| {
                f.id = map.face_map[&f.id];
                f.main_edge = map.half_edge_map[&f.main_edge];
                Some(f)
            })
            .collect();

        // Rebuild both endpoint-keyed registries from the renumbered edges
        self.edge_map.clear();
        self.unpaired.clear();
        for i in 0..self.half_edges.len() {
            let id = HalfEdgeId(i as u32);
            let begin = self.he_begin(id);
            let he = self.he(id);
            let (end, unpaired) = (he.end, he.pair.is_none());
            self.edge_map.insert((begin, end), id);
            if unpaired {
                self.unpaired.insert(begin, end, id);
            }
        }

        debug!(
            "compact: {:?} slots -> {:?} live",
            before,
            (self.vertices.len(), self.half_edges.len(), self.faces.len())
        );
        map
    }
}
