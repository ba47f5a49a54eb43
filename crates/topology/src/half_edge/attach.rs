//! Merging another mesh along a seam of boundary half-edges.

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use super::types::{FaceId, HalfEdgeId, TopologyError, VertexId};
use super::Mesh;

/// Where the elements of an attached sub-mesh ended up
#[derive(Debug, Default)]
pub struct AttachMap {
    pub vertices: HashMap<VertexId, VertexId>,
    pub half_edges: HashMap<HalfEdgeId, HalfEdgeId>,
    pub faces: HashMap<FaceId, FaceId>,
}

impl Mesh {
    /// Merge the faces of `submesh` into this mesh.
    ///
    /// `seam` maps boundary half-edges of this mesh to boundary half-edges of
    /// the sub-mesh running the opposite way between coincident endpoints.
    /// Seam vertices of the sub-mesh are welded onto their counterparts here
    /// (this mesh's vertex survives) and the seam half-edges become pairs.
    /// Every other sub-mesh vertex is copied in order, isolated ones included,
    /// and shows up in [`AttachMap::vertices`].
    ///
    /// The whole seam is checked before anything changes. A failure while
    /// copying faces afterwards leaves this mesh abandoned.
    pub fn attach(
        &mut self,
        submesh: Mesh,
        seam: &HashMap<HalfEdgeId, HalfEdgeId>,
    ) -> Result<AttachMap, TopologyError> {
        let welded = self.check_seam(&submesh, seam)?;
        self.check_welded_edges(&submesh, &welded)?;

        let mut map = AttachMap {
            vertices: welded.clone(),
            ..AttachMap::default()
        };
        for v in submesh.vertices() {
            if !map.vertices.contains_key(&v.id) {
                map.vertices.insert(v.id, self.add_vertex(v.position, v.normal));
            }
        }
        let faces: Vec<FaceId> = submesh.faces().map(|f| f.id).collect();
        submesh.copy_faces_into(self, &faces, &mut map.vertices, &mut map.half_edges, &mut map.faces)?;

        for (&own, &other) in seam {
            let merged = map.half_edges.get(&other).copied();
            if merged.is_none() || self.he(own).pair != merged {
                return Err(TopologyError::InvariantViolation(format!(
                    "seam half-edge {:?} did not pair with attached {:?}",
                    own, merged
                )));
            }
        }

        debug!(
            "attach: merged {} faces along {} seam half-edges ({} welded vertices)",
            map.faces.len(),
            seam.len(),
            welded.len()
        );
        self.after_mutation()?;
        Ok(map)
    }

    /// Check the seam contract and derive the vertex welding (sub to own).
    fn check_seam(
        &self,
        submesh: &Mesh,
        seam: &HashMap<HalfEdgeId, HalfEdgeId>,
    ) -> Result<HashMap<VertexId, VertexId>, TopologyError> {
        let tolerance = self.config.seam_tolerance;
        let mut welded: HashMap<VertexId, VertexId> = HashMap::new();
        let mut claimed: HashMap<VertexId, VertexId> = HashMap::new();
        let mut used: HashSet<HalfEdgeId> = HashSet::new();

        let mut entries: Vec<(HalfEdgeId, HalfEdgeId)> = seam.iter().map(|(&a, &b)| (a, b)).collect();
        entries.sort();

        for (own, other) in entries {
            let own_end = self
                .half_edge(own)
                .ok_or(TopologyError::UnknownHalfEdge(own))?
                .end;
            let other_end = submesh
                .half_edge(other)
                .ok_or(TopologyError::UnknownHalfEdge(other))?
                .end;
            if !self.is_unpaired(own) {
                return Err(TopologyError::NotBoundary(own));
            }
            if !submesh.is_unpaired(other) {
                return Err(TopologyError::NotBoundary(other));
            }
            if !used.insert(other) {
                return Err(TopologyError::SeamMismatch(format!(
                    "sub-mesh half-edge {:?} is mapped more than once",
                    other
                )));
            }

            // `other` must run opposite to `own`: its begin sits on own's end
            let own_begin = self.he_begin(own);
            let other_begin = submesh.he_begin(other);
            for (sub_v, own_v) in [(other_begin, own_end), (other_end, own_begin)] {
                let distance = submesh.vert(sub_v).position.distance(self.vert(own_v).position);
                if distance > tolerance || distance.is_nan() {
                    return Err(TopologyError::SeamMismatch(format!(
                        "{:?} of the sub-mesh lies {} away from {:?}",
                        sub_v, distance, own_v
                    )));
                }
                if welded.get(&sub_v).is_some_and(|&prev| prev != own_v)
                    || claimed.get(&own_v).is_some_and(|&prev| prev != sub_v)
                {
                    return Err(TopologyError::SeamMismatch(format!(
                        "{:?} of the sub-mesh and {:?} are welded inconsistently",
                        sub_v, own_v
                    )));
                }
                welded.insert(sub_v, own_v);
                claimed.insert(own_v, sub_v);
            }
        }

        Ok(welded)
    }

    /// Sub-mesh half-edges between two welded vertices must not duplicate a
    /// directed edge of this mesh.
    ///
    /// Welded vertices need no Internal check: each one ends an unpaired seam
    /// half-edge, so its fan is open.
    fn check_welded_edges(
        &self,
        submesh: &Mesh,
        welded: &HashMap<VertexId, VertexId>,
    ) -> Result<(), TopologyError> {
        for he in submesh.half_edges() {
            let begin = welded.get(&submesh.he_begin(he.id));
            let end = welded.get(&he.end);
            if let (Some(&begin), Some(&end)) = (begin, end) {
                if self.edge_map.contains_key(&(begin, end)) {
                    return Err(TopologyError::DuplicateHalfEdge { begin, end });
                }
                trace!("attach: sub-mesh half-edge {:?} lands on {:?} -> {:?}", he.id, begin, end);
            }
        }
        Ok(())
    }
}
