//! Validation methods for Mesh.
//!
//! Checks every structural invariant the kernel maintains:
//! - Face cycles close after three steps and agree on their face
//! - Pair links are symmetric and run in opposite directions
//! - The unpaired pool and the edge map mirror the half-edge collection
//! - Vertex kinds and out-degrees match the actual fans

use std::collections::HashMap;

use super::construction::FanWalk;
use super::types::{TopologyError, VertexId, VertexKind};
use super::Mesh;

fn violation(message: String) -> TopologyError {
    TopologyError::InvariantViolation(message)
}

impl Mesh {
    /// Validate the mesh topology.
    ///
    /// Returns the first invariant breach found.
    pub fn validate(&self) -> Result<(), TopologyError> {
        self.validate_faces()?;
        self.validate_half_edges()?;
        self.validate_vertices()?;

        let counted = (
            self.vertices().count(),
            self.half_edges().count(),
            self.faces().count(),
        );
        if counted != (self.live_vertices, self.live_half_edges, self.live_faces) {
            return Err(violation(format!(
                "live counts {:?} disagree with collections {:?}",
                (self.live_vertices, self.live_half_edges, self.live_faces),
                counted
            )));
        }
        Ok(())
    }

    fn validate_faces(&self) -> Result<(), TopologyError> {
        for face in self.faces() {
            let mut current = face.main_edge;
            for _ in 0..3 {
                let he = self.half_edge(current).ok_or_else(|| {
                    violation(format!("Face {:?}: missing half-edge {:?}", face.id, current))
                })?;
                if he.face != face.id {
                    return Err(violation(format!(
                        "Face {:?}: half-edge {:?} belongs to {:?}",
                        face.id, current, he.face
                    )));
                }
                current = he.next;
            }
            if current != face.main_edge {
                return Err(violation(format!(
                    "Face {:?}: cycle does not close after three half-edges",
                    face.id
                )));
            }
        }
        Ok(())
    }

    fn validate_half_edges(&self) -> Result<(), TopologyError> {
        // Membership first: afterwards every live half-edge sits in a closed
        // three-cycle and begin lookups are safe.
        for he in self.half_edges() {
            let in_cycle = self
                .face_half_edges(he.face)
                .is_some_and(|cycle| cycle.contains(&he.id));
            if !in_cycle {
                return Err(violation(format!(
                    "Half-edge {:?}: not part of the cycle of face {:?}",
                    he.id, he.face
                )));
            }
            if self.vertex(he.end).is_none() {
                return Err(violation(format!(
                    "Half-edge {:?}: end vertex {:?} doesn't exist",
                    he.id, he.end
                )));
            }
        }

        for he in self.half_edges() {
            let begin = self.he_begin(he.id);
            if self.edge_map.get(&(begin, he.end)) != Some(&he.id) {
                return Err(violation(format!(
                    "Half-edge {:?}: edge map entry for {:?} -> {:?} is wrong",
                    he.id, begin, he.end
                )));
            }

            let pooled = self.unpaired.contains(begin, he.end, he.id);
            match he.pair {
                Some(pair_id) => {
                    let pair = self.half_edge(pair_id).ok_or_else(|| {
                        violation(format!("Half-edge {:?}: pair {:?} doesn't exist", he.id, pair_id))
                    })?;
                    if pair.pair != Some(he.id) {
                        return Err(violation(format!(
                            "Half-edge {:?}: pair.pair = {:?}, expected Some({:?})",
                            he.id, pair.pair, he.id
                        )));
                    }
                    if pair.end != begin || self.he_begin(pair_id) != he.end {
                        return Err(violation(format!(
                            "Half-edge {:?}: pair {:?} does not run in the opposite direction",
                            he.id, pair_id
                        )));
                    }
                    if pooled {
                        return Err(violation(format!(
                            "Half-edge {:?}: paired but still in the unpaired pool",
                            he.id
                        )));
                    }
                }
                None if !pooled => {
                    return Err(violation(format!(
                        "Half-edge {:?}: unpaired but missing from the unpaired pool",
                        he.id
                    )));
                }
                None => {}
            }
        }

        for ((begin, end), id) in self.unpaired.iter() {
            let live = self
                .half_edge(id)
                .is_some_and(|he| he.pair.is_none() && he.end == end && self.he_begin(id) == begin);
            if !live {
                return Err(violation(format!(
                    "Unpaired pool entry {:?} -> {:?} holds stale half-edge {:?}",
                    begin, end, id
                )));
            }
        }
        if self.edge_map.len() != self.live_half_edges {
            return Err(violation(format!(
                "Edge map has {} entries for {} half-edges",
                self.edge_map.len(),
                self.live_half_edges
            )));
        }
        Ok(())
    }

    fn validate_vertices(&self) -> Result<(), TopologyError> {
        let mut degrees: HashMap<VertexId, u32> = HashMap::new();
        for he in self.half_edges() {
            *degrees.entry(self.he_begin(he.id)).or_default() += 1;
        }

        for v in self.vertices() {
            let degree = degrees.get(&v.id).copied().unwrap_or(0);
            if degree != v.out_degree {
                return Err(violation(format!(
                    "Vertex {:?}: out-degree {} but {} outgoing half-edges",
                    v.id, v.out_degree, degree
                )));
            }

            let expected = match v.outgoing_half_edge {
                None => {
                    if degree > 0 {
                        return Err(violation(format!(
                            "Vertex {:?}: no representative but {} outgoing half-edges",
                            v.id, degree
                        )));
                    }
                    VertexKind::Isolated
                }
                Some(rep) => {
                    if self.half_edge(rep).is_none() || self.he_begin(rep) != v.id {
                        return Err(violation(format!(
                            "Vertex {:?}: representative {:?} does not leave the vertex",
                            v.id, rep
                        )));
                    }
                    match self.walk_fan(rep) {
                        FanWalk::Open => VertexKind::Boundary,
                        FanWalk::Closed(count) if count == degree => VertexKind::Internal,
                        FanWalk::Closed(count) => {
                            return Err(violation(format!(
                                "Vertex {:?}: closed fan of {} beside {} other half-edges (non-manifold vertex)",
                                v.id,
                                count,
                                degree - count
                            )));
                        }
                    }
                }
            };

            if v.kind != expected {
                return Err(violation(format!(
                    "Vertex {:?}: classified {:?}, fan says {:?}",
                    v.id, v.kind, expected
                )));
            }
        }
        Ok(())
    }
}
