//! Mutation primitives: vertex and face insertion and deletion.

use tracing::{trace, warn};

use super::types::{Face, FaceId, HalfEdge, HalfEdgeId, TopologyError, Vertex, VertexId, VertexKind};
use super::Mesh;
use crate::geometry::{Point, Vector};

/// Outcome of walking a vertex fan with alternating pair/next steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FanWalk {
    /// Hit a half-edge without a pair
    Open,
    /// Came back to the start after visiting this many outgoing half-edges
    Closed(u32),
}

impl Mesh {
    /// Add a new isolated vertex.
    pub fn add_vertex(&mut self, position: Point, normal: Vector) -> VertexId {
        let id = VertexId(self.vertices.len() as u32);
        self.vertices.push(Some(Vertex {
            id,
            position,
            normal,
            outgoing_half_edge: None,
            kind: VertexKind::Isolated,
            out_degree: 0,
        }));
        self.live_vertices += 1;
        id
    }

    /// Remove an isolated vertex.
    ///
    /// Vertices that still have incident faces are rejected: half-edges would
    /// otherwise keep pointing at a removed vertex.
    pub fn remove_vertex(&mut self, vertex_id: VertexId) -> Result<(), TopologyError> {
        let vertex = self
            .vertex(vertex_id)
            .ok_or(TopologyError::UnknownVertex(vertex_id))?;
        if vertex.kind != VertexKind::Isolated || vertex.out_degree > 0 {
            return Err(TopologyError::VertexInUse(vertex_id));
        }

        self.vertices[vertex_id.0 as usize] = None;
        self.live_vertices -= 1;
        self.after_mutation()
    }

    /// Create the triangle `v1 -> v2 -> v3`.
    ///
    /// Returns `Ok(None)` without touching the mesh when two of the vertices
    /// are the same. New half-edges are paired with pooled half-edges running
    /// the opposite way, and the rest join the pool.
    ///
    /// # Errors
    /// - [`TopologyError::InternalVertex`] if any vertex already has a closed fan
    /// - [`TopologyError::DuplicateHalfEdge`] if a directed edge of the new face
    ///   already exists (a third face on an edge, or flipped orientation)
    pub fn create_face(
        &mut self,
        v1: VertexId,
        v2: VertexId,
        v3: VertexId,
    ) -> Result<Option<FaceId>, TopologyError> {
        if v1 == v2 || v2 == v3 || v1 == v3 {
            trace!("create_face: degenerate request ({:?}, {:?}, {:?})", v1, v2, v3);
            return Ok(None);
        }

        let verts = [v1, v2, v3];
        for &v in &verts {
            let vertex = self.vertex(v).ok_or(TopologyError::UnknownVertex(v))?;
            if vertex.kind == VertexKind::Internal {
                return Err(TopologyError::InternalVertex(v));
            }
        }
        let face_id = self.link_face(verts)?;

        for &v in &verts {
            if self.vert(v).kind == VertexKind::Boundary {
                self.refresh_vertex_kind(v);
            }
        }

        trace!("create_face: {:?} = ({:?}, {:?}, {:?})", face_id, v1, v2, v3);
        self.after_mutation()?;
        Ok(Some(face_id))
    }

    /// Allocate the half-edges of a face over three distinct live vertices
    /// and pair them through the pool.
    ///
    /// Only the duplicate directed edge check runs here. Vertex kinds are left
    /// alone apart from Isolated becoming Boundary, so callers must refresh
    /// the classification of the three vertices afterwards.
    pub(crate) fn link_face(&mut self, verts: [VertexId; 3]) -> Result<FaceId, TopologyError> {
        for i in 0..3 {
            let (begin, end) = (verts[i], verts[(i + 1) % 3]);
            if self.edge_map.contains_key(&(begin, end)) {
                return Err(TopologyError::DuplicateHalfEdge { begin, end });
            }
        }

        let face_id = FaceId(self.faces.len() as u32);
        let base = self.half_edges.len() as u32;
        let ids = [HalfEdgeId(base), HalfEdgeId(base + 1), HalfEdgeId(base + 2)];

        for i in 0..3 {
            self.half_edges.push(Some(HalfEdge {
                id: ids[i],
                end: verts[(i + 1) % 3],
                next: ids[(i + 1) % 3],
                pair: None,
                face: face_id,
            }));
        }
        // The main edge ends at v1, so walking from it yields v1, v2, v3.
        self.faces.push(Some(Face {
            id: face_id,
            main_edge: ids[2],
        }));
        self.live_half_edges += 3;
        self.live_faces += 1;

        for i in 0..3 {
            let (begin, end) = (verts[i], verts[(i + 1) % 3]);
            let he_id = ids[i];

            let vertex = self.vert_mut(begin);
            vertex.out_degree += 1;
            if vertex.kind == VertexKind::Isolated {
                vertex.kind = VertexKind::Boundary;
                vertex.outgoing_half_edge = Some(he_id);
            }

            self.edge_map.insert((begin, end), he_id);
            match self.unpaired.take_reverse(begin, end) {
                Some(other) => {
                    self.he_mut(he_id).pair = Some(other);
                    self.he_mut(other).pair = Some(he_id);
                    trace!("link_face: paired {:?} with {:?} ({:?} <-> {:?})", he_id, other, begin, end);
                }
                None => self.unpaired.insert(begin, end, he_id),
            }
        }
        Ok(face_id)
    }

    /// Delete a face together with its three half-edges.
    ///
    /// Opposite half-edges lose their pair and return to the unpaired pool.
    /// Every vertex of the face ends up Boundary, or Isolated when this was
    /// its last face.
    pub fn delete_face(&mut self, face_id: FaceId) -> Result<(), TopologyError> {
        let edges = self
            .face_half_edges(face_id)
            .ok_or(TopologyError::UnknownFace(face_id))?;
        let ends = edges.map(|e| self.he(e).end);

        // Outgoing half-edges that survive the deletion, one per face vertex.
        // Vertex ends[i] leaves through the pair of edges[i] or through the
        // successor of the pair of edges[i + 1].
        let survivors: [Option<HalfEdgeId>; 3] = std::array::from_fn(|i| {
            self.he(edges[i]).pair.or_else(|| {
                self.he(edges[(i + 1) % 3])
                    .pair
                    .map(|p| self.he(p).next)
            })
        });

        for i in 0..3 {
            let edge = self.he(edges[i]).clone();
            let end = edge.end;
            let begin = ends[(i + 2) % 3];

            let vertex = self.vert_mut(end);
            vertex.out_degree -= 1;
            if vertex.outgoing_half_edge == Some(edge.next) {
                vertex.outgoing_half_edge = None;
                vertex.kind = VertexKind::Isolated;
            } else if vertex.kind == VertexKind::Internal {
                vertex.kind = VertexKind::Boundary;
            }

            if let Some(pair) = edge.pair {
                self.he_mut(pair).pair = None;
                self.unpaired.insert(end, begin, pair);
            }
        }

        for i in 0..3 {
            let begin = ends[(i + 2) % 3];
            self.edge_map.remove(&(begin, ends[i]));
            self.unpaired.remove(begin, ends[i], edges[i]);
            self.half_edges[edges[i].0 as usize] = None;
        }
        self.faces[face_id.0 as usize] = None;
        self.live_half_edges -= 3;
        self.live_faces -= 1;

        for i in 0..3 {
            self.rediscover_representative(ends[i], survivors[i]);
        }

        trace!("delete_face: {:?} ({:?})", face_id, ends);
        self.after_mutation()
    }

    /// Create the fan of triangles `(center, ring[i], ring[i + 1])`.
    ///
    /// Degenerate triangles are skipped.
    pub fn create_fan(
        &mut self,
        center: VertexId,
        ring: &[VertexId],
    ) -> Result<Vec<FaceId>, TopologyError> {
        let mut faces = Vec::with_capacity(ring.len().saturating_sub(1));
        for pair in ring.windows(2) {
            if let Some(face) = self.create_face(center, pair[0], pair[1])? {
                faces.push(face);
            }
        }
        Ok(faces)
    }

    /// Create a fan and close it with `(center, ring[last], ring[0])`.
    pub fn create_closed_fan(
        &mut self,
        center: VertexId,
        ring: &[VertexId],
    ) -> Result<Vec<FaceId>, TopologyError> {
        let mut faces = self.create_fan(center, ring)?;
        if let (Some(&first), Some(&last)) = (ring.first(), ring.last()) {
            if let Some(face) = self.create_face(center, last, first)? {
                faces.push(face);
            }
        }
        Ok(faces)
    }

    // ========================================================================
    // Classification
    // ========================================================================

    /// Walk the fan from an outgoing half-edge until it closes or opens.
    pub(crate) fn walk_fan(&self, start: HalfEdgeId) -> FanWalk {
        let mut current = start;
        let mut visited = 1;
        loop {
            let Some(pair) = self.he(current).pair else {
                return FanWalk::Open;
            };
            current = self.he(pair).next;
            if current == start {
                return FanWalk::Closed(visited);
            }
            visited += 1;
            if visited as usize > self.half_edges.len() {
                // Only reachable with corrupted pair links
                return FanWalk::Open;
            }
        }
    }

    /// Recompute a vertex's kind from its representative half-edge.
    ///
    /// A closed walk only makes the vertex Internal when it accounts for all
    /// outgoing half-edges. Otherwise a second fan hangs off the vertex and
    /// the representative is moved into an open fan.
    pub(crate) fn refresh_vertex_kind(&mut self, vertex_id: VertexId) {
        let vertex = self.vert(vertex_id);
        let out_degree = vertex.out_degree;
        let Some(start) = vertex.outgoing_half_edge else {
            self.vert_mut(vertex_id).kind = VertexKind::Isolated;
            return;
        };

        let kind = match self.walk_fan(start) {
            FanWalk::Open => VertexKind::Boundary,
            FanWalk::Closed(count) if count == out_degree => VertexKind::Internal,
            FanWalk::Closed(count) => {
                let open = self
                    .outgoing_scan(vertex_id)
                    .find(|&he| self.walk_fan(he) == FanWalk::Open);
                trace!(
                    "refresh_vertex_kind: {:?} closes {} of {} outgoing half-edges, moving representative to {:?}",
                    vertex_id, count, out_degree, open
                );
                if let Some(open) = open {
                    self.vert_mut(vertex_id).outgoing_half_edge = Some(open);
                }
                VertexKind::Boundary
            }
        };

        let vertex = self.vert_mut(vertex_id);
        if vertex.kind != kind {
            trace!("refresh_vertex_kind: {:?} {:?} -> {:?}", vertex_id, vertex.kind, kind);
            vertex.kind = kind;
        }
    }

    /// Pick a new representative for a face vertex after a deletion.
    fn rediscover_representative(&mut self, vertex_id: VertexId, survivor: Option<HalfEdgeId>) {
        if self.vert(vertex_id).out_degree == 0 {
            let vertex = self.vert_mut(vertex_id);
            vertex.outgoing_half_edge = None;
            vertex.kind = VertexKind::Isolated;
            return;
        }

        if self.vert(vertex_id).outgoing_half_edge.is_none() {
            let found = survivor.or_else(|| {
                warn!(
                    "delete_face: {:?} has no neighbouring half-edge, scanning all {} half-edges",
                    vertex_id, self.live_half_edges
                );
                self.outgoing_scan(vertex_id).next()
            });
            self.vert_mut(vertex_id).outgoing_half_edge = found;
        }

        self.vert_mut(vertex_id).kind = VertexKind::Boundary;
        self.refresh_vertex_kind(vertex_id);
    }

    /// Every live half-edge leaving a vertex, found by scanning the edge map.
    pub(crate) fn outgoing_scan(&self, vertex_id: VertexId) -> impl Iterator<Item = HalfEdgeId> + '_ {
        let mut found: Vec<HalfEdgeId> = self
            .edge_map
            .iter()
            .filter(|((begin, _), _)| *begin == vertex_id)
            .map(|(_, &he)| he)
            .collect();
        found.sort();
        found.into_iter()
    }
}
