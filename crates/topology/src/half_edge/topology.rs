//! Topology query methods for Mesh.

use std::collections::{HashSet, VecDeque};

use super::types::{Face, FaceId, HalfEdge, HalfEdgeId, Vertex, VertexId};
use super::Mesh;

impl Mesh {
    // ========================================================================
    // Accessors
    // ========================================================================

    /// Get vertex by ID
    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id.0 as usize).and_then(Option::as_ref)
    }

    /// Get half-edge by ID
    pub fn half_edge(&self, id: HalfEdgeId) -> Option<&HalfEdge> {
        self.half_edges.get(id.0 as usize).and_then(Option::as_ref)
    }

    /// Get face by ID
    pub fn face(&self, id: FaceId) -> Option<&Face> {
        self.faces.get(id.0 as usize).and_then(Option::as_ref)
    }

    /// Live vertices in insertion order
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> + '_ {
        self.vertices.iter().flatten()
    }

    /// Live half-edges in creation order
    pub fn half_edges(&self) -> impl Iterator<Item = &HalfEdge> + '_ {
        self.half_edges.iter().flatten()
    }

    /// Live faces in creation order
    pub fn faces(&self) -> impl Iterator<Item = &Face> + '_ {
        self.faces.iter().flatten()
    }

    /// Unpaired (boundary) half-edges, ordered by their endpoints
    pub fn unpaired_edges(&self) -> impl Iterator<Item = HalfEdgeId> + '_ {
        self.unpaired.iter().map(|(_, id)| id)
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.live_vertices
    }

    /// Number of live half-edges
    pub fn edge_count(&self) -> usize {
        self.live_half_edges
    }

    /// Number of undirected edges (a pair counts once, a boundary half-edge once)
    pub fn undirected_edge_count(&self) -> usize {
        let unpaired = self.unpaired.len();
        (self.live_half_edges - unpaired) / 2 + unpaired
    }

    /// Number of faces
    pub fn face_count(&self) -> usize {
        self.live_faces
    }

    /// Number of half-edges waiting for a pair
    pub fn unpaired_count(&self) -> usize {
        self.unpaired.len()
    }

    // ========================================================================
    // Half-edge navigation
    // ========================================================================

    /// Begin vertex of a half-edge
    pub fn begin(&self, he_id: HalfEdgeId) -> Option<VertexId> {
        self.half_edge(he_id)?;
        Some(self.he_begin(he_id))
    }

    /// End vertex of a half-edge
    pub fn end(&self, he_id: HalfEdgeId) -> Option<VertexId> {
        self.half_edge(he_id).map(|he| he.end)
    }

    /// Previous half-edge around the face
    pub fn prev(&self, he_id: HalfEdgeId) -> Option<HalfEdgeId> {
        self.half_edge(he_id)?;
        Some(self.he_prev(he_id))
    }

    /// Find a half-edge by its begin and end vertices
    pub fn find_half_edge(&self, begin: VertexId, end: VertexId) -> Option<HalfEdgeId> {
        self.edge_map.get(&(begin, end)).copied()
    }

    /// Check if a half-edge is waiting in the unpaired pool
    pub fn is_unpaired(&self, he_id: HalfEdgeId) -> bool {
        match self.half_edge(he_id) {
            Some(he) => self.unpaired.contains(self.he_begin(he_id), he.end, he_id),
            None => false,
        }
    }

    /// Check if a half-edge is on the boundary (has no pair)
    pub fn is_boundary_edge(&self, he_id: HalfEdgeId) -> bool {
        self.half_edge(he_id)
            .map(|he| he.pair.is_none())
            .unwrap_or(true)
    }

    // ========================================================================
    // Face queries
    // ========================================================================

    /// The three half-edges of a face, starting at its main edge
    pub fn face_half_edges(&self, face_id: FaceId) -> Option<[HalfEdgeId; 3]> {
        let main = self.face(face_id)?.main_edge;
        let second = self.he(main).next;
        let third = self.he(second).next;
        Some([main, second, third])
    }

    /// The three vertices of a face in cyclic order
    ///
    /// Vertex `i` is the end of half-edge `i` of [`Mesh::face_half_edges`].
    pub fn face_vertices(&self, face_id: FaceId) -> Option<[VertexId; 3]> {
        self.face_half_edges(face_id)
            .map(|edges| edges.map(|e| self.he(e).end))
    }

    /// Faces on either side of a half-edge: (own face, pair's face)
    pub fn edge_faces(&self, he_id: HalfEdgeId) -> (Option<FaceId>, Option<FaceId>) {
        let Some(he) = self.half_edge(he_id) else {
            return (None, None);
        };
        (Some(he.face), he.pair.map(|p| self.he(p).face))
    }

    // ========================================================================
    // Vertex neighbourhood
    // ========================================================================

    /// Outgoing half-edges of a vertex in fan order
    ///
    /// Walks backwards from the representative to the start of an open fan
    /// first, so a boundary fan is listed from one border to the other. Any
    /// half-edges in a second fan are appended after a scan.
    pub fn outgoing_half_edges(&self, vertex_id: VertexId) -> Vec<HalfEdgeId> {
        let Some(vertex) = self.vertex(vertex_id) else {
            return Vec::new();
        };
        let Some(rep) = vertex.outgoing_half_edge else {
            return Vec::new();
        };

        let mut first = rep;
        loop {
            match self.he(self.he_prev(first)).pair {
                Some(before) if before != rep => first = before,
                _ => break,
            }
        }

        let mut edges = vec![first];
        let mut current = first;
        while let Some(pair) = self.he(current).pair {
            current = self.he(pair).next;
            if current == first || edges.len() > self.live_half_edges {
                break;
            }
            edges.push(current);
        }

        if edges.len() < vertex.out_degree as usize {
            let seen: HashSet<HalfEdgeId> = edges.iter().copied().collect();
            let rest: Vec<HalfEdgeId> = self
                .outgoing_scan(vertex_id)
                .filter(|he| !seen.contains(he))
                .collect();
            edges.extend(rest);
        }

        edges
    }

    /// Get all faces adjacent to a vertex
    pub fn vertex_faces(&self, vertex_id: VertexId) -> Vec<FaceId> {
        self.outgoing_half_edges(vertex_id)
            .into_iter()
            .map(|he| self.he(he).face)
            .collect()
    }

    /// Get all vertices adjacent to a vertex (connected by an edge)
    pub fn adjacent_vertices(&self, vertex_id: VertexId) -> Vec<VertexId> {
        let mut neighbors = Vec::new();
        for he in self.outgoing_half_edges(vertex_id) {
            let end = self.he(he).end;
            if !neighbors.contains(&end) {
                neighbors.push(end);
            }
            // The incoming half-edge of a face at the fan's border has no
            // outgoing counterpart, so its begin is only reachable this way.
            let incoming = self.he_prev(he);
            if self.he(incoming).pair.is_none() {
                let begin = self.he_begin(incoming);
                if !neighbors.contains(&begin) {
                    neighbors.push(begin);
                }
            }
        }
        neighbors
    }

    /// Vertices at most `radius` edges away, the vertex itself first
    pub fn vertices_within(&self, vertex_id: VertexId, radius: usize) -> Vec<VertexId> {
        if self.vertex(vertex_id).is_none() {
            return Vec::new();
        }

        let mut found = vec![vertex_id];
        let mut seen: HashSet<VertexId> = HashSet::from([vertex_id]);
        let mut queue = VecDeque::from([(vertex_id, 0)]);

        while let Some((current, depth)) = queue.pop_front() {
            if depth == radius {
                continue;
            }
            for neighbor in self.adjacent_vertices(current) {
                if seen.insert(neighbor) {
                    found.push(neighbor);
                    queue.push_back((neighbor, depth + 1));
                }
            }
        }

        found
    }

    /// Half-edges whose endpoints both lie within `radius` edges of a vertex
    pub fn edges_within(&self, vertex_id: VertexId, radius: usize) -> Vec<HalfEdgeId> {
        let region: HashSet<VertexId> = self
            .vertices_within(vertex_id, radius)
            .into_iter()
            .collect();
        let mut edges: Vec<HalfEdgeId> = self
            .edge_map
            .iter()
            .filter(|((begin, end), _)| region.contains(begin) && region.contains(end))
            .map(|(_, &he)| he)
            .collect();
        edges.sort();
        edges
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::super::VertexKind;

    #[test]
    fn test_counts_on_tetrahedron() {
        let (mesh, _, _) = tetrahedron();

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.face_count(), 4);
        assert_eq!(mesh.edge_count(), 12);
        assert_eq!(mesh.undirected_edge_count(), 6);
        assert_eq!(mesh.unpaired_count(), 0);
    }

    #[test]
    fn test_boundary_fan_listed_border_to_border() {
        let (mut mesh, center, ring, faces) = closed_fan(6);
        mesh.delete_face(faces[3]).unwrap();

        let outgoing = mesh.outgoing_half_edges(center);
        assert_eq!(outgoing.len(), 5);
        // The first outgoing half-edge has no incoming neighbour before it
        let before = mesh.prev(outgoing[0]).unwrap();
        assert!(mesh.is_boundary_edge(before));
        assert!(mesh.is_boundary_edge(*outgoing.last().unwrap()));

        let neighbors = mesh.adjacent_vertices(center);
        assert_eq!(neighbors.len(), ring.len());
        assert_eq!(mesh.vertex_faces(center).len(), 5);
    }

    #[test]
    fn test_interior_neighbors() {
        let (mesh, center, ring, _) = closed_fan(5);

        let mut neighbors = mesh.adjacent_vertices(center);
        neighbors.sort();
        assert_eq!(neighbors, ring);
        assert_eq!(mesh.vertex(center).unwrap().kind, VertexKind::Internal);
    }

    #[test]
    fn test_rings_grow_with_radius() {
        let (mesh, center, ring, _) = closed_fan(5);

        assert_eq!(mesh.vertices_within(center, 0), vec![center]);
        assert_eq!(mesh.vertices_within(center, 1).len(), 1 + ring.len());
        assert_eq!(mesh.edges_within(center, 0).len(), 0);
        // 5 spokes in both directions plus 5 rim half-edges
        assert_eq!(mesh.edges_within(center, 1).len(), 15);
    }

    #[test]
    fn test_edge_faces() {
        let (mesh, v) = strip();

        let diagonal = mesh.find_half_edge(v[0], v[2]).unwrap();
        let (own, other) = mesh.edge_faces(diagonal);
        assert!(own.is_some() && other.is_some());
        assert_ne!(own, other);

        let rim = mesh.find_half_edge(v[0], v[1]).unwrap();
        assert_eq!(mesh.edge_faces(rim).1, None);
    }
}
