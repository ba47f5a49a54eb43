//! Half-edge mesh data structure for incremental topology editing
//!
//! The mesh owns every vertex, half-edge and face it creates, addressed by
//! stable integer ids. Deleted elements leave an empty slot behind until
//! [`Mesh::compact`] is called. The mesh is the only component that changes
//! adjacency; everything else reads it through the accessors here or the
//! capability traits in [`crate::traits`].
//!
//! Operations are single-threaded and not transactional: a mutation that
//! fails after its precondition checks leaves the mesh unusable (commit or
//! abandon, never resume).

mod attach;
mod clone;
mod compact;
mod construction;
#[cfg(test)]
pub(crate) mod fixtures;
mod pool;
mod topology;
mod types;
mod validation;

use std::collections::HashMap;

use tessera_config::KernelConfig;

pub use attach::AttachMap;
pub use compact::CompactionMap;
pub use types::{Face, FaceId, HalfEdge, HalfEdgeId, TopologyError, Vertex, VertexId, VertexKind};

use pool::UnpairedPool;

/// Half-edge mesh of triangles
#[derive(Debug, Default)]
pub struct Mesh {
    pub(crate) vertices: Vec<Option<Vertex>>,
    pub(crate) half_edges: Vec<Option<HalfEdge>>,
    pub(crate) faces: Vec<Option<Face>>,
    /// Map from (begin, end) vertex pair to every live half-edge
    pub(crate) edge_map: HashMap<(VertexId, VertexId), HalfEdgeId>,
    pub(crate) unpaired: UnpairedPool,
    pub(crate) live_vertices: usize,
    pub(crate) live_half_edges: usize,
    pub(crate) live_faces: usize,
    pub(crate) config: KernelConfig,
}

impl Mesh {
    /// Create an empty mesh with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty mesh with an explicit configuration
    pub fn with_config(config: KernelConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    // Slot access for ids the mesh itself handed out and still links to.
    // A miss means adjacency was corrupted, which is a kernel bug.

    pub(crate) fn vert(&self, id: VertexId) -> &Vertex {
        match self.vertices.get(id.0 as usize) {
            Some(Some(v)) => v,
            _ => panic!("dangling vertex reference {id:?}"),
        }
    }

    pub(crate) fn vert_mut(&mut self, id: VertexId) -> &mut Vertex {
        match self.vertices.get_mut(id.0 as usize) {
            Some(Some(v)) => v,
            _ => panic!("dangling vertex reference {id:?}"),
        }
    }

    pub(crate) fn he(&self, id: HalfEdgeId) -> &HalfEdge {
        match self.half_edges.get(id.0 as usize) {
            Some(Some(he)) => he,
            _ => panic!("dangling half-edge reference {id:?}"),
        }
    }

    pub(crate) fn he_mut(&mut self, id: HalfEdgeId) -> &mut HalfEdge {
        match self.half_edges.get_mut(id.0 as usize) {
            Some(Some(he)) => he,
            _ => panic!("dangling half-edge reference {id:?}"),
        }
    }

    pub(crate) fn fc(&self, id: FaceId) -> &Face {
        match self.faces.get(id.0 as usize) {
            Some(Some(f)) => f,
            _ => panic!("dangling face reference {id:?}"),
        }
    }

    /// Begin vertex of a live half-edge (end of its predecessor)
    pub(crate) fn he_begin(&self, id: HalfEdgeId) -> VertexId {
        self.he(self.he_prev(id)).end
    }

    /// Predecessor in the face cycle (faces are triangles)
    pub(crate) fn he_prev(&self, id: HalfEdgeId) -> HalfEdgeId {
        self.he(self.he(id).next).next
    }

    /// Run the full validator when the configuration asks for it
    pub(crate) fn after_mutation(&self) -> Result<(), TopologyError> {
        if self.config.validate_mutations {
            self.validate()
        } else {
            Ok(())
        }
    }
}
