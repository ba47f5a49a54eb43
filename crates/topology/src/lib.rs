//! Tessera topology kernel - half-edge triangle meshes
//!
//! This crate maintains a triangulated, possibly open 2-manifold surface and
//! keeps its adjacency consistent across incremental edits:
//! - [`geometry`] - `Point` and `Vector` value types carried by vertices
//! - [`half_edge`] - The [`Mesh`] kernel: storage, mutation, cloning, attaching
//! - [`traits`] - Read-only capability set for algorithms built on the mesh
//! - [`analysis`] - Edge functions evaluated through the capability set
//!
//! # Example
//!
//! ```
//! use topology::{Mesh, Point, Vector, VertexKind};
//!
//! let mut mesh = Mesh::new();
//! let up = Vector::new(0.0, 0.0, 1.0);
//! let a = mesh.add_vertex(Point::new(0.0, 0.0, 0.0), up);
//! let b = mesh.add_vertex(Point::new(1.0, 0.0, 0.0), up);
//! let c = mesh.add_vertex(Point::new(0.0, 1.0, 0.0), up);
//!
//! let face = mesh.create_face(a, b, c).unwrap();
//! assert!(face.is_some());
//! assert_eq!(mesh.unpaired_count(), 3);
//! assert_eq!(mesh.vertex(a).unwrap().kind, VertexKind::Boundary);
//! ```

pub mod analysis;
pub mod geometry;
pub mod half_edge;
pub mod traits;

pub use geometry::{Point, Vector};
pub use half_edge::{
    AttachMap, CompactionMap, Face, FaceId, HalfEdge, HalfEdgeId, Mesh, TopologyError, Vertex,
    VertexId, VertexKind,
};
pub use tessera_config::KernelConfig;
pub use traits::{EdgeRef, FaceRef, MeshEdge, MeshFace, MeshVertex, VertexRef};
