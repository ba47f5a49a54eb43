//! Type definitions for the half-edge mesh data structure.

use std::path::PathBuf;

use crate::geometry::{Point, Vector};

/// Type-safe vertex identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub u32);

/// Type-safe half-edge identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HalfEdgeId(pub u32);

/// Type-safe face identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceId(pub u32);

/// Where a vertex sits relative to its incident faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexKind {
    /// No incident face
    Isolated,
    /// The fan of incident faces is open
    Boundary,
    /// The fan of incident faces closes into a disk
    Internal,
}

/// A vertex in the half-edge mesh
#[derive(Debug, Clone)]
pub struct Vertex {
    pub id: VertexId,
    pub position: Point,
    pub normal: Vector,
    /// Representative outgoing half-edge, the entry point into the fan
    pub outgoing_half_edge: Option<HalfEdgeId>,
    pub kind: VertexKind,
    /// Number of live half-edges leaving this vertex
    pub(crate) out_degree: u32,
}

impl Vertex {
    /// Number of live half-edges leaving this vertex
    pub fn out_degree(&self) -> u32 {
        self.out_degree
    }
}

/// A half-edge in the mesh
///
/// Only the end vertex is stored. The begin vertex is the end of the
/// previous half-edge in the face cycle.
#[derive(Debug, Clone)]
pub struct HalfEdge {
    pub id: HalfEdgeId,
    /// The vertex this half-edge points to
    pub end: VertexId,
    /// The following half-edge in the face's 3-cycle
    pub next: HalfEdgeId,
    /// The opposite half-edge (None for boundary half-edges)
    pub pair: Option<HalfEdgeId>,
    pub face: FaceId,
}

/// A triangular face
#[derive(Debug, Clone)]
pub struct Face {
    pub id: FaceId,
    /// Half-edge ending at the face's first vertex
    pub main_edge: HalfEdgeId,
}

/// Errors raised by kernel operations
///
/// A failed operation is not rolled back. Unless the error was raised while
/// checking preconditions, the mesh must be treated as abandoned.
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    #[error("Unknown vertex {0:?}")]
    UnknownVertex(VertexId),
    #[error("Unknown half-edge {0:?}")]
    UnknownHalfEdge(HalfEdgeId),
    #[error("Unknown face {0:?}")]
    UnknownFace(FaceId),
    #[error("Creating face through internal vertex {0:?}")]
    InternalVertex(VertexId),
    #[error("Half-edge {begin:?} -> {end:?} already exists")]
    DuplicateHalfEdge { begin: VertexId, end: VertexId },
    #[error("Vertex {0:?} still has incident faces")]
    VertexInUse(VertexId),
    #[error("Half-edge {0:?} is already paired")]
    NotBoundary(HalfEdgeId),
    #[error("Seam mismatch: {0}")]
    SeamMismatch(String),
    #[error("Face {0:?} repeats a vertex")]
    DegenerateFace(FaceId),
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),
    #[error("Failed to write diagnostic dump to {}: {io}", path.display())]
    Dump {
        path: PathBuf,
        io: std::io::Error,
        #[source]
        source: Box<TopologyError>,
    },
}
