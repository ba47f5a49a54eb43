//! Read-only capability set over mesh elements.
//!
//! Algorithms that only navigate the surface (analysis, simplification
//! decisions) are written against [`MeshVertex`], [`MeshEdge`] and
//! [`MeshFace`] instead of the half-edge records. The borrowed views
//! [`VertexRef`], [`EdgeRef`] and [`FaceRef`] implement them for [`Mesh`].
//!
//! A view holds a shared borrow of its mesh, so the element it names cannot
//! be deleted while the view is alive. None of the traits expose mutation.

use std::fmt;

use crate::geometry::{Point, Vector};
use crate::half_edge::{FaceId, HalfEdgeId, Mesh, VertexId, VertexKind};

/// A vertex that can be navigated to its incident edges.
pub trait MeshVertex: Copy {
    type Edge: MeshEdge;

    fn id(&self) -> VertexId;

    /// Position of the vertex
    fn point(&self) -> Point;

    fn normal(&self) -> Vector;

    fn kind(&self) -> VertexKind;

    /// The outgoing edge used as the entry point into the fan
    fn representative(&self) -> Option<Self::Edge>;

    /// Outgoing edges in fan order.
    ///
    /// For a boundary vertex the list runs from one border of the fan to the
    /// other, whatever the representative is.
    fn edges(&self) -> Vec<Self::Edge>;
}

/// A directed edge with its neighbours.
pub trait MeshEdge: Copy {
    type Vertex: MeshVertex;
    type Face: MeshFace;

    fn id(&self) -> HalfEdgeId;

    fn begin(&self) -> Self::Vertex;

    fn end(&self) -> Self::Vertex;

    /// The following edge around the face
    fn next(&self) -> Self;

    /// The preceding edge around the face
    fn prev(&self) -> Self;

    /// The same undirected edge traversed the other way, if any
    fn pair(&self) -> Option<Self>;

    fn face(&self) -> Option<Self::Face>;

    /// Whether the edge lies on the border of the surface
    fn is_boundary(&self) -> bool {
        self.pair().is_none()
    }
}

/// A triangle.
pub trait MeshFace: Copy {
    type Vertex: MeshVertex;
    type Edge: MeshEdge;

    fn id(&self) -> FaceId;

    /// Corners in cyclic order. Vertex `i` is the end of edge `i`.
    fn vertices(&self) -> [Self::Vertex; 3];

    /// Edges in cyclic order, starting at the main edge
    fn edges(&self) -> [Self::Edge; 3];
}

// ============================================================================
// Borrowed views
// ============================================================================

macro_rules! element_view {
    ($(#[$doc:meta])* $name:ident, $id:ty) => {
        $(#[$doc])*
        #[derive(Clone, Copy)]
        pub struct $name<'a> {
            mesh: &'a Mesh,
            id: $id,
        }

        impl PartialEq for $name<'_> {
            fn eq(&self, other: &Self) -> bool {
                std::ptr::eq(self.mesh, other.mesh) && self.id == other.id
            }
        }

        impl Eq for $name<'_> {}

        impl fmt::Debug for $name<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.id).finish()
            }
        }
    };
}

element_view!(
    /// View of a live vertex
    VertexRef,
    VertexId
);
element_view!(
    /// View of a live half-edge
    EdgeRef,
    HalfEdgeId
);
element_view!(
    /// View of a live face
    FaceRef,
    FaceId
);

impl Mesh {
    /// View of a vertex, or `None` if the id is not live
    pub fn vertex_ref(&self, id: VertexId) -> Option<VertexRef<'_>> {
        self.vertex(id).map(|_| VertexRef { mesh: self, id })
    }

    /// View of a half-edge, or `None` if the id is not live
    pub fn edge_ref(&self, id: HalfEdgeId) -> Option<EdgeRef<'_>> {
        self.half_edge(id).map(|_| EdgeRef { mesh: self, id })
    }

    /// View of a face, or `None` if the id is not live
    pub fn face_ref(&self, id: FaceId) -> Option<FaceRef<'_>> {
        self.face(id).map(|_| FaceRef { mesh: self, id })
    }
}

impl<'a> VertexRef<'a> {
    fn edge(&self, id: HalfEdgeId) -> EdgeRef<'a> {
        EdgeRef { mesh: self.mesh, id }
    }
}

impl<'a> MeshVertex for VertexRef<'a> {
    type Edge = EdgeRef<'a>;

    fn id(&self) -> VertexId {
        self.id
    }

    fn point(&self) -> Point {
        self.mesh.vert(self.id).position
    }

    fn normal(&self) -> Vector {
        self.mesh.vert(self.id).normal
    }

    fn kind(&self) -> VertexKind {
        self.mesh.vert(self.id).kind
    }

    fn representative(&self) -> Option<EdgeRef<'a>> {
        self.mesh
            .vert(self.id)
            .outgoing_half_edge
            .map(|he| self.edge(he))
    }

    fn edges(&self) -> Vec<EdgeRef<'a>> {
        self.mesh
            .outgoing_half_edges(self.id)
            .into_iter()
            .map(|he| self.edge(he))
            .collect()
    }
}

impl<'a> EdgeRef<'a> {
    fn with_id(&self, id: HalfEdgeId) -> Self {
        Self { mesh: self.mesh, id }
    }

    fn vertex(&self, id: VertexId) -> VertexRef<'a> {
        VertexRef { mesh: self.mesh, id }
    }
}

impl<'a> MeshEdge for EdgeRef<'a> {
    type Vertex = VertexRef<'a>;
    type Face = FaceRef<'a>;

    fn id(&self) -> HalfEdgeId {
        self.id
    }

    fn begin(&self) -> VertexRef<'a> {
        self.vertex(self.mesh.he_begin(self.id))
    }

    fn end(&self) -> VertexRef<'a> {
        self.vertex(self.mesh.he(self.id).end)
    }

    fn next(&self) -> Self {
        self.with_id(self.mesh.he(self.id).next)
    }

    fn prev(&self) -> Self {
        self.with_id(self.mesh.he_prev(self.id))
    }

    fn pair(&self) -> Option<Self> {
        self.mesh.he(self.id).pair.map(|p| self.with_id(p))
    }

    fn face(&self) -> Option<FaceRef<'a>> {
        Some(FaceRef {
            mesh: self.mesh,
            id: self.mesh.he(self.id).face,
        })
    }
}

impl<'a> MeshFace for FaceRef<'a> {
    type Vertex = VertexRef<'a>;
    type Edge = EdgeRef<'a>;

    fn id(&self) -> FaceId {
        self.id
    }

    fn vertices(&self) -> [VertexRef<'a>; 3] {
        self.edges().map(|e| e.end())
    }

    fn edges(&self) -> [EdgeRef<'a>; 3] {
        let main = EdgeRef {
            mesh: self.mesh,
            id: self.mesh.fc(self.id).main_edge,
        };
        let second = main.next();
        [main, second, second.next()]
    }
}
