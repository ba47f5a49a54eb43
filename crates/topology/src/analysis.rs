//! Scalar functions over mesh edges.
//!
//! Evaluated through the capability set, so they work on any edge view.

use crate::traits::{MeshEdge, MeshVertex};

/// A scalar quantity attached to an edge (length, cost, ...)
pub trait EdgeFunction {
    fn evaluate<E: MeshEdge>(&self, edge: E) -> f64;
}

/// Euclidean length of an edge
#[derive(Debug, Clone, Copy, Default)]
pub struct Length;

impl EdgeFunction for Length {
    fn evaluate<E: MeshEdge>(&self, edge: E) -> f64 {
        edge_length(edge)
    }
}

/// Distance between the begin and end points of an edge
pub fn edge_length<E: MeshEdge>(edge: E) -> f64 {
    (edge.end().point() - edge.begin().point()).norm()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::half_edge::fixtures::*;

    #[test]
    fn test_edge_length() {
        let (mesh, v) = strip();
        let diagonal = mesh.edge_ref(mesh.find_half_edge(v[0], v[2]).unwrap()).unwrap();
        let rim = mesh.edge_ref(mesh.find_half_edge(v[0], v[1]).unwrap()).unwrap();

        assert!((edge_length(diagonal) - 2f64.sqrt()).abs() < 1e-12);
        assert!((edge_length(rim) - 1.0).abs() < 1e-12);
        assert_eq!(edge_length(diagonal), edge_length(diagonal.pair().unwrap()));
    }

    #[test]
    fn test_length_function_matches_edge_length() {
        let (mesh, _, _) = tetrahedron();

        for he in mesh.half_edges() {
            let edge = mesh.edge_ref(he.id).unwrap();
            assert_eq!(Length.evaluate(edge), edge_length(edge));
        }
    }
}
