//! Small meshes shared by the unit tests.

use tessera_config::KernelConfig;

use super::{FaceId, Mesh, VertexId};
use crate::geometry::{Point, Vector};

const UP: Vector = Vector::new(0.0, 0.0, 1.0);

/// Empty mesh that validates every mutation and never writes dumps
pub(crate) fn strict_mesh() -> Mesh {
    Mesh::with_config(KernelConfig::strict().with_clone_dump_path(None))
}

pub(crate) fn add(mesh: &mut Mesh, x: f64, y: f64, z: f64) -> VertexId {
    mesh.add_vertex(Point::new(x, y, z), UP)
}

pub(crate) fn face(mesh: &mut Mesh, a: VertexId, b: VertexId, c: VertexId) -> FaceId {
    mesh.create_face(a, b, c).unwrap().unwrap()
}

/// One triangle (v0, v1, v2)
pub(crate) fn triangle() -> (Mesh, [VertexId; 3]) {
    let mut mesh = strict_mesh();
    let v0 = add(&mut mesh, 0.0, 0.0, 0.0);
    let v1 = add(&mut mesh, 1.0, 0.0, 0.0);
    let v2 = add(&mut mesh, 0.5, 1.0, 0.0);
    face(&mut mesh, v0, v1, v2);
    (mesh, [v0, v1, v2])
}

/// Two triangles (v0, v1, v2) and (v0, v2, v3) sharing the edge v0-v2
pub(crate) fn strip() -> (Mesh, [VertexId; 4]) {
    let mut mesh = strict_mesh();
    let v0 = add(&mut mesh, 0.0, 0.0, 0.0);
    let v1 = add(&mut mesh, 1.0, 0.0, 0.0);
    let v2 = add(&mut mesh, 1.0, 1.0, 0.0);
    let v3 = add(&mut mesh, 0.0, 1.0, 0.0);
    face(&mut mesh, v0, v1, v2);
    face(&mut mesh, v0, v2, v3);
    (mesh, [v0, v1, v2, v3])
}

/// Closed tetrahedron, every vertex internal
pub(crate) fn tetrahedron() -> (Mesh, [VertexId; 4], [FaceId; 4]) {
    let mut mesh = strict_mesh();
    let v0 = add(&mut mesh, 0.0, 0.0, 0.0);
    let v1 = add(&mut mesh, 1.0, 0.0, 0.0);
    let v2 = add(&mut mesh, 0.0, 1.0, 0.0);
    let v3 = add(&mut mesh, 0.0, 0.0, 1.0);
    let f0 = face(&mut mesh, v1, v0, v3);
    let f1 = face(&mut mesh, v2, v1, v3);
    let f2 = face(&mut mesh, v0, v2, v3);
    let f3 = face(&mut mesh, v0, v1, v2);
    (mesh, [v0, v1, v2, v3], [f0, f1, f2, f3])
}

/// Center vertex surrounded by a closed fan of `n` triangles
pub(crate) fn closed_fan(n: usize) -> (Mesh, VertexId, Vec<VertexId>, Vec<FaceId>) {
    let mut mesh = strict_mesh();
    let center = add(&mut mesh, 0.0, 0.0, 0.0);
    let ring: Vec<VertexId> = (0..n)
        .map(|i| {
            let angle = i as f64 / n as f64 * std::f64::consts::TAU;
            add(&mut mesh, angle.cos(), angle.sin(), 0.0)
        })
        .collect();
    let faces = mesh.create_closed_fan(center, &ring).unwrap();
    (mesh, center, ring, faces)
}
