//! Whole-mesh and sub-mesh copies with explicit id correspondence.

use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use tracing::{debug, error};

use super::types::{FaceId, HalfEdgeId, TopologyError, VertexId};
use super::Mesh;

impl Mesh {
    /// Deep-copy the whole mesh, isolated vertices included.
    ///
    /// Vertices keep their relative order. When `edge_map` is given it is
    /// cleared and filled with the old to new half-edge correspondence.
    pub fn clone_mesh(
        &self,
        edge_map: Option<&mut HashMap<HalfEdgeId, HalfEdgeId>>,
    ) -> Result<Mesh, TopologyError> {
        let mut result = Mesh::with_config(self.config.clone());

        let mut vert_map: HashMap<VertexId, VertexId> = HashMap::with_capacity(self.live_vertices);
        for v in self.vertices() {
            vert_map.insert(v.id, result.add_vertex(v.position, v.normal));
        }

        let mut local_edges = HashMap::new();
        let edge_map = reuse_or(edge_map, &mut local_edges);
        let mut face_map = HashMap::with_capacity(self.live_faces);
        let faces: Vec<FaceId> = self.faces().map(|f| f.id).collect();

        let copied = self
            .copy_faces_into(&mut result, &faces, &mut vert_map, edge_map, &mut face_map)
            .and_then(|()| result.after_mutation());
        match copied {
            Ok(()) => {
                debug!(
                    "clone_mesh: copied {} vertices, {} faces",
                    result.vertex_count(),
                    result.face_count()
                );
                Ok(result)
            }
            Err(err) => Err(self.dump_faces("clone_mesh", &faces, err)),
        }
    }

    /// Copy the sub-mesh induced by `faces`.
    ///
    /// Supplied maps are cleared and filled with old to new correspondences.
    /// Each vertex is copied the first time one of its faces is visited.
    ///
    /// On failure the input faces are written to the configured diagnostic
    /// dump before the error is returned; the partial copy is discarded.
    pub fn clone_sub(
        &self,
        faces: &[FaceId],
        vert_map: Option<&mut HashMap<VertexId, VertexId>>,
        edge_map: Option<&mut HashMap<HalfEdgeId, HalfEdgeId>>,
        face_map: Option<&mut HashMap<FaceId, FaceId>>,
    ) -> Result<Mesh, TopologyError> {
        let mut local_verts = HashMap::new();
        let mut local_edges = HashMap::new();
        let mut local_faces = HashMap::new();

        let vert_map = reuse_or(vert_map, &mut local_verts);
        let edge_map = reuse_or(edge_map, &mut local_edges);
        let face_map = reuse_or(face_map, &mut local_faces);

        let mut result = Mesh::with_config(self.config.clone());
        let copied = self
            .copy_faces_into(&mut result, faces, vert_map, edge_map, face_map)
            .and_then(|()| result.after_mutation());
        match copied {
            Ok(()) => {
                debug!(
                    "clone_sub: copied {} of {} faces ({} vertices)",
                    result.face_count(),
                    self.face_count(),
                    result.vertex_count()
                );
                Ok(result)
            }
            Err(err) => Err(self.dump_faces("clone_sub", faces, err)),
        }
    }

    /// Recreate `faces` inside `target`, recording every correspondence.
    ///
    /// Faces are linked without the Internal vertex check and every vertex
    /// that received a face is classified once all of them are in place.
    /// Replaying faces one by one could otherwise close a fan before a face
    /// hanging off the same vertex arrives. Duplicate directed edges and
    /// repeated corners are still rejected. The caller validates `target`.
    pub(crate) fn copy_faces_into(
        &self,
        target: &mut Mesh,
        faces: &[FaceId],
        vert_map: &mut HashMap<VertexId, VertexId>,
        edge_map: &mut HashMap<HalfEdgeId, HalfEdgeId>,
        face_map: &mut HashMap<FaceId, FaceId>,
    ) -> Result<(), TopologyError> {
        let mut touched = BTreeSet::new();
        for &face_id in faces {
            let old_verts = self
                .face_vertices(face_id)
                .ok_or(TopologyError::UnknownFace(face_id))?;
            let new_verts = old_verts.map(|v| {
                *vert_map.entry(v).or_insert_with(|| {
                    let vertex = self.vert(v);
                    target.add_vertex(vertex.position, vertex.normal)
                })
            });

            let [a, b, c] = new_verts;
            if a == b || b == c || a == c {
                return Err(TopologyError::DegenerateFace(face_id));
            }
            let new_face = target.link_face(new_verts)?;
            touched.extend(new_verts);

            target.match_face_edges(self, face_id, new_face, vert_map, edge_map)?;
            face_map.insert(face_id, new_face);
        }

        for v in touched {
            target.refresh_vertex_kind(v);
        }
        Ok(())
    }

    /// Pair up the half-edges of `old_face` (in `source`) with those of
    /// `new_face` (in `self`) by comparing their end vertices.
    pub(crate) fn match_face_edges(
        &self,
        source: &Mesh,
        old_face: FaceId,
        new_face: FaceId,
        vert_map: &HashMap<VertexId, VertexId>,
        edge_map: &mut HashMap<HalfEdgeId, HalfEdgeId>,
    ) -> Result<(), TopologyError> {
        let old_edges = source
            .face_half_edges(old_face)
            .ok_or(TopologyError::UnknownFace(old_face))?;
        let new_edges = self
            .face_half_edges(new_face)
            .ok_or(TopologyError::UnknownFace(new_face))?;

        for old in old_edges {
            let mapped_end = vert_map.get(&source.he(old).end).copied();
            if let Some(new) = new_edges
                .into_iter()
                .find(|&new| Some(self.he(new).end) == mapped_end)
            {
                edge_map.insert(old, new);
            }
        }
        Ok(())
    }

    /// Write the positions of `faces` to the diagnostic dump and hand back
    /// the error that triggered it.
    fn dump_faces(&self, operation: &str, faces: &[FaceId], err: TopologyError) -> TopologyError {
        let Some(path) = self.config.clone_dump_path.clone() else {
            return err;
        };

        let triangles: Vec<[[f64; 3]; 3]> = faces
            .iter()
            .filter_map(|&f| self.face_vertices(f))
            .map(|verts| verts.map(|v| self.vert(v).position.to_array()))
            .collect();

        match write_dump(&path, &triangles) {
            Ok(()) => {
                error!(
                    "{} failed ({}); {} input faces dumped to {}",
                    operation,
                    err,
                    triangles.len(),
                    path.display()
                );
                err
            }
            Err(io) => TopologyError::Dump {
                path,
                io,
                source: Box::new(err),
            },
        }
    }
}

fn reuse_or<'a, K, V>(
    supplied: Option<&'a mut HashMap<K, V>>,
    local: &'a mut HashMap<K, V>,
) -> &'a mut HashMap<K, V> {
    match supplied {
        Some(map) => {
            map.clear();
            map
        }
        None => local,
    }
}

fn write_dump(path: &Path, triangles: &[[[f64; 3]; 3]]) -> std::io::Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, triangles)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::super::VertexKind;
    use super::*;
    use tessera_config::KernelConfig;

    #[test]
    fn test_clone_sub_single_face() {
        let (mesh, _, faces) = tetrahedron();
        let mut vert_map = HashMap::new();
        let mut edge_map = HashMap::new();
        let mut face_map = HashMap::new();

        let sub = mesh
            .clone_sub(&faces[..1], Some(&mut vert_map), Some(&mut edge_map), Some(&mut face_map))
            .unwrap();

        assert_eq!(sub.vertex_count(), 3);
        assert_eq!(sub.face_count(), 1);
        assert_eq!(sub.edge_count(), 3);
        assert_eq!(edge_map.len(), 3);

        let old_edges = mesh.face_half_edges(faces[0]).unwrap();
        let mut targets: Vec<HalfEdgeId> = old_edges.iter().map(|e| edge_map[e]).collect();
        targets.sort();
        targets.dedup();
        assert_eq!(targets.len(), 3, "edge correspondence must be a bijection");
        for old in old_edges {
            let new = edge_map[&old];
            assert_eq!(sub.end(new), vert_map.get(&mesh.end(old).unwrap()).copied());
            assert_eq!(sub.begin(new), vert_map.get(&mesh.begin(old).unwrap()).copied());
        }
        assert_eq!(face_map.len(), 1);
        assert!(sub.validate().is_ok());
    }

    #[test]
    fn test_clone_sub_clears_supplied_maps() {
        let (mesh, v) = strip();
        let mut vert_map = HashMap::from([(VertexId(99), VertexId(98))]);
        let face = mesh.faces().next().unwrap().id;

        mesh.clone_sub(&[face], Some(&mut vert_map), None, None).unwrap();

        assert_eq!(vert_map.len(), 3);
        assert!(!vert_map.contains_key(&VertexId(99)));
        assert!(vert_map.contains_key(&v[1]));
    }

    #[test]
    fn test_clone_mesh_keeps_topology() {
        let (mut mesh, _, _) = tetrahedron();
        let loose = add(&mut mesh, 9.0, 9.0, 9.0);
        let mut edge_map = HashMap::new();

        let copy = mesh.clone_mesh(Some(&mut edge_map)).unwrap();

        assert_eq!(copy.vertex_count(), 5);
        assert_eq!(copy.face_count(), 4);
        assert_eq!(copy.unpaired_count(), 0);
        assert_eq!(edge_map.len(), 12);
        for (old, new) in &edge_map {
            let old_pair = mesh.half_edge(*old).unwrap().pair.unwrap();
            assert_eq!(copy.half_edge(*new).unwrap().pair, Some(edge_map[&old_pair]));
        }
        let copied_loose = copy.vertices().last().unwrap();
        assert_eq!(copied_loose.kind, VertexKind::Isolated);
        assert_eq!(copied_loose.position, mesh.vertex(loose).unwrap().position);
        assert!(copy.vertices().all(|v| v.id == copied_loose.id || v.kind == VertexKind::Internal));
    }

    #[test]
    fn test_failed_clone_sub_writes_dump() {
        let path = std::env::temp_dir().join(format!("tessera-clonesub-{}.err", std::process::id()));
        let (mut mesh, _) = strip();
        mesh.config = KernelConfig::default().with_clone_dump_path(Some(path.clone()));
        let face = mesh.faces().next().unwrap().id;

        // The second copy of the same face repeats all three directed edges
        let err = mesh.clone_sub(&[face, face], None, None, None).unwrap_err();
        assert!(matches!(err, TopologyError::DuplicateHalfEdge { .. }), "{err}");

        let dumped: Vec<[[f64; 3]; 3]> =
            serde_json::from_reader(File::open(&path).unwrap()).unwrap();
        assert_eq!(dumped.len(), 2);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_unknown_face_without_dump() {
        let (mesh, _) = triangle();

        let err = mesh.clone_sub(&[FaceId(5)], None, None, None).unwrap_err();
        assert!(matches!(err, TopologyError::UnknownFace(FaceId(5))));
    }

    /// Closed fan around `c` whose faces come first, plus an open wing
    /// `(c, b, d)` created last
    fn fan_with_late_wing() -> (Mesh, VertexId, VertexId) {
        let mut mesh = strict_mesh();
        let c = add(&mut mesh, 0.0, 0.0, 0.0);
        let r0 = add(&mut mesh, 1.0, 0.0, 0.0);
        let r1 = add(&mut mesh, 0.0, 1.0, 0.0);
        let r2 = add(&mut mesh, -1.0, -1.0, 0.0);
        let a = add(&mut mesh, 0.0, 0.0, 2.0);
        let b = add(&mut mesh, 1.0, 0.0, 2.0);
        let d = add(&mut mesh, 1.0, 1.0, 2.0);

        face(&mut mesh, c, r0, r1);
        let first_wing = face(&mut mesh, c, a, b);
        face(&mut mesh, c, r1, r2);
        face(&mut mesh, c, r2, r0);
        face(&mut mesh, c, b, d);
        mesh.delete_face(first_wing).unwrap();
        (mesh, c, b)
    }

    #[test]
    fn test_clone_mesh_with_fan_closed_before_wing() {
        let (mesh, c, b) = fan_with_late_wing();
        assert!(mesh.validate().is_ok());
        assert_eq!(mesh.vertex(c).unwrap().kind, VertexKind::Boundary);

        let mut copy = mesh.clone_mesh(None).unwrap();

        assert_eq!(copy.face_count(), 4);
        assert_eq!(copy.vertex(c).unwrap().kind, VertexKind::Boundary);
        assert_eq!(copy.vertex(c).unwrap().out_degree(), 4);
        assert!(copy.validate().is_ok());

        // Without the wing the remaining fan is closed
        let wing = copy.half_edge(copy.find_half_edge(c, b).unwrap()).unwrap().face;
        copy.delete_face(wing).unwrap();
        assert_eq!(copy.vertex(c).unwrap().kind, VertexKind::Internal);
    }

    #[test]
    fn test_clone_sub_with_fan_closed_before_wing() {
        let (mesh, c, _) = fan_with_late_wing();
        let faces: Vec<FaceId> = mesh.faces().map(|f| f.id).collect();
        let mut vert_map = HashMap::new();

        let sub = mesh.clone_sub(&faces, Some(&mut vert_map), None, None).unwrap();

        assert_eq!(sub.face_count(), 4);
        assert_eq!(sub.vertex(vert_map[&c]).unwrap().kind, VertexKind::Boundary);
        assert!(sub.validate().is_ok());
    }

    #[test]
    fn test_dump_keeps_original_error() {
        let path = std::env::temp_dir().join(format!("tessera-clone-{}.err", std::process::id()));
        let (mut mesh, _, faces) = tetrahedron();
        mesh.config = KernelConfig::default().with_clone_dump_path(Some(path.clone()));

        let err = mesh.dump_faces("clone_mesh", &faces, TopologyError::UnknownFace(FaceId(9)));

        assert!(matches!(err, TopologyError::UnknownFace(FaceId(9))), "{err}");
        let dumped: Vec<[[f64; 3]; 3]> =
            serde_json::from_reader(File::open(&path).unwrap()).unwrap();
        assert_eq!(dumped.len(), 4);
        std::fs::remove_file(&path).unwrap();
    }
}
