//! Explicit edge/face adjacency, built once per mesh.

use crate::mesh::Mesh;
use crate::mesh::edge::EdgeKey;
use hashbrown::HashMap;

/// Map from every edge to the faces that use it, plus the edges incident to
/// every vertex.
///
/// Built in a single pass over the face loops; the mesh must not change
/// while an index built from it is in use.
#[derive(Debug, Clone, Default)]
pub struct EdgeAdjacency {
    edge_faces: HashMap<EdgeKey, Vec<usize>>,
    vertex_edges: HashMap<usize, Vec<EdgeKey>>,
}

impl EdgeAdjacency {
    pub fn build(mesh: &Mesh) -> Self {
        let mut edge_faces: HashMap<EdgeKey, Vec<usize>> = HashMap::new();
        for (f, face) in mesh.faces.iter().enumerate() {
            for (a, b) in face.edges() {
                edge_faces.entry(EdgeKey::new(a, b)).or_default().push(f);
            }
        }

        let mut vertex_edges: HashMap<usize, Vec<EdgeKey>> = HashMap::new();
        for &edge in edge_faces.keys() {
            let (a, b) = edge.endpoints();
            vertex_edges.entry(a).or_default().push(edge);
            vertex_edges.entry(b).or_default().push(edge);
        }
        for edges in vertex_edges.values_mut() {
            edges.sort();
        }

        EdgeAdjacency {
            edge_faces,
            vertex_edges,
        }
    }

    /// Faces that reference `edge` (empty if the edge does not exist).
    pub fn faces_of(&self, edge: EdgeKey) -> &[usize] {
        self.edge_faces.get(&edge).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Edges touching `vertex`, sorted.
    pub fn edges_at(&self, vertex: usize) -> &[EdgeKey] {
        self.vertex_edges.get(&vertex).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The edge joining `a` and `b`, found by walking `a`'s incident edges.
    pub fn edge_between(&self, a: usize, b: usize) -> Option<EdgeKey> {
        self.edges_at(a)
            .iter()
            .copied()
            .find(|edge| edge.other(a) == Some(b))
    }

    pub fn contains(&self, edge: EdgeKey) -> bool {
        self.edge_faces.contains_key(&edge)
    }

    pub fn edge_count(&self) -> usize {
        self.edge_faces.len()
    }

    pub fn edges(&self) -> impl Iterator<Item = EdgeKey> + '_ {
        self.edge_faces.keys().copied()
    }

    /// Edges used by exactly one face, sorted.
    pub fn boundary_edges(&self) -> Vec<EdgeKey> {
        self.edges_with(|count| count == 1)
    }

    /// Edges used by more than two faces, sorted.
    pub fn non_manifold_edges(&self) -> Vec<EdgeKey> {
        self.edges_with(|count| count > 2)
    }

    fn edges_with(&self, predicate: impl Fn(usize) -> bool) -> Vec<EdgeKey> {
        let mut edges: Vec<_> = self
            .edge_faces
            .iter()
            .filter(|(_, faces)| predicate(faces.len()))
            .map(|(&edge, _)| edge)
            .collect();
        edges.sort();
        edges
    }
}
