//! Manifold validation by edge counting.

use crate::mesh::Mesh;
use crate::mesh::adjacency::EdgeAdjacency;

/// Topological summary of a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManifoldReport {
    /// Edges used by exactly one face (0 for a closed surface)
    pub boundary_edges: usize,
    /// Edges used by more than two faces
    pub non_manifold_edges: usize,
    /// Euler characteristic (V - E + F)
    pub euler_characteristic: i64,
    /// Every edge is shared by exactly two faces
    pub is_manifold: bool,
}

impl Mesh {
    /// Count open and over-shared edges.
    ///
    /// Vertices are compared by index, so coincident but unwelded vertices
    /// show up as boundary edges; weld first when the mesh comes from
    /// polygon soup.
    pub fn analyze_manifold(&self) -> ManifoldReport {
        let adjacency = EdgeAdjacency::build(self);
        let boundary_edges = adjacency.boundary_edges().len();
        let non_manifold_edges = adjacency.non_manifold_edges().len();
        let euler_characteristic = self.vertex_count() as i64 - adjacency.edge_count() as i64
            + self.face_count() as i64;

        ManifoldReport {
            boundary_edges,
            non_manifold_edges,
            euler_characteristic,
            is_manifold: boundary_edges == 0 && non_manifold_edges == 0 && !self.is_empty(),
        }
    }

    /// Returns `true` if every edge appears exactly 2 times
    pub fn is_manifold(&self) -> bool {
        self.analyze_manifold().is_manifold
    }
}

#[cfg(test)]
mod tests {
    use crate::mesh::shapes;

    #[test]
    fn closed_prism_is_manifold() {
        let report = shapes::prism(2.0, 3.0, 4.0, 0.0).analyze_manifold();
        assert!(report.is_manifold);
        assert_eq!(report.euler_characteristic, 2);
    }

    #[test]
    fn open_prism_has_boundary() {
        let mut prism = shapes::prism(2.0, 3.0, 4.0, 0.0);
        prism.faces.pop();
        let report = prism.analyze_manifold();
        assert!(!report.is_manifold);
        assert_eq!(report.boundary_edges, 4);
    }
}
