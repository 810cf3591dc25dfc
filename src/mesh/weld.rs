//! Vertex welding and T-junction repair for meshes rebuilt from polygon soup.

use crate::float_types::Real;
use crate::mesh::adjacency::EdgeAdjacency;
use crate::mesh::edge::EdgeKey;
use crate::mesh::{Face, Mesh};
use hashbrown::{HashMap, HashSet};
use nalgebra::Point3;
use std::sync::OnceLock;

type Cell = (i64, i64, i64);

fn cell_of(p: &Point3<Real>, epsilon: Real) -> Cell {
    (
        (p.x / epsilon).floor() as i64,
        (p.y / epsilon).floor() as i64,
        (p.z / epsilon).floor() as i64,
    )
}

/// Drop consecutive repeats (including last→first) from a face loop.
fn collapse_loop(indices: &[usize]) -> Vec<usize> {
    let mut out: Vec<usize> = Vec::with_capacity(indices.len());
    for &i in indices {
        if out.last() != Some(&i) {
            out.push(i);
        }
    }
    while out.len() > 1 && out.first() == out.last() {
        out.pop();
    }
    out
}

impl Mesh {
    /// Merge vertices closer than `epsilon`, drop faces that collapse below
    /// three vertices, and discard vertices no face references.
    ///
    /// Uses a uniform grid with `epsilon`-sized cells; each vertex is matched
    /// against the representatives in its own and the 26 neighbouring cells.
    pub fn weld_vertices(&mut self, epsilon: Real) {
        let epsilon = epsilon.max(Real::EPSILON);
        let mut grid: HashMap<Cell, Vec<usize>> = HashMap::new();
        let mut representatives: Vec<Point3<Real>> = Vec::new();
        let mut remap = Vec::with_capacity(self.vertices.len());

        for p in &self.vertices {
            let (cx, cy, cz) = cell_of(p, epsilon);
            let mut found = None;
            'search: for dx in -1..=1 {
                for dy in -1..=1 {
                    for dz in -1..=1 {
                        if let Some(bucket) = grid.get(&(cx + dx, cy + dy, cz + dz)) {
                            if let Some(&r) = bucket
                                .iter()
                                .find(|&&r| (representatives[r] - p).norm() <= epsilon)
                            {
                                found = Some(r);
                                break 'search;
                            }
                        }
                    }
                }
            }
            let index = found.unwrap_or_else(|| {
                representatives.push(*p);
                grid.entry((cx, cy, cz))
                    .or_default()
                    .push(representatives.len() - 1);
                representatives.len() - 1
            });
            remap.push(index);
        }

        let faces: Vec<Vec<usize>> = self
            .faces
            .iter()
            .map(|face| collapse_loop(&face.indices.iter().map(|&i| remap[i]).collect::<Vec<_>>()))
            .filter(|indices| indices.len() >= 3)
            .collect();

        // Compact: keep only referenced representatives, in first-use order
        let mut compact: HashMap<usize, usize> = HashMap::new();
        let mut vertices = Vec::new();
        let faces = faces
            .into_iter()
            .map(|indices| {
                Face::new(
                    indices
                        .into_iter()
                        .map(|r| {
                            *compact.entry(r).or_insert_with(|| {
                                vertices.push(representatives[r]);
                                vertices.len() - 1
                            })
                        })
                        .collect(),
                )
            })
            .collect();

        self.vertices = vertices;
        self.faces = faces;
        self.bounding_box = OnceLock::new();
    }

    /// Split open edges at vertices lying on their interior.
    ///
    /// After a BSP boolean a polygon edge is often cut on one side only,
    /// leaving a vertex of the neighbour sitting in the middle of the uncut
    /// edge. Inserting that vertex into the uncut face's loop restores a
    /// shared edge. Expects welded vertices.
    pub fn heal_t_junctions(&mut self, epsilon: Real) {
        let adjacency = EdgeAdjacency::build(self);
        let boundary: HashSet<EdgeKey> = adjacency.boundary_edges().into_iter().collect();
        if boundary.is_empty() {
            return;
        }

        // T-junction vertices are always endpoints of open edges
        let mut candidates: Vec<usize> = boundary
            .iter()
            .flat_map(|edge| {
                let (a, b) = edge.endpoints();
                [a, b]
            })
            .collect();
        candidates.sort_unstable();
        candidates.dedup();

        let vertices = &self.vertices;
        let on_segment = |a: usize, b: usize| -> Vec<usize> {
            let (pa, pb) = (vertices[a], vertices[b]);
            let dir = pb - pa;
            let len2 = dir.norm_squared();
            if len2 <= epsilon * epsilon {
                return Vec::new();
            }
            let mut hits: Vec<(Real, usize)> = candidates
                .iter()
                .copied()
                .filter(|&v| v != a && v != b)
                .filter_map(|v| {
                    let t = (vertices[v] - pa).dot(&dir) / len2;
                    let closest = pa + dir * t;
                    let interior = t * len2.sqrt() > epsilon && (1.0 - t) * len2.sqrt() > epsilon;
                    (interior && (vertices[v] - closest).norm() <= epsilon).then_some((t, v))
                })
                .collect();
            hits.sort_by(|x, y| x.0.total_cmp(&y.0));
            hits.into_iter().map(|(_, v)| v).collect()
        };

        let mut healed = Vec::with_capacity(self.faces.len());
        for face in &self.faces {
            let mut indices = Vec::with_capacity(face.len());
            for (a, b) in face.edges() {
                indices.push(a);
                if boundary.contains(&EdgeKey::new(a, b)) {
                    indices.extend(on_segment(a, b));
                }
            }
            healed.push(Face::new(indices));
        }
        self.faces = healed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weld_merges_duplicate_corners() {
        // Two triangles of a square, each with its own copy of the diagonal
        let mut mesh = Mesh::from_parts(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 0.0, 1e-9),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![vec![0, 1, 2], vec![3, 4, 5]],
        );
        mesh.weld_vertices(1e-6);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.analyze_manifold().boundary_edges, 4);
    }

    #[test]
    fn weld_drops_collapsed_faces() {
        let mut mesh = Mesh::from_parts(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1e-9, 0.0),
            ],
            vec![vec![0, 1, 2]],
        );
        mesh.weld_vertices(1e-6);
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
    }

    #[test]
    fn t_junction_is_split() {
        // Left: one big quad. Right: two small quads sharing the left quad's
        // right edge, with their common vertex in the middle of it.
        let mut mesh = Mesh::from_parts(
            vec![
                Point3::new(0.0, 0.0, 0.0), // 0
                Point3::new(1.0, 0.0, 0.0), // 1
                Point3::new(1.0, 2.0, 0.0), // 2
                Point3::new(0.0, 2.0, 0.0), // 3
                Point3::new(1.0, 1.0, 0.0), // 4: on edge 1-2
                Point3::new(2.0, 0.0, 0.0), // 5
                Point3::new(2.0, 1.0, 0.0), // 6
                Point3::new(2.0, 2.0, 0.0), // 7
            ],
            vec![vec![0, 1, 2, 3], vec![1, 5, 6, 4], vec![4, 6, 7, 2]],
        );
        let before = EdgeAdjacency::build(&mesh);
        assert!(before.faces_of(EdgeKey::new(1, 2)).len() == 1);

        mesh.heal_t_junctions(1e-6);
        assert_eq!(mesh.faces[0].indices, vec![0, 1, 4, 2, 3]);
        let after = EdgeAdjacency::build(&mesh);
        assert_eq!(after.faces_of(EdgeKey::new(1, 4)).len(), 2);
        assert_eq!(after.faces_of(EdgeKey::new(4, 2)).len(), 2);
    }
}
