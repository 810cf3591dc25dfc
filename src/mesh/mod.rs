//! `Mesh` struct: an indexed polygon mesh in millimeters.
//!
//! Vertices are plain positions (x right, y back, z up from the base plane
//! `z = 0`); faces are vertex-index loops wound counter-clockwise when seen
//! from outside the solid.

use crate::float_types::Real;
use crate::mesh::edge::EdgeKey;
use nalgebra::{Point3, Vector3, partial_max, partial_min};
use parry3d_f64::bounding_volume::Aabb;
use std::sync::OnceLock;

pub mod adjacency;
pub mod edge;
pub mod manifold;
pub mod shapes;
pub mod weld;

/// A single polygonal face referencing mesh vertices by index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Face {
    /// Vertex indices in winding order (≥ 3).
    pub indices: Vec<usize>,
}

impl Face {
    pub const fn new(indices: Vec<usize>) -> Self {
        Face { indices }
    }

    /// Consecutive index pairs, closing the loop back to the first vertex.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.indices.len();
        (0..n).map(move |i| (self.indices[i], self.indices[(i + 1) % n]))
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Reverse the winding (and so the normal) in place.
    pub fn flip(&mut self) {
        self.indices.reverse();
    }
}

impl From<Vec<usize>> for Face {
    fn from(indices: Vec<usize>) -> Self {
        Face::new(indices)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Mesh {
    /// Vertex positions
    pub vertices: Vec<Point3<Real>>,

    /// Faces as index loops into `vertices`
    pub faces: Vec<Face>,

    /// Lazily calculated AABB that spans `vertices`.
    pub bounding_box: OnceLock<Aabb>,
}

impl Mesh {
    pub fn new() -> Self {
        Mesh::default()
    }

    /// Build a mesh from positions and index loops.
    pub fn from_parts(vertices: Vec<Point3<Real>>, faces: Vec<Vec<usize>>) -> Self {
        Mesh {
            vertices,
            faces: faces.into_iter().map(Face::new).collect(),
            bounding_box: OnceLock::new(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Append a vertex, returning its index.
    pub fn push_vertex(&mut self, position: Point3<Real>) -> usize {
        self.bounding_box = OnceLock::new();
        self.vertices.push(position);
        self.vertices.len() - 1
    }

    /// Append a face, returning its index.
    pub fn push_face(&mut self, indices: Vec<usize>) -> usize {
        self.faces.push(Face::new(indices));
        self.faces.len() - 1
    }

    /// Position of `face`'s vertices, in winding order.
    pub fn face_points(&self, face: usize) -> impl Iterator<Item = &Point3<Real>> + '_ {
        self.faces[face].indices.iter().map(|&i| &self.vertices[i])
    }

    /// Unit normal of a face, computed with Newell's method so non-triangular
    /// and slightly non-planar loops still get a stable direction.
    /// Returns the zero vector for a degenerate face.
    pub fn face_normal(&self, face: usize) -> Vector3<Real> {
        let indices = &self.faces[face].indices;
        let n = indices.len();
        let mut normal = Vector3::zeros();
        for i in 0..n {
            let current = self.vertices[indices[i]];
            let next = self.vertices[indices[(i + 1) % n]];
            normal.x += (current.y - next.y) * (current.z + next.z);
            normal.y += (current.z - next.z) * (current.x + next.x);
            normal.z += (current.x - next.x) * (current.y + next.y);
        }
        normal.try_normalize(Real::EPSILON).unwrap_or_else(Vector3::zeros)
    }

    /// Average of a face's vertex positions.
    pub fn face_centroid(&self, face: usize) -> Point3<Real> {
        let indices = &self.faces[face].indices;
        let sum = indices
            .iter()
            .fold(Vector3::zeros(), |acc, &i| acc + self.vertices[i].coords);
        Point3::from(sum / indices.len().max(1) as Real)
    }

    /// Every face edge as a canonical [`EdgeKey`]; shared edges appear once per face.
    pub fn edges(&self) -> impl Iterator<Item = EdgeKey> + '_ {
        self.faces
            .iter()
            .flat_map(|face| face.edges().map(|(a, b)| EdgeKey::new(a, b)))
    }

    /// Fan-triangulate every face. Faces produced by this crate are convex,
    /// so a fan from the first vertex is exact.
    pub fn triangulate(&self) -> Vec<[usize; 3]> {
        self.faces
            .iter()
            .flat_map(|face| {
                let first = face.indices[0];
                face.indices
                    .windows(2)
                    .skip(1)
                    .map(move |pair| [first, pair[0], pair[1]])
            })
            .collect()
    }

    /// Enclosed volume by the divergence theorem (sum of signed tetrahedra
    /// against the origin). Positive for a closed, outward-wound solid.
    pub fn volume(&self) -> Real {
        self.triangulate()
            .iter()
            .map(|&[a, b, c]| {
                let (pa, pb, pc) = (self.vertices[a], self.vertices[b], self.vertices[c]);
                pa.coords.dot(&pb.coords.cross(&pc.coords))
            })
            .sum::<Real>()
            / 6.0
    }

    /// Returns a new mesh with every vertex moved by `offset`.
    pub fn translate(&self, offset: Vector3<Real>) -> Mesh {
        Mesh {
            vertices: self.vertices.iter().map(|p| p + offset).collect(),
            faces: self.faces.clone(),
            bounding_box: OnceLock::new(),
        }
    }

    /// Reverse every face, turning the solid inside out.
    pub fn inverse(&self) -> Mesh {
        let mut mesh = self.clone();
        mesh.faces.iter_mut().for_each(Face::flip);
        mesh
    }

    /// Structural problems: out-of-range indices, faces with fewer than three
    /// vertices, repeated consecutive indices and non-finite coordinates.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        for (i, p) in self.vertices.iter().enumerate() {
            if !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()) {
                issues.push(format!("vertex {i} has a non-finite coordinate"));
            }
        }
        for (f, face) in self.faces.iter().enumerate() {
            if face.len() < 3 {
                issues.push(format!("face {f} has only {} vertices", face.len()));
            }
            if let Some(&bad) = face.indices.iter().find(|&&i| i >= self.vertices.len()) {
                issues.push(format!(
                    "face {f} references vertex {bad} (vertices.len = {})",
                    self.vertices.len()
                ));
            }
            if face.edges().any(|(a, b)| a == b) {
                issues.push(format!("face {f} repeats a vertex"));
            }
        }
        issues
    }

    /// Axis-aligned bounds of all vertices.
    pub fn bounding_box(&self) -> Aabb {
        *self.bounding_box.get_or_init(|| {
            let mut min_x = Real::MAX;
            let mut min_y = Real::MAX;
            let mut min_z = Real::MAX;
            let mut max_x = -Real::MAX;
            let mut max_y = -Real::MAX;
            let mut max_z = -Real::MAX;

            for p in &self.vertices {
                min_x = *partial_min(&min_x, &p.x).unwrap_or(&min_x);
                min_y = *partial_min(&min_y, &p.y).unwrap_or(&min_y);
                min_z = *partial_min(&min_z, &p.z).unwrap_or(&min_z);

                max_x = *partial_max(&max_x, &p.x).unwrap_or(&max_x);
                max_y = *partial_max(&max_y, &p.y).unwrap_or(&max_y);
                max_z = *partial_max(&max_z, &p.z).unwrap_or(&max_z);
            }

            // Empty mesh => trivial AABB at origin
            if min_x > max_x {
                return Aabb::new(Point3::origin(), Point3::origin());
            }

            Aabb::new(
                Point3::new(min_x, min_y, min_z),
                Point3::new(max_x, max_y, max_z),
            )
        })
    }
}
