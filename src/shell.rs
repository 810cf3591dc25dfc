//! The double-walled keycap shell.
//!
//! Outer hull and inner hull are two tapered boxes joined by a rim at the
//! base plane. The result is one closed surface of 16 vertices and 14 quads
//! whose cavity opens downward; the stem later grows out of that cavity.
//!
//! ```text
//!   back (+y)   top_outer[3] ─── top_outer[2]
//!                    │               │
//!   front (-y)  top_outer[0] ─── top_outer[1]     (front edge pulled back
//!                                                  by the profile's taper)
//! ```

use crate::errors::{KeycapError, Result};
use crate::float_types::{
    BASE_DEPTH, HORIZONTAL_NORMAL_LIMIT, Real, UNIT_PITCH, VERTICAL_TOLERANCE, WALL_THICKNESS,
};
use crate::mesh::Mesh;
use crate::mesh::adjacency::EdgeAdjacency;
use crate::mesh::edge::EdgeKey;
use crate::profile::ProfileDimensions;
use nalgebra::Point3;
use tracing::{debug, info, instrument};

/// First vertex index of each ring of four corners.
pub const BASE_OUTER: usize = 0;
pub const TOP_OUTER: usize = 4;
pub const BASE_INNER: usize = 8;
pub const TOP_INNER: usize = 12;

/// Face index of the outer top quad.
pub const TOP_FACE: usize = 0;
/// Face indices of the four inner side quads.
pub const INNER_SIDE_FACES: [usize; 4] = [6, 7, 8, 9];

/// Resolved shell measurements (mm).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShellDimensions {
    pub base_width: Real,
    pub base_depth: Real,
    pub top_width: Real,
    pub top_depth: Real,
    /// y of the top face's front edge; the back edge stays at `base_depth / 2`
    pub top_front_y: Real,
    pub height: Real,
    pub wall_thickness: Real,
    pub inner_base_width: Real,
    pub inner_base_depth: Real,
    pub inner_top_width: Real,
    pub inner_top_depth: Real,
    /// Height of the cavity ceiling
    pub inner_top_z: Real,
}

impl ShellDimensions {
    fn resolve(width_units: Real, profile: &ProfileDimensions, wall: Real) -> Result<Self> {
        if !width_units.is_finite() || width_units <= 0.0 {
            return Err(KeycapError::InvalidWidth(width_units));
        }
        let base_width = width_units * UNIT_PITCH;
        let base_depth = BASE_DEPTH;
        let top_width = base_width - profile.top_width_delta;
        let top_depth = base_depth - profile.front_taper;

        let dims = ShellDimensions {
            base_width,
            base_depth,
            top_width,
            top_depth,
            top_front_y: -base_depth / 2.0 + profile.front_taper,
            height: profile.height,
            wall_thickness: wall,
            inner_base_width: base_width - 2.0 * wall,
            inner_base_depth: base_depth - 2.0 * wall,
            inner_top_width: top_width - 2.0 * wall,
            inner_top_depth: top_depth - 2.0 * wall,
            inner_top_z: profile.height - wall,
        };

        for (what, value) in [
            ("top width", dims.top_width),
            ("top depth", dims.top_depth),
            ("inner base width", dims.inner_base_width),
            ("inner base depth", dims.inner_base_depth),
            ("inner top width", dims.inner_top_width),
            ("inner top depth", dims.inner_top_depth),
            ("cavity height", dims.inner_top_z),
        ] {
            if !(value > 0.0) {
                return Err(KeycapError::DegenerateProfile { what, value });
            }
        }
        Ok(dims)
    }
}

/// Edge sets found while building the shell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShellEdges {
    /// Top-face border edges shared with a sloped side
    pub top_rim: Vec<EdgeKey>,
    /// The four vertical outer corners, `base_outer[i] → top_outer[i]`
    pub corner: Vec<EdgeKey>,
    /// Inner side edges that rise from the base to the cavity ceiling
    pub inner_vertical: Vec<EdgeKey>,
}

/// A built shell: mesh, classified edges and the measurements used.
#[derive(Debug, Clone)]
pub struct Shell {
    pub mesh: Mesh,
    pub edges: ShellEdges,
    pub dimensions: ShellDimensions,
}

/// Builds the tapered hollow shell.
#[derive(Debug, Clone, Copy)]
pub struct ShellBuilder {
    wall_thickness: Real,
}

impl Default for ShellBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellBuilder {
    pub const fn new() -> Self {
        ShellBuilder {
            wall_thickness: WALL_THICKNESS,
        }
    }

    pub const fn with_wall_thickness(mut self, wall_thickness: Real) -> Self {
        self.wall_thickness = wall_thickness;
        self
    }

    pub const fn wall_thickness(&self) -> Real {
        self.wall_thickness
    }

    /// Build the shell for a key `width_units` wide with the given profile.
    ///
    /// Fails with `DegenerateProfile` when the taper or wall leaves no top
    /// face or no cavity, and with `InvalidWidth` for a non-positive width.
    #[instrument(skip(self), fields(wall = self.wall_thickness))]
    pub fn build(&self, width_units: Real, profile: &ProfileDimensions) -> Result<Shell> {
        let dims = ShellDimensions::resolve(width_units, profile, self.wall_thickness)?;
        let mesh = Self::shell_mesh(&dims);
        let edges = Self::classify_edges(&mesh);

        info!(
            vertices = mesh.vertex_count(),
            faces = mesh.face_count(),
            base_width = dims.base_width,
            top_width = dims.top_width,
            height = dims.height,
            "shell built"
        );
        Ok(Shell {
            mesh,
            edges,
            dimensions: dims,
        })
    }

    /// Four corners of an axis-aligned rectangle, counter-clockwise from
    /// above, starting at front-left.
    fn rectangle(half_width: Real, front_y: Real, back_y: Real, z: Real) -> [Point3<Real>; 4] {
        [
            Point3::new(-half_width, front_y, z),
            Point3::new(half_width, front_y, z),
            Point3::new(half_width, back_y, z),
            Point3::new(-half_width, back_y, z),
        ]
    }

    fn shell_mesh(dims: &ShellDimensions) -> Mesh {
        let back_y = dims.base_depth / 2.0;
        let wall = dims.wall_thickness;

        let base_outer = Self::rectangle(dims.base_width / 2.0, -back_y, back_y, 0.0);
        let top_outer =
            Self::rectangle(dims.top_width / 2.0, dims.top_front_y, back_y, dims.height);
        let base_inner =
            Self::rectangle(dims.inner_base_width / 2.0, -back_y + wall, back_y - wall, 0.0);
        let top_inner = Self::rectangle(
            dims.inner_top_width / 2.0,
            dims.top_front_y + wall,
            back_y - wall,
            dims.inner_top_z,
        );

        let mut mesh = Mesh::new();
        for corner in base_outer
            .iter()
            .chain(&top_outer)
            .chain(&base_inner)
            .chain(&top_inner)
        {
            mesh.push_vertex(*corner);
        }

        let (bo, to, bi, ti) = (BASE_OUTER, TOP_OUTER, BASE_INNER, TOP_INNER);

        // Outer top, normal +z
        mesh.push_face(vec![to, to + 1, to + 2, to + 3]);
        for i in 0..4 {
            let next_i = (i + 1) % 4;
            mesh.push_face(vec![bo + i, bo + next_i, to + next_i, to + i]);
        }
        // Cavity ceiling, reversed so its normal points down into the cavity
        mesh.push_face(vec![ti + 3, ti + 2, ti + 1, ti]);
        for i in 0..4 {
            let next_i = (i + 1) % 4;
            mesh.push_face(vec![bi + i, ti + i, ti + next_i, bi + next_i]);
        }
        // Bottom rim joining the two hulls
        for i in 0..4 {
            let next_i = (i + 1) % 4;
            mesh.push_face(vec![bo + i, bi + i, bi + next_i, bo + next_i]);
        }
        mesh
    }

    fn classify_edges(mesh: &Mesh) -> ShellEdges {
        let adjacency = EdgeAdjacency::build(mesh);

        // One vertical edge per outer corner, looked up through adjacency
        let corner: Vec<EdgeKey> = (0..4)
            .filter_map(|i| adjacency.edge_between(BASE_OUTER + i, TOP_OUTER + i))
            .collect();
        debug_assert_eq!(corner.len(), 4);

        let mut inner_vertical = Vec::new();
        for &face in &INNER_SIDE_FACES {
            for (a, b) in mesh.faces[face].edges() {
                let edge = EdgeKey::new(a, b);
                if (mesh.vertices[a].z - mesh.vertices[b].z).abs() > VERTICAL_TOLERANCE
                    && !inner_vertical.contains(&edge)
                {
                    inner_vertical.push(edge);
                }
            }
        }

        let top_rim: Vec<EdgeKey> = mesh.faces[TOP_FACE]
            .edges()
            .map(|(a, b)| EdgeKey::new(a, b))
            .filter(|&edge| {
                adjacency
                    .faces_of(edge)
                    .iter()
                    .filter(|&&f| f != TOP_FACE)
                    .any(|&f| mesh.face_normal(f).z.abs() < HORIZONTAL_NORMAL_LIMIT)
            })
            .collect();

        debug!(
            corner = corner.len(),
            top_rim = top_rim.len(),
            inner_vertical = inner_vertical.len(),
            "classified shell edges"
        );
        ShellEdges {
            top_rim,
            corner,
            inner_vertical,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{ProfileType, lookup};

    #[test]
    fn faces_point_outward() {
        let shell = ShellBuilder::new()
            .build(1.0, &lookup(ProfileType::Cherry, 3))
            .unwrap();
        let mesh = &shell.mesh;

        assert!(mesh.face_normal(TOP_FACE).z > 0.99);
        assert!(mesh.face_normal(5).z < -0.99, "cavity ceiling faces down");
        for rim in 10..14 {
            assert!(mesh.face_normal(rim).z < -0.99);
        }
        // Outer side centroids sit outside the cavity, normals point away from the axis
        for side in 1..5 {
            let c = mesh.face_centroid(side);
            let n = mesh.face_normal(side);
            assert!(n.x * c.x + n.y * c.y > 0.0);
        }
        assert!(mesh.volume() > 0.0);
    }

    #[test]
    fn top_face_is_pulled_back_at_the_front() {
        let shell = ShellBuilder::new()
            .build(1.0, &lookup(ProfileType::Cherry, 3))
            .unwrap();
        let top: Vec<_> = shell.mesh.vertices[TOP_OUTER..TOP_OUTER + 4].to_vec();
        assert!((top[0].y - (-9.0 + 3.4)).abs() < 1e-12);
        assert_eq!(top[3].y, 9.0);
        assert!((top[1].x - top[0].x - 12.5).abs() < 1e-12);
    }

    #[test]
    fn oversized_taper_is_degenerate() {
        let profile = ProfileDimensions {
            top_width_delta: 18.0,
            front_taper: 3.0,
            height: 9.0,
        };
        assert!(matches!(
            ShellBuilder::new().build(1.0, &profile),
            Err(KeycapError::DegenerateProfile {
                what: "top width",
                ..
            })
        ));
    }

    #[test]
    fn nan_width_is_rejected() {
        let profile = lookup(ProfileType::Oem, 1);
        assert!(matches!(
            ShellBuilder::new().build(Real::NAN, &profile),
            Err(KeycapError::InvalidWidth(_))
        ));
    }
}
