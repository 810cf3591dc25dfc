//! Convex polygons carried through the BSP tree.

use crate::bsp::plane::Plane;
use crate::float_types::Real;
use nalgebra::Point3;
use parry3d_f64::bounding_volume::Aabb;

/// A planar polygon with its supporting plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub vertices: Vec<Point3<Real>>,
    pub plane: Plane,
}

impl Polygon {
    /// `None` when the loop has no area.
    pub fn new(vertices: Vec<Point3<Real>>) -> Option<Polygon> {
        let plane = Plane::from_points(&vertices)?;
        Some(Polygon { vertices, plane })
    }

    /// Polygon on a known plane, as produced by splitting.
    pub(crate) const fn with_plane(vertices: Vec<Point3<Real>>, plane: Plane) -> Polygon {
        Polygon { vertices, plane }
    }

    pub fn bounding_box(&self) -> Aabb {
        let first = self.vertices.first().copied().unwrap_or_else(Point3::origin);
        let (mins, maxs) = self
            .vertices
            .iter()
            .fold((first, first), |(lo, hi), p| (lo.inf(p), hi.sup(p)));
        Aabb::new(mins, maxs)
    }

    /// Reverse winding and plane.
    pub fn flip(&mut self) {
        self.vertices.reverse();
        self.plane.flip();
    }
}
