//! Oriented planes and polygon splitting.

use crate::bsp::polygon::Polygon;
use crate::float_types::{Real, tolerance};
use nalgebra::{Point3, Vector3};

// Point/polygon classification. Bit flags, so a polygon's type is the OR of
// its vertices' types.
pub const COPLANAR: i8 = 0;
pub const FRONT: i8 = 1;
pub const BACK: i8 = 2;
pub const SPANNING: i8 = 3;

/// Plane `normal · p = w` with a unit normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vector3<Real>,
    pub w: Real,
}

/// Result of [`Plane::split_polygon`]: `(coplanar_front, coplanar_back, front, back)`.
pub type Split = (Vec<Polygon>, Vec<Polygon>, Vec<Polygon>, Vec<Polygon>);

impl Plane {
    /// Plane through a polygon's vertices, oriented by their winding.
    ///
    /// The normal comes from Newell's method and the offset from the
    /// centroid, so a slightly non-planar loop still gets a stable plane.
    /// `None` for fewer than three vertices or zero area.
    pub fn from_points(points: &[Point3<Real>]) -> Option<Plane> {
        if points.len() < 3 {
            return None;
        }
        let n = points.len();
        let mut normal = Vector3::zeros();
        let mut centroid = Vector3::zeros();
        for i in 0..n {
            let current = points[i];
            let next = points[(i + 1) % n];
            normal.x += (current.y - next.y) * (current.z + next.z);
            normal.y += (current.z - next.z) * (current.x + next.x);
            normal.z += (current.x - next.x) * (current.y + next.y);
            centroid += current.coords;
        }
        let normal = normal.try_normalize(Real::EPSILON)?;
        let w = normal.dot(&(centroid / n as Real));
        Some(Plane { normal, w })
    }

    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    /// Signed distance of `point` from the plane.
    pub fn distance(&self, point: &Point3<Real>) -> Real {
        self.normal.dot(&point.coords) - self.w
    }

    /// FRONT, BACK or COPLANAR within the crate tolerance.
    pub fn orient_point(&self, point: &Point3<Real>) -> i8 {
        let t = self.distance(point);
        let eps = tolerance();
        if t < -eps {
            BACK
        } else if t > eps {
            FRONT
        } else {
            COPLANAR
        }
    }

    /// Bitwise OR of the vertex classifications.
    pub fn classify_polygon(&self, polygon: &Polygon) -> i8 {
        polygon
            .vertices
            .iter()
            .fold(COPLANAR, |acc, p| acc | self.orient_point(p))
    }

    /// Split `polygon` by this plane into four buckets:
    /// `(coplanar_front, coplanar_back, front, back)`.
    ///
    /// Coplanar polygons go to the front bucket when they face the same way
    /// as the plane. Spanning polygons are cut along the plane; both halves
    /// keep the original polygon's plane.
    pub fn split_polygon(&self, polygon: &Polygon) -> Split {
        let mut coplanar_front = Vec::new();
        let mut coplanar_back = Vec::new();
        let mut front = Vec::new();
        let mut back = Vec::new();

        let types: Vec<i8> = polygon
            .vertices
            .iter()
            .map(|p| self.orient_point(p))
            .collect();
        let polygon_type = types.iter().fold(COPLANAR, |acc, &t| acc | t);

        match polygon_type {
            COPLANAR => {
                if self.normal.dot(&polygon.plane.normal) > 0.0 {
                    coplanar_front.push(polygon.clone());
                } else {
                    coplanar_back.push(polygon.clone());
                }
            },
            FRONT => front.push(polygon.clone()),
            BACK => back.push(polygon.clone()),
            _ => {
                let n = polygon.vertices.len();
                let mut split_front = Vec::with_capacity(n + 1);
                let mut split_back = Vec::with_capacity(n + 1);

                for i in 0..n {
                    let j = (i + 1) % n;
                    let (type_i, type_j) = (types[i], types[j]);
                    let (vi, vj) = (polygon.vertices[i], polygon.vertices[j]);

                    if type_i != BACK {
                        split_front.push(vi);
                    }
                    if type_i != FRONT {
                        split_back.push(vi);
                    }

                    if (type_i | type_j) == SPANNING {
                        let denom = self.normal.dot(&(vj - vi));
                        if denom.abs() > Real::EPSILON {
                            let t = (self.w - self.normal.dot(&vi.coords)) / denom;
                            let cut = vi + (vj - vi) * t;
                            split_front.push(cut);
                            split_back.push(cut);
                        }
                    }
                }

                if split_front.len() >= 3 {
                    front.push(Polygon::with_plane(split_front, polygon.plane));
                }
                if split_back.len() >= 3 {
                    back.push(Polygon::with_plane(split_back, polygon.plane));
                }
            },
        }

        (coplanar_front, coplanar_back, front, back)
    }
}
