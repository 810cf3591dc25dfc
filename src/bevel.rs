//! Two-tier bevel weights and the settings handed to a weighted-bevel capability.
//!
//! Vertical corners get the full bevel, the top perimeter a softer one.
//! The rounding itself belongs to a [`BevelEngine`](crate::traits::BevelEngine).

use crate::float_types::Real;
use crate::mesh::Mesh;
use crate::mesh::adjacency::EdgeAdjacency;
use crate::mesh::edge::{EdgeAttributes, EdgeKey, EdgeWeightMap};
use nalgebra::Point3;

/// Weight of the four vertical outer corners.
pub const CORNER_WEIGHT: Real = 1.0;
/// Weight of the top rim.
pub const TOP_RIM_WEIGHT: Real = 0.5;

/// Largest bevel radius a keycap accepts (mm).
pub const MAX_BEVEL_RADIUS: Real = 2.0;

/// Parameters of the weighted bevel pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BevelSettings {
    /// Bevel width in mm, clamped to `[0, MAX_BEVEL_RADIUS]`
    pub radius: Real,
    pub segments: u32,
    /// Cross-section shape; 0.5 is circular, 0.64 slightly superelliptical
    pub profile: Real,
    /// Stop bevels from overlapping neighbouring ones
    pub clamp_overlap: bool,
}

impl BevelSettings {
    pub const SEGMENTS: u32 = 8;
    pub const PROFILE: Real = 0.64;

    /// Settings for a bevel of `radius` mm. NaN reads as no bevel.
    pub fn new(radius: Real) -> Self {
        BevelSettings {
            radius: clamp_radius(radius),
            segments: Self::SEGMENTS,
            profile: Self::PROFILE,
            clamp_overlap: true,
        }
    }

    /// Same settings with a different radius.
    pub fn with_radius(self, radius: Real) -> Self {
        BevelSettings {
            radius: clamp_radius(radius),
            ..self
        }
    }
}

impl Default for BevelSettings {
    fn default() -> Self {
        Self::new(1.5)
    }
}

fn clamp_radius(radius: Real) -> Real {
    if radius.is_nan() {
        0.0
    } else {
        radius.clamp(0.0, MAX_BEVEL_RADIUS)
    }
}

/// Assigns per-edge bevel weights.
pub struct BevelWeighting;

impl BevelWeighting {
    /// Corner edges get [`CORNER_WEIGHT`] and are selected, top-rim edges get
    /// [`TOP_RIM_WEIGHT`], everything else stays unset. A corner listed again
    /// as rim keeps its corner weight. Edges that are not in `mesh` are ignored.
    pub fn assign(
        mesh: &Mesh,
        corner_edges: &[EdgeKey],
        top_rim_edges: &[EdgeKey],
    ) -> EdgeWeightMap {
        let adjacency = EdgeAdjacency::build(mesh);
        let mut weights = EdgeWeightMap::new();
        for &edge in corner_edges.iter().filter(|&&e| adjacency.contains(e)) {
            weights.set_weight(edge, CORNER_WEIGHT);
            weights.select(edge);
        }
        for &edge in top_rim_edges.iter().filter(|&&e| adjacency.contains(e)) {
            if weights.weight(edge) == 0.0 {
                weights.set_weight(edge, TOP_RIM_WEIGHT);
            }
        }
        weights
    }

    /// Carry `weights` from `source` over to `target`, a mesh rebuilt from
    /// it (for example by a boolean union that re-indexed and split edges).
    ///
    /// A `target` edge inherits the attributes of every weighted or selected
    /// `source` edge it lies on within `tolerance`. A source edge cut into a
    /// chain of shorter edges passes its attributes to each link.
    pub fn transfer(
        source: &Mesh,
        weights: &EdgeWeightMap,
        target: &Mesh,
        tolerance: Real,
    ) -> EdgeWeightMap {
        let segments: Vec<(Point3<Real>, Point3<Real>, EdgeAttributes)> = weights
            .iter()
            .map(|(edge, attrs)| {
                let (a, b) = edge.endpoints();
                (source.vertices[a], source.vertices[b], *attrs)
            })
            .collect();

        let mut transferred = EdgeWeightMap::new();
        for edge in EdgeAdjacency::build(target).edges() {
            let (a, b) = edge.endpoints();
            let (p, q) = (target.vertices[a], target.vertices[b]);
            for (start, end, attrs) in &segments {
                if !(on_segment(&p, start, end, tolerance) && on_segment(&q, start, end, tolerance)) {
                    continue;
                }
                if attrs.bevel_weight > transferred.weight(edge) {
                    transferred.set_weight(edge, attrs.bevel_weight);
                }
                if attrs.selected {
                    transferred.select(edge);
                }
            }
        }
        transferred
    }
}

fn on_segment(p: &Point3<Real>, start: &Point3<Real>, end: &Point3<Real>, tolerance: Real) -> bool {
    let dir = end - start;
    let len2 = dir.norm_squared();
    if len2 <= tolerance * tolerance {
        return (p - start).norm() <= tolerance;
    }
    let t = (p - start).dot(&dir) / len2;
    let slack = tolerance / len2.sqrt();
    (-slack..=1.0 + slack).contains(&t) && (p - (start + dir * t)).norm() <= tolerance
}
