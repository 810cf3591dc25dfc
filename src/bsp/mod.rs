//! Boolean operations by binary space partitioning.
//!
//! Each operand is turned into convex polygons, both polygon sets are
//! organised into BSP trees and clipped against each other, and the
//! surviving polygons are stitched back into an indexed mesh.
//!
//! Polygons whose bounds cannot reach the other operand skip clipping and
//! come through unsplit. Inside/outside classification always uses trees
//! built from the complete operands.

pub mod node;
pub mod plane;
pub mod polygon;

use crate::errors::{KeycapError, Result};
use crate::float_types::{Real, tolerance};
use crate::mesh::Mesh;
use crate::traits::BooleanEngine;
use node::Node;
use parry3d_f64::bounding_volume::{Aabb, BoundingVolume};
use polygon::Polygon;
use tracing::{debug, instrument, warn};

/// The built-in [`BooleanEngine`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BspEngine {
    /// Welding distance used when rebuilding the indexed mesh
    pub tolerance: Real,
    /// Reject open operands and results that do not close up after healing
    pub require_manifold: bool,
}

impl Default for BspEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl BspEngine {
    pub fn new() -> Self {
        BspEngine {
            tolerance: tolerance(),
            require_manifold: false,
        }
    }

    /// Engine that insists on closed 2-manifold inputs and outputs.
    pub fn strict() -> Self {
        BspEngine {
            require_manifold: true,
            ..Self::new()
        }
    }

    pub const fn with_tolerance(mut self, tolerance: Real) -> Self {
        self.tolerance = tolerance;
        self
    }

    fn check_operand(&self, op: &'static str, role: &str, mesh: &Mesh) -> Result<()> {
        if mesh.is_empty() {
            return Err(KeycapError::boolean(op, format!("{role} operand is empty")));
        }
        if let Some(issue) = mesh.validate().into_iter().next() {
            return Err(KeycapError::boolean(op, format!("{role} operand: {issue}")));
        }
        if self.require_manifold {
            let report = mesh.analyze_manifold();
            if !report.is_manifold {
                return Err(KeycapError::boolean(
                    op,
                    format!(
                        "{role} operand is not closed ({} open, {} non-manifold edges)",
                        report.boundary_edges, report.non_manifold_edges
                    ),
                ));
            }
        }
        Ok(())
    }

    fn to_polygons(mesh: &Mesh) -> Vec<Polygon> {
        (0..mesh.face_count())
            .filter_map(|f| Polygon::new(mesh.face_points(f).copied().collect()))
            .collect()
    }

    /// Split polygons into (may touch, cannot touch) `other_bb`.
    fn partition_polygons(
        &self,
        polygons: Vec<Polygon>,
        other_bb: &Aabb,
    ) -> (Vec<Polygon>, Vec<Polygon>) {
        let other_bb = other_bb.loosened(self.tolerance);
        polygons
            .into_iter()
            .partition(|p| p.bounding_box().intersects(&other_bb))
    }

    fn to_mesh(&self, op: &'static str, polygons: Vec<Polygon>) -> Result<Mesh> {
        let mut mesh = Mesh::new();
        for polygon in polygons {
            let indices = polygon
                .vertices
                .into_iter()
                .map(|p| mesh.push_vertex(p))
                .collect();
            mesh.push_face(indices);
        }
        mesh.weld_vertices(self.tolerance);
        mesh.heal_t_junctions(self.tolerance);

        if mesh.is_empty() {
            return Err(KeycapError::boolean(op, "result is empty"));
        }
        if mesh
            .vertices
            .iter()
            .any(|p| !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()))
        {
            return Err(KeycapError::boolean(op, "result has non-finite coordinates"));
        }

        let report = mesh.analyze_manifold();
        if !report.is_manifold {
            if self.require_manifold {
                return Err(KeycapError::boolean(
                    op,
                    format!(
                        "result is not closed ({} open, {} non-manifold edges)",
                        report.boundary_edges, report.non_manifold_edges
                    ),
                ));
            }
            warn!(
                op,
                boundary_edges = report.boundary_edges,
                non_manifold_edges = report.non_manifold_edges,
                "boolean result is not watertight"
            );
        }
        debug!(
            op,
            vertices = mesh.vertex_count(),
            faces = mesh.face_count(),
            "boolean result rebuilt"
        );
        Ok(mesh)
    }
}

impl BooleanEngine for BspEngine {
    #[instrument(skip_all, fields(a_faces = a.face_count(), b_faces = b.face_count()))]
    fn subtract(&self, a: &Mesh, b: &Mesh) -> Result<Mesh> {
        const OP: &str = "subtract";
        self.check_operand(OP, "left", a)?;
        self.check_operand(OP, "right", b)?;

        let (a_polys, b_polys) = (Self::to_polygons(a), Self::to_polygons(b));
        let mut a_solid = Node::from_polygons(a_polys.clone());
        a_solid.invert();
        let b_solid = Node::from_polygons(b_polys.clone());

        let (a_near, mut polygons) = self.partition_polygons(a_polys, &b.bounding_box());
        // Right-hand polygons beyond the left bounds lie outside it and are dropped
        let (b_near, _) = self.partition_polygons(b_polys, &a.bounding_box());

        let mut a = Node::from_polygons(a_near);
        let mut b = Node::from_polygons(b_near);
        a.invert();
        a.clip_to(&b_solid);
        b.clip_to(&a_solid);
        b.invert();
        b.clip_to(&a_solid);
        b.invert();
        a.build(b.all_polygons());
        a.invert();

        polygons.extend(a.all_polygons());
        self.to_mesh(OP, polygons)
    }

    #[instrument(skip_all, fields(a_faces = a.face_count(), b_faces = b.face_count()))]
    fn union(&self, a: &Mesh, b: &Mesh) -> Result<Mesh> {
        const OP: &str = "union";
        self.check_operand(OP, "left", a)?;
        self.check_operand(OP, "right", b)?;

        let (a_polys, b_polys) = (Self::to_polygons(a), Self::to_polygons(b));
        let a_solid = Node::from_polygons(a_polys.clone());
        let b_solid = Node::from_polygons(b_polys.clone());

        let (a_near, mut polygons) = self.partition_polygons(a_polys, &b.bounding_box());
        let (b_near, b_far) = self.partition_polygons(b_polys, &a.bounding_box());
        polygons.extend(b_far);

        let mut a = Node::from_polygons(a_near);
        let mut b = Node::from_polygons(b_near);
        a.clip_to(&b_solid);
        b.clip_to(&a_solid);
        b.invert();
        b.clip_to(&a_solid);
        b.invert();
        a.build(b.all_polygons());

        polygons.extend(a.all_polygons());
        self.to_mesh(OP, polygons)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::shapes;

    #[test]
    fn subtracting_a_through_hole_keeps_the_ring() {
        let block = shapes::prism(4.0, 4.0, 2.0, 0.0);
        let hole = shapes::prism(2.0, 2.0, 3.0, -0.5);
        let ring = BspEngine::strict().subtract(&block, &hole).unwrap();
        assert!((ring.volume() - (32.0 - 8.0)).abs() < 1e-6);
        assert!(ring.is_manifold());
    }

    #[test]
    fn union_of_overlapping_blocks() {
        let a = shapes::prism(2.0, 2.0, 2.0, 0.0);
        let b = shapes::prism(2.0, 2.0, 2.0, 0.0).translate(nalgebra::Vector3::new(1.0, 0.5, 0.5));
        let merged = BspEngine::new().union(&a, &b).unwrap();
        // 8 + 8 - overlap (1 x 1.5 x 1.5)
        assert!((merged.volume() - (16.0 - 2.25)).abs() < 1e-6);
    }

    #[test]
    fn faces_clear_of_the_other_operand_come_through_unsplit() {
        let a = shapes::prism(2.0, 2.0, 2.0, 0.0);
        let b = shapes::prism(2.0, 2.0, 2.0, 0.0).translate(nalgebra::Vector3::new(1.0, 0.5, 0.5));
        let merged = BspEngine::strict().union(&a, &b).unwrap();
        assert!(merged.is_manifold());

        // The left block's x = -1 side is out of reach of the right block
        let on_far_side: Vec<usize> = (0..merged.face_count())
            .filter(|&f| merged.face_points(f).all(|p| (p.x + 1.0).abs() < 1e-9))
            .collect();
        assert_eq!(on_far_side.len(), 1);
        let corners = [(-1.0, -1.0, 0.0), (-1.0, 1.0, 0.0), (-1.0, 1.0, 2.0), (-1.0, -1.0, 2.0)];
        for (x, y, z) in corners {
            assert!(merged.face_points(on_far_side[0]).any(|p| {
                (p.x - x).abs() < 1e-9 && (p.y - y).abs() < 1e-9 && (p.z - z).abs() < 1e-9
            }));
        }
    }

    #[test]
    fn subtraction_keeps_far_walls_whole() {
        let block = shapes::prism(4.0, 4.0, 2.0, 0.0);
        let hole = shapes::prism(2.0, 2.0, 3.0, -0.5);
        let ring = BspEngine::new().subtract(&block, &hole).unwrap();
        for x in [-2.0, 2.0] {
            let walls = (0..ring.face_count())
                .filter(|&f| ring.face_points(f).all(|p| (p.x - x).abs() < 1e-9))
                .count();
            assert_eq!(walls, 1);
        }
    }

    #[test]
    fn disjoint_subtraction_leaves_left_operand() {
        let a = shapes::prism(2.0, 2.0, 2.0, 0.0);
        let far = shapes::prism(1.0, 1.0, 1.0, 10.0);
        let result = BspEngine::new().subtract(&a, &far).unwrap();
        assert!((result.volume() - 8.0).abs() < 1e-9);
    }

    #[test]
    fn empty_results_and_operands_fail() {
        let a = shapes::prism(2.0, 2.0, 2.0, 0.0);
        let bigger = shapes::prism(4.0, 4.0, 4.0, -1.0);
        assert!(matches!(
            BspEngine::new().subtract(&a, &bigger),
            Err(KeycapError::BooleanOpFailed { op: "subtract", .. })
        ));
        assert!(BspEngine::new().union(&Mesh::new(), &a).is_err());
    }

    #[test]
    fn strict_engine_rejects_open_operands() {
        let mut open = shapes::prism(2.0, 2.0, 2.0, 0.0);
        open.faces.pop();
        let other = shapes::prism(1.0, 1.0, 1.0, 0.5);
        assert!(BspEngine::strict().union(&open, &other).is_err());
        assert!(BspEngine::new().union(&open, &other).is_ok());
    }
}
