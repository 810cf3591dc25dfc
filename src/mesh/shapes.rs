//! Closed primitive solids standing on the Z axis.

use crate::float_types::{Real, TAU};
use crate::mesh::Mesh;
use nalgebra::Point3;

/// Extrude a convex, counter-clockwise XY outline straight up from `z_offset`
/// by `height`.
///
/// Vertex layout: bottom ring `0..n`, top ring `n..2n`. Faces: bottom cap
/// (normal -Z), top cap (normal +Z), then one quad per outline edge.
pub fn extrude_outline(outline: &[[Real; 2]], height: Real, z_offset: Real) -> Mesh {
    let n = outline.len();
    let mut mesh = Mesh::new();

    for &[x, y] in outline {
        mesh.push_vertex(Point3::new(x, y, z_offset));
    }
    for &[x, y] in outline {
        mesh.push_vertex(Point3::new(x, y, z_offset + height));
    }

    // Bottom cap (clockwise from above => normal points down)
    mesh.push_face((0..n).rev().collect());
    // Top cap (counter-clockwise from above)
    mesh.push_face((n..2 * n).collect());

    for i in 0..n {
        let next_i = (i + 1) % n;
        mesh.push_face(vec![i, next_i, n + next_i, n + i]);
    }
    mesh
}

/// Axis-aligned box centered on the Z axis: `width` along X, `depth` along Y.
pub fn prism(width: Real, depth: Real, height: Real, z_offset: Real) -> Mesh {
    let (hx, hy) = (width / 2.0, depth / 2.0);
    extrude_outline(
        &[[-hx, -hy], [hx, -hy], [hx, hy], [-hx, hy]],
        height,
        z_offset,
    )
}

/// Faceted cylinder on the Z axis with `segments` sides. The first ring
/// vertex sits on +X.
pub fn cylinder(radius: Real, height: Real, segments: usize, z_offset: Real) -> Mesh {
    let segments = segments.max(3);
    let outline: Vec<[Real; 2]> = (0..segments)
        .map(|i| {
            let angle = (i as Real / segments as Real) * TAU;
            [angle.cos() * radius, angle.sin() * radius]
        })
        .collect();
    extrude_outline(&outline, height, z_offset)
}

/// Cross-sectional area of the regular polygon [`cylinder`] uses.
pub fn polygon_area(radius: Real, segments: usize) -> Real {
    let segments = segments.max(3) as Real;
    0.5 * segments * radius * radius * (TAU / segments).sin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prism_volume_and_bounds() {
        let prism = prism(2.0, 3.0, 4.0, -1.0);
        assert_eq!(prism.vertex_count(), 8);
        assert_eq!(prism.face_count(), 6);
        assert!((prism.volume() - 24.0).abs() < 1e-12);

        let bb = prism.bounding_box();
        assert_eq!(bb.mins, Point3::new(-1.0, -1.5, -1.0));
        assert_eq!(bb.maxs, Point3::new(1.0, 1.5, 3.0));
    }

    #[test]
    fn cylinder_volume_matches_polygon_area() {
        let cylinder = cylinder(2.8, 8.0, 64, 0.0);
        assert_eq!(cylinder.vertex_count(), 128);
        assert_eq!(cylinder.face_count(), 66);
        assert!((cylinder.volume() - polygon_area(2.8, 64) * 8.0).abs() < 1e-9);
        assert!(cylinder.is_manifold());
    }
}
