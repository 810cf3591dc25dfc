//! BSP tree over convex polygons.
//!
//! Every routine walks the tree with an explicit stack, so deep trees built
//! from finely tessellated cylinders cannot overflow the call stack.

use crate::bsp::plane::{BACK, COPLANAR, FRONT, Plane};
use crate::bsp::polygon::Polygon;
use crate::float_types::Real;

/// A BSP node: a splitting plane, the polygons lying on it, and the two
/// half-space subtrees. A node without a plane is empty.
#[derive(Debug, Clone, Default)]
pub struct Node {
    pub plane: Option<Plane>,
    pub front: Option<Box<Node>>,
    pub back: Option<Box<Node>>,
    pub polygons: Vec<Polygon>,
}

impl Node {
    pub const fn new() -> Self {
        Node {
            plane: None,
            front: None,
            back: None,
            polygons: Vec::new(),
        }
    }

    pub fn from_polygons(polygons: Vec<Polygon>) -> Self {
        let mut node = Self::new();
        node.build(polygons);
        node
    }

    /// Swap solid and empty space.
    pub fn invert(&mut self) {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            node.polygons.iter_mut().for_each(Polygon::flip);
            if let Some(plane) = node.plane.as_mut() {
                plane.flip();
            }
            std::mem::swap(&mut node.front, &mut node.back);
            if let Some(front) = node.front.as_mut() {
                stack.push(front);
            }
            if let Some(back) = node.back.as_mut() {
                stack.push(back);
            }
        }
    }

    /// Candidate plane that cuts the fewest polygons while keeping the two
    /// sides balanced. Samples the first polygons' planes only.
    fn pick_splitting_plane(polygons: &[Polygon]) -> Plane {
        const K_SPANS: Real = 8.0;
        const K_BALANCE: Real = 1.0;
        const SAMPLE: usize = 20;

        let mut best_plane = polygons[0].plane;
        let mut best_score = Real::MAX;
        for candidate in polygons.iter().take(SAMPLE) {
            let plane = candidate.plane;
            let (mut front, mut back, mut spanning) = (0i64, 0i64, 0i64);
            for polygon in polygons {
                match plane.classify_polygon(polygon) {
                    COPLANAR => {},
                    FRONT => front += 1,
                    BACK => back += 1,
                    _ => spanning += 1,
                }
            }
            let score = K_SPANS * spanning as Real + K_BALANCE * (front - back).abs() as Real;
            if score < best_score {
                best_score = score;
                best_plane = plane;
            }
        }
        best_plane
    }

    /// Insert `polygons` into the tree, splitting them as needed.
    pub fn build(&mut self, polygons: Vec<Polygon>) {
        let mut stack = vec![(self, polygons)];
        while let Some((node, polys)) = stack.pop() {
            if polys.is_empty() {
                continue;
            }
            let plane = *node
                .plane
                .get_or_insert_with(|| Self::pick_splitting_plane(&polys));

            let mut front = Vec::with_capacity(polys.len() / 2);
            let mut back = Vec::with_capacity(polys.len() / 2);
            for polygon in &polys {
                let (coplanar_front, coplanar_back, front_parts, back_parts) =
                    plane.split_polygon(polygon);
                node.polygons.extend(coplanar_front);
                node.polygons.extend(coplanar_back);
                front.extend(front_parts);
                back.extend(back_parts);
            }

            if !front.is_empty() {
                let child = node.front.get_or_insert_with(Box::default);
                stack.push((child, front));
            }
            if !back.is_empty() {
                let child = node.back.get_or_insert_with(Box::default);
                stack.push((child, back));
            }
        }
    }

    /// The parts of `polygons` that lie outside the solid this tree bounds.
    pub fn clip_polygons(&self, polygons: Vec<Polygon>) -> Vec<Polygon> {
        let mut result = Vec::new();
        let mut stack = vec![(self, polygons)];

        while let Some((node, polys)) = stack.pop() {
            let Some(plane) = node.plane else {
                result.extend(polys);
                continue;
            };

            let mut front = Vec::with_capacity(polys.len());
            let mut back = Vec::with_capacity(polys.len());
            for polygon in &polys {
                let (coplanar_front, coplanar_back, front_parts, back_parts) =
                    plane.split_polygon(polygon);
                front.extend(coplanar_front);
                front.extend(front_parts);
                back.extend(coplanar_back);
                back.extend(back_parts);
            }

            match &node.front {
                Some(child) => stack.push((child, front)),
                None => result.extend(front),
            }
            // Back of a leaf plane is solid: those parts are dropped
            if let Some(child) = &node.back {
                stack.push((child, back));
            }
        }
        result
    }

    /// Remove every polygon of this tree that lies inside `other`.
    pub fn clip_to(&mut self, other: &Node) {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            let polygons = std::mem::take(&mut node.polygons);
            node.polygons = other.clip_polygons(polygons);
            if let Some(front) = node.front.as_mut() {
                stack.push(front);
            }
            if let Some(back) = node.back.as_mut() {
                stack.push(back);
            }
        }
    }

    pub fn all_polygons(&self) -> Vec<Polygon> {
        let mut result = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            result.extend_from_slice(&node.polygons);
            stack.extend(node.front.as_deref());
            stack.extend(node.back.as_deref());
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn unit_cube_polygons(offset: [Real; 3]) -> Vec<Polygon> {
        let c = |x: Real, y: Real, z: Real| Point3::new(x + offset[0], y + offset[1], z + offset[2]);
        let quads = [
            [c(0., 0., 0.), c(0., 1., 0.), c(1., 1., 0.), c(1., 0., 0.)],
            [c(0., 0., 1.), c(1., 0., 1.), c(1., 1., 1.), c(0., 1., 1.)],
            [c(0., 0., 0.), c(1., 0., 0.), c(1., 0., 1.), c(0., 0., 1.)],
            [c(0., 1., 0.), c(0., 1., 1.), c(1., 1., 1.), c(1., 1., 0.)],
            [c(0., 0., 0.), c(0., 0., 1.), c(0., 1., 1.), c(0., 1., 0.)],
            [c(1., 0., 0.), c(1., 1., 0.), c(1., 1., 1.), c(1., 0., 1.)],
        ];
        quads
            .into_iter()
            .filter_map(|q| Polygon::new(q.to_vec()))
            .collect()
    }

    #[test]
    fn tree_keeps_every_polygon() {
        let node = Node::from_polygons(unit_cube_polygons([0.0; 3]));
        assert_eq!(node.all_polygons().len(), 6);
    }

    #[test]
    fn clipping_removes_interior_parts() {
        let solid = Node::from_polygons(unit_cube_polygons([0.0; 3]));
        let clipped = solid.clip_polygons(unit_cube_polygons([0.5, 0.25, 0.25]));
        assert!(!clipped.is_empty());
        for polygon in &clipped {
            let n = polygon.vertices.len() as Real;
            let centroid = polygon
                .vertices
                .iter()
                .fold(Point3::origin(), |acc, p| acc + p.coords / n);
            let strictly_inside = (0..3).all(|i| centroid[i] > 1e-6 && centroid[i] < 1.0 - 1e-6);
            assert!(!strictly_inside, "kept interior part at {centroid:?}");
        }
    }

    #[test]
    fn double_inversion_restores_orientation() {
        let mut node = Node::from_polygons(unit_cube_polygons([0.0; 3]));
        let before = node.all_polygons();
        node.invert();
        node.invert();
        let after = node.all_polygons();
        assert_eq!(before.len(), after.len());
        for polygon in &after {
            assert!(before.contains(polygon));
        }
    }
}
