//! Test support library
//! Provides helpers and stand-in capabilities for the integration tests.

#![allow(dead_code)]

use keycapgen::{
    BevelEngine, BevelSettings, BooleanEngine, EdgeWeightMap, KeycapError, Mesh,
    float_types::Real,
};
use std::cell::RefCell;

/// Returns the bounding box `[min_x, min_y, min_z, max_x, max_y, max_z]` of a mesh.
pub fn bounding_box(mesh: &Mesh) -> [Real; 6] {
    let aabb = mesh.bounding_box();
    [
        aabb.mins.x,
        aabb.mins.y,
        aabb.mins.z,
        aabb.maxs.x,
        aabb.maxs.y,
        aabb.maxs.z,
    ]
}

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// Total length of the edges in `weights` with a non-zero weight.
pub fn weighted_length(mesh: &Mesh, weights: &EdgeWeightMap) -> Real {
    weights
        .weighted_edges()
        .iter()
        .map(|(edge, _)| {
            let (a, b) = edge.endpoints();
            (mesh.vertices[a] - mesh.vertices[b]).norm()
        })
        .sum()
}

/// Bevel engine that records what it was asked to do and returns the mesh unchanged.
#[derive(Default)]
pub struct RecordingBevel {
    pub calls: RefCell<Vec<(usize, BevelSettings)>>,
}

impl BevelEngine for RecordingBevel {
    fn weighted_bevel(
        &self,
        mesh: &Mesh,
        edge_weights: &EdgeWeightMap,
        settings: &BevelSettings,
    ) -> Result<Mesh, KeycapError> {
        self.calls
            .borrow_mut()
            .push((edge_weights.weighted_edges().len(), *settings));
        Ok(mesh.clone())
    }
}

/// Boolean engine whose every operation fails.
pub struct FailingBoolean;

impl BooleanEngine for FailingBoolean {
    fn subtract(&self, _a: &Mesh, _b: &Mesh) -> Result<Mesh, KeycapError> {
        Err(KeycapError::boolean("subtract", "solver gave up"))
    }

    fn union(&self, _a: &Mesh, _b: &Mesh) -> Result<Mesh, KeycapError> {
        Err(KeycapError::boolean("union", "solver gave up"))
    }
}
