//! Capabilities the keycap pipeline consumes but does not implement itself.
//!
//! A host (CAD kernel, editor, mesh library) backs these; the crate ships a
//! BSP boolean engine and an edge-counting validator as defaults.

use crate::bevel::BevelSettings;
use crate::errors::Result;
use crate::keycap::Keycap;
use crate::mesh::Mesh;
use crate::mesh::edge::EdgeWeightMap;
use crate::mesh::manifold::ManifoldReport;

/// Boolean operations on closed solids.
///
/// Implementations must fail with
/// [`KeycapError::BooleanOpFailed`](crate::errors::KeycapError::BooleanOpFailed)
/// rather than return a broken mesh.
pub trait BooleanEngine {
    /// `a` minus `b`.
    fn subtract(&self, a: &Mesh, b: &Mesh) -> Result<Mesh>;

    /// `a` merged with `b` into one solid.
    fn union(&self, a: &Mesh, b: &Mesh) -> Result<Mesh>;
}

/// Weighted corner rounding. Only edges with a non-zero weight take part;
/// the weight scales the bevel width on that edge.
pub trait BevelEngine {
    fn weighted_bevel(
        &self,
        mesh: &Mesh,
        edge_weights: &EdgeWeightMap,
        settings: &BevelSettings,
    ) -> Result<Mesh>;
}

/// Triangulate/validate capability.
pub trait MeshValidator {
    fn validate(&self, mesh: &Mesh) -> Result<ManifoldReport>;
}

/// Receptacle for a finished keycap (viewport, exporter, document object).
///
/// The sink decides what happens to whatever it held before.
pub trait MeshSink {
    fn accept(&mut self, keycap: Keycap);
}

/// Validator that counts edge uses on the indexed mesh as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeCountValidator;

impl MeshValidator for EdgeCountValidator {
    fn validate(&self, mesh: &Mesh) -> Result<ManifoldReport> {
        Ok(mesh.analyze_manifold())
    }
}

/// Keeps only the most recent keycap, replacing the previous one.
impl MeshSink for Option<Keycap> {
    fn accept(&mut self, keycap: Keycap) {
        *self = Some(keycap);
    }
}

/// Keeps every keycap it is handed, oldest first.
impl MeshSink for Vec<Keycap> {
    fn accept(&mut self, keycap: Keycap) {
        self.push(keycap);
    }
}
