//! Merging the stem into the shell.

use crate::errors::Result;
use crate::mesh::Mesh;
use crate::traits::BooleanEngine;
use nalgebra::Vector3;
use tracing::{info, instrument};

pub struct FeatureCombiner;

impl FeatureCombiner {
    /// Union `stem` into `shell`, after moving the stem under the centre of
    /// the shell's footprint. The stem keeps its own z placement.
    #[instrument(skip_all, fields(shell_faces = shell.face_count(), stem_faces = stem.face_count()))]
    pub fn combine(shell: &Mesh, stem: &Mesh, engine: &dyn BooleanEngine) -> Result<Mesh> {
        let target = shell.bounding_box().center();
        let current = stem.bounding_box().center();
        let offset = Vector3::new(target.x - current.x, target.y - current.y, 0.0);
        let placed = stem.translate(offset);

        let combined = engine.union(shell, &placed)?;
        info!(
            vertices = combined.vertex_count(),
            faces = combined.face_count(),
            "stem combined into shell"
        );
        Ok(combined)
    }
}
