//! Keycap parameters, the assembly pipeline and its result.
//!
//! [`KeycapAssembler`] runs profile lookup, shell construction, bevel
//! weighting and (unless the stem is `None`) stem construction and union.
//! Every call starts from scratch and returns a new [`Keycap`]; nothing is
//! mutated after it is handed out.

use crate::bevel::{BevelSettings, BevelWeighting};
use crate::combine::FeatureCombiner;
use crate::errors::Result;
use crate::float_types::{Real, tolerance};
use crate::mesh::Mesh;
use crate::mesh::edge::EdgeWeightMap;
use crate::mesh::manifold::ManifoldReport;
use crate::profile::{self, ProfileType};
use crate::shell::{ShellBuilder, ShellDimensions, ShellEdges};
use crate::stem::{StemFeatureBuilder, StemType};
use crate::traits::{BevelEngine, BooleanEngine, EdgeCountValidator, MeshSink, MeshValidator};
use std::fmt;
use tracing::{debug, info, instrument, warn};

/// Standard key widths found on common layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyWidth {
    #[default]
    Alpha,
    Modifier,
    Tab,
    CapsLock,
    Backspace,
    Enter,
    RightShift,
    Spacebar6,
    Spacebar625,
    Spacebar7,
}

impl KeyWidth {
    pub const ALL: [KeyWidth; 10] = [
        KeyWidth::Alpha,
        KeyWidth::Modifier,
        KeyWidth::Tab,
        KeyWidth::CapsLock,
        KeyWidth::Backspace,
        KeyWidth::Enter,
        KeyWidth::RightShift,
        KeyWidth::Spacebar6,
        KeyWidth::Spacebar625,
        KeyWidth::Spacebar7,
    ];

    /// Width in key units.
    pub const fn units(self) -> Real {
        match self {
            KeyWidth::Alpha => 1.0,
            KeyWidth::Modifier => 1.25,
            KeyWidth::Tab => 1.5,
            KeyWidth::CapsLock => 1.75,
            KeyWidth::Backspace => 2.0,
            KeyWidth::Enter => 2.25,
            KeyWidth::RightShift => 2.75,
            KeyWidth::Spacebar6 => 6.0,
            KeyWidth::Spacebar625 => 6.25,
            KeyWidth::Spacebar7 => 7.0,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            KeyWidth::Alpha => "1U - Alphas",
            KeyWidth::Modifier => "1.25U - Modifiers",
            KeyWidth::Tab => "1.5U - Tab",
            KeyWidth::CapsLock => "1.75U - Caps Lock",
            KeyWidth::Backspace => "2U - Backspace",
            KeyWidth::Enter => "2.25U - Enter/Shift",
            KeyWidth::RightShift => "2.75U - Right Shift",
            KeyWidth::Spacebar6 => "6U - Spacebar",
            KeyWidth::Spacebar625 => "6.25U - Spacebar",
            KeyWidth::Spacebar7 => "7U - Spacebar",
        }
    }

    /// The standard width of exactly `units`, if there is one.
    pub fn from_units(units: Real) -> Option<KeyWidth> {
        Self::ALL.into_iter().find(|w| w.units() == units)
    }
}

impl fmt::Display for KeyWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<KeyWidth> for Real {
    fn from(width: KeyWidth) -> Real {
        width.units()
    }
}

/// Everything a keycap is generated from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeycapSpec {
    /// Width in key units (1U = 18 mm)
    pub width: Real,
    pub profile: ProfileType,
    /// Profile row, 1 (top) to 4 (bottom); other rows use row 3
    pub row: u8,
    /// Bevel radius in mm, clamped to `[0, 2]` when the keycap is built
    pub bevel_radius: Real,
    pub stem: StemType,
}

impl Default for KeycapSpec {
    fn default() -> Self {
        KeycapSpec {
            width: KeyWidth::Alpha.units(),
            profile: ProfileType::Cherry,
            row: profile::FALLBACK_ROW,
            bevel_radius: 1.5,
            stem: StemType::CherryMx,
        }
    }
}

impl KeycapSpec {
    /// Spec from raw user input; profile and stem names are parsed
    /// case-insensitively.
    pub fn from_strs(
        width: Real,
        profile: &str,
        row: u8,
        bevel_radius: Real,
        stem: &str,
    ) -> Result<Self> {
        Ok(KeycapSpec {
            width,
            profile: profile.parse()?,
            row,
            bevel_radius,
            stem: stem.parse()?,
        })
    }
}

/// Pipeline stages, in the order they are reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AssemblyState {
    Empty,
    ShellBuilt,
    Weighted,
    StemBuilt,
    Combined,
    Done,
}

impl AssemblyState {
    /// Whether `next` may directly follow `self`.
    pub const fn can_advance_to(self, next: AssemblyState) -> bool {
        use AssemblyState::*;
        matches!(
            (self, next),
            (Empty, ShellBuilt)
                | (ShellBuilt, Weighted)
                | (Weighted, StemBuilt)
                | (Weighted, Done)
                | (StemBuilt, Combined)
                | (Combined, Done)
        )
    }
}

/// A generated keycap.
///
/// `edge_weights` index into `mesh`; they are meant for a weighted bevel
/// applied after assembly, so `mesh` itself is still sharp-edged.
#[derive(Debug, Clone)]
pub struct Keycap {
    pub spec: KeycapSpec,
    pub mesh: Mesh,
    pub edge_weights: EdgeWeightMap,
    pub bevel: BevelSettings,
    pub dimensions: ShellDimensions,
    pub manifold: ManifoldReport,
    /// Stages the assembler went through, ending in `Done`
    pub states: Vec<AssemblyState>,
}

impl Keycap {
    /// Same geometry with a different bevel radius.
    pub fn with_bevel_radius(&self, radius: Real) -> Keycap {
        Keycap {
            spec: KeycapSpec {
                bevel_radius: radius,
                ..self.spec
            },
            bevel: self.bevel.with_radius(radius),
            ..self.clone()
        }
    }

    pub fn has_stem(&self) -> bool {
        self.states.contains(&AssemblyState::StemBuilt)
    }

    /// Apply the weighted bevel and return the resulting plain mesh.
    pub fn bake(&self, engine: &dyn BevelEngine) -> Result<Mesh> {
        engine.weighted_bevel(&self.mesh, &self.edge_weights, &self.bevel)
    }
}

/// Runs the keycap pipeline once.
pub struct KeycapAssembler<'a> {
    engine: &'a dyn BooleanEngine,
    validator: &'a dyn MeshValidator,
    shell_builder: ShellBuilder,
    stem_builder: StemFeatureBuilder,
    state: AssemblyState,
    history: Vec<AssemblyState>,
}

impl<'a> KeycapAssembler<'a> {
    pub fn new(engine: &'a dyn BooleanEngine) -> Self {
        KeycapAssembler {
            engine,
            validator: &EdgeCountValidator,
            shell_builder: ShellBuilder::new(),
            stem_builder: StemFeatureBuilder::new(),
            state: AssemblyState::Empty,
            history: vec![AssemblyState::Empty],
        }
    }

    pub fn with_validator(mut self, validator: &'a dyn MeshValidator) -> Self {
        self.validator = validator;
        self
    }

    pub const fn with_shell_builder(mut self, shell_builder: ShellBuilder) -> Self {
        self.shell_builder = shell_builder;
        self
    }

    pub const fn with_stem_builder(mut self, stem_builder: StemFeatureBuilder) -> Self {
        self.stem_builder = stem_builder;
        self
    }

    pub const fn state(&self) -> AssemblyState {
        self.state
    }

    fn advance(&mut self, next: AssemblyState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal transition {:?} -> {next:?}",
            self.state
        );
        debug!(from = ?self.state, to = ?next, "assembly state");
        self.state = next;
        self.history.push(next);
    }

    /// Build the keycap described by `spec`.
    ///
    /// Any failing stage aborts the whole run; no partial keycap is returned.
    #[instrument(skip(self), fields(profile = %spec.profile, stem = %spec.stem))]
    pub fn assemble(mut self, spec: &KeycapSpec) -> Result<Keycap> {
        let dims = profile::lookup(spec.profile, spec.row);
        let shell = self.shell_builder.build(spec.width, &dims)?;
        self.advance(AssemblyState::ShellBuilt);

        let ShellEdges {
            top_rim,
            corner,
            inner_vertical,
        } = &shell.edges;
        let mut shell_weights = BevelWeighting::assign(&shell.mesh, corner, top_rim);
        for &edge in inner_vertical {
            shell_weights.select(edge);
        }
        self.advance(AssemblyState::Weighted);

        let stem = self
            .stem_builder
            .build(spec.stem, shell.dimensions.height, self.engine)?;

        let (mesh, edge_weights) = match stem {
            Some(stem) => {
                self.advance(AssemblyState::StemBuilt);
                let combined = FeatureCombiner::combine(&shell.mesh, &stem, self.engine)?;
                self.advance(AssemblyState::Combined);
                let weights =
                    BevelWeighting::transfer(&shell.mesh, &shell_weights, &combined, tolerance());
                (combined, weights)
            },
            None => (shell.mesh, shell_weights),
        };

        let manifold = self.validator.validate(&mesh)?;
        if !manifold.is_manifold {
            warn!(
                boundary_edges = manifold.boundary_edges,
                non_manifold_edges = manifold.non_manifold_edges,
                "keycap mesh is not watertight"
            );
        }
        self.advance(AssemblyState::Done);

        info!(
            width = spec.width,
            row = spec.row,
            vertices = mesh.vertex_count(),
            faces = mesh.face_count(),
            weighted_edges = edge_weights.weighted_edges().len(),
            "keycap assembled"
        );
        Ok(Keycap {
            spec: *spec,
            mesh,
            edge_weights,
            bevel: BevelSettings::new(spec.bevel_radius),
            dimensions: shell.dimensions,
            manifold,
            states: self.history,
        })
    }
}

/// Generate a fresh keycap for `spec` and hand it to `sink`.
///
/// On error `sink` is left untouched, so whatever it showed before stays.
#[instrument(skip(engine, sink))]
pub fn regenerate(
    spec: &KeycapSpec,
    engine: &dyn BooleanEngine,
    sink: &mut dyn MeshSink,
) -> Result<()> {
    let keycap = KeycapAssembler::new(engine).assemble(spec)?;
    sink.accept(keycap);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_and_labels() {
        assert_eq!(KeyWidth::ALL.len(), 10);
        assert_eq!(KeyWidth::Spacebar625.units(), 6.25);
        assert_eq!(KeyWidth::Enter.to_string(), "2.25U - Enter/Shift");
        assert_eq!(KeyWidth::from_units(1.75), Some(KeyWidth::CapsLock));
        assert_eq!(KeyWidth::from_units(3.0), None);
        assert_eq!(Real::from(KeyWidth::Spacebar7), 7.0);
    }

    #[test]
    fn default_spec() {
        let spec = KeycapSpec::default();
        assert_eq!(spec.width, 1.0);
        assert_eq!(spec.profile, ProfileType::Cherry);
        assert_eq!(spec.row, 3);
        assert_eq!(spec.bevel_radius, 1.5);
        assert_eq!(spec.stem, StemType::CherryMx);
    }

    #[test]
    fn spec_from_user_strings() {
        let spec = KeycapSpec::from_strs(2.25, "oem", 1, 0.5, "none").unwrap();
        assert_eq!(spec.profile, ProfileType::Oem);
        assert_eq!(spec.stem, StemType::None);
        assert!(KeycapSpec::from_strs(1.0, "DSA", 1, 0.5, "NONE").is_err());
        assert!(KeycapSpec::from_strs(1.0, "SA", 1, 0.5, "ALPS").is_err());
    }

    #[test]
    fn transitions_only_move_forward() {
        use AssemblyState::*;
        assert!(Weighted.can_advance_to(Done));
        assert!(Weighted.can_advance_to(StemBuilt));
        assert!(!Done.can_advance_to(Empty));
        assert!(!ShellBuilt.can_advance_to(Combined));
        assert!(!Combined.can_advance_to(Combined));
    }
}
