//! Scalar type, tolerances and fixed keycap measurements.

use core::str::FromStr;
use std::sync::OnceLock;

// Our Real scalar type:
pub type Real = f64;

/// Lazily-initialized tolerance used for plane classification and vertex welding.
/// Defaults to `1e-5` mm, but can be overridden:
///  1) **Build-time**: set env var `KEYCAPGEN_TOLERANCE` (e.g. `KEYCAPGEN_TOLERANCE=1e-6 cargo build`)
///  2) **Runtime**: call [`set_tolerance`] once before generating anything
static TOLERANCE_CELL: OnceLock<Real> = OnceLock::new();

#[inline]
const fn default_tolerance() -> Real {
    1e-5
}

/// Returns the current tolerance value.
/// If not set yet, it tries `KEYCAPGEN_TOLERANCE` (parsed as `Real`) and
/// falls back to the default.
pub fn tolerance() -> Real {
    *TOLERANCE_CELL.get_or_init(|| {
        if let Some(environment_variable) = option_env!("KEYCAPGEN_TOLERANCE") {
            if let Ok(value) = Real::from_str(environment_variable) {
                return value.max(Real::EPSILON);
            }
        }
        default_tolerance()
    })
}

/// Set the tolerance programmatically once (subsequent calls are ignored).
pub fn set_tolerance(value: Real) {
    let _ = TOLERANCE_CELL.set(value.max(Real::EPSILON));
}

/// Archimedes' constant (π)
pub const PI: Real = core::f64::consts::PI;
/// The full circle constant (τ)
pub const TAU: Real = core::f64::consts::TAU;

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// Keycap measurements (mm)
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
pub const MM: Real = 1.0;
/// Width of one key unit (1U), the standard keyboard key pitch.
pub const UNIT_PITCH: Real = 18.0 * MM;
/// Keycaps only grow along X; depth is always one pitch.
pub const BASE_DEPTH: Real = 18.0 * MM;
/// Side and top wall thickness of the shell.
pub const WALL_THICKNESS: Real = 0.91 * MM;

/// Two vertices whose z differs by more than this are considered vertically apart.
pub const VERTICAL_TOLERANCE: Real = 1e-3;
/// A face whose normal z-component magnitude is below this is "not horizontal".
pub const HORIZONTAL_NORMAL_LIMIT: Real = 0.99;
