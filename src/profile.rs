//! Keycap profile families and their per-row dimensions.

use crate::errors::KeycapError;
use crate::float_types::Real;
use std::fmt;
use std::str::FromStr;

/// A keycap shape family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProfileType {
    /// Low, sculpted
    #[default]
    Cherry,
    /// Medium height, sculpted
    Oem,
    /// Tall
    Sa,
}

impl ProfileType {
    pub const ALL: [ProfileType; 3] = [ProfileType::Cherry, ProfileType::Oem, ProfileType::Sa];

    pub const fn name(self) -> &'static str {
        match self {
            ProfileType::Cherry => "CHERRY",
            ProfileType::Oem => "OEM",
            ProfileType::Sa => "SA",
        }
    }

    /// Top-face inset, front taper and heights for rows 1 to 4.
    const fn table(self) -> (Real, Real, [Real; 4]) {
        match self {
            ProfileType::Cherry => (5.5, 3.4, [11.5, 9.5, 8.5, 9.5]),
            ProfileType::Oem => (3.0, 3.0, [12.5, 11.0, 9.5, 10.5]),
            ProfileType::Sa => (2.5, 2.5, [14.89, 13.49, 12.925, 13.49]),
        }
    }
}

impl fmt::Display for ProfileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProfileType {
    type Err = KeycapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CHERRY" => Ok(ProfileType::Cherry),
            "OEM" => Ok(ProfileType::Oem),
            "SA" => Ok(ProfileType::Sa),
            _ => Err(KeycapError::InvalidProfile(s.to_string())),
        }
    }
}

/// Row used when the requested row is not 1 to 4.
pub const FALLBACK_ROW: u8 = 3;

/// Dimensions a profile/row pair resolves to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileDimensions {
    /// How much narrower the top face is than the base (mm)
    pub top_width_delta: Real,
    /// How far the front edge of the top face is pulled toward the back (mm)
    pub front_taper: Real,
    /// Keycap height from the base plane (mm)
    pub height: Real,
}

/// Resolve `profile` and `row` to keycap dimensions.
///
/// Rows outside 1 to 4 take row 3's height; that fallback is intentional,
/// a row never fails to resolve.
pub const fn lookup(profile: ProfileType, row: u8) -> ProfileDimensions {
    let (top_width_delta, front_taper, heights) = profile.table();
    let row = match row {
        1..=4 => row,
        _ => FALLBACK_ROW,
    };
    ProfileDimensions {
        top_width_delta,
        front_taper,
        height: heights[(row - 1) as usize],
    }
}

/// String-keyed lookup for callers holding raw user input.
pub fn lookup_named(profile: &str, row: u8) -> Result<ProfileDimensions, KeycapError> {
    Ok(lookup(profile.parse()?, row))
}
