//! Keycap generation errors

use crate::float_types::Real;

/// All the ways a keycap generation can fail.
///
/// Every pipeline stage validates its own inputs and fails fast; nothing is
/// retried and no partial mesh is ever returned alongside an error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KeycapError {
    /// (InvalidProfile) The profile family is not one of CHERRY, OEM or SA
    #[error("(InvalidProfile) unknown profile family `{0}`")]
    InvalidProfile(String),

    /// (DegenerateProfile) A computed dimension collapsed to zero or below
    #[error("(DegenerateProfile) {what} is {value} mm, must be positive")]
    DegenerateProfile { what: &'static str, value: Real },

    /// (BooleanOpFailed) The boolean capability rejected or broke the geometry
    #[error("(BooleanOpFailed) {op} failed: {reason}")]
    BooleanOpFailed { op: &'static str, reason: String },

    /// (UnsupportedStemType) The stem type is not CHERRY_MX or NONE
    #[error("(UnsupportedStemType) unknown stem type `{0}`")]
    UnsupportedStemType(String),

    /// (BevelFailed) The weighted-bevel capability failed
    #[error("(BevelFailed) {0}")]
    BevelFailed(String),

    /// (InvalidWidth) The unit width is not a finite positive number
    #[error("(InvalidWidth) width of {0} units is not a finite positive number")]
    InvalidWidth(Real),
}

impl KeycapError {
    /// Shorthand for a [`KeycapError::BooleanOpFailed`].
    pub fn boolean(op: &'static str, reason: impl Into<String>) -> Self {
        KeycapError::BooleanOpFailed {
            op,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, KeycapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_the_offending_value() {
        let err = KeycapError::InvalidProfile("DSA".into());
        assert_eq!(err.to_string(), "(InvalidProfile) unknown profile family `DSA`");

        let err = KeycapError::DegenerateProfile {
            what: "top width",
            value: -1.5,
        };
        assert!(err.to_string().contains("-1.5"));

        let err = KeycapError::boolean("union", "empty result");
        assert_eq!(err.to_string(), "(BooleanOpFailed) union failed: empty result");
    }
}
