//! Level-catalog and configuration error types.
//!
//! Flight outcomes (crash, missed goal) are state transitions, not errors;
//! the only explicit failure surface is the data boundary: a level catalog or
//! config file that describes an unplayable game. Loaders report these through
//! [`LevelError`] and fall back to compiled defaults instead of panicking.

use std::fmt;

/// Errors produced while validating a level catalog or flight config.
#[derive(Debug)]
pub enum LevelError {
    /// The catalog contains no levels at all.
    EmptyCatalog,

    /// A level has no launch pad, so the craft has nowhere to start.
    MissingLaunchPad {
        /// Zero-based index of the offending level.
        level: usize,
    },

    /// A level has no goal pad, so it can never be completed.
    MissingGoalPad {
        /// Zero-based index of the offending level.
        level: usize,
    },

    /// A surface was declared with a zero or negative half-extent.
    NonPositiveExtent {
        level: usize,
        /// Index of the surface within the level's surface list.
        surface: usize,
    },

    /// An oscillating surface was declared with a zero or negative period.
    NonPositivePeriod {
        level: usize,
        surface: usize,
    },

    /// A requested start level does not exist in the catalog.
    StartIndexOutOfRange {
        index: usize,
        len: usize,
    },

    /// A flight-config value is outside its safe operating range.
    UnsafeConfigValue {
        /// Name of the field (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::EmptyCatalog => write!(f, "level catalog is empty"),
            LevelError::MissingLaunchPad { level } => {
                write!(f, "level {} has no launch pad", level)
            }
            LevelError::MissingGoalPad { level } => {
                write!(f, "level {} has no goal pad", level)
            }
            LevelError::NonPositiveExtent { level, surface } => write!(
                f,
                "level {} surface {} has a non-positive half-extent",
                level, surface
            ),
            LevelError::NonPositivePeriod { level, surface } => write!(
                f,
                "level {} surface {} oscillates with a non-positive period",
                level, surface
            ),
            LevelError::StartIndexOutOfRange { index, len } => write!(
                f,
                "start level {} out of range for a catalog of {} levels",
                index, len
            ),
            LevelError::UnsafeConfigValue {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "config value '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
        }
    }
}

impl std::error::Error for LevelError {}

/// Convenience alias: a `Result` using `LevelError` as the error type.
pub type LevelResult<T> = Result<T, LevelError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error if `main_thrust` cannot lift the craft in principle.
///
/// A non-positive thrust leaves the craft glued to the pad forever.
pub fn validate_main_thrust(value: f32) -> LevelResult<()> {
    if value <= 0.0 {
        Err(LevelError::UnsafeConfigValue {
            name: "main_thrust",
            value,
            safe_range: "(0.0, ∞)",
        })
    } else {
        Ok(())
    }
}

/// Returns an error if `level_load_delay` is negative.
///
/// Zero is allowed (instant transitions, useful for debugging); a negative
/// delay would make the transition timer finish before it starts.
pub fn validate_level_load_delay(value: f32) -> LevelResult<()> {
    if value < 0.0 {
        Err(LevelError::UnsafeConfigValue {
            name: "level_load_delay",
            value,
            safe_range: "[0.0, ∞)",
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thrust_validator_rejects_non_positive() {
        assert!(validate_main_thrust(0.0).is_err());
        assert!(validate_main_thrust(-5.0).is_err());
        assert!(validate_main_thrust(1.0).is_ok());
    }

    #[test]
    fn delay_validator_allows_zero() {
        assert!(validate_level_load_delay(0.0).is_ok());
        assert!(validate_level_load_delay(2.0).is_ok());
        assert!(validate_level_load_delay(-0.1).is_err());
    }
}
