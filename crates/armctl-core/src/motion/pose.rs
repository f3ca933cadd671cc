//! Value types describing where the arm is and how closed the gripper is.

use std::fmt;

use crate::error::{ArmError, Result};

/// Number of components in a cartesian pose (x, y, z, yaw, pitch, roll).
pub const POSE_COMPONENTS: usize = 6;

/// A cartesian target: position followed by orientation.
///
/// Poses are plain values. Equality is component-wise, so two poses built
/// from the same numbers compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose([f64; POSE_COMPONENTS]);

impl Pose {
    pub const fn new(components: [f64; POSE_COMPONENTS]) -> Self {
        Self(components)
    }

    /// Builds a pose from an arbitrary slice, rejecting the wrong arity.
    pub fn from_slice(values: &[f64]) -> Result<Self> {
        let components: [f64; POSE_COMPONENTS] = values.try_into().map_err(|_| {
            ArmError::parse(format!(
                "a pose needs exactly {} numbers, got {}",
                POSE_COMPONENTS,
                values.len()
            ))
        })?;
        if components.iter().any(|c| !c.is_finite()) {
            return Err(ArmError::parse("pose components must be finite numbers"));
        }
        Ok(Self(components))
    }

    pub fn components(&self) -> &[f64; POSE_COMPONENTS] {
        &self.0
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_joined(f, &self.0)
    }
}

/// Normalized gripper closure: 0.0 is fully open, 1.0 fully closed.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct GripLevel(f64);

impl GripLevel {
    pub const OPEN: GripLevel = GripLevel(0.0);
    pub const CLOSED: GripLevel = GripLevel(1.0);

    /// Creates a grip level, rejecting values outside `[0, 1]`.
    pub fn new(level: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&level) {
            return Err(ArmError::parse(format!(
                "grip level must be between 0 and 1, got {}",
                level
            )));
        }
        Ok(Self(level))
    }

    /// Creates a grip level, clamping into `[0, 1]`.
    pub fn clamped(level: f64) -> Self {
        if level.is_nan() {
            return Self::OPEN;
        }
        Self(level.clamp(0.0, 1.0))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Shifts the level by `delta`, saturating at the open and closed ends.
    pub fn adjusted(&self, delta: f64) -> Self {
        // Round to 1e-9 so repeated 0.1 steps land on 0.3 rather than 0.30000000000000004.
        Self::clamped(((self.0 + delta) * 1e9).round() / 1e9)
    }
}

impl fmt::Display for GripLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Joint positions as reported by the controller (`wherej`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JointAngles(pub Vec<f64>);

impl fmt::Display for JointAngles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_joined(f, &self.0)
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, values: &[f64]) -> fmt::Result {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{}", value)?;
    }
    Ok(())
}
