//! Gripper servo abstraction.
//!
//! The gripper is a position servo. A normalized [`GripLevel`] maps linearly
//! onto servo goal positions between the calibrated open and closed ends.

use armctl_core::error::Result;
use armctl_core::motion::GripLevel;
use armctl_infrastructure::dto::GripperConfig;
use tracing::debug;

/// A servo that can be driven to a goal position.
pub trait GripperServo {
    fn set_goal_position(&mut self, position: u16) -> Result<()>;

    fn goal_position(&mut self) -> Result<u16>;
}

/// Servo positions at the two ends of travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServoCalibration {
    pub open: u16,
    pub closed: u16,
}

impl Default for ServoCalibration {
    fn default() -> Self {
        Self::from(&GripperConfig::default())
    }
}

impl From<&GripperConfig> for ServoCalibration {
    fn from(config: &GripperConfig) -> Self {
        Self {
            open: config.open_position,
            closed: config.closed_position,
        }
    }
}

impl ServoCalibration {
    pub fn position_for(&self, level: GripLevel) -> u16 {
        let open = f64::from(self.open);
        let closed = f64::from(self.closed);
        (open + (closed - open) * level.value()).round() as u16
    }

    /// Inverse of [`position_for`](Self::position_for), clamped to `[0, 1]`.
    pub fn level_for(&self, position: u16) -> GripLevel {
        if self.open == self.closed {
            return GripLevel::OPEN;
        }
        let open = f64::from(self.open);
        let closed = f64::from(self.closed);
        GripLevel::OPEN.adjusted((f64::from(position) - open) / (closed - open))
    }
}

/// Servo driver that keeps the last goal in memory.
///
/// Stands in for the serial link, which this workspace does not drive.
#[derive(Debug, Clone)]
pub struct TrackingServo {
    id: u8,
    position: u16,
}

impl TrackingServo {
    pub fn new(id: u8, initial_position: u16) -> Self {
        Self {
            id,
            position: initial_position,
        }
    }

    /// A servo resting at the open end of `calibration`.
    pub fn open(id: u8, calibration: ServoCalibration) -> Self {
        Self::new(id, calibration.open)
    }

    pub fn id(&self) -> u8 {
        self.id
    }
}

impl GripperServo for TrackingServo {
    fn set_goal_position(&mut self, position: u16) -> Result<()> {
        debug!(servo = self.id, position, "gripper goal position");
        self.position = position;
        Ok(())
    }

    fn goal_position(&mut self) -> Result<u16> {
        Ok(self.position)
    }
}

impl<S: GripperServo + ?Sized> GripperServo for Box<S> {
    fn set_goal_position(&mut self, position: u16) -> Result<()> {
        (**self).set_goal_position(position)
    }

    fn goal_position(&mut self) -> Result<u16> {
        (**self).goal_position()
    }
}
