//! The motion backend abstraction.
//!
//! This trait is the only seam between the interpreter and hardware. Concrete
//! implementations (TCP controller, simulator) live in `armctl-interaction`.

use super::pose::{GripLevel, JointAngles, Pose};
use crate::error::Result;

/// Capability set of an arm controller plus gripper.
///
/// Every call is a blocking request/response round trip. Implementations own
/// framing and retries; the interpreter only sees `Ok` or an [`ArmError`].
///
/// [`ArmError`]: crate::error::ArmError
pub trait MotionBackend {
    /// Opens the link to the controller.
    fn connect(&mut self) -> Result<()>;

    /// Powers the arm and homes it.
    fn enable(&mut self) -> Result<()>;

    /// Removes arm power.
    fn disable(&mut self) -> Result<()>;

    /// Closes the link. Must be safe to call on an already closed link.
    fn disconnect(&mut self) -> Result<()>;

    /// Moves to a cartesian pose. `speed` of `None` leaves the controller default.
    fn move_to(&mut self, pose: &Pose, speed: Option<f64>) -> Result<()>;

    fn query_pose(&mut self) -> Result<Pose>;

    fn query_joints(&mut self) -> Result<JointAngles>;

    fn set_grip(&mut self, level: GripLevel) -> Result<()>;

    fn query_grip(&mut self) -> Result<GripLevel>;

    fn set_max_speed(&mut self, speed: f64) -> Result<()>;

    /// Restricts motion to straight-line paths at the given speed.
    fn set_linear_motion(&mut self, speed: f64) -> Result<()>;

    fn disable_zero_torque(&mut self) -> Result<()>;

    /// Sends a controller command verbatim and returns its reply line.
    fn send_raw(&mut self, text: &str) -> Result<String>;
}

impl<B: MotionBackend + ?Sized> MotionBackend for Box<B> {
    fn connect(&mut self) -> Result<()> {
        (**self).connect()
    }

    fn enable(&mut self) -> Result<()> {
        (**self).enable()
    }

    fn disable(&mut self) -> Result<()> {
        (**self).disable()
    }

    fn disconnect(&mut self) -> Result<()> {
        (**self).disconnect()
    }

    fn move_to(&mut self, pose: &Pose, speed: Option<f64>) -> Result<()> {
        (**self).move_to(pose, speed)
    }

    fn query_pose(&mut self) -> Result<Pose> {
        (**self).query_pose()
    }

    fn query_joints(&mut self) -> Result<JointAngles> {
        (**self).query_joints()
    }

    fn set_grip(&mut self, level: GripLevel) -> Result<()> {
        (**self).set_grip(level)
    }

    fn query_grip(&mut self) -> Result<GripLevel> {
        (**self).query_grip()
    }

    fn set_max_speed(&mut self, speed: f64) -> Result<()> {
        (**self).set_max_speed(speed)
    }

    fn set_linear_motion(&mut self, speed: f64) -> Result<()> {
        (**self).set_linear_motion(speed)
    }

    fn disable_zero_torque(&mut self) -> Result<()> {
        (**self).disable_zero_torque()
    }

    fn send_raw(&mut self, text: &str) -> Result<String> {
        (**self).send_raw(text)
    }
}
