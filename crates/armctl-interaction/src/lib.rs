//! Motion backends: the GPL TCP controller, the gripper servo and a simulator.

pub mod gpl;
pub mod gripper;
pub mod simulated;

pub use gpl::GplBackend;
pub use gripper::{GripperServo, ServoCalibration, TrackingServo};
pub use simulated::SimulatedBackend;
