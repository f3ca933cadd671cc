//! Motion domain: poses, grip levels and the backend capability set.

pub mod backend;
pub mod pose;

pub use backend::MotionBackend;
pub use pose::{GripLevel, JointAngles, Pose, POSE_COMPONENTS};
