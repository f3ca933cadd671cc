//! A deterministic in-process arm for dry runs.
//!
//! The simulator answers every capability call the way a healthy controller
//! would and keeps a transcript of the GPL requests a real controller would
//! have received.

use armctl_core::error::{ArmError, Result};
use armctl_core::motion::{GripLevel, JointAngles, MotionBackend, Pose};
use tracing::debug;

use crate::gpl::GplRequest;
use crate::gripper::{GripperServo, ServoCalibration, TrackingServo};

/// Distance from the base beyond which moves are rejected, in millimetres.
pub const DEFAULT_REACH: f64 = 1000.0;

pub struct SimulatedBackend {
    connected: bool,
    enabled: bool,
    pose: Pose,
    servo: TrackingServo,
    calibration: ServoCalibration,
    reach: f64,
    profile: u32,
    transcript: Vec<String>,
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new(ServoCalibration::default())
    }
}

impl SimulatedBackend {
    pub fn new(calibration: ServoCalibration) -> Self {
        Self {
            connected: false,
            enabled: false,
            pose: Pose::default(),
            servo: TrackingServo::open(1, calibration),
            calibration,
            reach: DEFAULT_REACH,
            profile: 1,
            transcript: Vec::new(),
        }
    }

    pub fn with_reach(mut self, reach: f64) -> Self {
        self.reach = reach;
        self
    }

    /// Requests a real controller would have received, oldest first.
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn log(&mut self, request: GplRequest) -> Result<()> {
        if !self.connected {
            return Err(ArmError::connection("simulator is not connected"));
        }
        debug!(request = %request, "simulated request");
        self.transcript.push(request.to_string());
        Ok(())
    }

    fn require_power(&self) -> Result<()> {
        if self.enabled {
            Ok(())
        } else {
            Err(ArmError::backend("arm power is off"))
        }
    }
}

impl MotionBackend for SimulatedBackend {
    fn connect(&mut self) -> Result<()> {
        self.connected = true;
        Ok(())
    }

    fn enable(&mut self) -> Result<()> {
        self.log(GplRequest::Mode(0))?;
        self.log(GplRequest::HighPower(true))?;
        self.log(GplRequest::Attach(true))?;
        self.log(GplRequest::Home)?;
        self.enabled = true;
        self.pose = Pose::default();
        Ok(())
    }

    fn disable(&mut self) -> Result<()> {
        self.log(GplRequest::HighPower(false))?;
        self.enabled = false;
        Ok(())
    }

    fn disconnect(&mut self) -> Result<()> {
        self.connected = false;
        Ok(())
    }

    fn move_to(&mut self, pose: &Pose, speed: Option<f64>) -> Result<()> {
        let profile = self.profile;
        if let Some(speed) = speed {
            self.log(GplRequest::Speed { profile, speed })?;
        }
        self.log(GplRequest::MoveCartesian {
            profile,
            pose: *pose,
        })?;
        self.require_power()?;

        let [x, y, z, ..] = *pose.components();
        let distance = (x * x + y * y + z * z).sqrt();
        if distance > self.reach {
            return Err(ArmError::backend(format!(
                "target is {:.1} mm from the base, reach is {:.1} mm",
                distance, self.reach
            )));
        }
        self.pose = *pose;
        Ok(())
    }

    fn query_pose(&mut self) -> Result<Pose> {
        self.log(GplRequest::WhereCartesian)?;
        Ok(self.pose)
    }

    /// The simulator has no kinematic model; it reports the cartesian
    /// components in place of joint angles.
    fn query_joints(&mut self) -> Result<JointAngles> {
        self.log(GplRequest::WhereJoint)?;
        Ok(JointAngles(self.pose.components().to_vec()))
    }

    fn set_grip(&mut self, level: GripLevel) -> Result<()> {
        if !self.connected {
            return Err(ArmError::connection("simulator is not connected"));
        }
        self.servo
            .set_goal_position(self.calibration.position_for(level))
    }

    fn query_grip(&mut self) -> Result<GripLevel> {
        let position = self.servo.goal_position()?;
        Ok(self.calibration.level_for(position))
    }

    fn set_max_speed(&mut self, speed: f64) -> Result<()> {
        self.log(GplRequest::MaxSpeed(speed))
    }

    fn set_linear_motion(&mut self, speed: f64) -> Result<()> {
        let profile = self.profile;
        self.log(GplRequest::Straight {
            profile,
            enabled: true,
        })?;
        self.log(GplRequest::Speed { profile, speed })
    }

    fn disable_zero_torque(&mut self) -> Result<()> {
        self.log(GplRequest::ZeroTorque {
            robot: 1,
            axis_mask: 15,
        })
    }

    fn send_raw(&mut self, text: &str) -> Result<String> {
        self.log(GplRequest::Raw(text.to_string()))?;
        Ok("0".to_string())
    }
}
