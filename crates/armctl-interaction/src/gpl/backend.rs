//! TCP motion backend.

use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::thread;
use std::time::Duration;

use armctl_core::error::{ArmError, Result};
use armctl_core::motion::{GripLevel, JointAngles, MotionBackend, Pose};
use armctl_infrastructure::dto::ControllerConfig;
use tracing::{debug, info, trace};

use super::protocol::{GplReply, GplRequest};
use crate::gripper::{GripperServo, ServoCalibration, TrackingServo};

fn millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

fn lost(err: std::io::Error) -> ArmError {
    ArmError::connection(format!("controller link failed: {}", err))
}

/// An open controller connection.
struct GplLink {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
}

impl GplLink {
    fn open(config: &ControllerConfig) -> Result<Self> {
        let address = (config.host.as_str(), config.port)
            .to_socket_addrs()
            .map_err(|err| {
                ArmError::connection(format!("cannot resolve {}:{}: {}", config.host, config.port, err))
            })?
            .next()
            .ok_or_else(|| {
                ArmError::connection(format!("{}:{} resolved to no address", config.host, config.port))
            })?;

        let stream = match millis(config.connect_timeout_ms) {
            Some(timeout) => TcpStream::connect_timeout(&address, timeout),
            None => TcpStream::connect(address),
        }
        .map_err(|err| ArmError::connection(format!("cannot connect to {}: {}", address, err)))?;

        stream
            .set_read_timeout(millis(config.read_timeout_ms))
            .map_err(lost)?;
        stream.set_nodelay(true).map_err(lost)?;
        let writer = stream.try_clone().map_err(lost)?;

        Ok(Self {
            reader: BufReader::new(stream),
            writer,
        })
    }

    /// Sends one request line and reads one reply line.
    fn round_trip(&mut self, request: &str) -> Result<String> {
        trace!(request, "gpl send");
        self.writer
            .write_all(format!("{}\n", request).as_bytes())
            .and_then(|()| self.writer.flush())
            .map_err(lost)?;

        let mut line = String::new();
        let read = self.reader.read_line(&mut line).map_err(lost)?;
        if read == 0 {
            return Err(ArmError::connection("controller closed the connection"));
        }
        let line = line.trim_end_matches(['\r', '\n']).to_string();
        trace!(reply = %line, "gpl receive");
        Ok(line)
    }

    fn close(self) {
        if let Err(err) = self.writer.shutdown(Shutdown::Both) {
            if err.kind() != ErrorKind::NotConnected {
                debug!("socket shutdown failed: {}", err);
            }
        }
    }
}

/// Drives the arm over the controller's TCP port and the gripper through a
/// [`GripperServo`].
pub struct GplBackend<S: GripperServo = TrackingServo> {
    config: ControllerConfig,
    link: Option<GplLink>,
    servo: S,
    calibration: ServoCalibration,
    /// Last speed sent with `Speed`, to skip redundant updates.
    speed: Option<f64>,
}

impl GplBackend<TrackingServo> {
    pub fn new(config: ControllerConfig, calibration: ServoCalibration) -> Self {
        Self::with_servo(config, TrackingServo::open(1, calibration), calibration)
    }
}

impl<S: GripperServo> GplBackend<S> {
    pub fn with_servo(config: ControllerConfig, servo: S, calibration: ServoCalibration) -> Self {
        Self {
            config,
            link: None,
            servo,
            calibration,
            speed: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.link.is_some()
    }

    pub fn servo(&self) -> &S {
        &self.servo
    }

    fn exchange(&mut self, request: &GplRequest) -> Result<GplReply> {
        let link = self
            .link
            .as_mut()
            .ok_or_else(|| ArmError::connection("not connected to the controller"))?;
        let line = link.round_trip(&request.to_string())?;
        GplReply::parse(&line)?.into_result(request)
    }

    fn send(&mut self, request: GplRequest) -> Result<GplReply> {
        self.exchange(&request)
    }

    fn settle(ms: u64) {
        if let Some(delay) = millis(ms) {
            thread::sleep(delay);
        }
    }

    fn apply_speed(&mut self, speed: f64) -> Result<()> {
        if self.speed == Some(speed) {
            return Ok(());
        }
        let profile = self.config.profile;
        self.send(GplRequest::Speed { profile, speed })?;
        self.speed = Some(speed);
        Ok(())
    }
}

impl<S: GripperServo> MotionBackend for GplBackend<S> {
    fn connect(&mut self) -> Result<()> {
        if self.link.is_some() {
            return Ok(());
        }
        self.link = Some(GplLink::open(&self.config)?);
        self.speed = None;
        info!(host = %self.config.host, port = self.config.port, "connected to controller");
        Ok(())
    }

    /// Power on, attach, then home, waiting for each step to settle.
    fn enable(&mut self) -> Result<()> {
        self.send(GplRequest::Mode(0))?;
        self.send(GplRequest::HighPower(true))?;
        Self::settle(self.config.power_settle_ms);
        self.send(GplRequest::Attach(true))?;
        Self::settle(self.config.attach_settle_ms);
        self.send(GplRequest::Home)?;
        Self::settle(self.config.home_settle_ms);
        info!("arm enabled and homed");
        Ok(())
    }

    fn disable(&mut self) -> Result<()> {
        self.send(GplRequest::HighPower(false))?;
        info!("arm power off");
        Ok(())
    }

    fn disconnect(&mut self) -> Result<()> {
        if let Some(link) = self.link.take() {
            link.close();
            info!("disconnected from controller");
        }
        Ok(())
    }

    fn move_to(&mut self, pose: &Pose, speed: Option<f64>) -> Result<()> {
        if let Some(speed) = speed {
            self.apply_speed(speed)?;
        }
        let profile = self.config.profile;
        self.send(GplRequest::MoveCartesian {
            profile,
            pose: *pose,
        })?;
        Ok(())
    }

    fn query_pose(&mut self) -> Result<Pose> {
        self.send(GplRequest::WhereCartesian)?.pose()
    }

    fn query_joints(&mut self) -> Result<JointAngles> {
        Ok(JointAngles(self.send(GplRequest::WhereJoint)?.numbers()?))
    }

    fn set_grip(&mut self, level: GripLevel) -> Result<()> {
        let position = self.calibration.position_for(level);
        self.servo.set_goal_position(position)
    }

    fn query_grip(&mut self) -> Result<GripLevel> {
        let position = self.servo.goal_position()?;
        Ok(self.calibration.level_for(position))
    }

    fn set_max_speed(&mut self, speed: f64) -> Result<()> {
        self.send(GplRequest::MaxSpeed(speed))?;
        Ok(())
    }

    fn set_linear_motion(&mut self, speed: f64) -> Result<()> {
        let profile = self.config.profile;
        self.send(GplRequest::Straight {
            profile,
            enabled: true,
        })?;
        self.speed = None;
        self.apply_speed(speed)
    }

    fn disable_zero_torque(&mut self) -> Result<()> {
        self.send(GplRequest::ZeroTorque {
            robot: 1,
            axis_mask: 15,
        })?;
        Ok(())
    }

    fn send_raw(&mut self, text: &str) -> Result<String> {
        Ok(self.send(GplRequest::Raw(text.to_string()))?.to_string())
    }
}

impl<S: GripperServo> Drop for GplBackend<S> {
    fn drop(&mut self) {
        if let Some(link) = self.link.take() {
            link.close();
        }
    }
}
