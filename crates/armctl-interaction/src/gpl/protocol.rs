//! GPL request formatting and reply parsing.
//!
//! The controller speaks a line protocol: one request line, one reply line.
//! A reply starts with an integer status (`0` for success, a negative
//! controller error code otherwise) followed by whitespace separated payload.

use armctl_core::error::{ArmError, Result};
use armctl_core::motion::Pose;
use std::fmt;

/// Controller commands used by the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum GplRequest {
    Mode(u32),
    HighPower(bool),
    Attach(bool),
    Home,
    MoveCartesian { profile: u32, pose: Pose },
    WhereCartesian,
    WhereJoint,
    MaxSpeed(f64),
    Straight { profile: u32, enabled: bool },
    Speed { profile: u32, speed: f64 },
    ZeroTorque { robot: u32, axis_mask: u32 },
    /// Operator supplied text, sent as is.
    Raw(String),
}

fn flag(enabled: bool) -> u8 {
    u8::from(enabled)
}

impl fmt::Display for GplRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mode(mode) => write!(f, "mode {}", mode),
            Self::HighPower(on) => write!(f, "hp {}", flag(*on)),
            Self::Attach(on) => write!(f, "attach {}", flag(*on)),
            Self::Home => write!(f, "home"),
            Self::MoveCartesian { profile, pose } => write!(f, "movec {} {}", profile, pose),
            Self::WhereCartesian => write!(f, "wherec"),
            Self::WhereJoint => write!(f, "wherej"),
            Self::MaxSpeed(speed) => write!(f, "mspeed {}", speed),
            Self::Straight { profile, enabled } => {
                write!(f, "Straight {} {}", profile, flag(*enabled))
            }
            Self::Speed { profile, speed } => write!(f, "Speed {} {}", profile, speed),
            Self::ZeroTorque { robot, axis_mask } => {
                write!(f, "zeroTorque {} {}", robot, axis_mask)
            }
            Self::Raw(text) => write!(f, "{}", text.trim()),
        }
    }
}

/// A parsed reply line.
#[derive(Debug, Clone, PartialEq)]
pub struct GplReply {
    pub status: i32,
    pub payload: Vec<String>,
}

impl GplReply {
    pub fn parse(line: &str) -> Result<Self> {
        let mut tokens = line.split_whitespace();
        let status = tokens
            .next()
            .and_then(|token| token.parse::<i32>().ok())
            .ok_or_else(|| ArmError::backend(format!("malformed controller reply '{}'", line.trim())))?;
        Ok(Self {
            status,
            payload: tokens.map(str::to_string).collect(),
        })
    }

    pub fn is_ok(&self) -> bool {
        self.status == 0
    }

    /// Turns a non-zero status into a backend error.
    pub fn into_result(self, request: &GplRequest) -> Result<Self> {
        if self.is_ok() {
            return Ok(self);
        }
        let detail = if self.payload.is_empty() {
            String::new()
        } else {
            format!(": {}", self.payload.join(" "))
        };
        Err(ArmError::backend(format!(
            "'{}' failed with status {}{}",
            request, self.status, detail
        )))
    }

    /// Payload tokens as numbers.
    pub fn numbers(&self) -> Result<Vec<f64>> {
        self.payload
            .iter()
            .map(|token| {
                token.parse::<f64>().map_err(|_| {
                    ArmError::backend(format!("controller sent non-numeric value '{}'", token))
                })
            })
            .collect()
    }

    /// Reads a cartesian pose from a `wherec` reply.
    ///
    /// The controller appends a handedness flag after the six components;
    /// anything past the sixth value is ignored.
    pub fn pose(&self) -> Result<Pose> {
        let values = self.numbers()?;
        if values.len() < 6 {
            return Err(ArmError::backend(format!(
                "expected 6 pose values, controller sent {}",
                values.len()
            )));
        }
        Pose::from_slice(&values[..6]).map_err(|err| ArmError::backend(err.to_string()))
    }
}

impl fmt::Display for GplReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.status)?;
        for token in &self.payload {
            write!(f, " {}", token)?;
        }
        Ok(())
    }
}
