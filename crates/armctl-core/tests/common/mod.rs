//! Test doubles shared by the interpreter integration tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use armctl_core::config::SessionConfig;
use armctl_core::motion::{GripLevel, JointAngles, MotionBackend, Pose};
use armctl_core::recording::{Recording, RecordingRepository};
use armctl_core::session::ConnectedSession;
use armctl_core::{ArmError, Interpreter, Result};

/// Everything the mock backend saw and what it will report.
#[derive(Debug, Default)]
pub struct MockState {
    pub pose: Pose,
    pub grip: GripLevel,
    pub calls: Vec<String>,
    pub moves: Vec<Pose>,
    pub grips: Vec<GripLevel>,
    pub fail_moves: bool,
    pub fail_grips: bool,
    pub fail_enable: bool,
    pub drop_connection: bool,
    /// Added to x on every pose query, to simulate drift.
    pub pose_drift: f64,
}

impl MockState {
    pub fn count(&self, call: &str) -> usize {
        self.calls.iter().filter(|c| c.as_str() == call).count()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    pub state: Rc<RefCell<MockState>>,
}

impl MockBackend {
    fn log(&self, call: &str) {
        self.state.borrow_mut().calls.push(call.to_string());
    }

    fn check_link(&self) -> Result<()> {
        if self.state.borrow().drop_connection {
            return Err(ArmError::connection("connection reset by peer"));
        }
        Ok(())
    }
}

impl MotionBackend for MockBackend {
    fn connect(&mut self) -> Result<()> {
        self.log("connect");
        Ok(())
    }

    fn enable(&mut self) -> Result<()> {
        self.log("enable");
        if self.state.borrow().fail_enable {
            return Err(ArmError::backend("enable refused"));
        }
        Ok(())
    }

    fn disable(&mut self) -> Result<()> {
        self.log("disable");
        Ok(())
    }

    fn disconnect(&mut self) -> Result<()> {
        self.log("disconnect");
        Ok(())
    }

    fn move_to(&mut self, pose: &Pose, _speed: Option<f64>) -> Result<()> {
        self.log("move");
        self.check_link()?;
        let mut state = self.state.borrow_mut();
        if state.fail_moves {
            return Err(ArmError::backend("move rejected: out of reach"));
        }
        state.pose = *pose;
        state.moves.push(*pose);
        Ok(())
    }

    fn query_pose(&mut self) -> Result<Pose> {
        self.check_link()?;
        let state = self.state.borrow();
        let mut components = *state.pose.components();
        components[0] += state.pose_drift;
        Ok(Pose::new(components))
    }

    fn query_joints(&mut self) -> Result<JointAngles> {
        self.check_link()?;
        Ok(JointAngles(vec![0.0, 45.0, 90.0, 0.0, 0.0, 0.0]))
    }

    fn set_grip(&mut self, level: GripLevel) -> Result<()> {
        self.log("grip");
        self.check_link()?;
        let mut state = self.state.borrow_mut();
        if state.fail_grips {
            return Err(ArmError::backend("gripper servo not responding"));
        }
        state.grip = level;
        state.grips.push(level);
        Ok(())
    }

    fn query_grip(&mut self) -> Result<GripLevel> {
        self.check_link()?;
        Ok(self.state.borrow().grip)
    }

    fn set_max_speed(&mut self, _speed: f64) -> Result<()> {
        self.log("max-speed");
        Ok(())
    }

    fn set_linear_motion(&mut self, _speed: f64) -> Result<()> {
        self.log("linear");
        Ok(())
    }

    fn disable_zero_torque(&mut self) -> Result<()> {
        self.log("zero-torque");
        Ok(())
    }

    fn send_raw(&mut self, text: &str) -> Result<String> {
        self.log("raw");
        self.check_link()?;
        Ok(format!("0 {}", text))
    }
}

/// Keeps saved recordings in memory.
#[derive(Debug, Clone)]
pub struct MemoryRepository {
    folder: PathBuf,
    pub saved: Rc<RefCell<HashMap<String, Recording>>>,
    pub fail_saves: Rc<RefCell<bool>>,
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self {
            folder: PathBuf::from("recordings"),
            saved: Rc::default(),
            fail_saves: Rc::default(),
        }
    }
}

impl RecordingRepository for MemoryRepository {
    fn folder(&self) -> &Path {
        &self.folder
    }

    fn set_folder(&mut self, folder: PathBuf) -> Result<()> {
        self.folder = folder;
        Ok(())
    }

    fn save(&self, recording: &Recording) -> Result<PathBuf> {
        if *self.fail_saves.borrow() {
            return Err(ArmError::io("disk full"));
        }
        self.saved
            .borrow_mut()
            .insert(recording.name().to_string(), recording.clone());
        Ok(self.folder.join(format!("{}.toml", recording.name())))
    }

    fn load(&self, name: &str) -> Result<Option<Recording>> {
        Ok(self.saved.borrow().get(name).cloned())
    }

    fn list_names(&self) -> Result<Vec<String>> {
        let mut names: Vec<_> = self.saved.borrow().keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}

pub struct Harness {
    pub interpreter: Interpreter<MockBackend, MemoryRepository>,
    pub backend: Rc<RefCell<MockState>>,
    pub repository: MemoryRepository,
}

pub fn harness() -> Harness {
    harness_with(MemoryRepository::default())
}

pub fn harness_with(repository: MemoryRepository) -> Harness {
    let backend = MockBackend::default();
    let state = backend.state.clone();
    let session = ConnectedSession::open(backend, true).unwrap();
    let interpreter =
        Interpreter::new(session, repository.clone(), SessionConfig::default()).unwrap();
    Harness {
        interpreter,
        backend: state,
        repository,
    }
}

pub fn pose(values: [f64; 6]) -> Pose {
    Pose::new(values)
}
