//! The command interpreter: parses operator lines and drives the backend.
//!
//! Each sub-command runs to completion (`Idle -> Executing -> Idle`) before
//! the next one is parsed. Recording is an orthogonal flag: commands execute
//! the same way whether or not they are being captured.

pub mod playback;

use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::command::{Command, GripDirection, RecordingSelector, parse_command, split_chain};
use crate::config::{GRIP_STEP, SessionConfig};
use crate::error::{ArmError, Result};
use crate::motion::{GripLevel, MotionBackend, Pose};
use crate::recording::{Recorder, Recording, RecordingRepository};
use crate::session::{ConnectedSession, RestoredState, SessionState};

pub use playback::{PlaybackReport, StepDiff};

/// Response to one sub-command.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    /// The command as logged. For repeats this is the resolved command.
    pub input: String,
    pub outcome: Result<String>,
}

impl Reply {
    /// The text shown to the operator and written to the command log.
    pub fn output(&self) -> String {
        render(&self.outcome)
    }

    pub fn is_error(&self) -> bool {
        self.outcome.is_err()
    }
}

fn render(outcome: &Result<String>) -> String {
    match outcome {
        Ok(output) => output.clone(),
        Err(err) => format!("error: {}", err),
    }
}

/// Owns the session: connection, state, recorder and recording repository.
pub struct Interpreter<B: MotionBackend, R: RecordingRepository> {
    session: ConnectedSession<B>,
    state: SessionState,
    recorder: Recorder,
    repository: R,
    playing: bool,
    finished: bool,
    last_playback: Option<PlaybackReport>,
}

impl<B: MotionBackend, R: RecordingRepository> Interpreter<B, R> {
    /// Creates an interpreter over an open session.
    ///
    /// The starting pose and grip are queried from the backend rather than
    /// assumed.
    pub fn new(mut session: ConnectedSession<B>, repository: R, config: SessionConfig) -> Result<Self> {
        let pose = session.backend_mut().query_pose()?;
        let grip = session.backend_mut().query_grip()?;
        debug!(%pose, %grip, "initial hardware state");

        Ok(Self {
            session,
            state: SessionState::new(pose, grip, config.speed),
            recorder: Recorder::new(),
            repository,
            playing: false,
            finished: false,
            last_playback: None,
        })
    }

    // ============================================================================
    // Accessors
    // ============================================================================

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn recorder(&self) -> &Recorder {
        &self.recorder
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn backend(&self) -> &B {
        self.session.backend()
    }

    /// True once `exit` ran or the connection was lost.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn last_playback(&self) -> Option<&PlaybackReport> {
        self.last_playback.as_ref()
    }

    // ============================================================================
    // Execution
    // ============================================================================

    /// Runs every `&&`-separated sub-command of `line` in order.
    ///
    /// Each sub-command sees the effects of the ones before it. A failing
    /// sub-command does not stop the chain; the session ending does.
    pub fn execute_line(&mut self, line: &str) -> Vec<Reply> {
        let mut replies = Vec::new();
        for part in split_chain(line) {
            if self.finished {
                break;
            }
            replies.push(self.execute(part));
        }
        replies
    }

    /// Parses and dispatches a single sub-command, then logs it.
    pub fn execute(&mut self, input: &str) -> Reply {
        let was_recording = self.recorder.is_active();
        let history_len = self.state.command_log().len();

        let (logged_input, outcome) = match parse_command(input, history_len) {
            Ok(Command::Repeat(depth)) => self.repeat(depth),
            Ok(command) => (input.trim().to_string(), self.dispatch(command)),
            Err(err) => (input.trim().to_string(), Err(err)),
        };

        let output = render(&outcome);
        self.state.append_log(logged_input.as_str(), output.as_str());
        if was_recording && self.recorder.is_active() {
            self.recorder.capture(&logged_input, &output);
        }

        if let Err(err) = &outcome {
            if err.is_fatal() && !self.finished {
                warn!("connection lost, ending session: {}", err);
                if let Err(teardown_err) = self.shutdown() {
                    warn!("teardown after connection loss failed: {}", teardown_err);
                }
            }
        }

        Reply {
            input: logged_input,
            outcome,
        }
    }

    /// Resolves `depth` entries back in history and runs that command.
    fn repeat(&mut self, depth: usize) -> (String, Result<String>) {
        let Some(resolved) = self.state.history_input(depth).map(str::to_string) else {
            let available = self.state.command_log().len();
            return (
                "r".repeat(depth),
                Err(ArmError::RepetitionDepth { depth, available }),
            );
        };
        debug!(depth, resolved = %resolved, "repeating history entry");

        let outcome = match parse_command(&resolved, self.state.command_log().len()) {
            Ok(Command::Repeat(_)) => Err(ArmError::parse(format!(
                "history entry '{}' is itself a repetition",
                resolved
            ))),
            Ok(command) => self.dispatch(command),
            Err(err) => Err(err),
        };
        (resolved, outcome)
    }

    fn dispatch(&mut self, command: Command) -> Result<String> {
        debug!(command = command.name(), "dispatching");
        let result = match command {
            Command::Move { pose, speed } => self.move_to(pose, speed),
            Command::Undo => self.undo(),
            Command::Grip { level } => self.grip(level.unwrap_or(GripLevel::CLOSED)),
            Command::Ungrip { level } => self.grip(level.unwrap_or(GripLevel::OPEN)),
            Command::AdjustGrip(direction) => self.adjust_grip(direction),
            Command::Wait { seconds } => {
                let duration = Duration::try_from_secs_f64(seconds).map_err(|err| {
                    ArmError::parse(format!("cannot wait {}s: {}", seconds, err))
                })?;
                thread::sleep(duration);
                Ok(format!("waited {}s", seconds))
            }
            Command::RawText {
                text,
                forwarded: true,
            } => self
                .backend_mut()
                .send_raw(&text)
                .map(|reply| format!("controller: {}", reply)),
            Command::RawText {
                text,
                forwarded: false,
            } => Err(ArmError::UnknownCommand(text)),
            Command::PushHome => {
                let pose = self.state.current_pose;
                self.state.push_home(pose);
                Ok(format!(
                    "home pushed: {} (depth {})",
                    pose,
                    self.state.home_stack().len()
                ))
            }
            Command::PopHome => self.pop_home(),
            Command::ClearHome => {
                let cleared = self.state.clear_home();
                Ok(format!("cleared {} home pose(s)", cleared))
            }
            Command::SetLinear => {
                let speed = self.state.speed;
                self.backend_mut().set_linear_motion(speed)?;
                Ok(format!("linear motion at speed {}", speed))
            }
            Command::SetMaxSpeed(speed) => {
                self.backend_mut().set_max_speed(speed)?;
                Ok(format!("max speed set to {}", speed))
            }
            Command::SetSpeed(speed) => {
                self.state.speed = speed;
                Ok(format!("speed set to {}", speed))
            }
            Command::DisableZeroTorque => {
                self.backend_mut().disable_zero_torque()?;
                Ok("zero torque disabled".to_string())
            }
            Command::QueryPose => self.refresh_pose().map(|pose| format!("pose: {}", pose)),
            Command::QueryJoints => self
                .backend_mut()
                .query_joints()
                .map(|joints| format!("joints: {}", joints)),
            Command::QueryGrip => self.refresh_grip().map(|level| format!("grip: {}", level)),
            Command::Repeat(_) => Err(ArmError::parse("repetitions cannot be nested")),
            Command::History => Ok(self.render_history()),
            Command::ClearHistory => {
                let cleared = self.state.command_log().len();
                self.state.clear_log();
                Ok(format!("cleared {} history entries", cleared))
            }
            Command::Record { .. } if self.playing => Err(ArmError::RecordingDuringPlayback),
            Command::Record { name } => {
                self.recorder.start(name.clone())?;
                info!(name = ?name, "recording started");
                Ok(match name {
                    Some(name) => format!("recording '{}' started", name),
                    None => "recording started".to_string(),
                })
            }
            Command::StopRecord => self.stop_recording(),
            Command::SetRecordingsFolder(folder) => {
                self.repository.set_folder(folder)?;
                Ok(format!(
                    "recordings folder set to {}",
                    self.repository.folder().display()
                ))
            }
            Command::PlayRecording(selector) => self.play(selector),
            Command::Exit => {
                let note = self.shutdown()?;
                Ok(match note {
                    Some(note) => format!("{}; session ended", note),
                    None => "session ended".to_string(),
                })
            }
        };

        if let Err(err) = &result {
            if err.is_backend() {
                warn!("backend rejected command: {}", err);
            }
        }
        result
    }

    fn backend_mut(&mut self) -> &mut B {
        self.session.backend_mut()
    }

    // ============================================================================
    // Motion and grip
    // ============================================================================

    fn refresh_pose(&mut self) -> Result<Pose> {
        let pose = self.backend_mut().query_pose()?;
        self.state.current_pose = pose;
        Ok(pose)
    }

    fn refresh_grip(&mut self) -> Result<GripLevel> {
        let level = self.backend_mut().query_grip()?;
        self.state.current_grip = level;
        Ok(level)
    }

    /// Moves, and only after the backend accepted the move records the
    /// previous pose for undo.
    fn move_to(&mut self, pose: Pose, speed: Option<f64>) -> Result<String> {
        let speed = speed.unwrap_or(self.state.speed);
        let before = self.state.current_pose;
        self.backend_mut().move_to(&pose, Some(speed))?;
        self.state.record_move(before);
        let actual = self.refresh_pose()?;
        Ok(format!("moved to {} (requested {})", actual, pose))
    }

    fn grip(&mut self, level: GripLevel) -> Result<String> {
        let before = self.state.current_grip;
        self.backend_mut().set_grip(level)?;
        self.state.record_grip(before);
        let actual = self.refresh_grip()?;
        Ok(format!("grip set to {} (requested {})", actual, level))
    }

    fn adjust_grip(&mut self, direction: GripDirection) -> Result<String> {
        if self.state.grip_undo_stack().is_empty() {
            return Err(ArmError::NoGripHistory);
        }
        let delta = match direction {
            GripDirection::Less => -GRIP_STEP,
            GripDirection::More => GRIP_STEP,
        };
        let target = self.state.current_grip.adjusted(delta);
        self.grip(target)
    }

    /// Restores the most recent mutation through the backend; the undo entry
    /// is only popped once the backend accepted the restore.
    fn undo(&mut self) -> Result<String> {
        match self.state.peek_undo()? {
            RestoredState::Pose(pose) => {
                let speed = self.state.speed;
                self.backend_mut().move_to(&pose, Some(speed))?;
                self.state.undo()?;
                let actual = self.refresh_pose()?;
                Ok(format!("undo: moved back to {}", actual))
            }
            RestoredState::Grip(level) => {
                self.backend_mut().set_grip(level)?;
                self.state.undo()?;
                let actual = self.refresh_grip()?;
                Ok(format!("undo: grip back to {}", actual))
            }
        }
    }

    fn pop_home(&mut self) -> Result<String> {
        let home = self.state.pop_home()?;
        match self.move_to(home, None) {
            Ok(moved) => Ok(format!("home: {}", moved)),
            Err(err) => {
                self.state.push_home(home);
                Err(err)
            }
        }
    }

    // ============================================================================
    // History and recordings
    // ============================================================================

    fn render_history(&self) -> String {
        let log = self.state.command_log();
        if log.is_empty() {
            return "history is empty".to_string();
        }
        log.iter()
            .enumerate()
            .map(|(i, entry)| {
                let first_line = entry.output.lines().next().unwrap_or("");
                format!("{:>3}  {}  ->  {}", i + 1, entry.input, first_line)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn stop_recording(&mut self) -> Result<String> {
        if !self.recorder.is_active() {
            return Err(ArmError::NoActiveRecording);
        }
        let persisted = self.repository.list_names().unwrap_or_else(|err| {
            warn!("cannot list saved recordings: {}", err);
            Vec::new()
        });
        let index = self.recorder.stop_avoiding(&persisted)?;
        let recording = self
            .recorder
            .store()
            .by_index(index)
            .ok_or_else(|| ArmError::RecordingNotFound(format!("#{}", index)))?;
        info!(name = recording.name(), steps = recording.len(), "recording finalized");

        Ok(match self.repository.save(recording) {
            Ok(path) => format!(
                "recording '{}' saved ({} steps) to {}",
                recording.name(),
                recording.len(),
                path.display()
            ),
            Err(err) => {
                warn!(name = recording.name(), "failed to persist recording: {}", err);
                format!(
                    "recording '{}' kept in memory ({} steps) but not saved: {}",
                    recording.name(),
                    recording.len(),
                    err
                )
            }
        })
    }

    fn resolve_recording(&mut self, selector: Option<RecordingSelector>) -> Result<Recording> {
        let found = match &selector {
            None => self.recorder.store().latest().cloned(),
            Some(RecordingSelector::Index(index)) => self.recorder.store().by_index(*index).cloned(),
            Some(RecordingSelector::Name(name)) => {
                let in_memory = self.recorder.store().by_name(name).cloned();
                match in_memory {
                    Some(recording) => Some(recording),
                    None => {
                        let loaded = self.repository.load(name)?;
                        if let Some(recording) = &loaded {
                            debug!(name = %name, "loaded recording from disk");
                            self.recorder.merge(recording.clone());
                        }
                        loaded
                    }
                }
            }
        };
        found.ok_or_else(|| {
            ArmError::RecordingNotFound(match selector {
                Some(selector) => selector.to_string(),
                None => "<latest>".to_string(),
            })
        })
    }

    fn play(&mut self, selector: Option<RecordingSelector>) -> Result<String> {
        if self.recorder.is_active() {
            return Err(ArmError::RecordingInProgress);
        }
        if self.playing {
            return Err(ArmError::PlaybackInProgress);
        }
        let recording = self.resolve_recording(selector)?;
        info!(name = recording.name(), steps = recording.len(), "playback started");

        self.playing = true;
        let mut report = PlaybackReport::new(recording.name(), recording.len());
        for (index, (input, recorded)) in recording.steps().enumerate() {
            if self.finished {
                report.aborted = true;
                break;
            }
            let reply = self.execute(input);
            report.record(index, input, recorded, &reply.output());
        }
        self.playing = false;

        let summary = report.to_string();
        self.last_playback = Some(report);
        Ok(summary)
    }

    // ============================================================================
    // Teardown
    // ============================================================================

    /// Ends the session: saves an unfinished recording, then releases the
    /// controller. Returns a note about the saved recording, if any.
    fn shutdown(&mut self) -> Result<Option<String>> {
        let note = if self.recorder.is_active() {
            Some(self.stop_recording()?)
        } else {
            None
        };
        self.finished = true;
        self.session.release()?;
        Ok(note)
    }
}
