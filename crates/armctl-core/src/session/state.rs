//! Session state: last confirmed hardware state, undo timeline, home stack and
//! command log.
//!
//! Nothing here talks to the backend. The dispatcher confirms a change with
//! the hardware first and only then records it, so every value on an undo
//! stack is a state the arm was actually in.

use crate::error::{ArmError, Result};
use crate::motion::{GripLevel, Pose};

/// Which kind of mutation an undo entry reverses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Move,
    Grip,
}

/// The state an undo step should return the hardware to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RestoredState {
    Pose(Pose),
    Grip(GripLevel),
}

/// One processed sub-command and the response the operator saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub input: String,
    pub output: String,
}

#[derive(Debug, Clone)]
pub struct SessionState {
    pub current_pose: Pose,
    pub current_grip: GripLevel,
    /// Speed applied to moves that do not carry their own.
    pub speed: f64,
    pose_undo_stack: Vec<Pose>,
    grip_undo_stack: Vec<GripLevel>,
    /// Interleaving of the two undo stacks, oldest first.
    timeline: Vec<MutationKind>,
    home_stack: Vec<Pose>,
    command_log: Vec<LogEntry>,
}

impl SessionState {
    pub fn new(current_pose: Pose, current_grip: GripLevel, speed: f64) -> Self {
        Self {
            current_pose,
            current_grip,
            speed,
            pose_undo_stack: Vec::new(),
            grip_undo_stack: Vec::new(),
            timeline: Vec::new(),
            home_stack: Vec::new(),
            command_log: Vec::new(),
        }
    }

    // ============================================================================
    // Undo
    // ============================================================================

    /// Remembers the pose the arm held before a confirmed move.
    pub fn record_move(&mut self, pose_before: Pose) {
        self.pose_undo_stack.push(pose_before);
        self.timeline.push(MutationKind::Move);
    }

    /// Remembers the grip level before a confirmed grip change.
    pub fn record_grip(&mut self, level_before: GripLevel) {
        self.grip_undo_stack.push(level_before);
        self.timeline.push(MutationKind::Grip);
    }

    /// True when the most recent un-undone mutation was a move.
    pub fn last_mutation_was_move(&self) -> bool {
        self.timeline.last() == Some(&MutationKind::Move)
    }

    /// The state the next [`undo`](Self::undo) would restore, without popping it.
    pub fn peek_undo(&self) -> Result<RestoredState> {
        match self.timeline.last() {
            Some(MutationKind::Move) => self
                .pose_undo_stack
                .last()
                .map(|pose| RestoredState::Pose(*pose))
                .ok_or(ArmError::EmptyUndoStack),
            Some(MutationKind::Grip) => self
                .grip_undo_stack
                .last()
                .map(|level| RestoredState::Grip(*level))
                .ok_or(ArmError::EmptyUndoStack),
            None => Err(ArmError::EmptyUndoStack),
        }
    }

    /// Pops the most recent mutation, whichever kind it was.
    pub fn undo(&mut self) -> Result<RestoredState> {
        let restored = self.peek_undo()?;
        self.timeline.pop();
        match restored {
            RestoredState::Pose(_) => {
                self.pose_undo_stack.pop();
            }
            RestoredState::Grip(_) => {
                self.grip_undo_stack.pop();
            }
        }
        Ok(restored)
    }

    pub fn pose_undo_stack(&self) -> &[Pose] {
        &self.pose_undo_stack
    }

    pub fn grip_undo_stack(&self) -> &[GripLevel] {
        &self.grip_undo_stack
    }

    // ============================================================================
    // Home stack
    // ============================================================================

    pub fn push_home(&mut self, pose: Pose) {
        self.home_stack.push(pose);
    }

    pub fn pop_home(&mut self) -> Result<Pose> {
        self.home_stack.pop().ok_or(ArmError::EmptyHomeStack)
    }

    pub fn clear_home(&mut self) -> usize {
        let cleared = self.home_stack.len();
        self.home_stack.clear();
        cleared
    }

    pub fn home_stack(&self) -> &[Pose] {
        &self.home_stack
    }

    // ============================================================================
    // Command log
    // ============================================================================

    pub fn append_log(&mut self, input: impl Into<String>, output: impl Into<String>) {
        self.command_log.push(LogEntry {
            input: input.into(),
            output: output.into(),
        });
    }

    pub fn clear_log(&mut self) {
        self.command_log.clear();
    }

    pub fn command_log(&self) -> &[LogEntry] {
        &self.command_log
    }

    /// Input recorded `depth` entries back (1 = most recent).
    pub fn history_input(&self, depth: usize) -> Option<&str> {
        let index = self.command_log.len().checked_sub(depth)?;
        self.command_log.get(index).map(|entry| entry.input.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pose(x: f64) -> Pose {
        Pose::new([x, 0.0, 0.0, 0.0, 0.0, 0.0])
    }

    fn level(v: f64) -> GripLevel {
        GripLevel::new(v).unwrap()
    }

    #[test]
    fn test_undo_on_empty_state() {
        let mut state = SessionState::new(pose(0.0), GripLevel::OPEN, 10.0);
        assert_eq!(state.undo(), Err(ArmError::EmptyUndoStack));
    }

    #[test]
    fn test_undo_follows_interleaved_timeline() {
        let mut state = SessionState::new(pose(0.0), GripLevel::OPEN, 10.0);
        state.record_move(pose(0.0));
        state.record_grip(level(0.0));
        state.record_move(pose(1.0));

        assert!(state.last_mutation_was_move());
        assert_eq!(state.undo().unwrap(), RestoredState::Pose(pose(1.0)));
        assert!(!state.last_mutation_was_move());
        assert_eq!(state.undo().unwrap(), RestoredState::Grip(level(0.0)));
        assert_eq!(state.undo().unwrap(), RestoredState::Pose(pose(0.0)));
        assert_eq!(state.undo(), Err(ArmError::EmptyUndoStack));
    }

    #[test]
    fn test_peek_does_not_pop() {
        let mut state = SessionState::new(pose(0.0), GripLevel::OPEN, 10.0);
        state.record_grip(level(0.4));
        assert_eq!(state.peek_undo().unwrap(), RestoredState::Grip(level(0.4)));
        assert_eq!(state.grip_undo_stack().len(), 1);
    }

    #[test]
    fn test_home_stack() {
        let mut state = SessionState::new(pose(0.0), GripLevel::OPEN, 10.0);
        assert_eq!(state.pop_home(), Err(ArmError::EmptyHomeStack));
        state.push_home(pose(1.0));
        state.push_home(pose(2.0));
        assert_eq!(state.pop_home().unwrap(), pose(2.0));
        assert_eq!(state.clear_home(), 1);
        assert!(state.home_stack().is_empty());
    }

    #[test]
    fn test_history_input_depth() {
        let mut state = SessionState::new(pose(0.0), GripLevel::OPEN, 10.0);
        state.append_log("m 1 2 3 4 5 6", "ok");
        state.append_log("g 0.5", "ok");
        assert_eq!(state.history_input(1), Some("g 0.5"));
        assert_eq!(state.history_input(2), Some("m 1 2 3 4 5 6"));
        assert_eq!(state.history_input(3), None);
        assert_eq!(state.history_input(0), None);
    }
}
