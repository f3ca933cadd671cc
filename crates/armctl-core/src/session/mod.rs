//! Session state and the lifetime of the controller connection.

pub mod lifecycle;
pub mod state;

pub use lifecycle::ConnectedSession;
pub use state::{LogEntry, MutationKind, RestoredState, SessionState};
