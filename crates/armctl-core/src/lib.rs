pub mod command;
pub mod config;
pub mod error;
pub mod interpreter;
pub mod motion;
pub mod recording;
pub mod session;

// Re-export common error type
pub use error::{ArmError, Result};

pub use interpreter::{Interpreter, Reply};
