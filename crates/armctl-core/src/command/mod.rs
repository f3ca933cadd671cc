//! Command model, alias table and parser.

pub mod alias;
pub mod model;
pub mod parser;

pub use alias::{AliasEntry, Keyword, alias_entries};
pub use model::{Command, GripDirection, RecordingSelector};
pub use parser::{parse_command, parse_line, split_chain};
