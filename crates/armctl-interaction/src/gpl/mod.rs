//! Backend for controllers speaking the GPL text protocol over TCP.

pub mod backend;
pub mod protocol;

pub use backend::GplBackend;
pub use protocol::{GplReply, GplRequest};
