//! Recordings: capture, storage and the persistence seam.

pub mod model;
pub mod recorder;
pub mod repository;
pub mod store;

pub use model::{ActiveRecording, Recording};
pub use recorder::Recorder;
pub use repository::RecordingRepository;
pub use store::RecordingStore;
