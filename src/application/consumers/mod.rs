//! Reference step consumers: tree renderer, audio cues and step log.

pub mod audio;
pub mod log;
pub mod render;

pub use audio::{AudioCues, Chime, DEFAULT_VOLUME};
pub use log::{LogEntry, LogLevel, StepLog, DEFAULT_LOG_CAPACITY};
pub use render::{Highlight, TreeRenderer};
