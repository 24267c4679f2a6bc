//! Infrastructure layer: I/O implementations and service wiring
//!
//! This layer implements the I/O boundary traits and assembles sessions.

pub mod container;
pub mod error;
pub mod traits;

pub use container::ServiceContainer;
pub use error::InfraError;
pub use traits::{BellSink, CueSink, Pause, ThreadPause, TracingSink};
