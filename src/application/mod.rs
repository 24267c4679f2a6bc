//! Application layer: sequencing, consumers and the interactive session
//!
//! This layer drives domain producers and depends on I/O boundary traits.

pub mod consumers;
pub mod error;
pub mod error_ext;
pub mod pacing;
pub mod sequencer;
pub mod session;

pub use error::{ApplicationError, ApplicationResult, ConsumerError};
pub use error_ext::IoResultExt;
pub use pacing::{speed_to_millis, BusyFlag, Pacing, DEFAULT_PACING_MS};
pub use sequencer::{FnConsumer, RunOutcome, Sequencer, StepConsumer, DEFAULT_SETTLE_MS};
pub use session::Session;
