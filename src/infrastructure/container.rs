//! Service container for dependency injection
//!
//! Wires a session together from settings and the I/O boundary implementations.

use std::io::{self, IsTerminal, Write};
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::application::consumers::{AudioCues, StepLog, TreeRenderer};
use crate::application::{ApplicationResult, Pacing, Sequencer, Session};
use crate::config::Settings;
use crate::infrastructure::traits::{BellSink, CueSink, Pause, ThreadPause, TracingSink};

/// Container holding settings and the I/O implementations a session needs.
///
/// Building a session consumes the container; the boundary objects move
/// into the sequencer and the consumers.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Wall clock used between steps
    pause: Box<dyn Pause>,

    /// Audio output device
    sink: Box<dyn CueSink>,

    /// Where rendered frames go, if anywhere
    frames: Option<Box<dyn Write>>,

    /// Where log entries are echoed, if anywhere
    echo: Option<Box<dyn Write>>,

    rng: StdRng,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    ///
    /// Cues ring the terminal bell only when stderr is a terminal; otherwise
    /// they go to the trace log.
    pub fn new(settings: Settings) -> Self {
        let sink: Box<dyn CueSink> = if io::stderr().is_terminal() {
            Box::new(BellSink)
        } else {
            Box::new(TracingSink)
        };
        Self::with_deps(settings, Box::new(ThreadPause), sink)
            .with_frames(Box::new(io::stdout()))
            .with_echo(Box::new(io::stdout()))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, pause: Box<dyn Pause>, sink: Box<dyn CueSink>) -> Self {
        Self {
            settings: Arc::new(settings),
            pause,
            sink,
            frames: None,
            echo: None,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_frames(mut self, out: Box<dyn Write>) -> Self {
        self.frames = Some(out);
        self
    }

    pub fn with_echo(mut self, out: Box<dyn Write>) -> Self {
        self.echo = Some(out);
        self
    }

    /// Fix the random source for reproducible sessions.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn into_session(self) -> ApplicationResult<Session> {
        let settings = self.settings;
        let pacing = Pacing::from_millis(settings.pacing_ms)?;
        let sequencer = Sequencer::new(pacing, self.pause)
            .with_settle(Duration::from_millis(settings.settle_ms));

        let mut renderer = TreeRenderer::new();
        if let Some(out) = self.frames {
            renderer = renderer.with_output(out);
        }
        let audio = AudioCues::new(self.sink)
            .with_enabled(settings.audio_enabled)
            .with_volume(settings.volume);
        let mut log = StepLog::new(settings.log_capacity);
        if let Some(out) = self.echo {
            log = log.with_echo(out);
        }

        Ok(Session::new(
            sequencer,
            renderer,
            audio,
            log,
            self.rng,
            settings.value_range,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing::{RecordingPause, RecordingSink, SharedBuffer};

    #[test]
    fn session_follows_settings() {
        let settings = Settings {
            pacing_ms: 25,
            audio_enabled: false,
            log_capacity: 2,
            ..Settings::default()
        };
        let pause = RecordingPause::default();
        let frames = SharedBuffer::default();
        let mut session = ServiceContainer::with_deps(
            settings,
            Box::new(pause.clone()),
            Box::new(RecordingSink::default()),
        )
        .with_frames(Box::new(frames.clone()))
        .into_session()
        .unwrap();

        assert_eq!(session.sequencer().pacing().millis(), 25);
        assert!(!session.audio_enabled());

        session.insert(5);
        assert_eq!(pause.recorded()[0], Duration::from_millis(25));
        assert_eq!(session.log().len(), 2);
        assert!(frames.contents().contains("INSERT_ROOT: Inserting root: 5"));
    }
}
