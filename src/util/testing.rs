//! Shared test helpers: tracing setup and recording stand-ins for the
//! wall clock, the audio device and terminal output.

use std::cell::RefCell;
use std::env;
use std::io::{self, Write};
use std::rc::Rc;
use std::sync::Once;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::application::consumers::Chime;
use crate::infrastructure::{CueSink, Pause};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", "trace");
        }
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");

    let module_filter = filter_fn(|metadata| !is_noisy(metadata.target()));

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::ENTER)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// The config crate traces every source lookup.
fn is_noisy(target: &str) -> bool {
    const NOISY_MODULES: [&str; 1] = ["config::"];
    NOISY_MODULES.iter().any(|name| target.starts_with(name))
}

/// Records requested pauses instead of sleeping. Clones share the record.
#[derive(Debug, Clone, Default)]
pub struct RecordingPause(Rc<RefCell<Vec<Duration>>>);

impl RecordingPause {
    pub fn recorded(&self) -> Vec<Duration> {
        self.0.borrow().clone()
    }

    pub fn total(&self) -> Duration {
        self.0.borrow().iter().sum()
    }
}

impl Pause for RecordingPause {
    fn pause(&self, duration: Duration) {
        self.0.borrow_mut().push(duration);
    }
}

/// Records played cues. Clones share the record.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink(Rc<RefCell<Vec<(Chime, f32)>>>);

impl RecordingSink {
    pub fn played(&self) -> Vec<Chime> {
        self.0.borrow().iter().map(|(chime, _)| *chime).collect()
    }

    pub fn volumes(&self) -> Vec<f32> {
        self.0.borrow().iter().map(|(_, volume)| *volume).collect()
    }
}

impl CueSink for RecordingSink {
    fn play(&mut self, chime: Chime, volume: f32) -> io::Result<()> {
        self.0.borrow_mut().push((chime, volume));
        Ok(())
    }
}

/// In-memory writer whose clones share one buffer.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_test_setup() {
        init_test_setup();
    }

    #[test]
    fn only_config_crate_targets_are_filtered() {
        assert!(is_noisy("config::source"));
        assert!(!is_noisy("bstviz::config"));
        assert!(!is_noisy("bstviz::application::sequencer"));
    }

    #[test]
    fn recording_pause_clones_share_record() {
        let pause = RecordingPause::default();
        pause.clone().pause(Duration::from_millis(5));
        pause.pause(Duration::from_millis(7));
        assert_eq!(pause.total(), Duration::from_millis(12));
    }
}
