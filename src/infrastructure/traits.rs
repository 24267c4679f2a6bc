//! I/O boundary traits for testability
//!
//! These traits abstract the wall clock and the audio device, allowing the
//! sequencer and consumers to be tested with recording implementations.

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use tracing::info;

use crate::application::consumers::Chime;

/// Timed suspension between steps.
pub trait Pause {
    /// Block the current thread for `duration`.
    fn pause(&self, duration: Duration);
}

/// Output device for audio cues.
pub trait CueSink {
    /// Play one cue at the given volume (0.0 to 1.0).
    fn play(&mut self, chime: Chime, volume: f32) -> io::Result<()>;
}

// ============================================================
// Real implementations
// ============================================================

/// Real pause implementation using the thread scheduler.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadPause;

impl Pause for ThreadPause {
    fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            thread::sleep(duration);
        }
    }
}

/// Terminal bell on stderr. The terminal decides what a bell sounds like,
/// so every chime rings the same; a zero volume stays silent.
#[derive(Debug, Default)]
pub struct BellSink;

impl CueSink for BellSink {
    fn play(&mut self, _chime: Chime, volume: f32) -> io::Result<()> {
        if volume <= 0.0 {
            return Ok(());
        }
        let mut err = io::stderr().lock();
        err.write_all(b"\x07")?;
        err.flush()
    }
}

/// Logs cues instead of playing them.
#[derive(Debug, Default)]
pub struct TracingSink;

impl CueSink for TracingSink {
    fn play(&mut self, chime: Chime, volume: f32) -> io::Result<()> {
        info!(
            chime = chime.name(),
            waveform = chime.waveform(),
            duration_ms = chime.duration_ms(),
            volume,
            "audio cue"
        );
        Ok(())
    }
}
