//! Shared pacing interval and single-flight flag.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use crate::application::{ApplicationError, ApplicationResult};

pub const DEFAULT_PACING_MS: u64 = 400;

/// Shared, adjustable pause between steps.
///
/// Clones share the same interval. The sequencer reads it each time a pause
/// begins, so a change made mid-sequence applies from the next step on.
#[derive(Debug, Clone)]
pub struct Pacing(Rc<Cell<Duration>>);

impl Default for Pacing {
    fn default() -> Self {
        Self(Rc::new(Cell::new(Duration::from_millis(DEFAULT_PACING_MS))))
    }
}

impl Pacing {
    pub fn from_millis(ms: u64) -> ApplicationResult<Self> {
        let pacing = Self::default();
        pacing.set_millis(ms)?;
        Ok(pacing)
    }

    pub fn get(&self) -> Duration {
        self.0.get()
    }

    pub fn millis(&self) -> u64 {
        self.0.get().as_millis() as u64
    }

    pub fn set_millis(&self, ms: u64) -> ApplicationResult<()> {
        if ms == 0 {
            return Err(ApplicationError::InvalidPacing(ms));
        }
        self.0.set(Duration::from_millis(ms));
        Ok(())
    }

    /// Apply a speed slider position (0 = slowest, 100 = fastest).
    pub fn set_speed(&self, slider: u8) {
        self.0.set(Duration::from_millis(speed_to_millis(slider)));
    }
}

/// Map a 0–100 speed slider onto a pacing interval: 1000 ms down to 50 ms.
pub fn speed_to_millis(slider: u8) -> u64 {
    let slider = f64::from(slider.min(100));
    (1000.0 - slider * 9.5).round() as u64
}

/// Read-only view of the sequencer's single-flight state.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag(Rc<Cell<bool>>);

impl BusyFlag {
    pub fn is_busy(&self) -> bool {
        self.0.get()
    }

    /// Claim the flag, or `None` if a run is already in flight.
    pub(crate) fn try_acquire(&self) -> Option<BusyGuard> {
        if self.0.replace(true) {
            return None;
        }
        Some(BusyGuard(self.0.clone()))
    }
}

/// Releases single-flight when dropped, including on unwind.
#[derive(Debug)]
pub(crate) struct BusyGuard(Rc<Cell<bool>>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_pacing_is_rejected() {
        assert!(matches!(
            Pacing::from_millis(0),
            Err(ApplicationError::InvalidPacing(0))
        ));
    }

    #[test]
    fn clones_share_interval() {
        let pacing = Pacing::default();
        let handle = pacing.clone();
        handle.set_millis(25).unwrap();
        assert_eq!(pacing.get(), Duration::from_millis(25));
    }

    #[test]
    fn speed_slider_bounds() {
        assert_eq!(speed_to_millis(0), 1000);
        assert_eq!(speed_to_millis(100), 50);
        assert_eq!(speed_to_millis(200), 50);
        assert_eq!(speed_to_millis(60), 430);
    }

    #[test]
    fn busy_flag_is_single_flight() {
        let flag = BusyFlag::default();
        let guard = flag.try_acquire();
        assert!(guard.is_some());
        assert!(flag.is_busy());
        assert!(flag.try_acquire().is_none());
        drop(guard);
        assert!(!flag.is_busy());
        assert!(flag.try_acquire().is_some());
    }
}
