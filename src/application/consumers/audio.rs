//! Audio cues keyed on step category.

use tracing::debug;

use crate::application::{ConsumerError, IoResultExt, StepConsumer};
use crate::domain::{Bst, StepCategory, StepEvent, StepKind};
use crate::infrastructure::CueSink;

pub const DEFAULT_VOLUME: f32 = 0.3;

/// One of the four cue sounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Chime {
    Visit,
    Change,
    Found,
    Error,
}

impl Chime {
    pub fn name(&self) -> &'static str {
        match self {
            Chime::Visit => "visit",
            Chime::Change => "change",
            Chime::Found => "found",
            Chime::Error => "error",
        }
    }

    /// Oscillator shape a synthesizing sink should use.
    pub fn waveform(&self) -> &'static str {
        match self {
            Chime::Visit => "sine",
            Chime::Change => "triangle",
            Chime::Found => "square",
            Chime::Error => "sawtooth",
        }
    }

    pub fn duration_ms(&self) -> u64 {
        match self {
            Chime::Visit => 100,
            Chime::Change => 300,
            Chime::Found => 500,
            Chime::Error => 200,
        }
    }

    /// Notices are silent.
    pub fn for_category(category: StepCategory) -> Option<Self> {
        match category {
            StepCategory::Visit => Some(Chime::Visit),
            StepCategory::Change => Some(Chime::Change),
            StepCategory::Found => Some(Chime::Found),
            StepCategory::Miss => Some(Chime::Error),
            StepCategory::Notice => None,
        }
    }

    pub fn for_kind(kind: StepKind) -> Option<Self> {
        Self::for_category(kind.category())
    }
}

/// Plays a chime for every step whose category has one.
pub struct AudioCues {
    sink: Box<dyn CueSink>,
    enabled: bool,
    volume: f32,
}

impl AudioCues {
    pub fn new(sink: Box<dyn CueSink>) -> Self {
        Self {
            sink,
            enabled: true,
            volume: DEFAULT_VOLUME,
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        self.set_volume(volume);
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    /// Flip mute; returns whether audio is now enabled.
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        debug!(enabled = self.enabled, "audio toggled");
        self.enabled
    }
}

impl<V> StepConsumer<V> for AudioCues {
    fn name(&self) -> &'static str {
        "audio"
    }

    fn on_step(&mut self, step: &StepEvent<V>, _tree: &Bst<V>) -> Result<(), ConsumerError> {
        if !self.enabled {
            return Ok(());
        }
        match Chime::for_kind(step.kind) {
            Some(chime) => self.sink.play(chime, self.volume).consumer_context("play cue"),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing::RecordingSink;

    #[test]
    fn every_category_but_notice_has_a_chime() {
        assert_eq!(Chime::for_kind(StepKind::VisitSearch), Some(Chime::Visit));
        assert_eq!(Chime::for_kind(StepKind::DeleteDone), Some(Chime::Change));
        assert_eq!(Chime::for_kind(StepKind::Found), Some(Chime::Found));
        assert_eq!(Chime::for_kind(StepKind::FoundDuplicate), Some(Chime::Error));
        assert_eq!(Chime::for_kind(StepKind::Move), None);
        assert_eq!(Chime::for_kind(StepKind::Empty), None);
    }

    #[test]
    fn plays_chimes_for_a_search() {
        let sink = RecordingSink::default();
        let mut cues = AudioCues::new(Box::new(sink.clone()));
        let tree: Bst<i32> = [50, 30].into_iter().collect();
        let steps: Vec<_> = tree.search(30).collect();
        for step in &steps {
            cues.on_step(step, &tree).unwrap();
        }
        assert_eq!(
            sink.played(),
            vec![Chime::Visit, Chime::Visit, Chime::Found]
        );
        assert!(sink.volumes().iter().all(|v| (*v - DEFAULT_VOLUME).abs() < f32::EPSILON));
    }

    #[test]
    fn muted_cues_stay_silent() {
        let sink = RecordingSink::default();
        let mut cues = AudioCues::new(Box::new(sink.clone()));
        assert!(!cues.toggle());
        let tree: Bst<i32> = Bst::new();
        let miss = StepEvent::<i32>::new(StepKind::NotFound, "1 not found in tree");
        cues.on_step(&miss, &tree).unwrap();
        assert!(sink.played().is_empty());
        assert!(cues.toggle());
    }

    #[test]
    fn volume_is_clamped() {
        let cues = AudioCues::new(Box::new(RecordingSink::default())).with_volume(3.0);
        assert_eq!(cues.volume(), 1.0);
    }
}
