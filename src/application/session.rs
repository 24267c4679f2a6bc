//! Interactive session: one tree, one sequencer and the reference consumers.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, info, instrument};

use crate::application::consumers::{AudioCues, StepLog, TreeRenderer};
use crate::application::{
    ApplicationError, ApplicationResult, ConsumerError, RunOutcome, Sequencer, StepConsumer,
};
use crate::domain::{Bst, TraversalOrder};

/// The tree plus everything watching it.
///
/// Every animated operation goes through the sequencer, so a request made
/// while another is running is rejected. Consumers are shared with the
/// sequencer so the session can still query them and post system notices.
pub struct Session {
    tree: Bst<i64>,
    sequencer: Sequencer<i64>,
    renderer: Rc<RefCell<TreeRenderer>>,
    audio: Rc<RefCell<AudioCues>>,
    log: Rc<RefCell<StepLog>>,
    rng: StdRng,
    value_range: i64,
}

impl Session {
    pub fn new(
        mut sequencer: Sequencer<i64>,
        renderer: TreeRenderer,
        audio: AudioCues,
        log: StepLog,
        rng: StdRng,
        value_range: i64,
    ) -> Self {
        let renderer = Rc::new(RefCell::new(renderer));
        let audio = Rc::new(RefCell::new(audio));
        let log = Rc::new(RefCell::new(log));
        sequencer.register(Box::new(renderer.clone()));
        sequencer.register(Box::new(audio.clone()));
        sequencer.register(Box::new(log.clone()));
        Self {
            tree: Bst::new(),
            sequencer,
            renderer,
            audio,
            log,
            rng,
            value_range: value_range.max(1),
        }
    }

    pub fn tree(&self) -> &Bst<i64> {
        &self.tree
    }

    pub fn log(&self) -> Ref<'_, StepLog> {
        self.log.borrow()
    }

    pub fn renderer(&self) -> Ref<'_, TreeRenderer> {
        self.renderer.borrow()
    }

    pub fn sequencer(&self) -> &Sequencer<i64> {
        &self.sequencer
    }

    pub fn is_busy(&self) -> bool {
        self.sequencer.is_busy()
    }

    pub fn audio_enabled(&self) -> bool {
        self.audio.borrow().is_enabled()
    }

    /// Current tree as text, without highlights.
    pub fn render(&self) -> String {
        self.renderer.borrow().render(&self.tree)
    }

    pub fn insert(&mut self, value: i64) -> RunOutcome {
        self.sequencer.run(&mut self.tree.insert(value))
    }

    pub fn delete(&mut self, value: i64) -> RunOutcome {
        self.sequencer.run(&mut self.tree.delete(value))
    }

    /// Animated search; the flag is `None` when the request was rejected
    /// or aborted before a verdict.
    pub fn search(&mut self, value: i64) -> (RunOutcome, Option<bool>) {
        let mut steps = self.tree.search(value);
        let outcome = self.sequencer.run(&mut steps);
        (outcome, steps.outcome())
    }

    pub fn traverse(&mut self, order: TraversalOrder) -> RunOutcome {
        self.sequencer.run(&mut self.tree.traverse(order))
    }

    pub fn random_value(&mut self) -> i64 {
        self.rng.gen_range(0..self.value_range)
    }

    /// Animated insert of a random value.
    pub fn random_insert(&mut self) -> (i64, RunOutcome) {
        let value = self.random_value();
        debug!(value, "random insert");
        (value, self.insert(value))
    }

    /// Insert without animation. Duplicates are ignored.
    pub fn quick_insert(&mut self, value: i64) -> ApplicationResult<bool> {
        if self.is_busy() {
            return Ok(false);
        }
        let inserted = self.tree.quick_insert(value);
        self.refresh()?;
        Ok(inserted)
    }

    /// Draw `count` random values and quick-insert them; duplicates collapse,
    /// so the tree may end up smaller than `count`.
    #[instrument(level = "debug", skip(self))]
    pub fn seed_random(&mut self, count: usize) -> ApplicationResult<()> {
        self.notice("Initializing random tree...")?;
        for _ in 0..count {
            let value = self.random_value();
            self.tree.quick_insert(value);
        }
        info!(nodes = self.tree.len(), "random tree ready");
        self.refresh()
    }

    pub fn clear(&mut self) -> ApplicationResult<()> {
        if self.is_busy() {
            return Ok(());
        }
        self.tree.clear();
        self.refresh()?;
        self.notice("Tree cleared")
    }

    pub fn set_speed(&self, slider: u8) {
        self.sequencer.pacing().set_speed(slider);
    }

    pub fn set_pacing_ms(&self, ms: u64) -> ApplicationResult<()> {
        self.sequencer.pacing().set_millis(ms)
    }

    /// Flip mute; returns whether audio is now enabled.
    pub fn toggle_audio(&mut self) -> ApplicationResult<bool> {
        let enabled = self.audio.borrow_mut().toggle();
        self.notice(if enabled { "Audio enabled" } else { "Audio muted" })?;
        Ok(enabled)
    }

    fn notice(&self, message: &str) -> ApplicationResult<()> {
        let posted = self.log.borrow_mut().system(message);
        posted.map(drop).map_err(|e| fault(&self.log, e))
    }

    fn refresh(&self) -> ApplicationResult<()> {
        let drawn = self.renderer.borrow_mut().show(&self.tree);
        drawn.map_err(|e| fault(&self.renderer, e))
    }
}

fn fault<C: StepConsumer<i64>>(consumer: &C, source: ConsumerError) -> ApplicationError {
    ApplicationError::ConsumerFault {
        consumer: consumer.name().to_string(),
        step: None,
        source,
    }
}
