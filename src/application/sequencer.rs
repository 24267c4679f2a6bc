//! Paced, single-flight driver for step producers.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tracing::{debug, instrument, trace, warn};

use crate::application::pacing::{BusyFlag, Pacing};
use crate::application::{ApplicationError, ConsumerError};
use crate::domain::{Bst, Key, Operation, StepEvent, StepKind, StepSource};
use crate::infrastructure::Pause;

/// Trailing pause after the last step, before completion is announced.
pub const DEFAULT_SETTLE_MS: u64 = 1000;

/// Receiver of step events.
///
/// Callbacks run synchronously on the sequencer's thread and must return
/// promptly. The tree borrow is only valid for the duration of the call.
pub trait StepConsumer<V> {
    fn name(&self) -> &'static str;

    /// A sequence is about to start. Nothing has been produced yet.
    fn on_start(&mut self, _operation: &Operation<V>, _tree: &Bst<V>) -> Result<(), ConsumerError> {
        Ok(())
    }

    /// `step` was just produced; `tree` already reflects it.
    fn on_step(&mut self, step: &StepEvent<V>, tree: &Bst<V>) -> Result<(), ConsumerError>;

    /// The sequence ended, normally or through a fault. Transient
    /// highlighting should be dropped here.
    fn on_complete(&mut self, _outcome: &RunOutcome, _tree: &Bst<V>) {}
}

/// Shared consumers stay reachable by their owner while registered.
impl<V, C: StepConsumer<V>> StepConsumer<V> for Rc<RefCell<C>> {
    fn name(&self) -> &'static str {
        self.borrow().name()
    }

    fn on_start(&mut self, operation: &Operation<V>, tree: &Bst<V>) -> Result<(), ConsumerError> {
        self.borrow_mut().on_start(operation, tree)
    }

    fn on_step(&mut self, step: &StepEvent<V>, tree: &Bst<V>) -> Result<(), ConsumerError> {
        self.borrow_mut().on_step(step, tree)
    }

    fn on_complete(&mut self, outcome: &RunOutcome, tree: &Bst<V>) {
        self.borrow_mut().on_complete(outcome, tree)
    }
}

/// Adapter turning a closure into a consumer.
pub struct FnConsumer<F> {
    name: &'static str,
    f: F,
}

impl<F> FnConsumer<F> {
    pub fn new<V>(name: &'static str, f: F) -> Self
    where
        F: FnMut(&StepEvent<V>, &Bst<V>) -> Result<(), ConsumerError>,
    {
        Self { name, f }
    }
}

impl<V, F> StepConsumer<V> for FnConsumer<F>
where
    F: FnMut(&StepEvent<V>, &Bst<V>) -> Result<(), ConsumerError>,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn on_step(&mut self, step: &StepEvent<V>, tree: &Bst<V>) -> Result<(), ConsumerError> {
        (self.f)(step, tree)
    }
}

/// How a call to [`Sequencer::run`] ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// The producer was exhausted.
    Completed { steps: usize },
    /// A consumer failed on step number `steps`; nothing after it was produced.
    Faulted {
        steps: usize,
        fault: ApplicationError,
    },
    /// Another sequence was in flight; nothing ran.
    Rejected,
}

impl RunOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed { .. })
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, RunOutcome::Rejected)
    }

    pub fn steps(&self) -> usize {
        match self {
            RunOutcome::Completed { steps } | RunOutcome::Faulted { steps, .. } => *steps,
            RunOutcome::Rejected => 0,
        }
    }

    pub fn fault(&self) -> Option<&ApplicationError> {
        match self {
            RunOutcome::Faulted { fault, .. } => Some(fault),
            _ => None,
        }
    }

    /// Surface a fault as an error; completed and rejected runs are `Ok`.
    pub fn into_result(self) -> Result<usize, ApplicationError> {
        match self {
            RunOutcome::Faulted { fault, .. } => Err(fault),
            other => Ok(other.steps()),
        }
    }
}

/// Drives one step producer at a time to completion.
///
/// Each event is handed to every registered consumer in registration order,
/// then the sequencer pauses for the current pacing interval before pulling
/// the next one. A request made while a run is in flight (for instance from
/// inside a consumer) is rejected, never queued.
pub struct Sequencer<V> {
    consumers: RefCell<Vec<Box<dyn StepConsumer<V>>>>,
    pacing: Pacing,
    settle: Duration,
    busy: BusyFlag,
    pause: Box<dyn Pause>,
}

impl<V> Sequencer<V> {
    pub fn new(pacing: Pacing, pause: Box<dyn Pause>) -> Self {
        Self {
            consumers: RefCell::new(Vec::new()),
            pacing,
            settle: Duration::from_millis(DEFAULT_SETTLE_MS),
            busy: BusyFlag::default(),
            pause,
        }
    }

    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    pub fn register(&mut self, consumer: Box<dyn StepConsumer<V>>) {
        debug!(consumer = consumer.name(), "consumer registered");
        self.consumers.get_mut().push(consumer);
    }

    /// Handle to the shared pacing interval.
    pub fn pacing(&self) -> &Pacing {
        &self.pacing
    }

    /// Read-only handle to the single-flight flag.
    pub fn busy(&self) -> BusyFlag {
        self.busy.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }
}

impl<V: Key> Sequencer<V> {
    /// Run `producer` to completion, or until a consumer fails.
    ///
    /// The producer is borrowed so the caller can inspect it afterwards
    /// (e.g. [`crate::domain::SearchSteps::outcome`]).
    #[instrument(level = "debug", skip_all, fields(operation = %producer.operation()))]
    pub fn run<S: StepSource<V>>(&self, producer: &mut S) -> RunOutcome {
        let Some(_guard) = self.busy.try_acquire() else {
            debug!("sequence in flight, request rejected");
            return RunOutcome::Rejected;
        };
        let Ok(mut consumers) = self.consumers.try_borrow_mut() else {
            return RunOutcome::Rejected;
        };

        let operation = producer.operation();
        let mut steps = 0;
        let mut fault = None;

        for consumer in consumers.iter_mut() {
            if let Err(e) = consumer.on_start(&operation, producer.tree()) {
                fault = Some(consumer_fault(consumer.name(), None, e));
                break;
            }
        }

        while fault.is_none() {
            let Some(step) = producer.next() else {
                break;
            };
            steps += 1;
            trace!(kind = %step.kind, message = %step.message, "step");
            for consumer in consumers.iter_mut() {
                if let Err(e) = consumer.on_step(&step, producer.tree()) {
                    fault = Some(consumer_fault(consumer.name(), Some(step.kind), e));
                    break;
                }
            }
            if fault.is_none() {
                self.pause.pause(self.pacing.get());
            }
        }

        self.pause.pause(self.settle);

        let outcome = match fault {
            None => RunOutcome::Completed { steps },
            Some(fault) => {
                warn!(%fault, steps, "sequence aborted");
                RunOutcome::Faulted { steps, fault }
            }
        };
        for consumer in consumers.iter_mut() {
            consumer.on_complete(&outcome, producer.tree());
        }
        debug!(steps = outcome.steps(), "sequence finished");
        outcome
    }
}

fn consumer_fault(name: &str, step: Option<StepKind>, source: ConsumerError) -> ApplicationError {
    ApplicationError::ConsumerFault {
        consumer: name.to_string(),
        step,
        source,
    }
}
