//! Bounded, timestamped operation log.

use std::collections::VecDeque;
use std::fmt;
use std::io::Write;

use chrono::{Local, NaiveTime};
use colored::Colorize;
use itertools::Itertools;

use crate::application::{ConsumerError, IoResultExt, RunOutcome, StepConsumer};
use crate::domain::{Bst, Key, Operation, StepEvent, StepKind};

pub const DEFAULT_LOG_CAPACITY: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Error,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub id: u64,
    pub time: NaiveTime,
    pub level: LogLevel,
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.time.format("%H:%M:%S"), self.message)
    }
}

/// Running traversal line, rewritten in place as nodes are visited.
#[derive(Debug)]
struct Accumulator {
    entry: u64,
    prefix: String,
    values: Vec<String>,
}

/// Newest-first log of what the animations did.
///
/// Holds at most `capacity` entries; pushing beyond that drops the oldest.
pub struct StepLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    next_id: u64,
    accumulator: Option<Accumulator>,
    deleting: Option<String>,
    echo: Option<Box<dyn Write>>,
}

impl Default for StepLog {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

impl StepLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
            next_id: 0,
            accumulator: None,
            deleting: None,
            echo: None,
        }
    }

    /// Also print every new or updated entry to `out`.
    pub fn with_echo(mut self, out: Box<dyn Write>) -> Self {
        self.echo = Some(out);
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries, newest first.
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    pub fn push(&mut self, level: LogLevel, message: impl Into<String>) -> Result<u64, ConsumerError> {
        let entry = LogEntry {
            id: self.next_id,
            time: Local::now().time(),
            level,
            message: message.into(),
        };
        self.next_id += 1;
        self.echo_entry(&entry)?;
        let id = entry.id;
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
        Ok(id)
    }

    /// Rewrite entry `id` in place; re-adds it if it was already pruned.
    pub fn update(&mut self, id: u64, message: impl Into<String>) -> Result<u64, ConsumerError> {
        let message = message.into();
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                entry.message = message;
                let entry = entry.clone();
                self.echo_entry(&entry)?;
                Ok(id)
            }
            None => self.push(LogLevel::Info, message),
        }
    }

    /// Session-level notice ("Tree cleared", "Audio muted", ...).
    pub fn system(&mut self, message: impl Into<String>) -> Result<u64, ConsumerError> {
        self.push(LogLevel::System, message)
    }

    fn echo_entry(&mut self, entry: &LogEntry) -> Result<(), ConsumerError> {
        let Some(out) = self.echo.as_mut() else {
            return Ok(());
        };
        let time = entry.time.format("%H:%M:%S").to_string();
        let message = match entry.level {
            LogLevel::Info => entry.message.normal(),
            LogLevel::Success => entry.message.green(),
            LogLevel::Error => entry.message.red(),
            LogLevel::System => entry.message.cyan(),
        };
        writeln!(out, "{} {}", time.dimmed(), message).consumer_context("echo log entry")
    }

    fn accumulate(&mut self, value: String) -> Result<(), ConsumerError> {
        let Some(acc) = self.accumulator.as_mut() else {
            return Ok(());
        };
        acc.values.push(value);
        let line = format!("{}{}", acc.prefix, acc.values.iter().join(" → "));
        let entry = acc.entry;
        let id = self.update(entry, line)?;
        if let Some(acc) = self.accumulator.as_mut() {
            acc.entry = id;
        }
        Ok(())
    }
}

impl<V: Key> StepConsumer<V> for StepLog {
    fn name(&self) -> &'static str {
        "log"
    }

    fn on_start(&mut self, operation: &Operation<V>, _tree: &Bst<V>) -> Result<(), ConsumerError> {
        self.accumulator = None;
        self.deleting = None;
        match operation {
            Operation::Traverse(order) => {
                let prefix = format!("{}: ", order.label());
                let entry = self.push(LogLevel::Info, format!("{prefix}..."))?;
                self.accumulator = Some(Accumulator {
                    entry,
                    prefix,
                    values: Vec::new(),
                });
            }
            Operation::Delete(value) => {
                self.deleting = Some(value.to_string());
                self.push(LogLevel::Info, operation.to_string())?;
            }
            _ => {
                self.push(LogLevel::Info, operation.to_string())?;
            }
        }
        Ok(())
    }

    fn on_step(&mut self, step: &StepEvent<V>, _tree: &Bst<V>) -> Result<(), ConsumerError> {
        let value = step.node.as_ref().map(|n| n.value.to_string());
        match (step.kind, value) {
            (kind, Some(value)) if kind.is_insert() => {
                self.push(LogLevel::Info, format!("Inserted node {value}"))?;
            }
            (StepKind::Found, Some(value)) => {
                self.push(LogLevel::Success, format!("Found value {value}!"))?;
            }
            (StepKind::NotFound | StepKind::FoundDuplicate | StepKind::Empty, _) => {
                self.push(LogLevel::Error, step.message.clone())?;
            }
            (StepKind::DeleteDone, value) => {
                // a swap delete removes the successor's node; report the requested value
                let deleted = self.deleting.clone().or(value).unwrap_or_default();
                self.push(LogLevel::Info, format!("Deleted node {deleted}"))?;
            }
            (StepKind::TraverseVisit, Some(value)) => self.accumulate(value)?,
            _ => {}
        }
        Ok(())
    }

    fn on_complete(&mut self, outcome: &RunOutcome, _tree: &Bst<V>) {
        self.accumulator = None;
        self.deleting = None;
        if let Some(fault) = outcome.fault() {
            // nothing to propagate to once the run is over
            let _ = self.push(LogLevel::Error, format!("Error: {fault}"));
        }
    }
}
