//! Binary search tree operations as paced, observable step sequences.
//!
//! The [`domain`] layer holds the tree and its step producers, the
//! [`application`] layer drives producers through a single-flight
//! [`application::Sequencer`] to registered consumers, and the
//! [`cli`] layer wires it all to a terminal.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
