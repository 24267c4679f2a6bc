//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::domain::TraversalOrder;

/// Step-by-step binary search tree animations in the terminal
#[derive(Parser, Debug)]
#[command(name = "bstviz")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug level: -d info, -dd debug, -ddd trace
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub debug: u8,

    /// Extra config file, layered over the global one
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Pause between steps in milliseconds
    #[arg(long, global = true, conflicts_with = "speed")]
    pub pacing_ms: Option<u64>,

    /// Animation speed, 0 (slowest) to 100 (fastest)
    #[arg(long, global = true, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub speed: Option<u8>,

    /// Disable audio cues
    #[arg(long, global = true)]
    pub mute: bool,

    /// Starting tree, inserted without animation (e.g. --seed 50,30,70)
    #[arg(long, global = true, value_delimiter = ',', allow_negative_numbers = true)]
    pub seed: Vec<i64>,

    /// Start from N random values instead
    #[arg(long, global = true, value_name = "N", conflicts_with = "seed")]
    pub random: Option<usize>,

    /// Seed for the random value generator
    #[arg(long, global = true)]
    pub rng_seed: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Insert values one after another
    Insert {
        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<i64>,
    },

    /// Delete values one after another
    Delete {
        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<i64>,
    },

    /// Search for a value
    Search {
        #[arg(allow_negative_numbers = true)]
        value: i64,
    },

    /// Walk the tree: inorder, preorder or postorder
    Traverse { order: TraversalOrder },

    /// Interactive session
    Shell,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Print a config template
    Init,

    /// Show config paths
    Path,
}
