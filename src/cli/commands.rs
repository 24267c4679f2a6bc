//! Command dispatch: settings, session wiring and one handler per subcommand.

use std::io;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::Session;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::shell::{self, ShellCommand};
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::infrastructure::ServiceContainer;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        Some(Commands::Config { command }) => _config(cli, command),
        Some(Commands::Insert { values }) => {
            let mut session = session(cli, false)?;
            values
                .iter()
                .try_for_each(|v| shell::execute(&mut session, ShellCommand::Insert(*v)))
        }
        Some(Commands::Delete { values }) => {
            let mut session = session(cli, false)?;
            values
                .iter()
                .try_for_each(|v| shell::execute(&mut session, ShellCommand::Delete(*v)))
        }
        Some(Commands::Search { value }) => {
            let mut session = session(cli, false)?;
            shell::execute(&mut session, ShellCommand::Search(*value))
        }
        Some(Commands::Traverse { order }) => {
            let mut session = session(cli, false)?;
            shell::execute(&mut session, ShellCommand::Traverse(*order))
        }
        Some(Commands::Shell) | None => _shell(cli),
    }
}

/// Settings from files and environment, then command-line overrides.
pub fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(ms) = cli.pacing_ms {
        settings.pacing_ms = ms;
    }
    if let Some(slider) = cli.speed {
        settings.pacing_ms = crate::application::speed_to_millis(slider);
    }
    if cli.mute {
        settings.audio_enabled = false;
    }
    settings.validate()?;
    Ok(settings)
}

/// Build a session and its starting tree.
///
/// `--seed` values win; otherwise `--random N`; otherwise the shell starts
/// with `seed_nodes` random values and one-shot commands with an empty tree.
#[instrument(level = "debug", skip(cli))]
fn session(cli: &Cli, interactive: bool) -> CliResult<Session> {
    let settings = load_settings(cli)?;
    let seed_nodes = settings.seed_nodes;
    let mut container = ServiceContainer::new(settings);
    if let Some(seed) = cli.rng_seed {
        container = container.with_rng_seed(seed);
    }
    let mut session = container.into_session()?;

    if !cli.seed.is_empty() {
        for value in &cli.seed {
            session.quick_insert(*value)?;
        }
    } else if let Some(count) = cli.random {
        session.seed_random(count)?;
    } else if interactive {
        session.seed_random(seed_nodes)?;
    }
    debug!(nodes = session.tree().len(), "session ready");
    Ok(session)
}

fn _shell(cli: &Cli) -> CliResult<()> {
    let mut session = session(cli, true)?;
    let stdin = io::stdin();
    shell::run_shell(&mut session, stdin.lock(), true)
}

fn _config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Init => output::info(&Settings::template()),
        ConfigCommands::Path => match global_config_path() {
            Some(path) => {
                let state = if path.exists() { "exists" } else { "not found" };
                output::action("Global", &format!("{} ({state})", path.display()));
            }
            None => {
                return Err(CliError::Usage(
                    "cannot determine config directory".to_string(),
                ))
            }
        },
    }
    Ok(())
}
