//! Interactive shell: one command per line, mirroring the buttons and
//! keyboard shortcuts of a graphical front-end.

use std::io::BufRead;
use std::str::FromStr;

use tracing::{debug, instrument};

use crate::application::{RunOutcome, Session};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::domain::TraversalOrder;

pub const HELP: &str = "\
commands:
  insert N | i N      animate inserting N
  delete N | d N      animate deleting N
  search N | s N      animate searching for N
  inorder | preorder | postorder
  random | r          insert a random value
  clear | c           drop the whole tree
  speed S             animation speed, 0 (slow) to 100 (fast)
  mute                toggle audio cues
  tree                print the tree
  log                 print the step log
  help | ?            this text
  quit | q            leave";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellCommand {
    Insert(i64),
    Delete(i64),
    Search(i64),
    Traverse(TraversalOrder),
    Random,
    Clear,
    Speed(u8),
    Mute,
    Tree,
    Log,
    Help,
    Quit,
}

impl FromStr for ShellCommand {
    type Err = CliError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Err(CliError::Usage("empty command".into()));
        };
        let verb = verb.to_lowercase();
        let arg = words.next();
        if words.next().is_some() {
            return Err(CliError::Usage(format!("too many arguments for '{verb}'")));
        }

        let command = match verb.as_str() {
            "insert" | "i" => ShellCommand::Insert(number(&verb, arg)?),
            "delete" | "d" => ShellCommand::Delete(number(&verb, arg)?),
            "search" | "s" => ShellCommand::Search(number(&verb, arg)?),
            "speed" => ShellCommand::Speed(number(&verb, arg)?),
            "inorder" | "preorder" | "postorder" => ShellCommand::Traverse(
                verb.parse::<TraversalOrder>()
                    .map_err(|e| CliError::InvalidArgs(e.to_string()))?,
            ),
            "random" | "r" => ShellCommand::Random,
            "clear" | "c" => ShellCommand::Clear,
            "mute" | "m" => ShellCommand::Mute,
            "tree" | "t" => ShellCommand::Tree,
            "log" | "l" => ShellCommand::Log,
            "help" | "h" | "?" => ShellCommand::Help,
            "quit" | "q" | "exit" => ShellCommand::Quit,
            other => return Err(CliError::Usage(format!("unknown command '{other}', try 'help'"))),
        };
        if arg.is_some() && !takes_argument(&command) {
            return Err(CliError::Usage(format!("'{verb}' takes no argument")));
        }
        Ok(command)
    }
}

fn takes_argument(command: &ShellCommand) -> bool {
    matches!(
        command,
        ShellCommand::Insert(_) | ShellCommand::Delete(_) | ShellCommand::Search(_) | ShellCommand::Speed(_)
    )
}

fn number<T: FromStr>(verb: &str, arg: Option<&str>) -> Result<T, CliError> {
    let arg = arg.ok_or_else(|| CliError::Usage(format!("'{verb}' needs a number")))?;
    arg.parse()
        .map_err(|_| CliError::InvalidArgs(format!("'{arg}' is not a valid number for '{verb}'")))
}

/// Read commands from `input` until `quit` or end of input.
///
/// Bad input is reported and skipped; only I/O failures end the loop early.
#[instrument(level = "debug", skip_all)]
pub fn run_shell<R: BufRead>(session: &mut Session, input: R, interactive: bool) -> CliResult<()> {
    if interactive {
        output::header("bstviz shell, 'help' lists commands");
    }
    let mut lines = input.lines();
    loop {
        if interactive {
            output::prompt("bst>");
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.map_err(|e| crate::infrastructure::InfraError::io("read command", e))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match line.parse::<ShellCommand>() {
            Ok(ShellCommand::Quit) => break,
            Ok(command) => {
                debug!(?command, "shell command");
                execute(session, command)?;
            }
            Err(e) => output::error(&e),
        }
    }
    Ok(())
}

/// Run one shell command against the session.
pub fn execute(session: &mut Session, command: ShellCommand) -> CliResult<()> {
    match command {
        ShellCommand::Insert(value) => report(session.insert(value)),
        ShellCommand::Delete(value) => report(session.delete(value)),
        ShellCommand::Search(value) => {
            let (outcome, found) = session.search(value);
            report(outcome);
            match found {
                Some(true) => output::success(&format!("{value} found")),
                Some(false) => output::failure(&format!("{value} not found")),
                None => {}
            }
        }
        ShellCommand::Traverse(order) => report(session.traverse(order)),
        ShellCommand::Random => {
            let (value, outcome) = session.random_insert();
            output::action("Random", &value);
            report(outcome);
        }
        ShellCommand::Clear => session.clear()?,
        ShellCommand::Speed(slider) => {
            session.set_speed(slider);
            output::action(
                "Speed",
                &format!("{slider} ({} ms per step)", session.sequencer().pacing().millis()),
            );
        }
        ShellCommand::Mute => {
            session.toggle_audio()?;
        }
        ShellCommand::Tree => output::info(&session.render()),
        ShellCommand::Log => {
            for entry in session.log().entries() {
                output::detail(entry);
            }
        }
        ShellCommand::Help => output::info(HELP),
        ShellCommand::Quit => {}
    }
    Ok(())
}

/// A faulted run is reported, not fatal: the tree is still consistent.
fn report(outcome: RunOutcome) {
    match outcome {
        RunOutcome::Completed { steps } => debug!(steps, "animation finished"),
        RunOutcome::Rejected => output::warning("an animation is already running"),
        RunOutcome::Faulted { fault, .. } => output::error(&fault),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("insert 5", ShellCommand::Insert(5))]
    #[case("  I -3 ", ShellCommand::Insert(-3))]
    #[case("d 7", ShellCommand::Delete(7))]
    #[case("search 42", ShellCommand::Search(42))]
    #[case("postorder", ShellCommand::Traverse(TraversalOrder::Postorder))]
    #[case("speed 80", ShellCommand::Speed(80))]
    #[case("r", ShellCommand::Random)]
    #[case("?", ShellCommand::Help)]
    #[case("exit", ShellCommand::Quit)]
    fn parses_commands(#[case] line: &str, #[case] expected: ShellCommand) {
        assert_eq!(line.parse::<ShellCommand>().unwrap(), expected);
    }

    #[rstest]
    #[case("insert")]
    #[case("insert x")]
    #[case("insert 1 2")]
    #[case("speed 300")]
    #[case("clear 4")]
    #[case("dance")]
    fn rejects_bad_input(#[case] line: &str) {
        assert!(line.parse::<ShellCommand>().is_err());
    }
}
