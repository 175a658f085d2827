//! An interactive session over a single in-memory board

use std::{io::IsTerminal, ops::ControlFlow};

use clap::{Parser, Subcommand};
use dialoguer::Input;
use qaboard::{Backend, Notice, Session, VoteState};
use tracing::instrument;

use super::{
    terminal::{Colorize, print_notice},
    Action,
};

#[derive(Debug, Parser)]
#[command(about = "Start an interactive session")]
pub struct Repl {
    /// Prompt shown before each command
    #[arg(long, default_value = "qa")]
    prompt: String,
}

/// One line typed into a session.
#[derive(Debug, Parser)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct Line {
    #[command(subcommand)]
    command: ReplCommand,
}

#[derive(Debug, Subcommand)]
enum ReplCommand {
    #[command(flatten)]
    Action(Action),

    /// List the votes cast in this session
    Votes,

    /// Leave the session
    #[command(alias = "exit")]
    Quit,
}

impl Repl {
    #[instrument(level = "debug", skip_all)]
    pub fn run<B: Backend>(self, session: &mut Session<B>) -> anyhow::Result<()> {
        if std::io::stdin().is_terminal() {
            println!(
                "{}",
                "Type `help` for commands, `quit` to leave. Changes last until you quit.".dim()
            );
            loop {
                let line: String = Input::new()
                    .with_prompt(self.prompt.as_str())
                    .allow_empty(true)
                    .interact_text()?;
                if dispatch(session, &line).is_break() {
                    break;
                }
            }
        } else {
            for line in std::io::stdin().lines() {
                if dispatch(session, &line?).is_break() {
                    break;
                }
            }
        }
        Ok(())
    }
}

fn dispatch<B: Backend>(session: &mut Session<B>, line: &str) -> ControlFlow<()> {
    let words = match split_words(line) {
        Ok(words) if words.is_empty() => return ControlFlow::Continue(()),
        Ok(words) => words,
        Err(e) => {
            eprintln!("{}", format!("error: {e}").warning());
            return ControlFlow::Continue(());
        }
    };

    match Line::try_parse_from(words) {
        Ok(Line {
            command: ReplCommand::Quit,
        }) => return ControlFlow::Break(()),
        Ok(Line {
            command: ReplCommand::Votes,
        }) => print_votes(session),
        Ok(Line {
            command: ReplCommand::Action(action),
        }) => {
            if let Err(e) = action.run(session) {
                tracing::debug!("command failed: {e:#}");
                eprintln!("{}", format!("error: {e:#}").warning());
            }
        }
        Err(e) => {
            // Also covers `help`, which clap reports as an error kind.
            if e.print().is_err() {
                eprintln!("{e}");
            }
        }
    }
    ControlFlow::Continue(())
}

fn print_votes<B: Backend>(session: &Session<B>) {
    let mut votes: Vec<_> = session
        .votes()
        .filter(|(_, state)| *state != VoteState::None)
        .map(|(target, state)| (target.to_string(), state))
        .collect();

    if votes.is_empty() {
        print_notice(&Notice::new("No votes", "You haven't voted yet."));
        return;
    }

    votes.sort_by(|(a, _), (b, _)| a.cmp(b));
    for (target, state) in votes {
        println!("{target}: {state}");
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unterminated {0} quote")]
struct UnterminatedQuote(char);

/// Splits a line into words the way a shell would, minus expansion.
///
/// Single and double quotes group words, and a backslash escapes the next
/// character outside single quotes.
fn split_words(line: &str) -> Result<Vec<String>, UnterminatedQuote> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(open), c) if c == open => quote = None,
            (Some('"') | None, '\\') => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
                in_word = true;
            }
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if let Some(open) = quote {
        return Err(UnterminatedQuote(open));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}
