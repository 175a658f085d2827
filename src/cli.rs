use std::{path::PathBuf, time::Duration};

mod ask;
mod auth;
mod init;
mod list;
mod open;
mod repl;
mod show;
mod tags;
mod terminal;
mod vote;

use anyhow::Context;
use ask::Ask;
use auth::{Login, Register};
use clap::ArgAction;
use init::Init;
use list::List;
use open::Open;
use qaboard::{Backend, Config, Fixtures, QuestionStore, Session};
use repl::Repl;
use show::Show;
use tags::PopularTags;
use terminal::SpinnerBackend;
use tracing::instrument;
use vote::{Accept, Answer, Vote};

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the configuration file
    #[arg(short, long, default_value = "qa.toml", global = true)]
    config: PathBuf,

    /// YAML or JSON fixture file to seed the board with (overrides the
    /// configuration)
    #[arg(short, long, global = true)]
    fixtures: Option<PathBuf>,

    /// Simulated network delay in milliseconds (overrides the configuration)
    #[arg(long, value_name = "MS", global = true)]
    delay: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(mut self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        match self.command.take().unwrap_or_default() {
            Command::Init(init) => init.run(&self.config),
            Command::Session(repl) => repl.run(&mut self.open_session()?),
            Command::Action(action) => action.run(&mut self.open_session()?),
        }
    }

    #[instrument(level = "debug", skip(self))]
    fn open_session(&self) -> anyhow::Result<Session<SpinnerBackend>> {
        let mut config = Config::load_or_default(&self.config)?;
        if let Some(ms) = self.delay {
            config.set_submit_delay(Duration::from_millis(ms));
        }

        let fixtures = match self.fixtures.as_ref().or(config.fixtures.as_ref()) {
            Some(path) => Fixtures::load(path)
                .with_context(|| format!("failed to load fixtures from {}", path.display()))?,
            None => Fixtures::builtin()?,
        };

        let backend = SpinnerBackend::new(config.submit_delay());
        Ok(Session::new(
            QuestionStore::from_fixtures(fixtures),
            config,
            backend,
        ))
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Write a configuration file
    ///
    /// The file is written to the `--config` path.
    Init(Init),

    /// Start an interactive session
    ///
    /// Every action in a session applies to the same in-memory board, so
    /// votes, answers and new questions are visible to later commands.
    Session(Repl),

    #[command(flatten)]
    Action(Action),
}

impl Default for Command {
    fn default() -> Self {
        Self::Action(Action::List(List::default()))
    }
}

/// Actions that make sense both as one-shot commands and inside a session.
#[derive(Debug, clap::Subcommand)]
pub enum Action {
    /// List questions (default)
    List(List),

    /// Show a question with its answers
    Show(Show),

    /// Open a page by path, e.g. `/question/1`
    Open(Open),

    /// Ask a new question
    Ask(Ask),

    /// Upvote or downvote a question or an answer
    ///
    /// Voting the same way twice removes the vote.
    Vote(Vote),

    /// Accept an answer, or un-accept the accepted one
    Accept(Accept),

    /// Post an answer to a question
    Answer(Answer),

    /// Show the most used tags
    Tags(PopularTags),

    /// Sign in
    Login(Login),

    /// Create an account
    Register(Register),
}

impl Action {
    fn run<B: Backend>(self, session: &mut Session<B>) -> anyhow::Result<()> {
        match self {
            Self::List(command) => command.run(session)?,
            Self::Show(command) => command.run(session)?,
            Self::Open(command) => command.run(session)?,
            Self::Ask(command) => command.run(session)?,
            Self::Vote(command) => command.run(session)?,
            Self::Accept(command) => command.run(session)?,
            Self::Answer(command) => command.run(session)?,
            Self::Tags(command) => command.run(session),
            Self::Login(command) => command.run(session)?,
            Self::Register(command) => command.run(session)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::*;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_lists_questions() {
        let cli = Cli::try_parse_from(["qa"]).unwrap();
        assert!(matches!(
            cli.command.unwrap_or_default(),
            Command::Action(Action::List(_))
        ));
    }

    #[test]
    fn global_flags_work_after_the_subcommand() {
        let cli = Cli::try_parse_from(["qa", "show", "3", "--delay", "0", "-vv"]).unwrap();
        assert_eq!(cli.delay, Some(0));
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Some(Command::Action(Action::Show(_)))));
    }
}
