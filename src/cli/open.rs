use clap::Parser;
use qaboard::{Backend, Route, Session};
use tracing::instrument;

use super::{list::List, show::Show, tags::PopularTags, terminal::Colorize};

const QUESTION_TIPS: [&str; 4] = [
    "Be specific and clear in your title",
    "Provide context and what you've tried",
    "Include relevant code snippets",
    "Add appropriate tags to help others find your question",
];

#[derive(Debug, Parser)]
#[command(about = "Open a page by path")]
pub struct Open {
    /// The path to open: /, /ask, /question/<id> or /login
    #[arg(default_value = "/")]
    path: Route,
}

impl Open {
    #[instrument(level = "debug", skip(session))]
    pub fn run<B: Backend>(self, session: &mut Session<B>) -> anyhow::Result<()> {
        match self.path {
            Route::Home => List::default().run(session)?,
            Route::Question(id) => Show::new(id).run(session)?,
            Route::Ask => {
                println!("Ask a New Question");
                println!(
                    "{}",
                    "Get help from the community by asking a detailed question".dim()
                );
                println!();
                for tip in QUESTION_TIPS {
                    println!("  • {tip}");
                }
                println!();
                PopularTags::default().run(session);
                println!();
                println!(
                    "{}",
                    "qa ask --title \"...\" --description \"...\" --tag <TAG>,...".dim()
                );
            }
            Route::Login => {
                match session.signed_in() {
                    Some(email) => println!("Signed in as {email}"),
                    None => println!("Not signed in"),
                }
                println!();
                println!("{}", "qa login --email <EMAIL>".dim());
                println!("{}", "qa register --name <NAME> --email <EMAIL>".dim());
            }
            Route::NotFound(path) => {
                eprintln!("{}", format!("404: page not found ({path})").warning());
                eprintln!("{}", "Return to Home with `qa open /`".dim());
            }
        }
        Ok(())
    }
}
