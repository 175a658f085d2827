use clap::Parser;
use qaboard::{Backend, QuestionDraft, Session};
use tracing::instrument;

use super::terminal::{print_notice, Colorize};

#[derive(Debug, Parser)]
#[command(about = "Ask a new question")]
pub struct Ask {
    /// The question title
    #[arg(long, short, default_value = "")]
    title: String,

    /// The question body. Markdown code fences are kept as written.
    #[arg(long, short, default_value = "")]
    description: String,

    /// Tags (comma-separated or repeated, at most five)
    #[arg(long = "tag", short = 'g', value_delimiter = ',', value_name = "TAG")]
    tags: Vec<String>,
}

impl Ask {
    #[instrument(level = "debug", skip_all)]
    pub fn run<B: Backend>(self, session: &mut Session<B>) -> anyhow::Result<()> {
        let mut draft = QuestionDraft::new(self.title, self.description);
        for tag in &self.tags {
            if let Err(e) = draft.add_tag(tag) {
                eprintln!("{}", format!("Skipping tag '{tag}': {e}").warning());
            }
        }

        match session.submit_question(&draft) {
            Ok((id, notice)) => {
                print_notice(&notice);
                println!("{}", format!("View it with `qa open /question/{id}`").dim());
                Ok(())
            }
            Err(e) => {
                print_notice(&e.notice());
                Err(e.into())
            }
        }
    }
}
