use clap::Parser;
use qaboard::{Backend, Session};

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Show the most used tags")]
pub struct PopularTags {
    /// How many tags to show
    #[arg(long, default_value_t = 12)]
    limit: usize,
}

impl Default for PopularTags {
    fn default() -> Self {
        Self { limit: 12 }
    }
}

impl PopularTags {
    pub fn run<B: Backend>(self, session: &Session<B>) {
        println!("{}", "Popular Tags".info());
        for (tag, count) in session.store().popular_tags(self.limit) {
            println!("  {tag:<20} {}", format!("×{count}").dim());
        }
    }
}
