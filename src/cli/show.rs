use anyhow::Context;
use chrono::Utc;
use clap::{Parser, ValueEnum};
use qaboard::{
    domain::relative_age, Answer, Author, Backend, QuestionId, Session, Target, Thread, VoteState,
};
use serde::Serialize;
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Display a question with its answers")]
pub struct Show {
    /// The id of the question to display
    id: QuestionId,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Serialize)]
struct ThreadJson<'a> {
    #[serde(flatten)]
    thread: &'a Thread,
    viewer_vote: VoteState,
    answer_votes: Vec<AnswerVote>,
}

#[derive(Debug, Serialize)]
struct AnswerVote {
    answer: u64,
    vote: VoteState,
}

impl Show {
    pub const fn new(id: QuestionId) -> Self {
        Self {
            id,
            output: OutputFormat::Pretty,
        }
    }

    #[instrument(level = "debug", skip(self, session), fields(id = %self.id))]
    pub fn run<B: Backend>(self, session: &Session<B>) -> anyhow::Result<()> {
        let Some(thread) = session.thread(self.id) else {
            anyhow::bail!("Question {} not found", self.id);
        };

        match self.output {
            OutputFormat::Pretty => output_pretty(session, thread),
            OutputFormat::Json => output_json(session, thread)?,
        }
        Ok(())
    }
}

fn vote_marker(state: VoteState) -> &'static str {
    match state {
        VoteState::None => "",
        VoteState::Up => " ▲ you upvoted",
        VoteState::Down => " ▼ you downvoted",
    }
}

fn byline(author: &Author) -> String {
    author.reputation.map_or_else(
        || author.name.clone(),
        |reputation| format!("{} ({reputation} reputation)", author.name),
    )
}

fn output_pretty<B: Backend>(session: &Session<B>, thread: &Thread) {
    let now = Utc::now();
    let question = &thread.question;
    let count = thread.answers.len();

    // Header
    println!("# {}", question.title);
    println!(
        "{}",
        format!(
            "Asked {} · {count} answers · {} votes{}",
            relative_age(question.timestamp, now),
            question.vote_count,
            vote_marker(session.vote_state(Target::Question(question.id))),
        )
        .dim()
    );
    println!();
    println!("{}", question.description);
    println!();

    if !question.tags.is_empty() {
        let tags: Vec<String> = question.tags.iter().map(|tag| format!("[{tag}]")).collect();
        println!("{}", tags.join(" ").info());
    }
    println!("{}", format!("Asked by {}", byline(&question.author)).dim());

    println!();
    let plural = if count == 1 { "" } else { "s" };
    println!("{}", format!("{count} Answer{plural}").info());

    for answer in &thread.answers {
        print_answer(session, question.id, answer, now);
    }
}

fn print_answer<B: Backend>(
    session: &Session<B>,
    question: QuestionId,
    answer: &Answer,
    now: chrono::DateTime<Utc>,
) {
    let state = session.vote_state(Target::Answer {
        question,
        answer: answer.id,
    });

    println!();
    let heading = format!(
        "── Answer {} · {} votes{}",
        answer.id,
        answer.vote_count,
        vote_marker(state)
    );
    if answer.is_accepted {
        println!("{} {}", heading, "✓ Accepted Answer".success());
    } else {
        println!("{heading}");
    }
    println!("{}", answer.content);
    println!(
        "{}",
        format!(
            "Answered {} by {}",
            relative_age(answer.timestamp, now),
            byline(&answer.author)
        )
        .dim()
    );
}

fn output_json<B: Backend>(session: &Session<B>, thread: &Thread) -> anyhow::Result<()> {
    let question = thread.question.id;
    let json = ThreadJson {
        thread,
        viewer_vote: session.vote_state(Target::Question(question)),
        answer_votes: thread
            .answers
            .iter()
            .map(|answer| AnswerVote {
                answer: answer.id.0,
                vote: session.vote_state(Target::Answer {
                    question,
                    answer: answer.id,
                }),
            })
            .collect(),
    };

    serde_json::to_writer_pretty(std::io::stdout(), &json)
        .context("failed to render json output")?;
    println!();
    Ok(())
}
