use clap::{Parser, Subcommand};
use qaboard::{AnswerId, Backend, Direction, QuestionId, Session, Target};
use tracing::instrument;

use super::terminal::{print_notice, Colorize};

#[derive(Debug, Parser)]
#[command(about = "Upvote or downvote a question or an answer")]
pub struct Vote {
    /// up or down
    direction: Direction,

    #[command(subcommand)]
    target: VoteTarget,
}

#[derive(Debug, Subcommand)]
enum VoteTarget {
    /// Vote on a question
    Question {
        /// The question id
        id: QuestionId,
    },
    /// Vote on an answer
    Answer {
        /// The question the answer belongs to
        question: QuestionId,
        /// The answer id
        answer: AnswerId,
    },
}

impl From<VoteTarget> for Target {
    fn from(target: VoteTarget) -> Self {
        match target {
            VoteTarget::Question { id } => Self::Question(id),
            VoteTarget::Answer { question, answer } => Self::Answer { question, answer },
        }
    }
}

impl Vote {
    #[instrument(level = "debug", skip(session))]
    pub fn run<B: Backend>(self, session: &mut Session<B>) -> anyhow::Result<()> {
        let target = Target::from(self.target);
        let change = session.vote(target, self.direction)?;
        print_notice(&change.notice());

        if let Some(thread) = session.thread(target.question()) {
            let score = match target {
                Target::Question(_) => Some(thread.question.vote_count),
                Target::Answer { answer, .. } => thread.answer(answer).map(|a| a.vote_count),
            };
            if let Some(score) = score {
                println!("{}", format!("{target}: {score} votes").dim());
            }
        }
        Ok(())
    }
}

#[derive(Debug, Parser)]
#[command(about = "Accept an answer, or un-accept the accepted one")]
pub struct Accept {
    /// The question id
    question: QuestionId,

    /// The answer to accept
    answer: AnswerId,
}

impl Accept {
    #[instrument(level = "debug", skip(session))]
    pub fn run<B: Backend>(self, session: &mut Session<B>) -> anyhow::Result<()> {
        let notice = session.accept(self.question, self.answer)?;
        print_notice(&notice);
        Ok(())
    }
}

#[derive(Debug, Parser)]
#[command(about = "Post an answer to a question")]
pub struct Answer {
    /// The question to answer
    question: QuestionId,

    /// The answer text
    #[arg(trailing_var_arg = true, num_args = 1.., required = true)]
    content: Vec<String>,
}

impl Answer {
    #[instrument(level = "debug", skip_all, fields(question = %self.question))]
    pub fn run<B: Backend>(self, session: &mut Session<B>) -> anyhow::Result<()> {
        session.set_answer_buffer(self.content.join(" "));
        let (id, notice) = session.submit_answer(self.question)?;
        print_notice(&notice);
        println!(
            "{}",
            format!("Answer {id} added to question {}", self.question).dim()
        );
        Ok(())
    }
}
