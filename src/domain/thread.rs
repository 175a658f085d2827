//! A question together with its answers.
//!
//! The [`Thread`] owns the acceptance invariant: at most one answer is
//! accepted at any time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use crate::domain::{Answer, AnswerId, Author, Notice, Question, QuestionId};

/// Errors raised by thread operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ThreadError {
    /// No question with this id exists.
    #[error("question {0} not found")]
    QuestionNotFound(QuestionId),
    /// The question has no answer with this id.
    #[error("answer {answer} not found on question {question}")]
    AnswerNotFound {
        /// The question that was searched.
        question: QuestionId,
        /// The missing answer.
        answer: AnswerId,
    },
    /// The submitted answer was blank.
    #[error("an answer cannot be empty")]
    EmptyAnswer,
    /// The id a new answer would get is already taken.
    #[error("answer {answer} already exists on question {question}")]
    AnswerIdTaken {
        /// The question being answered.
        question: QuestionId,
        /// The id that would have been reused.
        answer: AnswerId,
    },
    /// A score or answer count would leave its range.
    #[error("a count on question {0} is out of range")]
    CountOverflow(QuestionId),
}

/// The result of toggling acceptance on an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcceptOutcome {
    /// The answer that was toggled.
    pub answer: AnswerId,
    /// Whether that answer is now accepted.
    pub accepted: bool,
    /// The answer that lost acceptance, if a different one was accepted.
    pub displaced: Option<AnswerId>,
}

impl AcceptOutcome {
    /// The message shown to the viewer.
    #[must_use]
    pub fn notice(&self) -> Notice {
        if self.accepted {
            Notice::new(
                "Answer accepted!",
                "This answer has been marked as the solution.",
            )
        } else {
            Notice::new(
                "Answer unaccepted",
                "This answer is no longer marked as the solution.",
            )
        }
    }
}

/// A question and its answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    /// The question.
    #[serde(flatten)]
    pub question: Question,
    /// Answers in posting order.
    #[serde(default)]
    pub answers: Vec<Answer>,
}

impl Thread {
    /// Creates a thread with no answers.
    #[must_use]
    pub const fn new(question: Question) -> Self {
        Self {
            question,
            answers: Vec::new(),
        }
    }

    /// The thread's question id.
    #[must_use]
    pub const fn id(&self) -> QuestionId {
        self.question.id
    }

    /// Looks up an answer.
    #[must_use]
    pub fn answer(&self, id: AnswerId) -> Option<&Answer> {
        self.answers.iter().find(|answer| answer.id == id)
    }

    fn answer_mut(&mut self, id: AnswerId) -> Result<&mut Answer, ThreadError> {
        let question = self.question.id;
        self.answers
            .iter_mut()
            .find(|answer| answer.id == id)
            .ok_or(ThreadError::AnswerNotFound { question, answer: id })
    }

    /// The currently accepted answer, if any.
    #[must_use]
    pub fn accepted(&self) -> Option<&Answer> {
        self.answers.iter().find(|answer| answer.is_accepted)
    }

    /// Toggles acceptance on `id` and clears it on every other answer.
    ///
    /// Accepting the currently accepted answer un-accepts it. The question's
    /// `is_answered` flag follows whether an answer is accepted afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`ThreadError::AnswerNotFound`] if the question has no such
    /// answer. The thread is unchanged in that case.
    #[instrument(level = "debug", skip(self), fields(question = %self.question.id))]
    pub fn accept(&mut self, id: AnswerId) -> Result<AcceptOutcome, ThreadError> {
        // validate first so a missing id leaves acceptance untouched
        self.answer_mut(id)?;

        let displaced = self
            .accepted()
            .map(|answer| answer.id)
            .filter(|accepted| *accepted != id);

        let mut accepted = false;
        for answer in &mut self.answers {
            answer.is_accepted = if answer.id == id {
                !answer.is_accepted
            } else {
                false
            };
            accepted |= answer.is_accepted;
        }
        self.question.is_answered = accepted;

        Ok(AcceptOutcome {
            answer: id,
            accepted,
            displaced,
        })
    }

    /// Appends a new answer and returns it.
    ///
    /// The id is the number of answers plus one. The new answer starts with no
    /// votes and is not accepted.
    ///
    /// # Errors
    ///
    /// Returns [`ThreadError::EmptyAnswer`] if `content` is blank,
    /// [`ThreadError::AnswerIdTaken`] if the answers are not numbered
    /// consecutively, and [`ThreadError::CountOverflow`] if the answer count is
    /// already at its maximum. The thread is unchanged on error.
    #[instrument(level = "debug", skip(self, content), fields(question = %self.question.id))]
    pub fn submit_answer(
        &mut self,
        content: &str,
        author: Author,
        now: DateTime<Utc>,
    ) -> Result<&Answer, ThreadError> {
        if content.trim().is_empty() {
            return Err(ThreadError::EmptyAnswer);
        }

        let question = self.question.id;
        let id = AnswerId(self.answers.len() as u64 + 1);
        if self.answer(id).is_some() {
            return Err(ThreadError::AnswerIdTaken { question, answer: id });
        }
        let answer_count = self
            .question
            .answer_count
            .checked_add(1)
            .ok_or(ThreadError::CountOverflow(question))?;

        self.answers.push(Answer {
            id,
            content: content.to_string(),
            vote_count: 0,
            timestamp: now,
            author,
            is_accepted: false,
        });
        self.question.answer_count = answer_count;

        tracing::debug!(answer = %id, "answer submitted");
        Ok(&self.answers[self.answers.len() - 1])
    }

    /// Adds `delta` to the score of the question or one of its answers.
    ///
    /// # Errors
    ///
    /// Returns [`ThreadError::AnswerNotFound`] for an unknown answer and
    /// [`ThreadError::CountOverflow`] if the score would leave the `i64` range.
    /// The score is unchanged on error.
    pub fn adjust_votes(&mut self, answer: Option<AnswerId>, delta: i64) -> Result<(), ThreadError> {
        let question = self.question.id;
        let score = match answer {
            None => &mut self.question.vote_count,
            Some(id) => &mut self.answer_mut(id)?.vote_count,
        };
        *score = score
            .checked_add(delta)
            .ok_or(ThreadError::CountOverflow(question))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Tags;

    fn thread_with_answers(count: u64) -> Thread {
        let now = Utc::now();
        let mut thread = Thread::new(Question {
            id: QuestionId(1),
            title: "title".to_string(),
            description: "description".to_string(),
            tags: Tags::default(),
            answer_count: 0,
            vote_count: 0,
            timestamp: now,
            author: Author::new("Asker", 10),
            is_answered: false,
        });
        for i in 0..count {
            thread
                .submit_answer(&format!("answer {i}"), Author::new("Helper", 1), now)
                .unwrap();
        }
        thread
    }

    fn accepted_ids(thread: &Thread) -> Vec<AnswerId> {
        thread
            .answers
            .iter()
            .filter(|answer| answer.is_accepted)
            .map(|answer| answer.id)
            .collect()
    }

    #[test]
    fn accepting_two_then_one_leaves_only_one() {
        let mut thread = thread_with_answers(3);

        thread.accept(AnswerId(2)).unwrap();
        let outcome = thread.accept(AnswerId(1)).unwrap();

        assert_eq!(accepted_ids(&thread), vec![AnswerId(1)]);
        assert_eq!(outcome.displaced, Some(AnswerId(2)));
        assert!(outcome.accepted);
        assert!(thread.question.is_answered);
    }

    #[test]
    fn accepting_again_toggles_off() {
        let mut thread = thread_with_answers(2);

        thread.accept(AnswerId(2)).unwrap();
        let outcome = thread.accept(AnswerId(2)).unwrap();

        assert!(!outcome.accepted);
        assert_eq!(outcome.displaced, None);
        assert!(accepted_ids(&thread).is_empty());
        assert!(!thread.question.is_answered);
        assert_eq!(outcome.notice().title, "Answer unaccepted");
    }

    #[test]
    fn accepting_unknown_answer_changes_nothing() {
        let mut thread = thread_with_answers(2);
        thread.accept(AnswerId(1)).unwrap();
        let before = thread.clone();

        let err = thread.accept(AnswerId(9)).unwrap_err();

        assert_eq!(
            err,
            ThreadError::AnswerNotFound {
                question: QuestionId(1),
                answer: AnswerId(9),
            }
        );
        assert_eq!(thread, before);
    }

    #[test]
    fn submitted_answers_get_count_based_ids() {
        let mut thread = thread_with_answers(2);
        let now = Utc::now();

        let answer = thread
            .submit_answer("a third opinion", Author::new("You", 500), now)
            .unwrap();

        assert_eq!(answer.id, AnswerId(3));
        assert_eq!(answer.vote_count, 0);
        assert!(!answer.is_accepted);
        assert_eq!(answer.timestamp, now);
        assert_eq!(thread.question.answer_count, 3);
    }

    #[test]
    fn blank_answers_are_rejected() {
        let mut thread = thread_with_answers(1);

        let err = thread
            .submit_answer("  \n\t", Author::new("You", 500), Utc::now())
            .unwrap_err();

        assert_eq!(err, ThreadError::EmptyAnswer);
        assert_eq!(thread.answers.len(), 1);
    }

    #[test]
    fn adjusts_question_and_answer_scores() {
        let mut thread = thread_with_answers(1);

        thread.adjust_votes(None, 1).unwrap();
        thread.adjust_votes(Some(AnswerId(1)), -2).unwrap();

        assert_eq!(thread.question.vote_count, 1);
        assert_eq!(thread.answers[0].vote_count, -2);
        assert!(thread.adjust_votes(Some(AnswerId(5)), 1).is_err());
    }

    #[test]
    fn scores_and_counts_do_not_wrap() {
        let mut thread = thread_with_answers(1);
        thread.question.vote_count = i64::MAX;
        thread.question.answer_count = u32::MAX;

        assert_eq!(
            thread.adjust_votes(None, 1),
            Err(ThreadError::CountOverflow(QuestionId(1)))
        );
        assert_eq!(thread.question.vote_count, i64::MAX);
        thread.adjust_votes(None, -2).unwrap();
        assert_eq!(thread.question.vote_count, i64::MAX - 2);

        let err = thread
            .submit_answer("one more", Author::new("You", 500), Utc::now())
            .unwrap_err();
        assert_eq!(err, ThreadError::CountOverflow(QuestionId(1)));
        assert_eq!(thread.answers.len(), 1);
    }

    #[test]
    fn new_answer_never_reuses_an_existing_id() {
        let mut thread = thread_with_answers(2);
        thread.answers[1].id = AnswerId(3);

        let err = thread
            .submit_answer("duplicate", Author::new("You", 500), Utc::now())
            .unwrap_err();

        assert_eq!(
            err,
            ThreadError::AnswerIdTaken {
                question: QuestionId(1),
                answer: AnswerId(3),
            }
        );
        assert_eq!(thread.answers.len(), 2);
    }
}
