//! Per-viewer vote state.
//!
//! Each target (a question, or an answer within a question) is in one of three
//! states: no vote, upvoted or downvoted. Casting the current direction again
//! clears the vote; casting the opposite direction switches it directly.

use std::{collections::HashMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::domain::{AnswerId, Notice, QuestionId};

/// The direction of a vote action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Upvote.
    Up,
    /// Downvote.
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Up => "up",
            Self::Down => "down",
        })
    }
}

impl FromStr for Direction {
    type Err = UnknownDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" | "+" => Ok(Self::Up),
            "down" | "-" => Ok(Self::Down),
            _ => Err(UnknownDirection(s.to_string())),
        }
    }
}

/// Error returned when parsing a [`Direction`] fails.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown vote direction '{0}': expected 'up' or 'down'")]
pub struct UnknownDirection(String);

/// A viewer's current vote on one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteState {
    /// No vote cast.
    #[default]
    None,
    /// Upvoted.
    Up,
    /// Downvoted.
    Down,
}

impl VoteState {
    /// The state reached by casting `direction` from this state.
    #[must_use]
    pub const fn after(self, direction: Direction) -> Self {
        match (self, direction) {
            (Self::Up, Direction::Up) | (Self::Down, Direction::Down) => Self::None,
            (_, Direction::Up) => Self::Up,
            (_, Direction::Down) => Self::Down,
        }
    }

    /// This state's contribution to the target's aggregate score.
    #[must_use]
    pub const fn weight(self) -> i64 {
        match self {
            Self::None => 0,
            Self::Up => 1,
            Self::Down => -1,
        }
    }
}

impl fmt::Display for VoteState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::Up => "up",
            Self::Down => "down",
        })
    }
}

/// Something that can be voted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// A question.
    Question(QuestionId),
    /// An answer. Answer ids are only unique within their question.
    Answer {
        /// The question the answer belongs to.
        question: QuestionId,
        /// The answer itself.
        answer: AnswerId,
    },
}

impl Target {
    /// The question this target belongs to.
    #[must_use]
    pub const fn question(self) -> QuestionId {
        match self {
            Self::Question(id) | Self::Answer { question: id, .. } => id,
        }
    }

    /// `"question"` or `"answer"`.
    #[must_use]
    pub const fn kind(self) -> &'static str {
        match self {
            Self::Question(_) => "question",
            Self::Answer { .. } => "answer",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Question(id) => write!(f, "question {id}"),
            Self::Answer { question, answer } => write!(f, "answer {answer} on question {question}"),
        }
    }
}

/// The result of casting a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteChange {
    /// What was voted on.
    pub target: Target,
    /// The direction that was cast.
    pub direction: Direction,
    /// State before the vote.
    pub previous: VoteState,
    /// State after the vote.
    pub current: VoteState,
}

impl VoteChange {
    /// How much the target's aggregate score moves as a result of this change.
    #[must_use]
    pub const fn delta(&self) -> i64 {
        self.current.weight() - self.previous.weight()
    }

    /// `true` when the vote toggled off.
    #[must_use]
    pub fn is_removal(&self) -> bool {
        self.current == VoteState::None
    }

    /// The message shown to the viewer.
    #[must_use]
    pub fn notice(&self) -> Notice {
        if self.is_removal() {
            Notice::new(
                "Vote removed",
                format!("Your {}vote has been removed.", self.direction),
            )
        } else {
            Notice::new(
                "Vote recorded",
                format!("You {}voted this {}.", self.direction, self.target.kind()),
            )
        }
    }
}

/// One viewer's votes, keyed by target.
///
/// Targets without an entry have no vote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoteBook {
    votes: HashMap<Target, VoteState>,
}

impl VoteBook {
    /// The viewer's current vote on `target`.
    #[must_use]
    pub fn state(&self, target: Target) -> VoteState {
        self.votes.get(&target).copied().unwrap_or_default()
    }

    /// Casts a vote and returns the transition that took place.
    pub fn cast(&mut self, target: Target, direction: Direction) -> VoteChange {
        let previous = self.state(target);
        let current = previous.after(direction);

        if current == VoteState::None {
            self.votes.remove(&target);
        } else {
            self.votes.insert(target, current);
        }

        tracing::debug!(%target, %previous, %current, "vote cast");

        VoteChange {
            target,
            direction,
            previous,
            current,
        }
    }

    /// Iterates over every target that currently has a vote.
    pub fn iter(&self) -> impl Iterator<Item = (Target, VoteState)> + '_ {
        self.votes.iter().map(|(target, state)| (*target, *state))
    }

    /// Number of targets with a vote.
    #[must_use]
    pub fn len(&self) -> usize {
        self.votes.len()
    }

    /// `true` if no votes are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }
}
