use std::{fmt, num::ParseIntError, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Author;

/// Identifier of an answer, unique within one question's answer list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerId(pub u64);

impl fmt::Display for AnswerId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AnswerId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// An answer to a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    /// Identifier within the owning question.
    pub id: AnswerId,
    /// Body text. May contain fenced code blocks.
    pub content: String,
    /// Aggregate score.
    pub vote_count: i64,
    /// When the answer was posted.
    pub timestamp: DateTime<Utc>,
    /// Who wrote it.
    pub author: Author,
    /// Whether the question's author accepted this answer.
    #[serde(default)]
    pub is_accepted: bool,
}
