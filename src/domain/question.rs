use std::{fmt, num::ParseIntError, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Tags;

/// Unique identifier of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub u64);

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for QuestionId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// The person who wrote a question or an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Display name.
    pub name: String,
    /// Reputation score, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reputation: Option<u32>,
}

impl Author {
    /// Creates an author with a known reputation.
    #[must_use]
    pub fn new(name: impl Into<String>, reputation: u32) -> Self {
        Self {
            name: name.into(),
            reputation: Some(reputation),
        }
    }
}

/// A question posted to the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier.
    pub id: QuestionId,
    /// One-line summary.
    pub title: String,
    /// Body text. May contain fenced code blocks.
    pub description: String,
    /// Up to five insertion-ordered tags.
    pub tags: Tags,
    /// Number of answers the question has received.
    pub answer_count: u32,
    /// Aggregate score.
    pub vote_count: i64,
    /// When the question was asked.
    pub timestamp: DateTime<Utc>,
    /// Who asked it.
    pub author: Author,
    /// Whether the question has been answered.
    pub is_answered: bool,
}

/// Formats the time elapsed between `then` and `now` the way the board shows
/// it: minutes under an hour, hours under a day, days otherwise.
///
/// ```
/// use chrono::{Duration, Utc};
/// use qaboard::domain::question::relative_age;
///
/// let now = Utc::now();
/// assert_eq!(relative_age(now - Duration::minutes(5), now), "5m ago");
/// assert_eq!(relative_age(now - Duration::hours(3), now), "3h ago");
/// assert_eq!(relative_age(now - Duration::days(2), now), "2d ago");
/// ```
#[must_use]
pub fn relative_age(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now - then;
    let minutes = elapsed.num_minutes();
    if minutes < 60 {
        return format!("{}m ago", minutes.max(0));
    }
    let hours = elapsed.num_hours();
    if hours < 24 {
        return format!("{hours}h ago");
    }
    format!("{}d ago", elapsed.num_days())
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn relative_age_boundaries() {
        let now = Utc::now();
        assert_eq!(relative_age(now - Duration::minutes(59), now), "59m ago");
        assert_eq!(relative_age(now - Duration::minutes(60), now), "1h ago");
        assert_eq!(relative_age(now - Duration::hours(23), now), "23h ago");
        assert_eq!(relative_age(now - Duration::hours(24), now), "1d ago");
    }

    #[test]
    fn future_timestamps_clamp_to_zero() {
        let now = Utc::now();
        assert_eq!(relative_age(now + Duration::minutes(3), now), "0m ago");
    }

    #[test]
    fn question_id_parses_with_whitespace() {
        assert_eq!(" 42 ".parse::<QuestionId>().unwrap(), QuestionId(42));
        assert!("abc".parse::<QuestionId>().is_err());
    }
}
