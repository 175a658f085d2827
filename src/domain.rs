//! Domain models for the Q&A board.
//!
//! This module contains the core domain types: questions, answers, tags, the
//! viewer's votes, and configuration.

/// Questions, their identifiers and authors.
pub mod question;
pub use question::{relative_age, Author, Question, QuestionId};

mod answer;
pub use answer::{Answer, AnswerId};

/// Validated tags and bounded tag sets.
pub mod tag;
pub use tag::{Tag, TagError, Tags, MAX_TAGS};

/// A question with its answers, and answer acceptance.
pub mod thread;
pub use thread::{AcceptOutcome, Thread, ThreadError};

pub mod vote;
pub use vote::{Direction, Target, VoteBook, VoteChange, VoteState};

mod notice;
pub use notice::{Notice, Variant};

mod config;
pub use config::{Config, ConfigError};
