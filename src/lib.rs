//! An in-memory Q&A board
//!
//! Questions, answers, voting and tagging over seed data that lives only for
//! the length of a session.

pub mod domain;
pub use domain::{
    Answer, AnswerId, Author, Config, Direction, Notice, Question, QuestionId, Tag, Tags, Target,
    Thread, VoteState,
};

pub mod forms;
pub use forms::{AuthForm, Credentials, QuestionDraft};

/// Filtering and sorting of the question list.
pub mod query;
pub use query::{FilterSpec, FilterType, SortKey};

pub mod route;
pub use route::Route;

pub mod session;
pub use session::{Backend, Session, SimulatedBackend};

/// Seed data and the in-memory question store.
pub mod storage;
pub use storage::{Fixtures, QuestionStore};
