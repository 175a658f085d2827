mod fixtures;
mod store;

pub use fixtures::{FixtureError, Fixtures};
pub use store::QuestionStore;
