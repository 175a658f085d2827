//! Seed data for the in-memory store.
//!
//! Fixtures are plain YAML or JSON documents holding a list of threads. The
//! built-in set is embedded in the binary; a file can replace it.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::domain::{AnswerId, QuestionId, Thread};

const BUILTIN: &str = include_str!("../../fixtures/default.yaml");

/// A set of threads used to seed a [`QuestionStore`](crate::QuestionStore).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixtures {
    /// Threads in display order.
    pub threads: Vec<Thread>,
}

/// Errors raised while loading fixtures.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    /// The fixture file could not be read.
    #[error("failed to read fixtures from {path}: {source}")]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },
    /// The YAML could not be parsed.
    #[error("invalid YAML fixtures: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// The JSON could not be parsed.
    #[error("invalid JSON fixtures: {0}")]
    Json(#[from] serde_json::Error),
    /// Two threads share a question id.
    #[error("duplicate question id {0}")]
    DuplicateQuestion(QuestionId),
    /// A thread's answers are not numbered 1, 2, 3, ... in order.
    ///
    /// New answers are numbered after the existing ones, so a gap or repeat
    /// would hand out an id that is already taken.
    #[error("answer {found} on question {question} should be numbered {expected}")]
    AnswerOutOfSequence {
        /// The thread involved.
        question: QuestionId,
        /// The id the answer should have.
        expected: AnswerId,
        /// The id it has.
        found: AnswerId,
    },
    /// More than one answer in a thread is accepted.
    #[error("question {0} has more than one accepted answer")]
    MultipleAccepted(QuestionId),
}

impl Fixtures {
    /// The built-in seed data: six questions; the first has two answers.
    ///
    /// # Errors
    ///
    /// Only fails if the embedded document is malformed.
    pub fn builtin() -> Result<Self, FixtureError> {
        Self::from_yaml(BUILTIN)
    }

    /// Parses fixtures from a YAML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid fixture YAML or breaks an
    /// id or acceptance invariant.
    pub fn from_yaml(source: &str) -> Result<Self, FixtureError> {
        let fixtures: Self = serde_yaml::from_str(source)?;
        fixtures.validate()?;
        Ok(fixtures)
    }

    /// Parses fixtures from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid fixture JSON or breaks an
    /// id or acceptance invariant.
    pub fn from_json(source: &str) -> Result<Self, FixtureError> {
        let fixtures: Self = serde_json::from_str(source)?;
        fixtures.validate()?;
        Ok(fixtures)
    }

    /// Loads fixtures from a file. Files ending in `.json` are read as JSON,
    /// anything else as YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, FixtureError> {
        let source = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        tracing::debug!(path = %path.display(), is_json, "loading fixtures");

        if is_json {
            Self::from_json(&source)
        } else {
            Self::from_yaml(&source)
        }
    }

    fn validate(&self) -> Result<(), FixtureError> {
        let mut questions = HashSet::new();
        for thread in &self.threads {
            let question = thread.id();
            if !questions.insert(question) {
                return Err(FixtureError::DuplicateQuestion(question));
            }

            for (expected, answer) in (1..).map(AnswerId).zip(&thread.answers) {
                if answer.id != expected {
                    return Err(FixtureError::AnswerOutOfSequence {
                        question,
                        expected,
                        found: answer.id,
                    });
                }
            }

            if thread.answers.iter().filter(|a| a.is_accepted).count() > 1 {
                return Err(FixtureError::MultipleAccepted(question));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn thread_with_answer_ids(ids: &str) -> String {
        let answers: Vec<String> = ids
            .split(',')
            .map(|id| {
                format!(
                    r#"{{ id: {id}, content: c, vote_count: 0, timestamp: "2024-01-01T00:00:00Z", author: {{ name: H }} }}"#
                )
            })
            .collect();
        format!(
            r#"
threads:
  - {{ id: 1, title: a, description: a, tags: [x], answer_count: 2, vote_count: 0,
      timestamp: "2024-01-01T00:00:00Z", author: {{ name: A }}, is_answered: false,
      answers: [{}] }}
"#,
            answers.join(", ")
        )
    }

    #[test]
    fn builtin_fixtures_parse() {
        let fixtures = Fixtures::builtin().unwrap();

        assert_eq!(fixtures.threads.len(), 6);
        let first = &fixtures.threads[0];
        assert_eq!(first.id(), QuestionId(1));
        assert_eq!(first.answers.len(), 2);
        assert_eq!(first.accepted().map(|a| a.id), Some(AnswerId(1)));
        assert!(first.question.description.contains("```typescript"));
        assert_eq!(first.question.author.reputation, Some(1250));
        assert_eq!(fixtures.threads[1].question.author.reputation, None);
    }

    #[test]
    fn rejects_duplicate_question_ids() {
        let yaml = r#"
threads:
  - { id: 1, title: a, description: a, tags: [x], answer_count: 0, vote_count: 0,
      timestamp: "2024-01-01T00:00:00Z", author: { name: A }, is_answered: false }
  - { id: 1, title: b, description: b, tags: [y], answer_count: 0, vote_count: 0,
      timestamp: "2024-01-01T00:00:00Z", author: { name: B }, is_answered: false }
"#;
        let err = Fixtures::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, FixtureError::DuplicateQuestion(QuestionId(1))));
    }

    #[test]
    fn answers_must_be_numbered_in_order() {
        assert!(Fixtures::from_yaml(&thread_with_answer_ids("1,2")).is_ok());

        let err = Fixtures::from_yaml(&thread_with_answer_ids("1,3")).unwrap_err();
        assert!(matches!(
            err,
            FixtureError::AnswerOutOfSequence {
                question: QuestionId(1),
                expected: AnswerId(2),
                found: AnswerId(3),
            }
        ));

        let err = Fixtures::from_yaml(&thread_with_answer_ids("1,1")).unwrap_err();
        assert!(matches!(err, FixtureError::AnswerOutOfSequence { .. }));
    }

    #[test]
    fn rejects_too_many_tags() {
        let yaml = r#"
threads:
  - { id: 1, title: a, description: a, tags: [a, b, c, d, e, f], answer_count: 0,
      vote_count: 0, timestamp: "2024-01-01T00:00:00Z", author: { name: A },
      is_answered: false }
"#;
        assert!(matches!(
            Fixtures::from_yaml(yaml).unwrap_err(),
            FixtureError::Yaml(_)
        ));
    }

    #[test]
    fn loads_json_by_extension() {
        let builtin = Fixtures::builtin().unwrap();
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(serde_json::to_string(&builtin).unwrap().as_bytes())
            .unwrap();

        let loaded = Fixtures::load(file.path()).unwrap();

        assert_eq!(loaded, builtin);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = Fixtures::load(&tmp.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, FixtureError::Io { .. }));
    }
}
