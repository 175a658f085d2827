//! The in-memory question store.
//!
//! The [`QuestionStore`] holds every thread for the lifetime of a session.
//! Nothing is written anywhere; the store is seeded from [`Fixtures`] and
//! dropped with the session.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::instrument;

use crate::{
    domain::{Author, Question, QuestionId, Tag, Thread, ThreadError},
    forms::{NewQuestion, SubmitError},
    storage::Fixtures,
};

/// Every thread on the board, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionStore {
    threads: Vec<Thread>,
}

impl QuestionStore {
    /// Creates a store seeded with the given fixtures.
    #[must_use]
    pub fn from_fixtures(fixtures: Fixtures) -> Self {
        tracing::debug!(threads = fixtures.threads.len(), "seeding question store");
        Self {
            threads: fixtures.threads,
        }
    }

    /// Iterates over all questions in display order.
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.threads.iter().map(|thread| &thread.question)
    }

    /// Looks up a question.
    #[must_use]
    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.thread(id).map(|thread| &thread.question)
    }

    /// Looks up a thread.
    #[must_use]
    pub fn thread(&self, id: QuestionId) -> Option<&Thread> {
        self.threads.iter().find(|thread| thread.id() == id)
    }

    /// Looks up a thread for modification.
    ///
    /// # Errors
    ///
    /// Returns [`ThreadError::QuestionNotFound`] if there is no such question.
    pub fn thread_mut(&mut self, id: QuestionId) -> Result<&mut Thread, ThreadError> {
        self.threads
            .iter_mut()
            .find(|thread| thread.id() == id)
            .ok_or(ThreadError::QuestionNotFound(id))
    }

    /// Number of questions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.threads.len()
    }

    /// `true` if the board has no questions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    fn next_id(&self) -> Option<QuestionId> {
        self.threads
            .iter()
            .map(|thread| thread.id().0)
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .map(QuestionId)
    }

    /// Appends a validated question and returns its new id.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::IdsExhausted`] if the largest id is already in
    /// use. The store is unchanged in that case.
    #[instrument(level = "debug", skip_all)]
    pub fn insert(
        &mut self,
        draft: NewQuestion,
        author: Author,
        now: DateTime<Utc>,
    ) -> Result<QuestionId, SubmitError> {
        let id = self.next_id().ok_or(SubmitError::IdsExhausted)?;
        let question = draft.into_question(id, author, now);
        self.threads.push(Thread::new(question));
        tracing::debug!(%id, "question added");
        Ok(id)
    }

    /// Tags ordered by how many questions use them, most used first. Ties are
    /// broken alphabetically.
    #[must_use]
    pub fn popular_tags(&self, limit: usize) -> Vec<(Tag, usize)> {
        let mut counts: HashMap<&Tag, usize> = HashMap::new();
        for question in self.questions() {
            for tag in &question.tags {
                *counts.entry(tag).or_default() += 1;
            }
        }

        let mut tags: Vec<(Tag, usize)> = counts
            .into_iter()
            .map(|(tag, count)| (tag.clone(), count))
            .collect();
        tags.sort_by(|(a, a_count), (b, b_count)| b_count.cmp(a_count).then_with(|| a.cmp(b)));
        tags.truncate(limit);
        tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> QuestionStore {
        QuestionStore::from_fixtures(Fixtures::builtin().unwrap())
    }

    #[test]
    fn seeded_in_fixture_order() {
        let store = store();
        let ids: Vec<u64> = store.questions().map(|q| q.id.0).collect();
        assert_eq!(ids, [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn missing_thread_is_an_error() {
        let mut store = store();
        assert_eq!(
            store.thread_mut(QuestionId(99)).unwrap_err(),
            ThreadError::QuestionNotFound(QuestionId(99))
        );
        assert!(store.question(QuestionId(99)).is_none());
    }

    #[test]
    fn react_and_performance_are_most_popular() {
        let popular = store().popular_tags(2);
        let names: Vec<&str> = popular.iter().map(|(tag, _)| tag.as_str()).collect();
        assert_eq!(names, ["performance", "react"]);
        assert!(popular.iter().all(|(_, count)| *count == 2));
    }

    #[test]
    fn empty_store_starts_ids_at_one() {
        let store = QuestionStore::default();
        assert!(store.is_empty());
        assert_eq!(store.next_id(), Some(QuestionId(1)));
    }

    #[test]
    fn insert_refuses_to_wrap_ids() {
        let yaml = r#"
threads:
  - { id: 18446744073709551615, title: a, description: a, tags: [x], answer_count: 0,
      vote_count: 0, timestamp: "2024-01-01T00:00:00Z", author: { name: A },
      is_answered: false }
"#;
        let mut store = QuestionStore::from_fixtures(Fixtures::from_yaml(yaml).unwrap());
        let mut draft = crate::QuestionDraft::new("title", "body");
        draft.add_tag("rust").unwrap();

        let err = store
            .insert(draft.validate().unwrap(), Author::new("You", 500), Utc::now())
            .unwrap_err();

        assert_eq!(err, SubmitError::IdsExhausted);
        assert_eq!(store.len(), 1);
    }
}
