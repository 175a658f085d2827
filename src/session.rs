//! One viewer's session on the board.
//!
//! A [`Session`] is the single logical actor: it owns the question store, the
//! viewer's votes and the home page view, and applies user actions to them
//! one at a time. Actions that would reach a server in a real deployment go
//! through a [`Backend`], which only simulates the round trip.

use std::{fmt, thread, time::Duration};

use chrono::Utc;
use tracing::instrument;

use crate::{
    domain::{
        AnswerId, Config, Direction, Notice, Question, QuestionId, Tag, Target, Thread,
        ThreadError, VoteChange, VoteState,
    },
    forms::{AuthError, AuthForm, QuestionDraft, SubmitError},
    query::{self, FilterSpec, SortKey},
    storage::QuestionStore,
};

/// An action that would be sent to a server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// Posting a new question.
    PostQuestion,
    /// Signing in.
    Login,
    /// Creating an account.
    Register,
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PostQuestion => "Posting question",
            Self::Login => "Signing in",
            Self::Register => "Creating account",
        })
    }
}

/// Stands in for the API a real board would call.
///
/// Round trips cannot fail, be retried or be cancelled; they only take time.
pub trait Backend {
    /// Performs the round trip for `request`, returning once it completes.
    fn round_trip(&self, request: Request);
}

/// A backend that blocks for a fixed delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedBackend {
    delay: Duration,
}

impl SimulatedBackend {
    /// A backend that waits `delay` on every round trip.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// A backend that completes immediately.
    #[must_use]
    pub const fn instant() -> Self {
        Self::new(Duration::ZERO)
    }

    /// The configured delay.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }
}

impl Backend for SimulatedBackend {
    fn round_trip(&self, request: Request) {
        tracing::debug!(%request, delay_ms = self.delay.as_millis(), "simulated round trip");
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
    }
}

/// The state of one viewer's visit.
#[derive(Debug)]
pub struct Session<B> {
    store: QuestionStore,
    votes: crate::domain::VoteBook,
    config: Config,
    backend: B,
    filter: FilterSpec,
    sort: Option<SortKey>,
    view: Vec<QuestionId>,
    answer_buffer: String,
    signed_in: Option<String>,
}

impl<B: Backend> Session<B> {
    /// Starts a session over `store`. The home view shows every question.
    #[must_use]
    pub fn new(store: QuestionStore, config: Config, backend: B) -> Self {
        let mut session = Self {
            store,
            votes: crate::domain::VoteBook::default(),
            config,
            backend,
            filter: FilterSpec::default(),
            sort: None,
            view: Vec::new(),
            answer_buffer: String::new(),
            signed_in: None,
        };
        session.refresh_view();
        session
    }

    /// The question store.
    #[must_use]
    pub const fn store(&self) -> &QuestionStore {
        &self.store
    }

    /// The session configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The backend used for simulated round trips.
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// The active filter.
    #[must_use]
    pub const fn filter(&self) -> &FilterSpec {
        &self.filter
    }

    /// The last sort applied to the view, if any.
    #[must_use]
    pub const fn sort(&self) -> Option<SortKey> {
        self.sort
    }

    /// The email of the signed-in viewer.
    #[must_use]
    pub fn signed_in(&self) -> Option<&str> {
        self.signed_in.as_deref()
    }

    /// Looks up a thread.
    #[must_use]
    pub fn thread(&self, id: QuestionId) -> Option<&Thread> {
        self.store.thread(id)
    }

    /// The questions currently shown on the home page, in display order.
    #[must_use]
    pub fn visible(&self) -> Vec<&Question> {
        self.view
            .iter()
            .filter_map(|id| self.store.question(*id))
            .collect()
    }

    /// Replaces the home page filter.
    ///
    /// The view is rebuilt from the full store, so a previous sort is
    /// discarded.
    #[instrument(level = "debug", skip(self))]
    pub fn apply_filter(&mut self, spec: FilterSpec) {
        self.filter = spec;
        self.sort = None;
        self.refresh_view();
    }

    /// Toggles one tag in the home page filter.
    pub fn toggle_tag(&mut self, tag: Tag) {
        let mut spec = self.filter.clone();
        spec.toggle_tag(tag);
        self.apply_filter(spec);
    }

    /// Reorders the current home view.
    #[instrument(level = "debug", skip(self))]
    pub fn sort_by(&mut self, key: SortKey) {
        let sorted: Vec<QuestionId> = query::sort(&self.visible(), key)
            .into_iter()
            .map(|question| question.id)
            .collect();
        self.view = sorted;
        self.sort = Some(key);
    }

    fn refresh_view(&mut self) {
        self.view = query::filter(self.store.questions(), &self.filter)
            .into_iter()
            .map(|question| question.id)
            .collect();
        tracing::debug!(visible = self.view.len(), "view refreshed");
    }

    /// Refilters after a change to the store, keeping the active sort.
    fn rebuild_view(&mut self) {
        self.refresh_view();
        if let Some(key) = self.sort {
            self.sort_by(key);
        }
    }

    /// The viewer's vote on `target`.
    #[must_use]
    pub fn vote_state(&self, target: Target) -> VoteState {
        self.votes.state(target)
    }

    /// Every target the viewer has voted on.
    pub fn votes(&self) -> impl Iterator<Item = (Target, VoteState)> + '_ {
        self.votes.iter()
    }

    /// Casts a vote.
    ///
    /// When `tally_votes` is enabled the target's score moves by the change in
    /// the viewer's contribution.
    ///
    /// # Errors
    ///
    /// Fails if the question or answer does not exist, or if the score would
    /// overflow. Nothing changes in that case.
    #[instrument(level = "debug", skip(self))]
    pub fn vote(&mut self, target: Target, direction: Direction) -> Result<VoteChange, ThreadError> {
        let thread = self.store.thread_mut(target.question())?;
        let answer = match target {
            Target::Question(_) => None,
            Target::Answer { question, answer } => {
                if thread.answer(answer).is_none() {
                    return Err(ThreadError::AnswerNotFound { question, answer });
                }
                Some(answer)
            }
        };

        if self.config.tally_votes {
            let previous = self.votes.state(target);
            let delta = previous.after(direction).weight() - previous.weight();
            thread.adjust_votes(answer, delta)?;
        }
        let change = self.votes.cast(target, direction);
        self.rebuild_view();
        Ok(change)
    }

    /// Toggles acceptance of an answer; every other answer on the question
    /// loses acceptance.
    ///
    /// # Errors
    ///
    /// Fails if the question or answer does not exist.
    #[instrument(level = "debug", skip(self))]
    pub fn accept(&mut self, question: QuestionId, answer: AnswerId) -> Result<Notice, ThreadError> {
        let outcome = self.store.thread_mut(question)?.accept(answer)?;
        self.rebuild_view();
        Ok(outcome.notice())
    }

    /// Replaces the answer input buffer.
    pub fn set_answer_buffer(&mut self, content: impl Into<String>) {
        self.answer_buffer = content.into();
    }

    /// The answer input buffer.
    #[must_use]
    pub fn answer_buffer(&self) -> &str {
        &self.answer_buffer
    }

    /// Posts the answer buffer to `question` as the viewer and clears the
    /// buffer.
    ///
    /// # Errors
    ///
    /// Fails if the question does not exist or the buffer is blank. The buffer
    /// is kept on error.
    #[instrument(level = "debug", skip(self))]
    pub fn submit_answer(&mut self, question: QuestionId) -> Result<(AnswerId, Notice), ThreadError> {
        let author = self.config.viewer();
        let id = self
            .store
            .thread_mut(question)?
            .submit_answer(&self.answer_buffer, author, Utc::now())?
            .id;
        self.answer_buffer.clear();
        self.rebuild_view();

        Ok((
            id,
            Notice::new("Answer posted!", "Your answer has been posted successfully."),
        ))
    }

    /// Validates and posts a question.
    ///
    /// The question goes through the backend's simulated round trip and is
    /// then appended to the store. The home view is rebuilt with the current
    /// filter and sort.
    ///
    /// # Errors
    ///
    /// Returns the validation failure without calling the backend or touching
    /// the store, or [`SubmitError::IdsExhausted`] if the store has no id left
    /// to give.
    #[instrument(level = "debug", skip_all)]
    pub fn submit_question(&mut self, draft: &QuestionDraft) -> Result<(QuestionId, Notice), SubmitError> {
        let question = draft.validate()?;

        self.backend.round_trip(Request::PostQuestion);

        let id = self.store.insert(question, self.config.viewer(), Utc::now())?;
        self.rebuild_view();

        Ok((
            id,
            Notice::new("Question Posted!", "Your question has been posted successfully."),
        ))
    }

    /// Validates a sign-in form and, after the simulated round trip, records
    /// the viewer as signed in.
    ///
    /// # Errors
    ///
    /// Returns the validation failure without calling the backend.
    #[instrument(level = "debug", skip_all, fields(register = form.is_register()))]
    pub fn sign_in(&mut self, form: &AuthForm) -> Result<Notice, AuthError> {
        form.validate()?;

        let request = if form.is_register() {
            Request::Register
        } else {
            Request::Login
        };
        self.backend.round_trip(request);

        self.signed_in = Some(form.email().trim().to_string());
        Ok(form.success_notice())
    }
}

/// The notice for the third-party sign-in button, which is not wired up.
#[must_use]
pub fn google_sign_in() -> Notice {
    Notice::new(
        "Google Auth",
        "Google authentication would be implemented here.",
    )
}
