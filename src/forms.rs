//! Client-side validation for the ask-question and sign-in forms.
//!
//! Validation never touches the store. A draft either converts into a
//! [`NewQuestion`] ready to be posted, or reports why it was blocked.

use chrono::{DateTime, Utc};
use non_empty_string::NonEmptyString;
use thiserror::Error;

use crate::domain::{Author, Notice, Question, QuestionId, Tag, TagError, Tags};

/// The contents of the ask-question form while it is being filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionDraft {
    /// Question title as typed.
    pub title: String,
    /// Question body as typed.
    pub description: String,
    tags: Tags,
}

/// Why a question could not be submitted.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SubmitError {
    /// Title or description is blank.
    #[error("a question needs both a title and a description")]
    MissingInformation,
    /// No tags were added.
    #[error("a question needs at least one tag")]
    MissingTags,
    /// The board has handed out its largest question id.
    #[error("no question ids are left")]
    IdsExhausted,
}

impl SubmitError {
    /// The message shown to the viewer.
    #[must_use]
    pub fn notice(self) -> Notice {
        match self {
            Self::MissingInformation => Notice::destructive(
                "Missing Information",
                "Please fill in both title and description.",
            ),
            Self::MissingTags => Notice::destructive(
                "Add Tags",
                "Please add at least one tag to help categorize your question.",
            ),
            Self::IdsExhausted => Notice::destructive(
                "Board Full",
                "No more questions can be posted to this board.",
            ),
        }
    }
}

/// A question that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    title: NonEmptyString,
    description: NonEmptyString,
    tags: Tags,
}

impl NewQuestion {
    /// The trimmed title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// The tags, never empty.
    #[must_use]
    pub const fn tags(&self) -> &Tags {
        &self.tags
    }

    pub(crate) fn into_question(self, id: QuestionId, author: Author, now: DateTime<Utc>) -> Question {
        Question {
            id,
            title: self.title.as_str().to_string(),
            description: self.description.as_str().to_string(),
            tags: self.tags,
            answer_count: 0,
            vote_count: 0,
            timestamp: now,
            author,
            is_answered: false,
        }
    }
}

impl QuestionDraft {
    /// Starts a draft with the given title and description and no tags.
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            tags: Tags::default(),
        }
    }

    /// Adds a tag typed by the viewer.
    ///
    /// # Errors
    ///
    /// Fails if the tag is blank, already present, or five tags are already
    /// attached. The draft is unchanged on error.
    pub fn add_tag(&mut self, raw: &str) -> Result<(), TagError> {
        self.tags.push(Tag::new(raw)?)
    }

    /// The tags added so far.
    #[must_use]
    pub const fn tags(&self) -> &Tags {
        &self.tags
    }

    /// Checks the draft and produces a question ready to post.
    ///
    /// # Errors
    ///
    /// [`SubmitError::MissingInformation`] takes precedence over
    /// [`SubmitError::MissingTags`].
    pub fn validate(&self) -> Result<NewQuestion, SubmitError> {
        let title = NonEmptyString::new(self.title.trim().to_string())
            .map_err(|_| SubmitError::MissingInformation)?;
        let description = NonEmptyString::new(self.description.trim().to_string())
            .map_err(|_| SubmitError::MissingInformation)?;

        if self.tags.is_empty() {
            return Err(SubmitError::MissingTags);
        }

        Ok(NewQuestion {
            title,
            description,
            tags: self.tags.clone(),
        })
    }
}

/// Email and password, shared by both sign-in forms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Email address.
    pub email: String,
    /// Password as typed.
    pub password: String,
}

/// The sign-in page in either of its two modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthForm {
    /// Sign in to an existing account.
    Login(Credentials),
    /// Create an account.
    Register {
        /// Full name.
        name: String,
        /// Email and password.
        credentials: Credentials,
        /// Password typed a second time.
        confirm_password: String,
    },
}

/// Why a sign-in form was blocked.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// A required field is blank.
    #[error("{0} is required")]
    MissingField(&'static str),
    /// Password and confirmation differ.
    #[error("passwords don't match")]
    PasswordMismatch,
}

impl AuthError {
    /// The message shown to the viewer.
    #[must_use]
    pub fn notice(self) -> Notice {
        match self {
            Self::MissingField(field) => {
                Notice::destructive("Missing Information", format!("Please fill in your {field}."))
            }
            Self::PasswordMismatch => Notice::destructive(
                "Passwords don't match",
                "Please make sure your passwords match.",
            ),
        }
    }
}

impl AuthForm {
    /// `true` for the register mode.
    #[must_use]
    pub const fn is_register(&self) -> bool {
        matches!(self, Self::Register { .. })
    }

    /// The email the viewer signs in with.
    #[must_use]
    pub fn email(&self) -> &str {
        match self {
            Self::Login(credentials) | Self::Register { credentials, .. } => &credentials.email,
        }
    }

    /// Checks required fields and, when registering, that the passwords match.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), AuthError> {
        let credentials = match self {
            Self::Login(credentials) => credentials,
            Self::Register {
                name,
                credentials,
                confirm_password,
            } => {
                if name.trim().is_empty() {
                    return Err(AuthError::MissingField("full name"));
                }
                if credentials.password != *confirm_password {
                    return Err(AuthError::PasswordMismatch);
                }
                credentials
            }
        };

        if credentials.email.trim().is_empty() {
            return Err(AuthError::MissingField("email"));
        }
        if credentials.password.is_empty() {
            return Err(AuthError::MissingField("password"));
        }
        Ok(())
    }

    /// The message shown once the form has been accepted.
    #[must_use]
    pub fn success_notice(&self) -> Notice {
        if self.is_register() {
            Notice::new(
                "Account created!",
                "Your account has been created successfully.",
            )
        } else {
            Notice::new("Welcome back!", "You've successfully logged in.")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials(email: &str, password: &str) -> Credentials {
        Credentials {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn blank_title_or_description_blocks_submission() {
        let mut draft = QuestionDraft::new("   ", "body");
        draft.add_tag("rust").unwrap();
        assert_eq!(draft.validate(), Err(SubmitError::MissingInformation));

        draft.title = "title".to_string();
        draft.description = "\n".to_string();
        assert_eq!(draft.validate(), Err(SubmitError::MissingInformation));
    }

    #[test]
    fn missing_tags_block_submission() {
        let draft = QuestionDraft::new("title", "body");
        let err = draft.validate().unwrap_err();

        assert_eq!(err, SubmitError::MissingTags);
        assert_eq!(err.notice().title, "Add Tags");
    }

    #[test]
    fn missing_information_is_reported_before_tags() {
        let draft = QuestionDraft::new("", "");
        assert_eq!(draft.validate(), Err(SubmitError::MissingInformation));
    }

    #[test]
    fn valid_draft_trims_fields() {
        let mut draft = QuestionDraft::new("  Why?  ", "  Because.\n");
        draft.add_tag("Rust").unwrap();

        let question = draft
            .validate()
            .unwrap()
            .into_question(QuestionId(7), Author::new("You", 500), Utc::now());

        assert_eq!(question.title, "Why?");
        assert_eq!(question.description, "Because.");
        assert_eq!(question.tags.to_string(), "rust");
        assert_eq!(question.vote_count, 0);
        assert!(!question.is_answered);
    }

    #[test]
    fn tag_entry_respects_limits() {
        let mut draft = QuestionDraft::new("t", "d");
        for tag in ["a", "b", "c", "d", "e"] {
            draft.add_tag(tag).unwrap();
        }
        assert_eq!(draft.add_tag("f"), Err(TagError::TooMany));
        assert!(draft.add_tag("").is_err());
        assert_eq!(draft.tags().len(), 5);
    }

    #[test]
    fn register_requires_matching_passwords() {
        let form = AuthForm::Register {
            name: "Ada".to_string(),
            credentials: credentials("ada@example.com", "hunter2"),
            confirm_password: "hunter3".to_string(),
        };

        let err = form.validate().unwrap_err();

        assert_eq!(err, AuthError::PasswordMismatch);
        assert_eq!(err.notice().title, "Passwords don't match");
    }

    #[test]
    fn login_requires_email_and_password() {
        assert_eq!(
            AuthForm::Login(credentials(" ", "pw")).validate(),
            Err(AuthError::MissingField("email"))
        );
        assert_eq!(
            AuthForm::Login(credentials("a@b.c", "")).validate(),
            Err(AuthError::MissingField("password"))
        );
        assert!(AuthForm::Login(credentials("a@b.c", "pw")).validate().is_ok());
    }

    #[test]
    fn success_notice_depends_on_mode() {
        let login = AuthForm::Login(credentials("a@b.c", "pw"));
        assert_eq!(login.success_notice().title, "Welcome back!");

        let register = AuthForm::Register {
            name: "Ada".to_string(),
            credentials: credentials("a@b.c", "pw"),
            confirm_password: "pw".to_string(),
        };
        assert_eq!(register.success_notice().title, "Account created!");
    }
}
