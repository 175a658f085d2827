//! Navigable paths.

use std::{convert::Infallible, fmt, str::FromStr};

use crate::domain::QuestionId;

/// A page of the board.
///
/// Parsing never fails: anything unrecognised resolves to
/// [`Route::NotFound`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`: the question list.
    Home,
    /// `/ask`: the ask-question form.
    Ask,
    /// `/question/:id`: one question with its answers.
    Question(QuestionId),
    /// `/login`: the sign-in page.
    Login,
    /// Any other path.
    NotFound(String),
}

impl FromStr for Route {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let path = s.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|seg| !seg.is_empty()).collect();

        let route = match segments.as_slice() {
            [] => Self::Home,
            ["ask"] => Self::Ask,
            ["login"] => Self::Login,
            ["question", id] => id
                .parse()
                .map_or_else(|_| Self::NotFound(s.to_string()), Self::Question),
            _ => Self::NotFound(s.to_string()),
        };
        Ok(route)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => f.write_str("/"),
            Self::Ask => f.write_str("/ask"),
            Self::Question(id) => write!(f, "/question/{id}"),
            Self::Login => f.write_str("/login"),
            Self::NotFound(path) => f.write_str(path),
        }
    }
}
