//! Filtering and sorting of the question list.
//!
//! Both operations are non-destructive: they borrow the input and return a new
//! ordered list of references. Sorting is stable, so ties keep their prior
//! relative order.

use std::{cmp::Reverse, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::domain::{Question, Tag};

/// Which questions the home page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    /// Every question, in store order.
    #[default]
    All,
    /// Only questions without an answer.
    Unanswered,
    /// Every question, highest score first.
    Trending,
}

/// The order applied to the current view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Most recent first.
    #[default]
    Newest,
    /// Highest score first.
    Votes,
    /// Most answers first.
    Answers,
}

/// A filter specification: type, tags and an optional search term.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    /// The type filter.
    pub kind: FilterType,
    /// Questions must share at least one of these tags. Empty means no tag
    /// filter.
    pub tags: Vec<Tag>,
    /// Case-insensitive substring matched against title and description.
    pub search: Option<String>,
}

impl FilterSpec {
    /// A spec with the given type filter and nothing else.
    #[must_use]
    pub fn of_type(kind: FilterType) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Adds tags to the spec.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = Tag>) -> Self {
        self.tags.extend(tags);
        self
    }

    /// Sets the search term. Blank terms are ignored.
    #[must_use]
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        self.search = (!term.trim().is_empty()).then(|| term.trim().to_lowercase());
        self
    }

    /// Toggles a tag on or off, the way the sidebar's tag buttons do.
    pub fn toggle_tag(&mut self, tag: Tag) {
        if let Some(pos) = self.tags.iter().position(|t| *t == tag) {
            self.tags.remove(pos);
        } else {
            self.tags.push(tag);
        }
    }

    fn matches(&self, question: &Question) -> bool {
        if self.kind == FilterType::Unanswered && question.is_answered {
            return false;
        }

        if !self.tags.is_empty() && !question.tags.intersects(self.tags.iter()) {
            return false;
        }

        if let Some(term) = &self.search {
            let haystack = format!("{}\n{}", question.title, question.description).to_lowercase();
            if !haystack.contains(term.as_str()) {
                return false;
            }
        }

        true
    }
}

/// Applies a filter specification to the full question collection.
///
/// Relative order is preserved, except that [`FilterType::Trending`] orders
/// the result by descending score.
pub fn filter<'a, I>(questions: I, spec: &FilterSpec) -> Vec<&'a Question>
where
    I: IntoIterator<Item = &'a Question>,
{
    let mut result: Vec<&Question> = questions.into_iter().collect();

    if spec.kind == FilterType::Trending {
        result.sort_by_key(|question| Reverse(question.vote_count));
    }

    result.retain(|question| spec.matches(question));
    result
}

/// Reorders an already filtered view by the given key.
///
/// Ties keep their relative order from `questions`.
#[must_use]
pub fn sort<'a>(questions: &[&'a Question], key: SortKey) -> Vec<&'a Question> {
    let mut result = questions.to_vec();
    match key {
        SortKey::Newest => result.sort_by_key(|question| Reverse(question.timestamp)),
        SortKey::Votes => result.sort_by_key(|question| Reverse(question.vote_count)),
        SortKey::Answers => result.sort_by_key(|question| Reverse(question.answer_count)),
    }
    result
}

/// Skips `offset` questions and keeps at most `limit`.
#[must_use]
pub fn page<'a>(questions: &[&'a Question], offset: usize, limit: Option<usize>) -> Vec<&'a Question> {
    let rest = questions.iter().copied().skip(offset);
    match limit {
        Some(limit) => rest.take(limit).collect(),
        None => rest.collect(),
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::All => "all",
            Self::Unanswered => "unanswered",
            Self::Trending => "trending",
        })
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Newest => "newest",
            Self::Votes => "votes",
            Self::Answers => "answers",
        })
    }
}

/// Error returned when a filter type or sort key name is not recognised.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown {what} '{value}'")]
pub struct UnknownName {
    what: &'static str,
    value: String,
}

impl FromStr for FilterType {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "unanswered" => Ok(Self::Unanswered),
            "trending" => Ok(Self::Trending),
            _ => Err(UnknownName {
                what: "filter",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for SortKey {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "newest" => Ok(Self::Newest),
            "votes" => Ok(Self::Votes),
            "answers" => Ok(Self::Answers),
            _ => Err(UnknownName {
                what: "sort key",
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Fixtures;

    fn questions() -> Vec<Question> {
        Fixtures::builtin()
            .unwrap()
            .threads
            .into_iter()
            .map(|thread| thread.question)
            .collect()
    }

    fn ids(questions: &[&Question]) -> Vec<u64> {
        questions.iter().map(|q| q.id.0).collect()
    }

    fn tag(s: &str) -> Tag {
        Tag::new(s).unwrap()
    }

    #[test]
    fn all_keeps_store_order() {
        let all = questions();
        let result = filter(&all, &FilterSpec::default());
        assert_eq!(ids(&result), [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn unanswered_only_returns_unanswered() {
        let all = questions();
        let result = filter(&all, &FilterSpec::of_type(FilterType::Unanswered));

        assert!(result.iter().all(|q| !q.is_answered));
        assert_eq!(ids(&result), [2, 5]);
    }

    #[test]
    fn trending_orders_by_votes() {
        let all = questions();
        let result = filter(&all, &FilterSpec::of_type(FilterType::Trending));
        assert_eq!(ids(&result), [4, 3, 5, 6, 1, 2]);
    }

    #[test]
    fn tag_filter_requires_a_shared_tag() {
        let all = questions();
        let spec = FilterSpec::default().with_tags([tag("react"), tag("css")]);

        let result = filter(&all, &spec);

        assert_eq!(ids(&result), [1, 4, 5]);
        for question in &result {
            assert!(question.tags.intersects(spec.tags.iter()));
        }
    }

    #[test]
    fn tag_filter_combines_with_type() {
        let all = questions();
        let spec = FilterSpec::of_type(FilterType::Unanswered).with_tags([tag("react")]);
        assert_eq!(ids(&filter(&all, &spec)), [5]);
    }

    #[test]
    fn search_matches_title_and_description() {
        let all = questions();
        let by_title = FilterSpec::default().with_search("FLEXBOX");
        assert_eq!(ids(&filter(&all, &by_title)), [4]);

        let by_body = FilterSpec::default().with_search("re-renders");
        assert_eq!(ids(&filter(&all, &by_body)), [5]);

        let blank = FilterSpec::default().with_search("   ");
        assert_eq!(blank.search, None);
    }

    #[test]
    fn filtering_leaves_input_untouched() {
        let all = questions();
        let before = all.clone();
        let _ = filter(&all, &FilterSpec::of_type(FilterType::Trending));
        assert_eq!(all, before);
    }

    #[test]
    fn sort_by_votes_is_non_increasing() {
        let all = questions();
        let view = filter(&all, &FilterSpec::default());
        let sorted = sort(&view, SortKey::Votes);

        assert!(sorted.windows(2).all(|w| w[0].vote_count >= w[1].vote_count));
    }

    #[test]
    fn sort_by_newest_is_non_increasing() {
        let all = questions();
        let view = filter(&all, &FilterSpec::of_type(FilterType::Trending));
        let sorted = sort(&view, SortKey::Newest);

        assert!(sorted.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
        assert_eq!(ids(&sorted), [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn sort_by_answers() {
        let all = questions();
        let view = filter(&all, &FilterSpec::default());
        assert_eq!(ids(&sort(&view, SortKey::Answers)), [4, 3, 5, 1, 6, 2]);
    }

    #[test]
    fn sort_is_stable_for_ties() {
        let mut all = questions();
        for question in &mut all {
            question.vote_count = 1;
        }
        let view = filter(&all, &FilterSpec::default());
        let reversed: Vec<&Question> = view.iter().rev().copied().collect();

        assert_eq!(ids(&sort(&reversed, SortKey::Votes)), [6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn toggle_tag_adds_then_removes() {
        let mut spec = FilterSpec::default();
        spec.toggle_tag(tag("python"));
        assert_eq!(spec.tags, [tag("python")]);
        spec.toggle_tag(tag("python"));
        assert!(spec.tags.is_empty());
    }

    #[test]
    fn paging_skips_and_limits() {
        let all = questions();
        let view = filter(&all, &FilterSpec::default());

        assert_eq!(ids(&page(&view, 2, Some(2))), [3, 4]);
        assert_eq!(ids(&page(&view, 5, None)), [6]);
        assert!(page(&view, 10, Some(3)).is_empty());
    }

    #[test]
    fn parses_names() {
        assert_eq!("Trending".parse::<FilterType>(), Ok(FilterType::Trending));
        assert_eq!("answers".parse::<SortKey>(), Ok(SortKey::Answers));
        assert!("oldest".parse::<SortKey>().is_err());
    }
}
