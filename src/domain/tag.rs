use std::{fmt, ops::Deref, str::FromStr};

use serde::{Deserialize, Serialize};

/// The maximum number of tags a question may carry.
pub const MAX_TAGS: usize = 5;

/// A validated, lowercase tag (for example `react` or `node.js`).
///
/// Tags are normalised to lowercase on construction and may not be empty or
/// contain whitespace.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tag(String);

impl Tag {
    /// Creates a new `Tag`, normalising it to lowercase.
    ///
    /// # Errors
    ///
    /// Returns [`TagError::Invalid`] if the trimmed string is empty or contains
    /// whitespace.
    pub fn new(s: &str) -> Result<Self, TagError> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
            return Err(TagError::Invalid(s.to_string()));
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Tag {
    type Error = TagError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Tag> for String {
    fn from(tag: Tag) -> Self {
        tag.0
    }
}

impl FromStr for Tag {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Deref for Tag {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors raised while building a tag set.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TagError {
    /// The tag was empty or contained whitespace.
    #[error("Invalid tag '{0}': must be non-empty and contain no whitespace")]
    Invalid(String),

    /// The tag set already holds [`MAX_TAGS`] tags.
    #[error("a question can have at most {MAX_TAGS} tags")]
    TooMany,

    /// The tag is already in the set.
    #[error("tag '{0}' is already present")]
    Duplicate(Tag),
}

/// An insertion-ordered set of at most [`MAX_TAGS`] distinct tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Tag>", into = "Vec<Tag>")]
pub struct Tags(Vec<Tag>);

impl Tags {
    /// Adds a tag to the end of the set.
    ///
    /// # Errors
    ///
    /// Fails if the tag is already present or the set is full. The set is left
    /// unchanged on error.
    pub fn push(&mut self, tag: Tag) -> Result<(), TagError> {
        if self.0.contains(&tag) {
            return Err(TagError::Duplicate(tag));
        }
        if self.0.len() >= MAX_TAGS {
            return Err(TagError::TooMany);
        }
        self.0.push(tag);
        Ok(())
    }

    /// Returns `true` if the set contains the tag.
    #[must_use]
    pub fn contains(&self, tag: &Tag) -> bool {
        self.0.contains(tag)
    }

    /// Returns `true` if any of `others` is in this set.
    pub fn intersects<'a>(&self, mut others: impl Iterator<Item = &'a Tag>) -> bool {
        others.any(|tag| self.contains(tag))
    }

    /// Iterates over the tags in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.0.iter()
    }

    /// Returns the number of tags.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no tags.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<Tag>> for Tags {
    type Error = TagError;

    fn try_from(value: Vec<Tag>) -> Result<Self, Self::Error> {
        let mut tags = Self::default();
        for tag in value {
            tags.push(tag)?;
        }
        Ok(tags)
    }
}

impl From<Tags> for Vec<Tag> {
    fn from(tags: Tags) -> Self {
        tags.0
    }
}

impl<'a> IntoIterator for &'a Tags {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Tags {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, tag) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{tag}")?;
        }
        Ok(())
    }
}
