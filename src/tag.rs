//! Tags: item-kind labels and the `tags` query parameter.
//!
//! The search API uses the same vocabulary both to label hits (`_tags` on
//! every hit) and to restrict a search (`tags=story,author_dang`). A tag is
//! one of a fixed set of keywords, an author tag (`author_<handle>`), or a
//! story tag (`story_<id>`).
//!
//! [`encode_tags`] validates caller-supplied strings and joins them with
//! commas, which the service treats as a logical AND.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

const AUTHOR_PREFIX: &str = "author_";
const STORY_PREFIX: &str = "story_";

/// A validated search tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
    Story,
    Comment,
    Poll,
    PollOpt,
    Job,
    AskHn,
    ShowHn,
    LaunchHn,
    FrontPage,
    /// Items posted by the given user.
    Author(String),
    /// Items belonging to the story with the given id. The digits are kept
    /// as written, so `story_007` encodes back to `story_007`.
    StoryId(String),
}

impl Tag {
    /// Build an author tag, checking the handle against `[A-Za-z0-9_-]{2,}`.
    pub fn author(handle: &str) -> Result<Self> {
        if handle.chars().count() < 2 {
            return Err(Error::validation(
                handle,
                "author handle must be at least 2 characters",
            ));
        }
        if !handle
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(Error::validation(
                handle,
                "author handle may only contain ASCII letters, digits, '_' and '-'",
            ));
        }
        Ok(Self::Author(handle.to_string()))
    }

    /// Build a story tag. Ids are unsigned, so every value is valid.
    pub fn story(id: u64) -> Self {
        Self::StoryId(id.to_string())
    }

    fn keyword(s: &str) -> Option<Self> {
        let tag = match s {
            "story" => Self::Story,
            "comment" => Self::Comment,
            "poll" => Self::Poll,
            "pollopt" => Self::PollOpt,
            "job" => Self::Job,
            "ask_hn" => Self::AskHn,
            "show_hn" => Self::ShowHn,
            "launch_hn" => Self::LaunchHn,
            "front_page" => Self::FrontPage,
            _ => return None,
        };
        Some(tag)
    }
}

impl FromStr for Tag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if let Some(tag) = Self::keyword(s) {
            return Ok(tag);
        }
        if let Some(handle) = s.strip_prefix(AUTHOR_PREFIX) {
            return Self::author(handle).map_err(|_| {
                Error::validation(s, "author tag needs a handle matching [A-Za-z0-9_-]{2,}")
            });
        }
        if let Some(id) = s.strip_prefix(STORY_PREFIX) {
            if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
                return Err(Error::validation(
                    s,
                    "story tag needs a non-negative integer id",
                ));
            }
            return Ok(Self::StoryId(id.to_string()));
        }
        Err(Error::validation(s, "unknown tag"))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Story => f.write_str("story"),
            Self::Comment => f.write_str("comment"),
            Self::Poll => f.write_str("poll"),
            Self::PollOpt => f.write_str("pollopt"),
            Self::Job => f.write_str("job"),
            Self::AskHn => f.write_str("ask_hn"),
            Self::ShowHn => f.write_str("show_hn"),
            Self::LaunchHn => f.write_str("launch_hn"),
            Self::FrontPage => f.write_str("front_page"),
            Self::Author(handle) => write!(f, "{}{}", AUTHOR_PREFIX, handle),
            Self::StoryId(id) => write!(f, "{}{}", STORY_PREFIX, id),
        }
    }
}

/// Encode a tag list as the value of the `tags` query parameter.
///
/// Tags are validated in order and joined with `,`. Order and duplicates are
/// kept as given. The first invalid tag fails the whole call with
/// [`Error::Validation`]; an empty list encodes to `""`.
pub fn encode_tags<S: AsRef<str>>(tags: &[S]) -> Result<String> {
    let parsed = tags
        .iter()
        .map(|t| t.as_ref().parse::<Tag>())
        .collect::<Result<Vec<_>>>()?;

    Ok(parsed
        .iter()
        .map(Tag::to_string)
        .collect::<Vec<_>>()
        .join(","))
}
