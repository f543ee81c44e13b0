//! Normalized search results.
//!
//! These are the values produced by [`validate_search_result`]. They are
//! built once from the raw response and never mutated afterwards.
//!
//! [`validate_search_result`]: crate::validate::validate_search_result

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A field that may be missing, explicitly `null`, or set.
///
/// Comment points use this: the service omits them on some hits and sends
/// `null` on others, and the two cases mean different things.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Nullable<T> {
    #[default]
    Absent,
    Null,
    Value(T),
}

impl<T> Nullable<T> {
    /// The value, if one is set. Absent and null both give `None`.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Absent | Self::Null => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

// Absent and null both serialize as `null`; callers who need the
// distinction use the enum directly.
impl<T: Serialize> Serialize for Nullable<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(v) => serializer.serialize_some(v),
            Self::Absent | Self::Null => serializer.serialize_none(),
        }
    }
}

/// How well a field matched the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchLevel {
    None,
    Partial,
    Full,
}

/// Highlight metadata for one text field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Highlight {
    pub value: String,
    pub match_level: MatchLevel,
    pub matched_words: Vec<String>,
    pub fully_highlighted: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoryHighlights {
    pub author: Highlight,
    pub title: Highlight,
    pub story_text: Option<Highlight>,
    pub url: Option<Highlight>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentHighlights {
    pub author: Highlight,
    pub comment_text: Highlight,
    pub story_title: Highlight,
    pub story_url: Option<Highlight>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PollHighlights {
    pub author: Highlight,
    pub title: Highlight,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PollOptionHighlights {
    pub author: Highlight,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobHighlights {
    pub author: Highlight,
    pub title: Highlight,
    pub job_text: Option<Highlight>,
    pub url: Option<Highlight>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Story {
    pub id: u64,
    pub author: String,
    pub children: Vec<u64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub num_comments: u64,
    pub points: i64,
    pub title: String,
    pub story_text: Option<String>,
    pub url: Option<String>,
    pub tags: Vec<String>,
    pub highlights: StoryHighlights,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub id: u64,
    pub author: String,
    pub children: Vec<u64>,
    pub comment_text: String,
    pub parent_id: u64,
    pub story_id: u64,
    pub story_title: String,
    /// `Some("")` and `None` are both sent by the service and kept apart.
    pub story_url: Option<String>,
    pub points: Nullable<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub tags: Vec<String>,
    pub highlights: CommentHighlights,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Poll {
    pub id: u64,
    pub author: String,
    pub children: Vec<u64>,
    pub num_comments: u64,
    pub parts: Vec<u64>,
    pub points: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub tags: Vec<String>,
    pub highlights: PollHighlights,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PollOption {
    pub id: u64,
    pub author: String,
    pub points: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub tags: Vec<String>,
    pub highlights: PollOptionHighlights,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Job {
    pub id: u64,
    pub author: String,
    pub title: String,
    pub job_text: Option<String>,
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub tags: Vec<String>,
    pub highlights: JobHighlights,
}

/// The five item kinds, in discrimination order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Story,
    Comment,
    Poll,
    #[serde(rename = "pollopt")]
    PollOption,
    Job,
}

impl ItemKind {
    /// Kinds in the order they are tested against a hit's tags.
    pub const PRIORITY: [ItemKind; 5] = [
        ItemKind::Story,
        ItemKind::Comment,
        ItemKind::Poll,
        ItemKind::PollOption,
        ItemKind::Job,
    ];

    /// The tag that marks an item of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Story => "story",
            Self::Comment => "comment",
            Self::Poll => "poll",
            Self::PollOption => "pollopt",
            Self::Job => "job",
        }
    }

    /// Pick the kind from a hit's tag list; the first kind in
    /// [`PRIORITY`](Self::PRIORITY) whose tag is present wins.
    pub fn classify<S: AsRef<str>>(tags: &[S]) -> Option<Self> {
        Self::PRIORITY
            .into_iter()
            .find(|kind| tags.iter().any(|t| t.as_ref() == kind.as_str()))
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Item {
    Story(Story),
    Comment(Comment),
    Poll(Poll),
    #[serde(rename = "pollopt")]
    PollOption(PollOption),
    Job(Job),
}

impl Item {
    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Story(_) => ItemKind::Story,
            Self::Comment(_) => ItemKind::Comment,
            Self::Poll(_) => ItemKind::Poll,
            Self::PollOption(_) => ItemKind::PollOption,
            Self::Job(_) => ItemKind::Job,
        }
    }

    pub fn id(&self) -> u64 {
        match self {
            Self::Story(s) => s.id,
            Self::Comment(c) => c.id,
            Self::Poll(p) => p.id,
            Self::PollOption(o) => o.id,
            Self::Job(j) => j.id,
        }
    }

    pub fn author(&self) -> &str {
        match self {
            Self::Story(s) => &s.author,
            Self::Comment(c) => &c.author,
            Self::Poll(p) => &p.author,
            Self::PollOption(o) => &o.author,
            Self::Job(j) => &j.author,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            Self::Story(s) => s.created_at,
            Self::Comment(c) => c.created_at,
            Self::Poll(p) => p.created_at,
            Self::PollOption(o) => o.created_at,
            Self::Job(j) => j.created_at,
        }
    }

    /// Title for display. Comments show the title of their story; poll
    /// options have none.
    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Story(s) => Some(&s.title),
            Self::Comment(c) => Some(&c.story_title),
            Self::Poll(p) => Some(&p.title),
            Self::PollOption(_) => None,
            Self::Job(j) => Some(&j.title),
        }
    }

    pub fn tags(&self) -> &[String] {
        match self {
            Self::Story(s) => &s.tags,
            Self::Comment(c) => &c.tags,
            Self::Poll(p) => &p.tags,
            Self::PollOption(o) => &o.tags,
            Self::Job(j) => &j.tags,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Exhaustive {
    pub nb_hits: bool,
    pub typo: bool,
}

/// The echoed `params` string, decoded into ordered key/value pairs.
///
/// Keys may repeat; [`get`](Self::get) returns the first value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    /// Decode an `application/x-www-form-urlencoded` string.
    pub fn parse(raw: &str) -> Self {
        Self(
            url::form_urlencoded::parse(raw.as_bytes())
                .into_owned()
                .collect(),
        )
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Re-encodes the pairs in their original order.
impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.0.iter())
            .finish();
        f.write_str(&encoded)
    }
}

/// A normalized search response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub exhaustive: Exhaustive,
    /// Hits in the order the service returned them.
    pub hits: Vec<Item>,
    pub hits_per_page: u64,
    pub nb_hits: u64,
    pub nb_pages: u64,
    pub page: u64,
    pub params: QueryParams,
    pub query: String,
}
