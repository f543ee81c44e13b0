//! Response validation and normalization.
//!
//! [`validate_search_result`] takes the parsed JSON body of a search response
//! and produces a [`SearchResult`]. Each hit is classified by its `_tags`
//! (story > comment > poll > pollopt > job) and then read with the field
//! rules for that kind. Any violation aborts the whole call; there is no
//! partial result.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::{
    Comment, CommentHighlights, Exhaustive, Item, ItemKind, Job, JobHighlights, Poll,
    PollHighlights, PollOption, PollOptionHighlights, QueryParams, SearchResult, Story,
    StoryHighlights,
};
use crate::schema::{Fields, HighlightShape};

const STORY_HIGHLIGHTS: HighlightShape = HighlightShape {
    required: &["author", "title"],
    optional: &["story_text", "url"],
    strict: false,
};

const COMMENT_HIGHLIGHTS: HighlightShape = HighlightShape {
    required: &["author", "comment_text", "story_title"],
    optional: &["story_url"],
    strict: false,
};

const POLL_HIGHLIGHTS: HighlightShape = HighlightShape {
    required: &["author", "title"],
    optional: &[],
    strict: false,
};

const POLL_OPTION_HIGHLIGHTS: HighlightShape = HighlightShape {
    required: &["author"],
    optional: &[],
    strict: true,
};

const JOB_HIGHLIGHTS: HighlightShape = HighlightShape {
    required: &["author", "title"],
    optional: &["job_text", "url"],
    strict: false,
};

/// Validate a raw search response and normalize it.
///
/// # Errors
///
/// - [`Error::Schema`] when a field is missing, has the wrong type, or holds
///   a malformed timestamp, id, or URL. The error names the field's path.
/// - [`Error::UnknownKind`] when a hit's tags match none of the five kinds.
pub fn validate_search_result(raw: &Value) -> Result<SearchResult> {
    let root = Fields::new("", raw)?;

    let exhaustive = root.object("exhaustive")?;
    let exhaustive = Exhaustive {
        nb_hits: exhaustive.boolean("nbHits")?,
        typo: exhaustive.boolean("typo")?,
    };

    let hits = root.each_object("hits", read_hit)?;

    Ok(SearchResult {
        exhaustive,
        hits,
        hits_per_page: root.unsigned("hitsPerPage")?,
        nb_hits: root.unsigned("nbHits")?,
        nb_pages: root.unsigned("nbPages")?,
        page: root.unsigned("page")?,
        params: QueryParams::parse(&root.string("params")?),
        query: root.string("query")?,
    })
}

/// Classify one hit by its tags and read it as that kind.
pub fn read_hit(hit: Fields<'_>) -> Result<Item> {
    let tags = hit.string_list("_tags")?;
    let kind = ItemKind::classify(tags.as_slice())
        .ok_or_else(|| Error::UnknownKind { tags: tags.clone() })?;

    let item = match kind {
        ItemKind::Story => Item::Story(read_story(&hit, tags)?),
        ItemKind::Comment => Item::Comment(read_comment(&hit, tags)?),
        ItemKind::Poll => Item::Poll(read_poll(&hit, tags)?),
        ItemKind::PollOption => Item::PollOption(read_poll_option(&hit, tags)?),
        ItemKind::Job => Item::Job(read_job(&hit, tags)?),
    };
    Ok(item)
}

fn read_story(hit: &Fields<'_>, tags: Vec<String>) -> Result<Story> {
    let hl = hit.highlights(&STORY_HIGHLIGHTS)?;
    Ok(Story {
        id: hit.unsigned("story_id")?,
        author: hit.string("author")?,
        children: hit.id_list_or_empty("children")?,
        created_at: hit.timestamp("created_at")?,
        updated_at: hit.timestamp("updated_at")?,
        num_comments: hit.unsigned("num_comments")?,
        points: hit.integer("points")?,
        title: hit.string("title")?,
        story_text: hit.opt_string("story_text")?,
        url: hit.opt_url("url")?,
        tags,
        highlights: StoryHighlights {
            author: hl.highlight("author")?,
            title: hl.highlight("title")?,
            story_text: hl.opt_highlight("story_text")?,
            url: hl.opt_highlight("url")?,
        },
    })
}

fn read_comment(hit: &Fields<'_>, tags: Vec<String>) -> Result<Comment> {
    let hl = hit.highlights(&COMMENT_HIGHLIGHTS)?;
    Ok(Comment {
        id: hit.digit_id("objectID")?,
        author: hit.string("author")?,
        children: hit.id_list_or_empty("children")?,
        comment_text: hit.string("comment_text")?,
        parent_id: hit.unsigned("parent_id")?,
        story_id: hit.unsigned("story_id")?,
        story_title: hit.string("story_title")?,
        story_url: hit.opt_string("story_url")?,
        points: hit.nullable_integer("points")?,
        created_at: hit.timestamp("created_at")?,
        updated_at: hit.timestamp("updated_at")?,
        tags,
        highlights: CommentHighlights {
            author: hl.highlight("author")?,
            comment_text: hl.highlight("comment_text")?,
            story_title: hl.highlight("story_title")?,
            story_url: hl.opt_highlight("story_url")?,
        },
    })
}

fn read_poll(hit: &Fields<'_>, tags: Vec<String>) -> Result<Poll> {
    let hl = hit.highlights(&POLL_HIGHLIGHTS)?;
    Ok(Poll {
        id: hit.digit_id("objectID")?,
        author: hit.string("author")?,
        children: hit.id_list_or_empty("children")?,
        num_comments: hit.unsigned("num_comments")?,
        parts: hit.id_list("parts")?,
        points: hit.integer("points")?,
        title: hit.string("title")?,
        created_at: hit.timestamp("created_at")?,
        updated_at: hit.timestamp("updated_at")?,
        tags,
        highlights: PollHighlights {
            author: hl.highlight("author")?,
            title: hl.highlight("title")?,
        },
    })
}

fn read_poll_option(hit: &Fields<'_>, tags: Vec<String>) -> Result<PollOption> {
    let hl = hit.highlights(&POLL_OPTION_HIGHLIGHTS)?;
    Ok(PollOption {
        id: hit.digit_id("objectID")?,
        author: hit.string("author")?,
        points: hit.integer("points")?,
        created_at: hit.timestamp("created_at")?,
        updated_at: hit.timestamp("updated_at")?,
        tags,
        highlights: PollOptionHighlights {
            author: hl.highlight("author")?,
        },
    })
}

fn read_job(hit: &Fields<'_>, tags: Vec<String>) -> Result<Job> {
    let hl = hit.highlights(&JOB_HIGHLIGHTS)?;
    Ok(Job {
        id: hit.digit_id("objectID")?,
        author: hit.string("author")?,
        title: hit.string("title")?,
        job_text: hit.opt_string("job_text")?,
        url: hit.opt_string("url")?,
        created_at: hit.timestamp("created_at")?,
        updated_at: hit.timestamp("updated_at")?,
        tags,
        highlights: JobHighlights {
            author: hl.highlight("author")?,
            title: hl.highlight("title")?,
            job_text: hl.opt_highlight("job_text")?,
            url: hl.opt_highlight("url")?,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MatchLevel, Nullable};
    use serde_json::json;

    fn hl(value: &str) -> Value {
        json!({ "value": value, "matchLevel": "none", "matchedWords": [] })
    }

    fn story() -> Value {
        json!({
            "_highlightResult": {
                "author": hl("example_user"),
                "story_text": hl("This is the full text of the story."),
                "title": hl("Example story title"),
                "url": hl("https://example.com/story/url"),
            },
            "_tags": ["story", "author_example_user", "story_12345"],
            "author": "example_user",
            "children": [123451, 123452],
            "created_at": "2023-10-26T10:00:00.000Z",
            "created_at_i": 1698314400,
            "num_comments": 2,
            "objectID": "12345",
            "points": 100,
            "story_id": 12345,
            "story_text": "This is the full text of the story.",
            "title": "Example story title",
            "updated_at": "2023-10-26T11:00:00.000Z",
            "url": "https://example.com/story/url",
        })
    }

    fn comment() -> Value {
        json!({
            "_highlightResult": {
                "author": hl("example_user"),
                "comment_text": hl("Example comment text"),
                "story_title": hl("Example story title"),
                "story_url": hl("https://example.com/story/url"),
            },
            "_tags": ["comment", "author_example_user", "story_12345"],
            "author": "example_user",
            "children": [123456, 123457],
            "comment_text": "Example comment text",
            "created_at": "2023-10-15T12:00:00.000Z",
            "objectID": "123451",
            "parent_id": 12345,
            "story_id": 12345,
            "story_title": "Example story title",
            "story_url": "https://example.com/story/url",
            "updated_at": "2023-10-15T14:00:00.000Z",
        })
    }

    fn poll() -> Value {
        json!({
            "_highlightResult": {
                "author": hl("example_user"),
                "title": hl("Example poll title"),
            },
            "_tags": ["poll", "author_example_user"],
            "author": "example_user",
            "children": [123451, 123452],
            "created_at": "2023-10-26T10:00:00.000Z",
            "num_comments": 10,
            "objectID": "12345",
            "parts": [123456, 123457],
            "points": 50,
            "title": "Example poll title",
            "updated_at": "2023-10-26T11:00:00.000Z",
        })
    }

    fn poll_option() -> Value {
        json!({
            "_highlightResult": { "author": hl("example_user") },
            "_tags": ["pollopt", "author_example_user"],
            "author": "example_user",
            "created_at": "2023-10-26T10:00:00.000Z",
            "objectID": "12345",
            "points": 10,
            "updated_at": "2023-10-26T11:00:00.000Z",
        })
    }

    fn job() -> Value {
        json!({
            "_highlightResult": {
                "author": hl("example_user"),
                "title": hl("Example job title"),
                "url": hl("https://example.com/job/url"),
            },
            "_tags": ["job", "author_example_user"],
            "author": "example_user",
            "created_at": "2023-10-26T10:00:00.000Z",
            "job_text": "This is the full text of the job.",
            "objectID": "12345",
            "title": "Example job title",
            "updated_at": "2023-10-26T11:00:00.000Z",
            "url": "https://example.com/job/url",
        })
    }

    fn envelope(hits: Vec<Value>) -> Value {
        json!({
            "exhaustive": { "nbHits": false, "typo": true },
            "hits": hits,
            "hitsPerPage": 20,
            "nbHits": 100,
            "nbPages": 5,
            "page": 1,
            "params": "query=example&hitsPerPage=20",
            "query": "example",
        })
    }

    fn read(value: Value) -> Result<Item> {
        read_hit(Fields::new("hits[0]", &value)?)
    }

    fn without(mut value: Value, key: &str) -> Value {
        value.as_object_mut().unwrap().remove(key);
        value
    }

    fn with(mut value: Value, key: &str, field: Value) -> Value {
        value[key] = field;
        value
    }

    fn schema_path<T: std::fmt::Debug>(result: Result<T>) -> String {
        match result {
            Err(Error::Schema { path, .. }) => path,
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_full_result() {
        let raw = envelope(vec![story(), comment(), poll(), poll_option(), job()]);
        let result = validate_search_result(&raw).unwrap();

        assert_eq!(
            result.exhaustive,
            Exhaustive {
                nb_hits: false,
                typo: true
            }
        );
        assert_eq!(result.hits_per_page, 20);
        assert_eq!(result.nb_hits, 100);
        assert_eq!(result.nb_pages, 5);
        assert_eq!(result.page, 1);
        assert_eq!(result.query, "example");
        assert_eq!(result.params.get("hitsPerPage"), Some("20"));
        assert_eq!(result.params.to_string(), "query=example&hitsPerPage=20");

        let kinds: Vec<ItemKind> = result.hits.iter().map(Item::kind).collect();
        assert_eq!(kinds, ItemKind::PRIORITY.to_vec());
        let ids: Vec<u64> = result.hits.iter().map(Item::id).collect();
        assert_eq!(ids, vec![12345, 123451, 12345, 12345, 12345]);
    }

    #[test]
    fn test_empty_hits() {
        let raw = envelope(vec![]);
        let result = validate_search_result(&raw).unwrap();
        assert!(result.hits.is_empty());
        assert_eq!(result.nb_hits, 100);
        assert_eq!(result.query, "example");
    }

    #[test]
    fn test_story_normalization() {
        let Item::Story(s) = read(story()).unwrap() else {
            panic!("expected a story");
        };
        assert_eq!(s.id, 12345);
        assert_eq!(s.children, vec![123451, 123452]);
        assert_eq!(s.created_at.timestamp(), 1698314400);
        assert_eq!(s.updated_at.timestamp(), 1698314400 + 3600);
        assert_eq!(s.url.as_deref(), Some("https://example.com/story/url"));
        assert_eq!(s.highlights.title.match_level, MatchLevel::None);
        assert!(s.highlights.story_text.is_some());
    }

    #[test]
    fn test_story_optional_fields() {
        let raw = without(without(without(story(), "children"), "story_text"), "url");
        let Item::Story(s) = read(raw).unwrap() else {
            panic!("expected a story");
        };
        assert!(s.children.is_empty());
        assert_eq!(s.story_text, None);
        assert_eq!(s.url, None);
    }

    #[test]
    fn test_story_rejects_bad_fields() {
        assert_eq!(schema_path(read(with(story(), "points", Value::Null))), "hits[0].points");
        assert_eq!(schema_path(read(without(story(), "title"))), "hits[0].title");
        assert_eq!(
            schema_path(read(with(story(), "url", json!("not a url")))),
            "hits[0].url"
        );
        assert_eq!(
            schema_path(read(with(story(), "created_at", json!("2023-13-45")))),
            "hits[0].created_at"
        );
    }

    #[test]
    fn test_comment_normalization() {
        let Item::Comment(c) = read(comment()).unwrap() else {
            panic!("expected a comment");
        };
        assert_eq!(c.id, 123451);
        assert_eq!(c.parent_id, 12345);
        assert_eq!(c.story_id, 12345);
        assert_eq!(c.points, Nullable::Absent);
        assert_eq!(c.story_url.as_deref(), Some("https://example.com/story/url"));
    }

    #[test]
    fn test_comment_points_states() {
        let Item::Comment(c) = read(with(comment(), "points", Value::Null)).unwrap() else {
            panic!("expected a comment");
        };
        assert_eq!(c.points, Nullable::Null);

        let Item::Comment(c) = read(with(comment(), "points", json!(0))).unwrap() else {
            panic!("expected a comment");
        };
        assert_eq!(c.points, Nullable::Value(0));
    }

    #[test]
    fn test_comment_story_url_states() {
        let Item::Comment(empty) = read(with(comment(), "story_url", json!(""))).unwrap() else {
            panic!("expected a comment");
        };
        let Item::Comment(missing) = read(without(comment(), "story_url")).unwrap() else {
            panic!("expected a comment");
        };
        assert_eq!(empty.story_url.as_deref(), Some(""));
        assert_eq!(missing.story_url, None);
    }

    #[test]
    fn test_comment_rejects_non_digit_object_id() {
        assert_eq!(
            schema_path(read(with(comment(), "objectID", json!("invalid")))),
            "hits[0].objectID"
        );
    }

    #[test]
    fn test_poll_normalization() {
        let Item::Poll(p) = read(without(poll(), "children")).unwrap() else {
            panic!("expected a poll");
        };
        assert_eq!(p.id, 12345);
        assert!(p.children.is_empty());
        assert_eq!(p.parts, vec![123456, 123457]);
        assert_eq!(p.num_comments, 10);
        assert!(read(with(poll(), "points", Value::Null)).is_err());
    }

    #[test]
    fn test_poll_option_highlights_are_strict() {
        assert!(read(poll_option()).is_ok());
        let mut raw = poll_option();
        raw["_highlightResult"]["title"] = hl("extra");
        assert_eq!(
            schema_path(read(raw)),
            "hits[0]._highlightResult.title"
        );
        assert!(read(with(poll_option(), "points", Value::Null)).is_err());
    }

    #[test]
    fn test_job_normalization() {
        let raw = without(without(job(), "job_text"), "url");
        let Item::Job(j) = read(raw).unwrap() else {
            panic!("expected a job");
        };
        assert_eq!(j.id, 12345);
        assert_eq!(j.job_text, None);
        assert_eq!(j.url, None);
        assert!(j.highlights.url.is_some());
    }

    #[test]
    fn test_unknown_kind() {
        let raw = envelope(vec![story(), with(story(), "_tags", json!(["unknown_kind"]))]);
        match validate_search_result(&raw) {
            Err(Error::UnknownKind { tags }) => assert_eq!(tags, vec!["unknown_kind"]),
            other => panic!("expected unknown kind, got {:?}", other),
        }
    }

    #[test]
    fn test_failure_path_includes_hit_index() {
        let raw = envelope(vec![story(), comment(), without(story(), "title")]);
        assert_eq!(schema_path(validate_search_result(&raw)), "hits[2].title");
    }

    #[test]
    fn test_envelope_errors() {
        let raw = without(envelope(vec![]), "nbPages");
        assert_eq!(schema_path(validate_search_result(&raw)), "nbPages");

        let raw = with(envelope(vec![]), "exhaustive", json!({ "nbHits": true }));
        assert_eq!(schema_path(validate_search_result(&raw)), "exhaustive.typo");

        assert_eq!(schema_path(validate_search_result(&json!("nope"))), "$");
    }

    #[test]
    fn test_input_is_untouched() {
        let raw = envelope(vec![story(), comment()]);
        let before = raw.clone();
        validate_search_result(&raw).unwrap();
        assert_eq!(raw, before);
    }
}
