//! Entry points for the `hn` subcommands.
//!
//! Each `run_*` function does the work for one subcommand and prints to
//! stdout. Diagnostics go through `tracing` on stderr.

use anyhow::{Context, Result};
use std::path::Path;

use crate::client::{HnClient, SearchParameters, SortOrder};
use crate::config::Config;
use crate::filter::{encode_filters, FilterCondition};
use crate::models::{Item, Nullable, SearchResult};
use crate::tag::encode_tags;
use crate::validate::validate_search_result;

/// Options collected from `hn search`.
#[derive(Debug, Clone, Default)]
pub struct SearchArgs {
    pub query: Option<String>,
    pub order: String,
    pub tags: Vec<String>,
    pub filters: Vec<String>,
    pub page: Option<u32>,
    pub hits_per_page: Option<u32>,
    pub json: bool,
}

fn parse_filters(raw: &[String]) -> Result<Vec<FilterCondition>> {
    raw.iter()
        .map(|f| {
            f.parse::<FilterCondition>()
                .with_context(|| format!("invalid --filter '{}'", f))
        })
        .collect()
}

pub async fn run_search(config: &Config, args: SearchArgs) -> Result<()> {
    let order: SortOrder = args.order.parse()?;
    let params = SearchParameters {
        query: args.query,
        tags: (!args.tags.is_empty()).then_some(args.tags),
        filters: if args.filters.is_empty() {
            None
        } else {
            Some(parse_filters(&args.filters)?)
        },
        page: args.page,
        hits_per_page: args.hits_per_page,
    };

    let client = HnClient::new(config)?;
    let result = client
        .search(order, &params)
        .await
        .context("search request failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }
    Ok(())
}

/// Print the `tags` and `numericFilters` values without sending anything.
pub fn run_encode(tags: &[String], filters: &[String]) -> Result<()> {
    let conditions = parse_filters(filters)?;
    println!("tags={}", encode_tags(tags)?);
    println!("numericFilters={}", encode_filters(&conditions)?);
    Ok(())
}

/// Normalize a saved response body and print it as JSON.
pub fn run_validate(path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read response file: {}", path.display()))?;
    let raw: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;

    let result = validate_search_result(&raw)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn print_result(result: &SearchResult) {
    if result.hits.is_empty() {
        println!("No results.");
        return;
    }

    println!(
        "{} hits (page {} of {}, {} per page)",
        result.nb_hits,
        result.page.saturating_add(1),
        result.nb_pages.max(1),
        result.hits_per_page
    );
    println!();

    for (i, item) in result.hits.iter().enumerate() {
        println!(
            "{}. [{}] {}",
            rank(result.page, result.hits_per_page, i),
            item.kind(),
            item.title().unwrap_or("(untitled)")
        );
        println!(
            "    by {} on {}",
            item.author(),
            item.created_at().format("%Y-%m-%d %H:%M")
        );
        match item {
            Item::Story(s) => {
                println!("    points: {}  comments: {}", s.points, s.num_comments);
                if let Some(ref url) = s.url {
                    println!("    url: {}", url);
                }
            }
            Item::Comment(c) => {
                if let Nullable::Value(points) = c.points {
                    println!("    points: {}", points);
                }
                println!("    parent: {}  story: {}", c.parent_id, c.story_id);
                println!(
                    "    excerpt: \"{}\"",
                    excerpt(&c.comment_text, 160).replace('\n', " ").trim()
                );
            }
            Item::Poll(p) => {
                println!(
                    "    points: {}  comments: {}  options: {}",
                    p.points,
                    p.num_comments,
                    p.parts.len()
                );
            }
            Item::PollOption(o) => {
                println!("    points: {}", o.points);
            }
            Item::Job(j) => {
                if let Some(ref url) = j.url {
                    println!("    url: {}", url);
                }
            }
        }
        println!("    id: {}", item.id());
        println!();
    }
}

/// 1-based position of a hit across all pages. Page numbers come from the
/// server, so the arithmetic saturates.
fn rank(page: u64, hits_per_page: u64, index: usize) -> u64 {
    page.saturating_mul(hits_per_page)
        .saturating_add(index as u64)
        .saturating_add(1)
}

fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt() {
        assert_eq!(excerpt("short", 10), "short");
        assert_eq!(excerpt("abcdef", 3), "abc...");
        assert_eq!(excerpt("ééé", 2), "éé...");
    }

    #[test]
    fn test_rank() {
        assert_eq!(rank(0, 20, 0), 1);
        assert_eq!(rank(2, 20, 4), 45);
        assert_eq!(rank(u64::MAX, 1000, 3), u64::MAX);
        assert_eq!(rank(1, u64::MAX, 0), u64::MAX);
    }

    #[test]
    fn test_parse_filters_reports_the_bad_one() {
        let raw = vec!["points>1".to_string(), "karma>1".to_string()];
        let err = parse_filters(&raw).unwrap_err();
        assert!(err.to_string().contains("karma>1"));
    }
}
