//! # hn-search
//!
//! A typed client for the Hacker News search API hosted by Algolia
//! (`https://hn.algolia.com/api/v1`).
//!
//! The crate encodes search parameters into the service's query-string
//! dialect, sends one request, and turns the untyped JSON response into a
//! [`SearchResult`] whose hits are a closed [`Item`] enum (story, comment,
//! poll, poll option, job).
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐   ┌────────────┐   ┌──────────────────────┐
//! │ SearchParameters │──▶│  Encoder   │──▶│  HnClient (reqwest)  │
//! │ tags / filters   │   │ tag+filter │   │  /search[_by_date]   │
//! └──────────────────┘   └────────────┘   └──────────┬───────────┘
//!                                                    │ JSON
//!                                                    ▼
//!                                         ┌──────────────────────┐
//!                                         │  validate (schema)   │
//!                                         │  → SearchResult      │
//!                                         └──────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! hn search "rust" --tag story --filter "points>100"
//! hn search --by date --tag author_dang --json
//! hn encode --tag story --filter "created_at_i<1700000000"
//! hn validate response.json
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`tag`] | Tag grammar and the `tags` parameter |
//! | [`filter`] | Numeric filters and the `numericFilters` parameter |
//! | [`schema`] | Path-tracking JSON field readers |
//! | [`validate`] | Response validation and hit normalization |
//! | [`models`] | Normalized result types |
//! | [`client`] | Endpoint selection and HTTP transport |
//! | [`config`] | TOML configuration |
//! | [`commands`] | `hn` subcommand entry points |
//! | [`error`] | Error type |

pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod filter;
pub mod models;
pub mod schema;
pub mod tag;
pub mod validate;

pub use client::{HnClient, SearchParameters, SortOrder};
pub use error::{Error, Result};
pub use filter::{encode_filters, FilterCondition};
pub use models::{Item, ItemKind, Nullable, SearchResult};
pub use tag::{encode_tags, Tag};
pub use validate::validate_search_result;
