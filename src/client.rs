//! Search client: endpoint selection, request building, and transport.
//!
//! [`HnClient`] turns [`SearchParameters`] into a request URL, sends it
//! through a [`Transport`], and runs the body through
//! [`validate_search_result`]. One call makes exactly one request; there is
//! no retry, caching, or pagination.
//!
//! # Example
//!
//! ```rust,no_run
//! # async fn demo() -> hn_search::Result<()> {
//! use hn_search::client::{HnClient, SearchParameters};
//! use hn_search::config::Config;
//!
//! let client = HnClient::new(&Config::default())?;
//! let params = SearchParameters {
//!     query: Some("rust".into()),
//!     tags: Some(vec!["story".into()]),
//!     ..Default::default()
//! };
//! let result = client.search_by_date(&params).await?;
//! println!("{} hits", result.nb_hits);
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::filter::{encode_filters, FilterCondition};
use crate::models::SearchResult;
use crate::tag::encode_tags;
use crate::validate::validate_search_result;

/// Which endpoint to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// `/search`: ranked by relevance, then points, then comment count.
    #[default]
    Relevance,
    /// `/search_by_date`: most recent first.
    Date,
}

impl SortOrder {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Relevance => "search",
            Self::Date => "search_by_date",
        }
    }
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "relevance" => Ok(Self::Relevance),
            "date" => Ok(Self::Date),
            other => Err(Error::InvalidSortOrder(other.to_string())),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Relevance => f.write_str("relevance"),
            Self::Date => f.write_str("date"),
        }
    }
}

/// Caller-supplied search parameters. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParameters {
    pub query: Option<String>,
    /// Raw tag strings, validated when the request is built.
    pub tags: Option<Vec<String>>,
    pub filters: Option<Vec<FilterCondition>>,
    pub page: Option<u32>,
    pub hits_per_page: Option<u32>,
}

impl SearchParameters {
    /// Encode into query-string pairs, in the order they are sent.
    ///
    /// An empty query is left out. Tags and filters are sent whenever the
    /// list is present, even if it is empty.
    pub fn to_query_pairs(&self) -> Result<Vec<(&'static str, String)>> {
        let mut pairs = Vec::new();
        if let Some(query) = self.query.as_deref().filter(|q| !q.is_empty()) {
            pairs.push(("query", query.to_string()));
        }
        if let Some(tags) = &self.tags {
            pairs.push(("tags", encode_tags(tags.as_slice())?));
        }
        if let Some(filters) = &self.filters {
            pairs.push(("numericFilters", encode_filters(filters)?));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(n) = self.hits_per_page {
            pairs.push(("hitsPerPage", n.to_string()));
        }
        Ok(pairs)
    }
}

/// An outgoing GET request.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub url: Url,
    pub headers: Vec<(String, String)>,
}

/// Status and body of a completed request.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// Sends one HTTP request.
///
/// [`ReqwestTransport`] is the default. Tests and embedders can supply
/// their own implementation through [`HnClient::with_transport`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse>;
}

/// [`Transport`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
        let mut builder = self.client.get(request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(TransportResponse { status, body })
    }
}

/// Client for the search API.
#[derive(Clone)]
pub struct HnClient {
    base_url: String,
    user_agent: String,
    default_hits_per_page: Option<u32>,
    transport: Arc<dyn Transport>,
}

impl HnClient {
    /// Build a client that talks HTTP through `reqwest`.
    ///
    /// The config is checked with [`Config::validate`] first, so a bad base
    /// URL, a zero timeout or an oversized page size fails here with
    /// [`Error::Config`].
    pub fn new(config: &Config) -> Result<Self> {
        config
            .validate()
            .map_err(|e| Error::Config(format!("{:#}", e)))?;
        let transport = ReqwestTransport::new(Duration::from_secs(config.client.timeout_secs))?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Build a client around a caller-supplied transport. The config is used
    /// as given; call [`Config::validate`] beforehand if it came from user
    /// input. An unusable base URL still surfaces as [`Error::Config`] on the
    /// first search.
    pub fn with_transport(config: &Config, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: config.client.base_url.trim_end_matches('/').to_string(),
            user_agent: config.client.user_agent.clone(),
            default_hits_per_page: config.search.hits_per_page,
            transport,
        }
    }

    pub fn endpoint(&self, order: SortOrder) -> Result<Url> {
        let raw = format!("{}/{}", self.base_url, order.path());
        Url::parse(&raw).map_err(|e| Error::Config(format!("invalid endpoint URL '{}': {}", raw, e)))
    }

    /// Full request URL for a search, with the configured page size filled
    /// in when the caller left it unset.
    pub fn request_url(&self, order: SortOrder, params: &SearchParameters) -> Result<Url> {
        let mut merged = params.clone();
        if merged.hits_per_page.is_none() {
            merged.hits_per_page = self.default_hits_per_page;
        }

        let mut url = self.endpoint(order)?;
        let pairs = merged.to_query_pairs()?;
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }

    pub async fn search(&self, order: SortOrder, params: &SearchParameters) -> Result<SearchResult> {
        let url = self.request_url(order, params)?;
        tracing::debug!(%url, %order, "sending search request");

        let response = self
            .transport
            .send(TransportRequest {
                url,
                headers: vec![("User-Agent".to_string(), self.user_agent.clone())],
            })
            .await?;

        if !(200..300).contains(&response.status) {
            return Err(Error::Status {
                status: response.status,
                body: response.body,
            });
        }

        let json: serde_json::Value = serde_json::from_str(&response.body)?;
        let result = validate_search_result(&json)?;
        tracing::debug!(
            hits = result.hits.len(),
            nb_hits = result.nb_hits,
            page = result.page,
            "search response normalized"
        );
        Ok(result)
    }

    pub async fn search_by_relevance(&self, params: &SearchParameters) -> Result<SearchResult> {
        self.search(SortOrder::Relevance, params).await
    }

    pub async fn search_by_date(&self, params: &SearchParameters) -> Result<SearchResult> {
        self.search(SortOrder::Date, params).await
    }
}
