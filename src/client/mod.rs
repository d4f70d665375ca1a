//! Stump SDK client
//!
//! Thin GraphQL-over-HTTP client: formats URLs, attaches the bearer token,
//! and forwards the book query and the two progress mutations. The engine is
//! a pure consumer of the server's GraphQL contract; no wire formats are
//! defined here.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::book::Book;
use crate::reporter::{ProgressSink, ProgressUpdate};

/// Crate version with git SHA, injected by the build script
pub fn version() -> String {
    format!(
        "{} ({})",
        env!("STUMP_READER_VERSION"),
        env!("STUMP_READER_GIT_SHA")
    )
}

const BOOK_QUERY: &str = r#"
query BookReadScreen($id: ID!) {
    mediaById(id: $id) {
        id
        name: resolvedName
        pages
        extension
        readProgress {
            percentageCompleted
            epubcfi
            page
            elapsedSeconds
        }
        libraryConfig {
            defaultReadingImageScaleFit
            defaultReadingMode
            defaultReadingDir
        }
    }
}"#;

const PAGE_PROGRESS_MUTATION: &str = r#"
mutation UpdateReadProgress($id: ID!, $page: Int!, $elapsedSeconds: Int!) {
    updateMediaProgress(id: $id, page: $page, elapsedSeconds: $elapsedSeconds) {
        __typename
    }
}"#;

const EPUB_PROGRESS_MUTATION: &str = r#"
mutation UpdateEpubCfi($id: ID!, $input: EpubProgressInput!) {
    updateEpubProgress(id: $id, input: $input) {
        __typename
    }
}"#;

/// Errors surfaced by the SDK client
#[derive(Debug, Error)]
pub enum ClientError {
    /// The book query resolved to null; fatal to the reading screen
    #[error("book not found: {0}")]
    BookNotFound(String),

    #[error("invalid server URL: {0}")]
    InvalidBaseUrl(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with GraphQL-level errors
    #[error("api error: {0}")]
    Api(String),
}

#[derive(Debug, Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
    variables: Value,
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphqlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct BookData {
    #[serde(rename = "mediaById")]
    media_by_id: Option<Book>,
}

/// HTTP client for a single Stump server
pub struct StumpClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl StumpClient {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url)
            .map_err(|_| ClientError::InvalidBaseUrl(base_url.to_string()))?;

        let http = Client::builder()
            .user_agent(format!("stump-reader/{}", env!("STUMP_READER_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|e| {
                warn!("failed to build HTTP client with custom config: {}. Using default.", e);
                Client::default()
            });

        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    fn graphql_url(&self) -> Url {
        // Base URL is validated at construction; "graphql" is a valid segment
        self.base_url
            .join("graphql")
            .expect("valid graphql endpoint")
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
    ) -> Result<T, ClientError> {
        let mut request = self
            .http
            .post(self.graphql_url())
            .json(&GraphqlRequest { query, variables });

        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?.error_for_status()?;
        let body: GraphqlResponse<T> = response.json().await?;

        if let Some(errors) = body.errors.filter(|e| !e.is_empty()) {
            let message = errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ClientError::Api(message));
        }

        body.data
            .ok_or_else(|| ClientError::Api("response carried no data".to_string()))
    }

    /// Fetch the book metadata needed to mount a reading session.
    ///
    /// A null book is fatal: the reading screen has nothing to render.
    pub async fn book_by_id(&self, id: &str) -> Result<Book, ClientError> {
        let data: BookData = self.execute(BOOK_QUERY, json!({ "id": id })).await?;
        data.media_by_id
            .ok_or_else(|| ClientError::BookNotFound(id.to_string()))
    }

    /// Submit page progress for an image-based book. Idempotent from the
    /// caller's perspective.
    pub async fn update_page_progress(
        &self,
        id: &str,
        page: i32,
        elapsed_seconds: u64,
    ) -> Result<(), ClientError> {
        debug!(book_id = id, page, elapsed_seconds, "submitting page progress");
        self.execute::<Value>(
            PAGE_PROGRESS_MUTATION,
            json!({ "id": id, "page": page, "elapsedSeconds": elapsed_seconds }),
        )
        .await?;
        Ok(())
    }

    /// Submit EPUB position progress. Idempotent from the caller's
    /// perspective.
    pub async fn update_epub_progress(
        &self,
        id: &str,
        epubcfi: &str,
        percentage: f64,
        elapsed_seconds: u64,
    ) -> Result<(), ClientError> {
        debug!(book_id = id, percentage, elapsed_seconds, "submitting epub progress");
        self.execute::<Value>(
            EPUB_PROGRESS_MUTATION,
            json!({
                "id": id,
                "input": {
                    "epubcfi": epubcfi,
                    "percentage": percentage,
                    "elapsedSeconds": elapsed_seconds,
                }
            }),
        )
        .await?;
        Ok(())
    }

    /// URL for a page image. `height` selects the server-side thumbnail
    /// variant (the small-images preference uses height=600).
    pub fn book_page_url(&self, id: &str, page: i32, height: Option<u32>) -> Url {
        let mut url = self
            .base_url
            .join(&format!("api/v1/media/{}/page/{}", id, page))
            .expect("valid page path");
        if let Some(height) = height {
            url.query_pairs_mut()
                .append_pair("height", &height.to_string());
        }
        url
    }
}

#[async_trait]
impl ProgressSink for StumpClient {
    async fn submit(&self, update: &ProgressUpdate) -> Result<()> {
        match update {
            ProgressUpdate::Page {
                book_id,
                page,
                elapsed_seconds,
            } => {
                self.update_page_progress(book_id, *page, *elapsed_seconds)
                    .await?
            }
            ProgressUpdate::Epub {
                book_id,
                epubcfi,
                percentage,
                elapsed_seconds,
            } => {
                self.update_epub_progress(book_id, epubcfi, *percentage, *elapsed_seconds)
                    .await?
            }
        }
        Ok(())
    }
}
