//! Image resolution: keyword query → a short ordered list of image URLs.
//!
//! The primary path asks the Pexels search API for landscape photos. Any
//! failure on that path (no key, HTTP error, timeout, unexpected JSON) is
//! turned into the fixed placeholder set instead, so every scene always
//! receives images and the pipeline never aborts on the network.
//!
//! ## Explicit outcome
//!
//! [`ImageResolver::search`] returns a [`SearchOutcome`]: either the photos
//! that were found or the [`SearchFailure`] that stopped the search.
//! [`ImageResolver::resolve_detailed`] maps every `Failed` onto
//! [`placeholder_images`] in exactly one place; there is no other fallback
//! branch.
//!
//! ## Transport seam
//!
//! The HTTP exchange sits behind [`PhotoSearch`], which hands back the raw
//! status and body. [`PexelsClient`] is the reqwest implementation; tests
//! inject fakes to simulate HTTP 500s, slow servers or canned payloads.

use crate::config::StoryboardConfig;
use crate::error::SearchFailure;
use crate::output::ImageRef;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Pexels v1 photo search endpoint.
pub const PEXELS_SEARCH_URL: &str = "https://api.pexels.com/v1/search";

/// The unedited template value shipped in example configuration.
pub const PLACEHOLDER_CREDENTIAL: &str = "YOUR_PEXELS_API_KEY_HERE";

/// Upper bound on images per scene (and size of the placeholder set).
pub const MAX_IMAGES: usize = 3;

/// Orientation filter sent with every search.
pub const ORIENTATION: &str = "landscape";

const PLACEHOLDER_URLS: [&str; MAX_IMAGES] = [
    "https://via.placeholder.com/800x600/4A90E2/FFFFFF?text=Scene+1",
    "https://via.placeholder.com/800x600/50C878/FFFFFF?text=Scene+2",
    "https://via.placeholder.com/800x600/FF6B6B/FFFFFF?text=Scene+3",
];

// ── Transport ────────────────────────────────────────────────────────────

/// Parameters of one photo search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub per_page: usize,
    /// Sent verbatim in the `Authorization` header.
    pub credential: String,
}

impl SearchRequest {
    /// URL query parameters in the order the API documents them.
    pub fn query_params(&self) -> [(&'static str, String); 3] {
        [
            ("query", self.query.clone()),
            ("per_page", self.per_page.to_string()),
            ("orientation", ORIENTATION.to_string()),
        ]
    }
}

/// Status code and body of a search response, before interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Performs the HTTP exchange for a photo search.
///
/// Implementations only report transport-level failures
/// ([`SearchFailure::Transport`], [`SearchFailure::Timeout`]); status codes
/// and payloads are judged by [`ImageResolver`].
#[async_trait]
pub trait PhotoSearch: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<RawResponse, SearchFailure>;
}

/// reqwest-backed [`PhotoSearch`] for the Pexels API.
#[derive(Debug, Clone)]
pub struct PexelsClient {
    client: reqwest::Client,
    endpoint: String,
    timeout_secs: u64,
}

impl PexelsClient {
    /// Build a client with a per-request timeout.
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> Result<Self, SearchFailure> {
        let client = http_client(timeout_secs).map_err(|e| SearchFailure::ClientUnavailable {
            detail: e.to_string(),
        })?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            timeout_secs,
        })
    }
}

#[async_trait]
impl PhotoSearch for PexelsClient {
    async fn search(&self, request: &SearchRequest) -> Result<RawResponse, SearchFailure> {
        let response = self
            .client
            .get(&self.endpoint)
            .header(reqwest::header::AUTHORIZATION, request.credential.as_str())
            .query(&request.query_params())
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| self.classify(e))?;
        Ok(RawResponse { status, body })
    }
}

impl PexelsClient {
    fn classify(&self, e: reqwest::Error) -> SearchFailure {
        if e.is_timeout() {
            SearchFailure::Timeout {
                secs: self.timeout_secs,
            }
        } else {
            SearchFailure::Transport {
                detail: e.to_string(),
            }
        }
    }
}

/// Shared HTTP client settings for searches and image downloads.
pub fn http_client(timeout_secs: u64) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
}

// ── Payload ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct PexelsResponse {
    #[serde(default)]
    photos: Vec<PexelsPhoto>,
}

#[derive(Debug, Deserialize)]
struct PexelsPhoto {
    src: PexelsPhotoSrc,
    #[serde(default)]
    alt: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PexelsPhotoSrc {
    medium: String,
}

/// Map a successful response body to at most `count` images.
///
/// A body without a `photos` list is zero results. A photo without
/// `src.medium` makes the whole payload malformed. `alt` falls back to the
/// query only when the field is absent; an empty caption is kept.
pub fn parse_search_response(
    body: &str,
    query: &str,
    count: usize,
) -> Result<Vec<ImageRef>, SearchFailure> {
    let parsed: PexelsResponse =
        serde_json::from_str(body).map_err(|e| SearchFailure::MalformedPayload {
            detail: e.to_string(),
        })?;

    Ok(parsed
        .photos
        .into_iter()
        .take(count)
        .map(|photo| ImageRef {
            url: photo.src.medium,
            alt: photo.alt.unwrap_or_else(|| query.to_string()),
        })
        .collect())
}

// ── Fallback ─────────────────────────────────────────────────────────────

/// The first `count` entries (at most three) of the fixed placeholder set.
pub fn placeholder_images(count: usize) -> Vec<ImageRef> {
    PLACEHOLDER_URLS
        .iter()
        .take(count)
        .enumerate()
        .map(|(i, url)| ImageRef {
            url: (*url).to_string(),
            alt: format!("Placeholder {}", i + 1),
        })
        .collect()
}

// ── Resolver ─────────────────────────────────────────────────────────────

/// What a single search produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(Vec<ImageRef>),
    Failed(SearchFailure),
}

/// Images for one scene and, when placeholders were used, the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImages {
    pub images: Vec<ImageRef>,
    pub fallback: Option<SearchFailure>,
}

/// Resolves keyword queries to images. Never fails.
pub struct ImageResolver {
    credential: Option<String>,
    search: Result<Arc<dyn PhotoSearch>, SearchFailure>,
    timeout_secs: u64,
}

impl ImageResolver {
    /// Resolver over an explicit transport.
    pub fn new(
        credential: Option<String>,
        search: Arc<dyn PhotoSearch>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            credential,
            search: Ok(search),
            timeout_secs,
        }
    }

    /// Resolver using `config.photo_search`, or a [`PexelsClient`] for
    /// `config.endpoint` when none was supplied.
    ///
    /// If the HTTP client cannot be built the resolver still works; every
    /// search then falls back with [`SearchFailure::ClientUnavailable`].
    pub fn from_config(config: &StoryboardConfig) -> Self {
        let search = match config.photo_search {
            Some(ref search) => Ok(Arc::clone(search)),
            None => PexelsClient::new(config.endpoint.clone(), config.api_timeout_secs)
                .map(|c| Arc::new(c) as Arc<dyn PhotoSearch>)
                .inspect_err(|e| warn!("Image search disabled: {}", e)),
        };
        Self {
            credential: config.credential.clone(),
            search,
            timeout_secs: config.api_timeout_secs,
        }
    }

    /// Run one search attempt for `query`, asking for `count` images (1–3).
    pub async fn search(&self, query: &str, count: usize) -> SearchOutcome {
        let count = count.clamp(1, MAX_IMAGES);

        let credential = match self.credential.as_deref().map(str::trim) {
            None | Some("") => return SearchOutcome::Failed(SearchFailure::MissingCredential),
            Some(PLACEHOLDER_CREDENTIAL) => {
                return SearchOutcome::Failed(SearchFailure::PlaceholderCredential)
            }
            Some(key) => key,
        };

        let query = query.trim();
        if query.is_empty() {
            return SearchOutcome::Failed(SearchFailure::EmptyQuery);
        }

        let search = match self.search {
            Ok(ref search) => search,
            Err(ref failure) => return SearchOutcome::Failed(failure.clone()),
        };

        let request = SearchRequest {
            query: query.to_string(),
            per_page: count,
            credential: credential.to_string(),
        };

        let response = match tokio::time::timeout(
            Duration::from_secs(self.timeout_secs),
            search.search(&request),
        )
        .await
        {
            Ok(Ok(response)) => response,
            Ok(Err(failure)) => return SearchOutcome::Failed(failure),
            Err(_) => {
                return SearchOutcome::Failed(SearchFailure::Timeout {
                    secs: self.timeout_secs,
                })
            }
        };

        if response.status != 200 {
            return SearchOutcome::Failed(SearchFailure::HttpStatus {
                status: response.status,
            });
        }

        match parse_search_response(&response.body, query, count) {
            Ok(images) => {
                debug!("Search '{}': {} images", query, images.len());
                SearchOutcome::Found(images)
            }
            Err(failure) => SearchOutcome::Failed(failure),
        }
    }

    /// Search, substituting placeholders for any failure.
    pub async fn resolve_detailed(&self, query: &str, count: usize) -> ResolvedImages {
        match self.search(query, count).await {
            SearchOutcome::Found(images) => ResolvedImages {
                images,
                fallback: None,
            },
            SearchOutcome::Failed(failure) => {
                match failure {
                    SearchFailure::MissingCredential
                    | SearchFailure::PlaceholderCredential
                    | SearchFailure::EmptyQuery => {
                        debug!("Using placeholder images for '{}': {}", query, failure)
                    }
                    _ => warn!("Using placeholder images for '{}': {}", query, failure),
                }
                ResolvedImages {
                    images: placeholder_images(count.clamp(1, MAX_IMAGES)),
                    fallback: Some(failure),
                }
            }
        }
    }

    /// Up to `count` images for `query`; placeholders on any failure.
    pub async fn resolve(&self, query: &str, count: usize) -> Vec<ImageRef> {
        self.resolve_detailed(query, count).await.images
    }
}

// ── Download ─────────────────────────────────────────────────────────────

/// Fetch an image's bytes. Returns `None` on any failure.
pub async fn download_image(client: &reqwest::Client, url: &str) -> Option<Vec<u8>> {
    let response = match client.get(url).send().await {
        Ok(r) => r,
        Err(e) => {
            warn!("Error downloading image {}: {}", url, e);
            return None;
        }
    };

    if !response.status().is_success() {
        warn!("Error downloading image {}: HTTP {}", url, response.status());
        return None;
    }

    match response.bytes().await {
        Ok(bytes) => Some(bytes.to_vec()),
        Err(e) => {
            warn!("Error downloading image {}: {}", url, e);
            None
        }
    }
}
