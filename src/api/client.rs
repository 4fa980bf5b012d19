//! PokeBase API client implementation.
//!
//! This module provides the client for the two JSON resources the TUI needs:
//! the autocomplete endpoint and the Pokémon page document. It handles
//! request/response processing, error mapping, and retry logic.

use std::time::Duration;

use reqwest::{header, Client, Response, StatusCode};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use super::error::{ApiError, Result};
use super::types::{Candidate, PokemonPage, SuggestResponse};
use crate::config::Settings;

/// Maximum number of retries for transient failures.
const MAX_RETRIES: u32 = 3;

/// Base delay between retries in milliseconds.
const RETRY_DELAY_MS: u64 = 250;

/// Path of the autocomplete endpoint.
const SUGGEST_PATH: &str = "/api/pokemon-suggest";

/// Path prefix of the page document endpoint.
const PAGE_PATH: &str = "/api/pokemon";

/// Route that redirects to a random Pokémon page.
const RANDOM_PATH: &str = "/random";

/// Path segment that precedes the identifier on a Pokémon page URL.
const PAGE_ROUTE: &str = "/pokemon/";

/// The PokeBase API client.
///
/// Cheap to clone; background tasks take their own copy.
#[derive(Debug, Clone)]
pub struct PokedexClient {
    /// The HTTP client.
    client: Client,
    /// The base URL of the PokeBase instance.
    base_url: String,
    /// Per-request timeout for page documents. Suggestion requests have
    /// none and end only on completion or cancellation.
    page_timeout: Duration,
}

impl PokedexClient {
    /// Create a client from the application settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not an http(s) URL or the HTTP
    /// client cannot be built.
    pub fn new(settings: &Settings) -> Result<Self> {
        Self::with_base_url(
            &settings.base_url,
            Duration::from_secs(settings.request_timeout_secs),
        )
    }

    /// Create a client for an explicit base URL.
    ///
    /// `page_timeout` bounds page and random-pick requests only.
    pub fn with_base_url(base_url: &str, page_timeout: Duration) -> Result<Self> {
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }

        let client = Client::builder().build().map_err(ApiError::Network)?;

        Ok(Self {
            client,
            base_url: normalize_base_url(base_url),
            page_timeout,
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch autocomplete candidates for `query`, abandoning the request as
    /// soon as `cancel` fires.
    ///
    /// A non-success status or an unreadable body yields an empty list; only
    /// transport failures and cancellation are errors.
    #[instrument(skip(self, cancel), fields(query = %query))]
    pub async fn suggest(&self, query: &str, cancel: &CancellationToken) -> Result<Vec<Candidate>> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Suggestion request cancelled");
                Err(ApiError::Cancelled)
            }
            result = self.fetch_suggestions(query) => result,
        }
    }

    async fn fetch_suggestions(&self, query: &str) -> Result<Vec<Candidate>> {
        let url = format!(
            "{}{}?q={}",
            self.base_url,
            SUGGEST_PATH,
            urlencoding::encode(query)
        );

        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            debug!(%status, "Suggestion endpoint returned non-success status");
            return Ok(Vec::new());
        }

        let body = response.text().await?;
        match serde_json::from_str::<SuggestResponse>(&body) {
            Ok(parsed) => {
                debug!("Received {} suggestions", parsed.results.len());
                Ok(parsed.results)
            }
            Err(e) => {
                debug!("Malformed suggestion body: {}", e);
                Ok(Vec::new())
            }
        }
    }

    /// Fetch the page document for a Pokémon identifier.
    #[instrument(skip(self), fields(identifier = %identifier))]
    pub async fn get_page(&self, identifier: &str) -> Result<PokemonPage> {
        let url = format!(
            "{}{}/{}",
            self.base_url,
            PAGE_PATH,
            urlencoding::encode(identifier)
        );

        let page: PokemonPage = self.get(&url).await.map_err(|e| {
            if matches!(e, ApiError::NotFound(_)) {
                ApiError::NotFound(format!("Pokémon '{}'", identifier))
            } else {
                e
            }
        })?;

        debug!("Fetched page for #{} {}", page.dex, page.display_name);
        Ok(page)
    }

    /// Ask the server to pick a random Pokémon and return its identifier.
    ///
    /// `GET /random` redirects to `/pokemon/<identifier>`; the identifier is
    /// read from the final URL and the HTML body is discarded.
    #[instrument(skip(self))]
    pub async fn random_identifier(&self) -> Result<String> {
        let url = format!("{}{}", self.base_url, RANDOM_PATH);
        let response = self
            .client
            .get(&url)
            .timeout(self.page_timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::from_status(status, &url));
        }

        let landed = response.url();
        let identifier = identifier_from_page_path(landed.path()).ok_or_else(|| {
            ApiError::InvalidResponse(format!("random pick redirected to {}", landed))
        })?;
        debug!(identifier = %identifier, "Random pick");
        Ok(identifier)
    }

    /// Perform a GET request with retry on transient failures.
    #[instrument(skip(self), fields(url = %url))]
    async fn get<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let mut attempts = 0;
        let mut last_error: Option<ApiError> = None;

        while attempts < MAX_RETRIES {
            attempts += 1;
            debug!("Request attempt {}/{}", attempts, MAX_RETRIES);

            match self.execute_get::<T>(url).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    if Self::is_retryable(&e) && attempts < MAX_RETRIES {
                        let delay = Self::calculate_retry_delay(attempts);
                        warn!(
                            "Request failed (attempt {}), retrying in {}ms: {}",
                            attempts, delay, e
                        );
                        tokio::time::sleep(Duration::from_millis(delay)).await;
                        last_error = Some(e);
                    } else {
                        return Err(e);
                    }
                }
            }
        }

        Err(last_error.unwrap_or(ApiError::ServerError("Max retries exceeded".to_string())))
    }

    async fn execute_get<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .timeout(self.page_timeout)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let url = response.url().to_string();

        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {}", e)))
        } else {
            let error_body = response.text().await.unwrap_or_default();
            debug!("Error response body: {}", error_body);
            Err(Self::error_from_response(status, &url, &error_body))
        }
    }

    /// Create an error from an HTTP response, preferring the server's
    /// `{"error": "..."}` message when present.
    fn error_from_response(status: StatusCode, url: &str, body: &str) -> ApiError {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|json| json.get("error").and_then(|v| v.as_str()).map(String::from));

        ApiError::from_status(status, message.as_deref().unwrap_or(url))
    }

    fn is_retryable(error: &ApiError) -> bool {
        matches!(
            error,
            ApiError::RateLimited | ApiError::ServerError(_) | ApiError::Network(_)
        )
    }

    /// Exponential backoff.
    fn calculate_retry_delay(attempt: u32) -> u64 {
        RETRY_DELAY_MS * 2u64.pow(attempt - 1)
    }
}

/// Normalize the base URL by removing trailing slashes.
fn normalize_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// Extract the identifier from a `/pokemon/<identifier>` path, allowing the
/// server to live under a path prefix.
fn identifier_from_page_path(path: &str) -> Option<String> {
    let (_, segment) = path.rsplit_once(PAGE_ROUTE)?;
    if segment.is_empty() || segment.contains('/') {
        return None;
    }
    let decoded = urlencoding::decode(segment).ok()?;
    Some(decoded.into_owned())
}
