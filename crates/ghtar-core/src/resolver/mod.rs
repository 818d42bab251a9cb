//! Archive link resolution via the GitHub REST API.
//!
//! `GET /repos/{owner}/{repo}/tarball/{ref}` answers with a redirect whose
//! `Location` is a short-lived codeload URL. Redirects are not followed
//! here; the link itself is the result.

mod error;
mod headers;

pub use error::ResolveError;
pub use headers::ApiHeaders;

use crate::config::GhtarConfig;
use crate::repo_ref::RepoRef;
use anyhow::Context;
use serde::Deserialize;
use std::str;
use std::time::Duration;
use url::Url;

/// Cap on how much of an error body is kept for the message lookup.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Turns a repository reference into a downloadable tarball URL.
///
/// `Ok(None)` means the API answered successfully but did not produce a link.
pub trait ArchiveLinkResolver {
    fn archive_link(&self, repo: &RepoRef) -> Result<Option<Url>, ResolveError>;
}

/// Raw API answer, before interpretation.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u32,
    pub headers: ApiHeaders,
    pub body: Vec<u8>,
}

/// Resolver backed by the public GitHub API (or an Enterprise instance).
#[derive(Debug, Clone)]
pub struct GitHubResolver {
    api_base: Url,
    user_agent: String,
    connect_timeout: Duration,
    timeout: Duration,
}

impl GitHubResolver {
    pub fn from_config(cfg: &GhtarConfig) -> anyhow::Result<Self> {
        let api_base = Url::parse(&cfg.api_base_url)
            .with_context(|| format!("invalid api_base_url {:?}", cfg.api_base_url))?;
        if api_base.cannot_be_a_base() {
            anyhow::bail!("invalid api_base_url {:?}: not a base URL", cfg.api_base_url);
        }
        let http = cfg.http();
        Ok(Self {
            api_base,
            user_agent: cfg.user_agent.clone(),
            connect_timeout: Duration::from_secs(http.connect_timeout_secs),
            timeout: Duration::from_secs(http.api_timeout_secs),
        })
    }

    /// `{api_base}/repos/{owner}/{repo}/tarball/{branch}`. Slashes in the
    /// branch stay path separators, which is how the API expects refs.
    pub fn tarball_endpoint(&self, repo: &RepoRef) -> Url {
        let mut endpoint = self.api_base.clone();
        if let Ok(mut segments) = endpoint.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["repos", repo.owner.as_str(), repo.name.as_str(), "tarball"])
                .extend(repo.branch.split('/'));
        }
        endpoint
    }

    fn request(&self, endpoint: &Url) -> Result<ApiResponse, curl::Error> {
        let mut header_lines: Vec<String> = Vec::new();
        let mut body: Vec<u8> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(endpoint.as_str())?;
        easy.follow_location(false)?;
        easy.useragent(&self.user_agent)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;

        let mut list = curl::easy::List::new();
        list.append("Accept: application/vnd.github+json")?;
        list.append("X-GitHub-Api-Version: 2022-11-28")?;
        easy.http_headers(list)?;

        {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    header_lines.push(s.trim_end().to_string());
                }
                true
            })?;
            transfer.write_function(|data| {
                let room = MAX_BODY_BYTES.saturating_sub(body.len());
                body.extend_from_slice(&data[..data.len().min(room)]);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let status = easy.response_code()?;
        Ok(ApiResponse {
            status,
            headers: headers::parse_headers(&header_lines),
            body,
        })
    }
}

impl ArchiveLinkResolver for GitHubResolver {
    fn archive_link(&self, repo: &RepoRef) -> Result<Option<Url>, ResolveError> {
        let endpoint = self.tarball_endpoint(repo);
        tracing::debug!(%endpoint, repo = %repo, "requesting archive link");

        let response = self
            .request(&endpoint)
            .map_err(|source| ResolveError::Transport {
                url: endpoint.to_string(),
                source,
            })?;
        tracing::debug!(
            status = response.status,
            rate_limit_remaining = ?response.headers.rate_limit_remaining,
            "archive link response"
        );

        interpret_response(&endpoint, &response)
    }
}

/// Maps an API answer onto the resolver outcome.
///
/// - any 3xx with `Location` → the link (relative locations resolved against `endpoint`)
/// - 2xx, or 3xx without `Location` → `Ok(None)`
/// - 429, or 403 with the limit exhausted or a rate-limit message → `RateLimited`
/// - everything else → `Api` with GitHub's `message` when present
pub fn interpret_response(
    endpoint: &Url,
    response: &ApiResponse,
) -> Result<Option<Url>, ResolveError> {
    let status = response.status;
    let headers = &response.headers;

    if (300..400).contains(&status) {
        return match headers.location.as_deref() {
            None => Ok(None),
            Some(location) => endpoint.join(location).map(Some).map_err(|source| {
                ResolveError::InvalidLocation {
                    location: location.to_string(),
                    source,
                }
            }),
        };
    }
    if (200..300).contains(&status) {
        return Ok(None);
    }

    let message = api_message(&response.body);
    let mentions_rate_limit = message
        .as_deref()
        .is_some_and(|m| m.to_ascii_lowercase().contains("rate limit"));
    if status == 429 || (status == 403 && (headers.rate_limit_exhausted() || mentions_rate_limit))
    {
        return Err(ResolveError::RateLimited {
            reset: headers.rate_limit_reset,
            retry_after: headers.retry_after,
        });
    }

    Err(ResolveError::Api { status, message })
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// `message` field of a GitHub JSON error body, if the body is one.
fn api_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ApiErrorBody>(body)
        .ok()
        .map(|b| b.message)
        .filter(|m| !m.is_empty())
}
