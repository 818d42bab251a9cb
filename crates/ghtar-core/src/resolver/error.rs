//! Archive-link resolution errors.

/// Why the API did not hand back an archive link.
///
/// `RateLimited` is kept apart from everything else so the CLI can tell the
/// user to come back later instead of reporting a generic failure.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// Primary or secondary rate limit hit (403/429).
    #[error("Rate limit exceeded, please try again later.{}", reset_hint(.reset, .retry_after))]
    RateLimited {
        /// Window reset time, UTC epoch seconds.
        reset: Option<u64>,
        /// Seconds to wait, when GitHub sent `Retry-After`.
        retry_after: Option<u64>,
    },
    /// Any other non-redirect status: unknown repo or branch, auth failure, server error.
    #[error("GitHub API returned HTTP {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Api { status: u32, message: Option<String> },
    /// Network-level failure talking to the API.
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: curl::Error,
    },
    /// The redirect carried a `Location` that is not a URL.
    #[error("invalid archive location {location:?}")]
    InvalidLocation {
        location: String,
        #[source]
        source: url::ParseError,
    },
}

impl ResolveError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ResolveError::RateLimited { .. })
    }
}

fn reset_hint(reset: &Option<u64>, retry_after: &Option<u64>) -> String {
    match (retry_after, reset) {
        (Some(secs), _) => format!(" (retry after {secs}s)"),
        (None, Some(epoch)) => format!(" (limit resets at unix time {epoch})"),
        (None, None) => String::new(),
    }
}
