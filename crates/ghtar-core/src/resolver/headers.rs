//! Parse API response header lines into the fields the resolver needs.

/// Headers of interest on a GitHub API response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiHeaders {
    /// `Location` of a redirect (the archive link).
    pub location: Option<String>,
    /// `X-RateLimit-Remaining`: requests left in the current window.
    pub rate_limit_remaining: Option<u64>,
    /// `X-RateLimit-Reset`: window reset time, UTC epoch seconds.
    pub rate_limit_reset: Option<u64>,
    /// `Retry-After` in seconds (secondary rate limits).
    pub retry_after: Option<u64>,
}

impl ApiHeaders {
    /// True when GitHub says the primary rate limit is used up.
    pub fn rate_limit_exhausted(&self) -> bool {
        self.rate_limit_remaining == Some(0)
    }
}

/// Parse collected header lines. Only the last response block counts: a
/// status line (`HTTP/...`) resets everything seen before it.
pub(crate) fn parse_headers(lines: &[String]) -> ApiHeaders {
    let mut out = ApiHeaders::default();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            out = ApiHeaders::default();
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("location") && !value.is_empty() {
                out.location = Some(value.to_string());
            }
            if name.eq_ignore_ascii_case("x-ratelimit-remaining") {
                out.rate_limit_remaining = value.parse().ok();
            }
            if name.eq_ignore_ascii_case("x-ratelimit-reset") {
                out.rate_limit_reset = value.parse().ok();
            }
            if name.eq_ignore_ascii_case("retry-after") {
                out.retry_after = value.parse().ok();
            }
        }
    }

    out
}
