//! Single-stream HTTP GET of the archive into a local file.
//!
//! The body is written sequentially as it arrives; nothing is buffered in
//! memory beyond libcurl's receive buffer.

use crate::config::GhtarConfig;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

/// Deadlines and client identity for one download.
#[derive(Debug, Clone)]
pub struct DownloadOptions {
    pub user_agent: String,
    pub connect_timeout: Duration,
    /// Abort when throughput stays below `low_speed_limit` bytes/sec for `low_speed_time`.
    pub low_speed_limit: u32,
    pub low_speed_time: Duration,
    /// Hard limit for the whole transfer.
    pub timeout: Duration,
    pub max_redirections: u32,
}

impl DownloadOptions {
    pub fn from_config(cfg: &GhtarConfig) -> Self {
        let http = cfg.http();
        Self {
            user_agent: cfg.user_agent.clone(),
            connect_timeout: Duration::from_secs(http.connect_timeout_secs),
            low_speed_limit: http.low_speed_limit_bytes,
            low_speed_time: Duration::from_secs(http.low_speed_time_secs),
            timeout: Duration::from_secs(http.download_timeout_secs),
            max_redirections: http.max_redirections,
        }
    }
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self::from_config(&GhtarConfig::default())
    }
}

/// Downloads `url` into `dest` (created or truncated), following redirects.
/// Returns the number of bytes written.
///
/// Fails on a non-2xx final status, on a body shorter than the advertised
/// `Content-Length`, and on any write error. The file is synced before
/// returning; on error it may hold a partial body and the caller decides
/// whether to remove it.
pub fn download_to_file(url: &str, dest: &Path, opts: &DownloadOptions) -> Result<u64> {
    let mut file = File::create(dest).with_context(|| format!("create {}", dest.display()))?;
    let mut written: u64 = 0;
    let mut write_error: Option<io::Error> = None;

    let mut easy = curl::easy::Easy::new();
    easy.url(url).context("invalid URL")?;
    easy.follow_location(true)?;
    easy.max_redirections(opts.max_redirections)?;
    easy.useragent(&opts.user_agent)?;
    easy.connect_timeout(opts.connect_timeout)?;
    easy.low_speed_limit(opts.low_speed_limit)?;
    easy.low_speed_time(opts.low_speed_time)?;
    easy.timeout(opts.timeout)?;

    let performed = {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| match file.write_all(data) {
            Ok(()) => {
                written += data.len() as u64;
                Ok(data.len())
            }
            Err(e) => {
                write_error = Some(e);
                Ok(0) // abort transfer
            }
        })?;
        transfer.perform()
    };

    if let Err(e) = performed {
        if e.is_write_error() {
            if let Some(io_err) = write_error.take() {
                return Err(io_err).with_context(|| format!("write {}", dest.display()));
            }
        }
        return Err(e).with_context(|| format!("GET {} failed", url));
    }

    let code = easy.response_code().context("no response code")?;
    if !(200..300).contains(&code) {
        anyhow::bail!("GET {} returned HTTP {}", url, code);
    }

    let expected = easy
        .content_length_download()
        .ok()
        .filter(|n| *n >= 0.0)
        .map(|n| n as u64);
    if let Some(exp) = expected {
        if written != exp {
            anyhow::bail!("partial transfer: wrote {} of {} bytes", written, exp);
        }
    }

    file.sync_all()
        .with_context(|| format!("sync {}", dest.display()))?;
    tracing::debug!(bytes = written, path = %dest.display(), "archive downloaded");
    Ok(written)
}
