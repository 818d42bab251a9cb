//! CLI for ghtar.

mod commands;

use anyhow::Result;
use clap::Parser;
use ghtar_core::config::{self, GhtarConfig};
use ghtar_core::repo_ref::RepoRef;
use ghtar_core::resolver::ResolveError;

use commands::run_fetch;

/// Download a GitHub branch tarball and unpack it into the current directory.
#[derive(Debug, Parser)]
#[command(name = "ghtar", version)]
#[command(about = "Download a GitHub branch tarball and unpack it here", long_about = None)]
pub struct Cli {
    /// Repository to fetch, as OWNER/REPO.
    #[arg(short = 'r', long = "repo", value_name = "OWNER/REPO")]
    pub repo: String,

    /// Branch to archive (default: `default_branch` from config.toml, "master" unless changed).
    #[arg(short = 'b', long = "branch", value_name = "BRANCH")]
    pub branch: Option<String>,
}

pub async fn run_from_args() -> Result<()> {
    let cli = Cli::parse();
    let (cfg, repo) = prepare(&cli, config::load_or_init)?;
    run_fetch(&cfg, repo).await
}

/// Validates `-r`/`-b`, then loads config. A usage error is reported before
/// the config file is read or created.
pub(crate) fn prepare(
    cli: &Cli,
    load_config: impl FnOnce() -> Result<GhtarConfig>,
) -> Result<(GhtarConfig, RepoRef)> {
    let mut repo = RepoRef::parse(&cli.repo, cli.branch.as_deref())?;
    let cfg = load_config()?;
    tracing::debug!("loaded config: {:?}", cfg);

    let explicit_branch = cli.branch.as_deref().is_some_and(|b| !b.trim().is_empty());
    let default_branch = cfg.default_branch.trim();
    if !explicit_branch && !default_branch.is_empty() {
        repo.branch = default_branch.to_string();
    }
    Ok((cfg, repo))
}

/// One-line diagnostic for a failed run. A rate limit is reported on its
/// own, without the surrounding context, so the advice to retry stands out.
pub fn describe_error(err: &anyhow::Error) -> String {
    let rate_limited = err
        .chain()
        .filter_map(|cause| cause.downcast_ref::<ResolveError>())
        .find(|e| e.is_rate_limited());
    let msg = match rate_limited {
        Some(e) => e.to_string(),
        None => format!("{:#}", err),
    };
    one_line(&msg)
}

fn one_line(msg: &str) -> String {
    msg.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests;
