//! `ghtar -r owner/repo [-b branch]`: resolve, download, unpack, clean up.

use anyhow::{Context, Result};
use ghtar_core::config::GhtarConfig;
use ghtar_core::downloader::DownloadOptions;
use ghtar_core::fetch;
use ghtar_core::repo_ref::RepoRef;
use ghtar_core::resolver::{ArchiveLinkResolver, GitHubResolver};
use ghtar_core::spinner::Spinner;

pub async fn run_fetch(cfg: &GhtarConfig, repo: RepoRef) -> Result<()> {
    let resolver = GitHubResolver::from_config(cfg)?;
    fetch_with(cfg, repo, resolver).await
}

pub(crate) async fn fetch_with<R>(cfg: &GhtarConfig, repo: RepoRef, resolver: R) -> Result<()>
where
    R: ArchiveLinkResolver + Send + 'static,
{
    let workdir = std::env::current_dir().context("determine current directory")?;

    let lookup = repo.clone();
    let link = tokio::task::spawn_blocking(move || resolver.archive_link(&lookup))
        .await
        .context("archive link task failed")??;
    let Some(url) = link else {
        anyhow::bail!("no URL found for {:?}", repo.slug());
    };

    println!("downloading from {url}");
    tracing::info!(repo = %repo, %url, "archive link resolved");

    let archive = workdir.join(repo.archive_filename());
    let opts = DownloadOptions::from_config(cfg);
    let spinner = Spinner::start(cfg.spinner_interval());
    let outcome = tokio::task::spawn_blocking(move || {
        fetch::download_and_extract(&url, &archive, &workdir, &opts)
    })
    .await;
    spinner.stop().await;

    let summary = outcome.context("download task failed")??;
    tracing::info!(
        repo = %repo,
        directories = summary.directories,
        files = summary.files,
        skipped = summary.skipped,
        "unpacked"
    );
    println!();
    Ok(())
}
