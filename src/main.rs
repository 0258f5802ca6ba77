//! CI entry point for the revue agent.
//!
//! Reads the runner environment, resolves the configuration preset and
//! reviews the pull request checked out in the working directory.

use anyhow::{Context, Result};
use clap::Parser;

use revue::application::run_review;
use revue::config::resolve_config;
use revue::infra::context::RunContext;
use revue::infra::github::GitHubClient;

#[derive(Parser, Debug)]
#[command(name = "revue")]
#[command(version)]
#[command(about = "Automated pull request review agent", long_about = None)]
struct Args {
    /// Configuration preset (default, web_app, api, data_science)
    #[arg(long, default_value = "default")]
    project_type: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let context = RunContext::from_env().context("read CI environment")?;
    let config = resolve_config(&args.project_type);
    let github = GitHubClient::new(context.github_token.clone(), context.repository.clone())
        .context("build GitHub client")?;

    run_review(&context, &config, &github).await;
    Ok(())
}
