//! CLI for Fleet bundle discovery.
//!
//! Shallow-clones each given repository, lists its Fleet bundle paths with
//! their `dependsOn` edges, and prints one JSON report to stdout.

use clap::Parser;
use fleet_discovery::{
    load_config, sanitize_url, ConfigError, CredentialsInput, DebugSnapshot, DiscoveryRequest,
    DiscoveryResult, DiscoveryService, ErrorBody,
};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Fleet Discovery - Find Fleet bundle paths and their dependencies in Git repositories.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// HTTPS URLs of the repositories to scan.
    #[arg(required = true)]
    repos: Vec<String>,

    /// Branch to clone. Defaults to each remote's default branch.
    #[arg(long)]
    branch: Option<String>,

    /// Username for private repositories.
    #[arg(long)]
    username: Option<String>,

    /// Password or token for private repositories.
    #[arg(long, env = "FLEET_DISCOVERY_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Name of the secret the credentials came from, for the debug log.
    #[arg(long)]
    secret_name: Option<String>,

    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum concurrent discoveries.
    #[arg(long, default_value_t = 4)]
    concurrency: usize,

    /// Include the debug log in the report.
    #[arg(long)]
    show_debug_log: bool,
}

/// Failures that abort the whole run.
#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Full output of one run.
#[derive(Debug, Serialize)]
struct Report {
    repositories: Vec<RepositoryReport>,

    #[serde(skip_serializing_if = "Option::is_none")]
    debug: Option<DebugSnapshot>,
}

impl Report {
    fn has_failures(&self) -> bool {
        self.repositories
            .iter()
            .any(|r| matches!(r.outcome, Outcome::Failure { .. }))
    }
}

/// Outcome for a single repository.
#[derive(Debug, Serialize)]
struct RepositoryReport {
    /// Repository URL with any userinfo masked.
    repo: String,

    #[serde(flatten)]
    outcome: Outcome,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Outcome {
    Success { result: DiscoveryResult },
    Failure { status: u16, error: ErrorBody },
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let args = Args::parse();

    match run(args).await {
        Ok(report) if report.has_failures() => ExitCode::from(1),
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(2)
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Logs go to stderr in compact form so stdout carries only the report.
/// `RUST_LOG` selects the level and defaults to "info".
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Main execution logic.
async fn run(args: Args) -> Result<Report, CliError> {
    let config = load_config(args.config.as_deref())?;
    let service = DiscoveryService::new(config);
    let template = base_request(&args);

    info!(
        repositories = args.repos.len(),
        concurrency = args.concurrency,
        "Starting discovery"
    );

    let mut outcomes: Vec<(usize, RepositoryReport)> = stream::iter(args.repos.iter().enumerate())
        .map(|(index, repo)| {
            let request = DiscoveryRequest {
                repo: repo.clone(),
                ..template.clone()
            };
            let service = &service;
            async move { (index, discover_one(service, &request).await) }
        })
        .buffer_unordered(args.concurrency.max(1))
        .collect()
        .await;
    outcomes.sort_by_key(|(index, _)| *index);

    let report = Report {
        repositories: outcomes.into_iter().map(|(_, report)| report).collect(),
        debug: args.show_debug_log.then(|| service.debug_snapshot()),
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(report)
}

/// Builds the request fields shared by every repository.
fn base_request(args: &Args) -> DiscoveryRequest {
    let credentials = (args.username.is_some() || args.password.is_some()).then(|| {
        CredentialsInput {
            username: args.username.clone(),
            password: args.password.clone(),
        }
    });

    DiscoveryRequest {
        repo: String::new(),
        branch: args.branch.clone(),
        credentials,
        secret_name: args.secret_name.clone(),
    }
}

async fn discover_one(service: &DiscoveryService, request: &DiscoveryRequest) -> RepositoryReport {
    let repo = sanitize_url(&request.repo);
    let outcome = match service.discover(request).await {
        Ok(result) => {
            info!(repo = %repo, paths = result.paths.len(), "Discovery complete");
            Outcome::Success { result }
        }
        Err(e) => {
            error!(repo = %repo, error = %e, "Discovery failed");
            Outcome::Failure {
                status: e.http_status(),
                error: e.to_body(),
            }
        }
    };

    RepositoryReport { repo, outcome }
}
