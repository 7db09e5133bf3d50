use std::io::{self, Write};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use issue_batch_core::auth::GhCliProvider;
use issue_batch_core::batch::{BatchOptions, BatchReport};
use issue_batch_core::config::ImportConfig;
use issue_batch_core::github::GithubClient;
use issue_batch_core::import::{import, ImportPlan};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Create the planned task issues and their parent issue on GitHub"
)]
struct Cli {
    /// Target repository (owner/name)
    #[arg(long)]
    repo: Option<String>,
    /// GitHub REST API base URL
    #[arg(long = "api-url")]
    api_url: Option<String>,
    /// Label applied to every created issue
    #[arg(long)]
    label: Option<String>,
    /// Pause after each task submission, in milliseconds
    #[arg(long = "delay-ms")]
    delay_ms: Option<u64>,
    /// Print the planned issues without authenticating or creating anything
    #[arg(long)]
    dry_run: bool,
    /// Exit with a failure status if any issue could not be created
    #[arg(long)]
    strict: bool,
    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("issue_batch=debug,issue_batch_core=debug,warn")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = build_config(&cli)?;
    debug!(
        repo = %config.repo,
        api_base = %config.api_base,
        label = %config.label,
        "resolved configuration"
    );
    let plan = ImportPlan::default();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.dry_run {
        render_plan(&config, &plan, &mut out)?;
        return Ok(ExitCode::SUCCESS);
    }

    let provider = GhCliProvider::new().with_timeout(config.helper_timeout);
    let report = import(
        &provider,
        |token| GithubClient::new(&token, &config),
        &plan,
        BatchOptions::from_config(&config),
        &mut out,
    )
    .await?;

    if fails_run(&report, cli.strict) {
        report_failures(&report);
    }
    Ok(exit_code(&report, cli.strict))
}

/// Partial failure still completes the run; only `--strict` turns it into a failure status.
fn exit_code(report: &BatchReport, strict: bool) -> ExitCode {
    if fails_run(report, strict) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn fails_run(report: &BatchReport, strict: bool) -> bool {
    strict && report.has_failures()
}

fn report_failures(report: &BatchReport) {
    let failed = report
        .failed()
        .map(|task| task.key.as_str())
        .collect::<Vec<_>>();
    if !failed.is_empty() {
        eprintln!("Failed tasks: {}", failed.join(", "));
    }
    if report.parent.as_ref().is_some_and(|p| !p.is_created()) {
        eprintln!("Parent issue was not created.");
    }
}

fn build_config(cli: &Cli) -> Result<ImportConfig> {
    let mut config = ImportConfig::with_defaults();
    if let Some(repo) = &cli.repo {
        config = config.with_repo(repo).context("invalid --repo")?;
    }
    if let Some(api_url) = &cli.api_url {
        config = config.with_api_base(api_url).context("invalid --api-url")?;
    }
    if let Some(label) = &cli.label {
        config = config.with_label(label).context("invalid --label")?;
    }
    if let Some(delay_ms) = cli.delay_ms {
        config = config.with_submit_delay(Duration::from_millis(delay_ms));
    }
    Ok(config)
}

fn render_plan<W: Write>(config: &ImportConfig, plan: &ImportPlan, out: &mut W) -> io::Result<()> {
    writeln!(out, "Repository: {}", config.repo)?;
    writeln!(out, "Label     : {}", config.label)?;
    writeln!(out, "Delay     : {} ms", config.submit_delay.as_millis())?;
    writeln!(out)?;
    writeln!(out, "{:<8} {}", "KEY", "TITLE")?;
    writeln!(out, "{}", "-".repeat(72))?;
    for task in &plan.tasks {
        writeln!(out, "{:<8} {}", task.key(), task.title)?;
    }
    if let Some(parent) = &plan.parent {
        writeln!(out)?;
        writeln!(out, "Parent: {}", parent.title)?;
        for line in parent.body().lines() {
            writeln!(out, "  {line}")?;
        }
    }
    writeln!(out)?;
    writeln!(out, "{} tasks planned (dry run, nothing submitted)", plan.tasks.len())?;
    Ok(())
}
