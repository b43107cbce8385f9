#![warn(missing_docs)]
//! # design-review binary
//!
//! Command-line front end: each file argument is handed to the page
//! controller as if it had been dropped on the upload widget, and the
//! resulting page view is rendered to stdout.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::Parser;
use design_review_app::{AppConfig, AppError, PageController, app_version};
use design_review_ui::{PageView, ResultView};
use design_review_upload::{UploadedFile, is_accepted_media_type};
use tokio::io::AsyncReadExt;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Upload design images for AI feedback on accessibility, color contrast and
/// design principles.
#[derive(Debug, Parser)]
#[command(name = "design-review", version = design_review_app::APP_VERSION)]
struct Cli {
    /// Design images to analyze, one request each.
    #[arg(required_unless_present = "stdin")]
    files: Vec<PathBuf>,

    /// Service base URL; overrides `DESIGN_REVIEW_BASE_URL`.
    #[arg(long)]
    base_url: Option<String>,

    /// Read one image from stdin instead of file arguments.
    #[arg(long, requires = "media_type", conflicts_with = "files")]
    stdin: bool,

    /// Media type of the stdin image (for example `image/png`).
    #[arg(long)]
    media_type: Option<String>,

    /// Print the page view as JSON instead of text.
    #[arg(long)]
    json: bool,
}

/// CLI entry point.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_tracing();

    match run(Cli::parse()).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            eprintln!("design-review: {error:#}");
            ExitCode::from(2)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Returns `Ok(true)` when every upload produced an analysis.
async fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = match &cli.base_url {
        Some(base_url) => AppConfig::new(base_url.as_str()),
        None => AppConfig::from_env(),
    }
    .context("invalid analysis service configuration")?;
    info!(version = app_version(), base_url = %config.base_url, "design-review starting");

    let uploads = collect_uploads(&cli).await?;
    let controller = PageController::from_config(&config)?;

    let mut all_succeeded = true;
    for upload in &uploads {
        controller.handle_upload(upload).await;
        let view = controller.view();
        all_succeeded &= view.error.is_none();
        render(&upload.name, &view, cli.json)?;
    }

    Ok(all_succeeded)
}

async fn collect_uploads(cli: &Cli) -> anyhow::Result<Vec<UploadedFile>> {
    if cli.stdin {
        let media_type = cli.media_type.clone().unwrap_or_default();
        if !is_accepted_media_type(&media_type) {
            bail!("unsupported media type for stdin image: {media_type}");
        }
        let mut bytes = Vec::new();
        tokio::io::stdin()
            .read_to_end(&mut bytes)
            .await
            .context("failed to read image from stdin")?;
        return Ok(vec![UploadedFile::from_bytes("stdin", media_type, bytes)]);
    }

    cli.files
        .iter()
        .map(|path| UploadedFile::from_path(path).map_err(AppError::from))
        .collect::<Result<Vec<_>, _>>()
        .map_err(Into::into)
}

fn render(name: &str, view: &PageView, as_json: bool) -> anyhow::Result<()> {
    if as_json {
        let analysis = match (&view.error, &view.result) {
            (None, ResultView::Ready(analysis)) => Some(analysis.as_value().clone()),
            _ => None,
        };
        let rendered = serde_json::json!({
            "file": name,
            "error": view.error,
            "analysis": analysis,
        });
        println!("{}", serde_json::to_string(&rendered)?);
        return Ok(());
    }

    println!("== {name}");
    if let Some(error) = &view.error {
        println!("error: {error}");
        return Ok(());
    }
    match &view.result {
        ResultView::Ready(analysis) => println!("{}", analysis.to_pretty_json()?),
        ResultView::Loading => println!("analysis still in progress"),
        ResultView::Empty => println!("no analysis available"),
    }
    Ok(())
}
