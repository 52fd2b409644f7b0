//! Reelcaps CLI: upload a video, render styled subtitles, save the result.
//!
//! Set REELCAPS_API_URL and REELCAPS_API_TOKEN (or REELCAPS_AUTH_MODE=none).

use anyhow::Context;
use clap::{Parser, Subcommand};
use reelcaps_cli::{font_entries, format_size, init_tracing, StyleArgs};
use reelcaps_core::{ClientConfig, VideoFile};
use reelcaps_session::{Outcome, SessionOrchestrator};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How long to wait for the cleanup request before exiting.
const CLEANUP_GRACE: Duration = Duration::from_secs(5);

#[derive(Parser)]
#[command(name = "reelcaps", about = "Subtitle rendering client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the font files the renderer accepts
    Fonts,
    /// Upload a video and save the server's preview
    Preview {
        /// Path to the video to upload
        video: PathBuf,
        /// Where to write the preview
        #[arg(long, short)]
        output: PathBuf,
    },
    /// Upload a video, render subtitles with the given style and save it
    Render {
        /// Path to the video to upload
        video: PathBuf,
        #[command(flatten)]
        style: StyleArgs,
        /// Where to write the rendered video
        #[arg(long, short)]
        output: PathBuf,
        /// Also write the subtitles (SRT) returned by the renderer
        #[arg(long)]
        subtitles: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct Summary {
    session_id: Option<String>,
    output: String,
    size: String,
    subtitle_cues: Option<usize>,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

async fn upload(orchestrator: &mut SessionOrchestrator, video: &Path) -> anyhow::Result<()> {
    let file = VideoFile::from_path(video)
        .await
        .with_context(|| format!("Failed to read video: {}", video.display()))?;
    tracing::info!(file = %video.display(), size = %format_size(file.size()), "Uploading");

    match orchestrator.select_file(file).await? {
        Outcome::Applied => Ok(()),
        Outcome::Ignored(reason) => Err(anyhow::anyhow!("Upload not started: {:?}", reason)),
    }
}

async fn save_displayed(orchestrator: &SessionOrchestrator, output: &Path) -> anyhow::Result<u64> {
    let blob = orchestrator
        .displayed_blob()
        .context("No video available to save")?;
    tokio::fs::write(output, &blob.bytes)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;
    Ok(blob.len() as u64)
}

fn summary(orchestrator: &SessionOrchestrator, output: &Path, size: u64) -> Summary {
    Summary {
        session_id: orchestrator
            .session()
            .session_id
            .as_ref()
            .map(|id| id.to_string()),
        output: output.display().to_string(),
        size: format_size(size),
        subtitle_cues: orchestrator.subtitles().map(|s| s.cues().len()),
    }
}

async fn run(orchestrator: &mut SessionOrchestrator, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Fonts => print_json(&font_entries())?,
        Commands::Preview { video, output } => {
            upload(orchestrator, &video).await?;
            let size = save_displayed(orchestrator, &output).await?;
            print_json(&summary(orchestrator, &output, size))?;
        }
        Commands::Render {
            video,
            style,
            output,
            subtitles,
        } => {
            upload(orchestrator, &video).await?;

            let store = orchestrator
                .style_mut()
                .context("Style is not editable without a session")?;
            style.apply(store);

            match orchestrator.submit().await? {
                Outcome::Applied => {}
                Outcome::Ignored(reason) => {
                    return Err(anyhow::anyhow!("Render not started: {:?}", reason))
                }
            }

            let size = save_displayed(orchestrator, &output).await?;

            if let Some(path) = subtitles {
                let track = orchestrator
                    .subtitles()
                    .context("Renderer returned no subtitles")?;
                tokio::fs::write(&path, track.raw())
                    .await
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }

            print_json(&summary(orchestrator, &output, size))?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    if let Commands::Fonts = cli.command {
        return print_json(&font_entries());
    }

    let config = ClientConfig::from_env().context(
        "Failed to load configuration. Set REELCAPS_API_URL and REELCAPS_API_TOKEN",
    )?;
    let mut orchestrator =
        SessionOrchestrator::from_config(&config).context("Failed to create API client")?;

    let mut states = orchestrator.subscribe();
    tokio::spawn(async move {
        while states.changed().await.is_ok() {
            let state = *states.borrow();
            if state.is_busy() {
                tracing::info!(state = %state, "Processing...");
            }
        }
    });

    let result = run(&mut orchestrator, cli.command).await;

    if let Some(cleanup) = orchestrator.teardown() {
        if tokio::time::timeout(CLEANUP_GRACE, cleanup).await.is_err() {
            tracing::warn!("Session cleanup still pending at exit");
        }
    }

    result
}
