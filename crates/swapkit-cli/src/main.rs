//! Swapkit CLI — drive a face swap, upload a resource, or call the
//! auxiliary worker endpoints.
//!
//! Configuration comes from SWAPKIT_* environment variables with the
//! service contract defaults for anything unset.

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

use swapkit_cli::init_tracing;
use swapkit_client::{ErrorAdvice, SessionStatus, SlotRole, SlotState, SwapClient, SwapError};

#[derive(Parser)]
#[command(name = "swapkit", about = "Face-swap processing service CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Swap a face between two images and print the result URL
    Swap {
        /// Base image whose face is replaced
        target: PathBuf,
        /// Image supplying the face
        source: PathBuf,
        /// Download the result to this path
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Upload a single image and print its resource id
    Upload {
        /// Path to the image
        file: PathBuf,
    },
    /// Remove the watermark from a video URL
    RemoveWatermark {
        /// Video URL
        url: String,
    },
    /// Fetch the transcript of a YouTube video
    Transcript {
        /// YouTube video URL
        url: String,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

/// Render a client failure with its recovery advice.
fn render_failure(err: &SwapError) -> anyhow::Error {
    match err.suggested_action() {
        Some(action) => anyhow::anyhow!("{} ({})", err.client_message(), action),
        None => anyhow::anyhow!("{}", err.client_message()),
    }
}

async fn download(url: &str, path: &PathBuf) -> anyhow::Result<()> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(60))
        .build()
        .context("Failed to create HTTP client")?;

    let response = client
        .get(url)
        .send()
        .await
        .context("Failed to download result")?;
    if !response.status().is_success() {
        anyhow::bail!("Result download failed with status {}", response.status());
    }

    let data = response
        .bytes()
        .await
        .context("Failed to read result data")?;
    tokio::fs::write(path, &data)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    tracing::info!(path = %path.display(), size_bytes = data.len(), "result saved");
    Ok(())
}

async fn run_swap(
    client: &SwapClient,
    target: PathBuf,
    source: PathBuf,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut session = client.session();

    for (role, path) in [(SlotRole::Target, &target), (SlotRole::Source, &source)] {
        session.select_file(role, path).await;
        match session.slot_state(role) {
            SlotState::Ready(no) => {
                tracing::info!(role = %role, resource_no = %no, "image uploaded");
            }
            _ => {
                let err = session
                    .last_error()
                    .map(render_failure)
                    .unwrap_or_else(|| anyhow::anyhow!("{} upload failed", role));
                return Err(err.context(format!("Could not upload the {} image", role)));
            }
        }
    }

    session.execute().await;
    match session.status() {
        SessionStatus::Succeeded(url) => {
            print_json(&serde_json::json!({ "result_url": url }))?;
            if let Some(path) = output {
                download(url, &path).await?;
                println!("Saved to {}", path.display());
            }
            Ok(())
        }
        SessionStatus::Failed(_) => Err(session
            .last_error()
            .map(render_failure)
            .unwrap_or_else(|| anyhow::anyhow!("swap failed"))),
        other => Err(anyhow::anyhow!("unexpected session state: {:?}", other)),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let client = SwapClient::from_env().context("Failed to create swapkit client")?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Swap {
            target,
            source,
            output,
        } => {
            run_swap(&client, target, source, output).await?;
        }
        Commands::Upload { file } => {
            let handle = swapkit_client::hash::read_file(&file)
                .await
                .map_err(|e| render_failure(&e))?;
            let no = client
                .uploader()
                .upload(&handle)
                .await
                .map_err(|e| render_failure(&e))?;
            print_json(&serde_json::json!({ "no": no }))?;
        }
        Commands::RemoveWatermark { url } => {
            let processed = client
                .workers()
                .remove_watermark(&url)
                .await
                .map_err(|e| render_failure(&e))?;
            print_json(&serde_json::json!({ "url": processed }))?;
        }
        Commands::Transcript { url } => {
            let text = client
                .workers()
                .youtube_transcript(&url)
                .await
                .map_err(|e| render_failure(&e))?;
            println!("{}", text);
        }
    }

    Ok(())
}
