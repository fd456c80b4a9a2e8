// Copyright 2026 BadCompany
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

// Command-line front end for lilith-transcript
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;
use tokio::sync::mpsc;
use tracing::{debug, info};

use lilith_transcript::config::{Config, LogFormat};
use lilith_transcript::engine::segmenter::Segmenter;
use lilith_transcript::engine_core::errors::TranscriptError;
use lilith_transcript::engine_core::models::ToolInvocationRecord;
use lilith_transcript::stream::codec::TranscriptCodec;
use lilith_transcript::stream::pipeline::{spawn_transcript_reader, TranscriptEvent};
use lilith_transcript::view;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Keep `[SYSTEM]` directive lines in plain text
    #[arg(long, global = true)]
    no_strip_system: bool,

    /// Keep file upload bodies instead of collapsing them to a citation
    #[arg(long, global = true)]
    no_collapse_uploads: bool,

    /// Leave untagged inline tool JSON visible
    #[arg(long, global = true)]
    keep_inline_json: bool,

    /// Maximum transcript size in bytes
    #[arg(long, global = true)]
    max_bytes: Option<u64>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the segment list of a transcript (file or stdin)
    Segment { file: Option<PathBuf> },
    /// Print the view models of a transcript (file or stdin)
    Render { file: Option<PathBuf> },
    /// Resolve a raw tool invocation payload (file or stdin)
    Resolve { file: Option<PathBuf> },
    /// Stream stdin, printing one snapshot per received chunk
    Follow {
        /// Only print the snapshot of the complete transcript
        #[arg(long)]
        final_only: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    install_panic_hook();

    let mut config = Config::from_env().unwrap_or_else(|e| {
        eprintln!(
            "Warning: Failed to load config from env, using defaults: {}",
            e
        );
        Config::default()
    });

    // CLI flags overlay the environment
    if cli.no_strip_system {
        config.strip_system_directives = false;
    }
    if cli.no_collapse_uploads {
        config.collapse_file_uploads = false;
    }
    if cli.keep_inline_json {
        config.suppress_inline_tool_json = false;
    }
    if let Some(max) = cli.max_bytes {
        config.max_transcript_bytes = max;
    }

    if let Err(e) = init_tracing(&config) {
        eprintln!("Failed to init tracing: {}", e);
    }
    debug!("Effective config: {:?}", config);

    let segmenter = Segmenter::new(config.segmenter_options());

    match cli.command {
        Command::Segment { file } => {
            let text = read_input(file.as_ref(), config.max_transcript_bytes).await?;
            print_json(&segmenter.segment(&text), cli.pretty)?;
        }
        Command::Render { file } => {
            let text = read_input(file.as_ref(), config.max_transcript_bytes).await?;
            print_json(&view::render(&segmenter.segment(&text)), cli.pretty)?;
        }
        Command::Resolve { file } => {
            let payload = read_input(file.as_ref(), config.max_transcript_bytes).await?;
            match ToolInvocationRecord::from_payload(&payload) {
                Ok(record) => print_json(&record, cli.pretty)?,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(2);
                }
            }
        }
        Command::Follow { final_only } => {
            follow(segmenter, config.max_transcript_bytes, final_only, cli.pretty).await?;
        }
    }

    Ok(())
}

async fn follow(segmenter: Segmenter, max_bytes: u64, final_only: bool, pretty: bool) -> Result<()> {
    let (tx, mut rx) = mpsc::channel(64);
    let codec = TranscriptCodec::new(segmenter).with_max_bytes(max_bytes);
    let reader = spawn_transcript_reader(tokio::io::stdin(), codec, tx);
    info!("Following transcript on stdin");

    while let Some(event) = rx.recv().await {
        match event {
            TranscriptEvent::Snapshot(snapshot) => {
                if !final_only {
                    print_json(&snapshot, pretty)?;
                }
            }
            TranscriptEvent::Finished(snapshot) => {
                if final_only {
                    print_json(&snapshot, pretty)?;
                }
                info!("Transcript complete after {} bytes", snapshot.bytes_seen);
                break;
            }
            TranscriptEvent::Error(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }

    reader.await.context("Transcript reader task failed")?;
    Ok(())
}

async fn read_input(file: Option<&PathBuf>, max_bytes: u64) -> Result<String> {
    let bytes = match file {
        Some(path) => tokio::fs::read(path)
            .await
            .map_err(TranscriptError::from)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = Vec::new();
            tokio::io::stdin()
                .read_to_end(&mut buf)
                .await
                .map_err(TranscriptError::from)
                .context("Failed to read stdin")?;
            buf
        }
    };

    if bytes.len() as u64 > max_bytes {
        return Err(TranscriptError::TranscriptTooLarge {
            len: bytes.len() as u64,
            limit: max_bytes,
        }
        .into());
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", out);
    Ok(())
}

fn install_panic_hook() {
    std::panic::set_hook(Box::new(|panic_info| {
        let location = panic_info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_else(|| "unknown location".to_string());
        eprintln!(
            "lilith-transcript panicked at {}: {}",
            location,
            panic_message(panic_info.payload())
        );
    }));
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

fn init_tracing(config: &Config) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("lilith_transcript=debug,info"));

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    match config.log_format {
        LogFormat::Json => subscriber.json().try_init()?,
        _ => subscriber.try_init()?,
    }

    Ok(())
}
