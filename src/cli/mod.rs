//! CLI Module
//!
//! Command-line interface for duovox using Clap v4.

mod commands;

pub use commands::load_config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;
use crate::tts::{AudioFormat, Voice};
use commands::{
    apply_marker_overrides, cmd_config, cmd_generate, cmd_init, cmd_inspect, cmd_logs, cmd_voices,
};

/// duovox - two-voice narration of question/answer PDFs
#[derive(Parser, Debug)]
#[command(name = "duovox")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug mode (creates log files in .duovox/logs/)
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract a PDF and show the text preview and block count
    Inspect {
        /// PDF file to read
        pdf: PathBuf,

        /// Characters of extracted text to show
        #[arg(long, default_value_t = crate::document::DEFAULT_PREVIEW_CHARS)]
        preview_chars: usize,

        /// Also list every question/answer pair found
        #[arg(long)]
        show_pairs: bool,

        #[command(flatten)]
        markers: MarkerArgs,
    },

    /// Narrate a PDF into a single two-voice audio file
    Generate {
        /// PDF file to read
        pdf: PathBuf,

        /// Output file (default: ./entrevista_2vozes.<format>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Voice reading the questions
        #[arg(long, value_enum)]
        question_voice: Option<Voice>,

        /// Voice reading the answers
        #[arg(long, value_enum)]
        answer_voice: Option<Voice>,

        /// Silence after each utterance, in milliseconds
        #[arg(long, value_parser = clap::value_parser!(u64).range(200..=1500))]
        pause_ms: Option<u64>,

        /// Audio format of the output
        #[arg(short, long, value_enum)]
        format: Option<AudioFormat>,

        /// Maximum synthesis requests in flight
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..=16))]
        concurrency: Option<u64>,

        #[command(flatten)]
        markers: MarkerArgs,
    },

    /// List the available voices
    Voices,

    /// Initialize configuration
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,

        /// Write ./duovox.toml instead of the user config file
        #[arg(long)]
        local: bool,
    },

    /// Show configuration
    Config,

    /// Log management operations
    Logs {
        #[command(subcommand)]
        operation: LogCommands,
    },
}

/// Marker word overrides shared by `inspect` and `generate`
#[derive(clap::Args, Debug, Clone, Default)]
pub struct MarkerArgs {
    /// Word that opens a question
    #[arg(long)]
    pub question_marker: Option<String>,

    /// Word that opens an answer
    #[arg(long)]
    pub answer_marker: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum LogCommands {
    /// Show log file location and status
    Status,
    /// View recent log entries (requires debug mode)
    View {
        /// Number of lines to show (default: 50)
        #[arg(short, long, default_value = "50")]
        lines: usize,
    },
    /// Clean up old log files
    Clean {
        /// Maximum age in days (default: 7)
        #[arg(short = 'a', long, default_value = "7")]
        days: u64,
    },
}

/// Main CLI entry point
pub async fn run(cli: Cli, mut config: Config) -> Result<()> {
    if cli.debug {
        tracing::info!("Debug mode enabled");
    }

    match cli.command {
        Commands::Inspect {
            pdf,
            preview_chars,
            show_pairs,
            markers,
        } => {
            apply_marker_overrides(&mut config, &markers)?;
            cmd_inspect(&config, &pdf, preview_chars, show_pairs).await
        }
        Commands::Generate {
            pdf,
            output,
            question_voice,
            answer_voice,
            pause_ms,
            format,
            concurrency,
            markers,
        } => {
            apply_marker_overrides(&mut config, &markers)?;
            let mut settings = config.narration.clone();
            if let Some(voice) = question_voice {
                settings.question_voice = voice;
            }
            if let Some(voice) = answer_voice {
                settings.answer_voice = voice;
            }
            if let Some(pause_ms) = pause_ms {
                settings.pause_ms = pause_ms;
            }
            if let Some(format) = format {
                settings.format = format;
            }
            if let Some(concurrency) = concurrency {
                settings.concurrency = concurrency as usize;
            }
            cmd_generate(&config, &pdf, output, settings).await
        }
        Commands::Voices => cmd_voices(&config),
        Commands::Init { force, local } => cmd_init(force, local),
        Commands::Config => cmd_config(&config, cli.config.as_deref()),
        Commands::Logs { operation } => cmd_logs(operation, &config.logging.log_dir()),
    }
}
