//! CLI subcommands: inspect, generate, voices, init, config, logs, and config loading.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::{LogCommands, MarkerArgs};
use crate::config::Config;
use crate::narration::{Assembler, NarrationExport, NarrationSession, NarrationSettings};
use crate::tts::{OpenAiSpeechClient, Voice};
use crate::utils::format_duration_ms;

/// Load configuration from file or defaults
pub async fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config = if let Some(path) = config_path {
        tracing::info!("Loading configuration from custom path: {}", path);
        Config::load_from_path(path)?
    } else {
        tracing::debug!("Loading default configuration");
        Config::load()?
    };

    config.validate()?;

    Ok(config)
}

/// Apply command-line marker overrides and re-check the result.
pub(crate) fn apply_marker_overrides(config: &mut Config, overrides: &MarkerArgs) -> Result<()> {
    if let Some(ref question) = overrides.question_marker {
        config.markers.question = question.clone();
    }
    if let Some(ref answer) = overrides.answer_marker {
        config.markers.answer = answer.clone();
    }
    config.validate()
}

/// Extract a PDF and report what would be narrated
pub(crate) async fn cmd_inspect(
    config: &Config,
    pdf: &Path,
    preview_chars: usize,
    show_pairs: bool,
) -> Result<()> {
    let markers = &config.markers;
    let session = NarrationSession::from_path(pdf, &config.segmenter()?)?;

    println!("📄 {} ({} page(s))\n", pdf.display(), session.page_count());
    println!("{}", session.preview(preview_chars));
    if session.text().chars().count() > preview_chars {
        println!("[...]");
    }
    println!(
        "\n🔎 {} {}/{} blocks found",
        session.pair_count(),
        markers.question,
        markers.answer
    );

    if show_pairs {
        for (i, pair) in session.pairs().iter().enumerate() {
            println!("\n#{}", i + 1);
            println!("  Q: {}", pair.question);
            println!("  A: {}", pair.answer);
        }
    }

    Ok(())
}

/// Narrate a PDF and write the audio file
pub(crate) async fn cmd_generate(
    config: &Config,
    pdf: &Path,
    output: Option<PathBuf>,
    settings: NarrationSettings,
) -> Result<()> {
    let markers = &config.markers;
    let session = NarrationSession::from_path(pdf, &config.segmenter()?)?;

    println!(
        "🔎 {} {}/{} blocks found",
        session.pair_count(),
        markers.question,
        markers.answer
    );
    if session.pair_count() == 0 {
        return Err(crate::error::NarrationError::EmptyInput.into());
    }

    let client = OpenAiSpeechClient::from_config(&config.tts)?;
    tracing::info!("Using TTS model {}", client.model());
    let assembler = Assembler::new(client);

    println!(
        "🎙️  Narrating with {} (questions) and {} (answers), {} ms pauses...",
        settings.question_voice, settings.answer_voice, settings.pause_ms
    );
    let export = session.generate(&assembler, &settings).await?;

    let path = write_export(&export, output).await?;
    println!("✅ Saved {}", path.display());
    println!(
        "   Duration: {}",
        format_duration_ms(export.duration.as_millis() as u64)
    );
    println!("   Type: {}", export.mime_type());

    Ok(())
}

/// Write `export` to `output`, or to its default file name in the current
/// directory.
pub(crate) async fn write_export(
    export: &NarrationExport,
    output: Option<PathBuf>,
) -> Result<PathBuf> {
    let path = output.unwrap_or_else(|| PathBuf::from(export.file_name()));
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }
    tokio::fs::write(&path, &export.bytes)
        .await
        .with_context(|| format!("Failed to write audio file: {}", path.display()))?;
    Ok(path)
}

/// List the available voices
pub(crate) fn cmd_voices(config: &Config) -> Result<()> {
    println!("🗣️  Available voices\n");
    for voice in Voice::ALL {
        let mut roles = Vec::new();
        if voice == config.narration.question_voice {
            roles.push("questions");
        }
        if voice == config.narration.answer_voice {
            roles.push("answers");
        }
        if roles.is_empty() {
            println!("  {}", voice);
        } else {
            println!("  {:<10} (default for {})", voice.as_str(), roles.join(", "));
        }
    }
    Ok(())
}

/// Initialize configuration file
pub(crate) fn cmd_init(force: bool, local: bool) -> Result<()> {
    println!("🎙️  duovox Configuration Initialization\n");

    let config_path = if local {
        Config::local_config_path()
    } else {
        Config::system_config_path().context("Could not determine config directory")?
    };

    if config_path.exists() && !force {
        anyhow::bail!(
            "Configuration file already exists at: {}\nUse --force to overwrite",
            config_path.display()
        );
    }

    Config::default().save(&config_path)?;

    println!("✅ Configuration initialized at: {}", config_path.display());
    println!("\n📝 Next steps:");
    println!("   1. Set the OPENAI_API_KEY environment variable (or add it to .env)");
    println!("   2. Adjust voices and pause under [narration] if you like");
    println!("   3. Run 'duovox generate <PDF>'");

    Ok(())
}

/// Show configuration
pub(crate) fn cmd_config(config: &Config, config_path: Option<&str>) -> Result<()> {
    println!("🎙️  duovox Configuration\n");

    match config_path {
        Some(path) => println!("Config file: {}", path),
        None => {
            if let Some(system) = Config::system_config_path() {
                println!("System config: {}", describe_path(&system));
            }
            println!(
                "Local config: {}",
                describe_path(&Config::local_config_path())
            );
        }
    }

    println!("\nTTS:");
    println!("  Base URL: {}", config.tts.base_url);
    println!("  Model: {}", config.tts.model);
    println!("  Timeout: {}s", config.tts.timeout_secs);
    println!(
        "  API Key: {}",
        if config.has_api_key() {
            "[SET]"
        } else {
            "[NOT SET]"
        }
    );

    let narration = &config.narration;
    println!("\nNarration:");
    println!("  Question voice: {}", narration.question_voice);
    println!("  Answer voice: {}", narration.answer_voice);
    println!("  Pause: {} ms", narration.pause_ms);
    println!("  Format: {}", narration.format);
    println!("  Concurrency: {}", narration.concurrency);
    println!("  Track: {}", narration.track_spec());

    println!("\nMarkers:");
    println!("  Question: {}", config.markers.question);
    println!("  Answer: {}", config.markers.answer);

    println!("\nLog level: {}", config.logging.level);

    Ok(())
}

fn describe_path(path: &Path) -> String {
    if path.exists() {
        path.display().to_string()
    } else {
        format!("{} (not found)", path.display())
    }
}

/// Log management for the log files under `log_dir`
pub(crate) fn cmd_logs(operation: LogCommands, log_dir: &Path) -> Result<()> {
    use crate::logging;
    use std::io::{BufRead, BufReader};

    match operation {
        LogCommands::Status => {
            println!("📊 duovox Logging Status\n");
            let files = logging::list_logs(log_dir)?;

            if files.is_empty() {
                println!("Status: ❌ No logs found in {}", log_dir.display());
                println!("\n💡 To enable debug logging, run with -d flag:");
                println!("   duovox -d generate <PDF>");
                return Ok(());
            }

            let total_size: u64 = files
                .iter()
                .filter_map(|path| std::fs::metadata(path).ok())
                .map(|metadata| metadata.len())
                .sum();

            println!("Status: ✅ Active");
            println!("Log files: {}", files.len());
            println!(
                "Total size: {:.2} MB",
                total_size as f64 / (1024.0 * 1024.0)
            );
            if let Some(newest) = files.last() {
                println!("Latest log: {}", newest.display());
            }

            Ok(())
        }

        LogCommands::View { lines } => {
            let Some(log_path) = logging::get_log_path(log_dir) else {
                println!("❌ No log files found.\n");
                println!("💡 Run duovox with -d flag to enable debug logging:");
                println!("   duovox -d generate <PDF>");
                return Ok(());
            };

            println!(
                "📜 Viewing last {} lines of: {}\n",
                lines,
                log_path.display()
            );

            let file = std::fs::File::open(&log_path)
                .with_context(|| format!("Failed to open {}", log_path.display()))?;
            let all_lines: Vec<String> = BufReader::new(file).lines().map_while(Result::ok).collect();
            let start = all_lines.len().saturating_sub(lines);

            for line in &all_lines[start..] {
                println!("{}", line);
            }
            if all_lines.is_empty() {
                println!("(empty log file)");
            }

            Ok(())
        }

        LogCommands::Clean { days } => {
            println!("🧹 Cleaning up log files older than {} days...\n", days);

            let removed = logging::cleanup_old_logs(log_dir, days)?;
            if removed > 0 {
                println!("✅ Removed {} old log file(s)", removed);
            } else {
                println!("✅ No old log files to remove");
            }

            Ok(())
        }
    }
}
