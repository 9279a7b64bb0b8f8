// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, debug, warn};
use std::io::Write;
use std::path::Path;

use yttranscript::app_config::{Config, LogLevel};
use yttranscript::transcript::format_timestamp;
use yttranscript::{Transcript, TranscriptService, language_utils, transcript::seconds_to_ms};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

/// Rendering of a fetched transcript
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Full transcript as JSON
    Json,
    /// One `[start] text` line per segment
    Segments,
    /// Plain text without timing
    Text,
    /// SubRip
    Srt,
    /// WebVTT
    Vtt,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch the transcript of a video
    Fetch {
        /// Video identifier or URL
        #[arg(value_name = "VIDEO")]
        video: String,

        /// Preferred language, may be repeated (overrides the config)
        #[arg(short = 'L', long = "lang", value_name = "CODE")]
        languages: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "segments")]
        output: OutputFormat,
    },

    /// List the caption tracks of a video
    Tracks {
        /// Video identifier or URL
        #[arg(value_name = "VIDEO")]
        video: String,
    },

    /// Generate shell completions for yttranscript
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// yttranscript - fetch YouTube transcripts
///
/// Retrieves the captions of a video, picks a track by language preference
/// and prints the normalized transcript.
#[derive(Parser, Debug)]
#[command(name = "yttranscript")]
#[command(version)]
#[command(about = "Fetch YouTube video transcripts")]
#[command(long_about = "yttranscript retrieves the caption tracks of a video and prints its transcript.

EXAMPLES:
    yttranscript fetch dQw4w9WgXcQ                       # Transcript in the configured language
    yttranscript fetch -L fr -L en dQw4w9WgXcQ           # Prefer French, then English
    yttranscript fetch -o srt https://youtu.be/dQw4w9WgXcQ > out.srt
    yttranscript tracks dQw4w9WgXcQ                      # List available caption tracks
    yttranscript completions bash > yttranscript.bash    # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long = "config", default_value = "conf.json", global = true, env = "YTTRANSCRIPT_CONFIG")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji and ANSI color for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌ ", "1;31"),
            Level::Warn => ("🚧 ", "1;33"),
            Level::Info => (" ", "1;32"),
            Level::Debug => ("🔍 ", "1;36"),
            Level::Trace => ("📋 ", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (emoji, color) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\x1B[{}m{} {} {}\x1B[0m", color, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Everything is allowed through here; the effective level is set below
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "yttranscript", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli.config_path, cli.log_level.clone())?;
    log::set_max_level(config.log_level.to_level_filter());

    let service = TranscriptService::new(config)?;

    match cli.command {
        Commands::Fetch { video, languages, output } => {
            let transcript = service
                .get_transcript_with_languages(&video, &languages)
                .await
                .with_context(|| format!("Failed to fetch transcript for '{}'", video))?;
            print_transcript(&transcript, output)?;
        }
        Commands::Tracks { video } => {
            let tracks = service
                .list_tracks(&video)
                .await
                .with_context(|| format!("Failed to list caption tracks for '{}'", video))?;

            for track in tracks {
                let language = language_utils::get_language_name(&track.language_code)
                    .unwrap_or_else(|_| "unknown".to_string());
                println!("{:<10} {:<7} {:<20} {}", track.language_code, track.kind_label(), language, track.name);
            }
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}

/// Load the config file, creating a default one when missing
fn load_config(config_path: &str, log_level: Option<CliLogLevel>) -> Result<Config> {
    let mut config = if Path::new(config_path).exists() {
        Config::from_file(config_path)?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);
        let config = Config::default();
        config.save(config_path)?;
        config
    };

    if let Some(level) = log_level {
        config.log_level = level.into();
    }

    config.validate().context("Configuration validation failed")?;
    debug!("Loaded configuration from {}", config_path);

    Ok(config)
}

fn print_transcript(transcript: &Transcript, output: OutputFormat) -> Result<()> {
    let mut stdout = std::io::stdout().lock();

    match output {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(transcript).context("Failed to serialize transcript")?;
            writeln!(stdout, "{}", json)?;
        }
        OutputFormat::Segments => {
            for segment in &transcript.segments {
                writeln!(stdout, "[{}] {}", format_timestamp(seconds_to_ms(segment.start), '.'), segment.text)?;
            }
        }
        OutputFormat::Text => writeln!(stdout, "{}", transcript.plain_text())?,
        OutputFormat::Srt => write!(stdout, "{}", transcript.to_srt())?,
        OutputFormat::Vtt => write!(stdout, "{}", transcript.to_vtt())?,
    }

    Ok(())
}
