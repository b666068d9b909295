//! Command-line interface definitions and parsing.

use crate::output::OutputFormat;
use clap::Parser;
use std::path::PathBuf;

/// fraglog - Far Cry server log frag timeline
#[derive(Parser, Debug)]
#[command(name = "fraglog")]
#[command(about = "fraglog - Rebuild frag timelines, session windows and streaks from Far Cry server logs", version)]
#[command(long_about = "Parses Far Cry dedicated server logs and rebuilds an absolute timeline of frags:
• Absolute timestamps from <MM:SS> markers, with hour rollover detection
• Session start/end, game mode and map
• Longest kill and death streaks per player
• Output as summary, emoji feed, CSV or JSON; optional SQLite persistence

Several logs are processed in parallel; a log that fails to parse is reported and skipped.")]
pub struct Args {
    /// Log files to parse
    #[arg(required = true)]
    pub log_files: Vec<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,

    /// Output file (use "-" for stdout, default: stdout)
    #[arg(long)]
    pub output: Option<String>,

    /// SQLite database to store matches and frags in
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Number of logs parsed in parallel (default: one per CPU)
    #[arg(long)]
    pub jobs: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

/// Parsed and validated CLI configuration
#[derive(Debug)]
pub struct Config {
    pub log_files: Vec<PathBuf>,
    pub format: OutputFormat,
    pub output: Option<String>,
    pub db_path: Option<PathBuf>,
    pub jobs: Option<usize>,
    pub log_level: log::LevelFilter,
}

impl Config {
    /// Parse and validate CLI arguments into a configuration
    pub fn from_args(args: Args) -> crate::error::Result<Self> {
        if args.log_files.is_empty() {
            return Err(crate::error::Error::InvalidInput("At least one log file is required".to_string()));
        }

        if let Some(missing) = args.log_files.iter().find(|path| !path.is_file()) {
            return Err(crate::error::Error::InvalidInput(format!(
                "Log file not found: {}",
                missing.display()
            )));
        }

        if args.jobs == Some(0) {
            return Err(crate::error::Error::InvalidInput("--jobs must be at least 1".to_string()));
        }

        let log_level = args.log_level.parse::<log::LevelFilter>().map_err(|_| {
            crate::error::Error::InvalidInput(format!(
                "Invalid log level '{}'. Use trace, debug, info, warn or error",
                args.log_level
            ))
        })?;

        Ok(Config {
            log_files: args.log_files,
            format: args.format,
            output: args.output,
            db_path: args.db,
            jobs: args.jobs,
            log_level,
        })
    }
}
