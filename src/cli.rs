//! CLI - Command Line Interface for GrabTUI
//!
//! Designed for automation and scripting against the backend.
//! Every TUI action is scriptable. All output is JSON-parseable.
//!
//! # Examples
//!
//! ```bash
//! # Search for content
//! grabtui search "dune" --json
//!
//! # Rank resources and queue the best one
//! grabtui resources "dune part two"
//! grabtui recommend "dune part two"
//! grabtui download 48151
//!
//! # Queue management
//! grabtui downloads --watch
//! grabtui pause dl-3
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;

use crate::models::Resolution;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments
    InvalidArgs = 2,
    /// Network error
    NetworkError = 3,
    /// Login required or session expired
    AuthRequired = 4,
    /// No resources found
    NoResources = 5,
    /// Download action failed
    DownloadFailed = 6,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// GrabTUI - terminal client for a media indexer / download manager
///
/// Run without arguments to launch interactive TUI.
/// Use subcommands for scriptable automation.
#[derive(Parser, Debug)]
#[command(
    name = "grabtui",
    version,
    about = "Terminal client for searching and downloading movies and TV shows",
    long_about = "A terminal interface for a media indexer / download manager \
                  backend.\n\n\
                  Run without arguments to launch the interactive TUI.\n\
                  Use subcommands for automation and scripting.",
    after_help = "EXAMPLES:\n\
                  grabtui                         Launch interactive TUI\n\
                  grabtui search \"dune\"           Search for content\n\
                  grabtui resources \"dune\" --json Ranked torrent resources\n\
                  grabtui downloads --watch       Follow the download queue"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Backend server URL (overrides config)
    #[arg(long, short = 's', global = true)]
    pub server: Option<String>,

    /// Subcommand to run (omit for TUI mode)
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Check if running in CLI mode (has subcommand)
    pub fn is_cli_mode(&self) -> bool {
        self.command.is_some()
    }

    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in to the backend and store the session token
    Login(LoginCmd),

    /// Search for movies and TV shows
    #[command(visible_alias = "s")]
    Search(SearchCmd),

    /// Get details for a movie or show
    #[command(visible_alias = "i")]
    Info(InfoCmd),

    /// List torrent resources for a keyword, deduplicated and grouped
    #[command(visible_alias = "res")]
    Resources(ResourcesCmd),

    /// Show the single recommended resource for a keyword
    #[command(visible_alias = "rec")]
    Recommend(RecommendCmd),

    /// Queue a download for a resource by id
    #[command(visible_alias = "dl")]
    Download(DownloadCmd),

    /// Show the active download queue
    Downloads(DownloadsCmd),

    /// Show download history
    #[command(visible_alias = "hist")]
    History(HistoryCmd),

    /// Resume a paused download
    Resume(ResumeCmd),

    /// Pause an active download
    Pause(PauseCmd),

    /// Remove a download from the queue
    #[command(visible_alias = "rm")]
    Remove(RemoveCmd),
}

// =============================================================================
// Auth & Search Commands
// =============================================================================

/// Log in and persist the session token to the config file
#[derive(Args, Debug)]
pub struct LoginCmd {
    /// Backend account username
    #[arg(required = true)]
    pub username: String,

    /// Backend account password
    #[arg(required = true)]
    pub password: String,
}

/// Search for movies and TV shows by keyword
#[derive(Args, Debug)]
pub struct SearchCmd {
    /// Search keyword (title)
    #[arg(required = true)]
    pub keyword: String,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,
}

/// Get detailed information about a movie or TV show
#[derive(Args, Debug)]
pub struct InfoCmd {
    /// TMDB ID
    #[arg(required = true)]
    pub tmdbid: i64,

    /// Media type as the backend reports it (MOV or TV)
    #[arg(long, short = 't', default_value = "MOV")]
    pub media_type: String,
}

// =============================================================================
// Resource Commands
// =============================================================================

/// List torrent resources for a keyword, deduplicated and grouped by
/// resolution with seeded releases preferred
#[derive(Args, Debug)]
pub struct ResourcesCmd {
    /// Search keyword (usually the media title)
    #[arg(required = true)]
    pub keyword: String,

    /// Print a flat list instead of resolution buckets
    #[arg(long)]
    pub flat: bool,

    /// Only show one resolution bucket
    #[arg(long, short = 'b', value_enum)]
    pub bucket: Option<BucketFilter>,
}

/// Resolution bucket filter
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketFilter {
    /// 4K / 2160p / UHD
    #[value(name = "4k", alias = "2160p")]
    FourK,
    /// 2K / 1440p
    #[value(name = "2k", alias = "1440p")]
    TwoK,
    /// 1080p Full HD
    #[value(name = "1080p")]
    FullHd,
    /// Everything else
    Other,
}

impl BucketFilter {
    pub fn resolution(&self) -> Resolution {
        match self {
            BucketFilter::FourK => Resolution::FourK,
            BucketFilter::TwoK => Resolution::TwoK,
            BucketFilter::FullHd => Resolution::FullHd,
            BucketFilter::Other => Resolution::Other,
        }
    }
}

/// Show the recommended resource for a keyword
#[derive(Args, Debug)]
pub struct RecommendCmd {
    /// Search keyword (usually the media title)
    #[arg(required = true)]
    pub keyword: String,
}

// =============================================================================
// Download Commands
// =============================================================================

/// Queue a download for a torrent resource
#[derive(Args, Debug)]
pub struct DownloadCmd {
    /// Resource ID from `resources` or `recommend` output
    #[arg(required = true)]
    pub id: i64,
}

/// Show the active download queue
#[derive(Args, Debug)]
pub struct DownloadsCmd {
    /// Watch mode: refresh continuously while anything is active
    #[arg(long, short = 'w')]
    pub watch: bool,

    /// Refresh interval in seconds (for watch mode)
    #[arg(long, short = 'i', default_value = "3")]
    pub interval: u64,
}

/// Show download history
#[derive(Args, Debug)]
pub struct HistoryCmd {
    /// Page number
    #[arg(long, short = 'p', default_value = "1")]
    pub page: u32,
}

/// Resume a paused download
#[derive(Args, Debug)]
pub struct ResumeCmd {
    /// Download ID from `downloads` output
    #[arg(required = true)]
    pub id: String,
}

/// Pause an active download
#[derive(Args, Debug)]
pub struct PauseCmd {
    /// Download ID from `downloads` output
    #[arg(required = true)]
    pub id: String,
}

/// Remove a download from the queue
#[derive(Args, Debug)]
pub struct RemoveCmd {
    /// Download ID from `downloads` output
    #[arg(required = true)]
    pub id: String,
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

/// Status OK response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusOk {
    pub status: &'static str,
}

impl Default for StatusOk {
    fn default() -> Self {
        Self { status: "ok" }
    }
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data
    pub fn print<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        if self.json {
            let output = JsonOutput::success(data);
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            // For non-JSON, caller should handle formatting
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Ok(())
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }

    /// Print a plain line (suppressed in quiet mode, skipped in JSON mode)
    pub fn line(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            println!("{}", msg);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
