//! GrabTUI - terminal client for a media indexer / download manager
//!
//! Search for movies and TV shows, review torrent resources ranked by
//! resolution and seeder health, and queue downloads on the backend.
//!
//! # Modules
//!
//! - `models` - Search results, torrent resources, download tasks
//! - `rank` - Resource deduplication, grouping, and recommendation
//! - `api` - Backend API client
//! - `config` - Config file and session persistence
//! - `cli` - Command line interface and output helpers
//! - `commands` - CLI command handlers
//! - `ui` - TUI components
//! - `app` - Application state and navigation

pub mod api;
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod models;
pub mod rank;
pub mod ui;

// Re-export commonly used types
pub use models::{
    DownloadHistoryItem, DownloadStatus, DownloadTask, GroupedResources, MediaDetails,
    ProcessedResources, Resolution, SearchItem, SearchTorrents, TorrentResource,
};

pub use api::{ApiClient, ApiError};
pub use app::{App, AppState};
pub use config::Config;
