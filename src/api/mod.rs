//! Backend API client
//!
//! - client: shared HTTP plumbing, envelope decoding, error mapping
//! - search: keyword search, torrent search, media details
//! - download: download queue management and history

pub mod client;
pub mod download;
pub mod search;

pub use client::{ApiClient, ApiError};
