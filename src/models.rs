//! Data structures and types for GrabTUI
//!
//! Contains all shared models used across the application organized by domain:
//! - **Search**: keyword search results and media details
//! - **Resources**: torrent resources, resolution buckets, grouped output
//! - **Downloads**: download tasks, history, and lifecycle status

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Search Models
// =============================================================================

/// A single entry from the backend keyword search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchItem {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub year: Option<String>,
    /// Display type, e.g. "电影" / "Movie" / "TV"
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub media_type: String,
    #[serde(default)]
    pub vote: f64,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub poster: String,
}

impl SearchItem {
    /// Whether the backend classified this item as a TV show
    pub fn is_tv(&self) -> bool {
        self.media_type.eq_ignore_ascii_case("tv")
    }
}

impl fmt::Display for SearchItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let year = self
            .year
            .as_deref()
            .filter(|y| !y.is_empty())
            .map(|y| format!(" ({})", y))
            .unwrap_or_default();
        write!(f, "{}{} [{}]", self.title, year, self.media_type)
    }
}

/// Detailed media information from the backend
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaDetails {
    #[serde(default)]
    pub tmdbid: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub vote: f64,
    #[serde(default)]
    pub genres: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub runtime: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub link: String,
}

impl fmt::Display for MediaDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) - ★ {:.1}", self.title, self.year, self.vote)
    }
}

// =============================================================================
// Resource Models
// =============================================================================

/// A torrent resource as reported by a backend indexer site.
///
/// `id` is only unique per site listing; the same underlying release can
/// appear multiple times across sites and is merged by a normalized-name
/// heuristic (see `rank::dedup_resources`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TorrentResource {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub seeders: i64,
    #[serde(default)]
    pub site: String,
    #[serde(default)]
    pub torrent_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub enclosure: String,
    #[serde(default)]
    pub pageurl: String,
    /// Human-readable size, e.g. "7.26G"
    #[serde(default)]
    pub size: String,
    /// Resolution tag, e.g. "2160p", "1080p", "UHD", or free-form
    #[serde(default)]
    pub respix: String,
    #[serde(default)]
    pub restype: String,
    #[serde(default)]
    pub reseffect: String,
    #[serde(default)]
    pub releasegroup: String,
    #[serde(default)]
    pub video_encode: String,
    #[serde(default)]
    pub labels: Vec<String>,
}

impl TorrentResource {
    /// Resolution bucket for this resource; empty tags fall into `Other`
    pub fn resolution(&self) -> Resolution {
        Resolution::from_tag(&self.respix)
    }

    /// Whether a release group is present (non-empty after trimming)
    pub fn has_release_group(&self) -> bool {
        !self.releasegroup.trim().is_empty()
    }
}

impl fmt::Display for TorrentResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {} ⇡{} @{}",
            self.resolution(),
            self.torrent_name,
            self.size,
            self.seeders,
            self.site
        )
    }
}

/// Resolution bucket classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Resolution {
    FourK,
    TwoK,
    FullHd,
    #[default]
    Other,
}

impl Resolution {
    /// Classify a resolution tag by case-insensitive substring matching.
    ///
    /// An absent/empty tag is treated as "other".
    pub fn from_tag(tag: &str) -> Self {
        let tag = if tag.trim().is_empty() {
            "other".to_string()
        } else {
            tag.to_lowercase()
        };

        if tag.contains("2160p") || tag.contains("4k") || tag.contains("uhd") {
            Resolution::FourK
        } else if tag.contains("1440p") || tag.contains("2k") {
            Resolution::TwoK
        } else if tag.contains("1080p") {
            Resolution::FullHd
        } else {
            Resolution::Other
        }
    }

    /// Priority score for recommendation sorting (higher = better)
    pub fn priority(&self) -> u8 {
        match self {
            Resolution::FourK => 4,
            Resolution::FullHd => 3,
            Resolution::TwoK => 2,
            Resolution::Other => 1,
        }
    }

    /// All buckets in display order (best first)
    pub fn all() -> [Resolution; 4] {
        [
            Resolution::FourK,
            Resolution::TwoK,
            Resolution::FullHd,
            Resolution::Other,
        ]
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::FourK => write!(f, "4k"),
            Resolution::TwoK => write!(f, "2k"),
            Resolution::FullHd => write!(f, "1080p"),
            Resolution::Other => write!(f, "other"),
        }
    }
}

impl Ord for Resolution {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.priority().cmp(&other.priority())
    }
}

impl PartialOrd for Resolution {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Deduplicated resources bucketed by resolution, input order preserved
#[derive(Debug, Clone, Default, Serialize)]
pub struct GroupedResources {
    #[serde(rename = "4k")]
    pub four_k: Vec<TorrentResource>,
    #[serde(rename = "2k")]
    pub two_k: Vec<TorrentResource>,
    #[serde(rename = "1080p")]
    pub full_hd: Vec<TorrentResource>,
    pub other: Vec<TorrentResource>,
}

impl GroupedResources {
    pub fn bucket(&self, resolution: Resolution) -> &Vec<TorrentResource> {
        match resolution {
            Resolution::FourK => &self.four_k,
            Resolution::TwoK => &self.two_k,
            Resolution::FullHd => &self.full_hd,
            Resolution::Other => &self.other,
        }
    }

    pub fn bucket_mut(&mut self, resolution: Resolution) -> &mut Vec<TorrentResource> {
        match resolution {
            Resolution::FourK => &mut self.four_k,
            Resolution::TwoK => &mut self.two_k,
            Resolution::FullHd => &mut self.full_hd,
            Resolution::Other => &mut self.other,
        }
    }

    /// Total resources across all buckets
    pub fn len(&self) -> usize {
        self.four_k.len() + self.two_k.len() + self.full_hd.len() + self.other.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate buckets in display order (4k, 2k, 1080p, other)
    pub fn iter(&self) -> impl Iterator<Item = (Resolution, &Vec<TorrentResource>)> {
        Resolution::all().into_iter().map(move |r| (r, self.bucket(r)))
    }
}

/// Result of processing a torrent search payload
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProcessedResources {
    pub has_resources: bool,
    pub has_seeders: bool,
    pub grouped: GroupedResources,
    /// Full deduplicated set before the seeder split, the recommendation input
    #[serde(skip)]
    pub candidates: Vec<TorrentResource>,
}

// =============================================================================
// Nested Search Payload
// =============================================================================

/// Aggregated torrent search results from the backend.
///
/// The nesting below `torrent_dict` is backend-defined and loosely typed;
/// it is flattened by `rank::flatten_torrents` rather than modelled fully.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchTorrents {
    #[serde(default)]
    pub result: std::collections::HashMap<String, MediaTorrents>,
}

/// Per-media entry in the aggregated search results
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaTorrents {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub year: String,
    /// Entries of the form `[label, {category: {group_torrents: {sub:
    /// {torrent_list: [...]}}}}]`; kept loosely typed on purpose
    #[serde(default)]
    pub torrent_dict: Vec<serde_json::Value>,
}

// =============================================================================
// Download Models
// =============================================================================

/// Lifecycle status of a download task.
///
/// Transitions are driven by backend responses: pending → downloading →
/// completed|failed, downloading ⇄ paused, and any active state → removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadStatus {
    Pending,
    Downloading,
    Paused,
    Completed,
    Failed,
}

impl DownloadStatus {
    /// Parse a backend status string, defaulting unknown values to Pending
    pub fn from_str_loose(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "downloading" | "dl" => DownloadStatus::Downloading,
            "paused" | "stopped" | "stop" => DownloadStatus::Paused,
            "completed" | "complete" | "done" => DownloadStatus::Completed,
            "failed" | "error" => DownloadStatus::Failed,
            _ => DownloadStatus::Pending,
        }
    }

    /// Active tasks are shown in the queue and eligible for polling
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            DownloadStatus::Pending | DownloadStatus::Downloading | DownloadStatus::Paused
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, DownloadStatus::Completed | DownloadStatus::Failed)
    }

    pub fn can_pause(&self) -> bool {
        matches!(self, DownloadStatus::Downloading)
    }

    pub fn can_resume(&self) -> bool {
        matches!(self, DownloadStatus::Paused)
    }
}

impl fmt::Display for DownloadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadStatus::Pending => write!(f, "Pending"),
            DownloadStatus::Downloading => write!(f, "Downloading"),
            DownloadStatus::Paused => write!(f, "Paused"),
            DownloadStatus::Completed => write!(f, "Completed"),
            DownloadStatus::Failed => write!(f, "Failed"),
        }
    }
}

/// An entry in the active download queue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadTask {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub site: String,
    /// Percent complete, 0-100
    #[serde(default)]
    pub progress: f64,
    /// Human-readable transfer speed as reported by the backend
    #[serde(default)]
    pub speed: String,
    #[serde(default = "default_status", deserialize_with = "status_loose")]
    pub status: DownloadStatus,
}

fn default_status() -> DownloadStatus {
    DownloadStatus::Pending
}

/// Accept either a bare status string or a missing field
fn status_loose<'de, D>(deserializer: D) -> Result<DownloadStatus, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(DownloadStatus::from_str_loose(&s))
}

impl fmt::Display for DownloadTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} {:.0}% {}",
            self.name, self.status, self.progress, self.speed
        )
    }
}

/// An entry from the download history listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadHistoryItem {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub media_type: String,
    #[serde(default)]
    pub site: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub overview: String,
}

impl fmt::Display for DownloadHistoryItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) @{} {}", self.title, self.year, self.site, self.date)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(respix: &str) -> TorrentResource {
        TorrentResource {
            respix: respix.to_string(),
            ..Default::default()
        }
    }

    // -------------------------------------------------------------------------
    // Resolution Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_resolution_4k_tags() {
        assert_eq!(Resolution::from_tag("2160p"), Resolution::FourK);
        assert_eq!(Resolution::from_tag("4K"), Resolution::FourK);
        assert_eq!(Resolution::from_tag("UHD"), Resolution::FourK);
        assert_eq!(Resolution::from_tag("Bluray UHD Remux"), Resolution::FourK);
    }

    #[test]
    fn test_resolution_2k_tags() {
        assert_eq!(Resolution::from_tag("1440p"), Resolution::TwoK);
        assert_eq!(Resolution::from_tag("2K"), Resolution::TwoK);
    }

    #[test]
    fn test_resolution_1080p_tags() {
        assert_eq!(Resolution::from_tag("1080p"), Resolution::FullHd);
        assert_eq!(Resolution::from_tag("BluRay 1080P"), Resolution::FullHd);
    }

    #[test]
    fn test_resolution_other_tags() {
        assert_eq!(Resolution::from_tag("720p"), Resolution::Other);
        assert_eq!(Resolution::from_tag("480p"), Resolution::Other);
        assert_eq!(Resolution::from_tag(""), Resolution::Other);
        assert_eq!(Resolution::from_tag("   "), Resolution::Other);
    }

    #[test]
    fn test_resolution_priority_ordering() {
        assert!(Resolution::FourK > Resolution::FullHd);
        assert!(Resolution::FullHd > Resolution::TwoK);
        assert!(Resolution::TwoK > Resolution::Other);
    }

    #[test]
    fn test_resolution_display() {
        assert_eq!(Resolution::FourK.to_string(), "4k");
        assert_eq!(Resolution::TwoK.to_string(), "2k");
        assert_eq!(Resolution::FullHd.to_string(), "1080p");
        assert_eq!(Resolution::Other.to_string(), "other");
    }

    // -------------------------------------------------------------------------
    // TorrentResource Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_has_release_group() {
        let mut r = resource("1080p");
        assert!(!r.has_release_group());

        r.releasegroup = "   ".to_string();
        assert!(!r.has_release_group());

        r.releasegroup = "FRDS".to_string();
        assert!(r.has_release_group());
    }

    #[test]
    fn test_resource_deserialize_defaults() {
        // Minimal payloads from some sites omit most fields
        let r: TorrentResource = serde_json::from_str(r#"{"id": 7, "seeders": 3}"#).unwrap();
        assert_eq!(r.id, 7);
        assert_eq!(r.seeders, 3);
        assert!(r.releasegroup.is_empty());
        assert_eq!(r.resolution(), Resolution::Other);
    }

    // -------------------------------------------------------------------------
    // GroupedResources Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_grouped_len_and_iter_order() {
        let mut grouped = GroupedResources::default();
        grouped.bucket_mut(Resolution::FourK).push(resource("2160p"));
        grouped.bucket_mut(Resolution::Other).push(resource("720p"));
        grouped.bucket_mut(Resolution::Other).push(resource("cam"));

        assert_eq!(grouped.len(), 3);
        assert!(!grouped.is_empty());

        let order: Vec<Resolution> = grouped.iter().map(|(r, _)| r).collect();
        assert_eq!(
            order,
            vec![
                Resolution::FourK,
                Resolution::TwoK,
                Resolution::FullHd,
                Resolution::Other
            ]
        );
    }

    // -------------------------------------------------------------------------
    // DownloadStatus Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_download_status_parsing() {
        assert_eq!(
            DownloadStatus::from_str_loose("Downloading"),
            DownloadStatus::Downloading
        );
        assert_eq!(DownloadStatus::from_str_loose("paused"), DownloadStatus::Paused);
        assert_eq!(DownloadStatus::from_str_loose("STOPPED"), DownloadStatus::Paused);
        assert_eq!(
            DownloadStatus::from_str_loose("completed"),
            DownloadStatus::Completed
        );
        assert_eq!(DownloadStatus::from_str_loose("error"), DownloadStatus::Failed);
        assert_eq!(DownloadStatus::from_str_loose("???"), DownloadStatus::Pending);
    }

    #[test]
    fn test_download_status_lifecycle_predicates() {
        assert!(DownloadStatus::Pending.is_active());
        assert!(DownloadStatus::Downloading.is_active());
        assert!(DownloadStatus::Paused.is_active());
        assert!(!DownloadStatus::Completed.is_active());
        assert!(!DownloadStatus::Failed.is_active());

        assert!(DownloadStatus::Downloading.can_pause());
        assert!(!DownloadStatus::Paused.can_pause());
        assert!(DownloadStatus::Paused.can_resume());
        assert!(!DownloadStatus::Downloading.can_resume());

        assert!(DownloadStatus::Completed.is_terminal());
        assert!(DownloadStatus::Failed.is_terminal());
        assert!(!DownloadStatus::Pending.is_terminal());
    }

    #[test]
    fn test_download_task_deserialize() {
        let task: DownloadTask = serde_json::from_str(
            r#"{"id": "dl-1", "name": "Some Movie", "progress": 42.5, "speed": "5.2MB/s", "status": "downloading"}"#,
        )
        .unwrap();
        assert_eq!(task.status, DownloadStatus::Downloading);
        assert!((task.progress - 42.5).abs() < 0.01);
    }

    // -------------------------------------------------------------------------
    // SearchItem Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_search_item_display() {
        let item = SearchItem {
            id: 13,
            title: "Forrest Gump".to_string(),
            year: Some("1994".to_string()),
            kind: "Movie".to_string(),
            media_type: "MOV".to_string(),
            vote: 8.5,
            image: String::new(),
            overview: String::new(),
            poster: String::new(),
        };
        assert_eq!(item.to_string(), "Forrest Gump (1994) [MOV]");
    }

    #[test]
    fn test_search_item_is_tv() {
        let mut item: SearchItem =
            serde_json::from_str(r#"{"id": 1, "media_type": "TV"}"#).unwrap();
        assert!(item.is_tv());
        item.media_type = "MOV".to_string();
        assert!(!item.is_tv());
    }
}
