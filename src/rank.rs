//! Resource ranking and grouping
//!
//! Pure functions that turn the backend's nested torrent search payload into
//! something a person can pick from:
//! - Flatten the nested per-site/per-category structure into one list
//! - Merge near-duplicate releases reported by multiple sites
//! - Split seeded from dead torrents and bucket by resolution
//! - Pick a recommended resource via a quality/health cascade
//!
//! Nothing here touches the network or errors; malformed branches of the
//! payload are simply skipped.

use crate::models::{
    GroupedResources, ProcessedResources, Resolution, SearchTorrents, TorrentResource,
};
use std::collections::HashMap;

// =============================================================================
// Name Normalization & Deduplication
// =============================================================================

/// Normalize a torrent name for duplicate detection.
///
/// Strips a trailing 4-digit year token, then a trailing size token like
/// "14.5G" / "800MB", then lowercases and trims. Different sites list the
/// same release with these suffixes varying, so they are ignored for
/// identity purposes.
pub fn base_name(name: &str) -> String {
    let mut out = name.to_string();

    if let Ok(re) = regex::Regex::new(r"\s+\d{4}\s*$") {
        out = re.replace_all(&out, "").into_owned();
    }
    if let Ok(re) = regex::Regex::new(r"(?i)\s+\d+\.?\d*[GM]B?\s*$") {
        out = re.replace_all(&out, "").into_owned();
    }

    out.to_lowercase().trim().to_string()
}

/// Merge resources whose normalized names collide, keeping the instance with
/// strictly more seeders (ties keep the first seen). First-occurrence order
/// is preserved. Idempotent.
pub fn dedup_resources(resources: Vec<TorrentResource>) -> Vec<TorrentResource> {
    let mut merged: Vec<TorrentResource> = Vec::with_capacity(resources.len());
    let mut index: HashMap<String, usize> = HashMap::new();

    for resource in resources {
        let key = base_name(&resource.torrent_name);
        match index.get(&key) {
            Some(&pos) => {
                if resource.seeders > merged[pos].seeders {
                    merged[pos] = resource;
                }
            }
            None => {
                index.insert(key, merged.len());
                merged.push(resource);
            }
        }
    }

    merged
}

// =============================================================================
// Resolution Grouping
// =============================================================================

/// Partition resources into resolution buckets, preserving input order
/// within each bucket.
pub fn group_by_resolution(resources: Vec<TorrentResource>) -> GroupedResources {
    let mut grouped = GroupedResources::default();
    for resource in resources {
        grouped.bucket_mut(resource.resolution()).push(resource);
    }
    grouped
}

// =============================================================================
// Payload Flattening
// =============================================================================

/// Flatten every torrent resource out of the nested search payload.
///
/// Shape assumption: each `torrent_dict` entry is a two-element array
/// `[label, {category: {"group_torrents": {subgroup: {"torrent_list":
/// [resource, ...]}}}}]`. Any node that does not match (missing key, wrong
/// type, undecodable resource) is skipped without error.
pub fn flatten_torrents(payload: &SearchTorrents) -> Vec<TorrentResource> {
    let mut flat = Vec::new();

    for media in payload.result.values() {
        for entry in &media.torrent_dict {
            let Some(pair) = entry.as_array() else { continue };
            let Some(categories) = pair.get(1).and_then(|v| v.as_object()) else {
                continue;
            };

            for category in categories.values() {
                let Some(groups) = category
                    .get("group_torrents")
                    .and_then(|v| v.as_object())
                else {
                    continue;
                };

                for group in groups.values() {
                    let Some(list) = group.get("torrent_list").and_then(|v| v.as_array())
                    else {
                        continue;
                    };

                    for item in list {
                        if let Ok(resource) =
                            serde_json::from_value::<TorrentResource>(item.clone())
                        {
                            flat.push(resource);
                        }
                    }
                }
            }
        }
    }

    flat
}

// =============================================================================
// Top-level Processing
// =============================================================================

/// Turn a raw search payload into deduplicated, bucketed resources.
///
/// The seeded pool (seeders > 0) is preferred; only when no resource has
/// seeders does the dead pool get shown, with `has_seeders` false so the UI
/// can warn about it. The full deduplicated set is kept as `candidates` so
/// recommendation can consider dead releases even when the listing hides
/// them behind the seeded pool.
pub fn process_resources(payload: &SearchTorrents) -> ProcessedResources {
    let flat = flatten_torrents(payload);
    if flat.is_empty() {
        return ProcessedResources::default();
    }

    let merged = dedup_resources(flat);

    let (seeded, unseeded): (Vec<TorrentResource>, Vec<TorrentResource>) =
        merged.iter().cloned().partition(|r| r.seeders > 0);

    let (pool, has_seeders) = if !seeded.is_empty() {
        (seeded, true)
    } else if !unseeded.is_empty() {
        (unseeded, false)
    } else {
        return ProcessedResources::default();
    };

    ProcessedResources {
        has_resources: true,
        has_seeders,
        grouped: group_by_resolution(pool),
        candidates: merged,
    }
}

// =============================================================================
// Recommendation
// =============================================================================

/// Predicate cascade for picking the recommended pool, best criteria first.
/// "hi-res" means 4k or 1080p.
fn cascade() -> [fn(&TorrentResource) -> bool; 15] {
    fn hi_res(r: &TorrentResource) -> bool {
        matches!(r.resolution(), Resolution::FourK | Resolution::FullHd)
    }
    fn full_hd(r: &TorrentResource) -> bool {
        r.resolution() == Resolution::FullHd
    }

    [
        |r| r.has_release_group() && hi_res(r) && r.seeders > 10,
        |r| r.has_release_group() && hi_res(r) && r.seeders > 0,
        |r| r.has_release_group() && hi_res(r),
        |r| r.has_release_group() && full_hd(r) && r.seeders > 10,
        |r| r.has_release_group() && full_hd(r) && r.seeders > 0,
        |r| r.has_release_group() && full_hd(r),
        |r| r.has_release_group() && r.seeders > 10,
        |r| r.has_release_group() && r.seeders > 0,
        |r| r.has_release_group(),
        |r| hi_res(r) && r.seeders > 10,
        |r| hi_res(r) && r.seeders > 0,
        |r| hi_res(r),
        |r| r.seeders > 10,
        |r| r.seeders > 0,
        |_| true,
    ]
}

/// Pick the recommended resource from an already-deduplicated set.
///
/// The first cascade rule matched by at least one resource selects the
/// candidate pool; within it the winner is the highest resolution priority,
/// ties broken by seeder count. Returns None only for empty input.
pub fn recommend(resources: &[TorrentResource]) -> Option<&TorrentResource> {
    if resources.is_empty() {
        return None;
    }

    for rule in cascade() {
        let mut pool: Vec<&TorrentResource> = resources.iter().filter(|r| rule(r)).collect();
        if pool.is_empty() {
            continue;
        }
        pool.sort_by(|a, b| {
            b.resolution()
                .priority()
                .cmp(&a.resolution().priority())
                .then(b.seeders.cmp(&a.seeders))
        });
        return pool.into_iter().next();
    }

    None
}

// =============================================================================
// Unit Tests
// =============================================================================
