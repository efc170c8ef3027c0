//! CLI Command Handlers
//!
//! Implements all CLI commands by calling the backend API client.
//! Each handler takes CLI args and Output, returns ExitCode.

use crate::api::{ApiClient, ApiError};
use crate::cli::{
    DownloadCmd, DownloadsCmd, ExitCode, HistoryCmd, InfoCmd, LoginCmd, Output, PauseCmd,
    RecommendCmd, RemoveCmd, ResourcesCmd, ResumeCmd, SearchCmd, StatusOk,
};
use crate::config::Config;
use crate::models::{ProcessedResources, TorrentResource};
use crate::rank;

// =============================================================================
// Shared Helpers
// =============================================================================

/// Load config, apply the --server override, and build a client from it
fn load_session(server: Option<&str>) -> (Config, ApiClient) {
    let mut config = Config::load();
    if let Some(url) = server {
        config.set_server_url(url);
    }
    let client = ApiClient::new(&config);
    (config, client)
}

/// Map an API error to the exit code scripting callers key off
fn api_exit_code(err: &ApiError) -> ExitCode {
    match err {
        ApiError::AuthExpired => ExitCode::AuthRequired,
        ApiError::RequestFailed(_) | ApiError::ServerError(_) => ExitCode::NetworkError,
        ApiError::Backend { .. } | ApiError::InvalidResponse(_) => ExitCode::Error,
    }
}

/// Run a backend-side torrent search and return the processed resources
async fn fetch_resources(
    client: &ApiClient,
    keyword: &str,
) -> Result<ProcessedResources, ApiError> {
    client.search_torrents(keyword).await?;
    let payload = client.torrent_results().await?;
    Ok(rank::process_resources(&payload))
}

/// Flatten the grouped pool back into one list, display order
fn flat_pool(processed: &ProcessedResources) -> Vec<TorrentResource> {
    processed
        .grouped
        .iter()
        .flat_map(|(_, bucket)| bucket.iter().cloned())
        .collect()
}

// =============================================================================
// Login Command
// =============================================================================

pub async fn login_cmd(cmd: LoginCmd, server: Option<&str>, output: &Output) -> ExitCode {
    let (mut config, client) = load_session(server);

    output.info(format!("Logging in to {}", client.base_url()));

    match client.login(&cmd.username, &cmd.password).await {
        Ok(token) => {
            config.auth_token = Some(token);
            if let Err(e) = config.save() {
                return output.error(format!("Failed to save session: {}", e), ExitCode::Error);
            }
            if let Err(e) = output.print(StatusOk::default()) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => output.error(format!("Login failed: {}", e), api_exit_code(&e)),
    }
}

// =============================================================================
// Search Command
// =============================================================================

pub async fn search_cmd(cmd: SearchCmd, server: Option<&str>, output: &Output) -> ExitCode {
    let (_config, client) = load_session(server);

    output.info(format!("Searching for: {}", cmd.keyword));

    match client.search(&cmd.keyword).await {
        Ok(mut results) => {
            results.truncate(cmd.limit);

            if output.json {
                if let Err(e) = output.print(&results) {
                    return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
                }
            } else {
                for item in &results {
                    output.line(format!("{:>8}  {}", item.id, item));
                }
            }
            ExitCode::Success
        }
        Err(e) => output.error(format!("Search failed: {}", e), api_exit_code(&e)),
    }
}

// =============================================================================
// Info Command
// =============================================================================

pub async fn info_cmd(cmd: InfoCmd, server: Option<&str>, output: &Output) -> ExitCode {
    let (_config, client) = load_session(server);

    output.info(format!("Getting info for tmdbid {}", cmd.tmdbid));

    match client.media_detail(cmd.tmdbid, &cmd.media_type).await {
        Ok(detail) => {
            if output.json {
                if let Err(e) = output.print(&detail) {
                    return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
                }
            } else {
                output.line(&detail);
                if !detail.genres.is_empty() {
                    output.line(format!("Genres: {}", detail.genres));
                }
                if !detail.overview.is_empty() {
                    output.line(&detail.overview);
                }
            }
            ExitCode::Success
        }
        Err(e) => output.error(format!("Info fetch failed: {}", e), api_exit_code(&e)),
    }
}

// =============================================================================
// Resources Command
// =============================================================================

pub async fn resources_cmd(cmd: ResourcesCmd, server: Option<&str>, output: &Output) -> ExitCode {
    let (_config, client) = load_session(server);

    output.info(format!("Searching resources for: {}", cmd.keyword));

    let processed = match fetch_resources(&client, &cmd.keyword).await {
        Ok(processed) => processed,
        Err(e) => return output.error(format!("Resource search failed: {}", e), api_exit_code(&e)),
    };

    if !processed.has_resources {
        return output.error("No resources found", ExitCode::NoResources);
    }
    if !processed.has_seeders {
        output.info("Warning: no seeded releases, listing dead torrents");
    }

    if let Some(filter) = cmd.bucket {
        let bucket = processed.grouped.bucket(filter.resolution());
        if bucket.is_empty() {
            return output.error(
                format!("No resources in the {} bucket", filter.resolution()),
                ExitCode::NoResources,
            );
        }
        if output.json {
            if let Err(e) = output.print(bucket) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
        } else {
            for resource in bucket {
                output.line(format!("{:>8}  {}", resource.id, resource));
            }
        }
        return ExitCode::Success;
    }

    if cmd.flat {
        let pool = flat_pool(&processed);
        if output.json {
            if let Err(e) = output.print(&pool) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
        } else {
            for resource in &pool {
                output.line(format!("{:>8}  {}", resource.id, resource));
            }
        }
        return ExitCode::Success;
    }

    if output.json {
        if let Err(e) = output.print(&processed) {
            return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
        }
    } else {
        for (resolution, bucket) in processed.grouped.iter() {
            if bucket.is_empty() {
                continue;
            }
            output.line(format!("== {} ({}) ==", resolution, bucket.len()));
            for resource in bucket {
                output.line(format!("{:>8}  {}", resource.id, resource));
            }
        }
    }
    ExitCode::Success
}

// =============================================================================
// Recommend Command
// =============================================================================

pub async fn recommend_cmd(cmd: RecommendCmd, server: Option<&str>, output: &Output) -> ExitCode {
    let (_config, client) = load_session(server);

    output.info(format!("Searching resources for: {}", cmd.keyword));

    let processed = match fetch_resources(&client, &cmd.keyword).await {
        Ok(processed) => processed,
        Err(e) => return output.error(format!("Resource search failed: {}", e), api_exit_code(&e)),
    };

    // Recommend over the full deduplicated set, not just the seeded listing
    match rank::recommend(&processed.candidates) {
        Some(best) => {
            if output.json {
                if let Err(e) = output.print(best) {
                    return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
                }
            } else {
                output.line(format!("{:>8}  {}", best.id, best));
            }
            ExitCode::Success
        }
        None => output.error("No resources found", ExitCode::NoResources),
    }
}

// =============================================================================
// Download Commands
// =============================================================================

pub async fn download_cmd(cmd: DownloadCmd, server: Option<&str>, output: &Output) -> ExitCode {
    let (_config, client) = load_session(server);

    output.info(format!("Queueing download for resource {}", cmd.id));

    match client.download_torrent(cmd.id).await {
        Ok(()) => {
            if let Err(e) = output.print(StatusOk::default()) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => {
            let code = match api_exit_code(&e) {
                ExitCode::Error => ExitCode::DownloadFailed,
                other => other,
            };
            output.error(format!("Download failed: {}", e), code)
        }
    }
}

pub async fn downloads_cmd(cmd: DownloadsCmd, server: Option<&str>, output: &Output) -> ExitCode {
    let (_config, client) = load_session(server);

    loop {
        let tasks = match client.active_downloads().await {
            Ok(tasks) => tasks,
            Err(e) => return output.error(format!("Queue fetch failed: {}", e), api_exit_code(&e)),
        };

        if output.json {
            if let Err(e) = output.print(&tasks) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
        } else if tasks.is_empty() {
            output.line("Download queue is empty");
        } else {
            for task in &tasks {
                output.line(format!("{:>8}  {}", task.id, task));
            }
        }

        // Watch mode re-arms only while something is still active
        if !cmd.watch || !tasks.iter().any(|t| t.status.is_active()) {
            return ExitCode::Success;
        }
        tokio::time::sleep(std::time::Duration::from_secs(cmd.interval.max(1))).await;
    }
}

pub async fn history_cmd(cmd: HistoryCmd, server: Option<&str>, output: &Output) -> ExitCode {
    let (_config, client) = load_session(server);

    match client.download_history(cmd.page).await {
        Ok(items) => {
            if output.json {
                if let Err(e) = output.print(&items) {
                    return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
                }
            } else if items.is_empty() {
                output.line("No download history");
            } else {
                for item in &items {
                    output.line(format!("{:>8}  {}", item.id, item));
                }
            }
            ExitCode::Success
        }
        Err(e) => output.error(format!("History fetch failed: {}", e), api_exit_code(&e)),
    }
}

/// Shared body for the resume/pause/remove id commands
fn download_action(result: Result<(), ApiError>, action: &str, output: &Output) -> ExitCode {
    match result {
        Ok(()) => {
            if let Err(e) = output.print(StatusOk::default()) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => {
            let code = match api_exit_code(&e) {
                ExitCode::Error => ExitCode::DownloadFailed,
                other => other,
            };
            output.error(format!("{} failed: {}", action, e), code)
        }
    }
}

pub async fn resume_cmd(cmd: ResumeCmd, server: Option<&str>, output: &Output) -> ExitCode {
    let (_config, client) = load_session(server);
    download_action(client.start_download(&cmd.id).await, "Resume", output)
}

pub async fn pause_cmd(cmd: PauseCmd, server: Option<&str>, output: &Output) -> ExitCode {
    let (_config, client) = load_session(server);
    download_action(client.stop_download(&cmd.id).await, "Pause", output)
}

pub async fn remove_cmd(cmd: RemoveCmd, server: Option<&str>, output: &Output) -> ExitCode {
    let (_config, client) = load_session(server);
    download_action(client.remove_download(&cmd.id).await, "Remove", output)
}
