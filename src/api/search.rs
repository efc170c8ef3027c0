//! Search and media metadata endpoints

use serde::Deserialize;

use super::client::{ApiClient, ApiError};
use crate::models::{MediaDetails, SearchItem, SearchTorrents};

impl ApiClient {
    /// Log in and return the session token (POST /user/login)
    pub async fn login(&self, username: &str, password: &str) -> Result<String, ApiError> {
        let params = [
            ("username", username.to_string()),
            ("password", password.to_string()),
        ];
        let data: LoginData = self.post_form("/user/login", &params).await?;
        if data.token.is_empty() {
            return Err(ApiError::InvalidResponse("login returned no token".to_string()));
        }
        Ok(data.token)
    }

    /// Keyword search for movies and TV shows (POST /search/keyword)
    pub async fn search(&self, keyword: &str) -> Result<Vec<SearchItem>, ApiError> {
        let params = [("keyword", keyword.to_string())];
        let data: ItemsData = self.post_form("/search/keyword", &params).await?;
        Ok(data.items)
    }

    /// Kick off a backend-side torrent search for a keyword
    /// (POST /search/torrents). Results are fetched separately via
    /// `torrent_results`.
    pub async fn search_torrents(&self, keyword: &str) -> Result<(), ApiError> {
        let params = [("keyword", keyword.to_string())];
        self.post_empty("/search/torrents", &params).await
    }

    /// Fetch the aggregated torrent search results
    /// (POST /search/result/torrents)
    pub async fn torrent_results(&self) -> Result<SearchTorrents, ApiError> {
        self.post_form("/search/result/torrents", &[]).await
    }

    /// Fetch media details by TMDB id (POST /media/detail)
    pub async fn media_detail(
        &self,
        tmdbid: i64,
        media_type: &str,
    ) -> Result<MediaDetails, ApiError> {
        let params = [
            ("type", media_type.to_string()),
            ("tmdbid", tmdbid.to_string()),
        ];
        // The detail payload is nested one level deeper than usual
        let data: DetailData = self.post_form("/media/detail", &params).await?;
        Ok(data.data)
    }
}

// =============================================================================
// Response Structures (internal deserialization)
// =============================================================================

#[derive(Debug, Deserialize)]
struct LoginData {
    #[serde(default)]
    token: String,
}

#[derive(Debug, Deserialize)]
struct ItemsData {
    #[serde(rename = "Items", default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct DetailData {
    #[serde(default)]
    data: MediaDetails,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_items_data_deserialize() {
        let data: ItemsData = serde_json::from_str(
            r#"{"Items": [{"id": 1, "title": "Dune", "media_type": "MOV"}]}"#,
        )
        .unwrap();
        assert_eq!(data.items.len(), 1);
        assert_eq!(data.items[0].title, "Dune");
    }

    #[test]
    fn test_detail_data_nested() {
        let data: DetailData = serde_json::from_str(
            r#"{"data": {"tmdbid": 438631, "title": "Dune", "year": "2021", "vote": 7.8}}"#,
        )
        .unwrap();
        assert_eq!(data.data.tmdbid, 438631);
        assert_eq!(data.data.year, "2021");
    }
}
