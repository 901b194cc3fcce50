use curator_core::{FetchError, Playlist};
use reqwest::Method;
use serde::Serialize;

use crate::envelope::SuccessPolicy;
use crate::ReqwestCurationApi;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlaylist {
    pub title: String,
    pub description: String,
    pub is_public: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistUpdate {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

/// Link to add to a playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkData {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

impl LinkData {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
            description: None,
            thumbnail_url: None,
        }
    }
}

/// Playlist endpoints. They answer with assorted `2xx-n` codes, so any
/// success code is accepted.
impl ReqwestCurationApi {
    pub async fn playlists(&self) -> Result<Vec<Playlist>, FetchError> {
        let url = self.endpoint(&["api", "v1", "playlists"])?;
        self.execute(self.request(Method::GET, url), SuccessPolicy::AnyTwoHundred)
            .await
    }

    pub async fn liked_playlists(&self) -> Result<Vec<Playlist>, FetchError> {
        let url = self.endpoint(&["api", "v1", "playlists", "liked"])?;
        self.execute(self.request(Method::GET, url), SuccessPolicy::AnyTwoHundred)
            .await
    }

    pub async fn playlist(&self, id: i64) -> Result<Playlist, FetchError> {
        let url = self.endpoint(&["api", "v1", "playlists", &id.to_string()])?;
        self.execute(self.request(Method::GET, url), SuccessPolicy::AnyTwoHundred)
            .await
    }

    pub async fn create_playlist(&self, playlist: &NewPlaylist) -> Result<Playlist, FetchError> {
        let url = self.endpoint(&["api", "v1", "playlists"])?;
        let builder = Self::with_json(self.request(Method::POST, url), playlist)?;
        self.execute(builder, SuccessPolicy::AnyTwoHundred).await
    }

    pub async fn update_playlist(
        &self,
        id: i64,
        update: &PlaylistUpdate,
    ) -> Result<Playlist, FetchError> {
        let url = self.endpoint(&["api", "v1", "playlists", &id.to_string()])?;
        let builder = Self::with_json(self.request(Method::PATCH, url), update)?;
        self.execute(builder, SuccessPolicy::AnyTwoHundred).await
    }

    pub async fn add_link_item(&self, playlist_id: i64, link: &LinkData) -> Result<Playlist, FetchError> {
        let url = self.endpoint(&[
            "api",
            "v1",
            "playlists",
            &playlist_id.to_string(),
            "items",
            "link",
        ])?;
        let builder = Self::with_json(self.request(Method::POST, url), link)?;
        self.execute(builder, SuccessPolicy::AnyTwoHundred).await
    }

    /// Only the status matters; the body may be empty.
    pub async fn delete_item(&self, playlist_id: i64, item_id: i64) -> Result<(), FetchError> {
        let url = self.endpoint(&[
            "api",
            "v1",
            "playlists",
            &playlist_id.to_string(),
            "items",
            &item_id.to_string(),
        ])?;
        self.send(self.request(Method::DELETE, url)).await.map(|_| ())
    }

    pub async fn reorder_items(
        &self,
        playlist_id: i64,
        ordered_item_ids: &[i64],
    ) -> Result<Playlist, FetchError> {
        let url = self.endpoint(&[
            "api",
            "v1",
            "playlists",
            &playlist_id.to_string(),
            "items",
            "order",
        ])?;
        let builder = Self::with_json(self.request(Method::PATCH, url), ordered_item_ids)?;
        self.execute(builder, SuccessPolicy::AnyTwoHundred).await
    }

    pub async fn recommendations(&self, playlist_id: i64) -> Result<Vec<Playlist>, FetchError> {
        let url = self.endpoint(&[
            "api",
            "v1",
            "playlists",
            &playlist_id.to_string(),
            "recommendation",
        ])?;
        self.execute(self.request(Method::GET, url), SuccessPolicy::AnyTwoHundred)
            .await
    }
}

