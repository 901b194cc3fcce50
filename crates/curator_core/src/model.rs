use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of an item in a paginated collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Int(i64),
    Str(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Int(id) => write!(f, "{id}"),
            ItemId::Str(id) => f.write_str(id),
        }
    }
}

impl From<i64> for ItemId {
    fn from(id: i64) -> Self {
        ItemId::Int(id)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        ItemId::Str(id.to_string())
    }
}

/// Capability the loader and enricher need from an item: an identifier and
/// the external links it references.
pub trait Enrichable {
    fn item_id(&self) -> ItemId;
    fn links(&self) -> Vec<&str>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurationLink {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CurationAuthor {
    pub username: String,
    pub nickname: Option<String>,
    pub profile_image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Curation {
    #[serde(alias = "curationId")]
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub urls: Vec<CurationLink>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub comment_count: u64,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub member: Option<CurationAuthor>,
}

impl Curation {
    /// Minimal curation, mostly useful for tests and fixtures.
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            content: String::new(),
            urls: Vec::new(),
            link: None,
            tags: Vec::new(),
            like_count: 0,
            comment_count: 0,
            created_at: None,
            member: None,
        }
    }

    pub fn with_urls<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.urls = urls
            .into_iter()
            .map(|url| CurationLink { url: url.into() })
            .collect();
        self
    }
}

impl Enrichable for Curation {
    fn item_id(&self) -> ItemId {
        ItemId::Int(self.id)
    }

    fn links(&self) -> Vec<&str> {
        self.urls
            .iter()
            .map(|link| link.url.as_str())
            .chain(self.link.as_deref())
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    #[serde(alias = "memberId")]
    pub id: Option<i64>,
    pub username: String,
    pub nickname: Option<String>,
    pub email: Option<String>,
    #[serde(alias = "profileImage")]
    pub profile_image_url: Option<String>,
    #[serde(alias = "introduce")]
    pub introduction: Option<String>,
    pub follower_count: u64,
    pub following_count: u64,
    pub curation_count: u64,
}

impl Profile {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Self::default()
        }
    }

    pub fn display_name(&self) -> &str {
        self.nickname
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.username)
    }
}

/// Metadata resolved from an external URL.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinkPreview {
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "image", alias = "thumbnail")]
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlaylistItemType {
    Link,
    Curation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItem {
    pub id: i64,
    #[serde(default)]
    pub item_id: Option<i64>,
    pub item_type: PlaylistItemType,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_public")]
    pub is_public: bool,
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
}

fn default_public() -> bool {
    true
}

impl Playlist {
    /// Items sorted by their display order.
    pub fn ordered_items(&self) -> Vec<&PlaylistItem> {
        let mut items: Vec<&PlaylistItem> = self.items.iter().collect();
        items.sort_by_key(|item| item.display_order);
        items
    }
}

impl Enrichable for Playlist {
    fn item_id(&self) -> ItemId {
        ItemId::Int(self.id)
    }

    fn links(&self) -> Vec<&str> {
        self.ordered_items()
            .into_iter()
            .filter_map(|item| item.url.as_deref())
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curation_links_include_single_link_and_skip_blanks() {
        let mut curation = Curation::new(1, "t").with_urls(["https://a.example", "  "]);
        curation.link = Some("https://b.example".to_string());
        assert_eq!(curation.links(), vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn curation_accepts_either_id_field() {
        let a: Curation = serde_json::from_str(r#"{"id": 3, "title": "x"}"#).unwrap();
        let b: Curation = serde_json::from_str(r#"{"curationId": 3, "title": "x"}"#).unwrap();
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn profile_aliases_and_display_name() {
        let profile: Profile = serde_json::from_str(
            r#"{"username": "kim", "profileImage": "p.png", "introduce": "hi", "nickname": ""}"#,
        )
        .unwrap();
        assert_eq!(profile.profile_image_url.as_deref(), Some("p.png"));
        assert_eq!(profile.introduction.as_deref(), Some("hi"));
        assert_eq!(profile.display_name(), "kim");
    }

    #[test]
    fn preview_accepts_image_alias() {
        let preview: LinkPreview =
            serde_json::from_str(r#"{"url": "u", "title": "t", "image": "i.png"}"#).unwrap();
        assert_eq!(preview.thumbnail_url.as_deref(), Some("i.png"));
    }

    #[test]
    fn playlist_links_follow_display_order() {
        let playlist: Playlist = serde_json::from_str(
            r#"{"id": 9, "title": "p", "items": [
                {"id": 1, "itemType": "LINK", "displayOrder": 1, "url": "https://second"},
                {"id": 2, "itemType": "CURATION", "displayOrder": 2},
                {"id": 3, "itemType": "LINK", "displayOrder": 0, "url": "https://first"}
            ]}"#,
        )
        .unwrap();
        assert!(playlist.is_public);
        assert_eq!(playlist.links(), vec!["https://first", "https://second"]);
    }
}
