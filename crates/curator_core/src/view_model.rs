use crate::{LinkPreview, Profile, ViewState};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FeedStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedViewModel {
    pub author: Option<String>,
    pub profile: ViewState<Profile>,
    pub feed: FeedStatus,
    pub curations: Vec<CurationRowView>,
    pub has_more: bool,
    pub loading_more: bool,
    pub load_more_error: Option<String>,
    pub is_own_profile: bool,
    pub previews_in_flight: usize,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurationRowView {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: Option<String>,
    pub like_count: u64,
    pub comment_count: u64,
    pub tags: Vec<String>,
    /// Links in declaration order, each with its merged preview if any.
    pub links: Vec<LinkView>,
    /// Merged previews in completion order, not link order.
    pub previews: Vec<LinkPreview>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkView {
    pub url: String,
    pub preview: Option<LinkPreview>,
}
