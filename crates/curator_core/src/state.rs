use curator_logging::{curator_debug, curator_warn};

use crate::view_model::{CurationRowView, FeedStatus, FeedViewModel, LinkView};
use crate::{
    AsyncViewState, Curation, Effect, EnrichOutcome, Enrichable, FetchError, Generation,
    LinkPreview, LoadMode, Page, PageOutcome, PageRequest, PagedCollectionLoader, PreviewRequest,
    Profile, SecondaryResourceEnricher, SessionContext,
};

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// State of one mounted profile page: header, paginated curations and
/// their link previews.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedState {
    session: SessionContext,
    author: Option<String>,
    profile: AsyncViewState<Profile>,
    feed: AsyncViewState<Vec<Curation>>,
    loader: PagedCollectionLoader<Curation>,
    enricher: SecondaryResourceEnricher,
    load_more_error: Option<String>,
    dirty: bool,
}

impl Default for FeedState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, SessionContext::new())
    }
}

impl FeedState {
    pub fn new(page_size: u32, session: SessionContext) -> Self {
        Self {
            session,
            author: None,
            profile: AsyncViewState::new(),
            feed: AsyncViewState::new(),
            loader: PagedCollectionLoader::new(page_size),
            enricher: SecondaryResourceEnricher::new(),
            load_more_error: None,
            dirty: false,
        }
    }

    pub fn view(&self) -> FeedViewModel {
        let feed = match self.feed.state() {
            crate::ViewState::Idle => FeedStatus::Idle,
            crate::ViewState::Loading => FeedStatus::Loading,
            crate::ViewState::Loaded(_) => FeedStatus::Loaded,
            crate::ViewState::Error(message) => FeedStatus::Error(message.clone()),
        };
        let curations = self
            .feed
            .loaded()
            .map(|items| items.iter().map(|item| self.row_view(item)).collect())
            .unwrap_or_default();

        FeedViewModel {
            author: self.author.clone(),
            profile: self.profile.state().clone(),
            feed,
            curations,
            has_more: self.loader.has_more(),
            loading_more: self.feed.loaded().is_some() && self.loader.is_loading(),
            load_more_error: self.load_more_error.clone(),
            is_own_profile: self.is_own_profile(),
            previews_in_flight: self.enricher.in_flight_count(),
            dirty: self.dirty,
        }
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Nothing outstanding: no page, profile or preview fetch in flight.
    pub fn is_settled(&self) -> bool {
        !self.loader.is_loading() && !self.profile.is_loading() && self.enricher.is_idle()
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn loader(&self) -> &PagedCollectionLoader<Curation> {
        &self.loader
    }

    pub fn enricher(&self) -> &SecondaryResourceEnricher {
        &self.enricher
    }

    pub(crate) fn mount(&mut self, author: &str) -> Vec<Effect> {
        self.loader.reset();
        self.enricher.clear();
        self.load_more_error = None;
        self.dirty = true;

        let author = author.trim();
        if author.is_empty() {
            self.author = None;
            self.profile.invalidate();
            self.feed.reject("invalid username");
            return Vec::new();
        }
        self.author = Some(author.to_string());

        let profile_generation = self.profile.begin();
        let feed_generation = self.feed.begin();
        let mut effects = vec![Effect::FetchProfile {
            generation: profile_generation,
            username: author.to_string(),
        }];
        match self.loader.load_page(1, LoadMode::Replace) {
            Ok(request) => effects.push(Effect::FetchPage {
                generation: feed_generation,
                author: author.to_string(),
                request,
            }),
            Err(err) => {
                self.feed.reject(err.to_string());
            }
        }
        effects
    }

    pub(crate) fn refresh(&mut self) -> Vec<Effect> {
        match self.author.clone() {
            Some(author) => self.mount(&author),
            None => Vec::new(),
        }
    }

    pub(crate) fn load_more(&mut self) -> Vec<Effect> {
        if self.feed.loaded().is_none() {
            return Vec::new();
        }
        let Some(author) = self.author.clone() else {
            return Vec::new();
        };
        match self.loader.load_next() {
            Ok(Some(request)) => {
                self.load_more_error = None;
                self.dirty = true;
                vec![Effect::FetchPage {
                    generation: self.feed.generation(),
                    author,
                    request,
                }]
            }
            Ok(None) => Vec::new(),
            Err(err) => {
                curator_debug!("Load more ignored: {}", err);
                Vec::new()
            }
        }
    }

    pub(crate) fn apply_profile(&mut self, generation: Generation, result: Result<Profile, FetchError>) {
        if self.profile.resolve(generation, result) {
            self.dirty = true;
        } else {
            curator_debug!("Discarding stale profile result (generation {})", generation);
        }
    }

    pub(crate) fn apply_page(
        &mut self,
        generation: Generation,
        request: PageRequest,
        result: Result<Page<Curation>, FetchError>,
    ) -> Vec<Effect> {
        match self.loader.complete(&request, result) {
            Ok(PageOutcome::Stale) => Vec::new(),
            Ok(PageOutcome::Applied { added }) => {
                let items = self.loader.items().to_vec();
                let committed = match request.mode {
                    LoadMode::Replace => self.feed.resolve(generation, Ok(items)),
                    LoadMode::Append => self.feed.replace_loaded(generation, items),
                };
                if !committed {
                    curator_debug!("Page {} not committed (generation {})", request.page, generation);
                    return Vec::new();
                }
                curator_debug!("Page {} applied with {} items", request.page, added);
                self.load_more_error = None;
                self.dirty = true;
                self.enricher
                    .reconcile(self.loader.items())
                    .into_iter()
                    .map(|request| Effect::FetchPreview { request })
                    .collect()
            }
            Err(err) => {
                self.dirty = true;
                match request.mode {
                    LoadMode::Replace => {
                        self.feed.resolve(generation, Err(err));
                    }
                    LoadMode::Append => {
                        curator_warn!("Loading page {} failed: {}", request.page, err);
                        self.load_more_error = Some(err.message);
                    }
                }
                Vec::new()
            }
        }
    }

    pub(crate) fn apply_preview(&mut self, request: PreviewRequest, result: Result<LinkPreview, FetchError>) {
        match self.enricher.complete(&request, result) {
            EnrichOutcome::Merged => self.dirty = true,
            EnrichOutcome::Failed(err) => {
                curator_warn!("Preview for {} failed: {}", request.url, err);
            }
            EnrichOutcome::Stale => {}
        }
    }

    pub(crate) fn unmount(&mut self) {
        self.author = None;
        self.profile.invalidate();
        self.feed.invalidate();
        self.loader.reset();
        self.enricher.clear();
        self.load_more_error = None;
        self.dirty = true;
    }

    fn is_own_profile(&self) -> bool {
        match (self.session.username(), self.author.as_deref()) {
            (Some(member), Some(author)) => member == author,
            _ => false,
        }
    }

    fn row_view(&self, curation: &Curation) -> CurationRowView {
        let id = curation.item_id();
        CurationRowView {
            id: curation.id,
            title: curation.title.clone(),
            content: curation.content.clone(),
            created_at: curation.created_at.clone(),
            like_count: curation.like_count,
            comment_count: curation.comment_count,
            tags: curation.tags.iter().map(|tag| tag.name.clone()).collect(),
            links: curation
                .links()
                .into_iter()
                .map(|url| LinkView {
                    url: url.to_owned(),
                    preview: self.enricher.preview(&id, url).cloned(),
                })
                .collect(),
            previews: self.enricher.previews(&id).into_iter().cloned().collect(),
        }
    }
}
