use crate::{Curation, FetchError, Generation, LinkPreview, Page, PageRequest, PreviewRequest, Profile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// A profile page was opened for `author`.
    Mounted { author: String },
    /// User asked to reload from page 1 (refresh, tab switch, retry).
    RefreshRequested,
    /// Scroll reached the end of the list or "load more" was clicked.
    LoadMoreRequested,
    /// Engine completion for the profile header.
    ProfileLoaded {
        generation: Generation,
        result: Result<Profile, FetchError>,
    },
    /// Engine completion for a feed page.
    PageLoaded {
        generation: Generation,
        request: PageRequest,
        result: Result<Page<Curation>, FetchError>,
    },
    /// Engine completion for one link preview.
    PreviewLoaded {
        request: PreviewRequest,
        result: Result<LinkPreview, FetchError>,
    },
    /// The page was closed; late results must be ignored.
    Unmounted,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
