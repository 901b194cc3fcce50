//! Curator core: pure feed state machines and view-model helpers.
mod effect;
mod enricher;
mod error;
mod loader;
mod model;
mod msg;
mod page;
mod session;
mod state;
mod update;
mod view_model;
mod view_state;

pub use effect::Effect;
pub use enricher::{normalize_url, EnrichOutcome, PreviewRequest, SecondaryResourceEnricher};
pub use error::{FailureKind, FetchError, LoadError};
pub use loader::{PageOutcome, PageRequest, PagedCollectionLoader};
pub use model::{
    Curation, CurationAuthor, CurationLink, Enrichable, ItemId, LinkPreview, Playlist,
    PlaylistItem, PlaylistItemType, Profile, Tag,
};
pub use msg::Msg;
pub use page::{LoadMode, Page};
pub use session::SessionContext;
pub use state::{FeedState, DEFAULT_PAGE_SIZE};
pub use update::update;
pub use view_model::{CurationRowView, FeedStatus, FeedViewModel, LinkView};
pub use view_state::{AsyncViewState, Generation, ViewState};
