use std::io;

use curator_core::{
    Curation, FetchError, Generation, LinkPreview, Page, PageRequest, PreviewRequest, Profile,
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    ProfileFetched {
        generation: Generation,
        result: Result<Profile, FetchError>,
    },
    PageFetched {
        generation: Generation,
        request: PageRequest,
        result: Result<Page<Curation>, FetchError>,
    },
    PreviewFetched {
        request: PreviewRequest,
        result: Result<LinkPreview, FetchError>,
    },
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start runtime: {0}")]
    Runtime(#[from] io::Error),
    #[error("failed to build http client: {0}")]
    Client(#[from] FetchError),
}
