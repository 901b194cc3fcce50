use crate::{Generation, PageRequest, PreviewRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchProfile {
        generation: Generation,
        username: String,
    },
    FetchPage {
        generation: Generation,
        author: String,
        request: PageRequest,
    },
    FetchPreview { request: PreviewRequest },
}
