use std::time::Duration;

use curator_core::{Effect, Generation, Msg, PreviewRequest};
use curator_engine::{ApiSettings, EngineError, EngineEvent, EngineHandle};
use curator_logging::{curator_debug, curator_warn};

/// Turns controller effects into engine commands and engine events back
/// into controller messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: ApiSettings) -> Result<Self, EngineError> {
        Ok(Self {
            engine: EngineHandle::new(settings)?,
        })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        let mut previews = Vec::new();
        for effect in effects {
            match effect {
                Effect::FetchProfile {
                    generation,
                    username,
                } => {
                    curator_debug!("FetchProfile generation={} username={}", generation, username);
                    self.engine.fetch_profile(generation, username);
                }
                Effect::FetchPage {
                    generation,
                    author,
                    request,
                } => {
                    curator_debug!(
                        "FetchPage generation={} author={} page={} mode={:?}",
                        generation,
                        author,
                        request.page,
                        request.mode
                    );
                    self.engine.fetch_page(generation, author, request);
                }
                Effect::FetchPreview { request } => previews.push(request),
            }
        }
        // one batch so the engine bounds their concurrency together
        self.engine.fetch_previews(previews);
    }

    pub fn fetch_previews(&self, requests: Vec<PreviewRequest>) {
        self.engine.fetch_previews(requests);
    }

    pub fn fetch_current_member(&self, generation: Generation) {
        self.engine.fetch_current_member(generation);
    }

    pub fn recv_event(&self, timeout: Duration) -> Option<EngineEvent> {
        self.engine.recv_timeout(timeout)
    }

    /// Waits up to `timeout` for the next completion.
    pub fn recv(&self, timeout: Duration) -> Option<Msg> {
        self.recv_event(timeout).map(to_msg)
    }
}

pub(crate) fn to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::ProfileFetched { generation, result } => {
            if let Err(err) = &result {
                curator_warn!("Profile fetch failed: {} ({})", err, err.kind);
            }
            Msg::ProfileLoaded { generation, result }
        }
        EngineEvent::PageFetched {
            generation,
            request,
            result,
        } => {
            if let Err(err) = &result {
                curator_warn!("Page {} failed: {} ({})", request.page, err, err.kind);
            }
            Msg::PageLoaded {
                generation,
                request,
                result,
            }
        }
        EngineEvent::PreviewFetched { request, result } => {
            if let Err(err) = &result {
                curator_warn!("Preview of {} failed: {}", request.url, err);
            }
            Msg::PreviewLoaded { request, result }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curator_core::{FetchError, ItemId, LinkPreview};

    #[test]
    fn preview_event_becomes_preview_message() {
        let request = PreviewRequest {
            item_id: ItemId::Int(3),
            url: "https://a.example".to_string(),
            key: "https://a.example".to_string(),
            epoch: 0,
        };
        let msg = to_msg(EngineEvent::PreviewFetched {
            request: request.clone(),
            result: Ok(LinkPreview::default()),
        });
        assert_eq!(
            msg,
            Msg::PreviewLoaded {
                request,
                result: Ok(LinkPreview::default())
            }
        );
    }

    #[test]
    fn profile_failure_keeps_generation() {
        let msg = to_msg(EngineEvent::ProfileFetched {
            generation: 4,
            result: Err(FetchError::transport("offline")),
        });
        assert!(matches!(msg, Msg::ProfileLoaded { generation: 4, result: Err(_) }));
    }
}
