use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use curator_core::{Generation, PageRequest, PreviewRequest};
use curator_logging::curator_debug;
use futures_util::stream::{self, StreamExt};
use tokio::sync::Semaphore;

use crate::api::{ApiSettings, CurationApi, ReqwestCurationApi};
use crate::{EngineError, EngineEvent};

enum EngineCommand {
    FetchProfile {
        generation: Generation,
        username: String,
    },
    FetchCurrentMember {
        generation: Generation,
    },
    FetchPage {
        generation: Generation,
        author: String,
        request: PageRequest,
    },
    FetchPreviews {
        requests: Vec<PreviewRequest>,
    },
}

/// Runs fetches on a background tokio runtime; completions come back as
/// [`EngineEvent`]s in whatever order they finish. At most
/// `max_concurrent_previews` preview fetches run at once across all batches.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: ApiSettings) -> Result<Self, EngineError> {
        let max_concurrent_previews = settings.max_concurrent_previews;
        let api = ReqwestCurationApi::new(settings)?;
        Self::with_api(Arc::new(api), max_concurrent_previews)
    }

    pub fn with_api(
        api: Arc<dyn CurationApi>,
        max_concurrent_previews: usize,
    ) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        let preview_permits = Arc::new(Semaphore::new(max_concurrent_previews.max(1)));

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let api = api.clone();
                let event_tx = event_tx.clone();
                let preview_permits = preview_permits.clone();
                runtime.spawn(async move {
                    handle_command(api.as_ref(), command, event_tx, &preview_permits).await;
                });
            }
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn fetch_profile(&self, generation: Generation, username: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::FetchProfile {
            generation,
            username: username.into(),
        });
    }

    pub fn fetch_current_member(&self, generation: Generation) {
        let _ = self
            .cmd_tx
            .send(EngineCommand::FetchCurrentMember { generation });
    }

    pub fn fetch_page(&self, generation: Generation, author: impl Into<String>, request: PageRequest) {
        let _ = self.cmd_tx.send(EngineCommand::FetchPage {
            generation,
            author: author.into(),
            request,
        });
    }

    pub fn fetch_previews(&self, requests: Vec<PreviewRequest>) {
        if requests.is_empty() {
            return;
        }
        let _ = self.cmd_tx.send(EngineCommand::FetchPreviews { requests });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    api: &dyn CurationApi,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
    preview_permits: &Semaphore,
) {
    match command {
        EngineCommand::FetchProfile {
            generation,
            username,
        } => {
            let result = api.fetch_profile(&username).await;
            let _ = event_tx.send(EngineEvent::ProfileFetched { generation, result });
        }
        EngineCommand::FetchCurrentMember { generation } => {
            let result = api.fetch_current_member().await;
            let _ = event_tx.send(EngineEvent::ProfileFetched { generation, result });
        }
        EngineCommand::FetchPage {
            generation,
            author,
            request,
        } => {
            let result = api
                .fetch_curation_page(&author, request.page, request.size)
                .await;
            let _ = event_tx.send(EngineEvent::PageFetched {
                generation,
                request,
                result,
            });
        }
        EngineCommand::FetchPreviews { requests } => {
            curator_debug!("Fetching {} previews", requests.len());
            stream::iter(requests)
                .for_each_concurrent(None, |request| {
                    let event_tx = event_tx.clone();
                    async move {
                        // the semaphore is never closed
                        let _permit = preview_permits.acquire().await;
                        let result = api.fetch_link_preview(&request.url).await;
                        let _ = event_tx.send(EngineEvent::PreviewFetched { request, result });
                    }
                })
                .await;
        }
    }
}
