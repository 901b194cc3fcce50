use curator_logging::curator_debug;

use crate::{FetchError, LoadError, LoadMode, Page};

/// A page fetch the loader wants executed. Hand it back to
/// [`PagedCollectionLoader::complete`] together with the fetch result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub mode: LoadMode,
    pub epoch: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    Applied { added: usize },
    /// The request predates a `reset()` or is not the outstanding one.
    Stale,
}

/// Page-by-page accumulation of a homogeneous collection.
///
/// The loader never performs IO itself: `load_page` returns the request to
/// execute and `complete` merges its result. At most one request is
/// outstanding at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagedCollectionLoader<T> {
    items: Vec<T>,
    page_size: u32,
    current_page: u32,
    is_last: bool,
    pending: Option<PageRequest>,
    epoch: u64,
}

impl<T> PagedCollectionLoader<T> {
    pub fn new(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            page_size: page_size.max(1),
            current_page: 0,
            is_last: false,
            pending: None,
            epoch: 0,
        }
    }

    pub fn load_page(&mut self, page_number: u32, mode: LoadMode) -> Result<PageRequest, LoadError> {
        if page_number == 0 {
            return Err(LoadError::InvalidPage);
        }
        if self.pending.is_some() {
            return Err(LoadError::Busy);
        }
        let request = PageRequest {
            page: page_number,
            size: self.page_size,
            mode,
            epoch: self.epoch,
        };
        self.pending = Some(request);
        Ok(request)
    }

    /// Requests the page after the last one applied, or `None` once the
    /// collection is exhausted.
    pub fn load_next(&mut self) -> Result<Option<PageRequest>, LoadError> {
        if !self.has_more() {
            return Ok(None);
        }
        self.load_page(self.current_page + 1, LoadMode::Append)
            .map(Some)
    }

    /// Merges the result of `request`. A failed fetch leaves the collection
    /// untouched and hands the error back.
    pub fn complete(
        &mut self,
        request: &PageRequest,
        result: Result<Page<T>, FetchError>,
    ) -> Result<PageOutcome, FetchError> {
        if self.pending.as_ref() != Some(request) {
            curator_debug!(
                "Discarding stale page {} (epoch {}, current {})",
                request.page,
                request.epoch,
                self.epoch
            );
            return Ok(PageOutcome::Stale);
        }
        self.pending = None;

        let page = result?;
        let added = page.items.len();
        match request.mode {
            LoadMode::Replace => self.items = page.items,
            LoadMode::Append => self.items.extend(page.items),
        }
        self.current_page = request.page;
        // Exhaustion is sticky until reset().
        self.is_last |= page.is_last;
        Ok(PageOutcome::Applied { added })
    }

    pub fn has_more(&self) -> bool {
        !self.is_last
    }

    pub fn reset(&mut self) {
        self.items.clear();
        self.current_page = 0;
        self.is_last = false;
        self.pending = None;
        self.epoch += 1;
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&PageRequest> {
        self.pending.as_ref()
    }
}
