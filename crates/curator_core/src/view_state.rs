use crate::FetchError;

/// Monotonic counter distinguishing successive fetch cycles.
pub type Generation = u64;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewState<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    Error(String),
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            ViewState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// What a page renders: spinner, error banner or content. Only the most
/// recent cycle may commit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AsyncViewState<T> {
    state: ViewState<T>,
    generation: Generation,
}

impl<T> AsyncViewState<T> {
    pub fn new() -> Self {
        Self {
            state: ViewState::Idle,
            generation: 0,
        }
    }

    /// Starts a new cycle. Any older cycle's result will be discarded.
    pub fn begin(&mut self) -> Generation {
        self.generation += 1;
        self.state = ViewState::Loading;
        self.generation
    }

    /// Commits a cycle's result. Returns false when the result is stale.
    pub fn resolve(&mut self, generation: Generation, result: Result<T, FetchError>) -> bool {
        if generation != self.generation || !self.state.is_loading() {
            return false;
        }
        self.state = match result {
            Ok(value) => ViewState::Loaded(value),
            Err(err) => ViewState::Error(err.message),
        };
        true
    }

    /// Starts a cycle that fails immediately, for input rejected before any
    /// fetch is issued.
    pub fn reject(&mut self, message: impl Into<String>) -> Generation {
        self.generation += 1;
        self.state = ViewState::Error(message.into());
        self.generation
    }

    /// Swaps the payload of an already-loaded current cycle.
    pub fn replace_loaded(&mut self, generation: Generation, value: T) -> bool {
        if generation != self.generation {
            return false;
        }
        match &mut self.state {
            ViewState::Loaded(current) => {
                *current = value;
                true
            }
            _ => false,
        }
    }

    /// Returns to idle and orphans whatever cycle is running.
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.state = ViewState::Idle;
    }

    pub fn state(&self) -> &ViewState<T> {
        &self.state
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn loaded(&self) -> Option<&T> {
        self.state.loaded()
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error()
    }
}
