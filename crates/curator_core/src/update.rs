use crate::{Effect, FeedState, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: FeedState, msg: Msg) -> (FeedState, Vec<Effect>) {
    let effects = match msg {
        Msg::Mounted { author } => state.mount(&author),
        Msg::RefreshRequested => state.refresh(),
        Msg::LoadMoreRequested => state.load_more(),
        Msg::ProfileLoaded { generation, result } => {
            state.apply_profile(generation, result);
            Vec::new()
        }
        Msg::PageLoaded {
            generation,
            request,
            result,
        } => state.apply_page(generation, request, result),
        Msg::PreviewLoaded { request, result } => {
            state.apply_preview(request, result);
            Vec::new()
        }
        Msg::Unmounted => {
            state.unmount();
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
