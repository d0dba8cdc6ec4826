use listsync_logging::with_request_context;

use crate::{Effect, ListState, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: ListState, msg: Msg) -> (ListState, Vec<Effect>) {
    let effect = match msg {
        Msg::Mounted => state.mount(),
        Msg::Unmounted => {
            state.unmount();
            None
        }
        Msg::RestartRequested => state.request_restart(),
        Msg::QueryChanged(query) => {
            let search = query.search.clone();
            let query = query.with_search(search);
            // An explicit query supersedes whatever the user was still typing.
            state.search_debounce_mut().cancel();
            state.change_query(query)
        }
        Msg::OrderingChanged(ordering) => {
            let query = state.query().clone().with_ordering(ordering);
            state.change_query(query)
        }
        Msg::ProcessChanged(process) => {
            let query = state.query().clone().with_process(process);
            state.change_query(query)
        }
        Msg::SearchInputChanged { term, at } => {
            state.search_debounce_mut().push(term, at);
            None
        }
        Msg::Tick { now } => match state.search_debounce_mut().poll(now) {
            Some(term) => {
                let query = state.query().clone().with_search(Some(term));
                state.change_query(query)
            }
            None => None,
        },
        Msg::LoadMoreRequested => state.request_more(),
        Msg::PageLoaded { request_id, page } => {
            with_request_context(request_id, || state.apply_page(request_id, page));
            None
        }
        Msg::PageFailed {
            request_id,
            failure,
        } => {
            with_request_context(request_id, || state.apply_failure(request_id, failure));
            None
        }
    };

    (state, effect.into_iter().collect())
}
