mod common;

use std::time::{Duration, Instant};

use common::{ids, init_logging, page, single_fetch};
use listsync_core::{
    update, Continuation, ListQuery, ListState, LoadFailure, LoadFailureKind, LoadPhase, Msg,
    ProcessContext,
};
use pretty_assertions::assert_eq;

const ENDPOINT: &str = "/api/samples/";

fn state() -> ListState {
    ListState::with_search_debounce(ListQuery::new(ENDPOINT), Duration::from_millis(200))
}

fn type_search(state: ListState, term: &str, at: Instant) -> ListState {
    let (state, effects) = update(
        state,
        Msg::SearchInputChanged {
            term: term.to_string(),
            at,
        },
    );
    assert!(effects.is_empty(), "typing alone must not fetch");
    state
}

#[test]
fn search_change_discards_in_flight_response() {
    init_logging();
    let start = Instant::now();
    let (state, effects) = update(state(), Msg::Mounted);
    let (stale_id, _) = single_fetch(&effects);

    let state = type_search(state, "gold", start);
    let (state, effects) = update(
        state,
        Msg::Tick {
            now: start + Duration::from_millis(250),
        },
    );
    let (fresh_id, locator) = single_fetch(&effects);
    assert_eq!(locator, "/api/samples/?search=gold");
    assert_ne!(stale_id, fresh_id);

    // The superseded page 1 arrives late and must not overwrite anything.
    let (state, _) = update(
        state,
        Msg::PageLoaded {
            request_id: stale_id,
            page: page(100, Some("/api/samples/?page=2"), &[1, 2, 3]),
        },
    );
    assert!(state.entities().is_empty());
    assert_eq!(state.phase(), LoadPhase::LoadingInitial);
    assert_eq!(state.in_flight_request(), Some(fresh_id));

    let (state, _) = update(
        state,
        Msg::PageLoaded {
            request_id: fresh_id,
            page: page(1, None, &[9]),
        },
    );
    let view = state.view();
    assert_eq!(ids(&view.entities), vec!["9"]);
    assert_eq!(view.total_count, 1);
    assert_eq!(view.phase, LoadPhase::Exhausted);
}

#[test]
fn search_input_is_debounced_to_last_term() {
    init_logging();
    let start = Instant::now();
    let (state, _) = update(state(), Msg::Mounted);

    let state = type_search(state, "g", start);
    let state = type_search(state, "go", start + Duration::from_millis(50));
    let state = type_search(state, "gol", start + Duration::from_millis(100));

    // Quiet period measured from the last keystroke.
    let (state, effects) = update(
        state,
        Msg::Tick {
            now: start + Duration::from_millis(250),
        },
    );
    assert!(effects.is_empty());
    assert!(state.has_pending_search());

    let (state, effects) = update(
        state,
        Msg::Tick {
            now: start + Duration::from_millis(300),
        },
    );
    let (_, locator) = single_fetch(&effects);
    assert_eq!(locator, "/api/samples/?search=gol");
    assert_eq!(state.query().search.as_deref(), Some("gol"));
    assert!(!state.has_pending_search());
}

#[test]
fn unchanged_search_term_does_not_restart() {
    init_logging();
    let start = Instant::now();
    let query = ListQuery::new(ENDPOINT).with_search(Some("gold".to_string()));
    let (state, _) = update(
        ListState::with_search_debounce(query, Duration::from_millis(100)),
        Msg::Mounted,
    );

    let state = type_search(state, " gold ", start);
    let (state, effects) = update(
        state,
        Msg::Tick {
            now: start + Duration::from_millis(100),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.epoch(), 1);
}

#[test]
fn clearing_search_restarts_without_search_param() {
    init_logging();
    let start = Instant::now();
    let query = ListQuery::new(ENDPOINT).with_search(Some("gold".to_string()));
    let (state, _) = update(
        ListState::with_search_debounce(query, Duration::from_millis(100)),
        Msg::Mounted,
    );

    let state = type_search(state, "   ", start);
    let (state, effects) = update(
        state,
        Msg::Tick {
            now: start + Duration::from_millis(150),
        },
    );
    let (_, locator) = single_fetch(&effects);
    assert_eq!(locator, ENDPOINT);
    assert_eq!(state.query().search, None);
}

#[test]
fn failed_initial_fetch_keeps_list_empty_and_records_error() {
    init_logging();
    let (state, effects) = update(state(), Msg::Mounted);
    let (request_id, _) = single_fetch(&effects);

    let failure = LoadFailure::new(LoadFailureKind::Status(500), "Internal Server Error");
    let (state, effects) = update(
        state,
        Msg::PageFailed {
            request_id,
            failure: failure.clone(),
        },
    );

    assert!(effects.is_empty());
    let view = state.view();
    assert!(view.entities.is_empty());
    assert!(!view.is_loading);
    assert_eq!(view.phase, LoadPhase::Idle);
    assert_eq!(view.last_error, Some(failure));
    assert!(!state.is_fetching());
}

#[test]
fn trigger_after_initial_failure_retries_first_page() {
    init_logging();
    let (state, effects) = update(state(), Msg::Mounted);
    let (request_id, _) = single_fetch(&effects);
    let (state, _) = update(
        state,
        Msg::PageFailed {
            request_id,
            failure: LoadFailure::new(LoadFailureKind::Transport, "connection refused"),
        },
    );
    assert_eq!(state.continuation(), &Continuation::FirstPage);

    let (state, effects) = update(state, Msg::LoadMoreRequested);
    let (retry_id, locator) = single_fetch(&effects);
    assert_eq!(locator, ENDPOINT);
    assert_eq!(state.phase(), LoadPhase::LoadingInitial);

    let (state, _) = update(
        state,
        Msg::PageLoaded {
            request_id: retry_id,
            page: page(2, None, &[1, 2]),
        },
    );
    assert_eq!(state.last_error(), None);
    assert_eq!(ids(state.entities()), vec!["1", "2"]);
}

#[test]
fn failed_append_leaves_loaded_entities_untouched() {
    init_logging();
    let (state, effects) = update(state(), Msg::Mounted);
    let (request_id, _) = single_fetch(&effects);
    let (state, _) = update(
        state,
        Msg::PageLoaded {
            request_id,
            page: page(4, Some("/api/samples/?page=2"), &[1, 2]),
        },
    );
    let (state, effects) = update(state, Msg::LoadMoreRequested);
    let (request_id, _) = single_fetch(&effects);
    let (state, _) = update(
        state,
        Msg::PageFailed {
            request_id,
            failure: LoadFailure::new(LoadFailureKind::Decode, "missing field `count`"),
        },
    );

    assert_eq!(ids(state.entities()), vec!["1", "2"]);
    assert_eq!(state.total_count(), 4);
    assert_eq!(state.phase(), LoadPhase::Idle);

    // The same locator is requested again on the next trigger.
    let (_, effects) = update(state, Msg::LoadMoreRequested);
    let (_, locator) = single_fetch(&effects);
    assert_eq!(locator, "/api/samples/?page=2");
}

#[test]
fn restart_during_append_discards_append_response() {
    init_logging();
    let (state, effects) = update(state(), Msg::Mounted);
    let (request_id, _) = single_fetch(&effects);
    let (state, _) = update(
        state,
        Msg::PageLoaded {
            request_id,
            page: page(4, Some("/api/samples/?page=2"), &[1, 2]),
        },
    );
    let (state, effects) = update(state, Msg::LoadMoreRequested);
    let (append_id, _) = single_fetch(&effects);

    let (state, effects) = update(state, Msg::RestartRequested);
    let (restart_id, locator) = single_fetch(&effects);
    assert_eq!(locator, ENDPOINT);
    assert!(state.entities().is_empty());

    let (state, _) = update(
        state,
        Msg::PageLoaded {
            request_id: append_id,
            page: page(4, None, &[3, 4]),
        },
    );
    assert!(state.entities().is_empty());
    assert_eq!(state.in_flight_request(), Some(restart_id));
}

#[test]
fn process_change_restarts_with_scope() {
    init_logging();
    let (state, _) = update(state(), Msg::Mounted);
    let (state, effects) = update(
        state,
        Msg::ProcessChanged(Some(ProcessContext::new("12"))),
    );
    let (_, locator) = single_fetch(&effects);
    assert_eq!(locator, "/api/samples/?process=12");
    assert_eq!(state.epoch(), 2);
}

#[test]
fn query_change_while_unmounted_is_deferred_until_mount() {
    init_logging();
    let query = ListQuery::new("/api/objects/").with_search(Some("bolt".to_string()));
    let (state, effects) = update(state(), Msg::QueryChanged(query.clone()));
    assert!(effects.is_empty());
    assert_eq!(state.query(), &query);

    let (_, effects) = update(state, Msg::Mounted);
    let (_, locator) = single_fetch(&effects);
    assert_eq!(locator, "/api/objects/?search=bolt");
}

#[test]
fn unmount_discards_outstanding_response_and_stops_triggers() {
    init_logging();
    let (state, effects) = update(state(), Msg::Mounted);
    let (request_id, _) = single_fetch(&effects);
    let (state, _) = update(state, Msg::Unmounted);
    assert!(!state.is_fetching());

    let (state, _) = update(
        state,
        Msg::PageLoaded {
            request_id,
            page: page(1, None, &[1]),
        },
    );
    assert!(state.entities().is_empty());

    let (state, effects) = update(state, Msg::LoadMoreRequested);
    assert!(effects.is_empty());
    assert!(!state.is_mounted());
}
