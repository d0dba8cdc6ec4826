use std::time::Instant;

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// The host view appeared; loads page 1 of the current query.
    Mounted,
    /// The host view went away; outstanding responses are discarded.
    Unmounted,
    /// Host asked for a fresh load of the current query.
    RestartRequested,
    /// Host replaced the whole query.
    QueryChanged(crate::ListQuery),
    /// User picked a new ordering key, or cleared it.
    OrderingChanged(Option<crate::Ordering>),
    /// Host switched the process scope.
    ProcessChanged(Option<crate::ProcessContext>),
    /// User edited the search box. Applied after the debounce interval.
    SearchInputChanged { term: String, at: Instant },
    /// Clock tick used to flush debounced input.
    Tick { now: Instant },
    /// A trigger source asked for the next page.
    LoadMoreRequested,
    /// Engine delivered a page.
    PageLoaded {
        request_id: crate::RequestId,
        page: crate::PageEnvelope,
    },
    /// Engine failed to deliver a page.
    PageFailed {
        request_id: crate::RequestId,
        failure: crate::LoadFailure,
    },
}
