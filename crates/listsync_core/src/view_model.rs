use crate::{Entity, ListQuery, LoadFailure, LoadPhase};

/// What a host view renders. `request_restart()` is [`crate::Msg::RestartRequested`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListViewModel {
    pub query: ListQuery,
    pub entities: Vec<Entity>,
    pub total_count: u64,
    pub is_loading: bool,
    pub phase: LoadPhase,
    pub has_more: bool,
    pub epoch: u64,
    pub last_error: Option<LoadFailure>,
    pub dirty: bool,
}

impl ListViewModel {
    pub fn loaded_count(&self) -> usize {
        self.entities.len()
    }
}
