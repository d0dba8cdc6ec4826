//! Listsync core: pure list-synchronization state machine and view-model helpers.
mod accumulate;
mod config;
mod continuation;
mod effect;
mod envelope;
mod msg;
mod query;
mod state;
mod update;
mod view_model;

pub mod debounce;
pub mod flow;
pub mod trigger;

pub use accumulate::{Accumulated, MergeMode};
pub use config::{ListConfig, PageStrategy};
pub use continuation::Continuation;
pub use effect::Effect;
pub use envelope::{Entity, PageEnvelope};
pub use msg::Msg;
pub use query::{
    normalize_search, Direction, ListQuery, Ordering, ProcessContext, ORDERING_PARAM,
    PROCESS_PARAM, SEARCH_PARAM,
};
pub use state::{ListState, LoadFailure, LoadFailureKind, LoadPhase, RequestId};
pub use update::update;
pub use view_model::ListViewModel;
