#![allow(dead_code)]

use std::sync::Once;

use listsync_core::{Effect, Entity, PageEnvelope, RequestId};
use serde_json::json;

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(listsync_logging::initialize_for_tests);
}

pub fn entity(id: u64) -> Entity {
    Entity::new(json!({ "id": id, "name": format!("sample-{id}") }))
}

pub fn page(count: u64, next: Option<&str>, ids: &[u64]) -> PageEnvelope {
    PageEnvelope {
        count,
        next: next.map(ToOwned::to_owned),
        previous: None,
        results: ids.iter().copied().map(entity).collect(),
    }
}

/// The single fetch an update emitted.
pub fn single_fetch(effects: &[Effect]) -> (RequestId, String) {
    assert_eq!(effects.len(), 1, "expected exactly one effect: {effects:?}");
    match &effects[0] {
        Effect::FetchPage {
            request_id,
            locator,
            ..
        } => (*request_id, locator.clone()),
    }
}

pub fn ids(entities: &[Entity]) -> Vec<String> {
    entities.iter().filter_map(Entity::id).collect()
}
