use crate::accumulate::MergeMode;
use crate::RequestId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Issue one GET for `locator` and report back under `request_id`.
    FetchPage {
        request_id: RequestId,
        locator: String,
        mode: MergeMode,
    },
}

impl Effect {
    pub fn locator(&self) -> &str {
        match self {
            Effect::FetchPage { locator, .. } => locator,
        }
    }
}
