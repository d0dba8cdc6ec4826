use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use listsync_core::{Effect, LoadFailure, LoadFailureKind, Msg};
use listsync_engine::{EngineEvent, EngineHandle, FailureKind, FetchError, FetchSettings};
use listsync_logging::{sync_info, sync_warn};

use super::HostEvent;

/// Executes core effects on the engine and feeds results back as messages.
pub struct EffectRunner {
    engine: EngineHandle,
    host_tx: mpsc::Sender<HostEvent>,
}

impl EffectRunner {
    pub fn new(
        settings: FetchSettings,
        host_tx: mpsc::Sender<HostEvent>,
    ) -> Result<Self, FetchError> {
        let engine = EngineHandle::new(settings)?;
        Ok(Self::with_engine(engine, host_tx))
    }

    pub fn with_engine(engine: EngineHandle, host_tx: mpsc::Sender<HostEvent>) -> Self {
        let runner = Self { engine, host_tx };
        runner.spawn_event_loop(runner.host_tx.clone());
        runner
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchPage {
                    request_id,
                    locator,
                    mode,
                } => {
                    sync_info!(
                        "FetchPage request_id={} mode={:?} locator={}",
                        request_id,
                        mode,
                        locator
                    );
                    if let Err(err) = self.engine.enqueue(request_id, locator) {
                        // Report it like any failed fetch so the in-flight guard is released.
                        let msg = map_event(EngineEvent::PageFetched {
                            request_id,
                            result: Err(err),
                        });
                        let _ = self.host_tx.send(HostEvent::Msg(msg));
                    }
                }
            }
        }
    }

    pub fn stop(&self) {
        self.engine.stop();
    }

    fn spawn_event_loop(&self, host_tx: mpsc::Sender<HostEvent>) {
        let engine = self.engine.clone();
        thread::spawn(move || {
            while !engine.is_stopped() {
                let Some(event) = engine.recv_timeout(Duration::from_millis(50)) else {
                    continue;
                };
                if host_tx.send(HostEvent::Msg(map_event(event))).is_err() {
                    break;
                }
            }
        });
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::PageFetched { request_id, result } => match result {
            Ok(page) => Msg::PageLoaded { request_id, page },
            Err(err) => {
                sync_warn!("Request {} failed: {}", request_id, err);
                Msg::PageFailed {
                    request_id,
                    failure: map_failure(err),
                }
            }
        },
    }
}

fn map_failure(err: FetchError) -> LoadFailure {
    let kind = match err.kind {
        FailureKind::HttpStatus(code) => LoadFailureKind::Status(code),
        FailureKind::Decode | FailureKind::TooLarge { .. } => LoadFailureKind::Decode,
        FailureKind::InvalidLocator
        | FailureKind::Timeout
        | FailureKind::Network
        | FailureKind::Unavailable
        | FailureKind::Aborted => LoadFailureKind::Transport,
    };
    LoadFailure::new(kind, err.message)
}
