use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use listsync_logging::{sync_error, sync_info, sync_warn};
use tokio_util::sync::CancellationToken;

use crate::fetch::{FetchSettings, Fetcher, ReqwestFetcher};
use crate::{EngineEvent, FailureKind, FetchError, RequestId};

enum EngineCommand {
    Fetch { request_id: RequestId, locator: String },
    Stop,
}

/// Runs page fetches on a background tokio runtime.
///
/// Responses come back in completion order; the caller decides which ones
/// are still relevant.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
    cancel: CancellationToken,
}

impl EngineHandle {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let fetcher = ReqwestFetcher::new(settings)?;
        Ok(Self::with_fetcher(Arc::new(fetcher)))
    }

    pub fn with_fetcher(fetcher: Arc<dyn Fetcher>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let cancel = CancellationToken::new();
        let worker_cancel = cancel.clone();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    sync_error!("Failed to start fetch runtime: {}", err);
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Fetch {
                        request_id,
                        locator,
                    } => {
                        let fetcher = fetcher.clone();
                        let event_tx = event_tx.clone();
                        let cancel = worker_cancel.clone();
                        runtime.spawn(handle_fetch(fetcher, request_id, locator, event_tx, cancel));
                    }
                    EngineCommand::Stop => {
                        worker_cancel.cancel();
                        break;
                    }
                }
            }
            sync_info!("Fetch engine stopped");
        });

        Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
            cancel,
        }
    }

    /// Queues a fetch. Fails when the worker can no longer run it, in which
    /// case no event will ever arrive for `request_id`.
    pub fn enqueue(
        &self,
        request_id: RequestId,
        locator: impl Into<String>,
    ) -> Result<(), FetchError> {
        if self.is_stopped() {
            return Err(FetchError::new(
                FailureKind::Unavailable,
                "fetch engine is stopped",
            ));
        }
        self.cmd_tx
            .send(EngineCommand::Fetch {
                request_id,
                locator: locator.into(),
            })
            .map_err(|_| {
                FetchError::new(FailureKind::Unavailable, "fetch engine worker has exited")
            })
    }

    /// Drops outstanding fetches and shuts the worker down.
    pub fn stop(&self) {
        self.cancel.cancel();
        let _ = self.cmd_tx.send(EngineCommand::Stop);
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.recv_timeout(timeout).ok()
    }
}

/// Runs one fetch as its own task so a panic still yields a `PageFetched`.
async fn handle_fetch(
    fetcher: Arc<dyn Fetcher>,
    request_id: RequestId,
    locator: String,
    event_tx: mpsc::Sender<EngineEvent>,
    cancel: CancellationToken,
) {
    let mut task = tokio::spawn(async move { fetcher.fetch_page(&locator).await });
    let Some(joined) = cancel.run_until_cancelled(&mut task).await else {
        task.abort();
        return;
    };
    let result = joined.unwrap_or_else(|err| {
        sync_warn!("Fetch task for request {} failed: {}", request_id, err);
        Err(FetchError::new(FailureKind::Aborted, err.to_string()))
    });
    let _ = event_tx.send(EngineEvent::PageFetched { request_id, result });
}
