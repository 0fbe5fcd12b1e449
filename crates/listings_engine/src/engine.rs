use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use listings_logging::{listings_debug, listings_info, listings_warn};
use tokio_util::sync::CancellationToken;

use crate::backend::{BackendSettings, ListingsBackend, ReqwestBackend};
use crate::{ActionKind, BackendError, EngineEvent, FailureKind, PageQuery, Ticket};

/// Time granted to running bulk actions when the engine shuts down.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

enum EngineCommand {
    FetchPage { ticket: Ticket, query: PageQuery },
    RunAction { company: String, kind: ActionKind },
    Shutdown,
}

/// Executes backend requests on a dedicated thread and reports results as
/// [`EngineEvent`]s. Requests run concurrently; callers correlate page
/// results through their ticket.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
    cancel: CancellationToken,
}

impl EngineHandle {
    pub fn new(settings: BackendSettings) -> Result<Self, EngineError> {
        let backend = ReqwestBackend::new(settings)?;
        Self::with_backend(Arc::new(backend))
    }

    pub fn with_backend(backend: Arc<dyn ListingsBackend>) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let cancel = CancellationToken::new();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;

        let worker_cancel = cancel.clone();
        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                if matches!(command, EngineCommand::Shutdown) {
                    break;
                }
                let backend = backend.clone();
                let event_tx = event_tx.clone();
                let cancel = worker_cancel.clone();
                runtime.spawn(async move {
                    handle_command(backend.as_ref(), command, event_tx, cancel).await;
                });
            }
            listings_info!("Engine stopping");
            runtime.shutdown_timeout(SHUTDOWN_GRACE);
        });

        Ok(Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
            cancel,
        })
    }

    pub fn fetch_page(&self, ticket: Ticket, query: PageQuery) {
        let _ = self.cmd_tx.send(EngineCommand::FetchPage { ticket, query });
    }

    pub fn run_action(&self, company: impl Into<String>, kind: ActionKind) {
        let _ = self.cmd_tx.send(EngineCommand::RunAction {
            company: company.into(),
            kind,
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }

    /// Cancels outstanding page fetches and stops accepting commands.
    /// Bulk actions already sent are given a grace period to finish.
    pub fn shutdown(&self) {
        self.cancel.cancel();
        let _ = self.cmd_tx.send(EngineCommand::Shutdown);
    }
}

async fn handle_command(
    backend: &dyn ListingsBackend,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
    cancel: CancellationToken,
) {
    match command {
        EngineCommand::FetchPage { ticket, query } => {
            listings_debug!(
                "Fetching page {} of {} (ticket {})",
                query.page_index,
                query.company,
                ticket
            );
            let result = tokio::select! {
                result = backend.fetch_page(&query) => result,
                () = cancel.cancelled() => Err(BackendError::new(FailureKind::Cancelled, "engine shut down")),
            };
            if let Err(err) = &result {
                listings_warn!("Page {} of {} failed: {}", query.page_index, query.company, err);
            }
            let _ = event_tx.send(EngineEvent::PageFetched { ticket, result });
        }
        EngineCommand::RunAction { company, kind } => {
            listings_info!("Running {} for {}", kind, company);
            let result = backend.run_action(&company, kind).await;
            if let Err(err) = &result {
                listings_warn!("{} for {} failed: {}", kind, company, err);
            }
            let _ = event_tx.send(EngineEvent::ActionCompleted {
                company,
                kind,
                result,
            });
        }
        EngineCommand::Shutdown => {}
    }
}
