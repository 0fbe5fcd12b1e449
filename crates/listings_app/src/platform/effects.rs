use std::collections::HashMap;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use listings_core::{
    ActionResult, BulkAction, Effect, FetchFailure, FetchRequest, ListingRecord, Msg, Page,
};
use listings_engine::{
    ActionAck, ActionKind, BackendError, EngineEvent, EngineHandle, FetchedPage, PageQuery,
    Ticket,
};
use listings_logging::{listings_debug, listings_info, listings_warn};

use super::app::Inbox;

/// Executes core effects on the engine and feeds engine events back as messages.
pub struct EffectRunner {
    engine: EngineHandle,
    in_flight: Arc<Mutex<HashMap<Ticket, FetchRequest>>>,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, inbox: mpsc::Sender<Inbox>) -> Self {
        let runner = Self {
            engine,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        };
        runner.spawn_event_loop(inbox);
        runner
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchPage(request) => {
                    let ticket = request.ticket.value();
                    listings_info!(
                        "FetchPage ticket={} page={} identity={}",
                        ticket,
                        request.page_index,
                        request.identity
                    );
                    let query = to_query(&request);
                    if let Ok(mut in_flight) = self.in_flight.lock() {
                        in_flight.insert(ticket, request);
                    }
                    self.engine.fetch_page(ticket, query);
                }
                Effect::RunBulkAction { scope, action } => {
                    listings_info!("RunBulkAction action={} company={}", action, scope);
                    self.engine.run_action(scope.as_str(), to_action_kind(action));
                }
            }
        }
    }

    pub fn shutdown(&self) {
        self.engine.shutdown();
    }

    fn spawn_event_loop(&self, inbox: mpsc::Sender<Inbox>) {
        let engine = self.engine.clone();
        let in_flight = self.in_flight.clone();
        thread::spawn(move || loop {
            let Some(event) = engine.try_recv() else {
                thread::sleep(Duration::from_millis(20));
                continue;
            };
            let msg = match event {
                EngineEvent::PageFetched { ticket, result } => {
                    let request = in_flight
                        .lock()
                        .ok()
                        .and_then(|mut in_flight| in_flight.remove(&ticket));
                    let Some(request) = request else {
                        listings_warn!("Result for unknown ticket {} dropped", ticket);
                        continue;
                    };
                    Msg::PageLoaded {
                        result: to_page_result(&request, result),
                        request,
                    }
                }
                EngineEvent::ActionCompleted {
                    company,
                    kind,
                    result,
                } => Msg::BulkActionDone(to_action_result(&company, kind, result)),
            };
            if inbox.send(Inbox::Dispatch(msg)).is_err() {
                listings_debug!("Dispatch loop gone; effect pump exiting");
                break;
            }
        });
    }
}

fn to_query(request: &FetchRequest) -> PageQuery {
    PageQuery {
        company: request.identity.scope().as_str().to_string(),
        filters: request
            .identity
            .filters()
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect(),
        page_index: request.page_index,
        page_size: request.page_size,
    }
}

fn to_action_kind(action: BulkAction) -> ActionKind {
    match action {
        BulkAction::Clear => ActionKind::Clear,
        BulkAction::Resync => ActionKind::Sync,
        BulkAction::Publish => ActionKind::Publish,
    }
}

fn to_bulk_action(kind: ActionKind) -> BulkAction {
    match kind {
        ActionKind::Clear => BulkAction::Clear,
        ActionKind::Sync => BulkAction::Resync,
        ActionKind::Publish => BulkAction::Publish,
    }
}

fn to_page_result(
    request: &FetchRequest,
    result: Result<FetchedPage, BackendError>,
) -> Result<Page, FetchFailure> {
    let fetched = result.map_err(|err| FetchFailure::new(err.to_string()))?;
    Ok(Page {
        items: fetched
            .records
            .into_iter()
            .map(|record| ListingRecord {
                id: record.id,
                payload: record.payload,
            })
            .collect(),
        page_index: request.page_index,
        has_more: fetched.has_more,
    })
}

fn to_action_result(
    company: &str,
    kind: ActionKind,
    result: Result<ActionAck, BackendError>,
) -> ActionResult {
    let kind = to_bulk_action(kind).result_kind();
    let scope = company.into();
    match result {
        Ok(ActionAck {
            succeeded: true, ..
        }) => ActionResult::success(kind, scope),
        Ok(ActionAck { message, .. }) => ActionResult::failure(
            kind,
            scope,
            message.unwrap_or_else(|| "backend reported failure".to_string()),
        ),
        Err(err) => ActionResult::failure(kind, scope, err.to_string()),
    }
}
