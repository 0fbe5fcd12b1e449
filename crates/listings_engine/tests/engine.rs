use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use listings_engine::{
    ActionAck, ActionKind, BackendError, EngineEvent, EngineHandle, FetchedPage, FetchedRecord,
    ListingsBackend, PageQuery,
};
use pretty_assertions::assert_eq;

#[derive(Default)]
struct FakeBackend {
    actions: Mutex<Vec<(String, ActionKind)>>,
}

#[async_trait::async_trait]
impl ListingsBackend for FakeBackend {
    async fn fetch_page(&self, query: &PageQuery) -> Result<FetchedPage, BackendError> {
        Ok(FetchedPage {
            records: vec![FetchedRecord {
                id: format!("{}-{}", query.company, query.page_index),
                payload: "{}".to_string(),
            }],
            page_index: query.page_index,
            has_more: query.page_index < 2,
        })
    }

    async fn run_action(&self, company: &str, kind: ActionKind) -> Result<ActionAck, BackendError> {
        self.actions
            .lock()
            .unwrap()
            .push((company.to_string(), kind));
        Ok(ActionAck {
            succeeded: true,
            message: None,
        })
    }
}

fn wait_for_events(engine: &EngineHandle, count: usize) -> Vec<EngineEvent> {
    let deadline = Instant::now() + Duration::from_secs(5);
    let mut events = Vec::new();
    while events.len() < count && Instant::now() < deadline {
        match engine.try_recv() {
            Some(event) => events.push(event),
            None => std::thread::sleep(Duration::from_millis(5)),
        }
    }
    events
}

#[test]
fn engine_reports_page_results_by_ticket() {
    listings_logging::initialize_for_tests();
    let engine = EngineHandle::with_backend(Arc::new(FakeBackend::default())).unwrap();

    engine.fetch_page(
        17,
        PageQuery {
            company: "acme".to_string(),
            filters: Vec::new(),
            page_index: 1,
            page_size: 10,
        },
    );

    let events = wait_for_events(&engine, 1);
    assert_eq!(events.len(), 1);
    match &events[0] {
        EngineEvent::PageFetched { ticket, result } => {
            assert_eq!(*ticket, 17);
            let page = result.as_ref().expect("page ok");
            assert_eq!(page.records[0].id, "acme-1");
            assert!(page.has_more);
        }
        other => panic!("unexpected event {other:?}"),
    }
    engine.shutdown();
}

#[test]
fn engine_runs_each_action_once() {
    listings_logging::initialize_for_tests();
    let backend = Arc::new(FakeBackend::default());
    let engine = EngineHandle::with_backend(backend.clone()).unwrap();

    engine.run_action("acme", ActionKind::Clear);
    engine.run_action("acme", ActionKind::Sync);

    let events = wait_for_events(&engine, 2);
    assert_eq!(events.len(), 2);
    for event in &events {
        match event {
            EngineEvent::ActionCompleted {
                company, result, ..
            } => {
                assert_eq!(company, "acme");
                assert!(result.as_ref().unwrap().succeeded);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    let mut actions = backend.actions.lock().unwrap().clone();
    actions.sort_by_key(|(_, kind)| format!("{kind}"));
    assert_eq!(
        actions,
        vec![
            ("acme".to_string(), ActionKind::Clear),
            ("acme".to_string(), ActionKind::Sync),
        ]
    );
    engine.shutdown();
}

#[test]
fn engine_accepts_nothing_after_shutdown() {
    let engine = EngineHandle::with_backend(Arc::new(FakeBackend::default())).unwrap();
    engine.shutdown();
    std::thread::sleep(Duration::from_millis(50));

    engine.run_action("acme", ActionKind::Publish);
    assert!(wait_for_events_briefly(&engine).is_none());
}

fn wait_for_events_briefly(engine: &EngineHandle) -> Option<EngineEvent> {
    std::thread::sleep(Duration::from_millis(100));
    engine.try_recv()
}
