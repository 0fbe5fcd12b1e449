use std::sync::Once;

use listings_core::{
    derive, update, ActionKind, ActionResult, AppState, BulkAction, CompanyId, Effect,
    FetchRequest, FilterSnapshot, ListingRecord, Msg, Page,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(listings_logging::initialize_for_tests);
}

fn single_fetch(effects: &[Effect]) -> FetchRequest {
    match effects {
        [Effect::FetchPage(request)] => request.clone(),
        other => panic!("expected one fetch effect, got {other:?}"),
    }
}

fn deliver(state: AppState, request: &FetchRequest, id: &str) -> AppState {
    let (state, _) = update(
        state,
        Msg::PageLoaded {
            request: request.clone(),
            result: Ok(Page {
                items: vec![ListingRecord {
                    id: id.to_string(),
                    payload: String::new(),
                }],
                page_index: request.page_index,
                has_more: true,
            }),
        },
    );
    state
}

/// Loads one page for each filter combination, ending on `status=open` for `company`.
fn warmed_state(company: &str) -> AppState {
    let mut state = AppState::new();
    for (scope, status) in [("7", "open"), (company, "closed"), (company, "open")] {
        let (next, company_effects) = update(state, Msg::CompanySelected(CompanyId::new(scope)));
        let (next, filter_effects) = update(
            next,
            Msg::FiltersChanged(FilterSnapshot::new().with("status", status)),
        );
        // The last issued fetch belongs to the active identity.
        let effects = if filter_effects.is_empty() {
            company_effects
        } else {
            filter_effects
        };
        let request = single_fetch(&effects);
        state = deliver(next, &request, &format!("{scope}-{status}"));
    }
    state
}

#[test]
fn successful_clear_invalidates_every_identity_of_the_company() {
    init_logging();
    let state = warmed_state("42");
    let seven = derive(&CompanyId::new("7"), &FilterSnapshot::new().with("status", "open"));
    let closed = derive(
        &CompanyId::new("42"),
        &FilterSnapshot::new().with("status", "closed"),
    );
    assert!(state.cache().contains(&closed));
    assert_eq!(state.cache().len(), 3);

    let (state, effects) = update(state, Msg::BulkActionClicked(BulkAction::Clear));
    assert_eq!(
        effects,
        vec![Effect::RunBulkAction {
            scope: CompanyId::new("42"),
            action: BulkAction::Clear,
        }]
    );
    assert_eq!(state.view().pending_actions, vec![BulkAction::Clear]);

    let (state, effects) = update(
        state,
        Msg::BulkActionDone(ActionResult::success(
            ActionKind::Cleared,
            CompanyId::new("42"),
        )),
    );
    let refetch = single_fetch(&effects);
    assert_eq!(refetch.page_index, 0);
    assert_eq!(Some(refetch.identity), state.active_identity());

    assert!(!state.cache().contains(&closed));
    assert!(state.cache().contains(&seven));
    assert!(state.view().items.is_empty());
    assert!(state.view().pending_actions.is_empty());
    assert_eq!(state.view().action_error, None);
}

#[test]
fn failed_action_leaves_cache_untouched() {
    init_logging();
    let state = warmed_state("42");
    let cache_before = state.cache().clone();

    let (state, _) = update(state, Msg::BulkActionClicked(BulkAction::Resync));
    let (state, effects) = update(
        state,
        Msg::BulkActionDone(ActionResult::failure(
            ActionKind::Synced,
            CompanyId::new("42"),
            "http status 500",
        )),
    );

    assert!(effects.is_empty());
    assert_eq!(state.cache(), &cache_before);
    let view = state.view();
    assert_eq!(view.action_error.as_deref(), Some("http status 500"));
    assert_eq!(view.items.len(), 1);
    assert!(view.pending_actions.is_empty());
}

#[test]
fn repeated_click_while_pending_issues_one_request() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::CompanySelected(CompanyId::new("42")));

    let (state, first) = update(state, Msg::BulkActionClicked(BulkAction::Publish));
    let (state, second) = update(state, Msg::BulkActionClicked(BulkAction::Publish));
    let (state, other) = update(state, Msg::BulkActionClicked(BulkAction::Clear));

    assert_eq!(first.len(), 1);
    assert!(second.is_empty());
    assert_eq!(other.len(), 1);
    assert!(state.bulk().is_pending(&CompanyId::new("42"), BulkAction::Publish));
    assert_eq!(
        state.view().pending_actions,
        vec![BulkAction::Clear, BulkAction::Publish]
    );
}

#[test]
fn action_without_company_is_ignored() {
    init_logging();
    let (mut state, effects) = update(AppState::new(), Msg::BulkActionClicked(BulkAction::Clear));

    assert!(effects.is_empty());
    assert!(!state.consume_dirty());
}

#[test]
fn success_for_another_company_does_not_refetch_active() {
    init_logging();
    let state = warmed_state("42");

    let (state, effects) = update(
        state,
        Msg::BulkActionDone(ActionResult::success(
            ActionKind::Synced,
            CompanyId::new("7"),
        )),
    );

    assert!(effects.is_empty());
    assert_eq!(state.cache().len(), 2);
    assert_eq!(state.view().items.len(), 1);
}

fn fail(state: AppState, company: &str, action: BulkAction) -> AppState {
    let (state, _) = update(
        state,
        Msg::BulkActionDone(ActionResult::failure(
            action.result_kind(),
            CompanyId::new(company),
            "http status 500",
        )),
    );
    state
}

#[test]
fn action_error_is_reported_only_for_its_company() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::CompanySelected(CompanyId::new("42")));
    let (state, _) = update(state, Msg::BulkActionClicked(BulkAction::Clear));
    let state = fail(state, "42", BulkAction::Clear);
    assert_eq!(state.view().action_error.as_deref(), Some("http status 500"));

    let (state, _) = update(state, Msg::CompanySelected(CompanyId::new("7")));
    assert_eq!(state.view().action_error, None);

    let (state, _) = update(state, Msg::CompanySelected(CompanyId::new("42")));
    assert_eq!(state.view().action_error.as_deref(), Some("http status 500"));
}

#[test]
fn starting_an_action_clears_only_its_company_error() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::CompanySelected(CompanyId::new("42")));
    let (state, _) = update(state, Msg::BulkActionClicked(BulkAction::Resync));
    let state = fail(state, "42", BulkAction::Resync);

    let (state, _) = update(state, Msg::CompanySelected(CompanyId::new("7")));
    let (state, effects) = update(state, Msg::BulkActionClicked(BulkAction::Publish));
    assert_eq!(effects.len(), 1);

    let forty_two = CompanyId::new("42");
    assert!(state.bulk().last_error(&forty_two).is_some());
    assert!(state.bulk().last_error(&CompanyId::new("7")).is_none());

    let (state, _) = update(state, Msg::CompanySelected(forty_two.clone()));
    let (state, _) = update(state, Msg::BulkActionClicked(BulkAction::Resync));
    assert!(state.bulk().last_error(&forty_two).is_none());
}
