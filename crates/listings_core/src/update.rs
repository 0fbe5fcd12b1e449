use listings_logging::{listings_debug, listings_warn};

use crate::load_more::request_more;
use crate::{AppState, Effect, FetchRequest, Msg, PageOutcome};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::CompanySelected(company) => {
            if company.as_str().is_empty() || state.company() == Some(&company) {
                return (state, Vec::new());
            }
            state.set_company(company);
            state.mark_dirty();
            fetch_effects(state.activate_current())
        }
        Msg::FiltersChanged(filters) => {
            if *state.filters() == filters {
                return (state, Vec::new());
            }
            listings_debug!("Filters changed to {}", filters);
            state.set_filters(filters);
            state.mark_dirty();
            fetch_effects(state.activate_current())
        }
        Msg::LoadMoreClicked => {
            let Some(identity) = state.active_identity() else {
                return (state, Vec::new());
            };
            let request = request_more(&mut state.cache, &identity);
            if request.is_some() {
                state.mark_dirty();
            }
            fetch_effects(request)
        }
        Msg::ReloadClicked => {
            let Some(identity) = state.active_identity() else {
                return (state, Vec::new());
            };
            state.mark_dirty();
            fetch_effects(state.cache.invalidate(&identity))
        }
        Msg::BulkActionClicked(action) => {
            let Some(scope) = state.company().cloned() else {
                listings_warn!("Ignoring {}: no company selected", action);
                return (state, Vec::new());
            };
            if state.bulk.begin(&scope, action) {
                state.mark_dirty();
                vec![Effect::RunBulkAction { scope, action }]
            } else {
                Vec::new()
            }
        }
        Msg::PageLoaded { request, result } => {
            match state.cache.apply_page(&request, result) {
                PageOutcome::Appended | PageOutcome::Failed => state.mark_dirty(),
                PageOutcome::Discarded => {}
            }
            Vec::new()
        }
        Msg::BulkActionDone(result) => {
            let refetch = state.bulk.complete(&result, &mut state.cache);
            state.mark_dirty();
            fetch_effects(refetch)
        }
        Msg::RenderRequested => {
            state.mark_dirty();
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn fetch_effects(request: Option<FetchRequest>) -> Vec<Effect> {
    request.map(Effect::FetchPage).into_iter().collect()
}
