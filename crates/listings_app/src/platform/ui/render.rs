use listings_core::{ListingRecord, ListingsViewModel};
use serde_json::Value;

use crate::platform::config::LoadMoreLabels;

/// Renders the view model as plain text lines.
pub fn render(view: &ListingsViewModel, labels: &LoadMoreLabels) -> Vec<String> {
    let mut lines = Vec::new();

    let Some(company) = &view.company else {
        lines.push("No company selected (type `company <id>`).".to_string());
        if !view.filters.is_empty() {
            lines.push(format!("Filters: {}", view.filters));
        }
        push_action_lines(view, &mut lines);
        return lines;
    };

    lines.push(format!(
        "Jobs for {} | filters: {} | loaded: {}",
        company,
        view.filters,
        view.items.len()
    ));

    if view.is_initial_load() {
        lines.push("Loading ...".to_string());
    } else {
        for (position, item) in view.items.iter().enumerate() {
            lines.push(format!("{:>4}. {}", position + 1, describe(item)));
        }
        if let Some(error) = &view.error {
            lines.push(format!("! Failed to load page: {error} (type `more` to retry)"));
        }
        lines.push(format!("[{}]", labels.label(view.load_more)));
    }

    push_action_lines(view, &mut lines);
    lines
}

fn push_action_lines(view: &ListingsViewModel, lines: &mut Vec<String>) {
    if !view.pending_actions.is_empty() {
        let running: Vec<String> = view
            .pending_actions
            .iter()
            .map(ToString::to_string)
            .collect();
        lines.push(format!("Running: {}", running.join(", ")));
    }
    if let Some(error) = &view.action_error {
        lines.push(format!("! Action failed: {error}"));
    }
}

/// `id` plus a title when the payload carries one.
fn describe(item: &ListingRecord) -> String {
    let title = serde_json::from_str::<Value>(&item.payload)
        .ok()
        .and_then(|payload| {
            ["title", "job_title", "name"]
                .iter()
                .find_map(|key| payload.get(*key).and_then(Value::as_str).map(str::to_string))
        });
    match title {
        Some(title) => format!("{} {}", item.id, title),
        None => item.id.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use listings_core::{BulkAction, CompanyId, FetchStatus, FilterSnapshot, LoadMoreState};
    use pretty_assertions::assert_eq;

    fn record(id: &str, payload: &str) -> ListingRecord {
        ListingRecord {
            id: id.to_string(),
            payload: payload.to_string(),
        }
    }

    #[test]
    fn renders_items_error_and_load_more_label() {
        let view = ListingsViewModel {
            company: Some(CompanyId::new("acme")),
            filters: FilterSnapshot::new().with("status", "open"),
            items: vec![
                record("j1", r#"{"id":"j1","title":"Rust dev"}"#),
                record("j2", "not json"),
            ],
            status: FetchStatus::Error,
            load_more: LoadMoreState::CanLoadMore,
            error: Some("http status 502".to_string()),
            pending_actions: vec![BulkAction::Resync],
            action_error: None,
            dirty: false,
        };

        assert_eq!(
            render(&view, &LoadMoreLabels::default()),
            vec![
                "Jobs for acme | filters: {status=open} | loaded: 2",
                "   1. j1 Rust dev",
                "   2. j2",
                "! Failed to load page: http status 502 (type `more` to retry)",
                "[Load more jobs]",
                "Running: resync",
            ]
        );
    }

    #[test]
    fn initial_load_hides_load_more_line() {
        let view = ListingsViewModel {
            company: Some(CompanyId::new("acme")),
            status: FetchStatus::Fetching,
            load_more: LoadMoreState::Loading,
            ..ListingsViewModel::default()
        };

        let lines = render(&view, &LoadMoreLabels::default());
        assert_eq!(lines[1], "Loading ...");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn without_company_reports_action_error() {
        let view = ListingsViewModel {
            action_error: Some("http status 500".to_string()),
            ..ListingsViewModel::default()
        };

        assert_eq!(
            render(&view, &LoadMoreLabels::default()),
            vec![
                "No company selected (type `company <id>`).",
                "! Action failed: http status 500",
            ]
        );
    }
}
