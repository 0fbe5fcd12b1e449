#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Operator picked the company whose listings are shown.
    CompanySelected(crate::CompanyId),
    /// Filter store published a new snapshot.
    FiltersChanged(crate::FilterSnapshot),
    /// Operator asked for the next page (also retries a failed page).
    LoadMoreClicked,
    /// Operator asked to drop the cached pages and start over.
    ReloadClicked,
    /// Operator triggered a bulk action for the current company.
    BulkActionClicked(crate::BulkAction),
    /// Engine finished a page request.
    PageLoaded {
        request: crate::FetchRequest,
        result: Result<crate::Page, crate::FetchFailure>,
    },
    /// Engine finished a bulk action.
    BulkActionDone(crate::ActionResult),
    /// Operator asked to see the current listing again.
    RenderRequested,
    /// Periodic tick from the dispatch loop.
    Tick,
    /// Fallback for unrecognized input.
    NoOp,
}
