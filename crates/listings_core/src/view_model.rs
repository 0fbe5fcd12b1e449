use crate::{BulkAction, CompanyId, FetchStatus, FilterSnapshot, ListingRecord, LoadMoreState};

/// Everything the presentation layer reads about the current listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListingsViewModel {
    pub company: Option<CompanyId>,
    pub filters: FilterSnapshot,
    pub items: Vec<ListingRecord>,
    pub status: FetchStatus,
    pub load_more: LoadMoreState,
    /// Last page failure; previously loaded items stay in `items`.
    pub error: Option<String>,
    pub pending_actions: Vec<BulkAction>,
    pub action_error: Option<String>,
    pub dirty: bool,
}

impl ListingsViewModel {
    /// First page still loading, nothing to show yet.
    pub fn is_initial_load(&self) -> bool {
        self.status == FetchStatus::Fetching && self.items.is_empty()
    }
}
