//! Listings core: pure state machine for the paginated listing cache.
mod bulk;
mod cache;
mod effect;
mod identity;
mod load_more;
mod msg;
mod state;
mod update;
mod view_model;

pub use bulk::{ActionError, ActionKind, ActionResult, BulkAction, BulkCoordinator};
pub use cache::{
    CacheSnapshot, FetchFailure, FetchRequest, FetchStatus, FetchTicket, ListingRecord, Page,
    PageCache, PageOutcome, DEFAULT_PAGE_SIZE,
};
pub use effect::Effect;
pub use identity::{derive, CompanyId, FilterSnapshot, QueryIdentity};
pub use load_more::{request_more, LoadMoreState};
pub use msg::Msg;
pub use state::AppState;
pub use update::update;
pub use view_model::ListingsViewModel;
