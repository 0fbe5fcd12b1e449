use crate::cache::{CacheSnapshot, FetchRequest, FetchStatus, PageCache};
use crate::identity::QueryIdentity;

/// What the "load more" affordance should offer for the active listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMoreState {
    #[default]
    CanLoadMore,
    Loading,
    Exhausted,
}

impl LoadMoreState {
    /// `Error` stays `CanLoadMore` so the same affordance doubles as retry.
    pub fn from_snapshot(snapshot: &CacheSnapshot) -> Self {
        if snapshot.status == FetchStatus::Fetching {
            LoadMoreState::Loading
        } else if !snapshot.has_more {
            LoadMoreState::Exhausted
        } else {
            LoadMoreState::CanLoadMore
        }
    }
}

/// Asks the cache for the next page unless loading is in progress or the
/// listing is exhausted.
pub fn request_more(cache: &mut PageCache, identity: &QueryIdentity) -> Option<FetchRequest> {
    match LoadMoreState::from_snapshot(&cache.snapshot(identity)) {
        LoadMoreState::CanLoadMore => cache.load_next(identity).1,
        LoadMoreState::Loading | LoadMoreState::Exhausted => None,
    }
}
