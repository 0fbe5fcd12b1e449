use crate::identity::derive;
use crate::load_more::LoadMoreState;
use crate::view_model::ListingsViewModel;
use crate::{BulkCoordinator, CompanyId, FetchRequest, FilterSnapshot, PageCache, QueryIdentity};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    company: Option<CompanyId>,
    filters: FilterSnapshot,
    pub(crate) cache: PageCache,
    pub(crate) bulk: BulkCoordinator,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Page size is fixed for the lifetime of every identity in the cache.
    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            cache: PageCache::new(page_size),
            ..Self::default()
        }
    }

    pub fn company(&self) -> Option<&CompanyId> {
        self.company.as_ref()
    }

    pub fn filters(&self) -> &FilterSnapshot {
        &self.filters
    }

    pub fn cache(&self) -> &PageCache {
        &self.cache
    }

    pub fn bulk(&self) -> &BulkCoordinator {
        &self.bulk
    }

    pub fn active_identity(&self) -> Option<QueryIdentity> {
        self.company
            .as_ref()
            .map(|company| derive(company, &self.filters))
    }

    pub fn view(&self) -> ListingsViewModel {
        let snapshot = self
            .active_identity()
            .map(|identity| self.cache.snapshot(&identity));
        let pending_actions = self
            .company
            .as_ref()
            .map(|company| self.bulk.pending_for(company))
            .unwrap_or_default();

        match snapshot {
            Some(snapshot) => ListingsViewModel {
                company: self.company.clone(),
                filters: self.filters.clone(),
                load_more: LoadMoreState::from_snapshot(&snapshot),
                status: snapshot.status,
                error: snapshot.error.map(|failure| failure.message),
                items: snapshot.items,
                pending_actions,
                action_error: self.action_error(),
                dirty: self.dirty,
            },
            None => ListingsViewModel {
                company: None,
                filters: self.filters.clone(),
                dirty: self.dirty,
                ..ListingsViewModel::default()
            },
        }
    }

    fn action_error(&self) -> Option<String> {
        let company = self.company.as_ref()?;
        self.bulk
            .last_error(company)
            .map(|err| err.message.clone())
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns whether the view changed since the last call and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_company(&mut self, company: CompanyId) {
        self.company = Some(company);
    }

    pub(crate) fn set_filters(&mut self, filters: FilterSnapshot) {
        self.filters = filters;
    }

    /// Re-derives the identity and points the cache at it.
    pub(crate) fn activate_current(&mut self) -> Option<FetchRequest> {
        match self.active_identity() {
            Some(identity) => self.cache.activate(&identity).1,
            None => {
                self.cache.deactivate();
                None
            }
        }
    }
}
