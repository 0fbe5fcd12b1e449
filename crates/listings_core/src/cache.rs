use std::collections::BTreeMap;

use listings_logging::{listings_debug, listings_error};

use crate::identity::{CompanyId, QueryIdentity};

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// One listing as returned by the backend. Only `id` is ever inspected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRecord {
    pub id: String,
    pub payload: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub items: Vec<ListingRecord>,
    pub page_index: u32,
    pub has_more: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchStatus {
    #[default]
    Idle,
    Fetching,
    Error,
    Settled,
}

impl FetchStatus {
    /// True once the last fetch finished, successfully or not.
    pub fn is_settled(self) -> bool {
        matches!(self, FetchStatus::Settled | FetchStatus::Error)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub message: String,
}

impl FetchFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Identifies one issued page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchTicket(u64);

impl FetchTicket {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// A page the cache wants fetched. Echoed back with the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub ticket: FetchTicket,
    pub identity: QueryIdentity,
    pub page_index: u32,
    pub page_size: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    Appended,
    Failed,
    Discarded,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct CacheEntry {
    pages: Vec<Page>,
    status: FetchStatus,
    in_flight: Option<FetchTicket>,
    last_error: Option<FetchFailure>,
    /// Pages are from an earlier visit; the in-flight page 0 replaces them.
    refreshing: bool,
}

impl CacheEntry {
    fn has_more(&self) -> bool {
        self.pages.last().map_or(true, |page| page.has_more)
    }

    fn next_page_index(&self) -> u32 {
        if self.refreshing {
            0
        } else {
            self.pages.len() as u32
        }
    }

    fn settled_status(&self) -> FetchStatus {
        if self.last_error.is_some() {
            FetchStatus::Error
        } else if self.pages.is_empty() {
            FetchStatus::Idle
        } else {
            FetchStatus::Settled
        }
    }
}

/// Read-only projection of one identity's cached pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSnapshot {
    pub items: Vec<ListingRecord>,
    pub status: FetchStatus,
    pub has_more: bool,
    pub page_count: usize,
    pub error: Option<FetchFailure>,
}

/// Pages cached per query identity, fetched in order with one request in
/// flight per identity.
///
/// The cache never performs IO. Operations that need a page return a
/// [`FetchRequest`]; the caller executes it and hands the result back through
/// [`PageCache::apply_page`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCache {
    entries: BTreeMap<QueryIdentity, CacheEntry>,
    active: Option<QueryIdentity>,
    page_size: u32,
    next_ticket: u64,
}

impl Default for PageCache {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl PageCache {
    pub fn new(page_size: u32) -> Self {
        Self {
            entries: BTreeMap::new(),
            active: None,
            page_size: page_size.max(1),
            next_ticket: 1,
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn active(&self) -> Option<&QueryIdentity> {
        self.active.as_ref()
    }

    pub fn contains(&self, identity: &QueryIdentity) -> bool {
        self.entries.contains_key(identity)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn status(&self, identity: &QueryIdentity) -> FetchStatus {
        self.entries
            .get(identity)
            .map_or(FetchStatus::Idle, |entry| entry.status)
    }

    /// Makes `identity` the active one and fetches its first page.
    ///
    /// Interest in the previous identity's in-flight fetch is dropped: its
    /// response will be discarded on arrival. A previous entry left with no
    /// pages is removed. Re-activating the current identity only ensures it
    /// is loaded.
    ///
    /// An entry kept from an earlier visit is refreshed: its pages stay
    /// visible while page 0 is fetched again, and that page replaces them.
    pub fn activate(&mut self, identity: &QueryIdentity) -> (FetchStatus, Option<FetchRequest>) {
        if self.active.as_ref() == Some(identity) {
            return self.ensure_loaded(identity);
        }
        if let Some(previous) = self.active.take() {
            self.cancel_in_flight(&previous);
        }
        self.active = Some(identity.clone());
        if !self.entries.contains_key(identity) {
            return self.ensure_loaded(identity);
        }

        let request = self.mint_request(identity, 0);
        if let Some(entry) = self.entries.get_mut(identity) {
            listings_debug!("Refreshing {} from page 0", identity);
            entry.status = FetchStatus::Fetching;
            entry.in_flight = Some(request.ticket);
            entry.last_error = None;
            entry.refreshing = true;
        }
        (FetchStatus::Fetching, Some(request))
    }

    /// Clears the active identity, cancelling its in-flight fetch.
    pub fn deactivate(&mut self) {
        if let Some(previous) = self.active.take() {
            self.cancel_in_flight(&previous);
        }
    }

    fn cancel_in_flight(&mut self, identity: &QueryIdentity) {
        let Some(entry) = self.entries.get_mut(identity) else {
            return;
        };
        if let Some(ticket) = entry.in_flight.take() {
            listings_debug!(
                "Dropping interest in ticket {} for {}",
                ticket.value(),
                identity
            );
            entry.refreshing = false;
            entry.status = entry.settled_status();
        }
        if entry.pages.is_empty() {
            self.entries.remove(identity);
        }
    }

    /// Requests page 0 when no entry exists; otherwise reports the entry's
    /// status without side effects.
    pub fn ensure_loaded(&mut self, identity: &QueryIdentity) -> (FetchStatus, Option<FetchRequest>) {
        if let Some(entry) = self.entries.get(identity) {
            return (entry.status, None);
        }
        let request = self.mint_request(identity, 0);
        self.entries.insert(
            identity.clone(),
            CacheEntry {
                status: FetchStatus::Fetching,
                in_flight: Some(request.ticket),
                ..CacheEntry::default()
            },
        );
        (FetchStatus::Fetching, Some(request))
    }

    /// Requests the page after the last fetched one.
    ///
    /// No-op while a fetch is outstanding or once the latest page reported
    /// `has_more = false`. An absent entry behaves like [`Self::ensure_loaded`].
    pub fn load_next(&mut self, identity: &QueryIdentity) -> (FetchStatus, Option<FetchRequest>) {
        let page_index = match self.entries.get(identity) {
            None => return self.ensure_loaded(identity),
            Some(entry) if entry.status == FetchStatus::Fetching || !entry.has_more() => {
                return (entry.status, None);
            }
            Some(entry) => entry.next_page_index(),
        };

        let request = self.mint_request(identity, page_index);
        if let Some(entry) = self.entries.get_mut(identity) {
            entry.status = FetchStatus::Fetching;
            entry.in_flight = Some(request.ticket);
            entry.last_error = None;
        }
        (FetchStatus::Fetching, Some(request))
    }

    /// Settles the fetch described by `request`.
    ///
    /// Responses whose ticket no longer matches the entry are dropped without
    /// touching the cache. Switching identity and invalidation both revoke the
    /// outstanding ticket, so late pages can never land in a newer entry.
    pub fn apply_page(
        &mut self,
        request: &FetchRequest,
        result: Result<Page, FetchFailure>,
    ) -> PageOutcome {
        let Some(entry) = self.entries.get_mut(&request.identity) else {
            listings_debug!(
                "Discarding page {} for invalidated {}",
                request.page_index,
                request.identity
            );
            return PageOutcome::Discarded;
        };
        if entry.in_flight != Some(request.ticket) {
            listings_debug!(
                "Discarding stale ticket {} for {}",
                request.ticket.value(),
                request.identity
            );
            return PageOutcome::Discarded;
        }
        entry.in_flight = None;

        match result {
            Ok(page) => {
                let expected = entry.next_page_index();
                let contiguous = page.page_index == expected && request.page_index == expected;
                if !contiguous {
                    listings_error!(
                        "Page {} does not extend {} (expected {}); dropped",
                        page.page_index,
                        request.identity,
                        expected
                    );
                    debug_assert!(contiguous, "non-contiguous page for matching ticket");
                    entry.status = entry.settled_status();
                    return PageOutcome::Discarded;
                }
                if std::mem::take(&mut entry.refreshing) {
                    entry.pages.clear();
                }
                entry.pages.push(page);
                entry.last_error = None;
                entry.status = FetchStatus::Settled;
                PageOutcome::Appended
            }
            Err(failure) => {
                if std::mem::take(&mut entry.refreshing) {
                    entry.pages.clear();
                }
                entry.last_error = Some(failure);
                entry.status = FetchStatus::Error;
                PageOutcome::Failed
            }
        }
    }

    /// Discards the entry for `identity`; refetches page 0 when it is active.
    pub fn invalidate(&mut self, identity: &QueryIdentity) -> Option<FetchRequest> {
        if self.entries.remove(identity).is_some() {
            listings_debug!("Invalidated {}", identity);
        }
        if self.active.as_ref() == Some(identity) {
            return self.ensure_loaded(identity).1;
        }
        None
    }

    /// Discards every entry of `scope`; refetches the active identity when it
    /// belongs to that scope.
    pub fn invalidate_scope(&mut self, scope: &CompanyId) -> Option<FetchRequest> {
        let before = self.entries.len();
        self.entries.retain(|identity, _| identity.scope() != scope);
        listings_debug!(
            "Invalidated {} cached identities for company {}",
            before - self.entries.len(),
            scope
        );
        match self.active.clone() {
            Some(active) if active.scope() == scope => self.ensure_loaded(&active).1,
            _ => None,
        }
    }

    /// Items of every page in fetch order, passed through without dedup.
    pub fn snapshot(&self, identity: &QueryIdentity) -> CacheSnapshot {
        match self.entries.get(identity) {
            Some(entry) => CacheSnapshot {
                items: entry
                    .pages
                    .iter()
                    .flat_map(|page| page.items.iter().cloned())
                    .collect(),
                status: entry.status,
                has_more: entry.has_more(),
                page_count: entry.pages.len(),
                error: entry.last_error.clone(),
            },
            None => CacheSnapshot {
                items: Vec::new(),
                status: FetchStatus::Idle,
                has_more: true,
                page_count: 0,
                error: None,
            },
        }
    }

    fn mint_request(&mut self, identity: &QueryIdentity, page_index: u32) -> FetchRequest {
        let ticket = FetchTicket(self.next_ticket);
        self.next_ticket += 1;
        FetchRequest {
            ticket,
            identity: identity.clone(),
            page_index,
            page_size: self.page_size,
        }
    }
}
