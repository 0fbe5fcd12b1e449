use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use listings_logging::{listings_info, listings_warn};

use crate::cache::{FetchRequest, PageCache};
use crate::identity::CompanyId;

/// Server-side mutations that apply to every listing of a company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BulkAction {
    Clear,
    Resync,
    Publish,
}

impl BulkAction {
    pub fn result_kind(self) -> ActionKind {
        match self {
            BulkAction::Clear => ActionKind::Cleared,
            BulkAction::Resync => ActionKind::Synced,
            BulkAction::Publish => ActionKind::Published,
        }
    }
}

impl fmt::Display for BulkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BulkAction::Clear => write!(f, "clear"),
            BulkAction::Resync => write!(f, "resync"),
            BulkAction::Publish => write!(f, "publish"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Cleared,
    Synced,
    Published,
}

impl ActionKind {
    pub fn action(self) -> BulkAction {
        match self {
            ActionKind::Cleared => BulkAction::Clear,
            ActionKind::Synced => BulkAction::Resync,
            ActionKind::Published => BulkAction::Publish,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResult {
    pub kind: ActionKind,
    pub scope: CompanyId,
    pub succeeded: bool,
    pub message: Option<String>,
}

impl ActionResult {
    pub fn success(kind: ActionKind, scope: CompanyId) -> Self {
        Self {
            kind,
            scope,
            succeeded: true,
            message: None,
        }
    }

    pub fn failure(kind: ActionKind, scope: CompanyId, message: impl Into<String>) -> Self {
        Self {
            kind,
            scope,
            succeeded: false,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionError {
    pub action: BulkAction,
    pub scope: CompanyId,
    pub message: String,
}

/// Tracks pending bulk actions and reconciles their results with the cache.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BulkCoordinator {
    pending: BTreeSet<(CompanyId, BulkAction)>,
    /// Latest failure per company.
    errors: BTreeMap<CompanyId, ActionError>,
}

impl BulkCoordinator {
    /// Registers `action` for `scope`. Returns false when the same action is
    /// already pending, in which case no request must be issued.
    pub fn begin(&mut self, scope: &CompanyId, action: BulkAction) -> bool {
        if !self.pending.insert((scope.clone(), action)) {
            listings_warn!("Ignoring {} for {}: already pending", action, scope);
            return false;
        }
        self.errors.remove(scope);
        listings_info!("Starting {} for company {}", action, scope);
        true
    }

    /// Applies a finished action. Success invalidates every cached identity of
    /// the scope and returns the refetch for the active one; failure leaves
    /// the cache untouched.
    pub fn complete(&mut self, result: &ActionResult, cache: &mut PageCache) -> Option<FetchRequest> {
        let action = result.kind.action();
        self.pending.remove(&(result.scope.clone(), action));

        if result.succeeded {
            listings_info!("{} for company {} succeeded", action, result.scope);
            return cache.invalidate_scope(&result.scope);
        }

        let message = result
            .message
            .clone()
            .unwrap_or_else(|| format!("{action} failed"));
        listings_warn!("{} for company {} failed: {}", action, result.scope, message);
        self.errors.insert(
            result.scope.clone(),
            ActionError {
                action,
                scope: result.scope.clone(),
                message,
            },
        );
        None
    }

    pub fn is_pending(&self, scope: &CompanyId, action: BulkAction) -> bool {
        self.pending.contains(&(scope.clone(), action))
    }

    pub fn pending_for(&self, scope: &CompanyId) -> Vec<BulkAction> {
        self.pending
            .iter()
            .filter(|(pending_scope, _)| pending_scope == scope)
            .map(|(_, action)| *action)
            .collect()
    }

    /// Latest failed action of `scope`, cleared when another action starts.
    pub fn last_error(&self, scope: &CompanyId) -> Option<&ActionError> {
        self.errors.get(scope)
    }
}
