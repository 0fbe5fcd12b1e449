use crate::{BulkAction, CompanyId, FetchRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch one page; the result comes back as `Msg::PageLoaded`.
    FetchPage(FetchRequest),
    /// Run a bulk action; the result comes back as `Msg::BulkActionDone`.
    RunBulkAction { scope: CompanyId, action: BulkAction },
}
