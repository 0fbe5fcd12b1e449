//! Listings engine: backend IO and effect execution.
mod backend;
mod decode;
mod engine;
mod types;

pub use backend::{BackendSettings, ListingsBackend, ReqwestBackend};
pub use decode::{decode_ack, decode_page, DecodeError};
pub use engine::{EngineError, EngineHandle};
pub use types::{
    ActionAck, ActionKind, BackendError, EngineEvent, FailureKind, FetchedPage, FetchedRecord,
    PageQuery, Ticket,
};
