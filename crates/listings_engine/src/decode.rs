use serde::Deserialize;
use serde_json::Value;

use crate::{ActionAck, FetchedPage, FetchedRecord};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("invalid page body: {0}")]
    InvalidJson(String),
    #[error("record {index} has no usable id")]
    MissingId { index: usize },
}

#[derive(Debug, Deserialize)]
struct PageBody {
    data: Vec<Value>,
    #[serde(default, alias = "hasMore")]
    has_more: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct AckBody {
    #[serde(default = "default_succeeded")]
    succeeded: bool,
    #[serde(default)]
    message: Option<String>,
}

fn default_succeeded() -> bool {
    true
}

/// Decode a listing page body `{ "data": [...], "has_more": bool }`.
///
/// Without `has_more`, a full page is taken to mean more pages may follow.
pub fn decode_page(bytes: &[u8], page_index: u32, page_size: u32) -> Result<FetchedPage, DecodeError> {
    let body: PageBody =
        serde_json::from_slice(bytes).map_err(|err| DecodeError::InvalidJson(err.to_string()))?;

    let has_more = body
        .has_more
        .unwrap_or(body.data.len() >= page_size as usize);
    let records = body
        .data
        .iter()
        .enumerate()
        .map(|(index, value)| {
            let id = record_id(value).ok_or(DecodeError::MissingId { index })?;
            Ok(FetchedRecord {
                id,
                payload: value.to_string(),
            })
        })
        .collect::<Result<Vec<_>, DecodeError>>()?;

    Ok(FetchedPage {
        records,
        page_index,
        has_more,
    })
}

fn record_id(value: &Value) -> Option<String> {
    let id = value.get("id").or_else(|| value.get("_id"))?;
    match id {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Decode a bulk action body. Empty or non-JSON bodies count as success;
/// the HTTP status has already been checked by the caller.
pub fn decode_ack(bytes: &[u8]) -> ActionAck {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return ActionAck {
            succeeded: true,
            message: None,
        };
    }
    match serde_json::from_slice::<AckBody>(bytes) {
        Ok(body) => ActionAck {
            succeeded: body.succeeded,
            message: body.message,
        },
        Err(_) => ActionAck {
            succeeded: true,
            message: None,
        },
    }
}
