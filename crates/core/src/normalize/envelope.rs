//! Inventory envelope extraction: records plus declared capacity hints

use actasti_domain::{InventoryEnvelope, InventoryItem, Result};
use serde_json::Value;

use super::fields::first_count;
use super::strategy::ENVELOPE_KEYS;
use super::try_normalize_list;

const TOTAL_PATHS: &[&str] = &[
    "count",
    "total",
    "totalItems",
    "totalCount",
    "meta.total",
    "pagination.total",
];

const LIMIT_PATHS: &[&str] =
    &["limit", "pageSize", "perPage", "per_page", "meta.limit", "pagination.limit"];

/// Normalize an inventory response and read its declared `total`/`limit`.
///
/// The hints are read at the top level first, then inside an object-valued
/// envelope such as `{ data: { rows, count } }`.
///
/// # Errors
///
/// Returns `ShapeMismatch` when the payload holds no inventory records.
pub fn normalize_envelope(payload: &Value) -> Result<InventoryEnvelope> {
    let items: Vec<InventoryItem> = try_normalize_list(payload)?;
    Ok(InventoryEnvelope {
        items,
        total: declared(payload, TOTAL_PATHS),
        limit: declared(payload, LIMIT_PATHS).filter(|limit| *limit > 0),
    })
}

fn declared(payload: &Value, paths: &[&str]) -> Option<usize> {
    first_count(payload, paths).or_else(|| {
        ENVELOPE_KEYS
            .iter()
            .filter_map(|key| payload.get(*key).filter(|inner| inner.is_object()))
            .find_map(|inner| first_count(inner, paths))
    })
}
