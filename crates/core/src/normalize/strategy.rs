//! Extraction strategies over unknown response envelopes
//!
//! The backend wraps lists and single records in several different ways.
//! Each way is one tagged strategy; the normalizer tries them in a fixed,
//! deterministic order.

use serde_json::Value;

/// How a record set or record is pulled out of a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStrategy {
    /// The payload itself is the list
    BareArray,
    /// The list sits under a known envelope key
    Envelope(&'static str),
    /// The payload itself is the record
    Direct,
    /// The record sits under a known wrapper key
    Nested(&'static str),
}

/// Envelope keys, in the order they are tried.
pub const ENVELOPE_KEYS: &[&str] = &[
    "data",
    "rows",
    "elementos",
    "inventario",
    "users",
    "usuarios",
    "tiendas",
    "results",
    "result",
    "items",
];

/// Wrapper keys around single records, in the order they are tried.
pub const NESTED_KEYS: &[&str] = &["user", "usuario", "dataValues", "data", "result"];

/// Envelopes holding an object are searched this many levels deep.
const MAX_ENVELOPE_DEPTH: usize = 2;

impl ExtractionStrategy {
    /// List strategies in resolution order.
    pub fn list_order() -> impl Iterator<Item = Self> {
        std::iter::once(Self::BareArray).chain(ENVELOPE_KEYS.iter().copied().map(Self::Envelope))
    }

    /// Single-record strategies in resolution order.
    pub fn single_order() -> impl Iterator<Item = Self> {
        std::iter::once(Self::Direct).chain(NESTED_KEYS.iter().copied().map(Self::Nested))
    }

    /// Apply a list strategy.
    pub fn list<'a>(&self, payload: &'a Value) -> Option<&'a Vec<Value>> {
        match self {
            Self::BareArray => payload.as_array(),
            Self::Envelope(key) => payload.get(*key).and_then(Value::as_array),
            Self::Direct | Self::Nested(_) => None,
        }
    }

    /// Apply a single-record strategy.
    pub fn object<'a>(&self, payload: &'a Value) -> Option<&'a Value> {
        let candidate = match self {
            Self::Direct => payload,
            Self::Nested(key) => payload.get(*key)?,
            Self::BareArray | Self::Envelope(_) => return None,
        };
        candidate.is_object().then_some(candidate)
    }
}

/// Locate the record list of a payload.
///
/// Direct strategies win over deeper ones; when none applies, envelopes that
/// hold an object (`{ data: { rows: [...] } }`) are searched one level down.
pub fn find_list(payload: &Value) -> Option<(ExtractionStrategy, &Vec<Value>)> {
    find_list_at(payload, 0)
}

fn find_list_at(payload: &Value, depth: usize) -> Option<(ExtractionStrategy, &Vec<Value>)> {
    if let Some(found) =
        ExtractionStrategy::list_order().find_map(|s| s.list(payload).map(|list| (s, list)))
    {
        return Some(found);
    }
    if depth + 1 >= MAX_ENVELOPE_DEPTH {
        return None;
    }
    ENVELOPE_KEYS
        .iter()
        .filter_map(|key| payload.get(*key).filter(|inner| inner.is_object()))
        .find_map(|inner| find_list_at(inner, depth + 1))
}
