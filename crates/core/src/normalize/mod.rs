//! Response normalization
//!
//! Turns the loosely-shaped payloads of the backend into typed records.
//! Lists and single records are located with [`ExtractionStrategy`] values
//! tried in a fixed order, then read through the [`Entity`] trait, which
//! rejects any candidate missing the fields its type needs.

mod entity;
mod envelope;
mod fields;
mod login;
pub mod strategy;

use actasti_domain::{ActasError, Result};
use serde_json::Value;
use tracing::debug;

pub use entity::Entity;
pub use envelope::normalize_envelope;
pub use login::{extract_login_token, extract_profile, LoginProfile};
pub use strategy::{find_list, ExtractionStrategy};

use entity::read_entity;

/// Extract a typed list, failing when the payload holds no usable records.
///
/// A payload holding a single valid record (no list anywhere) yields a
/// one-element list. Entries that fail validation are dropped.
///
/// # Errors
///
/// Returns `ShapeMismatch` when no list or record can be located, or when a
/// non-empty list contains no valid entry.
pub fn try_normalize_list<T: Entity>(payload: &Value) -> Result<Vec<T>> {
    let Some((strategy, list)) = find_list(payload) else {
        return single_candidates(payload)
            .into_iter()
            .find_map(read_entity::<T>)
            .map(|record| vec![record])
            .ok_or_else(|| {
                ActasError::ShapeMismatch(format!("no {} list in response", T::NAME))
            });
    };

    let records: Vec<T> = list.iter().filter_map(read_entity).collect();
    if records.is_empty() && !list.is_empty() {
        return Err(ActasError::ShapeMismatch(format!(
            "{} entries under {strategy:?} but none is a valid {}",
            list.len(),
            T::NAME
        )));
    }
    if records.len() < list.len() {
        debug!(
            entity = T::NAME,
            dropped = list.len() - records.len(),
            "Dropped entries that failed validation"
        );
    }
    Ok(records)
}

/// Extract a typed list; an unrecognized shape yields an empty list.
pub fn normalize_list<T: Entity>(payload: &Value) -> Vec<T> {
    try_normalize_list(payload).unwrap_or_else(|err| {
        debug!(entity = T::NAME, error = %err, "Response did not contain a list");
        Vec::new()
    })
}

/// Extract the single record matching `hint`.
///
/// Candidates are, in order: the payload itself, its known wrapper keys,
/// the entries of any list it holds, and finally every object-valued field.
/// Without a hint the first valid candidate wins; with one, the first valid
/// candidate that matches it exactly.
///
/// # Errors
///
/// Returns `ShapeMismatch` when no candidate qualifies.
pub fn normalize_single<T: Entity>(payload: &Value, hint: Option<&str>) -> Result<T> {
    let mut valid = 0usize;
    for candidate in single_candidates(payload) {
        let Some(record) = read_entity::<T>(candidate) else {
            continue;
        };
        valid += 1;
        match hint {
            Some(hint) if !record.matches_hint(hint) => continue,
            _ => return Ok(record),
        }
    }

    let reason = match hint {
        Some(hint) if valid > 0 => format!("{valid} {} candidates, none matching {hint:?}", T::NAME),
        _ => format!("no valid {} in response", T::NAME),
    };
    Err(ActasError::ShapeMismatch(reason))
}

fn single_candidates(payload: &Value) -> Vec<&Value> {
    let mut candidates: Vec<&Value> =
        ExtractionStrategy::single_order().filter_map(|s| s.object(payload)).collect();

    if let Some((_, list)) = find_list(payload) {
        candidates.extend(list.iter().filter(|entry| entry.is_object()));
    }
    if let Some(object) = payload.as_object() {
        candidates.extend(object.values().filter(|value| value.is_object()));
    }
    candidates
}
