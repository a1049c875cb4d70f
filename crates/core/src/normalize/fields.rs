//! Field lookup helpers shared by the entity readers

use serde_json::Value;

/// Follow a dotted path such as `meta.total`.
pub(crate) fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, segment| current.get(segment))
}

fn text_of(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// First non-blank string (or number rendered as text) under any of `keys`.
pub(crate) fn first_text(object: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| object.get(*key).and_then(text_of))
}

/// Like [`first_text`], but also reads `{ nombre }`/`{ name }` sub-objects.
pub(crate) fn first_label(object: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match object.get(*key)? {
        nested @ Value::Object(_) => first_text(nested, &["nombre", "name", "descripcion"]),
        other => text_of(other),
    })
}

/// First integer under any of `keys`, accepting numeric strings.
pub(crate) fn first_i64(object: &Value, keys: &[&str]) -> Option<i64> {
    keys.iter().find_map(|key| match object.get(*key)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Non-negative count found at any of the dotted `paths`.
pub(crate) fn first_count(object: &Value, paths: &[&str]) -> Option<usize> {
    paths.iter().find_map(|path| match lookup(object, path)? {
        Value::Number(n) => n.as_u64().and_then(|n| usize::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}
