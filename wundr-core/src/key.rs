use crate::{CoreError, Level};

/// Prefix under which flashcard records live in every backend.
pub const STORE_NAMESPACE: &str = "flashcard:";

const SEP: char = '|';

/// Object normalization applied before key derivation and before any
/// upstream call: trimmed, lower-cased. "Guitar " and "guitar" are the
/// same study item.
pub fn normalize_object(object: &str) -> String {
    object.trim().to_lowercase()
}

/// Target codes are short ISO-style tags; normalized the same way so "ES"
/// and "es" share one cache slot.
pub fn normalize_target(target: &str) -> String {
    target.trim().to_ascii_lowercase()
}

// The separator must never appear unescaped inside a field, otherwise two
// distinct tuples could derive the same id. '%' is escaped first so the
// escaping itself stays injective.
fn escape(field: &str) -> String {
    field.replace('%', "%25").replace(SEP, "%7C")
}

/// Maps a (target, object, level) tuple to its stable id. Deterministic,
/// and distinct tuples never collide. Empty object or target is rejected
/// here, before any network call happens.
pub fn derive_id(target: &str, object: &str, level: Level) -> Result<String, CoreError> {
    let target = normalize_target(target);
    if target.is_empty() {
        return Err(CoreError::Invalid("target must not be empty"));
    }
    let object = normalize_object(object);
    if object.is_empty() {
        return Err(CoreError::Invalid("object must not be empty"));
    }
    Ok(format!(
        "{}{SEP}{}{SEP}{}",
        escape(&target),
        escape(&object),
        level.as_str()
    ))
}

/// Full persisted key for an id.
pub fn storage_key(id: &str) -> String {
    format!("{STORE_NAMESPACE}{id}")
}

/// Inverse of [`storage_key`]; `None` for keys outside the namespace.
pub fn id_from_storage_key(key: &str) -> Option<&str> {
    key.strip_prefix(STORE_NAMESPACE)
}
