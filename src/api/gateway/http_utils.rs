//! Shared HTTP utilities for gateway implementations.

use serde_json::Value;

/// Pulls a human-readable message out of an error body.
///
/// The backend answers with `{"detail": "..."}` for most failures and with a
/// field map (`{"field": ["message"]}`) for validation errors; the first
/// message found wins.
pub(super) fn extract_api_message(body: &str) -> Option<String> {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        let trimmed = body.trim();
        return (!trimmed.is_empty()).then(|| trimmed.chars().take(160).collect());
    };

    for key in ["detail", "message", "error"] {
        if let Some(message) = value.get(key).and_then(Value::as_str) {
            return Some(message.to_owned());
        }
    }

    value.as_object()?.iter().find_map(|(field, messages)| {
        let first = match messages {
            Value::Array(items) => items.first().and_then(Value::as_str),
            Value::String(text) => Some(text.as_str()),
            _ => None,
        }?;
        Some(format!("{field}: {first}"))
    })
}
