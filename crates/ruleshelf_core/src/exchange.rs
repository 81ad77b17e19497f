//! Exchange-format codec for rule import/export/copy/paste.
//!
//! The exchange format is plain JSON with the stable camelCase field names
//! the reading app has always used. Import accepts either a single rule
//! object or an array of rule objects; anything else is a format error.

use crate::config::DEFAULT_MAX_IMPORT_SIZE;
use crate::error::AppError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Parse an import payload into rule candidates.
///
/// # Arguments
/// - `text`: Raw payload text (pasted, fetched, or read from a document).
/// - `max_bytes`: Size cap; oversized payloads are rejected up front.
///
/// # Returns
/// One candidate for a single JSON object, one per element for a JSON array.
///
/// # Errors
/// [`AppError::Format`] when the payload is empty, oversized, not JSON, or
/// neither an object nor an array of objects.
pub fn parse_rules<R: DeserializeOwned>(text: &str, max_bytes: usize) -> Result<Vec<R>, AppError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AppError::Format("import payload is empty".to_string()));
    }
    if trimmed.len() > max_bytes {
        return Err(AppError::Format(format!(
            "import payload exceeds {} bytes",
            max_bytes
        )));
    }

    let value: Value = serde_json::from_str(trimmed)
        .map_err(|e| AppError::Format(format!("payload is not valid JSON: {}", e)))?;
    match value {
        Value::Object(_) => Ok(vec![serde_json::from_value(value)?]),
        Value::Array(items) => items
            .into_iter()
            .map(|item| {
                if !item.is_object() {
                    return Err(AppError::Format(
                        "array entries must be rule objects".to_string(),
                    ));
                }
                Ok(serde_json::from_value(item)?)
            })
            .collect(),
        _ => Err(AppError::Format(
            "expected a rule object or an array of rule objects".to_string(),
        )),
    }
}

/// Parse a single-rule payload (clipboard paste path).
///
/// # Errors
/// [`AppError::Format`] when the payload is not exactly one rule object.
pub fn parse_rule<R: DeserializeOwned>(text: &str) -> Result<R, AppError> {
    let trimmed = text.trim();
    let value: Value = serde_json::from_str(trimmed)
        .map_err(|e| AppError::Format(format!("payload is not valid JSON: {}", e)))?;
    if !value.is_object() {
        return Err(AppError::Format("expected a single rule object".to_string()));
    }
    Ok(serde_json::from_value(value)?)
}

/// Serialize rules for export.
///
/// # Errors
/// [`AppError::Format`] when serialization fails.
pub fn export_json<R: Serialize>(rules: &[R], pretty: bool) -> Result<String, AppError> {
    let json = if pretty {
        serde_json::to_string_pretty(rules)?
    } else {
        serde_json::to_string(rules)?
    };
    Ok(json)
}

/// Serialize one rule for the clipboard.
///
/// # Errors
/// [`AppError::Format`] when serialization fails.
pub fn rule_to_json<R: Serialize>(rule: &R) -> Result<String, AppError> {
    Ok(serde_json::to_string(rule)?)
}
