//! Shared parsing for the platform's JSON response envelope.
//!
//! Every endpoint wraps its payload as `{ "success": bool, "data": ... }`
//! with a human-readable `message` on failure. Bodies are always read as
//! text first and parsed explicitly here, so parser errors never leak to
//! the UI as raw exceptions.

use serde_json::Value;

use crate::error::AuthError;

/// Pull a human-readable message out of an error body, if it has one
pub(crate) fn extract_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    for key in ["message", "error"] {
        if let Some(msg) = value.get(key).and_then(Value::as_str) {
            if !msg.trim().is_empty() {
                return Some(msg.to_string());
            }
        }
    }
    None
}

/// Fallback message for a non-2xx response with no usable body
pub(crate) fn status_message(status: u16, reason: &str, body: &str) -> String {
    extract_message(body).unwrap_or_else(|| format!("{} {}", status, reason))
}

/// Parse a bearer-authenticated endpoint's response down to its `data`
/// payload.
///
/// 401/403 map to [`AuthError::InvalidToken`]; every other failure mode
/// gets its own variant so callers can react precisely.
pub(crate) fn parse_envelope(status: u16, reason: &str, body: &str) -> Result<Value, AuthError> {
    if status == 401 || status == 403 {
        return Err(AuthError::InvalidToken);
    }
    if !(200..300).contains(&status) {
        return Err(AuthError::BadStatus {
            status,
            message: status_message(status, reason, body),
        });
    }
    if body.trim().is_empty() {
        return Err(AuthError::EmptyBody);
    }
    let value: Value = serde_json::from_str(body).map_err(|_| AuthError::MalformedJson)?;
    if value.get("success").and_then(Value::as_bool) != Some(true) {
        let message = extract_message(body)
            .unwrap_or_else(|| "request rejected by server".to_string());
        return Err(AuthError::Rejected(message));
    }
    Ok(value.get("data").cloned().unwrap_or(Value::Null))
}
