use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::AppError;

/// JSON response whose object keys are rewritten to lower camel case.
///
/// The rewrite runs on the final serialized tree, so nested keys coming
/// from any source casing end up consistent.
pub struct CamelJson<T>(pub T);

impl<T: Serialize> IntoResponse for CamelJson<T> {
    fn into_response(self) -> Response {
        match serde_json::to_value(&self.0) {
            Ok(value) => axum::Json(camelize_keys(value)).into_response(),
            Err(e) => AppError::Internal(format!("Failed to serialize response: {e}")).into_response(),
        }
    }
}

/// Recursively convert every object key to lower camel case.
pub fn camelize_keys(value: Value) -> Value {
    match value {
        Value::Object(object) => Value::Object(
            object
                .into_iter()
                .map(|(key, value)| (to_camel_case(&key), camelize_keys(value)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(camelize_keys).collect()),
        other => other,
    }
}

/// `per_page` → `perPage`, `created-at` → `createdAt`.
///
/// Each `_`, `-` or space separated word after the first gets its first
/// letter upper-cased; the very first letter is lower-cased. Letters inside
/// a word are left alone, so keys already in camel case are unchanged.
pub fn to_camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());

    for word in key.split(['_', '-', ' ']).filter(|w| !w.is_empty()) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            if out.is_empty() {
                out.extend(first.to_lowercase());
            } else {
                out.extend(first.to_uppercase());
            }
            out.push_str(chars.as_str());
        }
    }

    out
}
