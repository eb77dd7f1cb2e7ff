//! Extraction of displayable results from an execution payload.
//!
//! Payloads are opaque JSON. A preview URL is looked up with a fixed
//! precedence, first match wins:
//! 1. `ui_render_url` (or `save_ui_preview`) as a string, an object with
//!    a string `url`, or a non-empty array whose first element is one of
//!    those;
//! 2. a line of the `text` field matching `Preview: /view?...`.
//!
//! Both lookups start from the payload's `ui` object when present, else
//! from the payload itself. Pure and stateless.

use serde_json::Value;

/// Extract a displayable resource URL from an execution payload.
/// Returns `None` when neither the structured field nor the text
/// fallback yields anything; the caller leaves existing content alone.
pub fn extract_preview_url(payload: &Value) -> Option<String> {
    let ui = ui_section(payload);

    let structured = ui
        .get("ui_render_url")
        .filter(|v| !v.is_null())
        .or_else(|| ui.get("save_ui_preview"));
    if let Some(url) = structured.and_then(url_from_value) {
        return Some(url);
    }

    scan_preview_line(&text_field(ui))
}

/// Extract the display text from an execution payload. The host delivers
/// text either as a plain string or as a one-element batch.
pub fn extract_output_text(payload: &Value) -> Option<String> {
    let text = text_field(ui_section(payload));
    if text.is_empty() { None } else { Some(text) }
}

fn ui_section(payload: &Value) -> &Value {
    payload.get("ui").filter(|v| !v.is_null()).unwrap_or(payload)
}

fn text_field(ui: &Value) -> String {
    match ui.get("text") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .first()
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        _ => String::new(),
    }
}

fn url_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(map) => string_field(map, "url"),
        Value::Array(items) => match items.first() {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::Object(map)) => string_field(map, "url"),
            _ => None,
        },
        _ => None,
    }
}

fn string_field(map: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Scan text for a line of the form `Preview: /view?...`. Leading and
/// trailing whitespace is tolerated; the URL token itself must contain
/// none.
fn scan_preview_line(text: &str) -> Option<String> {
    for line in text.lines() {
        if let Some(rest) = line.trim().strip_prefix("Preview:") {
            let candidate = rest.trim();
            if candidate.len() > "/view?".len()
                && candidate.starts_with("/view?")
                && !candidate.contains(char::is_whitespace)
            {
                return Some(candidate.to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn structured_string_field_wins() {
        let payload = json!({ "ui_render_url": "/view?f=a.html" });
        assert_eq!(
            extract_preview_url(&payload).as_deref(),
            Some("/view?f=a.html")
        );
    }

    #[test]
    fn nested_ui_object_is_preferred() {
        let payload = json!({ "ui": { "ui_render_url": "/view?f=inner.html" } });
        assert_eq!(
            extract_preview_url(&payload).as_deref(),
            Some("/view?f=inner.html")
        );
    }

    #[test]
    fn save_ui_preview_is_the_fallback_field() {
        let payload = json!({ "save_ui_preview": { "url": "/view?f=b.html" } });
        assert_eq!(
            extract_preview_url(&payload).as_deref(),
            Some("/view?f=b.html")
        );
    }

    #[test]
    fn array_forms_use_the_first_element() {
        let payload = json!({ "ui_render_url": ["/view?f=first.html", "/view?f=second.html"] });
        assert_eq!(
            extract_preview_url(&payload).as_deref(),
            Some("/view?f=first.html")
        );

        let payload = json!({ "ui_render_url": [{ "url": "/view?f=obj.html" }] });
        assert_eq!(
            extract_preview_url(&payload).as_deref(),
            Some("/view?f=obj.html")
        );

        let payload = json!({ "ui_render_url": [] });
        assert_eq!(extract_preview_url(&payload), None);
    }

    #[test]
    fn text_preview_line_is_the_last_resort() {
        let payload = json!({ "text": ["Saved UI HTML: x.html\nPreview: /view?a=1\n"] });
        assert_eq!(extract_preview_url(&payload).as_deref(), Some("/view?a=1"));
    }

    #[test]
    fn structured_field_takes_precedence_over_text() {
        let payload = json!({
            "ui_render_url": "/view?structured=1",
            "text": ["Preview: /view?from_text=1"]
        });
        assert_eq!(
            extract_preview_url(&payload).as_deref(),
            Some("/view?structured=1")
        );
    }

    #[test]
    fn no_url_when_nothing_matches() {
        assert_eq!(extract_preview_url(&json!({})), None);
        assert_eq!(extract_preview_url(&json!({ "text": ["plain output"] })), None);
        // A Preview line whose token does not start with /view? is ignored.
        assert_eq!(
            extract_preview_url(&json!({ "text": ["Preview: http://elsewhere"] })),
            None
        );
        // Whitespace inside the token disqualifies the line.
        assert_eq!(
            extract_preview_url(&json!({ "text": ["Preview: /view?a=1 trailing"] })),
            None
        );
    }

    #[test]
    fn output_text_prefers_first_batch_element() {
        let payload = json!({ "ui": { "text": ["hello", "ignored"] } });
        assert_eq!(extract_output_text(&payload).as_deref(), Some("hello"));
        assert_eq!(extract_output_text(&json!({})), None);
    }
}
