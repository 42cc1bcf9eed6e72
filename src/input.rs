//! Normalization of producer values into [`ParsedDocument`].
//!
//! Parse results reach this crate in a few shapes: an already-structured JSON
//! mapping, a value that can convert itself into such a mapping, or a value
//! that can serialize itself to JSON text. Each shape gets one explicit
//! conversion step and they all collapse to a JSON object before anything
//! else looks at them.
//!
//! # Example
//!
//! ```
//! use parseview::input::ParsedInput;
//! use serde_json::json;
//!
//! let input = ParsedInput::from(json!({"document": {"pages": [], "elements": []}}));
//! let doc = input.into_document()?;
//! assert_eq!(doc.page_count(), 0);
//! # Ok::<(), parseview::Error>(())
//! ```

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::model::ParsedDocument;

/// A producer value that converts itself into a structured JSON value.
pub trait ToStructured: Send + Sync {
    /// Convert to a JSON value; a mapping is expected.
    fn to_structured(&self) -> Result<Value>;
}

/// A producer value that serializes itself to JSON text.
pub trait ToJsonText: Send + Sync {
    /// Serialize to JSON text; an object is expected.
    fn to_json_text(&self) -> Result<String>;
}

impl ToJsonText for String {
    fn to_json_text(&self) -> Result<String> {
        Ok(self.clone())
    }
}

/// The closed set of accepted producer shapes.
pub enum ParsedInput {
    /// An already-structured value
    Mapping(Value),
    /// A value exposing a conversion to a structured value
    Structured(Box<dyn ToStructured>),
    /// A value exposing a conversion to JSON text
    Json(Box<dyn ToJsonText>),
}

impl ParsedInput {
    /// Wrap JSON text.
    pub fn json_text(text: impl Into<String>) -> Self {
        ParsedInput::Json(Box::new(text.into()))
    }

    /// Collapse the input to a JSON mapping.
    ///
    /// Anything that does not end up as a JSON object is an
    /// [`Error::UnsupportedInput`] naming the shape it had.
    pub fn normalize(&self) -> Result<Map<String, Value>> {
        let value = match self {
            ParsedInput::Mapping(value) => value.clone(),
            ParsedInput::Structured(source) => source.to_structured()?,
            ParsedInput::Json(source) => serde_json::from_str(&source.to_json_text()?)?,
        };

        match value {
            Value::Object(mapping) => Ok(mapping),
            other => Err(Error::UnsupportedInput(shape_name(&other))),
        }
    }

    /// Normalize and build the document.
    pub fn into_document(self) -> Result<ParsedDocument> {
        ParsedDocument::from_mapping(self.normalize()?)
    }
}

impl From<Value> for ParsedInput {
    fn from(value: Value) -> Self {
        ParsedInput::Mapping(value)
    }
}

impl std::fmt::Debug for ParsedInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParsedInput::Mapping(_) => f.write_str("ParsedInput::Mapping"),
            ParsedInput::Structured(_) => f.write_str("ParsedInput::Structured"),
            ParsedInput::Json(_) => f.write_str("ParsedInput::Json"),
        }
    }
}

/// Name of a JSON value's shape, for error messages.
pub fn shape_name(value: &Value) -> String {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
    .to_string()
}

/// Failure reported by the producer itself.
///
/// Producers mark failed entries with `"type": "error"` and a `message` (or
/// `error`) field instead of a document.
pub fn producer_error(mapping: &Map<String, Value>) -> Option<String> {
    if mapping.get("type").and_then(Value::as_str) != Some("error") {
        return None;
    }

    let message = mapping
        .get("message")
        .or_else(|| mapping.get("error"))
        .map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .unwrap_or_else(|| "Unknown error".to_string());
    Some(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct RowValue(Value);

    impl ToStructured for RowValue {
        fn to_structured(&self) -> Result<Value> {
            Ok(self.0.clone())
        }
    }

    struct BrokenRow;

    impl ToStructured for BrokenRow {
        fn to_structured(&self) -> Result<Value> {
            Err(Error::Other("conversion failed".to_string()))
        }
    }

    #[test]
    fn test_mapping_input() {
        let input = ParsedInput::from(json!({"metadata": {"id": "a"}}));
        let doc = input.into_document().unwrap();
        assert_eq!(doc.metadata.document_id(), "a");
    }

    #[test]
    fn test_structured_input() {
        let input = ParsedInput::Structured(Box::new(RowValue(json!({
            "document": {"pages": [{"id": 0}]}
        }))));
        assert_eq!(input.into_document().unwrap().page_count(), 1);
    }

    #[test]
    fn test_json_text_input() {
        let input = ParsedInput::json_text(r#"{"document": {"elements": [{"type": "text"}]}}"#);
        assert!(input.into_document().unwrap().has_elements());
    }

    #[test]
    fn test_unsupported_shapes() {
        let err = ParsedInput::from(json!([1, 2, 3])).normalize().unwrap_err();
        assert_eq!(err.to_string(), "Unsupported input type: array");

        let err = ParsedInput::json_text("\"text\"").normalize().unwrap_err();
        assert!(matches!(err, Error::UnsupportedInput(ref s) if s == "string"));

        let err = ParsedInput::Structured(Box::new(RowValue(Value::Null)))
            .normalize()
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedInput(ref s) if s == "null"));
    }

    #[test]
    fn test_conversion_failure_propagates() {
        let err = ParsedInput::Structured(Box::new(BrokenRow)).normalize().unwrap_err();
        assert!(matches!(err, Error::Other(_)));

        let err = ParsedInput::json_text("{broken").normalize().unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_producer_error() {
        let failed = json!({"type": "error", "message": "file too large"});
        let mapping = failed.as_object().unwrap();
        assert_eq!(producer_error(mapping), Some("file too large".to_string()));

        let fallback = json!({"type": "error", "error": "timeout"});
        assert_eq!(
            producer_error(fallback.as_object().unwrap()),
            Some("timeout".to_string())
        );

        let bare = json!({"type": "error"});
        assert_eq!(
            producer_error(bare.as_object().unwrap()),
            Some("Unknown error".to_string())
        );

        let ok = json!({"document": {}});
        assert_eq!(producer_error(ok.as_object().unwrap()), None);
    }
}
