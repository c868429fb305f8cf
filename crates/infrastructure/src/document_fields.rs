use pulse_application::Document;
use pulse_core::{AppError, AppResult};
use serde_json::Value;

pub(crate) fn string_field<'a>(document: &'a Document, field: &str) -> Option<&'a str> {
    document.get(field).and_then(Value::as_str)
}

pub(crate) fn required_string_field(
    document: &Document,
    field: &str,
    context: &str,
) -> AppResult<String> {
    string_field(document, field)
        .map(str::to_owned)
        .ok_or_else(|| AppError::Internal(format!("{context} is missing string field '{field}'")))
}

/// Builds a document from `(field, value)` pairs.
pub(crate) fn document_of<const N: usize>(fields: [(&str, Value); N]) -> Document {
    fields
        .into_iter()
        .map(|(field, value)| (field.to_owned(), value))
        .collect()
}
