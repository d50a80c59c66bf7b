//! Binary processor: opaque byte sequences.

use tabula_model::Value;

use crate::cell_error::CellError;

/// Text becomes its UTF-8 bytes; the caller's value is never mutated in
/// place.
pub(super) fn process(value: Value, errors: &mut Vec<CellError>) -> Value {
    match value {
        Value::Nil => Value::Nil,
        Value::Bytes(bytes) => Value::Bytes(bytes),
        Value::Text(text) => Value::Bytes(text.into_bytes()),
        other => {
            errors.push(CellError::invalid_input(other));
            Value::Nil
        }
    }
}
