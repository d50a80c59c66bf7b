//! String processor: text coercion, length bounds, pattern matching.

use regex::Regex;
use tabula_model::Value;

use crate::cell_error::CellError;

/// Frozen configuration of a string column.
#[derive(Debug, Clone, Default)]
pub struct StringRules {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<Regex>,
}

/// Non-text scalars are rendered through the canonical `Display` form.
/// Length is counted in characters, not bytes. Length findings come
/// before the pattern finding, so combined violations accumulate in a
/// stable order.
pub(super) fn process(rules: &StringRules, value: Value, errors: &mut Vec<CellError>) -> Value {
    let text = match value {
        Value::Nil => return Value::Nil,
        Value::Text(text) => text,
        other => other.to_string(),
    };

    let length = text.chars().count();
    if let Some(min_length) = rules.min_length {
        if length < min_length {
            errors.push(CellError::TooShort {
                min_length,
                actual: length,
            });
        }
    }
    if let Some(max_length) = rules.max_length {
        if length > max_length {
            errors.push(CellError::TooLong {
                max_length,
                actual: length,
            });
        }
    }
    if let Some(pattern) = &rules.pattern {
        if !pattern.is_match(&text) {
            errors.push(CellError::InvalidFormat {
                pattern: pattern.as_str().to_string(),
            });
        }
    }

    Value::Text(text)
}
