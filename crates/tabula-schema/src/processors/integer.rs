//! Integer processor: parsing, rounding, range checks.

use tabula_model::Value;

use crate::cell_error::CellError;

/// Frozen configuration of an integer column.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerRules {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

/// Blank text is treated as missing. Text parses base-10 after trimming.
/// Non-integer numerics round half away from zero and record the
/// rounding delta when it exceeds machine epsilon; the rounded value is
/// still produced.
pub(super) fn process(rules: &IntegerRules, value: Value, errors: &mut Vec<CellError>) -> Value {
    let processed = match &value {
        Value::Nil => None,
        Value::Text(text) if text.trim().is_empty() => None,
        Value::Text(text) => match text.trim().parse::<i64>() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                errors.push(CellError::NotAnInteger {
                    value: text.clone(),
                });
                None
            }
        },
        Value::Int(i) => Some(*i),
        Value::Float(f) => round_to_int(*f, errors),
        other => {
            errors.push(CellError::invalid_input(other.clone()));
            None
        }
    };

    match processed {
        None => Value::Nil,
        Some(i) => {
            check_bounds(rules, i, errors);
            Value::Int(i)
        }
    }
}

fn round_to_int(unrounded: f64, errors: &mut Vec<CellError>) -> Option<i64> {
    let rounded = unrounded.round();
    if !rounded.is_finite() || rounded < i64::MIN as f64 || rounded > i64::MAX as f64 {
        errors.push(CellError::invalid_input(Value::Float(unrounded)));
        return None;
    }
    let rounded = rounded as i64;
    let difference = unrounded - rounded as f64;
    if difference.abs() > f64::EPSILON {
        errors.push(CellError::NotAnIntegralNumber {
            rounded,
            unrounded,
            difference,
            absolute_difference: difference.abs(),
        });
    }
    Some(rounded)
}

fn check_bounds(rules: &IntegerRules, actual: i64, errors: &mut Vec<CellError>) {
    if let Some(min) = rules.min {
        if actual < min {
            errors.push(CellError::TooSmall {
                min: Value::Int(min),
                actual: Value::Int(actual),
            });
        }
    }
    if let Some(max) = rules.max {
        if actual > max {
            errors.push(CellError::TooBig {
                max: Value::Int(max),
                actual: Value::Int(actual),
            });
        }
    }
}
