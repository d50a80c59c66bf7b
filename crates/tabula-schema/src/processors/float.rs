//! Float processor: parsing, decimal rounding, range checks.

use tabula_model::Value;

use crate::cell_error::CellError;

/// Frozen configuration of a float column.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloatRules {
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Round to this many decimal places, half away from zero. Rounding
    /// is requested configuration, not a data-quality finding.
    pub round: Option<u32>,
}

/// Mirrors the integer processor's acceptance policy: blank text is
/// missing, text parses after trimming, integers widen losslessly, and
/// anything else is invalid input.
pub(super) fn process(rules: &FloatRules, value: Value, errors: &mut Vec<CellError>) -> Value {
    let parsed = match &value {
        Value::Nil => None,
        Value::Text(text) if text.trim().is_empty() => None,
        Value::Text(text) => match text.trim().parse::<f64>() {
            Ok(parsed) if parsed.is_finite() => Some(parsed),
            _ => {
                errors.push(CellError::invalid_input(value.clone()));
                None
            }
        },
        Value::Float(f) => Some(*f),
        Value::Int(i) => Some(*i as f64),
        other => {
            errors.push(CellError::invalid_input(other.clone()));
            None
        }
    };

    match parsed {
        None => Value::Nil,
        Some(mut f) => {
            if let Some(digits) = rules.round {
                f = round_to_places(f, digits);
            }
            if let Some(min) = rules.min {
                if f < min {
                    errors.push(CellError::TooSmall {
                        min: Value::Float(min),
                        actual: Value::Float(f),
                    });
                }
            }
            if let Some(max) = rules.max {
                if f > max {
                    errors.push(CellError::TooBig {
                        max: Value::Float(max),
                        actual: Value::Float(f),
                    });
                }
            }
            Value::Float(f)
        }
    }
}

fn round_to_places(value: f64, digits: u32) -> f64 {
    let scale = 10f64.powi(digits as i32);
    (value * scale).round() / scale
}
