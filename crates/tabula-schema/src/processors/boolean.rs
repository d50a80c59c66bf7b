//! Boolean processor: token-table lookup.

use tabula_model::Value;

use crate::cell_error::CellError;

/// Frozen configuration of a boolean column.
#[derive(Debug, Clone, PartialEq)]
pub struct BooleanRules {
    pub true_values: Vec<Value>,
    pub false_values: Vec<Value>,
}

/// Without configured tokens only native booleans are accepted.
impl Default for BooleanRules {
    fn default() -> Self {
        BooleanRules {
            true_values: vec![Value::Bool(true)],
            false_values: vec![Value::Bool(false)],
        }
    }
}

impl BooleanRules {
    fn acceptable(&self) -> Vec<Value> {
        let mut tokens = self.true_values.clone();
        tokens.extend(self.false_values.iter().cloned());
        tokens
    }
}

/// Native booleans always pass through. `Nil` maps to `Nil` unless `Nil`
/// itself is a configured token. Unknown tokens record the acceptable
/// token list.
pub(super) fn process(rules: &BooleanRules, value: Value, errors: &mut Vec<CellError>) -> Value {
    if let Value::Bool(b) = value {
        return Value::Bool(b);
    }
    if rules.true_values.contains(&value) {
        return Value::Bool(true);
    }
    if rules.false_values.contains(&value) {
        return Value::Bool(false);
    }
    if value.is_nil() {
        return Value::Nil;
    }
    errors.push(CellError::InvalidInput {
        value,
        acceptable: Some(rules.acceptable()),
    });
    Value::Nil
}
