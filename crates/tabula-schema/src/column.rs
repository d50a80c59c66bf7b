//! Column definitions and the per-value coercion pipeline.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;
use std::sync::Arc;

use regex::Regex;
use tabula_model::Value;

use crate::bound::RowSnapshot;
use crate::cell_error::CellError;
use crate::error::SchemaError;
use crate::processors::{
    BooleanRules, ColumnType, FloatRules, IntegerRules, Processor, StringRules,
};

/// Checks a raw value before any other stage runs.
pub type PreValidateFn = Arc<dyn Fn(&Value) -> bool + Send + Sync>;
/// Transforms the raw value ahead of type processing.
pub type AdaptFn = Arc<dyn Fn(Value) -> anyhow::Result<Value> + Send + Sync>;
/// Checks the final coerced value.
pub type ValidateFn = Arc<dyn Fn(&Value) -> bool + Send + Sync>;
/// Renders a coerced value for one output medium.
pub type PresentFn = Arc<dyn Fn(&Value) -> Value + Send + Sync>;
/// Produces a calculated column's value from the row built so far.
pub type CalculateFn = Arc<dyn Fn(&ColumnDef, &RowSnapshot<'_>) -> Value + Send + Sync>;

/// Declaration-time options for one column.
///
/// All fields are optional; unset fields fall back to the builder's
/// column defaults and then to the documented resolution (`allow_nil`
/// on, `strip` and `empty_text_is_nil` off). Options that do not apply
/// to the declared type are rejected when the column is defined.
#[derive(Clone, Default)]
pub struct ColumnOptions {
    pub header: Option<String>,
    pub allow_nil: Option<bool>,
    pub default: Option<Value>,
    pub strip: Option<bool>,
    pub empty_text_is_nil: Option<bool>,
    pub source_index: Option<usize>,
    pub target_index: Option<usize>,
    /// String columns: shorthand for `min_length..=max_length`.
    pub length: Option<RangeInclusive<usize>>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<Regex>,
    /// Numeric columns: inclusive lower bound.
    pub min: Option<Value>,
    /// Numeric columns: inclusive upper bound.
    pub max: Option<Value>,
    /// Float columns: decimal places to round to.
    pub round: Option<u32>,
    pub true_values: Option<Vec<Value>>,
    pub false_values: Option<Vec<Value>>,
    pub pre_validate: Option<PreValidateFn>,
    pub adapt: Option<AdaptFn>,
    pub validate: Option<ValidateFn>,
    /// Catch-all presenter, used when no per-medium hook matches.
    pub present: Option<PresentFn>,
    /// Per-medium presenters, keyed by medium identifier.
    pub present_for: BTreeMap<String, PresentFn>,
    pub calculator: Option<CalculateFn>,
}

impl ColumnOptions {
    /// Fills unset fields from `defaults`; fields set here win.
    pub(crate) fn merged(self, defaults: &ColumnOptions) -> ColumnOptions {
        let mut present_for = defaults.present_for.clone();
        present_for.extend(self.present_for);
        ColumnOptions {
            header: self.header.or_else(|| defaults.header.clone()),
            allow_nil: self.allow_nil.or(defaults.allow_nil),
            default: self.default.or_else(|| defaults.default.clone()),
            strip: self.strip.or(defaults.strip),
            empty_text_is_nil: self.empty_text_is_nil.or(defaults.empty_text_is_nil),
            source_index: self.source_index,
            target_index: self.target_index,
            length: self.length.or_else(|| defaults.length.clone()),
            min_length: self.min_length.or(defaults.min_length),
            max_length: self.max_length.or(defaults.max_length),
            pattern: self.pattern.or_else(|| defaults.pattern.clone()),
            min: self.min.or_else(|| defaults.min.clone()),
            max: self.max.or_else(|| defaults.max.clone()),
            round: self.round.or(defaults.round),
            true_values: self.true_values.or_else(|| defaults.true_values.clone()),
            false_values: self.false_values.or_else(|| defaults.false_values.clone()),
            pre_validate: self.pre_validate.or_else(|| defaults.pre_validate.clone()),
            adapt: self.adapt.or_else(|| defaults.adapt.clone()),
            validate: self.validate.or_else(|| defaults.validate.clone()),
            present: self.present.or_else(|| defaults.present.clone()),
            present_for,
            calculator: self.calculator,
        }
    }
}

impl fmt::Debug for ColumnOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnOptions")
            .field("header", &self.header)
            .field("allow_nil", &self.allow_nil)
            .field("source_index", &self.source_index)
            .field("target_index", &self.target_index)
            .finish_non_exhaustive()
    }
}

/// Rejects options the declared type cannot use.
pub(crate) fn verify_options(
    column_type: ColumnType,
    accessor: &str,
    options: &ColumnOptions,
) -> Result<(), SchemaError> {
    use ColumnType as T;

    let text = column_type == T::String;
    let numeric = matches!(column_type, T::Integer | T::Float);
    let calculated = column_type == T::Calculated;

    let inapplicable: &[(&'static str, bool)] = &[
        ("length", options.length.is_some() && !text),
        ("min_length", options.min_length.is_some() && !text),
        ("max_length", options.max_length.is_some() && !text),
        ("pattern", options.pattern.is_some() && !text),
        ("min", options.min.is_some() && !numeric),
        ("max", options.max.is_some() && !numeric),
        ("round", options.round.is_some() && column_type != T::Float),
        (
            "true_values",
            options.true_values.is_some() && column_type != T::Boolean,
        ),
        (
            "false_values",
            options.false_values.is_some() && column_type != T::Boolean,
        ),
        ("calculator", options.calculator.is_some() && !calculated),
        ("source_index", options.source_index.is_some() && calculated),
        ("default", options.default.is_some() && calculated),
        ("strip", options.strip.is_some() && calculated),
        (
            "empty_text_is_nil",
            options.empty_text_is_nil.is_some() && calculated,
        ),
        ("pre_validate", options.pre_validate.is_some() && calculated),
        ("adapt", options.adapt.is_some() && calculated),
        ("validate", options.validate.is_some() && calculated),
    ];
    for &(option, wrong) in inapplicable {
        if wrong {
            return Err(SchemaError::InapplicableOption {
                accessor: accessor.to_string(),
                option,
                column_type,
            });
        }
    }

    // Bounds must match the column's numeric flavor.
    for (option, bound) in [("min", &options.min), ("max", &options.max)] {
        let fits = match (column_type, bound) {
            (_, None) => true,
            (T::Integer, Some(value)) => value.as_int().is_some(),
            (T::Float, Some(value)) => value.as_float().is_some(),
            _ => true,
        };
        if !fits {
            return Err(SchemaError::InapplicableOption {
                accessor: accessor.to_string(),
                option,
                column_type,
            });
        }
    }

    Ok(())
}

/// A frozen column definition.
///
/// Binds a type processor to a named, indexed column together with the
/// hooks and flags of the per-value pipeline.
#[derive(Clone)]
pub struct ColumnDef {
    column_type: ColumnType,
    accessor: String,
    header: Option<String>,
    source_index: Option<usize>,
    target_index: usize,
    allow_nil: bool,
    strip: bool,
    empty_text_is_nil: bool,
    default: Option<Value>,
    pre_validate: Option<PreValidateFn>,
    adapt: Option<AdaptFn>,
    validate: Option<ValidateFn>,
    present_all: Option<PresentFn>,
    presenters: BTreeMap<String, PresentFn>,
    calculator: Option<CalculateFn>,
    processor: Option<Processor>,
}

impl ColumnDef {
    pub(crate) fn new(
        column_type: ColumnType,
        accessor: String,
        options: ColumnOptions,
        source_index: Option<usize>,
        target_index: usize,
    ) -> ColumnDef {
        let processor = build_processor(column_type, &options);
        ColumnDef {
            column_type,
            accessor,
            header: options.header,
            source_index,
            target_index,
            allow_nil: options.allow_nil.unwrap_or(true),
            strip: options.strip.unwrap_or(false),
            empty_text_is_nil: options.empty_text_is_nil.unwrap_or(false),
            default: options.default,
            pre_validate: options.pre_validate,
            adapt: options.adapt,
            validate: options.validate,
            present_all: options.present,
            presenters: options.present_for,
            calculator: options.calculator,
            processor,
        }
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    pub fn accessor(&self) -> &str {
        &self.accessor
    }

    pub fn header(&self) -> Option<&str> {
        self.header.as_deref()
    }

    /// Position in raw input rows; `None` for calculated columns.
    pub fn source_index(&self) -> Option<usize> {
        self.source_index
    }

    /// Position in coerced output rows.
    pub fn target_index(&self) -> usize {
        self.target_index
    }

    pub fn allow_nil(&self) -> bool {
        self.allow_nil
    }

    pub fn is_calculated(&self) -> bool {
        self.column_type == ColumnType::Calculated
    }

    /// Runs the full coercion pipeline on one raw cell value.
    ///
    /// Stages, in order: pre-validate, strip, empty-to-nil, adapt,
    /// default, type processing, validate, nil gate. A pre-validator
    /// rejection or adaptor failure short-circuits everything after it.
    /// Validation findings are accumulated, never raised; the returned
    /// value is always usable.
    pub fn coerce(&self, raw: Value) -> (Value, Vec<CellError>) {
        let mut errors = Vec::new();

        if let Some(pre_validate) = &self.pre_validate {
            if !pre_validate(&raw) {
                errors.push(CellError::invalid_input(raw));
                return (Value::Nil, errors);
            }
        }

        let mut value = raw;
        if self.strip {
            if let Value::Text(text) = &value {
                value = Value::Text(text.trim().to_string());
            }
        }
        if self.empty_text_is_nil {
            if matches!(&value, Value::Text(text) if text.is_empty()) {
                value = Value::Nil;
            }
        }

        if let Some(adapt) = &self.adapt {
            value = match adapt(value) {
                Ok(adapted) => adapted,
                Err(error) => {
                    errors.push(CellError::Exception {
                        message: format!("{error:#}"),
                    });
                    return (Value::Nil, errors);
                }
            };
        }

        if value.is_nil() {
            if let Some(default) = &self.default {
                value = default.clone();
            }
        }

        if let Some(processor) = &self.processor {
            if !value.is_nil() {
                value = processor.process(value, &mut errors);
            }
        }

        if let Some(validate) = &self.validate {
            if !value.is_nil() && !validate(&value) {
                errors.push(CellError::InvalidValue);
            }
        }

        if value.is_nil() && !self.allow_nil {
            errors.push(CellError::InvalidNilValue);
        }

        (value, errors)
    }

    /// Renders a coerced value for one medium: the per-medium hook wins,
    /// then the catch-all hook, then the value itself.
    pub fn present(&self, value: &Value, medium: &str) -> Value {
        if let Some(hook) = self.presenters.get(medium) {
            return hook(value);
        }
        if let Some(hook) = &self.present_all {
            return hook(value);
        }
        value.clone()
    }

    /// Invokes the calculator against the row built so far. Calculated
    /// columns always carry one; for sourced columns this yields `Nil`.
    pub fn calculate(&self, row: &RowSnapshot<'_>) -> Value {
        match &self.calculator {
            Some(calculator) => calculator(self, row),
            None => Value::Nil,
        }
    }
}

impl fmt::Debug for ColumnDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("column_type", &self.column_type)
            .field("accessor", &self.accessor)
            .field("source_index", &self.source_index)
            .field("target_index", &self.target_index)
            .field("allow_nil", &self.allow_nil)
            .finish_non_exhaustive()
    }
}

fn build_processor(column_type: ColumnType, options: &ColumnOptions) -> Option<Processor> {
    match column_type {
        ColumnType::String => {
            let (range_min, range_max) = match &options.length {
                Some(range) => (Some(*range.start()), Some(*range.end())),
                None => (None, None),
            };
            Some(Processor::String(StringRules {
                min_length: options.min_length.or(range_min),
                max_length: options.max_length.or(range_max),
                pattern: options.pattern.clone(),
            }))
        }
        ColumnType::Integer => Some(Processor::Integer(IntegerRules {
            min: options.min.as_ref().and_then(Value::as_int),
            max: options.max.as_ref().and_then(Value::as_int),
        })),
        ColumnType::Float => Some(Processor::Float(FloatRules {
            min: options.min.as_ref().and_then(Value::as_float),
            max: options.max.as_ref().and_then(Value::as_float),
            round: options.round,
        })),
        ColumnType::Date => Some(Processor::Date),
        ColumnType::DateTime => Some(Processor::DateTime),
        ColumnType::Boolean => {
            let mut rules = BooleanRules::default();
            if let Some(tokens) = &options.true_values {
                rules.true_values = tokens.clone();
            }
            if let Some(tokens) = &options.false_values {
                rules.false_values = tokens.clone();
            }
            Some(Processor::Boolean(rules))
        }
        ColumnType::Binary => Some(Processor::Binary),
        ColumnType::Calculated => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(column_type: ColumnType, options: ColumnOptions) -> ColumnDef {
        ColumnDef::new(column_type, "value".into(), options, Some(0), 0)
    }

    #[test]
    fn test_strip_runs_before_empty_to_nil() {
        let def = column(
            ColumnType::String,
            ColumnOptions {
                strip: Some(true),
                empty_text_is_nil: Some(true),
                ..ColumnOptions::default()
            },
        );
        let (value, errors) = def.coerce(Value::from("   "));
        assert_eq!(value, Value::Nil);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_default_fills_post_adaptation_nil() {
        let def = column(
            ColumnType::Integer,
            ColumnOptions {
                empty_text_is_nil: Some(true),
                default: Some(Value::Int(7)),
                ..ColumnOptions::default()
            },
        );
        let (value, errors) = def.coerce(Value::from(""));
        assert_eq!(value, Value::Int(7));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_pre_validator_rejection_stops_the_pipeline() {
        let def = column(
            ColumnType::Integer,
            ColumnOptions {
                allow_nil: Some(false),
                default: Some(Value::Int(1)),
                pre_validate: Some(Arc::new(|value| !value.is_nil())),
                ..ColumnOptions::default()
            },
        );
        let (value, errors) = def.coerce(Value::Nil);
        // Exactly one finding: no default substitution, no nil gate.
        assert_eq!(value, Value::Nil);
        assert_eq!(errors, vec![CellError::invalid_input(Value::Nil)]);
    }

    #[test]
    fn test_adaptor_failure_short_circuits() {
        let def = column(
            ColumnType::Integer,
            ColumnOptions {
                allow_nil: Some(false),
                adapt: Some(Arc::new(|_| anyhow::bail!("boom"))),
                ..ColumnOptions::default()
            },
        );
        let (value, errors) = def.coerce(Value::from("42"));
        assert_eq!(value, Value::Nil);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code(), "exception");
    }

    #[test]
    fn test_adaptor_transforms_before_processing() {
        let def = column(
            ColumnType::Integer,
            ColumnOptions {
                adapt: Some(Arc::new(|value| {
                    Ok(match value {
                        Value::Text(text) => Value::Text(text.replace('\'', "")),
                        other => other,
                    })
                })),
                ..ColumnOptions::default()
            },
        );
        let (value, errors) = def.coerce(Value::from("1'024"));
        assert_eq!(value, Value::Int(1024));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_validator_runs_only_on_non_nil() {
        let def = column(
            ColumnType::Integer,
            ColumnOptions {
                validate: Some(Arc::new(|value| value.as_int().is_some_and(|i| i % 2 == 0))),
                ..ColumnOptions::default()
            },
        );
        let (_, errors) = def.coerce(Value::from("3"));
        assert_eq!(errors, vec![CellError::InvalidValue]);
        let (_, errors) = def.coerce(Value::from("4"));
        assert!(errors.is_empty());
        let (_, errors) = def.coerce(Value::Nil);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_nil_gate() {
        let def = column(
            ColumnType::String,
            ColumnOptions {
                allow_nil: Some(false),
                empty_text_is_nil: Some(true),
                ..ColumnOptions::default()
            },
        );
        let (value, errors) = def.coerce(Value::from(""));
        assert_eq!(value, Value::Nil);
        assert_eq!(errors, vec![CellError::InvalidNilValue]);
    }

    #[test]
    fn test_coercion_is_idempotent() {
        let def = column(ColumnType::Integer, ColumnOptions::default());
        let (once, errors) = def.coerce(Value::from("42"));
        assert!(errors.is_empty());
        let (twice, errors) = def.coerce(once.clone());
        assert_eq!(once, twice);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_present_prefers_medium_hook() {
        let mut present_for: BTreeMap<String, PresentFn> = BTreeMap::new();
        present_for.insert(
            "csv".into(),
            Arc::new(|value| Value::Text(format!("csv:{value}"))),
        );
        let def = column(
            ColumnType::String,
            ColumnOptions {
                present: Some(Arc::new(|value| Value::Text(format!("any:{value}")))),
                present_for,
                ..ColumnOptions::default()
            },
        );
        let value = Value::from("x");
        assert_eq!(def.present(&value, "csv"), Value::from("csv:x"));
        assert_eq!(def.present(&value, "html"), Value::from("any:x"));
    }

    #[test]
    fn test_verify_rejects_inapplicable_options() {
        let options = ColumnOptions {
            pattern: Some(Regex::new("x").unwrap()),
            ..ColumnOptions::default()
        };
        let err = verify_options(ColumnType::Integer, "age", &options).unwrap_err();
        assert_eq!(
            err,
            SchemaError::InapplicableOption {
                accessor: "age".into(),
                option: "pattern",
                column_type: ColumnType::Integer,
            }
        );
    }

    #[test]
    fn test_verify_rejects_mismatched_bound_flavor() {
        let options = ColumnOptions {
            min: Some(Value::from("low")),
            ..ColumnOptions::default()
        };
        let err = verify_options(ColumnType::Integer, "age", &options).unwrap_err();
        assert_eq!(
            err,
            SchemaError::InapplicableOption {
                accessor: "age".into(),
                option: "min",
                column_type: ColumnType::Integer,
            }
        );
    }

    #[test]
    fn test_length_range_expands_to_bounds() {
        let def = column(
            ColumnType::String,
            ColumnOptions {
                length: Some(2..=4),
                ..ColumnOptions::default()
            },
        );
        let (_, errors) = def.coerce(Value::from("x"));
        assert_eq!(errors[0].code(), "too_short");
        let (_, errors) = def.coerce(Value::from("abcde"));
        assert_eq!(errors[0].code(), "too_long");
    }
}
