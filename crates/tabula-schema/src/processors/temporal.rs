//! Date and datetime processors.
//!
//! Text input is limited to ISO-8601-like forms: `YYYY-MM-DD`, optionally
//! followed by `T` or a space and `HH`, `HH:MM`, or `HH:MM:SS`. The date
//! processor reserves `not_a_date` for values that carry a non-midnight
//! time component; everything unparseable is `invalid_input`.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use tabula_model::Value;

use crate::cell_error::CellError;

pub(super) fn process_date(value: Value, errors: &mut Vec<CellError>) -> Value {
    match &value {
        Value::Nil => Value::Nil,
        Value::Date(d) => Value::Date(*d),
        Value::DateTime(dt) => {
            if !is_midnight(dt.time()) {
                errors.push(CellError::NotADate {
                    value: value.clone(),
                });
            }
            Value::Date(dt.date())
        }
        Value::Text(text) if text.trim().is_empty() => Value::Nil,
        Value::Text(text) => match parse_temporal(text) {
            Some(dt) => {
                if !is_midnight(dt.time()) {
                    errors.push(CellError::NotADate {
                        value: value.clone(),
                    });
                }
                Value::Date(dt.date())
            }
            None => {
                errors.push(CellError::invalid_input(value.clone()));
                Value::Nil
            }
        },
        other => {
            errors.push(CellError::invalid_input(other.clone()));
            Value::Nil
        }
    }
}

pub(super) fn process_datetime(value: Value, errors: &mut Vec<CellError>) -> Value {
    match &value {
        Value::Nil => Value::Nil,
        Value::DateTime(dt) => Value::DateTime(*dt),
        Value::Date(d) => Value::DateTime(midnight(*d)),
        Value::Text(text) if text.trim().is_empty() => Value::Nil,
        Value::Text(text) => match parse_temporal(text) {
            Some(dt) => Value::DateTime(dt),
            None => {
                errors.push(CellError::invalid_input(value.clone()));
                Value::Nil
            }
        },
        other => {
            errors.push(CellError::invalid_input(other.clone()));
            Value::Nil
        }
    }
}

fn is_midnight(time: NaiveTime) -> bool {
    time.hour() == 0 && time.minute() == 0 && time.second() == 0
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    // Midnight always exists for a NaiveDate.
    date.and_hms_opt(0, 0, 0).unwrap_or_default()
}

/// Parses `YYYY-MM-DD` (month and day digits may be unpadded) with an
/// optional `T`- or space-separated time of day. Time components must be
/// two digits; minutes and seconds may be truncated away, missing
/// components read as zero.
fn parse_temporal(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    let (date_part, time_part) = match text.split_once(['T', ' ']) {
        Some((date, time)) => (date, Some(time)),
        None => (text, None),
    };

    let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()?;
    let Some(time_part) = time_part else {
        return Some(midnight(date));
    };

    let mut components = time_part.split(':');
    let hour = two_digits(components.next()?)?;
    let minute = components.next().map(two_digits).unwrap_or(Some(0))?;
    let second = components.next().map(two_digits).unwrap_or(Some(0))?;
    if components.next().is_some() {
        return None;
    }
    date.and_hms_opt(hour, minute, second)
}

fn two_digits(text: &str) -> Option<u32> {
    if text.len() == 2 && text.bytes().all(|b| b.is_ascii_digit()) {
        text.parse().ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn run_date(value: Value) -> (Value, Vec<CellError>) {
        let mut errors = Vec::new();
        let processed = process_date(value, &mut errors);
        (processed, errors)
    }

    fn run_datetime(value: Value) -> (Value, Vec<CellError>) {
        let mut errors = Vec::new();
        let processed = process_datetime(value, &mut errors);
        (processed, errors)
    }

    #[test]
    fn test_parse_temporal_truncations() {
        let base = date(2024, 3, 7);
        assert_eq!(parse_temporal("2024-03-07"), base.and_hms_opt(0, 0, 0));
        assert_eq!(parse_temporal("2024-03-07T13"), base.and_hms_opt(13, 0, 0));
        assert_eq!(
            parse_temporal("2024-03-07 13:05"),
            base.and_hms_opt(13, 5, 0)
        );
        assert_eq!(
            parse_temporal("2024-03-07T13:05:59"),
            base.and_hms_opt(13, 5, 59)
        );
        // Date digits may be unpadded; time components may not.
        assert_eq!(parse_temporal("2024-3-7"), base.and_hms_opt(0, 0, 0));
        assert_eq!(parse_temporal("2024-03-07T9"), None);
        assert_eq!(parse_temporal("2024-03-07T13:05:59:01"), None);
        assert_eq!(parse_temporal("2024-13-01"), None);
    }

    #[test]
    fn test_date_accepts_midnight_datetime() {
        let dt = date(2024, 3, 7).and_hms_opt(0, 0, 0).unwrap();
        let (value, errors) = run_date(Value::DateTime(dt));
        assert_eq!(value, Value::Date(date(2024, 3, 7)));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_date_rejects_time_of_day() {
        let (value, errors) = run_date(Value::from("2024-03-07 13:00"));
        // Still truncates, but records the finding.
        assert_eq!(value, Value::Date(date(2024, 3, 7)));
        assert_eq!(errors[0].code(), "not_a_date");
    }

    #[test]
    fn test_date_unparseable_is_invalid_input() {
        let (value, errors) = run_date(Value::from("07.03.2024"));
        assert_eq!(value, Value::Nil);
        assert_eq!(errors[0].code(), "invalid_input");
    }

    #[test]
    fn test_date_blank_is_nil() {
        let (value, errors) = run_date(Value::from(" "));
        assert_eq!(value, Value::Nil);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_datetime_widens_date() {
        let (value, errors) = run_datetime(Value::Date(date(2024, 3, 7)));
        assert_eq!(
            value,
            Value::DateTime(date(2024, 3, 7).and_hms_opt(0, 0, 0).unwrap())
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn test_datetime_parses_text() {
        let (value, errors) = run_datetime(Value::from("2024-03-07T13:05:59"));
        assert_eq!(
            value,
            Value::DateTime(date(2024, 3, 7).and_hms_opt(13, 5, 59).unwrap())
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn test_datetime_rejects_other_kinds() {
        let (value, errors) = run_datetime(Value::Int(20240307));
        assert_eq!(value, Value::Nil);
        assert_eq!(errors[0].code(), "invalid_input");
    }
}
