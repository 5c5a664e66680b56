//! Stock `parse` callbacks.
//!
//! Each function has the shape `Fn(ArgValue) -> Result<ArgValue, Rejection>`
//! and can be passed straight to [`ArgSpec::parse`]. An undefined value is
//! passed through untouched, so these compose with optional arguments that
//! have no default.
//!
//! ```
//! use callmap_binder::parse;
//! use callmap_core::ArgSpec;
//!
//! let spec = ArgSpec::named("limit").parse(parse::integer);
//! assert!(spec.parse.is_some());
//! ```
//!
//! [`ArgSpec::parse`]: callmap_core::ArgSpec::parse

use callmap_core::{ArgValue, Rejection};
use serde_json::{json, Number, Value};

/// Coerces to a JSON number.
///
/// Numeric strings (surrounding whitespace ignored) and booleans are
/// converted; integral results are kept as integers.
pub fn number(value: ArgValue) -> Result<ArgValue, Rejection> {
    value.map(|v| to_number(&v).map(number_value)).transpose()
}

/// Coerces to an integer; fractional values are rejected.
pub fn integer(value: ArgValue) -> Result<ArgValue, Rejection> {
    value
        .map(|v| {
            let n = to_number(&v)?;
            if n.fract() != 0.0 {
                return Err(rejected("expected_integer", &v));
            }
            Ok(number_value(n))
        })
        .transpose()
}

/// Coerces to a string. Non-string values use their JSON text.
#[allow(clippy::unnecessary_wraps)]
pub fn string(value: ArgValue) -> Result<ArgValue, Rejection> {
    Ok(value.map(|v| match v {
        Value::String(s) => Value::String(s),
        other => Value::String(other.to_string()),
    }))
}

/// Coerces to a boolean.
///
/// Accepts booleans, `"true"`/`"false"`/`"1"`/`"0"` and numbers (zero is
/// `false`).
pub fn boolean(value: ArgValue) -> Result<ArgValue, Rejection> {
    value
        .map(|v| {
            let b = match &v {
                Value::Bool(b) => *b,
                Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
                Value::String(s) => match s.trim() {
                    "true" | "1" => true,
                    "false" | "0" => false,
                    _ => return Err(rejected("expected_boolean", &v)),
                },
                _ => return Err(rejected("expected_boolean", &v)),
            };
            Ok(Value::Bool(b))
        })
        .transpose()
}

fn to_number(value: &Value) -> Result<f64, Rejection> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|n| n.is_finite())
        .ok_or_else(|| rejected("expected_number", value))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n >= i64::MIN as f64 && n <= i64::MAX as f64 {
        Value::Number(Number::from(n as i64))
    } else {
        Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

fn rejected(code: &str, value: &Value) -> Rejection {
    Rejection::new(code).with_details(json!({ "value": value }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number() {
        assert_eq!(number(Some(json!("1"))).unwrap(), Some(json!(1)));
        assert_eq!(number(Some(json!(" 2.5 "))).unwrap(), Some(json!(2.5)));
        assert_eq!(number(Some(json!(true))).unwrap(), Some(json!(1)));
        assert_eq!(number(Some(json!(-3))).unwrap(), Some(json!(-3)));
        assert_eq!(number(None).unwrap(), None);
    }

    #[test]
    fn test_number_rejects_garbage() {
        let err = number(Some(json!("twelve"))).unwrap_err();
        assert_eq!(err.message, "expected_number");
        assert_eq!(err.details, Some(json!({ "value": "twelve" })));
        assert!(number(Some(json!(null))).is_err());
        assert!(number(Some(json!([1]))).is_err());
    }

    #[test]
    fn test_integer() {
        assert_eq!(integer(Some(json!("42"))).unwrap(), Some(json!(42)));
        assert_eq!(integer(Some(json!(7.0))).unwrap(), Some(json!(7)));
        assert_eq!(integer(Some(json!(1.5))).unwrap_err().message, "expected_integer");
    }

    #[test]
    fn test_string() {
        assert_eq!(string(Some(json!("x"))).unwrap(), Some(json!("x")));
        assert_eq!(string(Some(json!(3))).unwrap(), Some(json!("3")));
        assert_eq!(string(Some(json!(null))).unwrap(), Some(json!("null")));
        assert_eq!(string(None).unwrap(), None);
    }

    #[test]
    fn test_boolean() {
        assert_eq!(boolean(Some(json!("true"))).unwrap(), Some(json!(true)));
        assert_eq!(boolean(Some(json!("0"))).unwrap(), Some(json!(false)));
        assert_eq!(boolean(Some(json!(0))).unwrap(), Some(json!(false)));
        assert_eq!(boolean(Some(json!(2))).unwrap(), Some(json!(true)));
        assert!(boolean(Some(json!("maybe"))).is_err());
    }
}
