use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

/// A numeric constraint bound, or a submitted value seen as a number.
///
/// Comparisons are exact, including an integer against a decimal beyond the
/// range where `f64` holds every integer.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    Integer(i64),
    Decimal(f64),
}

impl Number {
    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Integer(i) => i as f64,
            Number::Decimal(d) => d,
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (*self, *other) {
            (Number::Integer(a), Number::Integer(b)) => Some(a.cmp(&b)),
            (Number::Integer(i), Number::Decimal(d)) => compare_integer_decimal(i, d),
            (Number::Decimal(d), Number::Integer(i)) => {
                compare_integer_decimal(i, d).map(Ordering::reverse)
            }
            (Number::Decimal(a), Number::Decimal(b)) => a.partial_cmp(&b),
        }
    }
}

/// Compare without casting `i` to `f64`, which is lossy above 2^53
fn compare_integer_decimal(i: i64, d: f64) -> Option<Ordering> {
    if d.is_nan() {
        return None;
    }
    // 2^63 is exact in f64; i64 covers [-2^63, 2^63)
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if d >= LIMIT {
        return Some(Ordering::Less);
    }
    if d < -LIMIT {
        return Some(Ordering::Greater);
    }

    // In range, so the floor converts to i64 exactly
    let floor = d.floor();
    match i.cmp(&(floor as i64)) {
        Ordering::Equal if d > floor => Some(Ordering::Less),
        ordering => Some(ordering),
    }
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::Decimal(d) => write!(f, "{}", d),
        }
    }
}

impl From<i64> for Number {
    fn from(i: i64) -> Self {
        Number::Integer(i)
    }
}

impl From<i32> for Number {
    fn from(i: i32) -> Self {
        Number::Integer(i.into())
    }
}

impl From<f64> for Number {
    fn from(d: f64) -> Self {
        Number::Decimal(d)
    }
}

impl From<confdesc_schema::Number> for Number {
    fn from(n: confdesc_schema::Number) -> Self {
        match n {
            confdesc_schema::Number::Integer(i) => Number::Integer(i),
            confdesc_schema::Number::Decimal(d) => Number::Decimal(d),
        }
    }
}

/// A value submitted for a configuration parameter.
///
/// Whether a value was submitted at all is expressed as `Option<&Value>` by
/// the validators; there is no null variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Boolean(bool),
    Integer(i64),
    Decimal(f64),
    Text(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Convert a JSON value; `null` is an absent value.
    ///
    /// Nulls nested in arrays and objects are dropped.
    pub fn from_json(json: serde_json::Value) -> Option<Value> {
        use serde_json::Value as Json;

        match json {
            Json::Null => None,
            Json::Bool(b) => Some(Value::Boolean(b)),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Some(Value::Integer(i)),
                None => n.as_f64().map(Value::Decimal),
            },
            Json::String(s) => Some(Value::Text(s)),
            Json::Array(items) => Some(Value::List(
                items.into_iter().filter_map(Value::from_json).collect(),
            )),
            Json::Object(entries) => Some(Value::Map(
                entries
                    .into_iter()
                    .filter_map(|(k, v)| Value::from_json(v).map(|v| (k, v)))
                    .collect(),
            )),
        }
    }

    /// The value as a number, if it is a finite integer or decimal
    pub fn as_number(&self) -> Option<Number> {
        match *self {
            Value::Integer(i) => Some(Number::Integer(i)),
            Value::Decimal(d) if d.is_finite() => Some(Number::Decimal(d)),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_scalar(&self) -> bool {
        !matches!(self, Value::List(_) | Value::Map(_))
    }

    /// Name of the runtime kind, for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Decimal(_) => "decimal",
            Value::Text(_) => "text",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::Text(s) => f.write_str(s),
            Value::List(items) => {
                f.write_str("[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Map(entries) => {
                f.write_str("{")?;
                for (idx, (key, item)) in entries.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}={}", key, item)?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i.into())
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Value::Decimal(d)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

/// Errors reading a file of submitted values
#[derive(Debug, thiserror::Error)]
pub enum ValuesError {
    #[error("Failed to parse TOML values: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to parse JSON values: {0}")]
    Json(#[from] serde_json::Error),

    #[error("JSON values must be an object keyed by parameter name")]
    NotAnObject,
}

/// Parse a TOML table of parameter name to value
pub fn values_from_toml(content: &str) -> Result<HashMap<String, Value>, ValuesError> {
    Ok(toml::from_str(content)?)
}

/// Parse a JSON object of parameter name to value; `null` entries are absent
pub fn values_from_json(content: &str) -> Result<HashMap<String, Value>, ValuesError> {
    match serde_json::from_str(content)? {
        serde_json::Value::Object(entries) => Ok(entries
            .into_iter()
            .filter_map(|(k, v)| Value::from_json(v).map(|v| (k, v)))
            .collect()),
        _ => Err(ValuesError::NotAnObject),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_comparison() {
        assert!(Number::Integer(3) < Number::Integer(5));
        assert!(Number::Decimal(4.5) < Number::Integer(5));
        assert_eq!(Number::Integer(5), Number::Decimal(5.0));
        assert!(Number::Integer(i64::MAX) > Number::Integer(i64::MAX - 1));
    }

    #[test]
    fn test_mixed_comparison_is_exact_for_large_integers() {
        let two_pow_53 = 9_007_199_254_740_992_i64;
        assert!(Number::Integer(two_pow_53 + 1) > Number::Decimal(two_pow_53 as f64));
        assert!(Number::Decimal(two_pow_53 as f64) < Number::Integer(two_pow_53 + 1));
        assert_eq!(Number::Integer(two_pow_53), Number::Decimal(two_pow_53 as f64));

        assert!(Number::Integer(2) > Number::Decimal(1.5));
        assert!(Number::Integer(-2) < Number::Decimal(-1.5));
        assert!(Number::Integer(i64::MAX) < Number::Decimal(f64::INFINITY));
        assert!(Number::Integer(i64::MIN) > Number::Decimal(-1e300));
        assert_eq!(Number::Integer(1).partial_cmp(&Number::Decimal(f64::NAN)), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Decimal(5.0).to_string(), "5");
        assert_eq!(Value::Decimal(2.5).to_string(), "2.5");
        assert_eq!(Value::from("abc").to_string(), "abc");
        assert_eq!(
            Value::List(vec![Value::Integer(1), Value::Boolean(true)]).to_string(),
            "[1, true]"
        );
        assert_eq!(Number::Integer(5).to_string(), "5");
    }

    #[test]
    fn test_as_number_rejects_non_finite() {
        assert_eq!(Value::Decimal(f64::NAN).as_number(), None);
        assert_eq!(Value::from("5").as_number(), None);
        assert_eq!(Value::Integer(5).as_number(), Some(Number::Integer(5)));
    }

    #[test]
    fn test_from_json() {
        assert_eq!(Value::from_json(serde_json::Value::Null), None);
        assert_eq!(
            Value::from_json(serde_json::json!([1, null, "a"])),
            Some(Value::List(vec![Value::Integer(1), Value::from("a")]))
        );
        assert_eq!(
            Value::from_json(serde_json::json!(1.5)),
            Some(Value::Decimal(1.5))
        );
    }

    #[test]
    fn test_values_from_toml() {
        let values = values_from_toml(
            r#"
            host = "example.org"
            port = 8080
            ratio = 0.5
            tls = true
            tags = ["a", "b"]
            "#,
        )
        .unwrap();

        assert_eq!(values["host"], Value::from("example.org"));
        assert_eq!(values["port"], Value::Integer(8080));
        assert_eq!(values["ratio"], Value::Decimal(0.5));
        assert_eq!(values["tls"], Value::Boolean(true));
        assert_eq!(
            values["tags"],
            Value::List(vec![Value::from("a"), Value::from("b")])
        );
    }

    #[test]
    fn test_values_from_json_drops_null() {
        let values = values_from_json(r#"{"host": null, "port": 1}"#).unwrap();
        assert!(!values.contains_key("host"));
        assert_eq!(values["port"], Value::Integer(1));

        assert!(matches!(
            values_from_json("[1, 2]"),
            Err(ValuesError::NotAnObject)
        ));
    }
}
