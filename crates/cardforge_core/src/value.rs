//! Lenient numeric input
//!
//! Config values arrive from text fields and from JSON written by older
//! editor versions, where numbers were sometimes stored as strings (`"16"`,
//! `"30px"`). None of these paths may fail: a value that does not parse is
//! replaced by the field's default, never by zero.

use nom::{
    branch::alt,
    bytes::complete::tag,
    combinator::{all_consuming, opt},
    number::complete::double,
    sequence::terminated,
    IResult,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use tracing::debug;

/// Parse a number with an optional CSS unit suffix
///
/// Accepts `px`, `%`, `deg`, `ms` and `s` suffixes. Non-finite values are
/// rejected.
pub fn parse_number(text: &str) -> Option<f64> {
    let result: IResult<&str, f64> = all_consuming(terminated(double, opt(unit)))(text.trim());
    result.ok().map(|(_, v)| v).filter(|v| v.is_finite())
}

/// Parse a number, substituting `fallback` when the text is malformed
pub fn number_or(text: &str, fallback: f64) -> f64 {
    parse_number(text).unwrap_or_else(|| {
        debug!("Malformed number {:?}, using {}", text, fallback);
        fallback
    })
}

/// 2^53: above this an f64 no longer holds every integer
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

fn unit(input: &str) -> IResult<&str, &str> {
    alt((tag("px"), tag("%"), tag("deg"), tag("ms"), tag("s")))(input)
}

/// A numeric JSON field that may hold a number, a numeric string, or junk
#[derive(Clone, Debug, Default, PartialEq)]
pub enum NumberInput {
    Number(f64),
    Text(String),
    #[default]
    Missing,
}

impl NumberInput {
    /// Resolve to a finite number, or `fallback`
    pub fn resolve(&self, fallback: f64) -> f64 {
        match self {
            NumberInput::Number(n) if n.is_finite() => *n,
            NumberInput::Text(text) => number_or(text, fallback),
            _ => fallback,
        }
    }
}

impl From<f64> for NumberInput {
    fn from(value: f64) -> Self {
        NumberInput::Number(value)
    }
}

impl Serialize for NumberInput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            // Whole numbers print as integers, like the documents the web editor wrote
            NumberInput::Number(n) if n.fract() == 0.0 && n.abs() < MAX_EXACT_INT => {
                serializer.serialize_i64(*n as i64)
            }
            NumberInput::Number(n) => serializer.serialize_f64(*n),
            NumberInput::Text(text) => serializer.serialize_str(text),
            NumberInput::Missing => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for NumberInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Number(n) => n.as_f64().map(NumberInput::Number).unwrap_or_default(),
            Value::String(text) => NumberInput::Text(text),
            _ => NumberInput::Missing,
        })
    }
}

/// `deserialize_with` helper: a value of the wrong shape becomes `T::default()`
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_else(|e| {
        debug!("Ignoring malformed field: {}", e);
        T::default()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_numbers() {
        assert_eq!(parse_number("16"), Some(16.0));
        assert_eq!(parse_number(" -8.5 "), Some(-8.5));
    }

    #[test]
    fn test_parse_with_units() {
        assert_eq!(parse_number("30px"), Some(30.0));
        assert_eq!(parse_number("120%"), Some(120.0));
        assert_eq!(parse_number("135deg"), Some(135.0));
        assert_eq!(parse_number("3000ms"), Some(3000.0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("12em"), None);
        assert_eq!(parse_number("inf"), None);
    }

    #[test]
    fn test_number_or_uses_fallback() {
        assert_eq!(number_or("oops", 24.0), 24.0);
        assert_eq!(number_or("12", 24.0), 12.0);
    }

    #[test]
    fn test_number_input_from_json() {
        let values: Vec<NumberInput> =
            serde_json::from_str(r#"[5, "7px", "junk", null, true]"#).unwrap();
        let resolved: Vec<f64> = values.iter().map(|v| v.resolve(1.0)).collect();
        assert_eq!(resolved, vec![5.0, 7.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_whole_numbers_serialize_as_integers() {
        let values = vec![NumberInput::from(400.0), NumberInput::from(0.5), NumberInput::Missing];
        assert_eq!(serde_json::to_string(&values).unwrap(), "[400,0.5,null]");
    }
}
