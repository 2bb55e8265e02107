use serde::de::{self, Deserialize, Deserializer, Visitor};
use serde::ser::{Serialize, Serializer};
use smol_str::SmolStr;
use std::convert::TryFrom;
use std::fmt;

use crate::error::MarshalError;

// ─── SpookyNumber ───────────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq)]
pub enum SpookyNumber {
    I64(i64),
    U64(u64),
    F64(f64),
}

impl fmt::Debug for SpookyNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpookyNumber::I64(i) => write!(f, "I64({})", i),
            SpookyNumber::U64(u) => write!(f, "U64({})", u),
            SpookyNumber::F64(v) => write!(f, "F64({})", v),
        }
    }
}

impl fmt::Display for SpookyNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpookyNumber::I64(i) => write!(f, "{}", i),
            SpookyNumber::U64(u) => write!(f, "{}", u),
            SpookyNumber::F64(v) => write!(f, "{}", v),
        }
    }
}

impl SpookyNumber {
    pub fn as_f64(self) -> f64 {
        match self {
            SpookyNumber::I64(i) => i as f64,
            SpookyNumber::U64(u) => u as f64,
            SpookyNumber::F64(f) => f,
        }
    }

    pub fn as_i64(self) -> Option<i64> {
        match self {
            SpookyNumber::I64(i) => Some(i),
            SpookyNumber::U64(u) => i64::try_from(u).ok(),
            SpookyNumber::F64(f) => {
                if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
                    Some(f as i64)
                } else {
                    None
                }
            }
        }
    }
}

// ─── SpookyValue ────────────────────────────────────────────────────────────

/// A loosely-typed scalar field value.
///
/// `PartialEq` here is strict structural equality (`Str("69") != I64(69)`).
/// Change detection and unindexed lookups use [`crate::equality::loose_eq`]
/// instead.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SpookyValue {
    #[default]
    Null,
    Bool(bool),
    Number(SpookyNumber),
    Str(SmolStr),
}

impl SpookyValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SpookyValue::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SpookyValue::Number(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SpookyValue::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SpookyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SpookyValue::Null)
    }

    /// Name of the variant, for log lines and error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            SpookyValue::Null => "null",
            SpookyValue::Bool(_) => "bool",
            SpookyValue::Number(SpookyNumber::F64(_)) => "float",
            SpookyValue::Number(_) => "int",
            SpookyValue::Str(_) => "string",
        }
    }
}

impl fmt::Display for SpookyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpookyValue::Null => f.write_str("null"),
            SpookyValue::Bool(b) => write!(f, "{}", b),
            SpookyValue::Number(n) => write!(f, "{}", n),
            SpookyValue::Str(s) => f.write_str(s),
        }
    }
}

// ─── Serialize / Deserialize ────────────────────────────────────────────────

impl Serialize for SpookyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SpookyValue::Null => serializer.serialize_none(),
            SpookyValue::Bool(b) => serializer.serialize_bool(*b),
            SpookyValue::Number(n) => match n {
                SpookyNumber::I64(i) => serializer.serialize_i64(*i),
                SpookyNumber::U64(u) => serializer.serialize_u64(*u),
                SpookyNumber::F64(f) => serializer.serialize_f64(*f),
            },
            SpookyValue::Str(s) => serializer.serialize_str(s.as_str()),
        }
    }
}

struct SpookyValueVisitor;

impl<'de> Visitor<'de> for SpookyValueVisitor {
    type Value = SpookyValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a scalar field value (null, bool, number or string)")
    }

    fn visit_unit<E: de::Error>(self) -> Result<SpookyValue, E> {
        Ok(SpookyValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<SpookyValue, E> {
        Ok(SpookyValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<SpookyValue, D::Error> {
        SpookyValue::deserialize(d)
    }

    fn visit_bool<E: de::Error>(self, b: bool) -> Result<SpookyValue, E> {
        Ok(SpookyValue::Bool(b))
    }

    fn visit_i64<E: de::Error>(self, i: i64) -> Result<SpookyValue, E> {
        Ok(SpookyValue::from(i))
    }

    fn visit_u64<E: de::Error>(self, u: u64) -> Result<SpookyValue, E> {
        // Keep small unsigned literals signed so `1` from JSON matches `1i64`.
        Ok(match i64::try_from(u) {
            Ok(i) => SpookyValue::from(i),
            Err(_) => SpookyValue::from(u),
        })
    }

    fn visit_f64<E: de::Error>(self, f: f64) -> Result<SpookyValue, E> {
        Ok(SpookyValue::from(f))
    }

    fn visit_str<E: de::Error>(self, s: &str) -> Result<SpookyValue, E> {
        Ok(SpookyValue::from(s))
    }

    fn visit_string<E: de::Error>(self, s: String) -> Result<SpookyValue, E> {
        Ok(SpookyValue::from(s))
    }
}

impl<'de> Deserialize<'de> for SpookyValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SpookyValueVisitor)
    }
}

// ─── From impls ─────────────────────────────────────────────────────────────

impl From<f64> for SpookyValue {
    fn from(n: f64) -> Self {
        SpookyValue::Number(SpookyNumber::F64(n))
    }
}

impl From<i64> for SpookyValue {
    fn from(n: i64) -> Self {
        SpookyValue::Number(SpookyNumber::I64(n))
    }
}

impl From<i32> for SpookyValue {
    fn from(n: i32) -> Self {
        SpookyValue::Number(SpookyNumber::I64(n as i64))
    }
}

impl From<u64> for SpookyValue {
    fn from(n: u64) -> Self {
        SpookyValue::Number(SpookyNumber::U64(n))
    }
}

impl From<bool> for SpookyValue {
    fn from(b: bool) -> Self {
        SpookyValue::Bool(b)
    }
}

impl From<&str> for SpookyValue {
    fn from(s: &str) -> Self {
        SpookyValue::Str(SmolStr::from(s))
    }
}

impl From<String> for SpookyValue {
    fn from(s: String) -> Self {
        SpookyValue::Str(SmolStr::from(s))
    }
}

impl From<SmolStr> for SpookyValue {
    fn from(s: SmolStr) -> Self {
        SpookyValue::Str(s)
    }
}

impl From<&SpookyValue> for SpookyValue {
    fn from(v: &SpookyValue) -> Self {
        v.clone()
    }
}

impl<T: Into<SpookyValue>> From<Option<T>> for SpookyValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(SpookyValue::Null, Into::into)
    }
}

// ─── From/Into serde_json::Value ────────────────────────────────────────────

/// Nested JSON (arrays, objects) has no scalar field representation and is
/// rejected. The error carries the offending JSON type.
impl TryFrom<serde_json::Value> for SpookyValue {
    type Error = MarshalError;

    fn try_from(v: serde_json::Value) -> Result<Self, Self::Error> {
        match v {
            serde_json::Value::Null => Ok(SpookyValue::Null),
            serde_json::Value::Bool(b) => Ok(SpookyValue::Bool(b)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(SpookyValue::Number(SpookyNumber::I64(i)))
                } else if let Some(u) = n.as_u64() {
                    Ok(SpookyValue::Number(SpookyNumber::U64(u)))
                } else {
                    Ok(SpookyValue::Number(SpookyNumber::F64(
                        n.as_f64().unwrap_or(0.0),
                    )))
                }
            }
            serde_json::Value::String(s) => Ok(SpookyValue::Str(SmolStr::from(s))),
            serde_json::Value::Array(_) => Err(MarshalError::UnsupportedValue("array".into())),
            serde_json::Value::Object(_) => Err(MarshalError::UnsupportedValue("object".into())),
        }
    }
}

impl From<SpookyValue> for serde_json::Value {
    fn from(val: SpookyValue) -> Self {
        match val {
            SpookyValue::Null => serde_json::Value::Null,
            SpookyValue::Bool(b) => serde_json::Value::Bool(b),
            SpookyValue::Number(n) => match n {
                SpookyNumber::I64(i) => serde_json::json!(i),
                SpookyNumber::U64(u) => serde_json::json!(u),
                SpookyNumber::F64(f) => serde_json::json!(f),
            },
            SpookyValue::Str(s) => serde_json::Value::String(s.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_scalars_convert() {
        let v = SpookyValue::try_from(serde_json::json!(42)).unwrap();
        assert_eq!(v, SpookyValue::from(42i64));
        let v = SpookyValue::try_from(serde_json::json!("x")).unwrap();
        assert_eq!(v.as_str(), Some("x"));
        let v = SpookyValue::try_from(serde_json::json!(null)).unwrap();
        assert!(v.is_null());
        let v = SpookyValue::try_from(serde_json::json!(u64::MAX)).unwrap();
        assert_eq!(v, SpookyValue::from(u64::MAX));
    }

    #[test]
    fn test_json_nested_rejected() {
        let err = SpookyValue::try_from(serde_json::json!([1, 2])).unwrap_err();
        assert!(matches!(err, MarshalError::UnsupportedValue(ref t) if t == "array"));
        assert!(SpookyValue::try_from(serde_json::json!({"a": 1})).is_err());
    }

    #[test]
    fn test_deserialize_from_json_text() {
        let v: SpookyValue = serde_json::from_str("4.56").unwrap();
        assert_eq!(v, SpookyValue::from(4.56));
        let v: SpookyValue = serde_json::from_str("7").unwrap();
        assert_eq!(v, SpookyValue::from(7i64));
        assert!(serde_json::from_str::<SpookyValue>("[1]").is_err());
    }

    #[test]
    fn test_option_into_value() {
        assert!(SpookyValue::from(None::<i64>).is_null());
        assert_eq!(SpookyValue::from(Some("a")), SpookyValue::from("a"));
    }

    #[test]
    fn test_type_name() {
        assert_eq!(SpookyValue::Null.type_name(), "null");
        assert_eq!(SpookyValue::from(1.5).type_name(), "float");
        assert_eq!(SpookyValue::from(1u64).type_name(), "int");
    }
}
