use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHasher;
use smol_str::SmolStr;
use std::collections::HashMap;
use std::fmt;
use std::hash::BuildHasherDefault;

use crate::equality::{Numeric, as_numeric};
use crate::spooky_value::{SpookyNumber, SpookyValue};

pub type FastBuildHasher = BuildHasherDefault<FxHasher>;
pub type FastMap<K, V> = HashMap<K, V, FastBuildHasher>;
/// Insertion-ordered map; iteration order is meaningful.
pub type OrderedMap<K, V> = IndexMap<K, V, FastBuildHasher>;
pub type OrderedSet<T> = IndexSet<T, FastBuildHasher>;

/// Field name → value, in the order the fields were supplied.
pub type FieldMap = OrderedMap<SmolStr, SpookyValue>;

// ─── ValueKey ───────────────────────────────────────────────────────────────

/// Hashable canonical form of a [`SpookyValue`].
///
/// Two values map to the same key iff they are equal under
/// [`crate::equality::loose_eq`], so `"2"`, `2` and `2.0` share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueKey {
    Null,
    Bool(bool),
    Int(i128),
    /// Raw bits of a non-integral (or out of range) float.
    Float(u64),
    Str(SmolStr),
}

impl ValueKey {
    pub fn to_value(&self) -> SpookyValue {
        match self {
            ValueKey::Null => SpookyValue::Null,
            ValueKey::Bool(b) => SpookyValue::Bool(*b),
            ValueKey::Int(i) => {
                if let Ok(v) = i64::try_from(*i) {
                    SpookyValue::Number(SpookyNumber::I64(v))
                } else if let Ok(v) = u64::try_from(*i) {
                    SpookyValue::Number(SpookyNumber::U64(v))
                } else {
                    SpookyValue::Number(SpookyNumber::F64(*i as f64))
                }
            }
            ValueKey::Float(bits) => SpookyValue::Number(SpookyNumber::F64(f64::from_bits(*bits))),
            ValueKey::Str(s) => SpookyValue::Str(s.clone()),
        }
    }
}

impl From<&SpookyValue> for ValueKey {
    fn from(v: &SpookyValue) -> Self {
        match as_numeric(v) {
            Some(Numeric::Int(i)) => ValueKey::Int(i),
            Some(Numeric::Float(f)) => ValueKey::Float(f.to_bits()),
            None => match v {
                SpookyValue::Null => ValueKey::Null,
                SpookyValue::Bool(b) => ValueKey::Bool(*b),
                SpookyValue::Str(s) => ValueKey::Str(s.clone()),
                SpookyValue::Number(_) => unreachable!("numbers are always numeric"),
            },
        }
    }
}

impl fmt::Display for ValueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_value(), f)
    }
}

// ─── Identity ───────────────────────────────────────────────────────────────

/// Storage handle of a record.
///
/// `Assigned` identities come from the identity field. `Pending` ones are
/// synthetic tokens for records created without a usable identity value;
/// they never collide with assigned ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identity {
    Assigned(ValueKey),
    Pending(u64),
}

impl Identity {
    #[inline]
    pub fn is_pending(&self) -> bool {
        matches!(self, Identity::Pending(_))
    }

    /// The identity field value, `None` for pending identities.
    pub fn value(&self) -> Option<SpookyValue> {
        match self {
            Identity::Assigned(key) => Some(key.to_value()),
            Identity::Pending(_) => None,
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identity::Assigned(key) => fmt::Display::fmt(key, f),
            Identity::Pending(token) => write!(f, "pending#{}", token),
        }
    }
}

impl From<&SpookyValue> for Identity {
    fn from(v: &SpookyValue) -> Self {
        Identity::Assigned(ValueKey::from(v))
    }
}

impl From<SpookyValue> for Identity {
    fn from(v: SpookyValue) -> Self {
        Identity::from(&v)
    }
}

impl From<&Identity> for Identity {
    fn from(id: &Identity) -> Self {
        id.clone()
    }
}

impl From<i64> for Identity {
    fn from(v: i64) -> Self {
        Identity::Assigned(ValueKey::Int(v as i128))
    }
}

impl From<i32> for Identity {
    fn from(v: i32) -> Self {
        Identity::Assigned(ValueKey::Int(v as i128))
    }
}

impl From<u64> for Identity {
    fn from(v: u64) -> Self {
        Identity::Assigned(ValueKey::Int(v as i128))
    }
}

impl From<&str> for Identity {
    fn from(v: &str) -> Self {
        Identity::from(SpookyValue::from(v))
    }
}

impl From<String> for Identity {
    fn from(v: String) -> Self {
        Identity::from(SpookyValue::from(v))
    }
}

// ─── fields! ────────────────────────────────────────────────────────────────

/// Build a [`FieldMap`] from `name => value` pairs, keeping their order.
#[macro_export]
macro_rules! fields {
    () => {
        $crate::types::FieldMap::default()
    };
    ($($key:expr => $val:expr),+ $(,)?) => {{
        let mut map = $crate::types::FieldMap::default();
        $(
            map.insert(
                $crate::SmolStr::from($key),
                $crate::spooky_value::SpookyValue::from($val),
            );
        )+
        map
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_key_numeric_canonical() {
        let a = ValueKey::from(&SpookyValue::from("2"));
        let b = ValueKey::from(&SpookyValue::from(2i64));
        let c = ValueKey::from(&SpookyValue::from(2.0));
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_ne!(a, ValueKey::from(&SpookyValue::from("2a")));
    }

    #[test]
    fn test_value_key_null_distinct_from_zero() {
        assert_ne!(
            ValueKey::from(&SpookyValue::Null),
            ValueKey::from(&SpookyValue::from(0i64))
        );
        assert_ne!(
            ValueKey::from(&SpookyValue::from(false)),
            ValueKey::from(&SpookyValue::from(0i64))
        );
    }

    #[test]
    fn test_identity_roundtrip_value() {
        let id = Identity::from("17");
        assert_eq!(id, Identity::from(17i64));
        assert_eq!(id.value(), Some(SpookyValue::from(17i64)));
        assert_eq!(Identity::Pending(3).value(), None);
        assert_eq!(Identity::Pending(3).to_string(), "pending#3");
        assert_eq!(Identity::from("abc").to_string(), "abc");
    }

    #[test]
    fn test_fields_macro_keeps_order() {
        let map = fields! { "b" => 1i64, "a" => "x", "c" => SpookyValue::Null };
        let keys: Vec<&str> = map.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, ["b", "a", "c"]);
        assert_eq!(map["a"], SpookyValue::from("x"));
        assert!(fields!().is_empty());
    }
}
