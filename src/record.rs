use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::spooky_value::SpookyValue;
use crate::types::FieldMap;

// ─── Record ─────────────────────────────────────────────────────────────────

/// A mutable bag of named fields hydrated from one row.
pub trait Record {
    fn get(&self, field: &str) -> Option<&SpookyValue>;

    /// Set a field, returning the previous value if there was one.
    fn set(&mut self, field: SmolStr, value: SpookyValue) -> Option<SpookyValue>;

    fn remove(&mut self, field: &str) -> Option<SpookyValue>;

    /// Iterate over the fields currently on the record.
    fn iter_fields(&self) -> impl Iterator<Item = (&SmolStr, &SpookyValue)>;

    #[inline]
    fn has_field(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Field value, with a missing field read as `Null`.
    #[inline]
    fn get_or_null(&self, field: &str) -> SpookyValue {
        self.get(field).cloned().unwrap_or_default()
    }
}

/// Builds records from raw field data.
pub trait RecordFactory {
    type Record: Record;

    fn new_instance(&self, fields: FieldMap) -> Self::Record;
}

// ─── GenericRecord ──────────────────────────────────────────────────────────

/// Default dynamic-field record backed by an ordered field map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenericRecord {
    fields: FieldMap,
}

impl GenericRecord {
    pub fn new(fields: FieldMap) -> Self {
        Self { fields }
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn as_fields(&self) -> &FieldMap {
        &self.fields
    }

    pub fn into_fields(self) -> FieldMap {
        self.fields
    }
}

impl Record for GenericRecord {
    #[inline]
    fn get(&self, field: &str) -> Option<&SpookyValue> {
        self.fields.get(field)
    }

    #[inline]
    fn set(&mut self, field: SmolStr, value: SpookyValue) -> Option<SpookyValue> {
        self.fields.insert(field, value)
    }

    #[inline]
    fn remove(&mut self, field: &str) -> Option<SpookyValue> {
        // shift_remove keeps the remaining fields in order
        self.fields.shift_remove(field)
    }

    #[inline]
    fn iter_fields(&self) -> impl Iterator<Item = (&SmolStr, &SpookyValue)> {
        self.fields.iter()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GenericRecordFactory;

impl RecordFactory for GenericRecordFactory {
    type Record = GenericRecord;

    #[inline]
    fn new_instance(&self, fields: FieldMap) -> GenericRecord {
        GenericRecord::new(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields;

    #[test]
    fn test_generic_record_get_set() {
        let mut rec = GenericRecordFactory.new_instance(fields! { "id" => 1i64, "name" => "Alice" });
        assert_eq!(rec.field_count(), 2);
        assert_eq!(rec.get("name").and_then(|v| v.as_str()), Some("Alice"));
        assert!(rec.get("missing").is_none());

        let prev = rec.set("name".into(), SpookyValue::from("Bob"));
        assert_eq!(prev, Some(SpookyValue::from("Alice")));
        assert_eq!(rec.set("age".into(), SpookyValue::from(30i64)), None);
        assert!(rec.has_field("age"));
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut rec = GenericRecord::new(fields! { "a" => 1i64, "b" => 2i64, "c" => 3i64 });
        assert_eq!(rec.remove("b"), Some(SpookyValue::from(2i64)));
        let names: Vec<&str> = rec.iter_fields().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, ["a", "c"]);
        assert!(rec.get_or_null("b").is_null());
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let rec = GenericRecord::new(fields! { "id" => 7i64, "body" => "hi" });
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json, serde_json::json!({ "id": 7, "body": "hi" }));
    }
}
