use super::error::MarshalError;
use super::spooky_value::SpookyValue;
use super::types::FieldMap;
use smol_str::SmolStr;

// ─── JSON rows → FieldMap ───────────────────────────────────────────────────

/// Convert one JSON object into a field map. Field order follows serde_json's
/// map order.
///
/// Fails with `NotAnObject` for anything but an object, and with
/// `UnsupportedValue` naming the field when a value is nested.
pub fn field_map_from_json(value: serde_json::Value) -> Result<FieldMap, MarshalError> {
    let obj = match value {
        serde_json::Value::Object(obj) => obj,
        _ => return Err(MarshalError::NotAnObject),
    };

    let mut fields = FieldMap::with_capacity_and_hasher(obj.len(), Default::default());
    for (key, v) in obj {
        let v = SpookyValue::try_from(v)
            .map_err(|_| MarshalError::UnsupportedValue(key.clone()))?;
        fields.insert(SmolStr::from(key), v);
    }
    Ok(fields)
}

/// Convert a JSON array of objects into rows for `load`.
pub fn rows_from_json(value: serde_json::Value) -> Result<Vec<FieldMap>, MarshalError> {
    match value {
        serde_json::Value::Array(items) => items.into_iter().map(field_map_from_json).collect(),
        _ => Err(MarshalError::NotAnObject),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_to_field_map() {
        let fields = field_map_from_json(json!({ "id": 1, "body": "x", "n": null })).unwrap();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields["id"], SpookyValue::from(1i64));
        assert!(fields["n"].is_null());
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(matches!(
            field_map_from_json(json!([1, 2])),
            Err(MarshalError::NotAnObject)
        ));
        assert!(matches!(rows_from_json(json!({})), Err(MarshalError::NotAnObject)));
    }

    #[test]
    fn test_nested_value_names_field() {
        let err = field_map_from_json(json!({ "id": 1, "tags": ["a"] })).unwrap_err();
        assert!(matches!(err, MarshalError::UnsupportedValue(ref f) if f == "tags"));
    }

    #[test]
    fn test_rows() {
        let rows = rows_from_json(json!([{ "id": 1 }, { "id": 2 }])).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["id"], SpookyValue::from(2i64));
    }
}
