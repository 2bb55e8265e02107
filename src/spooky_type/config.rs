use serde::Deserialize;
use smol_str::SmolStr;

use super::SpookyType;
use crate::error::MarshalError;

/// Configuration for [`SpookyType::new`].
///
/// Deserializable so a caller's type registry can keep per-type settings in
/// its own config format:
///
/// ```
/// let config: spooky_marshal::TypeConfig = serde_json::from_str(
///     r#"{ "identity_field": "id", "index_fields": ["author_id"] }"#,
/// ).unwrap();
/// let posts = config.build().unwrap();
/// assert_eq!(posts.identity_field(), "id");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TypeConfig {
    /// Field holding each record's unique identity value. Required.
    pub identity_field: Option<SmolStr>,
    /// Fields that get a value → identities lookup at load time.
    pub index_fields: Vec<SmolStr>,
}

impl TypeConfig {
    pub fn new(identity_field: impl Into<SmolStr>) -> Self {
        Self {
            identity_field: Some(identity_field.into()),
            index_fields: Vec::new(),
        }
    }

    pub fn with_index_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        self.index_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Build a type with the generic record and collection factories.
    pub fn build(self) -> Result<SpookyType, MarshalError> {
        SpookyType::new(self)
    }

    /// The identity field, rejecting a missing or empty name.
    pub(crate) fn require_identity_field(&self) -> Result<SmolStr, MarshalError> {
        match &self.identity_field {
            Some(field) if !field.is_empty() => Ok(field.clone()),
            _ => Err(MarshalError::MissingIdentityField),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_identity_field() {
        let err = TypeConfig::default().build().unwrap_err();
        assert!(matches!(err, MarshalError::MissingIdentityField));

        let err = TypeConfig::new("").build().unwrap_err();
        assert!(matches!(err, MarshalError::MissingIdentityField));
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: TypeConfig = serde_json::from_str(r#"{ "identity_field": "id" }"#).unwrap();
        assert_eq!(config, TypeConfig::new("id"));

        let config: TypeConfig = serde_json::from_str("{}").unwrap();
        assert!(config.build().is_err());
    }

    #[test]
    fn test_with_index_fields() {
        let config = TypeConfig::new("id").with_index_fields(["author_id", "slug"]);
        assert_eq!(config.index_fields, vec![SmolStr::new("author_id"), SmolStr::new("slug")]);
    }
}
