// ─── Error ──────────────────────────────────────────────────────────────────
use smol_str::SmolStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MarshalError {
    #[error("no identity field specified for type")]
    MissingIdentityField,
    #[error("relation '{0}' already exists")]
    DuplicateRelation(SmolStr),
    #[error("row is not an object")]
    NotAnObject,
    #[error("unsupported field value: {0}")]
    UnsupportedValue(String),
}
