//! In-process identity map for hydrated rows.
//!
//! A [`SpookyType`] turns raw rows (field → scalar maps) into mutable records,
//! keeps one record per identity value, indexes chosen fields at load time,
//! and reports which records and fields changed since they were loaded.
//!
//! ```
//! use spooky_marshal::{fields, Record, TypeConfig};
//!
//! let mut posts = TypeConfig::new("id")
//!     .with_index_fields(["author_id"])
//!     .build()
//!     .unwrap();
//!
//! posts.load([
//!     fields! { "id" => 1, "author_id" => "1", "body" => "first" },
//!     fields! { "id" => 2, "author_id" => "2", "body" => "second" },
//! ]);
//!
//! let post = posts.get_record_by_field("author_id", 2).unwrap();
//! assert_eq!(post.get("body").and_then(|v| v.as_str()), Some("second"));
//!
//! posts.get_record_mut(1).unwrap().set("body".into(), "edited".into());
//! assert_eq!(posts.changed_records().len(), 1);
//! ```

pub mod collection;
pub mod deserialization;
pub mod equality;
pub mod error;
pub mod record;
pub mod relation;
pub mod spooky_type;
pub mod spooky_value;
pub mod types;

pub use collection::{CollectionFactory, GenericCollection, GenericCollectionFactory};
pub use error::MarshalError;
pub use record::{GenericRecord, GenericRecordFactory, Record, RecordFactory};
pub use relation::Relation;
pub use smol_str::SmolStr;
pub use spooky_type::{SpookyType, TypeConfig};
pub use spooky_value::{SpookyNumber, SpookyValue};
pub use types::{FieldMap, Identity, ValueKey};
