use super::SpookyType;
use crate::collection::CollectionFactory;
use crate::equality::loose_eq;
use crate::record::{Record, RecordFactory};
use crate::spooky_value::SpookyValue;
use crate::types::{FieldMap, Identity, OrderedMap};

/// Whether a current field differs from its snapshot. Fields missing from the
/// snapshot always count as changed ("from absent").
#[inline]
fn differs(initial: Option<&FieldMap>, name: &str, current: &SpookyValue) -> bool {
    match initial.and_then(|snapshot| snapshot.get(name)) {
        Some(original) => !loose_eq(current, original),
        None => true,
    }
}

impl<RF, CF> SpookyType<RF, CF>
where
    RF: RecordFactory,
    CF: CollectionFactory<RF::Record>,
{
    /// Snapshot of the record's fields as loaded. `None` for new or unknown records.
    #[inline]
    pub fn initial_data(&self, identity: impl Into<Identity>) -> Option<&FieldMap> {
        self.initial_data.get(&identity.into())
    }

    /// Fields currently on the record that differ from its snapshot, mapped
    /// to their current value.
    ///
    /// Numeric values compare by magnitude (`"69"` → `69` is no change); any
    /// other pair must match in type and value (`null` → `0` is a change).
    /// Fields dropped from the record since load are not reported. A new
    /// record reports every field; an unknown identity reports nothing.
    pub fn changed_fields(&self, identity: impl Into<Identity>) -> FieldMap {
        let identity = identity.into();
        let Some(record) = self.storage.get(&identity) else {
            return FieldMap::default();
        };
        let initial = self.initial_data.get(&identity);

        record
            .iter_fields()
            .filter(|(name, current)| differs(initial, name, current))
            .map(|(name, current)| (name.clone(), current.clone()))
            .collect()
    }

    /// Loaded records with at least one changed field, in storage order.
    /// New records are never included.
    pub fn changed_records(&self) -> OrderedMap<Identity, &RF::Record> {
        self.storage
            .iter()
            .filter(|(id, record)| {
                self.initial_data.get(*id).is_some_and(|snapshot| {
                    record
                        .iter_fields()
                        .any(|(name, current)| differs(Some(snapshot), name, current))
                })
            })
            .map(|(id, record)| (id.clone(), record))
            .collect()
    }

    /// Records created with [`new_record`](Self::new_record), in creation order.
    pub fn new_records(&self) -> Vec<&RF::Record> {
        self.storage
            .iter()
            .filter(|(id, _)| !self.initial_data.contains_key(*id))
            .map(|(_, record)| record)
            .collect()
    }

    pub fn is_new(&self, identity: impl Into<Identity>) -> bool {
        let identity = identity.into();
        self.storage.contains_key(&identity) && !self.initial_data.contains_key(&identity)
    }
}
