use super::SpookyType;
use crate::collection::CollectionFactory;
use crate::equality::loose_eq;
use crate::record::{Record, RecordFactory};
use crate::spooky_value::SpookyValue;
use crate::types::{Identity, OrderedMap, ValueKey};

/// Current value of `field` on `record` matches `value`; a missing field reads as `Null`.
#[inline]
fn field_matches<R: Record>(record: &R, field: &str, value: &SpookyValue) -> bool {
    match record.get(field) {
        Some(current) => loose_eq(current, value),
        None => value.is_null(),
    }
}

impl<RF, CF> SpookyType<RF, CF>
where
    RF: RecordFactory,
    CF: CollectionFactory<RF::Record>,
{
    // ════════════════════════════════════════════════════════════════════════
    // Single-record lookups
    // ════════════════════════════════════════════════════════════════════════

    /// The record stored under `identity`. Repeated calls return the same
    /// record; nothing is ever rehydrated.
    #[inline]
    pub fn get_record(&self, identity: impl Into<Identity>) -> Option<&RF::Record> {
        self.storage.get(&identity.into())
    }

    #[inline]
    pub fn get_record_mut(&mut self, identity: impl Into<Identity>) -> Option<&mut RF::Record> {
        self.storage.get_mut(&identity.into())
    }

    /// First record (in storage order) whose `field` equals `value`.
    ///
    /// The identity field goes through storage and index fields through
    /// their load-time index, which may be stale against later mutation.
    /// Any other field is scanned against current values with numeric-aware
    /// equality.
    pub fn get_record_by_field(
        &self,
        field: &str,
        value: impl Into<SpookyValue>,
    ) -> Option<&RF::Record> {
        let value = value.into();
        if field == self.identity_field.as_str() {
            return self.get_record(&value);
        }
        if let Some(index) = self.indices.get(field) {
            let bucket = index.get(&ValueKey::from(&value))?;
            return bucket.first().and_then(|id| self.storage.get(id));
        }
        self.storage
            .values()
            .find(|record| field_matches(*record, field, &value))
    }

    // ════════════════════════════════════════════════════════════════════════
    // Collections
    // ════════════════════════════════════════════════════════════════════════

    /// Records whose `field` matches any of `values`, in storage order.
    ///
    /// Matches for different values are merged, not grouped per value. Pass a
    /// single value as `[v]` or `Some(v)`.
    pub fn get_collection_by_field<I, V>(&self, field: &str, values: I) -> CF::Collection<'_>
    where
        I: IntoIterator<Item = V>,
        V: Into<SpookyValue>,
    {
        let values: Vec<SpookyValue> = values.into_iter().map(Into::into).collect();

        let records = if field == self.identity_field.as_str() {
            let positions = values
                .iter()
                .filter_map(|v| self.storage.get_index_of(&Identity::from(v)));
            self.records_at(positions)
        } else if let Some(index) = self.indices.get(field) {
            let positions = values
                .iter()
                .filter_map(|v| index.get(&ValueKey::from(v)))
                .flatten()
                .filter_map(|id| self.storage.get_index_of(id));
            self.records_at(positions)
        } else {
            self.storage
                .values()
                .filter(|record| values.iter().any(|v| field_matches(*record, field, v)))
                .collect()
        };

        self.collection_factory.new_instance(records)
    }

    /// Records for `identities`, in the order given. Unknown identities are skipped.
    pub fn get_collection<I>(&self, identities: I) -> CF::Collection<'_>
    where
        I: IntoIterator,
        I::Item: Into<Identity>,
    {
        let records = identities
            .into_iter()
            .filter_map(|id| self.storage.get(&id.into()))
            .collect();
        self.collection_factory.new_instance(records)
    }

    /// Deduplicate storage positions and resolve them in storage order.
    fn records_at(&self, positions: impl Iterator<Item = usize>) -> Vec<&RF::Record> {
        let mut positions: Vec<usize> = positions.collect();
        positions.sort_unstable();
        positions.dedup();
        positions
            .into_iter()
            .filter_map(|i| self.storage.get_index(i).map(|(_, record)| record))
            .collect()
    }

    // ════════════════════════════════════════════════════════════════════════
    // Projections
    // ════════════════════════════════════════════════════════════════════════

    /// Every identity in storage order.
    pub fn identity_values(&self) -> Vec<Identity> {
        self.storage.keys().cloned().collect()
    }

    /// Current value of `field` for every record, keyed and ordered as storage.
    pub fn field_values(&self, field: &str) -> OrderedMap<Identity, SpookyValue> {
        self.storage
            .iter()
            .map(|(id, record)| (id.clone(), record.get_or_null(field)))
            .collect()
    }
}
