use tracing::{debug, trace, warn};

use super::SpookyType;
use crate::collection::CollectionFactory;
use crate::record::{Record, RecordFactory};
use crate::spooky_value::SpookyValue;
use crate::types::{FieldMap, Identity, ValueKey};

/// Outcome of offering one row to `load`.
enum Loaded {
    Inserted(Identity),
    /// Identity already in storage; the first-loaded record is kept.
    Existing(Identity),
    /// Row had no identity value.
    Skipped,
}

impl<RF, CF> SpookyType<RF, CF>
where
    RF: RecordFactory,
    CF: CollectionFactory<RF::Record>,
{
    // ════════════════════════════════════════════════════════════════════════
    // Load
    // ════════════════════════════════════════════════════════════════════════

    /// Hydrate rows into records.
    ///
    /// Rows whose identity is already in storage are skipped, so loading
    /// overlapping data again never duplicates or overwrites a record. Rows
    /// without an identity value are skipped with a warning.
    pub fn load<I>(&mut self, rows: I)
    where
        I: IntoIterator<Item = FieldMap>,
    {
        self.load_identities(rows);
    }

    /// Like [`load`](Self::load), returning the current value of
    /// `return_field` on each row's record, in row order. Skipped rows
    /// contribute nothing.
    pub fn load_with_return_field<I>(&mut self, rows: I, return_field: &str) -> Vec<SpookyValue>
    where
        I: IntoIterator<Item = FieldMap>,
    {
        let identities = self.load_identities(rows);
        identities
            .iter()
            .filter_map(|id| self.storage.get(id))
            .map(|record| record.get_or_null(return_field))
            .collect()
    }

    /// Load rows, then return a collection over their records in row order.
    pub fn load_collection<I>(&mut self, rows: I) -> CF::Collection<'_>
    where
        I: IntoIterator<Item = FieldMap>,
    {
        let identities = self.load_identities(rows);
        self.get_collection(identities)
    }

    fn load_identities<I>(&mut self, rows: I) -> Vec<Identity>
    where
        I: IntoIterator<Item = FieldMap>,
    {
        let mut identities = Vec::new();
        let (mut inserted, mut existing) = (0usize, 0usize);
        for row in rows {
            match self.load_row(row) {
                Loaded::Inserted(id) => {
                    inserted += 1;
                    identities.push(id);
                }
                Loaded::Existing(id) => {
                    existing += 1;
                    identities.push(id);
                }
                Loaded::Skipped => {}
            }
        }
        debug!(
            identity_field = %self.identity_field,
            inserted,
            existing,
            total = self.storage.len(),
            "rows loaded"
        );
        identities
    }

    fn load_row(&mut self, row: FieldMap) -> Loaded {
        let identity = match row.get(self.identity_field.as_str()) {
            Some(value) if !value.is_null() => Identity::from(value),
            _ => {
                warn!(identity_field = %self.identity_field, "row has no identity value, skipping");
                return Loaded::Skipped;
            }
        };
        if self.storage.contains_key(&identity) {
            return Loaded::Existing(identity);
        }

        for field in &self.index_fields {
            let key = row.get(field.as_str()).map_or(ValueKey::Null, ValueKey::from);
            trace!(%identity, %field, %key, "index");
            self.indices
                .entry(field.clone())
                .or_default()
                .entry(key)
                .or_default()
                .insert(identity.clone());
        }

        self.initial_data.insert(identity.clone(), row.clone());
        let record = self.record_factory.new_instance(row);
        self.storage.insert(identity.clone(), record);
        Loaded::Inserted(identity)
    }

    // ════════════════════════════════════════════════════════════════════════
    // New / ad hoc records
    // ════════════════════════════════════════════════════════════════════════

    /// Create a record that was not loaded.
    ///
    /// It is visible in storage at once but has no snapshot, so it shows up
    /// in [`new_records`](Self::new_records) and never in
    /// [`changed_records`](Self::changed_records). Without an identity value,
    /// or with one already taken, it gets a pending identity.
    pub fn new_record(&mut self, initial: FieldMap) -> (Identity, &mut RF::Record) {
        let identity = match initial.get(self.identity_field.as_str()) {
            Some(value) if !value.is_null() => {
                let identity = Identity::from(value);
                if self.storage.contains_key(&identity) {
                    warn!(%identity, "identity already in storage, new record gets a pending identity");
                    self.next_pending_identity()
                } else {
                    identity
                }
            }
            _ => self.next_pending_identity(),
        };

        trace!(%identity, "new record");
        let record = self.record_factory.new_instance(initial);
        let (idx, _) = self.storage.insert_full(identity.clone(), record);
        (identity, &mut self.storage[idx])
    }

    /// Insert a record of arbitrary shape, bypassing load's dedup and the
    /// indices.
    ///
    /// An existing record with the same identity is replaced in place (its
    /// storage position is kept) along with its snapshot.
    pub fn load_record(&mut self, data: FieldMap) -> (Identity, &mut RF::Record) {
        let identity = match data.get(self.identity_field.as_str()) {
            Some(value) if !value.is_null() => Identity::from(value),
            _ => self.next_pending_identity(),
        };

        trace!(%identity, fields = data.len(), "load record");
        self.initial_data.insert(identity.clone(), data.clone());
        let record = self.record_factory.new_instance(data);
        let (idx, _) = self.storage.insert_full(identity.clone(), record);
        (identity, &mut self.storage[idx])
    }
}
