//! Identity map and index engine for one kind of record.
//!
//! A [`SpookyType`] owns every record it hydrates, keyed by [`Identity`] in
//! insertion order. That order is the canonical order of every multi-record
//! result. Secondary indices and collections refer to records by identity or
//! by borrow; they never own one.
//!
//! Indices are filled from row data at load time only. Mutating a record
//! afterwards does not move it between index buckets, so an indexed lookup
//! can answer from the loaded value. Only the identity mapping is always
//! authoritative.

mod change_op;
pub mod config;
mod read_op;
mod write_op;


use smol_str::SmolStr;
use std::rc::Rc;
use tracing::debug;

use crate::collection::{CollectionFactory, GenericCollectionFactory};
use crate::error::MarshalError;
use crate::record::{GenericRecordFactory, RecordFactory};
use crate::relation::Relation;
use crate::types::{FastMap, FieldMap, Identity, OrderedMap, OrderedSet, ValueKey};

pub use config::TypeConfig;

/// value → identities of the records that held it when loaded, in load order.
pub type FieldIndex = FastMap<ValueKey, OrderedSet<Identity>>;

pub struct SpookyType<RF: RecordFactory = GenericRecordFactory, CF = GenericCollectionFactory> {
    identity_field: SmolStr,
    index_fields: OrderedSet<SmolStr>,
    record_factory: RF,
    collection_factory: CF,
    storage: OrderedMap<Identity, RF::Record>,
    indices: FastMap<SmolStr, FieldIndex>,
    /// Field snapshots of loaded records. New records have none.
    initial_data: FastMap<Identity, FieldMap>,
    relations: FastMap<SmolStr, Rc<dyn Relation>>,
    next_pending: u64,
}

impl SpookyType {
    /// Create a type with the generic record and collection factories.
    pub fn new(config: TypeConfig) -> Result<Self, MarshalError> {
        Self::with_factories(config, GenericRecordFactory, GenericCollectionFactory)
    }
}

impl<RF, CF> SpookyType<RF, CF>
where
    RF: RecordFactory,
    CF: CollectionFactory<RF::Record>,
{
    pub fn with_factories(
        config: TypeConfig,
        record_factory: RF,
        collection_factory: CF,
    ) -> Result<Self, MarshalError> {
        let identity_field = config.require_identity_field()?;
        let index_fields: OrderedSet<SmolStr> = config
            .index_fields
            .into_iter()
            .filter(|f| *f != identity_field)
            .collect();
        let indices = index_fields
            .iter()
            .map(|f| (f.clone(), FieldIndex::default()))
            .collect();

        debug!(%identity_field, index_fields = index_fields.len(), "type configured");

        Ok(Self {
            identity_field,
            index_fields,
            record_factory,
            collection_factory,
            storage: OrderedMap::default(),
            indices,
            initial_data: FastMap::default(),
            relations: FastMap::default(),
            next_pending: 0,
        })
    }

    // ════════════════════════════════════════════════════════════════════════
    // Configuration
    // ════════════════════════════════════════════════════════════════════════

    #[inline]
    pub fn identity_field(&self) -> &str {
        &self.identity_field
    }

    pub fn index_fields(&self) -> impl ExactSizeIterator<Item = &str> {
        self.index_fields.iter().map(SmolStr::as_str)
    }

    #[inline]
    pub fn is_index_field(&self, field: &str) -> bool {
        self.indices.contains_key(field)
    }

    #[inline]
    pub fn record_factory(&self) -> &RF {
        &self.record_factory
    }

    #[inline]
    pub fn collection_factory(&self) -> &CF {
        &self.collection_factory
    }

    // ════════════════════════════════════════════════════════════════════════
    // Storage
    // ════════════════════════════════════════════════════════════════════════

    /// Number of records in storage, loaded and new.
    #[inline]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    pub fn contains(&self, identity: impl Into<Identity>) -> bool {
        self.storage.contains_key(&identity.into())
    }

    /// All records with their identities, in storage order.
    pub fn records(&self) -> impl ExactSizeIterator<Item = (&Identity, &RF::Record)> {
        self.storage.iter()
    }

    // ════════════════════════════════════════════════════════════════════════
    // Relations
    // ════════════════════════════════════════════════════════════════════════

    /// Register a relation under `name`. Each name can be set once.
    pub fn set_relation(
        &mut self,
        name: impl Into<SmolStr>,
        relation: Rc<dyn Relation>,
    ) -> Result<(), MarshalError> {
        let name = name.into();
        if self.relations.contains_key(&name) {
            return Err(MarshalError::DuplicateRelation(name));
        }
        debug!(identity_field = %self.identity_field, relation = %name, "relation set");
        self.relations.insert(name, relation);
        Ok(())
    }

    pub fn relation(&self, name: &str) -> Option<&Rc<dyn Relation>> {
        self.relations.get(name)
    }

    pub fn relation_names(&self) -> impl Iterator<Item = &str> {
        self.relations.keys().map(SmolStr::as_str)
    }

    fn next_pending_identity(&mut self) -> Identity {
        self.next_pending += 1;
        Identity::Pending(self.next_pending)
    }
}

impl<RF: RecordFactory, CF> std::fmt::Debug for SpookyType<RF, CF> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpookyType")
            .field("identity_field", &self.identity_field)
            .field("index_fields", &self.index_fields)
            .field("records", &self.storage.len())
            .field("new_records", &self.storage.len().saturating_sub(self.initial_data.len()))
            .field("relations", &self.relations.len())
            .finish()
    }
}
