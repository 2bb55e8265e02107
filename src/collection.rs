use std::ops::Index;

use crate::record::Record;
use crate::spooky_value::SpookyValue;

/// Builds a collection over records borrowed from a type's storage.
///
/// The collection borrows, so it cannot outlive the type that owns the
/// records.
pub trait CollectionFactory<R> {
    type Collection<'a>
    where
        R: 'a;

    fn new_instance<'a>(&self, records: Vec<&'a R>) -> Self::Collection<'a>;
}

// ─── GenericCollection ──────────────────────────────────────────────────────

/// Ordered, non-owning view over a sequence of records.
#[derive(Debug)]
pub struct GenericCollection<'a, R> {
    items: Vec<&'a R>,
}

impl<R> Clone for GenericCollection<'_, R> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
        }
    }
}

impl<'a, R> GenericCollection<'a, R> {
    pub fn new(items: Vec<&'a R>) -> Self {
        Self { items }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn get(&self, offset: usize) -> Option<&'a R> {
        self.items.get(offset).copied()
    }

    pub fn first(&self) -> Option<&'a R> {
        self.items.first().copied()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &'a R> + '_ {
        self.items.iter().copied()
    }
}

impl<'a, R: Record> GenericCollection<'a, R> {
    /// Value of `field` for every item, in collection order; missing fields read as `Null`.
    pub fn field_values(&self, field: &str) -> Vec<SpookyValue> {
        self.items.iter().map(|r| r.get_or_null(field)).collect()
    }
}

impl<R> Index<usize> for GenericCollection<'_, R> {
    type Output = R;

    fn index(&self, offset: usize) -> &R {
        self.items[offset]
    }
}

impl<'a, R> IntoIterator for GenericCollection<'a, R> {
    type Item = &'a R;
    type IntoIter = std::vec::IntoIter<&'a R>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'c, 'a, R> IntoIterator for &'c GenericCollection<'a, R> {
    type Item = &'a R;
    type IntoIter = std::iter::Copied<std::slice::Iter<'c, &'a R>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter().copied()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GenericCollectionFactory;

impl<R> CollectionFactory<R> for GenericCollectionFactory {
    type Collection<'a>
        = GenericCollection<'a, R>
    where
        R: 'a;

    #[inline]
    fn new_instance<'a>(&self, records: Vec<&'a R>) -> GenericCollection<'a, R> {
        GenericCollection::new(records)
    }
}
