use std::any::Any;
use std::fmt::Debug;

/// Opaque description of how two types join.
///
/// A type stores relations by name and hands them back unchanged; it never
/// calls into one. `as_any` lets the owner of a relation get the concrete
/// value back:
///
/// ```
/// use std::any::Any;
/// use spooky_marshal::Relation;
///
/// #[derive(Debug)]
/// struct HasOne { foreign_field: &'static str }
///
/// impl Relation for HasOne {
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
/// }
/// ```
pub trait Relation: Debug {
    fn as_any(&self) -> &dyn Any;
}
