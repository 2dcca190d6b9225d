//! Named, typed property accessors used to bind events to statement parameters.

use std::fmt;
use std::sync::Arc;

use super::SqlValue;

type ReadFn<E> = dyn Fn(&E) -> SqlValue + Send + Sync;

/// Reads one mapped property from an event of type `E`.
///
/// Accessors are resolved once at startup and then shared by every writer,
/// so cloning is a reference-count bump.
pub struct Accessor<E> {
    property: Arc<str>,
    read: Arc<ReadFn<E>>,
}

impl<E: 'static> Accessor<E> {
    /// Create an accessor for `property` backed by `read`.
    pub fn new<F>(property: &str, read: F) -> Self
    where
        F: Fn(&E) -> SqlValue + Send + Sync + 'static,
    {
        Self {
            property: Arc::from(property),
            read: Arc::new(read),
        }
    }

    /// Lift this accessor onto a wrapper type that embeds an `E`.
    ///
    /// ```
    /// use batching_audit_trail::core::{AuditEvent, AuditRecord};
    ///
    /// struct Tagged {
    ///     base: AuditEvent,
    /// }
    ///
    /// fn base(tagged: &Tagged) -> &AuditEvent {
    ///     &tagged.base
    /// }
    ///
    /// let level = AuditEvent::accessor("log_level").unwrap().project(base);
    /// assert_eq!(level.property(), "log_level");
    /// ```
    #[must_use]
    pub fn project<O: 'static>(self, to_inner: fn(&O) -> &E) -> Accessor<O> {
        let read = self.read;
        Accessor {
            property: self.property,
            read: Arc::new(move |outer: &O| read(to_inner(outer))),
        }
    }
}

impl<E> Accessor<E> {
    /// Property name this accessor was resolved for.
    #[must_use]
    pub fn property(&self) -> &str {
        &self.property
    }

    /// Extract the current value from `event`.
    pub fn read(&self, event: &E) -> SqlValue {
        (self.read)(event)
    }
}

impl<E> Clone for Accessor<E> {
    fn clone(&self) -> Self {
        Self {
            property: Arc::clone(&self.property),
            read: Arc::clone(&self.read),
        }
    }
}

impl<E> fmt::Debug for Accessor<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("property", &self.property)
            .finish_non_exhaustive()
    }
}
