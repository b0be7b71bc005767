//! `Handle<T>` — a shared, relinkable reference to a value.
//!
//! A [`RelinkableHandle`] owns a slot that can be pointed at different
//! objects over time. Any number of read-only [`Handle`]s can view the same
//! slot; they always see the object currently linked.
//!
//! When `T` is [`Observable`], a handle reports the generation of the linked
//! object, so a dependant polling the handle sees both mutations of the
//! linked object and relinking to another one.

use crate::patterns::observable::{Generation, Observable};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

type Slot<T> = Arc<Mutex<Option<Arc<T>>>>;

/// A shared, read-only view of a (possibly empty) relinkable slot.
pub struct Handle<T: ?Sized> {
    slot: Slot<T>,
}

impl<T: ?Sized> Handle<T> {
    /// Create a handle permanently linked to `value`.
    pub fn new(value: Arc<T>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(value))),
        }
    }

    /// Create an empty handle.
    pub fn null() -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
        }
    }

    /// Return `true` if nothing is currently linked.
    pub fn is_empty(&self) -> bool {
        self.current().is_none()
    }

    /// Snapshot of the currently linked object, or `None` if empty.
    pub fn current(&self) -> Option<Arc<T>> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl<T: ?Sized + Observable> Observable for Handle<T> {
    fn generation(&self) -> Generation {
        self.current()
            .map_or(Generation::NULL, |linked| linked.generation())
    }
}

impl<T: ?Sized> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T: ?Sized> Default for Handle<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.current() {
            Some(v) => write!(f, "Handle({:?})", v),
            None => write!(f, "Handle(null)"),
        }
    }
}

/// The owning side of a [`Handle`]: the linked object can be replaced.
///
/// Relinking is visible to every handle obtained from [`handle`](Self::handle).
pub struct RelinkableHandle<T: ?Sized> {
    inner: Handle<T>,
}

impl<T: ?Sized> RelinkableHandle<T> {
    /// Create a relinkable handle linked to `value`.
    pub fn new(value: Arc<T>) -> Self {
        Self {
            inner: Handle::new(value),
        }
    }

    /// Create an empty relinkable handle.
    pub fn null() -> Self {
        Self {
            inner: Handle::null(),
        }
    }

    /// Point the slot at `value`.
    pub fn link_to(&self, value: Arc<T>) {
        *self
            .inner
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(value);
    }

    /// Detach the slot from any value.
    pub fn unlink(&self) {
        *self
            .inner
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// A read-only handle sharing this slot.
    pub fn handle(&self) -> Handle<T> {
        self.inner.clone()
    }

    /// Snapshot of the currently linked object.
    pub fn current(&self) -> Option<Arc<T>> {
        self.inner.current()
    }
}

impl<T: ?Sized> Default for RelinkableHandle<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for RelinkableHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Relinkable{:?}", self.inner)
    }
}
