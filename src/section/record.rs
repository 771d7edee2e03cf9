//! Shared handle to host-owned configuration data

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Host-owned configuration value shared with a manager
///
/// Cloning a `Record` clones the handle, not the value. Changes made through
/// any clone are seen by the manager on its next save.
pub struct Record<T> {
    inner: Arc<RwLock<T>>,
}

impl<T> Record<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(RwLock::new(value)),
        }
    }

    /// Shared access to the current value
    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Exclusive access to the current value
    pub fn write(&self) -> RwLockWriteGuard<'_, T> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Swap in a new value, returning the old one
    pub fn replace(&self, value: T) -> T {
        std::mem::replace(&mut *self.write(), value)
    }

    /// Whether both handles point at the same value
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: Clone> Record<T> {
    /// Copy of the current value
    pub fn snapshot(&self) -> T {
        self.read().clone()
    }
}

impl<T> Clone for Record<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Default> Default for Record<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> From<T> for Record<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for Record<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Record").field(&*self.read()).finish()
    }
}
