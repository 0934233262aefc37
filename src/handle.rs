//! Single-owner wrapper for resources allocated by the native library.
//!
//! An [`OwnedHandle`] holds one raw pointer together with the function that
//! destroys it. It cannot be cloned, so at most one live wrapper refers to a
//! given resource. Ownership leaves the wrapper in exactly three ways: a Rust
//! move, [`OwnedHandle::take`] (the source is left empty) and
//! [`OwnedHandle::release`] (the caller, usually the native library, becomes the
//! owner). A wrapper that still holds a resource when dropped destroys it.

use std::fmt;
use std::ptr;

/// Native destructor for a `T` handle.
pub type Destructor<T> = unsafe extern "C" fn(*mut T);

pub struct OwnedHandle<T> {
    ptr: *mut T,
    destructor: Destructor<T>,
}

impl<T> OwnedHandle<T> {
    /// Wrap `ptr`, which may be null to represent an empty handle.
    ///
    /// # Safety
    ///
    /// A non-null `ptr` must be valid, owned by nobody else, and safe to pass
    /// once to `destructor`.
    pub unsafe fn from_raw(ptr: *mut T, destructor: Destructor<T>) -> Self {
        Self { ptr, destructor }
    }

    /// An empty handle that destroys nothing.
    pub fn null(destructor: Destructor<T>) -> Self {
        Self {
            ptr: ptr::null_mut(),
            destructor,
        }
    }

    pub fn is_null(&self) -> bool {
        self.ptr.is_null()
    }

    /// Borrowed access. The pointer must not outlive `self` and must not be
    /// destroyed by the caller. Null once released or taken.
    pub fn get(&self) -> *mut T {
        self.ptr
    }

    /// Give up ownership: returns the raw pointer and leaves `self` empty, so
    /// dropping `self` no longer destroys anything.
    #[must_use = "the released resource leaks unless its new owner destroys it"]
    pub fn release(&mut self) -> *mut T {
        std::mem::replace(&mut self.ptr, ptr::null_mut())
    }

    /// Move the resource into a new wrapper, leaving `self` empty.
    pub fn take(&mut self) -> Self {
        Self {
            ptr: self.release(),
            destructor: self.destructor,
        }
    }

    /// Consuming form of [`release`](Self::release).
    #[must_use = "the released resource leaks unless its new owner destroys it"]
    pub fn into_raw(mut self) -> *mut T {
        self.release()
    }
}

impl<T> Drop for OwnedHandle<T> {
    fn drop(&mut self) {
        if !self.ptr.is_null() {
            let ptr = self.release();
            unsafe { (self.destructor)(ptr) };
        }
    }
}

impl<T> fmt::Debug for OwnedHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OwnedHandle").field(&self.ptr).finish()
    }
}
