// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Wrapper type for safe pointers to static memory.

use core::ops::Deref;
use core::ptr::NonNull;

/// A pointer to statically allocated mutable data such as memory mapped I/O
/// registers.
///
/// This is a simple wrapper around a raw pointer that encapsulates an unsafe
/// dereference in a safe manner. It serve the role of creating a `&'static T`
/// given a raw address and acts similarly to `extern` definitions, except
/// `StaticRef` is subject to module and crate boundaries, while `extern`
/// definitions can be imported anywhere.
#[derive(Debug)]
pub struct StaticRef<T> {
    ptr: NonNull<T>,
}

impl<T> StaticRef<T> {
    /// Create a new `StaticRef` from a raw pointer
    ///
    /// ## Safety
    ///
    /// Callers must pass in a reference to statically allocated memory which
    /// does not overlap with other values.
    pub const unsafe fn new(ptr: *const T) -> StaticRef<T> {
        // SAFETY: the caller guarantees `ptr` refers to static memory, which
        // is never null.
        StaticRef {
            ptr: unsafe { NonNull::new_unchecked(ptr.cast_mut()) },
        }
    }

    /// Create a new `StaticRef`, rejecting pointers that cannot refer to a
    /// `T`: null pointers and pointers not aligned for `T`.
    ///
    /// ## Safety
    ///
    /// As for [`StaticRef::new`], a non-null aligned `ptr` must refer to
    /// statically allocated memory which does not overlap with other values.
    pub unsafe fn try_new(ptr: *const T) -> Option<StaticRef<T>> {
        if ptr.is_null() || !ptr.is_aligned() {
            return None;
        }
        Some(unsafe { StaticRef::new(ptr) })
    }

    /// The address this reference points at.
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }
}

impl<T> Clone for StaticRef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for StaticRef<T> {}

impl<T> Deref for StaticRef<T> {
    type Target = T;
    fn deref(&self) -> &T {
        // SAFETY: `ptr` was validated at construction to refer to static
        // memory that outlives every `StaticRef`.
        unsafe { self.ptr.as_ref() }
    }
}
