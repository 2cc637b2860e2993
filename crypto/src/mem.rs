//! Fallible allocation helpers.
//!
//! Contexts allocate their state exactly once, at construction. On a
//! constrained heap that allocation can fail, so it must surface as
//! `CryptoError::OutOfMemory` rather than the global OOM handler.

use alloc::alloc::{alloc, Layout};
use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::error::{CryptoError, Result};

/// Move `value` into a fresh heap allocation of exactly `size_of::<T>()` bytes.
pub(crate) fn try_box<T>(value: T) -> Result<Box<T>> {
    let layout = Layout::new::<T>();
    if layout.size() == 0 {
        return Ok(Box::new(value));
    }

    // SAFETY: `layout` has a non-zero size.
    let ptr = unsafe { alloc(layout) } as *mut T;
    if ptr.is_null() {
        return Err(CryptoError::OutOfMemory);
    }

    // SAFETY: `ptr` is non-null and was returned by the global allocator for
    // `Layout::new::<T>()`, which is exactly the allocation `Box<T>` owns and
    // later frees. Writing initializes it before the box is created.
    unsafe {
        ptr.write(value);
        Ok(Box::from_raw(ptr))
    }
}

/// Allocate a zero-filled vector whose capacity is exactly `len`.
pub(crate) fn try_zeroed_vec<T: Default + Clone>(len: usize) -> Result<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| CryptoError::OutOfMemory)?;
    v.resize(len, T::default());
    Ok(v)
}
