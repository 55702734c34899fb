//! Engine C ABI bindings.

mod engine;
#[cfg(test)]
pub(crate) mod mock;

pub use self::engine::Native;
use std::{os::raw::c_char, sync::MutexGuard};

/// The four C ABI operations of an AON engine, plus the guard over its error
/// slot.
///
/// Implementations follow the engine's ownership rules: non-null conversion
/// results belong to the caller until passed back to
/// [`free_string`](Engine::free_string), and the last error message is owned
/// by the engine and only valid until its next conversion call.
pub trait Engine {
    /// Locks the engine's error slot.
    ///
    /// Every handle to the same engine must return a guard on the same lock,
    /// and callers hold it from a conversion call until they are done reading
    /// [`last_error`](Engine::last_error).
    fn lock(&self) -> MutexGuard<'_, ()>;

    /// Converts NUL-terminated JSON to AON, returning null on failure.
    ///
    /// # Safety
    ///
    /// Both arguments must point to NUL-terminated strings that stay valid
    /// for the duration of the call.
    unsafe fn json_to_aon(&self, json: *const c_char, root_schema_name: *const c_char)
        -> *mut c_char;

    /// Converts NUL-terminated AON to JSON, returning null on failure.
    ///
    /// # Safety
    ///
    /// `aon` must point to a NUL-terminated string that stays valid for the
    /// duration of the call.
    unsafe fn aon_to_json(&self, aon: *const c_char) -> *mut c_char;

    /// Returns the last error message, or null when there is none.
    fn last_error(&self) -> *const c_char;

    /// Releases a conversion result.
    ///
    /// # Safety
    ///
    /// `ptr` must be a non-null result of a conversion call on this engine
    /// that was not released before.
    unsafe fn free_string(&self, ptr: *mut c_char);
}
