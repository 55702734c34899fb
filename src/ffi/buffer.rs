//! Engine allocated string buffers.

use crate::{
    error::{Error, Result},
    sys::Engine,
};
use std::{
    ffi::CStr,
    fmt::{self, Debug, Formatter},
    os::raw::c_char,
    ptr::NonNull,
};

/// A NUL-terminated string allocated by the engine and owned by the caller.
///
/// The buffer is released through the engine's free routine exactly once,
/// when the guard is dropped, on every exit path.
pub struct EngineString<'e, E>
where
    E: Engine + ?Sized,
{
    ptr: NonNull<c_char>,
    engine: &'e E,
}

impl<'e, E> EngineString<'e, E>
where
    E: Engine + ?Sized,
{
    /// Takes ownership of the result of a conversion call. Returns `None` for
    /// the null failure sentinel, in which case there is nothing to release.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or a NUL-terminated string returned by a conversion
    /// call on `engine` that has not been released yet.
    pub unsafe fn from_raw(engine: &'e E, ptr: *mut c_char) -> Option<Self> {
        NonNull::new(ptr).map(|ptr| Self { ptr, engine })
    }

    /// Returns the engine string as a C string slice.
    pub fn as_c_str(&self) -> &CStr {
        // SAFETY: `ptr` is a valid NUL-terminated string until `self` drops.
        unsafe { CStr::from_ptr(self.ptr.as_ptr()) }
    }

    /// Copies the engine string into a host string and releases the buffer.
    ///
    /// The buffer is released even when it does not hold valid UTF-8.
    pub fn into_string(self) -> Result<String> {
        self.as_c_str()
            .to_str()
            .map(str::to_owned)
            .map_err(|err| Error::Encoding(format!("engine returned {}", err)))
    }
}

impl<E> Drop for EngineString<'_, E>
where
    E: Engine + ?Sized,
{
    fn drop(&mut self) {
        // SAFETY: `ptr` came from a conversion call on `engine` and, since
        // the guard owns it, has not been released yet.
        unsafe { self.engine.free_string(self.ptr.as_ptr()) }
    }
}

impl<E> Debug for EngineString<'_, E>
where
    E: Engine + ?Sized,
{
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        Debug::fmt(self.as_c_str(), f)
    }
}
