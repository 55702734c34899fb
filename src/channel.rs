//! The engine's error channel.
//!
//! The engine reports failures by returning null and recording a message in
//! a process-wide slot, which its next conversion call overwrites. Readers
//! must hold the engine lock from the failing call until the message has
//! been copied out.

use crate::{error::Error, sys::Engine};
use std::ffi::CStr;

/// Copies the current contents of the error slot. Empty when no message is
/// set.
pub fn read<E>(engine: &E) -> String
where
    E: Engine + ?Sized,
{
    let ptr = engine.last_error();
    if ptr.is_null() {
        return String::new();
    }

    // SAFETY: The engine keeps the message alive until its next conversion
    // call, and the caller holds the engine lock that serializes those calls.
    unsafe { CStr::from_ptr(ptr) }
        .to_string_lossy()
        .into_owned()
}

/// Drains the error slot after a conversion returned null.
pub fn failure<E>(engine: &E) -> Error
where
    E: Engine + ?Sized,
{
    let message = read(engine);
    if message.is_empty() {
        Error::Unknown
    } else {
        Error::Conversion(message)
    }
}
