//! C ABI exports.
//!
//! # Ownership
//!
//! Strings returned by [`aon_json_to_aon`] and [`aon_aon_to_json`] are
//! allocated by this crate and belong to the caller, who must hand them back
//! to [`aon_free_string`] exactly once. The message returned by
//! [`aon_last_error`] stays owned by the engine and is only valid until the
//! next conversion call.
//!
//! # Error slot
//!
//! Failures are reported by returning null and recording a message in a
//! single process-wide slot. Every conversion call clears the slot on entry,
//! so callers that share the engine between threads must serialize
//! "convert + read error" themselves.

use crate::error::{Error, Result};
use std::{
    any::Any,
    ffi::{CStr, CString},
    os::raw::c_char,
    panic::{self, AssertUnwindSafe},
    ptr,
    sync::{Mutex, MutexGuard, PoisonError},
};

static LAST_ERROR: Mutex<Option<CString>> = Mutex::new(None);

fn slot() -> MutexGuard<'static, Option<CString>> {
    LAST_ERROR.lock().unwrap_or_else(PoisonError::into_inner)
}

fn set_error(message: String) {
    let bytes = message
        .into_bytes()
        .into_iter()
        .filter(|b| *b != 0)
        .collect::<Vec<_>>();
    // SAFETY: NUL bytes were filtered out above.
    *slot() = Some(unsafe { CString::from_vec_unchecked(bytes) });
}

/// Converts a JSON document to AON using `root_schema_name` as the name of
/// the root schema.
///
/// # Safety
///
/// Both arguments must be null or point to NUL-terminated strings that stay
/// valid for the duration of the call.
#[no_mangle]
pub unsafe extern "C" fn aon_json_to_aon(
    json: *const c_char,
    root_schema_name: *const c_char,
) -> *mut c_char {
    export(|| {
        let json = read_arg(json, "JSON input")?;
        let root_schema_name = read_arg(root_schema_name, "root schema name")?;
        crate::json_to_aon(json, root_schema_name)
    })
}

/// Converts an AON document to compact JSON.
///
/// # Safety
///
/// `aon_text` must be null or point to a NUL-terminated string that stays
/// valid for the duration of the call.
#[no_mangle]
pub unsafe extern "C" fn aon_aon_to_json(aon_text: *const c_char) -> *mut c_char {
    export(|| {
        let aon_text = read_arg(aon_text, "AON input")?;
        crate::aon_to_json(aon_text)
    })
}

/// Returns the message of the last failed conversion, or null when the last
/// conversion succeeded.
#[no_mangle]
pub extern "C" fn aon_last_error() -> *const c_char {
    match &*slot() {
        // NOTE: The `CString` heap buffer does not move when the guard is
        // released, it is only dropped when the next conversion resets the
        // slot.
        Some(message) => message.as_ptr(),
        None => ptr::null(),
    }
}

/// Releases a string returned by one of the conversion functions.
///
/// # Safety
///
/// `ptr` must be null or a pointer returned by [`aon_json_to_aon`] or
/// [`aon_aon_to_json`] that was not released before.
#[no_mangle]
pub unsafe extern "C" fn aon_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

unsafe fn read_arg<'a>(ptr: *const c_char, name: &'static str) -> Result<&'a str> {
    if ptr.is_null() {
        return Err(Error::NullPointer);
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map_err(|_| Error::InvalidUtf8(name))
}

/// Runs a conversion at the ABI edge: resets the error slot, and turns both
/// errors and panics into a null return with a recorded message.
fn export(convert: impl FnOnce() -> Result<String>) -> *mut c_char {
    *slot() = None;

    let result = match panic::catch_unwind(AssertUnwindSafe(convert)) {
        Ok(result) => result.and_then(|text| CString::new(text).map_err(|_| Error::InteriorNul)),
        Err(payload) => {
            let message = format!("internal error: {}", panic_message(&*payload));
            log::error!("{}", message);
            set_error(message);
            return ptr::null_mut();
        }
    };

    match result {
        Ok(text) => text.into_raw(),
        Err(err) => {
            log::debug!("conversion failed: {}", err);
            set_error(err.to_string());
            ptr::null_mut()
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}
