//! The linked AON engine.

use super::Engine;
use std::{
    os::raw::c_char,
    sync::{Mutex, MutexGuard, PoisonError},
};

// Links the engine's exported symbols.
extern crate aon_core as _;

extern "C" {
    fn aon_json_to_aon(json: *const c_char, root_schema_name: *const c_char) -> *mut c_char;
    fn aon_aon_to_json(aon_text: *const c_char) -> *mut c_char;
    fn aon_last_error() -> *const c_char;
    fn aon_free_string(ptr: *mut c_char);
}

/// Guards the linked engine's error slot, which every `Native` handle shares.
static SLOT: Mutex<()> = Mutex::new(());

/// The engine linked into this binary, called through its C ABI.
#[derive(Clone, Copy, Debug, Default)]
pub struct Native;

impl Engine for Native {
    fn lock(&self) -> MutexGuard<'_, ()> {
        // NOTE: The lock guards no data of its own, so a panic while it was
        // held cannot have left anything inconsistent.
        SLOT.lock().unwrap_or_else(PoisonError::into_inner)
    }

    unsafe fn json_to_aon(
        &self,
        json: *const c_char,
        root_schema_name: *const c_char,
    ) -> *mut c_char {
        aon_json_to_aon(json, root_schema_name)
    }

    unsafe fn aon_to_json(&self, aon: *const c_char) -> *mut c_char {
        aon_aon_to_json(aon)
    }

    fn last_error(&self) -> *const c_char {
        // SAFETY: Reading the error slot has no preconditions.
        unsafe { aon_last_error() }
    }

    unsafe fn free_string(&self, ptr: *mut c_char) {
        aon_free_string(ptr)
    }
}
