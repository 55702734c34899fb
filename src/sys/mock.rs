//! Instrumented engines for tests.

use super::Engine;
use std::{
    collections::HashSet,
    ffi::{CStr, CString},
    os::raw::c_char,
    ptr,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex, MutexGuard, PoisonError,
    },
};

/// Byte written over engine buffers right before they are released.
const POISON: u8 = 0xa5;

/// Serializes tests that go through the linked engine, whose error slot
/// `last_error` reads outside of the failing call.
pub fn serial() -> MutexGuard<'static, ()> {
    static SERIAL: Mutex<()> = Mutex::new(());
    SERIAL.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Tracks every buffer handed out by an engine.
#[derive(Debug, Default)]
struct Ledger {
    live: Mutex<HashSet<usize>>,
    allocations: AtomicUsize,
    releases: AtomicUsize,
}

impl Ledger {
    fn allocated(&self, ptr: *mut c_char) {
        if ptr.is_null() {
            return;
        }
        self.allocations.fetch_add(1, Ordering::SeqCst);
        assert!(
            self.live.lock().unwrap().insert(ptr as usize),
            "engine handed out live buffer {:p} twice",
            ptr,
        );
    }

    /// Forgets a buffer and poisons its contents, so that reading it after
    /// the engine frees it cannot go unnoticed.
    unsafe fn released(&self, ptr: *mut c_char) {
        assert!(
            self.live.lock().unwrap().remove(&(ptr as usize)),
            "release of unknown or already released buffer {:p}",
            ptr,
        );
        self.releases.fetch_add(1, Ordering::SeqCst);

        let len = CStr::from_ptr(ptr).to_bytes().len();
        ptr::write_bytes(ptr, POISON, len);
    }

    fn allocations(&self) -> usize {
        self.allocations.load(Ordering::SeqCst)
    }

    fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    fn outstanding(&self) -> usize {
        self.live.lock().unwrap().len()
    }
}

/// Wraps an engine and checks that every buffer it returns is released
/// exactly once.
#[derive(Debug, Default)]
pub struct Instrumented<E> {
    inner: E,
    ledger: Ledger,
}

impl<E> Instrumented<E> {
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            ledger: Ledger::default(),
        }
    }

    pub fn allocations(&self) -> usize {
        self.ledger.allocations()
    }

    pub fn releases(&self) -> usize {
        self.ledger.releases()
    }

    pub fn outstanding(&self) -> usize {
        self.ledger.outstanding()
    }
}

impl<E> Engine for Instrumented<E>
where
    E: Engine,
{
    fn lock(&self) -> MutexGuard<'_, ()> {
        self.inner.lock()
    }

    unsafe fn json_to_aon(
        &self,
        json: *const c_char,
        root_schema_name: *const c_char,
    ) -> *mut c_char {
        let ptr = self.inner.json_to_aon(json, root_schema_name);
        self.ledger.allocated(ptr);
        ptr
    }

    unsafe fn aon_to_json(&self, aon: *const c_char) -> *mut c_char {
        let ptr = self.inner.aon_to_json(aon);
        self.ledger.allocated(ptr);
        ptr
    }

    fn last_error(&self) -> *const c_char {
        self.inner.last_error()
    }

    unsafe fn free_string(&self, ptr: *mut c_char) {
        self.ledger.released(ptr);
        self.inner.free_string(ptr);
    }
}

/// What a [`Scripted`] engine answers to every conversion.
#[derive(Clone, Debug)]
pub enum Reply {
    /// A successful conversion returning these bytes.
    Bytes(Vec<u8>),
    /// A failed conversion.
    Null,
}

impl Reply {
    pub fn text(text: &str) -> Self {
        Self::Bytes(text.as_bytes().to_vec())
    }
}

/// An engine that answers every conversion with a fixed reply and records
/// the arguments it was called with.
#[derive(Debug)]
pub struct Scripted {
    reply: Reply,
    error: Option<CString>,
    calls: Mutex<Vec<Vec<String>>>,
    ledger: Ledger,
    slot: Mutex<()>,
}

impl Scripted {
    pub fn new(reply: Reply) -> Self {
        Self {
            reply,
            error: None,
            calls: Mutex::default(),
            ledger: Ledger::default(),
            slot: Mutex::default(),
        }
    }

    /// Sets the message exposed through the error slot.
    pub fn with_error(mut self, message: &str) -> Self {
        self.error = Some(CString::new(message).unwrap());
        self
    }

    /// Returns the arguments of every conversion call so far.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn allocations(&self) -> usize {
        self.ledger.allocations()
    }

    pub fn releases(&self) -> usize {
        self.ledger.releases()
    }

    unsafe fn respond(&self, args: &[*const c_char]) -> *mut c_char {
        let args = args
            .iter()
            .map(|arg| CStr::from_ptr(*arg).to_string_lossy().into_owned())
            .collect();
        self.calls.lock().unwrap().push(args);

        let ptr = match &self.reply {
            Reply::Bytes(bytes) => CString::new(bytes.clone()).unwrap().into_raw(),
            Reply::Null => ptr::null_mut(),
        };
        self.ledger.allocated(ptr);
        ptr
    }
}

impl Engine for Scripted {
    fn lock(&self) -> MutexGuard<'_, ()> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    unsafe fn json_to_aon(
        &self,
        json: *const c_char,
        root_schema_name: *const c_char,
    ) -> *mut c_char {
        self.respond(&[json, root_schema_name])
    }

    unsafe fn aon_to_json(&self, aon: *const c_char) -> *mut c_char {
        self.respond(&[aon])
    }

    fn last_error(&self) -> *const c_char {
        self.error
            .as_ref()
            .map_or(ptr::null(), |message| message.as_ptr())
    }

    unsafe fn free_string(&self, ptr: *mut c_char) {
        self.ledger.released(ptr);
        drop(CString::from_raw(ptr));
    }
}
