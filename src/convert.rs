//! Conversion entry points.

use crate::{
    channel,
    error::Result,
    ffi::{
        buffer::EngineString,
        string::{HostStr, NativeString},
    },
    sys::{Engine, Native},
};
use std::os::raw::c_char;

/// Conversion entry points over an engine.
///
/// The engine's error slot is shared by every handle to it, so a converter
/// holds the engine's lock from the moment it enters the engine until it has
/// copied the error message out. Engine calls are synchronous and cannot be
/// cancelled once entered; a slow conversion blocks every other caller of
/// the same engine.
pub struct Converter<E> {
    engine: E,
}

impl<E> Converter<E> {
    pub const fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }
}

impl<E> Converter<E>
where
    E: Engine,
{
    /// Converts a JSON document to AON with the specified root schema name.
    pub fn json_to_aon<J, R>(&self, json: &J, root_schema_name: &R) -> Result<String>
    where
        J: HostStr + ?Sized,
        R: HostStr + ?Sized,
    {
        let json = NativeString::new(json)?;
        let root_schema_name = NativeString::new(root_schema_name)?;

        let _guard = self.engine.lock();
        log::trace!(
            "entering engine json_to_aon with {} bytes, root schema {:?}",
            json.as_c_str().to_bytes().len(),
            root_schema_name.as_c_str(),
        );
        // SAFETY: Both arguments are NUL-terminated and alive for the call.
        let result = unsafe {
            self.engine
                .json_to_aon(json.as_ptr(), root_schema_name.as_ptr())
        };
        drop((json, root_schema_name));

        self.finish("json_to_aon", result)
    }

    /// Converts an AON document to JSON.
    pub fn aon_to_json<A>(&self, aon: &A) -> Result<String>
    where
        A: HostStr + ?Sized,
    {
        let aon = NativeString::new(aon)?;

        let _guard = self.engine.lock();
        log::trace!(
            "entering engine aon_to_json with {} bytes",
            aon.as_c_str().to_bytes().len(),
        );
        // SAFETY: The argument is NUL-terminated and alive for the call.
        let result = unsafe { self.engine.aon_to_json(aon.as_ptr()) };
        drop(aon);

        self.finish("aon_to_json", result)
    }

    /// Returns the engine's last error message, or an empty string.
    pub fn last_error(&self) -> String {
        let _guard = self.engine.lock();
        channel::read(&self.engine)
    }

    /// Routes a conversion result to the host, or drains the error slot if
    /// the conversion failed. Must be called with the engine lock held.
    fn finish(&self, operation: &str, result: *mut c_char) -> Result<String> {
        // SAFETY: `result` was just returned by a conversion on this engine.
        match unsafe { EngineString::from_raw(&self.engine, result) } {
            Some(output) => output.into_string(),
            None => {
                let err = channel::failure(&self.engine);
                log::debug!("engine {} failed: {}", operation, err);
                Err(err)
            }
        }
    }
}

static NATIVE: Converter<Native> = Converter::new(Native);

/// Returns the process-wide converter for the linked engine.
///
/// Use it directly to convert host strings other than `str`, such as UTF-16
/// code units.
pub fn native() -> &'static Converter<Native> {
    &NATIVE
}

/// Converts a JSON document to AON with the specified root schema name.
///
/// # Examples
///
/// ```
/// let aon = aon::json_to_aon(r#"{"name":"x"}"#, "Person").unwrap();
/// assert!(aon.contains("Person:(name:string)"));
/// ```
pub fn json_to_aon(json: &str, root_schema_name: &str) -> Result<String> {
    NATIVE.json_to_aon(json, root_schema_name)
}

/// Converts an AON document to compact JSON.
pub fn aon_to_json(aon: &str) -> Result<String> {
    NATIVE.aon_to_json(aon)
}

/// Returns the message of the last failed conversion, or an empty string.
///
/// Another thread converting in between replaces the message; the error
/// returned by the failing call itself is always accurate.
pub fn last_error() -> String {
    NATIVE.last_error()
}
