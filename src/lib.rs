//! Safe bindings to the AON conversion engine.
//!
//! The engine converts between JSON and AON text through a C ABI. This crate
//! marshals host strings into the engine, takes ownership of the strings it
//! returns, and turns its process-wide error slot into [`Result`]s.
//!
//! ```
//! let aon = aon::json_to_aon(r#"{"name":"x"}"#, "Person").unwrap();
//! assert_eq!(aon::aon_to_json(&aon).unwrap(), r#"{"name":"x"}"#);
//!
//! let err = aon::aon_to_json("").unwrap_err();
//! assert_eq!(err.to_string(), aon::last_error());
//! ```

mod abort;
mod channel;
mod convert;
mod error;
pub mod ffi;
mod sys;

pub use self::{
    convert::{aon_to_json, json_to_aon, last_error, native, Converter},
    error::{Error, Result},
    ffi::{
        buffer::EngineString,
        string::{HostStr, NativeString},
    },
    sys::{Engine, Native},
};
pub use log;

/// Environment variable holding the log filter of the `aon` executables.
pub const LOG_ENV: &str = "AON_LOG";

/// Installs the panic hook that reports panics through `log`.
///
/// Only the first call has an effect. Records go to whatever `log`
/// implementation the host installed.
pub fn init() {
    use std::sync::Once;

    static INIT: Once = Once::new();
    INIT.call_once(abort::set_panic_hook);
}
