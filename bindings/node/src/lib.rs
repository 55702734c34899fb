//! Node.js bindings to the AON conversion engine using napi-rs.
//!
//! JavaScript strings are read as UTF-16 code units and marshaled into the
//! engine by the `aon` crate, so the whole conversion goes through the same
//! two-pass protocol as any other host. Failures are thrown as `Error`s
//! carrying the engine message.

#![deny(clippy::all)]

use napi::{bindgen_prelude::*, check_status, sys, Env, JsString, NapiRaw};
use napi_derive::napi;
use std::{ptr, sync::Once};
use tracing_subscriber::EnvFilter;

/// Installs the stderr log subscriber and the panic hook on first use.
fn init() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        // NOTE: An embedding application may already have a subscriber.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_env(aon::LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_writer(std::io::stderr)
            .try_init();
        aon::init();
    });
}

/// Copies a JavaScript string out as UTF-16 code units: one call to size the
/// buffer, one to fill it.
fn code_units(env: Env, value: JsString) -> Result<Vec<u16>> {
    let mut len = 0;
    check_status!(unsafe {
        sys::napi_get_value_string_utf16(env.raw(), value.raw(), ptr::null_mut(), 0, &mut len)
    })?;

    // NOTE: napi always writes a terminator, which needs one extra unit.
    let mut units = vec![0_u16; len + 1];
    let mut written = 0;
    check_status!(unsafe {
        sys::napi_get_value_string_utf16(
            env.raw(),
            value.raw(),
            units.as_mut_ptr(),
            units.len(),
            &mut written,
        )
    })?;
    units.truncate(written);
    Ok(units)
}

fn to_js_error(err: aon::Error) -> Error {
    Error::from_reason(err.to_string())
}

/// Converts a JSON document to AON using `rootName` as the root schema name.
#[napi(js_name = "jsonToAon")]
pub fn json_to_aon(env: Env, json: JsString, root_name: JsString) -> Result<String> {
    init();
    let json = code_units(env, json)?;
    let root_name = code_units(env, root_name)?;
    log::trace!("jsonToAon called with {} UTF-16 code units", json.len());

    aon::native()
        .json_to_aon(json.as_slice(), root_name.as_slice())
        .map_err(to_js_error)
}

/// Converts an AON document to compact JSON.
#[napi(js_name = "aonToJson")]
pub fn aon_to_json(env: Env, aon_text: JsString) -> Result<String> {
    init();
    let aon_text = code_units(env, aon_text)?;
    log::trace!("aonToJson called with {} UTF-16 code units", aon_text.len());

    aon::native()
        .aon_to_json(aon_text.as_slice())
        .map_err(to_js_error)
}

/// Returns the message of the last failed conversion, or an empty string.
#[napi(js_name = "lastError")]
pub fn last_error() -> String {
    aon::last_error()
}
