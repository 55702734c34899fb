//! Module implementing a panic hook that routes panics through `log`.

use std::{any::Any, panic};

/// Chains a hook in front of the current panic hook that logs the panic
/// message and location as an error.
pub fn set_panic_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        match info.location() {
            Some(location) => log::error!(
                "panicked at {}:{}:{}: {}",
                location.file(),
                location.line(),
                location.column(),
                payload_message(info.payload()),
            ),
            None => log::error!("panicked: {}", payload_message(info.payload())),
        }
        previous(info);
    }));
}

fn payload_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "Box<dyn Any>"
    }
}
