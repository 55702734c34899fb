//! Module containing utilities for marshaling strings between host string
//! representations and the engine's C ABI.
//!
//! # Buffer ownership
//!
//! Every buffer crossing the boundary goes through these states:
//!
//! - **Host owned**: the caller's string. Only ever read, through
//!   [`string::HostStr`].
//! - **Borrowed by the engine**: a [`string::NativeString`] copy of a host
//!   string. It is allocated and released by this crate, and only lent to the
//!   engine for the duration of a single call, whatever its outcome.
//! - **Caller owned**: a non-null string returned by the engine, wrapped in a
//!   [`buffer::EngineString`] the moment the call returns. It must go back to
//!   the engine's own free routine, never to the Rust allocator.
//! - **Released**: the guard has been dropped and the pointer is gone.
//!
//! # Safety
//!
//! Engine strings must be copied into Rust-owned memory before their guard
//! is dropped. [`buffer::EngineString::into_string`] is the only way to read
//! one, and it consumes the guard.

pub mod buffer;
pub mod string;
