//! Host string marshaling into NUL-terminated UTF-8.

use crate::error::{Error, Result};
use std::{
    ffi::{CStr, CString},
    fmt::{self, Debug, Formatter},
    os::raw::c_char,
};

/// A host string representation that can be marshaled into UTF-8.
///
/// Marshaling happens in two passes: a calibration pass that computes the
/// exact encoded length, and an encode pass into a buffer of that size. The
/// host representation has no fixed expansion ratio to UTF-8, so guessing a
/// size up front could truncate.
pub trait HostStr {
    /// Returns the number of UTF-8 bytes needed to encode the string,
    /// excluding the NUL terminator.
    fn utf8_len(&self) -> Result<usize>;

    /// Appends the UTF-8 encoding of the string to `buffer`.
    fn encode_utf8(&self, buffer: &mut Vec<u8>) -> Result<()>;
}

impl HostStr for str {
    fn utf8_len(&self) -> Result<usize> {
        Ok(self.len())
    }

    fn encode_utf8(&self, buffer: &mut Vec<u8>) -> Result<()> {
        buffer.extend_from_slice(self.as_bytes());
        Ok(())
    }
}

/// UTF-16 code units, the string representation of JavaScript hosts.
impl HostStr for [u16] {
    fn utf8_len(&self) -> Result<usize> {
        char::decode_utf16(self.iter().copied()).try_fold(0, |len, ch| {
            ch.map(|ch| len + ch.len_utf8())
                .map_err(|err| unpaired_surrogate(err.unpaired_surrogate()))
        })
    }

    fn encode_utf8(&self, buffer: &mut Vec<u8>) -> Result<()> {
        let mut scratch = [0; 4];
        for ch in char::decode_utf16(self.iter().copied()) {
            let ch = ch.map_err(|err| unpaired_surrogate(err.unpaired_surrogate()))?;
            buffer.extend_from_slice(ch.encode_utf8(&mut scratch).as_bytes());
        }
        Ok(())
    }
}

fn unpaired_surrogate(code_unit: u16) -> Error {
    Error::Encoding(format!("unpaired surrogate {:#06x}", code_unit))
}

/// A NUL-terminated UTF-8 copy of a host string, lent to the engine as a
/// read-only argument.
///
/// The buffer is allocated and released by this crate. The engine never
/// frees it, and it is dropped as soon as the call it was passed to returns.
pub struct NativeString {
    inner: CString,
}

impl NativeString {
    /// Marshals a host string.
    ///
    /// Fails with [`Error::Encoding`] if the string is not representable as
    /// UTF-8 or contains an embedded NUL, which the C ABI cannot carry, and
    /// with [`Error::Allocation`] if the buffer cannot be reserved.
    pub fn new<S>(s: &S) -> Result<Self>
    where
        S: HostStr + ?Sized,
    {
        let len = s.utf8_len()?;
        let capacity = len.checked_add(1).ok_or(Error::Allocation(len))?;

        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(capacity)
            .map_err(|_| Error::Allocation(capacity))?;
        s.encode_utf8(&mut bytes)?;
        debug_assert_eq!(bytes.len(), len, "calibration and encode passes disagree");

        if let Some(position) = bytes.iter().position(|b| *b == 0) {
            return Err(Error::Encoding(format!(
                "embedded NUL at byte {}",
                position
            )));
        }
        bytes.push(0);

        let inner = CString::from_vec_with_nul(bytes)
            .map_err(|err| Error::Encoding(err.to_string()))?;
        Ok(Self { inner })
    }

    /// Returns the pointer to pass to the engine. It is valid for as long as
    /// `self` is alive.
    pub fn as_ptr(&self) -> *const c_char {
        self.inner.as_ptr()
    }

    /// Returns the marshaled string as a C string slice.
    pub fn as_c_str(&self) -> &CStr {
        &self.inner
    }
}

impl Debug for NativeString {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        Debug::fmt(&self.inner, f)
    }
}
