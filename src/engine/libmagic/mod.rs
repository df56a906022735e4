mod error;

use super::Engine;
use crate::check::CheckKind;
pub use error::E;
use libc::{c_char, c_int, c_void, size_t};
use log::debug;
use std::{
    ffi::{CStr, CString},
    path::Path,
    ptr::{self, NonNull},
};

#[repr(C)]
struct MagicSet {
    _private: [u8; 0],
}

const MAGIC_NONE: c_int = 0x0000000;
const MAGIC_MIME_TYPE: c_int = 0x0000010;
const MAGIC_MIME_ENCODING: c_int = 0x0000400;
// Report failures through NULL results instead of "cannot open ..." text
const MAGIC_ERROR: c_int = 0x0000200;

#[link(name = "magic")]
extern "C" {
    fn magic_open(flags: c_int) -> *mut MagicSet;
    fn magic_close(cookie: *mut MagicSet);
    fn magic_error(cookie: *mut MagicSet) -> *const c_char;
    fn magic_load(cookie: *mut MagicSet, filename: *const c_char) -> c_int;
    fn magic_file(cookie: *mut MagicSet, filename: *const c_char) -> *const c_char;
    fn magic_buffer(cookie: *mut MagicSet, buffer: *const c_void, length: size_t)
        -> *const c_char;
}

fn flags(kind: CheckKind) -> c_int {
    match kind {
        CheckKind::Text => MAGIC_NONE,
        CheckKind::Mime => MAGIC_MIME_TYPE,
        CheckKind::Encoding => MAGIC_MIME_ENCODING,
    }
}

/// Opened and loaded libmagic handle for one set of flags.
struct Cookie(NonNull<MagicSet>);

impl Cookie {
    fn open(flags: c_int) -> Result<Self, E> {
        let cookie = NonNull::new(unsafe { magic_open(flags | MAGIC_ERROR) }).ok_or(E::Open)?;
        let cookie = Cookie(cookie);
        if unsafe { magic_load(cookie.0.as_ptr(), ptr::null()) } != 0 {
            return Err(E::Load(cookie.error()));
        }
        Ok(cookie)
    }

    fn error(&self) -> String {
        let msg = unsafe { magic_error(self.0.as_ptr()) };
        if msg.is_null() {
            String::from("unknown libmagic error")
        } else {
            unsafe { CStr::from_ptr(msg) }.to_string_lossy().into_owned()
        }
    }

    /// Copies out the result; libmagic reuses the memory on the next call.
    fn result(&self, result: *const c_char) -> Result<String, E> {
        if result.is_null() {
            Err(E::Native(self.error()))
        } else {
            Ok(unsafe { CStr::from_ptr(result) }
                .to_string_lossy()
                .into_owned())
        }
    }
}

impl Drop for Cookie {
    fn drop(&mut self) {
        unsafe { magic_close(self.0.as_ptr()) }
    }
}

/// Engine which calls libmagic in-process. One cookie is kept per kind of check, so flags are
/// never switched between calls.
pub struct LibMagic {
    text: Cookie,
    mime: Cookie,
    encoding: Cookie,
}

// SAFETY: cookies are owned exclusively and used only through `&mut self`, which the gateway
// hands out to one thread at a time.
unsafe impl Send for LibMagic {}

impl LibMagic {
    fn cookie(&self, kind: CheckKind) -> &Cookie {
        match kind {
            CheckKind::Text => &self.text,
            CheckKind::Mime => &self.mime,
            CheckKind::Encoding => &self.encoding,
        }
    }
}

#[cfg(unix)]
fn c_path(path: &Path) -> Result<CString, E> {
    use std::os::unix::ffi::OsStrExt;
    CString::new(path.as_os_str().as_bytes())
        .map_err(|_| E::InvalidPath(path.display().to_string()))
}

#[cfg(not(unix))]
fn c_path(path: &Path) -> Result<CString, E> {
    CString::new(path.to_string_lossy().as_bytes())
        .map_err(|_| E::InvalidPath(path.display().to_string()))
}

impl Engine for LibMagic {
    type Error = E;

    fn init() -> Result<Self, E> {
        let engine = Self {
            text: Cookie::open(flags(CheckKind::Text))?,
            mime: Cookie::open(flags(CheckKind::Mime))?,
            encoding: Cookie::open(flags(CheckKind::Encoding))?,
        };
        debug!("libmagic cookies have been opened and loaded");
        Ok(engine)
    }

    fn by_path(&mut self, kind: CheckKind, path: &Path) -> Result<String, E> {
        let path = c_path(path)?;
        let cookie = self.cookie(kind);
        cookie.result(unsafe { magic_file(cookie.0.as_ptr(), path.as_ptr()) })
    }

    fn by_buffer(&mut self, kind: CheckKind, bytes: &[u8]) -> Result<String, E> {
        let cookie = self.cookie(kind);
        cookie.result(unsafe {
            magic_buffer(
                cookie.0.as_ptr(),
                bytes.as_ptr() as *const c_void,
                bytes.len() as size_t,
            )
        })
    }
}
