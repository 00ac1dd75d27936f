// src/com.rs

//! COM apartment scoping for shell calls.
//!
//! `ShellExecuteExW` and `SHGetFileInfoW` may activate shell extensions, URL
//! handlers and DDE associations through COM, so the calling thread needs an
//! initialised apartment for the duration of the call.

use tracing::debug;
use windows::Win32::System::Com::{
    COINIT, COINIT_APARTMENTTHREADED, COINIT_DISABLE_OLE1DDE, CoInitializeEx, CoUninitialize,
};

/// Initialises COM on the current thread; uninitialises on drop if this
/// guard was the one that initialised it.
///
/// A thread that already joined a multithreaded apartment reports
/// `RPC_E_CHANGED_MODE`; COM is usable there, so that case is not an error,
/// and nothing is torn down on drop.
#[derive(Debug)]
pub struct ComApartment {
    owned: bool,
}

impl ComApartment {
    pub fn enter() -> Self {
        let flags = COINIT(COINIT_APARTMENTTHREADED.0 | COINIT_DISABLE_OLE1DDE.0);
        let hr = unsafe { CoInitializeEx(None, flags) };
        if hr.is_err() {
            debug!(hresult = hr.0, "COM already initialised with another model");
        }
        Self { owned: hr.is_ok() }
    }
}

impl Drop for ComApartment {
    fn drop(&mut self) {
        if self.owned {
            unsafe { CoUninitialize() };
        }
    }
}
