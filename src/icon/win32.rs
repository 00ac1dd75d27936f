// src/icon/win32.rs

use std::ffi::c_void;
use std::os::windows::ffi::OsStrExt;
use std::path::Path;

use tracing::{debug, warn};
use windows::Win32::Foundation::HINSTANCE;
use windows::Win32::Storage::FileSystem::FILE_FLAGS_AND_ATTRIBUTES;
use windows::Win32::UI::Shell::{SHFILEINFOW, SHGFI_FLAGS, SHGFI_ICON, SHGFI_LARGEICON, SHGetFileInfoW};
use windows::Win32::UI::WindowsAndMessaging::{
    DestroyIcon, HICON, IMAGE_ICON, LR_DEFAULTSIZE, LR_LOADFROMFILE, LoadImageW,
};
use windows::core::PCWSTR;

use super::{IconBackend, IconHandle, IconOrigin};
use crate::com::ComApartment;
use crate::errors::{RelayError, Result};

/// Backend that produces real `HICON`s, destroyed on release.
#[derive(Debug, Clone, Copy, Default)]
pub struct Win32IconBackend;

fn wide(path: &Path) -> Vec<u16> {
    path.as_os_str().encode_wide().chain(std::iter::once(0)).collect()
}

impl IconBackend for Win32IconBackend {
    fn load_icon_file(&self, path: &Path) -> Result<IconHandle> {
        let name = wide(path);
        let handle = unsafe {
            LoadImageW(
                HINSTANCE::default(),
                PCWSTR(name.as_ptr()),
                IMAGE_ICON,
                0,
                0,
                LR_LOADFROMFILE | LR_DEFAULTSIZE,
            )
        }
        .map_err(|e| RelayError::icon(path, e))?;

        Ok(IconHandle::new(
            handle.0 as isize,
            IconOrigin::IconFile(path.to_path_buf()),
        ))
    }

    /// Asks the shell for the icon it shows for `path`, which covers
    /// executables, shortcuts and documents alike.
    fn extract_associated(&self, path: &Path) -> Result<IconHandle> {
        let name = wide(path);
        let mut info = SHFILEINFOW::default();
        let found = {
            let _com = ComApartment::enter();
            unsafe {
                SHGetFileInfoW(
                    PCWSTR(name.as_ptr()),
                    FILE_FLAGS_AND_ATTRIBUTES(0),
                    Some(&mut info as *mut SHFILEINFOW),
                    std::mem::size_of::<SHFILEINFOW>() as u32,
                    SHGFI_FLAGS(SHGFI_ICON.0 | SHGFI_LARGEICON.0),
                )
            }
        };
        if found == 0 || info.hIcon.is_invalid() {
            return Err(RelayError::icon(path, "the shell has no icon for this file"));
        }

        Ok(IconHandle::new(
            info.hIcon.0 as isize,
            IconOrigin::Associated(path.to_path_buf()),
        ))
    }

    fn release(&self, handle: IconHandle) {
        let hicon = HICON(handle.raw() as *mut c_void);
        match unsafe { DestroyIcon(hicon) } {
            Ok(()) => debug!(origin = ?handle.origin(), "icon destroyed"),
            Err(e) => warn!(origin = ?handle.origin(), error = %e, "DestroyIcon failed"),
        }
    }
}
