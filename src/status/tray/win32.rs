// src/status/tray/win32.rs

use std::cell::RefCell;
use std::ffi::c_void;
use std::sync::mpsc as std_mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use windows::Win32::Foundation::{HINSTANCE, HWND, LPARAM, LRESULT, POINT, WPARAM};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::Shell::{
    NIF_ICON, NIF_MESSAGE, NIF_TIP, NIM_ADD, NIM_DELETE, NIM_MODIFY, NOTIFYICONDATAW,
    Shell_NotifyIconW,
};
use windows::Win32::UI::WindowsAndMessaging::{
    AppendMenuW, CreatePopupMenu, CreateWindowExW, DefWindowProcW, DestroyMenu, DispatchMessageW,
    GetCursorPos, GetMessageW, HICON, HMENU, IDI_APPLICATION, LoadIconW, MB_ICONERROR,
    MB_ICONINFORMATION, MB_OK, MESSAGEBOX_STYLE, MF_STRING, MSG, MessageBoxW, PostMessageW,
    PostQuitMessage, RegisterClassExW, SetForegroundWindow, TPM_BOTTOMALIGN, TPM_RETURNCMD,
    TPM_RIGHTBUTTON, TrackPopupMenu, TranslateMessage, WINDOW_EX_STYLE, WINDOW_STYLE, WM_APP,
    WM_CLOSE, WM_CONTEXTMENU, WM_DESTROY, WM_LBUTTONDBLCLK, WM_RBUTTONUP, WNDCLASSEXW,
};
use windows::core::{PCWSTR, w};

use super::{TrayMenu, details_message, tip_buffer};
use crate::engine::RelayEvent;
use crate::icon::Icon;
use crate::status::{StatusAction, StatusSurface};

const TRAY_ID: u32 = 1;
const WM_TRAY_CALLBACK: u32 = WM_APP + 1;
const WM_TRAY_REFRESH: u32 = WM_APP + 2;
const WM_TRAY_REMOVE: u32 = WM_APP + 3;

/// Notification-area icon with a tooltip and a popup menu.
///
/// The icon belongs to a dedicated UI thread that owns a hidden window and
/// runs its message loop. The surface talks to it by posting messages; menu
/// picks travel back as [`RelayEvent::ActionInvoked`].
pub struct TraySurface {
    events: mpsc::Sender<RelayEvent>,
    actions: Vec<StatusAction>,
    tip: Arc<Mutex<String>>,
    window: Option<isize>,
    thread: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for TraySurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraySurface")
            .field("actions", &self.actions)
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}

impl TraySurface {
    pub fn new(events: mpsc::Sender<RelayEvent>) -> Self {
        Self {
            events,
            actions: Vec::new(),
            tip: Arc::new(Mutex::new(String::new())),
            window: None,
            thread: None,
        }
    }

    fn set_tip(&self, text: &str) {
        match self.tip.lock() {
            Ok(mut tip) => *tip = text.to_string(),
            Err(poisoned) => *poisoned.into_inner() = text.to_string(),
        }
    }

    fn post(&self, msg: u32) {
        let Some(raw) = self.window else {
            return;
        };
        let hwnd = HWND(raw as *mut c_void);
        if let Err(e) = unsafe { PostMessageW(hwnd, msg, WPARAM(0), LPARAM(0)) } {
            debug!(msg, error = %e, "posting to tray window failed");
        }
    }
}

impl StatusSurface for TraySurface {
    fn show(&mut self, icon: &Icon, text: &str) {
        self.set_tip(text);
        if self.thread.is_some() {
            self.post(WM_TRAY_REFRESH);
            return;
        }

        let icon_raw = match icon {
            Icon::Owned(handle) => Some(handle.raw()),
            Icon::Builtin => None,
        };
        let menu = TrayMenu::new(&self.actions);
        let events = self.events.clone();
        let tip = Arc::clone(&self.tip);
        let (ready_tx, ready_rx) = std_mpsc::channel();

        let spawned = std::thread::Builder::new()
            .name("apprelay-tray".to_string())
            .spawn(move || run_tray_thread(icon_raw, menu, events, tip, ready_tx));

        let thread = match spawned {
            Ok(thread) => thread,
            Err(e) => {
                warn!(error = %e, "could not start tray thread");
                return;
            }
        };

        match ready_rx.recv() {
            Ok(Ok(hwnd)) => {
                info!(icon = ?icon.origin(), "tray icon shown");
                self.window = Some(hwnd);
                self.thread = Some(thread);
            }
            Ok(Err(reason)) => warn!(%reason, "tray icon unavailable"),
            Err(_) => warn!("tray thread exited before reporting"),
        }
    }

    fn set_text(&mut self, text: &str) {
        self.set_tip(text);
        self.post(WM_TRAY_REFRESH);
    }

    fn register_action(&mut self, action: StatusAction) {
        if !self.actions.contains(&action) {
            debug!(action = action.label(), "tray action registered");
            self.actions.push(action);
        }
    }

    fn notify_error(&mut self, title: &str, message: &str) {
        error!(%title, %message, "relay error");
        message_box(title, message, MB_OK | MB_ICONERROR);
    }

    fn show_details(&mut self, title: &str, lines: &[String]) {
        let title = title.to_string();
        let body = details_message(lines);
        // Non-blocking: the runtime keeps monitoring while the box is open.
        let _ = std::thread::Builder::new()
            .name("apprelay-details".to_string())
            .spawn(move || message_box(&title, &body, MB_OK | MB_ICONINFORMATION));
    }

    fn hide(&mut self) {
        self.post(WM_TRAY_REMOVE);
    }

    fn dispose(&mut self) {
        self.post(WM_CLOSE);
        self.window = None;
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("tray thread panicked");
            }
        }
        self.actions.clear();
    }
}

impl Drop for TraySurface {
    fn drop(&mut self) {
        self.post(WM_CLOSE);
    }
}

/// Blocking message box.
pub fn message_box(title: &str, message: &str, style: MESSAGEBOX_STYLE) {
    let title = wide(title);
    let message = wide(message);
    unsafe {
        MessageBoxW(
            HWND::default(),
            PCWSTR(message.as_ptr()),
            PCWSTR(title.as_ptr()),
            style,
        );
    }
}

fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

// ---------------------------------------------------------------------------
// UI thread
// ---------------------------------------------------------------------------

struct TrayState {
    hwnd: HWND,
    icon: HICON,
    menu: TrayMenu,
    events: mpsc::Sender<RelayEvent>,
    tip: Arc<Mutex<String>>,
    added: bool,
}

thread_local! {
    static TRAY: RefCell<Option<TrayState>> = const { RefCell::new(None) };
}

impl TrayState {
    fn notify_data(&self) -> NOTIFYICONDATAW {
        let mut nid: NOTIFYICONDATAW = unsafe { std::mem::zeroed() };
        nid.cbSize = std::mem::size_of::<NOTIFYICONDATAW>() as u32;
        nid.hWnd = self.hwnd;
        nid.uID = TRAY_ID;
        nid
    }

    fn tip_data(&self) -> NOTIFYICONDATAW {
        let mut nid = self.notify_data();
        nid.uFlags = NIF_MESSAGE | NIF_ICON | NIF_TIP;
        nid.uCallbackMessage = WM_TRAY_CALLBACK;
        nid.hIcon = self.icon;
        let tip = match self.tip.lock() {
            Ok(tip) => tip.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        nid.szTip = tip_buffer(&tip);
        nid
    }

    fn add(&mut self) -> bool {
        self.added = unsafe { Shell_NotifyIconW(NIM_ADD, &self.tip_data()) }.as_bool();
        self.added
    }

    fn refresh(&self) {
        if self.added {
            let _ = unsafe { Shell_NotifyIconW(NIM_MODIFY, &self.tip_data()) };
        }
    }

    fn remove(&mut self) {
        if self.added {
            let _ = unsafe { Shell_NotifyIconW(NIM_DELETE, &self.notify_data()) };
            self.added = false;
            debug!("tray icon removed");
        }
    }

    fn invoke(&self, action: StatusAction) {
        if !self.menu.contains(action) {
            return;
        }
        if let Err(e) = self.events.try_send(RelayEvent::ActionInvoked(action)) {
            warn!(action = action.label(), error = %e, "dropping tray action");
        }
    }
}

fn with_tray(f: impl FnOnce(&mut TrayState)) {
    TRAY.with(|tray| {
        if let Some(state) = tray.borrow_mut().as_mut() {
            f(state);
        }
    });
}

fn run_tray_thread(
    icon_raw: Option<isize>,
    menu: TrayMenu,
    events: mpsc::Sender<RelayEvent>,
    tip: Arc<Mutex<String>>,
    ready: std_mpsc::Sender<Result<isize, String>>,
) {
    let hinstance: HINSTANCE = match unsafe { GetModuleHandleW(None) } {
        Ok(module) => module.into(),
        Err(e) => {
            let _ = ready.send(Err(e.to_string()));
            return;
        }
    };

    let class = w!("AppRelayTrayWindow");
    let wc = WNDCLASSEXW {
        cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
        lpfnWndProc: Some(tray_proc),
        hInstance: hinstance,
        lpszClassName: class,
        ..Default::default()
    };
    // Zero means "already registered" on a second surface; creation below
    // fails if the class is genuinely missing.
    let _ = unsafe { RegisterClassExW(&wc) };

    let hwnd = match unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE::default(),
            class,
            w!("AppRelay"),
            WINDOW_STYLE::default(),
            0,
            0,
            0,
            0,
            HWND::default(),
            HMENU::default(),
            hinstance,
            None,
        )
    } {
        Ok(hwnd) => hwnd,
        Err(e) => {
            let _ = ready.send(Err(e.to_string()));
            return;
        }
    };

    let icon = match icon_raw {
        Some(raw) => HICON(raw as *mut c_void),
        None => unsafe { LoadIconW(HINSTANCE::default(), IDI_APPLICATION) }.unwrap_or_default(),
    };

    let added = TRAY.with(|tray| {
        let mut state = TrayState {
            hwnd,
            icon,
            menu,
            events,
            tip,
            added: false,
        };
        let added = state.add();
        *tray.borrow_mut() = Some(state);
        added
    });

    if !added {
        let _ = ready.send(Err("Shell_NotifyIconW(NIM_ADD) failed".to_string()));
        with_tray(|state| state.remove());
        let _ = unsafe { PostMessageW(hwnd, WM_CLOSE, WPARAM(0), LPARAM(0)) };
    } else {
        let _ = ready.send(Ok(hwnd.0 as isize));
    }

    let mut msg = MSG::default();
    while unsafe { GetMessageW(&mut msg, None, 0, 0) }.0 > 0 {
        unsafe {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }

    TRAY.with(|tray| tray.borrow_mut().take());
    debug!("tray thread finished");
}

unsafe extern "system" fn tray_proc(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    match msg {
        WM_TRAY_CALLBACK => {
            match (lparam.0 as u32) & 0xFFFF {
                WM_RBUTTONUP | WM_CONTEXTMENU => unsafe { popup_menu(hwnd) },
                WM_LBUTTONDBLCLK => with_tray(|state| state.invoke(StatusAction::ShowDetails)),
                _ => {}
            }
            LRESULT(0)
        }
        WM_TRAY_REFRESH => {
            with_tray(|state| state.refresh());
            LRESULT(0)
        }
        WM_TRAY_REMOVE => {
            with_tray(|state| state.remove());
            LRESULT(0)
        }
        WM_DESTROY => {
            with_tray(|state| state.remove());
            unsafe { PostQuitMessage(0) };
            LRESULT(0)
        }
        _ => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
    }
}

/// Show the action menu at the cursor. The state is not borrowed while the
/// menu's nested message loop runs.
unsafe fn popup_menu(hwnd: HWND) {
    let Some(menu) = TRAY.with(|tray| tray.borrow().as_ref().map(|state| state.menu.clone()))
    else {
        return;
    };
    let Ok(popup) = (unsafe { CreatePopupMenu() }) else {
        return;
    };

    for (id, label) in menu.entries() {
        let label = wide(label);
        let _ = unsafe { AppendMenuW(popup, MF_STRING, id as usize, PCWSTR(label.as_ptr())) };
    }

    // Without this the menu does not close when the user clicks elsewhere.
    let _ = unsafe { SetForegroundWindow(hwnd) };
    let mut pt = POINT::default();
    let _ = unsafe { GetCursorPos(&mut pt) };
    let chosen = unsafe {
        TrackPopupMenu(
            popup,
            TPM_RETURNCMD | TPM_RIGHTBUTTON | TPM_BOTTOMALIGN,
            pt.x,
            pt.y,
            0,
            hwnd,
            None,
        )
    };
    let _ = unsafe { DestroyMenu(popup) };

    if let Some(action) = menu.action_for_command(chosen.0 as u32) {
        with_tray(|state| state.invoke(action));
    }
}
