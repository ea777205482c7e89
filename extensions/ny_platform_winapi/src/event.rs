//! Window message vocabulary
//!
//! Raw messages keep their `WPARAM`/`LPARAM` packing; the accessors below
//! unpack them the way the `GET_*` macros do. OLE drag and drop and the
//! clipboard listener have no message payload worth forwarding, so the
//! connection reports them as separate variants with their offer attached.

use std::sync::Arc;

use ny_core::DataOffer;

/// `HWND` as an integer
pub type Hwnd = u64;

pub const WM_DESTROY: u32 = 0x0002;
pub const WM_MOVE: u32 = 0x0003;
pub const WM_SIZE: u32 = 0x0005;
pub const WM_SETFOCUS: u32 = 0x0007;
pub const WM_KILLFOCUS: u32 = 0x0008;
pub const WM_PAINT: u32 = 0x000F;
pub const WM_CLOSE: u32 = 0x0010;
pub const WM_SHOWWINDOW: u32 = 0x0018;
pub const WM_KEYDOWN: u32 = 0x0100;
pub const WM_KEYUP: u32 = 0x0101;
pub const WM_CHAR: u32 = 0x0102;
pub const WM_SYSKEYDOWN: u32 = 0x0104;
pub const WM_SYSKEYUP: u32 = 0x0105;
pub const WM_MOUSEMOVE: u32 = 0x0200;
pub const WM_LBUTTONDOWN: u32 = 0x0201;
pub const WM_LBUTTONUP: u32 = 0x0202;
pub const WM_RBUTTONDOWN: u32 = 0x0204;
pub const WM_RBUTTONUP: u32 = 0x0205;
pub const WM_MBUTTONDOWN: u32 = 0x0207;
pub const WM_MBUTTONUP: u32 = 0x0208;
pub const WM_MOUSEWHEEL: u32 = 0x020A;
pub const WM_XBUTTONDOWN: u32 = 0x020B;
pub const WM_XBUTTONUP: u32 = 0x020C;
pub const WM_MOUSEHWHEEL: u32 = 0x020E;
pub const WM_MOUSELEAVE: u32 = 0x02A3;

pub const SIZE_RESTORED: usize = 0;
pub const SIZE_MINIMIZED: usize = 1;
pub const SIZE_MAXIMIZED: usize = 2;

pub const XBUTTON1: u16 = 1;
pub const XBUTTON2: u16 = 2;

pub const WHEEL_DELTA: i16 = 120;

/// One message as `GetMessage` returns it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Msg {
    pub hwnd: Hwnd,
    pub message: u32,
    pub wparam: usize,
    pub lparam: isize,
}

impl Msg {
    pub fn new(hwnd: Hwnd, message: u32, wparam: usize, lparam: isize) -> Self {
        Self {
            hwnd,
            message,
            wparam,
            lparam,
        }
    }

    /// Pack a client position the way mouse messages carry it
    pub fn with_point(hwnd: Hwnd, message: u32, wparam: usize, x: i16, y: i16) -> Self {
        Self::new(hwnd, message, wparam, make_lparam(x as u16, y as u16))
    }

    /// `GET_X_LPARAM`, `GET_Y_LPARAM`
    pub fn point(&self) -> (i32, i32) {
        (
            i32::from(loword(self.lparam as usize) as i16),
            i32::from(hiword(self.lparam as usize) as i16),
        )
    }

    /// `LOWORD(lParam)`, `HIWORD(lParam)` for `WM_SIZE`
    pub fn size(&self) -> (u32, u32) {
        (
            u32::from(loword(self.lparam as usize)),
            u32::from(hiword(self.lparam as usize)),
        )
    }

    /// `GET_WHEEL_DELTA_WPARAM`
    pub fn wheel_delta(&self) -> i16 {
        hiword(self.wparam) as i16
    }

    /// `GET_XBUTTON_WPARAM`
    pub fn xbutton(&self) -> u16 {
        hiword(self.wparam)
    }
}

pub fn loword(value: usize) -> u16 {
    (value & 0xFFFF) as u16
}

pub fn hiword(value: usize) -> u16 {
    ((value >> 16) & 0xFFFF) as u16
}

pub fn make_lparam(low: u16, high: u16) -> isize {
    ((u32::from(high) << 16) | u32::from(low)) as i32 as isize
}

/// Keystroke flags packed into the `LPARAM` of key messages
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyFlags(pub isize);

impl KeyFlags {
    pub fn scancode(self) -> u32 {
        ((self.0 >> 16) & 0xFF) as u32
    }

    /// Right-hand Ctrl/Alt, keypad Enter and the navigation cluster
    pub fn extended(self) -> bool {
        self.0 & (1 << 24) != 0
    }

    /// The key was down before this message
    pub fn previously_down(self) -> bool {
        self.0 & (1 << 30) != 0
    }

    pub fn with(scancode: u32, extended: bool, previously_down: bool) -> Self {
        let mut flags = 1 | ((scancode as isize & 0xFF) << 16);
        if extended {
            flags |= 1 << 24;
        }
        if previously_down {
            flags |= 1 << 30;
        }
        Self(flags)
    }
}

#[derive(Clone, Debug)]
pub enum WinEvent {
    Message(Msg),
    /// The connection switched the window's style to or from borderless
    /// fullscreen
    Fullscreen { hwnd: Hwnd, enabled: bool },
    /// `WM_CLIPBOARDUPDATE`, with the new content
    Clipboard { offer: Option<Arc<dyn DataOffer>> },
    /// `IDropTarget::DragEnter`, client coordinates
    DragEnter {
        hwnd: Hwnd,
        position: (i32, i32),
        offer: Arc<dyn DataOffer>,
    },
    DragOver { hwnd: Hwnd, position: (i32, i32) },
    DragLeave { hwnd: Hwnd },
    Drop { hwnd: Hwnd, position: (i32, i32) },
}

impl From<Msg> for WinEvent {
    fn from(msg: Msg) -> Self {
        WinEvent::Message(msg)
    }
}
