//! X11 native event vocabulary
//!
//! Mirrors the xcb event structs the connection reads, reduced to the fields
//! translation needs. Coordinates are window-relative unless noted.

use std::sync::Arc;

use ny_core::DataOffer;

/// `xcb_window_t`
pub type XWindow = u32;

/// `xcb_atom_t`
pub type Atom = u32;

/// Key and button state mask bits (`xcb_mod_mask_t`)
pub mod mask {
    pub const SHIFT: u16 = 1 << 0;
    pub const LOCK: u16 = 1 << 1;
    pub const CONTROL: u16 = 1 << 2;
    /// Alt on every common layout
    pub const MOD1: u16 = 1 << 3;
    /// Num lock on every common layout
    pub const MOD2: u16 = 1 << 4;
    /// Super on every common layout
    pub const MOD4: u16 = 1 << 6;
}

/// Atoms interned when the connection was opened
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct X11Atoms {
    pub wm_protocols: Atom,
    pub wm_delete_window: Atom,
    pub net_wm_ping: Atom,
}

#[derive(Clone, Debug)]
pub enum X11Event {
    KeyPress {
        window: XWindow,
        /// X keycode (evdev code + 8)
        detail: u8,
        state: u16,
        /// Text from the input method, if the press produced any
        text: Option<String>,
    },
    KeyRelease {
        window: XWindow,
        detail: u8,
        state: u16,
    },
    ButtonPress {
        window: XWindow,
        detail: u8,
        x: i16,
        y: i16,
        state: u16,
    },
    ButtonRelease {
        window: XWindow,
        detail: u8,
        x: i16,
        y: i16,
        state: u16,
    },
    MotionNotify {
        window: XWindow,
        x: i16,
        y: i16,
        state: u16,
    },
    EnterNotify {
        window: XWindow,
        x: i16,
        y: i16,
    },
    LeaveNotify {
        window: XWindow,
        x: i16,
        y: i16,
    },
    FocusIn {
        window: XWindow,
    },
    FocusOut {
        window: XWindow,
    },
    Expose {
        window: XWindow,
        /// Number of expose events still following this one
        count: u16,
    },
    ConfigureNotify {
        window: XWindow,
        x: i16,
        y: i16,
        width: u16,
        height: u16,
    },
    MapNotify {
        window: XWindow,
    },
    UnmapNotify {
        window: XWindow,
    },
    DestroyNotify {
        window: XWindow,
    },
    ReparentNotify {
        window: XWindow,
        parent: XWindow,
    },
    ClientMessage {
        window: XWindow,
        message_type: Atom,
        data: [u32; 5],
    },
    /// `_NET_WM_STATE` after a `PropertyNotify`, already read by the connection
    NetWmState {
        window: XWindow,
        maximized_horz: bool,
        maximized_vert: bool,
        fullscreen: bool,
        hidden: bool,
    },
    /// `CLIPBOARD` owner changed (XFixes selection notify)
    SelectionOwner {
        offer: Option<Arc<dyn DataOffer>>,
    },
    XdndEnter {
        window: XWindow,
        offer: Arc<dyn DataOffer>,
    },
    XdndPosition {
        window: XWindow,
        x: i16,
        y: i16,
    },
    XdndLeave {
        window: XWindow,
    },
    XdndDrop {
        window: XWindow,
    },
}
