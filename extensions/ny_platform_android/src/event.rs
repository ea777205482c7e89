//! NDK input and `android_native_app_glue` command vocabulary

use std::sync::Arc;

use ny_core::DataOffer;

/// Window id handed out by the connection; stays stable across
/// `ANativeWindow` recreation
pub type WindowId = u64;

pub mod key_action {
    pub const DOWN: i32 = 0;
    pub const UP: i32 = 1;
    pub const MULTIPLE: i32 = 2;
}

pub mod motion_action {
    pub const MASK: i32 = 0xFF;
    pub const POINTER_INDEX_SHIFT: i32 = 8;

    pub const DOWN: i32 = 0;
    pub const UP: i32 = 1;
    pub const MOVE: i32 = 2;
    pub const CANCEL: i32 = 3;
    pub const POINTER_DOWN: i32 = 5;
    pub const POINTER_UP: i32 = 6;
    pub const HOVER_MOVE: i32 = 7;
    pub const SCROLL: i32 = 8;
    pub const HOVER_ENTER: i32 = 9;
    pub const HOVER_EXIT: i32 = 10;
    pub const BUTTON_PRESS: i32 = 11;
    pub const BUTTON_RELEASE: i32 = 12;
}

pub mod meta {
    pub const SHIFT_ON: i32 = 0x01;
    pub const ALT_ON: i32 = 0x02;
    pub const CTRL_ON: i32 = 0x1000;
    pub const META_ON: i32 = 0x10000;
    pub const CAPS_LOCK_ON: i32 = 0x100000;
    pub const NUM_LOCK_ON: i32 = 0x200000;
}

pub mod button_state {
    pub const PRIMARY: i32 = 1 << 0;
    pub const SECONDARY: i32 = 1 << 1;
    pub const TERTIARY: i32 = 1 << 2;
    pub const BACK: i32 = 1 << 3;
    pub const FORWARD: i32 = 1 << 4;
}

pub mod source {
    pub const TOUCHSCREEN: i32 = 0x1002;
    pub const MOUSE: i32 = 0x2002;
    pub const STYLUS: i32 = 0x4002;
}

/// One pointer of a motion event
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pointer {
    pub id: i32,
    pub x: f32,
    pub y: f32,
    /// `AXIS_HSCROLL`, positive to the right
    pub hscroll: f32,
    /// `AXIS_VSCROLL`, positive away from the user
    pub vscroll: f32,
}

impl Pointer {
    pub fn at(id: i32, x: f32, y: f32) -> Self {
        Self {
            id,
            x,
            y,
            ..Self::default()
        }
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x as i32, self.y as i32)
    }
}

/// Native fields of an `AKeyEvent`, attached to the key events it becomes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NativeKey {
    pub keycode: i32,
    pub meta_state: i32,
    pub repeat_count: i32,
}

/// `APP_CMD_*`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppCommand {
    InitWindow { width: u32, height: u32 },
    TermWindow,
    WindowResized { width: u32, height: u32 },
    RedrawNeeded,
    GainedFocus,
    LostFocus,
    ConfigChanged,
    LowMemory,
    Start,
    Resume,
    SaveState,
    Pause,
    Stop,
    Destroy,
}

#[derive(Clone, Debug)]
pub enum AndroidEvent {
    /// `AKeyEvent`
    Key {
        action: i32,
        keycode: i32,
        meta_state: i32,
        repeat_count: i32,
        /// `KeyEvent.getUnicodeChar()`, zero when the key has no text
        unicode: u32,
    },
    /// `AMotionEvent`
    Motion {
        source: i32,
        action: i32,
        button_state: i32,
        pointers: Vec<Pointer>,
    },
    Command(AppCommand),
    /// `ClipboardManager.OnPrimaryClipChangedListener`
    Clipboard { offer: Option<Arc<dyn DataOffer>> },
}

impl AndroidEvent {
    pub fn key(action: i32, keycode: i32, meta_state: i32) -> Self {
        AndroidEvent::Key {
            action,
            keycode,
            meta_state,
            repeat_count: 0,
            unicode: 0,
        }
    }

    pub fn touch(action: i32, pointers: Vec<Pointer>) -> Self {
        AndroidEvent::Motion {
            source: source::TOUCHSCREEN,
            action,
            button_state: 0,
            pointers,
        }
    }
}

impl From<AppCommand> for AndroidEvent {
    fn from(command: AppCommand) -> Self {
        AndroidEvent::Command(command)
    }
}
