//! Cursor theme names
//!
//! Themes following the cursor spec answer to the CSS names; older ones only
//! ship the X11 core names, so both are tried in order.

use ny_platform::Cursor;

pub fn cursor_names(cursor: Cursor) -> &'static [&'static str] {
    match cursor {
        Cursor::Default => &["default", "left_ptr"],
        Cursor::Pointer => &["pointer", "hand2"],
        Cursor::Text => &["text", "xterm"],
        Cursor::Crosshair => &["crosshair", "cross"],
        Cursor::Move => &["move", "fleur"],
        Cursor::NotAllowed => &["not-allowed", "crossed_circle"],
        Cursor::ResizeNS => &["ns-resize", "sb_v_double_arrow"],
        Cursor::ResizeEW => &["ew-resize", "sb_h_double_arrow"],
        Cursor::ResizeNESW => &["nesw-resize", "fd_double_arrow"],
        Cursor::ResizeNWSE => &["nwse-resize", "bd_double_arrow"],
        Cursor::Grab => &["grab", "openhand", "hand1"],
        Cursor::Grabbing => &["grabbing", "closedhand", "fleur"],
        Cursor::Wait => &["wait", "watch"],
        Cursor::Progress => &["progress", "left_ptr_watch"],
        Cursor::None => &[],
    }
}
