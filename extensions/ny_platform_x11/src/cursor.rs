//! Cursor tables
//!
//! Xcursor themes are looked up by name first; the core cursor font glyph is
//! the fallback when no theme is installed.

use ny_platform::Cursor;

/// Xcursor theme name
pub fn cursor_name(cursor: Cursor) -> Option<&'static str> {
    let name = match cursor {
        Cursor::Default => "left_ptr",
        Cursor::Pointer => "hand2",
        Cursor::Text => "xterm",
        Cursor::Crosshair => "crosshair",
        Cursor::Move => "fleur",
        Cursor::NotAllowed => "crossed_circle",
        Cursor::ResizeNS => "sb_v_double_arrow",
        Cursor::ResizeEW => "sb_h_double_arrow",
        Cursor::ResizeNESW => "bottom_left_corner",
        Cursor::ResizeNWSE => "bottom_right_corner",
        Cursor::Grab => "hand1",
        Cursor::Grabbing => "fleur",
        Cursor::Wait => "watch",
        Cursor::Progress => "left_ptr_watch",
        Cursor::None => return None,
    };
    Some(name)
}

/// Glyph in the core `cursor` font (`XC_*`)
pub fn cursor_glyph(cursor: Cursor) -> Option<u16> {
    let glyph = match cursor {
        Cursor::Default | Cursor::Progress => 68,
        Cursor::Pointer => 60,
        Cursor::Text => 152,
        Cursor::Crosshair => 34,
        Cursor::Move | Cursor::Grabbing => 52,
        Cursor::NotAllowed => 0,
        Cursor::ResizeNS => 116,
        Cursor::ResizeEW => 108,
        Cursor::ResizeNESW => 12,
        Cursor::ResizeNWSE => 14,
        Cursor::Grab => 58,
        Cursor::Wait => 150,
        Cursor::None => return None,
    };
    Some(glyph)
}
