//! Stock cursor ids for `LoadCursorW`

use ny_platform::Cursor;

pub const IDC_ARROW: u16 = 32512;
pub const IDC_IBEAM: u16 = 32513;
pub const IDC_WAIT: u16 = 32514;
pub const IDC_CROSS: u16 = 32515;
pub const IDC_SIZENWSE: u16 = 32642;
pub const IDC_SIZENESW: u16 = 32643;
pub const IDC_SIZEWE: u16 = 32644;
pub const IDC_SIZENS: u16 = 32645;
pub const IDC_SIZEALL: u16 = 32646;
pub const IDC_NO: u16 = 32648;
pub const IDC_HAND: u16 = 32649;
pub const IDC_APPSTARTING: u16 = 32650;

/// `None` hides the cursor
pub fn cursor_id(cursor: Cursor) -> Option<u16> {
    let id = match cursor {
        Cursor::Default => IDC_ARROW,
        Cursor::Pointer | Cursor::Grab => IDC_HAND,
        Cursor::Text => IDC_IBEAM,
        Cursor::Crosshair => IDC_CROSS,
        Cursor::Move | Cursor::Grabbing => IDC_SIZEALL,
        Cursor::NotAllowed => IDC_NO,
        Cursor::ResizeNS => IDC_SIZENS,
        Cursor::ResizeEW => IDC_SIZEWE,
        Cursor::ResizeNESW => IDC_SIZENESW,
        Cursor::ResizeNWSE => IDC_SIZENWSE,
        Cursor::Wait => IDC_WAIT,
        Cursor::Progress => IDC_APPSTARTING,
        Cursor::None => return None,
    };
    Some(id)
}
