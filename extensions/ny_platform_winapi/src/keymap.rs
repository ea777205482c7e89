//! Virtual key table and text decoding

use ny_core::{KeyboardModifiers, Keycode};

use crate::event::KeyFlags;

pub const VK_SHIFT: u32 = 0x10;
pub const VK_CONTROL: u32 = 0x11;
pub const VK_MENU: u32 = 0x12;
pub const VK_RETURN: u32 = 0x0D;

/// Set-1 scancode of the right shift key; both shifts share `VK_SHIFT`
const SCANCODE_RIGHT_SHIFT: u32 = 0x36;

/// Map a virtual key to a physical keycode
///
/// Keys sharing a virtual key code across both hands are told apart by the
/// extended flag, or for shift by the scancode.
pub fn keycode(vk: u32, flags: KeyFlags) -> Keycode {
    use Keycode::*;
    match vk {
        VK_SHIFT if flags.scancode() == SCANCODE_RIGHT_SHIFT => RightShift,
        VK_SHIFT => LeftShift,
        VK_CONTROL if flags.extended() => RightCtrl,
        VK_CONTROL => LeftCtrl,
        VK_MENU if flags.extended() => RightAlt,
        VK_MENU => LeftAlt,
        VK_RETURN if flags.extended() => KpEnter,
        VK_RETURN => Enter,
        0x08 => Backspace,
        0x09 => Tab,
        0x13 => Pause,
        0x14 => CapsLock,
        0x1B => Escape,
        0x20 => Space,
        0x21 => PageUp,
        0x22 => PageDown,
        0x23 => End,
        0x24 => Home,
        0x25 => Left,
        0x26 => Up,
        0x27 => Right,
        0x28 => Down,
        0x2C => SysRq,
        0x2D => Insert,
        0x2E => Delete,
        0x30 => K0,
        0x31 => K1,
        0x32 => K2,
        0x33 => K3,
        0x34 => K4,
        0x35 => K5,
        0x36 => K6,
        0x37 => K7,
        0x38 => K8,
        0x39 => K9,
        0x41 => A,
        0x42 => B,
        0x43 => C,
        0x44 => D,
        0x45 => E,
        0x46 => F,
        0x47 => G,
        0x48 => H,
        0x49 => I,
        0x4A => J,
        0x4B => K,
        0x4C => L,
        0x4D => M,
        0x4E => N,
        0x4F => O,
        0x50 => P,
        0x51 => Q,
        0x52 => R,
        0x53 => S,
        0x54 => T,
        0x55 => U,
        0x56 => V,
        0x57 => W,
        0x58 => X,
        0x59 => Y,
        0x5A => Z,
        0x5B => LeftMeta,
        0x5C => RightMeta,
        0x5D => Menu,
        0x60 => Kp0,
        0x61 => Kp1,
        0x62 => Kp2,
        0x63 => Kp3,
        0x64 => Kp4,
        0x65 => Kp5,
        0x66 => Kp6,
        0x67 => Kp7,
        0x68 => Kp8,
        0x69 => Kp9,
        0x6A => KpMultiply,
        0x6B => KpPlus,
        0x6D => KpMinus,
        0x6E => KpPeriod,
        0x6F => KpDivide,
        0x70 => F1,
        0x71 => F2,
        0x72 => F3,
        0x73 => F4,
        0x74 => F5,
        0x75 => F6,
        0x76 => F7,
        0x77 => F8,
        0x78 => F9,
        0x79 => F10,
        0x7A => F11,
        0x7B => F12,
        0x90 => NumLock,
        0x91 => ScrollLock,
        0xA0 => LeftShift,
        0xA1 => RightShift,
        0xA2 => LeftCtrl,
        0xA3 => RightCtrl,
        0xA4 => LeftAlt,
        0xA5 => RightAlt,
        0xAD => Mute,
        0xAE => VolumeDown,
        0xAF => VolumeUp,
        0xBA => Semicolon,
        0xBB => Equals,
        0xBC => Comma,
        0xBD => Minus,
        0xBE => Period,
        0xBF => Slash,
        0xC0 => Grave,
        0xDB => LeftBracket,
        0xDC => Backslash,
        0xDD => RightBracket,
        0xDE => Apostrophe,
        _ => Unknown,
    }
}

/// Layout-dependent text production (`ToUnicode`)
pub trait KeyboardLayout: Send {
    /// UTF-16 text the key produces under `modifiers`, empty for dead keys
    /// and keys without text
    fn to_unicode(&mut self, vk: u32, scancode: u32, modifiers: KeyboardModifiers) -> Vec<u16>;
}

/// Decode `ToUnicode` output, dropping control characters
pub fn decode_text(units: &[u16]) -> Option<String> {
    let text: String = char::decode_utf16(units.iter().copied())
        .map(|unit| unit.unwrap_or(char::REPLACEMENT_CHARACTER))
        .filter(|c| !c.is_control())
        .collect();
    (!text.is_empty()).then_some(text)
}

/// `VK_OEM_*` punctuation on a US layout: (vk, plain, shifted)
const OEM_KEYS: [(u32, char, char); 11] = [
    (0xBA, ';', ':'),
    (0xBB, '=', '+'),
    (0xBC, ',', '<'),
    (0xBD, '-', '_'),
    (0xBE, '.', '>'),
    (0xBF, '/', '?'),
    (0xC0, '`', '~'),
    (0xDB, '[', '{'),
    (0xDC, '\\', '|'),
    (0xDD, ']', '}'),
    (0xDE, '\'', '"'),
];

/// US layout for the printable keys of the main block
#[derive(Clone, Copy, Debug, Default)]
pub struct UsLayout;

impl KeyboardLayout for UsLayout {
    fn to_unicode(&mut self, vk: u32, _scancode: u32, modifiers: KeyboardModifiers) -> Vec<u16> {
        let shift = modifiers.contains(KeyboardModifiers::SHIFT);
        let caps = modifiers.contains(KeyboardModifiers::CAPS_LOCK);
        if modifiers.intersects(KeyboardModifiers::CTRL | KeyboardModifiers::ALT) {
            return Vec::new();
        }
        let c = match vk {
            0x41..=0x5A => {
                let upper = char::from(vk as u8);
                if shift != caps {
                    upper
                } else {
                    upper.to_ascii_lowercase()
                }
            }
            0x30..=0x39 if shift => char::from(b")!@#$%^&*("[vk as usize - 0x30]),
            0x30..=0x39 => char::from(vk as u8),
            0x20 => ' ',
            0x0D => '\r',
            _ => match OEM_KEYS.iter().find(|(key, ..)| *key == vk) {
                Some(&(_, _, shifted)) if shift => shifted,
                Some(&(_, plain, _)) => plain,
                None => return Vec::new(),
            },
        };
        let mut buf = [0; 2];
        c.encode_utf16(&mut buf).to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sided_keys() {
        let left = KeyFlags::with(0x2A, false, false);
        let right = KeyFlags::with(SCANCODE_RIGHT_SHIFT, false, false);
        assert_eq!(keycode(VK_SHIFT, left), Keycode::LeftShift);
        assert_eq!(keycode(VK_SHIFT, right), Keycode::RightShift);
        assert_eq!(keycode(VK_CONTROL, KeyFlags::with(0x1D, true, false)), Keycode::RightCtrl);
        assert_eq!(keycode(VK_RETURN, KeyFlags::with(0x1C, true, false)), Keycode::KpEnter);
        assert_eq!(keycode(0xFF, left), Keycode::Unknown);
    }

    #[test]
    fn test_surrogate_pairs_decode() {
        assert_eq!(decode_text(&[0xD83D, 0xDE00]).as_deref(), Some("\u{1F600}"));
        assert_eq!(decode_text(&[0xD83D]).as_deref(), Some("\u{FFFD}"));
        assert_eq!(decode_text(&[0x0D]), None);
        assert_eq!(decode_text(&[]), None);
    }

    #[test]
    fn test_us_layout() {
        let mut layout = UsLayout;
        let text = |layout: &mut UsLayout, vk, modifiers| {
            decode_text(&layout.to_unicode(vk, 0, modifiers))
        };
        assert_eq!(text(&mut layout, 0x41, KeyboardModifiers::empty()).as_deref(), Some("a"));
        assert_eq!(text(&mut layout, 0x41, KeyboardModifiers::SHIFT).as_deref(), Some("A"));
        assert_eq!(
            text(&mut layout, 0x41, KeyboardModifiers::SHIFT | KeyboardModifiers::CAPS_LOCK)
                .as_deref(),
            Some("a")
        );
        assert_eq!(text(&mut layout, 0x32, KeyboardModifiers::SHIFT).as_deref(), Some("@"));
        assert_eq!(text(&mut layout, 0x43, KeyboardModifiers::CTRL), None);
    }

    #[test]
    fn test_us_layout_punctuation() {
        let mut layout = UsLayout;
        let mut text = |vk, modifiers| decode_text(&layout.to_unicode(vk, 0, modifiers));
        assert_eq!(text(0xBA, KeyboardModifiers::empty()).as_deref(), Some(";"));
        assert_eq!(text(0xBA, KeyboardModifiers::SHIFT).as_deref(), Some(":"));
        assert_eq!(text(0xDC, KeyboardModifiers::empty()).as_deref(), Some("\\"));
        assert_eq!(text(0xDE, KeyboardModifiers::SHIFT).as_deref(), Some("\""));
        assert_eq!(text(0xDF, KeyboardModifiers::empty()), None);
    }
}
