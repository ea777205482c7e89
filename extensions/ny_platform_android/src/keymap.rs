//! `AKEYCODE_*` table and meta state mapping

use ny_core::{KeyboardModifiers, Keycode, MouseButton};

use crate::event::{button_state, meta};

pub const AKEYCODE_BACK: i32 = 4;

pub fn keycode(code: i32) -> Keycode {
    use Keycode::*;
    match code {
        AKEYCODE_BACK => Back,
        7 => K0,
        8 => K1,
        9 => K2,
        10 => K3,
        11 => K4,
        12 => K5,
        13 => K6,
        14 => K7,
        15 => K8,
        16 => K9,
        19 => Up,
        20 => Down,
        21 => Left,
        22 => Right,
        24 => VolumeUp,
        25 => VolumeDown,
        29 => A,
        30 => B,
        31 => C,
        32 => D,
        33 => E,
        34 => F,
        35 => G,
        36 => H,
        37 => I,
        38 => J,
        39 => K,
        40 => L,
        41 => M,
        42 => N,
        43 => O,
        44 => P,
        45 => Q,
        46 => R,
        47 => S,
        48 => T,
        49 => U,
        50 => V,
        51 => W,
        52 => X,
        53 => Y,
        54 => Z,
        55 => Comma,
        56 => Period,
        57 => LeftAlt,
        58 => RightAlt,
        59 => LeftShift,
        60 => RightShift,
        61 => Tab,
        62 => Space,
        66 => Enter,
        67 => Backspace,
        68 => Grave,
        69 => Minus,
        70 => Equals,
        71 => LeftBracket,
        72 => RightBracket,
        73 => Backslash,
        74 => Semicolon,
        75 => Apostrophe,
        76 => Slash,
        82 => Menu,
        92 => PageUp,
        93 => PageDown,
        111 => Escape,
        112 => Delete,
        113 => LeftCtrl,
        114 => RightCtrl,
        115 => CapsLock,
        116 => ScrollLock,
        117 => LeftMeta,
        118 => RightMeta,
        120 => SysRq,
        121 => Pause,
        122 => Home,
        123 => End,
        124 => Insert,
        131 => F1,
        132 => F2,
        133 => F3,
        134 => F4,
        135 => F5,
        136 => F6,
        137 => F7,
        138 => F8,
        139 => F9,
        140 => F10,
        141 => F11,
        142 => F12,
        143 => NumLock,
        144 => Kp0,
        145 => Kp1,
        146 => Kp2,
        147 => Kp3,
        148 => Kp4,
        149 => Kp5,
        150 => Kp6,
        151 => Kp7,
        152 => Kp8,
        153 => Kp9,
        154 => KpDivide,
        155 => KpMultiply,
        156 => KpMinus,
        157 => KpPlus,
        158 => KpPeriod,
        160 => KpEnter,
        164 => Mute,
        _ => Unknown,
    }
}

/// Android meta state already reflects the event it comes with
pub fn modifiers(meta_state: i32) -> KeyboardModifiers {
    let mut modifiers = KeyboardModifiers::empty();
    modifiers.set(KeyboardModifiers::SHIFT, meta_state & meta::SHIFT_ON != 0);
    modifiers.set(KeyboardModifiers::CTRL, meta_state & meta::CTRL_ON != 0);
    modifiers.set(KeyboardModifiers::ALT, meta_state & meta::ALT_ON != 0);
    modifiers.set(KeyboardModifiers::SUPER, meta_state & meta::META_ON != 0);
    modifiers.set(KeyboardModifiers::CAPS_LOCK, meta_state & meta::CAPS_LOCK_ON != 0);
    modifiers.set(KeyboardModifiers::NUM_LOCK, meta_state & meta::NUM_LOCK_ON != 0);
    modifiers
}

pub const BUTTONS: [(i32, MouseButton); 5] = [
    (button_state::PRIMARY, MouseButton::Left),
    (button_state::SECONDARY, MouseButton::Right),
    (button_state::TERTIARY, MouseButton::Middle),
    (button_state::BACK, MouseButton::Custom1),
    (button_state::FORWARD, MouseButton::Custom2),
];

/// Buttons whose bit differs between two button states, with their new state
pub fn changed_buttons(before: i32, after: i32) -> impl Iterator<Item = (MouseButton, bool)> {
    BUTTONS
        .into_iter()
        .filter(move |(bit, _)| (before ^ after) & bit != 0)
        .map(move |(bit, button)| (button, after & bit != 0))
}

/// Text of `getUnicodeChar()`, without control characters
pub fn text(unicode: u32) -> Option<String> {
    char::from_u32(unicode)
        .filter(|c| !c.is_control() && *c != '\0')
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_table() {
        assert_eq!(keycode(AKEYCODE_BACK), Keycode::Back);
        assert_eq!(keycode(29), Keycode::A);
        assert_eq!(keycode(67), Keycode::Backspace);
        assert_eq!(keycode(160), Keycode::KpEnter);
        assert_eq!(keycode(-1), Keycode::Unknown);
    }

    #[test]
    fn test_meta_state() {
        assert_eq!(
            modifiers(meta::SHIFT_ON | 0x40 | meta::CAPS_LOCK_ON),
            KeyboardModifiers::SHIFT | KeyboardModifiers::CAPS_LOCK
        );
    }

    #[test]
    fn test_changed_buttons() {
        let changed: Vec<_> = changed_buttons(
            button_state::PRIMARY,
            button_state::SECONDARY,
        )
        .collect();
        assert_eq!(
            changed,
            vec![(MouseButton::Left, false), (MouseButton::Right, true)]
        );
    }

    #[test]
    fn test_unicode_text() {
        assert_eq!(text(u32::from('é')).as_deref(), Some("é"));
        assert_eq!(text(0), None);
        assert_eq!(text(0x0A), None);
        assert_eq!(text(0xD800), None);
    }
}
