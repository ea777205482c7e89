//! Portable input vocabulary
//!
//! Keycodes name physical keys. The discriminants follow the Linux input event
//! codes so backends that already speak evdev can map with a single lookup.

use bitflags::bitflags;

/// Physical key identifier, independent of the active keyboard layout
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum Keycode {
    #[default]
    None = 0,
    Escape = 1,
    K1 = 2,
    K2 = 3,
    K3 = 4,
    K4 = 5,
    K5 = 6,
    K6 = 7,
    K7 = 8,
    K8 = 9,
    K9 = 10,
    K0 = 11,
    Minus = 12,
    Equals = 13,
    Backspace = 14,
    Tab = 15,
    Q = 16,
    W = 17,
    E = 18,
    R = 19,
    T = 20,
    Y = 21,
    U = 22,
    I = 23,
    O = 24,
    P = 25,
    LeftBracket = 26,
    RightBracket = 27,
    Enter = 28,
    LeftCtrl = 29,
    A = 30,
    S = 31,
    D = 32,
    F = 33,
    G = 34,
    H = 35,
    J = 36,
    K = 37,
    L = 38,
    Semicolon = 39,
    Apostrophe = 40,
    Grave = 41,
    LeftShift = 42,
    Backslash = 43,
    Z = 44,
    X = 45,
    C = 46,
    V = 47,
    B = 48,
    N = 49,
    M = 50,
    Comma = 51,
    Period = 52,
    Slash = 53,
    RightShift = 54,
    KpMultiply = 55,
    LeftAlt = 56,
    Space = 57,
    CapsLock = 58,
    F1 = 59,
    F2 = 60,
    F3 = 61,
    F4 = 62,
    F5 = 63,
    F6 = 64,
    F7 = 65,
    F8 = 66,
    F9 = 67,
    F10 = 68,
    NumLock = 69,
    ScrollLock = 70,
    Kp7 = 71,
    Kp8 = 72,
    Kp9 = 73,
    KpMinus = 74,
    Kp4 = 75,
    Kp5 = 76,
    Kp6 = 77,
    KpPlus = 78,
    Kp1 = 79,
    Kp2 = 80,
    Kp3 = 81,
    Kp0 = 82,
    KpPeriod = 83,
    F11 = 87,
    F12 = 88,
    KpEnter = 96,
    RightCtrl = 97,
    KpDivide = 98,
    SysRq = 99,
    RightAlt = 100,
    Home = 102,
    Up = 103,
    PageUp = 104,
    Left = 105,
    Right = 106,
    End = 107,
    Down = 108,
    PageDown = 109,
    Insert = 110,
    Delete = 111,
    Mute = 113,
    VolumeDown = 114,
    VolumeUp = 115,
    Pause = 119,
    LeftMeta = 125,
    RightMeta = 126,
    Menu = 139,
    Back = 158,
    Unknown = u32::MAX,
}

impl Keycode {
    /// Look up the keycode for a Linux input event code
    pub const fn from_evdev(code: u32) -> Keycode {
        use Keycode::*;
        match code {
            0 => None,
            1 => Escape,
            2 => K1,
            3 => K2,
            4 => K3,
            5 => K4,
            6 => K5,
            7 => K6,
            8 => K7,
            9 => K8,
            10 => K9,
            11 => K0,
            12 => Minus,
            13 => Equals,
            14 => Backspace,
            15 => Tab,
            16 => Q,
            17 => W,
            18 => E,
            19 => R,
            20 => T,
            21 => Y,
            22 => U,
            23 => I,
            24 => O,
            25 => P,
            26 => LeftBracket,
            27 => RightBracket,
            28 => Enter,
            29 => LeftCtrl,
            30 => A,
            31 => S,
            32 => D,
            33 => F,
            34 => G,
            35 => H,
            36 => J,
            37 => K,
            38 => L,
            39 => Semicolon,
            40 => Apostrophe,
            41 => Grave,
            42 => LeftShift,
            43 => Backslash,
            44 => Z,
            45 => X,
            46 => C,
            47 => V,
            48 => B,
            49 => N,
            50 => M,
            51 => Comma,
            52 => Period,
            53 => Slash,
            54 => RightShift,
            55 => KpMultiply,
            56 => LeftAlt,
            57 => Space,
            58 => CapsLock,
            59 => F1,
            60 => F2,
            61 => F3,
            62 => F4,
            63 => F5,
            64 => F6,
            65 => F7,
            66 => F8,
            67 => F9,
            68 => F10,
            69 => NumLock,
            70 => ScrollLock,
            71 => Kp7,
            72 => Kp8,
            73 => Kp9,
            74 => KpMinus,
            75 => Kp4,
            76 => Kp5,
            77 => Kp6,
            78 => KpPlus,
            79 => Kp1,
            80 => Kp2,
            81 => Kp3,
            82 => Kp0,
            83 => KpPeriod,
            87 => F11,
            88 => F12,
            96 => KpEnter,
            97 => RightCtrl,
            98 => KpDivide,
            99 => SysRq,
            100 => RightAlt,
            102 => Home,
            103 => Up,
            104 => PageUp,
            105 => Left,
            106 => Right,
            107 => End,
            108 => Down,
            109 => PageDown,
            110 => Insert,
            111 => Delete,
            113 => Mute,
            114 => VolumeDown,
            115 => VolumeUp,
            119 => Pause,
            125 => LeftMeta,
            126 => RightMeta,
            139 => Menu,
            158 => Back,
            _ => Unknown,
        }
    }

    /// The Linux input event code for this key, if it has one
    pub const fn to_evdev(self) -> Option<u32> {
        match self {
            Keycode::Unknown => Option::None,
            other => Some(other as u32),
        }
    }

    /// The modifier this key toggles while held, if any
    pub const fn modifier(self) -> KeyboardModifiers {
        match self {
            Keycode::LeftShift | Keycode::RightShift => KeyboardModifiers::SHIFT,
            Keycode::LeftCtrl | Keycode::RightCtrl => KeyboardModifiers::CTRL,
            Keycode::LeftAlt | Keycode::RightAlt => KeyboardModifiers::ALT,
            Keycode::LeftMeta | Keycode::RightMeta => KeyboardModifiers::SUPER,
            _ => KeyboardModifiers::empty(),
        }
    }
}

bitflags! {
    /// Keyboard modifier state at the time of an input event
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct KeyboardModifiers: u16 {
        const SHIFT = 0b0000_0001;
        const CTRL = 0b0000_0010;
        const ALT = 0b0000_0100;
        const SUPER = 0b0000_1000;
        const CAPS_LOCK = 0b0001_0000;
        const NUM_LOCK = 0b0010_0000;
    }
}

/// Pointer buttons
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    /// Usually "back"
    Custom1,
    /// Usually "forward"
    Custom2,
    Unknown,
}

/// Window states a toplevel can be asked to enter
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ToplevelState {
    #[default]
    Normal,
    Maximized,
    Minimized,
    Fullscreen,
}
