//! Cursor vocabulary
//!
//! Backends map these onto their native cursor names or ids.

use serde::{Deserialize, Serialize};

/// Pointer cursor shapes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cursor {
    /// Platform default arrow
    #[default]
    Default,
    /// Hand, for links and clickable items
    Pointer,
    Text,
    Crosshair,
    Move,
    NotAllowed,
    #[serde(rename = "resize-ns")]
    ResizeNS,
    #[serde(rename = "resize-ew")]
    ResizeEW,
    #[serde(rename = "resize-nesw")]
    ResizeNESW,
    #[serde(rename = "resize-nwse")]
    ResizeNWSE,
    Grab,
    Grabbing,
    Wait,
    Progress,
    /// Hidden cursor
    None,
}

impl Cursor {
    /// CSS / freedesktop cursor-spec name, shared by Wayland cursor themes and Xcursor
    pub fn css_name(self) -> Option<&'static str> {
        let name = match self {
            Cursor::Default => "default",
            Cursor::Pointer => "pointer",
            Cursor::Text => "text",
            Cursor::Crosshair => "crosshair",
            Cursor::Move => "move",
            Cursor::NotAllowed => "not-allowed",
            Cursor::ResizeNS => "ns-resize",
            Cursor::ResizeEW => "ew-resize",
            Cursor::ResizeNESW => "nesw-resize",
            Cursor::ResizeNWSE => "nwse-resize",
            Cursor::Grab => "grab",
            Cursor::Grabbing => "grabbing",
            Cursor::Wait => "wait",
            Cursor::Progress => "progress",
            Cursor::None => return None,
        };
        Some(name)
    }
}
