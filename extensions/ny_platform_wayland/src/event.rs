//! Wayland listener vocabulary
//!
//! One variant per listener callback the connection forwards. Pointer and
//! keyboard events after `enter` carry no surface; the translator tracks
//! focus to address them.

use std::sync::Arc;

use ny_core::DataOffer;

/// `wl_surface` protocol object id
pub type SurfaceId = u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    VerticalScroll,
    HorizontalScroll,
}

/// `xdg_toplevel` states relevant to portable events
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum XdgState {
    Maximized,
    Fullscreen,
    Resizing,
    Activated,
}

#[derive(Clone, Debug)]
pub enum WaylandEvent {
    PointerEnter {
        surface: SurfaceId,
        x: f64,
        y: f64,
    },
    PointerLeave {
        surface: SurfaceId,
    },
    PointerMotion {
        x: f64,
        y: f64,
    },
    PointerButton {
        /// Linux input event code (`BTN_*`)
        button: u32,
        pressed: bool,
    },
    PointerAxis {
        axis: Axis,
        /// Surface-local distance
        value: f64,
    },
    PointerAxisDiscrete {
        axis: Axis,
        /// Wheel clicks
        discrete: i32,
    },
    /// End of a group of pointer events
    PointerFrame,

    KeyboardEnter {
        surface: SurfaceId,
        /// Keys already held, as evdev codes
        keys: Vec<u32>,
    },
    KeyboardLeave {
        surface: SurfaceId,
    },
    Key {
        /// Linux input event code
        key: u32,
        pressed: bool,
        /// Text from the xkb state, if the press produced any
        text: Option<String>,
    },
    /// `wl_keyboard.modifiers`, xkb masks
    Modifiers {
        depressed: u32,
        latched: u32,
        locked: u32,
    },

    XdgConfigure {
        surface: SurfaceId,
        /// Zero means the client picks
        width: i32,
        height: i32,
        states: Vec<XdgState>,
    },
    XdgClose {
        surface: SurfaceId,
    },
    /// `wl_surface.frame` callback done
    Frame {
        surface: SurfaceId,
    },

    /// `wl_data_device.selection`
    Selection {
        offer: Option<Arc<dyn DataOffer>>,
    },
    DndEnter {
        surface: SurfaceId,
        x: f64,
        y: f64,
        /// `None` when the source offered no known mime type
        offer: Option<Arc<dyn DataOffer>>,
    },
    DndMotion {
        x: f64,
        y: f64,
    },
    DndLeave,
    DndDrop,
}
