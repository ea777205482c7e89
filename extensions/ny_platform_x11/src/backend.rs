//! X11 backend registration

use ny_platform::{
    Capabilities, LoopbackConnection, NativeBackend, NativeConnection, PlatformConfig, Result,
};

use crate::event::{X11Atoms, X11Event, XWindow};
use crate::translate::X11Translator;

pub const NAME: &str = "x11";

/// Below Wayland: under XWayland both may be available
pub const PRIORITY: u32 = 10;

pub const VULKAN_EXTENSIONS: [&str; 2] = ["VK_KHR_surface", "VK_KHR_xcb_surface"];

/// A native connection speaking the X11 event vocabulary
pub trait X11Connection: NativeConnection<Event = X11Event, Handle = XWindow> {
    /// Atoms interned on this connection
    fn atoms(&self) -> X11Atoms;
}

/// Loopback connections use fixed atom ids
impl X11Connection for LoopbackConnection<X11Event, XWindow> {
    fn atoms(&self) -> X11Atoms {
        X11Atoms {
            wm_protocols: 1,
            wm_delete_window: 2,
            net_wm_ping: 3,
        }
    }
}

pub fn capabilities() -> Capabilities {
    Capabilities {
        keyboard: true,
        mouse: true,
        buffer: true,
        gl: true,
        vulkan: true,
    }
}

/// Whether an X display is configured for this process
pub fn display_available() -> bool {
    std::env::var_os("DISPLAY").is_some_and(|display| !display.is_empty())
}

pub type X11Backend<C> = NativeBackend<C, X11Translator>;

/// X11 backend over the connections `connect` opens
pub fn backend<C, F>(connect: F) -> X11Backend<C>
where
    C: X11Connection + 'static,
    F: Fn(&PlatformConfig) -> Result<C> + Send + Sync + 'static,
{
    NativeBackend::new(
        NAME,
        PRIORITY,
        display_available,
        |connection: &C| X11Translator::new(connection.atoms()),
        connect,
    )
}
