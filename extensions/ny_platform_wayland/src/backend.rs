//! Wayland backend registration

use ny_platform::{Capabilities, NativeBackend, NativeConnection, PlatformConfig, Result};

use crate::event::{SurfaceId, WaylandEvent};
use crate::translate::WaylandTranslator;

pub const NAME: &str = "wayland";

pub const PRIORITY: u32 = 20;

pub const VULKAN_EXTENSIONS: [&str; 2] = ["VK_KHR_surface", "VK_KHR_wayland_surface"];

pub fn capabilities() -> Capabilities {
    Capabilities {
        keyboard: true,
        mouse: true,
        buffer: true,
        gl: true,
        vulkan: true,
    }
}

/// Whether a compositor socket is configured for this process
pub fn display_available() -> bool {
    std::env::var_os("WAYLAND_DISPLAY").is_some_and(|display| !display.is_empty())
}

pub type WaylandBackend<C> = NativeBackend<C, WaylandTranslator>;

/// Wayland backend over the connections `connect` opens
pub fn backend<C, F>(connect: F) -> WaylandBackend<C>
where
    C: NativeConnection<Event = WaylandEvent, Handle = SurfaceId> + 'static,
    F: Fn(&PlatformConfig) -> Result<C> + Send + Sync + 'static,
{
    NativeBackend::new(
        NAME,
        PRIORITY,
        display_available,
        |_: &C| WaylandTranslator::default(),
        connect,
    )
}
