//! Windows backend registration

use ny_platform::{
    Capabilities, LoopbackConnection, NativeBackend, NativeConnection, PlatformConfig, Result,
};

use crate::event::{Hwnd, WinEvent};
use crate::keymap::{KeyboardLayout, UsLayout};
use crate::translate::WinapiTranslator;

pub const NAME: &str = "winapi";

/// The only windowing system on its platform
pub const PRIORITY: u32 = 30;

pub const VULKAN_EXTENSIONS: [&str; 2] = ["VK_KHR_surface", "VK_KHR_win32_surface"];

/// A native connection delivering window messages
pub trait WinapiConnection: NativeConnection<Event = WinEvent, Handle = Hwnd> {
    /// Layout used for `ToUnicode` on this thread
    fn keyboard_layout(&self) -> Box<dyn KeyboardLayout>;
}

impl WinapiConnection for LoopbackConnection<WinEvent, Hwnd> {
    fn keyboard_layout(&self) -> Box<dyn KeyboardLayout> {
        Box::new(UsLayout)
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

pub fn platform_available() -> bool {
    cfg!(windows)
}

pub type WinapiBackend<C> = NativeBackend<C, WinapiTranslator>;

/// Windows backend over the connections `connect` opens
pub fn backend<C, F>(connect: F) -> WinapiBackend<C>
where
    C: WinapiConnection + 'static,
    F: Fn(&PlatformConfig) -> Result<C> + Send + Sync + 'static,
{
    NativeBackend::new(
        NAME,
        PRIORITY,
        platform_available,
        |connection: &C| WinapiTranslator::new(connection.keyboard_layout()),
        connect,
    )
}
