//! Android backend registration

use ny_platform::{Capabilities, NativeBackend, NativeConnection, PlatformConfig, Result};

use crate::event::{AndroidEvent, WindowId};
use crate::translate::AndroidTranslator;

pub const NAME: &str = "android";

pub const PRIORITY: u32 = 30;

pub const VULKAN_EXTENSIONS: [&str; 2] = ["VK_KHR_surface", "VK_KHR_android_surface"];

/// Touch-only devices report no keyboard
pub fn capabilities(keyboard: bool) -> Capabilities {
    Capabilities {
        keyboard,
        mouse: true,
        buffer: true,
        gl: true,
        vulkan: true,
    }
}

pub fn platform_available() -> bool {
    cfg!(target_os = "android")
}

pub type AndroidBackend<C> = NativeBackend<C, AndroidTranslator>;

/// Android backend over the connections `connect` opens
pub fn backend<C, F>(connect: F) -> AndroidBackend<C>
where
    C: NativeConnection<Event = AndroidEvent, Handle = WindowId> + 'static,
    F: Fn(&PlatformConfig) -> Result<C> + Send + Sync + 'static,
{
    NativeBackend::new(
        NAME,
        PRIORITY,
        platform_available,
        |_: &C| AndroidTranslator::default(),
        connect,
    )
}
