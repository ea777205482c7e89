//! Rendering surfaces attached to windows
//!
//! Rendering backends consume these descriptors; creating GL contexts or
//! Vulkan swapchains from them happens outside this crate.

use crate::settings::SurfaceType;

/// Pixel layout of a software buffer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BufferFormat {
    #[default]
    Bgra8,
    Rgba8,
    Xrgb8,
}

impl BufferFormat {
    pub const fn bytes_per_pixel(self) -> u32 {
        4
    }
}

/// Software-rendered buffer surface
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BufferSurface {
    pub format: BufferFormat,
    pub size: (u32, u32),
}

impl BufferSurface {
    /// Bytes per row
    pub fn stride(&self) -> u32 {
        self.size.0 * self.format.bytes_per_pixel()
    }
}

/// GL-capable native window
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlSurface {
    /// Backend-specific framebuffer config id
    pub config: u64,
    /// Native window the context will draw to
    pub native_window: u64,
}

/// Vulkan surface created for a window
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VulkanSurface {
    /// Raw `VkInstance` the surface belongs to
    pub instance: u64,
    /// Raw `VkSurfaceKHR`
    pub surface: u64,
}

/// Which rendering integration a window carries
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Surface {
    #[default]
    None,
    Buffer(BufferSurface),
    Gl(GlSurface),
    Vulkan(VulkanSurface),
}

impl Surface {
    pub fn surface_type(&self) -> SurfaceType {
        match self {
            Surface::None => SurfaceType::None,
            Surface::Buffer(_) => SurfaceType::Buffer,
            Surface::Gl(_) => SurfaceType::Gl,
            Surface::Vulkan(_) => SurfaceType::Vulkan,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_type_tags() {
        assert_eq!(Surface::None.surface_type(), SurfaceType::None);
        let buffer = Surface::Buffer(BufferSurface {
            format: BufferFormat::Rgba8,
            size: (10, 2),
        });
        assert_eq!(buffer.surface_type(), SurfaceType::Buffer);
        if let Surface::Buffer(buffer) = buffer {
            assert_eq!(buffer.stride(), 40);
        }
    }
}
