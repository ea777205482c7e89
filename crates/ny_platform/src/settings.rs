//! Window settings and platform configuration
//!
//! Both load from TOML. Members that only make sense at runtime (the initial
//! handler, a Vulkan instance handle) are skipped by serde and set in code.

use std::path::Path;

use ny_core::{DataType, DataTypes, HandlerRef, ToplevelState};
use serde::{Deserialize, Deserializer, Serialize};

use crate::backend::BACKEND_ENV;
use crate::cursor::Cursor;
use crate::error::{PlatformError, Result};

/// Which rendering integration a new window should carry
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceType {
    #[default]
    None,
    Buffer,
    Gl,
    Vulkan,
}

/// Vulkan surface options
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct VulkanSettings {
    /// Raw `VkInstance` the surface is created for
    #[serde(skip)]
    pub instance: Option<u64>,
}

/// GL surface options
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct GlSettings {
    #[serde(default = "default_true")]
    pub vsync: bool,
    /// Requested config id; `None` lets the backend choose
    #[serde(default)]
    pub config: Option<u64>,
}

impl Default for GlSettings {
    fn default() -> Self {
        Self {
            vsync: true,
            config: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_title() -> String {
    "ny window".to_string()
}

fn default_size() -> (u32, u32) {
    (800, 500)
}

fn deserialize_data_types<'de, D>(deserializer: D) -> std::result::Result<DataTypes, D::Error>
where
    D: Deserializer<'de>,
{
    let names = Vec::<String>::deserialize(deserializer)?;
    names
        .iter()
        .map(|name| {
            DataType::from_mime_type(name)
                .ok_or_else(|| serde::de::Error::custom(format!("unknown data type {name:?}")))
        })
        .collect()
}

/// Everything `create_window_context` needs to know
#[derive(Clone, Debug, Deserialize)]
pub struct WindowSettings {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_size")]
    pub size: (u32, u32),
    /// `None` lets the window manager place the window
    #[serde(default)]
    pub position: Option<(i32, i32)>,
    #[serde(default)]
    pub min_size: Option<(u32, u32)>,
    #[serde(default)]
    pub max_size: Option<(u32, u32)>,
    #[serde(default)]
    pub state: ToplevelStateSetting,
    #[serde(default = "default_true")]
    pub show: bool,
    #[serde(default = "default_true")]
    pub decorations: bool,
    #[serde(default)]
    pub transparent: bool,
    #[serde(default)]
    pub cursor: Cursor,
    #[serde(default)]
    pub surface: SurfaceType,
    #[serde(default)]
    pub gl: GlSettings,
    #[serde(default)]
    pub vulkan: VulkanSettings,
    /// Mime types accepted by drag and drop
    #[serde(default, deserialize_with = "deserialize_data_types")]
    pub droppable: DataTypes,
    /// Initial event handler
    #[serde(skip)]
    pub handler: Option<HandlerRef>,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: default_title(),
            size: default_size(),
            position: None,
            min_size: None,
            max_size: None,
            state: ToplevelStateSetting::default(),
            show: true,
            decorations: true,
            transparent: false,
            cursor: Cursor::default(),
            surface: SurfaceType::None,
            gl: GlSettings::default(),
            vulkan: VulkanSettings::default(),
            droppable: DataTypes::new(),
            handler: None,
        }
    }
}

impl WindowSettings {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    pub fn with_surface(mut self, surface: SurfaceType) -> Self {
        self.surface = surface;
        self
    }

    pub fn with_handler(mut self, handler: HandlerRef) -> Self {
        self.handler = Some(handler);
        self
    }

    pub fn initial_state(&self) -> ToplevelState {
        self.state.0
    }
}

/// TOML-facing wrapper for [`ToplevelState`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ToplevelStateSetting(pub ToplevelState);

impl<'de> Deserialize<'de> for ToplevelStateSetting {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        let state = match name.as_str() {
            "normal" => ToplevelState::Normal,
            "maximized" => ToplevelState::Maximized,
            "minimized" => ToplevelState::Minimized,
            "fullscreen" => ToplevelState::Fullscreen,
            other => {
                return Err(serde::de::Error::unknown_variant(
                    other,
                    &["normal", "maximized", "minimized", "fullscreen"],
                ))
            }
        };
        Ok(Self(state))
    }
}

/// Top-level platform configuration (ny.toml)
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PlatformConfig {
    /// Backend name to prefer over the priority order
    #[serde(default)]
    pub backend: Option<String>,
    /// Defaults for windows created without explicit settings
    #[serde(default)]
    pub window: WindowSettings,
}

impl PlatformConfig {
    /// Parse a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| PlatformError::Config(e.to_string()))
    }

    /// Load a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| PlatformError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&source)
    }

    /// Configuration from the environment alone
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Let `NY_BACKEND` override the configured backend
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(name) = std::env::var(BACKEND_ENV) {
            let name = name.trim();
            if !name.is_empty() {
                self.backend = Some(name.to_string());
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = WindowSettings::default();
        assert_eq!(settings.size, (800, 500));
        assert_eq!(settings.surface, SurfaceType::None);
        assert!(settings.show);
        assert!(settings.handler.is_none());
    }

    #[test]
    fn test_parse_config() {
        let config = PlatformConfig::from_toml_str(
            r#"
            backend = "wayland"

            [window]
            title = "editor"
            size = [1024, 768]
            state = "maximized"
            surface = "vulkan"
            cursor = "text"
            droppable = ["text/plain", "text/uri-list"]
            "#,
        )
        .expect("valid config");

        assert_eq!(config.backend.as_deref(), Some("wayland"));
        assert_eq!(config.window.title, "editor");
        assert_eq!(config.window.size, (1024, 768));
        assert_eq!(config.window.initial_state(), ToplevelState::Maximized);
        assert_eq!(config.window.surface, SurfaceType::Vulkan);
        assert_eq!(config.window.cursor, Cursor::Text);
        assert!(config.window.droppable.contains(DataType::FILE_PATHS));
        assert!(config.window.vulkan.instance.is_none());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = PlatformConfig::from_toml_str("").expect("empty config");
        assert!(config.backend.is_none());
        assert_eq!(config.window.title, "ny window");
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let err = PlatformConfig::from_toml_str("[window]\nstate = \"floating\"")
            .expect_err("unknown state");
        assert!(matches!(err, PlatformError::Config(_)));

        let err = PlatformConfig::from_toml_str("[window]\ndroppable = [\"foo/bar\"]")
            .expect_err("unknown data type");
        assert!(matches!(err, PlatformError::Config(_)));
    }
}
