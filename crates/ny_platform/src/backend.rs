//! Backend registration and selection
//!
//! There is no global registry: the application builds a [`BackendRegistry`]
//! with the backends it links and asks it for an app context.

use std::fmt;

use crate::context::AppContext;
use crate::error::{PlatformError, Result};
use crate::native::{NativeAppContext, NativeConnection, Translator};
use crate::settings::PlatformConfig;

/// Environment variable naming the backend to prefer
pub const BACKEND_ENV: &str = "NY_BACKEND";

/// A windowing backend that can open app contexts
pub trait Backend: Send + Sync {
    /// Name matched against `NY_BACKEND` (case-insensitive)
    fn name(&self) -> &'static str;

    /// Higher wins when no backend is requested
    fn priority(&self) -> u32;

    /// Whether the backend can run in this environment
    fn available(&self) -> bool;

    fn create_app_context(&self, config: &PlatformConfig) -> Result<Box<dyn AppContext>>;
}

type Connector<C> = Box<dyn Fn(&PlatformConfig) -> Result<C> + Send + Sync>;

/// [`Backend`] opening a [`NativeAppContext`] over a connector
///
/// The connector opens the native connection (the display, the compositor
/// socket, the activity window). The translator is built from the open
/// connection so it can pick up per-connection ids such as interned atoms.
pub struct NativeBackend<C, T> {
    name: &'static str,
    priority: u32,
    probe: fn() -> bool,
    connect: Connector<C>,
    translator: fn(&C) -> T,
}

impl<C, T> NativeBackend<C, T>
where
    C: NativeConnection + 'static,
    T: Translator<Event = C::Event, Handle = C::Handle> + 'static,
{
    pub fn new<F>(
        name: &'static str,
        priority: u32,
        probe: fn() -> bool,
        translator: fn(&C) -> T,
        connect: F,
    ) -> Self
    where
        F: Fn(&PlatformConfig) -> Result<C> + Send + Sync + 'static,
    {
        Self {
            name,
            priority,
            probe,
            connect: Box::new(connect),
            translator,
        }
    }

    /// Open a typed app context, bypassing the registry
    pub fn connect(&self, config: &PlatformConfig) -> Result<NativeAppContext<C, T>> {
        let connection = (self.connect)(config)?;
        let translator = (self.translator)(&connection);
        Ok(NativeAppContext::new(self.name, connection, translator))
    }
}

impl<C, T> Backend for NativeBackend<C, T>
where
    C: NativeConnection + 'static,
    T: Translator<Event = C::Event, Handle = C::Handle> + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn priority(&self) -> u32 {
        self.priority
    }

    fn available(&self) -> bool {
        (self.probe)()
    }

    fn create_app_context(&self, config: &PlatformConfig) -> Result<Box<dyn AppContext>> {
        Ok(Box::new(self.connect(config)?))
    }
}

impl<C, T> fmt::Debug for NativeBackend<C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeBackend")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

/// The backends an application was built with
#[derive(Default)]
pub struct BackendRegistry {
    backends: Vec<Box<dyn Backend>>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, backend: impl Backend + 'static) -> &mut Self {
        tracing::debug!(backend = backend.name(), priority = backend.priority(), "registered backend");
        self.backends.push(Box::new(backend));
        self
    }

    pub fn with(mut self, backend: impl Backend + 'static) -> Self {
        self.register(backend);
        self
    }

    pub fn backends(&self) -> impl Iterator<Item = &dyn Backend> {
        self.backends.iter().map(|backend| backend.as_ref())
    }

    pub fn find(&self, name: &str) -> Option<&dyn Backend> {
        self.backends()
            .find(|backend| backend.name().eq_ignore_ascii_case(name))
    }

    /// Pick the requested backend if it is usable, else the available
    /// backend with the highest priority
    pub fn choose(&self, requested: Option<&str>) -> Result<&dyn Backend> {
        if let Some(name) = requested {
            match self.find(name) {
                Some(backend) if backend.available() => return Ok(backend),
                Some(_) => {
                    tracing::warn!(backend = name, "requested backend is not available, falling back")
                }
                None => tracing::warn!(backend = name, "requested backend is unknown, falling back"),
            }
        }

        // Earlier registrations win ties.
        let mut chosen: Option<&dyn Backend> = None;
        for backend in self.backends().filter(|backend| backend.available()) {
            if chosen.map_or(true, |best| backend.priority() > best.priority()) {
                chosen = Some(backend);
            }
        }
        chosen.ok_or(PlatformError::NoBackend)
    }

    /// Choose a backend for `config` and open an app context on it
    pub fn create_app_context(&self, config: &PlatformConfig) -> Result<Box<dyn AppContext>> {
        let backend = self.choose(config.backend.as_deref())?;
        tracing::info!(backend = backend.name(), "opening app context");
        backend.create_app_context(config)
    }
}

impl fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.backends().map(|backend| backend.name()))
            .finish()
    }
}
