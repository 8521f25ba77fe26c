/// Galaxy3D Engine - global configuration and logging hub
///
/// The camera core itself is single-threaded and keeps no global state.
/// The engine singleton only carries what the core reads from its
/// environment: the render target extent (default viewport) and the
/// logger. It uses thread-safe static storage with RwLock.

use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;
use crate::config::EngineConfig;
use crate::error::{Result, Error};
use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
use crate::viewport::Viewport;

// ===== INTERNAL STATE =====

/// Global engine state storage
static ENGINE_STATE: OnceLock<EngineState> = OnceLock::new();

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

/// Internal state structure holding the engine configuration
struct EngineState {
    config: RwLock<EngineConfig>,
}

impl EngineState {
    fn new() -> Self {
        Self {
            config: RwLock::new(EngineConfig::default()),
        }
    }
}

// ===== PUBLIC API =====

/// Main engine singleton manager
///
/// # Example
///
/// ```no_run
/// use galaxy_3d_camera::galaxy3d::Engine;
///
/// Engine::initialize()?;
/// Engine::set_render_target_extent(1920, 1080)?;
///
/// // Cameras now project onto a 1920x1080 viewport when none is given
/// let viewport = Engine::default_viewport();
/// assert_eq!(viewport.width, 1920.0);
///
/// Engine::shutdown();
/// # Ok::<(), galaxy_3d_camera::galaxy3d::Error>(())
/// ```
pub struct Engine;

impl Engine {
    /// Helper to log errors before returning them (internal use)
    ///
    /// Must never be called while the config lock is held: logging reads it.
    fn log_and_return_error(error: Error) -> Error {
        match &error {
            Error::InitializationFailed(msg) => {
                crate::engine_error!("galaxy3d::Engine", "Initialization failed: {}", msg);
            }
            Error::LockPoisoned(msg) => {
                crate::engine_error!("galaxy3d::Engine", "Lock poisoned: {}", msg);
            }
            _ => {
                crate::engine_error!("galaxy3d::Engine", "Engine error: {}", error);
            }
        }
        error
    }

    fn state() -> Result<&'static EngineState> {
        ENGINE_STATE.get().ok_or_else(|| Self::log_and_return_error(
            Error::InitializationFailed("Engine not initialized. Call Engine::initialize() first.".to_string())
        ))
    }

    /// Initialize the engine with the default configuration
    ///
    /// Idempotent: calling it again keeps the current configuration.
    pub fn initialize() -> Result<()> {
        ENGINE_STATE.get_or_init(EngineState::new);
        crate::engine_info!("galaxy3d::Engine", "Engine initialized");
        Ok(())
    }

    /// Restore the default configuration
    ///
    /// The static storage cannot be torn down, so shutdown resets the
    /// configuration; `initialize()` is still required before `configure()`.
    pub fn shutdown() {
        if let Some(state) = ENGINE_STATE.get() {
            if let Ok(mut config) = state.config.write() {
                *config = EngineConfig::default();
            }
        }
    }

    // ===== CONFIGURATION API =====

    /// Replace the whole configuration
    ///
    /// # Errors
    ///
    /// - `InvalidParameter` if the render target extent is zero
    /// - `InitializationFailed` if the engine is not initialized
    /// - `LockPoisoned` if the config lock is poisoned
    pub fn configure(config: EngineConfig) -> Result<()> {
        if let Err(reason) = config.validate() {
            return Err(crate::engine_err!("galaxy3d::Engine", "{}", reason));
        }

        let state = Self::state()?;
        {
            let mut lock = state.config.write()
                .map_err(|_| Error::LockPoisoned("EngineConfig".to_string()))
                .map_err(Self::log_and_return_error)?;
            *lock = config;
        }

        crate::engine_debug!("galaxy3d::Engine", "Configuration updated");
        Ok(())
    }

    /// Current configuration (defaults if the engine is not initialized)
    pub fn config() -> EngineConfig {
        ENGINE_STATE.get()
            .and_then(|state| state.config.read().ok().map(|config| config.clone()))
            .unwrap_or_default()
    }

    /// Resize the active render target
    ///
    /// Call this whenever the window/swapchain is resized so that cameras
    /// used without an explicit viewport map onto the right pixel extent.
    pub fn set_render_target_extent(width: u32, height: u32) -> Result<()> {
        let mut config = Self::config();
        config.render_target_width = width;
        config.render_target_height = height;
        Self::configure(config)
    }

    /// Viewport covering the full active render target
    pub fn default_viewport() -> Viewport {
        Self::config().full_viewport()
    }

    /// Reset configuration for testing (only available in test builds)
    #[cfg(test)]
    pub fn reset_for_testing() {
        Self::shutdown();
        Self::reset_logger();
    }

    // ===== LOGGING API =====

    /// Set a custom logger
    ///
    /// # Example
    ///
    /// ```no_run
    /// use galaxy_3d_camera::galaxy3d::{Engine, log::{Logger, LogEntry}};
    ///
    /// struct FileLogger;
    /// impl Logger for FileLogger {
    ///     fn log(&self, entry: &LogEntry) {
    ///         // Write to file...
    ///     }
    /// }
    ///
    /// Engine::set_logger(FileLogger);
    /// ```
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(mut lock) = logger_lock.write() {
            *lock = Box::new(logger);
        }
    }

    /// Reset logger to default (DefaultLogger)
    pub fn reset_logger() {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(mut lock) = logger_lock.write() {
            *lock = Box::new(DefaultLogger);
        }
    }

    /// True if a message of this severity passes the configured filter
    ///
    /// Checked by the `engine_*!` macros before formatting.
    pub fn log_enabled(severity: LogSeverity) -> bool {
        let min = ENGINE_STATE.get()
            .and_then(|state| state.config.read().ok().map(|config| config.min_log_severity))
            .unwrap_or(EngineConfig::default().min_log_severity);
        severity >= min
    }

    /// Internal logging method (for simple logs without file:line)
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        Self::dispatch(LogEntry {
            severity,
            timestamp: SystemTime::now(),
            source: source.to_string(),
            message,
            file: None,
            line: None,
        });
    }

    /// Internal logging method with file:line information (for ERROR logs)
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        Self::dispatch(LogEntry {
            severity,
            timestamp: SystemTime::now(),
            source: source.to_string(),
            message,
            file: Some(file),
            line: Some(line),
        });
    }

    fn dispatch(entry: LogEntry) {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(lock) = logger_lock.read() {
            lock.log(&entry);
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
