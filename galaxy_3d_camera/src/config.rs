//! Engine configuration
//!
//! Holds the values the camera core needs from its environment: the extent
//! of the active render target (used when `project`/`unproject`/`pick_ray`
//! are called without an explicit viewport) and the minimum log severity.

use crate::log::LogSeverity;
use crate::viewport::Viewport;

/// Engine configuration
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Width in pixels of the active render target
    pub render_target_width: u32,
    /// Height in pixels of the active render target
    pub render_target_height: u32,
    /// Messages below this severity are dropped before formatting
    pub min_log_severity: LogSeverity,
}

impl EngineConfig {
    /// Viewport covering the full render target
    pub fn full_viewport(&self) -> Viewport {
        Viewport::from_extent(self.render_target_width, self.render_target_height)
    }

    /// Check that the render target extent is usable for coordinate mapping.
    pub(crate) fn validate(&self) -> std::result::Result<(), String> {
        if self.render_target_width == 0 || self.render_target_height == 0 {
            return Err(format!(
                "render target extent must be non-zero (got {}x{})",
                self.render_target_width, self.render_target_height
            ));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            render_target_width: 1280,
            render_target_height: 720,
            min_log_severity: LogSeverity::Info,
        }
    }
}
