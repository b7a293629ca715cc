//! Configuration types for umlsync.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from an
//! external file; every field has a default.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining cleanup and layout settings.
//! - [`CleanupConfig`] - Selects which cleanup passes run after reconciliation.
//! - [`LayoutConfig`] - Controls where new class containers are placed.
//!
//! # Example
//!
//! ```
//! # use umlsync::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(!config.cleanup().classes());
//! assert_eq!(config.layout().spacing(), 50.0);
//! ```

use serde::Deserialize;

use umlsync_core::geometry::Point;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Cleanup configuration section.
    #[serde(default)]
    cleanup: CleanupConfig,

    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(cleanup: CleanupConfig, layout: LayoutConfig) -> Self {
        Self { cleanup, layout }
    }

    /// Returns the cleanup configuration.
    pub fn cleanup(&self) -> &CleanupConfig {
        &self.cleanup
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Replaces the cleanup configuration.
    pub fn with_cleanup(mut self, cleanup: CleanupConfig) -> Self {
        self.cleanup = cleanup;
        self
    }
}

/// Cleanup passes removing diagram elements that no longer match the model.
///
/// All passes are disabled by default: a diagram may contain classes that are
/// not part of every source file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct CleanupConfig {
    /// Remove class containers without a matching class.
    #[serde(default)]
    classes: bool,

    /// Remove or redirect association edges that no longer match.
    #[serde(default)]
    associations: bool,

    /// Remove inheritance edges that no longer match.
    #[serde(default)]
    extends: bool,
}

impl CleanupConfig {
    pub fn new(classes: bool, associations: bool, extends: bool) -> Self {
        Self {
            classes,
            associations,
            extends,
        }
    }

    pub fn classes(&self) -> bool {
        self.classes
    }

    pub fn associations(&self) -> bool {
        self.associations
    }

    pub fn extends(&self) -> bool {
        self.extends
    }

    /// Returns a configuration enabling every pass enabled in either input.
    ///
    /// # Examples
    ///
    /// ```
    /// # use umlsync::config::CleanupConfig;
    /// let from_file = CleanupConfig::new(true, false, false);
    /// let from_flags = CleanupConfig::new(false, true, true);
    ///
    /// assert_eq!(from_file.union(from_flags), CleanupConfig::new(true, true, true));
    /// ```
    pub fn union(self, other: Self) -> Self {
        Self {
            classes: self.classes || other.classes,
            associations: self.associations || other.associations,
            extends: self.extends || other.extends,
        }
    }
}

/// Placement of newly created class containers.
///
/// Containers flow left to right from `origin`, `spacing` apart, and wrap to a
/// new row once the cursor passes `wrap_threshold`.
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutConfig {
    /// Top-left corner of the first container.
    #[serde(default = "default_origin")]
    origin: Point,

    /// Gap between containers, horizontally and between rows.
    #[serde(default = "default_spacing")]
    spacing: f32,

    /// Horizontal cursor position past which a new row starts.
    #[serde(default = "default_wrap_threshold")]
    wrap_threshold: f32,
}

fn default_origin() -> Point {
    Point::new(50.0, 50.0)
}

fn default_spacing() -> f32 {
    50.0
}

fn default_wrap_threshold() -> f32 {
    1200.0
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            spacing: default_spacing(),
            wrap_threshold: default_wrap_threshold(),
        }
    }
}

impl LayoutConfig {
    pub fn new(origin: Point, spacing: f32, wrap_threshold: f32) -> Self {
        Self {
            origin,
            spacing,
            wrap_threshold,
        }
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    pub fn wrap_threshold(&self) -> f32 {
        self.wrap_threshold
    }
}
