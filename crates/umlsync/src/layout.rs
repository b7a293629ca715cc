//! Placement of new class containers.
//!
//! Containers that already exist in a diagram keep whatever position the user
//! gave them. Only containers created during a run are placed, in model order,
//! by a [`LayoutPlanner`] flowing them left to right in rows:
//!
//! ```text
//!  origin
//!    ┌─────┐ spacing ┌───┐ spacing ┌──────┐   cursor passes the wrap threshold
//!    │  A  │         │ B │         │  C   │ ─┐
//!    └─────┘         │   │         └──────┘  │
//!                    └───┘                   │
//!            spacing below the tallest box   │
//!    ┌────┐ <────────────────────────────────┘
//!    │ D  │
//!    └────┘
//! ```

use log::trace;

use umlsync_core::geometry::{Point, Size};

use crate::config::LayoutConfig;

/// Grid-flow allocator for top-level containers.
///
/// The planner is stateful and owned by one reconciliation run, so the same
/// model always produces the same positions.
#[derive(Debug, Clone)]
pub struct LayoutPlanner {
    origin: Point,
    spacing: f32,
    wrap_threshold: f32,
    cursor: Point,
    row_height: f32,
}

impl Default for LayoutPlanner {
    fn default() -> Self {
        Self::new(&LayoutConfig::default())
    }
}

impl LayoutPlanner {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            origin: config.origin(),
            spacing: config.spacing(),
            wrap_threshold: config.wrap_threshold(),
            cursor: config.origin(),
            row_height: 0.0,
        }
    }

    /// Returns the position for a container of `size` and advances the cursor.
    ///
    /// The cursor moves right by the width plus spacing. Once it passes the
    /// wrap threshold, it returns to the origin column below the tallest
    /// container of the current row.
    ///
    /// # Examples
    ///
    /// ```
    /// # use umlsync::layout::LayoutPlanner;
    /// # use umlsync_core::geometry::{Point, Size};
    /// let mut planner = LayoutPlanner::default();
    ///
    /// assert_eq!(planner.place(Size::new(200.0, 100.0)), Point::new(50.0, 50.0));
    /// assert_eq!(planner.place(Size::new(150.0, 80.0)), Point::new(300.0, 50.0));
    /// ```
    pub fn place(&mut self, size: Size) -> Point {
        let position = self.cursor;

        let mut x = self.cursor.x() + size.width() + self.spacing;
        let mut y = self.cursor.y();
        self.row_height = self.row_height.max(size.height());
        if x > self.wrap_threshold {
            x = self.origin.x();
            y += self.row_height + self.spacing;
            self.row_height = 0.0;
        }
        self.cursor = Point::new(x, y);

        trace!(x = position.x(), y = position.y(); "Container placed");
        position
    }
}
