//! Text block size estimation.
//!
//! draw.io measures labels in the browser, which is not available here. The
//! estimator approximates the rendered size of a label with a fixed per
//! character advance and a simple wrapping rule. Container and item geometry
//! written to the document is derived from these numbers, so the heuristic is
//! kept exact: changing any constant changes every saved diagram.

use crate::{
    geometry::Size,
    markup::{LINE_BREAK, unescape_angle_brackets},
};

/// Width of a block before any text is added.
const MIN_WIDTH: f64 = 50.0;
/// Height reserved above the first line.
const HEADER_HEIGHT: f64 = 20.0;
/// Height of one rendered line.
const LINE_HEIGHT: f64 = 14.0;
/// Horizontal advance of one character.
const CHAR_WIDTH: f64 = 5.3;
/// Lines wider than this are assumed to wrap once.
const WRAP_THRESHOLD: f64 = 450.0;
/// Width factor applied to a wrapped line.
const WRAP_FACTOR: f64 = 0.66;

/// Estimates the pixel size of a label.
///
/// `None` yields a zero size. The text is split on [`LINE_BREAK`] after
/// un-escaping angle brackets so that entities count as a single character.
///
/// # Examples
///
/// ```
/// # use umlsync_core::metrics::estimate;
/// let size = estimate(Some("damage: float"));
/// assert_eq!(size.width(), 118.0);
/// assert_eq!(size.height(), 34.0);
///
/// assert!(estimate(None).is_zero());
/// ```
pub fn estimate(text: Option<&str>) -> Size {
    let Some(text) = text else {
        return Size::default();
    };

    let text = unescape_angle_brackets(text);
    let mut width = MIN_WIDTH;
    let mut height = HEADER_HEIGHT;

    for line in text.split(LINE_BREAK) {
        let mut line_width = MIN_WIDTH + line.chars().count() as f64 * CHAR_WIDTH;
        if line_width > WRAP_THRESHOLD {
            line_width *= WRAP_FACTOR;
            height += LINE_HEIGHT;
        }
        width = width.max(line_width);
        height += LINE_HEIGHT;
    }

    Size::new(width.floor() as f32, height.floor() as f32)
}
