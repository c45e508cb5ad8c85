//! The geometry of a directional pan.  Panning moves the view by a
//! fifth of the raster; the four fifths that stay visible are copied
//! across on the raster, and only the newly exposed strip has to be
//! rendered.
use planes::{PlaneRect, ViewportRect};
use std::str::FromStr;

/// Which way the view moves.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Toward larger imaginary values.
    Up,
    /// Toward smaller imaginary values.
    Down,
    /// Toward smaller real values.
    Left,
    /// Toward larger real values.
    Right,
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Direction, String> {
        match s {
            "w" | "up" => Ok(Direction::Up),
            "s" | "down" => Ok(Direction::Down),
            "a" | "left" => Ok(Direction::Left),
            "d" | "right" => Ok(Direction::Right),
            _ => Err(format!("'{}' is not a direction", s)),
        }
    }
}

/// The fraction of the raster a single pan moves.
pub const PAN_FRACTION: usize = 5;

/// Everything needed to carry out one pan.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PanStep {
    /// Which way the view moves.
    pub direction: Direction,
    /// How far the raster content moves, in pixels.
    pub pixels: usize,
    /// How far the center moves along the real axis.
    pub delta_x: f64,
    /// How far the center moves along the imaginary axis.
    pub delta_y: f64,
    /// The pixels that remain visible, before the move.
    pub keep: ViewportRect,
    /// Where the upper left corner of `keep` goes: (left, top).
    pub keep_to: (usize, usize),
    /// The newly exposed part of the raster.
    pub strip: ViewportRect,
}

impl PanStep {
    /// Plan a pan of `viewport`, which currently shows `plane`.  The
    /// step is a whole number of pixels, at least one, so that reused
    /// pixels stay exactly aligned with the plane.
    pub fn new(direction: Direction, viewport: &ViewportRect, plane: &PlaneRect) -> PanStep {
        let (top, left) = (viewport.top, viewport.left);
        let (width, height) = (viewport.width, viewport.height);
        let extent = match direction {
            Direction::Up | Direction::Down => height,
            Direction::Left | Direction::Right => width,
        };
        let step = (extent / PAN_FRACTION).max(1).min(extent);
        let units_x = plane.width / width as f64;
        let units_y = plane.height / height as f64;

        let (delta_x, delta_y, keep, keep_to, strip) = match direction {
            Direction::Right => (
                step as f64 * units_x,
                0.0,
                ViewportRect::new(top, left + step, width - step, height),
                (left, top),
                ViewportRect::new(top, left + width - step, step, height),
            ),
            Direction::Left => (
                -(step as f64) * units_x,
                0.0,
                ViewportRect::new(top, left, width - step, height),
                (left + step, top),
                ViewportRect::new(top, left, step, height),
            ),
            Direction::Up => (
                0.0,
                step as f64 * units_y,
                ViewportRect::new(top, left, width, height - step),
                (left, top + step),
                ViewportRect::new(top, left, width, step),
            ),
            Direction::Down => (
                0.0,
                -(step as f64) * units_y,
                ViewportRect::new(top + step, left, width, height - step),
                (left, top),
                ViewportRect::new(top + height - step, left, width, step),
            ),
        };

        PanStep {
            direction,
            pixels: step,
            delta_x,
            delta_y,
            keep,
            keep_to,
            strip,
        }
    }

    /// The part of `moved`, the plane rectangle after the pan, that
    /// the exposed strip shows.
    pub fn strip_plane(&self, viewport: &ViewportRect, moved: &PlaneRect) -> PlaneRect {
        let units_x = moved.width / viewport.width as f64;
        let units_y = moved.height / viewport.height as f64;
        let offset_x = (self.strip.left - viewport.left) as f64 * units_x;
        let offset_y = (self.strip.top - viewport.top) as f64 * units_y;
        PlaneRect {
            top: moved.top - offset_y,
            left: moved.left + offset_x,
            width: self.strip.width as f64 * units_x,
            height: self.strip.height as f64 * units_y,
        }
    }
}
