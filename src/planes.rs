//! Contains the types describing the two planes the explorer works
//! with: an integral raster plane (the screen, with its origin in the
//! upper left corner and y growing downward), and the continuous
//! complex plane (with y growing upward).  Also contains the
//! functions that map the navigation state, a center point and a
//! zoom factor, onto a rectangle of the complex plane, and map
//! clicks on the raster back onto the complex plane.
use num::Complex;
use std::fmt;
use std::str::FromStr;

/// A rectangle on the integral raster plane, measured in pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewportRect {
    /// First row covered by the rectangle.
    pub top: usize,
    /// First column covered by the rectangle.
    pub left: usize,
    /// Number of columns covered.
    pub width: usize,
    /// Number of rows covered.
    pub height: usize,
}

impl ViewportRect {
    /// Constructor.
    pub fn new(top: usize, left: usize, width: usize, height: usize) -> ViewportRect {
        ViewportRect {
            top,
            left,
            width,
            height,
        }
    }

    /// A rectangle anchored at 0,0.
    pub fn sized(width: usize, height: usize) -> ViewportRect {
        ViewportRect::new(0, 0, width, height)
    }

    /// The total number of pixels in the rectangle.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// Describes that the rectangle covers no pixels at all.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width divided by height.  Meaningless for an empty rectangle.
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

/// A rectangle on the complex plane.  `top` is the upper bound of
/// the imaginary axis, and `left` the lower bound of the real axis;
/// the rectangle extends right by `width` and down by `height`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PlaneRect {
    /// Upper bound of the imaginary component.
    pub top: f64,
    /// Lower bound of the real component.
    pub left: f64,
    /// Extent along the real axis.
    pub width: f64,
    /// Extent along the imaginary axis.
    pub height: f64,
}

impl PlaneRect {
    /// Constructor.
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> PlaneRect {
        PlaneRect {
            top,
            left,
            width,
            height,
        }
    }

    /// The point in the exact middle of the rectangle.
    pub fn center(&self) -> Complex<f64> {
        Complex::new(self.left + self.width / 2.0, self.top - self.height / 2.0)
    }
}

/// Where the explorer is looking: a center point on the complex
/// plane and a magnification.  A zoom of 1.0 shows two units of the
/// plane along the shorter side of the raster.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NavigationState {
    /// Real component of the center point.
    pub center_x: f64,
    /// Imaginary component of the center point.
    pub center_y: f64,
    /// Magnification; always greater than zero.
    pub zoom: f64,
}

impl NavigationState {
    /// Constructor.
    pub fn new(center_x: f64, center_y: f64, zoom: f64) -> NavigationState {
        NavigationState {
            center_x,
            center_y,
            zoom,
        }
    }

    /// The same magnification, moved by the given offsets.
    pub fn translated(&self, dx: f64, dy: f64) -> NavigationState {
        NavigationState::new(self.center_x + dx, self.center_y + dy, self.zoom)
    }

    /// Describes that every component is finite and the zoom is
    /// positive.
    pub fn is_valid(&self) -> bool {
        self.center_x.is_finite()
            && self.center_y.is_finite()
            && self.zoom.is_finite()
            && self.zoom > 0.0
    }
}

impl Default for NavigationState {
    fn default() -> NavigationState {
        NavigationState::new(0.0, 0.0, 0.5)
    }
}

impl fmt::Display for NavigationState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{},{},{}", self.center_x, self.center_y, self.zoom)
    }
}

impl FromStr for NavigationState {
    type Err = String;

    /// Parses the `x,y,zoom` form produced by `Display`.
    fn from_str(s: &str) -> Result<NavigationState, String> {
        let parts: Vec<&str> = s.split(',').map(|p| p.trim()).collect();
        if parts.len() != 3 {
            return Err(format!("expected x,y,zoom but got '{}'", s));
        }
        let mut values = [0.0_f64; 3];
        for (value, part) in values.iter_mut().zip(parts.iter()) {
            *value = f64::from_str(part).map_err(|e| format!("'{}': {}", part, e))?;
        }
        let state = NavigationState::new(values[0], values[1], values[2]);
        if !state.is_valid() {
            return Err(format!("'{}' is not a usable location", s));
        }
        Ok(state)
    }
}

/// Given a navigation state and the aspect ratio of the raster,
/// return the rectangle of the complex plane that the raster shows.
/// The shorter side of the raster always spans `2 / zoom` units.
pub fn plane_rect_for(state: &NavigationState, aspect_ratio: f64) -> PlaneRect {
    let (width_stretch, height_stretch) = if aspect_ratio > 1.0 {
        (aspect_ratio, 1.0)
    } else {
        (1.0, 1.0 / aspect_ratio)
    };

    let width = 2.0 / state.zoom * width_stretch;
    let height = 2.0 / state.zoom * height_stretch;

    PlaneRect {
        top: state.center_y + height / 2.0,
        left: state.center_x - width / 2.0,
        width,
        height,
    }
}

/// Given a point on the raster (in pixels, possibly fractional),
/// the raster's dimensions, and the rectangle of the complex plane
/// the raster shows, return the corresponding complex number.
pub fn screen_point_to_plane(
    plane: &PlaneRect,
    viewport: &ViewportRect,
    x: f64,
    y: f64,
) -> Complex<f64> {
    Complex::new(
        x / viewport.width as f64 * plane.width + plane.left,
        plane.top - y / viewport.height as f64 * plane.height,
    )
}
