//! The records that travel between the scheduler and its workers.
use bands::Band;
use planes::ViewportRect;
use std::fmt;

/// Identifies one call to `draw()`.  Generations only ever increase;
/// a result whose generation is not the current one is stale.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(pub u64);

impl Generation {
    /// The generation that follows this one.
    pub fn next(self) -> Generation {
        Generation(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Work handed to a single worker: render one band, in passes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderRequest {
    /// The `draw()` call this request belongs to.
    pub generation: Generation,
    /// The band to render.
    pub band: Band,
    /// Maximum number of iterations per point.
    pub iterations: u32,
    /// The first pass to render.
    pub pass_index: u32,
    /// How many interlaced passes make up the complete band.
    pub total_passes: u32,
}

impl RenderRequest {
    /// Size of the pixel buffer, in bytes, each pass produces.
    pub fn buffer_len(&self) -> usize {
        4 * self.band.raster_width * self.band.raster_height
    }
}

/// One refinement pass of a band, as produced by a worker.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderResult {
    /// Copied from the request.
    pub generation: Generation,
    /// Copied from the request's band.
    pub band_index: usize,
    /// RGBA8 pixels, row-major, top to bottom.
    pub pixels: Vec<u8>,
    /// Which pass produced these pixels.
    pub pass_index: u32,
    /// Set on the last pass; the worker is idle afterwards.
    pub is_final_pass: bool,
}

/// A finished band waiting for the next display refresh.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBand {
    /// The generation the pixels were rendered for.
    pub generation: Generation,
    /// Which band of that generation's partition.
    pub band_index: usize,
    /// Which pass produced the pixels.
    pub pass_index: u32,
    /// Where on the raster the pixels go.
    pub raster: ViewportRect,
    /// RGBA8 pixels, `4 * raster.width * raster.height` bytes.
    pub pixels: Vec<u8>,
}
