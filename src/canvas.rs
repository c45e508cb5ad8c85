//! Where finished bands end up.  The `Sink` trait is everything the
//! scheduler and the explorer need from a display surface; `Canvas`
//! is an in-memory RGBA raster that can be written out as a PNG.
use image::png::PNGEncoder;
use image::ColorType;
use planes::ViewportRect;
use request::PixelBand;
use std::fs::File;
use std::io;
use std::path::Path;

/// A display surface.
pub trait Sink {
    /// Paint a band.  The band's pixels now belong to the sink.
    fn accept_band(&mut self, band: PixelBand);

    /// Copy the pixels in `source` so that its upper left corner lands
    /// on `(left, top)`.  Source and destination may overlap.
    fn translate(&mut self, source: ViewportRect, left: usize, top: usize);

    /// Change the surface size.  Previous contents are lost.
    fn resize(&mut self, width: usize, height: usize);
}

/// An RGBA8 raster, row-major, top to bottom.
#[derive(Clone, Debug, PartialEq)]
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Canvas {
    /// An opaque black canvas.
    pub fn new(width: usize, height: usize) -> Canvas {
        let mut pixels = vec![0; 4 * width * height];
        for alpha in pixels.iter_mut().skip(3).step_by(4) {
            *alpha = 255;
        }
        Canvas {
            width,
            height,
            pixels,
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// All of the pixels.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// The RGBA value at column `x`, row `y`.
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let offset = 4 * (y * self.width + x);
        let mut rgba = [0; 4];
        rgba.copy_from_slice(&self.pixels[offset..offset + 4]);
        rgba
    }

    /// Copy out a rectangle, clipped to the canvas.
    pub fn region(&self, rect: ViewportRect) -> Vec<u8> {
        let rect = self.clip(rect);
        let mut out = Vec::with_capacity(4 * rect.len());
        for row in rect.top..rect.top + rect.height {
            let start = 4 * (row * self.width + rect.left);
            out.extend_from_slice(&self.pixels[start..start + 4 * rect.width]);
        }
        out
    }

    fn clip(&self, rect: ViewportRect) -> ViewportRect {
        let left = rect.left.min(self.width);
        let top = rect.top.min(self.height);
        ViewportRect {
            top,
            left,
            width: rect.width.min(self.width - left),
            height: rect.height.min(self.height - top),
        }
    }

    /// Write `pixels`, laid out `stride` pixels per row, into `rect`.
    fn blit(&mut self, pixels: &[u8], stride: usize, rect: ViewportRect) {
        let clipped = self.clip(rect);
        for row in 0..clipped.height {
            let src = 4 * row * stride;
            let dst = 4 * ((clipped.top + row) * self.width + clipped.left);
            let len = 4 * clipped.width;
            self.pixels[dst..dst + len].copy_from_slice(&pixels[src..src + len]);
        }
    }

    /// Write the canvas out as a PNG.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), io::Error> {
        let output = File::create(path)?;
        PNGEncoder::new(output).encode(
            &self.pixels,
            self.width as u32,
            self.height as u32,
            ColorType::RGBA(8),
        )
    }
}

impl Sink for Canvas {
    fn accept_band(&mut self, band: PixelBand) {
        let stride = band.raster.width;
        self.blit(&band.pixels, stride, band.raster);
    }

    fn translate(&mut self, source: ViewportRect, left: usize, top: usize) {
        let source = self.clip(source);
        let pixels = self.region(source);
        self.blit(
            &pixels,
            source.width,
            ViewportRect::new(top, left, source.width, source.height),
        );
    }

    fn resize(&mut self, width: usize, height: usize) {
        *self = Canvas::new(width, height);
    }
}
