//! The escape-time Mandelbrot kernel.  Points are colored by how many
//! iterations of `z = z * z + c` it takes for `|z|` to pass 2; points
//! that never escape are black.
use errors::KernelError;
use kernel::{Kernel, KernelFactory};
use num::{clamp, Complex};
use planes::PlaneRect;
use std::f64::consts::FRAC_PI_2;

const D4: f64 = 1.0 / 4.0;
const D16: f64 = D4 / 4.0;

/// Iteration counts around this value get the middle of the palette.
const SLOW_ESCAPE: f64 = 512.0;

/// The two halves of this expression are false when the point is
/// guaranteed to be inside the main cardioid or the period-2 bulb.
/// Points that pass still have to be iterated; a lot of the points
/// that fail would otherwise burn the entire iteration budget.
pub fn maybe_outside(point: Complex<f64>) -> bool {
    let y = point.im * point.im;
    let q = y + (point.re - D4) * (point.re - D4);
    q * (q + point.re - D4) > (y * D4) && (point.re + 1.0) * (point.re + 1.0) + y > D16
}

/// Returns the iteration on which the point escaped, or `None` if it
/// stayed bounded for the whole budget.
pub fn escape_time(point: Complex<f64>, iterations: u32) -> Option<u32> {
    let mut z = point;
    for i in 1..=iterations {
        if z.norm_sqr() > 4.0 {
            return Some(i);
        }
        z = z * z + point;
    }
    None
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (f64, f64, f64) {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = h / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r, g, b) = match hp as u8 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        5 => (c, 0.0, x),
        _ => (0.0, 0.0, 0.0),
    };
    let m = l - c / 2.0;
    (r + m, g + m, b + m)
}

/// Map an escape count onto the palette: slow escapes drift from
/// dark red toward bright green.  Bounded points are black.
pub fn colorize(escape: Option<u32>) -> [u8; 3] {
    let escape = match escape {
        Some(e) => e,
        None => return [0, 0, 0],
    };
    let ratio = (f64::from(escape) / SLOW_ESCAPE).atan() / FRAC_PI_2;
    let (r, g, b) = hsl_to_rgb(ratio * 120.0, 1.0, ratio * 0.9);
    let byte = |v: f64| clamp(v * 255.0, 0.0, 255.0) as u8;
    [byte(r), byte(g), byte(b)]
}

/// A kernel holding one RGBA8 buffer.  The buffer only ever grows;
/// shrinking the render size just uses less of it.
pub struct MandelbrotKernel {
    width: usize,
    height: usize,
    colors: Vec<u8>,
}

impl MandelbrotKernel {
    /// Requires the render size in pixels.
    pub fn new(width: usize, height: usize) -> MandelbrotKernel {
        MandelbrotKernel {
            width,
            height,
            colors: vec![0; 4 * width * height],
        }
    }
}

impl Kernel for MandelbrotKernel {
    fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        let needed = 4 * width * height;
        if self.colors.len() < needed {
            self.colors.resize(needed, 0);
        }
    }

    fn clear(&mut self) {
        for pixel in self.colors[..4 * self.width * self.height].chunks_mut(4) {
            pixel.copy_from_slice(&[0, 0, 0, 255]);
        }
    }

    fn render_pass(&mut self, plane: &PlaneRect, iterations: u32, passes: u32, pass: u32) {
        let passes = passes.max(1) as usize;
        let delta_x = plane.width / self.width as f64;
        let delta_y = plane.height / self.height as f64;

        for idx in (pass as usize..self.width * self.height).step_by(passes) {
            let row = idx / self.width;
            let col = idx % self.width;
            let point = Complex::new(
                plane.left + col as f64 * delta_x,
                plane.top - row as f64 * delta_y,
            );
            let escape = if maybe_outside(point) {
                escape_time(point, iterations)
            } else {
                None
            };
            let [r, g, b] = colorize(escape);
            self.colors[4 * idx..4 * idx + 4].copy_from_slice(&[r, g, b, 255]);
        }
    }

    fn pixels(&self) -> &[u8] {
        &self.colors
    }
}

/// Builds `MandelbrotKernel`s.
#[derive(Copy, Clone, Debug, Default)]
pub struct MandelbrotFactory;

impl KernelFactory for MandelbrotFactory {
    fn create(&self, width: usize, height: usize) -> Result<Box<dyn Kernel>, KernelError> {
        match width.checked_mul(height).and_then(|n| n.checked_mul(4)) {
            Some(_) => Ok(Box::new(MandelbrotKernel::new(width, height))),
            None => Err(KernelError::UnsupportedSize { width, height }),
        }
    }
}
