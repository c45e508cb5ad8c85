//! The capability a worker needs from whatever actually computes
//! pixel colors.  The scheduler knows nothing about the fractal;
//! each worker thread builds its own kernel through a shared factory
//! and drives it through this interface.
use errors::KernelError;
use planes::PlaneRect;

/// A per-worker rendering engine with an internal RGBA8 buffer.
pub trait Kernel {
    /// Change the render size.  The buffer must hold at least
    /// `4 * width * height` bytes afterwards.
    fn resize(&mut self, width: usize, height: usize);

    /// Reset every pixel of the current render size to opaque black.
    fn clear(&mut self);

    /// Render pass `pass` of `passes` over the given rectangle of the
    /// complex plane into the internal buffer.  Passes are
    /// interlaced: pass `p` covers pixel indices `p, p + passes, ...`.
    fn render_pass(&mut self, plane: &PlaneRect, iterations: u32, passes: u32, pass: u32);

    /// The internal buffer.  The first `4 * width * height` bytes are
    /// the current image, row-major, top to bottom.
    fn pixels(&self) -> &[u8];
}

/// Builds kernels.  Shared by every worker thread; each thread calls
/// `create` once, on its first request.
pub trait KernelFactory: Send + Sync {
    /// Instantiate a kernel able to render `width` by `height` pixels.
    fn create(&self, width: usize, height: usize) -> Result<Box<dyn Kernel>, KernelError>;
}
