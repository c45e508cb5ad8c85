//! Render settings and the limits commands are checked against.
use errors::CommandError;

/// Smallest and largest iteration budget.
pub const ITERATION_LIMITS: (u32, u32) = (1, 1_000_000);
/// Smallest and largest number of interlaced passes.
pub const PASS_LIMITS: (u32, u32) = (1, 64);
/// Smallest and largest worker count.
pub const WORKER_LIMITS: (usize, usize) = (1, 256);

/// How each frame is rendered.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RenderSettings {
    /// Maximum iterations per point.
    pub iterations: u32,
    /// Interlaced passes per frame; more passes means faster first
    /// feedback and a longer total.
    pub passes: u32,
    /// Number of render workers.
    pub workers: usize,
}

impl Default for RenderSettings {
    fn default() -> RenderSettings {
        RenderSettings {
            iterations: 1024,
            passes: 7,
            workers: num_cpus::get().max(1).min(WORKER_LIMITS.1),
        }
    }
}

fn in_range(name: &'static str, value: u64, (low, high): (u64, u64)) -> Result<(), CommandError> {
    if value >= low && value <= high {
        Ok(())
    } else {
        Err(CommandError::OutOfRange {
            name,
            low,
            high,
            value,
        })
    }
}

/// Check an iteration budget.
pub fn check_iterations(iterations: u32) -> Result<(), CommandError> {
    let (low, high) = ITERATION_LIMITS;
    in_range("iterations", u64::from(iterations), (u64::from(low), u64::from(high)))
}

/// Check a pass count.
pub fn check_passes(passes: u32) -> Result<(), CommandError> {
    let (low, high) = PASS_LIMITS;
    in_range("passes", u64::from(passes), (u64::from(low), u64::from(high)))
}

/// Check a worker count.
pub fn check_workers(workers: usize) -> Result<(), CommandError> {
    let (low, high) = WORKER_LIMITS;
    in_range("workers", workers as u64, (low as u64, high as u64))
}

impl RenderSettings {
    /// Check every field.
    pub fn validate(&self) -> Result<(), CommandError> {
        check_iterations(self.iterations)?;
        check_passes(self.passes)?;
        check_workers(self.workers)
    }
}
