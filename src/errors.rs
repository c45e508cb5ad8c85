//! Error types.  Stale results are not errors and have no variant
//! here; they are discarded as part of normal operation.
use std::io;

/// The kernel could not be created.  Fatal for the session.
#[derive(Debug, Fail)]
pub enum KernelError {
    /// The kernel refused the requested render size.
    #[fail(display = "kernel cannot render a {}x{} buffer", width, height)]
    UnsupportedSize {
        /// Requested width in pixels.
        width: usize,
        /// Requested height in pixels.
        height: usize,
    },
    /// Any other reason the kernel could not be loaded.
    #[fail(display = "kernel failed to initialize: {}", _0)]
    Initialization(String),
}

/// Failures of the worker pool.
#[derive(Debug, Fail)]
pub enum PoolError {
    /// A slot id beyond the end of the slot table.
    #[fail(display = "worker slot {} is out of range (pool has {} slots)", slot, count)]
    InvalidSlot {
        /// The slot asked for.
        slot: usize,
        /// The number of slots in the pool.
        count: usize,
    },
    /// The operating system would not give us another thread.
    #[fail(display = "could not spawn render worker: {}", _0)]
    Spawn(#[cause] io::Error),
    /// The worker behind a slot is gone and can't take requests.
    #[fail(display = "worker in slot {} has stopped", _0)]
    Disconnected(usize),
}

/// Failures surfaced by the render scheduler.
#[derive(Debug, Fail)]
pub enum SchedulerError {
    /// A worker could not create its kernel.  Reported once; every
    /// later render request is ignored.
    #[fail(display = "render kernel unavailable: {}", _0)]
    Kernel(#[cause] KernelError),
    /// The pool failed underneath the scheduler.
    #[fail(display = "{}", _0)]
    Pool(#[cause] PoolError),
}

impl From<PoolError> for SchedulerError {
    fn from(err: PoolError) -> SchedulerError {
        SchedulerError::Pool(err)
    }
}

/// A navigation command was rejected.  Nothing was changed.
#[derive(Debug, Fail)]
pub enum CommandError {
    /// Center or zoom not finite, or zoom not positive.
    #[fail(display = "invalid location {},{} at zoom {}", _0, _1, _2)]
    InvalidLocation(f64, f64, f64),
    /// A click outside the raster or at a non-finite position.
    #[fail(display = "point {},{} is not on the {}x{} raster", x, y, width, height)]
    OffRaster {
        /// Horizontal position of the point.
        x: f64,
        /// Vertical position of the point.
        y: f64,
        /// Raster width.
        width: usize,
        /// Raster height.
        height: usize,
    },
    /// A setting outside its permitted range.
    #[fail(display = "{} must be between {} and {}, got {}", name, low, high, value)]
    OutOfRange {
        /// Which setting.
        name: &'static str,
        /// Smallest permitted value.
        low: u64,
        /// Largest permitted value.
        high: u64,
        /// What was asked for.
        value: u64,
    },
    /// A raster with no pixels.
    #[fail(display = "viewport {}x{} has no pixels", _0, _1)]
    EmptyViewport(usize, usize),
    /// The scheduler could not carry out the command.
    #[fail(display = "{}", _0)]
    Scheduler(#[cause] SchedulerError),
}

impl From<SchedulerError> for CommandError {
    fn from(err: SchedulerError) -> CommandError {
        CommandError::Scheduler(err)
    }
}

impl From<PoolError> for CommandError {
    fn from(err: PoolError) -> CommandError {
        CommandError::Scheduler(SchedulerError::Pool(err))
    }
}
