#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelzoom: a progressive Mandelbrot explorer
//!
//! Every pixel of a Mandelbrot image is an independent, and
//! sometimes very expensive, computation.  To keep exploration
//! responsive, each frame is split into horizontal bands, one per
//! worker thread, and every band is rendered in several interlaced
//! passes so that a coarse picture shows up almost immediately and
//! sharpens as the passes arrive.
//!
//! Exploration keeps changing what should be on screen.  Every render
//! request is tagged with a generation; starting a new one throws away
//! whatever the workers were doing for the old one, and anything that
//! still trickles back from an older generation is never painted.
//! Panning is special-cased: four fifths of the old image are still
//! correct after a pan, so they are moved across instead of being
//! rendered again, and only the newly exposed strip goes to the
//! workers.

extern crate crossbeam;
#[macro_use]
extern crate failure;
extern crate image;
#[macro_use]
extern crate log;
extern crate num;
extern crate num_cpus;

pub mod bands;
pub mod canvas;
pub mod errors;
pub mod explorer;
pub mod frames;
pub mod history;
pub mod kernel;
pub mod mandelbrot;
pub mod pan;
pub mod planes;
pub mod pool;
pub mod request;
pub mod scheduler;
pub mod settings;

pub use canvas::{Canvas, Sink};
pub use errors::{CommandError, KernelError, PoolError, SchedulerError};
pub use explorer::{Explorer, Input};
pub use kernel::{Kernel, KernelFactory};
pub use mandelbrot::{MandelbrotFactory, MandelbrotKernel};
pub use pan::Direction;
pub use planes::{plane_rect_for, screen_point_to_plane, NavigationState, PlaneRect, ViewportRect};
pub use request::{Generation, PixelBand, RenderRequest, RenderResult};
pub use scheduler::RenderScheduler;
pub use settings::RenderSettings;
