// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The render scheduler.  Every call to `draw` starts a new
//! generation: busy workers from older generations are replaced,
//! paints still waiting for the display are cancelled, and the raster
//! is split into one band per worker.  Workers stream their passes
//! back as they finish them; only passes from the current generation
//! are ever scheduled for painting.
//!
//! The scheduler runs on a single control thread.  `pump` waits for
//! worker deliveries and `present` stands in for the display refresh,
//! handing every scheduled paint to the sink.
use bands::{partition, Band};
use canvas::Sink;
use errors::{PoolError, SchedulerError};
use frames::FrameQueue;
use kernel::KernelFactory;
use planes::{PlaneRect, ViewportRect};
use pool::{PoolEvent, WorkerMessage, WorkerPool, WorkerSlot};
use request::{Generation, PixelBand, RenderRequest, RenderResult};
use std::sync::Arc;
use std::time::Duration;

/// What `deliver` did with a result.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// Scheduled for painting.
    Scheduled,
    /// From a superseded generation, dropped.
    Stale,
}

/// Owns the generation counter, the worker pool and the paints
/// waiting for the display.
pub struct RenderScheduler {
    pool: WorkerPool,
    generation: Generation,
    bands: Vec<Band>,
    frames: FrameQueue,
    failed: bool,
}

impl RenderScheduler {
    /// Start a scheduler with `workers` workers, all using kernels
    /// built by `factory`.
    pub fn new(factory: Arc<dyn KernelFactory>, workers: usize) -> Result<RenderScheduler, SchedulerError> {
        Ok(RenderScheduler {
            pool: WorkerPool::initialize(factory, workers)?,
            generation: Generation::default(),
            bands: vec![],
            frames: FrameQueue::new(),
            failed: false,
        })
    }

    /// The generation of the most recent `draw`.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// The number of workers.
    pub fn worker_count(&self) -> usize {
        self.pool.len()
    }

    /// The slot table.
    pub fn slots(&self) -> &[WorkerSlot] {
        self.pool.slots()
    }

    /// Describes that no worker has passes outstanding.
    pub fn is_idle(&self) -> bool {
        self.pool.is_idle()
    }

    /// The number of paints waiting for the next `present`.
    pub fn pending_paints(&self) -> usize {
        self.frames.len()
    }

    /// Describes a scheduler whose kernel could not be created.  Such a
    /// scheduler ignores every further `draw`.
    pub fn has_failed(&self) -> bool {
        self.failed
    }

    /// How many workers have been started, replacements included.
    pub fn workers_spawned(&self) -> u64 {
        self.pool.spawned()
    }

    /// Render `plane` into the `raster` rectangle of the sink, in
    /// `passes` interlaced passes.  Supersedes everything in flight.
    /// Returns the generation the new work is tagged with.
    pub fn draw(
        &mut self,
        raster: ViewportRect,
        plane: PlaneRect,
        iterations: u32,
        passes: u32,
    ) -> Result<Generation, SchedulerError> {
        if self.failed {
            debug!("kernel unavailable, ignoring draw of {:?}", raster);
            return Ok(self.generation);
        }

        let generation = self.generation.next();

        for slot in 0..self.pool.len() {
            if self.pool.slots()[slot].is_stale(generation) {
                self.pool.cancel_and_respawn(slot)?;
            }
        }

        let cancelled = self.frames.cancel_before(generation);
        if cancelled > 0 {
            debug!("cancelled {} paints older than {}", cancelled, generation);
        }

        self.bands = partition(&raster, &plane, self.pool.len());
        self.generation = generation;

        for band in self.bands.clone() {
            if band.is_empty() {
                continue;
            }
            let request = RenderRequest {
                generation,
                band,
                iterations,
                pass_index: 0,
                total_passes: passes,
            };
            match self.pool.submit(band.index, request) {
                Err(PoolError::Disconnected(slot)) => {
                    self.pool.cancel_and_respawn(slot)?;
                    self.pool.submit(slot, request)?;
                }
                other => other?,
            }
        }

        debug!(
            "dispatched {} over {} bands ({} passes, {} iterations)",
            generation,
            self.bands.len(),
            passes,
            iterations
        );
        Ok(generation)
    }

    /// Handle one pass from the worker in `slot`.  Results from any
    /// generation but the current one are dropped without a trace.
    pub fn deliver(&mut self, slot: usize, result: RenderResult) -> Delivery {
        if result.generation != self.generation {
            debug!(
                "discarding pass {} of band {} from {} (current is {})",
                result.pass_index, result.band_index, result.generation, self.generation
            );
            return Delivery::Stale;
        }

        if result.is_final_pass {
            self.pool.mark_idle(slot);
        }

        let raster = match self.bands.get(result.band_index) {
            Some(band) => band.raster(),
            None => return Delivery::Stale,
        };
        self.frames.request(PixelBand {
            generation: result.generation,
            band_index: result.band_index,
            pass_index: result.pass_index,
            raster,
            pixels: result.pixels,
        });
        Delivery::Scheduled
    }

    fn handle(&mut self, event: PoolEvent) -> Result<(), SchedulerError> {
        match event {
            PoolEvent::Message(slot, WorkerMessage::Rendered(result)) => {
                self.deliver(slot, result);
                Ok(())
            }
            PoolEvent::Message(slot, WorkerMessage::Failed(err)) => {
                if self.failed {
                    return Ok(());
                }
                error!("worker {} could not create its kernel: {}", slot, err);
                self.failed = true;
                self.frames.cancel_before(self.generation.next());
                Err(SchedulerError::Kernel(err))
            }
            PoolEvent::Exited(_) => Ok(()),
        }
    }

    /// Wait up to `timeout` for the first worker delivery, then handle
    /// everything else that has already arrived without waiting.
    /// Returns the number of events handled.  A kernel failure is
    /// reported by the first call that sees it and never again.
    pub fn pump(&mut self, timeout: Duration) -> Result<usize, SchedulerError> {
        let mut handled = 0;
        let mut wait = Some(timeout);
        while let Some(event) = self.pool.poll(wait) {
            wait = None;
            handled += 1;
            self.handle(event)?;
        }
        Ok(handled)
    }

    /// The display refresh: paint everything scheduled since the last
    /// refresh, oldest first.  Returns the number of bands painted.
    pub fn present<S: Sink>(&mut self, sink: &mut S) -> usize {
        let bands = self.frames.drain();
        let mut painted = 0;
        for band in bands {
            if band.generation == self.generation {
                sink.accept_band(band);
                painted += 1;
            }
        }
        painted
    }

    /// Grow or shrink the worker pool.  Anything in flight is
    /// abandoned; the caller is expected to `draw` again.
    pub fn resize_pool(&mut self, workers: usize) -> Result<(), SchedulerError> {
        self.pool.resize(workers)?;
        self.bands.clear();
        self.frames.cancel_before(self.generation.next());
        Ok(())
    }
}
