// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A fixed-size set of render workers.  Each worker is a thread with
//! its own kernel, fed through its own request channel and answering
//! through its own result channel.  There is no way to interrupt a
//! kernel mid-pass, so cancelling a worker means dropping both of its
//! channels and starting a replacement: the old thread notices on its
//! next send and exits, and nothing it produces is ever seen again.
use crossbeam::channel::{self, Receiver, Select, Sender};
use errors::{KernelError, PoolError};
use kernel::{Kernel, KernelFactory};
use request::{Generation, RenderRequest, RenderResult};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// What a worker sends back to the pool.
#[derive(Debug)]
pub enum WorkerMessage {
    /// One pass of a band.
    Rendered(RenderResult),
    /// The worker could not create its kernel and has stopped.
    Failed(KernelError),
}

/// Something that happened on one of the pool's slots.
#[derive(Debug)]
pub enum PoolEvent {
    /// A slot's worker sent a message.
    Message(usize, WorkerMessage),
    /// A slot's worker went away without being cancelled.  The slot
    /// keeps its busy flag until it is respawned.
    Exited(usize),
}

/// The scheduler's bookkeeping for one worker.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WorkerSlot {
    /// Position of the slot in the pool.
    pub id: usize,
    /// Set while the worker has unfinished passes.
    pub busy: bool,
    /// The generation of the last request submitted to the slot.
    pub bound_generation: Generation,
}

impl WorkerSlot {
    fn idle(id: usize) -> WorkerSlot {
        WorkerSlot {
            id,
            busy: false,
            bound_generation: Generation::default(),
        }
    }

    /// Describes a slot still working on a superseded request.
    pub fn is_stale(&self, current: Generation) -> bool {
        self.busy && self.bound_generation < current
    }
}

struct Worker {
    requests: Sender<RenderRequest>,
    results: Receiver<WorkerMessage>,
}

/// Owns the slot table and one live worker per slot.
pub struct WorkerPool {
    factory: Arc<dyn KernelFactory>,
    slots: Vec<WorkerSlot>,
    workers: Vec<Worker>,
    spawned: u64,
}

impl WorkerPool {
    /// Start `count` idle workers, each of which will build its kernel
    /// with `factory` when it receives its first request.
    pub fn initialize(factory: Arc<dyn KernelFactory>, count: usize) -> Result<WorkerPool, PoolError> {
        let mut pool = WorkerPool {
            factory,
            slots: Vec::with_capacity(count),
            workers: Vec::with_capacity(count),
            spawned: 0,
        };
        pool.resize(count)?;
        Ok(pool)
    }

    /// The number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Describes a pool without any slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The slot table.
    pub fn slots(&self) -> &[WorkerSlot] {
        &self.slots
    }

    /// Describes that no worker has unfinished passes.
    pub fn is_idle(&self) -> bool {
        self.slots.iter().all(|slot| !slot.busy)
    }

    /// How many workers have been started over the pool's lifetime,
    /// replacements included.
    pub fn spawned(&self) -> u64 {
        self.spawned
    }

    fn check(&self, slot: usize) -> Result<(), PoolError> {
        if slot < self.slots.len() {
            Ok(())
        } else {
            Err(PoolError::InvalidSlot {
                slot,
                count: self.slots.len(),
            })
        }
    }

    fn spawn(&mut self, id: usize) -> Result<Worker, PoolError> {
        let (request_tx, request_rx) = channel::unbounded();
        let (result_tx, result_rx) = channel::unbounded();
        let factory = self.factory.clone();
        self.spawned += 1;
        thread::Builder::new()
            .name(format!("render-worker-{}.{}", id, self.spawned))
            .spawn(move || run_worker(&*factory, &request_rx, &result_tx))
            .map_err(PoolError::Spawn)?;
        Ok(Worker {
            requests: request_tx,
            results: result_rx,
        })
    }

    /// Hand a request to a slot's worker and mark the slot busy.
    /// Returns immediately; results arrive through `poll`.
    pub fn submit(&mut self, slot: usize, request: RenderRequest) -> Result<(), PoolError> {
        self.check(slot)?;
        self.workers[slot]
            .requests
            .send(request)
            .map_err(|_| PoolError::Disconnected(slot))?;
        self.slots[slot].busy = true;
        self.slots[slot].bound_generation = request.generation;
        Ok(())
    }

    /// Abandon whatever the slot's worker is doing and replace it with
    /// a fresh one.  The slot is idle afterwards.
    pub fn cancel_and_respawn(&mut self, slot: usize) -> Result<(), PoolError> {
        self.check(slot)?;
        let worker = self.spawn(slot)?;
        self.workers[slot] = worker;
        self.slots[slot].busy = false;
        debug!("respawned worker in slot {}", slot);
        Ok(())
    }

    /// Mark a slot as having delivered its final pass.
    pub fn mark_idle(&mut self, slot: usize) {
        if let Some(slot) = self.slots.get_mut(slot) {
            slot.busy = false;
        }
    }

    /// Grow or shrink the pool to `count` slots.  Workers beyond the new
    /// count are dropped, and any surviving worker that is still busy is
    /// respawned, since its band belongs to a partition that no longer
    /// matches the pool.  Every slot is idle afterwards.
    pub fn resize(&mut self, count: usize) -> Result<(), PoolError> {
        let before = self.slots.len();
        self.slots.truncate(count);
        self.workers.truncate(count);

        for slot in 0..self.slots.len() {
            if self.slots[slot].busy {
                self.cancel_and_respawn(slot)?;
            }
        }

        while self.slots.len() < count {
            let id = self.slots.len();
            let worker = self.spawn(id)?;
            self.workers.push(worker);
            self.slots.push(WorkerSlot::idle(id));
        }

        if before != count {
            info!("worker pool resized from {} to {}", before, count);
        }
        Ok(())
    }

    /// Wait up to `timeout` for the next message from any worker; with
    /// no timeout, only look at what has already arrived.
    pub fn poll(&mut self, timeout: Option<Duration>) -> Option<PoolEvent> {
        let (slot, received) = {
            let mut select = Select::new();
            for worker in &self.workers {
                select.recv(&worker.results);
            }
            let operation = match timeout {
                Some(timeout) => select.select_timeout(timeout).ok()?,
                None => select.try_select().ok()?,
            };
            let slot = operation.index();
            (slot, operation.recv(&self.workers[slot].results))
        };

        match received {
            Ok(message) => Some(PoolEvent::Message(slot, message)),
            Err(_) => {
                warn!("worker in slot {} exited unexpectedly", slot);
                self.workers[slot].results = channel::never();
                Some(PoolEvent::Exited(slot))
            }
        }
    }
}

/// The body of a worker thread.  Serves requests until either channel
/// is dropped by the pool.
fn run_worker(
    factory: &dyn KernelFactory,
    requests: &Receiver<RenderRequest>,
    results: &Sender<WorkerMessage>,
) {
    let mut kernel: Option<Box<dyn Kernel>> = None;
    let mut size = (0, 0);

    for request in requests.iter() {
        let (width, height) = (request.band.raster_width, request.band.raster_height);
        match kernel {
            None => match factory.create(width, height) {
                Ok(created) => kernel = Some(created),
                Err(err) => {
                    let _ = results.send(WorkerMessage::Failed(err));
                    return;
                }
            },
            Some(ref mut engine) if size != (width, height) => engine.resize(width, height),
            Some(_) => {}
        }
        size = (width, height);

        let engine = match kernel.as_mut() {
            Some(engine) => engine,
            None => return,
        };
        engine.clear();

        let len = request.buffer_len();
        for pass in request.pass_index..request.total_passes {
            engine.render_pass(&request.band.plane, request.iterations, request.total_passes, pass);
            let result = RenderResult {
                generation: request.generation,
                band_index: request.band.index,
                pixels: engine.pixels()[..len].to_vec(),
                pass_index: pass,
                is_final_pass: pass + 1 == request.total_passes,
            };
            if results.send(WorkerMessage::Rendered(result)).is_err() {
                return;
            }
        }
    }
}
