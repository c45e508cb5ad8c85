//! Kernels and sinks with behaviour the tests can steer.
#![allow(dead_code)]

use crossbeam::channel::{self, Receiver, Sender};
use mandelzoom::{
    Generation, Kernel, KernelError, KernelFactory, PixelBand, PlaneRect, RenderScheduler, Sink,
    ViewportRect,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Paints `[stamp, column, row, 255]`, where `stamp` is whatever the
/// factory's stamp is at the time the pass runs.
pub struct StampKernel {
    width: usize,
    height: usize,
    stamp: Arc<AtomicUsize>,
    gate: Option<Receiver<()>>,
    pixels: Vec<u8>,
}

impl Kernel for StampKernel {
    fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels.resize(4 * width * height, 0);
    }

    fn clear(&mut self) {
        for px in self.pixels.chunks_mut(4) {
            px.copy_from_slice(&[0, 0, 0, 255]);
        }
    }

    fn render_pass(&mut self, _plane: &PlaneRect, _iterations: u32, passes: u32, pass: u32) {
        if let Some(ref gate) = self.gate {
            // Either a token or a closed gate lets the pass through.
            let _ = gate.recv();
        }
        let stamp = self.stamp.load(Ordering::SeqCst) as u8;
        for idx in (pass as usize..self.width * self.height).step_by(passes as usize) {
            let (row, col) = (idx / self.width, idx % self.width);
            self.pixels[4 * idx..4 * idx + 4].copy_from_slice(&[stamp, col as u8, row as u8, 255]);
        }
    }

    fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

/// Builds `StampKernel`s sharing one stamp, and optionally one gate.
#[derive(Clone)]
pub struct StampFactory {
    pub stamp: Arc<AtomicUsize>,
    gate: Option<Receiver<()>>,
    pub created: Arc<AtomicUsize>,
}

impl StampFactory {
    pub fn new(stamp: usize) -> StampFactory {
        StampFactory {
            stamp: Arc::new(AtomicUsize::new(stamp)),
            gate: None,
            created: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Every pass waits for a token from the returned sender, or for
    /// the sender to be dropped.
    pub fn gated(stamp: usize) -> (StampFactory, Sender<()>) {
        let (tx, rx) = channel::unbounded();
        let mut factory = StampFactory::new(stamp);
        factory.gate = Some(rx);
        (factory, tx)
    }

    pub fn set_stamp(&self, stamp: usize) {
        self.stamp.store(stamp, Ordering::SeqCst);
    }
}

impl KernelFactory for StampFactory {
    fn create(&self, width: usize, height: usize) -> Result<Box<dyn Kernel>, KernelError> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(StampKernel {
            width,
            height,
            stamp: self.stamp.clone(),
            gate: self.gate.clone(),
            pixels: vec![0; 4 * width * height],
        }))
    }
}

/// Never manages to build a kernel.
pub struct BrokenFactory;

impl KernelFactory for BrokenFactory {
    fn create(&self, _width: usize, _height: usize) -> Result<Box<dyn Kernel>, KernelError> {
        Err(KernelError::Initialization("no kernel here".to_string()))
    }
}

/// Remembers which generation and raster every painted band had.
#[derive(Clone, Default)]
pub struct RecordingSink {
    pub painted: Arc<Mutex<Vec<(Generation, ViewportRect)>>>,
}

impl RecordingSink {
    pub fn generations(&self) -> Vec<Generation> {
        self.painted.lock().unwrap().iter().map(|p| p.0).collect()
    }
}

impl Sink for RecordingSink {
    fn accept_band(&mut self, band: PixelBand) {
        assert_eq!(band.pixels.len(), 4 * band.raster.len());
        self.painted.lock().unwrap().push((band.generation, band.raster));
    }

    fn translate(&mut self, _source: ViewportRect, _left: usize, _top: usize) {}

    fn resize(&mut self, _width: usize, _height: usize) {}
}

/// Pump and present until the scheduler has nothing left to do.
pub fn settle<S: Sink>(scheduler: &mut RenderScheduler, sink: &mut S) {
    let started = Instant::now();
    loop {
        scheduler.pump(Duration::from_millis(5)).unwrap();
        scheduler.present(sink);
        if scheduler.is_idle() && scheduler.pending_paints() == 0 {
            return;
        }
        assert!(started.elapsed() < Duration::from_secs(30), "scheduler never settled");
    }
}

pub fn frame() -> Duration {
    Duration::from_millis(5)
}

pub fn patience() -> Duration {
    Duration::from_secs(30)
}
