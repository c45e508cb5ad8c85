//! Paints waiting for the next display refresh.  Scheduling a paint
//! returns a handle that can cancel it until the refresh happens.
use request::{Generation, PixelBand};

/// Identifies one scheduled paint.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PaintHandle(u64);

/// Scheduled paints, in the order they were scheduled.
#[derive(Debug, Default)]
pub struct FrameQueue {
    next: u64,
    pending: Vec<(PaintHandle, PixelBand)>,
}

impl FrameQueue {
    /// An empty queue.
    pub fn new() -> FrameQueue {
        FrameQueue::default()
    }

    /// Schedule a band for the next refresh.  An unpainted earlier pass
    /// of the same band is superseded, since every pass contains all
    /// the pixels of the passes before it.
    pub fn request(&mut self, band: PixelBand) -> PaintHandle {
        self.pending.retain(|&(_, ref queued)| {
            queued.generation != band.generation || queued.band_index != band.band_index
        });
        let handle = PaintHandle(self.next);
        self.next += 1;
        self.pending.push((handle, band));
        handle
    }

    /// Cancel one scheduled paint.  Returns false if it had already
    /// been painted or cancelled.
    pub fn cancel(&mut self, handle: PaintHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|&(queued, _)| queued != handle);
        self.pending.len() != before
    }

    /// Cancel every paint scheduled for a generation older than
    /// `generation`.  Returns how many were cancelled.
    pub fn cancel_before(&mut self, generation: Generation) -> usize {
        let stale: Vec<PaintHandle> = self
            .pending
            .iter()
            .filter(|&&(_, ref band)| band.generation < generation)
            .map(|&(handle, _)| handle)
            .collect();
        stale.iter().filter(|&&handle| self.cancel(handle)).count()
    }

    /// The number of paints waiting.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Describes that nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Take every waiting paint, oldest first.
    pub fn drain(&mut self) -> Vec<PixelBand> {
        self.pending.drain(..).map(|(_, band)| band).collect()
    }
}
