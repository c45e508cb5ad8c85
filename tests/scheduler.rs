extern crate crossbeam;
extern crate mandelzoom;

mod common;

use common::{settle, RecordingSink, StampFactory};
use mandelzoom::scheduler::Delivery;
use mandelzoom::{Canvas, Generation, PlaneRect, RenderResult, RenderScheduler, ViewportRect};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};

fn plane() -> PlaneRect {
    PlaneRect::new(1.5, -2.0, 4.0, 3.0)
}

#[test]
fn full_render_covers_the_raster() {
    let factory = StampFactory::new(7);
    let mut scheduler = RenderScheduler::new(Arc::new(factory), 4).unwrap();
    let mut canvas = Canvas::new(64, 50);

    let generation = scheduler
        .draw(ViewportRect::sized(64, 50), plane(), 100, 3)
        .unwrap();
    assert_eq!(generation, Generation(1));
    assert!(!scheduler.is_idle());

    settle(&mut scheduler, &mut canvas);
    for y in 0..50 {
        for x in 0..64 {
            assert_eq!(canvas.pixel(x, y)[0], 7, "pixel {},{} never painted", x, y);
        }
    }
    // Rows restart at zero at the top of each 13-row band.
    assert_eq!(canvas.pixel(5, 13)[2], 0);
    assert_eq!(canvas.pixel(5, 49)[2], 10);
}

#[test]
fn every_draw_bumps_the_generation() {
    let mut scheduler = RenderScheduler::new(Arc::new(StampFactory::new(1)), 2).unwrap();
    let raster = ViewportRect::sized(8, 8);
    assert_eq!(scheduler.generation(), Generation(0));
    scheduler.draw(raster, plane(), 10, 1).unwrap();
    scheduler.draw(raster, plane(), 10, 1).unwrap();
    let third = scheduler.draw(raster, plane(), 10, 1).unwrap();
    assert_eq!(third, Generation(3));
    assert_eq!(scheduler.generation(), third);
}

#[test]
fn redraw_replaces_busy_workers() {
    let (factory, _gate) = StampFactory::gated(1);
    let mut scheduler = RenderScheduler::new(Arc::new(factory), 3).unwrap();
    let raster = ViewportRect::sized(30, 30);

    scheduler.draw(raster, plane(), 10, 2).unwrap();
    assert!(scheduler.slots().iter().all(|s| s.busy));
    assert_eq!(scheduler.workers_spawned(), 3);

    scheduler.draw(raster, plane(), 10, 2).unwrap();
    assert_eq!(scheduler.workers_spawned(), 6);
    for slot in scheduler.slots() {
        assert!(slot.busy);
        assert_eq!(slot.bound_generation, Generation(2));
    }
}

#[test]
fn idle_workers_are_reused() {
    let mut scheduler = RenderScheduler::new(Arc::new(StampFactory::new(1)), 2).unwrap();
    let mut sink = RecordingSink::default();
    let raster = ViewportRect::sized(10, 10);
    scheduler.draw(raster, plane(), 10, 2).unwrap();
    settle(&mut scheduler, &mut sink);
    scheduler.draw(raster, plane(), 10, 2).unwrap();
    assert_eq!(scheduler.workers_spawned(), 2);
}

#[test]
fn superseded_passes_are_never_painted() {
    let (factory, gate) = StampFactory::gated(1);
    let mut scheduler = RenderScheduler::new(Arc::new(factory), 4).unwrap();
    let mut sink = RecordingSink::default();
    let raster = ViewportRect::sized(40, 40);

    scheduler.draw(raster, plane(), 10, 3).unwrap();
    for _ in 0..4 {
        gate.send(()).unwrap();
    }
    let started = Instant::now();
    while scheduler.pending_paints() == 0 {
        scheduler.pump(Duration::from_millis(5)).unwrap();
        assert!(started.elapsed() < Duration::from_secs(30));
    }

    // The first generation's paints are still waiting for the display.
    let second = scheduler.draw(raster, plane(), 10, 3).unwrap();
    assert_eq!(scheduler.pending_paints(), 0);
    assert_eq!(scheduler.present(&mut sink), 0);

    drop(gate);
    settle(&mut scheduler, &mut sink);
    let generations = sink.generations();
    assert!(!generations.is_empty());
    assert!(generations.iter().all(|g| *g == second));
}

#[test]
fn stale_results_are_discarded() {
    let mut scheduler = RenderScheduler::new(Arc::new(StampFactory::new(1)), 1).unwrap();
    let raster = ViewportRect::sized(4, 4);
    scheduler.draw(raster, plane(), 10, 1).unwrap();
    scheduler.draw(raster, plane(), 10, 1).unwrap();

    let stale = RenderResult {
        generation: Generation(1),
        band_index: 0,
        pixels: vec![0; 64],
        pass_index: 0,
        is_final_pass: true,
    };
    assert_eq!(scheduler.deliver(0, stale), Delivery::Stale);
    assert_eq!(scheduler.pending_paints(), 0);

    let current = RenderResult {
        generation: Generation(2),
        band_index: 0,
        pixels: vec![0; 64],
        pass_index: 0,
        is_final_pass: true,
    };
    assert_eq!(scheduler.deliver(0, current), Delivery::Scheduled);
    assert_eq!(scheduler.pending_paints(), 1);
    assert!(scheduler.is_idle());
}

#[test]
fn intermediate_passes_keep_the_worker_busy() {
    let mut scheduler = RenderScheduler::new(Arc::new(StampFactory::new(1)), 1).unwrap();
    let raster = ViewportRect::sized(4, 4);
    scheduler.draw(raster, plane(), 10, 2).unwrap();
    let early = RenderResult {
        generation: scheduler.generation(),
        band_index: 0,
        pixels: vec![0; 64],
        pass_index: 0,
        is_final_pass: false,
    };
    scheduler.deliver(0, early);
    assert!(!scheduler.is_idle());
}

#[test]
fn strips_paint_only_their_own_rows() {
    let mut scheduler = RenderScheduler::new(Arc::new(StampFactory::new(1)), 4).unwrap();
    let mut sink = RecordingSink::default();
    let strip = ViewportRect::new(0, 80, 20, 60);
    scheduler.draw(strip, plane(), 10, 2).unwrap();
    settle(&mut scheduler, &mut sink);

    let painted = sink.painted.lock().unwrap();
    for &(_, raster) in painted.iter() {
        assert_eq!(raster.left, 80);
        assert_eq!(raster.width, 20);
        assert!(raster.top + raster.height <= 60);
    }
    let mut tops: Vec<usize> = painted.iter().map(|p| p.1.top).collect();
    tops.sort();
    tops.dedup();
    assert_eq!(tops, vec![0, 15, 30, 45]);
}

#[test]
fn short_rasters_leave_spare_workers_idle() {
    let factory = StampFactory::new(1);
    let created = factory.created.clone();
    let mut scheduler = RenderScheduler::new(Arc::new(factory), 4).unwrap();
    let mut canvas = Canvas::new(6, 2);
    scheduler.draw(ViewportRect::sized(6, 2), plane(), 10, 1).unwrap();
    let busy = scheduler.slots().iter().filter(|s| s.busy).count();
    assert_eq!(busy, 2);
    settle(&mut scheduler, &mut canvas);
    assert_eq!(created.load(Ordering::SeqCst), 2);
    assert_eq!(canvas.pixel(5, 1)[0], 1);
}

#[test]
fn resizing_the_pool_changes_the_partition() {
    let mut scheduler = RenderScheduler::new(Arc::new(StampFactory::new(1)), 2).unwrap();
    let mut sink = RecordingSink::default();
    scheduler.resize_pool(5).unwrap();
    assert_eq!(scheduler.worker_count(), 5);
    scheduler.draw(ViewportRect::sized(10, 10), plane(), 10, 1).unwrap();
    settle(&mut scheduler, &mut sink);
    assert_eq!(sink.painted.lock().unwrap().len(), 5);
}
