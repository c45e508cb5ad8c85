#[macro_use]
extern crate itertools;
extern crate mandelzoom;
extern crate rand;

use mandelzoom::pan::PanStep;
use mandelzoom::{plane_rect_for, screen_point_to_plane, Direction, NavigationState, ViewportRect};
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;

const DIRECTIONS: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
];

fn random_states(count: usize) -> Vec<(NavigationState, ViewportRect)> {
    let mut rng = StdRng::seed_from_u64(0x6d61_6e64);
    let centers = Uniform::new_inclusive(-2.0, 2.0);
    // Log-uniform magnification, from far out to well in.
    let exponents = Uniform::new_inclusive(-3.0_f64, 3.0);
    let sides = Uniform::new_inclusive(1usize, 1200);
    (0..count)
        .map(|_| {
            let state = NavigationState::new(
                centers.sample(&mut rng),
                centers.sample(&mut rng),
                10.0_f64.powf(exponents.sample(&mut rng)),
            );
            let viewport = ViewportRect::sized(sides.sample(&mut rng), sides.sample(&mut rng));
            (state, viewport)
        })
        .collect()
}

fn close(a: f64, b: f64, scale: f64) -> bool {
    (a - b).abs() <= 1e-9 * scale.max(1.0)
}

#[test]
fn raster_center_is_the_navigation_center() {
    for (state, viewport) in random_states(500) {
        let plane = plane_rect_for(&state, viewport.aspect_ratio());
        let point = screen_point_to_plane(
            &plane,
            &viewport,
            viewport.width as f64 / 2.0,
            viewport.height as f64 / 2.0,
        );
        assert!(close(point.re, state.center_x, plane.width), "{} {:?}", state, viewport);
        assert!(close(point.im, state.center_y, plane.height), "{} {:?}", state, viewport);
    }
}

#[test]
fn shorter_side_spans_two_over_zoom() {
    for (state, viewport) in random_states(500) {
        let plane = plane_rect_for(&state, viewport.aspect_ratio());
        let span = 2.0 / state.zoom;
        let shorter = plane.width.min(plane.height);
        assert!(close(shorter, span, span), "{} {:?}", state, viewport);
        let units_x = plane.width / viewport.width as f64;
        let units_y = plane.height / viewport.height as f64;
        assert!(close(units_x, units_y, units_x), "pixels are not square at {}", state);
    }
}

#[test]
fn corners_map_to_the_plane_rectangle() {
    for (state, viewport) in random_states(200) {
        let plane = plane_rect_for(&state, viewport.aspect_ratio());
        let top_left = screen_point_to_plane(&plane, &viewport, 0.0, 0.0);
        let bottom_right = screen_point_to_plane(
            &plane,
            &viewport,
            viewport.width as f64,
            viewport.height as f64,
        );
        assert_eq!(top_left.re, plane.left);
        assert_eq!(top_left.im, plane.top);
        assert!(close(bottom_right.re, plane.left + plane.width, plane.width));
        assert!(close(bottom_right.im, plane.top - plane.height, plane.height));
    }
}

#[test]
fn panned_pixels_keep_their_plane_coordinates() {
    let sizes = [(800, 600), (640, 480), (7, 300), (301, 5), (4, 4), (1, 9)];
    let state = NavigationState::new(-0.743, 0.131, 25.0);
    for (&(width, height), &direction) in iproduct!(sizes.iter(), DIRECTIONS.iter()) {
        let viewport = ViewportRect::sized(width, height);
        let plane = plane_rect_for(&state, viewport.aspect_ratio());
        let step = PanStep::new(direction, &viewport, &plane);
        let moved_state = state.translated(step.delta_x, step.delta_y);
        let moved = plane_rect_for(&moved_state, viewport.aspect_ratio());

        // Every kept pixel shows the same point after it is moved.
        let (dx, dy) = (
            step.keep_to.0 as f64 - step.keep.left as f64,
            step.keep_to.1 as f64 - step.keep.top as f64,
        );
        let corners = [
            (step.keep.left, step.keep.top),
            (step.keep.left + step.keep.width, step.keep.top + step.keep.height),
        ];
        for &(x, y) in &corners {
            let before = screen_point_to_plane(&plane, &viewport, x as f64, y as f64);
            let after = screen_point_to_plane(&moved, &viewport, x as f64 + dx, y as f64 + dy);
            assert!(close(before.re, after.re, plane.width), "{}x{} {:?}", width, height, direction);
            assert!(close(before.im, after.im, plane.height), "{}x{} {:?}", width, height, direction);
        }

        // The strip and the kept pixels tile the viewport.
        assert_eq!(step.keep.len() + step.strip.len(), viewport.len());
        let strip = step.strip_plane(&viewport, &moved);
        let corner = screen_point_to_plane(
            &moved,
            &viewport,
            step.strip.left as f64,
            step.strip.top as f64,
        );
        assert!(close(strip.left, corner.re, plane.width));
        assert!(close(strip.top, corner.im, plane.height));
    }
}
