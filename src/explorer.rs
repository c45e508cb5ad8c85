//! The navigation layer.  Turns user commands (clicks, pans, going
//! back, changing settings) into render requests.  Every command is
//! checked before anything changes; a rejected command leaves the
//! location, the history and the scheduler exactly as they were.
use canvas::Sink;
use errors::CommandError;
use history::HistoryStack;
use kernel::KernelFactory;
use pan::{Direction, PanStep};
use planes::{plane_rect_for, screen_point_to_plane, NavigationState, PlaneRect, ViewportRect};
use request::Generation;
use scheduler::RenderScheduler;
use settings::{check_iterations, check_passes, check_workers, RenderSettings};
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Each click magnifies the view by this much.
pub const CLICK_ZOOM: f64 = 10.0;

/// One user command.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Input {
    /// Move a fifth of the view in a direction.
    Pan(Direction),
    /// Return to the previous location.
    Back,
    /// Return to the starting location.
    Reset,
    /// Zoom in on a raster position.
    Click(f64, f64),
    /// Change the magnification, keeping the center.
    Zoom(f64),
    /// Change the iteration budget.
    Iterations(u32),
    /// Change the number of interlaced passes.
    Passes(u32),
    /// Change the number of workers.
    Threads(usize),
    /// Go to an exact location.
    Jump(NavigationState),
}

fn parse_pair(s: &str) -> Option<(f64, f64)> {
    let index = s.find(',')?;
    match (f64::from_str(&s[..index]), f64::from_str(&s[index + 1..])) {
        (Ok(l), Ok(r)) => Some((l, r)),
        _ => None,
    }
}

impl FromStr for Input {
    type Err = String;

    /// Parses the keys `w a s d q e`, or `name:value` for the commands
    /// that take an argument: `click:X,Y`, `zoom:Z`, `iter:N`,
    /// `passes:N`, `threads:N` and `at:X,Y,ZOOM`.
    fn from_str(s: &str) -> Result<Input, String> {
        match s {
            "q" | "back" => return Ok(Input::Back),
            "e" | "reset" => return Ok(Input::Reset),
            _ => {}
        }
        if let Ok(direction) = Direction::from_str(s) {
            return Ok(Input::Pan(direction));
        }

        let bad = || format!("could not parse input '{}'", s);
        let index = s.find(':').ok_or_else(bad)?;
        let (name, value) = (&s[..index], &s[index + 1..]);
        match name {
            "click" => parse_pair(value)
                .map(|(x, y)| Input::Click(x, y))
                .ok_or_else(bad),
            "zoom" => f64::from_str(value).map(Input::Zoom).map_err(|_| bad()),
            "iter" => u32::from_str(value).map(Input::Iterations).map_err(|_| bad()),
            "passes" => u32::from_str(value).map(Input::Passes).map_err(|_| bad()),
            "threads" => usize::from_str(value).map(Input::Threads).map_err(|_| bad()),
            "at" => NavigationState::from_str(value).map(Input::Jump),
            _ => Err(bad()),
        }
    }
}

/// Owns the location, the history, the settings, the scheduler and
/// the sink the scheduler paints on.
pub struct Explorer<S: Sink> {
    scheduler: RenderScheduler,
    sink: S,
    viewport: ViewportRect,
    state: NavigationState,
    history: HistoryStack,
    settings: RenderSettings,
}

fn check_location(state: &NavigationState) -> Result<(), CommandError> {
    if state.is_valid() {
        Ok(())
    } else {
        Err(CommandError::InvalidLocation(
            state.center_x,
            state.center_y,
            state.zoom,
        ))
    }
}

fn check_viewport(viewport: &ViewportRect) -> Result<(), CommandError> {
    if viewport.is_empty() {
        Err(CommandError::EmptyViewport(viewport.width, viewport.height))
    } else {
        Ok(())
    }
}

impl<S: Sink> Explorer<S> {
    /// Set up an explorer looking at `state` through `viewport`.
    /// Nothing is rendered until the first command or `render`.
    pub fn new(
        factory: Arc<dyn KernelFactory>,
        mut sink: S,
        viewport: ViewportRect,
        state: NavigationState,
        settings: RenderSettings,
    ) -> Result<Explorer<S>, CommandError> {
        check_viewport(&viewport)?;
        check_location(&state)?;
        settings.validate()?;
        sink.resize(viewport.left + viewport.width, viewport.top + viewport.height);
        Ok(Explorer {
            scheduler: RenderScheduler::new(factory, settings.workers)?,
            sink,
            viewport,
            state,
            history: HistoryStack::new(),
            settings,
        })
    }

    /// The current location.
    pub fn state(&self) -> NavigationState {
        self.state
    }

    /// Where the explorer has been.
    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    /// The raster rectangle being rendered into.
    pub fn viewport(&self) -> ViewportRect {
        self.viewport
    }

    /// The current settings.
    pub fn settings(&self) -> RenderSettings {
        self.settings
    }

    /// The scheduler doing the work.
    pub fn scheduler(&self) -> &RenderScheduler {
        &self.scheduler
    }

    /// The surface everything is painted on.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// The rectangle of the complex plane the viewport shows.
    pub fn plane_rect(&self) -> PlaneRect {
        plane_rect_for(&self.state, self.viewport.aspect_ratio())
    }

    /// Render the current location over the whole viewport.
    pub fn render(&mut self) -> Result<Generation, CommandError> {
        let plane = self.plane_rect();
        let generation = self.scheduler.draw(
            self.viewport,
            plane,
            self.settings.iterations,
            self.settings.passes,
        )?;
        Ok(generation)
    }

    /// Render `state` into `raster` with the given budget.  The raster
    /// becomes the new viewport, and the settings are updated.
    pub fn request_full_render(
        &mut self,
        raster: ViewportRect,
        state: NavigationState,
        iterations: u32,
        passes: u32,
    ) -> Result<Generation, CommandError> {
        check_viewport(&raster)?;
        check_location(&state)?;
        check_iterations(iterations)?;
        check_passes(passes)?;

        if raster != self.viewport {
            self.sink
                .resize(raster.left + raster.width, raster.top + raster.height);
            self.viewport = raster;
        }
        self.state = state;
        self.settings.iterations = iterations;
        self.settings.passes = passes;
        self.render()
    }

    /// Go to `state`, remembering where we were.
    pub fn jump_to(&mut self, state: NavigationState) -> Result<Generation, CommandError> {
        check_location(&state)?;
        self.history.push(self.state);
        self.state = state;
        self.render()
    }

    /// Zoom in on the raster position `(x, y)`: it becomes the new
    /// center and the magnification grows tenfold.
    pub fn zoom_at(&mut self, x: f64, y: f64) -> Result<Generation, CommandError> {
        let (width, height) = (self.viewport.width, self.viewport.height);
        let on_raster = x.is_finite()
            && y.is_finite()
            && x >= 0.0
            && y >= 0.0
            && x <= width as f64
            && y <= height as f64;
        if !on_raster {
            return Err(CommandError::OffRaster {
                x,
                y,
                width,
                height,
            });
        }
        let point = screen_point_to_plane(&self.plane_rect(), &self.viewport, x, y);
        self.jump_to(NavigationState::new(
            point.re,
            point.im,
            self.state.zoom * CLICK_ZOOM,
        ))
    }

    /// Return to the previous location.  Returns false, and does
    /// nothing, when there is no history.
    pub fn back(&mut self) -> Result<bool, CommandError> {
        match self.history.pop() {
            Some(state) => {
                self.state = state;
                self.render()?;
                Ok(true)
            }
            None => {
                debug!("no history to go back to");
                Ok(false)
            }
        }
    }

    /// Return to the starting location.
    pub fn reset(&mut self) -> Result<Generation, CommandError> {
        self.jump_to(NavigationState::default())
    }

    /// Move the view a fifth of the way in `direction`, reusing the
    /// pixels that stay visible and rendering only the exposed strip.
    /// Dropped, returning false, if any worker is still busy.
    pub fn request_pan(&mut self, direction: Direction) -> Result<bool, CommandError> {
        if !self.scheduler.is_idle() || self.scheduler.has_failed() {
            debug!("workers busy, dropping pan {:?}", direction);
            return Ok(false);
        }

        let step = PanStep::new(direction, &self.viewport, &self.plane_rect());
        let moved = self.state.translated(step.delta_x, step.delta_y);
        check_location(&moved)?;

        // Anything still waiting for the display belongs on the raster
        // before it moves.
        self.scheduler.present(&mut self.sink);

        self.history.push(self.state);
        self.state = moved;
        let plane = self.plane_rect();
        self.sink.translate(step.keep, step.keep_to.0, step.keep_to.1);
        self.scheduler.draw(
            step.strip,
            step.strip_plane(&self.viewport, &plane),
            self.settings.iterations,
            self.settings.passes,
        )?;
        Ok(true)
    }

    /// Change the iteration budget and re-render.
    pub fn set_iterations(&mut self, iterations: u32) -> Result<Generation, CommandError> {
        check_iterations(iterations)?;
        self.settings.iterations = iterations;
        self.render()
    }

    /// Change the number of passes and re-render.
    pub fn set_passes(&mut self, passes: u32) -> Result<Generation, CommandError> {
        check_passes(passes)?;
        self.settings.passes = passes;
        self.render()
    }

    /// Change the number of workers and re-render.
    pub fn resize_worker_pool(&mut self, workers: usize) -> Result<Generation, CommandError> {
        check_workers(workers)?;
        self.scheduler.resize_pool(workers)?;
        self.settings.workers = workers;
        self.render()
    }

    /// The display changed size.  Keeps the location and re-renders.
    pub fn resize_viewport(&mut self, width: usize, height: usize) -> Result<Generation, CommandError> {
        let viewport = ViewportRect::sized(width, height);
        check_viewport(&viewport)?;
        self.sink.resize(width, height);
        self.viewport = viewport;
        self.render()
    }

    /// Carry out one input.
    pub fn apply(&mut self, input: Input) -> Result<(), CommandError> {
        match input {
            Input::Pan(direction) => {
                self.request_pan(direction)?;
            }
            Input::Back => {
                self.back()?;
            }
            Input::Reset => {
                self.reset()?;
            }
            Input::Click(x, y) => {
                self.zoom_at(x, y)?;
            }
            Input::Zoom(zoom) => {
                let state = NavigationState::new(self.state.center_x, self.state.center_y, zoom);
                self.jump_to(state)?;
            }
            Input::Iterations(iterations) => {
                self.set_iterations(iterations)?;
            }
            Input::Passes(passes) => {
                self.set_passes(passes)?;
            }
            Input::Threads(workers) => {
                self.resize_worker_pool(workers)?;
            }
            Input::Jump(state) => {
                self.jump_to(state)?;
            }
        }
        Ok(())
    }

    /// Wait up to `timeout` for worker deliveries and handle them.
    pub fn pump(&mut self, timeout: Duration) -> Result<usize, CommandError> {
        Ok(self.scheduler.pump(timeout)?)
    }

    /// Paint everything that has been delivered.
    pub fn present(&mut self) -> usize {
        self.scheduler.present(&mut self.sink)
    }

    /// Run the event loop, one refresh every `frame`, until every
    /// worker is done and everything is painted.  Gives up and returns
    /// false after `limit`.
    pub fn settle(&mut self, frame: Duration, limit: Duration) -> Result<bool, CommandError> {
        let started = Instant::now();
        loop {
            self.pump(frame)?;
            self.present();
            let finished = self.scheduler.is_idle() || self.scheduler.has_failed();
            if finished && self.scheduler.pending_paints() == 0 {
                return Ok(true);
            }
            if started.elapsed() >= limit {
                return Ok(false);
            }
        }
    }

    /// Give up the sink.
    pub fn into_sink(self) -> S {
        self.sink
    }
}
