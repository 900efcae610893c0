//! The generation controller: one render in flight, newer requests supersede
//! older ones, and a finished 1× render is followed by a 2× render of the
//! same view.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, error, info};

use mandelzoom_core::{PixelDimensions, Viewport};

use crate::buffer::PixelBuffer;
use crate::cancel::RenderCancel;
use crate::color::ColorStyle;
use crate::error::RenderError;
use crate::palette::Palette;
use crate::preset::Preset;
use crate::settings::{GenerationRequest, RenderSettings, SUPERSAMPLE_MULTIPLIER};
use crate::tile::{partition_rows, render_tiles, DEFAULT_TILE_COUNT};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Row bands per generation.
    pub tile_count: u32,
    /// Follow every successful 1× render with a 2× render of the same view.
    pub chain_supersample: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            tile_count: DEFAULT_TILE_COUNT,
            chain_supersample: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// A finished, uncancelled render.
#[derive(Debug, Clone)]
pub struct RenderedFrame {
    pub buffer: PixelBuffer,
    /// `true` if `buffer` is at [`SUPERSAMPLE_MULTIPLIER`]× resolution.
    pub supersampled: bool,
    pub viewport: Viewport,
    pub elapsed: Duration,
}

/// Receives the controller's notifications.
///
/// Callbacks run on the controller's supervisor thread. They must not call
/// back into the controller synchronously; forward to another thread (for
/// example through the [`mpsc::Sender`] implementation) instead.
pub trait GenerationObserver: Send + Sync {
    fn on_ready(&self, frame: RenderedFrame);

    /// A generation could not produce a buffer.
    fn on_failed(&self, supersampled: bool, error: RenderError) {
        error!(supersampled, "Generation failed: {error}");
    }

    /// The palette changed through a path that has no other notification.
    fn on_palette_changed(&self) {}
}

/// Notifications as values, for channel-based observers.
#[derive(Debug)]
pub enum GenerationEvent {
    Ready(RenderedFrame),
    Failed { supersampled: bool, error: RenderError },
    PaletteChanged,
}

impl GenerationObserver for mpsc::Sender<GenerationEvent> {
    fn on_ready(&self, frame: RenderedFrame) {
        let _ = self.send(GenerationEvent::Ready(frame));
    }

    fn on_failed(&self, supersampled: bool, error: RenderError) {
        let _ = self.send(GenerationEvent::Failed { supersampled, error });
    }

    fn on_palette_changed(&self) {
        let _ = self.send(GenerationEvent::PaletteChanged);
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationState {
    Idle,
    Generating,
    /// The buffer is being handed to the observer.
    Completed,
    /// A superseded buffer is being discarded.
    Cancelled,
}

struct Shared {
    config: ControllerConfig,
    settings: Mutex<RenderSettings>,
    state: Mutex<GenerationState>,
    state_changed: Condvar,
    cancel: RenderCancel,
    shutdown: AtomicBool,
    observer: Box<dyn GenerationObserver>,
}

impl Shared {
    fn lock_state(&self) -> MutexGuard<'_, GenerationState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_settings(&self) -> MutexGuard<'_, RenderSettings> {
        self.settings.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn wait<'a>(&self, guard: MutexGuard<'a, GenerationState>) -> MutexGuard<'a, GenerationState> {
        self.state_changed
            .wait(guard)
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, state: &mut GenerationState, next: GenerationState) {
        *state = next;
        self.state_changed.notify_all();
    }

    fn finish(&self) {
        let mut state = self.lock_state();
        self.set_state(&mut state, GenerationState::Idle);
    }

    /// Allocate and fill the buffer for `request`.
    fn render(&self, request: &GenerationRequest) -> crate::Result<PixelBuffer> {
        let dims = request.output_dims();
        let mut buffer = PixelBuffer::try_new(dims.width, dims.height)?;
        let jobs = partition_rows(dims.height, self.config.tile_count, request.multiplier);
        debug!(
            tiles = jobs.len(),
            width = dims.width,
            height = dims.height,
            multiplier = request.multiplier,
            "Dispatching tiles"
        );
        render_tiles(request, &jobs, &mut buffer, &self.cancel);
        Ok(buffer)
    }

    /// Runs on the supervisor thread until the generation, and any chained
    /// supersampled follow-up, is delivered or cancelled.
    fn supervise(&self, mut request: GenerationRequest) {
        loop {
            let started = Instant::now();
            let outcome = self.render(&request);
            let supersampled = request.is_supersampled();

            let mut state = self.lock_state();
            match (outcome, self.cancel.is_cancelled()) {
                (_, true) => {
                    self.set_state(&mut state, GenerationState::Cancelled);
                    drop(state);
                    debug!(supersampled, "Generation cancelled, discarding buffer");
                    self.finish();
                    return;
                }
                (Err(error), false) => {
                    self.set_state(&mut state, GenerationState::Completed);
                    drop(state);
                    self.observer.on_failed(supersampled, error);
                    self.finish();
                    return;
                }
                (Ok(buffer), false) => {
                    self.set_state(&mut state, GenerationState::Completed);
                    drop(state);
                    let elapsed = started.elapsed();
                    info!(
                        elapsed_ms = elapsed.as_millis(),
                        width = buffer.width,
                        height = buffer.height,
                        supersampled,
                        "Generation complete"
                    );
                    self.observer.on_ready(RenderedFrame {
                        buffer,
                        supersampled,
                        viewport: request.viewport,
                        elapsed,
                    });
                }
            }

            let mut state = self.lock_state();
            if supersampled || !self.config.chain_supersample || self.shutdown.load(Ordering::SeqCst) {
                self.set_state(&mut state, GenerationState::Idle);
                return;
            }
            request = request.supersampled();
            self.cancel.reset(request.output_dims().height as usize);
            self.set_state(&mut state, GenerationState::Generating);
            drop(state);
            debug!("Chaining supersampled generation");
        }
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Owns the render settings and the single in-flight generation.
pub struct GenerationController {
    shared: Arc<Shared>,
}

impl GenerationController {
    pub fn new<O>(settings: RenderSettings, config: ControllerConfig, observer: O) -> crate::Result<Self>
    where
        O: GenerationObserver + 'static,
    {
        if config.tile_count == 0 {
            return Err(RenderError::InvalidTileCount(config.tile_count));
        }
        Ok(Self {
            shared: Arc::new(Shared {
                config,
                settings: Mutex::new(settings),
                state: Mutex::new(GenerationState::Idle),
                state_changed: Condvar::new(),
                cancel: RenderCancel::new(),
                shutdown: AtomicBool::new(false),
                observer: Box::new(observer),
            }),
        })
    }

    pub fn config(&self) -> ControllerConfig {
        self.shared.config
    }

    /// A copy of the current settings.
    pub fn settings(&self) -> RenderSettings {
        self.shared.lock_settings().clone()
    }

    /// Mutate the settings in place. Renders already running are unaffected.
    pub fn update_settings<R>(&self, f: impl FnOnce(&mut RenderSettings) -> R) -> R {
        f(&mut self.shared.lock_settings())
    }

    /// Replace every setting; the new palette is reported to the observer.
    pub fn configure(
        &self,
        viewport: Viewport,
        pixel_dims: PixelDimensions,
        style: ColorStyle,
        max_iterations: u32,
        palette: Palette,
    ) -> crate::Result<()> {
        let mut settings = self.shared.lock_settings();
        settings.configure(viewport, pixel_dims, style, max_iterations, palette)?;
        self.shared.observer.on_palette_changed();
        Ok(())
    }

    pub fn set_max_iterations(&self, max_iterations: u32) -> crate::Result<()> {
        self.update_settings(|s| s.set_max_iterations(max_iterations))
    }

    pub fn set_style(&self, style: ColorStyle) {
        self.update_settings(|s| s.set_style(style));
    }

    /// Replace the palette and notify the observer in one step.
    pub fn set_palette(&self, palette: Palette) {
        let mut settings = self.shared.lock_settings();
        settings.set_palette(palette);
        self.shared.observer.on_palette_changed();
    }

    /// Load a preset; the palette swap is reported to the observer.
    pub fn apply_preset(&self, preset: &Preset) -> crate::Result<()> {
        let mut settings = self.shared.lock_settings();
        preset.apply(&mut settings)?;
        self.shared.observer.on_palette_changed();
        Ok(())
    }

    /// Crop the viewport to a pixel rectangle. Zero-area rectangles are
    /// ignored and return `false`; the caller decides whether to regenerate.
    pub fn crop(&self, x1: i32, y1: i32, x2: i32, y2: i32) -> bool {
        self.update_settings(|s| s.crop(x1, y1, x2, y2))
    }

    /// Start rendering the current settings, superseding any render in
    /// flight.
    ///
    /// Blocks only while a previous generation winds down (at most one row
    /// per tile), then returns while rendering continues in the background.
    pub fn start_generation(&self, supersample: bool) {
        let shared = &self.shared;
        let mut state = shared.lock_state();
        loop {
            match *state {
                GenerationState::Idle => break,
                GenerationState::Generating => {
                    debug!("Superseding in-flight generation");
                    shared.cancel.cancel();
                }
                GenerationState::Completed | GenerationState::Cancelled => {}
            }
            state = shared.wait(state);
        }

        let request = {
            let mut settings = shared.lock_settings();
            if settings.heal_palette() {
                shared.observer.on_palette_changed();
            }
            settings.request(if supersample { SUPERSAMPLE_MULTIPLIER } else { 1 })
        };
        debug!(
            x = request.viewport.x,
            y = request.viewport.y,
            width = request.viewport.width,
            height = request.viewport.height,
            supersample,
            "Starting generation"
        );

        shared.cancel.reset(request.output_dims().height as usize);
        shared.set_state(&mut state, GenerationState::Generating);
        drop(state);

        let worker = Arc::clone(shared);
        let spawned = thread::Builder::new()
            .name("mandelzoom-generation".into())
            .spawn(move || worker.supervise(request));
        if let Err(e) = spawned {
            shared.finish();
            shared.observer.on_failed(supersample, RenderError::Spawn(e));
        }
    }

    pub fn state(&self) -> GenerationState {
        *self.shared.lock_state()
    }

    pub fn is_generating(&self) -> bool {
        self.state() == GenerationState::Generating
    }

    /// Rows finished and total rows of the current generation.
    pub fn progress(&self) -> (usize, usize) {
        self.shared.cancel.progress()
    }

    /// Block until no generation is running, including chained ones.
    pub fn wait_idle(&self) {
        let mut state = self.shared.lock_state();
        while *state != GenerationState::Idle {
            state = self.shared.wait(state);
        }
    }

    /// Cancel whatever is running and wait for it to stop.
    pub fn cancel(&self) {
        let mut state = self.shared.lock_state();
        while *state != GenerationState::Idle {
            if *state == GenerationState::Generating {
                self.shared.cancel.cancel();
            }
            state = self.shared.wait(state);
        }
    }
}

impl Drop for GenerationController {
    fn drop(&mut self) {
        self.shared.shutdown.store(true, Ordering::SeqCst);
        self.cancel();
    }
}
