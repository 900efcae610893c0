//! Headless session: owns the controller, consumes its events and plays the
//! scripted zoom gestures the way the interactive panel would.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use tracing::{debug, error, info, warn};

use mandelzoom_core::{spawn_frame_loop, wheel_zoom_rect, AnimatorHandle, PixelDimensions, Rect, Viewport};
use mandelzoom_render::{
    default_presets, find_preset, ControllerConfig, GenerationController, GenerationEvent,
    GenerationState, PixelBuffer, Preset, RenderSettings, RenderedFrame, Result, SUPERSAMPLE_MULTIPLIER,
};

use crate::preferences::{Preferences, ZoomGesture};

/// How often a waiting session reports render progress.
const PROGRESS_INTERVAL: Duration = Duration::from_millis(250);

pub struct Session {
    controller: GenerationController,
    events: Receiver<GenerationEvent>,
    prefs: Preferences,
    dims: PixelDimensions,
    presets: Vec<Preset>,
    /// Latest delivered frame; zoom animations sample from it.
    current: Option<RenderedFrame>,
    /// `current` at display resolution.
    display: Option<PixelBuffer>,
    frames_received: usize,
}

impl Session {
    pub fn new(prefs: Preferences) -> Result<Self> {
        let dims = PixelDimensions::new(prefs.window_width, prefs.window_height)?;
        let config = ControllerConfig {
            tile_count: prefs.tile_count,
            chain_supersample: prefs.chain_supersample,
        };
        let (tx, events) = mpsc::channel();
        let controller = GenerationController::new(RenderSettings::new(Viewport::FULL, dims), config, tx)?;

        Ok(Self {
            controller,
            events,
            prefs,
            dims,
            presets: default_presets(),
            current: None,
            display: None,
            frames_received: 0,
        })
    }

    pub fn viewport(&self) -> Viewport {
        self.controller.settings().viewport()
    }

    pub fn display(&self) -> Option<&PixelBuffer> {
        self.display.as_ref()
    }

    pub fn frames_received(&self) -> usize {
        self.frames_received
    }

    /// Load a built-in preset by name. Unknown names fall back to the first
    /// preset.
    pub fn load_preset(&mut self, name: &str) -> Result<()> {
        let preset = match find_preset(&self.presets, name) {
            Some(p) => p,
            None => {
                warn!(name, "Unknown preset, using the default view");
                match self.presets.first() {
                    Some(p) => p,
                    None => return Ok(()),
                }
            }
        };
        self.controller.apply_preset(preset)?;
        info!(preset = %preset.name, "Loaded preset");
        Ok(())
    }

    /// Play the startup preset and every scripted gesture.
    pub fn run(&mut self) -> Result<()> {
        let preset = self.prefs.preset.clone();
        self.load_preset(&preset)?;
        self.render();

        let script = self.prefs.zoom_script.clone();
        for gesture in script {
            self.zoom(gesture)?;
        }
        Ok(())
    }

    /// Generate the current view and block until its last frame arrives.
    pub fn render(&mut self) {
        self.controller.start_generation(false);
        self.wait_for_frames();
    }

    /// Wheel-zoom at a panel pixel: crop, then animate the old frame towards
    /// the new view while the new view renders.
    pub fn zoom(&mut self, gesture: ZoomGesture) -> Result<()> {
        let Some(target) = wheel_zoom_rect(gesture.x, gesture.y, gesture.clicks, self.dims) else {
            debug!(?gesture, "Gesture has no effect");
            return Ok(());
        };
        if !self.controller.crop(target.x, target.y, target.right(), target.bottom()) {
            debug!(?gesture, "Zoom collapsed at the plane boundary");
            return Ok(());
        }
        info!(x = gesture.x, y = gesture.y, clicks = gesture.clicks, "Zooming");

        let animator = AnimatorHandle::new(Rect::full(self.dims), target, self.prefs.animation_frames)?;
        let scale = match &self.current {
            Some(frame) if frame.supersampled => SUPERSAMPLE_MULTIPLIER as i32,
            _ => 1,
        };
        let interval = Duration::from_millis(self.prefs.frame_interval_ms);
        let animation = spawn_frame_loop(animator, interval, move |rect| {
            let source = rect.scaled(scale);
            debug!(
                x = source.x,
                y = source.y,
                width = source.width,
                height = source.height,
                "Zoom frame"
            );
        });

        self.render();
        if animation.join().is_err() {
            warn!("Zoom animation thread panicked");
        }
        Ok(())
    }

    fn wait_for_frames(&mut self) {
        loop {
            match self.events.recv_timeout(PROGRESS_INTERVAL) {
                Ok(event) => {
                    if self.handle(event) {
                        return;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    if self.controller.state() == GenerationState::Idle {
                        // Events sent before going idle are already queued.
                        let pending: Vec<_> = self.events.try_iter().collect();
                        for event in pending {
                            self.handle(event);
                        }
                        return;
                    }
                    let (done, total) = self.controller.progress();
                    info!(rows_done = done, rows_total = total, "Rendering");
                }
                Err(RecvTimeoutError::Disconnected) => return,
            }
        }
    }

    /// Returns `true` once the generation chain has nothing more to deliver.
    fn handle(&mut self, event: GenerationEvent) -> bool {
        match event {
            GenerationEvent::Ready(frame) => {
                self.frames_received += 1;
                let last = frame.supersampled || !self.controller.config().chain_supersample;
                self.display = self.present(&frame);
                self.current = Some(frame);
                last
            }
            GenerationEvent::Failed { supersampled, error } => {
                error!(supersampled, "Generation failed: {error}");
                true
            }
            GenerationEvent::PaletteChanged => {
                debug!("Palette changed");
                false
            }
        }
    }

    fn present(&self, frame: &RenderedFrame) -> Option<PixelBuffer> {
        if !frame.supersampled {
            return Some(frame.buffer.clone());
        }
        match frame.buffer.downsample(SUPERSAMPLE_MULTIPLIER) {
            Ok(buffer) => Some(buffer),
            Err(e) => {
                error!("Failed to downsample frame: {e}");
                self.display.clone()
            }
        }
    }
}
