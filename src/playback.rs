use crate::config::OverlayConfig;
use crate::detections::Detections;
use crate::error::Error;
use crate::render::{DisplaySize, OverlayOptions, Renderer, Shape};
use crate::scene::Scene;
use crate::smoother::TrackSmoother;

use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Host hook for "call me on the next display refresh".
pub trait FrameScheduler {
    type Handle: Copy + fmt::Debug;

    fn request(&mut self) -> Self::Handle;
    fn cancel(&mut self, handle: Self::Handle);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Playing,
    Paused,
    Ended,
}

/// Per-frame overlay redraw bound to one video element.
///
/// While playing, exactly one frame callback is pending; every `tick`
/// consumes it and arms the next one. Pausing, ending and dropping the loop
/// cancel the pending callback.
pub struct PlaybackLoop<S: FrameScheduler> {
    scheduler: S,
    pending: Option<S::Handle>,
    state: PlaybackState,
    smoother: TrackSmoother,
    renderer: Renderer,
    scene: Option<Scene>,
    display: DisplaySize,
    error: Option<String>,
}

impl<S: FrameScheduler> PlaybackLoop<S> {
    /// Fails on a config the smoother refuses; no callback is requested.
    pub fn new(
        scheduler: S,
        config: &OverlayConfig,
        options: OverlayOptions,
    ) -> Result<Self, Error> {
        Ok(Self {
            scheduler,
            pending: None,
            state: PlaybackState::Idle,
            smoother: TrackSmoother::new(config)?,
            renderer: Renderer::new(config, options),
            scene: None,
            display: DisplaySize::default(),
            error: None,
        })
    }

    /// Installs the outcome of loading this video's detections.
    ///
    /// A failure disables the overlay and is kept for display; playback
    /// itself carries on.
    pub fn set_detections(&mut self, loaded: Result<Arc<Detections>, Error>) {
        match loaded {
            Ok(detections) => {
                self.scene = Some(Scene::with_smoother(detections, self.smoother.clone()));
                self.error = None;
            }
            Err(err) => {
                warn!(error = %err, "overlay disabled");
                self.scene = None;
                self.error = Some(err.to_string());
            }
        }
    }

    #[inline]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[inline]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    #[inline]
    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    #[inline]
    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    #[inline]
    pub fn options_mut(&mut self) -> &mut OverlayOptions {
        &mut self.renderer.options
    }

    #[inline]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn resize(&mut self, display: DisplaySize) {
        self.display = display;
    }

    pub fn play(&mut self) {
        self.state = PlaybackState::Playing;
        self.arm();
    }

    pub fn pause(&mut self) {
        self.state = PlaybackState::Paused;
        self.cancel();
    }

    /// Stops redrawing and forgets the track histories of this playback.
    pub fn end(&mut self) {
        self.state = PlaybackState::Ended;
        self.cancel();

        if let Some(scene) = &mut self.scene {
            scene.reset();
        }
    }

    /// Runs the frame callback at `current_time` seconds of playback.
    ///
    /// Returns what the surface should show after clearing it; empty when
    /// there is nothing to draw.
    pub fn tick(&mut self, current_time: f64) -> Vec<Shape> {
        self.pending = None;

        if self.state != PlaybackState::Playing {
            return Vec::new();
        }

        let shapes = self.draw(current_time);
        self.arm();

        shapes
    }

    fn draw(&mut self, current_time: f64) -> Vec<Shape> {
        let scene = match &mut self.scene {
            Some(scene) => scene,
            None => return Vec::new(),
        };

        match scene.frame_at(current_time) {
            Some(frame) => self.renderer.render(&frame, scene.detections(), self.display),
            None => Vec::new(),
        }
    }

    fn arm(&mut self) {
        if self.pending.is_none() {
            let handle = self.scheduler.request();
            debug!(?handle, "frame callback armed");
            self.pending = Some(handle);
        }
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            debug!(?handle, "frame callback cancelled");
            self.scheduler.cancel(handle);
        }
    }
}

impl<S: FrameScheduler> Drop for PlaybackLoop<S> {
    fn drop(&mut self) {
        self.cancel();
    }
}
