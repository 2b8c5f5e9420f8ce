pub mod bbox;
pub mod cache;
pub mod config;
pub mod detection;
pub mod detections;
pub mod error;
pub mod frame;
pub mod history;
pub mod math;
pub mod playback;
pub mod render;
pub mod scene;
pub mod smoother;
pub mod track;

mod format;

pub use config::OverlayConfig;
pub use detection::BoxRecord;
pub use detections::{detections_path, Detections, VideoInfo};
pub use error::Error;
pub use frame::FrameRecord;
pub use track::TrackId;

use scene::Scene;
use smoother::TrackSmoother;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

pub trait Float: num_traits::Float + num_traits::FloatConst + fmt::Debug + 'static {}

impl<T> Float for T where T: num_traits::Float + num_traits::FloatConst + fmt::Debug + 'static {}

/// Handle of one player's overlay session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session#{}", self.0)
    }
}

/// Overlay sessions, one per player.
pub trait Tracking {
    fn attach(&mut self, src: &str, detections: Arc<Detections>) -> SessionId;
    fn detach(&mut self, session: SessionId) -> bool;
    fn frame(&mut self, session: SessionId, frame: i64) -> Option<FrameRecord>;
    fn frame_at(&mut self, session: SessionId, seconds: f64) -> Option<FrameRecord>;
}

/// One [`Scene`] per player, so every tile of a camera grid smooths on its
/// own even when two tiles show the same video.
pub struct SceneTracker {
    scenes: HashMap<SessionId, Scene>,
    smoother: TrackSmoother,
    next_id: u64,
}

impl SceneTracker {
    pub fn new(config: &OverlayConfig) -> Result<Self, Error> {
        Ok(Self {
            scenes: HashMap::new(),
            smoother: TrackSmoother::new(config)?,
            next_id: 0,
        })
    }

    #[inline]
    pub fn scene(&self, session: SessionId) -> Option<&Scene> {
        self.scenes.get(&session)
    }

    /// Forgets the track histories of `session`, keeping its detections.
    pub fn reset(&mut self, session: SessionId) {
        if let Some(scene) = self.scenes.get_mut(&session) {
            scene.reset();
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}

impl crate::Tracking for SceneTracker {
    fn attach(&mut self, src: &str, detections: Arc<Detections>) -> SessionId {
        let session = SessionId(self.next_id);
        self.next_id += 1;

        debug!(src, %session, frames = detections.len(), "scene attached");

        let scene = Scene::with_smoother(detections, self.smoother.clone());
        self.scenes.insert(session, scene);

        session
    }

    fn detach(&mut self, session: SessionId) -> bool {
        self.scenes.remove(&session).is_some()
    }

    #[inline]
    fn frame(&mut self, session: SessionId, frame: i64) -> Option<FrameRecord> {
        self.scenes.get_mut(&session)?.frame_data(frame)
    }

    #[inline]
    fn frame_at(&mut self, session: SessionId, seconds: f64) -> Option<FrameRecord> {
        self.scenes.get_mut(&session)?.frame_at(seconds)
    }
}
