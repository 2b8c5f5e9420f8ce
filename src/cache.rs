use crate::detections::{detections_path, Detections};
use crate::error::Error;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

/// Fetches the detections file at a derived path.
pub trait Loader {
    fn load(&self, path: &str) -> Result<Detections, Error>;
}

/// Serves derived paths from a directory, like the static file server would.
#[derive(Debug, Clone)]
pub struct FsLoader {
    root: PathBuf,
}

impl FsLoader {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }
}

impl Loader for FsLoader {
    fn load(&self, path: &str) -> Result<Detections, Error> {
        Detections::open(self.root.join(path.trim_start_matches('/')))
    }
}

/// Caller-owned memo of loaded detections, keyed by video source.
///
/// Failed loads are not remembered; the next `load` tries again.
pub struct DetectionsCache<L: Loader> {
    loader: L,
    entries: HashMap<String, Arc<Detections>>,
}

impl<L: Loader> DetectionsCache<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            entries: HashMap::new(),
        }
    }

    pub fn load(&mut self, video_src: &str) -> Result<Arc<Detections>, Error> {
        if let Some(hit) = self.entries.get(video_src) {
            debug!(src = video_src, "detections cache hit");
            return Ok(hit.clone());
        }

        let path = detections_path(video_src);
        let detections = match self.loader.load(&path) {
            Ok(d) => Arc::new(d),
            Err(err) => {
                warn!(src = video_src, %path, error = %err, "detections unavailable");
                return Err(err);
            }
        };

        self.entries
            .insert(video_src.to_string(), detections.clone());

        Ok(detections)
    }

    #[inline]
    pub fn get(&self, video_src: &str) -> Option<Arc<Detections>> {
        self.entries.get(video_src).cloned()
    }

    pub fn invalidate(&mut self, video_src: &str) -> bool {
        self.entries.remove(video_src).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn loader(&self) -> &L {
        &self.loader
    }
}
