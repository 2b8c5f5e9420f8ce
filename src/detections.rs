use crate::detection::BoxRecord;
use crate::error::{Error, Rejected};
use crate::format;
use crate::frame::FrameRecord;
use crate::math;
use crate::track::{TrackId, Trail};

use serde_derive::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::path::Path;
use tracing::info;

/// Static metadata of the video the detections were computed against.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VideoInfo {
    #[serde(default)]
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    #[serde(default)]
    pub total_frames: u64,
    #[serde(default)]
    pub frame_interval: u32,
}

impl VideoInfo {
    /// Frame shown at `seconds` of playback, `floor(seconds * fps)`.
    #[inline]
    pub fn frame_at(&self, seconds: f64) -> Option<i64> {
        let frame = (seconds * self.fps).floor();

        if frame.is_finite() {
            Some(frame as i64)
        } else {
            None
        }
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(Error::VideoInfo(format!("fps must be positive, got {}", self.fps)));
        }

        if self.width == 0 || self.height == 0 {
            return Err(Error::VideoInfo(format!(
                "empty frame size {}x{}",
                self.width, self.height
            )));
        }

        Ok(())
    }
}

/// Sparse keyframe detections of one video, validated and read-only.
#[derive(Debug, Clone)]
pub struct Detections {
    info: VideoInfo,
    frames: BTreeMap<u32, FrameRecord>,
    trails: HashMap<TrackId, Trail>,
    rejected: Vec<Rejected>,
}

impl Detections {
    pub fn new<I>(info: VideoInfo, frames: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = FrameRecord>,
    {
        info.validate()?;

        Ok(Self {
            info,
            frames: frames.into_iter().map(|f| (f.frame_number, f)).collect(),
            trails: HashMap::new(),
            rejected: Vec::new(),
        })
    }

    pub fn with_trails(mut self, trails: HashMap<TrackId, Trail>) -> Self {
        self.trails = trails;
        self
    }

    pub(crate) fn with_rejected(mut self, rejected: Vec<Rejected>) -> Self {
        self.rejected = rejected;
        self
    }

    pub fn from_slice(data: &[u8]) -> Result<Self, Error> {
        format::decode(serde_json::from_slice(data)?)
    }

    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self, Error> {
        format::decode(serde_json::from_reader(reader)?)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let detections = Self::from_reader(std::io::BufReader::new(file))?;

        info!(
            path = %path.display(),
            frames = detections.len(),
            tracks = detections.trails.len(),
            rejected = detections.rejected.len(),
            "loaded detections"
        );

        Ok(detections)
    }

    #[inline]
    pub fn info(&self) -> &VideoInfo {
        &self.info
    }

    #[inline]
    pub fn get(&self, frame: u32) -> Option<&FrameRecord> {
        self.frames.get(&frame)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[inline]
    pub fn frames(&self) -> impl Iterator<Item = &FrameRecord> {
        self.frames.values()
    }

    #[inline]
    pub fn first_frame(&self) -> Option<u32> {
        self.frames.keys().next().copied()
    }

    #[inline]
    pub fn last_frame(&self) -> Option<u32> {
        self.frames.keys().next_back().copied()
    }

    #[inline]
    pub fn trail(&self, id: &TrackId) -> Option<&Trail> {
        self.trails.get(id)
    }

    #[inline]
    pub fn trails(&self) -> impl Iterator<Item = (&TrackId, &Trail)> {
        self.trails.iter()
    }

    /// Records dropped while decoding.
    #[inline]
    pub fn rejected(&self) -> &[Rejected] {
        &self.rejected
    }

    /// Greatest keyframe `<= frame` and smallest keyframe `> frame`.
    pub fn bracket(&self, frame: u32) -> Option<(&FrameRecord, &FrameRecord)> {
        let (_, prev) = self.frames.range(..=frame).next_back()?;
        let (_, next) = self
            .frames
            .range((Bound::Excluded(frame), Bound::Unbounded))
            .next()?;

        Some((prev, next))
    }

    /// Unsmoothed record synthesized between the two bracketing keyframes.
    ///
    /// Only tracks seen in both keyframes survive; boxes without a track ID
    /// cannot be paired and are dropped.
    pub fn interpolate(&self, frame: u32) -> Option<FrameRecord> {
        let (prev, next) = self.bracket(frame)?;
        let t = math::ease_in_out(math::progress(frame, prev.frame_number, next.frame_number));

        let boxes = prev
            .iter()
            .filter_map(|a| {
                let id = a.track_id.as_ref()?;
                let b = next.track(id)?;

                Some(BoxRecord::new(
                    a.bbox.lerp(&b.bbox, t),
                    math::lerp(a.confidence, b.confidence, t),
                    Some(id.clone()),
                ))
            })
            .collect();

        Some(FrameRecord {
            frame_number: frame,
            boxes,
            is_keyframe: false,
        })
    }
}

impl std::str::FromStr for Detections {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        format::decode(serde_json::from_str(s)?)
    }
}

/// Where the detections file of a video source is served from.
///
/// The first `/videos/` directory segment collapses to `/` and the file
/// extension becomes `_boxes.json`: `/videos/cam1.mp4` becomes
/// `/cam1_boxes.json`. A leading `videos/` of a relative source is kept.
pub fn detections_path(video_src: &str) -> String {
    let path = video_src.replacen("/videos/", "/", 1);
    let file_start = path.rfind('/').map_or(0, |idx| idx + 1);

    let stem_end = match path[file_start..].rfind('.') {
        Some(idx) if idx > 0 => file_start + idx,
        _ => path.len(),
    };

    format!("{}_boxes.json", &path[..stem_end])
}
