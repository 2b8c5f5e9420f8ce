use thiserror::Error;

/// Failures that leave a video without overlay data.
#[derive(Debug, Error)]
pub enum Error {
    #[error("detections unavailable: {0}")]
    Io(#[from] std::io::Error),

    #[error("detections unavailable: malformed document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("detections unavailable: invalid video info: {0}")]
    VideoInfo(String),

    #[error("invalid overlay config: {0}")]
    Config(String),
}

/// Why a single frame or box was dropped while loading.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Malformed {
    #[error("frame key is not a frame number")]
    FrameKey,

    #[error("frame entry does not decode: {0}")]
    FrameShape(String),

    #[error("frame has no boxes")]
    MissingBoxes,

    #[error("array lengths differ: {boxes} boxes, {confidences} confidences, {track_ids} ids")]
    LengthMismatch {
        boxes: usize,
        confidences: usize,
        track_ids: usize,
    },

    #[error("box has {0} coordinates")]
    BoxShape(usize),

    #[error("non-finite value")]
    NonFinite,

    #[error("track {0} repeated in frame")]
    DuplicateTrack(String),
}

/// A record skipped at load time. `index` is set when only one box was dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejected {
    pub frame: String,
    pub index: Option<usize>,
    pub reason: Malformed,
}
