use crate::bbox::{BBox, Ltrb};
use crate::track::TrackId;

/// One detected object's box in one frame, in source-video pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxRecord {
    pub bbox: BBox<Ltrb>,
    pub confidence: f32,
    pub track_id: Option<TrackId>,
}

impl BoxRecord {
    pub fn new(bbox: BBox<Ltrb>, confidence: f32, track_id: Option<TrackId>) -> Self {
        Self {
            bbox: bbox.normalized(),
            confidence,
            track_id,
        }
    }

    /// Whether a drawing surface may show this box.
    #[inline]
    pub fn is_renderable(&self, confidence_threshold: f32) -> bool {
        self.confidence >= confidence_threshold && self.bbox.is_finite()
    }

    /// Same detection with the box replaced, e.g. after smoothing.
    #[inline]
    pub fn with_bbox(&self, bbox: BBox<Ltrb>) -> Self {
        Self {
            bbox: bbox.normalized(),
            confidence: self.confidence,
            track_id: self.track_id.clone(),
        }
    }
}
