use crate::detection::BoxRecord;
use crate::track::TrackId;

/// Detections for one frame number, either recorded or synthesized.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRecord {
    pub frame_number: u32,
    pub boxes: Vec<BoxRecord>,
    pub is_keyframe: bool,
}

impl FrameRecord {
    #[inline]
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &BoxRecord> {
        self.boxes.iter()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn track(&self, id: &TrackId) -> Option<&BoxRecord> {
        self.boxes.iter().find(|b| b.track_id.as_ref() == Some(id))
    }

    /// Boxes a drawing surface may show at the given threshold.
    pub fn renderable(&self, confidence_threshold: f32) -> impl Iterator<Item = &BoxRecord> {
        self.boxes
            .iter()
            .filter(move |b| b.is_renderable(confidence_threshold))
    }
}
