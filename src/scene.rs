use crate::config::OverlayConfig;
use crate::detections::Detections;
use crate::error::Error;
use crate::frame::FrameRecord;
use crate::smoother::TrackSmoother;

use std::sync::Arc;

/// Overlay state of one video: its detections and its own track histories.
#[derive(Debug, Clone)]
pub struct Scene {
    detections: Arc<Detections>,
    smoother: TrackSmoother,
}

impl Scene {
    pub fn new(detections: Arc<Detections>, config: &OverlayConfig) -> Result<Self, Error> {
        Ok(Self::with_smoother(detections, TrackSmoother::new(config)?))
    }

    pub fn with_smoother(detections: Arc<Detections>, smoother: TrackSmoother) -> Self {
        Self {
            detections,
            smoother,
        }
    }

    /// Best estimate of the boxes at `frame`.
    ///
    /// A recorded frame is smoothed and returned as is. Any other frame is
    /// interpolated between the bracketing keyframes and then smoothed. Both
    /// paths record the raw boxes in the track histories. `None` when `frame`
    /// is not covered by a keyframe pair.
    pub fn frame_data(&mut self, frame: i64) -> Option<FrameRecord> {
        let frame = u32::try_from(frame).ok()?;

        if let Some(record) = self.detections.get(frame) {
            return Some(self.smoother.apply_frame(record));
        }

        let interpolated = self.detections.interpolate(frame)?;

        Some(self.smoother.apply_frame(&interpolated))
    }

    /// Boxes at `seconds` of playback.
    pub fn frame_at(&mut self, seconds: f64) -> Option<FrameRecord> {
        let frame = self.detections.info().frame_at(seconds)?;

        self.frame_data(frame)
    }

    /// Drops all track histories, e.g. when playback ends.
    pub fn reset(&mut self) {
        self.smoother.clear();
    }

    #[inline]
    pub fn detections(&self) -> &Arc<Detections> {
        &self.detections
    }

    #[inline]
    pub fn smoother(&self) -> &TrackSmoother {
        &self.smoother
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bbox::BBox;
    use crate::detection::BoxRecord;
    use crate::detections::VideoInfo;
    use crate::track::TrackId;

    fn keyframe(frame_number: u32, boxes: &[(i64, f32, f32)]) -> FrameRecord {
        FrameRecord {
            frame_number,
            boxes: boxes
                .iter()
                .map(|&(id, x, c)| {
                    BoxRecord::new(BBox::ltrb(x, 0.0, x + 40.0, 80.0), c, Some(id.into()))
                })
                .collect(),
            is_keyframe: true,
        }
    }

    fn scene(frames: Vec<FrameRecord>) -> Scene {
        let info = VideoInfo {
            name: String::new(),
            width: 640,
            height: 480,
            fps: 30.0,
            total_frames: 120,
            frame_interval: 15,
        };

        Scene::new(
            Arc::new(Detections::new(info, frames).unwrap()),
            &OverlayConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn out_of_range_frames_give_nothing() {
        let mut s = scene(vec![keyframe(15, &[(1, 0.0, 0.9)]), keyframe(30, &[(1, 30.0, 0.9)])]);

        assert!(s.frame_data(-5).is_none());
        assert!(s.frame_data(0).is_none());
        assert!(s.frame_data(31).is_none());
        assert!(s.frame_data(i64::MAX).is_none());
        assert!(s.smoother().is_empty());
    }

    #[test]
    fn keyframe_hit_is_flagged_and_first_sighting_is_raw() {
        let mut s = scene(vec![keyframe(0, &[(1, 100.0, 0.9)]), keyframe(15, &[(1, 130.0, 0.9)])]);

        let f = s.frame_data(0).unwrap();
        assert!(f.is_keyframe);
        assert_eq!(f.boxes, s.detections().get(0).unwrap().boxes);
    }

    #[test]
    fn endpoints_are_keyframes_not_blends() {
        let frames = vec![keyframe(0, &[(1, 100.0, 0.9)]), keyframe(10, &[(1, 200.0, 0.5)])];
        let mut fresh = scene(frames.clone());
        let mut probe = scene(frames);

        // same history on both, then one asks for the keyframe itself
        fresh.frame_data(0);
        probe.frame_data(0);

        let at_next = probe.frame_data(10).unwrap();
        let detections = fresh.detections().clone();
        let expected = fresh.smoother.apply_frame(detections.get(10).unwrap());

        assert!(at_next.is_keyframe);
        assert_eq!(at_next, expected);
        assert_eq!(at_next.boxes[0].confidence, 0.5);
    }

    #[test]
    fn interpolated_frames_are_smoothed_and_recorded() {
        let mut s = scene(vec![keyframe(0, &[(1, 0.0, 0.9)]), keyframe(10, &[(1, 100.0, 0.9)])]);

        let mid = s.frame_data(5).unwrap();
        assert!(!mid.is_keyframe);
        assert_eq!(mid.frame_number, 5);
        // no history yet: eased midpoint exactly
        assert!((mid.boxes[0].bbox.left() - 50.0).abs() < 1e-3);

        let id = TrackId::Num(1);
        assert_eq!(s.smoother().history(&id).map(|h| h.len()), Some(1));

        let next = s.frame_data(6).unwrap();
        let raw = s.detections().interpolate(6).unwrap();
        assert!(next.boxes[0].bbox.left() < raw.boxes[0].bbox.left());
    }

    #[test]
    fn one_sided_tracks_never_appear_between_keyframes() {
        let mut s = scene(vec![
            keyframe(0, &[(1, 0.0, 0.9), (2, 300.0, 0.9)]),
            keyframe(10, &[(1, 10.0, 0.9), (3, 400.0, 0.9)]),
        ]);

        for f in 1..10 {
            let ids: Vec<_> = s
                .frame_data(f)
                .unwrap()
                .boxes
                .into_iter()
                .filter_map(|b| b.track_id)
                .collect();

            assert_eq!(ids, vec![TrackId::Num(1)]);
        }
    }

    #[test]
    fn reset_discards_history() {
        let mut s = scene(vec![keyframe(0, &[(1, 0.0, 0.9)])]);

        s.frame_at(0.0);
        assert_eq!(s.smoother().len(), 1);

        s.reset();
        assert!(s.smoother().is_empty());
    }

    #[test]
    fn invalid_config_is_refused() {
        let info = VideoInfo {
            name: String::new(),
            width: 640,
            height: 480,
            fps: 30.0,
            total_frames: 0,
            frame_interval: 0,
        };
        let detections = Arc::new(Detections::new(info, vec![]).unwrap());
        let config = OverlayConfig {
            smoothing_factor: 1.5,
            ..Default::default()
        };

        assert!(matches!(Scene::new(detections, &config), Err(Error::Config(_))));
    }
}
