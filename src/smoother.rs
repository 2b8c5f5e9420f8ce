use crate::config::OverlayConfig;
use crate::detection::BoxRecord;
use crate::error::Error;
use crate::frame::FrameRecord;
use crate::history::TrackHistory;
use crate::math::Decay;
use crate::track::TrackId;

use std::collections::HashMap;

/// Per-track histories of one playback session and the smoothing over them.
#[derive(Debug, Clone)]
pub struct TrackSmoother {
    histories: HashMap<TrackId, TrackHistory>,
    history_length: usize,
    factor: f32,
    decay: Decay,
}

impl TrackSmoother {
    /// Fails when `config` would let the average leave the range of its inputs.
    pub fn new(config: &OverlayConfig) -> Result<Self, Error> {
        config.validate()?;

        Ok(Self {
            histories: HashMap::new(),
            history_length: config.history_length,
            factor: config.smoothing_factor,
            decay: config.decay,
        })
    }

    /// Smoothed copy of `record` without touching the history.
    pub fn smooth(&self, record: &BoxRecord) -> BoxRecord {
        let history = record
            .track_id
            .as_ref()
            .and_then(|id| self.histories.get(id));

        match history {
            Some(h) => record.with_bbox(h.smooth(&record.bbox, self.factor, self.decay)),
            None => record.clone(),
        }
    }

    /// Smooths `record` against its track, then records the raw box.
    pub fn apply(&mut self, record: &BoxRecord) -> BoxRecord {
        let smoothed = self.smooth(record);

        if let Some(id) = &record.track_id {
            let cap = self.history_length;

            self.histories
                .entry(id.clone())
                .or_insert_with(|| TrackHistory::with_capacity(cap))
                .push(&record.bbox);
        }

        smoothed
    }

    pub fn apply_frame(&mut self, frame: &FrameRecord) -> FrameRecord {
        FrameRecord {
            frame_number: frame.frame_number,
            boxes: frame.iter().map(|b| self.apply(b)).collect(),
            is_keyframe: frame.is_keyframe,
        }
    }

    #[inline]
    pub fn history(&self, id: &TrackId) -> Option<&TrackHistory> {
        self.histories.get(id)
    }

    /// Number of tracks with a history.
    #[inline]
    pub fn len(&self) -> usize {
        self.histories.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.histories.is_empty()
    }

    pub fn forget(&mut self, id: &TrackId) -> bool {
        self.histories.remove(id).is_some()
    }

    pub fn clear(&mut self) {
        self.histories.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bbox::BBox;

    fn rec(id: Option<i64>, x: f32) -> BoxRecord {
        BoxRecord::new(BBox::ltrb(x, 10.0, x + 50.0, 60.0), 0.9, id.map(Into::into))
    }

    fn config() -> OverlayConfig {
        OverlayConfig {
            history_length: 4,
            smoothing_factor: 0.8,
            ..Default::default()
        }
    }

    #[test]
    fn first_sighting_passes_through() {
        let mut s = TrackSmoother::new(&config()).unwrap();
        let raw = rec(Some(1), 123.0);

        assert_eq!(s.apply(&raw), raw);
        assert_eq!(s.history(&TrackId::Num(1)).map(|h| h.len()), Some(1));
    }

    #[test]
    fn untracked_boxes_are_untouched_and_unrecorded() {
        let mut s = TrackSmoother::new(&config()).unwrap();

        s.apply(&rec(None, 0.0));
        let out = s.apply(&rec(None, 100.0));

        assert_eq!(out, rec(None, 100.0));
        assert!(s.is_empty());
    }

    #[test]
    fn history_keeps_raw_boxes() {
        let mut s = TrackSmoother::new(&config()).unwrap();

        s.apply(&rec(Some(1), 0.0));
        let smoothed = s.apply(&rec(Some(1), 100.0));

        assert!(smoothed.bbox.left() < 100.0);
        assert_eq!(
            s.history(&TrackId::Num(1)).and_then(|h| h.latest()),
            Some(rec(Some(1), 100.0).bbox)
        );
    }

    #[test]
    fn history_is_bounded() {
        let cfg = config();
        let mut s = TrackSmoother::new(&cfg).unwrap();

        for i in 0..2 * cfg.history_length {
            s.apply(&rec(Some(7), i as f32));
            assert!(s.history(&TrackId::Num(7)).unwrap().len() <= cfg.history_length);
        }

        assert_eq!(s.history(&TrackId::Num(7)).unwrap().len(), cfg.history_length);
    }

    #[test]
    fn constant_track_converges_without_overshoot() {
        let cfg = config();
        let mut s = TrackSmoother::new(&cfg).unwrap();

        s.apply(&rec(Some(1), 0.0));

        let mut prev = 0.0;
        let mut last = 0.0;
        for _ in 0..=cfg.history_length {
            last = s.apply(&rec(Some(1), 200.0)).bbox.left();

            assert!(last >= prev - 1e-3);
            assert!(last <= 200.0 + 1e-3);
            prev = last;
        }

        assert!((last - 200.0).abs() < 1e-3);
    }

    #[test]
    fn tracks_are_independent() {
        let mut s = TrackSmoother::new(&config()).unwrap();

        s.apply(&rec(Some(1), 0.0));
        assert_eq!(s.apply(&rec(Some(2), 500.0)), rec(Some(2), 500.0));

        assert!(s.forget(&TrackId::Num(1)));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn refuses_factor_outside_unit_range() {
        for factor in [1.0, 1.5, -0.1, f32::NAN] {
            let cfg = OverlayConfig {
                smoothing_factor: factor,
                ..config()
            };

            assert!(matches!(TrackSmoother::new(&cfg), Err(Error::Config(_))));
        }

        let cfg = OverlayConfig {
            history_length: 0,
            ..config()
        };
        assert!(TrackSmoother::new(&cfg).is_err());
    }

    #[test]
    fn smoothed_box_stays_between_its_inputs() {
        let mut s = TrackSmoother::new(&config()).unwrap();

        s.apply(&rec(Some(1), 0.0));
        let left = s.apply(&rec(Some(1), 100.0)).bbox.left();

        assert!((0.0..=100.0).contains(&left));
    }
}
