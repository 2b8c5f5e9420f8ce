use serde_derive::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier linking detections of one object across frames.
///
/// Detection files carry either integer or string IDs; both are kept as-is.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(untagged)]
pub enum TrackId {
    Num(i64),
    Name(String),
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackId::Num(n) => write!(f, "{}", n),
            TrackId::Name(s) => f.write_str(s),
        }
    }
}

impl From<i64> for TrackId {
    fn from(n: i64) -> Self {
        TrackId::Num(n)
    }
}

impl From<&str> for TrackId {
    fn from(s: &str) -> Self {
        // keys of the `tracks` object are always strings
        match s.parse::<i64>() {
            Ok(n) => TrackId::Num(n),
            Err(_) => TrackId::Name(s.to_string()),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct TrailPoint {
    pub frame: u32,
    pub center: [f32; 2],
}

/// Recorded centers of one track, ordered by frame. Used for motion trails.
#[derive(Debug, Clone, Default)]
pub struct Trail {
    points: Vec<TrailPoint>,
}

impl Trail {
    pub fn new(mut points: Vec<TrailPoint>) -> Self {
        points.retain(|p| p.center.iter().all(|c| c.is_finite()));
        points.sort_by_key(|p| p.frame);

        Self { points }
    }

    /// The last `limit` points recorded at or before `frame`.
    pub fn upto(&self, frame: u32, limit: usize) -> &[TrailPoint] {
        let end = self.points.partition_point(|p| p.frame <= frame);
        let start = end.saturating_sub(limit);

        &self.points[start..end]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
