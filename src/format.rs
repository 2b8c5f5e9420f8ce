//! Interchange format of the detections file.
//!
//! The file keeps each frame as parallel `boxes` / `confidences` /
//! `track_ids` arrays. They are checked for alignment here, once, and folded
//! into [`BoxRecord`] values. Frame entries and trails are decoded one at a
//! time so a single bad entry only costs that entry.

use crate::bbox::BBox;
use crate::detection::BoxRecord;
use crate::detections::{Detections, VideoInfo};
use crate::error::{Error, Malformed, Rejected};
use crate::frame::FrameRecord;
use crate::track::{TrackId, Trail, TrailPoint};

use serde_derive::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::warn;

type RawBox = Option<Vec<Option<f64>>>;

#[derive(Deserialize, Debug)]
pub(crate) struct RawDocument {
    video_info: VideoInfo,
    #[serde(default)]
    frames: BTreeMap<String, Value>,
    #[serde(default)]
    tracks: BTreeMap<String, Value>,
}

#[derive(Deserialize, Debug)]
struct RawFrame {
    #[serde(default)]
    boxes: Option<Vec<RawBox>>,
    #[serde(default)]
    confidences: Option<Vec<Option<f64>>>,
    #[serde(default)]
    track_ids: Option<Vec<Option<TrackId>>>,
    #[serde(default = "default_keyframe")]
    is_keyframe: bool,
}

fn default_keyframe() -> bool {
    true
}

pub(crate) fn decode(doc: RawDocument) -> Result<Detections, Error> {
    let mut rejected = Vec::new();
    let mut frames = Vec::with_capacity(doc.frames.len());

    for (key, value) in doc.frames {
        match decode_frame(&key, value, &mut rejected) {
            Ok(frame) => frames.push(frame),
            Err(reason) => reject(&mut rejected, &key, None, reason),
        }
    }

    let mut trails = HashMap::with_capacity(doc.tracks.len());
    for (key, value) in doc.tracks {
        match serde_json::from_value::<Vec<TrailPoint>>(value) {
            Ok(points) => {
                trails.insert(TrackId::from(key.as_str()), Trail::new(points));
            }
            Err(err) => warn!(track = %key, error = %err, "skipping track trail"),
        }
    }

    Ok(Detections::new(doc.video_info, frames)?
        .with_trails(trails)
        .with_rejected(rejected))
}

fn reject(rejected: &mut Vec<Rejected>, frame: &str, index: Option<usize>, reason: Malformed) {
    warn!(frame, ?index, %reason, "skipping malformed detection record");

    rejected.push(Rejected {
        frame: frame.to_string(),
        index,
        reason,
    });
}

fn decode_frame(
    key: &str,
    value: Value,
    rejected: &mut Vec<Rejected>,
) -> Result<FrameRecord, Malformed> {
    let frame_number = key.trim().parse::<u32>().map_err(|_| Malformed::FrameKey)?;
    let raw: RawFrame =
        serde_json::from_value(value).map_err(|e| Malformed::FrameShape(e.to_string()))?;

    let boxes = raw.boxes.ok_or(Malformed::MissingBoxes)?;
    let n = boxes.len();

    // an absent array means the producer did not record it; a short one is corrupt
    let confidences = raw.confidences.unwrap_or_else(|| vec![Some(1.0); n]);
    let track_ids = raw.track_ids.unwrap_or_else(|| vec![None; n]);

    if confidences.len() != n || track_ids.len() != n {
        return Err(Malformed::LengthMismatch {
            boxes: n,
            confidences: confidences.len(),
            track_ids: track_ids.len(),
        });
    }

    let mut seen = HashSet::with_capacity(n);
    let mut records = Vec::with_capacity(n);

    for (index, ((coords, confidence), track_id)) in boxes
        .into_iter()
        .zip(confidences)
        .zip(track_ids)
        .enumerate()
    {
        match decode_box(coords, confidence, track_id, &mut seen) {
            Ok(record) => records.push(record),
            Err(reason) => reject(rejected, key, Some(index), reason),
        }
    }

    Ok(FrameRecord {
        frame_number,
        boxes: records,
        is_keyframe: raw.is_keyframe,
    })
}

fn decode_box(
    coords: RawBox,
    confidence: Option<f64>,
    track_id: Option<TrackId>,
    seen: &mut HashSet<TrackId>,
) -> Result<BoxRecord, Malformed> {
    let coords = coords.ok_or(Malformed::BoxShape(0))?;
    let [x1, y1, x2, y2] = match coords.as_slice() {
        [a, b, c, d] => [*a, *b, *c, *d],
        _ => return Err(Malformed::BoxShape(coords.len())),
    };

    let mut xy = [0.0f32; 4];
    for (dst, src) in xy.iter_mut().zip([x1, y1, x2, y2]) {
        *dst = src.ok_or(Malformed::NonFinite)? as f32;
    }

    let bbox = BBox::ltrb(xy[0], xy[1], xy[2], xy[3]);
    if !bbox.is_finite() {
        return Err(Malformed::NonFinite);
    }

    let confidence = confidence.unwrap_or(0.0) as f32;
    if !confidence.is_finite() {
        return Err(Malformed::NonFinite);
    }

    if let Some(id) = &track_id {
        if !seen.insert(id.clone()) {
            return Err(Malformed::DuplicateTrack(id.to_string()));
        }
    }

    Ok(BoxRecord::new(bbox, confidence.clamp(0.0, 1.0), track_id))
}
