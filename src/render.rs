use crate::bbox::{BBox, Ltwh};
use crate::config::OverlayConfig;
use crate::detections::Detections;
use crate::frame::FrameRecord;
use crate::track::TrackId;

use serde_derive::{Deserialize, Serialize};

/// On-screen size of the video element. Re-supply after every resize.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct DisplaySize {
    pub width: f32,
    pub height: f32,
}

impl DisplaySize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Overlay toggles of the player controls.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct OverlayOptions {
    pub show_boxes: bool,
    pub show_paths: bool,
    pub show_ids: bool,
    pub show_confidence: bool,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            show_boxes: true,
            show_paths: false,
            show_ids: false,
            show_confidence: false,
        }
    }
}

/// Draw command in display pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect {
        bbox: BBox<Ltwh>,
        track_id: Option<TrackId>,
    },
    Label {
        x: f32,
        y: f32,
        text: String,
    },
    Path {
        track_id: TrackId,
        points: Vec<[f32; 2]>,
    },
}

#[derive(Debug, Clone)]
pub struct Renderer {
    pub options: OverlayOptions,
    confidence_threshold: f32,
    trail_length: usize,
}

impl Renderer {
    pub fn new(config: &OverlayConfig, options: OverlayOptions) -> Self {
        Self {
            options,
            confidence_threshold: config.confidence_threshold,
            trail_length: config.trail_length,
        }
    }

    /// Draw commands for `frame` scaled from source to display pixels.
    ///
    /// Boxes under the confidence threshold or with non-finite corners are
    /// skipped. Nothing is drawn for an empty display.
    pub fn render(
        &self,
        frame: &FrameRecord,
        detections: &Detections,
        display: DisplaySize,
    ) -> Vec<Shape> {
        let info = detections.info();

        if !(display.width > 0.0 && display.height > 0.0) {
            return Vec::new();
        }

        let sx = display.width / info.width as f32;
        let sy = display.height / info.height as f32;
        if !sx.is_finite() || !sy.is_finite() {
            return Vec::new();
        }

        let mut shapes = Vec::new();

        if self.options.show_boxes {
            for record in frame.renderable(self.confidence_threshold) {
                let bbox = record.bbox.scaled(sx, sy);

                shapes.push(Shape::Rect {
                    bbox: bbox.as_ltwh(),
                    track_id: record.track_id.clone(),
                });

                let percent = record.confidence * 100.0;
                let OverlayOptions {
                    show_ids,
                    show_confidence,
                    ..
                } = self.options;

                let label = match (&record.track_id, show_ids, show_confidence) {
                    (Some(id), true, true) => Some(format!("#{} {:.0}%", id, percent)),
                    (Some(id), true, false) => Some(format!("#{}", id)),
                    (_, _, true) => Some(format!("{:.0}%", percent)),
                    _ => None,
                };

                if let Some(text) = label {
                    shapes.push(Shape::Label {
                        x: bbox.left(),
                        y: bbox.top(),
                        text,
                    });
                }
            }
        }

        if self.options.show_paths {
            for record in frame.renderable(self.confidence_threshold) {
                let id = match &record.track_id {
                    Some(id) => id,
                    None => continue,
                };

                let trail = match detections.trail(id) {
                    Some(trail) => trail.upto(frame.frame_number, self.trail_length),
                    None => continue,
                };

                if trail.len() < 2 {
                    continue;
                }

                shapes.push(Shape::Path {
                    track_id: id.clone(),
                    points: trail
                        .iter()
                        .map(|p| [p.center[0] * sx, p.center[1] * sy])
                        .collect(),
                });
            }
        }

        shapes
    }
}
