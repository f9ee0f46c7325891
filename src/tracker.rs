use opencv::core::Mat;

use crate::bbox::{BBox, Ltrb};
use crate::config::TrackerConfig;
use crate::detection::Detection;
use crate::error::Error;
use crate::track::Track;
use crate::Tracking;

#[derive(Debug)]
struct TrackState {
    track_id: i32,
    bbox: BBox<Ltrb>,
    hits: u32,
    time_since_update: u32,
}

/// Greedy best-overlap association with a confirmation threshold and an
/// age limit. Deliberately free of motion models and appearance features;
/// anything smarter plugs in behind the `Tracking` trait.
pub struct IouTracker {
    config: TrackerConfig,
    states: Vec<TrackState>,
    next_id: i32,
}

impl IouTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            states: Vec::new(),
            next_id: 1,
        }
    }
}

fn iou(a: &BBox<Ltrb>, b: &BBox<Ltrb>) -> f32 {
    let a_area = (a.right() - a.left()).max(0.0) * (a.bottom() - a.top()).max(0.0);
    let b_area = (b.right() - b.left()).max(0.0) * (b.bottom() - b.top()).max(0.0);

    let i_w = (a.right().min(b.right()) - a.left().max(b.left())).max(0.0);
    let i_h = (a.bottom().min(b.bottom()) - a.top().max(b.top())).max(0.0);
    let i_area = i_w * i_h;

    let union = a_area + b_area - i_area;
    if union <= 0.0 {
        return 0.0;
    }

    i_area / union
}

impl Tracking for IouTracker {
    fn update(&mut self, _frame: &Mat, detections: &[Detection]) -> Result<Vec<Track>, Error> {
        let det_boxes: Vec<BBox<Ltrb>> = detections.iter().map(|d| d.bbox().as_ltrb()).collect();

        for state in &mut self.states {
            state.time_since_update += 1;
        }

        // all candidate pairs above the overlap threshold, best first
        let mut pairs = Vec::new();
        for (ti, state) in self.states.iter().enumerate() {
            for (di, det) in det_boxes.iter().enumerate() {
                let overlap = iou(&state.bbox, det);
                if overlap >= self.config.iou_threshold {
                    pairs.push((overlap, ti, di));
                }
            }
        }
        pairs.sort_unstable_by(|a, b| b.0.partial_cmp(&a.0).unwrap());

        let mut track_taken = vec![false; self.states.len()];
        let mut det_taken = vec![false; det_boxes.len()];

        for (_, ti, di) in pairs {
            if track_taken[ti] || det_taken[di] {
                continue;
            }
            track_taken[ti] = true;
            det_taken[di] = true;

            let state = &mut self.states[ti];
            state.bbox = det_boxes[di];
            state.hits += 1;
            state.time_since_update = 0;
        }

        for (di, taken) in det_taken.iter().enumerate() {
            if !taken {
                self.states.push(TrackState {
                    track_id: self.next_id,
                    bbox: det_boxes[di],
                    hits: 1,
                    time_since_update: 0,
                });
                self.next_id += 1;
            }
        }

        let max_age = self.config.max_age;
        self.states.retain(|s| s.time_since_update <= max_age);

        Ok(self
            .states
            .iter()
            .map(|s| Track {
                track_id: s.track_id,
                bbox: s.bbox,
                confirmed: s.hits >= self.config.n_init,
                time_since_update: s.time_since_update,
            })
            .collect())
    }
}
