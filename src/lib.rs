pub mod bbox;
pub mod capture;
pub mod config;
pub mod detection;
pub mod detector;
pub mod error;
pub mod pipeline;
pub mod segmenter;
pub mod sink;
pub mod track;
pub mod tracker;

pub use detection::{Detection, PERSON_CLASS};
pub use error::Error;
pub use track::Track;

use opencv::core::Mat;

/// Single-class person detector boundary. Implementations own the model;
/// the pipeline only sees pixel-space boxes with confidences.
pub trait Detecting {
    fn detect(&mut self, frame: &Mat) -> Result<Vec<Detection>, Error>;
}

/// Identity-assignment boundary. Implementations keep all cross-frame
/// state (motion, id lifecycle, confirmation policy) to themselves; the
/// pipeline consumes the `(id, box, confirmed)` triple per track.
pub trait Tracking {
    fn update(&mut self, frame: &Mat, detections: &[Detection]) -> Result<Vec<Track>, Error>;
}

/// Person segmentation boundary. Returns a single-channel `CV_32F` soft
/// mask in `[0,1]` with the same dimensions as the input crop.
pub trait Segmenting {
    fn segment(&mut self, crop: &Mat) -> Result<Mat, Error>;
}
