use crate::bbox::{BBox, Ltrb};

#[derive(Debug, Clone)]
pub struct Track {
    pub track_id: i32,

    /// Latest box estimate, float pixel corners.
    pub bbox: BBox<Ltrb>,

    /// Tracks start tentative and become confirmed after enough
    /// consecutive matches; only confirmed tracks reach any sink.
    pub confirmed: bool,

    /// Frames since this track last matched a detection.
    pub time_since_update: u32,
}
