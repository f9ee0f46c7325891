use log::debug;
use opencv::core::{self, Mat};
use opencv::imgproc;
use opencv::prelude::*;

use crate::capture::FrameSource;
use crate::error::Error;
use crate::sink::{PositionRecord, PositionSink};
use crate::track::Track;
use crate::{Detecting, Segmenting, Tracking};

const BOX_COLOR: (f64, f64, f64) = (0.0, 255.0, 0.0);

/// One processed frame of the matting pipeline: the annotated original and
/// the background-stripped accumulator, both full frame size.
pub struct MattingFrame {
    pub annotated: Mat,
    pub cutout: Mat,
}

impl MattingFrame {
    /// Original and cutout side by side, for display.
    pub fn combined(&self) -> Result<Mat, Error> {
        let mut out = Mat::default();
        core::hconcat2(&self.annotated, &self.cutout, &mut out)?;
        Ok(out)
    }
}

/// Per-track matting: for every confirmed track, clip the box, outline and
/// label it on a copy of the frame, segment the crop, and paste the masked
/// foreground into a black accumulator at the same location. A zero-area
/// clip still gets its outline and label but skips segmentation and
/// compositing for this frame only.
pub fn matting_frame<S: Segmenting>(
    frame: &Mat,
    tracks: &[Track],
    segmenter: &mut S,
    mask_threshold: f32,
) -> Result<MattingFrame, Error> {
    let frame_width = frame.cols();
    let frame_height = frame.rows();

    let mut annotated = frame.try_clone()?;
    let cutout = Mat::zeros(frame_height, frame_width, frame.typ())?.to_mat()?;

    let color = core::Scalar::new(BOX_COLOR.0, BOX_COLOR.1, BOX_COLOR.2, 0.0);

    for track in tracks {
        if !track.confirmed {
            continue;
        }

        let pb = track.bbox.clip(frame_width, frame_height);

        // outline and label are drawn for every confirmed track, even when
        // the clipped crop degenerates and segmentation is skipped
        imgproc::rectangle(&mut annotated, pb.rect(), color, 2, imgproc::LINE_8, 0)?;
        imgproc::put_text(
            &mut annotated,
            &format!("ID: {}", track.track_id),
            core::Point::new(pb.left, pb.top - 10),
            imgproc::FONT_HERSHEY_SIMPLEX,
            0.6,
            color,
            2,
            imgproc::LINE_AA,
            false,
        )?;

        if pb.is_empty() {
            debug!("track {}: degenerate crop after clipping, skipped", track.track_id);
            continue;
        }

        let crop = Mat::roi(frame, pb.rect())?;

        let soft = segmenter.segment(&crop)?;
        let mut binary = Mat::default();
        imgproc::threshold(
            &soft,
            &mut binary,
            mask_threshold as f64,
            255.0,
            imgproc::THRESH_BINARY,
        )?;
        let mut mask = Mat::default();
        binary.convert_to(&mut mask, core::CV_8U, 1.0, 0.0)?;

        let mut foreground = Mat::default();
        core::bitwise_and(&crop, &crop, &mut foreground, &mask)?;

        let mut target = Mat::roi(&cutout, pb.rect())?;
        foreground.copy_to(&mut target)?;
    }

    Ok(MattingFrame { annotated, cutout })
}

/// Clipped centroids of every confirmed track, truncating integer midpoint.
pub fn centroid_records(frame_width: i32, frame_height: i32, tracks: &[Track]) -> Vec<PositionRecord> {
    tracks
        .iter()
        .filter(|t| t.confirmed)
        .map(|t| {
            let c = t.bbox.clip(frame_width, frame_height).centroid();
            PositionRecord {
                id: t.track_id,
                x: c.x,
                y: c.y,
            }
        })
        .collect()
}

/// Matting loop: capture, detect, track, segment, display. Ends when the
/// source runs dry or `show` returns `false`.
pub fn run_matting<Src, D, T, S, F>(
    source: &mut Src,
    detector: &mut D,
    tracker: &mut T,
    segmenter: &mut S,
    mask_threshold: f32,
    mut show: F,
) -> Result<(), Error>
where
    Src: FrameSource,
    D: Detecting,
    T: Tracking,
    S: Segmenting,
    F: FnMut(&Mat) -> Result<bool, Error>,
{
    while let Some(frame) = source.grab()? {
        let detections = detector.detect(&frame)?;
        let tracks = tracker.update(&frame, &detections)?;
        let out = matting_frame(&frame, &tracks, segmenter, mask_threshold)?;

        if !show(&out.combined()?)? {
            break;
        }
    }

    Ok(())
}

/// Streaming loop: capture, detect, track, send one datagram per confirmed
/// track, display the raw frame. Ends like `run_matting`.
pub fn run_streaming<Src, D, T, F>(
    source: &mut Src,
    detector: &mut D,
    tracker: &mut T,
    sink: &PositionSink,
    mut show: F,
) -> Result<(), Error>
where
    Src: FrameSource,
    D: Detecting,
    T: Tracking,
    F: FnMut(&Mat) -> Result<bool, Error>,
{
    while let Some(frame) = source.grab()? {
        let detections = detector.detect(&frame)?;
        let tracks = tracker.update(&frame, &detections)?;

        for record in centroid_records(frame.cols(), frame.rows(), &tracks) {
            sink.send(&record)?;
        }

        if !show(&frame)? {
            break;
        }
    }

    Ok(())
}
