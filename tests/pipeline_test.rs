use std::net::UdpSocket;
use std::time::Duration;

use opencv::core::{self, Mat, Scalar};
use opencv::prelude::*;

use ptrack::bbox::BBox;
use ptrack::capture::FrameSource;
use ptrack::pipeline::{self, centroid_records, matting_frame};
use ptrack::sink::{PositionRecord, PositionSink};
use ptrack::{Detecting, Detection, Error, Segmenting, Track, Tracking};

struct CountingDetector {
    calls: usize,
}

impl Detecting for CountingDetector {
    fn detect(&mut self, _frame: &Mat) -> Result<Vec<Detection>, Error> {
        self.calls += 1;
        Ok(Vec::new())
    }
}

struct FixedTracker {
    tracks: Vec<Track>,
    calls: usize,
}

impl Tracking for FixedTracker {
    fn update(&mut self, _frame: &Mat, _detections: &[Detection]) -> Result<Vec<Track>, Error> {
        self.calls += 1;
        Ok(self.tracks.clone())
    }
}

/// Marks every pixel foreground.
struct OnesSegmenter {
    calls: usize,
}

impl Segmenting for OnesSegmenter {
    fn segment(&mut self, crop: &Mat) -> Result<Mat, Error> {
        self.calls += 1;
        Ok(Mat::ones(crop.rows(), crop.cols(), core::CV_32F)?.to_mat()?)
    }
}

/// Yields `remaining` black frames, then ends the stream.
struct FiniteSource {
    remaining: usize,
}

impl FrameSource for FiniteSource {
    fn grab(&mut self) -> Result<Option<Mat>, Error> {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        Ok(Some(Mat::zeros(480, 640, core::CV_8UC3)?.to_mat()?))
    }
}

fn track(id: i32, l: f32, t: f32, r: f32, b: f32, confirmed: bool) -> Track {
    Track {
        track_id: id,
        bbox: BBox::ltrb(l, t, r, b),
        confirmed,
        time_since_update: 0,
    }
}

fn sum(mat: &Mat) -> f64 {
    let s = core::sum_elems(mat).unwrap();
    s[0] + s[1] + s[2] + s[3]
}

#[test]
fn capture_failure_runs_nothing() {
    let mut source = FiniteSource { remaining: 0 };
    let mut detector = CountingDetector { calls: 0 };
    let mut tracker = FixedTracker {
        tracks: vec![],
        calls: 0,
    };
    let mut segmenter = OnesSegmenter { calls: 0 };
    let mut shown = 0;

    pipeline::run_matting(
        &mut source,
        &mut detector,
        &mut tracker,
        &mut segmenter,
        0.5,
        |_| {
            shown += 1;
            Ok(true)
        },
    )
    .unwrap();

    assert_eq!(detector.calls, 0);
    assert_eq!(tracker.calls, 0);
    assert_eq!(segmenter.calls, 0);
    assert_eq!(shown, 0);
}

#[test]
fn unconfirmed_tracks_produce_no_records() {
    let tracks = vec![
        track(1, 100.0, 50.0, 200.0, 150.0, true),
        track(2, 300.0, 50.0, 400.0, 150.0, false),
        track(3, 10.0, 10.0, 60.0, 110.0, true),
    ];

    let records = centroid_records(640, 480, &tracks);

    assert_eq!(
        records,
        vec![
            PositionRecord { id: 1, x: 150, y: 100 },
            PositionRecord { id: 3, x: 35, y: 60 },
        ]
    );
}

#[test]
fn streaming_sends_one_datagram_per_confirmed_track() {
    let receiver = UdpSocket::bind("127.0.0.1:0").unwrap();
    receiver
        .set_read_timeout(Some(Duration::from_millis(200)))
        .unwrap();
    let addr = receiver.local_addr().unwrap();

    let mut source = FiniteSource { remaining: 1 };
    let mut detector = CountingDetector { calls: 0 };
    let mut tracker = FixedTracker {
        tracks: vec![
            track(42, 100.0, 50.0, 200.0, 150.0, true),
            track(43, 0.0, 0.0, 50.0, 50.0, false),
        ],
        calls: 0,
    };
    let sink = PositionSink::new(&addr.to_string()).unwrap();
    let mut shown = 0;

    pipeline::run_streaming(&mut source, &mut detector, &mut tracker, &sink, |_| {
        shown += 1;
        Ok(true)
    })
    .unwrap();

    assert_eq!(shown, 1);

    let mut buf = [0u8; 256];
    let (n, _) = receiver.recv_from(&mut buf).unwrap();
    let decoded: PositionRecord = serde_json::from_slice(&buf[..n]).unwrap();
    assert_eq!(decoded, PositionRecord { id: 42, x: 150, y: 100 });

    // the unconfirmed track must not have produced a second datagram
    assert!(receiver.recv_from(&mut buf).is_err());
}

#[test]
fn matting_composites_confirmed_track() {
    let frame =
        Mat::new_rows_cols_with_default(480, 640, core::CV_8UC3, Scalar::all(200.0)).unwrap();
    let tracks = vec![track(1, 100.0, 50.0, 200.0, 150.0, true)];
    let mut segmenter = OnesSegmenter { calls: 0 };

    let out = matting_frame(&frame, &tracks, &mut segmenter, 0.5).unwrap();

    assert_eq!(segmenter.calls, 1);
    // 100x100 crop, 3 channels of value 200, everything else stays black
    assert_eq!(sum(&out.cutout), 100.0 * 100.0 * 3.0 * 200.0);
    // annotation changed the copy, not the source frame
    assert_ne!(sum(&out.annotated), sum(&frame));

    let combined = out.combined().unwrap();
    assert_eq!(combined.cols(), 1280);
    assert_eq!(combined.rows(), 480);
}

#[test]
fn matting_skips_zero_area_clip() {
    let frame =
        Mat::new_rows_cols_with_default(480, 640, core::CV_8UC3, Scalar::all(200.0)).unwrap();
    // clips to left == right == 640
    let tracks = vec![track(1, 700.0, 100.0, 900.0, 200.0, true)];
    let mut segmenter = OnesSegmenter { calls: 0 };

    let out = matting_frame(&frame, &tracks, &mut segmenter, 0.5).unwrap();

    assert_eq!(segmenter.calls, 0);
    assert_eq!(sum(&out.cutout), 0.0);
}

#[test]
fn matting_still_labels_degenerate_clip() {
    let frame =
        Mat::new_rows_cols_with_default(480, 640, core::CV_8UC3, Scalar::all(200.0)).unwrap();
    // clips to left == right == 0: nothing to composite, but the outline
    // and label are still rendered on the annotated copy
    let tracks = vec![track(1, -50.0, 100.0, -10.0, 200.0, true)];
    let mut segmenter = OnesSegmenter { calls: 0 };

    let out = matting_frame(&frame, &tracks, &mut segmenter, 0.5).unwrap();

    assert_eq!(segmenter.calls, 0);
    assert_eq!(sum(&out.cutout), 0.0);
    assert_ne!(sum(&out.annotated), sum(&frame));
}

#[test]
fn matting_ignores_unconfirmed_tracks() {
    let frame = Mat::zeros(480, 640, core::CV_8UC3).unwrap().to_mat().unwrap();
    let tracks = vec![track(9, 100.0, 50.0, 200.0, 150.0, false)];
    let mut segmenter = OnesSegmenter { calls: 0 };

    let out = matting_frame(&frame, &tracks, &mut segmenter, 0.5).unwrap();

    assert_eq!(segmenter.calls, 0);
    // no outline, no label, no composite
    assert_eq!(sum(&out.annotated), 0.0);
    assert_eq!(sum(&out.cutout), 0.0);
}
