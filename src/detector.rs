use log::debug;
use ndarray::prelude::*;
use opencv::core::{self, Mat};
use opencv::dnn;
use opencv::prelude::*;

use crate::bbox::BBox;
use crate::config::DetectorConfig;
use crate::detection::{Detection, PERSON_CLASS};
use crate::error::Error;
use crate::Detecting;

/// Person detector over a YOLO-family ONNX network, output layout
/// `[1, 4 + classes, candidates]` with center-based boxes in input pixels.
pub struct YoloDetector {
    net: dnn::Net,
    config: DetectorConfig,
}

impl YoloDetector {
    pub fn new(config: DetectorConfig) -> Result<Self, Error> {
        let net = dnn::read_net_from_onnx(&config.model)?;

        Ok(Self { net, config })
    }

    fn postprocess(&self, out: &Mat, frame_width: f32, frame_height: f32) -> Result<Vec<Detection>, Error> {
        let size = out.mat_size();
        if size.len() != 3 || size[1] < 5 {
            return Err(Error::ModelShape(format!(
                "expected [1, 4 + classes, candidates], got {:?}",
                &size[..]
            )));
        }
        let nattrs = size[1] as usize;
        let npreds = size[2] as usize;

        let data = out.data_typed::<f32>()?;
        let view = aview1(data)
            .into_shape((nattrs, npreds))
            .map_err(|e| Error::ModelShape(e.to_string()))?;

        let sx = frame_width / self.config.input_width as f32;
        let sy = frame_height / self.config.input_height as f32;

        let mut dets = Vec::new();

        for i in 0..npreds {
            let mut class = -1;
            let mut confidence = 0.0f32;
            for c in 0..nattrs - 4 {
                let score = view[[4 + c, i]];
                if score > confidence {
                    class = c as i32;
                    confidence = score;
                }
            }

            // single-class boundary: only person candidates leave the detector
            if class != PERSON_CLASS || confidence <= self.config.confidence_threshold {
                continue;
            }

            let cx = view[[0, i]];
            let cy = view[[1, i]];
            let w = view[[2, i]];
            let h = view[[3, i]];

            dets.push(Detection::new(
                BBox::ltwh((cx - w / 2.0) * sx, (cy - h / 2.0) * sy, w * sx, h * sy),
                confidence,
                class,
            ));
        }

        let retain = non_maximum_suppression(&mut dets, self.config.iou_threshold);
        let dets = dets
            .into_iter()
            .enumerate()
            .filter_map(|(idx, det)| retain.contains(&(idx as i32)).then(|| det))
            .collect();

        Ok(dets)
    }
}

impl Detecting for YoloDetector {
    fn detect(&mut self, frame: &Mat) -> Result<Vec<Detection>, Error> {
        let frame_width = frame.cols() as f32;
        let frame_height = frame.rows() as f32;

        let blob = dnn::blob_from_image(
            frame,
            1.0 / 255.0,
            core::Size::new(self.config.input_width, self.config.input_height),
            core::Scalar::default(),
            true,
            false,
            core::CV_32F,
        )?;

        self.net.set_input(&blob, "", 1.0, core::Scalar::default())?;

        let mut outputs = core::Vector::<Mat>::new();
        let names = self.net.get_unconnected_out_layers_names()?;
        self.net.forward(&mut outputs, &names)?;

        let dets = self.postprocess(&outputs.get(0)?, frame_width, frame_height)?;
        debug!("{} person detection(s)", dets.len());

        Ok(dets)
    }
}

/// Greedy confidence-sorted suppression; returns indices to keep.
fn non_maximum_suppression(dets: &mut [Detection], iou_threshold: f32) -> Vec<i32> {
    dets.sort_unstable_by(|a, b| b.confidence.partial_cmp(&a.confidence).unwrap());

    let mut retain: Vec<_> = (0..dets.len() as i32).collect();
    for idx in 0..dets.len().saturating_sub(1) {
        if retain[idx] != -1 {
            for r in retain[idx + 1..].iter_mut() {
                if *r != -1 && dets[idx].iou(&dets[*r as usize]) > iou_threshold {
                    *r = -1;
                }
            }
        }
    }

    retain.retain(|&x| x > -1);
    retain
}
