use opencv::core::{self, Mat};
use opencv::dnn;
use opencv::imgproc;
use opencv::prelude::*;

use crate::config::SegmenterConfig;
use crate::error::Error;
use crate::Segmenting;

/// Person segmentation over a selfie-segmentation ONNX network. Takes a
/// BGR crop (channel swap happens in the input blob), returns a `CV_32F`
/// soft mask resized back to the crop dimensions.
pub struct SelfieSegmenter {
    net: dnn::Net,
    config: SegmenterConfig,
}

impl SelfieSegmenter {
    pub fn new(config: SegmenterConfig) -> Result<Self, Error> {
        let net = dnn::read_net_from_onnx(&config.model)?;

        Ok(Self { net, config })
    }
}

impl Segmenting for SelfieSegmenter {
    fn segment(&mut self, crop: &Mat) -> Result<Mat, Error> {
        let side = self.config.input_size;

        let blob = dnn::blob_from_image(
            crop,
            1.0 / 255.0,
            core::Size::new(side, side),
            core::Scalar::default(),
            true,
            false,
            core::CV_32F,
        )?;

        self.net.set_input(&blob, "", 1.0, core::Scalar::default())?;

        let mut outputs = core::Vector::<Mat>::new();
        let names = self.net.get_unconnected_out_layers_names()?;
        self.net.forward(&mut outputs, &names)?;

        let out = outputs.get(0)?;
        let data = out.data_typed::<f32>()?;
        if data.len() != (side * side) as usize {
            return Err(Error::ModelShape(format!(
                "expected {0}x{0} mask, got {1} values",
                side,
                data.len()
            )));
        }

        let small = Mat::from_slice(data)?.reshape(1, side)?.try_clone()?;

        let mut mask = Mat::default();
        imgproc::resize(
            &small,
            &mut mask,
            crop.size()?,
            0.0,
            0.0,
            imgproc::INTER_LINEAR,
        )?;

        Ok(mask)
    }
}
