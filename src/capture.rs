use log::{debug, warn};
use opencv::core::{self, Mat};
use opencv::prelude::*;
use opencv::videoio::{self, VideoCapture};

use crate::error::Error;

/// Sequential frame supplier. `Ok(None)` means end of stream and
/// terminates the pipeline loop; there is no retry.
pub trait FrameSource {
    fn grab(&mut self) -> Result<Option<Mat>, Error>;
}

/// Exclusive handle on a capture device, released on drop.
pub struct Camera {
    cap: VideoCapture,
}

impl Camera {
    pub fn open(device_index: i32) -> Result<Self, Error> {
        let cap = VideoCapture::new(device_index, videoio::CAP_ANY)?;

        if !VideoCapture::is_opened(&cap)? {
            return Err(opencv::Error::new(
                core::StsError,
                format!("unable to open capture device {}", device_index),
            )
            .into());
        }

        Ok(Self { cap })
    }
}

impl FrameSource for Camera {
    fn grab(&mut self) -> Result<Option<Mat>, Error> {
        let mut frame = Mat::default();

        if !self.cap.read(&mut frame)? {
            debug!("capture device returned no frame");
            return Ok(None);
        }

        if frame.cols() == 0 || frame.rows() == 0 {
            debug!("capture device returned an empty frame");
            return Ok(None);
        }

        Ok(Some(frame))
    }
}

impl Drop for Camera {
    fn drop(&mut self) {
        if let Err(e) = self.cap.release() {
            warn!("failed to release capture device: {}", e);
        }
    }
}
