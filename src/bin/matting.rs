use log::info;
use opencv::highgui;

use ptrack::capture::Camera;
use ptrack::config::AppConfig;
use ptrack::detector::YoloDetector;
use ptrack::pipeline;
use ptrack::segmenter::SelfieSegmenter;
use ptrack::tracker::IouTracker;

fn main() -> Result<(), ptrack::Error> {
    env_logger::init();

    let config = AppConfig::load(std::env::args().nth(1).as_deref())?;
    info!(
        "matting pipeline: camera {}, detector {}, segmenter {}",
        config.camera.device_index, config.detector.model, config.segmenter.model
    );

    let mut camera = Camera::open(config.camera.device_index)?;
    let mut detector = YoloDetector::new(config.detector.clone())?;
    let mut tracker = IouTracker::new(config.tracker.clone());
    let mut segmenter = SelfieSegmenter::new(config.segmenter.clone())?;

    let window = "Original + Background Removed";
    highgui::named_window(window, 1)?;

    pipeline::run_matting(
        &mut camera,
        &mut detector,
        &mut tracker,
        &mut segmenter,
        config.segmenter.mask_threshold,
        |img| {
            highgui::imshow(window, img)?;
            Ok(highgui::wait_key(1)? != 'q' as i32)
        },
    )?;

    info!("matting pipeline finished");
    Ok(())
}
