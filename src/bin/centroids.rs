use log::info;
use opencv::highgui;

use ptrack::capture::Camera;
use ptrack::config::AppConfig;
use ptrack::detector::YoloDetector;
use ptrack::pipeline;
use ptrack::sink::PositionSink;
use ptrack::tracker::IouTracker;

fn main() -> Result<(), ptrack::Error> {
    env_logger::init();

    let config = AppConfig::load(std::env::args().nth(1).as_deref())?;
    info!(
        "centroid pipeline: camera {}, detector {}, destination {}",
        config.camera.device_index, config.detector.model, config.stream.destination
    );

    let mut camera = Camera::open(config.camera.device_index)?;
    let mut detector = YoloDetector::new(config.detector.clone())?;
    let mut tracker = IouTracker::new(config.tracker.clone());
    let sink = PositionSink::new(&config.stream.destination)?;

    let window = "Tracking";
    highgui::named_window(window, 1)?;

    pipeline::run_streaming(&mut camera, &mut detector, &mut tracker, &sink, |img| {
        highgui::imshow(window, img)?;
        Ok(highgui::wait_key(1)? != 'q' as i32)
    })?;

    info!("centroid pipeline finished");
    Ok(())
}
