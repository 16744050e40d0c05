//! Capture Pipeline - Main Entry Point

use camera_capture::SyntheticCamera;
use capture_cli::{
    init_logging, LoggingListener, SyntheticFaceDetector, SyntheticQrCodeDetector, FRAMES_PER_SECOND,
    FRAME_COUNT, FRAME_SIZE, OUTPUT_DIR, VIEW_SIZE,
};
use capture_options::{CaptureOptions, CaptureType, SharedOptions};
use capture_orchestrator::{CameraPermission, CaptureOrchestrator, FileImageSink, PersistMode};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    info!("=== Capture Pipeline v{} ===", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::args().nth(1);
    let options = CaptureOptions::load(config_path.as_deref())?;
    let capture_type = match options.capture_type {
        CaptureType::None => CaptureType::Face,
        other => other,
    };
    info!("Capture options: {:?}", options);

    let sink = Arc::new(FileImageSink::new(OUTPUT_DIR)?);
    let mut orchestrator = CaptureOrchestrator::new(
        SharedOptions::new(options),
        Arc::new(LoggingListener),
        sink,
        VIEW_SIZE,
        VIEW_SIZE,
    )
    .with_face_detector(SyntheticFaceDetector::new(FRAME_SIZE, FRAME_SIZE))
    .with_qr_code_detector(SyntheticQrCodeDetector::new(FRAME_SIZE, FRAME_SIZE))
    .with_persist_mode(PersistMode::Background(Handle::current()));

    if !orchestrator.start_preview(CameraPermission::Granted) {
        return Ok(());
    }
    orchestrator.start_capture_type(capture_type);

    let mut camera = SyntheticCamera::new(FRAME_SIZE, FRAME_SIZE, FRAMES_PER_SECOND, FRAME_COUNT);
    let processed = orchestrator.run(&mut camera).await?;
    orchestrator.stop_preview();

    info!("Done: {} frames processed, images in ./{}", processed, OUTPUT_DIR);
    Ok(())
}
