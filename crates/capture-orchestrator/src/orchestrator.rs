//! Per-frame capture pipeline

use crate::detector::{closest_face, closest_qr_code};
use crate::gate::{FrameGate, DETECTION_INTERVAL_MS, QR_CODE_INTERVAL_MS};
use crate::persist::{Completion, PersistMode, Persister, SaveRequest};
use crate::{
    CameraEventListener, CaptureError, CaptureEvent, FaceDetector, ImageSink, Overlay,
    QrCodeDetector, SubjectTracker,
};
use camera_capture::{CameraError, CameraLens, FrameSource, GrayFrame, PixelRegion, VideoFrame};
use capture_options::{CaptureOptions, CaptureType, SharedOptions};
use capture_throttle::{CaptureThrottle, SubjectKind, ThrottleDecision, ThrottleLimits};
use geometry::{DisplayTransform, Rect};
use image::imageops;
use quality_scorer::QualityScorer;
use roi_validator::{Message, RoiValidator, ValidationResult};
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

/// Camera authorization as reported by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraPermission {
    Granted,
    Denied,
}

/// Composes detection, validation, quality scoring, throttling and
/// persistence, and reports everything to one listener.
///
/// All frame processing happens on the caller's thread. Options are read
/// from the shared handle once per frame.
pub struct CaptureOrchestrator {
    options: SharedOptions,
    listener: Arc<dyn CameraEventListener>,
    face_detector: Option<Box<dyn FaceDetector>>,
    qr_detector: Option<Box<dyn QrCodeDetector>>,
    scorer: QualityScorer,
    validator: RoiValidator,
    detection_gate: FrameGate,
    qr_gate: FrameGate,
    face_throttle: CaptureThrottle,
    frame_throttle: CaptureThrottle,
    face_tracker: SubjectTracker,
    qr_tracker: SubjectTracker,
    qr_running: bool,
    overlay: Overlay,
    preview_started: bool,
    persister: Persister,
}

impl CaptureOrchestrator {
    pub fn new(
        options: SharedOptions,
        listener: Arc<dyn CameraEventListener>,
        sink: Arc<dyn ImageSink>,
        view_width: f64,
        view_height: f64,
    ) -> Self {
        Self {
            options,
            listener,
            face_detector: None,
            qr_detector: None,
            scorer: QualityScorer::new(),
            validator: RoiValidator::new(view_width, view_height),
            detection_gate: FrameGate::new(DETECTION_INTERVAL_MS),
            qr_gate: FrameGate::new(QR_CODE_INTERVAL_MS),
            face_throttle: CaptureThrottle::new(SubjectKind::Face),
            frame_throttle: CaptureThrottle::new(SubjectKind::Frame),
            face_tracker: SubjectTracker::new(),
            qr_tracker: SubjectTracker::starting_valid(true),
            qr_running: false,
            overlay: Overlay::default(),
            preview_started: false,
            persister: Persister::new(sink),
        }
    }

    pub fn with_face_detector(mut self, detector: impl FaceDetector + 'static) -> Self {
        self.face_detector = Some(Box::new(detector));
        self
    }

    pub fn with_qr_code_detector(mut self, detector: impl QrCodeDetector + 'static) -> Self {
        self.qr_detector = Some(Box::new(detector));
        self
    }

    pub fn with_persist_mode(mut self, mode: PersistMode) -> Self {
        self.persister.set_mode(mode);
        self
    }

    pub fn options(&self) -> &SharedOptions {
        &self.options
    }

    /// Shapes to draw over the preview right now
    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn throttle(&self, kind: SubjectKind) -> &CaptureThrottle {
        match kind {
            SubjectKind::Face => &self.face_throttle,
            SubjectKind::Frame => &self.frame_throttle,
        }
    }

    pub fn set_view_size(&mut self, view_width: f64, view_height: f64) {
        self.validator.set_view_size(view_width, view_height);
    }

    pub fn is_preview_started(&self) -> bool {
        self.preview_started
    }

    /// Whether any analyzer is currently running
    pub fn is_capturing(&self) -> bool {
        self.face_throttle.is_running() || self.frame_throttle.is_running() || self.qr_running
    }

    fn emit(&self, event: CaptureEvent) {
        debug!("Event: {:?}", event);
        event.dispatch(self.listener.as_ref());
    }

    fn report(&self, error: &CaptureError) {
        warn!("Frame processing failed: {}", error);
        self.emit(CaptureEvent::Error(error.to_string()));
    }

    /// Start delivering frames to the analyzers. Starting twice is a no-op.
    pub fn start_preview(&mut self, permission: CameraPermission) -> bool {
        if self.preview_started {
            return true;
        }
        if permission == CameraPermission::Denied {
            info!("Camera permission denied; preview not started");
            self.emit(CaptureEvent::PermissionDenied);
            return false;
        }
        self.preview_started = true;
        info!(
            "Preview started with {} lens",
            self.options.snapshot().camera_lens
        );
        true
    }

    /// Stop every analyzer and the preview
    pub fn stop_preview(&mut self) {
        self.stop_capture();
        if self.preview_started {
            info!("Preview stopped");
        }
        self.preview_started = false;
    }

    /// Stop the running analyzer and start the one for `capture_type`
    pub fn start_capture_type(&mut self, capture_type: CaptureType) {
        self.options.modify(|o| o.capture_type = capture_type);
        self.stop_capture();
        let options = self.options.snapshot();
        self.start_analyzer(&options);
        info!("Capture type set to {}", capture_type);
    }

    /// Stop all analyzers, clear the overlay and drop in-flight saves
    pub fn stop_capture(&mut self) {
        self.face_throttle.stop();
        self.frame_throttle.stop();
        self.qr_running = false;
        self.face_tracker.reset();
        self.qr_tracker.reset();
        self.detection_gate.reset();
        self.qr_gate.reset();
        self.overlay.clear();
        self.persister.cancel();
    }

    fn start_analyzer(&mut self, options: &CaptureOptions) {
        let limits = ThrottleLimits::from_options(options);
        match options.capture_type {
            CaptureType::Face => self.face_throttle.start(limits),
            CaptureType::Frame => self.frame_throttle.start(limits),
            CaptureType::QrCode => self.qr_running = true,
            CaptureType::None => {}
        }
    }

    /// Switch between front and back lens, restarting a running analyzer
    pub fn toggle_camera_lens(&mut self) -> CameraLens {
        let lens = self.options.modify(|o| {
            o.camera_lens = o.camera_lens.toggled();
            o.camera_lens
        });
        info!("Camera lens toggled to {}", lens);

        if self.preview_started && self.is_capturing() {
            self.stop_capture();
            let options = self.options.snapshot();
            self.start_analyzer(&options);
        }
        lens
    }

    /// Evaluate one video frame. Failures are reported through `on_error`
    /// and never interrupt the stream.
    pub fn process_frame(&mut self, frame: &VideoFrame) {
        self.poll_completions();

        if !self.preview_started {
            return;
        }
        if frame.is_empty() {
            debug!("Skipping empty frame {}", frame.sequence);
            return;
        }

        let options = self.options.snapshot();
        match options.capture_type {
            CaptureType::Face => self.process_face(frame, &options),
            CaptureType::Frame => self.process_frame_capture(frame, &options),
            CaptureType::QrCode => self.process_qr_code(frame, &options),
            CaptureType::None => {}
        }
    }

    fn display_transform(&self, frame: &VideoFrame, lens: CameraLens) -> DisplayTransform {
        let (view_width, view_height) = self.validator.view_size();
        DisplayTransform::new(
            frame.width as f64,
            frame.height as f64,
            view_width,
            view_height,
            lens,
        )
    }

    fn process_face(&mut self, frame: &VideoFrame, options: &CaptureOptions) {
        if !self.face_throttle.is_running() {
            return;
        }
        self.face_throttle
            .set_limits(ThrottleLimits::from_options(options));

        if !self.detection_gate.try_enter(frame.timestamp_ms) {
            trace!("Frame {} dropped by detection gate", frame.sequence);
            return;
        }

        let Some(detector) = self.face_detector.as_mut() else {
            debug!("No face detector configured");
            return;
        };
        let faces = match detector.detect(frame) {
            Ok(faces) => faces,
            Err(e) => {
                self.report(&e);
                return;
            }
        };

        let Some(face) = closest_face(&faces) else {
            self.lose_face(None);
            return;
        };

        let transform = self.display_transform(frame, options.camera_lens);
        let detection_box = transform.to_display_rect(&face.bounding_box);

        match self.validator.validate(&detection_box, options) {
            ValidationResult::RejectedSilently => self.lose_face(None),
            ValidationResult::Rejected(message) => self.lose_face(Some(message)),
            ValidationResult::Accepted => {
                if self.face_tracker.mark_valid() {
                    debug!("Face became valid at {:?}", detection_box);
                }
                let contours = transform.to_display_points(&face.landmarks);
                self.overlay = Overlay::for_subject(
                    detection_box,
                    contours,
                    self.validator.roi_rect(options),
                    options,
                );
                self.emit(CaptureEvent::FaceDetected {
                    geometry: detection_box,
                    probabilities: face.probabilities,
                });

                if options.save_image_captured
                    && self.face_throttle.try_acquire(frame.timestamp_ms)
                {
                    self.capture_face(frame, &face.bounding_box, options);
                }
            }
        }
    }

    fn lose_face(&mut self, message: Option<Message>) {
        self.overlay.clear();
        if self.face_tracker.mark_invalid() {
            if let Some(message) = message {
                self.emit(CaptureEvent::Message(message));
            }
            self.emit(CaptureEvent::FaceUndetected);
        }
    }

    fn capture_face(&mut self, frame: &VideoFrame, face_box: &Rect, options: &CaptureOptions) {
        let region = pixel_region(&face_box.increased(options.face_padding_percent));
        let crop = match frame.crop_and_resize(
            region,
            options.image_output_width,
            options.image_output_height,
        ) {
            Ok(crop) => crop,
            Err(e) => {
                self.report(&e.into());
                return;
            }
        };
        let crop = if options.camera_lens.is_mirrored() {
            imageops::flip_horizontal(&crop)
        } else {
            crop
        };

        let metrics = self.scorer.score(&GrayFrame::from_image(&crop));
        if let Some(metrics) = &metrics {
            if !metrics.has_good_illumination() {
                debug!(
                    "Face crop rejected: darkness={:.3} lightness={:.3}",
                    metrics.darkness, metrics.lightness
                );
                return;
            }
        }

        self.persist(SaveRequest {
            kind: SubjectKind::Face,
            index: self.save_index(SubjectKind::Face),
            image: crop,
            metrics,
        });
    }

    fn process_frame_capture(&mut self, frame: &VideoFrame, options: &CaptureOptions) {
        if !self.frame_throttle.is_running() {
            return;
        }
        self.frame_throttle
            .set_limits(ThrottleLimits::from_options(options));

        if !options.save_image_captured || !self.frame_throttle.try_acquire(frame.timestamp_ms) {
            return;
        }

        let image = match frame.to_oriented_image(options.camera_lens.is_mirrored()) {
            Ok(image) => image,
            Err(e) => {
                self.report(&e.into());
                return;
            }
        };
        let metrics = self.scorer.score(&frame.to_grayscale());

        self.persist(SaveRequest {
            kind: SubjectKind::Frame,
            index: self.save_index(SubjectKind::Frame),
            image,
            metrics,
        });
    }

    fn process_qr_code(&mut self, frame: &VideoFrame, options: &CaptureOptions) {
        if !self.qr_running {
            return;
        }

        if !self.qr_gate.try_enter(frame.timestamp_ms) {
            return;
        }

        let Some(detector) = self.qr_detector.as_mut() else {
            debug!("No QR code detector configured");
            return;
        };
        let codes = match detector.detect(frame) {
            Ok(codes) => codes,
            Err(e) => {
                self.report(&e);
                return;
            }
        };

        let Some(code) = closest_qr_code(&codes) else {
            self.overlay.clear();
            return;
        };

        let transform = self.display_transform(frame, options.camera_lens);
        let detection_box = transform.to_display_rect(&code.bounds);

        match self.validator.validate(&detection_box, options) {
            ValidationResult::Accepted => {
                self.qr_tracker.mark_valid();
                self.overlay = Overlay::for_subject(
                    detection_box,
                    Vec::new(),
                    self.validator.roi_rect(options),
                    options,
                );
                self.emit(CaptureEvent::QrCodeScanned {
                    value: code.value.clone(),
                });
            }
            ValidationResult::RejectedSilently => self.overlay.clear(),
            ValidationResult::Rejected(message) => {
                if self.qr_tracker.mark_invalid() {
                    self.emit(CaptureEvent::Message(message));
                }
                self.overlay.clear();
            }
        }
    }

    /// File index for the next save, counting saves still in flight
    fn save_index(&self, kind: SubjectKind) -> u32 {
        self.throttle(kind).next_index() + self.persister.pending_of(kind) as u32
    }

    fn persist(&mut self, request: SaveRequest) {
        if let Some(completion) = self.persister.submit(request) {
            self.complete(completion);
        }
    }

    fn complete(&mut self, completion: Completion) {
        let path = match completion.result {
            Ok(path) => path,
            Err(e) => {
                self.report(&e);
                return;
            }
        };

        let decision = match completion.kind {
            SubjectKind::Face => self.face_throttle.record_capture(),
            SubjectKind::Frame => self.frame_throttle.record_capture(),
        };
        match decision {
            ThrottleDecision::Captured { count, total } => {
                self.emit(CaptureEvent::ImageCaptured {
                    kind: completion.kind,
                    count,
                    total,
                    path,
                    metrics: completion.metrics,
                });
            }
            ThrottleDecision::EndCapture => self.end_capture(completion.kind),
            ThrottleDecision::Suppressed => {
                debug!("{} image saved after its run ended", completion.kind)
            }
        }
    }

    fn end_capture(&mut self, kind: SubjectKind) {
        info!("{} capture complete", kind);
        self.overlay.clear();
        self.face_tracker.reset();
        self.persister.cancel();
        self.emit(CaptureEvent::EndCapture);
    }

    /// Report saves that finished in the background
    pub fn poll_completions(&mut self) {
        while let Some(completion) = self.persister.try_next() {
            self.complete(completion);
        }
    }

    /// Wait for every in-flight save and report it
    pub async fn flush(&mut self) {
        while let Some(completion) = self.persister.next().await {
            self.complete(completion);
        }
    }

    /// Process frames until the source is exhausted, then flush pending saves
    pub async fn run<S>(&mut self, source: &mut S) -> Result<u32, CameraError>
    where
        S: FrameSource + ?Sized,
    {
        let mut processed = 0;
        loop {
            match source.next_frame() {
                Ok(Some(frame)) => {
                    self.process_frame(&frame);
                    processed += 1;
                    tokio::task::yield_now().await;
                }
                Ok(None) => break,
                Err(e) => {
                    self.report(&CaptureError::from(e.clone()));
                    self.flush().await;
                    return Err(e);
                }
            }
        }
        self.flush().await;
        info!("Processed {} frames", processed);
        Ok(processed)
    }
}

/// Whole-pixel region covering `rect`
fn pixel_region(rect: &Rect) -> PixelRegion {
    let x0 = rect.min_x.round() as i64;
    let y0 = rect.min_y.round() as i64;
    let x1 = rect.max_x.round() as i64;
    let y1 = rect.max_y.round() as i64;
    PixelRegion::new(x0, y0, x1 - x0, y1 - y0)
}
