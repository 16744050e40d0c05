//! Image persistence, inline or on the blocking pool

use crate::{CaptureError, ImageSink, SinkError};
use capture_throttle::SubjectKind;
use image::RgbImage;
use quality_scorer::QualityMetrics;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{debug, warn};

/// Where sink writes run
#[derive(Debug, Clone, Default)]
pub enum PersistMode {
    /// On the frame-processing thread
    #[default]
    Inline,
    /// On the runtime's blocking pool; completions are picked up on later frames
    Background(Handle),
}

pub(crate) struct SaveRequest {
    pub kind: SubjectKind,
    pub index: u32,
    pub image: RgbImage,
    pub metrics: Option<QualityMetrics>,
}

#[derive(Debug)]
pub(crate) struct Completion {
    pub kind: SubjectKind,
    pub metrics: Option<QualityMetrics>,
    pub result: Result<String, CaptureError>,
}

struct InFlight {
    kind: SubjectKind,
    metrics: Option<QualityMetrics>,
    rx: oneshot::Receiver<Result<String, SinkError>>,
}

impl InFlight {
    fn finish(self, received: Result<Result<String, SinkError>, CaptureError>) -> Completion {
        Completion {
            kind: self.kind,
            metrics: self.metrics,
            result: received.and_then(|saved| saved.map_err(CaptureError::from)),
        }
    }
}

fn abandoned() -> CaptureError {
    CaptureError::Task("save task ended without a result".to_string())
}

/// Dispatches saves and hands back their results in submission order.
///
/// Each background save owns the sending half of its own result channel, so
/// a save that is dropped before running (runtime shutdown, panicking sink)
/// closes the channel instead of leaving a waiter stuck.
pub(crate) struct Persister {
    sink: Arc<dyn ImageSink>,
    mode: PersistMode,
    in_flight: VecDeque<InFlight>,
}

impl Persister {
    pub fn new(sink: Arc<dyn ImageSink>) -> Self {
        Self {
            sink,
            mode: PersistMode::Inline,
            in_flight: VecDeque::new(),
        }
    }

    pub fn set_mode(&mut self, mode: PersistMode) {
        self.mode = mode;
    }

    pub fn pending(&self) -> usize {
        self.in_flight.len()
    }

    pub fn pending_of(&self, kind: SubjectKind) -> usize {
        self.in_flight.iter().filter(|save| save.kind == kind).count()
    }

    /// Forget every save still in flight; their results are discarded
    pub fn cancel(&mut self) {
        if !self.in_flight.is_empty() {
            debug!("Discarding {} in-flight saves", self.in_flight.len());
        }
        self.in_flight.clear();
    }

    /// Inline saves complete immediately; background saves return `None`
    pub fn submit(&mut self, request: SaveRequest) -> Option<Completion> {
        let SaveRequest {
            kind,
            index,
            image,
            metrics,
        } = request;

        match &self.mode {
            PersistMode::Inline => Some(Completion {
                kind,
                metrics,
                result: self
                    .sink
                    .persist(kind, index, &image)
                    .map_err(CaptureError::from),
            }),
            PersistMode::Background(handle) => {
                let sink = Arc::clone(&self.sink);
                let (tx, rx) = oneshot::channel();
                // Detached: the result travels through `tx`
                drop(handle.spawn_blocking(move || {
                    if tx.send(sink.persist(kind, index, &image)).is_err() {
                        debug!("Discarded {} save {} finished", kind, index);
                    }
                }));
                self.in_flight.push_back(InFlight { kind, metrics, rx });
                None
            }
        }
    }

    /// Next finished save, without waiting
    pub fn try_next(&mut self) -> Option<Completion> {
        let received = match self.in_flight.front_mut()?.rx.try_recv() {
            Ok(saved) => Ok(saved),
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Closed) => {
                warn!("Background save was dropped before finishing");
                Err(abandoned())
            }
        };
        self.in_flight.pop_front().map(|save| save.finish(received))
    }

    /// Wait for the next save; `None` when none is pending
    pub async fn next(&mut self) -> Option<Completion> {
        let mut save = self.in_flight.pop_front()?;
        let received = match (&mut save.rx).await {
            Ok(saved) => Ok(saved),
            Err(_) => {
                warn!("Background save was dropped before finishing");
                Err(abandoned())
            }
        };
        Some(save.finish(received))
    }
}
