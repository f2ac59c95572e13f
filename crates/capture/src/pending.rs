use crate::source::{CaptureError, CaptureSource, CaptureStream};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

type OpenResult = Result<Box<dyn CaptureStream>, CaptureError>;

/// A one-shot capture open running on a background thread.
///
/// The result is delivered exactly once through [`poll`](Self::poll); after
/// that the handle is settled and keeps returning `None`. There is no retry
/// and no cancellation.
pub struct PendingCapture {
    source: String,
    rx: Option<Receiver<OpenResult>>,
}

impl PendingCapture {
    /// Start opening `source` on a dedicated thread.
    pub fn spawn(source: Box<dyn CaptureSource>) -> Self {
        let name = source.name().to_string();
        let (tx, rx) = mpsc::channel();
        tracing::info!(source = %name, "requesting capture access");

        let spawned = thread::Builder::new()
            .name("capture-open".into())
            .spawn(move || {
                // The receiver may already be gone if the session was dropped.
                let _ = tx.send(source.open());
            });

        match spawned {
            Ok(_) => Self {
                source: name,
                rx: Some(rx),
            },
            Err(e) => Self::resolved(name, Err(CaptureError::Backend(e.to_string()))),
        }
    }

    /// A capture that has already settled with `result`.
    pub fn resolved(source: impl Into<String>, result: OpenResult) -> Self {
        let (tx, rx) = mpsc::channel();
        let _ = tx.send(result);
        Self {
            source: source.into(),
            rx: Some(rx),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_settled(&self) -> bool {
        self.rx.is_none()
    }

    /// Non-blocking check. Returns the terminal result once, `None` otherwise.
    pub fn poll(&mut self) -> Option<OpenResult> {
        let rx = self.rx.as_ref()?;
        let outcome = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(CaptureError::WorkerLost),
        };
        self.rx = None;
        Some(outcome)
    }

    /// Block until the capture settles. Returns `None` if already settled.
    pub fn wait(&mut self) -> Option<OpenResult> {
        let rx = self.rx.take()?;
        Some(rx.recv().unwrap_or(Err(CaptureError::WorkerLost)))
    }
}

impl std::fmt::Debug for PendingCapture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingCapture")
            .field("source", &self.source)
            .field("settled", &self.is_settled())
            .finish()
    }
}
