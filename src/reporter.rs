//! Progress reporter
//!
//! Forwards page/position changes from the active reader to the backend,
//! attaching the timer value captured at submission time. Submissions are
//! fire-and-forget: each report spawns a task that tries at most
//! [`MAX_ATTEMPTS`] times and then drops the update silently. There is no
//! deduplication and no ordering between in-flight submissions; the backend
//! applies whichever write it processes last.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Total attempts per submission (initial try included). Failures beyond
/// this are dropped without user-visible error; progress reporting is
/// best-effort telemetry.
pub const MAX_ATTEMPTS: u32 = 3;

/// One progress submission. Page-based and position-based channels are
/// mutually exclusive, selected by the session's reader variant.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressUpdate {
    /// Image/PDF variant: page number plus elapsed seconds
    Page {
        book_id: String,
        page: i32,
        elapsed_seconds: u64,
    },
    /// EPUB variant: CFI, completion percentage in [0, 1], elapsed seconds
    Epub {
        book_id: String,
        epubcfi: String,
        percentage: f64,
        elapsed_seconds: u64,
    },
}

impl ProgressUpdate {
    pub fn book_id(&self) -> &str {
        match self {
            ProgressUpdate::Page { book_id, .. } => book_id,
            ProgressUpdate::Epub { book_id, .. } => book_id,
        }
    }

    /// Channel name for logging
    pub fn channel(&self) -> &'static str {
        match self {
            ProgressUpdate::Page { .. } => "page",
            ProgressUpdate::Epub { .. } => "epub",
        }
    }
}

/// Where submissions go. The production sink is the SDK client; tests
/// substitute a failure-injecting mock.
#[async_trait]
pub trait ProgressSink: Send + Sync + 'static {
    async fn submit(&self, update: &ProgressUpdate) -> Result<()>;
}

/// Fire-and-forget submitter with a bounded retry budget
pub struct ProgressReporter {
    sink: Arc<dyn ProgressSink>,
    shutdown: CancellationToken,
}

impl ProgressReporter {
    pub fn new(sink: Arc<dyn ProgressSink>, shutdown: CancellationToken) -> Self {
        Self { sink, shutdown }
    }

    /// Submit an update in the background. Returns immediately; the caller
    /// never observes the outcome.
    ///
    /// An in-flight attempt is not aborted by session shutdown, but no new
    /// attempt starts after it.
    pub fn report(&self, update: ProgressUpdate) {
        let sink = self.sink.clone();
        let shutdown = self.shutdown.clone();

        tokio::spawn(async move {
            for attempt in 1..=MAX_ATTEMPTS {
                match sink.submit(&update).await {
                    Ok(()) => {
                        debug!(
                            book_id = update.book_id(),
                            channel = update.channel(),
                            attempt,
                            "progress submitted"
                        );
                        return;
                    }
                    Err(e) => {
                        warn!(
                            book_id = update.book_id(),
                            channel = update.channel(),
                            attempt,
                            error = %e,
                            "progress submission failed"
                        );
                    }
                }

                if shutdown.is_cancelled() {
                    debug!(book_id = update.book_id(), "session ended, dropping submission");
                    return;
                }
            }

            warn!(
                book_id = update.book_id(),
                channel = update.channel(),
                "progress dropped after {} attempts",
                MAX_ATTEMPTS
            );
        });
    }
}
