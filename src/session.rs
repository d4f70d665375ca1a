//! Reading session orchestration
//!
//! One `ReadingSession` per mounted reader screen. Mounting fetches the book
//! (a missing book is fatal), resolves the reader variant once, seeds the
//! timer from persisted progress, and acquires the process-wide reader
//! flags. The session then runs a single event loop over the session bus:
//! focus signals gate the timer, reader position events become progress
//! submissions carrying the live timer value, and unmount clears the flags
//! and refreshes the cached read-model views.
//!
//! At most one session is mounted at a time; the flags guard enforces
//! release on every exit path.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::book::Book;
use crate::bus::SessionEvent;
use crate::cache::{book_by_id_key, SharedCache, CONTINUE_READING_KEY};
use crate::client::{ClientError, StumpClient};
use crate::config::ReaderPreferences;
use crate::flags::{ReaderFlags, ReadingGuard};
use crate::focus::{FocusCoordinator, TimerAction};
use crate::reporter::{ProgressReporter, ProgressSink, ProgressUpdate};
use crate::timer::ReadingTimer;
use crate::variant::ReaderVariant;

/// Shared dependencies a session is mounted into
#[derive(Clone)]
pub struct SessionContext {
    pub cache: SharedCache,
    pub flags: ReaderFlags,
    pub preferences: ReaderPreferences,
}

/// A mounted reading session for a single book
pub struct ReadingSession {
    book: Book,
    variant: ReaderVariant,
    timer: ReadingTimer,
    focus: FocusCoordinator,
    reporter: ProgressReporter,
    cache: SharedCache,
    flags: ReaderFlags,
    shutdown: CancellationToken,
    _guard: ReadingGuard,
}

impl ReadingSession {
    /// Fetch the book and mount a session. Fails with
    /// [`ClientError::BookNotFound`] when the query resolves to null; the
    /// reading screen has nothing to render in that case.
    pub async fn mount(
        client: Arc<StumpClient>,
        ctx: SessionContext,
        book_id: &str,
    ) -> Result<Self, ClientError> {
        let book = client.book_by_id(book_id).await?;
        Ok(Self::new(book, client, ctx))
    }

    /// Mount a session for an already-fetched book
    pub fn new(book: Book, sink: Arc<dyn ProgressSink>, ctx: SessionContext) -> Self {
        let guard = ctx.flags.begin_reading();

        let variant = ReaderVariant::select(&book);
        let mut timer = ReadingTimer::new(
            book.persisted_elapsed_seconds(),
            ctx.preferences.track_elapsed_time,
        );

        let focus = FocusCoordinator::new();
        // Sessions mount foregrounded with the overlay hidden, so the timer
        // starts running immediately (unless tracking is disabled)
        let action = focus.reevaluate(timer.is_running());
        apply_action(&mut timer, action);

        let shutdown = CancellationToken::new();
        let reporter = ProgressReporter::new(sink, shutdown.clone());

        info!(
            book_id = %book.id,
            name = %book.name,
            extension = %book.extension,
            variant = ?variant,
            "reading session mounted"
        );

        Self {
            book,
            variant,
            timer,
            focus,
            reporter,
            cache: ctx.cache,
            flags: ctx.flags,
            shutdown,
            _guard: guard,
        }
    }

    pub fn book(&self) -> &Book {
        &self.book
    }

    /// The rendering strategy resolved at mount; never re-evaluated
    pub fn variant(&self) -> &ReaderVariant {
        &self.variant
    }

    pub fn total_seconds(&self) -> u64 {
        self.timer.total_seconds()
    }

    pub fn is_timer_running(&self) -> bool {
        self.timer.is_running()
    }

    /// Token that ends the session loop when cancelled
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Zero the timer without changing its running state. Readers call this
    /// when they want per-interval tracking (e.g. starting a new page).
    pub fn reset_timer(&mut self) {
        self.timer.reset();
    }

    /// Run the session loop until an `Ended` event, bus closure, or
    /// cancellation, then unmount.
    pub async fn run(mut self, mut rx: broadcast::Receiver<SessionEvent>) {
        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    debug!(book_id = %self.book.id, "session cancelled");
                    break;
                }
                event = rx.recv() => match event {
                    Ok(SessionEvent::Ended) => break,
                    Ok(event) => self.handle_event(event),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "session bus lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
            }
        }

        self.unmount().await;
    }

    /// Apply one bus event. Focus signals are idempotent; reader position
    /// events submit progress with the timer value read at this moment.
    pub fn handle_event(&mut self, event: SessionEvent) {
        debug!(event = event.event_type(), "session event");
        match event {
            SessionEvent::AppStateChanged { state } => {
                self.focus.set_app_state(state);
                self.reevaluate_timer();
            }
            SessionEvent::ControlsVisibilityChanged { visible } => {
                self.flags.set_show_controls(visible);
                self.focus.set_overlay_visible(visible);
                self.reevaluate_timer();
            }
            SessionEvent::PageTurned { page } => self.on_page_turned(page),
            SessionEvent::PositionChanged {
                epubcfi,
                percentage,
            } => self.on_position_changed(epubcfi, percentage),
            SessionEvent::Ended => {
                // Handled by the run loop; ignore here
            }
        }
    }

    fn reevaluate_timer(&mut self) {
        let action = self.focus.reevaluate(self.timer.is_running());
        apply_action(&mut self.timer, action);
    }

    fn on_page_turned(&mut self, page: i32) {
        if !matches!(self.variant, ReaderVariant::ImageBased { .. }) {
            debug!(page, "ignoring page event for non-paginated variant");
            return;
        }
        if page < 1 || page > self.book.pages {
            warn!(
                page,
                pages = self.book.pages,
                "dropping out-of-range page event"
            );
            return;
        }

        self.reporter.report(ProgressUpdate::Page {
            book_id: self.book.id.clone(),
            page,
            elapsed_seconds: self.timer.total_seconds(),
        });
    }

    fn on_position_changed(&mut self, epubcfi: String, percentage: f64) {
        if !matches!(self.variant, ReaderVariant::Epub { .. }) {
            debug!("ignoring position event for non-epub variant");
            return;
        }

        self.reporter.report(ProgressUpdate::Epub {
            book_id: self.book.id.clone(),
            epubcfi,
            percentage: percentage.clamp(0.0, 1.0),
            elapsed_seconds: self.timer.total_seconds(),
        });
    }

    /// Tear down: stop accumulation, refresh the cached read-model views,
    /// release the flags. In-flight submissions are not awaited; their
    /// results are discarded by whoever owns the cache entries.
    async fn unmount(mut self) {
        self.timer.pause();
        self.shutdown.cancel();

        self.cache.refetch(&book_by_id_key(&self.book.id)).await;
        self.cache.refetch(CONTINUE_READING_KEY).await;

        info!(
            book_id = %self.book.id,
            elapsed_seconds = self.timer.total_seconds(),
            "reading session unmounted"
        );
        // _guard drops here, clearing "is reading" and "show controls"
    }
}

fn apply_action(timer: &mut ReadingTimer, action: TimerAction) {
    match action {
        TimerAction::Pause => timer.pause(),
        TimerAction::Resume => timer.resume(),
        TimerAction::None => {}
    }
}
