//! stump-reader: headless reading-session engine for Stump clients
//!
//! The engine owns everything a reading screen needs that is not rendering:
//! a reading timer gated by app focus and the controls overlay, a resolved
//! reader variant per book, fire-and-forget progress submission with a
//! bounded retry budget, and cache refreshes on unmount so stale progress is
//! never shown on navigation back.
//!
//! A session is mounted per book via [`session::ReadingSession::mount`] and
//! driven by [`bus::SessionEvent`]s published by reader surfaces and
//! platform lifecycle shims.

pub mod book;
pub mod bus;
pub mod cache;
pub mod client;
pub mod config;
pub mod flags;
pub mod focus;
pub mod reporter;
pub mod session;
pub mod timer;
pub mod variant;

pub use book::Book;
pub use bus::{create_bus, AppState, SessionBus, SessionEvent, SharedBus};
pub use cache::{QueryCache, SharedCache};
pub use client::{ClientError, StumpClient};
pub use config::{load_config, Config, ReaderPreferences};
pub use flags::ReaderFlags;
pub use reporter::{ProgressSink, ProgressUpdate};
pub use session::{ReadingSession, SessionContext};
pub use timer::ReadingTimer;
pub use variant::ReaderVariant;
