//! Termination signals become a cancellation flag checked between entries.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::warn;

/// Installs a handler for SIGINT, SIGTERM and SIGHUP and returns the flag
/// it raises.
///
/// The handler only sets the flag, so an entry being written is always
/// finished and the log closed normally. If the handler can't be
/// installed the run continues without it.
pub fn install() -> Arc<AtomicBool> {
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = cancel.clone();
    if let Err(err) = ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
    }) {
        warn!(error = %err, "failed to install termination handler");
    }
    cancel
}
