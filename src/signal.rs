//! Termination signals for the TUI loop.
//!
//! The first SIGINT/SIGTERM only raises a flag so the loop can restore the
//! terminal and stop the host bridge. A second one exits with code 1.

use signal_hook::consts::TERM_SIGNALS;
use signal_hook::flag;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Register shutdown handlers and return the flag they set.
pub fn setup_shutdown_handlers() -> Result<Arc<AtomicBool>, std::io::Error> {
    let shutdown = Arc::new(AtomicBool::new(false));

    for sig in TERM_SIGNALS {
        // Order matters: the conditional exit must see the flag before this signal sets it
        flag::register_conditional_shutdown(*sig, 1, Arc::clone(&shutdown))?;
        flag::register(*sig, Arc::clone(&shutdown))?;
    }

    Ok(shutdown)
}
