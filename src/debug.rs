//! Debug logging utilities
//!
//! Resolution traces (ranked candidates, chosen directories, generator
//! command lines) go through the global `--debug` flag. When debug mode is
//! disabled the logging costs nothing.

use std::sync::OnceLock;

static DEBUG_ENABLED: OnceLock<bool> = OnceLock::new();

/// Initialize debug mode from the command-line flag. First call wins.
pub fn init_debug(enabled: bool) {
    let _ = DEBUG_ENABLED.set(enabled);
}

/// Check if debug mode is enabled
pub fn is_debug_enabled() -> bool {
    DEBUG_ENABLED.get().copied().unwrap_or(false)
}

/// Macro for convenient debug logging
///
/// Usage: `debug!("message with {}", variable)`
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        if $crate::debug::is_debug_enabled() {
            eprintln!("[DEBUG] {}", format_args!($($arg)*));
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_by_default() {
        // Tests share the process-wide flag; before any init it reads false.
        if DEBUG_ENABLED.get().is_none() {
            assert!(!is_debug_enabled());
        }
    }
}
