//! Parser warnings with colored terminal output.
//!
//! Provides deduplication so a condition that repeats on every token (a full
//! error sink, an exhausted rewind window) is reported once per process.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use owo_colors::OwoColorize;

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Print a warning once per unique `(component, message)` pair.
///
/// Returns `true` when the warning was printed by this call.
///
/// # Example
/// ```ignore
/// warn_once("HTML Parser", "error limit of 100 reached, further errors dropped");
/// ```
pub fn warn_once(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    let should_print = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_print {
        let line = format!("[Wombat {component}] ⚠ {message}");
        eprintln!("{}", line.yellow());
    }
    should_print
}

/// Forget every warning printed so far.
///
/// Hosts that parse many unrelated documents call this between them so each
/// document gets its own notices.
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warns_only_once_per_message() {
        assert!(warn_once("Test", "first unique message"));
        assert!(!warn_once("Test", "first unique message"));
        assert!(warn_once("Other", "first unique message"));
    }
}
