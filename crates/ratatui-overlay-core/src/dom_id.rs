//! Stable unique ids for wiring accessibility relations (`aria-controls`, label targets).

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

static DOM_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// `"{prefix}_{n}"` with `n` unique for the lifetime of the process.
pub fn next_dom_id(prefix: &str) -> String {
    let n = DOM_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}_{n}")
}

/// Prefers an explicitly given id, generating one otherwise.
pub fn resolve(static_id: Option<&str>, prefix: &str) -> String {
    match static_id {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => next_dom_id(prefix),
    }
}
