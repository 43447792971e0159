//! Process-wide store of transient download payloads.
//!
//! The produced MP3 bytes live here between conversion and download, keyed
//! by an opaque handle. Nothing is freed automatically: whoever owns a
//! handle must call [`release`] once the payload is no longer reachable
//! from the UI, or the bytes stay resident for the rest of the process.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;

static STORE: Lazy<Mutex<Store>> = Lazy::new(|| Mutex::new(Store::default()));

#[derive(Default)]
struct Store {
    next_id: u64,
    payloads: HashMap<u64, Arc<[u8]>>,
}

/// Opaque handle to a payload held by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadHandle(u64);

/// Stores a payload and returns the handle that resolves to it.
pub fn register(payload: Arc<[u8]>) -> DownloadHandle {
    let mut store = STORE.lock().unwrap();
    store.next_id += 1;
    let id = store.next_id;
    store.payloads.insert(id, payload);
    DownloadHandle(id)
}

/// Looks a payload up; `None` once the handle has been released.
pub fn resolve(handle: &DownloadHandle) -> Option<Arc<[u8]>> {
    STORE.lock().unwrap().payloads.get(&handle.0).cloned()
}

/// Frees the payload behind the handle. Releasing twice is a no-op.
pub fn release(handle: &DownloadHandle) {
    STORE.lock().unwrap().payloads.remove(&handle.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_payloads_resolve() {
        let handle = register(Arc::from(&b"mp3 bytes"[..]));
        let payload = resolve(&handle).expect("payload should resolve");
        assert_eq!(&payload[..], b"mp3 bytes");
        release(&handle);
    }

    #[test]
    fn released_handles_stop_resolving() {
        let handle = register(Arc::from(&b"gone soon"[..]));
        release(&handle);
        assert!(resolve(&handle).is_none());
        // releasing again must not panic or disturb other entries
        release(&handle);
    }

    #[test]
    fn handles_are_distinct_per_registration() {
        let a = register(Arc::from(&b"a"[..]));
        let b = register(Arc::from(&b"b"[..]));
        assert_ne!(a, b);
        release(&a);
        assert_eq!(&resolve(&b).unwrap()[..], b"b");
        release(&b);
    }
}
