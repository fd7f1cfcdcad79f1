use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};

type Callback = Box<dyn FnOnce() + Send>;

/// Cleanup callbacks registered while the app runs, run once at shutdown in
/// reverse registration order.
///
/// Cloning yields another handle to the same list, so systems can hold one
/// (it is published as the `sys.teardown` resource).
#[derive(Clone, Default)]
pub struct Teardown {
    inner: Arc<Mutex<Vec<(String, Callback)>>>,
}

impl Teardown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback to run at shutdown.
    pub fn register(&self, name: impl Into<String>, callback: impl FnOnce() + Send + 'static) {
        let name = name.into();
        info!("Registering teardown callback '{}'", name);
        self.inner.lock().push((name, Box::new(callback)));
    }

    /// Run every registered callback, last registered first, and empty the
    /// list. Returns how many ran.
    pub fn drain(&self) -> usize {
        // Take the list out first so callbacks may register (or drain) freely.
        let callbacks = std::mem::take(&mut *self.inner.lock());
        let count = callbacks.len();
        for (name, callback) in callbacks.into_iter().rev() {
            debug!("Running teardown callback '{}'", name);
            callback();
        }
        if count > 0 {
            info!("Teardown complete ({} callbacks)", count);
        }
        count
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

impl fmt::Debug for Teardown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.inner.lock().iter().map(|(n, _)| n.clone()).collect();
        f.debug_struct("Teardown").field("callbacks", &names).finish()
    }
}

/// Drains the teardown list when dropped, including during unwinding.
pub(crate) struct TeardownGuard(pub(crate) Teardown);

impl Drop for TeardownGuard {
    fn drop(&mut self) {
        self.0.drain();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::AssertUnwindSafe;

    #[test]
    fn drains_in_reverse_order_once() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let teardown = Teardown::new();
        for n in 1..=3 {
            let log = log.clone();
            teardown.register(format!("cb{n}"), move || log.lock().push(n));
        }
        assert_eq!(teardown.len(), 3);

        assert_eq!(teardown.drain(), 3);
        assert_eq!(*log.lock(), vec![3, 2, 1]);
        assert_eq!(teardown.drain(), 0);
        assert_eq!(*log.lock(), vec![3, 2, 1]);
    }

    #[test]
    fn clones_share_the_list() {
        let teardown = Teardown::new();
        let handle = teardown.clone();
        handle.register("from_handle", || {});
        assert_eq!(teardown.len(), 1);
        teardown.drain();
        assert!(handle.is_empty());
    }

    #[test]
    fn guard_drains_on_panic() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let teardown = Teardown::new();
        let inner = log.clone();
        teardown.register("record", move || inner.lock().push("ran"));

        let guarded = teardown.clone();
        let result = std::panic::catch_unwind(AssertUnwindSafe(move || {
            let _guard = TeardownGuard(guarded);
            panic!("system exploded");
        }));
        assert!(result.is_err());
        assert_eq!(*log.lock(), vec!["ran"]);
    }
}
