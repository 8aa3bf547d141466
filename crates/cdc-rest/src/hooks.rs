//! Observability hooks for request pacing
//!
//! Hooks let callers watch (and optionally veto) what the pacer does without
//! replacing it.
//!
//! # Example
//!
//! ```
//! use cdc_rest::hooks::PacerHooks;
//!
//! let hooks = PacerHooks::new()
//!     .on_wait(|info| {
//!         if info.delay.as_secs() > 10 {
//!             return Err(format!("refusing to wait {:?}", info.delay));
//!         }
//!         Ok(())
//!     })
//!     .on_cooldown(|method, path| {
//!         eprintln!("rate limited on {} {}", method, path);
//!     });
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::transport::HttpMethod;

/// A wait the pacer is about to perform
#[derive(Debug, Clone)]
pub struct WaitInfo {
    /// Request method
    pub method: HttpMethod,
    /// Request path
    pub path: String,
    /// Effective rate in requests per second
    pub rate: f64,
    /// Time the pacer will sleep
    pub delay: Duration,
    /// Whether the cooldown rate is in effect for this request
    pub cooldown: bool,
}

/// Hook invoked before sleeping; returning `Err` aborts the request
pub type WaitHook = Arc<dyn Fn(&WaitInfo) -> Result<(), String> + Send + Sync>;
/// Hook invoked when a rate-limit rejection puts the pacer into cooldown
pub type CooldownHook = Arc<dyn Fn(HttpMethod, &str) + Send + Sync>;

/// Pacer hooks container
///
/// All hooks are optional and run synchronously on the requesting task.
#[derive(Clone, Default)]
pub struct PacerHooks {
    pub(crate) on_wait: Option<WaitHook>,
    pub(crate) on_cooldown: Option<CooldownHook>,
}

impl fmt::Debug for PacerHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PacerHooks")
            .field("on_wait", &self.on_wait.as_ref().map(|_| "..."))
            .field("on_cooldown", &self.on_cooldown.as_ref().map(|_| "..."))
            .finish()
    }
}

impl PacerHooks {
    /// Create an empty hooks container
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback run before every non-zero wait
    ///
    /// Returning `Err(reason)` aborts the request with `RestError::Vetoed`.
    pub fn on_wait<F>(mut self, f: F) -> Self
    where
        F: Fn(&WaitInfo) -> Result<(), String> + Send + Sync + 'static,
    {
        self.on_wait = Some(Arc::new(f));
        self
    }

    /// Register a callback for rate-limit rejections
    pub fn on_cooldown<F>(mut self, f: F) -> Self
    where
        F: Fn(HttpMethod, &str) + Send + Sync + 'static,
    {
        self.on_cooldown = Some(Arc::new(f));
        self
    }

    pub(crate) fn invoke_wait(&self, info: &WaitInfo) -> Result<(), String> {
        match self.on_wait {
            Some(ref hook) => hook(info),
            None => Ok(()),
        }
    }

    pub(crate) fn invoke_cooldown(&self, method: HttpMethod, path: &str) {
        if let Some(ref hook) = self.on_cooldown {
            hook(method, path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn wait(delay_ms: u64) -> WaitInfo {
        WaitInfo {
            method: HttpMethod::Get,
            path: "public/get-ticker".to_string(),
            rate: 100.0,
            delay: Duration::from_millis(delay_ms),
            cooldown: false,
        }
    }

    #[test]
    fn test_empty_hooks_allow() {
        let hooks = PacerHooks::default();
        assert!(hooks.invoke_wait(&wait(10)).is_ok());
        hooks.invoke_cooldown(HttpMethod::Post, "private/get-trades");
    }

    #[test]
    fn test_wait_veto() {
        let hooks = PacerHooks::new().on_wait(|info| {
            if info.delay > Duration::from_secs(1) {
                Err("too slow".to_string())
            } else {
                Ok(())
            }
        });
        assert!(hooks.invoke_wait(&wait(10)).is_ok());
        assert_eq!(hooks.invoke_wait(&wait(5000)), Err("too slow".to_string()));
    }

    #[test]
    fn test_cooldown_counter_survives_clone() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();
        let hooks = PacerHooks::new().on_cooldown(move |_, _| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        let cloned = hooks.clone();
        hooks.invoke_cooldown(HttpMethod::Post, "a");
        cloned.invoke_cooldown(HttpMethod::Post, "b");
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }
}
