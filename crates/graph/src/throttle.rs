use crate::config::ThrottleConfig;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Bounds bursts of expensive chain extractions
///
/// Fixed window, not a sliding one: at most `max_calls` calls are admitted
/// per window, and the window restarts with the first call after it has
/// elapsed.
#[derive(Debug)]
pub struct InvocationThrottle {
    max_calls: usize,
    window: Duration,
    state: Mutex<WindowState>,
}

#[derive(Debug, Default)]
struct WindowState {
    started: Option<Instant>,
    calls: usize,
}

impl InvocationThrottle {
    pub fn new(max_calls: usize, window: Duration) -> Self {
        Self {
            max_calls,
            window,
            state: Mutex::new(WindowState::default()),
        }
    }

    pub fn from_config(config: &ThrottleConfig) -> Self {
        Self::new(config.max_calls, config.window())
    }

    /// Record a call now; `false` means the caller should skip the work
    pub fn admit(&self) -> bool {
        self.admit_at(Instant::now())
    }

    pub fn admit_at(&self, now: Instant) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        let expired = state
            .started
            .map_or(true, |started| now.saturating_duration_since(started) >= self.window);
        if expired {
            state.started = Some(now);
            state.calls = 0;
        }

        state.calls = state.calls.saturating_add(1);
        state.calls <= self.max_calls
    }
}

impl Default for InvocationThrottle {
    fn default() -> Self {
        Self::from_config(&ThrottleConfig::default())
    }
}
