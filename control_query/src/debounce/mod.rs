//! # Debounce
//!
//! Poll-driven debouncing for rapidly changing inputs such as a search box.
//! A scheduled value is only delivered after the input has been quiet for the
//! configured delay; each new schedule restarts the wait and replaces the
//! pending value. Time comes from an injectable [`Clock`] so callers drive
//! delivery from their own event loop and tests stay deterministic.

use crate::log_debug;
use crate::logging::codes;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Monotonic time source
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug)]
struct Pending<T> {
    value: T,
    due: Instant,
}

/// Delivers the latest scheduled value once no newer one arrives within `delay`
pub struct Debouncer<T> {
    delay: Duration,
    clock: Arc<dyn Clock>,
    pending: Option<Pending<T>>,
    disposed: bool,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self::with_clock(delay, Arc::new(SystemClock))
    }

    pub fn with_clock(delay: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            delay,
            clock,
            pending: None,
            disposed: false,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace any pending value and restart the quiet period.
    /// Returns false once disposed.
    pub fn schedule(&mut self, value: T) -> bool {
        if self.disposed {
            return false;
        }
        self.pending = Some(Pending {
            value,
            due: self.clock.now() + self.delay,
        });
        true
    }

    /// Take the pending value if its quiet period has elapsed
    pub fn poll(&mut self) -> Option<T> {
        let due = self.pending.as_ref()?.due;
        if self.clock.now() < due {
            return None;
        }
        let pending = self.pending.take()?;
        log_debug!(
            codes::query::DEBOUNCE_FIRED,
            "Debounced value delivered",
            "delay_ms" => self.delay.as_millis()
        );
        Some(pending.value)
    }

    /// Take the pending value immediately, ignoring the delay
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|pending| pending.value)
    }

    /// Drop the pending value without delivering it
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Cancel and refuse all further schedules
    pub fn dispose(&mut self) {
        self.cancel();
        self.disposed = true;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Time left before the pending value becomes deliverable
    pub fn remaining(&self) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|pending| pending.due.saturating_duration_since(self.clock.now()))
    }
}

/// A value that trails its input by the debounce delay
pub struct DebouncedValue<T> {
    current: T,
    debouncer: Debouncer<T>,
}

impl<T> DebouncedValue<T> {
    pub fn new(initial: T, delay: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            current: initial,
            debouncer: Debouncer::with_clock(delay, clock),
        }
    }

    /// Settled value
    pub fn get(&self) -> &T {
        &self.current
    }

    pub fn set(&mut self, value: T) {
        self.debouncer.schedule(value);
    }

    /// Apply a pending value whose delay elapsed; true when the settled value changed
    pub fn tick(&mut self) -> bool {
        match self.debouncer.poll() {
            Some(value) => {
                self.current = value;
                true
            }
            None => false,
        }
    }

    /// Apply the pending value now
    pub fn flush(&mut self) -> bool {
        match self.debouncer.flush() {
            Some(value) => {
                self.current = value;
                true
            }
            None => false,
        }
    }

    /// Replace the settled value directly, discarding anything pending
    pub fn reset(&mut self, value: T) {
        self.debouncer.cancel();
        self.current = value;
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn dispose(&mut self) {
        self.debouncer.dispose();
    }
}
