//! Notifier (spec §4.2): mediates between buffer-state changes and the
//! hardware doorbells, fencing before every trigger.

use crate::buffer_manager::PeerNotifier;
use crate::platform::Doorbell;
use core::sync::atomic::{fence, Ordering};

/// Thin wrapper over the two doorbell channels (producer->consumer,
/// consumer->producer). Triggering is fire-and-forget: it carries no
/// payload, and the peer infers meaning by scanning the control block.
pub struct Notifier<C: Doorbell, P: Doorbell> {
    to_consumer: C,
    to_producer: P,
}

impl<C: Doorbell, P: Doorbell> Notifier<C, P> {
    pub fn new(to_consumer: C, to_producer: P) -> Self {
        Self { to_consumer, to_producer }
    }

    /// Enable both channels. Call once before the first commit/release.
    pub fn initialize(&self) {
        self.to_consumer.enable();
        self.to_producer.enable();
    }

    #[cfg(feature = "alloc")]
    pub fn on_consumer_doorbell(&self, cb: alloc::boxed::Box<dyn Fn() + Send + Sync>) {
        self.to_consumer.register_callback(cb);
    }

    #[cfg(feature = "alloc")]
    pub fn on_producer_doorbell(&self, cb: alloc::boxed::Box<dyn Fn() + Send + Sync>) {
        self.to_producer.register_callback(cb);
    }
}

impl<C: Doorbell, P: Doorbell> PeerNotifier for Notifier<C, P> {
    /// Full memory fence, then trigger. Guarantees every buffer/state write
    /// preceding this call is globally visible before the peer's ISR fires.
    fn notify_consumer(&self) {
        fence(Ordering::SeqCst);
        self.to_consumer.send();
        log::trace!("notified consumer");
    }

    fn notify_producer(&self) {
        fence(Ordering::SeqCst);
        self.to_producer.send();
        log::trace!("notified producer");
    }
}
