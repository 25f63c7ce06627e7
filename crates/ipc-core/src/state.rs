//! The four-state buffer ownership protocol (spec §3).
//!
//! ```text
//! IDLE --acquire_for_write--> WRITING --commit--> READY --acquire_for_read--> READING --release--> IDLE
//! ```
//! All other transitions are rejected. Encoded as a `u32` for atomic
//! compare-and-swap on the shared control block.

use core::sync::atomic::{AtomicU32, Ordering};

#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferState {
    Idle = 0,
    Writing = 1,
    Ready = 2,
    Reading = 3,
}

impl BufferState {
    #[inline]
    const fn as_u32(self) -> u32 {
        self as u32
    }

    /// Reverse of the `#[repr(u32)]` discriminant mapping. Any value read
    /// back from shared memory is guaranteed to be one we wrote, so this
    /// never needs to represent "unknown".
    #[inline]
    fn from_u32(v: u32) -> Self {
        match v {
            0 => BufferState::Idle,
            1 => BufferState::Writing,
            2 => BufferState::Ready,
            3 => BufferState::Reading,
            _ => unreachable!("buffer state word holds a value never written by this protocol"),
        }
    }
}

/// A `BufferState` stored for atomic, cache-line-isolated access.
///
/// `spec.md` §3 requires each `states[i]` to live on its own cache line when
/// the target requires it; `repr(align(64))` makes that unconditional here
/// since the crate has no portable way to query the target's line size at
/// compile time (the same tradeoff `vorago-shared-hal` makes with its
/// register-block alignment `static_assert!`s).
#[repr(C, align(64))]
pub struct AtomicBufferState {
    word: AtomicU32,
}

impl AtomicBufferState {
    pub const fn new(initial: BufferState) -> Self {
        Self {
            word: AtomicU32::new(initial.as_u32()),
        }
    }

    #[inline]
    pub fn load(&self) -> BufferState {
        BufferState::from_u32(self.word.load(Ordering::SeqCst))
    }

    /// Attempt the `from -> to` transition. Returns `Ok(())` on success,
    /// `Err(actual)` with the observed state on failure (the caller decides
    /// whether that's a retry or a `WRONG_STATE` error).
    #[inline]
    pub fn try_transition(&self, from: BufferState, to: BufferState) -> Result<(), BufferState> {
        match self.word.compare_exchange(
            from.as_u32(),
            to.as_u32(),
            Ordering::SeqCst,
            Ordering::SeqCst,
        ) {
            Ok(_) => Ok(()),
            Err(actual) => Err(BufferState::from_u32(actual)),
        }
    }

    #[inline]
    pub fn force_set(&self, to: BufferState) {
        self.word.store(to.as_u32(), Ordering::SeqCst);
    }
}
