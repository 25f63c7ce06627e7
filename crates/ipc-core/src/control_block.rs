//! The shared Control Block (spec §3, §6).
//!
//! Single shared record holding both buffers' states, counters and
//! timestamps. Field layout is `repr(C)` and must be agreed byte-for-byte
//! between producer and consumer builds, per spec §6 — this module is the
//! single source of truth for that layout on both sides.

use crate::state::{AtomicBufferState, BufferState};
use core::sync::atomic::{AtomicU32, Ordering};
use portable_atomic::AtomicU64;
use static_assertions::const_assert;

/// Build-time constant size of the control block region (spec §6: 32 KiB).
pub const CONTROL_BLOCK_SIZE: usize = 32 * 1024;

#[repr(C)]
struct ControlBlockHeader {
    /// Each on its own cache line (spec §3); `AtomicBufferState` is `align(64)`.
    states: [AtomicBufferState; 2],
    write_count: [AtomicU32; 2],
    read_count: [AtomicU32; 2],
    overrun_count: AtomicU32,
    timeout_count: AtomicU32,
    last_write_ts: [AtomicU64; 2],
    last_read_ts: [AtomicU64; 2],
    buffer_size: AtomicU32,
    timeout_ms: AtomicU32,
    consumer_ready: AtomicU32,
}

const_assert!(core::mem::size_of::<ControlBlockHeader>() <= CONTROL_BLOCK_SIZE);

/// The full control block, header plus reserved padding to exactly
/// [`CONTROL_BLOCK_SIZE`] so producer and consumer builds agree on the
/// control-block-to-next-region stride even if the header grows.
#[repr(C)]
pub struct ControlBlock {
    header: ControlBlockHeader,
    _reserved: [u8; CONTROL_BLOCK_SIZE - core::mem::size_of::<ControlBlockHeader>()],
}

const_assert!(core::mem::size_of::<ControlBlock>() == CONTROL_BLOCK_SIZE);

impl ControlBlock {
    /// Zero the control block, set both states IDLE, raise `consumer_ready`,
    /// and record the configured `buffer_size`/`timeout_ms`. Called once at
    /// consumer startup. Idempotent: calling again observes the same state
    /// (spec §4.1, §8 invariant 8) because every field it touches is
    /// unconditionally overwritten with the same values, not accumulated.
    pub fn initialize(&self, buffer_size: u32, timeout_ms: u32) {
        for s in &self.header.states {
            s.force_set(BufferState::Idle);
        }
        for c in &self.header.write_count {
            c.store(0, Ordering::SeqCst);
        }
        for c in &self.header.read_count {
            c.store(0, Ordering::SeqCst);
        }
        self.header.overrun_count.store(0, Ordering::SeqCst);
        self.header.timeout_count.store(0, Ordering::SeqCst);
        for t in &self.header.last_write_ts {
            t.store(0, Ordering::SeqCst);
        }
        for t in &self.header.last_read_ts {
            t.store(0, Ordering::SeqCst);
        }
        self.header.buffer_size.store(buffer_size, Ordering::SeqCst);
        self.header.timeout_ms.store(timeout_ms, Ordering::SeqCst);
        core::sync::atomic::fence(Ordering::SeqCst);
        self.header.consumer_ready.store(1, Ordering::SeqCst);
    }

    pub fn is_consumer_ready(&self) -> bool {
        self.header.consumer_ready.load(Ordering::SeqCst) != 0
    }

    pub fn state(&self, id: u8) -> &AtomicBufferState {
        &self.header.states[id as usize]
    }

    pub fn write_count(&self, id: u8) -> u32 {
        self.header.write_count[id as usize].load(Ordering::SeqCst)
    }

    pub fn read_count(&self, id: u8) -> u32 {
        self.header.read_count[id as usize].load(Ordering::SeqCst)
    }

    pub fn bump_write_count(&self, id: u8) {
        self.header.write_count[id as usize].fetch_add(1, Ordering::SeqCst);
    }

    pub fn bump_read_count(&self, id: u8) {
        self.header.read_count[id as usize].fetch_add(1, Ordering::SeqCst);
    }

    pub fn overrun_count(&self) -> u32 {
        self.header.overrun_count.load(Ordering::SeqCst)
    }

    pub fn bump_overrun_count(&self) {
        self.header.overrun_count.fetch_add(1, Ordering::SeqCst);
    }

    pub fn timeout_count(&self) -> u32 {
        self.header.timeout_count.load(Ordering::SeqCst)
    }

    pub fn bump_timeout_count(&self) {
        self.header.timeout_count.fetch_add(1, Ordering::SeqCst);
    }

    pub fn last_write_ts(&self, id: u8) -> u64 {
        self.header.last_write_ts[id as usize].load(Ordering::SeqCst)
    }

    pub fn set_last_write_ts(&self, id: u8, ts: u64) {
        self.header.last_write_ts[id as usize].store(ts, Ordering::SeqCst);
    }

    pub fn last_read_ts(&self, id: u8) -> u64 {
        self.header.last_read_ts[id as usize].load(Ordering::SeqCst)
    }

    pub fn set_last_read_ts(&self, id: u8, ts: u64) {
        self.header.last_read_ts[id as usize].store(ts, Ordering::SeqCst);
    }

    pub fn buffer_size(&self) -> u32 {
        self.header.buffer_size.load(Ordering::SeqCst)
    }

    pub fn timeout_ms(&self) -> u32 {
        self.header.timeout_ms.load(Ordering::SeqCst)
    }
}
