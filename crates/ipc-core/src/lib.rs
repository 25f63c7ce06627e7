//! Ping-pong shared-memory buffer protocol core.
//!
//! # Purpose
//! Implements the four-state ownership protocol (`IDLE -> WRITING -> READY
//! -> READING -> IDLE`) over two fixed buffers in shared SRAM, coordinated
//! by hardware doorbell interrupts, per the design in `SPEC_FULL.md`.
//!
//! # Integration points
//! - Depends on: a [`platform::Clock`] and two [`platform::Doorbell`]
//!   channels, both external collaborators this crate only consumes
//!   through traits — see `ipc-platform` for a host-simulated backend.
//! - Provides to: producer/consumer drivers (`components/producer`,
//!   `components/consumer`) and, transitively, anything writing/consuming
//!   the Q15 FFT pipeline in `fft-q15`.
//!
//! # Design
//! Lock-free two-buffer ring with atomic compare-and-swap state transitions
//! and memory-fence-disciplined hand-off. No mutex or semaphore; correctness
//! rests entirely on sequentially consistent CAS plus full fences around
//! each notification (spec §5).

#![no_std]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod buffer_manager;
pub mod control_block;
pub mod error;
pub mod notifier;
pub mod platform;
pub mod shared_region;
pub mod state;

pub use buffer_manager::{BufferHandle, BufferManager, PeerNotifier, Statistics};
pub use control_block::{ControlBlock, CONTROL_BLOCK_SIZE};
pub use error::{IpcError, Result};
pub use notifier::Notifier;
pub use platform::{Clock, Doorbell};
pub use shared_region::SharedRegion;
pub use state::BufferState;
