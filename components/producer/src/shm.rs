//! Maps the shared-region file both drivers agree on by path.
//!
//! A real deployment's "shared SRAM between two cores" becomes, for this
//! host demo, a single `mmap`'d file both processes open — `memmap2` is
//! already part of the host-tool stack (`kaal-elfloader-builder`), so this
//! reuses it rather than reaching for something new.

use anyhow::{Context, Result};
use ipc_core::{ControlBlock, SharedRegion, CONTROL_BLOCK_SIZE};
use memmap2::MmapMut;
use std::fs::OpenOptions;
use std::path::Path;

pub struct MappedRegion {
    // Kept alive for the process lifetime; the region borrows from it.
    _mmap: MmapMut,
    pub region: SharedRegion,
}

impl MappedRegion {
    /// Opens (creating if needed) the shared file at `path`, sized for two
    /// `buffer_size`-byte buffers plus the control block, and maps it.
    pub fn open(path: &Path, buffer_size: usize) -> Result<Self> {
        let total_len = 2 * buffer_size + CONTROL_BLOCK_SIZE;
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path)
            .with_context(|| format!("opening shared region file {}", path.display()))?;
        file.set_len(total_len as u64)
            .context("sizing shared region file")?;
        let mut mmap = unsafe { MmapMut::map_mut(&file)? };
        let base = mmap.as_mut_ptr();
        let region = unsafe { SharedRegion::from_raw_parts(base, buffer_size, CONTROL_BLOCK_SIZE) };
        Ok(Self { _mmap: mmap, region })
    }

    /// Typed view over the control block placed at the tail of the region.
    ///
    /// # Safety
    /// The file must have been sized and laid out by [`Self::open`]; this
    /// crate is always the one that does so.
    pub fn control_block(&self) -> &ControlBlock {
        unsafe { &*(self.region.control_block_ptr() as *const ControlBlock) }
    }
}

/// A `PeerNotifier` that does nothing: these two binaries are separate OS
/// processes with no shared doorbell channel, so progress relies entirely
/// on the protocol's self-healing poll (spec §9: a doorbell that never
/// arrives is safe because every scan is idempotent).
pub struct NullNotifier;

impl ipc_core::PeerNotifier for NullNotifier {
    fn notify_consumer(&self) {}
    fn notify_producer(&self) {}
}
