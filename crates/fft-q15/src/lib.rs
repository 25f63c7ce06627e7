//! Q15 fixed-point radix-4 real FFT pipeline.
//!
//! `#![no_std]` for the same reason as `ipc-core`: this runs on the
//! consumer core's worker thread reading data straight out of shared
//! memory, with no heap. See [`rfft::RfftPlan`] for the high-level entry
//! point, [`ffi`] for the raw-pointer surface a C-style caller would use.
#![no_std]

pub mod bitrev;
pub mod cfft;
pub mod error;
pub mod ffi;
pub mod limits;
pub mod q15;
pub mod rfft;
pub mod tables;
pub mod topbins;

pub use cfft::cfft;
pub use error::{FftError, Result};
pub use limits::{size_info, SizeInfo, MAX_M, MAX_N, SUPPORTED_N};
pub use q15::{ComplexQ15, Q15};
pub use rfft::RfftPlan;
pub use topbins::{find_top_bins, BinRecord};
