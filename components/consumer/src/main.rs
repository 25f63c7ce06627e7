//! Consumer driver (spec.md §4.4): initializes the control block, then
//! polls for READY buffers and either validates the raw counter pattern or
//! runs the Q15 FFT pipeline over an incoming frame.

mod shm;

use anyhow::{Context, Result};
use clap::Parser;
use fft_q15::{find_top_bins, BinRecord, Q15};
use ipc_core::{BufferManager, IpcError};
use ipc_platform::SimClock;
use shm::{MappedRegion, NullNotifier};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "kaal-ipc-consumer")]
#[command(about = "Drain ping-pong buffers and validate or FFT-analyze each frame")]
struct Args {
    /// Path to the shared-region file (created if missing).
    #[arg(long)]
    shm_path: PathBuf,

    /// Body size of each of the two buffers, in bytes. Must match the
    /// producer's `--buffer-size`.
    #[arg(long, default_value_t = 4096)]
    buffer_size: usize,

    /// Per-operation timeout passed to `initialize()` for the control
    /// block's `timeout_ms` field (informational; the worker's own
    /// `acquire_for_read` calls are always non-blocking, per spec.md §4.4).
    #[arg(long, default_value_t = 1000)]
    timeout_ms: u32,

    /// How many frames to consume before exiting.
    #[arg(long, default_value_t = 1000)]
    frames: u32,

    /// Poll interval while no buffer is READY, in milliseconds.
    #[arg(long, default_value_t = 2)]
    poll_interval_ms: u64,

    /// If set, treat each frame as an `fft_size`-sample Q15 signal and log
    /// the single strongest bin instead of validating a raw pattern.
    #[arg(long)]
    fft_size: Option<usize>,
}

fn validate_raw_pattern(buf: &[u8], expected_frame: u32) -> bool {
    let mut frame_bytes = [0u8; 4];
    frame_bytes.copy_from_slice(&buf[..4]);
    let frame = u32::from_le_bytes(frame_bytes);
    buf.iter()
        .enumerate()
        .skip(4)
        .all(|(i, &b)| b == (frame.wrapping_add(i as u32) % 256) as u8)
        && frame == expected_frame
}

fn analyze_fft_frame(buf: &[u8], n: usize) -> Result<BinRecord> {
    anyhow::ensure!(buf.len() >= n * 2, "frame too short for a {}-sample transform", n);

    let mut samples = vec![Q15::ZERO; n];
    for (i, sample) in samples.iter_mut().enumerate() {
        let mut bytes = [0u8; 2];
        bytes.copy_from_slice(&buf[2 * i..2 * i + 2]);
        *sample = Q15(i16::from_le_bytes(bytes));
    }

    let mut winners = [BinRecord::default(); 1];
    find_top_bins(&samples, n, 1, &mut winners)?;
    Ok(winners[0])
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if let Some(n) = args.fft_size {
        anyhow::ensure!(
            fft_q15::SUPPORTED_N.contains(&n),
            "--fft-size must be one of {:?}",
            fft_q15::SUPPORTED_N
        );
    }

    let mapped = MappedRegion::open(&args.shm_path, args.buffer_size)
        .context("mapping shared region")?;
    let control = mapped.control_block();

    let clock = SimClock::new();
    let notifier = NullNotifier;
    let mgr = BufferManager::new(control, &mapped.region, &notifier, &clock);
    mgr.initialize(args.timeout_ms).context("initialize")?;
    log::info!("control block initialized, buffer_size={}", control.buffer_size());

    let mut consumed = 0u32;
    let mut expected_frame = 0u32;
    while consumed < args.frames {
        match mgr.acquire_for_read(0) {
            Ok(handle) => {
                let buf = unsafe { handle.as_slice() };
                match args.fft_size {
                    Some(n) => match analyze_fft_frame(buf, n) {
                        Ok(top) => log::info!(
                            "frame {consumed}: top bin index={} magnitude_sq={}",
                            top.index,
                            top.magnitude_sq
                        ),
                        Err(e) => log::warn!("frame {consumed}: fft analysis failed: {e}"),
                    },
                    None => {
                        if !validate_raw_pattern(buf, expected_frame) {
                            log::warn!("frame {consumed}: pattern mismatch (diagnostic only)");
                        }
                        expected_frame = expected_frame.wrapping_add(1);
                    }
                }
                mgr.release(handle).context("release")?;
                consumed += 1;
            }
            Err(IpcError::Timeout) => {
                // No READY buffer right now; a missed doorbell is
                // self-healing, so just poll again shortly.
                thread::sleep(Duration::from_millis(args.poll_interval_ms));
            }
            Err(e @ IpcError::WrongState { .. }) => {
                anyhow::bail!("fatal protocol violation: {e}");
            }
            Err(e) => anyhow::bail!("acquire_for_read failed: {e}"),
        }
    }

    let stats = mgr.stats();
    log::info!(
        "done: reads={}/{} overruns={}",
        stats.read_count[0] + stats.read_count[1],
        args.frames,
        stats.overrun_count,
    );
    Ok(())
}
