//! Producer driver (spec.md §4.4): fills ping-pong buffers with raw counter
//! frames or a Q15 sine signal, one `acquire_for_write` -> fill -> `commit`
//! cycle at a time.

mod shm;

use anyhow::{Context, Result};
use clap::Parser;
use fft_q15::Q15;
use ipc_core::{BufferManager, IpcError};
use ipc_platform::SimClock;
use shm::{MappedRegion, NullNotifier};
use std::f32::consts::PI;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "kaal-ipc-producer")]
#[command(about = "Fill ping-pong buffers with frames for a waiting consumer")]
struct Args {
    /// Path to the shared-region file (created if missing).
    #[arg(long)]
    shm_path: PathBuf,

    /// Body size of each of the two buffers, in bytes.
    #[arg(long, default_value_t = 4096)]
    buffer_size: usize,

    /// Per-call acquire timeout, in milliseconds.
    #[arg(long, default_value_t = 1000)]
    timeout_ms: u32,

    /// How many write cycles to run before exiting.
    #[arg(long, default_value_t = 1000)]
    frames: u32,

    /// Delay between commits, in milliseconds (spec.md E1 default: 10ms).
    #[arg(long, default_value_t = 10)]
    period_ms: u64,

    /// If set, fill each frame with a Q15 sine tone of this many supported
    /// FFT length (4096 or 8192) instead of a raw counter pattern.
    #[arg(long)]
    fft_size: Option<usize>,

    /// Sine tone frequency, in whole cycles over the fft window.
    #[arg(long, default_value_t = 100)]
    tone_cycles: usize,

    /// How long to wait for the consumer's `initialize()` before giving up.
    #[arg(long, default_value_t = 5000)]
    startup_timeout_ms: u64,
}

fn fill_raw_pattern(buf: &mut [u8], frame: u32) {
    buf[..4].copy_from_slice(&frame.to_le_bytes());
    for (i, b) in buf.iter_mut().enumerate().skip(4) {
        *b = (frame.wrapping_add(i as u32) % 256) as u8;
    }
}

fn fill_fft_tone(buf: &mut [u8], n: usize, cycles: usize) {
    for i in 0..n {
        let phase = 2.0 * PI * (cycles as f32) * (i as f32) / (n as f32);
        let sample = Q15::from_f32(0.5 * phase.sin());
        buf[2 * i..2 * i + 2].copy_from_slice(&sample.0.to_le_bytes());
    }
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
        anyhow::ensure!(
            args.buffer_size >= n * 2,
            "--buffer-size must hold at least {} bytes for an {}-sample Q15 frame",
            n * 2,
            n
        );
    }

    let mapped = MappedRegion::open(&args.shm_path, args.buffer_size)
        .context("mapping shared region")?;
    let control = mapped.control_block();

    log::info!("waiting for consumer to initialize the control block...");
    let deadline = std::time::Instant::now() + Duration::from_millis(args.startup_timeout_ms);
    while !control.is_consumer_ready() {
        if std::time::Instant::now() >= deadline {
            anyhow::bail!("consumer did not initialize within {}ms", args.startup_timeout_ms);
        }
        thread::sleep(Duration::from_millis(20));
    }
    log::info!("consumer ready, buffer_size={}", control.buffer_size());

    let clock = SimClock::new();
    let notifier = NullNotifier;
    let mgr = BufferManager::new(control, &mapped.region, &notifier, &clock);

    for frame in 0..args.frames {
        match mgr.acquire_for_write(args.timeout_ms) {
            Ok(mut handle) => {
                let buf = unsafe { handle.as_mut_slice() };
                match args.fft_size {
                    Some(n) => fill_fft_tone(buf, n, args.tone_cycles),
                    None => fill_raw_pattern(buf, frame),
                }
                mgr.commit(handle).context("commit")?;
            }
            Err(IpcError::Timeout) => {
                log::warn!("frame {frame}: acquire_for_write timed out, retrying");
                continue;
            }
            Err(e @ IpcError::WrongState { .. }) => {
                anyhow::bail!("fatal protocol violation: {e}");
            }
            Err(e) => anyhow::bail!("acquire_for_write failed: {e}"),
        }
        thread::sleep(Duration::from_millis(args.period_ms));
    }

    let stats = mgr.stats();
    log::info!(
        "done: writes={}/{} overruns={} timeouts={}",
        stats.write_count[0] + stats.write_count[1],
        args.frames,
        stats.overrun_count,
        stats.timeout_count,
    );
    Ok(())
}
