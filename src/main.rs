// SPDX-License-Identifier: MIT
//
// n-plasma — a true-color plasma animation drawn through n-fmt.
//
// Every cell asks for its background color, every frame, unconditionally.
// Colors are quantized, so neighbouring cells often agree and the session
// drops the repeated requests. Each frame is assembled in one OutputBuffer
// and sent with a single write.
//
//   frame := hide(true)
//            ( bg_rgb(cell) " " )*cols  bg_default "\n"   per row
//            rpos(-rows, 0)
//
// The relative move back to the top forgets cached colors, so the first
// cell of every frame is always written.
//
// Usage:
//   n-plasma [duration-ms] [seed]
//
// RUST_LOG=n_fmt=trace shows every skip on stderr.

use std::env;
use std::f32::consts::TAU;
use std::io::Write;
use std::process;
use std::thread;
use std::time::{Duration, Instant};

use n_fmt::{FormatError, Session, Tracked, bg_default, bg_rgb, clear, hide, rpos};
use n_term::output::OutputBuffer;
use n_term::terminal::{self, Size};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_DURATION_MS: u64 = 4000;
const FRAME: Duration = Duration::from_millis(25);
const MAX_ROWS: u16 = 20;
const MAX_COLS: u16 = 80;

/// Color steps per channel. Lower means longer runs of equal cells.
const LEVELS: f32 = 8.0;

// ─── Arguments ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Args {
    duration: Duration,
    seed: u64,
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let number = |i: usize, default: u64, what: &str| -> Result<u64, String> {
        args.get(i).map_or(Ok(default), |raw| {
            raw.parse()
                .map_err(|_| format!("invalid {what}: {raw:?}"))
        })
    };
    if args.len() > 3 {
        return Err("usage: n-plasma [duration-ms] [seed]".into());
    }
    Ok(Args {
        duration: Duration::from_millis(number(1, DEFAULT_DURATION_MS, "duration")?),
        seed: number(2, 0, "seed")?,
    })
}

// ─── Shading ────────────────────────────────────────────────────────────────

/// Plasma intensity at a cell, in `0.0..=1.0`.
fn intensity(col: u16, row: u16, t: f32) -> f32 {
    let x = f32::from(col);
    // Cells are roughly twice as tall as wide.
    let y = f32::from(row) * 2.0;
    let v = (x / 8.0 + t).sin()
        + (y / 6.0 + t * 1.3).sin()
        + ((x + y) / 12.0 + t * 0.7).sin()
        + ((x * x + y * y).sqrt() / 6.0 - t).sin();
    (v / 4.0 + 1.0) / 2.0
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn channel(v: f32, phase: f32) -> u8 {
    let raw = (v * TAU + phase).sin().mul_add(0.5, 0.5);
    let stepped = (raw * (LEVELS - 1.0)).round() / (LEVELS - 1.0);
    (stepped.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Quantized RGB for an intensity.
fn shade(v: f32) -> (u8, u8, u8) {
    (
        channel(v, 0.0),
        channel(v, TAU / 3.0),
        channel(v, 2.0 * TAU / 3.0),
    )
}

// ─── Rendering ──────────────────────────────────────────────────────────────

/// Append one frame to `out`. The cursor ends where it started.
fn render_frame<W: Write>(
    session: &Session,
    out: &mut Tracked<W>,
    size: Size,
    mut color_at: impl FnMut(u16, u16) -> (u8, u8, u8),
) -> Result<(), FormatError> {
    session.apply(hide(true), out)?;
    for row in 0..size.rows {
        for col in 0..size.cols {
            let (r, g, b) = color_at(col, row);
            session.apply(bg_rgb(r, g, b), out)?;
            out.write_all(b" ")?;
        }
        session.apply(bg_default(), out)?;
        out.write_all(b"\n")?;
    }
    let up = i16::try_from(size.rows).unwrap_or(i16::MAX);
    session.apply(rpos(-up, 0), out)?;
    Ok(())
}

/// Leave the cursor below the drawing, visible, with attributes reset.
fn finish<W: Write>(session: &Session, out: &mut Tracked<W>, size: Size) -> Result<(), FormatError> {
    let down = i16::try_from(size.rows).unwrap_or(i16::MAX);
    session.apply(rpos(down, 0), out)?;
    session.apply(clear(), out)?;
    session.apply(hide(false), out)?;
    Ok(())
}

fn canvas() -> Size {
    let term = terminal::get_size().unwrap_or(Size::FALLBACK);
    Size {
        cols: term.cols.min(MAX_COLS).max(1),
        rows: term.rows.saturating_sub(4).min(MAX_ROWS).max(1),
    }
}

#[allow(clippy::cast_precision_loss)]
fn run(args: Args) -> Result<(), FormatError> {
    if !terminal::is_tty() {
        warn!("stdout is not a terminal, escape codes will be written as-is");
    }
    let session = Session::global();
    let size = canvas();
    let mut out = Tracked::new(OutputBuffer::new());
    let phase = (args.seed % 1000) as f32 * 0.37;
    debug!(cols = size.cols, rows = size.rows, seed = args.seed, "starting");

    let start = Instant::now();
    let mut frames = 0_u64;
    let mut bytes = 0_usize;
    while start.elapsed() < args.duration {
        let tick = Instant::now();
        let t = phase + start.elapsed().as_secs_f32() * 2.0;
        render_frame(session, &mut out, size, |col, row| shade(intensity(col, row, t)))?;
        bytes += out.get_ref().len();
        out.get_mut().flush_stdout()?;
        frames += 1;
        thread::sleep(FRAME.saturating_sub(tick.elapsed()));
    }

    finish(session, &mut out, size)?;
    out.get_mut().flush_stdout()?;

    let cells = u64::from(size.area()) * frames;
    info!(frames, bytes, cells, "done");
    Ok(())
}

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let argv: Vec<String> = env::args().collect();
    let args = parse_args(&argv).unwrap_or_else(|e| {
        eprintln!("n-plasma: {e}");
        process::exit(2);
    });

    terminal::install_panic_hook();

    if let Err(e) = run(args) {
        eprintln!("n-plasma: {e}");
        process::exit(1);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
