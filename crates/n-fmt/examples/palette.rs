// SPDX-License-Identifier: MIT
//
// n-fmt palette — attribute toggles and the full 256-color table.
//
// Every cell of the tables below issues its color request unconditionally;
// the session drops the ones the terminal already has. Set
// RUST_LOG=n_fmt=trace to watch the skips.
//
// Usage:
//   cargo run -p n-fmt --example palette

use std::io::{self, Write};

use n_fmt::{FormatError, Session, bg, bg_default, bold, clear, fg, fg_default, italic, underline};
use tracing_subscriber::EnvFilter;

fn attributes(s: &Session, out: &mut io::StdoutLock<'_>) -> Result<(), FormatError> {
    for (name, on, off) in [
        ("bold", bold(true), bold(false)),
        ("italic", italic(true), italic(false)),
        ("underline", underline(true), underline(false)),
    ] {
        s.apply(on, out)?;
        write!(out, "{name}")?;
        s.apply(off, out)?;
        write!(out, " ")?;
    }
    s.apply(clear(), out)?;
    writeln!(out)?;
    Ok(())
}

/// 16 rows of 16 swatches; foreground numbers on a fixed background, then
/// the background table with the number in the default foreground.
fn grid(s: &Session, out: &mut io::StdoutLock<'_>) -> Result<(), FormatError> {
    for row in 0..16 {
        s.apply(bg(0)?, out)?;
        for col in 0..16 {
            s.apply(fg(row * 16 + col)?, out)?;
            write!(out, "{:>4}", row * 16 + col)?;
        }
        s.apply(bg_default(), out)?;
        s.apply(fg_default(), out)?;
        writeln!(out)?;
    }
    writeln!(out)?;
    for row in 0..16 {
        for col in 0..16 {
            s.apply(bg(row * 16 + col)?, out)?;
            write!(out, "    ")?;
        }
        s.apply(bg_default(), out)?;
        writeln!(out)?;
    }
    Ok(())
}

fn main() -> Result<(), FormatError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let session = Session::global();
    let mut out = io::stdout().lock();
    attributes(session, &mut out)?;
    grid(session, &mut out)?;
    out.flush()?;
    Ok(())
}
