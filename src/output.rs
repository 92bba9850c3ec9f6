//! UTF-8-safe truncation, line-number layout, ANSI styling, and locked
//! emission.
//!
//! Every byte this program writes to stdout or stderr goes out while the
//! process-wide output lock is held, so per-file blocks and diagnostics are
//! never interleaved between workers.
use crate::cli::Options;
use crate::processor::MatchRecord;
use once_cell::sync::Lazy;
use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

/// Lines longer than this are truncated unless `--long-lines` is set.
pub const TRUNCATE_LEN: usize = 2048;

const BOLD_ON: &str = "\x1b[1m";
const BOLD_OFF: &str = "\x1b[0m";
const ELLIPSIS: &str = "…";

static OUTPUT_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

fn lock_output() -> MutexGuard<'static, ()> {
    OUTPUT_LOCK.lock().unwrap()
}

/// Truncate one line to at most [`TRUNCATE_LEN`] bytes without cutting a
/// UTF-8 codepoint in half.
///
/// Scans backwards over at most four continuation bytes and checks that the
/// byte they hang off is a leader of exactly that length; a partial
/// codepoint at the cut is dropped entirely. Five or more continuation
/// bytes is not valid UTF-8, so the raw cut passes through. Returns the
/// span to print and whether anything was dropped.
pub fn truncate_line(line: &[u8], long_lines: bool) -> (&[u8], bool) {
    if long_lines || line.len() <= TRUNCATE_LEN {
        return (line, false);
    }
    let mut keep = &line[..TRUNCATE_LEN];
    let mut tail = 0;
    while tail < 4 && (keep[keep.len() - 1 - tail] & 0xc0) == 0x80 {
        tail += 1;
    }
    // leader-byte mask/check pairs, indexed by continuation count
    const MASK_CHECK: [(u8, u8); 5] = [
        (0x80, 0x00), // 1 from end: must be ASCII
        (0xe0, 0xc0), // 2 from end: ok if it's a 2-byte code point
        (0xf0, 0xe0), // 3 from end
        (0xf8, 0xf0), // 4 from end
        (0x00, 0x00), // not valid utf8; pass through
    ];
    let (mask, check) = MASK_CHECK[tail];
    if keep[keep.len() - 1 - tail] & mask != check {
        keep = &keep[..keep.len() - 1 - tail];
    }
    (keep, true)
}

/// Decimal width of `n`, for the line-number column.
pub fn decimal_width(n: u64) -> usize {
    let mut width = 1;
    let mut n = n;
    while n >= 10 {
        width += 1;
        n /= 10;
    }
    width
}

/// Path as printed in headers and diagnostics.
///
/// A path reached through the implicit `.` starting point is shown without
/// the leading `./`.
pub fn display_path(path: &Path) -> String {
    match path.strip_prefix(".") {
        Ok(stripped) if !stripped.as_os_str().is_empty() => stripped.display().to_string(),
        _ => path.display().to_string(),
    }
}

/// Render one file's report block.
///
/// An empty record list renders the whole-buffer-match notice used by
/// multiline mode. The leading blank line between file blocks is decided at
/// emission time, not here.
pub fn render_file_block(
    path: &Path,
    records: &[MatchRecord],
    opts: &Options,
) -> io::Result<Vec<u8>> {
    let (bold_on, bold_off) = if opts.stdout_is_tty {
        (BOLD_ON, BOLD_OFF)
    } else {
        ("", "")
    };
    let mut out = Vec::new();
    writeln!(out, "{bold_on}{}{bold_off}", display_path(path))?;
    if records.is_empty() {
        writeln!(out, "(file matched, but no lines matched)")?;
        return Ok(out);
    }

    // Records are in ascending line order, so the last one is the widest.
    let width = decimal_width(records.last().map_or(1, |r| r.line));
    let separators = opts.before_context > 0 || opts.after_context > 0;
    let mut last_line = 0u64;
    for rec in records {
        if separators && last_line != 0 && rec.line != last_line + 1 {
            writeln!(out, "--")?;
        }
        last_line = rec.line;
        let delim = if rec.is_context { '-' } else { ':' };
        let (pre_line, post_line) = if rec.is_context {
            ("", "")
        } else {
            (bold_on, bold_off)
        };
        write!(out, "{pre_line}{:>width$}{post_line}{delim}", rec.line)?;
        out.write_all(rec.text)?;
        if rec.truncated {
            write!(out, "{bold_on}{ELLIPSIS}{bold_off}")?;
        }
        writeln!(out)?;
    }
    Ok(out)
}

/// Write a rendered file block, preceded by a blank line if an earlier file
/// already produced output.
pub fn emit_file_block(matched_any: &AtomicBool, block: &[u8]) -> io::Result<()> {
    let _guard = lock_output();
    let mut stdout = io::stdout().lock();
    if matched_any.swap(true, Ordering::SeqCst) {
        writeln!(stdout)?;
    }
    stdout.write_all(block)?;
    stdout.flush()
}

/// `--files-with-matches` output: just the path.
pub fn emit_path(matched_any: &AtomicBool, path: &Path) -> io::Result<()> {
    let _guard = lock_output();
    matched_any.store(true, Ordering::SeqCst);
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", display_path(path))?;
    stdout.flush()
}

/// `--count` output: `<path>:<count>`.
pub fn emit_count(matched_any: &AtomicBool, path: &Path, count: usize) -> io::Result<()> {
    let _guard = lock_output();
    matched_any.store(true, Ordering::SeqCst);
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}:{count}", display_path(path))?;
    stdout.flush()
}

/// One diagnostic line on stderr, serialized with all other output.
pub fn emit_error(message: &str) {
    let _guard = lock_output();
    eprintln!("{message}");
}
