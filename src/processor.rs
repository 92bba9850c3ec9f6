// processor.rs
//! Per-file search pipeline: read, binary-reject, match, report.
use crate::app::GlobalState;
use crate::cli::Options;
use crate::error::Result;
use crate::output;
use crate::ring::BoundedRing;
use log::debug;
use memchr::memchr;
use regex::bytes::Regex;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// How many leading bytes are sniffed for the binary check.
const BINARY_SNIFF_LEN: u64 = 512;

/// One printable line of a file report. `text` borrows the file buffer, so
/// records never outlive the search job that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchRecord<'a> {
    pub line: u64,
    pub text: &'a [u8],
    pub truncated: bool,
    pub is_context: bool,
}

/// Binary sniff over the first bytes of a file.
///
/// A NUL byte or a `%PDF-` signature marks the file binary; a UTF-8 BOM is
/// explicitly text even though it starts with high bytes.
pub fn is_binary(prefix: &[u8]) -> bool {
    if prefix.is_empty() {
        return false;
    }
    if prefix.starts_with(b"\xef\xbb\xbf") {
        // UTF-8 BOM
        return false;
    }
    if prefix.starts_with(b"%PDF-") {
        return true;
    }
    memchr(0, prefix).is_some()
}

/// Walk `buf` line by line and collect match and context records.
///
/// Lines are `\n`-delimited and the last line need not be terminated. The
/// regex is probed against the truncated span, matching what gets printed.
/// Non-matching lines go to the after-context while its budget lasts, then
/// into the bounded before-context ring; a match flushes the ring ahead of
/// itself and restarts the after budget.
pub fn collect_matches<'a>(buf: &'a [u8], re: &Regex, opts: &Options) -> Vec<MatchRecord<'a>> {
    let mut records = Vec::new();
    let mut before: BoundedRing<(&[u8], bool)> = BoundedRing::new(opts.before_context);
    let mut after_left = 0usize;
    let mut line_no = 0u64;
    let mut rest = buf;
    while !rest.is_empty() {
        line_no += 1;
        let (raw, advance) = match memchr(b'\n', rest) {
            Some(nl) => (&rest[..nl], nl + 1),
            None => (rest, rest.len()),
        };
        let (text, truncated) = output::truncate_line(raw, opts.long_lines);
        if re.is_match(text) {
            let mut pre_line = line_no - before.len() as u64;
            for &(pre_text, pre_trunc) in before.iter() {
                records.push(MatchRecord {
                    line: pre_line,
                    text: pre_text,
                    truncated: pre_trunc,
                    is_context: true,
                });
                pre_line += 1;
            }
            before.clear();
            records.push(MatchRecord {
                line: line_no,
                text,
                truncated,
                is_context: false,
            });
            after_left = opts.after_context;
        } else if after_left > 0 {
            after_left -= 1;
            records.push(MatchRecord {
                line: line_no,
                text,
                truncated,
                is_context: true,
            });
        } else if opts.before_context > 0 {
            before.push((text, truncated));
        }
        rest = &rest[advance..];
    }
    records
}

fn any_line_matches(buf: &[u8], re: &Regex, opts: &Options) -> bool {
    let mut rest = buf;
    while !rest.is_empty() {
        let (raw, advance) = match memchr(b'\n', rest) {
            Some(nl) => (&rest[..nl], nl + 1),
            None => (rest, rest.len()),
        };
        let (text, _) = output::truncate_line(raw, opts.long_lines);
        if re.is_match(text) {
            return true;
        }
        rest = &rest[advance..];
    }
    false
}

/// Entry point for a search job. I/O failures are diagnosed and swallowed;
/// they must not take the worker down.
pub fn run_search(state: &GlobalState, path: &Path) {
    if let Err(e) = search_file(state, path) {
        output::emit_error(&format!(
            "Error on {}: {}",
            output::display_path(path),
            e
        ));
    }
}

fn search_file(state: &GlobalState, path: &Path) -> Result<()> {
    let opts = &state.opts;
    let mut file = File::open(path)?;
    let mut buf = Vec::new();
    file.by_ref().take(BINARY_SNIFF_LEN).read_to_end(&mut buf)?;
    if is_binary(&buf) {
        debug!("skipping binary file {}", path.display());
        return Ok(());
    }
    file.read_to_end(&mut buf)?;

    let re = state.regex.get();
    if opts.multiline && !re.is_match(&buf) {
        return Ok(());
    }

    if opts.files_with_matches {
        if opts.multiline || any_line_matches(&buf, re, opts) {
            output::emit_path(&state.matched_any, path)?;
        }
        return Ok(());
    }

    let records = collect_matches(&buf, re, opts);

    if opts.count {
        // Context is forced to 0 in count mode, so every record is a match.
        if !records.is_empty() {
            output::emit_count(&state.matched_any, path, records.len())?;
        }
        return Ok(());
    }

    if records.is_empty() && !opts.multiline {
        return Ok(());
    }
    let block = output::render_file_block(path, &records, opts)?;
    output::emit_file_block(&state.matched_any, &block)?;
    Ok(())
}
