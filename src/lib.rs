//! # gr - Parallel Recursive Regex File Search
//!
//! A command-line utility that walks one or more paths, searches every
//! readable text file against a regular expression, and prints matching
//! lines grouped by file with optional before/after context.
//!
//! ## Architecture
//!
//! - **Job queue**: one FIFO shared by a pool of worker threads. Jobs push
//!   further jobs (a directory expands into one job per entry), and the
//!   pool terminates exactly when no queued or running job remains.
//! - **Search pipeline**: each file is read whole, cheaply rejected if
//!   binary, then matched per line with a bounded before-context window.
//! - **Output**: per-file blocks are rendered off-lock and emitted under a
//!   process-wide lock, so concurrent workers never interleave files.
//!
//! Line truncation is UTF-8 aware: over-long lines are cut at ~2 KiB on a
//! codepoint boundary and flagged with a trailing ellipsis.

/// Shared state and the worker-pool driver
pub mod app;

/// Command-line interface definitions and option compilation
pub mod cli;

/// Error types and result handling
pub mod error;

/// UTF-8-safe truncation and locked output emission
pub mod output;

/// Lazy once-only regex compilation
pub mod pattern;

/// Per-file search pipeline
pub mod processor;

/// Job variants and the work queue
pub mod queue;

/// Bounded circular buffer for before-context
pub mod ring;

/// Path expansion and the dotfile rule
pub mod walker;

pub use cli::{Cli, Options};
pub use error::{GrError, Result};
pub use output::truncate_line;
pub use processor::{collect_matches, is_binary, MatchRecord};
pub use ring::BoundedRing;
