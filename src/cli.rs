//! Command-line interface definitions and option compilation.
use clap::Parser;
use std::path::PathBuf;

/// Raw argument surface.
///
/// Non-option arguments may appear anywhere (GNU-style permutation), long
/// options accept unambiguous prefixes, and `--` ends option parsing.
#[derive(Parser, Debug)]
#[command(
    name = "gr",
    // clap renders this as "<name> <string>", printing "gr version x.y.z"
    version = concat!("version ", env!("CARGO_PKG_VERSION")),
    disable_help_flag = true,
    disable_version_flag = true,
    infer_long_args = true,
    about = "Recursively search for pattern in path.\nUses the Rust regex library.",
    override_usage = "gr [options] <pattern> [path ...]"
)]
pub struct Cli {
    /// Show num lines of context after each match
    #[arg(short = 'A', long, value_name = "num", default_value_t = 0)]
    pub after_context: usize,

    /// Show num lines of context before each match
    #[arg(short = 'B', long, value_name = "num", default_value_t = 0)]
    pub before_context: usize,

    /// Show num lines before and after each match
    #[arg(short = 'C', long, value_name = "num")]
    pub context: Option<usize>,

    /// Show count of matching lines only
    #[arg(short = 'c', long)]
    pub count: bool,

    /// Only print filenames that contain matches (don't print the matching
    /// lines)
    #[arg(short = 'l', long)]
    pub files_with_matches: bool,

    /// Print long lines (default truncates to ~2k)
    #[arg(long)]
    pub long_lines: bool,

    /// Match pattern as literal, not regexp
    #[arg(short = 'Q', long)]
    pub literal: bool,

    /// Gate each file on a whole-buffer match before the per-line pass
    #[arg(long)]
    pub multiline: bool,

    /// Print this usage message and exit
    #[arg(short = 'h', long, action = clap::ArgAction::Help)]
    pub help: Option<bool>,

    /// Print the program version
    #[arg(long, action = clap::ArgAction::Version)]
    pub version: Option<bool>,

    pub pattern: String,

    pub paths: Vec<PathBuf>,
}

/// Compiled options shared by every job.
#[derive(Debug, Clone)]
pub struct Options {
    pub pattern: String,
    pub paths: Vec<PathBuf>,
    pub before_context: usize,
    pub after_context: usize,
    pub count: bool,
    pub files_with_matches: bool,
    pub literal: bool,
    pub multiline: bool,
    pub long_lines: bool,
    pub stdout_is_tty: bool,
}

impl Options {
    pub fn from_cli(cli: Cli) -> Self {
        let mut before_context = cli.before_context;
        let mut after_context = cli.after_context;
        if let Some(n) = cli.context {
            before_context = n;
            after_context = n;
        }
        // Context lines are meaningless when no lines are printed.
        if cli.count || cli.files_with_matches {
            before_context = 0;
            after_context = 0;
        }
        Options {
            pattern: cli.pattern,
            paths: cli.paths,
            before_context,
            after_context,
            count: cli.count,
            files_with_matches: cli.files_with_matches,
            literal: cli.literal,
            multiline: cli.multiline,
            long_lines: cli.long_lines,
            stdout_is_tty: is_terminal::is_terminal(&std::io::stdout()),
        }
    }
}
