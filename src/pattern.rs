//! Lazy, once-only, thread-safe regex compilation.
use crate::error::Result;
use crate::output;
use once_cell::sync::OnceCell;
use regex::bytes::Regex;

/// A pattern that compiles at most once, safely under contention.
///
/// Construction stores the source only. The first `get()` compiles; every
/// later call, concurrent or not, sees the same instance. A warm-up job is
/// queued right after the paths so the compile (and any compile error)
/// happens early rather than in whichever worker searches first.
#[derive(Debug)]
pub struct SyncedRegex {
    pattern: String,
    literal: bool,
    compiled: OnceCell<Regex>,
}

impl SyncedRegex {
    pub fn new(pattern: String, literal: bool) -> Self {
        Self {
            pattern,
            literal,
            compiled: OnceCell::new(),
        }
    }

    /// The compiled expression, compiling on first use.
    ///
    /// A pattern rejected by the engine is unrecoverable this late — the
    /// CLI already accepted it — so the first caller reports it and exits
    /// the process with the usage-error code.
    pub fn get(&self) -> &Regex {
        self.compiled.get_or_init(|| match self.compile() {
            Ok(re) => re,
            Err(e) => {
                output::emit_error(&format!(
                    "Failed to compile regexp /{}/: {}",
                    self.pattern, e
                ));
                std::process::exit(2);
            }
        })
    }

    fn compile(&self) -> Result<Regex> {
        let source = if self.literal {
            regex::escape(&self.pattern)
        } else {
            self.pattern.clone()
        };
        Ok(Regex::new(&source)?)
    }
}
