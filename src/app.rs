//! Shared state and the driver: seed the queue, run the worker pool, turn
//! the outcome into an exit code.
use crate::cli::Options;
use crate::pattern::SyncedRegex;
use crate::queue::{Job, WorkQueue};
use log::debug;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

/// Process-wide state shared by all jobs, immutable after construction.
/// The driver joins every worker before dropping it, which is what lets
/// jobs borrow it for their whole run.
#[derive(Debug)]
pub struct GlobalState {
    pub opts: Options,
    pub regex: SyncedRegex,
    pub queue: WorkQueue,
    pub matched_any: AtomicBool,
}

impl GlobalState {
    pub fn new(opts: Options) -> Self {
        let regex = SyncedRegex::new(opts.pattern.clone(), opts.literal);
        GlobalState {
            opts,
            regex,
            queue: WorkQueue::default(),
            matched_any: AtomicBool::new(false),
        }
    }
}

/// Seed the queue from the requested paths, drain it on a pool of workers,
/// and report whether anything matched as the process exit code.
pub fn run(opts: Options) -> i32 {
    let state = GlobalState::new(opts);

    if state.opts.paths.is_empty() {
        state.queue.push(Job::AddPaths {
            path: PathBuf::from("."),
            requested: true,
            file_type: None,
        });
    } else {
        for path in &state.opts.paths {
            state.queue.push(Job::AddPaths {
                path: path.clone(),
                requested: true,
                file_type: None,
            });
        }
    }
    // After the paths: searching may begin before the compile finishes,
    // which is fine because SyncedRegex::get is race-free.
    state.queue.push(Job::WarmRegex);

    let workers = thread::available_parallelism().map_or(1, |n| n.get());
    debug!("running {workers} workers");
    thread::scope(|s| {
        for _ in 0..workers {
            s.spawn(|| state.queue.run_until_drained(&state));
        }
    });

    if state.matched_any.load(Ordering::SeqCst) {
        0
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    fn options(mut args: Vec<String>) -> Options {
        args.insert(0, "gr".to_string());
        let mut opts = Options::from_cli(Cli::try_parse_from(args).unwrap());
        opts.stdout_is_tty = false;
        opts
    }

    #[test]
    fn exit_zero_when_a_file_matches() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "foo\nbar\n").unwrap();
        let opts = options(vec![
            "foo".to_string(),
            dir.path().to_string_lossy().into_owned(),
        ]);
        assert_eq!(run(opts), 0);
    }

    #[test]
    fn exit_one_when_nothing_matches() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "bar\n").unwrap();
        let opts = options(vec![
            "foo".to_string(),
            dir.path().to_string_lossy().into_owned(),
        ]);
        assert_eq!(run(opts), 1);
    }

    #[test]
    fn exit_one_for_an_empty_directory() {
        let dir = TempDir::new().unwrap();
        let opts = options(vec![
            "foo".to_string(),
            dir.path().to_string_lossy().into_owned(),
        ]);
        assert_eq!(run(opts), 1);
    }

    #[test]
    fn nested_directories_are_walked() {
        let dir = TempDir::new().unwrap();
        let deep = dir.path().join("a/b/c");
        fs::create_dir_all(&deep).unwrap();
        fs::write(deep.join("deep.txt"), "needle\n").unwrap();
        let opts = options(vec![
            "needle".to_string(),
            dir.path().to_string_lossy().into_owned(),
        ]);
        assert_eq!(run(opts), 0);
    }

    #[test]
    fn dotfiles_are_skipped_during_the_walk() {
        let dir = TempDir::new().unwrap();
        let hidden = dir.path().join(".hidden");
        fs::create_dir(&hidden).unwrap();
        fs::write(hidden.join("x.txt"), "needle\n").unwrap();
        let opts = options(vec![
            "needle".to_string(),
            dir.path().to_string_lossy().into_owned(),
        ]);
        assert_eq!(run(opts), 1);
    }

    #[test]
    fn requested_dotfile_is_searched() {
        let dir = TempDir::new().unwrap();
        let hidden = dir.path().join(".hidden");
        fs::create_dir(&hidden).unwrap();
        fs::write(hidden.join("x.txt"), "needle\n").unwrap();
        let opts = options(vec![
            "needle".to_string(),
            hidden.to_string_lossy().into_owned(),
        ]);
        assert_eq!(run(opts), 0);
    }

    #[test]
    fn binary_files_never_match() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bin"), b"needle\0needle").unwrap();
        let opts = options(vec![
            "needle".to_string(),
            dir.path().to_string_lossy().into_owned(),
        ]);
        assert_eq!(run(opts), 1);
    }
}
