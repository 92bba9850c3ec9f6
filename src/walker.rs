//! Path expansion: the dotfile rule, stat dispatch, and directory
//! enumeration feeding the work queue.
use crate::app::GlobalState;
use crate::error::Result;
use crate::output;
use crate::queue::Job;
use log::debug;
use std::fs::{self, File, FileType};
use std::io;
use std::path::{Path, PathBuf};

/// True for entries whose basename starts with `.`, excluding the `.` and
/// `..` components themselves (`file_name()` is `None` for those).
pub fn is_dotfile(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.as_encoded_bytes().starts_with(b"."))
        .unwrap_or(false)
}

/// Entry point for an add-paths job. Enumeration failures are diagnosed and
/// swallowed so one unreadable subtree cannot take a worker down.
pub fn add_paths(state: &GlobalState, path: PathBuf, requested: bool, file_type: Option<FileType>) {
    if !requested && is_dotfile(&path) {
        debug!("skipping dotfile {}", path.display());
        return;
    }
    if let Err(e) = expand_path(state, &path, file_type) {
        output::emit_error(&format!(
            "Skipping {}: error: {}",
            output::display_path(&path),
            e
        ));
    }
}

fn expand_path(state: &GlobalState, path: &Path, file_type: Option<FileType>) -> Result<()> {
    let file_type = match file_type {
        Some(t) => t,
        // A requested path is fully resolved; entries found during the walk
        // carry their own (symlink-preserving) type from the directory.
        None => match fs::metadata(path) {
            Ok(meta) => meta.file_type(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                output::emit_error(&format!(
                    "Skipping {}: nonexistent",
                    output::display_path(path)
                ));
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        },
    };

    if file_type.is_file() {
        // readability probe; the search job reopens the file for real
        match File::open(path) {
            Ok(_) => state.queue.push(Job::Search {
                path: path.to_path_buf(),
            }),
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                output::emit_error(&format!(
                    "Skipping {}: Permission denied",
                    output::display_path(path)
                ));
            }
            Err(e) => return Err(e.into()),
        }
    } else if file_type.is_dir() {
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            state.queue.push(Job::AddPaths {
                path: entry.path(),
                requested: false,
                file_type: entry.file_type().ok(),
            });
        }
    } else {
        // dangling symlink, device, socket, ...
        debug!("skipping non-regular path {}", path.display());
    }
    Ok(())
}
