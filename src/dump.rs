//! Dump files of captured console output
//!
//! A dump is a plain text file named after the local time it was written
//! (`yyyy_MM_dd HH_mm_ss.txt`) with one labeled section per captured channel.
//! Escape sequences are stripped and line endings normalized to `\r\n`.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use thiserror::Error;

use crate::ansi::strip_escapes;

/// File name pattern, 24-hour local time
pub const DUMP_NAME_FORMAT: &str = "%Y_%m_%d %H_%M_%S";

/// Dump file extension
pub const DUMP_EXTENSION: &str = "txt";

/// Section headers, primary channel first
pub const SECTION_LABELS: [&str; 2] = ["Standard Out", "Error Out"];

/// Separator written between channel sections
const SECTION_GAP: &str = "\r\n\r\n\r\n";

/// Why a dump could not be written
#[derive(Debug, Error)]
pub enum DumpError {
    #[error("Cannot create dump. Path is invalid or nonexistent: {}", .0.display())]
    PathMissing(PathBuf),

    #[error("Dump path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("File with the same time & date already exists: {}", .0.display())]
    NameCollision(PathBuf),

    #[error("Failed to write dump file {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// File name for a dump taken at `now`
pub fn dump_file_name(now: &DateTime<Local>) -> String {
    format!("{}.{}", now.format(DUMP_NAME_FORMAT), DUMP_EXTENSION)
}

/// Directory a dump path refers to; an empty path means the working directory
pub fn resolve_dump_dir(dump_dir: &Path) -> PathBuf {
    if dump_dir.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        dump_dir.to_path_buf()
    }
}

/// Normalize `\n` and `\r\n` line endings to `\r\n`
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\n', "\r\n")
}

/// Render captured texts into dump text
///
/// The first text is the primary channel and always goes under `Standard Out`,
/// the second under `Error Out`.
pub fn render_dump(sections: &[String]) -> String {
    let mut output = String::new();

    for (i, (label, text)) in SECTION_LABELS.iter().zip(sections).enumerate() {
        if i > 0 {
            output.push_str(SECTION_GAP);
        }
        output.push_str(&format!("------{}------\r\n", label));
        output.push_str(&normalize_line_endings(&strip_escapes(text)));
    }

    output
}

/// Write a dump of `sections` into `dump_dir`, named after `now`
///
/// Never overwrites: an existing file with the generated name is a
/// [`DumpError::NameCollision`] and is left untouched.
pub fn write_dump(
    dump_dir: &Path,
    now: &DateTime<Local>,
    sections: &[String],
) -> Result<PathBuf, DumpError> {
    let dir = resolve_dump_dir(dump_dir);

    if !dir.exists() {
        return Err(DumpError::PathMissing(dir));
    }
    if !dir.is_dir() {
        return Err(DumpError::NotADirectory(dir));
    }

    let path = dir.join(dump_file_name(now));

    let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            return Err(DumpError::NameCollision(path));
        }
        Err(source) => return Err(DumpError::Io { path, source }),
    };

    let contents = render_dump(sections);
    if let Err(source) = file.write_all(contents.as_bytes()).and_then(|_| file.flush()) {
        return Err(DumpError::Io { path, source });
    }

    Ok(path)
}
