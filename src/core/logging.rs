//! Status and debug lines on stderr, optionally mirrored to a rotating log file.
//!
//! Use the `log_status!` and `log_debug!` macros rather than calling [`emit`] directly.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, OnceLock};

use crate::error::{Error, Result};

/// Rotate once the log file would grow past this many bytes.
pub const LOG_MAX_BYTES: u64 = 10 * 1_000_000;

/// Rotated files kept next to the log (`rpmbox.log.1` .. `rpmbox.log.10`).
pub const LOG_BACKUPS: u32 = 10;

static QUIET: AtomicBool = AtomicBool::new(false);
static DEBUG: AtomicBool = AtomicBool::new(false);
static LOG_FILE: OnceLock<Mutex<LogFile>> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Progress lines. Shown on a terminal's stderr only.
    Status,
    /// Extra detail. Shown only with `set_debug(true)`, terminal or not.
    Debug,
}

impl Level {
    fn as_str(&self) -> &'static str {
        match self {
            Level::Status => "INFO",
            Level::Debug => "DEBUG",
        }
    }
}

/// Silence stderr output for the rest of the process. The log file still records.
pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

pub fn is_quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

pub fn set_debug(debug: bool) {
    DEBUG.store(debug, Ordering::Relaxed);
}

pub fn is_debug() -> bool {
    DEBUG.load(Ordering::Relaxed)
}

/// Send every following log line to `path` as well. Only the first call takes effect.
pub fn init_log_file(path: &Path) -> Result<()> {
    let file = LogFile::open(path, LOG_MAX_BYTES, LOG_BACKUPS)?;
    let _ = LOG_FILE.set(Mutex::new(file));
    Ok(())
}

pub fn emit(level: Level, prefix: &str, message: &str) {
    if level == Level::Debug && !is_debug() {
        return;
    }

    if let Some(file) = LOG_FILE.get() {
        let mut file = file.lock().unwrap_or_else(|e| e.into_inner());
        let line = format!(
            "{} {} [{}] {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            level.as_str(),
            prefix,
            message
        );
        // A log file that stops accepting writes must not abort the build.
        let _ = file.write_line(&line);
    }

    if is_quiet() {
        return;
    }

    match level {
        Level::Status if !std::io::IsTerminal::is_terminal(&std::io::stderr()) => {}
        _ => eprintln!("[{}] {}", prefix, message),
    }
}

/// Append-only log file that rolls over to numbered backups when it gets too large.
#[derive(Debug)]
pub struct LogFile {
    path: PathBuf,
    file: File,
    len: u64,
    max_bytes: u64,
    backups: u32,
}

impl LogFile {
    pub fn open(path: &Path, max_bytes: u64, backups: u32) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                Error::internal_io(e.to_string(), Some(format!("create {}", parent.display())))
            })?;
        }

        let file = open_append(path)?;
        let len = file.metadata().map(|m| m.len()).unwrap_or(0);

        Ok(Self {
            path: path.to_path_buf(),
            file,
            len,
            max_bytes,
            backups,
        })
    }

    pub fn write_line(&mut self, line: &str) -> Result<()> {
        let size = line.len() as u64 + 1;
        if self.len > 0 && self.len + size > self.max_bytes {
            self.rotate()?;
        }

        writeln!(self.file, "{}", line).map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("write {}", self.path.display())))
        })?;
        self.len += size;
        Ok(())
    }

    fn rotate(&mut self) -> Result<()> {
        if self.backups == 0 {
            self.file.set_len(0).map_err(|e| {
                Error::internal_io(e.to_string(), Some(format!("truncate {}", self.path.display())))
            })?;
            self.len = 0;
            return Ok(());
        }

        for n in (1..self.backups).rev() {
            let from = backup_path(&self.path, n);
            if from.exists() {
                let _ = fs::rename(&from, backup_path(&self.path, n + 1));
            }
        }
        fs::rename(&self.path, backup_path(&self.path, 1)).map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("rotate {}", self.path.display())))
        })?;

        self.file = open_append(&self.path)?;
        self.len = 0;
        Ok(())
    }
}

fn open_append(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| Error::internal_io(e.to_string(), Some(format!("open {}", path.display()))))
}

fn backup_path(path: &Path, n: u32) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(format!(".{}", n));
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn appends_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rpmbox.log");

        let mut log = LogFile::open(&path, LOG_MAX_BYTES, LOG_BACKUPS).unwrap();
        log.write_line("build: docker build").unwrap();
        log.write_line("build: exited with 1").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "build: docker build\nbuild: exited with 1\n");
    }

    #[test]
    fn reopening_continues_the_same_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs/rpmbox.log");

        LogFile::open(&path, LOG_MAX_BYTES, LOG_BACKUPS)
            .unwrap()
            .write_line("first")
            .unwrap();
        LogFile::open(&path, LOG_MAX_BYTES, LOG_BACKUPS)
            .unwrap()
            .write_line("second")
            .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn rolls_over_into_numbered_backups() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rpmbox.log");

        let mut log = LogFile::open(&path, 10, 2).unwrap();
        for line in ["aaaaaaaa", "bbbbbbbb", "cccccccc", "dddddddd"] {
            log.write_line(line).unwrap();
        }

        assert_eq!(fs::read_to_string(&path).unwrap(), "dddddddd\n");
        assert_eq!(fs::read_to_string(backup_path(&path, 1)).unwrap(), "cccccccc\n");
        assert_eq!(fs::read_to_string(backup_path(&path, 2)).unwrap(), "bbbbbbbb\n");
        assert!(!backup_path(&path, 3).exists());
    }

    #[test]
    fn zero_backups_truncates_in_place() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rpmbox.log");

        let mut log = LogFile::open(&path, 10, 0).unwrap();
        log.write_line("aaaaaaaa").unwrap();
        log.write_line("bbbbbbbb").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "bbbbbbbb\n");
        assert!(!backup_path(&path, 1).exists());
    }

    #[test]
    fn unwritable_location_is_an_io_error() {
        let err = LogFile::open(Path::new("/proc/rpmbox/rpmbox.log"), 10, 1).unwrap_err();
        assert_eq!(err.code.as_str(), "internal.io_error");
    }

    #[test]
    fn debug_switch() {
        set_debug(true);
        assert!(is_debug());
        set_debug(false);
        assert!(!is_debug());
    }
}
