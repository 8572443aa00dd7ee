//! Single-instance guard for one container name.
//!
//! Two runs with the same container name would remove each other's container,
//! so `run --single-instance` takes a lock file first. The file holds the
//! owner's pid and is removed when the guard drops.

use std::env;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
}

impl RunLock {
    /// Lock `container` under the system temp directory.
    pub fn acquire(container: &str) -> Result<Self> {
        Self::acquire_in(&env::temp_dir(), container)
    }

    pub fn acquire_in(dir: &Path, container: &str) -> Result<Self> {
        let path = lock_path(dir, container);

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                let _ = writeln!(file, "{}", std::process::id());
                log_debug!("lock", "Acquired {}", path.display());
                Ok(Self { path })
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(Error::run_in_progress(
                container,
                path.display().to_string(),
                holder_pid(&path),
            )),
            Err(e) => Err(Error::internal_io(
                e.to_string(),
                Some(format!("create {}", path.display())),
            )),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

pub fn lock_path(dir: &Path, container: &str) -> PathBuf {
    dir.join(format!("rpmbox-{}.lock", container))
}

fn holder_pid(path: &Path) -> Option<u32> {
    fs::read_to_string(path).ok()?.trim().parse().ok()
}
