//! PID file management.
//!
//! One monitor per session: a second instance would double every alert.
//! The file is created on acquire and removed on drop; stale or garbage
//! files left behind by a crash are reclaimed.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;

use tracing::{debug, info, warn};

use crate::error::{DaemonError, DaemonResult};

/// Holds the PID file for the lifetime of the process.
pub struct PidFile {
    path: PathBuf,
}

impl PidFile {
    /// Claims the PID file at `path`.
    ///
    /// Fails if the file names a live process; otherwise any leftover
    /// file is reclaimed.
    pub fn acquire(path: impl Into<PathBuf>) -> DaemonResult<Self> {
        let path = path.into();

        if path.exists() {
            match read_pid(&path) {
                Some(pid) if process_alive(pid) => {
                    return Err(DaemonError::already_running(path.to_string_lossy()));
                }
                Some(pid) => {
                    warn!(path = %path.display(), pid = pid, "Reclaiming stale PID file");
                    fs::remove_file(&path)?;
                }
                None => {
                    warn!(path = %path.display(), "Reclaiming unreadable PID file");
                    fs::remove_file(&path)?;
                }
            }
        }

        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        let pid = process::id();
        let mut file = File::create(&path)?;
        writeln!(file, "{}", pid)?;
        file.sync_all()?;

        info!(path = %path.display(), pid = pid, "Created PID file");

        Ok(Self { path })
    }

    /// Returns the path to the PID file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for PidFile {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Removed PID file"),
            Err(e) => warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove PID file"
            ),
        }
    }
}

/// Parses the PID stored in `path`, if any.
fn read_pid(path: &Path) -> Option<u32> {
    fs::read_to_string(path).ok()?.trim().parse().ok()
}

/// Checks if a process with the given PID is running.
#[cfg(unix)]
fn process_alive(pid: u32) -> bool {
    // Signal 0 probes for existence without delivering anything.
    unsafe { libc::kill(pid as libc::pid_t, 0) == 0 }
}

#[cfg(not(unix))]
fn process_alive(_pid: u32) -> bool {
    true
}

/// Returns the default PID file path.
///
/// Uses `$XDG_RUNTIME_DIR/chargemon.pid` if available, otherwise
/// `/tmp/chargemon-$UID.pid`.
pub fn default_pid_path() -> PathBuf {
    if let Ok(runtime_dir) = std::env::var("XDG_RUNTIME_DIR") {
        PathBuf::from(runtime_dir).join("chargemon.pid")
    } else {
        #[cfg(unix)]
        let uid = unsafe { libc::getuid() };
        #[cfg(not(unix))]
        let uid = 0;
        PathBuf::from(format!("/tmp/chargemon-{}.pid", uid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn acquire_writes_and_drop_removes() {
        let dir = tempdir().unwrap();
        let pid_path = dir.path().join("monitor.pid");

        {
            let pidfile = PidFile::acquire(&pid_path).unwrap();
            assert_eq!(pidfile.path(), pid_path);

            let stored: u32 = fs::read_to_string(&pid_path)
                .unwrap()
                .trim()
                .parse()
                .unwrap();
            assert_eq!(stored, process::id());
        }

        assert!(!pid_path.exists());
    }

    #[test]
    fn second_acquire_is_rejected() {
        let dir = tempdir().unwrap();
        let pid_path = dir.path().join("monitor.pid");

        let _held = PidFile::acquire(&pid_path).unwrap();

        let result = PidFile::acquire(&pid_path);
        assert!(matches!(result, Err(DaemonError::AlreadyRunning { .. })));
    }

    #[test]
    fn stale_pid_is_reclaimed() {
        let dir = tempdir().unwrap();
        let pid_path = dir.path().join("monitor.pid");

        fs::write(&pid_path, "999999999\n").unwrap();

        let pidfile = PidFile::acquire(&pid_path).unwrap();
        assert!(pid_path.exists());
        drop(pidfile);
    }

    #[test]
    fn garbage_pid_is_reclaimed() {
        let dir = tempdir().unwrap();
        let pid_path = dir.path().join("monitor.pid");

        fs::write(&pid_path, "not-a-pid\n").unwrap();

        let pidfile = PidFile::acquire(&pid_path).unwrap();
        assert!(pid_path.exists());
        drop(pidfile);
    }

    #[test]
    fn default_path_format() {
        let path = default_pid_path();
        let path_str = path.to_string_lossy();
        assert!(path_str.contains("chargemon"));
        assert!(path_str.ends_with(".pid"));
    }
}
