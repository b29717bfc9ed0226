//! Log file setup
//!
//! The terminal belongs to the TUI, so tracing output goes to a file under
//! the XDG cache directory (`~/.cache/skycast/skycast.log` on Linux).

use directories::ProjectDirs;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Name of the log file inside the cache directory
pub const LOG_FILE_NAME: &str = "skycast.log";

/// Filter used when `RUST_LOG` is not set
const DEFAULT_FILTER: &str = "info";

/// Returns the default log file path, or `None` if no home directory is known
pub fn default_log_path() -> Option<PathBuf> {
    let project_dirs = ProjectDirs::from("", "", "skycast")?;
    Some(project_dirs.cache_dir().join(LOG_FILE_NAME))
}

/// Opens `path` for appending, creating parent directories as needed
pub fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Installs the global tracing subscriber writing to `path`
///
/// `RUST_LOG` overrides the default `info` filter.
pub fn init(path: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let file = open_log_file(path)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_env_filter(filter)
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_open_log_file_creates_parent_directories() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("nested").join("logs").join(LOG_FILE_NAME);

        let file = open_log_file(&path).expect("Should open log file");
        drop(file);

        assert!(path.exists(), "Log file should be created");
    }

    #[test]
    fn test_open_log_file_appends() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join(LOG_FILE_NAME);

        writeln!(open_log_file(&path).unwrap(), "first").unwrap();
        writeln!(open_log_file(&path).unwrap(), "second").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "first\nsecond\n");
    }

    #[test]
    fn test_default_log_path_names_project() {
        if let Some(path) = default_log_path() {
            let path_str = path.to_string_lossy();
            assert!(path_str.contains("skycast"), "Log path should contain project name");
            assert!(path_str.ends_with(LOG_FILE_NAME));
        }
        // Test passes if default_log_path() returns None (e.g., no home directory in CI)
    }
}
