//! Location of the CLI's data directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// The data directory: the override if given, else the platform default.
///
/// The directory is created if missing and, on Unix, restricted to the
/// owner since it holds tokens.
pub fn data_dir(override_dir: Option<&Path>) -> Result<PathBuf> {
    let dir = match override_dir {
        Some(dir) => dir.to_path_buf(),
        None => ProjectDirs::from("", "", "acc")
            .context("Could not determine data directory")?
            .data_dir()
            .to_path_buf(),
    };

    if !dir.exists() {
        fs::create_dir_all(&dir).context("Failed to create data directory")?;

        #[cfg(unix)]
        {
            let mut perms = fs::metadata(&dir)?.permissions();
            perms.set_mode(0o700);
            fs::set_permissions(&dir, perms)?;
        }
    }

    Ok(dir)
}
