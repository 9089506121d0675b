//! Small filesystem helpers shared by the stores.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use acc_core::error::{Error, StorageError};

pub(crate) fn map_io(path: &Path) -> impl Fn(std::io::Error) -> Error + '_ {
    move |err| {
        Error::Storage(StorageError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })
    }
}

pub(crate) fn corrupt(path: &Path, message: impl ToString) -> Error {
    Error::Storage(StorageError::Corrupt {
        path: path.display().to_string(),
        message: message.to_string(),
    })
}

/// Read a file, returning `None` if it does not exist.
pub(crate) fn read_optional(path: &Path) -> Result<Option<String>, Error> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(map_io(path)(e)),
    }
}

/// Write `contents` to `path` through a temporary file and rename, so a
/// crash never leaves a half-written file. With `private` set the file is
/// readable by the owner only (Unix).
pub(crate) fn write_atomic(path: &Path, contents: &str, private: bool) -> Result<(), Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(map_io(parent))?;
    }

    let tmp = temp_path(path);
    {
        let mut file = File::create(&tmp).map_err(map_io(&tmp))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if private {
                file.set_permissions(fs::Permissions::from_mode(0o600))
                    .map_err(map_io(&tmp))?;
            }
        }
        #[cfg(not(unix))]
        let _ = private;

        file.write_all(contents.as_bytes()).map_err(map_io(&tmp))?;
        file.sync_data().map_err(map_io(&tmp))?;
    }

    fs::rename(&tmp, path).map_err(map_io(path))
}

/// Remove a file if it exists.
pub(crate) fn remove_optional(path: &Path) -> Result<(), Error> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(map_io(path)(e)),
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// An exclusive advisory lock held until dropped.
pub(crate) struct LockGuard {
    file: File,
}

impl LockGuard {
    pub(crate) fn acquire(lock_path: &Path) -> Result<Self, Error> {
        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent).map_err(map_io(parent))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(lock_path)
            .map_err(map_io(lock_path))?;
        file.lock_exclusive().map_err(map_io(lock_path))?;
        Ok(Self { file })
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}
