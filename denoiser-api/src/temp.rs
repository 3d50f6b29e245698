//! Scoped temporary files
//!
//! A [`ScopedTempFile`] lives for exactly one pipeline step. The file is
//! removed when the handle is dropped, on every exit path. Removal errors
//! (e.g. the file is already gone) are logged at debug level and otherwise
//! ignored.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Uniquely named temp file, deleted on drop
#[derive(Debug)]
pub struct ScopedTempFile {
    inner: Option<NamedTempFile>,
    path: PathBuf,
}

impl ScopedTempFile {
    /// Create an empty `<prefix>XXXXXX.wav` file inside `dir`
    pub fn create_in(dir: &Path, prefix: &str) -> std::io::Result<Self> {
        let inner = tempfile::Builder::new()
            .prefix(prefix)
            .suffix(".wav")
            .tempfile_in(dir)?;
        let path = inner.path().to_path_buf();
        Ok(Self {
            inner: Some(inner),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the file contents with `bytes`
    pub fn write_all(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        let file = self.file_mut()?;
        file.write_all(bytes)?;
        file.flush()
    }

    /// Open an independent read handle on the file
    ///
    /// The handle stays readable after this scoped file is dropped and the
    /// path is unlinked.
    pub fn reopen(&self) -> std::io::Result<File> {
        match &self.inner {
            Some(inner) => inner.reopen(),
            None => Err(already_closed()),
        }
    }

    fn file_mut(&mut self) -> std::io::Result<&mut File> {
        self.inner
            .as_mut()
            .map(NamedTempFile::as_file_mut)
            .ok_or_else(already_closed)
    }
}

impl Drop for ScopedTempFile {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.take() {
            if let Err(e) = inner.close() {
                tracing::debug!(path = %self.path.display(), error = %e, "Temp file cleanup failed");
            }
        }
    }
}

fn already_closed() -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::NotFound, "temp file already closed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::TempDir;

    #[test]
    fn test_removed_on_drop() {
        let dir = TempDir::new().unwrap();
        let mut scoped = ScopedTempFile::create_in(dir.path(), "denoise-in-").unwrap();
        scoped.write_all(b"RIFF").unwrap();

        let path = scoped.path().to_path_buf();
        assert!(path.exists());
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("denoise-in-"));
        assert_eq!(path.extension().unwrap(), "wav");

        drop(scoped);
        assert!(!path.exists());
    }

    #[test]
    fn test_missing_file_on_drop_is_ignored() {
        let dir = TempDir::new().unwrap();
        let scoped = ScopedTempFile::create_in(dir.path(), "denoise-out-").unwrap();
        std::fs::remove_file(scoped.path()).unwrap();

        // Must not panic
        drop(scoped);
    }

    #[test]
    fn test_reopened_handle_outlives_path() {
        let dir = TempDir::new().unwrap();
        let mut scoped = ScopedTempFile::create_in(dir.path(), "denoise-out-").unwrap();
        scoped.write_all(b"payload").unwrap();

        let mut handle = scoped.reopen().unwrap();
        let path = scoped.path().to_path_buf();
        drop(scoped);
        assert!(!path.exists());

        let mut contents = String::new();
        handle.read_to_string(&mut contents).unwrap();
        assert_eq!(contents, "payload");
    }

    #[test]
    fn test_unique_names() {
        let dir = TempDir::new().unwrap();
        let a = ScopedTempFile::create_in(dir.path(), "denoise-in-").unwrap();
        let b = ScopedTempFile::create_in(dir.path(), "denoise-in-").unwrap();
        assert_ne!(a.path(), b.path());
    }
}
