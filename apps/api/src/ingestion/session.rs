//! Session Store — creates a unique working directory per request and
//! persists the uploaded resume PDF into it.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use bytes::Bytes;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;

/// Per-request working context: a generated identifier and its directory
/// under the configured base path. Sessions are never reused across requests
/// and are not deleted unless a retention window is configured.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub dir: PathBuf,
}

/// A source of uploaded file bytes. One capability method instead of probing
/// the upload object's shape at runtime; each integration point gets its own
/// adapter.
pub trait ReadableUpload {
    fn file_name(&self) -> Option<&str>;
    fn read_all_bytes(&mut self) -> Result<Vec<u8>, AppError>;
}

/// Adapter for stream-backed uploads (anything implementing `io::Read`).
pub struct StreamUpload<R: Read> {
    name: Option<String>,
    reader: R,
}

impl<R: Read> StreamUpload<R> {
    pub fn new(name: Option<String>, reader: R) -> Self {
        Self { name, reader }
    }
}

impl<R: Read> ReadableUpload for StreamUpload<R> {
    fn file_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn read_all_bytes(&mut self) -> Result<Vec<u8>, AppError> {
        let mut buf = Vec::new();
        self.reader.read_to_end(&mut buf).map_err(|e| {
            AppError::UnsupportedUpload(format!("cannot read upload stream: {e}"))
        })?;
        Ok(buf)
    }
}

/// Adapter for uploads already held in a borrowed buffer.
pub struct BufferUpload<'a> {
    name: Option<String>,
    buffer: &'a [u8],
}

impl<'a> BufferUpload<'a> {
    pub fn new(name: Option<String>, buffer: &'a [u8]) -> Self {
        Self { name, buffer }
    }
}

impl ReadableUpload for BufferUpload<'_> {
    fn file_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn read_all_bytes(&mut self) -> Result<Vec<u8>, AppError> {
        Ok(self.buffer.to_vec())
    }
}

/// Adapter for owned byte payloads; this is what the multipart handler uses.
pub struct BytesUpload {
    name: Option<String>,
    bytes: Bytes,
}

impl BytesUpload {
    pub fn new(name: Option<String>, bytes: Bytes) -> Self {
        Self { name, bytes }
    }
}

impl ReadableUpload for BytesUpload {
    fn file_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn read_all_bytes(&mut self) -> Result<Vec<u8>, AppError> {
        Ok(self.bytes.to_vec())
    }
}

/// Creates session directories under a base path and saves uploads into them.
#[derive(Debug, Clone)]
pub struct SessionStore {
    base: PathBuf,
}

impl SessionStore {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Creates (or reuses, if an id is supplied) a session directory.
    /// Directory creation is idempotent.
    pub fn create(&self, session_id: Option<String>) -> Result<Session, AppError> {
        let id = session_id.unwrap_or_else(new_session_id);
        let dir = self.base.join(&id);
        std::fs::create_dir_all(&dir)?;

        info!(session_id = %id, session_path = %dir.display(), "Session initialized");
        Ok(Session { id, dir })
    }

    /// Validates the upload's filename and writes its bytes to
    /// `<session.dir>/<filename>`. The extension check runs before any bytes
    /// are read, so a rejected upload never touches the disk.
    pub fn save(
        &self,
        upload: &mut dyn ReadableUpload,
        session: &Session,
    ) -> Result<PathBuf, AppError> {
        let filename = upload
            .file_name()
            .map(basename)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                AppError::Validation("Could not determine filename from uploaded file.".into())
            })?
            .to_string();

        if !filename.to_lowercase().ends_with(".pdf") {
            return Err(AppError::Validation(
                "Invalid file type. Only PDFs are allowed.".into(),
            ));
        }

        let file_bytes = upload.read_all_bytes()?;
        let save_path = session.dir.join(&filename);
        std::fs::write(&save_path, &file_bytes)?;

        info!(
            file = %filename,
            save_path = %save_path.display(),
            session_id = %session.id,
            bytes = file_bytes.len(),
            "Resume saved successfully"
        );
        Ok(save_path)
    }

    /// Best-effort sweep of session directories older than `max_age`,
    /// judged by directory mtime. Returns the number of sessions removed.
    /// A missing base directory is treated as nothing to purge.
    pub fn purge_older_than(&self, max_age: Duration) -> Result<usize, AppError> {
        let entries = match std::fs::read_dir(&self.base) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let now = SystemTime::now();
        let mut removed = 0;

        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let modified = match entry.metadata().and_then(|m| m.modified()) {
                Ok(t) => t,
                Err(e) => {
                    warn!(path = %path.display(), "Cannot stat session directory: {e}");
                    continue;
                }
            };
            let expired = now
                .duration_since(modified)
                .map(|age| age > max_age)
                .unwrap_or(false);
            if expired {
                match std::fs::remove_dir_all(&path) {
                    Ok(()) => {
                        info!(path = %path.display(), "Expired session purged");
                        removed += 1;
                    }
                    Err(e) => warn!(path = %path.display(), "Session purge failed: {e}"),
                }
            }
        }

        Ok(removed)
    }
}

/// `session_<UTC timestamp>_<8 hex chars>` — time-based with a random suffix
/// so concurrent requests never collide.
fn new_session_id() -> String {
    let stamp = Utc::now().format("%Y%m%d_%H%M%S");
    let suffix = &Uuid::new_v4().simple().to_string()[..8];
    format!("session_{stamp}_{suffix}")
}

/// Strips any path components a client may have smuggled into the filename.
fn basename(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}
