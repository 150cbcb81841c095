//! Credential persistence.
//!
//! A client keeps at most one credential. The web admin needs it to
//! survive a restart (that's what makes reconciliation possible); on the
//! mobile surface keeping it is best-effort; tests want it in memory.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use ocop_protocol::Credential;
use parking_lot::Mutex;
use tempfile::NamedTempFile;

use crate::StoreError;

/// Platform-specific key/value storage for the single client credential.
///
/// The [`SessionManager`](crate::SessionManager) is the only writer. All
/// methods are synchronous: `logout` must finish its side effects before it
/// returns.
pub trait CredentialStore: Send + Sync + 'static {
    /// Returns the stored credential, or `None` if there isn't one.
    fn get(&self) -> Result<Option<Credential>, StoreError>;

    /// Stores a credential, replacing any previous one.
    fn set(&self, credential: &Credential) -> Result<(), StoreError>;

    /// Removes the stored credential. Clearing an empty store is not an
    /// error.
    fn clear(&self) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// MemoryCredentialStore
// ---------------------------------------------------------------------------

/// Keeps the credential in process memory. Lost on exit.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    slot: Mutex<Option<Credential>>,
}

impl MemoryCredentialStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `credential`, as if a previous
    /// run had logged in.
    pub fn with_credential(credential: Credential) -> Self {
        Self {
            slot: Mutex::new(Some(credential)),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Result<Option<Credential>, StoreError> {
        Ok(self.slot.lock().clone())
    }

    fn set(&self, credential: &Credential) -> Result<(), StoreError> {
        *self.slot.lock() = Some(credential.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.slot.lock().take();
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FileCredentialStore
// ---------------------------------------------------------------------------

/// Keeps the credential in a single file, durable across restarts.
///
/// Writes go to a sibling temp file that is then renamed over the target,
/// so a crash mid-write leaves either the old token or the new one, never
/// half of one.
///
/// The file is readable by its owner only.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Creates a store backed by `path`. The file doesn't need to exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Result<Option<Credential>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(Credential::new(token)))
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, credential: &Credential) -> Result<(), StoreError> {
        let dir = self.dir();
        std::fs::create_dir_all(dir)?;

        // Owner-only (0600 on unix); removed on drop if anything below fails.
        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(credential.as_str().as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| e.error)?;

        tracing::debug!(path = %self.path.display(), "credential written");
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
