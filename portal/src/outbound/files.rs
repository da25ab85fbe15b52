//! Capability-scoped file adapters: session token store and receipt writer.
//!
//! Both adapters open their directory through `cap_std` and only touch the
//! single file names they own.

use std::io;
use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;

use crate::domain::Receipt;
use crate::domain::ports::{SessionTokenStore, TokenStoreError};

/// File holding the opaque session token.
pub const TOKEN_FILE_NAME: &str = "session-token";

fn open_dir(path: &Path) -> io::Result<Dir> {
    Dir::create_ambient_dir_all(path, ambient_authority())?;
    Dir::open_ambient_dir(path, ambient_authority())
}

/// Token store persisting to `<dir>/session-token`.
#[derive(Debug)]
pub struct FileTokenStore {
    dir: Dir,
}

impl FileTokenStore {
    /// Open (creating if needed) the token directory.
    pub fn open(path: &Path) -> Result<Self, TokenStoreError> {
        let dir = open_dir(path).map_err(|err| {
            TokenStoreError::io(format!("open token directory {}: {err}", path.display()))
        })?;
        Ok(Self { dir })
    }
}

impl SessionTokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, TokenStoreError> {
        match self.dir.read_to_string(TOKEN_FILE_NAME) {
            Ok(token) if token.trim().is_empty() => Ok(None),
            Ok(token) => Ok(Some(token.trim().to_owned())),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(TokenStoreError::io(format!("read token: {err}"))),
        }
    }

    fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        self.dir
            .write(TOKEN_FILE_NAME, token.as_bytes())
            .map_err(|err| TokenStoreError::io(format!("write token: {err}")))
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        match self.dir.remove_file(TOKEN_FILE_NAME) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(TokenStoreError::io(format!("remove token: {err}"))),
        }
    }
}

/// Writes rendered receipts into one directory.
pub struct ReceiptWriter {
    root: PathBuf,
}

impl ReceiptWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Write `receipt` under its own file name and return the full path.
    pub fn write(&self, receipt: &Receipt) -> io::Result<PathBuf> {
        let dir = open_dir(&self.root)?;
        dir.write(&receipt.file_name, receipt.html.as_bytes())?;
        let path = self.root.join(&receipt.file_name);
        debug!(path = %path.display(), "receipt written");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn token_file_round_trips_and_clears() {
        let temp = tempfile::tempdir().expect("temp dir");
        let store = FileTokenStore::open(temp.path()).expect("open store");

        assert_eq!(store.load().expect("load"), None);
        store.save("admin-token").expect("save");
        assert_eq!(store.load().expect("load").as_deref(), Some("admin-token"));

        let reopened = FileTokenStore::open(temp.path()).expect("reopen store");
        assert_eq!(reopened.load().expect("load").as_deref(), Some("admin-token"));

        store.clear().expect("clear");
        store.clear().expect("clearing twice is fine");
        assert_eq!(store.load().expect("load"), None);
    }

    #[rstest]
    fn receipt_lands_under_its_file_name() {
        let temp = tempfile::tempdir().expect("temp dir");
        let writer = ReceiptWriter::new(temp.path().join("receipts"));
        let receipt = Receipt {
            file_name: "recepisse-inscription-INS-2025-AB12CD.html".to_owned(),
            html: "<html></html>".to_owned(),
        };

        let path = writer.write(&receipt).expect("write receipt");

        assert!(path.ends_with("receipts/recepisse-inscription-INS-2025-AB12CD.html"));
        let dir = Dir::open_ambient_dir(temp.path().join("receipts"), ambient_authority())
            .expect("open receipts dir");
        assert_eq!(
            dir.read_to_string(&receipt.file_name).expect("read back"),
            "<html></html>"
        );
    }
}
