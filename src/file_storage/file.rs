//! # File Operations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::backend::StorageBackend;
use super::errors::{StorageError, StorageResult};
use super::naming::{validate_name, NameGenerator};

/// Default per-file admission ceiling (10 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Declared type used when an upload carries none
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Content type resolved from a file name's extension
pub fn content_type_for(name: &str) -> String {
    mime_guess::from_path(name)
        .first_raw()
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_string()
}

/// A named entry under the storage root, read live from the filesystem
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    pub name: String,
    pub path: String,
    pub size: u64,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl StoredFile {
    /// Content type derived from the name; never stored
    pub fn content_type(&self) -> String {
        content_type_for(&self.name)
    }
}

/// One file of an upload batch
#[derive(Debug, Clone)]
pub struct UploadItem {
    pub data: Vec<u8>,
    pub original_name: String,
    pub suggested_name: Option<String>,
    pub content_type: String,
}

impl UploadItem {
    /// Create an item with the default declared type and no custom name
    pub fn new(original_name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            data,
            original_name: original_name.into(),
            suggested_name: None,
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
        }
    }

    /// Ask for a custom stored name
    pub fn with_suggested_name(mut self, name: impl Into<String>) -> Self {
        self.suggested_name = Some(name.into());
        self
    }

    /// Set the content type declared by the client
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }
}

/// Descriptor returned for every stored upload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub original_name: String,
    pub stored_name: String,
    pub path: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub content_type: String,
}

/// Content of a stored file
#[derive(Debug, Clone)]
pub struct RetrievedFile {
    pub name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Confirmation of a rename
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameOutcome {
    pub old_name: String,
    pub new_name: String,
}

/// File service for the storage operations
///
/// Holds no index: every call goes to the backend.
#[derive(Debug)]
pub struct FileService<B: StorageBackend> {
    backend: B,
    names: NameGenerator,
    max_upload_bytes: u64,
}

impl<B: StorageBackend> FileService<B> {
    /// Create a new file service with the default admission ceiling
    pub fn new(backend: B) -> Self {
        Self::with_max_upload_bytes(backend, DEFAULT_MAX_UPLOAD_BYTES)
    }

    /// Create a new file service with a custom admission ceiling
    pub fn with_max_upload_bytes(backend: B, max_upload_bytes: u64) -> Self {
        Self {
            backend,
            names: NameGenerator::new(),
            max_upload_bytes,
        }
    }

    /// Check one file's size against the admission ceiling
    pub fn check_size(&self, size: u64) -> StorageResult<()> {
        if size > self.max_upload_bytes {
            return Err(StorageError::PayloadTooLarge(size, self.max_upload_bytes));
        }
        Ok(())
    }

    /// Store a batch of uploads
    ///
    /// The whole batch is admitted and named before the first write, so a
    /// rejected batch leaves the root untouched. Existing names are
    /// overwritten.
    pub fn store(&self, items: &[UploadItem]) -> StorageResult<Vec<UploadedFile>> {
        if items.is_empty() {
            return Err(StorageError::Validation("No files uploaded".to_string()));
        }

        let mut planned = Vec::with_capacity(items.len());
        for item in items {
            self.check_size(item.data.len() as u64)?;
            let name = self
                .names
                .final_name(&item.original_name, item.suggested_name.as_deref())?;
            planned.push((item, name));
        }

        self.backend.ensure_root()?;

        let mut stored = Vec::with_capacity(planned.len());
        for (item, name) in planned {
            self.backend.write(&name, &item.data)?;
            stored.push(UploadedFile {
                original_name: item.original_name.clone(),
                path: self.backend.display_path(&name),
                stored_name: name,
                size: item.data.len() as u64,
                content_type: item.content_type.clone(),
            });
        }

        Ok(stored)
    }

    /// List every stored file
    ///
    /// Entries removed between enumeration and stat are skipped.
    pub fn list(&self) -> StorageResult<Vec<StoredFile>> {
        let mut files = Vec::new();

        for name in self.backend.list()? {
            let stat = match self.backend.stat(&name) {
                Ok(stat) => stat,
                Err(StorageError::NotFound(_)) => continue,
                Err(e) => return Err(e),
            };

            files.push(StoredFile {
                path: self.backend.display_path(&name),
                name,
                size: stat.size,
                created_at: stat.created_at,
                modified_at: stat.modified_at,
            });
        }

        Ok(files)
    }

    /// Fetch a stored file
    pub fn retrieve(&self, name: &str) -> StorageResult<RetrievedFile> {
        validate_name(name)?;
        let data = self.backend.read(name)?;

        Ok(RetrievedFile {
            name: name.to_string(),
            content_type: content_type_for(name),
            data,
        })
    }

    /// Fetch a stored file only if it resolves to an `image/*` type
    pub fn retrieve_image(&self, name: &str) -> StorageResult<RetrievedFile> {
        validate_name(name)?;
        if !self.backend.is_file(name)? {
            return Err(StorageError::NotFound(name.to_string()));
        }

        let content_type = content_type_for(name);
        if !content_type.starts_with("image/") {
            return Err(StorageError::UnsupportedMediaType(name.to_string()));
        }

        Ok(RetrievedFile {
            name: name.to_string(),
            data: self.backend.read(name)?,
            content_type,
        })
    }

    /// Rename a stored file; content and timestamps are untouched
    pub fn rename(&self, old_name: &str, new_name: &str) -> StorageResult<RenameOutcome> {
        if old_name.is_empty() || new_name.is_empty() {
            return Err(StorageError::Validation(
                "Both oldName and newName are required".to_string(),
            ));
        }
        validate_name(old_name)?;
        validate_name(new_name)?;

        // Only entries that list() reports can be renamed
        if !self.backend.is_file(old_name)? {
            return Err(StorageError::NotFound(old_name.to_string()));
        }
        if self.backend.exists(new_name)? {
            return Err(StorageError::Conflict(new_name.to_string()));
        }

        self.backend.rename(old_name, new_name)?;

        Ok(RenameOutcome {
            old_name: old_name.to_string(),
            new_name: new_name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_storage::local::StorageRoot;
    use std::fs;
    use tempfile::TempDir;

    fn create_service(temp: &TempDir) -> FileService<StorageRoot> {
        FileService::new(StorageRoot::new(temp.path().join("uploads")))
    }

    #[test]
    fn test_store_and_list() {
        let temp = TempDir::new().unwrap();
        let service = create_service(&temp);

        let stored = service
            .store(&[
                UploadItem::new("a.txt", b"alpha".to_vec()).with_suggested_name("First"),
                UploadItem::new("b.txt", b"beta".to_vec()),
            ])
            .unwrap();

        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].stored_name, "first.txt");
        assert_eq!(stored[0].original_name, "a.txt");
        assert_eq!(stored[0].size, 5);
        assert!(stored[1].stored_name.ends_with(".txt"));

        let mut listed: Vec<_> = service.list().unwrap().into_iter().map(|f| f.name).collect();
        listed.sort();
        let mut expected: Vec<_> = stored.iter().map(|f| f.stored_name.clone()).collect();
        expected.sort();
        assert_eq!(listed, expected);
    }

    #[test]
    fn test_store_reports_declared_type() {
        let temp = TempDir::new().unwrap();
        let service = create_service(&temp);

        let stored = service
            .store(&[UploadItem::new("pic.png", vec![1, 2, 3]).with_content_type("text/plain")])
            .unwrap();
        assert_eq!(stored[0].content_type, "text/plain");
    }

    #[test]
    fn test_store_creates_root() {
        let temp = TempDir::new().unwrap();
        let service = FileService::new(StorageRoot::new(temp.path().join("deep/nested/uploads")));

        service.store(&[UploadItem::new("x.bin", vec![0])]).unwrap();
        assert!(temp.path().join("deep/nested/uploads").is_dir());
    }

    #[test]
    fn test_store_empty_batch() {
        let temp = TempDir::new().unwrap();
        let service = create_service(&temp);

        assert!(matches!(service.store(&[]), Err(StorageError::Validation(_))));
        assert!(!temp.path().join("uploads").exists());
    }

    #[test]
    fn test_store_oversize_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let service = FileService::with_max_upload_bytes(StorageRoot::new(temp.path().join("uploads")), 8);

        let result = service.store(&[
            UploadItem::new("small.txt", b"ok".to_vec()),
            UploadItem::new("big.txt", vec![0u8; 9]),
        ]);
        assert!(matches!(result, Err(StorageError::PayloadTooLarge(9, 8))));
        assert!(!temp.path().join("uploads").exists());
    }

    #[test]
    fn test_store_overwrites_same_name() {
        let temp = TempDir::new().unwrap();
        let service = create_service(&temp);

        service
            .store(&[UploadItem::new("a.txt", b"first".to_vec()).with_suggested_name("same")])
            .unwrap();
        service
            .store(&[UploadItem::new("b.txt", b"second".to_vec()).with_suggested_name("same")])
            .unwrap();

        assert_eq!(service.list().unwrap().len(), 1);
        assert_eq!(service.retrieve("same.txt").unwrap().data, b"second");
    }

    #[test]
    fn test_list_without_root() {
        let temp = TempDir::new().unwrap();
        let service = create_service(&temp);

        assert!(matches!(service.list(), Err(StorageError::Io(_))));
    }

    #[test]
    fn test_list_reads_live_size() {
        let temp = TempDir::new().unwrap();
        let service = create_service(&temp);
        service
            .store(&[UploadItem::new("a.txt", b"abc".to_vec()).with_suggested_name("live")])
            .unwrap();

        fs::write(temp.path().join("uploads/live.txt"), b"abcdef").unwrap();

        let files = service.list().unwrap();
        assert_eq!(files[0].size, 6);
        assert_eq!(files[0].content_type(), "text/plain");
    }

    #[test]
    fn test_retrieve() {
        let temp = TempDir::new().unwrap();
        let service = create_service(&temp);
        service
            .store(&[UploadItem::new("doc.pdf", b"%PDF".to_vec()).with_suggested_name("doc")])
            .unwrap();

        let file = service.retrieve("doc.pdf").unwrap();
        assert_eq!(file.data, b"%PDF");
        assert_eq!(file.content_type, "application/pdf");

        assert!(matches!(service.retrieve("missing.pdf"), Err(StorageError::NotFound(_))));
        assert!(matches!(service.retrieve("../doc.pdf"), Err(StorageError::Validation(_))));
    }

    #[test]
    fn test_retrieve_image() {
        let temp = TempDir::new().unwrap();
        let service = create_service(&temp);
        service
            .store(&[
                UploadItem::new("a.png", vec![0x89, b'P', b'N', b'G']).with_suggested_name("pic"),
                UploadItem::new("a.txt", b"text".to_vec()).with_suggested_name("note"),
            ])
            .unwrap();

        let image = service.retrieve_image("pic.png").unwrap();
        assert_eq!(image.content_type, "image/png");
        assert_eq!(image.data, vec![0x89, b'P', b'N', b'G']);

        assert!(matches!(
            service.retrieve_image("note.txt"),
            Err(StorageError::UnsupportedMediaType(_))
        ));
        assert!(matches!(service.retrieve_image("absent.txt"), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_rename() {
        let temp = TempDir::new().unwrap();
        let service = create_service(&temp);
        service
            .store(&[UploadItem::new("a.txt", b"payload".to_vec()).with_suggested_name("a")])
            .unwrap();

        let outcome = service.rename("a.txt", "b.txt").unwrap();
        assert_eq!(
            outcome,
            RenameOutcome {
                old_name: "a.txt".to_string(),
                new_name: "b.txt".to_string(),
            }
        );
        assert_eq!(service.retrieve("b.txt").unwrap().data, b"payload");
        assert!(matches!(service.retrieve("a.txt"), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_rename_errors() {
        let temp = TempDir::new().unwrap();
        let service = create_service(&temp);
        service
            .store(&[
                UploadItem::new("a.txt", b"a".to_vec()).with_suggested_name("a"),
                UploadItem::new("b.txt", b"b".to_vec()).with_suggested_name("b"),
            ])
            .unwrap();

        assert!(matches!(service.rename("", "b.txt"), Err(StorageError::Validation(_))));
        assert!(matches!(service.rename("a.txt", ""), Err(StorageError::Validation(_))));
        assert!(matches!(service.rename("a.txt", "../b.txt"), Err(StorageError::Validation(_))));
        assert!(matches!(service.rename("zzz.txt", "c.txt"), Err(StorageError::NotFound(_))));
        assert!(matches!(service.rename("a.txt", "b.txt"), Err(StorageError::Conflict(_))));

        assert_eq!(service.retrieve("a.txt").unwrap().data, b"a");
        assert_eq!(service.retrieve("b.txt").unwrap().data, b"b");
    }

    #[test]
    fn test_directories_are_not_entries() {
        let temp = TempDir::new().unwrap();
        let service = create_service(&temp);
        service
            .store(&[UploadItem::new("a.txt", b"a".to_vec()).with_suggested_name("a")])
            .unwrap();
        fs::create_dir(temp.path().join("uploads/sub")).unwrap();
        fs::create_dir(temp.path().join("uploads/album.png")).unwrap();

        assert_eq!(service.list().unwrap().len(), 1);
        assert!(matches!(service.rename("sub", "moved"), Err(StorageError::NotFound(_))));
        assert!(temp.path().join("uploads/sub").is_dir());
        assert!(!temp.path().join("uploads/moved").exists());
        assert!(matches!(service.retrieve_image("album.png"), Err(StorageError::NotFound(_))));

        // A directory still occupies its name as a rename target
        assert!(matches!(service.rename("a.txt", "sub"), Err(StorageError::Conflict(_))));
    }

    #[test]
    fn test_uploaded_file_serialization() {
        let uploaded = UploadedFile {
            original_name: "a.txt".to_string(),
            stored_name: "1.txt".to_string(),
            path: "uploads/1.txt".to_string(),
            size: 1,
            content_type: "text/plain".to_string(),
        };

        let json = serde_json::to_value(&uploaded).unwrap();
        assert_eq!(json["originalName"], "a.txt");
        assert_eq!(json["storedName"], "1.txt");
        assert_eq!(json["type"], "text/plain");
    }
}
