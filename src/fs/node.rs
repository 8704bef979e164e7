//! Drive entry types as exchanged with the backend.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DriveError, Result};

/// Kind of item, as sent in rename/delete requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Folder,
    File,
}

impl ItemKind {
    /// Wire name (`"folder"` / `"file"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Folder => "folder",
            ItemKind::File => "file",
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A folder reference used for breadcrumbs and navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderRef {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
}

impl FolderRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A subfolder of the listed location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderEntry {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    /// Parent folder id, `None` at root. Must be present (possibly `null`).
    #[serde(deserialize_with = "Option::deserialize")]
    pub parent_id: Option<String>,
}

impl FolderEntry {
    /// Reference used to navigate into this folder.
    pub fn to_folder_ref(&self) -> FolderRef {
        FolderRef::new(self.id.clone(), self.name.clone())
    }
}

/// A file in the listed location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(deserialize_with = "Option::deserialize")]
    pub parent_id: Option<String>,
    /// File size in bytes.
    #[serde(default, rename = "size")]
    pub size_bytes: u64,
}

impl FileEntry {
    /// Human-readable size, e.g. `"1.50 KB"`.
    pub fn display_size(&self) -> String {
        format_size(self.size_bytes)
    }
}

/// Immediate children of one location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    #[serde(default)]
    pub folders: Vec<FolderEntry>,
    #[serde(default)]
    pub files: Vec<FileEntry>,
}

impl Listing {
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.folders.len() + self.files.len()
    }

    pub fn folder(&self, id: &str) -> Option<&FolderEntry> {
        self.folders.iter().find(|f| f.id == id)
    }

    pub fn file(&self, id: &str) -> Option<&FileEntry> {
        self.files.iter().find(|f| f.id == id)
    }
}

/// A pending rename, alive only while the user edits the new name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameDraft {
    pub id: String,
    pub kind: ItemKind,
    pub proposed_name: String,
}

impl RenameDraft {
    /// Draft prefilled with the folder's current name.
    pub fn for_folder(folder: &FolderEntry) -> Self {
        Self {
            id: folder.id.clone(),
            kind: ItemKind::Folder,
            proposed_name: folder.name.clone(),
        }
    }

    /// Draft prefilled with the file's current name.
    pub fn for_file(file: &FileEntry) -> Self {
        Self {
            id: file.id.clone(),
            kind: ItemKind::File,
            proposed_name: file.name.clone(),
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.proposed_name = name.into();
    }
}

/// One file of an upload batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub data: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    /// Read a local file; the upload keeps its file name.
    pub async fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| DriveError::Validation(format!("Invalid file path: {}", path.display())))?
            .to_string();
        let data = tokio::fs::read(path).await?;
        Ok(Self { name, data })
    }

    /// MIME type guessed from the file name.
    pub fn mime_type(&self) -> String {
        mime_guess::from_path(&self.name)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Format a byte count with base-1024 units and two decimals.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    if bytes == 0 {
        return "0 B".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_deserialize() {
        let body = r#"{
            "folders": [{"_id": "f1", "name": "Docs", "parent_id": null}],
            "files": [{"_id": "a1", "name": "notes.txt", "parent_id": null, "size": 42, "mime": "text/plain"}]
        }"#;
        let listing: Listing = serde_json::from_str(body).unwrap();
        assert_eq!(listing.folders[0].id, "f1");
        assert_eq!(listing.folders[0].parent_id, None);
        assert_eq!(listing.files[0].size_bytes, 42);
        assert_eq!(listing.len(), 2);
        assert!(listing.file("a1").is_some());
        assert!(listing.folder("a1").is_none());
    }

    #[test]
    fn test_entry_id_alias_and_defaults() {
        let folder: FolderEntry =
            serde_json::from_str(r#"{"id": "x", "name": "Inbox", "parent_id": null}"#).unwrap();
        assert_eq!(folder.id, "x");
        assert_eq!(folder.parent_id, None);

        let listing: Listing = serde_json::from_str("{}").unwrap();
        assert!(listing.is_empty());
    }

    #[test]
    fn test_missing_parent_id_is_rejected() {
        let folder = serde_json::from_str::<FolderEntry>(r#"{"_id": "x", "name": "Inbox"}"#);
        assert!(folder.is_err());

        let listing = serde_json::from_str::<Listing>(
            r#"{"folders": [], "files": [{"_id": "a1", "name": "notes.txt", "size": 3}]}"#,
        );
        assert!(listing.is_err());
    }

    #[test]
    fn test_folder_ref_roundtrip_field_names() {
        let value = serde_json::to_value(FolderRef::new("p1", "Photos")).unwrap();
        assert_eq!(value, serde_json::json!({"_id": "p1", "name": "Photos"}));
    }

    #[test]
    fn test_item_kind_wire_names() {
        assert_eq!(ItemKind::Folder.as_str(), "folder");
        assert_eq!(ItemKind::File.to_string(), "file");
        assert_eq!(
            serde_json::to_value(ItemKind::Folder).unwrap(),
            serde_json::json!("folder")
        );
    }

    #[test]
    fn test_rename_draft() {
        let file = FileEntry {
            id: "a1".to_string(),
            name: "old.txt".to_string(),
            parent_id: Some("f1".to_string()),
            size_bytes: 0,
        };
        let mut draft = RenameDraft::for_file(&file);
        assert_eq!(draft.kind, ItemKind::File);
        assert_eq!(draft.proposed_name, "old.txt");
        draft.set_name("new.txt");
        assert_eq!(draft.proposed_name, "new.txt");

        let folder = FolderEntry {
            id: "f2".to_string(),
            name: "Reports".to_string(),
            parent_id: None,
        };
        assert_eq!(RenameDraft::for_folder(&folder).kind, ItemKind::Folder);
        assert_eq!(folder.to_folder_ref(), FolderRef::new("f2", "Reports"));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512.00 B");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(1_048_576), "1.00 MB");
        assert_eq!(format_size(5 * 1_073_741_824), "5.00 GB");
        assert_eq!(format_size(2048 * 1_099_511_627_776), "2048.00 TB");
    }

    #[test]
    fn test_upload_file_mime() {
        assert_eq!(UploadFile::new("photo.png", vec![1, 2]).mime_type(), "image/png");
        assert_eq!(
            UploadFile::new("blob", Vec::new()).mime_type(),
            "application/octet-stream"
        );
        assert_eq!(UploadFile::new("a.txt", b"hello".to_vec()).size(), 5);
    }

    #[tokio::test]
    async fn test_upload_file_from_path() {
        let dir = std::env::temp_dir().join(format!("drivelib-upload-{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("hello.txt");
        tokio::fs::write(&path, b"hi there").await.unwrap();

        let file = UploadFile::from_path(&path).await.unwrap();
        assert_eq!(file.name, "hello.txt");
        assert_eq!(file.data, b"hi there");

        let missing = UploadFile::from_path(dir.join("missing.txt")).await;
        assert!(matches!(missing, Err(DriveError::Io(_))));

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
