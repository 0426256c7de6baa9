//! File storage for Filebay.
//!
//! This module provides physical file storage:
//! - Category directories named after the primary MIME type
//! - Collision-free naming with `name_(n).ext` suffixes
//! - Path resolution for the serve endpoint
//! - Whole-file and byte-range reads

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};


use super::mime::OCTET_STREAM;
use super::range::ByteRange;
use crate::{FilebayError, Result};

/// Category used when an upload has no usable MIME type.
pub const GENERIC_CATEGORY: &str = "other";

/// Placeholder file that keeps empty directories under version control.
pub const KEEP_SENTINEL: &str = ".gitkeep";

/// URL prefix under which the storage root is served as static files.
pub const PUBLIC_PREFIX: &str = "/storage";

/// URL prefix of the streaming serve endpoint.
pub const SERVE_PREFIX: &str = "/api/files/serve";

/// A file written by [`FileStorage::save`].
#[derive(Debug, Clone)]
pub struct StoredFile {
    /// On-disk name, possibly disambiguated.
    pub name: String,
    /// Name as provided by the client.
    pub original_name: String,
    /// Declared MIME type.
    pub mime_type: String,
    /// Size in bytes.
    pub size: u64,
    /// `/`-separated path from the storage root.
    pub relative_path: String,
    /// Absolute on-disk path.
    pub path: PathBuf,
    /// Static URL under [`PUBLIC_PREFIX`].
    pub public_url: String,
    /// Streaming URL under [`SERVE_PREFIX`].
    pub serve_url: String,
}

/// A file found by [`FileStorage::locate`].
#[derive(Debug, Clone)]
pub struct LocatedFile {
    /// Absolute on-disk path.
    pub path: PathBuf,
    /// Final path segment.
    pub filename: String,
    /// Size in bytes at lookup time.
    pub size: u64,
}

/// File storage service for managing physical files.
///
/// Files are partitioned by the primary component of their MIME type:
/// ```text
/// {base_path}/
/// ├── image/
/// │   ├── cat.png
/// │   └── cat_(1).png
/// ├── video/
/// │   └── trailer.mp4
/// └── other/
///     └── blob
/// ```
#[derive(Debug, Clone)]
pub struct FileStorage {
    /// Absolute storage root.
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a new FileStorage rooted at the given path.
    ///
    /// The root is created if it doesn't exist and stored in canonical form.
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path)?;
        let base_path = fs::canonicalize(&base_path)?;

        Ok(Self { base_path })
    }

    /// Get the storage root.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Category directory for a declared MIME type.
    ///
    /// Uses the text before `/`. Falls back to [`GENERIC_CATEGORY`] when the
    /// type is missing or its primary component is not a plain token.
    pub fn category_for(mime_type: Option<&str>) -> String {
        let primary = mime_type
            .and_then(|m| m.split('/').next())
            .map(str::trim)
            .unwrap_or_default();

        let starts_alnum = primary
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphanumeric());
        let is_token = primary
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '+' | '-'));

        if starts_alnum && is_token {
            primary.to_string()
        } else {
            GENERIC_CATEGORY.to_string()
        }
    }

    /// Reduce a client-provided file name to a single safe path component.
    ///
    /// Directory parts (either separator) and control characters are dropped.
    pub fn sanitize_name(original_name: &str) -> Result<String> {
        let base = original_name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default();
        let name: String = base.chars().filter(|c| !c.is_control()).collect();
        let name = name.trim();

        if name.is_empty() || name == "." || name == ".." {
            return Err(FilebayError::Validation(format!(
                "invalid file name: {original_name:?}"
            )));
        }

        Ok(name.to_string())
    }

    /// The `attempt`-th candidate name for `name`.
    ///
    /// Attempt 0 is the name itself; later attempts insert `_(n)` before the
    /// extension. A leading dot does not start an extension.
    pub fn candidate_name(name: &str, attempt: u32) -> String {
        if attempt == 0 {
            return name.to_string();
        }

        match name.rfind('.') {
            Some(idx) if idx > 0 => {
                let (stem, ext) = name.split_at(idx);
                format!("{stem}_({attempt}){ext}")
            }
            _ => format!("{name}_({attempt})"),
        }
    }

    /// Save an upload under its category directory.
    ///
    /// The first free candidate name is claimed with an exclusive create, so
    /// an existing file is never overwritten.
    pub fn save(
        &self,
        content: &[u8],
        original_name: &str,
        mime_type: Option<&str>,
    ) -> Result<StoredFile> {
        let name = Self::sanitize_name(original_name)?;
        let category = Self::category_for(mime_type);
        let dir = self.base_path.join(&category);
        fs::create_dir_all(&dir)?;

        let mut attempt = 0;
        let (stored_name, mut file) = loop {
            let candidate = Self::candidate_name(&name, attempt);
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(dir.join(&candidate))
            {
                Ok(file) => break (candidate, file),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(e.into()),
            }
        };

        let path = dir.join(&stored_name);
        if let Err(e) = file.write_all(content).and_then(|()| file.sync_all()) {
            drop(file);
            let _ = fs::remove_file(&path);
            return Err(e.into());
        }

        let metadata = fs::metadata(&path)?;
        let relative_path = format!("{category}/{stored_name}");

        tracing::debug!(path = %path.display(), size = metadata.len(), "Stored upload");

        Ok(StoredFile {
            public_url: Self::public_url(&relative_path),
            serve_url: Self::serve_url(&relative_path),
            name: stored_name,
            original_name: original_name.to_string(),
            mime_type: mime_type
                .filter(|m| !m.trim().is_empty())
                .unwrap_or(OCTET_STREAM)
                .to_string(),
            size: metadata.len(),
            relative_path,
            path,
        })
    }

    /// Resolve path segments to a location under the storage root.
    ///
    /// Rejects empty input and any segment that could step outside the root.
    pub fn resolve<S: AsRef<str>>(&self, segments: &[S]) -> Result<PathBuf> {
        if segments.is_empty() {
            return Err(FilebayError::Validation("No path provided".to_string()));
        }

        let mut path = self.base_path.clone();
        for segment in segments {
            let segment = segment.as_ref();
            if segment.is_empty()
                || segment == "."
                || segment == ".."
                || segment.contains(['/', '\\', '\0'])
            {
                return Err(FilebayError::InvalidPath(segment.to_string()));
            }
            path.push(segment);
        }

        Ok(path)
    }

    /// Resolve segments and confirm a regular file exists there.
    pub fn locate<S: AsRef<str>>(&self, segments: &[S]) -> Result<LocatedFile> {
        let path = self.resolve(segments)?;
        let display = segments
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join("/");

        let metadata = match fs::metadata(&path) {
            Ok(m) if m.is_file() => m,
            _ => return Err(FilebayError::NotFound(format!("File: {display}"))),
        };
        let filename = segments
            .last()
            .map(|s| s.as_ref().to_string())
            .unwrap_or_default();

        Ok(LocatedFile {
            path,
            filename,
            size: metadata.len(),
        })
    }

    /// Read an entire file.
    pub fn read_all(path: &Path) -> Result<Vec<u8>> {
        Ok(fs::read(path)?)
    }

    /// Read the bytes covered by `range`.
    ///
    /// Seeks to the start and reads at most `range.chunk_len()` bytes instead of
    /// loading the whole file.
    pub fn read_range(path: &Path, range: ByteRange) -> Result<Vec<u8>> {
        let mut file = File::open(path)?;
        file.seek(SeekFrom::Start(range.start))?;

        let mut buf = Vec::with_capacity(range.chunk_len() as usize);
        file.take(range.chunk_len()).read_to_end(&mut buf)?;
        Ok(buf)
    }

    /// Static URL for a `/`-separated relative path.
    pub fn public_url(relative_path: &str) -> String {
        format!("{PUBLIC_PREFIX}/{relative_path}")
    }

    /// Serve endpoint URL for a `/`-separated relative path.
    ///
    /// Each segment is percent-encoded.
    pub fn serve_url(relative_path: &str) -> String {
        let encoded: Vec<String> = relative_path
            .split('/')
            .map(|s| urlencoding::encode(s).into_owned())
            .collect();
        format!("{SERVE_PREFIX}/{}", encoded.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_storage() -> (TempDir, FileStorage) {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path()).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_new_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let storage_path = temp_dir.path().join("public").join("storage");

        assert!(!storage_path.exists());

        let storage = FileStorage::new(&storage_path).unwrap();

        assert!(storage_path.exists());
        assert!(storage.base_path().is_absolute());
        assert_eq!(
            storage.base_path(),
            fs::canonicalize(&storage_path).unwrap()
        );
    }

    #[test]
    fn test_category_for() {
        assert_eq!(FileStorage::category_for(Some("image/png")), "image");
        assert_eq!(FileStorage::category_for(Some("video/mp4")), "video");
        assert_eq!(
            FileStorage::category_for(Some("application/pdf")),
            "application"
        );
        assert_eq!(FileStorage::category_for(Some("x-custom")), "x-custom");
    }

    #[test]
    fn test_category_for_falls_back() {
        assert_eq!(FileStorage::category_for(None), GENERIC_CATEGORY);
        assert_eq!(FileStorage::category_for(Some("")), GENERIC_CATEGORY);
        assert_eq!(FileStorage::category_for(Some("/png")), GENERIC_CATEGORY);
        assert_eq!(FileStorage::category_for(Some("../x")), GENERIC_CATEGORY);
        assert_eq!(FileStorage::category_for(Some("..")), GENERIC_CATEGORY);
        assert_eq!(FileStorage::category_for(Some("a b/c")), GENERIC_CATEGORY);
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(FileStorage::sanitize_name("cat.png").unwrap(), "cat.png");
        assert_eq!(
            FileStorage::sanitize_name("C:\\Users\\me\\cat.png").unwrap(),
            "cat.png"
        );
        assert_eq!(
            FileStorage::sanitize_name("../../etc/passwd").unwrap(),
            "passwd"
        );
        assert_eq!(
            FileStorage::sanitize_name("bad\r\nname.txt").unwrap(),
            "badname.txt"
        );
    }

    #[test]
    fn test_sanitize_name_rejects_empty() {
        for name in ["", "   ", ".", "..", "dir/", "\u{0}"] {
            assert!(
                matches!(
                    FileStorage::sanitize_name(name),
                    Err(FilebayError::Validation(_))
                ),
                "{name:?}"
            );
        }
    }

    #[test]
    fn test_candidate_name() {
        assert_eq!(FileStorage::candidate_name("a.png", 0), "a.png");
        assert_eq!(FileStorage::candidate_name("a.png", 1), "a_(1).png");
        assert_eq!(FileStorage::candidate_name("a.png", 12), "a_(12).png");
        assert_eq!(
            FileStorage::candidate_name("archive.tar.gz", 1),
            "archive.tar_(1).gz"
        );
        assert_eq!(FileStorage::candidate_name("README", 2), "README_(2)");
        assert_eq!(FileStorage::candidate_name(".env", 1), ".env_(1)");
    }

    #[test]
    fn test_save_writes_under_category() {
        let (_temp_dir, storage) = setup_storage();

        let stored = storage
            .save(b"\x89PNG data", "a.png", Some("image/png"))
            .unwrap();

        assert_eq!(stored.name, "a.png");
        assert_eq!(stored.original_name, "a.png");
        assert_eq!(stored.mime_type, "image/png");
        assert_eq!(stored.size, 9);
        assert_eq!(stored.relative_path, "image/a.png");
        assert_eq!(stored.path, storage.base_path().join("image").join("a.png"));
        assert_eq!(stored.public_url, "/storage/image/a.png");
        assert_eq!(stored.serve_url, "/api/files/serve/image/a.png");
        assert_eq!(fs::read(&stored.path).unwrap(), b"\x89PNG data");
    }

    #[test]
    fn test_save_disambiguates_collisions() {
        let (_temp_dir, storage) = setup_storage();

        let first = storage.save(b"one", "a.png", Some("image/png")).unwrap();
        let second = storage.save(b"two", "a.png", Some("image/png")).unwrap();
        let third = storage.save(b"three", "a.png", Some("image/png")).unwrap();

        assert_eq!(first.name, "a.png");
        assert_eq!(second.name, "a_(1).png");
        assert_eq!(third.name, "a_(2).png");

        let dir = storage.base_path().join("image");
        assert_eq!(fs::read(dir.join("a.png")).unwrap(), b"one");
        assert_eq!(fs::read(dir.join("a_(1).png")).unwrap(), b"two");
        assert_eq!(fs::read(dir.join("a_(2).png")).unwrap(), b"three");
    }

    #[test]
    fn test_save_same_name_different_category() {
        let (_temp_dir, storage) = setup_storage();

        let image = storage.save(b"1", "file.bin", Some("image/x")).unwrap();
        let other = storage
            .save(b"2", "file.bin", Some("application/x"))
            .unwrap();

        assert_eq!(image.name, "file.bin");
        assert_eq!(other.name, "file.bin");
        assert_eq!(other.relative_path, "application/file.bin");
    }

    #[test]
    fn test_save_skips_existing_directory_name() {
        let (_temp_dir, storage) = setup_storage();
        fs::create_dir_all(storage.base_path().join("text").join("notes.txt")).unwrap();

        let stored = storage
            .save(b"hello", "notes.txt", Some("text/plain"))
            .unwrap();

        assert_eq!(stored.name, "notes_(1).txt");
    }

    #[test]
    fn test_save_without_mime_uses_generic_bucket() {
        let (_temp_dir, storage) = setup_storage();

        let stored = storage.save(b"data", "blob", None).unwrap();

        assert_eq!(stored.relative_path, "other/blob");
        assert_eq!(stored.mime_type, OCTET_STREAM);
    }

    #[test]
    fn test_save_encodes_serve_url() {
        let (_temp_dir, storage) = setup_storage();

        let stored = storage
            .save(b"data", "my clip #1.mp4", Some("video/mp4"))
            .unwrap();

        assert_eq!(stored.public_url, "/storage/video/my clip #1.mp4");
        assert_eq!(stored.serve_url, "/api/files/serve/video/my%20clip%20%231.mp4");
    }

    #[test]
    fn test_save_rejects_invalid_name() {
        let (_temp_dir, storage) = setup_storage();

        let result = storage.save(b"data", "..", Some("text/plain"));

        assert!(matches!(result, Err(FilebayError::Validation(_))));
    }

    #[test]
    fn test_save_empty_content() {
        let (_temp_dir, storage) = setup_storage();

        let stored = storage.save(b"", "empty.txt", Some("text/plain")).unwrap();

        assert_eq!(stored.size, 0);
        assert!(stored.path.exists());
    }

    #[test]
    fn test_resolve() {
        let (_temp_dir, storage) = setup_storage();

        let path = storage.resolve(&["video", "a.mp4"]).unwrap();
        assert_eq!(path, storage.base_path().join("video").join("a.mp4"));
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let (_temp_dir, storage) = setup_storage();

        for segments in [
            vec!["..", "etc", "passwd"],
            vec!["video", ".", "a.mp4"],
            vec!["video", ""],
            vec!["video\\..\\..", "a"],
        ] {
            assert!(
                matches!(
                    storage.resolve(&segments),
                    Err(FilebayError::InvalidPath(_))
                ),
                "{segments:?}"
            );
        }
    }

    #[test]
    fn test_resolve_empty() {
        let (_temp_dir, storage) = setup_storage();
        let empty: [&str; 0] = [];

        assert!(matches!(
            storage.resolve(&empty),
            Err(FilebayError::Validation(_))
        ));
    }

    #[test]
    fn test_locate() {
        let (_temp_dir, storage) = setup_storage();
        let stored = storage.save(b"12345", "a.txt", Some("text/plain")).unwrap();

        let located = storage.locate(&["text", "a.txt"]).unwrap();

        assert_eq!(located.path, stored.path);
        assert_eq!(located.filename, "a.txt");
        assert_eq!(located.size, 5);
    }

    #[test]
    fn test_locate_not_found() {
        let (_temp_dir, storage) = setup_storage();

        let result = storage.locate(&["image", "missing.png"]);
        assert!(matches!(result, Err(FilebayError::NotFound(_))));
    }

    #[test]
    fn test_locate_directory_is_not_found() {
        let (_temp_dir, storage) = setup_storage();
        storage.save(b"x", "a.png", Some("image/png")).unwrap();

        let result = storage.locate(&["image"]);
        assert!(matches!(result, Err(FilebayError::NotFound(_))));
    }

    #[test]
    fn test_read_all_and_range() {
        let (_temp_dir, storage) = setup_storage();
        let content: Vec<u8> = (0..=255).collect();
        let stored = storage.save(&content, "bytes.mp4", Some("video/mp4")).unwrap();

        assert_eq!(FileStorage::read_all(&stored.path).unwrap(), content);

        let chunk =
            FileStorage::read_range(&stored.path, ByteRange { start: 10, end: 19 }).unwrap();
        assert_eq!(chunk, (10..20).collect::<Vec<u8>>());

        let tail =
            FileStorage::read_range(&stored.path, ByteRange { start: 250, end: 255 }).unwrap();
        assert_eq!(tail, vec![250, 251, 252, 253, 254, 255]);
    }

    #[test]
    fn test_large_file() {
        let (_temp_dir, storage) = setup_storage();
        let content: Vec<u8> = vec![0xAB; 1024 * 1024];

        let stored = storage.save(&content, "large.bin", None).unwrap();

        assert_eq!(stored.size, 1024 * 1024);
        assert_eq!(FileStorage::read_all(&stored.path).unwrap(), content);
    }

    #[test]
    fn test_unicode_original_name() {
        let (_temp_dir, storage) = setup_storage();

        let stored = storage
            .save(b"data", "日本語ファイル.txt", Some("text/plain"))
            .unwrap();
        assert_eq!(stored.name, "日本語ファイル.txt");
        assert!(stored.serve_url.contains("%E6%97%A5%E6%9C%AC%E8%AA%9E"));
    }
}
