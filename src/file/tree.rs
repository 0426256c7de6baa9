//! Recursive listing of the storage root.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::mime::FileKind;
use super::storage::{FileStorage, KEEP_SENTINEL};
use crate::datetime::{from_system_time, rfc3339_millis};

/// Directories nested deeper than this are listed without children.
pub const MAX_WALK_DEPTH: usize = 32;

/// A file in the listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub name: String,
    pub size: u64,
    #[serde(serialize_with = "rfc3339_millis::serialize")]
    pub modified: DateTime<Utc>,
    /// `/`-separated path from the storage root.
    pub path: String,
    pub public_url: String,
    pub serve_url: String,
}

/// A directory in the listing.
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryNode {
    pub name: String,
    /// `/`-separated path from the storage root.
    pub path: String,
    pub files: Vec<TreeEntry>,
}

/// One node of the storage tree.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TreeEntry {
    File(FileEntry),
    Directory(DirectoryNode),
}

impl TreeEntry {
    pub fn name(&self) -> &str {
        match self {
            TreeEntry::File(f) => &f.name,
            TreeEntry::Directory(d) => &d.name,
        }
    }
}

/// Walk the storage root and return its entries, sorted by name.
///
/// A missing or unreadable directory contributes no entries; the walk never
/// fails as a whole.
pub fn list_tree(root: &Path) -> Vec<TreeEntry> {
    walk_dir(root, "", 0)
}

fn walk_dir(dir: &Path, relative: &str, depth: usize) -> Vec<TreeEntry> {
    let reader = match fs::read_dir(dir) {
        Ok(reader) => reader,
        Err(e) => {
            tracing::warn!("Could not read directory {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut names: Vec<String> = reader
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.file_name()),
            Err(e) => {
                tracing::warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                None
            }
        })
        .filter_map(|name| match name.into_string() {
            Ok(name) => Some(name),
            Err(raw) => {
                tracing::warn!("Skipping non UTF-8 name {:?} in {}", raw, dir.display());
                None
            }
        })
        .filter(|name| name != KEEP_SENTINEL)
        .collect();
    names.sort();

    let mut entries = Vec::with_capacity(names.len());
    for name in names {
        let full_path = dir.join(&name);
        let path = if relative.is_empty() {
            name.clone()
        } else {
            format!("{relative}/{name}")
        };

        let metadata = match fs::metadata(&full_path) {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!("Could not stat {}: {}", full_path.display(), e);
                continue;
            }
        };

        if metadata.is_dir() {
            let files = if depth + 1 >= MAX_WALK_DEPTH {
                tracing::warn!("Not descending into {}: too deep", full_path.display());
                Vec::new()
            } else {
                walk_dir(&full_path, &path, depth + 1)
            };
            entries.push(TreeEntry::Directory(DirectoryNode { name, path, files }));
        } else {
            let modified = match metadata.modified() {
                Ok(t) => from_system_time(t),
                Err(e) => {
                    tracing::warn!("No modification time for {}: {}", full_path.display(), e);
                    continue;
                }
            };
            entries.push(TreeEntry::File(FileEntry {
                public_url: FileStorage::public_url(&path),
                serve_url: FileStorage::serve_url(&path),
                name,
                size: metadata.len(),
                modified,
                path,
            }));
        }
    }

    entries
}

/// File counts per gallery kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct KindCounts {
    pub video: u64,
    pub image: u64,
    pub pdf: u64,
    pub document: u64,
    pub audio: u64,
    pub other: u64,
}

impl KindCounts {
    fn add(&mut self, kind: FileKind) {
        let slot = match kind {
            FileKind::Video => &mut self.video,
            FileKind::Image => &mut self.image,
            FileKind::Pdf => &mut self.pdf,
            FileKind::Document => &mut self.document,
            FileKind::Audio => &mut self.audio,
            FileKind::Other => &mut self.other,
        };
        *slot += 1;
    }
}

/// Aggregate statistics over a storage tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KindStats {
    pub counts: KindCounts,
    pub total_files: u64,
    pub total_bytes: u64,
}

impl KindStats {
    /// Count every file in `entries`, recursing into directories.
    pub fn collect(entries: &[TreeEntry]) -> Self {
        let mut stats = Self::default();
        stats.visit(entries);
        stats
    }

    fn visit(&mut self, entries: &[TreeEntry]) {
        for entry in entries {
            match entry {
                TreeEntry::File(file) => {
                    self.counts.add(FileKind::classify(&file.name));
                    self.total_files += 1;
                    self.total_bytes += file.size;
                }
                TreeEntry::Directory(dir) => self.visit(&dir.files),
            }
        }
    }
}
