//! File management module for Filebay.
//!
//! This module provides the storage core behind the file endpoints:
//! - Category-partitioned storage with collision-free naming
//! - Recursive listing of the storage tree
//! - Extension-based content types and gallery kinds
//! - Byte-range parsing for video streaming

mod mime;
mod range;
mod storage;
mod tree;

pub use mime::{
    content_type_for, extension_of, is_range_video, FileKind, OCTET_STREAM,
    RANGE_VIDEO_EXTENSIONS,
};
pub use range::{parse_range, ByteRange, RangeError};
pub use storage::{
    FileStorage, LocatedFile, StoredFile, GENERIC_CATEGORY, KEEP_SENTINEL, PUBLIC_PREFIX,
    SERVE_PREFIX,
};
pub use tree::{
    list_tree, DirectoryNode, FileEntry, KindCounts, KindStats, TreeEntry, MAX_WALK_DEPTH,
};
