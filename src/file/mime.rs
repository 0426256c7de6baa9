//! Content type and gallery classification by file extension.

/// Content type used for anything not in the extension table.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Video extensions the serve endpoint answers `Range` requests for.
///
/// Narrower than [`FileKind::Video`], which also covers `mkv` and `flv`.
pub const RANGE_VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "avi", "mov", "wmv"];

/// Lowercased extension of a file name, if it has one.
///
/// The text after the last `.` is used, matching how browsers and the
/// gallery views read extensions. A name without a dot has no extension.
pub fn extension_of(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
}

/// Content type for a file name, from the fixed extension table.
pub fn content_type_for(filename: &str) -> &'static str {
    match extension_of(filename).as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("avi") => "video/x-msvideo",
        Some("mov") => "video/quicktime",
        Some("wmv") => "video/x-ms-wmv",
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain",
        Some("csv") => "text/csv",
        Some("json") => "application/json",
        _ => OCTET_STREAM,
    }
}

/// Whether the serve endpoint streams this file with range support.
pub fn is_range_video(filename: &str) -> bool {
    extension_of(filename)
        .map(|ext| RANGE_VIDEO_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Gallery grouping of stored files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Video,
    Image,
    Pdf,
    Document,
    Audio,
    Other,
}

impl FileKind {
    /// All kinds in display order.
    pub const ALL: [FileKind; 6] = [
        FileKind::Video,
        FileKind::Image,
        FileKind::Pdf,
        FileKind::Document,
        FileKind::Audio,
        FileKind::Other,
    ];

    /// Extensions that belong to this kind. Empty for [`FileKind::Other`].
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            FileKind::Video => &["mp4", "avi", "mov", "wmv", "mkv", "flv", "webm"],
            FileKind::Image => &["jpg", "jpeg", "png", "gif", "bmp", "webp", "svg"],
            FileKind::Pdf => &["pdf"],
            FileKind::Document => &["doc", "docx", "txt", "rtf"],
            FileKind::Audio => &["mp3", "wav", "flac", "aac", "ogg"],
            FileKind::Other => &[],
        }
    }

    /// Classify a file name. The first kind whose extension list matches wins.
    pub fn classify(filename: &str) -> FileKind {
        let Some(ext) = extension_of(filename) else {
            return FileKind::Other;
        };

        FileKind::ALL
            .into_iter()
            .find(|kind| kind.extensions().contains(&ext.as_str()))
            .unwrap_or(FileKind::Other)
    }
}
