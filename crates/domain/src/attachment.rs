use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Image MIME types accepted for upload.
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Video MIME types accepted for upload.
pub const ALLOWED_VIDEO_TYPES: &[&str] = &["video/mp4", "video/webm", "video/ogg"];

/// Default image ceiling in bytes.
pub const MAX_IMAGE_SIZE: u64 = 10 * 1024 * 1024;

/// Default video ceiling in bytes.
pub const MAX_VIDEO_SIZE: u64 = 50 * 1024 * 1024;

/// Media family of an accepted attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    /// Still or animated image.
    Image,
    /// Video clip.
    Video,
}

impl AttachmentKind {
    /// Classifies a MIME type, returning `None` for unsupported types.
    #[must_use]
    pub fn from_mime_type(mime_type: &str) -> Option<Self> {
        if ALLOWED_IMAGE_TYPES.contains(&mime_type) {
            Some(Self::Image)
        } else if ALLOWED_VIDEO_TYPES.contains(&mime_type) {
            Some(Self::Video)
        } else {
            None
        }
    }

    /// Returns the default ceiling for this kind.
    #[must_use]
    pub fn default_max_size(&self) -> u64 {
        match self {
            Self::Image => MAX_IMAGE_SIZE,
            Self::Video => MAX_VIDEO_SIZE,
        }
    }
}

/// Metadata for a file picked by the subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    /// Original file name.
    pub name: String,
    /// Declared MIME type.
    pub mime_type: String,
    /// Size in bytes.
    pub size: u64,
}

impl FileDescriptor {
    /// Creates a descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size,
        }
    }
}

/// Reason a file was refused before upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRejection {
    /// Nothing was selected.
    NoFile,
    /// The file has no content.
    Empty,
    /// The MIME type is neither an allowed image nor video.
    UnsupportedType,
    /// The file exceeds the ceiling in bytes.
    SizeExceeded {
        /// Ceiling that was applied.
        limit: u64,
    },
    /// The subject's role does not allow uploads.
    UploadNotPermitted,
}

impl Display for FileRejection {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoFile => formatter.write_str("No file selected"),
            Self::Empty => formatter.write_str("File is empty"),
            Self::UnsupportedType => {
                formatter.write_str("Invalid file type. Only images and videos are allowed.")
            }
            Self::SizeExceeded { limit } => {
                write!(formatter, "File size exceeds {}MB limit", limit / (1024 * 1024))
            }
            Self::UploadNotPermitted => formatter.write_str("You are not allowed to upload files"),
        }
    }
}

/// Outcome of validating a file before upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileValidation {
    /// The file may be uploaded.
    Accepted(AttachmentKind),
    /// The file was refused.
    Rejected(FileRejection),
}

impl FileValidation {
    /// Returns whether the file may be uploaded.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    /// Returns the user-facing refusal reason.
    #[must_use]
    pub fn reason(&self) -> Option<String> {
        match self {
            Self::Accepted(_) => None,
            Self::Rejected(rejection) => Some(rejection.to_string()),
        }
    }
}

/// Validates a picked file against the allowed types and a byte ceiling.
#[must_use]
pub fn validate_file(file: Option<&FileDescriptor>, max_size: u64) -> FileValidation {
    let Some(file) = file else {
        return FileValidation::Rejected(FileRejection::NoFile);
    };

    let Some(kind) = AttachmentKind::from_mime_type(file.mime_type.as_str()) else {
        return FileValidation::Rejected(FileRejection::UnsupportedType);
    };

    if file.size == 0 {
        return FileValidation::Rejected(FileRejection::Empty);
    }

    if file.size > max_size {
        return FileValidation::Rejected(FileRejection::SizeExceeded { limit: max_size });
    }

    FileValidation::Accepted(kind)
}

/// Builds the storage object name `{unix_millis}_{file_name}`.
#[must_use]
pub fn storage_object_name(unix_millis: i64, file_name: &str) -> String {
    let file_name = file_name.replace('/', "_");
    format!("{unix_millis}_{file_name}")
}

/// Byte progress of one upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadProgress {
    /// Bytes sent so far.
    pub bytes_transferred: u64,
    /// Total bytes to send.
    pub total_bytes: u64,
}

impl UploadProgress {
    /// Returns completion in percent, `100.0` for empty transfers.
    #[must_use]
    pub fn percent(&self) -> f64 {
        if self.total_bytes == 0 {
            return 100.0;
        }
        (self.bytes_transferred as f64 / self.total_bytes as f64) * 100.0
    }
}
