//! Image ingestion: turning files, dropped bytes and pasted data into a
//! [`SourceImage`] the tracer can consume.

use std::path::Path;
use std::sync::Arc;

use base64::Engine;
use thiserror::Error;
use tracing::debug;

/// Extension to media type table for accepted inputs.
const IMAGE_TYPES: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("bmp", "image/bmp"),
    ("ico", "image/x-icon"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("svg", "image/svg+xml"),
];

/// Errors raised while ingesting an image.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Not an image: {0}")]
    NotAnImage(String),
    #[error("Image is empty")]
    Empty,
    #[error("Invalid data URL: {0}")]
    InvalidDataUrl(String),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// A loaded image, ready to be embedded or handed to the tracer.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceImage {
    /// File name shown in the UI.
    pub name: String,
    /// Declared media type, always `image/*`.
    pub mime: String,
    /// Raw encoded file contents.
    pub bytes: Arc<[u8]>,
}

impl SourceImage {
    /// Build from raw bytes with an explicitly declared media type.
    pub fn new(
        name: impl Into<String>,
        mime: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Result<Self, IngestError> {
        let mime = mime.into().trim().to_ascii_lowercase();
        if !is_image_mime(&mime) {
            return Err(IngestError::NotAnImage(mime));
        }
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(IngestError::Empty);
        }
        Ok(Self {
            name: name.into(),
            mime,
            bytes,
        })
    }

    /// Read an image file, deriving the media type from its extension.
    pub fn from_path(path: &Path) -> Result<Self, IngestError> {
        let mime = mime_for_path(path)
            .ok_or_else(|| IngestError::NotAnImage(path.display().to_string()))?;
        let bytes = std::fs::read(path).map_err(|source| IngestError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();
        debug!(%name, mime, size = bytes.len(), "Read image file");
        Self::new(name, mime, bytes)
    }

    /// Build from bytes that arrived without a path (drag from another app).
    ///
    /// The media type comes from the name's extension when there is one,
    /// otherwise from the content's magic number.
    pub fn from_bytes(bytes: Vec<u8>, name: Option<String>) -> Result<Self, IngestError> {
        let by_name = name
            .as_deref()
            .and_then(|n| mime_for_path(Path::new(n)));
        let mime = match by_name {
            Some(mime) => mime.to_string(),
            None => sniff_mime(&bytes).ok_or_else(|| {
                IngestError::NotAnImage(name.clone().unwrap_or_else(|| "unknown data".to_string()))
            })?,
        };
        let name = name.unwrap_or_else(|| default_name(&mime));
        Self::new(name, mime, bytes)
    }

    /// Parse a `data:image/...;base64,...` URL.
    pub fn from_data_url(url: &str) -> Result<Self, IngestError> {
        let rest = url
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| IngestError::InvalidDataUrl("missing data: scheme".to_string()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| IngestError::InvalidDataUrl("missing payload".to_string()))?;
        let mut params = header.split(';').map(str::trim);
        let mime = params.next().unwrap_or_default();
        let mut is_base64 = false;
        let mut name = None;
        for param in params {
            if param.eq_ignore_ascii_case("base64") {
                is_base64 = true;
            } else if let Some(value) = param.strip_prefix("name=") {
                name = Some(value.to_string()).filter(|n| !n.is_empty());
            }
        }
        if !is_base64 {
            return Err(IngestError::InvalidDataUrl(
                "only base64 payloads are supported".to_string(),
            ));
        }
        if !is_image_mime(mime) {
            return Err(IngestError::NotAnImage(mime.to_string()));
        }
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| IngestError::InvalidDataUrl(e.to_string()))?;
        let name = name.unwrap_or_else(|| default_name(mime));
        Self::new(name, mime, bytes)
    }

    /// Self-contained `data:` URL for this image.
    pub fn data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime,
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }

    /// Size of the encoded image in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Whether a declared media type is an image type.
pub fn is_image_mime(mime: &str) -> bool {
    mime.trim()
        .to_ascii_lowercase()
        .strip_prefix("image/")
        .is_some_and(|sub| !sub.is_empty())
}

/// Media type for a path, from its extension.
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    IMAGE_TYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
}

/// File extensions accepted as images, for file dialog filters.
pub fn image_extensions() -> impl Iterator<Item = &'static str> {
    IMAGE_TYPES.iter().map(|(ext, _)| *ext)
}

/// Media type from the content's magic number.
pub fn sniff_mime(bytes: &[u8]) -> Option<String> {
    image::guess_format(bytes)
        .ok()
        .map(|format| format.to_mime_type().to_string())
        .filter(|mime| is_image_mime(mime))
}

fn default_name(mime: &str) -> String {
    let ext = IMAGE_TYPES
        .iter()
        .find(|(_, m)| *m == mime)
        .map(|(e, _)| *e)
        .unwrap_or("img");
    format!("pasted_image.{}", ext)
}
