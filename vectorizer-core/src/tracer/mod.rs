//! Boundary to the external tracing program.
//!
//! The tracer is opaque: it receives an image plus a full [`TraceOptions`]
//! set and hands back finished SVG markup. Nothing in this crate looks at
//! pixels.

mod process;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::ingest::SourceImage;
use crate::options::TraceOptions;

pub use process::ProcessTracer;

/// Errors from a tracer invocation.
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("Tracer is not available: {0}")]
    Unavailable(String),
    #[error("Failed to send request to tracer: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Tracer exited with code {code}: {stderr}")]
    Failed { code: i32, stderr: String },
    #[error("Tracer returned no output")]
    EmptyOutput,
    #[error("Tracer output is not SVG markup")]
    NotSvg,
    #[error("Tracer timed out after {0} seconds")]
    Timeout(u64),
}

/// JSON document written to the tracer's stdin.
#[derive(Debug, Serialize)]
pub struct TraceRequest<'a> {
    /// The image as a self-contained `data:` URL.
    pub image: String,
    pub options: &'a TraceOptions,
}

impl<'a> TraceRequest<'a> {
    pub fn new(image: &SourceImage, options: &'a TraceOptions) -> Self {
        Self {
            image: image.data_url(),
            options,
        }
    }
}

/// Something that turns an image into SVG markup.
#[async_trait]
pub trait Tracer: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Trace `image` with `options`, returning the SVG document.
    async fn trace(&self, image: &SourceImage, options: &TraceOptions) -> Result<String, TraceError>;
}

/// Accept tracer output only when it carries an `<svg` element.
pub(crate) fn validate_svg(output: String) -> Result<String, TraceError> {
    let trimmed = output.trim();
    if trimmed.is_empty() {
        return Err(TraceError::EmptyOutput);
    }
    if !trimmed.contains("<svg") {
        return Err(TraceError::NotSvg);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_payload_shape() {
        let image = SourceImage::new("a.png", "image/png", vec![0u8, 1, 2]).unwrap();
        let options = TraceOptions::default();
        let request = TraceRequest::new(&image, &options);

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["image"], "data:image/png;base64,AAEC");
        assert_eq!(value["options"]["pathomit"], 8);
        assert_eq!(value["options"]["blurdelta"], 20.0);
    }

    #[test]
    fn test_validate_svg() {
        assert!(matches!(validate_svg("  \n".to_string()), Err(TraceError::EmptyOutput)));
        assert!(matches!(validate_svg("hello".to_string()), Err(TraceError::NotSvg)));
        assert_eq!(
            validate_svg("<svg></svg>\n".to_string()).unwrap(),
            "<svg></svg>"
        );
    }
}
