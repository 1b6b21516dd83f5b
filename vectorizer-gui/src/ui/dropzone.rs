//! Empty-state drop zone and the ways an image can arrive: dropped files,
//! dropped bytes, pasted paths or data URLs, and clipboard pixels.

use std::io::Cursor;
use std::path::Path;

use eframe::egui::{self, Align2, CursorIcon, FontId, Rounding, Sense, Stroke};
use image::{DynamicImage, ImageFormat, RgbaImage};
use tracing::debug;
use vectorizer_core::{IngestError, SourceImage};

use crate::app::VectorizerApp;
use crate::ui::colors;

/// Name given to images pasted as raw pixels.
const PASTED_IMAGE_NAME: &str = "pasted-image.png";

/// What a paste shortcut asks the app to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasteRequest {
    /// Clipboard text: a path, a data URL, or something else entirely.
    Text(String),
    /// No text arrived; read image pixels from the clipboard.
    Pixels,
}

/// Picks paste requests out of each frame's input events.
///
/// The windowing layer only emits `Event::Paste` when the clipboard holds
/// text, and swallows the V press either way. With an image-only clipboard
/// the V release is the only trace of the shortcut, so that release
/// triggers a pixel read unless a text paste already answered the press.
#[derive(Debug, Default)]
pub struct PasteTracker {
    text_pasted: bool,
}

impl PasteTracker {
    /// Forget a pending text paste, e.g. when a text field took it.
    pub fn reset(&mut self) {
        self.text_pasted = false;
    }

    /// Process one frame of events.
    pub fn take(&mut self, events: &[egui::Event]) -> Option<PasteRequest> {
        let mut request = None;
        for event in events {
            match event {
                egui::Event::Paste(text) => {
                    self.text_pasted = true;
                    request = Some(PasteRequest::Text(text.clone()));
                }
                egui::Event::Key {
                    key: egui::Key::V,
                    pressed: false,
                    modifiers,
                    ..
                } if modifiers.command => {
                    if !std::mem::take(&mut self.text_pasted) {
                        request.get_or_insert(PasteRequest::Pixels);
                    }
                }
                _ => {}
            }
        }
        request
    }
}

/// Turn a file dropped onto the window into a source image.
pub fn image_from_dropped(file: &egui::DroppedFile) -> Result<SourceImage, IngestError> {
    if let Some(path) = &file.path {
        return SourceImage::from_path(path);
    }
    if let Some(bytes) = &file.bytes {
        // Dropped from another app (bytes only, no path)
        let name = if file.name.is_empty() {
            None
        } else {
            Some(file.name.clone())
        };
        return SourceImage::from_bytes(bytes.to_vec(), name);
    }
    Err(IngestError::NotAnImage(file.name.clone()))
}

/// Interpret pasted text as an image reference.
///
/// Accepts a `data:` URL or the path of an existing file (optionally as a
/// `file://` URL). Returns `None` when the text is neither.
pub fn image_from_text(text: &str) -> Option<Result<SourceImage, IngestError>> {
    let text = text.trim();
    if text.starts_with("data:") {
        return Some(SourceImage::from_data_url(text));
    }

    let path = Path::new(text.strip_prefix("file://").unwrap_or(text));
    if !text.is_empty() && path.is_file() {
        return Some(SourceImage::from_path(path));
    }
    None
}

/// Read image pixels from the system clipboard, re-encoded as PNG.
///
/// Returns `Ok(None)` when the clipboard holds no image.
pub fn image_from_clipboard() -> anyhow::Result<Option<SourceImage>> {
    let mut clipboard = arboard::Clipboard::new()?;
    let data = match clipboard.get_image() {
        Ok(data) => data,
        Err(arboard::Error::ContentNotAvailable) => {
            debug!("Clipboard holds no image");
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    let png = encode_rgba_as_png(data.width as u32, data.height as u32, data.bytes.into_owned())?;
    Ok(Some(SourceImage::new(PASTED_IMAGE_NAME, "image/png", png)?))
}

/// Encode raw RGBA pixels as PNG bytes.
pub fn encode_rgba_as_png(width: u32, height: u32, pixels: Vec<u8>) -> anyhow::Result<Vec<u8>> {
    let rgba = RgbaImage::from_raw(width, height, pixels)
        .ok_or_else(|| anyhow::anyhow!("Pixel buffer does not match {width}x{height}"))?;

    let mut buffer = Vec::new();
    DynamicImage::ImageRgba8(rgba).write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)?;
    Ok(buffer)
}

/// Render the drop zone shown while no image is loaded.
pub fn render(app: &mut VectorizerApp, ui: &mut egui::Ui) {
    let hovering_files = ui.ctx().input(|i| !i.raw.hovered_files.is_empty());
    let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click());

    let visuals = ui.visuals();
    let highlighted = hovering_files || response.hovered();
    let fill = colors::dropzone_bg(visuals, hovering_files);
    let stroke = if highlighted {
        colors::ACCENT
    } else {
        colors::border(visuals)
    };
    let text_color = visuals.strong_text_color();
    let muted = colors::muted(visuals);

    let painter = ui.painter();
    painter.rect(rect.shrink(16.0), Rounding::same(12.0), fill, Stroke::new(2.0, stroke));
    painter.text(
        rect.center() - egui::vec2(0.0, 14.0),
        Align2::CENTER_CENTER,
        "Paste, click, or drop file",
        FontId::proportional(20.0),
        text_color,
    );
    painter.text(
        rect.center() + egui::vec2(0.0, 14.0),
        Align2::CENTER_CENTER,
        "PNG, JPEG, GIF, WebP or BMP",
        FontId::proportional(13.0),
        muted,
    );

    if response.on_hover_cursor(CursorIcon::PointingHand).clicked() {
        app.open_image_dialog();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn v_key(pressed: bool) -> egui::Event {
        egui::Event::Key {
            key: egui::Key::V,
            physical_key: None,
            pressed,
            repeat: false,
            modifiers: egui::Modifiers::COMMAND,
        }
    }

    #[test]
    fn test_image_only_clipboard_pastes_on_release() {
        let mut tracker = PasteTracker::default();
        // The press frame carries nothing when the clipboard has no text
        assert_eq!(tracker.take(&[]), None);
        assert_eq!(tracker.take(&[v_key(false)]), Some(PasteRequest::Pixels));
        // One shortcut, one paste
        assert_eq!(tracker.take(&[]), None);
    }

    #[test]
    fn test_text_paste_ignores_following_release() {
        let mut tracker = PasteTracker::default();
        let text = egui::Event::Paste("/tmp/a.png".to_string());
        assert_eq!(
            tracker.take(&[text]),
            Some(PasteRequest::Text("/tmp/a.png".to_string()))
        );
        assert_eq!(tracker.take(&[v_key(false)]), None);

        // Paste and release landing in the same frame
        let text = egui::Event::Paste("x".to_string());
        assert_eq!(
            tracker.take(&[text, v_key(false)]),
            Some(PasteRequest::Text("x".to_string()))
        );
        assert_eq!(tracker.take(&[v_key(false)]), Some(PasteRequest::Pixels));
    }

    #[test]
    fn test_plain_v_release_is_not_a_paste() {
        let mut tracker = PasteTracker::default();
        let plain = egui::Event::Key {
            key: egui::Key::V,
            physical_key: None,
            pressed: false,
            repeat: false,
            modifiers: egui::Modifiers::NONE,
        };
        assert_eq!(tracker.take(&[plain]), None);
        assert_eq!(tracker.take(&[v_key(true)]), None);
    }

    #[test]
    fn test_reset_drops_pending_text_paste() {
        let mut tracker = PasteTracker::default();
        tracker.take(&[egui::Event::Paste("x".to_string())]);
        tracker.reset();
        assert_eq!(tracker.take(&[v_key(false)]), Some(PasteRequest::Pixels));
    }

    #[test]
    fn test_encode_rgba_as_png() {
        let pixels = vec![255u8; 3 * 2 * 4];
        let png = encode_rgba_as_png(3, 2, pixels).unwrap();
        assert!(png.starts_with(PNG_MAGIC));

        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (3, 2));
    }

    #[test]
    fn test_encode_rejects_short_buffer() {
        assert!(encode_rgba_as_png(4, 4, vec![0u8; 10]).is_err());
    }

    #[test]
    fn test_text_data_url() {
        let url = "data:image/png;base64,iVBORw0KGgo=";
        let image = image_from_text(url).unwrap().unwrap();
        assert_eq!(image.mime, "image/png");
        assert!(image.bytes.starts_with(PNG_MAGIC));
    }

    #[test]
    fn test_text_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("photo.png");
        std::fs::write(&path, PNG_MAGIC).unwrap();

        let image = image_from_text(&format!("  {}\n", path.display()))
            .unwrap()
            .unwrap();
        assert_eq!(image.name, "photo.png");

        let image = image_from_text(&format!("file://{}", path.display()))
            .unwrap()
            .unwrap();
        assert_eq!(image.mime, "image/png");
    }

    #[test]
    fn test_text_non_image_file_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();

        let result = image_from_text(path.to_str().unwrap()).unwrap();
        assert!(matches!(result, Err(IngestError::NotAnImage(_))));
    }

    #[test]
    fn test_plain_text_is_ignored() {
        assert!(image_from_text("just some words").is_none());
        assert!(image_from_text("").is_none());
    }

    #[test]
    fn test_dropped_bytes() {
        let file = egui::DroppedFile {
            name: "clip.png".to_string(),
            bytes: Some(Arc::from(PNG_MAGIC)),
            ..Default::default()
        };
        let image = image_from_dropped(&file).unwrap();
        assert_eq!(image.name, "clip.png");
        assert_eq!(image.mime, "image/png");
    }

    #[test]
    fn test_dropped_without_content() {
        let file = egui::DroppedFile {
            name: "ghost".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            image_from_dropped(&file),
            Err(IngestError::NotAnImage(_))
        ));
    }
}
