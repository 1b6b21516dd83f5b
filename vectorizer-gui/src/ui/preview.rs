//! Preview canvas with vector/original toggle, pan and zoom.

use eframe::egui::{
    self, load::Bytes, Align2, CursorIcon, FontId, Pos2, Rect, RichText, Rounding, Sense, Vec2,
};
use tracing::debug;
use vectorizer_core::Session;

use crate::app::VectorizerApp;
use crate::ui::colors;
use crate::ui::viewport::Viewport;

/// Margin between the fitted image and the canvas edge.
const CANVAS_MARGIN: f32 = 16.0;

/// Which image the canvas shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Vector,
    Original,
}

/// Bytes registered with egui's image loaders under a unique URI.
struct LoadedImage {
    key: u64,
    uri: String,
    bytes: Bytes,
}

/// What the canvas body shows this frame.
enum CanvasContent<'a> {
    Empty,
    Loading,
    /// The last conversion failed; shown instead of any image.
    Failed(&'a str),
    Image(&'a LoadedImage),
}

/// Preview state kept across frames.
#[derive(Default)]
pub struct PreviewState {
    pub mode: ViewMode,
    pub viewport: Viewport,
    /// Canvas size from the last frame, used to center button zooms.
    canvas_size: Vec2,
    source: Option<LoadedImage>,
    vector: Option<LoadedImage>,
}

impl PreviewState {
    /// Bring the loader URIs in line with the session, forgetting any that
    /// no longer apply so their textures are freed.
    pub fn sync(&mut self, ctx: &egui::Context, session: &Session) {
        let wanted = session.image().map(|image| {
            let epoch = session.image_epoch();
            LoadedImage {
                key: epoch,
                uri: format!("bytes://source-{}.{}", epoch, extension_for_mime(&image.mime)),
                bytes: Bytes::Shared(image.bytes.clone()),
            }
        });
        if self.source.as_ref().map(|s| s.key) != wanted.as_ref().map(|w| w.key) {
            if let Some(old) = self.source.take() {
                ctx.forget_image(&old.uri);
            }
            if wanted.is_some() {
                self.viewport.reset();
            }
            self.source = wanted;
        }

        let seq = session.latest_seq();
        let current = self.vector.as_ref().map(|v| v.key);
        match session.result() {
            Some(svg) if current != Some(seq) => {
                if let Some(old) = self.vector.take() {
                    ctx.forget_image(&old.uri);
                }
                debug!(seq, bytes = svg.len(), "Registering vector preview");
                self.vector = Some(LoadedImage {
                    key: seq,
                    uri: format!("bytes://vector-{}.svg", seq),
                    bytes: Bytes::Shared(svg.as_bytes().into()),
                });
            }
            None => {
                if let Some(old) = self.vector.take() {
                    ctx.forget_image(&old.uri);
                }
            }
            Some(_) => {}
        }
    }

    pub fn has_vector(&self) -> bool {
        self.vector.is_some()
    }

    fn canvas_center(&self) -> Pos2 {
        (self.canvas_size / 2.0).to_pos2()
    }

    fn content<'a>(&'a self, session: &'a Session) -> CanvasContent<'a> {
        if session.is_loading() {
            return CanvasContent::Loading;
        }
        if let Some(error) = session.error() {
            return CanvasContent::Failed(error);
        }
        let shown = match (self.mode, &self.vector) {
            (ViewMode::Vector, Some(vector)) => Some(vector),
            _ => self.source.as_ref(),
        };
        shown.map_or(CanvasContent::Empty, CanvasContent::Image)
    }
}

/// File extension matching a media type, so loaders can pick a decoder.
pub fn extension_for_mime(mime: &str) -> &str {
    match mime {
        "image/jpeg" => "jpg",
        "image/svg+xml" => "svg",
        "image/x-icon" => "ico",
        other => other.rsplit('/').next().unwrap_or("png"),
    }
}

/// Render the preview area.
pub fn render(app: &mut VectorizerApp, ui: &mut egui::Ui) {
    render_toolbar(app, ui);
    ui.add_space(4.0);
    render_canvas(app, ui);
}

fn render_toolbar(app: &mut VectorizerApp, ui: &mut egui::Ui) {
    let has_vector = app.preview.has_vector();
    let preview = &mut app.preview;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 0.0;
        let vector_selected = preview.mode == ViewMode::Vector;
        if ui
            .add_enabled(
                has_vector,
                egui::SelectableLabel::new(vector_selected, RichText::new("  Vector  ").size(14.0)),
            )
            .clicked()
        {
            preview.mode = ViewMode::Vector;
        }
        if ui
            .selectable_label(!vector_selected, RichText::new("  Original  ").size(14.0))
            .clicked()
        {
            preview.mode = ViewMode::Original;
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.spacing_mut().item_spacing.x = 4.0;
            let center = preview.canvas_center();

            if ui.button("Fit").on_hover_text("Reset zoom and position").clicked() {
                preview.viewport.reset();
            }
            if ui.button("+").on_hover_text("Zoom in").clicked() {
                preview.viewport.zoom_in(center);
            }
            ui.label(
                RichText::new(format!("{}%", preview.viewport.percent()))
                    .monospace()
                    .size(12.0),
            );
            if ui.button("−").on_hover_text("Zoom out").clicked() {
                preview.viewport.zoom_out(center);
            }
        });
    });
}

fn render_canvas(app: &mut VectorizerApp, ui: &mut egui::Ui) {
    let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
    let preview = &mut app.preview;
    let session = &app.session;
    preview.canvas_size = rect.size();

    let visuals = ui.visuals();
    let bg = colors::canvas_bg(visuals);
    let muted = colors::muted(visuals);
    ui.painter().rect_filled(rect, Rounding::same(8.0), bg);

    // Pan and zoom
    if response.dragged() {
        preview.viewport.pan_by(response.drag_delta());
        ui.ctx().set_cursor_icon(CursorIcon::Grabbing);
    } else if response.hovered() {
        ui.ctx().set_cursor_icon(CursorIcon::Grab);
    }
    if response.double_clicked() {
        preview.viewport.reset();
    }
    if let Some(pointer) = response.hover_pos() {
        let anchor = (pointer - rect.min).to_pos2();
        let (scroll, pinch) = ui.input(|i| (i.raw_scroll_delta.y, i.zoom_delta()));
        if pinch != 1.0 {
            preview.viewport.zoom_at(preview.viewport.zoom * pinch, anchor);
        } else if scroll != 0.0 {
            preview.viewport.scroll_at(scroll, anchor);
        }
    }

    let (uri, bytes) = match preview.content(session) {
        CanvasContent::Empty => return,
        CanvasContent::Loading => {
            paint_spinner(ui, rect, muted, "Vectorizing...");
            return;
        }
        CanvasContent::Failed(error) => {
            ui.put(
                rect.shrink(CANVAS_MARGIN * 2.0),
                egui::Label::new(RichText::new(error).color(colors::ERROR)).wrap(),
            );
            return;
        }
        CanvasContent::Image(shown) => (shown.uri.clone(), shown.bytes.clone()),
    };

    let fit = (rect.size() - Vec2::splat(CANVAS_MARGIN * 2.0)).max(Vec2::splat(1.0));
    let image = egui::Image::from_bytes(uri, bytes)
        .fit_to_original_size(1.0)
        .max_size(fit);

    match image.load_for_size(ui.ctx(), fit) {
        Ok(poll) => match poll.size() {
            Some(original) => {
                let size = image.calc_size(fit, Some(original));
                let base = Rect::from_center_size((rect.size() / 2.0).to_pos2(), size);
                let target = preview.viewport.transform_rect(base).translate(rect.min.to_vec2());

                let mut clipped = ui.new_child(egui::UiBuilder::new().max_rect(rect));
                clipped.set_clip_rect(rect.intersect(ui.clip_rect()));
                image.paint_at(&clipped, target);
            }
            None => paint_spinner(ui, rect, muted, "Loading preview..."),
        },
        Err(e) => {
            debug!(error = %e, "Preview failed to load");
            ui.painter().text(
                rect.center(),
                Align2::CENTER_CENTER,
                "Unable to display this image",
                FontId::proportional(14.0),
                colors::ERROR,
            );
        }
    }
}

fn paint_spinner(ui: &egui::Ui, rect: Rect, color: egui::Color32, label: &str) {
    let spinner_rect = Rect::from_center_size(rect.center() - Vec2::new(0.0, 16.0), Vec2::splat(32.0));
    egui::Spinner::new().size(32.0).paint_at(ui, spinner_rect);
    ui.painter().text(
        rect.center() + Vec2::new(0.0, 20.0),
        Align2::CENTER_CENTER,
        label,
        FontId::proportional(14.0),
        color,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use vectorizer_core::{SourceImage, TraceError};

    #[test]
    fn test_extension_for_mime() {
        assert_eq!(extension_for_mime("image/png"), "png");
        assert_eq!(extension_for_mime("image/jpeg"), "jpg");
        assert_eq!(extension_for_mime("image/svg+xml"), "svg");
        assert_eq!(extension_for_mime("image/webp"), "webp");
        assert_eq!(extension_for_mime("image/x-icon"), "ico");
    }

    #[test]
    fn test_sync_tracks_session() {
        let ctx = egui::Context::default();
        let mut state = PreviewState::default();
        let mut session = Session::new();

        state.sync(&ctx, &session);
        assert!(state.source.is_none());
        assert!(!state.has_vector());

        let image = SourceImage::new("a.png", "image/png", vec![1u8, 2, 3]).unwrap();
        let ticket = session.load_image(image).unwrap();
        state.viewport.zoom = 3.0;
        state.sync(&ctx, &session);
        assert_eq!(state.source.as_ref().unwrap().uri, "bytes://source-1.png");
        assert_eq!(state.viewport, Viewport::default());
        assert!(!state.has_vector());

        session.complete(ticket.seq, Ok("<svg/>".to_string()));
        state.sync(&ctx, &session);
        let vector_uri = state.vector.as_ref().unwrap().uri.clone();
        assert_eq!(vector_uri, format!("bytes://vector-{}.svg", ticket.seq));

        // Same result, same registration
        state.viewport.zoom = 2.0;
        state.sync(&ctx, &session);
        assert_eq!(state.vector.as_ref().unwrap().uri, vector_uri);
        assert_eq!(state.viewport.zoom, 2.0);

        let ticket = session.begin_conversion().unwrap();
        state.sync(&ctx, &session);
        assert!(!state.has_vector());

        session.complete(ticket.seq, Err(TraceError::EmptyOutput));
        state.sync(&ctx, &session);
        assert!(!state.has_vector());

        session.reset();
        state.sync(&ctx, &session);
        assert!(state.source.is_none());
    }

    fn shown_uri(content: CanvasContent<'_>) -> Option<String> {
        match content {
            CanvasContent::Image(image) => Some(image.uri.clone()),
            _ => None,
        }
    }

    #[test]
    fn test_failed_conversion_hides_image() {
        let ctx = egui::Context::default();
        let mut state = PreviewState::default();
        let mut session = Session::new();
        assert!(matches!(state.content(&session), CanvasContent::Empty));

        let image = SourceImage::new("a.png", "image/png", vec![1u8, 2, 3]).unwrap();
        let ticket = session.load_image(image).unwrap();
        state.sync(&ctx, &session);
        assert!(matches!(state.content(&session), CanvasContent::Loading));

        session.complete(ticket.seq, Err(TraceError::Timeout(5)));
        state.sync(&ctx, &session);
        for mode in [ViewMode::Vector, ViewMode::Original] {
            state.mode = mode;
            match state.content(&session) {
                CanvasContent::Failed(error) => assert_eq!(Some(error), session.error()),
                _ => panic!("expected the error in place of the image"),
            }
        }

        // A later success brings the image back
        let ticket = session.begin_conversion().unwrap();
        session.complete(ticket.seq, Ok("<svg/>".to_string()));
        state.sync(&ctx, &session);
        state.mode = ViewMode::Vector;
        assert_eq!(
            shown_uri(state.content(&session)),
            Some(format!("bytes://vector-{}.svg", ticket.seq))
        );
        state.mode = ViewMode::Original;
        assert_eq!(
            shown_uri(state.content(&session)),
            Some("bytes://source-1.png".to_string())
        );
    }
}
