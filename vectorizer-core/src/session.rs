//! In-memory session state for one user working on one image.
//!
//! The session is a plain state machine. It hands out [`ConversionTicket`]s
//! and accepts outcomes back; it never runs the tracer itself. Each ticket
//! carries a sequence token, and only the outcome for the latest token is
//! applied, so a slow conversion can never overwrite a newer one.

use tracing::debug;

use crate::controls::{ControlId, ControlValue};
use crate::ingest::SourceImage;
use crate::options::TraceOptions;
use crate::presets::{Preset, PresetSelection};
use crate::tracer::TraceError;

/// Message shown for any failed conversion. Details go to the log.
pub const CONVERSION_FAILED_MESSAGE: &str =
    "Failed to vectorize image. Please try a different image or adjust settings.";

/// Everything needed to run one conversion.
#[derive(Debug, Clone)]
pub struct ConversionTicket {
    pub seq: u64,
    pub image: SourceImage,
    pub options: TraceOptions,
}

/// Result of handing an outcome back to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The outcome was the latest and is now visible.
    Applied,
    /// A newer request was issued after this one; the outcome was dropped.
    Stale,
}

/// Session state.
#[derive(Debug, Clone, Default)]
pub struct Session {
    image: Option<SourceImage>,
    image_epoch: u64,
    result: Option<String>,
    is_loading: bool,
    error: Option<String>,
    options: TraceOptions,
    selection: PresetSelection,
    latest_seq: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn image(&self) -> Option<&SourceImage> {
        self.image.as_ref()
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// Incremented on every image load; stable for the life of one image.
    pub fn image_epoch(&self) -> u64 {
        self.image_epoch
    }

    /// Last successful SVG for the current image and options.
    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn options(&self) -> &TraceOptions {
        &self.options
    }

    pub fn selection(&self) -> PresetSelection {
        self.selection
    }

    /// Sequence token of the most recent request.
    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    // -------------------------------------------------------------------------
    // Transitions
    // -------------------------------------------------------------------------

    /// Replace the current image, dropping any previous result or error.
    ///
    /// Returns the ticket for the conversion of the new image.
    pub fn load_image(&mut self, image: SourceImage) -> Option<ConversionTicket> {
        debug!(name = %image.name, mime = %image.mime, size = image.len(), "Loading image");
        self.image = Some(image);
        self.image_epoch += 1;
        self.result = None;
        self.error = None;
        self.begin_conversion()
    }

    /// Edit one field through its control. Marks the selection as custom.
    ///
    /// Returns `None` without touching anything when the value does not fit
    /// the control; otherwise the ticket for the reconversion (if an image
    /// is loaded).
    pub fn edit(&mut self, control: ControlId, value: ControlValue) -> Option<ConversionTicket> {
        if !control.apply(&mut self.options, value) {
            debug!(?control, ?value, "Ignoring edit with mismatched value");
            return None;
        }
        self.selection = PresetSelection::Custom;
        self.begin_conversion()
    }

    /// Replace all options with a preset's snapshot.
    pub fn apply_preset(&mut self, preset: Preset) -> Option<ConversionTicket> {
        self.options = preset.options();
        self.selection = PresetSelection::Named(preset);
        self.begin_conversion()
    }

    /// Back to an empty session with default options.
    ///
    /// Any request still in flight becomes stale.
    pub fn reset(&mut self) {
        self.image = None;
        self.result = None;
        self.error = None;
        self.is_loading = false;
        self.options = TraceOptions::default();
        self.selection = PresetSelection::default();
        self.latest_seq += 1;
    }

    /// Issue a new conversion request for the current image and options.
    ///
    /// Skipped when no image is loaded. Clears the previous result and
    /// error and marks the session as loading.
    pub fn begin_conversion(&mut self) -> Option<ConversionTicket> {
        let Some(image) = self.image.clone() else {
            debug!("No image loaded, skipping conversion");
            return None;
        };

        self.latest_seq += 1;
        self.is_loading = true;
        self.error = None;
        self.result = None;

        Some(ConversionTicket {
            seq: self.latest_seq,
            image,
            options: self.options.clone(),
        })
    }

    /// Apply the outcome for request `seq`.
    pub fn complete(&mut self, seq: u64, outcome: Result<String, TraceError>) -> Completion {
        if seq != self.latest_seq || self.image.is_none() {
            debug!(seq, latest = self.latest_seq, "Discarding stale conversion result");
            return Completion::Stale;
        }

        self.is_loading = false;
        match outcome {
            Ok(svg) => {
                self.result = Some(svg);
                self.error = None;
            }
            Err(_) => {
                self.result = None;
                self.error = Some(CONVERSION_FAILED_MESSAGE.to_string());
            }
        }
        Completion::Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ColorSampling;

    fn image(name: &str) -> SourceImage {
        SourceImage::new(name, "image/png", vec![1u8, 2, 3]).unwrap()
    }

    fn loaded_session() -> (Session, ConversionTicket) {
        let mut session = Session::new();
        let ticket = session.load_image(image("a.png")).unwrap();
        (session, ticket)
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = Session::new();
        assert!(!session.has_image());
        assert!(session.result().is_none());
        assert!(session.error().is_none());
        assert!(!session.is_loading());
        assert_eq!(session.options(), &TraceOptions::default());
        assert_eq!(session.selection(), PresetSelection::Named(Preset::Default));
    }

    #[test]
    fn test_conversion_skipped_without_image() {
        let mut session = Session::new();
        assert!(session.begin_conversion().is_none());
        assert!(session
            .edit(ControlId::NumberOfColors, ControlValue::Number(8.0))
            .is_none());
        assert!(!session.is_loading());
        // The edit itself still lands
        assert_eq!(session.options().numberofcolors, 8);
    }

    #[test]
    fn test_load_image_issues_ticket() {
        let (session, ticket) = loaded_session();
        assert_eq!(ticket.seq, session.latest_seq());
        assert_eq!(ticket.image.name, "a.png");
        assert_eq!(ticket.options, TraceOptions::default());
        assert!(session.is_loading());
        assert_eq!(session.image_epoch(), 1);
    }

    #[test]
    fn test_successful_completion_sets_result() {
        let (mut session, ticket) = loaded_session();
        let done = session.complete(ticket.seq, Ok("<svg/>".to_string()));
        assert_eq!(done, Completion::Applied);
        assert_eq!(session.result(), Some("<svg/>"));
        assert!(!session.is_loading());
        assert!(session.error().is_none());
    }

    #[test]
    fn test_loading_new_image_clears_result_and_error() {
        let (mut session, ticket) = loaded_session();
        session.complete(ticket.seq, Ok("<svg/>".to_string()));

        let ticket = session.load_image(image("b.png")).unwrap();
        assert!(session.result().is_none());
        session.complete(ticket.seq, Err(TraceError::EmptyOutput));
        assert!(session.error().is_some());

        session.load_image(image("c.png"));
        assert!(session.result().is_none());
        assert!(session.error().is_none());
        assert_eq!(session.image().unwrap().name, "c.png");
        assert_eq!(session.image_epoch(), 3);
    }

    #[test]
    fn test_failed_conversion_leaves_no_stale_result() {
        let (mut session, ticket) = loaded_session();
        session.complete(ticket.seq, Ok("<svg>old</svg>".to_string()));

        let ticket = session
            .edit(ControlId::Blur, ControlValue::Number(1.0))
            .unwrap();
        session.complete(ticket.seq, Err(TraceError::Timeout(5)));

        assert!(session.result().is_none());
        assert_eq!(session.error(), Some(CONVERSION_FAILED_MESSAGE));
        assert!(!session.is_loading());
    }

    #[test]
    fn test_superseded_result_is_discarded() {
        let (mut session, first) = loaded_session();
        let second = session
            .edit(ControlId::NumberOfColors, ControlValue::Number(4.0))
            .unwrap();
        assert!(second.seq > first.seq);

        // Newer request finishes first
        assert_eq!(
            session.complete(second.seq, Ok("<svg>new</svg>".to_string())),
            Completion::Applied
        );
        // The slow, older one must not overwrite it
        assert_eq!(
            session.complete(first.seq, Ok("<svg>old</svg>".to_string())),
            Completion::Stale
        );
        assert_eq!(session.result(), Some("<svg>new</svg>"));
    }

    #[test]
    fn test_stale_failure_does_not_clear_loading() {
        let (mut session, first) = loaded_session();
        let _second = session.apply_preset(Preset::Detailed).unwrap();
        assert_eq!(
            session.complete(first.seq, Err(TraceError::EmptyOutput)),
            Completion::Stale
        );
        assert!(session.is_loading());
        assert!(session.error().is_none());
    }

    #[test]
    fn test_edit_marks_custom_and_changes_one_field() {
        let (mut session, _) = loaded_session();
        let before = session.options().clone();

        let ticket = session
            .edit(ControlId::LineThreshold, ControlValue::Number(2.0))
            .unwrap();

        assert_eq!(session.selection(), PresetSelection::Custom);
        assert_eq!(session.options().ltres, 2.0);
        let restored = TraceOptions {
            ltres: before.ltres,
            ..session.options().clone()
        };
        assert_eq!(restored, before);
        assert_eq!(ticket.options, *session.options());
    }

    #[test]
    fn test_mismatched_edit_is_ignored() {
        let (mut session, ticket) = loaded_session();
        assert!(session
            .edit(ControlId::Blur, ControlValue::Flag(true))
            .is_none());
        assert_eq!(session.selection(), PresetSelection::Named(Preset::Default));
        assert_eq!(session.latest_seq(), ticket.seq);
    }

    #[test]
    fn test_preset_replaces_every_field() {
        let (mut session, _) = loaded_session();
        session.edit(ControlId::StrokeWidth, ControlValue::Number(4.0));
        session.edit(
            ControlId::ColorSampling,
            ControlValue::Sampling(ColorSampling::Random),
        );

        for preset in Preset::all() {
            let ticket = session.apply_preset(*preset).unwrap();
            assert_eq!(session.options(), &preset.options());
            assert_eq!(session.selection(), PresetSelection::Named(*preset));
            assert_eq!(ticket.options, preset.options());
        }
    }

    #[test]
    fn test_reset_restores_defaults() {
        let (mut session, ticket) = loaded_session();
        session.apply_preset(Preset::BlackAndWhite);
        session.edit(ControlId::Blur, ControlValue::Number(2.0));
        session.reset();

        assert!(!session.has_image());
        assert!(session.result().is_none());
        assert!(session.error().is_none());
        assert!(!session.is_loading());
        assert_eq!(session.options(), &TraceOptions::default());
        assert_eq!(session.selection(), PresetSelection::Named(Preset::Default));

        // Whatever was in flight is now stale
        assert_eq!(
            session.complete(ticket.seq, Ok("<svg/>".to_string())),
            Completion::Stale
        );
        assert!(session.result().is_none());
    }
}
