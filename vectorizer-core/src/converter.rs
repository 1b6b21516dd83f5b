//! Runs conversions in the background and reports back to the GUI.
//!
//! Each conversion is one tokio task that calls the [`Tracer`] and sends a
//! single [`ConversionEvent`] tagged with the request's sequence token.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::session::ConversionTicket;
use crate::tracer::{TraceError, Tracer};

// =============================================================================
// Events
// =============================================================================

/// Events sent from conversion tasks to the GUI.
#[derive(Debug)]
pub enum ConversionEvent {
    /// The tracer has been invoked for request `seq`.
    Started { seq: u64 },

    /// The tracer finished for request `seq`.
    Finished {
        seq: u64,
        result: Result<String, TraceError>,
    },
}

// =============================================================================
// Channel Types
// =============================================================================

/// Sender for conversion events.
pub type EventSender = mpsc::UnboundedSender<ConversionEvent>;

/// Receiver for conversion events.
pub type EventReceiver = mpsc::UnboundedReceiver<ConversionEvent>;

/// Create an event channel for conversion events.
pub fn event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

// =============================================================================
// Conversion
// =============================================================================

/// Run one conversion to completion, reporting through `sender`.
///
/// Spawn this on the app's runtime; abort the task to cancel.
pub async fn run_conversion(
    tracer: Arc<dyn Tracer>,
    ticket: ConversionTicket,
    sender: EventSender,
) {
    let seq = ticket.seq;
    info!(seq, tracer = tracer.name(), image = %ticket.image.name, "Starting conversion");

    if sender.send(ConversionEvent::Started { seq }).is_err() {
        debug!(seq, "Event receiver dropped before start");
        return;
    }

    let result = tracer.trace(&ticket.image, &ticket.options).await;
    match &result {
        Ok(svg) => info!(seq, svg_bytes = svg.len(), "Conversion complete"),
        Err(e) => error!(seq, error = %e, "Conversion failed"),
    }

    if sender.send(ConversionEvent::Finished { seq, result }).is_err() {
        debug!(seq, "Event receiver dropped, discarding result");
    }
}
