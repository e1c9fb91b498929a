//! Synchroniser telemetry events and sinks.
//!
//! Every history push and every skipped observation is reported as a
//! structured event. The CLI can stream them to stderr for debugging; the
//! browser binding drops them.

use std::io;

use serde::{Deserialize, Serialize};

/// What caused a history push.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateTrigger {
    /// A filter-change event from the filter widget.
    FilterChange,
    /// A sort or direction attribute mutation on the table.
    SortChange,
}

/// A structured telemetry event emitted by the synchroniser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TelemetryEvent {
    /// A new history entry was pushed.
    HistoryPushed {
        /// The full URL written to the address bar.
        url: String,
        /// The update that produced it.
        trigger: UpdateTrigger,
    },
    /// An observation was not installed because its element is missing.
    ObservationSkipped {
        /// Selector of the element that was not found.
        element: String,
    },
}

/// A sink that can record telemetry events.
pub trait TelemetrySink: Send + Sync {
    /// Records a telemetry event.
    fn record(&self, event: TelemetryEvent);
}

/// Telemetry sink that drops all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTelemetrySink;

impl TelemetrySink for NoopTelemetrySink {
    fn record(&self, _event: TelemetryEvent) {}
}

/// Records telemetry events to stderr as JSON lines (JSONL).
///
/// This is intended for local debugging and is not transmitted anywhere.
#[derive(Debug, Default)]
pub struct StderrJsonlTelemetrySink;

impl TelemetrySink for StderrJsonlTelemetrySink {
    fn record(&self, event: TelemetryEvent) {
        let Ok(serialised) = serde_json::to_string(&event) else {
            return;
        };

        let _ignored = writeln_stderr(&serialised);
    }
}

fn writeln_stderr(message: &str) -> io::Result<()> {
    use io::Write;

    let mut stderr = io::stderr().lock();
    writeln!(stderr, "{message}")
}

#[cfg(test)]
mod tests {
    use super::{TelemetryEvent, UpdateTrigger};

    #[test]
    fn history_push_serialises_as_tagged_json() {
        let event = TelemetryEvent::HistoryPushed {
            url: "https://x/?sort=name".to_owned(),
            trigger: UpdateTrigger::SortChange,
        };

        let serialised = serde_json::to_string(&event).expect("event should serialise");

        assert_eq!(
            serialised,
            r#"{"type":"history_pushed","url":"https://x/?sort=name","trigger":"sort_change"}"#
        );
    }

    #[test]
    fn skipped_observation_names_the_element() {
        let serialised = serde_json::to_value(TelemetryEvent::ObservationSkipped {
            element: "action-table".to_owned(),
        })
        .expect("event should serialise");

        assert_eq!(
            serialised,
            serde_json::json!({"type": "observation_skipped", "element": "action-table"})
        );
    }
}
