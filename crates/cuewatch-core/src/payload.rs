//! Analysis payload decoding.
//!
//! Turns the JSON "critical moments" list produced by the analysis pipeline
//! into resolver [`Event`]s. Individual bad records are dropped and reported;
//! only a payload that is not a list at all is an error.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::error::{PayloadError, Result, ValidationError};
use crate::resolver::{Category, DroppedEvent, Event, LoadReport, TemporalEventResolver};

/// Object keys under which a wrapped event list may be found.
const LIST_KEYS: [&str; 3] = ["events", "critical_moments", "momentos_criticos"];

/// One moment record as emitted by the analysis pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct MomentRecord {
    #[serde(alias = "start", alias = "segundos_inicio")]
    pub start_time: f64,
    #[serde(alias = "end", alias = "segundos_fin")]
    pub end_time: f64,
    #[serde(default)]
    pub id: Option<String>,
    /// Human-readable position, e.g. "02:58".
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default, alias = "descripcion")]
    pub description: Option<String>,
    #[serde(default, alias = "analisis_integrado")]
    pub analysis: Option<String>,
    #[serde(default, alias = "tipo_indicador")]
    pub indicator: Option<String>,
    #[serde(default, alias = "nivel_importancia")]
    pub importance: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
}

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl MomentRecord {
    /// Stable deduplication key for this moment.
    pub fn identity(&self) -> String {
        if let Some(id) = non_empty(&self.id) {
            return id.to_string();
        }
        let stamp = non_empty(&self.timestamp).unwrap_or_default();
        let text = non_empty(&self.description)
            .or_else(|| non_empty(&self.analysis))
            .unwrap_or_default();
        if stamp.is_empty() && text.is_empty() {
            format!("{:.3}-{:.3}", self.start_time, self.end_time)
        } else {
            format!("{stamp}{text}")
        }
    }

    pub fn category(&self) -> Category {
        if let Some(category) = self.category {
            return category;
        }
        let indicator = non_empty(&self.indicator).map(str::to_ascii_uppercase);
        if matches!(indicator.as_deref(), Some("PATRON_PSICOLOGICO" | "PATTERN")) {
            return Category::Pattern;
        }
        match non_empty(&self.importance).map(str::to_ascii_uppercase).as_deref() {
            Some("ALTO" | "HIGH") => Category::High,
            Some("MEDIO" | "MEDIUM") => Category::Medium,
            Some("BAJO" | "LOW") => Category::Low,
            _ => Category::Medium,
        }
    }

    pub fn label(&self) -> Option<String> {
        non_empty(&self.analysis)
            .or_else(|| non_empty(&self.description))
            .map(str::to_string)
    }

    pub fn into_event(self) -> Event {
        Event {
            start_time: self.start_time,
            end_time: self.end_time,
            identity: self.identity(),
            category: self.category(),
            label: self.label(),
        }
    }
}

/// Result of decoding a payload: usable events plus rejected records.
#[derive(Debug, Clone, Default)]
pub struct Decoded {
    pub events: Vec<Event>,
    pub dropped: Vec<DroppedEvent>,
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn event_list(value: &Value) -> std::result::Result<&Vec<Value>, PayloadError> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(map) => LIST_KEYS
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_array))
            .ok_or(PayloadError::NotAList { found: "an object without an event list" }),
        other => Err(PayloadError::NotAList { found: kind_of(other) }),
    }
}

/// Decode a payload into events.
///
/// Record indices in `dropped` refer to positions in the payload list.
pub fn decode_events(value: &Value) -> std::result::Result<Decoded, PayloadError> {
    let items = event_list(value)?;
    let mut decoded = Decoded::default();

    for (index, item) in items.iter().enumerate() {
        match MomentRecord::deserialize(item) {
            Ok(record) => decoded.events.push(record.into_event()),
            Err(e) => {
                warn!(index, error = %e, "dropping malformed record");
                decoded.dropped.push(DroppedEvent {
                    index,
                    identity: item.get("id").and_then(Value::as_str).map(str::to_string),
                    error: ValidationError::Malformed(e.to_string()),
                });
            }
        }
    }
    Ok(decoded)
}

/// Read and parse a JSON payload file.
pub fn read_payload(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

impl TemporalEventResolver {
    /// Decode and load a payload in one step.
    ///
    /// A structurally invalid payload leaves the resolver loaded with no
    /// events, so nothing stays on display.
    pub fn load_payload(&mut self, value: &Value) -> std::result::Result<LoadReport, PayloadError> {
        let decoded = match decode_events(value) {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!(error = %e, "rejecting payload");
                self.load(Vec::new());
                return Err(e);
            }
        };

        // Resolver indices are relative to the decoded list; map them back
        // to payload positions by skipping the records dropped earlier.
        let mut positions: Vec<usize> = Vec::with_capacity(decoded.events.len());
        let mut dropped_iter = decoded.dropped.iter().map(|d| d.index).peekable();
        let mut pos = 0;
        while positions.len() < decoded.events.len() {
            if dropped_iter.peek() == Some(&pos) {
                dropped_iter.next();
            } else {
                positions.push(pos);
            }
            pos += 1;
        }

        let mut report = self.load(decoded.events);
        for d in &mut report.dropped {
            d.index = positions[d.index];
        }
        report.dropped.extend(decoded.dropped);
        report.dropped.sort_by_key(|d| d.index);
        Ok(report)
    }
}
