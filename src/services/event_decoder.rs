//! Decoding of the newline-delimited JSON event protocol.
//!
//! Agents write events to their error stream, one JSON object per line, mixed
//! with arbitrary diagnostic text. Anything that is not an object carrying both
//! `type` and `agent` is passed through untouched.

use serde_json::Value;

use crate::domain::models::AgentEvent;

/// Classification of one error-stream line.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamLine {
    /// A decoded event.
    Event(AgentEvent),
    /// The original line, untrimmed.
    Passthrough(String),
}

/// Decode one line. Never fails: anything malformed yields `None`.
pub fn decode_line(line: &str) -> Option<AgentEvent> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(trimmed).ok()? {
        Value::Object(fields) if fields.contains_key("type") && fields.contains_key("agent") => {
            Some(AgentEvent::from_object(fields))
        }
        _ => None,
    }
}

/// Decode one line, keeping the original text when it is not an event.
pub fn classify_line(line: String) -> StreamLine {
    match decode_line(&line) {
        Some(event) => StreamLine::Event(event),
        None => StreamLine::Passthrough(line),
    }
}

/// Reassembles lines from arbitrarily split byte chunks.
#[derive(Debug, Default)]
pub struct LineAssembler {
    pending: Vec<u8>,
}

impl LineAssembler {
    /// Assembler with no pending bytes.
    pub const fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    /// Feed a chunk; returns every line it completed, without the `\n`.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        let mut start = 0;
        while let Some(offset) = self.pending[start..].iter().position(|&b| b == b'\n') {
            let end = start + offset;
            lines.push(String::from_utf8_lossy(&self.pending[start..end]).into_owned());
            start = end + 1;
        }
        self.pending.drain(..start);
        lines
    }

    /// Take whatever partial line is left at end of stream.
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let rest = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        Some(rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{AgentStatus, EventKind};
    use serde_json::json;

    #[test]
    fn test_decode_status_event() {
        let event = decode_line(r#"{"type":"status","agent":"coder","status":"starting"}"#).unwrap();
        assert_eq!(event.kind(), EventKind::Status);
        assert_eq!(event.status(), Some(AgentStatus::Starting));
    }

    #[test]
    fn test_rejects_non_events() {
        for line in [
            "",
            "   \t",
            "plain diagnostic text",
            r#"{"type":"status","agent":"#,
            r#"[{"type":"status","agent":"coder"}]"#,
            r#""a string""#,
            "42",
            "null",
            r#"{"agent":"coder","message":"hi"}"#,
            r#"{"type":"output","message":"hi"}"#,
        ] {
            assert!(decode_line(line).is_none(), "accepted {line:?}");
        }
    }

    #[test]
    fn test_unknown_type_is_still_an_event() {
        let event = decode_line(r#"{"type":"progress","agent":"planner","pct":50}"#).unwrap();
        assert_eq!(event.kind(), EventKind::Other("progress".to_string()));
        assert_eq!(event.get("pct"), Some(&json!(50)));
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored_for_parsing() {
        let event = decode_line("  {\"type\":\"output\",\"agent\":\"coder\",\"message\":\"hi\"}\r").unwrap();
        assert_eq!(event.message(), Some("hi"));
    }

    #[test]
    fn test_passthrough_keeps_original_text() {
        let line = "  warning: something odd  ".to_string();
        assert_eq!(classify_line(line.clone()), StreamLine::Passthrough(line));
    }

    #[test]
    fn test_chunk_split_inside_line() {
        let mut assembler = LineAssembler::new();
        assert!(assembler.push(br#"{"type":"sta"#).is_empty());
        let lines = assembler.push(b"tus\",\"agent\":\"code\",\"status\":\"running\"}\n");
        assert_eq!(lines.len(), 1);
        assert!(assembler.finish().is_none());

        let event = decode_line(&lines[0]).unwrap();
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"type": "status", "agent": "code", "status": "running"})
        );
    }

    #[test]
    fn test_multiple_lines_in_one_chunk_and_trailing_partial() {
        let mut assembler = LineAssembler::new();
        let lines = assembler.push(b"one\ntwo\n\nthree");
        assert_eq!(lines, vec!["one", "two", ""]);
        assert_eq!(assembler.finish().as_deref(), Some("three"));
        assert!(assembler.finish().is_none());
    }

    #[test]
    fn test_multibyte_character_split_across_chunks() {
        let text = "héllo\n".as_bytes();
        let mut assembler = LineAssembler::new();
        assert!(assembler.push(&text[..2]).is_empty());
        assert_eq!(assembler.push(&text[2..]), vec!["héllo"]);
    }
}
