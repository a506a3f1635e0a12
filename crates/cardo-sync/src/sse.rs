//! Incremental decoder for the `text/event-stream` format.
//!
//! The response body arrives as arbitrary byte chunks. [`SseDecoder`]
//! buffers partial lines (including split multi-byte characters) and emits
//! an [`SseEvent`] each time a blank line completes one.
//!
//! Supported framing:
//!
//! - `\n` and `\r\n` line endings
//! - `:` comment lines (keep-alives), ignored
//! - `event`, `data` (multi-line, joined with `\n`), and `id` fields
//! - `retry` and unknown fields, ignored
//! - a leading UTF-8 byte order mark

/// Event type used when the server does not name one.
pub const DEFAULT_EVENT_TYPE: &str = "message";

const BOM: &str = "\u{feff}";

/// One dispatched server-sent event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// Event type (`message` unless the server set `event:`).
    pub event: String,
    /// Data lines joined with `\n`.
    pub data: String,
    /// Last event id seen on the stream, if any.
    pub id: Option<String>,
}

impl SseEvent {
    /// Whether this is a default `message` event.
    pub fn is_message(&self) -> bool {
        self.event == DEFAULT_EVENT_TYPE
    }
}

/// Stateful stream decoder.
#[derive(Debug, Default)]
pub struct SseDecoder {
    /// Bytes of the current, not yet terminated line.
    buffer: Vec<u8>,
    /// `event:` value of the event being assembled.
    event_type: Option<String>,
    /// `data:` lines of the event being assembled.
    data: Vec<String>,
    /// Sticky last event id.
    last_event_id: Option<String>,
    /// Whether the first line (and a possible BOM) has been handled.
    started: bool,
}

impl SseDecoder {
    /// Create a decoder at the start of a stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last event id seen so far.
    pub fn last_event_id(&self) -> Option<&str> {
        self.last_event_id.as_deref()
    }

    /// Feed a chunk, returning every event it completes.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(chunk);
        let mut events = Vec::new();

        while let Some(newline) = self.buffer.iter().position(|b| *b == b'\n') {
            let rest = self.buffer.split_off(newline.saturating_add(1));
            let mut line = std::mem::replace(&mut self.buffer, rest);
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            let line = String::from_utf8_lossy(&line);
            if let Some(event) = self.process_line(&line) {
                events.push(event);
            }
        }

        events
    }

    fn process_line(&mut self, line: &str) -> Option<SseEvent> {
        let line = if self.started {
            line
        } else {
            self.started = true;
            line.strip_prefix(BOM).unwrap_or(line)
        };

        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => self.event_type = Some(value.to_owned()),
            "data" => self.data.push(value.to_owned()),
            "id" => {
                if !value.contains('\0') {
                    self.last_event_id = Some(value.to_owned());
                }
            }
            _ => {}
        }
        None
    }

    /// Complete the current event. Events without any `data` line are
    /// discarded; an empty `event` value means `message`.
    fn dispatch(&mut self) -> Option<SseEvent> {
        let event_type = self.event_type.take();
        if self.data.is_empty() {
            return None;
        }
        let data = std::mem::take(&mut self.data).join("\n");
        Some(SseEvent {
            event: event_type
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| DEFAULT_EVENT_TYPE.to_owned()),
            data,
            id: self.last_event_id.clone(),
        })
    }
}
