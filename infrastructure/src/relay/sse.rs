//! Incremental decoder for the relay's event stream.
//!
//! The relay answers with an SSE-style body: records are `data: `-prefixed
//! blocks separated by blank lines. Each payload is one of
//!
//! - `{"content": "..."}` — a text chunk
//! - `{"error": "..."}` — a stream-level failure
//! - `[DONE]` — the completion sentinel
//!
//! [`SseDecoder`] is a pure state machine over raw bytes so it can be fed
//! from any transport chunking: frames split across network reads (including
//! mid-UTF-8-sequence) reassemble correctly. Malformed records are logged
//! and skipped — forward progress over strict correctness.

use serde::Deserialize;
use tracing::warn;

/// Completion sentinel sent by the relay instead of a JSON payload.
const DONE_SENTINEL: &str = "[DONE]";

/// A decoded record from the event stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SsePayload {
    /// A text chunk to forward.
    Content(String),
    /// A stream-level error; processing must stop here.
    StreamError(String),
    /// The explicit completion sentinel.
    Done,
}

#[derive(Debug, Deserialize)]
struct StreamRecord {
    content: Option<String>,
    error: Option<String>,
}

/// Incremental SSE record decoder.
///
/// Bytes go in via [`feed`](Self::feed); complete records come out in
/// transmission order. Anything after the record a terminal payload came
/// from is still returned — the caller decides where to stop consuming.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes, returning every payload completed by them.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<SsePayload> {
        self.buffer.extend_from_slice(bytes);

        let mut payloads = Vec::new();
        while let Some(pos) = find_block_end(&self.buffer) {
            let block: Vec<u8> = self.buffer.drain(..pos + 2).take(pos).collect();
            let block = String::from_utf8_lossy(&block);
            for line in block.lines() {
                if let Some(payload) = decode_line(line) {
                    payloads.push(payload);
                }
            }
        }
        payloads
    }
}

/// Position of the first `\n\n` block delimiter, if a full block is buffered.
fn find_block_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(2).position(|w| w == b"\n\n")
}

fn decode_line(line: &str) -> Option<SsePayload> {
    let data = line.strip_prefix("data: ")?.trim();

    if data == DONE_SENTINEL {
        return Some(SsePayload::Done);
    }

    match serde_json::from_str::<StreamRecord>(data) {
        Ok(record) => {
            if let Some(error) = record.error {
                Some(SsePayload::StreamError(error))
            } else if let Some(content) = record.content
                && !content.is_empty()
            {
                Some(SsePayload::Content(content))
            } else {
                None
            }
        }
        Err(e) => {
            warn!("Skipping malformed stream record '{}': {}", data, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_content_then_done() {
        let mut decoder = SseDecoder::new();
        let payloads = decoder
            .feed(b"data: {\"content\":\"Hi\"}\n\ndata: {\"content\":\" there\"}\n\ndata: [DONE]\n\n");
        assert_eq!(
            payloads,
            vec![
                SsePayload::Content("Hi".to_string()),
                SsePayload::Content(" there".to_string()),
                SsePayload::Done,
            ]
        );
    }

    #[test]
    fn decodes_error_record() {
        let mut decoder = SseDecoder::new();
        let payloads = decoder.feed(b"data: {\"error\":\"quota exceeded\"}\n\n");
        assert_eq!(
            payloads,
            vec![SsePayload::StreamError("quota exceeded".to_string())]
        );
    }

    #[test]
    fn reassembles_records_split_across_feeds() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"data: {\"cont").is_empty());
        assert!(decoder.feed(b"ent\":\"Hi\"}\n").is_empty());
        let payloads = decoder.feed(b"\ndata: [DONE]\n\n");
        assert_eq!(
            payloads,
            vec![SsePayload::Content("Hi".to_string()), SsePayload::Done]
        );
    }

    #[test]
    fn reassembles_utf8_split_mid_character() {
        let mut decoder = SseDecoder::new();
        let frame = "data: {\"content\":\"héllo\"}\n\n".as_bytes();
        // Split inside the two-byte 'é' sequence.
        let split = frame.iter().position(|&b| b == 0xc3).unwrap() + 1;
        assert!(decoder.feed(&frame[..split]).is_empty());
        let payloads = decoder.feed(&frame[split..]);
        assert_eq!(payloads, vec![SsePayload::Content("héllo".to_string())]);
    }

    #[test]
    fn skips_malformed_records_without_aborting() {
        let mut decoder = SseDecoder::new();
        let payloads = decoder
            .feed(b"data: {not json}\n\ndata: {\"content\":\"ok\"}\n\n");
        assert_eq!(payloads, vec![SsePayload::Content("ok".to_string())]);
    }

    #[test]
    fn ignores_lines_without_data_prefix() {
        let mut decoder = SseDecoder::new();
        let payloads = decoder.feed(b"event: ping\nretry: 100\n\ndata: [DONE]\n\n");
        assert_eq!(payloads, vec![SsePayload::Done]);
    }

    #[test]
    fn empty_content_is_not_forwarded() {
        let mut decoder = SseDecoder::new();
        let payloads = decoder.feed(b"data: {\"content\":\"\"}\n\ndata: [DONE]\n\n");
        assert_eq!(payloads, vec![SsePayload::Done]);
    }

    #[test]
    fn record_with_neither_field_is_skipped() {
        let mut decoder = SseDecoder::new();
        let payloads = decoder.feed(b"data: {\"usage\":{\"tokens\":3}}\n\ndata: [DONE]\n\n");
        assert_eq!(payloads, vec![SsePayload::Done]);
    }
}
