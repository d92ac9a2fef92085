//! Incremental decoder for the line-oriented `data:` streaming protocol.
//!
//! The generation service answers a chat request with a chunked body of
//! newline-separated lines. Lines of the form `data:<text>` (optionally with
//! a space after the colon, optionally indented) carry one text delta each.
//! Everything else is ignored. There is no terminator frame: the stream ends
//! when the connection does.
//!
//! ```
//! use assist_domain::stream::decoder::FrameDecoder;
//!
//! let mut decoder = FrameDecoder::new();
//! let deltas: Vec<String> = decoder.feed(b"data: hel").collect();
//! assert!(deltas.is_empty());
//! let deltas: Vec<String> = decoder.feed(b"lo\ndata:world\n").collect();
//! assert_eq!(deltas, vec!["hello", "world"]);
//! ```

/// Marker prefix of a delta-carrying line.
pub const DATA_MARKER: &str = "data:";

/// Why a line was skipped without producing a delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeAnomaly {
    /// The line was not valid UTF-8.
    InvalidUtf8,
    /// Non-blank line without the data marker.
    Unmarked,
}

/// Decoder state: bytes received but not yet terminated by a newline.
///
/// Buffering raw bytes (not text) keeps a multi-byte character that is split
/// across two chunks intact.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buffer: Vec<u8>,
    consumed: usize,
    anomalies: Vec<DecodeAnomaly>,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one raw chunk and iterate over the deltas it completes.
    ///
    /// The returned iterator is lazy: lines are decoded as it is advanced.
    /// Lines it did not reach before being dropped stay buffered and are
    /// produced, in order, by the next call.
    pub fn feed(&mut self, chunk: &[u8]) -> Deltas<'_> {
        self.compact();
        self.buffer.extend_from_slice(chunk);
        Deltas { decoder: self }
    }

    /// Flush the trailing unterminated line once the source is exhausted.
    pub fn finish(&mut self) -> Vec<String> {
        let mut out: Vec<String> = Deltas { decoder: self }.collect();
        self.compact();
        let rest = std::mem::take(&mut self.buffer);
        if let Some(delta) = self.decode_line(&rest) {
            out.push(delta);
        }
        out
    }

    /// Skipped lines seen so far, in order.
    pub fn anomalies(&self) -> &[DecodeAnomaly] {
        &self.anomalies
    }

    /// Bytes held back waiting for a line terminator.
    pub fn pending_len(&self) -> usize {
        self.buffer.len() - self.consumed
    }

    /// Convenience for one-shot decoding of a complete body.
    pub fn decode_all(input: &[u8]) -> Vec<String> {
        let mut decoder = Self::new();
        let mut out: Vec<String> = decoder.feed(input).collect();
        out.extend(decoder.finish());
        out
    }

    fn compact(&mut self) {
        if self.consumed > 0 {
            self.buffer.drain(..self.consumed);
            self.consumed = 0;
        }
    }

    fn next_line(&mut self) -> Option<(usize, usize)> {
        let start = self.consumed;
        let offset = self.buffer[start..].iter().position(|&b| b == b'\n')?;
        let end = start + offset;
        self.consumed = end + 1;
        Some((start, end))
    }

    fn decode_line(&mut self, raw: &[u8]) -> Option<String> {
        let line = match std::str::from_utf8(raw) {
            Ok(line) => line.trim_start().trim_end_matches('\r'),
            Err(_) => {
                self.anomalies.push(DecodeAnomaly::InvalidUtf8);
                return None;
            }
        };
        if line.is_empty() {
            return None;
        }
        match line.strip_prefix(DATA_MARKER) {
            Some(rest) => {
                // At most one separator space; the rest is the delta verbatim.
                let text = rest.strip_prefix(char::is_whitespace).unwrap_or(rest);
                (!text.is_empty()).then(|| text.to_string())
            }
            None => {
                self.anomalies.push(DecodeAnomaly::Unmarked);
                None
            }
        }
    }
}

/// Lazy, finite, non-restartable sequence of deltas for one fed chunk.
pub struct Deltas<'a> {
    decoder: &'a mut FrameDecoder,
}

impl Iterator for Deltas<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        while let Some((start, end)) = self.decoder.next_line() {
            let raw = self.decoder.buffer[start..end].to_vec();
            if let Some(delta) = self.decoder.decode_line(&raw) {
                return Some(delta);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn feed_all(decoder: &mut FrameDecoder, chunks: &[&[u8]]) -> Vec<String> {
        let mut out = Vec::new();
        for chunk in chunks {
            out.extend(decoder.feed(chunk));
        }
        out
    }

    #[test]
    fn reference_sample_yields_two_deltas() {
        let mut decoder = FrameDecoder::new();
        let deltas: Vec<String> = decoder.feed(b"data: hello\n data:world\n\nrandom\n").collect();
        assert_eq!(deltas, vec!["hello", "world"]);
        assert_eq!(decoder.anomalies(), &[DecodeAnomaly::Unmarked]);
    }

    #[test]
    fn partial_line_is_carried_over() {
        let mut decoder = FrameDecoder::new();
        let out = feed_all(&mut decoder, &[b"da".as_slice(), b"ta: par", b"tial\n"]);
        assert_eq!(out, vec!["partial"]);
        assert_eq!(decoder.pending_len(), 0);
    }

    #[test]
    fn blank_data_lines_never_emit_empty_delta() {
        let deltas = FrameDecoder::decode_all(b"data:\ndata: \n   \ndata: x\n");
        assert_eq!(deltas, vec!["x"]);
    }

    #[test]
    fn payload_whitespace_is_kept_verbatim() {
        let deltas = FrameDecoder::decode_all(b"data: Hi\ndata:  there\ndata: ! \ndata:   \n");
        assert_eq!(deltas, vec!["Hi", " there", "! ", "  "]);
        assert_eq!(deltas.concat(), "Hi there!   ");
    }

    #[test]
    fn crlf_line_endings_are_accepted() {
        let deltas = FrameDecoder::decode_all(b"data: a\r\ndata: b\r\n");
        assert_eq!(deltas, vec!["a", "b"]);
    }

    #[test]
    fn finish_flushes_unterminated_tail() {
        let mut decoder = FrameDecoder::new();
        let first: Vec<String> = decoder.feed(b"data: one\ndata: two").collect();
        assert_eq!(first, vec!["one"]);
        assert_eq!(decoder.finish(), vec!["two"]);
        assert!(decoder.finish().is_empty());
    }

    #[test]
    fn split_multibyte_character_survives() {
        let text = "data: caf\u{e9}\n".as_bytes();
        let split = text.len() - 2;
        let mut decoder = FrameDecoder::new();
        let out = feed_all(&mut decoder, &[&text[..split], &text[split..]]);
        assert_eq!(out, vec!["caf\u{e9}"]);
        assert!(decoder.anomalies().is_empty());
    }

    #[test]
    fn invalid_utf8_line_is_skipped() {
        let deltas = FrameDecoder::decode_all(b"data: \xff\xfe\ndata: ok\n");
        assert_eq!(deltas, vec!["ok"]);
    }

    #[test]
    fn dropped_iterator_keeps_remaining_lines_in_order() {
        let mut decoder = FrameDecoder::new();
        let first = decoder.feed(b"data: a\ndata: b\ndata: c\n").next();
        assert_eq!(first.as_deref(), Some("a"));
        let rest: Vec<String> = decoder.feed(b"data: d\n").collect();
        assert_eq!(rest, vec!["b", "c", "d"]);
    }

    #[test]
    fn marker_must_lead_the_line() {
        let deltas = FrameDecoder::decode_all(b"event: data: nope\nmetadata: no\n");
        assert!(deltas.is_empty());
    }

    proptest! {
        #[test]
        fn chunk_boundaries_do_not_change_output(
            lines in prop::collection::vec(
                prop_oneof![
                    "[a-zA-Z0-9 ,.!?\u{e9}\u{4e16}]{0,12}".prop_map(|s| format!("data: {s}")),
                    "[a-zA-Z0-9 ]{0,12}".prop_map(|s| format!("data:{s}")),
                    "[a-z ]{0,8}",
                    Just(String::new()),
                ],
                0..20,
            ),
            cuts in prop::collection::vec(any::<prop::sample::Index>(), 0..8),
        ) {
            let body = lines.join("\n") + "\n";
            let bytes = body.as_bytes();
            let expected = FrameDecoder::decode_all(bytes);

            let mut points: Vec<usize> = cuts.iter().map(|i| i.index(bytes.len() + 1)).collect();
            points.sort_unstable();
            points.dedup();

            let mut decoder = FrameDecoder::new();
            let mut actual = Vec::new();
            let mut prev = 0;
            for p in points {
                actual.extend(decoder.feed(&bytes[prev..p]));
                prev = p;
            }
            actual.extend(decoder.feed(&bytes[prev..]));
            actual.extend(decoder.finish());

            prop_assert_eq!(actual, expected);
        }
    }
}
