//! Line framing and text decoding for the serial byte stream.
//!
//! Buffers raw bytes and emits one decoded line per `\n`-terminated run.
//! Incomplete tails are retained across reads, so a line split over several
//! reads still comes out whole.

use memchr::memchr;

/// Accumulates raw bytes and splits them into newline-terminated frames.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buffer: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(1024),
        }
    }

    /// Push a chunk of raw bytes, returning every line completed by it.
    ///
    /// Lines are decoded and trimmed; an empty `Vec` means no terminator has
    /// arrived yet. Order matches arrival order.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(bytes);

        let mut lines = Vec::new();
        let mut start = 0;
        while let Some(pos) = memchr(b'\n', &self.buffer[start..]) {
            let end = start + pos;
            lines.push(decode_frame(&self.buffer[start..end]));
            start = end + 1;
        }
        if start > 0 {
            self.buffer.drain(..start);
        }

        lines
    }

    /// Number of buffered bytes awaiting a terminator.
    pub fn pending_bytes(&self) -> usize {
        self.buffer.len()
    }

    /// Drop any partially accumulated frame.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }
}

/// Decode a raw frame without losing data, whatever the encoding.
///
/// UTF-8 first; if the bytes are not valid UTF-8, fall back to Latin-1,
/// where every byte maps to exactly one char. A frame is never dropped for
/// encoding reasons, and the fallback preserves length.
pub fn decode_lossless(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Decode a frame and strip surrounding whitespace and line terminators.
pub fn decode_frame(bytes: &[u8]) -> String {
    decode_lossless(bytes).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_lines_simple() {
        let mut framer = LineBuffer::new();
        let lines = framer.push(b"Hello\nWorld\n");
        assert_eq!(lines, vec!["Hello".to_string(), "World".to_string()]);
        assert_eq!(framer.pending_bytes(), 0);
    }

    #[test]
    fn test_lines_split_across_pushes() {
        let mut framer = LineBuffer::new();
        assert!(framer.push(b"Hel").is_empty());
        assert_eq!(framer.pending_bytes(), 3);

        let lines = framer.push(b"lo\n");
        assert_eq!(lines, vec!["Hello".to_string()]);
    }

    #[test]
    fn test_crlf_stripped() {
        let mut framer = LineBuffer::new();
        let lines = framer.push(b"Test\r\n");
        assert_eq!(lines, vec!["Test".to_string()]);
    }

    #[test]
    fn test_tail_retained_after_complete_lines() {
        let mut framer = LineBuffer::new();
        let lines = framer.push(b"one\ntwo\npartial");
        assert_eq!(lines, vec!["one".to_string(), "two".to_string()]);
        assert_eq!(framer.pending_bytes(), 7);

        let lines = framer.push(b" line\n");
        assert_eq!(lines, vec!["partial line".to_string()]);
    }

    #[test]
    fn test_empty_line_is_emitted() {
        let mut framer = LineBuffer::new();
        let lines = framer.push(b"\n");
        assert_eq!(lines, vec![String::new()]);
    }

    #[test]
    fn test_reset_drops_partial_frame() {
        let mut framer = LineBuffer::new();
        framer.push(b"half a li");
        framer.reset();
        assert_eq!(framer.pending_bytes(), 0);
        assert_eq!(framer.push(b"ne\n"), vec!["ne".to_string()]);
    }

    #[test]
    fn test_decode_invalid_utf8_falls_back_to_latin1() {
        // 0xC9 0xE9: "Éé" in Latin-1, invalid as UTF-8.
        let decoded = decode_lossless(&[0xC9, 0xE9]);
        assert_eq!(decoded, "Éé");
    }

    #[test]
    fn test_decode_frame_trims_whitespace() {
        assert_eq!(decode_frame(b"  LEFT \r"), "LEFT");
    }

    proptest! {
        #[test]
        fn valid_utf8_decodes_unchanged(s in ".*") {
            prop_assert_eq!(decode_lossless(s.as_bytes()), s);
        }

        #[test]
        fn fallback_preserves_length(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
            if std::str::from_utf8(&bytes).is_err() {
                let decoded = decode_lossless(&bytes);
                prop_assert_eq!(decoded.chars().count(), bytes.len());
            }
        }

        #[test]
        fn framer_emits_each_terminator_once(
            chunks in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..64), 0..8)
        ) {
            let mut framer = LineBuffer::new();
            let mut emitted = 0;
            let mut terminators = 0;
            for chunk in &chunks {
                terminators += chunk.iter().filter(|&&b| b == b'\n').count();
                emitted += framer.push(chunk).len();
            }
            prop_assert_eq!(emitted, terminators);
        }
    }
}
