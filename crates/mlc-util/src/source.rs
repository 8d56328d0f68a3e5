//! The source buffer.
//!
//! [`SourceBuffer`] owns the input text and maps byte offsets back to
//! 1-based (line, column) positions. The lexer tracks positions itself
//! while scanning; the buffer exists for consumers that only have a byte
//! offset, and for extracting the text of a line when rendering output.

/// The input text plus an index of line start offsets.
pub struct SourceBuffer {
    text: String,
    /// Byte offset of the first character of each line.
    line_starts: Vec<usize>,
}

impl SourceBuffer {
    /// Build a buffer from the input text, indexing line starts.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut line_starts = vec![0];
        for (offset, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(offset + 1);
            }
        }
        Self { text, line_starts }
    }

    /// The full source text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Map a byte offset to a 1-based (line, column) pair.
    ///
    /// Columns count code points from the start of the line. Offsets past
    /// the end of the text map to the position just after the last
    /// character.
    pub fn line_col(&self, offset: usize) -> (u32, u32) {
        let offset = offset.min(self.text.len());
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let line_start = self.line_starts[line_idx];
        let column = self.text[line_start..offset].chars().count();
        (line_idx as u32 + 1, column as u32 + 1)
    }

    /// The text of a 1-based line, without its trailing newline.
    pub fn line_text(&self, line: u32) -> Option<&str> {
        let idx = line.checked_sub(1)? as usize;
        let start = *self.line_starts.get(idx)?;
        let end = self
            .line_starts
            .get(idx + 1)
            .map(|next| next - 1)
            .unwrap_or(self.text.len());
        Some(&self.text[start..end])
    }

    /// Number of lines in the buffer (an empty buffer has one line).
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
