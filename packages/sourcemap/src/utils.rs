/// Convert byte offset to line and column number
///
/// # Arguments
/// * `source` - The source text
/// * `offset` - Byte offset in the source
///
/// # Returns
/// Tuple of (line, column) both 0-indexed, column counted in chars
pub fn byte_offset_to_line_col(source: &str, offset: usize) -> (u32, u32) {
    LineIndex::new(source).line_col(source, offset)
}

/// Precomputed line starts for repeated offset lookups
///
/// Building the index is a single pass over the text; every lookup is a
/// binary search plus a scan of one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (pos, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(pos + 1);
            }
        }

        Self {
            line_starts,
            len: text.len(),
        }
    }

    /// Number of lines (a trailing newline opens a final empty line)
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Byte offset where `line` begins
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.line_starts.get(line).copied()
    }

    /// Byte range of `line`, excluding its terminating newline
    pub fn line_range(&self, line: usize) -> Option<std::ops::Range<usize>> {
        let start = self.line_start(line)?;
        let end = self
            .line_starts
            .get(line + 1)
            .map(|next| next - 1)
            .unwrap_or(self.len);
        Some(start..end)
    }

    /// Zero-based line containing `offset`
    pub fn line_of(&self, offset: usize) -> usize {
        let offset = offset.min(self.len);
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        }
    }

    /// Line and char column of `offset` within `text`
    ///
    /// `text` must be the string this index was built from.
    pub fn line_col(&self, text: &str, offset: usize) -> (u32, u32) {
        let offset = offset.min(self.len);
        let line = self.line_of(offset);
        let start = self.line_starts[line];
        let col = text
            .get(start..offset)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(offset - start);
        (line as u32, col as u32)
    }
}
