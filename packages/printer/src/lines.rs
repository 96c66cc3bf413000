//! Printed text plus the knowledge of where it came from
//!
//! A [`Lines`] value is a string with a list of segments. Each segment
//! says that a range of the string was copied unchanged from a range of
//! some parsed [`SourceFile`]. Segments survive concatenation and
//! re-indentation, which is all the source map generator needs.
//!
//! Printed fragments follow one convention: the first line carries no
//! indentation of its own and every following line is indented relative
//! to it. Whoever places a fragment at some column shifts its tail with
//! [`Lines::indent_tail`].

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use reprint_parser::SourceFile;
use reprint_sourcemap::{LineIndex, SourceMap, SourceMapBuilder};

use crate::options::Options;

#[derive(Debug, Clone)]
struct Segment {
    /// Start in the printed text
    generated: usize,
    /// Start in the original source text
    original: usize,
    len: usize,
    source: Arc<SourceFile>,
}

#[derive(Debug, Clone, Default)]
pub struct Lines {
    text: String,
    segments: Vec<Segment>,
}

/// Replace `remove` bytes at `at` with `insert`
struct Edit {
    at: usize,
    remove: usize,
    insert: String,
}

impl Lines {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Freshly generated text with no original position
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            segments: Vec::new(),
        }
    }

    /// Original text of `range`, mapped back to `source`
    pub fn from_source(source: &Arc<SourceFile>, range: Range<usize>) -> Self {
        let end = range.end.min(source.text().len());
        let start = range.start.min(end);
        let text = source.slice(start..end).to_string();

        let segments = if text.is_empty() {
            Vec::new()
        } else {
            vec![Segment {
                generated: 0,
                original: start,
                len: text.len(),
                source: Arc::clone(source),
            }]
        };

        Self { text, segments }
    }

    pub fn append(&mut self, other: Lines) {
        let offset = self.text.len();
        self.segments.extend(other.segments.into_iter().map(|mut segment| {
            segment.generated += offset;
            segment
        }));
        self.text.push_str(&other.text);
    }

    pub fn push_str(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub fn concat(parts: impl IntoIterator<Item = Lines>) -> Lines {
        let mut lines = Lines::empty();
        for part in parts {
            lines.append(part);
        }
        lines
    }

    pub fn join(parts: impl IntoIterator<Item = Lines>, separator: &str) -> Lines {
        let mut lines = Lines::empty();
        for (index, part) in parts.into_iter().enumerate() {
            if index > 0 {
                lines.push_str(separator);
            }
            lines.append(part);
        }
        lines
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn is_multiline(&self) -> bool {
        self.text.contains('\n')
    }

    /// Whether any part of the text maps back to an original source
    pub fn has_mappings(&self) -> bool {
        !self.segments.is_empty()
    }

    /// Indent every non-blank line by `columns`
    pub fn indent(&self, columns: usize, options: &Options) -> Lines {
        self.reindent(columns as isize, false, options)
    }

    /// Shift every non-blank line after the first by `delta` columns
    ///
    /// A negative delta removes leading whitespace, never anything else.
    pub fn indent_tail(&self, delta: isize, options: &Options) -> Lines {
        self.reindent(delta, true, options)
    }

    fn reindent(&self, delta: isize, skip_first: bool, options: &Options) -> Lines {
        if delta == 0 || self.text.is_empty() {
            return self.clone();
        }

        let mut edits = Vec::new();
        let mut line_start = 0;
        for (index, line) in self.text.split('\n').enumerate() {
            let start = line_start;
            line_start += line.len() + 1;

            if (index == 0 && skip_first) || line.trim().is_empty() {
                continue;
            }

            if delta > 0 {
                edits.push(Edit {
                    at: start,
                    remove: 0,
                    insert: options.indentation(delta.unsigned_abs()),
                });
            } else {
                let (remove, overshoot) = leading_columns(line, delta.unsigned_abs(), options.tab_width);
                if remove > 0 {
                    edits.push(Edit {
                        at: start,
                        remove,
                        insert: " ".repeat(overshoot),
                    });
                }
            }
        }

        self.apply(&edits)
    }

    /// Apply sorted, non-overlapping edits, splitting segments around them
    fn apply(&self, edits: &[Edit]) -> Lines {
        if edits.is_empty() {
            return self.clone();
        }

        let mut text = String::with_capacity(self.text.len());
        let mut cursor = 0;
        for edit in edits {
            text.push_str(&self.text[cursor..edit.at]);
            text.push_str(&edit.insert);
            cursor = edit.at + edit.remove;
        }
        text.push_str(&self.text[cursor..]);

        // shift[k]: how far a position moves once the first k edits are applied
        let mut shifts = Vec::with_capacity(edits.len() + 1);
        shifts.push(0isize);
        for edit in edits {
            let last = shifts[shifts.len() - 1];
            shifts.push(last + edit.insert.len() as isize - edit.remove as isize);
        }
        let new_position = |pos: usize| -> usize {
            let applied = edits.partition_point(|e| e.at + e.remove <= pos);
            (pos as isize + shifts[applied]) as usize
        };

        let mut segments = Vec::with_capacity(self.segments.len());
        for segment in &self.segments {
            let end = segment.generated + segment.len;
            let mut piece_start = segment.generated;
            let mut emit = |from: usize, to: usize| {
                if from < to {
                    segments.push(Segment {
                        generated: new_position(from),
                        original: segment.original + (from - segment.generated),
                        len: to - from,
                        source: Arc::clone(&segment.source),
                    });
                }
            };

            let first = edits.partition_point(|e| e.at + e.remove < segment.generated);
            for edit in &edits[first..] {
                if edit.at >= end {
                    break;
                }
                if edit.at <= piece_start {
                    piece_start = piece_start.max(edit.at + edit.remove);
                    continue;
                }
                emit(piece_start, edit.at);
                piece_start = edit.at + edit.remove;
            }
            emit(piece_start, end);
        }

        Lines { text, segments }
    }

    /// Final string form with the configured line terminator
    ///
    /// Original `\r\n` breaks are normalized first, so the output uses
    /// one terminator throughout.
    pub fn to_string_with(&self, options: &Options) -> String {
        let text = if self.text.contains('\r') {
            self.text.replace("\r\n", "\n")
        } else {
            self.text.clone()
        };

        if options.line_terminator == "\n" {
            text
        } else {
            text.replace('\n', &options.line_terminator)
        }
    }

    /// Map from this text back to the named sources it was copied from
    ///
    /// Returns `None` without a map name. Text copied from an unnamed
    /// source is left unmapped.
    pub fn source_map(&self, map_name: Option<&str>, source_root: Option<&str>) -> Option<SourceMap> {
        let map_name = map_name?;
        let mut builder = SourceMapBuilder::new(Some(map_name)).with_source_root(source_root);
        let generated = LineIndex::new(&self.text);

        for segment in &self.segments {
            let Some(name) = segment.source.name() else {
                continue;
            };
            let source_id = builder.add_source(name, None);
            let end = segment.generated + segment.len;

            // One mapping where the segment starts and one per line it spans
            let mut pos = segment.generated;
            while pos < end {
                let (gen_line, gen_col) = generated.line_col(&self.text, pos);
                let (src_line, src_col) = segment.source.line_col(segment.original + (pos - segment.generated));
                builder.add_mapping(gen_line, gen_col, source_id, src_line, src_col, None);

                match self.text[pos..end].find('\n') {
                    Some(newline) => pos += newline + 1,
                    None => break,
                }
            }
        }

        Some(builder.build())
    }
}

/// Bytes of leading whitespace covering `columns`, and how many columns
/// the last removed tab overshoots by
fn leading_columns(line: &str, columns: usize, tab_width: usize) -> (usize, usize) {
    let tab_width = tab_width.max(1);
    let mut width = 0;
    let mut bytes = 0;

    for ch in line.chars() {
        if width >= columns {
            break;
        }
        match ch {
            ' ' => width += 1,
            '\t' => width += tab_width - (width % tab_width),
            _ => break,
        }
        bytes += 1;
    }

    (bytes, width.saturating_sub(columns))
}

impl fmt::Display for Lines {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
