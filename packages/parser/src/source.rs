use std::collections::HashMap;
use std::fmt;
use std::ops::Range;
use std::sync::OnceLock;

use reprint_sourcemap::LineIndex;

use crate::ast::{Comment, CommentKind, Node, Placement, Shallow};

/// Columns a tab counts for when guessing indentation
const GUESS_TAB_COLUMNS: usize = 4;

/// Fallback when a file has no indented lines to learn from
const DEFAULT_GUESSED_TAB_WIDTH: usize = 2;

/// Original text of a parsed file plus everything the printer needs to
/// reuse it: a line index, the guessed indentation width and a snapshot
/// of every node as it was parsed.
pub struct SourceFile {
    name: Option<String>,
    text: String,
    line_index: LineIndex,
    tab_width: OnceLock<usize>,
    use_tabs: OnceLock<bool>,
    snapshots: OnceLock<HashMap<String, Snapshot>>,
}

/// A node's state right after parsing
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub shallow: Shallow,
    pub comments: Vec<CommentKey>,
    pub children: Vec<ChildRef>,
}

/// Comment content without its location, comparable across trees
#[derive(Debug, Clone, PartialEq)]
pub struct CommentKey {
    pub kind: CommentKind,
    pub value: String,
    pub placement: Placement,
}

impl From<&Comment> for CommentKey {
    fn from(comment: &Comment) -> Self {
        Self {
            kind: comment.kind,
            value: comment.value.clone(),
            placement: comment.placement,
        }
    }
}

impl CommentKey {
    pub fn matches(&self, comment: &Comment) -> bool {
        self.kind == comment.kind && self.value == comment.value && self.placement == comment.placement
    }
}

/// Original child: its id and its range including attached comments
#[derive(Debug, Clone, PartialEq)]
pub struct ChildRef {
    pub id: String,
    pub range: Range<usize>,
}

impl SourceFile {
    pub fn new(name: Option<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let line_index = LineIndex::new(&text);

        Self {
            name,
            text,
            line_index,
            tab_width: OnceLock::new(),
            use_tabs: OnceLock::new(),
            snapshots: OnceLock::new(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    /// Text in `range`, clamped to the file
    pub fn slice(&self, range: Range<usize>) -> &str {
        let end = range.end.min(self.text.len());
        let start = range.start.min(end);
        &self.text[start..end]
    }

    /// Line and char column of a byte offset
    pub fn line_col(&self, offset: usize) -> (u32, u32) {
        self.line_index.line_col(&self.text, offset)
    }

    /// Most common indentation step between consecutive non-blank lines
    pub fn guess_tab_width(&self) -> usize {
        *self.tab_width.get_or_init(|| {
            let mut counts: Vec<usize> = Vec::new();
            let mut last_indent = 0;

            for line in 0..self.line_index.line_count() {
                let Some(range) = self.line_index.line_range(line) else {
                    continue;
                };
                let content = &self.text[range];
                if content.trim().is_empty() {
                    continue;
                }

                let indent = indentation_width(content, GUESS_TAB_COLUMNS);
                let diff = indent.abs_diff(last_indent);
                if counts.len() <= diff {
                    counts.resize(diff + 1, 0);
                }
                counts[diff] += 1;
                last_indent = indent;
            }

            let mut max_count = 0;
            let mut result = DEFAULT_GUESSED_TAB_WIDTH;
            for (width, count) in counts.iter().enumerate().skip(1) {
                if *count > max_count {
                    max_count = *count;
                    result = width;
                }
            }
            result
        })
    }

    /// Whether more indented lines start with a tab than with a space
    pub fn guess_use_tabs(&self) -> bool {
        *self.use_tabs.get_or_init(|| {
            let (mut tabs, mut spaces) = (0usize, 0usize);
            for line in self.text.lines().filter(|line| !line.trim().is_empty()) {
                match line.chars().next() {
                    Some('\t') => tabs += 1,
                    Some(' ') => spaces += 1,
                    _ => {}
                }
            }
            tabs > spaces
        })
    }

    /// Indentation columns of the line containing `pos`
    pub fn indent_at(&self, pos: usize, tab_width: usize) -> usize {
        let line = self.line_index.line_of(pos);
        self.line_index
            .line_range(line)
            .map(|range| indentation_width(&self.text[range], tab_width))
            .unwrap_or(0)
    }

    pub fn snapshot(&self, id: &str) -> Option<&Snapshot> {
        self.snapshots.get()?.get(id)
    }

    /// Record the parsed state of every node under `root`
    ///
    /// Only the first call has an effect; a source file describes one
    /// parse.
    pub(crate) fn record(&self, root: &Node) {
        let mut snapshots = HashMap::new();
        collect_snapshots(root, &mut snapshots);
        let _ = self.snapshots.set(snapshots);
    }
}

fn collect_snapshots(node: &Node, snapshots: &mut HashMap<String, Snapshot>) {
    let children = node.children();

    if let Some(loc) = &node.loc {
        let child_refs = children
            .iter()
            .filter_map(|child| {
                let id = child.loc.as_ref()?.id.clone();
                let range = child.full_range()?;
                Some(ChildRef { id, range })
            })
            .collect();

        snapshots.insert(
            loc.id.clone(),
            Snapshot {
                shallow: node.shallow(),
                comments: node.comments.iter().map(CommentKey::from).collect(),
                children: child_refs,
            },
        );
    }

    for child in children {
        collect_snapshots(child, snapshots);
    }
}

/// Width in columns of the leading whitespace of `line`
pub fn indentation_width(line: &str, tab_width: usize) -> usize {
    let tab_width = tab_width.max(1);
    let mut columns = 0;
    for ch in line.chars() {
        match ch {
            ' ' => columns += 1,
            '\t' => columns += tab_width - (columns % tab_width),
            _ => break,
        }
    }
    columns
}

impl fmt::Debug for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceFile")
            .field("name", &self.name)
            .field("len", &self.text.len())
            .field("snapshots", &self.snapshots.get().map(|s| s.len()))
            .finish()
    }
}
