//! Printing of leading and trailing comments around a node
//!
//! Dangling comments are not handled here; they sit inside the node and
//! are printed by whoever prints the node itself.

use reprint_common::{ReprintError, ReprintResult};
use reprint_parser::{indentation_width, Comment, CommentKind, Loc, Node};

use crate::fast_path::FastPath;
use crate::lines::Lines;
use crate::options::Options;
use crate::patcher::PrintFn;

pub trait CommentPrinter {
    /// Print the node at `path` through `print`, wrapped in its comments
    fn attach(&self, path: &FastPath<'_>, options: &Options, print: &PrintFn<'_>) -> ReprintResult<Lines>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Comments;

impl Comments {
    pub fn new() -> Self {
        Self
    }
}

impl CommentPrinter for Comments {
    fn attach(&self, path: &FastPath<'_>, options: &Options, print: &PrintFn<'_>) -> ReprintResult<Lines> {
        let node = path.node().ok_or(ReprintError::MissingRenderTarget)?;
        let printed = print(path)?;

        let leading: Vec<&Comment> = node.leading_comments().collect();
        let trailing: Vec<&Comment> = node.trailing_comments().collect();
        if leading.is_empty() && trailing.is_empty() {
            return Ok(printed);
        }

        let mut lines = Lines::empty();

        for (index, comment) in leading.iter().enumerate() {
            lines.append(comment_lines(comment, options));
            let next = leading.get(index + 1).and_then(|c| c.loc.as_ref()).or(node.loc.as_ref());
            lines.append(leading_gap(comment, next, options));
        }

        lines.append(printed);

        let mut previous = node.loc.as_ref();
        for comment in &trailing {
            lines.append(trailing_gap(previous, comment, options));
            lines.append(comment_lines(comment, options));
            previous = comment.loc.as_ref().or(previous);
        }

        if trailing.last().is_some_and(|c| c.kind == CommentKind::Line) && !node.is_statement() {
            lines.push_str("\n");
        }

        Ok(lines)
    }
}

/// Comment text, copied from the original when it is unchanged
fn comment_lines(comment: &Comment, options: &Options) -> Lines {
    if let Some(loc) = &comment.loc {
        let text = comment.text();
        if loc.text() == text {
            let indent = loc.source.indent_at(loc.start, options.tab_width);
            return Lines::from_source(&loc.source, loc.range()).indent_tail(-(indent as isize), options);
        }
    }
    Lines::from_text(comment.text())
}

fn leading_gap(comment: &Comment, next: Option<&Loc>, options: &Options) -> Lines {
    if let Some(gap) = original_gap(comment.loc.as_ref(), next, options) {
        return gap;
    }

    match (comment.kind, newlines_after(comment)) {
        (CommentKind::Line, newlines) => Lines::from_text("\n".repeat(newlines.clamp(1, 2))),
        (CommentKind::Block, 0) => Lines::from_text(" "),
        (CommentKind::Block, newlines) => Lines::from_text("\n".repeat(newlines.min(2))),
    }
}

fn trailing_gap(previous: Option<&Loc>, comment: &Comment, options: &Options) -> Lines {
    if let Some(gap) = original_gap(previous, comment.loc.as_ref(), options) {
        return gap;
    }

    let newlines = match (previous, &comment.loc) {
        (Some(prev), Some(loc)) if prev.same_source(loc) && prev.end <= loc.start => {
            loc.source.slice(prev.end..loc.start).matches('\n').count()
        }
        _ => 0,
    };
    if newlines == 0 {
        Lines::from_text(" ")
    } else {
        Lines::from_text("\n".repeat(newlines.min(2)))
    }
}

/// Original whitespace between two locs, made relative to the line
/// `before` starts on
fn original_gap(before: Option<&Loc>, after: Option<&Loc>, options: &Options) -> Option<Lines> {
    if !options.reuse_whitespace {
        return None;
    }
    let (before, after) = (before?, after?);
    if !before.same_source(after) || before.end > after.start {
        return None;
    }

    let source = &before.source;
    let gap = source.slice(before.end..after.start);
    if !gap.trim().is_empty() {
        return None;
    }

    let Some(last_newline) = gap.rfind('\n') else {
        return Some(Lines::from_text(gap));
    };
    let indent = source.indent_at(before.start, options.tab_width);
    let tail = indentation_width(&gap[last_newline + 1..], options.tab_width).saturating_sub(indent);

    let mut text = gap[..=last_newline].to_string();
    text.push_str(&options.indentation(tail));
    Some(Lines::from_text(text))
}

/// Newlines between a comment and the next non-whitespace character
fn newlines_after(comment: &Comment) -> usize {
    let Some(loc) = &comment.loc else {
        return 0;
    };
    let rest = loc.source.slice(loc.end..loc.source.text().len());
    let whitespace = &rest[..rest.len() - rest.trim_start().len()];
    whitespace.matches('\n').count()
}

/// Whether a node has comments this printer would emit
pub fn has_attached_comments(node: &Node) -> bool {
    node.leading_comments().next().is_some() || node.trailing_comments().next().is_some()
}
