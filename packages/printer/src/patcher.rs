//! Reconciliation: decide whether a node can reuse its original text
//!
//! The parser records a snapshot of every node. A node can be reprinted
//! from its original text when its own fields and child count still match
//! that snapshot; children that changed are cut out of the original text
//! and printed again through the dispatcher.

use std::ops::Range;
use std::sync::Arc;

use reprint_common::ReprintResult;
use reprint_parser::source::Snapshot;
use reprint_parser::{Loc, Node, Placement, SourceFile};
use tracing::trace;

use crate::fast_path::FastPath;
use crate::lines::Lines;
use crate::options::{Options, PrintOptions};

/// Continuation that prints any path with call-scoped flags
pub type PrintWithFn<'f> = dyn for<'p> Fn(&FastPath<'p>, PrintOptions) -> ReprintResult<Lines> + 'f;

/// Continuation that prints any path
pub type PrintFn<'f> = dyn for<'p> Fn(&FastPath<'p>) -> ReprintResult<Lines> + 'f;

/// Outcome of a reconciliation lookup
pub enum Reprint<'a> {
    /// The node's original text can be reused; the reprinter fills in
    /// whatever changed
    Reuse(Box<dyn Reprinter + 'a>),
    NoReuse,
}

impl Reprint<'_> {
    pub fn is_reuse(&self) -> bool {
        matches!(self, Reprint::Reuse(_))
    }
}

pub trait Reconciler {
    fn lookup<'a>(&self, path: &FastPath<'a>) -> Reprint<'a>;
}

pub trait Reprinter {
    fn reprint(&self, print: &PrintWithFn<'_>, options: &Options) -> ReprintResult<Lines>;
}

/// Snapshot based reconciler
#[derive(Debug, Default, Clone, Copy)]
pub struct Patcher;

impl Patcher {
    pub fn new() -> Self {
        Self
    }
}

impl Reconciler for Patcher {
    fn lookup<'a>(&self, path: &FastPath<'a>) -> Reprint<'a> {
        let Some(node) = path.node() else {
            return Reprint::NoReuse;
        };
        let Some(loc) = &node.loc else {
            return Reprint::NoReuse;
        };
        let Some(snapshot) = loc.source.snapshot(&loc.id) else {
            return Reprint::NoReuse;
        };

        let children = node.children();
        if snapshot.shallow != node.shallow() || snapshot.children.len() != children.len() {
            trace!(kind = node.kind_name(), id = %loc.id, "node changed shape");
            return Reprint::NoReuse;
        }
        // dangling comments live inside the node's own text
        if !dangling_unchanged(node, snapshot) {
            return Reprint::NoReuse;
        }

        let mut patches = Vec::new();
        for (child, original) in children.into_iter().zip(&snapshot.children) {
            let unchanged = child.loc.as_ref().is_some_and(|child_loc| {
                child_loc.id == original.id && child_loc.same_source(loc) && is_pristine(child)
            });
            if unchanged {
                continue;
            }

            patches.push(Patch {
                range: original.range.clone(),
                parenthesized: is_parenthesized(&loc.source, &original.range),
                node: child,
            });
        }

        trace!(kind = node.kind_name(), id = %loc.id, patches = patches.len(), "reusing original text");
        Reprint::Reuse(Box::new(PatchReprinter {
            path: path.clone(),
            loc: loc.clone(),
            patches,
        }))
    }
}

/// Original child range to replace with a freshly printed node
struct Patch<'a> {
    range: Range<usize>,
    parenthesized: bool,
    node: &'a Node,
}

struct PatchReprinter<'a> {
    path: FastPath<'a>,
    loc: Loc,
    patches: Vec<Patch<'a>>,
}

impl Reprinter for PatchReprinter<'_> {
    fn reprint(&self, print: &PrintWithFn<'_>, options: &Options) -> ReprintResult<Lines> {
        let source = &self.loc.source;
        let mut lines = Lines::empty();
        let mut cursor = self.loc.start;

        for patch in &self.patches {
            let start = patch.range.start.max(cursor);
            lines.append(Lines::from_source(source, cursor..start));

            let printed = print(
                &self.path.child(patch.node),
                PrintOptions {
                    include_comments: true,
                    avoid_root_parens: patch.parenthesized,
                },
            )?;
            let indent = source.indent_at(patch.range.start, options.tab_width);
            lines.append(printed.indent_tail(indent as isize, options));

            cursor = patch.range.end.max(start);
        }
        lines.append(Lines::from_source(source, cursor..self.loc.end.max(cursor)));

        let own_indent = source.indent_at(self.loc.start, options.tab_width);
        Ok(lines.indent_tail(-(own_indent as isize), options))
    }
}

/// Whether `node` and everything below it still match their snapshots
fn is_pristine(node: &Node) -> bool {
    let Some(loc) = &node.loc else {
        return false;
    };
    let Some(snapshot) = loc.source.snapshot(&loc.id) else {
        return false;
    };

    let children = node.children();
    if snapshot.shallow != node.shallow()
        || snapshot.children.len() != children.len()
        || snapshot.comments.len() != node.comments.len()
    {
        return false;
    }
    if !snapshot.comments.iter().zip(&node.comments).all(|(key, c)| key.matches(c)) {
        return false;
    }

    children.into_iter().zip(&snapshot.children).all(|(child, original)| {
        child
            .loc
            .as_ref()
            .is_some_and(|child_loc| child_loc.id == original.id && child_loc.same_source(loc))
            && is_pristine(child)
    })
}

fn dangling_unchanged(node: &Node, snapshot: &Snapshot) -> bool {
    let original = snapshot.comments.iter().filter(|key| key.placement == Placement::Dangling);
    let current: Vec<_> = node.dangling_comments().collect();

    original.clone().count() == current.len() && original.zip(current).all(|(key, comment)| key.matches(comment))
}

/// Whether the original text wraps `range` in a pair of parentheses
///
/// Call and `if` parentheses count too: either way the parentheses stay
/// in the copied text, so the printed child must not add its own.
fn is_parenthesized(source: &Arc<SourceFile>, range: &Range<usize>) -> bool {
    let before = source.slice(0..range.start).trim_end();
    let after = source.slice(range.end..source.text().len()).trim_start();
    before.ends_with('(') && after.starts_with(')')
}
