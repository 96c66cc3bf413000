//! Generic formatting: print a node from formatting rules alone
//!
//! Children are printed through the continuation, so whatever the
//! dispatcher decides for them (reuse, comments) still applies.

use reprint_common::{ReprintError, ReprintResult};
use reprint_parser::ast::UnaryOperator;
use reprint_parser::{Comment, Node, NodeKind, Quote};
use tracing::trace;

use crate::fast_path::FastPath;
use crate::lines::Lines;
use crate::options::{Options, QuoteStyle};
use crate::patcher::PrintFn;

pub trait GenericFormatter {
    fn format(&self, path: &FastPath<'_>, options: &Options, print: &PrintFn<'_>) -> ReprintResult<Lines>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Formatter;

impl Formatter {
    pub fn new() -> Self {
        Self
    }
}

impl GenericFormatter for Formatter {
    fn format(&self, path: &FastPath<'_>, options: &Options, print: &PrintFn<'_>) -> ReprintResult<Lines> {
        let node = path.node().ok_or(ReprintError::MissingRenderTarget)?;
        trace!(kind = node.kind_name(), "generic format");
        format_node(path, node, options, print)
    }
}

fn format_node<'a>(path: &FastPath<'a>, node: &'a Node, options: &Options, print: &PrintFn<'_>) -> ReprintResult<Lines> {
    let child = |target: &'a Node| print(&path.child(target));

    let lines = match &node.kind {
        NodeKind::Program { body } => {
            let mut lines = if body.is_empty() {
                dangling_comments(node, options)
            } else {
                print_statements(path, body, options, print)?
            };
            if !lines.is_empty() {
                lines.push_str("\n");
            }
            lines
        }

        NodeKind::BlockStatement { body } => {
            let inner = if body.is_empty() {
                dangling_comments(node, options)
            } else {
                print_statements(path, body, options, print)?
            };
            if inner.is_empty() {
                return Ok(Lines::from_text("{}"));
            }
            let mut lines = Lines::from_text("{\n");
            lines.append(inner.indent(options.tab_width, options));
            lines.push_str("\n}");
            lines
        }

        NodeKind::VariableDeclaration { kind, declarations } => {
            let mut lines = Lines::from_text(format!("{} ", kind.as_str()));
            let declarators = declarations.iter().map(child).collect::<ReprintResult<Vec<_>>>()?;
            lines.append(Lines::join(declarators, ", "));
            lines.push_str(";");
            lines
        }

        NodeKind::VariableDeclarator { id, init } => {
            let mut lines = child(id)?;
            if let Some(init) = init {
                lines.push_str(" = ");
                lines.append(child(init)?);
            }
            lines
        }

        NodeKind::FunctionDeclaration { id, params, body } => {
            let mut lines = Lines::from_text("function ");
            lines.append(child(id)?);
            lines.push_str("(");
            let params = params.iter().map(child).collect::<ReprintResult<Vec<_>>>()?;
            lines.append(Lines::join(params, ", "));
            lines.push_str(") ");
            lines.append(child(body)?);
            lines
        }

        NodeKind::ReturnStatement { argument } => {
            let mut lines = Lines::from_text("return");
            if let Some(argument) = argument {
                lines.push_str(" ");
                lines.append(child(argument)?);
            }
            lines.push_str(";");
            lines
        }

        NodeKind::IfStatement {
            test,
            consequent,
            alternate,
        } => {
            let mut lines = Lines::from_text("if (");
            lines.append(child(test)?);
            lines.push_str(") ");
            lines.append(child(consequent)?);
            if let Some(alternate) = alternate {
                lines.push_str(" else ");
                lines.append(child(alternate)?);
            }
            lines
        }

        NodeKind::ExpressionStatement { expression } => {
            let mut lines = child(expression)?;
            lines.push_str(";");
            lines
        }

        NodeKind::Identifier { name } => Lines::from_text(name.clone()),

        NodeKind::NumericLiteral { raw } => Lines::from_text(raw.clone()),

        NodeKind::StringLiteral { value, quote } => Lines::from_text(quote_string(value, *quote, options.quote)),

        NodeKind::UnaryExpression { operator, argument } => {
            let argument = child(argument)?;
            let mut lines = Lines::from_text(operator.as_str());
            // keep `- -x` from turning into a decrement
            if *operator == UnaryOperator::Minus && argument.as_str().starts_with('-') {
                lines.push_str(" ");
            }
            lines.append(argument);
            lines
        }

        NodeKind::BinaryExpression { operator, left, right } => {
            let mut lines = child(left)?;
            lines.push_str(&format!(" {} ", operator.as_str()));
            lines.append(child(right)?);
            lines
        }

        NodeKind::CallExpression { callee, arguments } => {
            let mut lines = child(callee)?;
            let arguments = arguments.iter().map(child).collect::<ReprintResult<Vec<_>>>()?;
            lines.append(print_arguments(lines.len(), arguments, options));
            lines
        }

        NodeKind::MemberExpression { object, property } => {
            let mut lines = child(object)?;
            lines.push_str(".");
            lines.append(child(property)?);
            lines
        }
    };

    if needs_parens(path) && !options.avoid_root_parens {
        return Ok(Lines::concat([Lines::from_text("("), lines, Lines::from_text(")")]));
    }
    Ok(lines)
}

/// Statements one per line, keeping single blank lines from the original
fn print_statements<'a>(
    path: &FastPath<'a>,
    body: &'a [Node],
    options: &Options,
    print: &PrintFn<'_>,
) -> ReprintResult<Lines> {
    let mut lines = Lines::empty();
    let mut previous: Option<&'a Node> = None;

    for statement in body {
        let printed = print(&path.child(statement))?;
        if let Some(previous) = previous {
            lines.push_str(if blank_line_between(previous, statement, options) {
                "\n\n"
            } else {
                "\n"
            });
        }
        lines.append(printed);
        previous = Some(statement);
    }

    Ok(lines)
}

fn blank_line_between(previous: &Node, next: &Node, options: &Options) -> bool {
    if !options.reuse_whitespace {
        return false;
    }
    let (Some(prev_loc), Some(next_loc)) = (&previous.loc, &next.loc) else {
        return false;
    };
    let (Some(prev_range), Some(next_range)) = (previous.full_range(), next.full_range()) else {
        return false;
    };
    if !prev_loc.same_source(next_loc) || prev_range.end > next_range.start {
        return false;
    }

    prev_loc.source.slice(prev_range.end..next_range.start).matches('\n').count() >= 2
}

fn dangling_comments(node: &Node, options: &Options) -> Lines {
    let comments = node.dangling_comments().map(|comment| dangling_comment(comment, options));
    Lines::join(comments, "\n")
}

fn dangling_comment(comment: &Comment, options: &Options) -> Lines {
    match &comment.loc {
        Some(loc) if loc.text() == comment.text() => {
            let indent = loc.source.indent_at(loc.start, options.tab_width);
            Lines::from_source(&loc.source, loc.range()).indent_tail(-(indent as isize), options)
        }
        _ => Lines::from_text(comment.text()),
    }
}

/// `(a, b)`, or one argument per line when that does not fit
fn print_arguments(prefix_len: usize, arguments: Vec<Lines>, options: &Options) -> Lines {
    let flat_len: usize = prefix_len + 2 + arguments.iter().map(|a| a.len() + 2).sum::<usize>();
    let multiline = arguments.iter().any(Lines::is_multiline);

    if arguments.is_empty() || (!multiline && flat_len <= options.wrap_column) {
        let mut lines = Lines::from_text("(");
        lines.append(Lines::join(arguments, ", "));
        lines.push_str(")");
        return lines;
    }

    let mut inner = Lines::join(arguments, ",\n");
    if options.trailing_comma {
        inner.push_str(",");
    }

    let mut lines = Lines::from_text("(\n");
    lines.append(inner.indent(options.tab_width, options));
    lines.push_str("\n)");
    lines
}

/// Whether the node at `path` must be wrapped in parentheses to keep its
/// meaning inside its parent
pub fn needs_parens(path: &FastPath<'_>) -> bool {
    let (Some(node), Some(parent)) = (path.node(), path.parent()) else {
        return false;
    };

    match (&node.kind, &parent.kind) {
        (
            NodeKind::BinaryExpression { operator, .. },
            NodeKind::BinaryExpression {
                operator: parent_operator,
                right,
                ..
            },
        ) => {
            let (precedence, parent_precedence) = (operator.precedence(), parent_operator.precedence());
            parent_precedence > precedence || (parent_precedence == precedence && std::ptr::eq(node, right.as_ref()))
        }
        (NodeKind::BinaryExpression { .. }, NodeKind::UnaryExpression { .. }) => true,
        (
            NodeKind::BinaryExpression { .. } | NodeKind::UnaryExpression { .. },
            NodeKind::MemberExpression { object, .. },
        ) => std::ptr::eq(node, object.as_ref()),
        (
            NodeKind::BinaryExpression { .. } | NodeKind::UnaryExpression { .. },
            NodeKind::CallExpression { callee, .. },
        ) => std::ptr::eq(node, callee.as_ref()),
        _ => false,
    }
}

/// String literal in the requested quote style
///
/// `value` holds the text between the quotes with escapes as written, so
/// switching quotes only touches escapes of the two quote characters.
fn quote_string(value: &str, written: Quote, style: QuoteStyle) -> String {
    let target = match style {
        QuoteStyle::Auto => written,
        QuoteStyle::Single => Quote::Single,
        QuoteStyle::Double => Quote::Double,
    };
    let quote = target.as_char();

    if target == written {
        return format!("{quote}{value}{quote}");
    }

    let old = written.as_char();
    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);

    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some(escaped) if escaped == old => out.push(escaped),
                Some(escaped) => {
                    out.push('\\');
                    out.push(escaped);
                }
                None => out.push('\\'),
            },
            ch if ch == quote => {
                out.push('\\');
                out.push(ch);
            }
            ch => out.push(ch),
        }
    }

    out.push(quote);
    out
}
