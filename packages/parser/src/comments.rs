//! Comment attachment
//!
//! Each comment is pushed down to the innermost node whose range
//! contains it. Among that node's children it then becomes:
//!
//! - trailing on the preceding child when it starts on the line where
//!   that child ends,
//! - otherwise leading on the following child,
//! - otherwise trailing on the preceding child,
//! - and dangling on the enclosing node when it has no children around.

use crate::ast::{Comment, Node, Placement};

pub fn attach_comments(root: &mut Node, comments: Vec<Comment>) {
    for comment in comments {
        attach(root, comment);
    }
}

fn attach(node: &mut Node, mut comment: Comment) {
    let Some(comment_loc) = comment.loc.clone() else {
        node.comments.push(comment.dangling());
        return;
    };

    let mut preceding = None;
    let mut following = None;
    let mut enclosing = None;

    for (index, child) in node.children().into_iter().enumerate() {
        let Some(loc) = &child.loc else {
            continue;
        };

        if loc.start <= comment_loc.start && comment_loc.end <= loc.end {
            enclosing = Some(index);
            break;
        }
        if loc.end <= comment_loc.start {
            preceding = Some((index, loc.end));
        } else if comment_loc.end <= loc.start {
            following = Some(index);
            break;
        }
    }

    if let Some(index) = enclosing {
        if let Some(child) = node.children_mut().into_iter().nth(index) {
            attach(child, comment);
        }
        return;
    }

    let same_line_as_preceding = preceding.is_some_and(|(_, end)| {
        let source = &comment_loc.source;
        !source.slice(end..comment_loc.start).contains('\n')
    });

    let (target, placement) = match (preceding, following) {
        (Some((index, _)), _) if same_line_as_preceding => (Some(index), Placement::Trailing),
        (_, Some(index)) => (Some(index), Placement::Leading),
        (Some((index, _)), None) => (Some(index), Placement::Trailing),
        (None, None) => (None, Placement::Dangling),
    };

    comment.placement = placement;
    match target.and_then(|index| node.children_mut().into_iter().nth(index)) {
        Some(child) => child.comments.push(comment),
        None => node.comments.push(comment),
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::parse;

    fn statements(program: &Node) -> &[Node] {
        match &program.kind {
            NodeKind::Program { body } => body,
            _ => panic!("Expected program"),
        }
    }

    #[test]
    fn test_leading_comment() {
        let program = parse("// greeting\nconst x = 1;\n").expect("Failed to parse");
        let statement = &statements(&program)[0];

        assert_eq!(statement.comments.len(), 1);
        assert_eq!(statement.comments[0].placement, Placement::Leading);
        assert_eq!(statement.comments[0].value, " greeting");
        assert_eq!(statement.full_range(), Some(0..24));
    }

    #[test]
    fn test_trailing_comment_on_same_line() {
        let program = parse("a(); // first\nb();\n").expect("Failed to parse");
        let body = statements(&program);

        assert_eq!(body[0].comments.len(), 1);
        assert_eq!(body[0].comments[0].placement, Placement::Trailing);
        assert!(body[1].comments.is_empty());
    }

    #[test]
    fn test_comment_between_lines_leads_the_next_statement() {
        let program = parse("a();\n/* about b */\nb();\n").expect("Failed to parse");
        let body = statements(&program);

        assert!(body[0].comments.is_empty());
        assert_eq!(body[1].comments[0].kind, CommentKind::Block);
        assert_eq!(body[1].comments[0].placement, Placement::Leading);
    }

    #[test]
    fn test_comment_after_last_statement_trails_it() {
        let program = parse("a();\n// the end\n").expect("Failed to parse");
        let body = statements(&program);

        assert_eq!(body[0].comments[0].placement, Placement::Trailing);
    }

    #[test]
    fn test_comment_inside_nested_block() {
        let program = parse("function f() {\n  // inside\n  g();\n}\n").expect("Failed to parse");

        let NodeKind::FunctionDeclaration { body, .. } = &statements(&program)[0].kind else {
            panic!("Expected function");
        };
        let NodeKind::BlockStatement { body } = &body.kind else {
            panic!("Expected block");
        };
        assert_eq!(body[0].comments[0].value, " inside");
    }

    #[test]
    fn test_dangling_comment_in_empty_block() {
        let program = parse("function f() { /* nothing */ }").expect("Failed to parse");

        let NodeKind::FunctionDeclaration { body, .. } = &statements(&program)[0].kind else {
            panic!("Expected function");
        };
        assert_eq!(body.comments[0].placement, Placement::Dangling);
    }

    #[test]
    fn test_comment_only_program() {
        let program = parse("// nothing here\n").expect("Failed to parse");
        assert_eq!(program.comments[0].placement, Placement::Dangling);
    }
}
