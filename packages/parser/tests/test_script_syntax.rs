//! Parses whole scripts the way the printer sees them: locations,
//! comments and operator structure together.

use reprint_parser::ast::{BinaryOperator, DeclarationKind};
use reprint_parser::{parse, parse_with_path, NodeKind, ParseError, Placement, Quote};

fn body(program: &reprint_parser::Node) -> &[reprint_parser::Node] {
    match &program.kind {
        NodeKind::Program { body } => body,
        other => panic!("expected program, got {:?}", other),
    }
}

#[test]
fn test_locations_cover_original_text() {
    let source = r#"const   total = add(1,2);
function add(a, b) {
  return a + b;
}
"#;
    let program = parse(source).unwrap();
    let statements = body(&program);
    assert_eq!(statements.len(), 2);

    assert_eq!(statements[0].loc.as_ref().unwrap().text(), "const   total = add(1,2);");
    assert_eq!(
        statements[1].loc.as_ref().unwrap().text(),
        "function add(a, b) {\n  return a + b;\n}"
    );
}

#[test]
fn test_declaration_kinds() {
    let program = parse("const a = 1; let b; var c = 2, d = 3;").unwrap();
    let kinds: Vec<_> = body(&program)
        .iter()
        .map(|statement| match &statement.kind {
            NodeKind::VariableDeclaration { kind, declarations } => (*kind, declarations.len()),
            other => panic!("expected declaration, got {:?}", other),
        })
        .collect();

    assert_eq!(
        kinds,
        vec![
            (DeclarationKind::Const, 1),
            (DeclarationKind::Let, 1),
            (DeclarationKind::Var, 2),
        ]
    );
}

#[test]
fn test_precedence_and_member_calls() {
    let program = parse("a || b && console.log(x + y * 2);").unwrap();
    let NodeKind::ExpressionStatement { expression } = &body(&program)[0].kind else {
        panic!("expected expression statement");
    };

    let NodeKind::BinaryExpression { operator, right, .. } = &expression.kind else {
        panic!("expected binary expression");
    };
    assert_eq!(*operator, BinaryOperator::Or);

    let NodeKind::BinaryExpression { operator, right, .. } = &right.kind else {
        panic!("expected nested binary expression");
    };
    assert_eq!(*operator, BinaryOperator::And);

    let NodeKind::CallExpression { callee, arguments } = &right.kind else {
        panic!("expected call");
    };
    assert!(matches!(callee.kind, NodeKind::MemberExpression { .. }));
    assert_eq!(arguments.len(), 1);
}

#[test]
fn test_else_if_chain() {
    let source = "if (a) { x(); } else if (b) { y(); } else { z(); }";
    let program = parse(source).unwrap();
    let NodeKind::IfStatement { alternate, .. } = &body(&program)[0].kind else {
        panic!("expected if statement");
    };
    let alternate = alternate.as_ref().unwrap();
    assert!(matches!(alternate.kind, NodeKind::IfStatement { .. }));
}

#[test]
fn test_string_quotes_are_recorded() {
    let program = parse("f('single', \"double\");").unwrap();
    let NodeKind::ExpressionStatement { expression } = &body(&program)[0].kind else {
        panic!("expected expression statement");
    };
    let NodeKind::CallExpression { arguments, .. } = &expression.kind else {
        panic!("expected call");
    };

    let quotes: Vec<_> = arguments
        .iter()
        .map(|argument| match &argument.kind {
            NodeKind::StringLiteral { value, quote } => (value.as_str(), *quote),
            other => panic!("expected string, got {:?}", other),
        })
        .collect();
    assert_eq!(quotes, vec![("single", Quote::Single), ("double", Quote::Double)]);
}

#[test]
fn test_block_comments_inside_expressions() {
    let program = parse("f(/**/ 1);\na();\n/* c */\nb();\n").unwrap();
    let statements = body(&program);
    assert_eq!(statements.len(), 3);

    let NodeKind::ExpressionStatement { expression } = &statements[0].kind else {
        panic!("expected expression statement");
    };
    let NodeKind::CallExpression { callee, .. } = &expression.kind else {
        panic!("expected call");
    };
    let empty: Vec<_> = callee.trailing_comments().map(|c| c.text()).collect();
    assert_eq!(empty, vec!["/**/".to_string()]);

    let leading: Vec<_> = statements[2].leading_comments().map(|c| c.value.clone()).collect();
    assert_eq!(leading, vec![" c ".to_string()]);
}

#[test]
fn test_unterminated_block_comment() {
    let err = parse("a();\n/* open").unwrap_err();
    assert!(matches!(err, ParseError::LexerError { .. }));
}

#[test]
fn test_comments_attach_to_statements() {
    let source = r#"// setup
const a = 1; // one

/* the end */
b();
"#;
    let program = parse(source).unwrap();
    let statements = body(&program);

    let first: Vec<_> = statements[0].comments.iter().map(|c| (c.value.as_str(), c.placement)).collect();
    assert_eq!(first, vec![(" setup", Placement::Leading), (" one", Placement::Trailing)]);

    let second: Vec<_> = statements[1].leading_comments().map(|c| c.text()).collect();
    assert_eq!(second, vec!["/* the end */".to_string()]);

    assert_eq!(statements[0].full_range(), Some(0..28));
}

#[test]
fn test_named_source_and_ids() {
    let program = parse_with_path("x;", "src/main.js").unwrap();
    let loc = program.loc.as_ref().unwrap();
    assert_eq!(loc.source.name(), Some("src/main.js"));

    let statement = body(&program)[0].loc.as_ref().unwrap();
    assert_ne!(loc.id, statement.id);
}

#[test]
fn test_missing_semicolon_is_reported() {
    let err = parse("const a = 1").unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedEof { .. } | ParseError::UnexpectedToken { .. }));
}
