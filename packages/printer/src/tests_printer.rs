/// Dispatcher and facade tests
/// Covers mode selection, tab width inference, comment handling and the
/// result wrapper as seen through the printer
use crate::*;
use reprint_common::ReprintError;
use reprint_parser::ast::BinaryOperator;
use reprint_parser::{parse, Node, NodeKind};
use std::sync::{Arc, Mutex};

fn statements_mut(program: &mut Node) -> &mut Vec<Node> {
    match &mut program.kind {
        NodeKind::Program { body } => body,
        _ => panic!("Expected program"),
    }
}

/// Body of the first statement, which must be a function declaration
fn function_body_mut(program: &mut Node) -> &mut Vec<Node> {
    let NodeKind::FunctionDeclaration { body, .. } = &mut statements_mut(program)[0].kind else {
        panic!("Expected function declaration");
    };
    match &mut body.kind {
        NodeKind::BlockStatement { body } => body,
        _ => panic!("Expected block"),
    }
}

/// Initializer of the first declarator of the first statement
fn first_init_mut(program: &mut Node) -> &mut Node {
    let NodeKind::VariableDeclaration { declarations, .. } = &mut statements_mut(program)[0].kind else {
        panic!("Expected variable declaration");
    };
    match &mut declarations[0].kind {
        NodeKind::VariableDeclarator { init: Some(init), .. } => init,
        _ => panic!("Expected initializer"),
    }
}

fn rename_first_declaration(program: &mut Node, name: &str) {
    let NodeKind::VariableDeclaration { declarations, .. } = &mut statements_mut(program)[0].kind else {
        panic!("Expected variable declaration");
    };
    let NodeKind::VariableDeclarator { id, .. } = &mut declarations[0].kind else {
        panic!("Expected declarator");
    };
    id.kind = NodeKind::Identifier { name: name.into() };
}

fn call_statement(callee: &str) -> Node {
    Node::expression_statement(Node::call(Node::identifier(callee), vec![]))
}

fn printer() -> Printer {
    Printer::new(PartialOptions::default()).expect("Failed to create printer")
}

#[cfg(test)]
mod printer_tests {
    use super::*;

    #[test]
    fn test_absent_input_returns_shared_empty_result() {
        let printer = printer();

        let preserved = printer.print(None).unwrap();
        let generic = printer.print_generically(None).unwrap();
        let again = printer.print(None).unwrap();

        assert_eq!(preserved.code, "");
        assert!(preserved.map.is_none());
        assert!(Arc::ptr_eq(&preserved, &generic));
        assert!(Arc::ptr_eq(&preserved, &again));
    }

    #[test]
    fn test_modes_diverge_on_untouched_tree() {
        let source = "const   x=1;\n";
        let program = parse(source).expect("Failed to parse");
        let printer = printer();

        assert_eq!(printer.print(Some(&program)).unwrap().code, source);
        assert_eq!(printer.print_generically(Some(&program)).unwrap().code, "const x = 1;\n");
    }

    #[test]
    fn test_inferred_tab_width_is_used_and_restored() {
        let printer = printer();
        assert_eq!(printer.config().tab_width, 4);

        let mut two = parse("function f() {\n  a();\n}\n").expect("Failed to parse");
        function_body_mut(&mut two).push(call_statement("b"));
        assert_eq!(
            printer.print(Some(&two)).unwrap().code,
            "function f() {\n  a();\n  b();\n}\n"
        );
        assert_eq!(printer.config().tab_width, 4);

        let mut three = parse("function g() {\n   a();\n}\n").expect("Failed to parse");
        function_body_mut(&mut three).push(call_statement("b"));
        assert_eq!(
            printer.print(Some(&three)).unwrap().code,
            "function g() {\n   a();\n   b();\n}\n"
        );
        assert_eq!(printer.config().tab_width, 4);
    }

    /// `if (x) { g(); }` inside a tab-indented function, with `h();`
    /// added to the `if` block
    fn tabbed_program_with_new_call() -> Node {
        let mut program = parse("function f() {\n\tif (x) {\n\t\tg();\n\t}\n}\n").expect("Failed to parse");
        let NodeKind::IfStatement { consequent, .. } = &mut function_body_mut(&mut program)[0].kind else {
            panic!("Expected if statement");
        };
        match &mut consequent.kind {
            NodeKind::BlockStatement { body } => body.push(call_statement("h")),
            _ => panic!("Expected block"),
        }
        program
    }

    #[test]
    fn test_inferred_tabs_are_used_and_restored() {
        let printer = printer();
        let program = tabbed_program_with_new_call();

        assert_eq!(
            printer.print(Some(&program)).unwrap().code,
            "function f() {\n\tif (x) {\n\t\tg();\n\t\th();\n\t}\n}\n"
        );
        assert!(!printer.config().use_tabs);
        assert_eq!(printer.config().tab_width, 4);
    }

    #[test]
    fn test_explicit_use_tabs_wins_over_inference() {
        let printer = Printer::new(PartialOptions {
            use_tabs: Some(false),
            ..Default::default()
        })
        .unwrap();
        let program = tabbed_program_with_new_call();

        assert_eq!(
            printer.print(Some(&program)).unwrap().code,
            "function f() {\n\tif (x) {\n        g();\n        h();\n    }\n}\n"
        );
    }

    #[test]
    fn test_explicit_tab_width_wins_over_inference() {
        let printer = Printer::new(PartialOptions {
            tab_width: Some(4),
            ..Default::default()
        })
        .unwrap();

        let mut program = parse("function f() {\n  a();\n}\n").expect("Failed to parse");
        function_body_mut(&mut program).push(call_statement("b"));

        assert_eq!(
            printer.print(Some(&program)).unwrap().code,
            "function f() {\n    a();\n    b();\n}\n"
        );
    }

    #[test]
    fn test_generic_mode_does_not_infer_tab_width() {
        let program = parse("function f() {\n  a();\n}\n").expect("Failed to parse");
        let printer = printer();

        assert_eq!(
            printer.print_generically(Some(&program)).unwrap().code,
            "function f() {\n    a();\n}\n"
        );
        assert!(printer.config().reuse_whitespace);
    }

    #[test]
    fn test_leading_comment_printed_once() {
        let mut program = parse("// greeting\nconst x = 1;\n").expect("Failed to parse");
        rename_first_declaration(&mut program, "y");
        let printer = printer();

        let preserved = printer.print(Some(&program)).unwrap();
        assert_eq!(preserved.code, "// greeting\nconst y = 1;\n");
        assert_eq!(preserved.code.matches("greeting").count(), 1);

        let generic = printer.print_generically(Some(&program)).unwrap();
        assert_eq!(generic.code, "// greeting\nconst y = 1;\n");
    }

    #[test]
    fn test_block_comment_printed_once() {
        let mut program = parse("a();\n/* c */\nb();\n").expect("Failed to parse");
        statements_mut(&mut program)[0] = call_statement("z");
        let printer = printer();

        let preserved = printer.print(Some(&program)).unwrap();
        assert_eq!(preserved.code, "z();\n/* c */\nb();\n");
        assert_eq!(preserved.code.matches("/* c */").count(), 1);

        let generic = printer.print_generically(Some(&program)).unwrap();
        assert_eq!(generic.code, "z();\n/* c */\nb();\n");
        assert_eq!(generic.code.matches("/* c */").count(), 1);
    }

    #[test]
    fn test_trailing_comment_survives_reformatted_parent() {
        let mut program = parse("a(); // first\n").expect("Failed to parse");
        statements_mut(&mut program).push(call_statement("b"));

        assert_eq!(printer().print(Some(&program)).unwrap().code, "a(); // first\nb();\n");
    }

    #[test]
    fn test_comment_added_to_hand_built_node() {
        let mut program = parse("a();\n").expect("Failed to parse");
        statements_mut(&mut program).push(call_statement("b").with_comment(reprint_parser::Comment::line(" new")));

        assert_eq!(printer().print(Some(&program)).unwrap().code, "a();\n// new\nb();\n");
    }

    #[test]
    fn test_original_parentheses_are_not_doubled() {
        let mut program = parse("const x = (a + b) * c;\n").expect("Failed to parse");
        let NodeKind::BinaryExpression { left, .. } = &mut first_init_mut(&mut program).kind else {
            panic!("Expected binary expression");
        };
        **left = Node::binary(BinaryOperator::Subtract, Node::identifier("a"), Node::identifier("b"));

        assert_eq!(printer().print(Some(&program)).unwrap().code, "const x = (a - b) * c;\n");
    }

    #[test]
    fn test_replacement_gets_parentheses_it_needs() {
        let mut program = parse("const x = a * c;\n").expect("Failed to parse");
        let NodeKind::BinaryExpression { right, .. } = &mut first_init_mut(&mut program).kind else {
            panic!("Expected binary expression");
        };
        **right = Node::binary(BinaryOperator::Add, Node::identifier("c"), Node::identifier("d"));

        assert_eq!(printer().print(Some(&program)).unwrap().code, "const x = a * (c + d);\n");
    }

    #[test]
    fn test_missing_render_target() {
        let printer = printer();
        let err = printer
            .print_path(&FastPath::default(), PrintOptions::root(), RenderMode::Preserve)
            .unwrap_err();
        assert!(matches!(err, ReprintError::MissingRenderTarget));
    }

    #[test]
    fn test_string_form_notifies_once() {
        let messages = Arc::new(Mutex::new(Vec::<String>::new()));
        let sink = Arc::clone(&messages);
        let notice = Arc::new(DeprecationNotice::new(move |message| {
            sink.lock().unwrap().push(message.to_string())
        }));
        let printer = printer().with_deprecation_notice(notice);

        let first = printer.print(Some(&parse("a;\n").unwrap())).unwrap();
        let second = printer.print_generically(Some(&parse("b;\n").unwrap())).unwrap();

        assert_eq!(format!("{}", first), "a;\n");
        assert_eq!(format!("{}", second), "b;\n");
        assert_eq!(messages.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_custom_formatter_is_used_for_new_nodes() {
        struct Shouting;

        impl GenericFormatter for Shouting {
            fn format(&self, path: &FastPath<'_>, options: &Options, print: &PrintFn<'_>) -> reprint_common::ReprintResult<Lines> {
                match path.node().map(|node| &node.kind) {
                    Some(NodeKind::Identifier { name }) => Ok(Lines::from_text(name.to_uppercase())),
                    _ => Formatter.format(path, options, print),
                }
            }
        }

        let mut program = parse("const x = 1;\n").expect("Failed to parse");
        rename_first_declaration(&mut program, "y");

        let printer = printer().with_formatter(Shouting);
        assert_eq!(printer.print(Some(&program)).unwrap().code, "const Y = 1;\n");
    }
}
