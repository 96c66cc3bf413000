/// End-to-end tests: parse, modify, print
/// Checks that only the modified parts of a file change and that source
/// maps point back at the right places
use crate::*;
use reprint_parser::{parse, parse_with_path, Node, NodeKind};
use reprint_sourcemap::{to_json_object, SourceMapBuilder};
use serde_json::{json, Value};

fn statements_mut(program: &mut Node) -> &mut Vec<Node> {
    match &mut program.kind {
        NodeKind::Program { body } => body,
        _ => panic!("Expected program"),
    }
}

fn rename_declaration(statement: &mut Node, name: &str) {
    let NodeKind::VariableDeclaration { declarations, .. } = &mut statement.kind else {
        panic!("Expected variable declaration");
    };
    let NodeKind::VariableDeclarator { id, .. } = &mut declarations[0].kind else {
        panic!("Expected declarator");
    };
    id.kind = NodeKind::Identifier { name: name.into() };
}

#[cfg(test)]
mod e2e_tests {
    use super::*;

    #[test]
    fn test_unmodified_program_prints_unchanged() {
        let source = "const x = 1;\n";
        let program = parse(source).expect("Failed to parse");
        let printer = Printer::new(PartialOptions::default()).unwrap();

        assert_eq!(printer.print(Some(&program)).unwrap().code, source);
    }

    #[test]
    fn test_rename_changes_only_the_name() {
        let mut program = parse("const x = 1;\n").expect("Failed to parse");
        rename_declaration(&mut statements_mut(&mut program)[0], "y");
        let printer = Printer::new(PartialOptions::default()).unwrap();

        assert_eq!(printer.print(Some(&program)).unwrap().code, "const y = 1;\n");
    }

    #[test]
    fn test_odd_formatting_elsewhere_survives() {
        let source = "function add(a,b){\n    return a+b;\n}\n\nconst   total = add(1,2);\n";
        let printer = Printer::new(PartialOptions::default()).unwrap();

        let mut renamed = parse(source).expect("Failed to parse");
        rename_declaration(&mut statements_mut(&mut renamed)[1], "sum");
        assert_eq!(
            printer.print(Some(&renamed)).unwrap().code,
            "function add(a,b){\n    return a+b;\n}\n\nconst   sum = add(1,2);\n"
        );

        let mut extended = parse(source).expect("Failed to parse");
        let NodeKind::FunctionDeclaration { body, .. } = &mut statements_mut(&mut extended)[0].kind else {
            panic!("Expected function");
        };
        let NodeKind::BlockStatement { body } = &mut body.kind else {
            panic!("Expected block");
        };
        body.insert(
            0,
            Node::expression_statement(Node::call(Node::identifier("log"), vec![Node::identifier("a")])),
        );
        assert_eq!(
            printer.print(Some(&extended)).unwrap().code,
            "function add(a,b){\n    log(a);\n    return a+b;\n}\n\nconst   total = add(1,2);\n"
        );
    }

    #[test]
    fn test_generic_print_normalizes_everything() {
        let source = "function add(a,b){\n    return a+b;\n}\n\nconst   total = add(1,2);\n";
        let program = parse(source).expect("Failed to parse");
        let printer = Printer::new(PartialOptions::default()).unwrap();

        assert_eq!(
            printer.print_generically(Some(&program)).unwrap().code,
            "function add(a, b) {\n    return a + b;\n}\nconst total = add(1, 2);\n"
        );
    }

    #[test]
    fn test_blank_lines_kept_when_parent_is_reformatted() {
        let mut program = parse("a();\n\nb();\n").expect("Failed to parse");
        statements_mut(&mut program).push(Node::expression_statement(Node::call(Node::identifier("c"), vec![])));
        let printer = Printer::new(PartialOptions::default()).unwrap();

        assert_eq!(printer.print(Some(&program)).unwrap().code, "a();\n\nb();\nc();\n");
    }

    #[test]
    fn test_tree_from_json() {
        let tree: Node = serde_json::from_value(json!({
            "type": "Program",
            "body": [{
                "type": "ExpressionStatement",
                "expression": {
                    "type": "CallExpression",
                    "callee": { "type": "Identifier", "name": "greet" },
                    "arguments": [{ "type": "StringLiteral", "value": "hi", "quote": "single" }]
                }
            }]
        }))
        .expect("Failed to deserialize tree");

        let printer = Printer::new(PartialOptions::from_json(json!({ "quote": "double" })).unwrap()).unwrap();
        assert_eq!(printer.print(Some(&tree)).unwrap().code, "greet(\"hi\");\n");

        let keep = Printer::new(PartialOptions::default()).unwrap();
        assert_eq!(keep.print(Some(&tree)).unwrap().code, "greet('hi');\n");
    }

    #[test]
    fn test_line_terminator_option() {
        let program = parse("a();\nb();\n").expect("Failed to parse");
        let printer = Printer::new(PartialOptions {
            line_terminator: Some("\r\n".into()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(printer.print(Some(&program)).unwrap().code, "a();\r\nb();\r\n");
    }

    #[test]
    fn test_crlf_source_takes_the_configured_terminator() {
        let program = parse("a();\r\nb();\r\n").expect("Failed to parse");

        let default = Printer::new(PartialOptions::default()).unwrap();
        assert_eq!(default.print(Some(&program)).unwrap().code, "a();\nb();\n");

        let crlf = Printer::new(PartialOptions {
            line_terminator: Some("\r\n".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(crlf.print(Some(&program)).unwrap().code, "a();\r\nb();\r\n");
    }

    #[test]
    fn test_source_map_points_at_original_positions() {
        let mut program = parse_with_path("const x = 1;\n", "input.js").expect("Failed to parse");
        rename_declaration(&mut statements_mut(&mut program)[0], "y");

        let printer = Printer::new(PartialOptions {
            source_map_name: Some("output.js".into()),
            ..Default::default()
        })
        .unwrap();
        let result = printer.print(Some(&program)).unwrap();
        assert_eq!(result.code, "const y = 1;\n");

        let map = result.source_map().unwrap().expect("map");
        assert_eq!(map.get_file(), Some("output.js"));

        let token = map.lookup_token(0, 7).expect("token");
        assert_eq!(token.get_source(), Some("input.js"));
        assert_eq!((token.get_src_line(), token.get_src_col()), (0, 7));
    }

    #[test]
    fn test_no_map_without_map_name() {
        let program = parse_with_path("a();\n", "input.js").expect("Failed to parse");
        let printer = Printer::new(PartialOptions::default()).unwrap();
        assert!(printer.print(Some(&program)).unwrap().map.is_none());
    }

    #[test]
    fn test_input_map_is_composed() {
        // input.js was itself generated from original.ts
        let mut builder = SourceMapBuilder::new(Some("input.js"));
        let id = builder.add_source("original.ts", None);
        builder.add_mapping(0, 0, id, 4, 0, None);
        builder.add_mapping(0, 7, id, 4, 12, None);
        let input_map = Value::Object(to_json_object(&builder.build()).unwrap());

        let program = parse_with_path("const x = 1;\n", "input.js").expect("Failed to parse");
        let printer = Printer::new(
            PartialOptions::from_json(json!({
                "sourceMapName": "output.js",
                "inputSourceMap": input_map,
            }))
            .unwrap(),
        )
        .unwrap();

        let result = printer.print(Some(&program)).unwrap();
        let map = result.source_map().unwrap().expect("map");

        let token = map.lookup_token(0, 0).expect("token");
        assert_eq!(token.get_source(), Some("original.ts"));
        assert_eq!((token.get_src_line(), token.get_src_col()), (4, 0));
    }

    #[test]
    fn test_generic_print_has_no_map() {
        let program = parse_with_path("a();\n", "input.js").expect("Failed to parse");
        let printer = Printer::new(PartialOptions {
            source_map_name: Some("output.js".into()),
            ..Default::default()
        })
        .unwrap();

        assert!(printer.print_generically(Some(&program)).unwrap().map.is_none());
    }
}
