use mesh_parser::ast::{Operator, StmtKind};
use mesh_parser::parse;

#[test]
fn full_function_with_annotations_and_defaults() {
    let src = "def greet(name: str, times: int = 1) -> str:\n    return name\n";
    let module = parse(src).expect("should parse");
    match &module.body[0].kind {
        StmtKind::FunctionDef { params, returns, .. } => {
            assert!(returns.is_some());
            assert_eq!(params.len(), 2);
            assert!(params[0].annotation.is_some());
            assert!(params[1].default.is_some());
        }
        other => panic!("expected FunctionDef, got {other:?}"),
    }
}

#[test]
fn while_loop_with_else_clause() {
    let src = "while x:\n    x = x - 1\nelse:\n    pass\n";
    let module = parse(src).expect("should parse");
    match &module.body[0].kind {
        StmtKind::While { body, orelse, .. } => {
            assert_eq!(body.len(), 1);
            assert_eq!(orelse.len(), 1);
        }
        other => panic!("expected While, got {other:?}"),
    }
}

#[test]
fn for_loop_over_call_result() {
    let src = "for item in items():\n    pass\n";
    let module = parse(src).expect("should parse");
    assert!(matches!(module.body[0].kind, StmtKind::For { .. }));
}

#[test]
fn augmented_assignment_operators() {
    let src = "x += 1\nx -= 1\nx *= 2\nx //= 2\n";
    let module = parse(src).expect("should parse");
    let ops: Vec<Operator> = module
        .body
        .iter()
        .map(|s| match &s.kind {
            StmtKind::AugAssign { op, .. } => *op,
            other => panic!("expected AugAssign, got {other:?}"),
        })
        .collect();
    assert_eq!(
        ops,
        vec![Operator::Add, Operator::Sub, Operator::Mult, Operator::FloorDiv]
    );
}

#[test]
fn annotated_assignment_without_value() {
    let module = parse("count: int\n").expect("should parse");
    match &module.body[0].kind {
        StmtKind::AnnAssign { value, .. } => assert!(value.is_none()),
        other => panic!("expected AnnAssign, got {other:?}"),
    }
}

#[test]
fn chained_comparison_collects_every_comparator() {
    let module = parse("a < b <= c\n").expect("should parse");
    match &module.body[0].kind {
        StmtKind::Expr(expr) => match &expr.kind {
            mesh_parser::ast::ExprKind::Compare { comparators, .. } => {
                assert_eq!(comparators.len(), 2);
            }
            other => panic!("expected Compare, got {other:?}"),
        },
        other => panic!("expected expression statement, got {other:?}"),
    }
}

#[test]
fn nested_function_bodies_track_independent_indentation() {
    let src = "def outer():\n    def inner():\n        return 1\n    return inner\n";
    let module = parse(src).expect("should parse");
    match &module.body[0].kind {
        StmtKind::FunctionDef { body, .. } => {
            assert_eq!(body.len(), 2);
            assert!(matches!(body[0].kind, StmtKind::FunctionDef { .. }));
        }
        other => panic!("expected FunctionDef, got {other:?}"),
    }
}

#[test]
fn dict_and_set_literals_are_distinguished() {
    let dict = parse("{1: 2, 3: 4}\n").expect("should parse");
    match &dict.body[0].kind {
        StmtKind::Expr(expr) => assert!(matches!(expr.kind, mesh_parser::ast::ExprKind::Dict(_))),
        other => panic!("expected expression statement, got {other:?}"),
    }

    let set = parse("{1, 2, 3}\n").expect("should parse");
    match &set.body[0].kind {
        StmtKind::Expr(expr) => assert!(matches!(expr.kind, mesh_parser::ast::ExprKind::Set(_))),
        other => panic!("expected expression statement, got {other:?}"),
    }
}

#[test]
fn decorated_function_definition() {
    let src = "@staticmethod\ndef make():\n    pass\n";
    let module = parse(src).expect("should parse");
    match &module.body[0].kind {
        StmtKind::FunctionDef { decorators, .. } => assert_eq!(decorators.len(), 1),
        other => panic!("expected FunctionDef, got {other:?}"),
    }
}

#[test]
fn unclosed_paren_is_a_syntax_error_not_a_panic() {
    let err = parse("f(1, 2\n").unwrap_err();
    assert!(!err.message.is_empty());
}

#[test]
fn assert_with_a_message_parses_both_expressions() {
    let module = parse("assert x, \"boom\"\n").expect("should parse");
    match &module.body[0].kind {
        StmtKind::Assert { msg: Some(_), .. } => {}
        other => panic!("expected Assert with a message, got {other:?}"),
    }
}

#[test]
fn assert_without_a_message_leaves_it_none() {
    let module = parse("assert x\n").expect("should parse");
    match &module.body[0].kind {
        StmtKind::Assert { msg: None, .. } => {}
        other => panic!("expected Assert with no message, got {other:?}"),
    }
}

#[test]
fn global_collects_every_comma_separated_name() {
    let module = parse("def f():\n    global x, y\n    pass\n").expect("should parse");
    match &module.body[0].kind {
        StmtKind::FunctionDef { body, .. } => match &body[0].kind {
            StmtKind::Global(names) => assert_eq!(names, &["x".to_string(), "y".to_string()]),
            other => panic!("expected Global, got {other:?}"),
        },
        other => panic!("expected FunctionDef, got {other:?}"),
    }
}

#[test]
fn nonlocal_collects_every_comma_separated_name() {
    let module = parse("def f():\n    nonlocal x, y\n    pass\n").expect("should parse");
    match &module.body[0].kind {
        StmtKind::FunctionDef { body, .. } => match &body[0].kind {
            StmtKind::Nonlocal(names) => assert_eq!(names, &["x".to_string(), "y".to_string()]),
            other => panic!("expected Nonlocal, got {other:?}"),
        },
        other => panic!("expected FunctionDef, got {other:?}"),
    }
}

#[test]
fn none_literal_parses_as_a_none_constant() {
    let module = parse("x = None\n").expect("should parse");
    match &module.body[0].kind {
        StmtKind::Assign { value, .. } => assert!(matches!(
            value.kind,
            mesh_parser::ast::ExprKind::Constant(mesh_parser::ast::Constant::None)
        )),
        other => panic!("expected Assign, got {other:?}"),
    }
}

#[test]
fn ellipsis_literal_parses_as_an_ellipsis_constant() {
    let module = parse("x = ...\n").expect("should parse");
    match &module.body[0].kind {
        StmtKind::Assign { value, .. } => assert!(matches!(
            value.kind,
            mesh_parser::ast::ExprKind::Constant(mesh_parser::ast::Constant::Ellipsis)
        )),
        other => panic!("expected Assign, got {other:?}"),
    }
}
