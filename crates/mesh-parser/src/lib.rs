//! Mesh parser: hand-written recursive-descent parser with backtracking.
//!
//! This crate turns a token stream from `mesh-lexer` into a plain AST
//! (§4.2). It is deliberately independent of `mesh-grammar`'s table-driven
//! automaton -- the two exist side by side so the generator's output can
//! be checked against the parser a real compiler ships with, rather than
//! one standing in for the other.

pub mod ast;
pub mod error;
mod expr;
mod stmt;
mod stream;

pub use error::{Rejected, SyntaxError};
pub use stream::Parser;

/// Parse a full module from source text.
///
/// Tokenizes with `mesh_lexer::Scanner`, then drives the recursive-descent
/// grammar from `stmt::module` to the end of the token stream. A
/// `Rejected` that escapes every enclosing `alternative` becomes the
/// returned `SyntaxError`.
pub fn parse(source: &str) -> Result<ast::Module, SyntaxError> {
    let tokens = mesh_lexer::Scanner::tokenize(source);
    let mut parser = Parser::new(&tokens, source);
    stmt::module(&mut parser).map_err(SyntaxError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Constant, ExprKind, StmtKind};

    #[test]
    fn parses_a_minimal_function() {
        let module = parse("def add(a, b):\n    return a + b\n").expect("should parse");
        assert_eq!(module.body.len(), 1);
        match &module.body[0].kind {
            StmtKind::FunctionDef { name, params, body, .. } => {
                assert_eq!(name, "add");
                assert_eq!(params.len(), 2);
                assert_eq!(body.len(), 1);
            }
            other => panic!("expected FunctionDef, got {other:?}"),
        }
    }

    #[test]
    fn parses_if_elif_else_chain() {
        let module = parse("if x:\n    pass\nelif y:\n    pass\nelse:\n    pass\n")
            .expect("should parse");
        match &module.body[0].kind {
            StmtKind::If { orelse, .. } => {
                assert_eq!(orelse.len(), 1);
                match &orelse[0].kind {
                    StmtKind::If { orelse, .. } => assert_eq!(orelse.len(), 1),
                    other => panic!("expected nested If for elif, got {other:?}"),
                }
            }
            other => panic!("expected If, got {other:?}"),
        }
    }

    #[test]
    fn parses_class_with_bases_and_method() {
        let src = "class Point(Base):\n    def dist(self):\n        return self.x\n";
        let module = parse(src).expect("should parse");
        match &module.body[0].kind {
            StmtKind::ClassDef { name, bases, body, .. } => {
                assert_eq!(name, "Point");
                assert_eq!(bases.len(), 1);
                assert_eq!(body.len(), 1);
            }
            other => panic!("expected ClassDef, got {other:?}"),
        }
    }

    #[test]
    fn operator_precedence_climbs_correctly() {
        let module = parse("x = 1 + 2 * 3\n").expect("should parse");
        match &module.body[0].kind {
            StmtKind::Assign { value, .. } => match &value.kind {
                ExprKind::BinaryOp { op, right, .. } => {
                    assert_eq!(*op, ast::Operator::Add);
                    assert!(matches!(right.kind, ExprKind::BinaryOp { op: ast::Operator::Mult, .. }));
                }
                other => panic!("expected top-level Add, got {other:?}"),
            },
            other => panic!("expected Assign, got {other:?}"),
        }
    }

    #[test]
    fn call_with_positional_and_keyword_arguments() {
        let module = parse("f(1, 2, key=3)\n").expect("should parse");
        match &module.body[0].kind {
            StmtKind::Expr(expr) => match &expr.kind {
                ExprKind::Call { args, kwargs, .. } => {
                    assert_eq!(args.len(), 2);
                    assert_eq!(kwargs.len(), 1);
                    assert_eq!(kwargs[0].name.as_deref(), Some("key"));
                }
                other => panic!("expected Call, got {other:?}"),
            },
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn tuple_without_parens_vs_parenthesized_group() {
        let grouped = parse("(1)\n").expect("should parse");
        match &grouped.body[0].kind {
            StmtKind::Expr(expr) => assert!(matches!(expr.kind, ExprKind::Constant(Constant::Int(_)))),
            other => panic!("expected expression statement, got {other:?}"),
        }

        let tuple = parse("(1,)\n").expect("should parse");
        match &tuple.body[0].kind {
            StmtKind::Expr(expr) => match &expr.kind {
                ExprKind::Tuple(elts) => assert_eq!(elts.len(), 1),
                other => panic!("expected Tuple, got {other:?}"),
            },
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn list_comprehension_vs_plain_list() {
        let comp = parse("[x for x in items]\n").expect("should parse");
        match &comp.body[0].kind {
            StmtKind::Expr(expr) => assert!(matches!(expr.kind, ExprKind::ListComp { .. })),
            other => panic!("expected expression statement, got {other:?}"),
        }

        let list = parse("[1, 2, 3]\n").expect("should parse");
        match &list.body[0].kind {
            StmtKind::Expr(expr) => match &expr.kind {
                ExprKind::List(elts) => assert_eq!(elts.len(), 3),
                other => panic!("expected List, got {other:?}"),
            },
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn import_and_from_import() {
        let module = parse("import a.b\nfrom c import d, e\n").expect("should parse");
        assert!(matches!(module.body[0].kind, StmtKind::Import(_)));
        match &module.body[1].kind {
            StmtKind::ImportFrom { module, names } => {
                assert_eq!(module, "c");
                assert_eq!(names.len(), 2);
            }
            other => panic!("expected ImportFrom, got {other:?}"),
        }
    }

    #[test]
    fn missing_colon_after_if_is_rejected() {
        let err = parse("if x\n    pass\n").unwrap_err();
        assert!(err.message.contains("Colon"));
    }

    #[test]
    fn attribute_and_subscript_chain_left_folds() {
        let module = parse("a.b[0].c\n").expect("should parse");
        match &module.body[0].kind {
            StmtKind::Expr(expr) => assert!(matches!(expr.kind, ExprKind::Attribute { .. })),
            other => panic!("expected expression statement, got {other:?}"),
        }
    }
}
