//! LR(1) parser table generator and table-driven automaton (§4.3, §4.4).
//!
//! A grammar author builds a [`Grammar`] out of [`GrammarExpr`] trees,
//! [`lower`] desugars it into flat [`Production`]s over interned symbols,
//! and [`lr1::build`] computes the canonical collection and assembles a
//! frozen [`Table`]. [`runtime::run`] then drives that table over a token
//! stream to produce a parse tree, independent of the hand-written
//! backtracking parser in `mesh-parser`.

pub mod ast;
pub mod error;
pub mod lr1;
pub mod runtime;
pub mod sets;
pub mod symbol;
pub mod table;
pub mod text;

pub use ast::{lower, Grammar, GrammarExpr, LoweredGrammar, Production, Rule};
pub use error::{GeneratorError, ParseError};
pub use lr1::build;
pub use runtime::{run, ParseNode, TerminalOccurrence};
pub use symbol::{NonTerminalId, Symbol, SymbolTable, TerminalId, EOF};
pub use table::{dump_table, Action, Table};
pub use text::TextFormatError;

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_common::TokenKind;

    fn arithmetic_grammar() -> Grammar {
        Grammar {
            rules: vec![
                Rule {
                    name: "expr".to_string(),
                    body: GrammarExpr::Alternative(vec![
                        GrammarExpr::Sequence(vec![
                            GrammarExpr::Rule("expr".to_string()),
                            GrammarExpr::Literal(TokenKind::Plus),
                            GrammarExpr::Rule("term".to_string()),
                        ]),
                        GrammarExpr::Rule("term".to_string()),
                    ]),
                },
                Rule {
                    name: "term".to_string(),
                    body: GrammarExpr::Alternative(vec![
                        GrammarExpr::Sequence(vec![
                            GrammarExpr::Rule("term".to_string()),
                            GrammarExpr::Literal(TokenKind::Star),
                            GrammarExpr::Rule("factor".to_string()),
                        ]),
                        GrammarExpr::Rule("factor".to_string()),
                    ]),
                },
                Rule {
                    name: "factor".to_string(),
                    body: GrammarExpr::Alternative(vec![
                        GrammarExpr::Sequence(vec![
                            GrammarExpr::Literal(TokenKind::OpenParen),
                            GrammarExpr::Rule("expr".to_string()),
                            GrammarExpr::Literal(TokenKind::CloseParen),
                        ]),
                        GrammarExpr::Literal(TokenKind::Identifier),
                    ]),
                },
            ],
            entry: "expr".to_string(),
        }
    }

    #[test]
    fn builds_a_table_without_conflicts() {
        let grammar = lower(&arithmetic_grammar());
        let table = build(&grammar).expect("classic expression grammar should be LR(1)");
        assert!(table.state_count > 0);
    }

    #[test]
    fn accepts_a_valid_expression() {
        let grammar = lower(&arithmetic_grammar());
        let table = build(&grammar).unwrap();

        let id = grammar.symbols.lookup_terminal("Identifier").expect("Identifier terminal interned");
        let plus = grammar.symbols.lookup_terminal("Plus").expect("Plus terminal interned");
        let star = grammar.symbols.lookup_terminal("Star").expect("Star terminal interned");

        // id + id * id
        let tokens: Vec<TerminalOccurrence> = [id, plus, id, star, id]
            .into_iter()
            .enumerate()
            .map(|(i, t)| TerminalOccurrence {
                terminal: t,
                offset: i as u32,
            })
            .collect();

        let result = run(&table, &grammar.productions, &tokens, |t| {
            grammar.symbols.terminal_name(t).to_string()
        });
        assert!(result.is_ok(), "expected accept, got {result:?}");
    }

    #[test]
    fn rejects_a_dangling_operator() {
        let grammar = lower(&arithmetic_grammar());
        let table = build(&grammar).unwrap();
        let id = grammar.symbols.lookup_terminal("Identifier").expect("Identifier terminal interned");
        let plus = grammar.symbols.lookup_terminal("Plus").expect("Plus terminal interned");

        // id +   (missing right operand)
        let tokens = vec![
            TerminalOccurrence { terminal: id, offset: 0 },
            TerminalOccurrence { terminal: plus, offset: 1 },
        ];
        let result = run(&table, &grammar.productions, &tokens, |t| {
            grammar.symbols.terminal_name(t).to_string()
        });
        assert!(result.is_err());
    }

    #[test]
    fn ambiguous_entry_point_is_rejected() {
        // Two rules declaring the same name is a malformed grammar
        // description -- distinct from one rule whose body legitimately
        // has several alternatives (like `expr` in `arithmetic_grammar`).
        let grammar = Grammar {
            rules: vec![
                Rule { name: "start".to_string(), body: GrammarExpr::Literal(TokenKind::Identifier) },
                Rule { name: "start".to_string(), body: GrammarExpr::Literal(TokenKind::Number) },
            ],
            entry: "start".to_string(),
        };
        let lowered = lower(&grammar);
        let err = build(&lowered).unwrap_err();
        assert!(matches!(err, GeneratorError::AmbiguousEntry { .. }));
    }

    #[test]
    fn dump_table_lists_every_state() {
        let grammar = lower(&arithmetic_grammar());
        let table = build(&grammar).unwrap();
        let text = dump_table(&table, &grammar.symbols);
        for state in 0..table.state_count {
            assert!(text.contains(&format!("state {state}:")));
        }
    }
}
