//! Table-driven shift-reduce automaton (§4.4).
//!
//! Drives a frozen [`Table`] over a sequence of terminals until ACCEPT or a
//! fatal [`ParseError`]. This is a generic verifier/demo driver over the
//! tables the generator produces -- it is independent of the hand-written
//! backtracking AST parser, which never goes through a table at all.

use crate::ast::Production;
use crate::error::ParseError;
use crate::symbol::{NonTerminalId, TerminalId};
use crate::table::{Action, Table};

/// One terminal occurrence fed to the automaton: its id plus the byte
/// offset to report in a [`ParseError`].
#[derive(Debug, Clone, Copy)]
pub struct TerminalOccurrence {
    pub terminal: TerminalId,
    pub offset: u32,
}

/// A reduced subtree: the production applied and the popped children, in
/// order, restricted to the symbols each production marked as captured.
#[derive(Debug, Clone)]
pub enum ParseNode {
    Terminal(TerminalId, u32),
    NonTerminal {
        production: usize,
        children: Vec<ParseNode>,
    },
}

/// Run the automaton to completion, returning the root parse node.
pub fn run(
    table: &Table,
    productions: &[Production],
    tokens: &[TerminalOccurrence],
    terminal_name: impl Fn(TerminalId) -> String,
) -> Result<ParseNode, ParseError> {
    // (state, symbol-node) stack; state 0 has no symbol beneath it.
    let mut state_stack: Vec<usize> = vec![0];
    let mut node_stack: Vec<ParseNode> = Vec::new();

    let mut pos = 0usize;
    loop {
        let top = *state_stack.last().unwrap();
        let (terminal, offset) = if pos < tokens.len() {
            (tokens[pos].terminal, tokens[pos].offset)
        } else {
            (crate::symbol::EOF, tokens.last().map_or(0, |t| t.offset))
        };

        match table.action(top, terminal) {
            Some(Action::Shift(next)) => {
                state_stack.push(next);
                node_stack.push(ParseNode::Terminal(terminal, offset));
                pos += 1;
            }
            Some(Action::Reduce(prod_idx)) => {
                let production = &productions[prod_idx];
                let arity = production.rhs.len();
                let mut children = node_stack.split_off(node_stack.len() - arity);
                state_stack.truncate(state_stack.len() - arity);
                // Drop children the production didn't mark for capture.
                if production.captures.len() == children.len() {
                    children = children
                        .into_iter()
                        .zip(&production.captures)
                        .filter(|(_, keep)| **keep)
                        .map(|(child, _)| child)
                        .collect();
                }
                let from_state = *state_stack.last().unwrap();
                let goto_state = table
                    .goto(from_state, production.lhs)
                    .expect("goto table entry missing for reduced non-terminal");
                state_stack.push(goto_state);
                node_stack.push(ParseNode::NonTerminal {
                    production: prod_idx,
                    children,
                });
            }
            Some(Action::Accept) => {
                return Ok(node_stack.pop().expect("accept with empty node stack"));
            }
            None => {
                return Err(ParseError::Reject {
                    state: top,
                    terminal: terminal_name(terminal),
                    offset,
                });
            }
        }
    }
}

/// Resolve the non-terminal an accepted parse reduced to, for callers that
/// want to sanity-check the root shape.
pub fn root_nonterminal(node: &ParseNode, productions: &[Production]) -> Option<NonTerminalId> {
    match node {
        ParseNode::NonTerminal { production, .. } => Some(productions[*production].lhs),
        ParseNode::Terminal(..) => None,
    }
}

