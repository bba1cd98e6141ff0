//! The frozen action/goto table a generator run produces, and its
//! pretty-printer (§4.3 "Table assembly" and "Pretty-printer").

use std::fmt::Write as _;

use crate::symbol::{NonTerminalId, SymbolTable, TerminalId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Shift(usize),
    Reduce(usize),
    Accept,
}

/// A dense action/goto table over `state_count` states.
#[derive(Debug)]
pub struct Table {
    pub state_count: usize,
    /// `actions[state][terminal]`, `None` meaning no entry (a parse error).
    actions: Vec<Vec<Option<Action>>>,
    /// `gotos[state][nonterminal]`.
    gotos: Vec<Vec<Option<usize>>>,
    terminal_count: usize,
    nonterminal_count: usize,
}

impl Table {
    pub fn new(state_count: usize, terminal_count: usize, nonterminal_count: usize) -> Self {
        Self {
            state_count,
            actions: vec![vec![None; terminal_count]; state_count],
            gotos: vec![vec![None; nonterminal_count]; state_count],
            terminal_count,
            nonterminal_count,
        }
    }

    pub fn action(&self, state: usize, terminal: TerminalId) -> Option<Action> {
        self.actions[state][terminal.0 as usize]
    }

    pub fn set_action(&mut self, state: usize, terminal: TerminalId, action: Action) {
        self.actions[state][terminal.0 as usize] = Some(action);
    }

    pub fn goto(&self, state: usize, nonterminal: NonTerminalId) -> Option<usize> {
        self.gotos[state][nonterminal.0 as usize]
    }

    pub fn set_goto(&mut self, state: usize, nonterminal: NonTerminalId, target: usize) {
        self.gotos[state][nonterminal.0 as usize] = Some(target);
    }

    pub fn terminal_count(&self) -> usize {
        self.terminal_count
    }

    pub fn nonterminal_count(&self) -> usize {
        self.nonterminal_count
    }
}

/// Render a frozen table as text: one block per state, SHIFT/REDUCE/ACCEPT
/// keyed by terminal spelling, GOTO keyed by non-terminal name.
pub fn dump_table(table: &Table, symbols: &SymbolTable) -> String {
    let mut out = String::new();
    for state in 0..table.state_count {
        let _ = writeln!(out, "state {state}:");
        for t in 0..table.terminal_count() {
            let Some(action) = table.actions[state][t] else {
                continue;
            };
            let name = symbols.terminal_name(TerminalId(t as u32));
            match action {
                Action::Shift(s) => {
                    let _ = writeln!(out, "  on {name}: shift {s}");
                }
                Action::Reduce(p) => {
                    let _ = writeln!(out, "  on {name}: reduce production {p}");
                }
                Action::Accept => {
                    let _ = writeln!(out, "  on {name}: accept");
                }
            }
        }
        for n in 0..table.nonterminal_count() {
            if let Some(target) = table.gotos[state][n] {
                let name = symbols.nonterminal_name(NonTerminalId(n as u32));
                let _ = writeln!(out, "  goto {name}: {target}");
            }
        }
    }
    out
}
