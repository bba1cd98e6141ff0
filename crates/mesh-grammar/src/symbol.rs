//! Interned grammar symbols (terminals and non-terminals).
//!
//! Everything downstream -- nullability, FIRST sets, item construction --
//! works over small dense integer ids rather than strings, so the symbol
//! table is the one place names get resolved.

use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TerminalId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NonTerminalId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    Terminal(TerminalId),
    NonTerminal(NonTerminalId),
}

impl Symbol {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }
}

/// Interning table for a grammar's terminal and non-terminal vocabulary.
///
/// Terminal id `0` is reserved for the end-of-input marker (`$`), which
/// every grammar gets implicitly; it never appears on the rhs of a written
/// production, only as the lookahead of the accepting state.
#[derive(Debug, Default)]
pub struct SymbolTable {
    terminal_names: Vec<String>,
    terminal_ids: FxHashMap<String, TerminalId>,
    nonterminal_names: Vec<String>,
    nonterminal_ids: FxHashMap<String, NonTerminalId>,
}

pub const EOF: TerminalId = TerminalId(0);

impl SymbolTable {
    pub fn new() -> Self {
        let mut table = Self::default();
        table.terminal_names.push("$".to_string());
        table.terminal_ids.insert("$".to_string(), EOF);
        table
    }

    pub fn intern_terminal(&mut self, name: &str) -> TerminalId {
        if let Some(id) = self.terminal_ids.get(name) {
            return *id;
        }
        let id = TerminalId(self.terminal_names.len() as u32);
        self.terminal_names.push(name.to_string());
        self.terminal_ids.insert(name.to_string(), id);
        id
    }

    pub fn intern_nonterminal(&mut self, name: &str) -> NonTerminalId {
        if let Some(id) = self.nonterminal_ids.get(name) {
            return *id;
        }
        let id = NonTerminalId(self.nonterminal_names.len() as u32);
        self.nonterminal_names.push(name.to_string());
        self.nonterminal_ids.insert(name.to_string(), id);
        id
    }

    /// Allocate a fresh non-terminal name for a desugared star/plus/optional/
    /// alternative helper, guaranteed not to collide with a user-written name.
    pub fn fresh_nonterminal(&mut self, hint: &str) -> NonTerminalId {
        let mut candidate = format!("{hint}$");
        let mut n = 0u32;
        while self.nonterminal_ids.contains_key(&candidate) {
            n += 1;
            candidate = format!("{hint}${n}");
        }
        self.intern_nonterminal(&candidate)
    }

    pub fn terminal_count(&self) -> usize {
        self.terminal_names.len()
    }

    pub fn nonterminal_count(&self) -> usize {
        self.nonterminal_names.len()
    }

    pub fn terminal_name(&self, id: TerminalId) -> &str {
        &self.terminal_names[id.0 as usize]
    }

    pub fn nonterminal_name(&self, id: NonTerminalId) -> &str {
        &self.nonterminal_names[id.0 as usize]
    }

    pub fn lookup_nonterminal(&self, name: &str) -> Option<NonTerminalId> {
        self.nonterminal_ids.get(name).copied()
    }

    pub fn lookup_terminal(&self, name: &str) -> Option<TerminalId> {
        self.terminal_ids.get(name).copied()
    }
}
