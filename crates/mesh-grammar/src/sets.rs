//! Nullability and FIRST-set fixpoints over a lowered grammar (§4.3).

use rustc_hash::FxHashSet;

use crate::ast::Production;
use crate::symbol::{NonTerminalId, Symbol, SymbolTable, TerminalId};

/// Bitset-by-`FxHashSet` over terminal ids. A real compiler would use a
/// dense bitset; grammars here are small enough that a hash set reads
/// clearer without a measurable cost.
pub type FirstSet = FxHashSet<TerminalId>;

pub struct GrammarSets {
    nullable: Vec<bool>,
    first: Vec<FirstSet>,
}

impl GrammarSets {
    pub fn is_nullable(&self, nt: NonTerminalId) -> bool {
        self.nullable[nt.0 as usize]
    }

    pub fn first_of_nonterminal(&self, nt: NonTerminalId) -> &FirstSet {
        &self.first[nt.0 as usize]
    }

    /// FIRST of a symbol sequence followed by `lookahead` if the whole
    /// sequence is nullable (§4.3 closure rule).
    pub fn first_of_sequence(&self, symbols: &[Symbol], lookahead: &FirstSet) -> FirstSet {
        let mut result = FirstSet::default();
        let mut all_nullable = true;
        for symbol in symbols {
            match symbol {
                Symbol::Terminal(t) => {
                    result.insert(*t);
                    all_nullable = false;
                    break;
                }
                Symbol::NonTerminal(nt) => {
                    result.extend(self.first_of_nonterminal(*nt));
                    if !self.is_nullable(*nt) {
                        all_nullable = false;
                        break;
                    }
                }
            }
        }
        if all_nullable {
            result.extend(lookahead);
        }
        result
    }
}

pub fn compute(symbols: &SymbolTable, productions: &[Production]) -> GrammarSets {
    let n = symbols.nonterminal_count();
    let mut nullable = vec![false; n];
    loop {
        let mut changed = false;
        for prod in productions {
            if nullable[prod.lhs.0 as usize] {
                continue;
            }
            let is_nullable = prod.is_epsilon()
                || prod.rhs.iter().all(|s| match s {
                    Symbol::Terminal(_) => false,
                    Symbol::NonTerminal(nt) => nullable[nt.0 as usize],
                });
            if is_nullable {
                nullable[prod.lhs.0 as usize] = true;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    let mut first = vec![FirstSet::default(); n];
    loop {
        let mut changed = false;
        for prod in productions {
            let lhs = prod.lhs.0 as usize;
            for symbol in &prod.rhs {
                match symbol {
                    Symbol::Terminal(t) => {
                        changed |= first[lhs].insert(*t);
                        break;
                    }
                    Symbol::NonTerminal(nt) => {
                        let addition: Vec<_> = first[nt.0 as usize].iter().copied().collect();
                        for t in addition {
                            changed |= first[lhs].insert(t);
                        }
                        if !nullable[nt.0 as usize] {
                            break;
                        }
                    }
                }
            }
        }
        if !changed {
            break;
        }
    }

    GrammarSets { nullable, first }
}
