//! Canonical LR(1) item-set construction and table assembly (§4.3).

use std::collections::BTreeMap;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::ast::{LoweredGrammar, Production};
use crate::error::GeneratorError;
use crate::sets::{self, FirstSet, GrammarSets};
use crate::symbol::{self, Symbol, SymbolTable, TerminalId};
use crate::table::{Action, Table};

/// `(production index, dot position)`.
type Item = (usize, usize);

/// The closure of a state: items mapped to their lookahead sets, in a
/// canonical (sorted) order so two states with the same content compare
/// equal regardless of construction order.
type ItemSet = BTreeMap<Item, FirstSet>;

fn canonical_key(items: &ItemSet) -> Vec<(usize, usize, Vec<u32>)> {
    items
        .iter()
        .map(|((p, d), la)| {
            let mut sorted: Vec<u32> = la.iter().map(|t| t.0).collect();
            sorted.sort_unstable();
            (*p, *d, sorted)
        })
        .collect()
}

fn closure(
    mut items: ItemSet,
    productions: &[Production],
    sets: &GrammarSets,
) -> ItemSet {
    loop {
        let mut additions: Vec<(Item, TerminalId)> = Vec::new();
        for ((prod_idx, dot), lookaheads) in items.iter() {
            let production = &productions[*prod_idx];
            if *dot >= production.rhs.len() {
                continue;
            }
            let Symbol::NonTerminal(nt) = production.rhs[*dot] else {
                continue;
            };
            let beta = &production.rhs[dot + 1..];
            for (j, candidate) in productions.iter().enumerate() {
                if candidate.lhs != nt {
                    continue;
                }
                for la in lookaheads {
                    let mut singleton = FirstSet::default();
                    singleton.insert(*la);
                    let new_la = sets.first_of_sequence(beta, &singleton);
                    for t in new_la {
                        additions.push(((j, 0), t));
                    }
                }
            }
        }
        let mut changed = false;
        for (item, terminal) in additions {
            changed |= items.entry(item).or_default().insert(terminal);
        }
        if !changed {
            return items;
        }
    }
}

fn goto(items: &ItemSet, symbol: Symbol, productions: &[Production], sets: &GrammarSets) -> ItemSet {
    let mut kernel = ItemSet::new();
    for ((prod_idx, dot), lookaheads) in items {
        let production = &productions[*prod_idx];
        if *dot < production.rhs.len() && production.rhs[*dot] == symbol {
            kernel
                .entry((*prod_idx, dot + 1))
                .or_default()
                .extend(lookaheads.iter().copied());
        }
    }
    closure(kernel, productions, sets)
}

fn symbols_after_dot(items: &ItemSet, productions: &[Production]) -> Vec<Symbol> {
    let mut seen = FxHashSet::default();
    let mut out = Vec::new();
    for (prod_idx, dot) in items.keys() {
        let production = &productions[*prod_idx];
        if *dot < production.rhs.len() {
            let s = production.rhs[*dot];
            if seen.insert(s) {
                out.push(s);
            }
        }
    }
    out
}

/// Build the canonical collection of LR(1) states and assemble the
/// action/goto table. Returns a [`GeneratorError`] on any fatal conflict,
/// dead state, or ambiguous entry point (§4.3 "Failure model").
pub fn build(grammar: &LoweredGrammar) -> Result<Table, GeneratorError> {
    if grammar.entry_rule_count > 1 {
        return Err(GeneratorError::AmbiguousEntry {
            name: grammar.symbols.nonterminal_name(grammar.entry).to_string(),
        });
    }

    let sets = sets::compute(&grammar.symbols, &grammar.productions);

    let mut start_lookahead = FirstSet::default();
    start_lookahead.insert(symbol::EOF);
    let mut start_kernel = ItemSet::new();
    start_kernel.insert((grammar.start_production, 0), start_lookahead);
    let start_state = closure(start_kernel, &grammar.productions, &sets);

    let mut states: Vec<ItemSet> = vec![start_state.clone()];
    let mut index: FxHashMap<Vec<(usize, usize, Vec<u32>)>, usize> = FxHashMap::default();
    index.insert(canonical_key(&start_state), 0);

    let mut out_edges: FxHashMap<usize, Vec<(Symbol, usize)>> = FxHashMap::default();

    let mut worklist = vec![0usize];
    while let Some(state_idx) = worklist.pop() {
        let symbols_to_try = symbols_after_dot(&states[state_idx], &grammar.productions);
        for symbol in symbols_to_try {
            let next = goto(&states[state_idx], symbol, &grammar.productions, &sets);
            if next.is_empty() {
                continue;
            }
            let key = canonical_key(&next);
            let target = if let Some(existing) = index.get(&key) {
                *existing
            } else {
                let id = states.len();
                states.push(next);
                index.insert(key, id);
                worklist.push(id);
                id
            };
            out_edges.entry(state_idx).or_default().push((symbol, target));
        }
    }

    let mut table = Table::new(
        states.len(),
        grammar.symbols.terminal_count(),
        grammar.symbols.nonterminal_count(),
    );

    for (state_idx, items) in states.iter().enumerate() {
        let mut has_action = false;

        for ((prod_idx, dot), lookaheads) in items {
            let production = &grammar.productions[*prod_idx];
            if *dot < production.rhs.len() {
                continue;
            }
            has_action = true;
            if *prod_idx == grammar.start_production {
                set_action(&mut table, state_idx, symbol::EOF, Action::Accept, &grammar.symbols)?;
                continue;
            }
            for terminal in lookaheads {
                set_action(&mut table, state_idx, *terminal, Action::Reduce(*prod_idx), &grammar.symbols)?;
            }
        }

        for &(symbol, target) in out_edges.get(&state_idx).into_iter().flatten() {
            match symbol {
                Symbol::Terminal(t) => {
                    has_action = true;
                    set_action(&mut table, state_idx, t, Action::Shift(target), &grammar.symbols)?;
                }
                Symbol::NonTerminal(nt) => {
                    table.set_goto(state_idx, nt, target);
                }
            }
        }

        if !has_action {
            return Err(GeneratorError::DeadState { state: state_idx });
        }
    }

    Ok(table)
}

/// Record `action` at `(state, terminal)`, resolving a conflict against any
/// existing entry. Shift wins over an existing reduce (recoverable); every
/// other mismatch (reduce/reduce, shift/shift to different targets,
/// anything clashing with accept) is fatal (§4.3 "Conflicts").
fn set_action(
    table: &mut Table,
    state: usize,
    terminal: TerminalId,
    action: Action,
    symbols: &SymbolTable,
) -> Result<(), GeneratorError> {
    match table.action(state, terminal) {
        None => {
            table.set_action(state, terminal, action);
            Ok(())
        }
        Some(existing) if existing == action => Ok(()),
        Some(Action::Reduce(_)) if matches!(action, Action::Shift(_)) => {
            table.set_action(state, terminal, action);
            Ok(())
        }
        Some(Action::Shift(_)) if matches!(action, Action::Reduce(_)) => Ok(()),
        Some(existing) => Err(GeneratorError::Conflict {
            state,
            terminal: symbols.terminal_name(terminal).to_string(),
            existing: describe(existing),
            incoming: describe(action),
        }),
    }
}

fn describe(action: Action) -> String {
    match action {
        Action::Shift(s) => format!("shift {s}"),
        Action::Reduce(p) => format!("reduce {p}"),
        Action::Accept => "accept".to_string(),
    }
}
