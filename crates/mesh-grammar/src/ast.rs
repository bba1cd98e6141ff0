//! Grammar description AST and its desugaring into bare productions.
//!
//! A [`GrammarExpr`] is what a grammar author writes: sequences,
//! alternatives, and the usual `?`/`*`/`+` repetition operators, plus a
//! capture marker for symbols that should surface as AST children. Before
//! any set or table can be computed, every expression tree is lowered to a
//! flat list of [`Production`]s over interned [`Symbol`]s -- the only form
//! the rest of the generator understands.

use mesh_common::{KeywordKind, TokenKind};

use crate::symbol::{NonTerminalId, Symbol, SymbolTable};

/// A grammar author's rule tree, as read from a `gen-tables` grammar file
/// (§6's line-oriented text format, via [`crate::text::parse`]) or built
/// directly in code, as the generator's own tests do.
#[derive(Debug, Clone)]
pub enum GrammarExpr {
    /// A fixed token kind, e.g. `COLON`.
    Literal(TokenKind),
    /// A fixed keyword, e.g. `if`.
    Keyword(KeywordKind),
    /// A reference to another rule by name.
    Rule(String),
    Sequence(Vec<GrammarExpr>),
    Alternative(Vec<GrammarExpr>),
    Optional(Box<GrammarExpr>),
    Star(Box<GrammarExpr>),
    Plus(Box<GrammarExpr>),
    /// Marks the wrapped symbol as one that should be captured as an AST child.
    Capture(Box<GrammarExpr>),
}

#[derive(Debug, Clone)]
pub struct Rule {
    pub name: String,
    pub body: GrammarExpr,
}

#[derive(Debug, Clone)]
pub struct Grammar {
    pub rules: Vec<Rule>,
    pub entry: String,
}

/// One grammar production after lowering: `lhs -> rhs`, with a capture bit
/// running parallel to `rhs` recording which symbols should be retained in
/// the parse tree (§4.3: "uninlined-captured").
#[derive(Debug, Clone)]
pub struct Production {
    pub lhs: NonTerminalId,
    pub rhs: Vec<Symbol>,
    pub captures: Vec<bool>,
}

impl Production {
    pub fn is_epsilon(&self) -> bool {
        self.rhs.is_empty()
    }
}

pub struct LoweredGrammar {
    pub symbols: SymbolTable,
    pub productions: Vec<Production>,
    /// Index of the synthesized top-level production `S' -> entry`.
    pub start_production: usize,
    /// The synthesized top-level non-terminal `S'`.
    pub start: NonTerminalId,
    /// The grammar author's named entry-point rule.
    pub entry: NonTerminalId,
    /// How many `Rule`s in the source grammar declared `entry`'s name.
    /// Exactly one is expected; a rule's body having several alternatives
    /// (one `Rule`, many lowered productions) is normal and not ambiguity
    /// -- two separate `Rule`s claiming the same name is (§4.3 "Failure
    /// model": this is what `AmbiguousEntry` actually reports).
    pub entry_rule_count: usize,
}

/// Lower every rule in `grammar` to flat productions, desugaring star/plus/
/// optional/alternative into fresh helper non-terminals (§4.3).
pub fn lower(grammar: &Grammar) -> LoweredGrammar {
    let mut symbols = SymbolTable::new();
    let mut productions = Vec::new();

    for rule in &grammar.rules {
        symbols.intern_nonterminal(&rule.name);
    }

    for rule in &grammar.rules {
        let lhs = symbols.intern_nonterminal(&rule.name);
        lower_into(&rule.body, lhs, &rule.name, &mut symbols, &mut productions, false);
    }

    let entry = symbols
        .lookup_nonterminal(&grammar.entry)
        .unwrap_or_else(|| symbols.intern_nonterminal(&grammar.entry));
    let entry_rule_count = grammar.rules.iter().filter(|r| r.name == grammar.entry).count();

    let start_lhs = symbols.fresh_nonterminal("start");
    let start_production = productions.len();
    productions.push(Production {
        lhs: start_lhs,
        rhs: vec![Symbol::NonTerminal(entry)],
        captures: vec![true],
    });

    LoweredGrammar {
        symbols,
        productions,
        start_production,
        start: start_lhs,
        entry,
        entry_rule_count,
    }
}

/// Lower `expr` as one of the alternatives of `lhs`, emitting whatever
/// productions and helper non-terminals it needs. `captured` tracks whether
/// the enclosing context wants this expression's result captured.
fn lower_into(
    expr: &GrammarExpr,
    lhs: NonTerminalId,
    hint: &str,
    symbols: &mut SymbolTable,
    productions: &mut Vec<Production>,
    captured: bool,
) {
    match expr {
        GrammarExpr::Sequence(parts) => {
            let mut rhs = Vec::with_capacity(parts.len());
            let mut captures = Vec::with_capacity(parts.len());
            for part in parts {
                let (symbol, cap) = lower_symbol(part, hint, symbols, productions);
                rhs.push(symbol);
                captures.push(cap);
            }
            productions.push(Production { lhs, rhs, captures });
        }
        GrammarExpr::Alternative(alts) => {
            for alt in alts {
                lower_into(alt, lhs, hint, symbols, productions, captured);
            }
        }
        _ => {
            let (symbol, cap) = lower_symbol(expr, hint, symbols, productions);
            productions.push(Production {
                lhs,
                rhs: vec![symbol],
                captures: vec![cap],
            });
        }
    }
}

/// Lower `expr` to a single symbol usable on a production's rhs, creating a
/// fresh helper non-terminal (and its productions) when `expr` is not
/// already a plain literal/keyword/rule reference.
fn lower_symbol(
    expr: &GrammarExpr,
    hint: &str,
    symbols: &mut SymbolTable,
    productions: &mut Vec<Production>,
) -> (Symbol, bool) {
    match expr {
        GrammarExpr::Literal(kind) => {
            let id = symbols.intern_terminal(&format!("{kind:?}"));
            (Symbol::Terminal(id), false)
        }
        GrammarExpr::Keyword(kw) => {
            let id = symbols.intern_terminal(&format!("kw:{kw:?}"));
            (Symbol::Terminal(id), false)
        }
        GrammarExpr::Rule(name) => {
            let id = symbols.intern_nonterminal(name);
            (Symbol::NonTerminal(id), false)
        }
        GrammarExpr::Capture(inner) => {
            let (symbol, _) = lower_symbol(inner, hint, symbols, productions);
            (symbol, true)
        }
        GrammarExpr::Optional(inner) => {
            // N -> ε | inner
            let helper = symbols.fresh_nonterminal(&format!("{hint}_opt"));
            productions.push(Production {
                lhs: helper,
                rhs: vec![],
                captures: vec![],
            });
            let (inner_symbol, inner_cap) = lower_symbol(inner, hint, symbols, productions);
            productions.push(Production {
                lhs: helper,
                rhs: vec![inner_symbol],
                captures: vec![inner_cap],
            });
            (Symbol::NonTerminal(helper), true)
        }
        GrammarExpr::Star(inner) => {
            // N -> ε | N inner
            let helper = symbols.fresh_nonterminal(&format!("{hint}_star"));
            productions.push(Production {
                lhs: helper,
                rhs: vec![],
                captures: vec![],
            });
            let (inner_symbol, inner_cap) = lower_symbol(inner, hint, symbols, productions);
            productions.push(Production {
                lhs: helper,
                rhs: vec![Symbol::NonTerminal(helper), inner_symbol],
                captures: vec![true, inner_cap],
            });
            (Symbol::NonTerminal(helper), true)
        }
        GrammarExpr::Plus(inner) => {
            // N -> inner | N inner (reuses the star desugaring's shape).
            let helper = symbols.fresh_nonterminal(&format!("{hint}_plus"));
            let (inner_symbol, inner_cap) = lower_symbol(inner, hint, symbols, productions);
            productions.push(Production {
                lhs: helper,
                rhs: vec![inner_symbol],
                captures: vec![inner_cap],
            });
            productions.push(Production {
                lhs: helper,
                rhs: vec![Symbol::NonTerminal(helper), inner_symbol],
                captures: vec![true, inner_cap],
            });
            (Symbol::NonTerminal(helper), true)
        }
        GrammarExpr::Sequence(_) | GrammarExpr::Alternative(_) => {
            let helper = symbols.fresh_nonterminal(hint);
            lower_into(expr, helper, hint, symbols, productions, true);
            (Symbol::NonTerminal(helper), true)
        }
    }
}
