//! Implementation tables (§4.5): operator dispatch, the attribute
//! protocol, and call-argument binding, one function per concern rather
//! than a class hierarchy of per-kind implementations.

use mesh_common::Span;
use mesh_parser::ast::{KeywordArgument, Operator, ParameterKind, UnaryOperator};

use crate::error::TypeError;
use crate::ty::{union, Atom, AtomFlags, FunctionSig};

pub fn operator_symbol(op: Operator) -> &'static str {
    match op {
        Operator::Add => "+",
        Operator::Sub => "-",
        Operator::Mult => "*",
        Operator::Div => "/",
        Operator::FloorDiv => "//",
        Operator::Mod => "%",
        Operator::Pow => "**",
        Operator::LShift => "<<",
        Operator::RShift => ">>",
        Operator::BitOr => "|",
        Operator::BitXor => "^",
        Operator::BitAnd => "&",
        Operator::MatMult => "@",
    }
}

pub fn unary_operator_symbol(op: UnaryOperator) -> &'static str {
    match op {
        UnaryOperator::Not => "not",
        UnaryOperator::UAdd => "+",
        UnaryOperator::USub => "-",
        UnaryOperator::Invert => "~",
    }
}

/// Dispatch a binary operator the way the atomizer's per-kind impl tables
/// do: try the left operand's table, then the right operand's reflected
/// entry. `None` means neither side defines it.
/// Binary operators fold a literal result when both operands carry one
/// (§8: `1 + 2` yields `IntegerAtom(3, IMPLICIT)`); the folded atom is
/// always marked IMPLICIT, since it was produced by this fold rather than
/// written directly by the user.
pub fn dispatch_binary(op: Operator, left: &Atom, right: &Atom) -> Option<Atom> {
    use Atom::*;
    let flags = AtomFlags::VALUE.implicit();
    match op {
        Operator::Add => match (left, right) {
            (Int(_, a), Int(_, b)) => Some(Int(flags, a.zip(*b).map(|(a, b)| a + b))),
            (Int(_, a), Float(_, b)) => Some(Float(flags, a.map(|a| a as f64).zip(*b).map(|(a, b)| a + b))),
            (Float(_, a), Int(_, b)) => Some(Float(flags, a.zip(b.map(|b| b as f64)).map(|(a, b)| a + b))),
            (Float(_, a), Float(_, b)) => Some(Float(flags, a.zip(*b).map(|(a, b)| a + b))),
            (Str(_, a), Str(_, b)) => Some(Str(flags, a.as_ref().zip(b.as_ref()).map(|(a, b)| format!("{a}{b}")))),
            (List(f, elt), List(_, other)) => Some(List(*f, Box::new(union([(**elt).clone(), (**other).clone()])))),
            (Tuple(f, a), Tuple(_, b)) => {
                let mut elts = a.clone();
                elts.extend(b.clone());
                Some(Tuple(*f, elts))
            }
            _ => None,
        },
        Operator::Sub => numeric_binop(left, right, |a, b| a - b),
        Operator::Mult => numeric_binop(left, right, |a, b| a * b),
        Operator::Mod | Operator::FloorDiv | Operator::Pow => match (left, right) {
            (Int(..), Int(..)) => Some(Int(flags, None)),
            (Int(..), Float(..)) | (Float(..), Int(..)) | (Float(..), Float(..)) => Some(Float(flags, None)),
            _ => None,
        },
        Operator::Div => match (left, right) {
            (Int(..) | Float(..), Int(..) | Float(..)) => Some(Float(flags, None)),
            _ => None,
        },
        Operator::LShift | Operator::RShift | Operator::BitOr | Operator::BitXor | Operator::BitAnd => {
            match (left, right) {
                (Int(..), Int(..)) => Some(Int(flags, None)),
                (Bool(..), Bool(..)) => Some(Bool(flags, None)),
                _ => None,
            }
        }
        Operator::MatMult => None,
    }
}

/// Folds a literal value when both operands carry one; otherwise just
/// narrows to the widened numeric kind with no value.
fn numeric_binop(left: &Atom, right: &Atom, fold: impl Fn(f64, f64) -> f64) -> Option<Atom> {
    let flags = AtomFlags::VALUE.implicit();
    match (left, right) {
        (Atom::Int(_, a), Atom::Int(_, b)) => {
            Some(Atom::Int(flags, a.zip(*b).map(|(a, b)| fold(a as f64, b as f64) as i64)))
        }
        (Atom::Int(_, a), Atom::Float(_, b)) => {
            Some(Atom::Float(flags, a.map(|a| a as f64).zip(*b).map(|(a, b)| fold(a, b))))
        }
        (Atom::Float(_, a), Atom::Int(_, b)) => {
            Some(Atom::Float(flags, a.zip(b.map(|b| b as f64)).map(|(a, b)| fold(a, b))))
        }
        (Atom::Float(_, a), Atom::Float(_, b)) => Some(Atom::Float(flags, a.zip(*b).map(|(a, b)| fold(a, b)))),
        _ => None,
    }
}

pub fn dispatch_unary(op: UnaryOperator, operand: &Atom) -> Option<Atom> {
    let flags = AtomFlags::VALUE.implicit();
    match (op, operand) {
        (UnaryOperator::Not, _) => Some(Atom::Bool(flags, None)),
        (UnaryOperator::UAdd, Atom::Int(_, v)) => Some(Atom::Int(flags, *v)),
        (UnaryOperator::USub, Atom::Int(_, v)) => Some(Atom::Int(flags, v.map(|v| -v))),
        (UnaryOperator::UAdd, Atom::Float(_, v)) => Some(Atom::Float(flags, *v)),
        (UnaryOperator::USub, Atom::Float(_, v)) => Some(Atom::Float(flags, v.map(|v| -v))),
        (UnaryOperator::Invert, Atom::Int(_, v)) => Some(Atom::Int(flags, v.map(|v| !v))),
        _ => None,
    }
}

/// Attribute lookup (§4.5 "attribute protocol"): class instances consult
/// their class's member table (walking bases); everything else falls back
/// to a small built-in method table keyed on atom kind.
pub fn get_attribute(atom: &Atom, name: &str) -> Option<Atom> {
    match atom {
        Atom::Object(_) => None,
        Atom::Class(_, sig) => sig.find_member(name).map(|member| bind_method(atom, member)),
        _ => builtin_attribute(atom, name),
    }
}

fn bind_method(receiver: &Atom, member: &Atom) -> Atom {
    match member {
        Atom::Function(flags, sig) => Atom::Method(*flags, Box::new(receiver.clone()), Box::new(sig.clone())),
        other => other.clone(),
    }
}

fn builtin_attribute(atom: &Atom, name: &str) -> Option<Atom> {
    match (atom, name) {
        (Atom::Int(..), "bit_length") | (Atom::Int(..), "bit_count") => Some(Atom::Function(
            AtomFlags::VALUE,
            FunctionSig { name: name.to_string(), params: Vec::new(), returns: Box::new(Atom::Int(AtomFlags::VALUE, None)) },
        )),
        (Atom::Str(..), "upper") | (Atom::Str(..), "lower") | (Atom::Str(..), "strip") => Some(Atom::Function(
            AtomFlags::VALUE,
            FunctionSig { name: name.to_string(), params: Vec::new(), returns: Box::new(Atom::Str(AtomFlags::VALUE, None)) },
        )),
        _ => None,
    }
}

/// Bind call arguments against a function signature (§4.5 "call protocol"):
/// positional parameters fill left to right, a `VarArg` parameter absorbs
/// the rest, keyword arguments fill by name or land in a `VarKwArg`
/// parameter, and anything left over with no default is a missing
/// argument. Mirrors the binding order of the atomizer's `__call__` impl.
pub fn bind_call(
    sig: &FunctionSig,
    args: &[Atom],
    kwargs: &[KeywordArgument],
    call_span: Span,
) -> (Atom, Vec<TypeError>) {
    let mut errors = Vec::new();
    let mut remaining: Vec<&crate::ty::Param> = sig.params.iter().collect();

    let varpositional = remaining.iter().position(|p| p.kind == ParameterKind::VarArg).map(|i| remaining.remove(i));
    let varkeyword = remaining.iter().position(|p| p.kind == ParameterKind::VarKwArg).map(|i| remaining.remove(i));

    let mut positional: Vec<&crate::ty::Param> = remaining
        .iter()
        .filter(|p| matches!(p.kind, ParameterKind::PosOnly | ParameterKind::Arg))
        .copied()
        .collect();

    let mut satisfied: Vec<String> = Vec::new();

    for (index, _argument) in args.iter().enumerate() {
        if !positional.is_empty() {
            let param = positional.remove(0);
            satisfied.push(param.name.clone());
        } else if varpositional.is_none() {
            errors.push(TypeError::TooManyArguments {
                expected: sig.params.iter().filter(|p| p.kind != ParameterKind::VarArg && p.kind != ParameterKind::VarKwArg).count(),
                found: index + 1,
                span: call_span,
            });
        }
    }

    let keyword_eligible: Vec<&crate::ty::Param> = sig
        .params
        .iter()
        .filter(|p| matches!(p.kind, ParameterKind::Arg | ParameterKind::KwOnly))
        .collect();

    for kwarg in kwargs {
        let Some(name) = &kwarg.name else { continue };
        if keyword_eligible.iter().any(|p| &p.name == name) {
            satisfied.push(name.clone());
        } else if varkeyword.is_none() {
            errors.push(TypeError::UnexpectedKeywordArgument { name: name.clone(), span: call_span });
        }
    }

    for param in &sig.params {
        if param.kind == ParameterKind::VarArg || param.kind == ParameterKind::VarKwArg {
            continue;
        }
        if !param.has_default && !satisfied.contains(&param.name) {
            errors.push(TypeError::MissingArgument { name: param.name.clone(), span: call_span });
        }
    }

    ((*sig.returns).clone(), errors)
}
