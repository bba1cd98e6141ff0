//! The atom model (§3, §4.5): every value and every type in a Mesh program
//! is represented by the same [`Atom`] tree, distinguished only by whether
//! its [`AtomFlags::is_type`] bit is set. `instantiate`/`uninstantiate` flip
//! that bit; `union` is the only way atoms combine when control flow can
//! produce more than one shape.

use std::fmt;

/// A value/type atom. Kept as a flat enum rather than a class hierarchy --
/// callers match on `Atom` directly instead of downcasting through a base
/// class.
#[derive(Debug, Clone, PartialEq)]
pub enum Atom {
    /// The result of a failed inference: unknown on purpose, never reported
    /// twice for the same expression.
    Unknown,
    /// A definite error already reported; propagates silently so one
    /// mistake does not cascade into a wall of unrelated diagnostics.
    Error,
    Object(AtomFlags),
    /// `value` is `Some` only for a literal `True`/`False` that survived
    /// constant folding, the same way `Int`/`Str` track their literal.
    Bool(AtomFlags, Option<bool>),
    NoneType(AtomFlags),
    Ellipsis(AtomFlags),
    /// `value` is `Some` only for a literal whose exact spelling survived
    /// constant folding (§4.6 "constant folding with IMPLICIT widening").
    Str(AtomFlags, Option<String>),
    Int(AtomFlags, Option<i64>),
    Float(AtomFlags, Option<f64>),
    Dict(AtomFlags, Box<Atom>, Box<Atom>),
    Set(AtomFlags, Box<Atom>),
    Tuple(AtomFlags, Vec<Atom>),
    List(AtomFlags, Box<Atom>),
    Slice(AtomFlags),
    Function(AtomFlags, FunctionSig),
    /// A function atom bound to a receiver, as produced by attribute lookup
    /// on an instance (§4.5 "attribute protocol").
    Method(AtomFlags, Box<Atom>, Box<FunctionSig>),
    Class(AtomFlags, ClassSig),
    /// The canonical, absorbing union of two or more distinct atoms
    /// (§4.5 "canonical/absorbing UNION semantics").
    Union(Vec<Atom>),
}

/// Bits that apply uniformly across every [`Atom`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AtomFlags {
    /// This atom denotes a type (the class itself), not a value of it.
    pub is_type: bool,
    /// This atom was produced by folding/widening rather than written
    /// directly by the user -- never itself the subject of a diagnostic.
    pub implicit: bool,
}

impl AtomFlags {
    pub const VALUE: AtomFlags = AtomFlags { is_type: false, implicit: false };
    pub const TYPE: AtomFlags = AtomFlags { is_type: true, implicit: false };

    pub fn implicit(mut self) -> Self {
        self.implicit = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub kind: mesh_parser::ast::ParameterKind,
    pub annotation: Atom,
    pub has_default: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSig {
    pub name: String,
    pub params: Vec<Param>,
    pub returns: Box<Atom>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassSig {
    pub name: String,
    pub bases: Vec<Atom>,
    pub members: Vec<(String, Atom)>,
}

impl ClassSig {
    pub fn find_member(&self, name: &str) -> Option<&Atom> {
        self.members
            .iter()
            .find(|(member, _)| member == name)
            .map(|(_, atom)| atom)
            .or_else(|| {
                self.bases.iter().find_map(|base| match base {
                    Atom::Class(_, sig) => sig.find_member(name),
                    _ => None,
                })
            })
    }
}

impl Atom {
    pub fn flags(&self) -> AtomFlags {
        match self {
            Atom::Unknown | Atom::Error | Atom::Union(_) => AtomFlags::VALUE,
            Atom::Object(f)
            | Atom::Bool(f, _)
            | Atom::NoneType(f)
            | Atom::Ellipsis(f)
            | Atom::Str(f, _)
            | Atom::Int(f, _)
            | Atom::Float(f, _)
            | Atom::Dict(f, ..)
            | Atom::Set(f, _)
            | Atom::Tuple(f, _)
            | Atom::List(f, _)
            | Atom::Slice(f)
            | Atom::Function(f, _)
            | Atom::Method(f, ..)
            | Atom::Class(f, _) => *f,
        }
    }

    pub fn is_type(&self) -> bool {
        self.flags().is_type
    }

    /// Turn a type atom into a value atom of that type. A no-op on
    /// anything that is already a value.
    pub fn instantiate(&self) -> Atom {
        self.with_flags(|f| f.is_type = false)
    }

    /// The inverse of `instantiate`: turn a value atom into the type atom
    /// that describes it.
    pub fn uninstantiate(&self) -> Atom {
        self.with_flags(|f| f.is_type = true)
    }

    fn with_flags(&self, set: impl Fn(&mut AtomFlags)) -> Atom {
        let mut atom = self.clone();
        let flags = match &mut atom {
            Atom::Object(f)
            | Atom::Bool(f, _)
            | Atom::NoneType(f)
            | Atom::Ellipsis(f)
            | Atom::Str(f, _)
            | Atom::Int(f, _)
            | Atom::Float(f, _)
            | Atom::Dict(f, ..)
            | Atom::Set(f, _)
            | Atom::Tuple(f, _)
            | Atom::List(f, _)
            | Atom::Slice(f)
            | Atom::Function(f, _)
            | Atom::Method(f, ..)
            | Atom::Class(f, _) => f,
            Atom::Unknown | Atom::Error | Atom::Union(_) => return atom,
        };
        set(flags);
        atom
    }

    /// Statically known truthiness, when the atom is a constant whose
    /// boolean value does not depend on runtime state.
    pub fn truthiness(&self) -> Option<bool> {
        match self {
            Atom::NoneType(_) => Some(false),
            Atom::Bool(_, v) => *v,
            Atom::Int(_, Some(v)) => Some(*v != 0),
            Atom::Float(_, Some(v)) => Some(*v != 0.0),
            Atom::Str(_, Some(v)) => Some(!v.is_empty()),
            Atom::Tuple(_, elts) => Some(!elts.is_empty()),
            _ => None,
        }
    }

    pub fn kind_name(&self) -> String {
        match self {
            Atom::Unknown => "unknown".to_string(),
            Atom::Error => "error".to_string(),
            Atom::Object(_) => "object".to_string(),
            Atom::Bool(..) => "bool".to_string(),
            Atom::NoneType(_) => "None".to_string(),
            Atom::Ellipsis(_) => "ellipsis".to_string(),
            Atom::Str(..) => "str".to_string(),
            Atom::Int(..) => "int".to_string(),
            Atom::Float(..) => "float".to_string(),
            Atom::Dict(..) => "dict".to_string(),
            Atom::Set(..) => "set".to_string(),
            Atom::Tuple(..) => "tuple".to_string(),
            Atom::List(..) => "list".to_string(),
            Atom::Slice(_) => "slice".to_string(),
            Atom::Function(..) => "function".to_string(),
            Atom::Method(..) => "method".to_string(),
            Atom::Class(_, sig) => sig.name.clone(),
            Atom::Union(_) => "union".to_string(),
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Union(members) => {
                let parts: Vec<String> = members.iter().map(|m| m.to_string()).collect();
                write!(f, "{}", parts.join(" | "))
            }
            Atom::Class(_, sig) => write!(f, "type[{}]", sig.name),
            Atom::Function(_, sig) => write!(f, "function {}", sig.name),
            other => write!(f, "{}", other.kind_name()),
        }
    }
}

/// Fold a set of branch atoms into the canonical, absorbing union
/// (§4.5): nested unions flatten, structurally identical members collapse,
/// and a single surviving member is returned bare rather than wrapped.
pub fn union(atoms: impl IntoIterator<Item = Atom>) -> Atom {
    let mut members: Vec<Atom> = Vec::new();
    for atom in atoms {
        match atom {
            Atom::Union(nested) => {
                for m in nested {
                    push_unique(&mut members, m);
                }
            }
            other => push_unique(&mut members, other),
        }
    }
    match members.len() {
        0 => Atom::Unknown,
        1 => members.into_iter().next().unwrap(),
        _ => Atom::Union(members),
    }
}

fn push_unique(members: &mut Vec<Atom>, atom: Atom) {
    if !members.contains(&atom) {
        members.push(atom);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instantiate_clears_the_type_flag() {
        let ty = Atom::Int(AtomFlags::TYPE, None);
        let value = ty.instantiate();
        assert!(!value.is_type());
        assert!(ty.is_type());
    }

    #[test]
    fn union_flattens_and_dedups() {
        let a = Atom::Int(AtomFlags::VALUE, None);
        let b = Atom::Str(AtomFlags::VALUE, None);
        let nested = union([a.clone(), b.clone()]);
        let flattened = union([nested, a.clone()]);
        assert_eq!(flattened, Atom::Union(vec![a, b]));
    }

    #[test]
    fn union_of_one_member_is_not_wrapped() {
        let a = Atom::Bool(AtomFlags::VALUE, None);
        assert_eq!(union([a.clone(), a.clone()]), a);
    }

    #[test]
    fn none_is_always_falsy() {
        assert_eq!(Atom::NoneType(AtomFlags::VALUE).truthiness(), Some(false));
    }

    #[test]
    fn a_known_true_literal_has_definite_truthiness() {
        assert_eq!(Atom::Bool(AtomFlags::VALUE, Some(true)).truthiness(), Some(true));
    }
}
