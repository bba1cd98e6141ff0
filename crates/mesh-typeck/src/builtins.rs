//! Seeds the global scope (§4.5, grounded on `Scope.create_global_scope`):
//! the handful of names every module can see without importing anything.

use crate::scope::Scope;
use crate::ty::{Atom, AtomFlags, ClassSig, FunctionSig, Param};
use mesh_parser::ast::ParameterKind;

fn builtin_function(name: &str, params: Vec<Param>, returns: Atom) -> Atom {
    Atom::Function(AtomFlags::VALUE, FunctionSig { name: name.to_string(), params, returns: Box::new(returns) })
}

fn object_param(name: &str) -> Param {
    Param { name: name.to_string(), kind: ParameterKind::VarArg, annotation: Atom::Object(AtomFlags::VALUE), has_default: false }
}

pub fn populate(scope: &mut Scope) {
    scope.bind("bool", Atom::Bool(AtomFlags::TYPE, None));
    scope.bind("str", Atom::Str(AtomFlags::TYPE, None));
    scope.bind("int", Atom::Int(AtomFlags::TYPE, None));
    scope.bind("float", Atom::Float(AtomFlags::TYPE, None));

    scope.bind(
        "print",
        builtin_function("print", vec![object_param("args")], Atom::NoneType(AtomFlags::VALUE.implicit())),
    );
    scope.bind(
        "len",
        builtin_function(
            "len",
            vec![Param { name: "obj".to_string(), kind: ParameterKind::Arg, annotation: Atom::Object(AtomFlags::VALUE), has_default: false }],
            Atom::Int(AtomFlags::VALUE.implicit(), None),
        ),
    );
    scope.bind(
        "range",
        builtin_function(
            "range",
            vec![
                Param { name: "start".to_string(), kind: ParameterKind::Arg, annotation: Atom::Int(AtomFlags::VALUE, None), has_default: true },
                Param { name: "stop".to_string(), kind: ParameterKind::Arg, annotation: Atom::Int(AtomFlags::VALUE, None), has_default: false },
                Param { name: "step".to_string(), kind: ParameterKind::Arg, annotation: Atom::Int(AtomFlags::VALUE, None), has_default: true },
            ],
            Atom::List(AtomFlags::VALUE.implicit(), Box::new(Atom::Int(AtomFlags::VALUE, None))),
        ),
    );

    let base_object = ClassSig { name: "object".to_string(), bases: Vec::new(), members: Vec::new() };
    scope.bind("object", Atom::Class(AtomFlags::TYPE, base_object));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_and_len_are_bound() {
        let scope = Scope::global();
        assert!(matches!(scope.lookup("print"), Some(Atom::Function(..))));
        assert!(matches!(scope.lookup("len"), Some(Atom::Function(..))));
    }

    #[test]
    fn int_and_str_are_type_atoms() {
        let scope = Scope::global();
        assert!(scope.lookup("int").unwrap().is_type());
        assert!(scope.lookup("str").unwrap().is_type());
    }
}
