//! Scope graph (§4.5): a tree of scopes linked by parent pointers, one per
//! module/class/function body. Lookup walks the parent chain to the root.

use rustc_hash::FxHashMap;

use crate::ty::Atom;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Class,
    Function,
}

pub struct Scope {
    pub kind: ScopeKind,
    symbols: FxHashMap<String, Atom>,
    parent: Option<Box<Scope>>,
}

impl Scope {
    pub fn global() -> Self {
        let mut scope = Scope { kind: ScopeKind::Global, symbols: FxHashMap::default(), parent: None };
        crate::builtins::populate(&mut scope);
        scope
    }

    fn child(kind: ScopeKind, parent: Scope) -> Self {
        Scope { kind, symbols: FxHashMap::default(), parent: Some(Box::new(parent)) }
    }

    /// A scope with no bindings and no builtins, used only as a swap target
    /// while moving a scope out of `&mut self` (see `Atomizer::enter`/`exit`).
    pub(crate) fn placeholder() -> Self {
        Scope { kind: ScopeKind::Global, symbols: FxHashMap::default(), parent: None }
    }

    pub fn enter_function(self) -> Self {
        Scope::child(ScopeKind::Function, self)
    }

    pub fn enter_class(self) -> Self {
        Scope::child(ScopeKind::Class, self)
    }

    /// Pop back to the enclosing scope, keeping whatever was bound here
    /// available to `take_symbols` for the caller that wants it (a class
    /// body's bindings become its member table).
    pub fn exit(self) -> Self {
        *self.parent.expect("cannot exit the global scope")
    }

    pub fn is_function(&self) -> bool {
        self.kind == ScopeKind::Function
    }

    pub fn bind(&mut self, name: impl Into<String>, atom: Atom) {
        self.symbols.insert(name.into(), atom);
    }

    /// Resolve a name by walking this scope outward to the root.
    pub fn lookup(&self, name: &str) -> Option<&Atom> {
        self.symbols
            .get(name)
            .or_else(|| self.parent.as_ref().and_then(|p| p.lookup(name)))
    }

    /// Consume a class body's scope, splitting it into the member table it
    /// accumulated and the enclosing scope it should pop back to.
    pub fn split_class(self) -> (Vec<(String, Atom)>, Scope) {
        let members = self.symbols.into_iter().collect();
        let parent = *self.parent.expect("cannot exit the global scope");
        (members, parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ty::AtomFlags;

    #[test]
    fn lookup_walks_up_to_the_global_scope() {
        let scope = Scope::global();
        assert!(scope.lookup("print").is_some());
    }

    #[test]
    fn function_scope_sees_outer_bindings() {
        let mut scope = Scope::global();
        scope.bind("x", Atom::Int(AtomFlags::VALUE, Some(1)));
        let inner = scope.enter_function();
        assert!(inner.lookup("x").is_some());
    }

    #[test]
    fn inner_binding_shadows_outer() {
        let mut scope = Scope::global();
        scope.bind("x", Atom::Int(AtomFlags::VALUE, Some(1)));
        let mut inner = scope.enter_function();
        inner.bind("x", Atom::Str(AtomFlags::VALUE, None));
        assert!(matches!(inner.lookup("x"), Some(Atom::Str(..))));
        let outer = inner.exit();
        assert!(matches!(outer.lookup("x"), Some(Atom::Int(..))));
    }
}
