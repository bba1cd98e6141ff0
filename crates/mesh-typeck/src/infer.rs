//! The atomizer (§4.5): walks the AST, returns an atom for every
//! expression and mutates the scope graph for every statement's side
//! effects. Operates in one of two modes -- CODE (general expressions)
//! or TYPE (annotations) -- exactly as the original tree-walker does,
//! since a handful of constructs (ternaries, subscripts, unary ops) are
//! only meaningful in CODE mode.

use mesh_parser::ast::{
    BoolOperator, Comparator, Constant, Expr, ExprKind, Module, Param, Stmt, StmtKind,
};

use crate::error::TypeError;
use crate::impls::{self, get_attribute};
use crate::scope::Scope;
use crate::ty::{union, Atom, AtomFlags, ClassSig, FunctionSig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Code,
    Type,
}

pub struct Atomizer {
    scope: Scope,
    mode: Mode,
    pub errors: Vec<TypeError>,
}

impl Atomizer {
    pub fn new() -> Self {
        Atomizer { scope: Scope::global(), mode: Mode::Code, errors: Vec::new() }
    }

    pub fn check_module(mut self, module: &Module) -> (Scope, Vec<TypeError>) {
        for stmt in &module.body {
            self.exec_stmt(stmt);
        }
        (self.scope, self.errors)
    }

    fn enter(&mut self, f: impl FnOnce(Scope) -> Scope) {
        let current = std::mem::replace(&mut self.scope, Scope::placeholder());
        self.scope = f(current);
    }

    fn exit(&mut self) {
        let current = std::mem::replace(&mut self.scope, Scope::placeholder());
        self.scope = current.exit();
    }

    /// Pop a class body's scope, turning its accumulated bindings into the
    /// class's member table and binding the class itself in the outer scope.
    fn exit_class(&mut self, name: String, bases: Vec<Atom>) {
        let current = std::mem::replace(&mut self.scope, Scope::placeholder());
        let (members, outer) = current.split_class();
        self.scope = outer;
        let sig = ClassSig { name: name.clone(), bases, members };
        self.scope.bind(name, Atom::Class(AtomFlags::TYPE, sig));
    }

    fn exec_stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::FunctionDef { name, params, returns, body, decorators } => {
                self.def_function(name, params, returns.as_deref(), body, decorators, stmt);
            }
            StmtKind::ClassDef { name, bases, body, .. } => {
                self.def_class(name, bases, body);
            }
            StmtKind::Return(value) => {
                if !self.scope.is_function() {
                    self.errors.push(TypeError::ReturnOutsideFunction { span: stmt.span });
                }
                if let Some(value) = value {
                    self.eval_expr(value);
                }
            }
            StmtKind::Assign { targets, value } => {
                let atom = self.eval_expr(value);
                for target in targets {
                    self.bind_target(target, atom.clone());
                }
            }
            StmtKind::AugAssign { target, op, value } => {
                let left = self.eval_expr(target);
                let right = self.eval_expr(value);
                let result = impls::dispatch_binary(*op, &left, &right).unwrap_or_else(|| {
                    self.errors.push(TypeError::UnsupportedOperator {
                        op: impls::operator_symbol(*op).to_string(),
                        left: left.clone(),
                        right: right.clone(),
                        span: stmt.span,
                    });
                    Atom::Error
                });
                self.bind_target(target, result);
            }
            StmtKind::AnnAssign { target, annotation, value } => {
                let declared = self.eval_type(annotation).instantiate();
                if let Some(value) = value {
                    self.eval_expr(value);
                }
                self.bind_target(target, declared);
            }
            StmtKind::For { target, iter, body, orelse } => {
                let iterable = self.eval_expr(iter);
                let element = iteration_element(&iterable).unwrap_or_else(|| {
                    self.errors.push(TypeError::NotIterable { atom: iterable.clone(), span: stmt.span });
                    Atom::Unknown
                });
                self.bind_target(target, element);
                for s in body {
                    self.exec_stmt(s);
                }
                for s in orelse {
                    self.exec_stmt(s);
                }
            }
            StmtKind::While { test, body, orelse } => {
                self.eval_expr(test);
                for s in body {
                    self.exec_stmt(s);
                }
                for s in orelse {
                    self.exec_stmt(s);
                }
            }
            StmtKind::If { test, body, orelse } => {
                self.eval_expr(test);
                for s in body {
                    self.exec_stmt(s);
                }
                for s in orelse {
                    self.exec_stmt(s);
                }
            }
            StmtKind::Import(aliases) => {
                for alias in aliases {
                    let name = alias.asname.clone().unwrap_or_else(|| alias.name.clone());
                    self.scope.bind(name, Atom::Object(AtomFlags::VALUE.implicit()));
                }
            }
            StmtKind::ImportFrom { names, .. } => {
                for alias in names {
                    let name = alias.asname.clone().unwrap_or_else(|| alias.name.clone());
                    self.scope.bind(name, Atom::Unknown);
                }
            }
            StmtKind::Expr(expr) => {
                self.eval_expr(expr);
            }
            StmtKind::Assert { test, msg } => {
                self.eval_expr(test);
                if let Some(msg) = msg {
                    self.eval_expr(msg);
                }
            }
            // The scope graph has no way to write back into a specific
            // ancestor, so `global`/`nonlocal` only get the check a reader
            // actually wants here: that the declared name resolves to
            // something outward at all.
            StmtKind::Global(names) | StmtKind::Nonlocal(names) => {
                for name in names {
                    if self.scope.lookup(name).is_none() {
                        self.errors.push(TypeError::UndefinedName { name: name.clone(), span: stmt.span });
                    }
                }
            }
            StmtKind::Pass | StmtKind::Break | StmtKind::Continue => {}
        }
    }

    fn def_function(
        &mut self,
        name: &str,
        params: &[Param],
        returns: Option<&Expr>,
        body: &[Stmt],
        decorators: &[Expr],
        stmt: &Stmt,
    ) {
        self.enter(|outer| outer.enter_function());

        let mut sig_params = Vec::with_capacity(params.len());
        for param in params {
            let Some(annotation) = &param.annotation else {
                self.errors.push(TypeError::UnannotatedParameter { name: param.name.clone(), span: param.span });
                continue;
            };
            let declared = self.eval_type(annotation);
            self.scope.bind(param.name.clone(), declared.instantiate());
            if let Some(default) = &param.default {
                self.eval_expr(default);
            }
            sig_params.push(crate::ty::Param {
                name: param.name.clone(),
                kind: param.kind,
                annotation: declared,
                has_default: param.default.is_some(),
            });
        }

        let returns_atom = returns.map(|r| self.eval_type(r)).unwrap_or(Atom::NoneType(AtomFlags::VALUE.implicit()));

        for s in body {
            self.exec_stmt(s);
        }

        self.exit();

        let mut function = Atom::Function(
            AtomFlags::VALUE,
            FunctionSig { name: name.to_string(), params: sig_params, returns: Box::new(returns_atom) },
        );

        for decorator in decorators.iter().rev() {
            let decorator_atom = self.eval_expr(decorator);
            function = self.call(&decorator_atom, &[function], &[], stmt.span);
        }

        self.scope.bind(name.to_string(), function);
    }

    fn def_class(&mut self, name: &str, bases: &[Expr], body: &[Stmt]) {
        let base_atoms: Vec<Atom> = bases.iter().map(|b| self.eval_expr(b)).collect();

        self.enter(|outer| outer.enter_class());
        for s in body {
            self.exec_stmt(s);
        }
        self.exit_class(name.to_string(), base_atoms);
    }

    fn bind_target(&mut self, target: &Expr, value: Atom) {
        match &target.kind {
            ExprKind::Name(name) => self.scope.bind(name.clone(), value),
            ExprKind::Tuple(elts) | ExprKind::List(elts) => {
                for elt in elts {
                    self.bind_target(elt, Atom::Unknown.clone());
                }
                let _ = value;
            }
            ExprKind::Attribute { value: receiver, .. } => {
                self.eval_expr(receiver);
            }
            ExprKind::Subscript { value: receiver, slice } => {
                self.eval_expr(receiver);
                self.eval_expr(slice);
            }
            _ => {}
        }
    }

    fn eval_type(&mut self, expr: &Expr) -> Atom {
        let previous = self.mode;
        self.mode = Mode::Type;
        let result = self.eval_expr(expr);
        self.mode = previous;
        result
    }

    fn eval_expr(&mut self, expr: &Expr) -> Atom {
        match &expr.kind {
            ExprKind::Constant(c) => self.eval_constant(c),
            ExprKind::Name(name) => self.scope.lookup(name).cloned().unwrap_or_else(|| {
                self.errors.push(TypeError::UndefinedName { name: name.clone(), span: expr.span });
                Atom::Error
            }),
            ExprKind::BoolOp { values, .. } => {
                let atoms: Vec<Atom> = values.iter().map(|v| self.eval_expr(v)).collect();
                union(atoms)
            }
            ExprKind::BinaryOp { left, op, right } => {
                let l = self.eval_expr(left);
                let r = self.eval_expr(right);
                if self.mode == Mode::Type {
                    if matches!(op, mesh_parser::ast::Operator::BitOr) {
                        return union([l.instantiate(), r.instantiate()]).uninstantiate();
                    }
                    self.errors.push(TypeError::UnsupportedOperator {
                        op: impls::operator_symbol(*op).to_string(),
                        left: l,
                        right: r,
                        span: expr.span,
                    });
                    return Atom::Error;
                }
                impls::dispatch_binary(*op, &l, &r).unwrap_or_else(|| {
                    self.errors.push(TypeError::UnsupportedOperator {
                        op: impls::operator_symbol(*op).to_string(),
                        left: l,
                        right: r,
                        span: expr.span,
                    });
                    Atom::Error
                })
            }
            ExprKind::UnaryOp { op, operand } => {
                let value = self.eval_expr(operand);
                if self.mode == Mode::Type {
                    self.errors.push(TypeError::InvalidInTypeContext { construct: "a unary operator", span: expr.span });
                    return Atom::Error;
                }
                impls::dispatch_unary(*op, &value).unwrap_or_else(|| {
                    self.errors.push(TypeError::UnsupportedUnaryOperator {
                        op: impls::unary_operator_symbol(*op).to_string(),
                        operand: value,
                        span: expr.span,
                    });
                    Atom::Error
                })
            }
            ExprKind::IfExp { test, body, orelse } => {
                let test_atom = self.eval_expr(test);
                let then_atom = self.eval_expr(body);
                let else_atom = self.eval_expr(orelse);
                if self.mode == Mode::Type {
                    self.errors.push(TypeError::InvalidInTypeContext { construct: "a ternary expression", span: expr.span });
                    return Atom::Error;
                }
                match test_atom.truthiness() {
                    Some(true) => then_atom,
                    Some(false) => else_atom,
                    None => union([then_atom, else_atom]),
                }
            }
            ExprKind::Compare { left, comparators } => {
                self.eval_expr(left);
                for Comparator { value, .. } in comparators {
                    self.eval_expr(value);
                }
                Atom::Bool(AtomFlags::VALUE.implicit(), None)
            }
            ExprKind::Call { func, args, kwargs } => {
                let callee = self.eval_expr(func);
                let arg_atoms: Vec<Atom> = args.iter().map(|a| self.eval_expr(a)).collect();
                for kwarg in kwargs {
                    self.eval_expr(&kwarg.value);
                }
                self.call(&callee, &arg_atoms, kwargs, expr.span)
            }
            ExprKind::Attribute { value, attr } => {
                let receiver = self.eval_expr(value);
                get_attribute(&receiver, attr).unwrap_or_else(|| {
                    self.errors.push(TypeError::NoSuchAttribute {
                        atom: receiver.clone(),
                        attr: attr.clone(),
                        span: expr.span,
                    });
                    Atom::Error
                })
            }
            ExprKind::Subscript { value, slice } => {
                let receiver = self.eval_expr(value);
                let index = self.eval_expr(slice);
                if self.mode == Mode::Type {
                    self.errors.push(TypeError::InvalidInTypeContext { construct: "a subscript", span: expr.span });
                    return Atom::Error;
                }
                subscript_result(&receiver, &index).unwrap_or_else(|| {
                    self.errors.push(TypeError::NotSubscriptable { atom: receiver.clone(), span: expr.span });
                    Atom::Error
                })
            }
            ExprKind::Starred(inner) => self.eval_expr(inner),
            ExprKind::List(elts) => {
                let element = self.element_union(elts);
                Atom::List(AtomFlags::VALUE.implicit(), Box::new(element))
            }
            ExprKind::Tuple(elts) => {
                let atoms: Vec<Atom> = elts.iter().map(|e| self.eval_expr(e)).collect();
                let flags = if self.mode == Mode::Type { AtomFlags::TYPE } else { AtomFlags::VALUE };
                Atom::Tuple(flags, atoms)
            }
            ExprKind::Set(elts) => {
                let element = self.element_union(elts);
                Atom::Set(AtomFlags::VALUE.implicit(), Box::new(element))
            }
            ExprKind::Dict(entries) => {
                let mut keys = Vec::new();
                let mut values = Vec::new();
                for entry in entries {
                    if let Some(key) = &entry.key {
                        keys.push(widen(self.eval_expr(key)));
                    }
                    values.push(widen(self.eval_expr(&entry.value)));
                }
                Atom::Dict(
                    AtomFlags::VALUE.implicit(),
                    Box::new(union(keys)),
                    Box::new(union(values)),
                )
            }
            ExprKind::ListComp { element, generators } => {
                self.eval_comprehension(generators);
                let el = self.eval_expr(element);
                Atom::List(AtomFlags::VALUE.implicit(), Box::new(el))
            }
            ExprKind::SetComp { element, generators } => {
                self.eval_comprehension(generators);
                let el = self.eval_expr(element);
                Atom::Set(AtomFlags::VALUE.implicit(), Box::new(el))
            }
            ExprKind::DictComp { key, value, generators } => {
                self.eval_comprehension(generators);
                let k = self.eval_expr(key);
                let v = self.eval_expr(value);
                Atom::Dict(AtomFlags::VALUE.implicit(), Box::new(k), Box::new(v))
            }
            ExprKind::GeneratorExp { element, generators } => {
                self.eval_comprehension(generators);
                let el = self.eval_expr(element);
                Atom::List(AtomFlags::VALUE.implicit(), Box::new(el))
            }
            ExprKind::Slice { lower, upper, step } => {
                for part in [lower, upper, step].into_iter().flatten() {
                    self.eval_expr(part);
                }
                Atom::Slice(AtomFlags::VALUE)
            }
        }
    }

    /// Union an element list's atoms, widening literals (§4.6 "constant
    /// folding with IMPLICIT widening") so `[1, 2, 3]` yields a plain `int`
    /// element type instead of a three-way union of exact-value atoms.
    fn element_union(&mut self, elts: &[Expr]) -> Atom {
        let atoms: Vec<Atom> = elts.iter().map(|e| widen(self.eval_expr(e))).collect();
        union(atoms)
    }

    fn eval_comprehension(&mut self, generators: &[mesh_parser::ast::Comprehension]) {
        for gen in generators {
            let iterable = self.eval_expr(&gen.iter);
            let element = iteration_element(&iterable).unwrap_or(Atom::Unknown);
            self.bind_target(&gen.target, element);
            for cond in &gen.ifs {
                self.eval_expr(cond);
            }
        }
    }

    fn eval_constant(&self, constant: &Constant) -> Atom {
        match constant {
            Constant::Int(text) => Atom::Int(AtomFlags::VALUE.implicit(), text.replace('_', "").parse().ok()),
            Constant::Float(text) => Atom::Float(AtomFlags::VALUE.implicit(), text.parse().ok()),
            Constant::Str(text) => Atom::Str(AtomFlags::VALUE.implicit(), Some(text.clone())),
            Constant::Bool(b) => Atom::Bool(AtomFlags::VALUE.implicit(), Some(*b)),
            Constant::None => Atom::NoneType(AtomFlags::VALUE.implicit()),
            Constant::Ellipsis => Atom::Ellipsis(AtomFlags::VALUE.implicit()),
        }
    }

    fn call(&mut self, callee: &Atom, args: &[Atom], kwargs: &[mesh_parser::ast::KeywordArgument], span: mesh_common::Span) -> Atom {
        match callee {
            Atom::Function(_, sig) => {
                let (result, errors) = impls::bind_call(sig, args, kwargs, span);
                self.errors.extend(errors);
                result
            }
            Atom::Method(_, instance, sig) => {
                let mut full_args = Vec::with_capacity(args.len() + 1);
                full_args.push((**instance).clone());
                full_args.extend_from_slice(args);
                let (result, errors) = impls::bind_call(sig, &full_args, kwargs, span);
                self.errors.extend(errors);
                result
            }
            Atom::Class(_, sig) => Atom::Class(AtomFlags::VALUE, sig.clone()),
            Atom::Unknown | Atom::Error => Atom::Unknown,
            other => {
                self.errors.push(TypeError::NotCallable { found: other.clone(), span });
                Atom::Error
            }
        }
    }
}

impl Default for Atomizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Drop a literal's exact value, keeping only its base type (§4.6
/// "IMPLICIT widening"), so container element types don't retain every
/// distinct literal that was written into the collection.
fn widen(atom: Atom) -> Atom {
    match atom {
        Atom::Int(f, _) => Atom::Int(f, None),
        Atom::Float(f, _) => Atom::Float(f, None),
        Atom::Str(f, _) => Atom::Str(f, None),
        Atom::Bool(f, _) => Atom::Bool(f, None),
        other => other,
    }
}

fn iteration_element(atom: &Atom) -> Option<Atom> {
    match atom {
        Atom::List(_, elt) | Atom::Set(_, elt) => Some((**elt).clone()),
        Atom::Tuple(_, elts) => Some(union(elts.clone())),
        Atom::Dict(_, key, _) => Some((**key).clone()),
        Atom::Str(..) => Some(Atom::Str(AtomFlags::VALUE.implicit(), None)),
        Atom::Unknown | Atom::Error => Some(Atom::Unknown),
        _ => None,
    }
}

fn subscript_result(receiver: &Atom, _index: &Atom) -> Option<Atom> {
    match receiver {
        Atom::List(_, elt) => Some((**elt).clone()),
        Atom::Dict(_, _, value) => Some((**value).clone()),
        Atom::Tuple(_, elts) => Some(union(elts.clone())),
        Atom::Str(..) => Some(Atom::Str(AtomFlags::VALUE.implicit(), None)),
        Atom::Unknown | Atom::Error => Some(Atom::Unknown),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(src: &str) -> Vec<TypeError> {
        let module = mesh_parser::parse(src).expect("should parse");
        let (_, errors) = Atomizer::new().check_module(&module);
        errors
    }

    #[test]
    fn undefined_name_is_reported() {
        let errors = check("print(x)\n");
        assert!(errors.iter().any(|e| matches!(e, TypeError::UndefinedName { .. })));
    }

    #[test]
    fn calling_print_with_defined_name_is_clean() {
        let errors = check("x = 1\nprint(x)\n");
        assert!(errors.is_empty());
    }

    #[test]
    fn return_outside_function_is_reported() {
        let errors = check("return 1\n");
        assert!(errors.iter().any(|e| matches!(e, TypeError::ReturnOutsideFunction { .. })));
    }

    #[test]
    fn unannotated_parameter_is_reported() {
        let errors = check("def f(x):\n    return x\n");
        assert!(errors.iter().any(|e| matches!(e, TypeError::UnannotatedParameter { .. })));
    }

    #[test]
    fn annotated_function_call_type_checks() {
        let errors = check("def add(a: int, b: int) -> int:\n    return a + b\nadd(1, 2)\n");
        assert!(errors.is_empty());
    }

    #[test]
    fn calling_a_non_callable_is_reported() {
        let errors = check("x = 1\nx()\n");
        assert!(errors.iter().any(|e| matches!(e, TypeError::NotCallable { .. })));
    }

    #[test]
    fn too_few_arguments_is_reported() {
        let errors = check("def add(a: int, b: int) -> int:\n    return a + b\nadd(1)\n");
        assert!(errors.iter().any(|e| matches!(e, TypeError::MissingArgument { .. })));
    }

    #[test]
    fn list_literal_widens_its_element_type() {
        let module = mesh_parser::parse("xs = [1, 2, 3]\n").expect("should parse");
        let (scope, errors) = Atomizer::new().check_module(&module);
        assert!(errors.is_empty());
        assert!(matches!(scope.lookup("xs"), Some(Atom::List(_, elt)) if matches!(**elt, Atom::Int(..))));
    }

    #[test]
    fn non_bitor_operator_in_an_annotation_is_reported() {
        let errors = check("def f(x: int + str) -> int:\n    return 0\n");
        assert!(errors.iter().any(|e| matches!(e, TypeError::UnsupportedOperator { .. })));
    }

    #[test]
    fn an_if_expression_with_a_known_true_test_narrows_to_the_true_branch() {
        let module = mesh_parser::parse("x = True if True else 1\n").expect("should parse");
        let (scope, errors) = Atomizer::new().check_module(&module);
        assert!(errors.is_empty());
        assert!(matches!(scope.lookup("x"), Some(Atom::Bool(_, Some(true)))));
    }

    #[test]
    fn int_plus_int_folds_to_the_literal_sum() {
        let module = mesh_parser::parse("x = 1 + 2\n").expect("should parse");
        let (scope, errors) = Atomizer::new().check_module(&module);
        assert!(errors.is_empty());
        assert!(matches!(scope.lookup("x"), Some(Atom::Int(f, Some(3))) if f.implicit));
    }

    #[test]
    fn int_plus_float_folds_to_the_widened_literal_sum() {
        let module = mesh_parser::parse("x = 1 + 2.0\n").expect("should parse");
        let (scope, errors) = Atomizer::new().check_module(&module);
        assert!(errors.is_empty());
        assert!(matches!(scope.lookup("x"), Some(Atom::Float(_, Some(v))) if *v == 3.0));
    }

    #[test]
    fn a_function_with_an_int_annotation_binds_its_parameter_and_return_type() {
        let module = mesh_parser::parse("def f(x: int) -> int:\n    return x\n").expect("should parse");
        let (scope, errors) = Atomizer::new().check_module(&module);
        assert!(errors.is_empty());
        let Some(Atom::Function(_, sig)) = scope.lookup("f") else { panic!("f should be a function atom") };
        assert!(matches!(*sig.returns, Atom::Int(..)));
    }

    #[test]
    fn none_literal_binds_as_nonetype_instead_of_an_undefined_name() {
        let module = mesh_parser::parse("x = None\n").expect("should parse");
        let (scope, errors) = Atomizer::new().check_module(&module);
        assert!(errors.is_empty());
        assert!(matches!(scope.lookup("x"), Some(Atom::NoneType(_))));
    }

    #[test]
    fn none_is_falsy_in_an_if_expression() {
        let module = mesh_parser::parse("x = 1 if None else 2\n").expect("should parse");
        let (scope, errors) = Atomizer::new().check_module(&module);
        assert!(errors.is_empty());
        assert!(matches!(scope.lookup("x"), Some(Atom::Int(_, Some(2)))));
    }

    #[test]
    fn assert_evaluates_its_test_and_message() {
        let errors = check("assert x, \"boom\"\n");
        assert!(errors.iter().any(|e| matches!(e, TypeError::UndefinedName { name, .. } if name == "x")));
    }

    #[test]
    fn global_naming_an_unbound_name_is_reported() {
        let errors = check("def f():\n    global missing\n    return 0\n");
        assert!(errors.iter().any(|e| matches!(e, TypeError::UndefinedName { name, .. } if name == "missing")));
    }

    #[test]
    fn nonlocal_naming_a_bound_outer_name_is_clean() {
        let errors = check("x = 1\ndef f():\n    nonlocal x\n    return 0\n");
        assert!(errors.is_empty());
    }

    #[test]
    fn a_subscript_inside_an_annotation_is_rejected() {
        let errors = check("def f(x: int[0]) -> int:\n    return x\n");
        assert!(errors.iter().any(|e| matches!(e, TypeError::InvalidInTypeContext { .. })));
    }

    #[test]
    fn a_ternary_inside_an_annotation_is_rejected() {
        let errors = check("def f(x: int if True else str) -> int:\n    return 0\n");
        assert!(errors.iter().any(|e| matches!(e, TypeError::InvalidInTypeContext { .. })));
    }

    #[test]
    fn a_unary_op_inside_an_annotation_is_rejected() {
        let errors = check("def f(x: -int) -> int:\n    return 0\n");
        assert!(errors.iter().any(|e| matches!(e, TypeError::InvalidInTypeContext { .. })));
    }

    #[test]
    fn adding_an_int_to_a_string_is_reported_with_both_operand_kinds_named() {
        let errors = check("x = 1 + \"a\"\n");
        let error = errors.iter().find(|e| matches!(e, TypeError::UnsupportedOperator { .. })).expect("should report");
        let TypeError::UnsupportedOperator { left, right, .. } = error else { unreachable!() };
        assert_eq!(left.kind_name(), "int");
        assert_eq!(right.kind_name(), "str");
    }
}
