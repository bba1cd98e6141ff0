//! Static type analysis for mesh programs (§4.5).
//!
//! This crate walks a parsed module and assigns an `Atom` -- the same
//! value used for runtime values and for type annotations, distinguished
//! by a flag -- to every expression, threading a parent-linked scope
//! graph through function and class bodies as it goes.
//!
//! # Architecture
//!
//! - [`ty`]: the `Atom` value/type representation and the canonical `union`
//! - [`scope`]: the parent-linked scope graph
//! - [`impls`]: operator dispatch, the attribute protocol, call binding
//! - [`builtins`]: the global scope's built-in names
//! - [`error`]: `TypeError`, the atomizer's error taxonomy
//! - [`diagnostics`]: rendering `TypeError` as an ambient `Diagnostic`
//! - [`infer`]: the `Atomizer` tree-walker

pub mod builtins;
pub mod diagnostics;
pub mod error;
pub mod impls;
pub mod infer;
pub mod scope;
pub mod ty;

use mesh_common::Diagnostic;

pub use crate::error::TypeError;
pub use crate::infer::Atomizer;
pub use crate::scope::Scope;
pub use crate::ty::Atom;

/// The result of atomizing a module: the scope it produced (holding every
/// top-level binding's atom) and any type errors found along the way.
pub struct CheckResult {
    pub scope: Scope,
    pub errors: Vec<TypeError>,
}

impl CheckResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Render every error as an ambient `Diagnostic` (§6/§7).
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.errors.iter().map(diagnostics::to_diagnostic).collect()
    }
}

/// Type-check a parsed module: the main entry point for the atomizer.
pub fn check(module: &mesh_parser::ast::Module) -> CheckResult {
    let (scope, errors) = Atomizer::new().check_module(module);
    CheckResult { scope, errors }
}
