//! Type-Use Resolver (spec §4.6 C10): a post-parse pass over a fully
//! built `Module` that settles every function's effective signature.
//!
//! A function can declare its signature three ways: an explicit `(type
//! $id)` reference, inline `(param)`/`(result)` clauses, or both. This
//! pass handles the two cases that need module-wide information the
//! single-function grammar in `grammar/func.rs` doesn't have yet:
//!
//! - named-only (`has_func_type` and no inline params/results written):
//!   copy the signature from the referenced `FuncTypeDecl`.
//! - neither given (no `(type $id)`, no inline clauses): synthesize an
//!   anonymous type, reusing an existing one with the same shape rather
//!   than declaring a duplicate.
//!
//! When both are given, a real toolchain would additionally check the
//! two agree; that cross-check is left to a downstream phase (not
//! needed to produce a structurally valid IR, see `DESIGN.md`).

use wat_ir::{FuncTypeDecl, Module};

/// Resolve every function's `FuncDecl` against `module.func_types`,
/// synthesizing and deduplicating anonymous types as needed. Silent and
/// best-effort: a reference to a type that doesn't exist leaves the
/// function's inline-or-empty signature untouched, since there is
/// neither an `ErrorKind` for this nor a span on `Function` to anchor
/// one to (a later validation phase owns that check).
pub fn resolve_type_uses(module: &mut Module) {
    for func_index in 0..module.funcs.len() {
        let decl = module.funcs[func_index].decl.clone();
        if decl.has_func_type {
            if decl.sig.params.is_empty() && decl.sig.results.is_empty() {
                if let Some(var) = decl.type_use {
                    if let Some(sig) = resolve_var_sig(module, var) {
                        module.funcs[func_index].decl.sig = sig;
                    }
                }
            }
            // Both given: leave as written, see module doc comment above.
        } else {
            let index = find_or_insert_anonymous(module, &decl.sig);
            module.funcs[func_index].decl.type_use = Some(wat_ir::Var::Index(u64::from(index)));
        }
    }
}

fn resolve_var_sig(module: &Module, var: wat_ir::Var) -> Option<wat_ir::FuncSig> {
    let index = match var {
        wat_ir::Var::Index(i) => usize::try_from(i).ok()?,
        wat_ir::Var::Name(name) => module.func_type_bindings.resolve(name)? as usize,
    };
    module.func_types.get(index).map(|decl| decl.sig.clone())
}

fn find_or_insert_anonymous(module: &mut Module, sig: &wat_ir::FuncSig) -> u32 {
    if let Some(index) = module.func_types.iter().position(|decl| &decl.sig == sig) {
        return index as u32;
    }
    let index = u32::try_from(module.func_types.len()).unwrap_or(u32::MAX);
    module.func_types.push(FuncTypeDecl {
        name: None,
        sig: sig.clone(),
    });
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use wat_ir::{FuncDecl, FuncSig, Function, Var};

    fn push_func(module: &mut Module, decl: FuncDecl) {
        module.funcs.push(Function {
            name: None,
            decl,
            params: Vec::new(),
            locals: Vec::new(),
            first_expr: None,
            local_bindings: Default::default(),
        });
    }

    #[test]
    fn neither_given_synthesizes_and_dedupes() {
        let mut module = Module::new();
        let sig = FuncSig::new(vec![wat_ir::ValType::I32], Vec::new());
        push_func(
            &mut module,
            FuncDecl {
                has_func_type: false,
                type_use: None,
                sig: sig.clone(),
            },
        );
        push_func(
            &mut module,
            FuncDecl {
                has_func_type: false,
                type_use: None,
                sig,
            },
        );
        resolve_type_uses(&mut module);
        assert_eq!(module.func_types.len(), 1);
        assert_eq!(module.funcs[0].decl.type_use, Some(Var::Index(0)));
        assert_eq!(module.funcs[1].decl.type_use, Some(Var::Index(0)));
    }

    #[test]
    fn named_only_copies_signature() {
        let mut module = Module::new();
        module.func_types.push(FuncTypeDecl {
            name: None,
            sig: FuncSig::new(vec![wat_ir::ValType::F64], vec![wat_ir::ValType::F64]),
        });
        push_func(
            &mut module,
            FuncDecl {
                has_func_type: true,
                type_use: Some(Var::Index(0)),
                sig: FuncSig::default(),
            },
        );
        resolve_type_uses(&mut module);
        assert_eq!(module.funcs[0].decl.sig.params, vec![wat_ir::ValType::F64]);
        assert_eq!(module.funcs[0].decl.sig.results, vec![wat_ir::ValType::F64]);
    }
}
