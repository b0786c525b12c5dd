//! Script Composer (spec §4.7 C11): a single left-to-right pass over a
//! parsed `Script` that resolves each command's *implicit* module
//! reference — an `invoke`/`get`/`register` that names no module binds
//! to whichever `(module ...)` most recently appeared before it, per
//! the scripting convention every `.wast` runner follows.
//!
//! A `Var::Name(...)` reference is left untouched: that's an explicit
//! reference to a named module, and resolving *which* command it points
//! at is the concern of whatever consumes `Script.module_bindings`, not
//! this pass.

use rustc_hash::FxHashMap;
use wat_ir::{Command, Name, Script};

/// Resolve every unwritten ("implicit") module reference in `script` to
/// the index of the nearest preceding `(module ...)` command, and
/// record each named module's binding as it is encountered. Must run in
/// a single forward pass: "most recent module" is itself a function of
/// position, so a command's resolution depends on everything already
/// scanned, not on the script as a whole.
pub fn resolve_module_refs(script: &mut Script) {
    let mut latest: Option<usize> = None;
    let mut bindings: FxHashMap<Name, usize> = FxHashMap::default();

    for index in 0..script.commands.len() {
        if let Command::Module(raw) = &script.commands[index] {
            if let Some(name) = raw.name() {
                bindings.insert(name, index);
            }
            latest = Some(index);
            continue;
        }

        match &mut script.commands[index] {
            Command::Register { module, .. } => {
                if module.is_none() {
                    *module = latest.map(|i| wat_ir::Var::Index(i as u64));
                }
            }
            _ => {
                if let Some(action) = script.commands[index].action_mut() {
                    if action.module_var().is_none() {
                        if let Some(i) = latest {
                            action.set_module_var(wat_ir::Var::Index(i as u64));
                        }
                    }
                }
            }
        }
    }

    script.module_bindings = bindings;
}

#[cfg(test)]
mod tests {
    use super::*;
    use wat_ir::{Action, Module, RawModule, Var};

    #[test]
    fn implicit_action_binds_to_latest_module() {
        let mut script = Script::new();
        script.commands.push(Command::Module(RawModule::Text(Module::new())));
        script.commands.push(Command::Action(Action::Get {
            module: None,
            field: "x".into(),
            span: wat_ir::Span::DUMMY,
        }));
        resolve_module_refs(&mut script);
        match &script.commands[1] {
            Command::Action(Action::Get { module, .. }) => {
                assert_eq!(*module, Some(Var::Index(0)));
            }
            _ => panic!("expected Action::Get"),
        }
    }

    #[test]
    fn explicit_name_reference_is_untouched() {
        let mut script = Script::new();
        script.commands.push(Command::Module(RawModule::Text(Module::new())));
        script.commands.push(Command::Action(Action::Get {
            module: Some(Var::Name(wat_ir::Name::from_raw(7))),
            field: "x".into(),
            span: wat_ir::Span::DUMMY,
        }));
        resolve_module_refs(&mut script);
        match &script.commands[1] {
            Command::Action(Action::Get { module, .. }) => {
                assert_eq!(*module, Some(Var::Name(wat_ir::Name::from_raw(7))));
            }
            _ => panic!("expected Action::Get"),
        }
    }
}
