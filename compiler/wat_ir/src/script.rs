//! Script-level IR: the embedded test-script layer (spec §3 "Raw Module",
//! "Action", "Command", "Script", §4.7).

use crate::{ConstValue, Module, Name, Span, Var};
use rustc_hash::FxHashMap;

/// A module as it appears at the top of a script command: parsed text,
/// or raw bytes destined for the external Binary Reader, or a `quote`
/// module re-lexed as text (SPEC_FULL supplement; spec §4.7 only names
/// the text/binary split, `quote` is the same "re-ingest through another
/// reader" pattern generalized to a third source form).
pub enum RawModule {
    Text(Module),
    Binary {
        name: Option<Name>,
        bytes: Vec<u8>,
        span: Span,
    },
    Quote {
        name: Option<Name>,
        source: String,
        span: Span,
    },
}

impl RawModule {
    pub fn name(&self) -> Option<Name> {
        match self {
            RawModule::Text(module) => module.name,
            RawModule::Binary { name, .. } | RawModule::Quote { name, .. } => *name,
        }
    }
}

/// One expected result in an `assert_return` payload. Spec §3 names the
/// `AssertReturn` variant but not its payload shape; `spec_full`
/// supplements it with the NaN wildcards so a single result list can mix
/// exact values and "any NaN of this kind" expectations (real WAT script
/// `assert_return` invocations do this routinely, e.g. `f32.sqrt` of a
/// negative number).
#[derive(Clone, Debug)]
pub enum ConstExpectation {
    Exact(ConstValue),
    CanonicalNan,
    ArithmeticNan,
}

/// An invocation of an exported function, or a read of an exported
/// global, used by scripts (spec §3 "Action").
pub enum Action {
    Invoke {
        module: Option<Var>,
        field: String,
        args: Vec<ConstValue>,
        span: Span,
    },
    Get {
        module: Option<Var>,
        field: String,
        span: Span,
    },
}

impl Action {
    pub fn span(&self) -> Span {
        match self {
            Action::Invoke { span, .. } | Action::Get { span, .. } => *span,
        }
    }

    pub fn module_var(&self) -> Option<Var> {
        match self {
            Action::Invoke { module, .. } | Action::Get { module, .. } => *module,
        }
    }

    pub fn set_module_var(&mut self, var: Var) {
        match self {
            Action::Invoke { module, .. } | Action::Get { module, .. } => *module = Some(var),
        }
    }
}

/// A top-level script item (spec §3 "Command").
pub enum Command {
    Module(RawModule),
    Register {
        name: String,
        module: Option<Var>,
        span: Span,
    },
    Action(Action),
    AssertReturn {
        action: Action,
        expected: Vec<ConstExpectation>,
    },
    AssertTrap {
        action: Action,
        message: String,
    },
    AssertExhaustion {
        action: Action,
        message: String,
    },
    AssertMalformed {
        module: RawModule,
        message: String,
    },
    AssertInvalid {
        module: RawModule,
        message: String,
    },
    AssertUnlinkable {
        module: RawModule,
        message: String,
    },
    AssertUninstantiable {
        module: RawModule,
        message: String,
    },
}

impl Command {
    /// Every command variant that carries a module reference, per the
    /// Script Composer's resolution pass (spec §4.7): `Register`, any
    /// assert wrapping an `Action`, or a bare `Action`.
    pub fn action_mut(&mut self) -> Option<&mut Action> {
        match self {
            Command::Action(action)
            | Command::AssertReturn { action, .. }
            | Command::AssertTrap { action, .. }
            | Command::AssertExhaustion { action, .. } => Some(action),
            _ => None,
        }
    }
}

/// Ordered sequence of commands plus the module-name -> command-index
/// binding table (spec §3 "Script").
#[derive(Default)]
pub struct Script {
    pub commands: Vec<Command>,
    pub module_bindings: FxHashMap<Name, usize>,
}

impl Script {
    pub fn new() -> Self {
        Script::default()
    }
}
