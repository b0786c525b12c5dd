//! Module-level IR: fields, per-kind vectors, and bindings (spec §3
//! "Module Field" / "Module", §8 invariants 1-4).

use crate::{ExprArena, ExprList, FuncSig, Limits, Name, Span, Var, ValType};
use rustc_hash::FxHashMap;
use std::fmt;

/// Named entry in the module's type table (spec §3 "Function Type
/// Declaration").
#[derive(Clone, Debug)]
pub struct FuncTypeDecl {
    pub name: Option<Name>,
    pub sig: FuncSig,
}

/// The element kind the text front-end supports (spec §3 "Table").
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ElemType {
    FuncRef,
}

#[derive(Clone, Debug)]
pub struct Table {
    pub name: Option<Name>,
    pub elem_type: ElemType,
    pub limits: Limits,
}

#[derive(Clone, Debug)]
pub struct Memory {
    pub name: Option<Name>,
    pub limits: Limits,
}

#[derive(Clone, Debug)]
pub struct Global {
    pub name: Option<Name>,
    pub value_type: ValType,
    pub mutable: bool,
    pub init: ExprList,
}

/// How a function declares its signature (spec §4.6 Type-Use Resolver).
#[derive(Clone, Debug)]
pub struct FuncDecl {
    /// `true` when the source wrote an explicit `(type $id)` clause,
    /// regardless of whether inline params/results were also present.
    pub has_func_type: bool,
    /// The `(type $id)` reference, if written. Resolved against the
    /// module's `func_types` after the whole module is parsed (spec
    /// §4.6: "Resolution occurs after the whole module is parsed").
    pub type_use: Option<Var>,
    /// The signature as written inline, or as copied from the resolved
    /// `type_use` if inline was absent.
    pub sig: FuncSig,
}

#[derive(Clone, Debug)]
pub struct Function {
    pub name: Option<Name>,
    pub decl: FuncDecl,
    /// Parameter names, `params ⧺ locals`-indexed alongside `locals`
    /// (spec §4.5: "Function parameter and local names live in a
    /// per-function binding table where the index space is `params ⧺
    /// locals`").
    pub params: Vec<Option<Name>>,
    pub locals: Vec<(Option<Name>, ValType)>,
    pub first_expr: Option<crate::ExprId>,
    /// Local namespace: name -> index into `params ⧺ locals`.
    pub local_bindings: FxHashMap<Name, u32>,
}

impl Function {
    /// Combined `params ⧺ locals` value types, in index order.
    pub fn local_value_types(&self) -> Vec<ValType> {
        let mut types = self.decl.sig.params.clone();
        types.extend(self.locals.iter().map(|(_, ty)| *ty));
        types
    }
}

#[derive(Clone, Debug)]
pub struct ElemSegment {
    pub table: Var,
    pub offset: ExprList,
    pub elems: Vec<Var>,
}

#[derive(Clone, Debug)]
pub struct DataSegment {
    pub memory: Var,
    pub offset: ExprList,
    pub bytes: Vec<u8>,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExternalKind {
    Func,
    Table,
    Memory,
    Global,
}

#[derive(Clone, Debug)]
pub struct Export {
    pub name: String,
    pub kind: ExternalKind,
    pub var: Var,
}

#[derive(Clone, Debug)]
pub enum ImportDesc {
    Func(FuncDecl),
    Table(Table),
    Memory(Memory),
    Global(Global),
}

impl ImportDesc {
    pub fn kind(&self) -> ExternalKind {
        match self {
            ImportDesc::Func(_) => ExternalKind::Func,
            ImportDesc::Table(_) => ExternalKind::Table,
            ImportDesc::Memory(_) => ExternalKind::Memory,
            ImportDesc::Global(_) => ExternalKind::Global,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Import {
    pub module: String,
    pub field: String,
    pub desc: ImportDesc,
}

/// One declaration at module top level, in declaration order (spec §3
/// "Module Field"). Each variant's payload index refers to the
/// corresponding per-kind vector on `Module` — the field list is the
/// *order* of record, the per-kind vectors are the *owning* storage
/// (a deliberate simplification of the teacher's "field list owns,
/// per-kind vectors back-reference" split: see `DESIGN.md`).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ModuleFieldKind {
    Func(usize),
    Table(usize),
    Memory(usize),
    Global(usize),
    Elem(usize),
    Data(usize),
    Import(usize),
    Export(usize),
    FuncType(usize),
    Start,
}

#[derive(Clone, Debug)]
pub struct ModuleField {
    pub kind: ModuleFieldKind,
    pub span: Span,
}

/// One module namespace's textual bindings (spec §4.5 Name Binder).
#[derive(Default, Clone)]
pub struct Bindings {
    map: FxHashMap<Name, u32>,
}

impl Bindings {
    pub fn bind(&mut self, name: Name, index: u32) {
        self.map.insert(name, index);
    }

    pub fn resolve(&self, name: Name) -> Option<u32> {
        self.map.get(&name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Name, u32)> + '_ {
        self.map.iter().map(|(&n, &i)| (n, i))
    }
}

/// Per-kind vectors plus declaration-order field list plus per-namespace
/// bindings, all owned by one `Module` (spec §3 "Module").
#[derive(Default)]
pub struct Module {
    pub name: Option<Name>,
    pub fields: Vec<ModuleField>,

    pub funcs: Vec<Function>,
    pub tables: Vec<Table>,
    pub memories: Vec<Memory>,
    pub globals: Vec<Global>,
    pub exports: Vec<Export>,
    pub imports: Vec<Import>,
    pub func_types: Vec<FuncTypeDecl>,
    pub elems: Vec<ElemSegment>,
    pub datas: Vec<DataSegment>,
    pub start: Option<Var>,

    pub func_bindings: Bindings,
    pub table_bindings: Bindings,
    pub memory_bindings: Bindings,
    pub global_bindings: Bindings,
    pub func_type_bindings: Bindings,
    pub export_bindings: Bindings,

    /// Count of each kind's imported-so-far entries; used to enforce
    /// the import-before-definition invariant (spec §4.4, §8 invariant 2).
    pub num_func_imports: u32,
    pub num_table_imports: u32,
    pub num_memory_imports: u32,
    pub num_global_imports: u32,

    /// Flat storage for every expression in every function/segment/global
    /// body in this module.
    pub exprs: ExprArena,
}

impl Module {
    pub fn new() -> Self {
        Module::default()
    }

    /// Number of entries a given kind currently has (imports and
    /// definitions together), used by the Field Assembler (spec §4.4) to
    /// check "imports must occur before all non-import definitions".
    pub fn kind_len(&self, kind: ExternalKind) -> u32 {
        match kind {
            ExternalKind::Func => u32::try_from(self.funcs.len()).unwrap_or(u32::MAX),
            ExternalKind::Table => u32::try_from(self.tables.len()).unwrap_or(u32::MAX),
            ExternalKind::Memory => u32::try_from(self.memories.len()).unwrap_or(u32::MAX),
            ExternalKind::Global => u32::try_from(self.globals.len()).unwrap_or(u32::MAX),
        }
    }

    pub fn num_imports(&self, kind: ExternalKind) -> u32 {
        match kind {
            ExternalKind::Func => self.num_func_imports,
            ExternalKind::Table => self.num_table_imports,
            ExternalKind::Memory => self.num_memory_imports,
            ExternalKind::Global => self.num_global_imports,
        }
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module")
            .field("fields", &self.fields.len())
            .field("funcs", &self.funcs.len())
            .field("tables", &self.tables.len())
            .field("memories", &self.memories.len())
            .field("globals", &self.globals.len())
            .field("exports", &self.exports.len())
            .field("imports", &self.imports.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bindings_roundtrip() {
        let mut bindings = Bindings::default();
        bindings.bind(Name::from_raw(3), 7);
        assert_eq!(bindings.resolve(Name::from_raw(3)), Some(7));
        assert_eq!(bindings.resolve(Name::from_raw(4)), None);
    }

    #[test]
    fn kind_len_tracks_vector_length() {
        let mut module = Module::new();
        assert_eq!(module.kind_len(ExternalKind::Func), 0);
        module.funcs.push(Function {
            name: None,
            decl: FuncDecl {
                has_func_type: false,
                type_use: None,
                sig: FuncSig::default(),
            },
            params: Vec::new(),
            locals: Vec::new(),
            first_expr: None,
            local_bindings: FxHashMap::default(),
        });
        assert_eq!(module.kind_len(ExternalKind::Func), 1);
    }
}
