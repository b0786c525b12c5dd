//! `wat_ir` — Intermediate representation types for the WebAssembly
//! text-format front end.
//!
//! This crate contains the core data structures built by `wat_parse`:
//! - `Span` for source locations
//! - `Name` for interned identifiers, backed by `StringInterner`
//! - `Expr`/`ExprArena` for flat, arena-addressed instruction lists
//! - Module-level types (`Module`, `Function`, `Table`, `Memory`, …)
//! - Script-level types (`Script`, `Command`, `Action`, `RawModule`)
//!
//! # Design Philosophy
//!
//! - Flatten everything: no `Box<Expr>`, instructions live in one
//!   `ExprArena` addressed by `ExprId`.
//! - Intern identifiers: `Name` is a dense index, compared in O(1).
//! - Defer resolution: `Var` records a textual name or numeric index
//!   verbatim; turning it into a dense index is a separate pass this
//!   crate's types support but do not perform.

mod expr;
mod interner;
mod limits;
mod module;
mod name;
mod opcode;
mod script;
mod span;
mod value_type;
mod var;

pub use expr::{Block, ConstValue, Expr, ExprArena, ExprId, ExprKind, ExprList, ExprListIter};
pub use interner::StringInterner;
pub use limits::Limits;
pub use module::{
    Bindings, DataSegment, ElemSegment, ElemType, Export, ExternalKind, FuncDecl, Function,
    FuncTypeDecl, Global, Import, ImportDesc, Memory, Module, ModuleField, ModuleFieldKind, Table,
};
pub use name::Name;
pub use opcode::{Align, BinaryOp, CompareOp, ConvertOp, LoadOp, StoreOp, UnaryOp};
pub use script::{Action, Command, ConstExpectation, RawModule, Script};
pub use span::{Position, Span, SpanError};
pub use value_type::{FuncSig, TypeVector, ValType};
pub use var::{SpannedVar, Var};
