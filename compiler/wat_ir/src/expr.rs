//! Flat, arena-backed expression lists.
//!
//! Spec §3 describes `Expr` nodes as an intrusive singly linked list (each
//! node owns a next-pointer). Spec §9's re-architecture notes call for
//! exactly the substitution the teacher crate already made for its own AST
//! (`ori_ir::arena`/`ori_ir::expr_id`: "arena allocation with indices as
//! pointers… Iteration becomes index-following rather than pointer-chasing"):
//! every `Expr` lives in one `ExprArena`, addressed by `ExprId`, and the
//! `next` field becomes `Option<ExprId>` instead of `Option<Box<Expr>>`.

use crate::{Align, BinaryOp, CompareOp, ConvertOp, LoadOp, Name, Span, StoreOp, UnaryOp, ValType};
use std::fmt;

/// Index into an `ExprArena`.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct ExprId(u32);

impl ExprId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        ExprId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExprId({})", self.0)
    }
}

/// A constant literal value. Stored as raw bits so integer and float
/// payloads both round-trip exactly (spec §4.8's `parse_int32`/
/// `parse_float` family already resolve a literal to its bit pattern).
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum ConstValue {
    I32(i32),
    I64(i64),
    /// Stored as bits: two floats that are bit-identical (including NaN
    /// payload) compare equal; `f32::eq` would not agree for NaN.
    F32(u32),
    F64(u64),
}

impl ConstValue {
    pub fn value_type(&self) -> ValType {
        match self {
            ConstValue::I32(_) => ValType::I32,
            ConstValue::I64(_) => ValType::I64,
            ConstValue::F32(_) => ValType::F32,
            ConstValue::F64(_) => ValType::F64,
        }
    }
}

/// A begin/end-paired structured-control body (spec §3 "Block").
#[derive(Clone, Debug, Default)]
pub struct Block {
    pub label: Option<Name>,
    pub signature: Vec<ValType>,
    pub first: Option<ExprId>,
}

/// One instruction node. Spec §3 enumerates the minimum variant set; the
/// `next` field threads nodes into an `ExprList` without per-node heap
/// allocation.
#[derive(Clone, Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
    pub next: Option<ExprId>,
}

#[derive(Clone, Debug)]
pub enum ExprKind {
    Unreachable,
    Nop,
    Drop,
    Select,
    Br(crate::Var),
    BrIf(crate::Var),
    BrTable {
        targets: Vec<crate::Var>,
        default: crate::Var,
    },
    Return,
    Call(crate::Var),
    CallIndirect {
        table: crate::Var,
        type_use: crate::Var,
    },
    GetLocal(crate::Var),
    SetLocal(crate::Var),
    TeeLocal(crate::Var),
    GetGlobal(crate::Var),
    SetGlobal(crate::Var),
    Load {
        op: LoadOp,
        align: Align,
        offset: u64,
    },
    Store {
        op: StoreOp,
        align: Align,
        offset: u64,
    },
    Const(ConstValue),
    Unary(UnaryOp),
    Binary(BinaryOp),
    Compare(CompareOp),
    Convert(ConvertOp),
    CurrentMemory,
    GrowMemory,
    Block(Block),
    Loop(Block),
    If {
        true_block: Block,
        /// `None` when the `else` branch is entirely absent, distinct
        /// from `Some` with an empty body (spec §4.2: "its absence is
        /// distinguished from an empty `else`").
        false_block: Option<Block>,
    },
}

/// A constant-time-append list of `Expr` nodes: first-pointer,
/// last-pointer, and size, backed by the enclosing arena (spec §4.2:
/// "Expr-list concatenation is constant-time: each list stores
/// first-pointer, last-pointer, and size").
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct ExprList {
    first: Option<ExprId>,
    last: Option<ExprId>,
    len: u32,
}

impl ExprList {
    pub const EMPTY: ExprList = ExprList {
        first: None,
        last: None,
        len: 0,
    };

    pub fn is_empty(&self) -> bool {
        self.first.is_none()
    }

    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn first(&self) -> Option<ExprId> {
        self.first
    }

    /// Iterate this list's nodes via the owning arena.
    pub fn iter<'a>(&self, arena: &'a ExprArena) -> ExprListIter<'a> {
        ExprListIter {
            arena,
            next: self.first,
        }
    }
}

pub struct ExprListIter<'a> {
    arena: &'a ExprArena,
    next: Option<ExprId>,
}

impl<'a> Iterator for ExprListIter<'a> {
    type Item = &'a Expr;

    fn next(&mut self) -> Option<&'a Expr> {
        let id = self.next?;
        let expr = self.arena.get(id);
        self.next = expr.next;
        Some(expr)
    }
}

/// Contiguous storage for every `Expr` produced while parsing one
/// `Module`. One function/segment/global owns the sub-ranges addressed
/// by its `ExprList`s, but all nodes live in this single flat `Vec` for
/// cache locality (spec §9 re-architecture notes).
#[derive(Clone, Default)]
pub struct ExprArena {
    exprs: Vec<Expr>,
}

impl ExprArena {
    pub fn new() -> Self {
        ExprArena { exprs: Vec::new() }
    }

    pub fn with_capacity(cap: usize) -> Self {
        ExprArena {
            exprs: Vec::with_capacity(cap),
        }
    }

    pub fn get(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    pub fn get_mut(&mut self, id: ExprId) -> &mut Expr {
        &mut self.exprs[id.index()]
    }

    /// Allocate a new node and append it to `list`, in O(1) via the
    /// list's last-pointer.
    pub fn push(&mut self, list: &mut ExprList, kind: ExprKind, span: Span) -> ExprId {
        let id = ExprId::new(u32::try_from(self.exprs.len()).unwrap_or_else(|_| {
            panic!("expression arena exceeded u32::MAX entries")
        }));
        self.exprs.push(Expr {
            kind,
            span,
            next: None,
        });
        match list.last {
            Some(last) => self.get_mut(last).next = Some(id),
            None => list.first = Some(id),
        }
        list.last = Some(id);
        list.len += 1;
        id
    }

    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests use unwrap for brevity")]
mod tests {
    use super::*;
    use crate::Var;

    #[test]
    fn push_appends_in_order() {
        let mut arena = ExprArena::new();
        let mut list = ExprList::EMPTY;
        arena.push(&mut list, ExprKind::Const(ConstValue::I32(1)), Span::DUMMY);
        arena.push(&mut list, ExprKind::Const(ConstValue::I32(2)), Span::DUMMY);
        arena.push(&mut list, ExprKind::Binary(BinaryOp::I32Add), Span::DUMMY);

        let kinds: Vec<_> = list
            .iter(&arena)
            .map(|e| match &e.kind {
                ExprKind::Const(ConstValue::I32(v)) => format!("const {v}"),
                ExprKind::Binary(BinaryOp::I32Add) => "add".to_string(),
                _ => "other".to_string(),
            })
            .collect();
        assert_eq!(kinds, vec!["const 1", "const 2", "add"]);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn empty_list_iterates_nothing() {
        let arena = ExprArena::new();
        let list = ExprList::EMPTY;
        assert!(list.iter(&arena).next().is_none());
    }

    #[test]
    fn br_table_variant_holds_targets_and_default() {
        let mut arena = ExprArena::new();
        let mut list = ExprList::EMPTY;
        arena.push(
            &mut list,
            ExprKind::BrTable {
                targets: vec![Var::Index(0), Var::Index(1)],
                default: Var::Index(2),
            },
            Span::DUMMY,
        );
        let node = list.iter(&arena).next().unwrap();
        match &node.kind {
            ExprKind::BrTable { targets, default } => {
                assert_eq!(targets.len(), 2);
                assert_eq!(*default, Var::Index(2));
            }
            _ => panic!("expected BrTable"),
        }
    }
}
