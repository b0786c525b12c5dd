//! Unresolved textual/numeric references (spec §3 "Var").

use crate::{Name, Span};
use std::fmt;

/// An unresolved reference that later becomes a dense index. Recorded
/// verbatim by the parser; resolution against the module's per-namespace
/// bindings is a separate pass this core defers (spec §9, Design Notes:
/// "records Vars verbatim and defers resolution").
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Var {
    Index(u64),
    Name(Name),
}

impl Var {
    /// The reserved "no explicit reference" sentinel used by the Script
    /// Composer (spec §4.7) before an action/register's module `Var` is
    /// resolved to the most recently defined module.
    pub const INVALID_INDEX: u64 = u64::MAX;

    #[inline]
    pub const fn unresolved() -> Self {
        Var::Index(Self::INVALID_INDEX)
    }

    #[inline]
    pub fn is_unresolved(&self) -> bool {
        matches!(self, Var::Index(i) if *i == Self::INVALID_INDEX)
    }
}

/// A `Var` paired with the source span it was written at.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct SpannedVar {
    pub var: Var,
    pub span: Span,
}

impl SpannedVar {
    pub fn new(var: Var, span: Span) -> Self {
        SpannedVar { var, span }
    }

    pub fn index(value: u64, span: Span) -> Self {
        SpannedVar::new(Var::Index(value), span)
    }

    pub fn name(name: Name, span: Span) -> Self {
        SpannedVar::new(Var::Name(name), span)
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Var::Index(i) => write!(f, "{i}"),
            Var::Name(_) => write!(f, "$<name>"),
        }
    }
}
